//! Load sessions.
//!
//! A `ProjectLoader` runs one session over an ordered list of modules:
//!
//! ```text
//! Unresolved ──▶ RootResolved ──▶ ScriptsRegistered ──▶ Delegated ──▶ Closed
//!   validate       shortest          placeholder          translator
//!   module kinds   parent dir        script classes       runs
//! ```
//!
//! States only move forward. Module kinds are checked before anything
//! else, so a rejected session leaves the registry exactly as it was.

use std::path::{Path, PathBuf};

use pyl_ir::{path, SharedInterner, TypeName};
use pyl_patterns::SubscriptRewriter;
use pyl_types::{InvariantError, TypeRegistry};

use crate::{
    LoadError, LoaderConfig, Module, ModuleEntry, ModuleKind, SystemPath, TranslationContext,
    Translator,
};

/// Progress of a load session.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum LoadState {
    /// Nothing done yet.
    Unresolved,
    /// The project root is known (possibly as "none").
    RootResolved,
    /// Placeholder classes for every entry are registered.
    ScriptsRegistered,
    /// The translator has been handed control.
    Delegated,
    /// Translation finished successfully.
    Closed,
}

impl LoadState {
    pub const fn name(self) -> &'static str {
        match self {
            LoadState::Unresolved => "unresolved",
            LoadState::RootResolved => "root-resolved",
            LoadState::ScriptsRegistered => "scripts-registered",
            LoadState::Delegated => "delegated",
            LoadState::Closed => "closed",
        }
    }
}

/// Drives one load session and owns its results.
pub struct ProjectLoader {
    config: LoaderConfig,
    registry: TypeRegistry,
    rewriter: SubscriptRewriter,
    system_path: SystemPath,
    project_kind: Option<&'static str>,
    state: LoadState,
}

impl ProjectLoader {
    /// A loader with default configuration.
    pub fn new(interner: SharedInterner) -> Self {
        Self::with_config(interner, LoaderConfig::default())
    }

    pub fn with_config(interner: SharedInterner, config: LoaderConfig) -> Self {
        let rewriter = SubscriptRewriter::new(&interner);
        let system_path = SystemPath::new(config.lib_paths.clone());
        ProjectLoader {
            config,
            registry: TypeRegistry::new(interner),
            rewriter,
            system_path,
            project_kind: None,
            state: LoadState::Unresolved,
        }
    }

    #[inline]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// The registry, read-only. Complete only once the state is `Closed`;
    /// use [`into_registry`](Self::into_registry) to keep it past the loader.
    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    pub fn system_path(&self) -> &SystemPath {
        &self.system_path
    }

    /// Implementation of the first script module seen.
    #[inline]
    pub fn project_kind(&self) -> Option<&'static str> {
        self.project_kind
    }

    /// Give up the loader and keep the registry.
    ///
    /// Only a closed session hands its registry out. A session that failed
    /// part way leaves a partial registry, which is dropped with the loader.
    pub fn into_registry(self) -> Result<TypeRegistry, InvariantError> {
        if self.state != LoadState::Closed {
            return Err(InvariantError::SessionOrder {
                operation: "take the registry",
                state: self.state.name(),
            });
        }
        Ok(self.registry)
    }

    /// Run the session over `modules`, then hand off to `translator`.
    ///
    /// Returns the resolved search path. Fails without touching the
    /// registry if any module is of an unrecognized kind, and with an
    /// invariant error if this loader already ran a session.
    #[tracing::instrument(level = "debug", skip_all, fields(modules = modules.len()))]
    pub fn load(
        &mut self,
        modules: &[&dyn Module],
        translator: &mut dyn Translator,
    ) -> Result<&SystemPath, LoadError> {
        if self.state != LoadState::Unresolved {
            return Err(InvariantError::SessionOrder {
                operation: "load",
                state: self.state.name(),
            }
            .into());
        }

        let scripts = partition_scripts(modules)?;
        self.project_kind = self.detect_project_kind(&scripts);

        self.system_path.app_path = select_project_root(
            scripts
                .iter()
                .flat_map(|module| module.entries())
                .map(ModuleEntry::path),
        );
        self.advance(LoadState::RootResolved);
        tracing::debug!(root = ?self.system_path.app_path, "project root resolved");

        let placeholders = self.stage_placeholders(modules);
        for &name in &placeholders {
            self.registry.register_script_placeholder(name);
        }
        self.advance(LoadState::ScriptsRegistered);
        tracing::debug!(count = placeholders.len(), "script placeholders registered");

        self.advance(LoadState::Delegated);
        let mut cx = TranslationContext::new(&mut self.registry, &self.rewriter, &self.system_path);
        translator.translate(&mut cx, modules)?;
        self.advance(LoadState::Closed);

        Ok(&self.system_path)
    }

    fn advance(&mut self, next: LoadState) {
        tracing::trace!(from = self.state.name(), to = next.name(), "load state");
        self.state = next;
    }

    /// First script implementation; later, different ones are reported.
    fn detect_project_kind(&self, scripts: &[&dyn Module]) -> Option<&'static str> {
        let (first, rest) = scripts.split_first()?;
        let kind = first.implementation();
        if self.config.warn_on_mixed_modules {
            for other in rest.iter().filter(|m| m.implementation() != kind) {
                tracing::warn!(
                    project_kind = kind,
                    ignored = other.implementation(),
                    "mixed script module implementations; keeping the first"
                );
            }
        }
        Some(kind)
    }

    /// Placeholder names for every entry of every module, in order.
    fn stage_placeholders(&self, modules: &[&dyn Module]) -> Vec<TypeName> {
        let interner = self.registry.interner();
        modules
            .iter()
            .flat_map(|module| module.entries())
            .map(|entry| TypeName::script(interner, entry.path()))
            .collect()
    }
}

/// Script modules of `modules`, or the first unrecognized one as an error.
fn partition_scripts<'m>(modules: &[&'m dyn Module]) -> Result<Vec<&'m dyn Module>, LoadError> {
    let mut scripts = Vec::new();
    for &module in modules {
        match module.kind() {
            ModuleKind::Script => scripts.push(module),
            ModuleKind::LibraryUrl => {}
            ModuleKind::Unrecognized => {
                return Err(LoadError::UnsupportedModuleKind {
                    implementation: module.implementation().to_owned(),
                })
            }
        }
    }
    Ok(scripts)
}

/// Project root for a set of script entry paths.
///
/// Each path is normalized and its parent directory taken; the root is the
/// candidate with the fewest characters, the first one on ties. Paths
/// without a parent directory are not candidates.
pub fn select_project_root<'p>(paths: impl IntoIterator<Item = &'p str>) -> Option<PathBuf> {
    paths
        .into_iter()
        .filter_map(path::parent_dir)
        .min_by_key(|candidate| path_length(candidate))
}

/// Length of a path in characters, not bytes.
fn path_length(path: &Path) -> usize {
    path.to_string_lossy().chars().count()
}

#[cfg(test)]
mod tests;
