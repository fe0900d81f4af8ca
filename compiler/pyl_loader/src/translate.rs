//! The seam between the loader and the translator.
//!
//! The loader prepares the registry and search path, then hands control to
//! a `Translator`, which walks the parsed entities and builds classes and
//! code bodies through a `TranslationContext`.

use pyl_ir::{Entity, StringInterner, TypeName};
use pyl_patterns::SubscriptRewriter;
use pyl_types::TypeRegistry;

use crate::{LoadError, Module, SystemPath};

/// Translates parsed modules into registry entries.
pub trait Translator {
    /// Translate all of `modules`.
    ///
    /// Placeholder script classes for every entry are registered before
    /// this is called.
    fn translate(
        &mut self,
        cx: &mut TranslationContext<'_>,
        modules: &[&dyn Module],
    ) -> Result<(), LoadError>;
}

/// What a translator may use during a load session.
pub struct TranslationContext<'a> {
    registry: &'a mut TypeRegistry,
    rewriter: &'a SubscriptRewriter,
    system_path: &'a SystemPath,
}

impl<'a> TranslationContext<'a> {
    pub(crate) fn new(
        registry: &'a mut TypeRegistry,
        rewriter: &'a SubscriptRewriter,
        system_path: &'a SystemPath,
    ) -> Self {
        TranslationContext {
            registry,
            rewriter,
            system_path,
        }
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &*self.registry
    }

    /// Mutable access for defining classes, fields and code bodies.
    #[inline]
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut *self.registry
    }

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        self.registry.interner()
    }

    #[inline]
    pub fn system_path(&self) -> &SystemPath {
        self.system_path
    }

    /// Placeholder class name of a module entry.
    pub fn script_name(&self, entry_path: &str) -> TypeName {
        TypeName::script(self.interner(), entry_path)
    }

    /// Rewrite subscript assignments in `entity` and everything scoped in
    /// it. Returns the number of rewrites.
    pub fn rewrite_entity(&self, entity: &mut Entity) -> usize {
        let mut rewritten = 0;
        let mut pending = vec![entity];
        while let Some(entity) = pending.pop() {
            if let Some(root) = entity.ast {
                rewritten += self.rewriter.rewrite_tree(&mut entity.arena, root);
            }
            pending.extend(entity.scoped.iter_mut());
        }
        rewritten
    }
}
