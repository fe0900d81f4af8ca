//! Loader configuration and the resolved search path.

use std::path::{Path, PathBuf};

/// Configuration for a load session.
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Library search paths, copied into the session's `SystemPath`.
    pub lib_paths: Vec<PathBuf>,
    /// Log a warning when script modules of different implementations are
    /// loaded together.
    pub warn_on_mixed_modules: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            lib_paths: Vec::new(),
            warn_on_mixed_modules: true,
        }
    }
}

/// Where the analyzed program's imports are resolved from.
///
/// Owned by the load session and handed to the translator; there is no
/// process-wide copy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SystemPath {
    /// Project root, `None` until resolved or when no script entry has a
    /// parent directory.
    pub app_path: Option<PathBuf>,
    pub lib_paths: Vec<PathBuf>,
}

impl SystemPath {
    pub fn new(lib_paths: Vec<PathBuf>) -> Self {
        SystemPath {
            app_path: None,
            lib_paths,
        }
    }

    #[inline]
    pub fn app_path(&self) -> Option<&Path> {
        self.app_path.as_deref()
    }

    /// Search order: the project root, then the library paths.
    pub fn search_paths(&self) -> impl Iterator<Item = &Path> {
        self.app_path
            .iter()
            .chain(self.lib_paths.iter())
            .map(PathBuf::as_path)
    }
}
