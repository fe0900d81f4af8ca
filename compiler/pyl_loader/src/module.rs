//! Source modules handed to a load session.
//!
//! A module is a bundle of entries, each naming one source file by path.
//! Script modules hold the project's own code and decide the project root;
//! library modules contribute entries but never affect the root.

/// What a module holds, as far as the loader is concerned.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ModuleKind {
    /// Project source files.
    Script,
    /// Library sources located by URL.
    LibraryUrl,
    /// Anything else. Loading such a module is an error.
    Unrecognized,
}

/// One source file of a module.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ModuleEntry {
    path: String,
}

impl ModuleEntry {
    pub fn new(path: impl Into<String>) -> Self {
        ModuleEntry { path: path.into() }
    }

    /// The path as given, before normalization.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A source of module entries.
pub trait Module {
    fn kind(&self) -> ModuleKind;

    /// Identity of the concrete module type.
    ///
    /// Script modules of different implementations in one session are
    /// reported; the first one seen decides the project kind.
    fn implementation(&self) -> &'static str;

    fn entries(&self) -> &[ModuleEntry];
}

/// Project source files.
#[derive(Clone, Debug, Default)]
pub struct ScriptModule {
    entries: Vec<ModuleEntry>,
}

impl ScriptModule {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptModule {
            entries: paths.into_iter().map(ModuleEntry::new).collect(),
        }
    }

    /// A module holding a single file.
    pub fn file(path: impl Into<String>) -> Self {
        ScriptModule {
            entries: vec![ModuleEntry::new(path)],
        }
    }
}

impl Module for ScriptModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Script
    }

    fn implementation(&self) -> &'static str {
        "ScriptModule"
    }

    fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }
}

/// Library sources fetched from a URL.
#[derive(Clone, Debug)]
pub struct LibraryUrlModule {
    url: String,
    entries: Vec<ModuleEntry>,
}

impl LibraryUrlModule {
    pub fn new<I, S>(url: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LibraryUrlModule {
            url: url.into(),
            entries: paths.into_iter().map(ModuleEntry::new).collect(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Module for LibraryUrlModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::LibraryUrl
    }

    fn implementation(&self) -> &'static str {
        "LibraryUrlModule"
    }

    fn entries(&self) -> &[ModuleEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests;
