//! Hierarchical class and code-body names.
//!
//! A `TypeName` is an interned string in which `/` marks nesting:
//! `script /p/a.py/Outer/Inner` is the class `Inner` declared inside
//! `Outer`, declared inside the script `/p/a.py`. Two type names are equal
//! iff their strings are equal, which interning turns into an index compare.

use std::fmt;

use crate::{Name, StringInterner};

/// Separator between an outer type and a type nested inside it.
pub const NESTING_SEPARATOR: char = '/';

/// Prefix of the placeholder class registered for each module entry.
const SCRIPT_PREFIX: &str = "script ";

/// Interned hierarchical type name.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeName(Name);

impl TypeName {
    /// Wrap an already-interned name.
    #[inline]
    pub const fn from_name(name: Name) -> Self {
        TypeName(name)
    }

    /// Intern `text` as a type name.
    #[inline]
    pub fn intern(interner: &StringInterner, text: &str) -> Self {
        TypeName(interner.intern(text))
    }

    /// Name of the placeholder class for a module entry: `"script " + path`.
    pub fn script(interner: &StringInterner, entry_path: &str) -> Self {
        Self::intern(interner, &format!("{SCRIPT_PREFIX}{entry_path}"))
    }

    /// The interned name backing this type name.
    #[inline]
    pub const fn name(self) -> Name {
        self.0
    }

    /// The full string form.
    #[inline]
    pub fn as_str(self, interner: &StringInterner) -> &'static str {
        interner.lookup(self.0)
    }

    /// Whether this name denotes a type nested in another one.
    ///
    /// A separator at index 0 does not count: there is no outer name.
    pub fn is_nested(self, interner: &StringInterner) -> bool {
        outer_split(self.as_str(interner)).is_some()
    }

    /// The enclosing type name, if this name is nested.
    ///
    /// Only the last separator is considered, so the outer of `A/B/C` is
    /// `A/B`, never `A`.
    pub fn outer(self, interner: &StringInterner) -> Option<TypeName> {
        let (outer, _) = outer_split(self.as_str(interner))?;
        Some(Self::intern(interner, outer))
    }

    /// The last path segment: `C` for `A/B/C`, the whole name otherwise.
    pub fn simple_name(self, interner: &StringInterner) -> &'static str {
        let text = self.as_str(interner);
        outer_split(text).map_or(text, |(_, inner)| inner)
    }

    /// The name of `inner` nested inside this type.
    pub fn nested(self, interner: &StringInterner, inner: &str) -> TypeName {
        let text = format!("{}{NESTING_SEPARATOR}{inner}", self.as_str(interner));
        Self::intern(interner, &text)
    }

    /// Render with an interner, for diagnostics and error messages.
    pub fn display(self, interner: &StringInterner) -> String {
        self.as_str(interner).to_owned()
    }
}

/// Split at the last separator, if it is not the first character.
fn outer_split(text: &str) -> Option<(&str, &str)> {
    match text.rfind(NESTING_SEPARATOR) {
        Some(idx) if idx > 0 => Some((&text[..idx], &text[idx + 1..])),
        _ => None,
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({:?})", self.0)
    }
}

impl From<Name> for TypeName {
    fn from(name: Name) -> Self {
        TypeName(name)
    }
}
