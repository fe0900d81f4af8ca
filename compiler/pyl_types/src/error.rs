//! Registry invariant violations.
//!
//! These are defects in the caller (usually the translator): a name that
//! should already be registered is not, or names an entry of the wrong
//! category. They carry the offending name already rendered so they can
//! outlive the interner.

use thiserror::Error;

/// A registry operation was asked to do something its preconditions rule out.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// No entry with this name is registered.
    #[error("unknown class `{name}`")]
    UnknownClass { name: String },

    /// The entry exists but is a code body, not a class.
    #[error("`{name}` is a code body, not a class")]
    NotAClass { name: String },

    /// `attach_code` for a name that was never declared.
    #[error("code body `{name}` was never declared")]
    UnknownCodeBody { name: String },

    /// The entry exists but is a class, not a code body.
    #[error("`{name}` is a class, not a code body")]
    NotACodeBody { name: String },

    /// A function entity declared no supertype.
    #[error("function `{name}` declares no code-body kind")]
    MissingSupertype { name: String },

    /// A function entity's supertype is not registered.
    #[error("function `{name}` declares unknown code-body kind `{supertype}`")]
    UnknownSupertype { name: String, supertype: String },

    /// A function entity's supertype is registered but is not a code-body kind.
    #[error("function `{name}` declares `{supertype}`, which is not a code-body kind")]
    NotACodeBodyKind { name: String, supertype: String },

    /// A loader operation was called in the wrong session state.
    #[error("cannot {operation} while the loader is {state}")]
    SessionOrder {
        operation: &'static str,
        state: &'static str,
    },
}
