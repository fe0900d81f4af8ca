//! Load errors.

use pyl_types::InvariantError;
use thiserror::Error;

/// Why a load session did not complete.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    /// A module of a kind the loader cannot handle. Raised before the
    /// registry is touched.
    #[error("unsupported module kind `{implementation}`")]
    UnsupportedModuleKind { implementation: String },

    /// A registry or session precondition was violated.
    #[error(transparent)]
    Invariant(#[from] InvariantError),

    /// The translator gave up.
    #[error("translation failed: {message}")]
    Translation { message: String },
}

impl LoadError {
    pub fn translation(message: impl Into<String>) -> Self {
        LoadError::Translation {
            message: message.into(),
        }
    }
}
