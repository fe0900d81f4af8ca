//! pyl loader - module bootstrap and load sessions.
//!
//! A load session takes the modules of one analysis run, resolves the
//! project root, registers a placeholder class per source entry and then
//! hands the populated registry to a [`Translator`]. See [`ProjectLoader`].

mod config;
mod error;
mod loader;
mod module;
mod translate;

use std::sync::Once;

pub use config::{LoaderConfig, SystemPath};
pub use error::LoadError;
pub use loader::{select_project_root, LoadState, ProjectLoader};
pub use module::{LibraryUrlModule, Module, ModuleEntry, ModuleKind, ScriptModule};
pub use translate::{TranslationContext, Translator};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber when `RUST_LOG` is set.
///
/// Safe to call more than once; only the first call has any effect.
///
/// ```bash
/// RUST_LOG=pyl_loader=debug,pyl_types=trace cargo test
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
