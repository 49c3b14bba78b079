//! # Photo Library Export
//!
//! Extracts the metadata of a photo-management library from its database
//! files and re-materializes it as an iPhoto-compatible `AlbumData.xml`
//! document, or copies album thumbnails into a folder tree mirroring the
//! album hierarchy.
//!
//! ## Architecture
//! The library is split into the export engine and a thin presentation
//! layer:
//! - `core` - repository, tree walker, document assembler, thumbnail exporter
//! - `error` - error types
//! - `cli` (in the binary) - command-line interface

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use error::{ExportError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. `RUST_LOG`
/// overrides the verbosity picked from the flag.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
