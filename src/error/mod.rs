//! # Error Module
//!
//! Error types for the library exporter.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, identifiers, what went wrong
//! - **Recovery hints** - a locked database names the flag that works around it
//! - **No partial output** - every error here aborts the run before anything
//!   is written to the final output path

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Tree error: {0}")]
    Walk(#[from] WalkError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised while reading the source library databases
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Failed to open library database at {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("Database {path} is locked by another process. Re-run with --tmp-db to work on a temporary copy.")]
    Locked { path: PathBuf },

    #[error("Folder not found: {uuid}")]
    FolderNotFound { uuid: String },

    #[error("Album not found: {uuid}")]
    AlbumNotFound { uuid: String },

    #[error("No resource entry for adjustment {token}")]
    ResourceNotFound { token: String },

    #[error("Failed to copy database {path} to a temporary location: {source}")]
    TempCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Errors detected while walking the folder tree
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Cycle detected in folder tree at {uuid}")]
    CycleDetected { uuid: String },
}

/// Errors writing the output document or copying thumbnails
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("File {path} exists. Re-run with --force to overwrite it.")]
    AlreadyExists { path: PathBuf },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize property list: {0}")]
    Plist(#[from] plist::Error),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ExportError>;
