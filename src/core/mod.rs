//! # Core Module
//!
//! The export engine, independent of the command-line front end.
//!
//! ## Modules
//! - `library` - Read-only repository over the source database files
//! - `model` - Folder, album and photo records
//! - `walker` - Depth-first traversal of the folder containment graph
//! - `albumdata` - Assembles the hierarchical output document
//! - `thumbnails` - Copies thumbnails into a mirrored folder tree
//! - `inspect` - Terminal reports over a source library

pub mod albumdata;
pub mod inspect;
pub mod library;
pub mod model;
pub mod thumbnails;
pub mod walker;

// Re-export commonly used types
pub use albumdata::{AlbumData, AssembleOptions};
pub use library::{Library, LibraryOptions};
pub use model::{Album, AlbumKind, Folder, Photo};
pub use walker::{TreeVisitor, TreeWalker};
