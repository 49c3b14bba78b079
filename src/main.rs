//! # photo-export CLI
//!
//! Command-line interface for the library exporter.
//!
//! ## Usage
//! ```bash
//! photo-export albumdata --path ~/Pictures/Photos\ Library AlbumData.xml
//! photo-export thumbnails --path ~/Pictures/Photos\ Library ./thumbs
//! ```

mod cli;

use photo_library_export::Result;

fn main() -> Result<()> {
    cli::run()
}
