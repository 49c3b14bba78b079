//! # CLI Module
//!
//! Command-line interface for the library exporter.
//!
//! ## Usage
//! ```bash
//! # Write the library as AlbumData.xml
//! photo-export albumdata --path ~/Pictures/Photos\ Library AlbumData.xml
//!
//! # Tolerate a locked source database
//! photo-export albumdata --path ~/Pictures/Photos\ Library --tmp-db --force AlbumData.xml
//!
//! # Copy album thumbnails into a folder tree
//! photo-export thumbnails --path ~/Pictures/Photos\ Library ./thumbs
//!
//! # Look around without exporting
//! photo-export inspect --path ~/Pictures/Photos\ Library --tree
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_library_export::core::albumdata::{self, AssembleOptions};
use photo_library_export::core::inspect::{self, PhotoReport};
use photo_library_export::core::library::{Library, LibraryOptions};
use photo_library_export::core::thumbnails;
use photo_library_export::error::Result;
use std::path::PathBuf;

/// Photo Library Export - rebuild a library database as AlbumData.xml
#[derive(Parser, Debug)]
#[command(name = "photo-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the library metadata as an AlbumData.xml document
    Albumdata {
        /// Path to the photos library directory
        #[arg(short, long)]
        path: PathBuf,

        /// Path to write the XML document
        xml_path: PathBuf,

        /// Overwrite the output file if it exists
        #[arg(long)]
        force: bool,

        /// Suppress the synthetic roll list
        #[arg(long)]
        no_rolls: bool,

        /// Suppress the favorite-derived rating
        #[arg(long)]
        no_rating: bool,

        /// Synthesize captions for photos with blank names
        #[arg(long)]
        generate_captions: bool,

        /// Work on a temporary copy of the database files (for a source
        /// locked by another process)
        #[arg(long)]
        tmp_db: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Copy album thumbnails into a folder tree mirroring the library
    Thumbnails {
        /// Path to the photos library directory
        #[arg(short, long)]
        path: PathBuf,

        /// Directory to write the thumbnails into
        directory: PathBuf,

        /// Work on a temporary copy of the database files
        #[arg(long)]
        tmp_db: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print library contents without exporting anything
    Inspect {
        /// Path to the photos library directory
        #[arg(short, long)]
        path: PathBuf,

        /// List every photo in the library
        #[arg(long)]
        photos: bool,

        /// List the folder and album tree
        #[arg(long)]
        tree: bool,

        /// List the system-library folder
        #[arg(long)]
        lib_folder: bool,

        /// List photos of one album by UUID
        #[arg(long)]
        album: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Work on a temporary copy of the database files
        #[arg(long)]
        tmp_db: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Albumdata {
            path,
            xml_path,
            force,
            no_rolls,
            no_rating,
            generate_captions,
            tmp_db,
            verbose,
        } => {
            photo_library_export::init_tracing(verbose);
            let options = AssembleOptions {
                include_rolls: !no_rolls,
                include_rating: !no_rating,
                generate_captions,
            };
            run_albumdata(path, xml_path, force, options, tmp_db)
        }
        Commands::Thumbnails {
            path,
            directory,
            tmp_db,
            verbose,
        } => {
            photo_library_export::init_tracing(verbose);
            run_thumbnails(path, directory, tmp_db)
        }
        Commands::Inspect {
            path,
            photos,
            tree,
            lib_folder,
            album,
            output,
            tmp_db,
            verbose,
        } => {
            photo_library_export::init_tracing(verbose);
            run_inspect(path, photos, tree, lib_folder, album, output, tmp_db)
        }
    }
}

fn open_library(path: &PathBuf, tmp_db: bool) -> Result<Library> {
    let options = LibraryOptions {
        copy_to_temp: tmp_db,
    };
    Ok(Library::open_with_options(path, options)?)
}

fn run_albumdata(
    path: PathBuf,
    xml_path: PathBuf,
    force: bool,
    options: AssembleOptions,
    tmp_db: bool,
) -> Result<()> {
    let term = Term::stderr();
    let library = open_library(&path, tmp_db)?;
    let photos = library.photo_map()?;

    let document = albumdata::assemble(&library, &photos, &options)?;
    albumdata::write_xml(&document, &xml_path, force)?;

    term.write_line(&format!(
        "{} Wrote {} ({} collections, {} photos)",
        style("✓").green().bold(),
        xml_path.display(),
        style(document.albums.len()).cyan(),
        style(document.images.len()).cyan(),
    ))
    .ok();
    Ok(())
}

fn run_thumbnails(path: PathBuf, directory: PathBuf, tmp_db: bool) -> Result<()> {
    let term = Term::stderr();
    let library = open_library(&path, tmp_db)?;
    let photos = library.photo_map()?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {pos} copied {msg}")
            .unwrap(),
    );

    let copied = thumbnails::export(&library, &photos, &directory, |count, caption| {
        progress.set_position(count as u64);
        progress.set_message(caption.to_string());
    })?;
    progress.finish_and_clear();

    term.write_line(&format!(
        "{} Copied {} thumbnails to {}",
        style("✓").green().bold(),
        style(copied).cyan(),
        directory.display(),
    ))
    .ok();
    Ok(())
}

fn run_inspect(
    path: PathBuf,
    photos: bool,
    tree: bool,
    lib_folder: bool,
    album: Option<String>,
    output: OutputFormat,
    tmp_db: bool,
) -> Result<()> {
    let term = Term::stdout();
    let library = open_library(&path, tmp_db)?;

    if photos {
        let map = library.photo_map()?;
        let reports = inspect::photo_reports(&map);
        print_photo_reports(&term, &reports, output);
    }

    if tree {
        let listing = inspect::tree(&library, library.top_folder(), None)?;
        match output {
            OutputFormat::Pretty => {
                term.write_line(&format!("{}", style("Tree:").bold())).ok();
                for child in &listing.children {
                    term.write_str(&inspect::render_tree(child, 1)).ok();
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&listing).unwrap());
            }
        }
    }

    if lib_folder {
        let listing = inspect::tree(&library, library.library_folder(), Some(1))?;
        match output {
            OutputFormat::Pretty => {
                for child in &listing.children {
                    term.write_str(&inspect::render_tree(child, 0)).ok();
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&listing).unwrap());
            }
        }
    }

    if let Some(uuid) = album {
        let album = library.album(&uuid)?;
        let map = library.photo_map()?;
        let reports: Vec<PhotoReport> = library
            .photo_ids(&album)?
            .iter()
            .filter_map(|id| map.get(id))
            .map(PhotoReport::from_photo)
            .collect();
        print_photo_reports(&term, &reports, output);
    }

    Ok(())
}

fn print_photo_reports(term: &Term, reports: &[PhotoReport], output: OutputFormat) {
    match output {
        OutputFormat::Pretty => {
            for report in reports {
                term.write_str(&report.render()).ok();
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(reports).unwrap());
        }
    }
}
