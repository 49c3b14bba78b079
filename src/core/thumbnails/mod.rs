//! # Thumbnails Module
//!
//! Copies each album's thumbnails into a directory tree mirroring the
//! folder/album hierarchy.
//!
//! Every non-root folder and every album becomes a directory named after
//! it, nested under its parent's directory; the root maps to the
//! destination base. Directory creation is idempotent. A missing copy
//! source is fatal for the run.

use crate::core::library::Library;
use crate::core::model::{Album, Folder, Photo};
use crate::core::walker::{TreeVisitor, TreeWalker};
use crate::error::{OutputError, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Export every album's thumbnails under `destination`.
///
/// `on_progress` is called after each copied file with the running count
/// and the photo's caption. Returns the number of files copied.
pub fn export<F: FnMut(usize, &str)>(
    library: &Library,
    photos: &BTreeMap<i64, Photo>,
    destination: &Path,
    on_progress: F,
) -> Result<usize> {
    let mut exporter = ThumbnailExporter {
        source_root: library.source_path(),
        destination,
        photos,
        folder_dirs: HashMap::new(),
        copied: 0,
        on_progress,
    };
    TreeWalker::new(library).walk(&mut exporter)?;
    Ok(exporter.copied)
}

/// Visitor creating directories pre-order and copying album members
struct ThumbnailExporter<'a, F: FnMut(usize, &str)> {
    source_root: &'a Path,
    destination: &'a Path,
    photos: &'a BTreeMap<i64, Photo>,
    /// Destination directory per visited folder UUID
    folder_dirs: HashMap<String, PathBuf>,
    copied: usize,
    on_progress: F,
}

impl<F: FnMut(usize, &str)> ThumbnailExporter<'_, F> {
    fn parent_dir(&self, parent: Option<&Folder>) -> &Path {
        parent
            .and_then(|p| self.folder_dirs.get(&p.uuid))
            .map(PathBuf::as_path)
            .unwrap_or(self.destination)
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        debug!("Creating directory {}", path.display());
        fs::create_dir_all(path).map_err(|e| OutputError::CreateDirectory {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// The larger thumbnail if present on disk, else the smaller, else the
    /// original file.
    fn best_thumbnail<'p>(&self, photo: &'p Photo) -> &'p str {
        for candidate in [&photo.thumbnail, &photo.mini_thumbnail] {
            if !candidate.is_empty() && self.source_root.join(candidate).exists() {
                return candidate;
            }
        }
        &photo.original_path
    }

    fn copy_photo(&mut self, photo: &Photo, directory: &Path) -> Result<()> {
        let caption = match photo.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Photo_{}", photo.id),
        };
        let relative = self.best_thumbnail(photo);
        let source = self.source_root.join(relative);
        let destination = directory.join(format!("{caption}{}", extension_of(relative)));
        debug!("Copying {} to {}", source.display(), destination.display());
        fs::copy(&source, &destination).map_err(|e| OutputError::Copy {
            from: source,
            to: destination,
            source: e,
        })?;
        self.copied += 1;
        (self.on_progress)(self.copied, &caption);
        Ok(())
    }
}

impl<F: FnMut(usize, &str)> TreeVisitor for ThumbnailExporter<'_, F> {
    fn enter_folder(&mut self, folder: &Folder, parent: Option<&Folder>) -> Result<()> {
        let dir = self.parent_dir(parent).join(&folder.name);
        self.create_dir(&dir)?;
        self.folder_dirs.insert(folder.uuid.clone(), dir);
        Ok(())
    }

    fn leave_folder(
        &mut self,
        _folder: &Folder,
        _parent: Option<&Folder>,
        _photos: &BTreeSet<i64>,
    ) -> Result<()> {
        Ok(())
    }

    fn visit_album(
        &mut self,
        album: &Album,
        parent: Option<&Folder>,
        photos: &BTreeSet<i64>,
    ) -> Result<()> {
        let dir = self.parent_dir(parent).join(album.display_name());
        self.create_dir(&dir)?;

        let mut members: Vec<&Photo> = photos
            .iter()
            .filter_map(|id| match self.photos.get(id) {
                Some(photo) => Some(photo),
                None => {
                    warn!("Album member {id} is not in the photo list");
                    None
                }
            })
            .collect();
        members.sort_by(|a, b| a.image_date.total_cmp(&b.image_date));

        for photo in members {
            self.copy_photo(photo, &dir)?;
        }
        Ok(())
    }
}

/// Extension of the final path segment, with the dot, or ""
fn extension_of(path: &str) -> &str {
    let base = path.rsplit('/').next().unwrap_or(path);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => &base[stem.len()..],
        _ => "",
    }
}
