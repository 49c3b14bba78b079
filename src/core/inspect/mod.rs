//! # Inspect Module
//!
//! Read-only reports over a source library, for debugging a library
//! without producing an export. Reports serialize to JSON as-is; the text
//! renderings are separate so the CLI can style them.

use crate::core::library::Library;
use crate::core::model::{Folder, Photo};
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Everything known about one photo
#[derive(Debug, Clone, Serialize)]
pub struct PhotoReport {
    pub id: i64,
    pub uuid: String,
    pub caption: Option<String>,
    pub description: Option<String>,
    pub favorite: bool,
    pub path: String,
    pub original_path: String,
    pub thumbnail: String,
    pub mini_thumbnail: String,
    /// Capture time in the photo's own time zone, RFC 3339
    pub date: Option<String>,
    pub time_zone: Option<String>,
    pub time_zone_offset: i64,
    pub image_interval: f64,
    pub image_interval_gmt: f64,
    pub mod_interval: f64,
    pub meta_mod_interval: f64,
}

impl PhotoReport {
    pub fn from_photo(photo: &Photo) -> Self {
        Self {
            id: photo.id,
            uuid: photo.uuid.clone(),
            caption: photo.name.clone(),
            description: photo.description.clone(),
            favorite: photo.favorite,
            path: photo.path.clone(),
            original_path: photo.original_path.clone(),
            thumbnail: photo.thumbnail.clone(),
            mini_thumbnail: photo.mini_thumbnail.clone(),
            date: photo.date_local().map(|d| d.to_rfc3339()),
            time_zone: photo.time_zone_name.clone(),
            time_zone_offset: photo.time_zone_offset,
            image_interval: photo.local_interval(),
            image_interval_gmt: photo.image_date,
            mod_interval: photo.mod_date,
            meta_mod_interval: photo.meta_mod_date,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let caption = self.caption.as_deref().unwrap_or("");
        let _ = writeln!(out, "Photo: {caption}");
        let _ = writeln!(out, "\tdescription: {}", self.description.as_deref().unwrap_or(""));
        let _ = writeln!(out, "\tis favorite: {}", self.favorite);
        let _ = writeln!(out, "\tpath: {}", self.path);
        let _ = writeln!(out, "\toriginal: {}", self.original_path);
        let _ = writeln!(out, "\tthumbnails:");
        let _ = writeln!(out, "\t\thd: {}", self.thumbnail);
        let _ = writeln!(out, "\t\tmini: {}", self.mini_thumbnail);
        let _ = writeln!(out, "\tdate: {}", self.date.as_deref().unwrap_or("-"));
        let _ = writeln!(out, "\tid: {} uuid: {}", self.id, self.uuid);
        let _ = writeln!(
            out,
            "\ttime zone offset: {}\tname: {}",
            self.time_zone_offset,
            self.time_zone.as_deref().unwrap_or("-")
        );
        let _ = writeln!(out, "\timage: {}", self.image_interval);
        let _ = writeln!(out, "\timage gmt: {}", self.image_interval_gmt);
        let _ = writeln!(out, "\tchange: {}", self.mod_interval);
        let _ = writeln!(out, "\tchange metadata: {}", self.meta_mod_interval);
        out
    }
}

/// Reports for every photo in the library, in ID order
pub fn photo_reports(photos: &BTreeMap<i64, Photo>) -> Vec<PhotoReport> {
    photos.values().map(PhotoReport::from_photo).collect()
}

/// One folder or album in a tree listing
#[derive(Debug, Clone, Serialize)]
pub struct TreeEntry {
    pub kind: EntryKind,
    pub uuid: String,
    pub name: String,
    pub children: Vec<TreeEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Folder,
    Album,
}

/// List a folder's contents recursively, to `depth` levels (`None` =
/// unlimited).
pub fn tree(library: &Library, folder: &Folder, depth: Option<usize>) -> Result<TreeEntry> {
    let mut children = Vec::new();
    let recurse = depth.map_or(true, |d| d > 1);
    let next_depth = depth.map(|d| d.saturating_sub(1));

    for subfolder in library.subfolders(folder)? {
        if recurse {
            children.push(tree(library, &subfolder, next_depth)?);
        } else {
            children.push(TreeEntry {
                kind: EntryKind::Folder,
                uuid: subfolder.uuid,
                name: subfolder.name,
                children: Vec::new(),
            });
        }
    }
    for album in library.albums(folder)? {
        children.push(TreeEntry {
            kind: EntryKind::Album,
            uuid: album.uuid.clone(),
            name: album.display_name().to_string(),
            children: Vec::new(),
        });
    }

    Ok(TreeEntry {
        kind: EntryKind::Folder,
        uuid: folder.uuid.clone(),
        name: folder.name.clone(),
        children,
    })
}

/// Indented text rendering of a tree listing
pub fn render_tree(entry: &TreeEntry, indent: usize) -> String {
    let mut out = String::new();
    let pad = "\t".repeat(indent);
    let kind = match entry.kind {
        EntryKind::Folder => "folder",
        EntryKind::Album => "album",
    };
    let _ = writeln!(out, "{pad}{kind} '{}': uuid={}", entry.name, entry.uuid);
    for child in &entry.children {
        out.push_str(&render_tree(child, indent + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_report_renders_every_field() {
        let photo = Photo {
            id: 7,
            uuid: "photo-7".into(),
            name: Some("Beach".into()),
            description: None,
            favorite: true,
            image_date: 1000.0,
            time_zone_name: Some("Europe/Rome".into()),
            time_zone_offset: 3600,
            mod_date: 2000.0,
            meta_mod_date: 3000.0,
            path: "Masters/IMG_7.jpg".into(),
            original_path: "Masters/IMG_7.jpg".into(),
            thumbnail: "Thumbnails/v/thumb_IMG_7_1024.jpg".into(),
            mini_thumbnail: "Thumbnails/v/thumb_IMG_7.jpg".into(),
        };
        let rendered = PhotoReport::from_photo(&photo).render();
        assert!(rendered.contains("Photo: Beach"));
        assert!(rendered.contains("is favorite: true"));
        assert!(rendered.contains("Europe/Rome"));
        assert!(rendered.contains("id: 7 uuid: photo-7"));
    }
}
