//! # Model Module
//!
//! Records materialized from the source library database.
//!
//! All three record types are read once per build pass and never mutated
//! afterwards. Folders and albums get synthesized document identifiers in
//! disjoint number spaces: album document IDs are the native row ID
//! unscaled, folder document IDs are the native row ID scaled by
//! [`FOLDER_ID_SCALE`]. Photos live in their own keyspace and stay unscaled.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Multiplier applied to native folder IDs so folder document IDs never
/// collide with album document IDs. Assumes native album IDs stay below
/// this value.
pub const FOLDER_ID_SCALE: i64 = 10_000;

/// Seconds between the Unix epoch (1970-01-01) and the reference epoch the
/// source database stores timestamps against (2001-01-01), 11 323 days.
pub const REFERENCE_EPOCH_OFFSET: i64 = 11_323 * 86_400;

/// A container node holding subfolders and albums
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Folder {
    /// Native row identifier
    pub id: i64,
    /// Source-assigned stable identifier
    pub uuid: String,
    /// Display name
    pub name: String,
    /// Version UUID of the poster photo, if one is set
    pub poster_version_uuid: Option<String>,
}

impl Folder {
    /// Identifier used for this folder in the output document.
    ///
    /// Scaled so it can never collide with an album document ID.
    pub fn document_id(&self) -> i64 {
        self.id * FOLDER_ID_SCALE
    }
}

/// System-defined albums get a fixed kind; everything a user created is
/// `Regular`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlbumKind {
    #[default]
    Regular,
    AllPhotos,
    Favorites,
    LastImport,
}

impl AlbumKind {
    /// Kind tag emitted into the output document
    pub fn label(&self) -> &'static str {
        match self {
            AlbumKind::Regular => "Regular",
            AlbumKind::AllPhotos => "Photos",
            AlbumKind::Favorites => "Flagged",
            AlbumKind::LastImport => "Special",
        }
    }
}

/// A named collection referencing a set of photos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Album {
    /// Native row identifier
    pub id: i64,
    /// Source-assigned stable identifier
    pub uuid: String,
    /// Stored display name
    pub name: String,
    /// Version UUID of the poster photo, if one is set
    pub poster_version_uuid: Option<String>,
    pub kind: AlbumKind,
}

impl Album {
    /// Identifier used for this album in the output document.
    pub fn document_id(&self) -> i64 {
        self.id
    }

    /// Display name with the per-kind overrides for pseudo-albums
    pub fn display_name(&self) -> &str {
        match self.kind {
            AlbumKind::AllPhotos => "Photos",
            AlbumKind::Favorites => "Flagged",
            _ => &self.name,
        }
    }
}

/// One photo in the library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photo {
    /// Native row identifier
    pub id: i64,
    /// Source-assigned stable identifier
    pub uuid: String,
    /// Caption source; blank or absent captions get a deterministic fallback
    pub name: Option<String>,
    pub description: Option<String>,
    pub favorite: bool,
    /// Capture timestamp, seconds since the reference epoch, UTC
    pub image_date: f64,
    pub time_zone_name: Option<String>,
    /// Offset of the capture time zone from UTC, seconds
    pub time_zone_offset: i64,
    /// Last modification of the image, seconds since the reference epoch
    pub mod_date: f64,
    /// Last modification of the metadata, seconds since the reference epoch
    pub meta_mod_date: f64,
    /// Current (edited) rendition, relative to the library root
    pub path: String,
    /// Original rendition, relative to the library root
    pub original_path: String,
    /// Large thumbnail, relative to the library root
    pub thumbnail: String,
    /// Small thumbnail, relative to the library root
    pub mini_thumbnail: String,
}

impl Photo {
    /// Capture timestamp as a UTC instant
    pub fn date_utc(&self) -> Option<DateTime<Utc>> {
        let seconds = REFERENCE_EPOCH_OFFSET + self.image_date as i64;
        DateTime::from_timestamp(seconds, 0)
    }

    /// Capture timestamp in the photo's own time zone
    pub fn date_local(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.time_zone_offset as i32)?;
        Some(self.date_utc()?.with_timezone(&offset))
    }

    /// Capture interval shifted into the photo's time zone.
    ///
    /// Invariant: local interval == GMT interval + stored offset.
    pub fn local_interval(&self) -> f64 {
        self.image_date + self.time_zone_offset as f64
    }
}
