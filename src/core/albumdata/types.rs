//! Document types for the output property list.
//!
//! Field order and key spelling match the document shape the downstream
//! application parses; renames are load-bearing, not cosmetic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The assembled output document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlbumData {
    #[serde(rename = "Application Version")]
    pub application_version: String,
    #[serde(rename = "ArchiveId")]
    pub archive_id: String,
    #[serde(rename = "Major Version")]
    pub major_version: i64,
    #[serde(rename = "Minor Version")]
    pub minor_version: i64,
    /// Absolute path of the source library
    #[serde(rename = "Archive Path")]
    pub archive_path: String,
    /// Folder and album nodes; the all-photos and favorites pseudo-albums
    /// always come first, in that order
    #[serde(rename = "List of Albums")]
    pub albums: Vec<AlbumNode>,
    /// Image records keyed by stringified photo ID
    #[serde(rename = "Master Image List")]
    pub images: BTreeMap<String, ImageRecord>,
    #[serde(rename = "List of Rolls", skip_serializing_if = "Option::is_none")]
    pub rolls: Option<Vec<RollRecord>>,
}

/// One folder or album in the output document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlbumNode {
    #[serde(rename = "AlbumId")]
    pub album_id: i64,
    #[serde(rename = "AlbumName")]
    pub name: String,
    #[serde(rename = "Album Type")]
    pub kind: String,
    #[serde(rename = "GUID")]
    pub guid: String,
    /// Document ID of the containing folder; omitted when the parent is
    /// the root
    #[serde(rename = "Parent", skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
    /// Image-list key of the poster photo
    #[serde(rename = "KeyPhotoKey", skip_serializing_if = "Option::is_none")]
    pub key_photo: Option<String>,
    /// Only the favorites pseudo-album carries this; it sorts first among
    /// top-level collections
    #[serde(rename = "Sort Order", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    /// Sorted member photo IDs; omitted together with the count when the
    /// membership is empty
    #[serde(rename = "KeyList", skip_serializing_if = "Option::is_none")]
    pub key_list: Option<Vec<String>>,
    #[serde(rename = "PhotoCount", skip_serializing_if = "Option::is_none")]
    pub photo_count: Option<i64>,
}

/// One photo in the image list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    #[serde(rename = "MediaType")]
    pub media_type: String,
    #[serde(rename = "Caption")]
    pub caption: String,
    /// Never empty; a blank description becomes a single space
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "GUID")]
    pub guid: String,
    #[serde(rename = "Roll", skip_serializing_if = "Option::is_none")]
    pub roll: Option<i64>,
    #[serde(rename = "Rating")]
    pub rating: i64,
    /// Present only for favorite photos
    #[serde(rename = "Flagged", skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
    /// Capture interval in the photo's own time zone
    #[serde(rename = "DateAsTimerInterval")]
    pub date: f64,
    #[serde(rename = "DateAsTimerIntervalGMT")]
    pub date_gmt: f64,
    #[serde(rename = "ModDateAsTimerInterval")]
    pub mod_date: f64,
    #[serde(rename = "MetaModDateAsTimerInterval")]
    pub meta_mod_date: f64,
    #[serde(rename = "ImagePath")]
    pub image_path: String,
    #[serde(rename = "OriginalPath")]
    pub original_path: String,
    #[serde(rename = "ThumbPath")]
    pub thumb_path: String,
    #[serde(rename = "MiniThumbPath")]
    pub mini_thumb_path: String,
}

/// The single synthetic import roll covering every photo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RollRecord {
    #[serde(rename = "RollID")]
    pub roll_id: i64,
    #[serde(rename = "RollName")]
    pub name: String,
    /// Image-list key of the designated key photo (the lowest photo ID)
    #[serde(rename = "KeyPhotoKey")]
    pub key_photo_key: String,
    /// Earliest capture interval across all photos
    #[serde(rename = "RollDateAsTimerInterval")]
    pub date: f64,
    #[serde(rename = "PhotoCount")]
    pub photo_count: i64,
    #[serde(rename = "KeyList")]
    pub key_list: Vec<String>,
}
