//! # AlbumData Module
//!
//! Assembles the library into the hierarchical output document.
//!
//! The builder is a [`TreeVisitor`]: folder nodes are emitted post-order
//! (children precede their parent in the list), album nodes as they are
//! encountered. The two pseudo-album nodes are seeded before the walk so
//! they occupy positions 0 and 1 regardless of source ordering. The
//! document is assembled fully in memory; nothing touches the output path
//! until [`write_xml`].

mod types;

pub use types::{AlbumData, AlbumNode, ImageRecord, RollRecord};

use crate::core::library::Library;
use crate::core::model::{Album, Folder, Photo};
use crate::core::walker::{TreeVisitor, TreeWalker};
use crate::error::{OutputError, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

const APPLICATION_VERSION: &str = "9.4";
const ARCHIVE_ID: &str = "1";
const MAJOR_VERSION: i64 = 2;
const MINOR_VERSION: i64 = 0;

/// Kind tag for folder nodes
const FOLDER_KIND: &str = "Folder";
/// Rating given to favorite photos when rating output is enabled
const FAVORITE_RATING: i64 = 5;
/// Fixed priority making the favorites album sort first
const FAVORITES_SORT_ORDER: i64 = 1;
/// Identifier of the single synthetic roll
const ROLL_ID: i64 = 1;
const ROLL_NAME: &str = "Library";

/// Caller-supplied assembly options
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Emit the synthetic roll list and per-photo roll references
    pub include_rolls: bool,
    /// Derive a rating from the favorite flag
    pub include_rating: bool,
    /// Synthesize `photo_<id>` captions for blank names
    pub generate_captions: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            include_rolls: true,
            include_rating: true,
            generate_captions: false,
        }
    }
}

/// Build the complete output document for a library
pub fn assemble(
    library: &Library,
    photos: &BTreeMap<i64, Photo>,
    options: &AssembleOptions,
) -> Result<AlbumData> {
    info!("Assembling document for {}", library.source_path().display());
    let mut builder = AlbumDataBuilder::new(library, photos, options.clone())?;
    TreeWalker::new(library).walk(&mut builder)?;
    Ok(builder.finish())
}

/// Write the assembled document as XML, refusing to overwrite an existing
/// file unless forced.
pub fn write_xml(document: &AlbumData, path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(OutputError::AlreadyExists {
            path: path.to_path_buf(),
        }
        .into());
    }
    let file = File::create(path).map_err(|e| OutputError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    plist::to_writer_xml(BufWriter::new(file), document).map_err(OutputError::Plist)?;
    info!("Wrote document to {}", path.display());
    Ok(())
}

/// Visitor accumulating document nodes during the walk
pub struct AlbumDataBuilder<'a> {
    photos: &'a BTreeMap<i64, Photo>,
    photo_ids_by_uuid: HashMap<&'a str, i64>,
    options: AssembleOptions,
    archive_path: String,
    nodes: Vec<AlbumNode>,
}

impl<'a> AlbumDataBuilder<'a> {
    /// Seed the builder with the all-photos and favorites pseudo-albums at
    /// positions 0 and 1.
    pub fn new(
        library: &Library,
        photos: &'a BTreeMap<i64, Photo>,
        options: AssembleOptions,
    ) -> Result<Self> {
        let photo_ids_by_uuid = photos
            .values()
            .map(|p| (p.uuid.as_str(), p.id))
            .collect();
        let mut builder = Self {
            photos,
            photo_ids_by_uuid,
            options,
            archive_path: library.source_path().display().to_string(),
            nodes: Vec::new(),
        };

        let all_photos = library.all_photos();
        let members: BTreeSet<i64> = library.photo_ids(all_photos)?.into_iter().collect();
        let node = builder.album_node(all_photos, None, &members, None);
        builder.nodes.push(node);

        let favorites = library.favorites();
        let members: BTreeSet<i64> = library.photo_ids(favorites)?.into_iter().collect();
        let node = builder.album_node(favorites, None, &members, Some(FAVORITES_SORT_ORDER));
        builder.nodes.push(node);

        Ok(builder)
    }

    /// Finish the document from the accumulated nodes and the photo map
    pub fn finish(self) -> AlbumData {
        let images: BTreeMap<String, ImageRecord> = self
            .photos
            .iter()
            .map(|(id, photo)| (id.to_string(), self.image_record(photo)))
            .collect();

        let rolls = (self.options.include_rolls && !self.photos.is_empty())
            .then(|| vec![self.synthetic_roll()]);

        AlbumData {
            application_version: APPLICATION_VERSION.to_string(),
            archive_id: ARCHIVE_ID.to_string(),
            major_version: MAJOR_VERSION,
            minor_version: MINOR_VERSION,
            archive_path: self.archive_path,
            albums: self.nodes,
            images,
            rolls,
        }
    }

    fn album_node(
        &self,
        album: &Album,
        parent: Option<&Folder>,
        photos: &BTreeSet<i64>,
        sort_order: Option<i64>,
    ) -> AlbumNode {
        let (key_list, photo_count) = membership_fields(photos);
        AlbumNode {
            album_id: album.document_id(),
            name: album.display_name().to_string(),
            kind: album.kind.label().to_string(),
            guid: album.uuid.clone(),
            parent: parent.map(Folder::document_id),
            key_photo: self.poster_key(album.poster_version_uuid.as_deref()),
            sort_order,
            key_list,
            photo_count,
        }
    }

    fn folder_node(
        &self,
        folder: &Folder,
        parent: Option<&Folder>,
        photos: &BTreeSet<i64>,
    ) -> AlbumNode {
        let (key_list, photo_count) = membership_fields(photos);
        AlbumNode {
            album_id: folder.document_id(),
            name: folder.name.clone(),
            kind: FOLDER_KIND.to_string(),
            guid: folder.uuid.clone(),
            parent: parent.map(Folder::document_id),
            key_photo: self.poster_key(folder.poster_version_uuid.as_deref()),
            sort_order: None,
            key_list,
            photo_count,
        }
    }

    fn image_record(&self, photo: &Photo) -> ImageRecord {
        let caption = match photo.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ if self.options.generate_captions => format!("photo_{}", photo.id),
            _ => String::new(),
        };
        // Downstream expects a non-empty comment string.
        let comment = match photo.description.as_deref() {
            Some(description) if !description.is_empty() => description.to_string(),
            _ => " ".to_string(),
        };
        let rating = if photo.favorite && self.options.include_rating {
            FAVORITE_RATING
        } else {
            0
        };
        ImageRecord {
            media_type: "Image".to_string(),
            caption,
            comment,
            guid: photo.uuid.clone(),
            roll: self.options.include_rolls.then_some(ROLL_ID),
            rating,
            flagged: photo.favorite.then_some(true),
            date: photo.local_interval(),
            date_gmt: photo.image_date,
            mod_date: photo.mod_date,
            meta_mod_date: photo.meta_mod_date,
            image_path: photo.path.clone(),
            original_path: photo.original_path.clone(),
            thumb_path: photo.thumbnail.clone(),
            mini_thumb_path: photo.mini_thumbnail.clone(),
        }
    }

    fn synthetic_roll(&self) -> RollRecord {
        let earliest = self
            .photos
            .values()
            .map(Photo::local_interval)
            .fold(f64::INFINITY, f64::min);
        // BTreeMap iteration order makes the first key the lowest photo ID.
        let key_photo = self.photos.keys().next().copied().unwrap_or_default();
        RollRecord {
            roll_id: ROLL_ID,
            name: ROLL_NAME.to_string(),
            key_photo_key: key_photo.to_string(),
            date: earliest,
            photo_count: self.photos.len() as i64,
            key_list: self.photos.keys().map(i64::to_string).collect(),
        }
    }

    fn poster_key(&self, poster_version_uuid: Option<&str>) -> Option<String> {
        let uuid = poster_version_uuid?;
        match self.photo_ids_by_uuid.get(uuid) {
            Some(id) => Some(id.to_string()),
            None => {
                debug!("Poster version {uuid} is not in the photo list");
                None
            }
        }
    }
}

impl TreeVisitor for AlbumDataBuilder<'_> {
    fn enter_folder(&mut self, _folder: &Folder, _parent: Option<&Folder>) -> Result<()> {
        Ok(())
    }

    fn leave_folder(
        &mut self,
        folder: &Folder,
        parent: Option<&Folder>,
        photos: &BTreeSet<i64>,
    ) -> Result<()> {
        let node = self.folder_node(folder, parent, photos);
        self.nodes.push(node);
        Ok(())
    }

    fn visit_album(
        &mut self,
        album: &Album,
        parent: Option<&Folder>,
        photos: &BTreeSet<i64>,
    ) -> Result<()> {
        let node = self.album_node(album, parent, photos, None);
        self.nodes.push(node);
        Ok(())
    }
}

/// Sorted, stringified membership plus count; both absent for an empty set
fn membership_fields(photos: &BTreeSet<i64>) -> (Option<Vec<String>>, Option<i64>) {
    if photos.is_empty() {
        (None, None)
    } else {
        (
            Some(photos.iter().map(i64::to_string).collect()),
            Some(photos.len() as i64),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::AlbumKind;

    fn photo(id: i64, name: Option<&str>, favorite: bool) -> Photo {
        Photo {
            id,
            uuid: format!("photo-{id}"),
            name: name.map(String::from),
            description: None,
            favorite,
            image_date: 1000.0,
            time_zone_name: None,
            time_zone_offset: 0,
            mod_date: 0.0,
            meta_mod_date: 0.0,
            path: format!("Masters/IMG_{id}.jpg"),
            original_path: format!("Masters/IMG_{id}.jpg"),
            thumbnail: String::new(),
            mini_thumbnail: String::new(),
        }
    }

    fn builder<'a>(
        photos: &'a BTreeMap<i64, Photo>,
        options: AssembleOptions,
    ) -> AlbumDataBuilder<'a> {
        AlbumDataBuilder {
            photos,
            photo_ids_by_uuid: photos.values().map(|p| (p.uuid.as_str(), p.id)).collect(),
            options,
            archive_path: "/photos".to_string(),
            nodes: Vec::new(),
        }
    }

    #[test]
    fn blank_caption_is_generated_from_the_photo_id() {
        let photos = BTreeMap::from([(42, photo(42, Some(""), false))]);
        let options = AssembleOptions {
            generate_captions: true,
            ..AssembleOptions::default()
        };
        let record = builder(&photos, options).image_record(&photos[&42]);
        assert_eq!(record.caption, "photo_42");
    }

    #[test]
    fn blank_caption_stays_empty_without_generation() {
        let photos = BTreeMap::from([(42, photo(42, None, false))]);
        let record = builder(&photos, AssembleOptions::default()).image_record(&photos[&42]);
        assert_eq!(record.caption, "");
    }

    #[test]
    fn comment_is_never_empty() {
        let photos = BTreeMap::from([(1, photo(1, Some("x"), false))]);
        let record = builder(&photos, AssembleOptions::default()).image_record(&photos[&1]);
        assert_eq!(record.comment, " ");
    }

    #[test]
    fn favorite_rating_respects_the_disable_flag() {
        let photos = BTreeMap::from([(1, photo(1, Some("x"), true))]);

        let record = builder(&photos, AssembleOptions::default()).image_record(&photos[&1]);
        assert_eq!(record.rating, FAVORITE_RATING);
        assert_eq!(record.flagged, Some(true));

        let options = AssembleOptions {
            include_rating: false,
            ..AssembleOptions::default()
        };
        let record = builder(&photos, options).image_record(&photos[&1]);
        assert_eq!(record.rating, 0);
        assert_eq!(record.flagged, Some(true));
    }

    #[test]
    fn non_favorite_has_no_flagged_field() {
        let photos = BTreeMap::from([(1, photo(1, Some("x"), false))]);
        let record = builder(&photos, AssembleOptions::default()).image_record(&photos[&1]);
        assert_eq!(record.rating, 0);
        assert_eq!(record.flagged, None);
    }

    #[test]
    fn synthetic_roll_covers_all_photos() {
        let mut photos = BTreeMap::new();
        for id in [5, 2, 9] {
            let mut p = photo(id, Some("x"), false);
            p.image_date = (id * 100) as f64;
            photos.insert(id, p);
        }
        let roll = builder(&photos, AssembleOptions::default()).synthetic_roll();
        assert_eq!(roll.roll_id, ROLL_ID);
        assert_eq!(roll.key_photo_key, "2");
        assert_eq!(roll.date, 200.0);
        assert_eq!(roll.photo_count, 3);
        assert_eq!(roll.key_list, vec!["2", "5", "9"]);
    }

    #[test]
    fn empty_membership_omits_key_fields() {
        let photos = BTreeMap::new();
        let b = builder(&photos, AssembleOptions::default());
        let album = Album {
            id: 3,
            uuid: "album-3".into(),
            name: "Empty".into(),
            poster_version_uuid: None,
            kind: AlbumKind::Regular,
        };
        let node = b.album_node(&album, None, &BTreeSet::new(), None);
        assert_eq!(node.key_list, None);
        assert_eq!(node.photo_count, None);
        assert_eq!(node.parent, None);
    }
}
