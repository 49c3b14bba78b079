//! # Library Module
//!
//! Read-only repository over the two source database files.
//!
//! Opening a [`Library`] resolves the well-known rows every export depends
//! on (the two root folders and the three pseudo-albums); a missing one
//! means the source is not a recognizable library and the open fails.
//!
//! ## Locked sources
//! The owning application may hold a lock on the database files. A busy or
//! locked database surfaces as [`LibraryError::Locked`]; callers can opt
//! into `copy_to_temp`, which duplicates both files into a temporary
//! directory first. The copy is removed when the `Library` is dropped,
//! on every exit path.

mod resources;

use crate::core::model::{Album, AlbumKind, Folder, Photo};
use crate::error::LibraryError;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

pub use resources::UNADJUSTED;

/// Main metadata database file name
pub const LIBRARY_DB: &str = "Library.apdb";
/// Image-resource index database file name
pub const IMAGE_PROXIES_DB: &str = "ImageProxies.apdb";

/// UUID of the root folder user folders and albums hang off
pub const TOP_LEVEL_FOLDER: &str = "TopLevelAlbums";
/// UUID of the system-library folder holding the pseudo-albums
pub const LIBRARY_FOLDER: &str = "LibraryFolder";
/// UUID of the pseudo-album containing every photo
pub const ALL_PHOTOS_ALBUM: &str = "allPhotosAlbum";
/// UUID of the favorites pseudo-album
pub const FAVORITES_ALBUM: &str = "favoritesAlbum";
/// UUID of the last-import pseudo-album
pub const LAST_IMPORT_ALBUM: &str = "lastImportAlbum";

/// RKVersion.type value for still images; videos are excluded from export
const IMAGE_VERSION_TYPE: i64 = 2;

/// Options controlling how the source databases are opened
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryOptions {
    /// Work on a temporary copy of the database files instead of the
    /// originals, tolerating a source locked by another process
    pub copy_to_temp: bool,
}

/// Read-only repository over a photo library's metadata
pub struct Library {
    source_path: PathBuf,
    library_db: Connection,
    image_proxies_db: Connection,
    top_folder: Folder,
    library_folder: Folder,
    all_photos: Album,
    favorites: Album,
    last_import: Album,
    // Declared last so the connections close before the copy is removed
    _temp_copy: Option<TempDir>,
}

impl Library {
    /// Open the library under `path` (which contains a `database/`
    /// directory with the two database files).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        Self::open_with_options(path, LibraryOptions::default())
    }

    /// Open the library with explicit options
    pub fn open_with_options(
        path: impl AsRef<Path>,
        options: LibraryOptions,
    ) -> Result<Self, LibraryError> {
        let source_path = std::path::absolute(path.as_ref())
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let db_dir = source_path.join("database");

        let (db_dir, temp_copy) = if options.copy_to_temp {
            let temp = tempfile::tempdir().map_err(|e| LibraryError::TempCopy {
                path: db_dir.clone(),
                source: e,
            })?;
            for name in [LIBRARY_DB, IMAGE_PROXIES_DB] {
                let from = db_dir.join(name);
                fs::copy(&from, temp.path().join(name)).map_err(|e| LibraryError::TempCopy {
                    path: from.clone(),
                    source: e,
                })?;
            }
            debug!("Copied source databases to {}", temp.path().display());
            (temp.path().to_path_buf(), Some(temp))
        } else {
            (db_dir, None)
        };

        let library_db = open_database(&db_dir.join(LIBRARY_DB))?;
        let image_proxies_db = open_database(&db_dir.join(IMAGE_PROXIES_DB))?;

        // Well-known rows; absence means an unrecognized or corrupt source.
        let top_folder = folder_by_uuid(&library_db, TOP_LEVEL_FOLDER)?;
        let library_folder = folder_by_uuid(&library_db, LIBRARY_FOLDER)?;
        let all_photos = album_by_uuid(&library_db, ALL_PHOTOS_ALBUM)?;
        let favorites = album_by_uuid(&library_db, FAVORITES_ALBUM)?;
        let last_import = album_by_uuid(&library_db, LAST_IMPORT_ALBUM)?;

        info!("Opened library at {}", source_path.display());
        Ok(Self {
            source_path,
            library_db,
            image_proxies_db,
            top_folder,
            library_folder,
            all_photos,
            favorites,
            last_import,
            _temp_copy: temp_copy,
        })
    }

    /// Absolute path of the library directory
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Root folder of the user folder/album tree
    pub fn top_folder(&self) -> &Folder {
        &self.top_folder
    }

    /// System-library folder holding the pseudo-albums
    pub fn library_folder(&self) -> &Folder {
        &self.library_folder
    }

    /// Pseudo-album containing every photo
    pub fn all_photos(&self) -> &Album {
        &self.all_photos
    }

    /// Favorites pseudo-album
    pub fn favorites(&self) -> &Album {
        &self.favorites
    }

    /// Last-import pseudo-album. Resolved to validate the source, not
    /// emitted into the output document.
    pub fn last_import(&self) -> &Album {
        &self.last_import
    }

    /// Point lookup of a folder by its source UUID
    pub fn folder(&self, uuid: &str) -> Result<Folder, LibraryError> {
        folder_by_uuid(&self.library_db, uuid)
    }

    /// Point lookup of an album by its source UUID
    pub fn album(&self, uuid: &str) -> Result<Album, LibraryError> {
        album_by_uuid(&self.library_db, uuid)
    }

    /// Direct, non-trashed children of a folder, in source row order
    pub fn subfolders(&self, folder: &Folder) -> Result<Vec<Folder>, LibraryError> {
        debug!("Fetching subfolders of {}", folder.name);
        let mut stmt = self.library_db.prepare(
            "SELECT modelId, uuid, name, posterVersionUuid FROM RKFolder
             WHERE parentFolderUuid = ? AND isInTrash = 0
             ORDER BY modelId",
        )?;
        let rows = stmt.query_map([&folder.uuid], map_folder)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Albums directly attached to a folder, in source row order.
    ///
    /// Excludes trashed albums, unnamed albums and the implicit albums that
    /// mirror folders (those would double-count the folder itself).
    pub fn albums(&self, folder: &Folder) -> Result<Vec<Album>, LibraryError> {
        debug!("Fetching albums of {}", folder.name);
        let mut stmt = self.library_db.prepare(
            "SELECT a.modelId, a.uuid, a.name, a.posterVersionUuid
             FROM RKAlbum AS a
             WHERE a.folderUuid = ? AND a.isInTrash = 0 AND a.name IS NOT NULL
               AND a.uuid NOT IN (SELECT implicitAlbumUuid FROM RKFolder
                                  WHERE implicitAlbumUuid IS NOT NULL)
             ORDER BY a.modelId",
        )?;
        let rows = stmt.query_map([&folder.uuid], map_album)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// All non-trashed still photos with their resolved artifact paths
    pub fn photos(&self) -> Result<Vec<Photo>, LibraryError> {
        info!("Fetching photos");
        let mut stmt = self.library_db.prepare(
            "SELECT v.modelId, v.uuid, v.name, v.extendedDescription,
                    v.imageDate, v.imageTimeZoneName, v.imageTimeZoneOffsetSeconds,
                    v.exportImageChangeDate, v.exportMetadataChangeDate,
                    v.isFavorite, v.adjustmentUuid, m.imagePath
             FROM RKVersion AS v
             JOIN RKMaster AS m ON m.uuid = v.masterUuid
             WHERE v.isInTrash = 0 AND v.type = ?
             ORDER BY v.modelId",
        )?;
        let rows = stmt.query_map([IMAGE_VERSION_TYPE], map_version)?;
        let versions = rows.collect::<rusqlite::Result<Vec<VersionRow>>>()?;
        versions
            .into_iter()
            .map(|row| self.photo_from_row(row))
            .collect()
    }

    /// All photos keyed by their native identifier
    pub fn photo_map(&self) -> Result<BTreeMap<i64, Photo>, LibraryError> {
        Ok(self.photos()?.into_iter().map(|p| (p.id, p)).collect())
    }

    /// Member photo IDs of an album, restricted to non-trashed still
    /// photos and deduplicated preserving first occurrence.
    ///
    /// The all-photos pseudo-album reads the whole membership table instead
    /// of joining on one album row.
    pub fn photo_ids(&self, album: &Album) -> Result<Vec<i64>, LibraryError> {
        debug!("Fetching members of {}", album.name);
        let ids: Vec<i64> = if album.kind == AlbumKind::AllPhotos {
            let mut stmt = self.library_db.prepare(
                "SELECT DISTINCT av.versionId FROM RKAlbumVersion AS av
                 JOIN RKVersion AS v ON v.modelId = av.versionId
                 WHERE v.isInTrash = 0 AND v.type = ?
                 ORDER BY av.versionId",
            )?;
            let rows = stmt.query_map([IMAGE_VERSION_TYPE], |row| row.get(0))?;
            rows.collect::<rusqlite::Result<_>>()?
        } else {
            let mut stmt = self.library_db.prepare(
                "SELECT av.versionId FROM RKAlbumVersion AS av
                 JOIN RKAlbum AS a ON a.modelId = av.albumId
                 JOIN RKVersion AS v ON v.modelId = av.versionId
                 WHERE a.uuid = ? AND v.isInTrash = 0 AND v.type = ?
                 ORDER BY av.modelId",
            )?;
            let rows = stmt.query_map(params![album.uuid, IMAGE_VERSION_TYPE], |row| row.get(0))?;
            rows.collect::<rusqlite::Result<_>>()?
        };

        let mut seen = HashSet::new();
        Ok(ids.into_iter().filter(|id| seen.insert(*id)).collect())
    }

    /// On-disk path of the edited rendition for an adjustment token.
    ///
    /// The sentinel [`UNADJUSTED`] token means no edited rendition exists;
    /// the original path is returned without touching the resource index.
    pub fn resolve_edited_path(
        &self,
        adjustment: &str,
        original_path: &str,
    ) -> Result<String, LibraryError> {
        if adjustment == UNADJUSTED {
            return Ok(original_path.to_string());
        }
        resources::resolve(&self.image_proxies_db, adjustment)
    }

    fn photo_from_row(&self, row: VersionRow) -> Result<Photo, LibraryError> {
        debug!("Got photo {} ({})", row.name.as_deref().unwrap_or(""), row.uuid);
        let original_path = resources::master_path(&row.image_path);
        let path = match row.adjustment.as_deref() {
            None => original_path.clone(),
            Some(token) => self.resolve_edited_path(token, &original_path)?,
        };
        let (thumbnail, mini_thumbnail) = resources::thumbnail_paths(&row.image_path, &row.uuid);
        Ok(Photo {
            id: row.id,
            uuid: row.uuid,
            name: row.name,
            description: row.description,
            favorite: row.favorite,
            image_date: row.image_date.unwrap_or(0.0),
            time_zone_name: row.time_zone_name,
            time_zone_offset: row.time_zone_offset.unwrap_or(0),
            mod_date: row.mod_date.unwrap_or(0.0),
            meta_mod_date: row.meta_mod_date.unwrap_or(0.0),
            path,
            original_path,
            thumbnail,
            mini_thumbnail,
        })
    }
}

/// Raw RKVersion row before artifact paths are resolved
struct VersionRow {
    id: i64,
    uuid: String,
    name: Option<String>,
    description: Option<String>,
    image_date: Option<f64>,
    time_zone_name: Option<String>,
    time_zone_offset: Option<i64>,
    mod_date: Option<f64>,
    meta_mod_date: Option<f64>,
    favorite: bool,
    adjustment: Option<String>,
    image_path: String,
}

fn map_version(row: &Row) -> rusqlite::Result<VersionRow> {
    Ok(VersionRow {
        id: row.get(0)?,
        uuid: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        image_date: row.get(4)?,
        time_zone_name: row.get(5)?,
        time_zone_offset: row.get(6)?,
        mod_date: row.get(7)?,
        meta_mod_date: row.get(8)?,
        favorite: row.get(9)?,
        adjustment: row.get(10)?,
        image_path: row.get(11)?,
    })
}

fn map_folder(row: &Row) -> rusqlite::Result<Folder> {
    Ok(Folder {
        id: row.get(0)?,
        uuid: row.get(1)?,
        name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        poster_version_uuid: row.get(3)?,
    })
}

fn map_album(row: &Row) -> rusqlite::Result<Album> {
    let uuid: String = row.get(1)?;
    let kind = album_kind(&uuid);
    Ok(Album {
        id: row.get(0)?,
        uuid,
        name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        poster_version_uuid: row.get(3)?,
        kind,
    })
}

fn album_kind(uuid: &str) -> AlbumKind {
    match uuid {
        ALL_PHOTOS_ALBUM => AlbumKind::AllPhotos,
        FAVORITES_ALBUM => AlbumKind::Favorites,
        LAST_IMPORT_ALBUM => AlbumKind::LastImport,
        _ => AlbumKind::Regular,
    }
}

fn folder_by_uuid(conn: &Connection, uuid: &str) -> Result<Folder, LibraryError> {
    let result = conn.query_row(
        "SELECT modelId, uuid, name, posterVersionUuid FROM RKFolder WHERE uuid = ?",
        [uuid],
        map_folder,
    );
    match result {
        Ok(folder) => Ok(folder),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(LibraryError::FolderNotFound {
            uuid: uuid.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

fn album_by_uuid(conn: &Connection, uuid: &str) -> Result<Album, LibraryError> {
    let result = conn.query_row(
        "SELECT modelId, uuid, name, posterVersionUuid FROM RKAlbum WHERE uuid = ?",
        [uuid],
        map_album,
    );
    match result {
        Ok(album) => Ok(album),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(LibraryError::AlbumNotFound {
            uuid: uuid.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

fn open_database(path: &Path) -> Result<Connection, LibraryError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn =
        Connection::open_with_flags(path, flags).map_err(|e| map_open_error(path, e))?;
    // Force a read so a lock held by another process surfaces here instead
    // of at the first entity query.
    conn.query_row("PRAGMA schema_version", [], |_| Ok(()))
        .map_err(|e| map_open_error(path, e))?;
    Ok(conn)
}

fn map_open_error(path: &Path, error: rusqlite::Error) -> LibraryError {
    use rusqlite::ErrorCode::{DatabaseBusy, DatabaseLocked};
    match &error {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == DatabaseBusy || failure.code == DatabaseLocked =>
        {
            LibraryError::Locked {
                path: path.to_path_buf(),
            }
        }
        _ => LibraryError::Open {
            path: path.to_path_buf(),
            reason: error.to_string(),
        },
    }
}
