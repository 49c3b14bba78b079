//! Shared fixture-library builder for the integration tests.
//!
//! Builds the minimal source-database layout the repository queries: a
//! `database/` directory with both database files, the schema and the
//! well-known rows every library has.

#![allow(dead_code)]

use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;

pub const TOP_LEVEL: &str = "TopLevelAlbums";
pub const LIBRARY_FOLDER: &str = "LibraryFolder";

/// Create both database files under `photos_dir/database` and return open
/// connections (library, image proxies) for inserting test rows.
pub fn scaffold(photos_dir: &Path) -> (Connection, Connection) {
    let db_dir = photos_dir.join("database");
    fs::create_dir_all(&db_dir).unwrap();

    let library = Connection::open(db_dir.join("Library.apdb")).unwrap();
    library
        .execute_batch(
            "CREATE TABLE RKFolder (
                modelId INTEGER PRIMARY KEY,
                uuid TEXT NOT NULL,
                name TEXT,
                parentFolderUuid TEXT,
                implicitAlbumUuid TEXT,
                posterVersionUuid TEXT,
                isInTrash INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE RKAlbum (
                modelId INTEGER PRIMARY KEY,
                uuid TEXT NOT NULL,
                name TEXT,
                folderUuid TEXT,
                posterVersionUuid TEXT,
                isInTrash INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE RKAlbumVersion (
                modelId INTEGER PRIMARY KEY,
                albumId INTEGER NOT NULL,
                versionId INTEGER NOT NULL
            );
            CREATE TABLE RKVersion (
                modelId INTEGER PRIMARY KEY,
                uuid TEXT NOT NULL,
                name TEXT,
                masterUuid TEXT NOT NULL,
                adjustmentUuid TEXT,
                imageDate REAL,
                imageTimeZoneName TEXT,
                imageTimeZoneOffsetSeconds INTEGER,
                extendedDescription TEXT,
                isFavorite INTEGER NOT NULL DEFAULT 0,
                isInTrash INTEGER NOT NULL DEFAULT 0,
                type INTEGER NOT NULL DEFAULT 2,
                exportImageChangeDate REAL,
                exportMetadataChangeDate REAL
            );
            CREATE TABLE RKMaster (
                modelId INTEGER PRIMARY KEY,
                uuid TEXT NOT NULL,
                imagePath TEXT NOT NULL,
                isInTrash INTEGER NOT NULL DEFAULT 0
            );",
        )
        .unwrap();

    // Well-known rows every recognizable library has
    add_folder(&library, 1, TOP_LEVEL, "Top level", None);
    add_folder(&library, 2, LIBRARY_FOLDER, "Library folder", None);
    add_album(&library, 1, "allPhotosAlbum", "All Photos", LIBRARY_FOLDER);
    add_album(&library, 2, "favoritesAlbum", "Favorites", LIBRARY_FOLDER);
    add_album(&library, 3, "lastImportAlbum", "Last Import", LIBRARY_FOLDER);

    let proxies = Connection::open(db_dir.join("ImageProxies.apdb")).unwrap();
    proxies
        .execute_batch(
            "CREATE TABLE RKModelResource (
                modelId INTEGER PRIMARY KEY,
                resourceTag TEXT NOT NULL,
                resourceUuid TEXT NOT NULL,
                filename TEXT NOT NULL
            );",
        )
        .unwrap();

    (library, proxies)
}

pub fn add_folder(db: &Connection, id: i64, uuid: &str, name: &str, parent: Option<&str>) {
    db.execute(
        "INSERT INTO RKFolder (modelId, uuid, name, parentFolderUuid) VALUES (?, ?, ?, ?)",
        params![id, uuid, name, parent],
    )
    .unwrap();
}

pub fn add_album(db: &Connection, id: i64, uuid: &str, name: &str, folder_uuid: &str) {
    db.execute(
        "INSERT INTO RKAlbum (modelId, uuid, name, folderUuid) VALUES (?, ?, ?, ?)",
        params![id, uuid, name, folder_uuid],
    )
    .unwrap();
}

/// Insert a photo with its master row. The version UUID is `v-<id>`, the
/// master image path `2024/IMG_<id>.jpg`, unadjusted, UTC.
pub fn add_photo(db: &Connection, id: i64, name: Option<&str>, image_date: f64, favorite: bool) {
    add_photo_at(db, id, name, image_date, favorite, &format!("2024/IMG_{id}.jpg"));
}

/// Like [`add_photo`] with an explicit master image path
pub fn add_photo_at(
    db: &Connection,
    id: i64,
    name: Option<&str>,
    image_date: f64,
    favorite: bool,
    image_path: &str,
) {
    db.execute(
        "INSERT INTO RKMaster (modelId, uuid, imagePath) VALUES (?, ?, ?)",
        params![id, format!("m-{id}"), image_path],
    )
    .unwrap();
    db.execute(
        "INSERT INTO RKVersion (modelId, uuid, name, masterUuid, adjustmentUuid,
                                imageDate, imageTimeZoneName, imageTimeZoneOffsetSeconds,
                                isFavorite, exportImageChangeDate, exportMetadataChangeDate)
         VALUES (?, ?, ?, ?, 'UNADJUSTEDNONRAW', ?, 'UTC', 0, ?, 0, 0)",
        params![id, format!("v-{id}"), name, format!("m-{id}"), image_date, favorite],
    )
    .unwrap();
}

/// Add a membership row linking a photo to an album
pub fn add_member(db: &Connection, album_id: i64, version_id: i64) {
    db.execute(
        "INSERT INTO RKAlbumVersion (albumId, versionId) VALUES (?, ?)",
        params![album_id, version_id],
    )
    .unwrap();
}
