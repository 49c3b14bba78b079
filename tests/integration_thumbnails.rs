//! Integration tests for the thumbnail exporter against fixture source
//! databases with real files on disk.

mod common;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use photo_library_export::core::library::Library;
use photo_library_export::core::thumbnails;
use photo_library_export::error::{ExportError, OutputError};
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn write_source(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn export_mirrors_the_album_hierarchy() {
    let source = TempDir::new().unwrap();
    let (library_db, _proxies) = common::scaffold(source.path());
    common::add_photo(&library_db, 1, Some("Colosseum"), 100.0, false);
    common::add_photo(&library_db, 2, None, 50.0, false);
    common::add_folder(&library_db, 10, "folder-trips", "Trips", Some(common::TOP_LEVEL));
    common::add_album(&library_db, 30, "album-rome", "Rome", "folder-trips");
    common::add_member(&library_db, 30, 1);
    common::add_member(&library_db, 30, 2);
    common::add_album(&library_db, 31, "album-empty", "Empty", common::TOP_LEVEL);
    drop(library_db);

    // Photo 1 has the large thumbnail, photo 2 only the mini one
    write_source(
        source.path(),
        "Thumbnails/2024/v-1/thumb_IMG_1_1024.jpg",
        "hd-1",
    );
    write_source(source.path(), "Thumbnails/2024/v-2/thumb_IMG_2.jpg", "mini-2");

    let library = Library::open(source.path()).unwrap();
    let photos = library.photo_map().unwrap();
    let destination = TempDir::new().unwrap();

    let copied =
        thumbnails::export(&library, &photos, destination.path(), |_, _| {}).unwrap();
    assert_eq!(copied, 2);

    destination
        .child("Trips")
        .assert(predicate::path::is_dir());
    destination
        .child("Trips/Rome/Colosseum.jpg")
        .assert(predicate::path::exists());
    // Blank caption falls back to Photo_<id>
    destination
        .child("Trips/Rome/Photo_2.jpg")
        .assert(predicate::path::exists());
    // Empty albums still get their directory
    destination.child("Empty").assert(predicate::path::is_dir());

    // The best available rendition was picked for each photo
    let hd = fs::read_to_string(destination.path().join("Trips/Rome/Colosseum.jpg")).unwrap();
    assert_eq!(hd, "hd-1");
    let mini = fs::read_to_string(destination.path().join("Trips/Rome/Photo_2.jpg")).unwrap();
    assert_eq!(mini, "mini-2");
}

#[test]
fn original_file_is_the_last_fallback_and_keeps_its_extension() {
    let source = TempDir::new().unwrap();
    let (library_db, _proxies) = common::scaffold(source.path());
    common::add_photo_at(&library_db, 9, Some("Nine"), 100.0, false, "2024/IMG_9.png");
    common::add_album(&library_db, 30, "album-a", "A", common::TOP_LEVEL);
    common::add_member(&library_db, 30, 9);
    drop(library_db);

    // No thumbnails on disk, only the master
    write_source(source.path(), "Masters/2024/IMG_9.png", "orig-9");

    let library = Library::open(source.path()).unwrap();
    let photos = library.photo_map().unwrap();
    let destination = TempDir::new().unwrap();

    thumbnails::export(&library, &photos, destination.path(), |_, _| {}).unwrap();

    destination
        .child("A/Nine.png")
        .assert(predicate::path::exists());
    let copied = fs::read_to_string(destination.path().join("A/Nine.png")).unwrap();
    assert_eq!(copied, "orig-9");
}

#[test]
fn missing_copy_source_is_fatal() {
    let source = TempDir::new().unwrap();
    let (library_db, _proxies) = common::scaffold(source.path());
    common::add_photo(&library_db, 1, Some("Ghost"), 100.0, false);
    common::add_album(&library_db, 30, "album-a", "A", common::TOP_LEVEL);
    common::add_member(&library_db, 30, 1);
    drop(library_db);

    let library = Library::open(source.path()).unwrap();
    let photos = library.photo_map().unwrap();
    let destination = TempDir::new().unwrap();

    let result = thumbnails::export(&library, &photos, destination.path(), |_, _| {});
    assert!(matches!(
        result,
        Err(ExportError::Output(OutputError::Copy { .. }))
    ));
}

#[test]
fn progress_callback_reports_each_copy() {
    let source = TempDir::new().unwrap();
    let (library_db, _proxies) = common::scaffold(source.path());
    common::add_photo(&library_db, 1, Some("One"), 100.0, false);
    common::add_photo(&library_db, 2, Some("Two"), 200.0, false);
    common::add_album(&library_db, 30, "album-a", "A", common::TOP_LEVEL);
    common::add_member(&library_db, 30, 1);
    common::add_member(&library_db, 30, 2);
    drop(library_db);

    write_source(source.path(), "Masters/2024/IMG_1.jpg", "1");
    write_source(source.path(), "Masters/2024/IMG_2.jpg", "2");

    let library = Library::open(source.path()).unwrap();
    let photos = library.photo_map().unwrap();
    let destination = TempDir::new().unwrap();

    let mut seen = Vec::new();
    let copied = thumbnails::export(&library, &photos, destination.path(), |count, caption| {
        seen.push((count, caption.to_string()));
    })
    .unwrap();

    assert_eq!(copied, 2);
    // Members are copied in capture-date order
    assert_eq!(
        seen,
        vec![(1, "One".to_string()), (2, "Two".to_string())]
    );
}
