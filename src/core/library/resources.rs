//! Resource-index lookups and on-disk path derivation.
//!
//! Every path produced here is relative to the library root and
//! '/'-separated regardless of host OS, because the paths end up inside the
//! output document, not in filesystem calls.

use crate::error::LibraryError;
use rusqlite::Connection;

/// Sentinel adjustment token meaning "no edited rendition exists"
pub const UNADJUSTED: &str = "UNADJUSTEDNONRAW";

/// Join segments with '/', skipping empty ones
fn join_segments(segments: &[&str]) -> String {
    segments
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/")
}

/// Split a file name into (stem, extension-with-dot)
fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, &file_name[stem.len()..]),
        _ => (file_name, ""),
    }
}

/// Path of the original rendition for a master's relative image path
pub fn master_path(image_path: &str) -> String {
    join_segments(&["Masters", image_path])
}

/// Derive the (large, mini) thumbnail paths for a master image path and the
/// owning version's UUID.
pub fn thumbnail_paths(image_path: &str, uuid: &str) -> (String, String) {
    let (dir, base) = match image_path.rsplit_once('/') {
        Some((dir, base)) => (dir, base),
        None => ("", image_path),
    };
    let (stem, ext) = split_extension(base);
    let large = format!("thumb_{stem}_1024{ext}");
    let mini = format!("thumb_{stem}{ext}");
    (
        join_segments(&["Thumbnails", dir, uuid, &large]),
        join_segments(&["Thumbnails", dir, uuid, &mini]),
    )
}

/// Path of an edited rendition inside the resource store.
///
/// The store shards by the decimal value of the first two characters of the
/// resource UUID.
fn resource_path(uuid: &str, filename: &str) -> Option<String> {
    let mut chars = uuid.chars();
    let d1 = chars.next()? as u32;
    let d2 = chars.next()? as u32;
    Some(format!(
        "resources/modelresources/{d1}/{d2}/{uuid}/{filename}"
    ))
}

/// Look up the edited rendition for an adjustment token in the
/// resource-index database. Exactly one row is expected.
pub fn resolve(conn: &Connection, token: &str) -> Result<String, LibraryError> {
    let result = conn.query_row(
        "SELECT resourceUuid, filename FROM RKModelResource WHERE resourceTag = ?",
        [token],
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
    );
    match result {
        Ok((uuid, filename)) => {
            resource_path(&uuid, &filename).ok_or_else(|| LibraryError::ResourceNotFound {
                token: token.to_string(),
            })
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(LibraryError::ResourceNotFound {
            token: token.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_path_prefixes_masters() {
        assert_eq!(master_path("2024/05/IMG_1.jpg"), "Masters/2024/05/IMG_1.jpg");
    }

    #[test]
    fn thumbnail_paths_nest_under_version_uuid() {
        let (large, mini) = thumbnail_paths("2024/05/IMG_1.jpg", "v-1");
        assert_eq!(large, "Thumbnails/2024/05/v-1/thumb_IMG_1_1024.jpg");
        assert_eq!(mini, "Thumbnails/2024/05/v-1/thumb_IMG_1.jpg");
    }

    #[test]
    fn thumbnail_paths_handle_flat_image_path() {
        let (large, mini) = thumbnail_paths("IMG_1.jpg", "v-1");
        assert_eq!(large, "Thumbnails/v-1/thumb_IMG_1_1024.jpg");
        assert_eq!(mini, "Thumbnails/v-1/thumb_IMG_1.jpg");
    }

    #[test]
    fn thumbnail_paths_without_extension() {
        let (large, mini) = thumbnail_paths("2024/IMG_1", "v-1");
        assert_eq!(large, "Thumbnails/2024/v-1/thumb_IMG_1_1024");
        assert_eq!(mini, "Thumbnails/2024/v-1/thumb_IMG_1");
    }

    #[test]
    fn resource_path_shards_by_uuid_prefix() {
        // 'A' = 65, 'b' = 98
        assert_eq!(
            resource_path("Ab12", "edit.jpg").unwrap(),
            "resources/modelresources/65/98/Ab12/edit.jpg"
        );
    }
}
