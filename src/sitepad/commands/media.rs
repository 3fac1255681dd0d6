use crate::commands::{OpMessage, OpResult};
use crate::config::SitePaths;
use crate::error::{Result, SitepadError};
use crate::model::{Dimensions, MediaDraft, MediaItem};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fs;

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// The media library. When no document has been persisted yet, the asset
/// directory is scanned and items are synthesized with fresh ids; scanned
/// items are not persisted until an explicit save happens.
pub fn list<S: DocumentStore>(store: &S, paths: &SitePaths) -> Result<OpResult> {
    let mut items = current(store, paths)?;
    for item in &mut items {
        item.size_formatted = Some(format_size(item.size));
    }
    Ok(OpResult::default().with_media(items))
}

/// Register an already-processed upload. Id and upload time are assigned
/// when the caller did not provide them.
pub fn add<S: DocumentStore>(
    store: &mut S,
    paths: &SitePaths,
    draft: MediaDraft,
) -> Result<OpResult> {
    if draft.url.trim().is_empty() {
        return Err(SitepadError::Validation(
            "Missing required field: url".into(),
        ));
    }

    let now = Utc::now();
    let item = MediaItem {
        id: draft
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| MediaItem::fresh_id(now)),
        name: if draft.name.is_empty() {
            draft
                .url
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string()
        } else {
            draft.name
        },
        url: draft.url,
        kind: draft.kind,
        size: draft.size,
        uploaded: draft.uploaded.unwrap_or(now),
        dimensions: draft.dimensions,
        size_formatted: None,
    };

    let mut items = current(store, paths)?;
    items.push(item.clone());
    store.save_media(&items)?;

    let mut result = OpResult::default().with_media(vec![item]);
    result.add_message(OpMessage::success("Media item added"));
    Ok(result)
}

/// Shallow-merge metadata updates over the item with the given id.
pub fn update<S: DocumentStore>(
    store: &mut S,
    paths: &SitePaths,
    id: &str,
    updates: Map<String, Value>,
) -> Result<OpResult> {
    let mut items = current(store, paths)?;
    let index = items
        .iter()
        .position(|i| i.id == id)
        .ok_or_else(|| SitepadError::NotFound("Media item not found".into()))?;

    let mut obj = match serde_json::to_value(&items[index])? {
        Value::Object(map) => map,
        _ => unreachable!(),
    };
    for (key, value) in updates {
        if key == "id" {
            continue;
        }
        obj.insert(key, value);
    }
    items[index] = serde_json::from_value(Value::Object(obj))
        .map_err(|e| SitepadError::Validation(format!("Invalid media fields: {}", e)))?;

    store.save_media(&items)?;

    let mut result = OpResult::default();
    result.add_message(OpMessage::success("Media item updated"));
    Ok(result)
}

/// Delete one item: best-effort removal of the underlying file, then the
/// document entry. A failed file deletion is reported but never blocks the
/// document change.
pub fn delete<S: DocumentStore>(store: &mut S, paths: &SitePaths, id: &str) -> Result<OpResult> {
    let mut items = current(store, paths)?;
    let item = items
        .iter()
        .find(|i| i.id == id)
        .cloned()
        .ok_or_else(|| SitepadError::NotFound("Media item not found".into()))?;

    let mut result = OpResult::default();
    remove_asset(paths, &item, &mut result.messages);

    items.retain(|i| i.id != id);
    store.save_media(&items)?;

    result.removed = Some(1);
    result.add_message(OpMessage::success(format!("Deleted {}", item.name)));
    Ok(result)
}

/// Bulk delete: for each id, best-effort file removal, then one document
/// filter pass. Returns how many document entries were actually removed,
/// independent of how many file deletions succeeded.
pub fn bulk_delete<S: DocumentStore>(
    store: &mut S,
    paths: &SitePaths,
    ids: &[String],
) -> Result<OpResult> {
    if ids.is_empty() {
        return Err(SitepadError::Validation(
            "Bulk delete requires a non-empty id list".into(),
        ));
    }

    let mut items = current(store, paths)?;
    let mut result = OpResult::default();

    for id in ids {
        if let Some(item) = items.iter().find(|i| &i.id == id) {
            let item = item.clone();
            remove_asset(paths, &item, &mut result.messages);
        }
    }

    let before = items.len();
    items.retain(|i| !ids.contains(&i.id));
    let removed = before - items.len();
    store.save_media(&items)?;

    result.removed = Some(removed);
    result.add_message(OpMessage::success(format!("Deleted {} item(s)", removed)));
    Ok(result)
}

fn current<S: DocumentStore>(store: &S, paths: &SitePaths) -> Result<Vec<MediaItem>> {
    if store.media_exists() {
        store.load_media()
    } else {
        Ok(scan_assets(paths))
    }
}

/// Bootstrap path: synthesize media items from the files already sitting
/// in the asset directory.
fn scan_assets(paths: &SitePaths) -> Vec<MediaItem> {
    let dir = paths.assets_dir();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut items = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name().to_string_lossy().into_owned();
        let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
        if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }

        let meta = match entry.metadata() {
            Ok(meta) => meta,
            Err(_) => continue,
        };
        let uploaded = meta
            .created()
            .or_else(|_| meta.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        items.push(MediaItem {
            id: MediaItem::fresh_id(uploaded),
            url: format!("/assets/images/{}", name),
            name,
            kind: format!("image/{}", ext),
            size: meta.len(),
            uploaded,
            // Actual dimensions would need image decoding; the admin UI
            // only uses these for preview sizing.
            dimensions: Dimensions {
                width: 1200,
                height: 800,
            },
            size_formatted: None,
        });
    }
    items
}

fn remove_asset(paths: &SitePaths, item: &MediaItem, messages: &mut Vec<OpMessage>) {
    let path = paths.resolve_url(&item.url);
    if !path.exists() {
        return;
    }
    if let Err(e) = fs::remove_file(&path) {
        messages.push(OpMessage::warning(format!(
            "Could not delete {}: {}",
            path.display(),
            e
        )));
    }
}

pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = (bytes as f64).log(1024.0).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use tempfile::TempDir;

    fn site() -> (TempDir, SitePaths) {
        let dir = TempDir::new().unwrap();
        let paths = SitePaths::new(dir.path());
        fs::create_dir_all(paths.assets_dir()).unwrap();
        (dir, paths)
    }

    #[test]
    fn list_scans_assets_when_no_document_exists() {
        let (_dir, paths) = site();
        fs::write(paths.assets_dir().join("a.jpg"), [0u8; 64]).unwrap();
        fs::write(paths.assets_dir().join("notes.txt"), "skip").unwrap();

        let store = InMemoryStore::new();
        let result = list(&store, &paths).unwrap();
        let items = result.media.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "a.jpg");
        assert_eq!(items[0].kind, "image/jpg");
        assert_eq!(items[0].url, "/assets/images/a.jpg");
        assert_eq!(items[0].size, 64);
        // scanning must not persist anything
        assert!(!store.media_exists());
    }

    #[test]
    fn list_adds_formatted_sizes() {
        let fixture = StoreFixture::new().with_media(&["img-1"]);
        let (_dir, paths) = site();
        let items = list(&fixture.store, &paths).unwrap().media.unwrap();
        assert_eq!(items[0].size_formatted.as_deref(), Some("2 KB"));
    }

    #[test]
    fn add_assigns_prefixed_id_and_upload_time() {
        let (_dir, paths) = site();
        let mut store = InMemoryStore::new();
        let result = add(
            &mut store,
            &paths,
            MediaDraft {
                url: "/assets/images/new.png".into(),
                ..Default::default()
            },
        )
        .unwrap();

        let item = &result.media.unwrap()[0];
        assert!(item.id.starts_with("img-"));
        assert_eq!(item.name, "new.png");
        assert_eq!(store.load_media().unwrap().len(), 1);
    }

    #[test]
    fn add_without_url_is_a_validation_error() {
        let (_dir, paths) = site();
        let mut store = InMemoryStore::new();
        let err = add(&mut store, &paths, MediaDraft::default()).unwrap_err();
        assert!(matches!(err, SitepadError::Validation(_)));
    }

    #[test]
    fn delete_removes_document_entry_and_file() {
        let (_dir, paths) = site();
        fs::write(paths.assets_dir().join("img-1.jpg"), [0u8; 8]).unwrap();
        let mut fixture = StoreFixture::new().with_media(&["img-1"]);

        let result = delete(&mut fixture.store, &paths, "img-1").unwrap();
        assert_eq!(result.removed, Some(1));
        assert!(fixture.store.load_media().unwrap().is_empty());
        assert!(!paths.assets_dir().join("img-1.jpg").exists());
    }

    #[test]
    fn update_merges_metadata_and_keeps_id() {
        let (_dir, paths) = site();
        let mut fixture = StoreFixture::new().with_media(&["img-1"]);

        let mut updates = Map::new();
        updates.insert("name".into(), serde_json::json!("renamed.jpg"));
        updates.insert("id".into(), serde_json::json!("img-9"));
        update(&mut fixture.store, &paths, "img-1", updates).unwrap();

        let items = fixture.store.load_media().unwrap();
        assert_eq!(items[0].name, "renamed.jpg");
        assert_eq!(items[0].id, "img-1");
        assert_eq!(items[0].size, 2048);
    }

    #[test]
    fn delete_of_unknown_id_is_not_found() {
        let (_dir, paths) = site();
        let mut fixture = StoreFixture::new().with_media(&["img-1"]);
        let err = delete(&mut fixture.store, &paths, "nope").unwrap_err();
        assert!(matches!(err, SitepadError::NotFound(_)));
    }

    #[test]
    fn bulk_delete_counts_document_removals_only() {
        let (_dir, paths) = site();
        let mut fixture = StoreFixture::new().with_media(&["img-1"]);

        // img-2 exists nowhere; img-1 has no file on disk either
        let result = bulk_delete(
            &mut fixture.store,
            &paths,
            &["img-1".to_string(), "img-2".to_string()],
        )
        .unwrap();

        assert_eq!(result.removed, Some(1));
        // absent files never produce warnings
        assert!(!result.has_warnings());
        assert!(fixture.store.load_media().unwrap().is_empty());
    }

    #[test]
    fn bulk_delete_requires_ids() {
        let (_dir, paths) = site();
        let mut store = InMemoryStore::new();
        let err = bulk_delete(&mut store, &paths, &[]).unwrap_err();
        assert!(matches!(err, SitepadError::Validation(_)));
    }

    #[test]
    fn format_size_matches_display_convention() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(512), "512 Bytes");
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5 MB");
    }
}
