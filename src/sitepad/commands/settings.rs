use crate::commands::{OpMessage, OpResult};
use crate::error::{Result, SitepadError};
use crate::model::{SettingsDocument, SETTINGS_CATEGORIES};
use crate::store::DocumentStore;
use serde_json::{Map, Value};

/// Settings for the admin surface. The stored passcode never leaves the
/// process through this path.
pub fn get<S: DocumentStore>(store: &S) -> Result<OpResult> {
    let mut doc = store.load_settings()?;
    redact_passcode(&mut doc);
    Ok(OpResult::default().with_settings(doc))
}

/// Replace the whole settings document. A write that omits the passcode
/// keeps the stored one; the admin surface never round-trips it.
pub fn replace<S: DocumentStore>(store: &mut S, mut doc: SettingsDocument) -> Result<OpResult> {
    let current = store.load_settings()?;

    if passcode_of(&doc).is_none() {
        let stored = passcode_of(&current).unwrap_or_default();
        let admin = doc
            .entry("admin".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !admin.is_object() {
            *admin = Value::Object(Map::new());
        }
        admin
            .as_object_mut()
            .expect("admin is an object")
            .insert("passcode".to_string(), Value::String(stored));
    }

    store.save_settings(&doc)?;

    let mut result = OpResult::default();
    result.add_message(OpMessage::success("Settings updated"));
    Ok(result)
}

/// Set one `{category, key, value}` entry. The category must be one of the
/// fixed top-level keys; the key itself is free-form.
pub fn set_value<S: DocumentStore>(
    store: &mut S,
    category: &str,
    key: &str,
    value: Value,
) -> Result<OpResult> {
    if !SETTINGS_CATEGORIES.contains(&category) {
        return Err(SitepadError::Validation(format!(
            "Unknown settings category: {}",
            category
        )));
    }
    if key.is_empty() {
        return Err(SitepadError::Validation(
            "Missing required field: key".into(),
        ));
    }

    let mut doc = store.load_settings()?;
    let entry = doc
        .entry(category.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    entry
        .as_object_mut()
        .expect("category is an object")
        .insert(key.to_string(), value);

    store.save_settings(&doc)?;

    let mut result = OpResult::default();
    result.add_message(OpMessage::success(format!("Updated {}.{}", category, key)));
    Ok(result)
}

/// The stored passcode, used by the gateway to build its credential
/// verifier. Empty and missing count the same.
pub fn passcode<S: DocumentStore>(store: &S) -> Result<String> {
    let doc = store.load_settings()?;
    Ok(passcode_of(&doc).unwrap_or_default())
}

fn passcode_of(doc: &SettingsDocument) -> Option<String> {
    doc.get("admin")
        .and_then(|a| a.get("passcode"))
        .and_then(|p| p.as_str())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

fn redact_passcode(doc: &mut SettingsDocument) {
    if let Some(admin) = doc.get_mut("admin").and_then(|a| a.as_object_mut()) {
        admin.remove("passcode");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use serde_json::json;

    #[test]
    fn get_never_exposes_the_passcode() {
        let store = InMemoryStore::new();
        let result = get(&store).unwrap();
        let doc = result.settings.unwrap();
        assert!(doc["admin"].get("passcode").is_none());
        // the rest of the admin section is still there
        assert!(doc["admin"].get("sessionTimeout").is_some());
    }

    #[test]
    fn replace_preserves_an_omitted_passcode() {
        let mut store = InMemoryStore::new();

        let mut incoming = SettingsDocument::new();
        incoming.insert("site".into(), json!({"title": "New Title"}));
        incoming.insert("admin".into(), json!({"sessionTimeout": 10}));
        replace(&mut store, incoming).unwrap();

        let stored = store.load_settings().unwrap();
        assert_eq!(stored["admin"]["passcode"], "changeme");
        assert_eq!(stored["admin"]["sessionTimeout"], 10);
        assert_eq!(stored["site"]["title"], "New Title");
    }

    #[test]
    fn replace_accepts_an_explicit_passcode() {
        let mut store = InMemoryStore::new();

        let mut incoming = SettingsDocument::new();
        incoming.insert("admin".into(), json!({"passcode": "s3cret"}));
        replace(&mut store, incoming).unwrap();

        assert_eq!(passcode(&store).unwrap(), "s3cret");
    }

    #[test]
    fn set_value_rejects_unknown_categories() {
        let mut store = InMemoryStore::new();
        let err = set_value(&mut store, "plugins", "x", json!(1)).unwrap_err();
        assert!(matches!(err, SitepadError::Validation(_)));
    }

    #[test]
    fn set_value_updates_one_key() {
        let mut store = InMemoryStore::new();
        set_value(&mut store, "theme", "primaryColor", json!("#112233")).unwrap();

        let doc = store.load_settings().unwrap();
        assert_eq!(doc["theme"]["primaryColor"], "#112233");
        // sibling keys untouched
        assert_eq!(doc["theme"]["backgroundColor"], "#ffffff");
    }
}
