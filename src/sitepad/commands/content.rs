use crate::commands::{OpMessage, OpResult};
use crate::error::{Result, SitepadError};
use crate::model::ContentDocument;
use crate::render::PageRenderer;
use crate::store::DocumentStore;
use serde_json::{Map, Value};

/// Replace the whole content document, then push the global substitutions
/// (and the services grid) out to every managed page.
pub fn replace<S: DocumentStore>(
    store: &mut S,
    renderer: &PageRenderer,
    doc: ContentDocument,
) -> Result<OpResult> {
    store.save_content(&doc)?;

    let mut result = OpResult::default();
    result.extend_messages(renderer.regenerate_content(&doc));
    result.add_message(OpMessage::success("Content updated"));
    Ok(result)
}

/// Upsert one `{page, section, data}` entry. Unknown page and section keys
/// are created on first write, never rejected.
pub fn merge_section<S: DocumentStore>(
    store: &mut S,
    renderer: &PageRenderer,
    page: &str,
    section: &str,
    data: Value,
) -> Result<OpResult> {
    if page.is_empty() || section.is_empty() {
        return Err(SitepadError::Validation(
            "Missing required field: page or section".into(),
        ));
    }

    let mut doc = store.load_content()?;
    let page_entry = doc
        .entry(page.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !page_entry.is_object() {
        *page_entry = Value::Object(Map::new());
    }
    page_entry
        .as_object_mut()
        .expect("page entry is an object")
        .insert(section.to_string(), data);

    store.save_content(&doc)?;

    let mut result = OpResult::default();
    result.extend_messages(renderer.regenerate_content(&doc));
    result.add_message(OpMessage::success(format!(
        "Updated {}.{}",
        page, section
    )));
    Ok(result)
}
