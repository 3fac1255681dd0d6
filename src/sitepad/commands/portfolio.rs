use crate::commands::{OpMessage, OpResult};
use crate::error::{Result, SitepadError};
use crate::model::{Project, ProjectDraft};
use crate::render::PageRenderer;
use crate::store::DocumentStore;
use chrono::Utc;
use serde_json::{Map, Value};

/// Add a new project. The id is assigned here, never by the caller, and is
/// unique within the document even for adds landing in the same
/// millisecond.
pub fn add<S: DocumentStore>(
    store: &mut S,
    renderer: &PageRenderer,
    draft: ProjectDraft,
) -> Result<OpResult> {
    if draft.title.trim().is_empty() {
        return Err(SitepadError::Validation(
            "Missing required field: title".into(),
        ));
    }
    if draft.description.trim().is_empty() {
        return Err(SitepadError::Validation(
            "Missing required field: description".into(),
        ));
    }

    let mut doc = store.load_portfolio()?;
    let now = Utc::now();
    let project = Project {
        id: doc.next_id(now),
        title: draft.title,
        category: draft.category,
        client: draft.client,
        industry: draft.industry,
        description: draft.description,
        images: draft.images,
        featured: draft.featured,
        date_added: now,
    };

    doc.projects.push(project.clone());
    store.save_portfolio(&doc)?;

    let title = project.title.clone();
    let mut result = OpResult::default().with_project(project);
    result.extend_messages(renderer.regenerate_portfolio(&doc.projects));
    result.add_message(OpMessage::success(format!("Project added: {}", title)));
    Ok(result)
}

/// Shallow-merge the provided fields over the project with the payload's
/// id. The id itself is immutable: a different id in the payload body is
/// ignored, not applied.
pub fn update<S: DocumentStore>(
    store: &mut S,
    renderer: &PageRenderer,
    updates: Map<String, Value>,
) -> Result<OpResult> {
    let id = extract_id(&updates)
        .ok_or_else(|| SitepadError::Validation("Missing required field: id".into()))?;

    let mut doc = store.load_portfolio()?;
    let index = doc
        .projects
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| SitepadError::NotFound("Project not found".into()))?;

    let merged = merge_project(&doc.projects[index], &updates)?;
    doc.projects[index] = merged;
    store.save_portfolio(&doc)?;

    let mut result = OpResult::default();
    result.extend_messages(renderer.regenerate_portfolio(&doc.projects));
    result.add_message(OpMessage::success(format!(
        "Project updated: {}",
        doc.projects[index].title
    )));
    Ok(result)
}

/// Remove the project with the given id. Deleting an id that is not
/// present is a no-op success, so the operation is idempotent.
pub fn delete<S: DocumentStore>(
    store: &mut S,
    renderer: &PageRenderer,
    id: i64,
) -> Result<OpResult> {
    let mut doc = store.load_portfolio()?;
    let before = doc.projects.len();
    doc.projects.retain(|p| p.id != id);
    let removed = before - doc.projects.len();

    store.save_portfolio(&doc)?;

    let mut result = OpResult::default();
    result.removed = Some(removed);
    result.extend_messages(renderer.regenerate_portfolio(&doc.projects));
    if removed > 0 {
        result.add_message(OpMessage::success("Project deleted"));
    } else {
        result.add_message(OpMessage::info(format!(
            "No project with id {}; nothing to delete",
            id
        )));
    }
    Ok(result)
}

/// Accepts the id as a JSON number or a numeric string; the admin surface
/// has historically sent both.
fn extract_id(updates: &Map<String, Value>) -> Option<i64> {
    match updates.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn merge_project(existing: &Project, updates: &Map<String, Value>) -> Result<Project> {
    let mut obj = match serde_json::to_value(existing)? {
        Value::Object(map) => map,
        _ => unreachable!(),
    };

    for (key, value) in updates {
        if key == "id" {
            continue;
        }
        obj.insert(key.clone(), value.clone());
    }

    serde_json::from_value(Value::Object(obj))
        .map_err(|e| SitepadError::Validation(format!("Invalid project fields: {}", e)))
}
