use crate::commands::{OpMessage, OpResult};
use crate::error::{Result, SitepadError};
use crate::model::PageName;
use crate::render::PageRenderer;

/// Direct page write from the admin surface: allow-listed page name,
/// timestamped backup, then overwrite.
pub fn write(renderer: &PageRenderer, page: PageName, html: &str) -> Result<OpResult> {
    if html.is_empty() {
        return Err(SitepadError::Validation(
            "Missing required field: html".into(),
        ));
    }

    let write = renderer.write_page(page, html)?;

    let mut result = OpResult::default();
    result.backup_file = write.backup;
    result.extend_messages(write.messages);
    result.add_message(OpMessage::success(format!(
        "{} updated successfully",
        page.file_name()
    )));
    Ok(result)
}
