//! # Page Renderer
//!
//! Reflects domain documents into the static page files the public site
//! serves. Each regeneration locates a known anchor (the literal opening
//! tag of a grid container) inside the page's HTML and replaces the
//! container's contents with freshly generated markup; global content
//! substitutions rewrite known tag patterns across every managed page.
//!
//! Regeneration is deliberately forgiving: a missing page file is skipped
//! and a missing anchor yields a warning, never an error. The persisted
//! document is the source of truth; page HTML may lag behind it.
//!
//! Every page write is preceded by a timestamped backup copy under
//! `backups/pages/`. A failed backup is reported but does not block the
//! primary write.

use crate::commands::OpMessage;
use crate::config::SitePaths;
use crate::error::{Result, SitepadError};
use crate::model::{ContentDocument, PageName, Project};
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::path::PathBuf;

pub mod fragments;
pub mod substitute;

use fragments::{project_card, service_card, ServiceEntry};
use substitute::{
    apply_global, replace_container, GlobalContent, PORTFOLIO_GRID_ANCHOR, SERVICES_GRID_ANCHOR,
};

/// Outcome of a page write performed on behalf of a caller that must know
/// where the backup landed (the direct page-edit operation).
#[derive(Debug)]
pub struct PageWrite {
    pub backup: Option<PathBuf>,
    pub messages: Vec<OpMessage>,
}

pub struct PageRenderer {
    paths: SitePaths,
}

impl PageRenderer {
    pub fn new(paths: SitePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &SitePaths {
        &self.paths
    }

    /// Regenerate the portfolio page's project grid. All failures are
    /// reported as warnings: the document change has already been
    /// persisted and stands regardless.
    pub fn regenerate_portfolio(&self, projects: &[Project]) -> Vec<OpMessage> {
        let mut messages = Vec::new();
        let page = PageName::Portfolio;
        let path = self.paths.page_file(page);

        let html = match fs::read_to_string(&path) {
            Ok(html) => html,
            Err(_) => {
                messages.push(OpMessage::warning(format!(
                    "{} is missing; portfolio regeneration skipped",
                    page.file_name()
                )));
                return messages;
            }
        };

        let grid: String = projects.iter().map(project_card).collect();
        match replace_container(&html, PORTFOLIO_GRID_ANCHOR, &grid) {
            Some(updated) => {
                self.write_page_lossy(page, &updated, &mut messages);
                messages.push(OpMessage::success(format!(
                    "Portfolio page updated with {} project(s)",
                    projects.len()
                )));
            }
            None => messages.push(OpMessage::warning(format!(
                "Could not find the project grid in {}; regeneration skipped",
                page.file_name()
            ))),
        }

        messages
    }

    /// Apply global substitutions (site title, meta description, contact
    /// links) across every managed page, then rebuild the services card
    /// grid when the content document carries service entries.
    pub fn regenerate_content(&self, content: &ContentDocument) -> Vec<OpMessage> {
        let mut messages = Vec::new();
        let global = GlobalContent::from_content(content);

        for page in PageName::all() {
            let path = self.paths.page_file(page);
            let html = match fs::read_to_string(&path) {
                // Missing page files are skipped, not an error
                Err(_) => continue,
                Ok(html) => html,
            };

            let mut updated = apply_global(&html, &global);

            if page == PageName::Services {
                if let Some(services) = service_entries(content) {
                    let grid: String = services.iter().map(service_card).collect();
                    match replace_container(&updated, SERVICES_GRID_ANCHOR, &grid) {
                        Some(with_grid) => updated = with_grid,
                        None => messages.push(OpMessage::warning(format!(
                            "Could not find the services grid in {}; grid left as-is",
                            page.file_name()
                        ))),
                    }
                }
            }

            if updated != html {
                self.write_page_lossy(page, &updated, &mut messages);
            }
        }

        messages
    }

    /// Direct page write (the page-edit operation): backup first, then
    /// overwrite. A failed backup is a warning; a failed primary write is
    /// a real error for the caller.
    pub fn write_page(&self, page: PageName, html: &str) -> Result<PageWrite> {
        let mut messages = Vec::new();
        let backup = self.backup_page(page, &mut messages);

        let path = self.paths.page_file(page);
        fs::write(&path, html).map_err(SitepadError::Io)?;

        Ok(PageWrite { backup, messages })
    }

    /// Page write in a regeneration context, where a failed write degrades
    /// to a warning instead of failing the operation.
    fn write_page_lossy(&self, page: PageName, html: &str, messages: &mut Vec<OpMessage>) {
        self.backup_page(page, messages);
        if let Err(e) = fs::write(self.paths.page_file(page), html) {
            messages.push(OpMessage::warning(format!(
                "Could not write {}: {}",
                page.file_name(),
                e
            )));
        }
    }

    /// Copy the current page content to `backups/pages/<page>-<stamp>.html`.
    /// Returns the backup path when one was taken.
    fn backup_page(&self, page: PageName, messages: &mut Vec<OpMessage>) -> Option<PathBuf> {
        let source = self.paths.page_file(page);
        if !source.exists() {
            return None;
        }

        let backup_dir = self.paths.page_backups_dir();
        let stamp = backup_timestamp();
        let target = backup_dir.join(format!("{}-{}.html", page.as_str(), stamp));

        let copied = fs::create_dir_all(&backup_dir)
            .and_then(|_| fs::copy(&source, &target))
            .map(|_| target);

        match copied {
            Ok(path) => Some(path),
            Err(e) => {
                messages.push(OpMessage::warning(format!(
                    "Backup of {} failed: {}",
                    page.file_name(),
                    e
                )));
                None
            }
        }
    }
}

/// ISO-8601 timestamp with `:` and `.` replaced so the name is
/// filesystem-safe, e.g. `2026-08-08T09-30-12-417Z`.
pub fn backup_timestamp() -> String {
    Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

fn service_entries(content: &ContentDocument) -> Option<Vec<ServiceEntry>> {
    let entries = content.get("services")?.get("services")?.as_array()?;
    Some(
        entries
            .iter()
            .map(|v| serde_json::from_value(v.clone()).unwrap_or_default())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::project;
    use serde_json::json;
    use tempfile::TempDir;

    const PORTFOLIO_PAGE: &str = r#"<html><body>
<section id="portfolio">
<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6 md:gap-8">
  <div class="portfolio-item"><div class="inner">old</div></div>
</div>
</section>
<footer>keep me</footer>
</body></html>"#;

    fn renderer(dir: &TempDir) -> PageRenderer {
        PageRenderer::new(SitePaths::new(dir.path()))
    }

    #[test]
    fn portfolio_grid_is_replaced_and_footer_kept() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("portfolio.html"), PORTFOLIO_PAGE).unwrap();

        let p = project(1, "Acme Rebrand");
        let messages = renderer(&dir).regenerate_portfolio(&[p]);
        assert!(!messages
            .iter()
            .any(|m| m.level == crate::commands::MessageLevel::Warning));

        let html = fs::read_to_string(dir.path().join("portfolio.html")).unwrap();
        assert!(html.contains("Acme Rebrand"));
        assert!(!html.contains("old"));
        assert!(html.contains("<footer>keep me</footer>"));
    }

    #[test]
    fn missing_anchor_is_a_warning_not_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("portfolio.html"), "<html><body>no grid</body></html>").unwrap();

        let messages = renderer(&dir).regenerate_portfolio(&[project(1, "P")]);
        assert!(messages
            .iter()
            .any(|m| m.level == crate::commands::MessageLevel::Warning));

        // page untouched
        let html = fs::read_to_string(dir.path().join("portfolio.html")).unwrap();
        assert_eq!(html, "<html><body>no grid</body></html>");
    }

    #[test]
    fn missing_page_file_is_a_warning() {
        let dir = TempDir::new().unwrap();
        let messages = renderer(&dir).regenerate_portfolio(&[]);
        assert!(messages
            .iter()
            .any(|m| m.content.contains("regeneration skipped")));
    }

    #[test]
    fn page_write_takes_a_backup_first() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("about.html"), "before").unwrap();

        let write = renderer(&dir)
            .write_page(PageName::About, "after")
            .unwrap();

        let backup = write.backup.expect("backup taken");
        assert_eq!(fs::read_to_string(backup).unwrap(), "before");
        assert_eq!(
            fs::read_to_string(dir.path().join("about.html")).unwrap(),
            "after"
        );
    }

    #[test]
    fn first_write_of_a_page_has_no_backup() {
        let dir = TempDir::new().unwrap();
        let write = renderer(&dir)
            .write_page(PageName::Contact, "fresh")
            .unwrap();
        assert!(write.backup.is_none());
    }

    #[test]
    fn content_regeneration_rewrites_contact_links() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("index.html"),
            r#"<title>Old</title><a href="mailto:old@site.test">mail</a>"#,
        )
        .unwrap();

        let mut content = crate::model::default_content();
        content.insert(
            "global".into(),
            json!({"siteTitle": "New Site", "email": "new@site.test"}),
        );

        renderer(&dir).regenerate_content(&content);

        let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(html.contains("<title>New Site</title>"));
        assert!(html.contains(r#"href="mailto:new@site.test""#));
    }

    #[test]
    fn services_grid_is_rebuilt_in_entry_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("services.html"),
            r#"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6 md:gap-8 max-w-6xl mx-auto"><div>stale</div></div>"#,
        )
        .unwrap();

        let mut content = crate::model::default_content();
        content.insert(
            "services".into(),
            json!({"services": [
                {"icon": "★", "title": "Branding", "description": "Full identity"},
                {"icon": "✦", "title": "Logos", "description": "Marks"}
            ]}),
        );

        renderer(&dir).regenerate_content(&content);

        let html = fs::read_to_string(dir.path().join("services.html")).unwrap();
        assert!(!html.contains("stale"));
        let branding = html.find("Branding").unwrap();
        let logos = html.find("Logos").unwrap();
        assert!(branding < logos);
    }

    #[test]
    fn backup_timestamp_is_filesystem_safe() {
        let stamp = backup_timestamp();
        assert!(!stamp.contains(':'));
        assert!(!stamp.contains('.'));
    }
}
