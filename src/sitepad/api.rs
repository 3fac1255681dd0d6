//! # API Facade
//!
//! The single entry point for all admin operations, regardless of the
//! client driving them (HTTP gateway, CLI, tests).
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Dispatches** to the appropriate command function
//! - **Wires** the store, page renderer, and rebuild notifier together
//! - **Returns structured types** (`Result<OpResult>`)
//!
//! Every mutating operation runs the full pipeline: validate → load →
//! merge → persist → regenerate → notify. Persist failures abort before
//! regeneration; regeneration and notify failures surface as warnings on
//! the result while the operation still succeeds.
//!
//! ## Generic Over DocumentStore
//!
//! `SiteApi<S: DocumentStore>` is generic over the storage backend:
//! - Production: `SiteApi<FileStore>`
//! - Testing: `SiteApi<InMemoryStore>`

use crate::commands::rebuild::{AckNotifier, RebuildNotifier};
use crate::commands::{self, OpResult};
use crate::error::Result;
use crate::model::{ContentDocument, MediaDraft, PageName, ProjectDraft, SettingsDocument};
use crate::render::PageRenderer;
use crate::store::DocumentStore;
use serde_json::{Map, Value};

pub struct SiteApi<S: DocumentStore> {
    store: S,
    renderer: PageRenderer,
    notifier: Box<dyn RebuildNotifier>,
}

impl<S: DocumentStore> SiteApi<S> {
    pub fn new(store: S, renderer: PageRenderer) -> Self {
        Self {
            store,
            renderer,
            notifier: Box::new(AckNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn RebuildNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn renderer(&self) -> &PageRenderer {
        &self.renderer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Portfolio ---

    pub fn portfolio(&self) -> Result<OpResult> {
        let doc = self.store.load_portfolio()?;
        Ok(OpResult::default().with_portfolio(doc))
    }

    pub fn add_project(&mut self, draft: ProjectDraft) -> Result<OpResult> {
        let result = commands::portfolio::add(&mut self.store, &self.renderer, draft)?;
        Ok(self.notified(result))
    }

    pub fn update_project(&mut self, updates: Map<String, Value>) -> Result<OpResult> {
        let result = commands::portfolio::update(&mut self.store, &self.renderer, updates)?;
        Ok(self.notified(result))
    }

    pub fn delete_project(&mut self, id: i64) -> Result<OpResult> {
        let result = commands::portfolio::delete(&mut self.store, &self.renderer, id)?;
        Ok(self.notified(result))
    }

    // --- Content ---

    pub fn content(&self) -> Result<OpResult> {
        let doc = self.store.load_content()?;
        Ok(OpResult::default().with_content(doc))
    }

    pub fn replace_content(&mut self, doc: ContentDocument) -> Result<OpResult> {
        let result = commands::content::replace(&mut self.store, &self.renderer, doc)?;
        Ok(self.notified(result))
    }

    pub fn update_section(&mut self, page: &str, section: &str, data: Value) -> Result<OpResult> {
        let result =
            commands::content::merge_section(&mut self.store, &self.renderer, page, section, data)?;
        Ok(self.notified(result))
    }

    // --- Media ---

    pub fn media(&self) -> Result<OpResult> {
        commands::media::list(&self.store, self.renderer.paths())
    }

    pub fn add_media(&mut self, draft: MediaDraft) -> Result<OpResult> {
        let paths = self.renderer.paths().clone();
        let result = commands::media::add(&mut self.store, &paths, draft)?;
        Ok(self.notified(result))
    }

    pub fn update_media(&mut self, id: &str, updates: Map<String, Value>) -> Result<OpResult> {
        let paths = self.renderer.paths().clone();
        let result = commands::media::update(&mut self.store, &paths, id, updates)?;
        Ok(self.notified(result))
    }

    pub fn delete_media(&mut self, id: &str) -> Result<OpResult> {
        let paths = self.renderer.paths().clone();
        let result = commands::media::delete(&mut self.store, &paths, id)?;
        Ok(self.notified(result))
    }

    pub fn bulk_delete_media(&mut self, ids: &[String]) -> Result<OpResult> {
        let paths = self.renderer.paths().clone();
        let result = commands::media::bulk_delete(&mut self.store, &paths, ids)?;
        Ok(self.notified(result))
    }

    // --- Settings ---

    pub fn settings(&self) -> Result<OpResult> {
        commands::settings::get(&self.store)
    }

    pub fn replace_settings(&mut self, doc: SettingsDocument) -> Result<OpResult> {
        let result = commands::settings::replace(&mut self.store, doc)?;
        Ok(self.notified(result))
    }

    pub fn set_setting(&mut self, category: &str, key: &str, value: Value) -> Result<OpResult> {
        let result = commands::settings::set_value(&mut self.store, category, key, value)?;
        Ok(self.notified(result))
    }

    /// The stored admin passcode, for the gateway's credential verifier.
    pub fn admin_passcode(&self) -> Result<String> {
        commands::settings::passcode(&self.store)
    }

    // --- Pages, backup, rebuild ---

    pub fn write_page(&mut self, page: PageName, html: &str) -> Result<OpResult> {
        commands::pages::write(&self.renderer, page, html)
    }

    /// Regenerate every page from the persisted documents. Used by the
    /// build command and after restores.
    pub fn regenerate_all(&mut self) -> Result<OpResult> {
        let portfolio = self.store.load_portfolio()?;
        let content = self.store.load_content()?;

        let mut result = OpResult::default();
        result.extend_messages(self.renderer.regenerate_portfolio(&portfolio.projects));
        result.extend_messages(self.renderer.regenerate_content(&content));
        Ok(result)
    }

    pub fn create_backup(&self) -> Result<OpResult> {
        commands::backup::create(self.renderer.paths())
    }

    /// The explicit rebuild endpoint: unlike the pipeline's soft notify,
    /// a failing hook here is a real error for the caller.
    pub fn trigger_rebuild(&self) -> Result<OpResult> {
        let note = self.notifier.notify()?;
        let mut result = OpResult::default();
        result.add_message(commands::OpMessage::success(note));
        Ok(result)
    }

    fn notified(&self, mut result: OpResult) -> OpResult {
        result.add_message(commands::rebuild::notify_soft(self.notifier.as_ref()));
        result
    }
}
