//! # Storage Layer
//!
//! One JSON document per content domain (portfolio, content, media,
//! settings), behind the [`DocumentStore`] trait.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with `InMemoryStore` (no filesystem needed)
//! - Allow **future backends** without changing pipeline logic
//! - Keep the commands **decoupled** from persistence details
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production file-based storage, one file per domain
//!   under the site's `data/` directory
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!
//! ## Load/save contract
//!
//! `load_*` never fails on an absent or unparsable file: each domain has a
//! default shape (empty portfolio, empty page maps, default settings) that
//! is returned instead. `save_*` serializes with stable key order and fixed
//! indentation, creates parent directories as needed, and replaces the
//! target atomically (temp file + rename) so a reader never observes a
//! truncated document.

use crate::error::Result;
use crate::model::{ContentDocument, MediaItem, PortfolioDocument, SettingsDocument};

pub mod fs;
pub mod memory;

/// Abstract interface for domain-document storage.
pub trait DocumentStore {
    fn load_portfolio(&self) -> Result<PortfolioDocument>;
    fn save_portfolio(&mut self, doc: &PortfolioDocument) -> Result<()>;

    fn load_content(&self) -> Result<ContentDocument>;
    fn save_content(&mut self, doc: &ContentDocument) -> Result<()>;

    fn load_media(&self) -> Result<Vec<MediaItem>>;
    fn save_media(&mut self, items: &[MediaItem]) -> Result<()>;

    /// Whether a media document has ever been persisted. When it hasn't,
    /// the media pipeline bootstraps by scanning the asset directory.
    fn media_exists(&self) -> bool;

    fn load_settings(&self) -> Result<SettingsDocument>;
    fn save_settings(&mut self, doc: &SettingsDocument) -> Result<()>;
}
