use super::DocumentStore;
use crate::error::{Result, SitepadError};
use crate::model::{
    default_content, default_settings, ContentDocument, MediaItem, PortfolioDocument,
    SettingsDocument,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const PORTFOLIO_FILE: &str = "portfolio.json";
const CONTENT_FILE: &str = "content.json";
const MEDIA_FILE: &str = "media.json";
const SETTINGS_FILE: &str = "settings.json";

pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn domain_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Missing file or parse failure falls back to the domain default.
    fn load_json<T: DeserializeOwned>(&self, file: &str, default: impl FnOnce() -> T) -> T {
        let path = self.domain_path(file);
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|_| default()),
            Err(_) => default(),
        }
    }

    /// Whole-document write: temp file in the same directory, then rename
    /// over the target so readers see either the old or the new content.
    fn save_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).map_err(SitepadError::Io)?;
        }

        let content = serde_json::to_string_pretty(value).map_err(SitepadError::Serialization)?;
        let path = self.domain_path(file);
        let tmp = self.domain_path(&format!(".{}.tmp", file));
        fs::write(&tmp, content).map_err(SitepadError::Io)?;
        fs::rename(&tmp, &path).map_err(SitepadError::Io)?;
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn load_portfolio(&self) -> Result<PortfolioDocument> {
        Ok(self.load_json(PORTFOLIO_FILE, PortfolioDocument::default))
    }

    fn save_portfolio(&mut self, doc: &PortfolioDocument) -> Result<()> {
        self.save_json(PORTFOLIO_FILE, doc)
    }

    fn load_content(&self) -> Result<ContentDocument> {
        Ok(self.load_json(CONTENT_FILE, default_content))
    }

    fn save_content(&mut self, doc: &ContentDocument) -> Result<()> {
        self.save_json(CONTENT_FILE, doc)
    }

    fn load_media(&self) -> Result<Vec<MediaItem>> {
        Ok(self.load_json(MEDIA_FILE, Vec::new))
    }

    fn save_media(&mut self, items: &[MediaItem]) -> Result<()> {
        self.save_json(MEDIA_FILE, &items)
    }

    fn media_exists(&self) -> bool {
        self.domain_path(MEDIA_FILE).exists()
    }

    fn load_settings(&self) -> Result<SettingsDocument> {
        Ok(self.load_json(SETTINGS_FILE, default_settings))
    }

    fn save_settings(&mut self, doc: &SettingsDocument) -> Result<()> {
        self.save_json(SETTINGS_FILE, doc)
    }
}
