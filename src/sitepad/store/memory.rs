use super::DocumentStore;
use crate::error::Result;
use crate::model::{
    default_content, default_settings, ContentDocument, MediaItem, PortfolioDocument,
    SettingsDocument,
};

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    portfolio: Option<PortfolioDocument>,
    content: Option<ContentDocument>,
    media: Option<Vec<MediaItem>>,
    settings: Option<SettingsDocument>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for InMemoryStore {
    fn load_portfolio(&self) -> Result<PortfolioDocument> {
        Ok(self.portfolio.clone().unwrap_or_default())
    }

    fn save_portfolio(&mut self, doc: &PortfolioDocument) -> Result<()> {
        self.portfolio = Some(doc.clone());
        Ok(())
    }

    fn load_content(&self) -> Result<ContentDocument> {
        Ok(self.content.clone().unwrap_or_else(default_content))
    }

    fn save_content(&mut self, doc: &ContentDocument) -> Result<()> {
        self.content = Some(doc.clone());
        Ok(())
    }

    fn load_media(&self) -> Result<Vec<MediaItem>> {
        Ok(self.media.clone().unwrap_or_default())
    }

    fn save_media(&mut self, items: &[MediaItem]) -> Result<()> {
        self.media = Some(items.to_vec());
        Ok(())
    }

    fn media_exists(&self) -> bool {
        self.media.is_some()
    }

    fn load_settings(&self) -> Result<SettingsDocument> {
        Ok(self.settings.clone().unwrap_or_else(default_settings))
    }

    fn save_settings(&mut self, doc: &SettingsDocument) -> Result<()> {
        self.settings = Some(doc.clone());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Category, Dimensions, Project};
    use chrono::Utc;

    pub fn project(id: i64, title: &str) -> Project {
        Project {
            id,
            title: title.to_string(),
            category: Category::Graphic,
            client: None,
            industry: None,
            description: format!("Description for {}", title),
            images: vec![],
            featured: false,
            date_added: Utc::now(),
        }
    }

    pub fn media_item(id: &str, url: &str) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            name: url.rsplit('/').next().unwrap_or(url).to_string(),
            url: url.to_string(),
            kind: "image/jpeg".to_string(),
            size: 2048,
            uploaded: Utc::now(),
            dimensions: Dimensions {
                width: 1200,
                height: 800,
            },
            size_formatted: None,
        }
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_projects(mut self, count: usize) -> Self {
            let mut doc = self.store.load_portfolio().unwrap();
            for i in 0..count {
                doc.projects
                    .push(project(1000 + i as i64, &format!("Project {}", i + 1)));
            }
            self.store.save_portfolio(&doc).unwrap();
            self
        }

        pub fn with_media(mut self, ids: &[&str]) -> Self {
            let items: Vec<MediaItem> = ids
                .iter()
                .map(|id| media_item(id, &format!("/assets/images/{}.jpg", id)))
                .collect();
            self.store.save_media(&items).unwrap();
            self
        }
    }
}
