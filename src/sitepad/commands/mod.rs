use crate::model::{ContentDocument, MediaItem, PortfolioDocument, Project, SettingsDocument};
use std::path::PathBuf;

pub mod backup;
pub mod content;
pub mod media;
pub mod pages;
pub mod portfolio;
pub mod rebuild;
pub mod settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct OpMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl OpMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Outcome of one pipeline operation. Warnings carry every non-fatal
/// condition (anchor not found, backup copy failed, rebuild hook down);
/// the operation itself still counts as a success when it returns Ok.
#[derive(Debug, Default)]
pub struct OpResult {
    pub project: Option<Project>,
    pub portfolio: Option<PortfolioDocument>,
    pub content: Option<ContentDocument>,
    pub media: Option<Vec<MediaItem>>,
    pub settings: Option<SettingsDocument>,
    pub removed: Option<usize>,
    pub backup_file: Option<PathBuf>,
    pub messages: Vec<OpMessage>,
}

impl OpResult {
    pub fn add_message(&mut self, message: OpMessage) {
        self.messages.push(message);
    }

    pub fn extend_messages(&mut self, messages: Vec<OpMessage>) {
        self.messages.extend(messages);
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.project = Some(project);
        self
    }

    pub fn with_portfolio(mut self, doc: PortfolioDocument) -> Self {
        self.portfolio = Some(doc);
        self
    }

    pub fn with_content(mut self, doc: ContentDocument) -> Self {
        self.content = Some(doc);
        self
    }

    pub fn with_media(mut self, items: Vec<MediaItem>) -> Self {
        self.media = Some(items);
        self
    }

    pub fn with_settings(mut self, doc: SettingsDocument) -> Self {
        self.settings = Some(doc);
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}
