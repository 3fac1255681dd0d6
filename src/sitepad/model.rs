use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::SitepadError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Branding,
    Logo,
    #[default]
    Graphic,
    // Legacy documents may carry category values outside the known set
    #[serde(other)]
    Uncategorized,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Branding => "branding",
            Category::Logo => "logo",
            Category::Graphic => "graphic",
            Category::Uncategorized => "uncategorized",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Branding => "🏗️",
            Category::Logo => "✨",
            Category::Graphic => "🎨",
            Category::Uncategorized => "📁",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Branding => "Brand Identity",
            Category::Logo => "Logo Design",
            Category::Graphic | Category::Uncategorized => "Graphic Design",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub date_added: DateTime<Utc>,
}

/// Incoming fields for a new project. The id and dateAdded are always
/// assigned by the pipeline, never taken from the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioDocument {
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl PortfolioDocument {
    /// Fresh project id: current millisecond timestamp, bumped past every
    /// existing id so two adds in the same instant never collide.
    pub fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        match self.projects.iter().map(|p| p.id).max() {
            Some(max) if max >= candidate => max + 1,
            _ => candidate,
        }
    }

    pub fn find(&self, id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default = "Utc::now")]
    pub uploaded: DateTime<Utc>,
    #[serde(default)]
    pub dimensions: Dimensions,
    /// Display-only, filled in on reads; never meaningful in stored documents.
    #[serde(
        rename = "sizeFormatted",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub size_formatted: Option<String>,
}

impl MediaItem {
    /// Prefixed time-plus-random id, e.g. `img-1754650000000-a3f9c01b2`.
    pub fn fresh_id(now: DateTime<Utc>) -> String {
        let rand = uuid::Uuid::new_v4().simple().to_string();
        format!("img-{}-{}", now.timestamp_millis(), &rand[..9])
    }
}

/// Incoming fields for a new media item; id and upload time are assigned
/// when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub uploaded: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dimensions: Dimensions,
}

/// One JSON object per page name, each mapping section names to free-form
/// data. Unknown pages and sections are created on first write.
pub type ContentDocument = Map<String, Value>;

pub fn default_content() -> ContentDocument {
    let mut doc = Map::new();
    for page in ["home", "about", "services", "global"] {
        doc.insert(page.to_string(), Value::Object(Map::new()));
    }
    doc
}

/// Nested settings with fixed top-level categories.
pub type SettingsDocument = Map<String, Value>;

pub const SETTINGS_CATEGORIES: [&str; 5] = ["admin", "site", "theme", "integrations", "backup"];

pub fn default_settings() -> SettingsDocument {
    let doc = serde_json::json!({
        "admin": {
            "passcode": "changeme",
            "sessionTimeout": 30,
            "lastLogin": null,
            "allowedIPs": []
        },
        "site": {
            "title": "Studio",
            "tagline": "Design Studio",
            "description": "Brand, logo, and graphic design services",
            "keywords": "brand design, logo design, graphic design",
            "author": "Studio"
        },
        "theme": {
            "primaryColor": "#1e3a8a",
            "secondaryColor": "#3b82f6",
            "backgroundColor": "#ffffff",
            "textColor": "#1f2937",
            "accentColor": "#1e40af",
            "fontFamily": "Inter, sans-serif"
        },
        "integrations": {
            "googleAnalytics": "",
            "facebookPixel": "",
            "whatsapp": ""
        },
        "backup": {
            "autoBackup": true,
            "backupFrequency": "daily",
            "lastBackup": null,
            "maxBackups": 30
        }
    });
    match doc {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageName {
    Index,
    About,
    Services,
    Portfolio,
    Contact,
}

impl PageName {
    pub fn all() -> [PageName; 5] {
        [
            PageName::Index,
            PageName::About,
            PageName::Services,
            PageName::Portfolio,
            PageName::Contact,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageName::Index => "index",
            PageName::About => "about",
            PageName::Services => "services",
            PageName::Portfolio => "portfolio",
            PageName::Contact => "contact",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.html", self.as_str())
    }
}

impl fmt::Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageName {
    type Err = SitepadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" => Ok(PageName::Index),
            "about" => Ok(PageName::About),
            "services" => Ok(PageName::Services),
            "portfolio" => Ok(PageName::Portfolio),
            "contact" => Ok(PageName::Contact),
            other => Err(SitepadError::Validation(format!(
                "Invalid page name: {}",
                other
            ))),
        }
    }
}
