use crate::error::{Result, SitepadError};
use crate::model::PageName;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "sitepad.json";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:4810";
const DEFAULT_SESSION_TIMEOUT_MINUTES: i64 = 30;

/// Fixed locations inside a site root: domain documents under `data/`,
/// image assets under `assets/images/`, page files at the root, backups
/// under `backups/` (pages sub-namespaced as `backups/pages/`).
#[derive(Debug, Clone)]
pub struct SitePaths {
    site_root: PathBuf,
}

impl SitePaths {
    pub fn new<P: Into<PathBuf>>(site_root: P) -> Self {
        Self {
            site_root: site_root.into(),
        }
    }

    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.site_root.join("data")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.site_root.join("assets").join("images")
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.site_root.join("backups")
    }

    pub fn page_backups_dir(&self) -> PathBuf {
        self.backups_dir().join("pages")
    }

    pub fn page_file(&self, page: PageName) -> PathBuf {
        self.site_root.join(page.file_name())
    }

    /// Resolve a site-relative URL (`/assets/images/x.jpg`) to a path on disk.
    pub fn resolve_url(&self, url: &str) -> PathBuf {
        self.site_root.join(url.trim_start_matches('/'))
    }
}

/// Configuration for sitepad, stored in <site root>/sitepad.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SitepadConfig {
    /// Address the admin gateway binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Minutes before an admin session expires
    #[serde(default = "default_session_timeout")]
    pub session_timeout_minutes: i64,

    /// Deployment webhook invoked on rebuild; None means acknowledge only
    #[serde(default)]
    pub rebuild_hook: Option<String>,
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_session_timeout() -> i64 {
    DEFAULT_SESSION_TIMEOUT_MINUTES
}

impl Default for SitepadConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            session_timeout_minutes: default_session_timeout(),
            rebuild_hook: None,
        }
    }
}

impl SitepadConfig {
    /// Load config from the site root, or return defaults if not found
    pub fn load<P: AsRef<Path>>(site_root: P) -> Result<Self> {
        let config_path = site_root.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(SitepadError::Io)?;
        let config: SitepadConfig =
            serde_json::from_str(&content).map_err(SitepadError::Serialization)?;
        Ok(config)
    }

    /// Save config to the site root
    pub fn save<P: AsRef<Path>>(&self, site_root: P) -> Result<()> {
        let site_root = site_root.as_ref();

        if !site_root.exists() {
            fs::create_dir_all(site_root).map_err(SitepadError::Io)?;
        }

        let config_path = site_root.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(SitepadError::Serialization)?;
        fs::write(config_path, content).map_err(SitepadError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SitepadConfig::default();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.session_timeout_minutes, 30);
        assert!(config.rebuild_hook.is_none());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = SitepadConfig::load(dir.path()).unwrap();
        assert_eq!(config, SitepadConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = SitepadConfig {
            bind_addr: "0.0.0.0:8080".into(),
            session_timeout_minutes: 5,
            rebuild_hook: Some("https://deploy.example.com/hook".into()),
        };
        config.save(dir.path()).unwrap();

        let loaded = SitepadConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_paths_layout() {
        let paths = SitePaths::new("/srv/site");
        assert_eq!(paths.data_dir(), PathBuf::from("/srv/site/data"));
        assert_eq!(
            paths.page_file(PageName::Portfolio),
            PathBuf::from("/srv/site/portfolio.html")
        );
        assert_eq!(
            paths.page_backups_dir(),
            PathBuf::from("/srv/site/backups/pages")
        );
        assert_eq!(
            paths.resolve_url("/assets/images/a.jpg"),
            PathBuf::from("/srv/site/assets/images/a.jpg")
        );
    }
}
