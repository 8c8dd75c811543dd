use crate::error::{Result, TrackerError};
use crate::paths;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// RegistryConfig
// ---------------------------------------------------------------------------

/// Federal Register query used by `eotrack sync`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_registry_url")]
    pub base_url: String,
    #[serde(default = "default_president")]
    pub president: String,
    #[serde(default = "default_document_types")]
    pub document_types: Vec<String>,
    /// Earliest publication date, `YYYY-MM-DD`.
    #[serde(default = "default_published_since")]
    pub published_since: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Upper bound on `next_page_url` hops.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_registry_url() -> String {
    "https://www.federalregister.gov/api/v1".to_string()
}

fn default_president() -> String {
    "donald-trump".to_string()
}

fn default_document_types() -> Vec<String> {
    vec!["executive_order".to_string(), "proclamation".to_string()]
}

fn default_published_since() -> String {
    "2025-01-19".to_string()
}

fn default_per_page() -> u32 {
    1000
}

fn default_max_pages() -> u32 {
    10
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_registry_url(),
            president: default_president(),
            document_types: default_document_types(),
            published_since: default_published_since(),
            per_page: default_per_page(),
            max_pages: default_max_pages(),
        }
    }
}

// ---------------------------------------------------------------------------
// CourtListenerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtListenerConfig {
    #[serde(default = "default_court_listener_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_court_listener_url() -> String {
    "https://www.courtlistener.com/api/rest/v3".to_string()
}

fn default_user_agent() -> String {
    "EOTrack/1.0".to_string()
}

impl Default for CourtListenerConfig {
    fn default() -> Self {
        Self {
            base_url: default_court_listener_url(),
            user_agent: default_user_agent(),
        }
    }
}

// ---------------------------------------------------------------------------
// HttpConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub court_listener: CourtListenerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_data_file() -> PathBuf {
    PathBuf::from(paths::DEFAULT_DATA_FILE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            registry: RegistryConfig::default(),
            court_listener: CourtListenerConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Read `eotrack.yaml` from the project root. Without one, every setting
    /// takes its default.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn data_path(&self, root: &Path) -> PathBuf {
        paths::data_path(root, &self.data_file)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let error = |message: String| ConfigWarning {
            level: WarnLevel::Error,
            message,
        };

        if self.data_file.as_os_str().is_empty() {
            warnings.push(error("data_file is empty".to_string()));
        }
        if self.registry.base_url.trim().is_empty() {
            warnings.push(error("registry.base_url is empty".to_string()));
        }
        if self.court_listener.base_url.trim().is_empty() {
            warnings.push(error("court_listener.base_url is empty".to_string()));
        }
        if self.registry.document_types.is_empty() {
            warnings.push(error("registry.document_types is empty".to_string()));
        }
        if NaiveDate::parse_from_str(&self.registry.published_since, "%Y-%m-%d").is_err() {
            warnings.push(error(format!(
                "registry.published_since '{}' is not a YYYY-MM-DD date",
                self.registry.published_since
            )));
        }
        if self.registry.per_page == 0 {
            warnings.push(error("registry.per_page must be at least 1".to_string()));
        } else if self.registry.per_page > 1000 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "registry.per_page={} exceeds the Federal Register maximum of 1000",
                    self.registry.per_page
                ),
            });
        }
        if self.registry.max_pages == 0 {
            warnings.push(error("registry.max_pages must be at least 1".to_string()));
        }
        if self.http.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "http.timeout_secs=0 disables request timeouts".to_string(),
            });
        }

        warnings
    }

    /// Fail on error-level findings; warnings are only logged.
    pub fn ensure_valid(&self) -> Result<()> {
        let mut errors = Vec::new();
        for w in self.validate() {
            match w.level {
                WarnLevel::Warning => tracing::warn!("{}", w.message),
                WarnLevel::Error => errors.push(w.message),
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TrackerError::InvalidConfig(errors.join("; ")))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
