//! Layered configuration for the PlanCraft client.
//!
//! Settings come from `plancraft.toml` in the config directory, then the
//! environment, then CLI flags, each layer overriding the one before.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "https://smart-task-manager-server-delta.vercel.app"
//! timeout_secs = 30
//!
//! [workload]
//! tie_break = "input-order"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::workload::TieBreak;

pub const DEFAULT_BASE_URL: &str = "https://smart-task-manager-server-delta.vercel.app";
pub const CONFIG_FILE_NAME: &str = "plancraft.toml";
pub const SESSION_FILE_NAME: &str = "session.json";

/// Overrides the config directory (and with it the session file location).
pub const CONFIG_DIR_ENV: &str = "PLANCRAFT_CONFIG_DIR";
pub const API_URL_ENV: &str = "PLANCRAFT_API_URL";

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    /// Base URL of the PlanCraft API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Workload balancing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkloadSection {
    /// How equal loads are broken when auto-assigning
    #[serde(default)]
    pub tie_break: TieBreak,
}

/// The complete plancraft.toml structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanCraftToml {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub workload: WorkloadSection,
}

impl PlanCraftToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse plancraft.toml")
    }

    /// Returns the default configuration if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize plancraft.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let url = self.api.base_url.trim();
        if url.is_empty() {
            warnings.push("api.base_url is empty".to_string());
        } else if !is_http_url(url) {
            warnings.push(format!(
                "Invalid api.base_url '{}': should start with http:// or https://",
                url
            ));
        }

        if self.api.timeout_secs == 0 {
            warnings.push("api.timeout_secs is 0: every request would time out".to_string());
        }

        warnings
    }
}

pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Directory holding plancraft.toml and the session file.
pub fn default_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plancraft")
}

/// Effective configuration after applying every layer.
#[derive(Debug, Clone)]
pub struct PlanCraftConfig {
    pub config_path: PathBuf,
    pub session_path: PathBuf,
    pub toml: PlanCraftToml,
    /// CLI/env override for the API base URL
    pub api_url_override: Option<String>,
    /// CLI override for the tie-break
    pub tie_break_override: Option<TieBreak>,
    pub verbose: bool,
}

impl PlanCraftConfig {
    /// Load from `config_path` (or the default location).
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path =
            config_path.unwrap_or_else(|| default_config_dir().join(CONFIG_FILE_NAME));
        let toml = PlanCraftToml::load_or_default(&config_path)?;
        let session_path = config_path
            .parent()
            .map(|p| p.join(SESSION_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(SESSION_FILE_NAME));

        Ok(Self {
            config_path,
            session_path,
            toml,
            api_url_override: None,
            tie_break_override: None,
            verbose: false,
        })
    }

    pub fn with_cli_args(
        config_path: Option<PathBuf>,
        api_url: Option<String>,
        tie_break: Option<TieBreak>,
        verbose: bool,
    ) -> Result<Self> {
        let mut config = Self::load(config_path)?;
        config.api_url_override = api_url.filter(|u| !u.trim().is_empty());
        config.tie_break_override = tie_break;
        config.verbose = verbose;
        Ok(config)
    }

    /// API base URL: CLI flag, then `PLANCRAFT_API_URL`, then the file.
    pub fn base_url(&self) -> String {
        self.api_url_override
            .clone()
            .or_else(|| std::env::var(API_URL_ENV).ok().filter(|u| !u.is_empty()))
            .unwrap_or_else(|| self.toml.api.base_url.clone())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.toml.api.timeout_secs)
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break_override
            .unwrap_or(self.toml.workload.tie_break)
    }
}
