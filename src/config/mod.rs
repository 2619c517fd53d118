use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::cli::OutputFormat;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP transport settings
    pub http: HttpConfig,

    /// Optional proxy every request is routed through
    pub proxy: Option<ProxyConfig>,

    /// Extra attempts on HTTP 429, and total attempts on bot-detection blocks
    pub retries_when_blocked: u32,

    /// Defaults for fetch requests
    pub defaults: FetchDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Value of the Accept-Language header
    pub accept_language: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Close the connection after every request instead of pooling it
    pub prevent_keeping_connections_alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub auth: Option<ProxyAuth>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchDefaults {
    /// Language codes in order of preference
    pub languages: Vec<String>,

    /// Keep caption text exactly as served
    pub preserve_formatting: bool,

    /// Default output format
    pub output_format: OutputFormat,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            accept_language: "en-US".to_string(),
            timeout_secs: 30,
            prevent_keeping_connections_alive: false,
        }
    }
}

impl Default for FetchDefaults {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            preserve_formatting: false,
            output_format: OutputFormat::Text,
        }
    }
}

impl ProxyConfig {
    /// Proxy target as a URL
    pub fn url(&self) -> String {
        if self.host.contains("://") {
            format!("{}:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("yt-transcript").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            anyhow::bail!("HTTP timeout must be greater than zero");
        }

        if self.defaults.languages.is_empty() {
            anyhow::bail!("At least one default language must be configured");
        }

        if let Some(proxy) = &self.proxy {
            if proxy.host.trim().is_empty() {
                anyhow::bail!("Proxy host must not be empty");
            }
            Url::parse(&proxy.url())
                .with_context(|| format!("Invalid proxy address: {}", proxy.url()))?;
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Accept-Language: {}", self.http.accept_language);
        println!("  Timeout: {}s", self.http.timeout_secs);
        println!("  Close Connections: {}", self.http.prevent_keeping_connections_alive);
        match &self.proxy {
            Some(proxy) => println!("  Proxy: {}", proxy.url()),
            None => println!("  Proxy: none"),
        }
        println!("  Retries When Blocked: {}", self.retries_when_blocked);
        println!("  Default Languages: {}", self.defaults.languages.join(", "));
        println!("  Preserve Formatting: {}", self.defaults.preserve_formatting);
        println!("  Default Format: {}", self.defaults.output_format);
    }
}
