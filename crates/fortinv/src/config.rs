//! Configuration loading and types

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{bail, ensure};
use fortinv_client::ClientSettings;
use fortinv_inventory::{DeviceMapper, MappingOptions, RuleSet};
use serde::Deserialize;

/// Value the optional `plugin` key must have
pub const PLUGIN_NAME: &str = "evonck.fortigate.inventory";

/// Inventory files must be named `*fortigate.toml`
const FILE_SUFFIX: &str = "fortigate.toml";

/// Top-level inventory source configuration
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Inventory source marker, checked when present
    #[serde(default)]
    pub plugin: Option<String>,
    /// Controller host (`FORTIGATE_URL`)
    #[serde(default)]
    pub api_host: String,
    /// REST API token (`FORTIGATE_TOKEN`)
    #[serde(default)]
    pub token: String,
    /// REST API version; informational only
    #[serde(default)]
    pub api_version: Option<String>,
    /// Verify the controller's TLS certificate
    #[serde(default = "default_validate_certs")]
    pub validate_certs: bool,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Log settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Rule and option settings
    #[serde(default)]
    pub mapping: MappingConfig,
    /// File the configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Log settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format on stderr
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Rule and option settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MappingConfig {
    #[serde(flatten)]
    pub options: MappingOptions,
    #[serde(flatten)]
    pub rules: RuleSet,
}

fn default_validate_certs() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plugin: None,
            api_host: String::new(),
            token: String::new(),
            api_version: None,
            validate_certs: default_validate_certs(),
            timeout_secs: default_timeout_secs(),
            logging: LoggingConfig::default(),
            mapping: MappingConfig::default(),
            source: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("plugin", &self.plugin)
            .field("api_host", &self.api_host)
            .field("token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("validate_certs", &self.validate_certs)
            .field("timeout_secs", &self.timeout_secs)
            .field("logging", &self.logging)
            .field("mapping", &self.mapping)
            .field("source", &self.source)
            .finish()
    }
}

impl Config {
    /// Load configuration from file, then apply environment overrides
    ///
    /// # Errors
    /// Returns error if the file is not an inventory file, cannot be read or
    /// parsed, or the result is incomplete
    pub fn load(path: &Path) -> eyre::Result<Self> {
        verify_file(path)?;
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.source = Some(path.to_path_buf());
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load from default paths, falling back to environment variables alone
    ///
    /// # Errors
    /// Returns error if a found file fails to load, or no file is found and the
    /// environment does not provide `FORTIGATE_URL` and `FORTIGATE_TOKEN`
    pub fn load_default() -> eyre::Result<Self> {
        // Check environment variable
        if let Ok(path) = std::env::var("FORTINV_CONFIG") {
            return Self::load(&PathBuf::from(path));
        }

        // Try common paths
        let paths = [
            PathBuf::from(FILE_SUFFIX),
            PathBuf::from("/etc/fortinv").join(FILE_SUFFIX),
            dirs::config_dir()
                .map(|p| p.join("fortinv").join(FILE_SUFFIX))
                .unwrap_or_default(),
        ];

        for path in paths {
            if path.is_file() {
                return Self::load(&path);
            }
        }

        let mut config = Config::default();
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML or contains unknown rule ids
    pub fn from_toml(content: &str) -> eyre::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override `api_host` and `token` from `FORTIGATE_URL` and `FORTIGATE_TOKEN`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("FORTIGATE_URL").filter(|v| !v.is_empty()) {
            self.api_host = url;
        }
        if let Some(token) = lookup("FORTIGATE_TOKEN").filter(|v| !v.is_empty()) {
            self.token = token;
        }
    }

    /// Check that the configuration is complete and consistent
    ///
    /// # Errors
    /// Returns error describing the first problem found
    pub fn validate(&self) -> eyre::Result<()> {
        if let Some(plugin) = &self.plugin
            && plugin != PLUGIN_NAME
        {
            bail!("plugin must be '{PLUGIN_NAME}', got '{plugin}'");
        }
        ensure!(
            !self.api_host.trim().is_empty(),
            "api_host is required (set it in the config file or FORTIGATE_URL)"
        );
        ensure!(
            !self.token.is_empty(),
            "token is required (set it in the config file or FORTIGATE_TOKEN)"
        );
        ensure!(self.timeout_secs > 0, "timeout_secs must be greater than zero");
        if let Some(attribute) = self.mapping.rules.duplicate_attribute() {
            bail!("host variable '{attribute}' is written by more than one rule");
        }
        Ok(())
    }

    /// Connection settings for the controller client
    #[must_use]
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings::new(&self.api_host, &self.token)
            .with_validate_certs(self.validate_certs)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    /// Device mapper for the configured rules and options
    #[must_use]
    pub fn mapper(&self) -> DeviceMapper {
        DeviceMapper::new(self.mapping.rules.clone(), self.mapping.options)
    }
}

/// Check that `path` is a readable inventory file for this source
///
/// # Errors
/// Returns error if the file does not exist or is not named `*fortigate.toml`
pub fn verify_file(path: &Path) -> eyre::Result<()> {
    ensure!(path.is_file(), "config file not found: {}", path.display());
    let named_correctly = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(FILE_SUFFIX));
    ensure!(
        named_correctly,
        "config file name must end with '{FILE_SUFFIX}': {}",
        path.display()
    );
    Ok(())
}
