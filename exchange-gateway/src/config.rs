//! Harness configuration.
//!
//! Loaded from a YAML or TOML file (format chosen by extension) with an
//! environment overlay, e.g. `HARNESS__BYBITAPI__APIKEY=...`.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

pub const ENV_PREFIX: &str = "HARNESS";

fn default_sandbox() -> bool {
    true
}

fn default_recv_window() -> u64 {
    5000
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("configuration has no '{0}' section")]
    MissingSection(&'static str),
}

// config 0.13 lowercases keys, so every camelCase name needs a lowercase
// rename with the camelCase spelling kept as an alias.

/// API key pair for one exchange.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiCredentials {
    #[serde(rename = "apikey", alias = "apiKey")]
    api_key: String,
    #[serde(rename = "secretkey", alias = "secretKey")]
    secret_key: String,
    /// Overrides the REST host, whatever the sandbox setting.
    #[serde(default)]
    url: Option<String>,
}

impl ApiCredentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .field("url", &self.url)
            .finish()
    }
}

/// Client behaviour for Bybit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BybitSettings {
    /// Use the testnet host.
    #[serde(default = "default_sandbox")]
    sandbox: bool,
    /// Milliseconds a signed request stays valid.
    #[serde(default = "default_recv_window")]
    recv_window: u64,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    /// Market used when a call omits its symbol.
    #[serde(default)]
    default_symbol: Option<String>,
}

impl Default for BybitSettings {
    fn default() -> Self {
        Self {
            sandbox: default_sandbox(),
            recv_window: default_recv_window(),
            timeout_secs: default_timeout_secs(),
            default_symbol: None,
        }
    }
}

impl BybitSettings {
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn with_default_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.default_symbol = Some(symbol.into());
        self
    }

    pub fn sandbox(&self) -> bool {
        self.sandbox
    }

    pub fn recv_window(&self) -> u64 {
        self.recv_window
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn default_symbol(&self) -> Option<&str> {
        self.default_symbol.as_deref()
    }
}

/// Top-level harness configuration, read from `config.yaml`.
///
/// Sections for other exchanges (`binanceApi`, `phemexApi`) may share the
/// file and are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default, rename = "bybitapi", alias = "bybitApi")]
    bybit_api: Option<ApiCredentials>,
    #[serde(default)]
    bybit: BybitSettings,
}

impl HarnessConfig {
    /// Reads `path`, then applies `HARNESS__*` environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn bybit_api(&self) -> Result<&ApiCredentials, ConfigError> {
        self.bybit_api
            .as_ref()
            .ok_or(ConfigError::MissingSection("bybitApi"))
    }

    pub fn bybit(&self) -> &BybitSettings {
        &self.bybit
    }

    pub fn bybit_mut(&mut self) -> &mut BybitSettings {
        &mut self.bybit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_yaml_ignores_other_exchanges() {
        let file = write_config(
            ".yaml",
            r#"
bybitApi:
  apiKey: "bybit-key"
  secretKey: "bybit-secret"
  url: "https://api-testnet.bybit.com"
phemexApi:
  apiKey: "phemex-key"
  secretKey: "phemex-secret"
"#,
        );

        let config = HarnessConfig::load(file.path()).unwrap();
        let bybit = config.bybit_api().unwrap();

        assert_eq!(bybit.api_key(), "bybit-key");
        assert_eq!(bybit.secret_key(), "bybit-secret");
        assert_eq!(bybit.url(), Some("https://api-testnet.bybit.com"));
    }

    #[test]
    fn test_bybit_settings_defaults() {
        let file = write_config(
            ".toml",
            r#"
[bybitApi]
apiKey = "k"
secretKey = "s"
"#,
        );

        let config = HarnessConfig::load(file.path()).unwrap();
        let settings = config.bybit();

        assert!(settings.sandbox());
        assert_eq!(settings.recv_window(), 5000);
        assert_eq!(settings.timeout_secs(), 10);
        assert_eq!(settings.default_symbol(), None);
    }

    #[test]
    fn test_bybit_settings_overrides() {
        let file = write_config(
            ".toml",
            r#"
[bybit]
sandbox = false
recv_window = 20000
default_symbol = "ETHUSDT"
"#,
        );

        let config = HarnessConfig::load(file.path()).unwrap();

        assert!(!config.bybit().sandbox());
        assert_eq!(config.bybit().recv_window(), 20000);
        assert_eq!(config.bybit().default_symbol(), Some("ETHUSDT"));
        assert!(matches!(
            config.bybit_api(),
            Err(ConfigError::MissingSection("bybitApi"))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = ApiCredentials::new("key", "very-secret");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("key"));
        assert!(!printed.contains("very-secret"));
    }
}
