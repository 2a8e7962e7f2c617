use crate::constants;
use crate::error::ConfigError;
use crate::types::Intent;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Router configuration. Priority: environment > config file > defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub classifier: ClassifierConfig,
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Gateway listen address (e.g., "127.0.0.1:8000")
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: constants::DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Static bearer credential sent to the provider.
    pub api_key: String,
    pub company_url: String,
    pub person_url: String,
    pub job_url: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            company_url: constants::DEFAULT_COMPANY_URL.to_string(),
            person_url: constants::DEFAULT_PERSON_URL.to_string(),
            job_url: constants::DEFAULT_JOB_URL.to_string(),
            timeout_secs: constants::DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }
}

impl ProviderConfig {
    /// Provider endpoint serving an intent.
    pub fn endpoint(&self, intent: Intent) -> &str {
        match intent {
            Intent::Company => &self.company_url,
            Intent::Person => &self.person_url,
            Intent::Job => &self.job_url,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// Generative model served by Ollama.
    #[default]
    Ollama,
    /// Offline keyword rules.
    Rules,
}

impl std::str::FromStr for ClassifierBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "rules" => Ok(Self::Rules),
            other => Err(ConfigError::Invalid(format!(
                "unknown classifier backend {:?} (expected ollama or rules)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub backend: ClassifierBackend,
    /// Ollama base URL (e.g., "http://localhost:11434")
    pub ollama_base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::default(),
            ollama_base_url: constants::DEFAULT_OLLAMA_URL.to_string(),
            model: constants::DEFAULT_MODEL.to_string(),
            timeout_secs: constants::DEFAULT_CLASSIFIER_TIMEOUT_SECS,
        }
    }
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL tool adapters use to reach the gateway service.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_GATEWAY_URL.to_string(),
            timeout_secs: constants::DEFAULT_GATEWAY_TIMEOUT_SECS,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load from an explicit file, else the user config file when present,
    /// else defaults; then apply process environment overrides.
    pub fn load_with_file(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(config_file, default_config_path(), |key| {
            std::env::var(key).ok()
        })
    }

    /// [`Config::load_with_file`] with the default file location and the
    /// environment supplied by the caller.
    pub fn load_from<F>(
        config_file: Option<&Path>,
        default_file: Option<PathBuf>,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match default_file.filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("PROSPECT_LISTEN_ADDR") {
            self.server.listen_addr = v;
        }

        if let Some(v) = get("PROSPECT_PROVIDER_API_KEY").or_else(|| get("PROXYCURL_API_KEY")) {
            self.provider.api_key = v;
        }
        if let Some(v) = get("PROSPECT_PROVIDER_COMPANY_URL") {
            self.provider.company_url = v;
        }
        if let Some(v) = get("PROSPECT_PROVIDER_PERSON_URL") {
            self.provider.person_url = v;
        }
        if let Some(v) = get("PROSPECT_PROVIDER_JOB_URL") {
            self.provider.job_url = v;
        }
        if let Some(v) = get("PROSPECT_PROVIDER_TIMEOUT_SECS") {
            self.provider.timeout_secs = parse_secs("PROSPECT_PROVIDER_TIMEOUT_SECS", &v)?;
        }

        if let Some(v) = get("PROSPECT_CLASSIFIER_BACKEND") {
            self.classifier.backend = v.parse()?;
        }
        if let Some(v) = get("OLLAMA_BASE_URL") {
            self.classifier.ollama_base_url = v;
        }
        if let Some(v) = get("PROSPECT_CLASSIFIER_MODEL") {
            self.classifier.model = v;
        }
        if let Some(v) = get("PROSPECT_CLASSIFIER_TIMEOUT_SECS") {
            self.classifier.timeout_secs = parse_secs("PROSPECT_CLASSIFIER_TIMEOUT_SECS", &v)?;
        }

        if let Some(v) = get("PROSPECT_GATEWAY_URL") {
            self.gateway.base_url = v;
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.listen_addr.parse().map_err(|e| {
            ConfigError::Invalid(format!(
                "server.listen_addr {:?}: {}",
                self.server.listen_addr, e
            ))
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        let urls = [
            ("provider.company_url", &self.provider.company_url),
            ("provider.person_url", &self.provider.person_url),
            ("provider.job_url", &self.provider.job_url),
            ("classifier.ollama_base_url", &self.classifier.ollama_base_url),
            ("gateway.base_url", &self.gateway.base_url),
        ];
        for (field, value) in urls {
            let parsed = url::Url::parse(value)
                .map_err(|e| ConfigError::Invalid(format!("{} {:?}: {}", field, value, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid(format!(
                    "{} must be an http(s) URL, got {:?}",
                    field, value
                )));
            }
        }

        let timeouts = [
            ("provider.timeout_secs", self.provider.timeout_secs),
            ("classifier.timeout_secs", self.classifier.timeout_secs),
            ("gateway.timeout_secs", self.gateway.timeout_secs),
        ];
        for (field, secs) in timeouts {
            if secs == 0 {
                return Err(ConfigError::Invalid(format!("{} must be non-zero", field)));
            }
        }

        if self.provider.api_key.is_empty() {
            warn!("provider.api_key is empty; provider calls will be rejected");
        }
        Ok(())
    }
}

/// `$XDG_CONFIG_HOME/prospect/config.toml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| {
        d.join(constants::CONFIG_DIR_NAME)
            .join(constants::CONFIG_FILE_NAME)
    })
}

fn parse_secs(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} must be a number of seconds, got {:?}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.server.listen_addr, "127.0.0.1:8000");
        assert_eq!(config.classifier.backend, ClassifierBackend::Ollama);
        assert_eq!(config.classifier.model, "deepseek-r1:14b");
        assert!(config.provider.api_key.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn endpoint_per_intent() {
        let provider = ProviderConfig::default();
        assert!(provider.endpoint(Intent::Company).ends_with("/search/company"));
        assert!(provider.endpoint(Intent::Person).ends_with("/search/person"));
        assert!(provider.endpoint(Intent::Job).ends_with("/company/job"));
    }

    #[test]
    fn file_values_override_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[provider]
api_key = "file-key"
timeout_secs = 5

[classifier]
backend = "rules"
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.provider.api_key, "file-key");
        assert_eq!(config.provider.timeout_secs, 5);
        assert_eq!(config.classifier.backend, ClassifierBackend::Rules);
        // untouched sections keep their defaults
        assert_eq!(config.provider.company_url, constants::DEFAULT_COMPANY_URL);
        assert_eq!(config.gateway.base_url, constants::DEFAULT_GATEWAY_URL);
    }

    #[test]
    fn load_prefers_explicit_file_then_default_file_then_env() {
        let tmp = tempfile::tempdir().unwrap();
        let explicit = tmp.path().join("explicit.toml");
        let default = tmp.path().join("default.toml");
        std::fs::write(&explicit, "[provider]\napi_key = \"explicit-key\"\n").unwrap();
        std::fs::write(
            &default,
            "[provider]\napi_key = \"default-key\"\ntimeout_secs = 7\n",
        )
        .unwrap();

        let config =
            Config::load_from(Some(&explicit), Some(default.clone()), env(&[])).unwrap();
        assert_eq!(config.provider.api_key, "explicit-key");
        assert_eq!(config.provider.timeout_secs, constants::DEFAULT_PROVIDER_TIMEOUT_SECS);

        let config = Config::load_from(None, Some(default.clone()), env(&[])).unwrap();
        assert_eq!(config.provider.api_key, "default-key");
        assert_eq!(config.provider.timeout_secs, 7);

        let config = Config::load_from(
            None,
            Some(default),
            env(&[("PROSPECT_PROVIDER_API_KEY", "env-key")]),
        )
        .unwrap();
        assert_eq!(config.provider.api_key, "env-key");
        assert_eq!(config.provider.timeout_secs, 7);

        let config =
            Config::load_from(None, Some(tmp.path().join("absent.toml")), env(&[])).unwrap();
        assert_eq!(config.provider.api_key, Config::default().provider.api_key);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::from_file(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[provider\napi_key = 1").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::default();
        config.provider.api_key = "file-key".into();
        config
            .apply_env(env(&[
                ("PROSPECT_PROVIDER_API_KEY", "env-key"),
                ("PROSPECT_LISTEN_ADDR", "0.0.0.0:9000"),
                ("OLLAMA_BASE_URL", "http://gpu-box:11434"),
                ("PROSPECT_CLASSIFIER_BACKEND", "RULES"),
                ("PROSPECT_PROVIDER_TIMEOUT_SECS", "7"),
            ]))
            .unwrap();
        assert_eq!(config.provider.api_key, "env-key");
        assert_eq!(config.server.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.classifier.ollama_base_url, "http://gpu-box:11434");
        assert_eq!(config.classifier.backend, ClassifierBackend::Rules);
        assert_eq!(config.provider.timeout_secs, 7);
    }

    #[test]
    fn legacy_api_key_variable_is_honoured() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("PROXYCURL_API_KEY", "legacy")]))
            .unwrap();
        assert_eq!(config.provider.api_key, "legacy");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("PROSPECT_LISTEN_ADDR", "  ")]))
            .unwrap();
        assert_eq!(config.server.listen_addr, constants::DEFAULT_LISTEN_ADDR);
    }

    #[test]
    fn bad_env_values_are_rejected() {
        let mut config = Config::default();
        assert!(
            config
                .apply_env(env(&[("PROSPECT_PROVIDER_TIMEOUT_SECS", "soon")]))
                .is_err()
        );
        assert!(
            config
                .apply_env(env(&[("PROSPECT_CLASSIFIER_BACKEND", "oracle")]))
                .is_err()
        );
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.server.listen_addr = "not-an-addr".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.provider.job_url = "ftp://example.com/jobs".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.gateway.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
