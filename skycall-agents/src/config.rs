use serde::Deserialize;
use skycall_llm_sdk::{models, openai::client::DEFAULT_BASE_URL};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_USER_AGENT: &str = concat!("skycall/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("OpenAI API key not found. Set OPENAI_API_KEY or 'openai_api_key' under [api_keys]")]
    MissingApiKey,

    #[error("{0}")]
    Invalid(String),
}

/// On-disk TOML layout
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api_keys: HashMap<String, toml::Value>,
    #[serde(default)]
    pub openai: OpenAISection,
    #[serde(default)]
    pub weather: WeatherSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenAISection {
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeatherSection {
    pub geocoding_base_url: Option<String>,
    pub forecast_base_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherConfig {
    pub geocoding_base_url: String,
    pub forecast_base_url: String,
    /// Sent on every geocoding request; the provider rejects anonymous clients
    pub user_agent: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_base_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_base_url: DEFAULT_FORECAST_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Everything the runners need, built once at startup and passed down
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub openai: OpenAIConfig,
    pub weather: WeatherConfig,
}

impl AppConfig {
    /// Merge defaults, an optional config file and an environment lookup.
    ///
    /// Environment values win over the file; empty values count as unset.
    pub fn resolve<F>(file: Option<FileConfig>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let file_key = file
            .api_keys
            .get("openai_api_key")
            .and_then(|v| v.as_str())
            .or_else(|| file.api_keys.get("OPENAI_API_KEY").and_then(|v| v.as_str()))
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let api_key = env("OPENAI_API_KEY")
            .or(file_key)
            .ok_or(ConfigError::MissingApiKey)?;

        let openai = OpenAIConfig {
            api_key,
            model: env("OPENAI_MODEL")
                .or(file.openai.model)
                .unwrap_or_else(|| models::openai::DEFAULT.to_string()),
            base_url: env("OPENAI_BASE_URL")
                .or(file.openai.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };

        let defaults = WeatherConfig::default();
        let weather = WeatherConfig {
            geocoding_base_url: env("SKYCALL_GEOCODING_URL")
                .or(file.weather.geocoding_base_url)
                .unwrap_or(defaults.geocoding_base_url),
            forecast_base_url: env("SKYCALL_FORECAST_URL")
                .or(file.weather.forecast_base_url)
                .unwrap_or(defaults.forecast_base_url),
            user_agent: env("SKYCALL_USER_AGENT")
                .or(file.weather.user_agent)
                .unwrap_or(defaults.user_agent),
        };

        Ok(Self { openai, weather })
    }
}

pub fn read_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Load `.env` into the process environment, then build the configuration
/// from the optional file and the environment.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match dotenvy::dotenv_override() {
        Ok(env_path) => tracing::debug!("Loaded environment from {}", env_path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => return Err(ConfigError::Invalid(format!("Failed to load .env: {}", e))),
    }

    let file = path.map(read_config_file).transpose()?;
    AppConfig::resolve(file, |key| std::env::var(key).ok())
}
