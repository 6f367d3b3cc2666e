use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, path::PathBuf};
use tripweave_gemini::GeminiClientConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,
    pub endpoint: String,
    pub text_model: String,
    pub planner_model: String,
    pub image_model: String,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn client_config(&self) -> GeminiClientConfig {
        GeminiClientConfig {
            api_key: self.api_key.to_owned(),
            endpoint: self.endpoint.to_owned(),
            text_model: self.text_model.to_owned(),
            planner_model: self.planner_model.to_owned(),
            image_model: self.image_model.to_owned(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Where itineraries and rendered maps are written
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy variables (GEMINI_API_KEY, API_KEY)
    /// 2. Environment variables (TRIPWEAVE__GEMINI__TEXT_MODEL, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let defaults = GeminiClientConfig::default();
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("gemini.endpoint", defaults.endpoint)?
            .set_default("gemini.text_model", defaults.text_model)?
            .set_default("gemini.planner_model", defaults.planner_model)?
            .set_default("gemini.image_model", defaults.image_model)?
            .set_default("gemini.timeout_secs", defaults.timeout_secs)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("TRIPWEAVE")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(api_key) = env::var("API_KEY") {
            builder = builder.set_override("gemini.api_key", api_key)?;
        }
        if let Ok(api_key) = env::var("GEMINI_API_KEY") {
            builder = builder.set_override("gemini.api_key", api_key)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.gemini.api_key.trim().is_empty() {
            return Err(
                "Gemini API key is missing, set GEMINI_API_KEY or gemini.api_key".to_string(),
            );
        }
        if self.gemini.timeout_secs == 0 {
            return Err("Gemini timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}
