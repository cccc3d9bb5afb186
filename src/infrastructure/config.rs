use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use config::{ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::{
    domain::post::Visibility,
    model::pagination::EndOfFeedPolicy,
    utils::{self, paths::PROJECT_NAME},
};

const CONFIG: &str = include_str!("../../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

/// Where the HTTP services live
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub blog_url: String,
    pub assistant_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            blog_url: String::from("http://127.0.0.1:8000"),
            assistant_url: String::from("http://127.0.0.1:8001"),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub page_size: usize,
    /// `None` lists every visibility the server is willing to return
    pub visibility: Option<Visibility>,
    pub end_of_feed: EndOfFeedPolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            visibility: Some(Visibility::Public),
            end_of_feed: EndOfFeedPolicy::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssistantConfig {
    /// Number of documents retrieved for each question
    pub top_k: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

impl Config {
    /// Load the configuration from the usual locations
    ///
    /// Layers, later ones winning: the bundled defaults, `config.{json5,json,yaml,toml,ini}` in
    /// the config directory (all optional), then `INKFEED__SECTION__KEY` environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(
            &utils::get_data_dir(),
            &utils::get_config_dir(),
            environment(),
        )
    }

    pub fn load(
        data_dir: &Path,
        config_dir: &Path,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().as_ref())?
            .set_default("_config_dir", config_dir.to_string_lossy().as_ref())?
            .add_source(File::from_str(CONFIG, FileFormat::Json5));

        let config_files = [
            ("config.json5", FileFormat::Json5),
            ("config.json", FileFormat::Json),
            ("config.yaml", FileFormat::Yaml),
            ("config.toml", FileFormat::Toml),
            ("config.ini", FileFormat::Ini),
        ];
        for (file, format) in &config_files {
            let path = config_dir.join(file);
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
            }
            builder = builder.add_source(File::from(path).format(*format).required(false));
        }

        let cfg: Self = builder.add_source(environment).build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.page_size == 0 {
            return Err(ConfigError::Message(String::from(
                "feed.page_size must be at least 1",
            )));
        }
        if self.assistant.top_k == 0 {
            return Err(ConfigError::Message(String::from(
                "assistant.top_k must be at least 1",
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Message(String::from(
                "api.timeout_secs must be at least 1",
            )));
        }
        Ok(())
    }
}

/// `INKFEED__API__BLOG_URL=...` style overrides
pub fn environment() -> Environment {
    Environment::with_prefix(PROJECT_NAME.as_str())
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
