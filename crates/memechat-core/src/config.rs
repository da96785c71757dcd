use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{bail, Context, Result};
use chrono::TimeDelta;
use memechat_provider::GeminiConfig;
use serde::{Deserialize, Serialize};

use crate::media::MediaCatalog;

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

pub const MAIN_CONFIG_FILE: &str = "main.yaml";
pub const MEDIA_CONFIG_FILE: &str = "media.yaml";

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_true() -> bool {
    true
}

fn default_history_capacity() -> usize {
    200
}

fn default_session_gap_secs() -> i64 {
    300
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for every non-API path.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: Option<String>,
    /// When false, upstream failures other than malformed payloads are
    /// returned to the caller instead of being replaced by a mock reply.
    #[serde(default = "default_true")]
    pub fallback_to_mock: bool,
    #[serde(flatten)]
    pub gemini: GeminiConfig,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            fallback_to_mock: true,
            gemini: GeminiConfig::default(),
        }
    }
}

impl CompletionConfig {
    /// Usable key, if the service is enabled and a non-blank key is set.
    pub fn active_api_key(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
    #[serde(default = "default_session_gap_secs")]
    pub session_gap_secs: i64,
}

impl HistoryConfig {
    /// Inactivity gap between conversations, `None` unless positive and
    /// representable.
    pub fn session_gap(&self) -> Option<TimeDelta> {
        if self.session_gap_secs <= 0 {
            return None;
        }
        TimeDelta::try_seconds(self.session_gap_secs)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: default_history_capacity(),
            session_gap_secs: default_session_gap_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemechatConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Replace every `${NAME}` with the value of the environment variable
/// (empty when unset). An unterminated `${` is kept verbatim.
pub fn resolve_env_var(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find("${") {
        let (before, placeholder) = rest.split_at(start);
        output.push_str(before);

        let Some(end) = placeholder.find('}') else {
            output.push_str(placeholder);
            return output;
        };

        let name = &placeholder[2..end];
        output.push_str(&env::var(name).unwrap_or_default());
        rest = &placeholder[end + 1..];
    }

    output.push_str(rest);
    output
}

/// Load `<config_dir>/main.yaml`. A missing file yields the defaults.
pub fn load_config(config_dir: &Path) -> Result<MemechatConfig> {
    let path = config_dir.join(MAIN_CONFIG_FILE);
    let mut config = if path.is_file() {
        read_yaml_file::<MemechatConfig>(&path)?
    } else {
        tracing::debug!("no {} found, using defaults", path.display());
        MemechatConfig::default()
    };

    resolve_config_env(&mut config);
    validate_config(&config).with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(config)
}

fn validate_config(config: &MemechatConfig) -> Result<()> {
    if config.history.session_gap().is_none() {
        bail!(
            "history.session_gap_secs must be a positive number of seconds, got {}",
            config.history.session_gap_secs
        );
    }
    Ok(())
}

/// Load `<config_dir>/media.yaml` if present, otherwise the built-in tables.
pub fn load_media_catalog(config_dir: &Path) -> Result<MediaCatalog> {
    let path = config_dir.join(MEDIA_CONFIG_FILE);
    if !path.is_file() {
        return Ok(MediaCatalog::builtin());
    }

    let raw: BTreeMap<String, Vec<String>> = read_yaml_file(&path)?;
    MediaCatalog::from_map(raw).with_context(|| format!("invalid media catalog: {}", path.display()))
}

fn read_yaml_file<T>(path: &Path) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse yaml file: {}", path.display()))
}

fn resolve_config_env(config: &mut MemechatConfig) {
    config.server.host = resolve_env_var(&config.server.host);

    let completion = &mut config.completion;
    completion.gemini.base_url = resolve_env_var(&completion.gemini.base_url);
    completion.gemini.model = resolve_env_var(&completion.gemini.model);

    let configured = completion
        .api_key
        .as_deref()
        .map(resolve_env_var)
        .filter(|key| !key.trim().is_empty());
    completion.api_key = configured.or_else(|| env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()));
}
