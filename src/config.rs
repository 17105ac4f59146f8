//! Configuration for emote paths, Twitch credentials and fetching.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (EMOTES_DIR, TWITCH_CLIENT_ID, TWITCH_CLIENT_SECRET)
//! 2. Config file (.emotes/config.yaml, then <config dir>/emotes/config.yaml)
//! 3. Defaults (static/emotes, public Twitch endpoints)
//!
//! Config file discovery:
//! - Searches current directory and parents for .emotes/config.yaml
//! - Falls back to the user config directory
//!
//! The emote directory is kept relative to the working directory, the same
//! way the web server resolves `static/`.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

pub const ENV_EMOTES_DIR: &str = "EMOTES_DIR";
pub const ENV_CLIENT_ID: &str = "TWITCH_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "TWITCH_CLIENT_SECRET";

pub const DEFAULT_HELIX_URL: &str = "https://api.twitch.tv/helix";
pub const DEFAULT_EMOTE_API_URL: &str = "https://api.twitchemotes.com/api/v4";
pub const DEFAULT_CDN_URL: &str = "https://static-cdn.jtvnw.net/emoticons/v1/{id}/3.0";

/// Provider directory Twitch emotes are written to
pub const TWITCH_PROVIDER: &str = "twitch";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub twitch: Option<TwitchConfig>,
    #[serde(default)]
    pub fetch: Option<FetchConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Root of the emote tree
    pub emotes: Option<String>,
}

#[derive(Clone, Default, Deserialize)]
pub struct TwitchConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub helix_url: Option<String>,
    pub emote_api_url: Option<String>,
    pub cdn_url: Option<String>,
}

impl fmt::Debug for TwitchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitchConfig")
            .field("client_id", &self.client_id.as_deref().map(redacted))
            .field("client_secret", &self.client_secret.as_deref().map(redacted))
            .field("helix_url", &self.helix_url)
            .field("emote_api_url", &self.emote_api_url)
            .field("cdn_url", &self.cdn_url)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchConfig {
    /// Channels fetched when none are given on the command line
    #[serde(default)]
    pub channels: Vec<String>,
    /// Keep fetching other channels when one fails
    #[serde(default)]
    pub keep_going: bool,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Root of the emote tree
    pub emote_dir: PathBuf,
    /// Twitch settings
    pub twitch: TwitchSettings,
    /// Fetch settings
    pub fetch: FetchSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Twitch credentials and endpoints
#[derive(Clone)]
pub struct TwitchSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub helix_url: String,
    pub emote_api_url: String,
    /// Emote image URL template, `{id}` is replaced with the emote ID
    pub cdn_url: String,
}

impl Default for TwitchSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            helix_url: DEFAULT_HELIX_URL.to_string(),
            emote_api_url: DEFAULT_EMOTE_API_URL.to_string(),
            cdn_url: DEFAULT_CDN_URL.to_string(),
        }
    }
}

impl fmt::Debug for TwitchSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitchSettings")
            .field("client_id", &self.client_id.as_deref().map(redacted))
            .field("client_secret", &self.client_secret.as_deref().map(redacted))
            .field("helix_url", &self.helix_url)
            .field("emote_api_url", &self.emote_api_url)
            .field("cdn_url", &self.cdn_url)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FetchSettings {
    pub channels: Vec<String>,
    pub keep_going: bool,
}

fn redacted(_: &str) -> &'static str {
    "***"
}

/// Default emote directory (`static/emotes`)
pub fn default_emote_dir() -> PathBuf {
    Path::new("static").join("emotes")
}

/// Find config file by searching current directory and parents, then the
/// user config directory
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".emotes").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("emotes").join("config.yaml"))
        .filter(|path| path.exists())
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse YAML config content
pub fn parse_config(content: &str) -> Result<ConfigFile> {
    // An empty file is a valid (default) config
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Drop `.` components so paths look the same as the ones the web server sees
pub fn normalize_dir(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Merge a parsed config file with environment overrides and defaults
pub fn resolve_config<F>(file: Option<ConfigFile>, config_file: Option<PathBuf>, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    let file = file.unwrap_or_default();
    let twitch = file.twitch.unwrap_or_default();
    let fetch = file.fetch.unwrap_or_default();

    let emote_dir = env(ENV_EMOTES_DIR)
        .or(file.paths.emotes)
        .map(|dir| normalize_dir(Path::new(&dir)))
        .unwrap_or_else(default_emote_dir);

    let twitch = TwitchSettings {
        client_id: env(ENV_CLIENT_ID).or(twitch.client_id),
        client_secret: env(ENV_CLIENT_SECRET).or(twitch.client_secret),
        helix_url: twitch
            .helix_url
            .unwrap_or_else(|| DEFAULT_HELIX_URL.to_string()),
        emote_api_url: twitch
            .emote_api_url
            .unwrap_or_else(|| DEFAULT_EMOTE_API_URL.to_string()),
        cdn_url: twitch.cdn_url.unwrap_or_else(|| DEFAULT_CDN_URL.to_string()),
    };

    ResolvedConfig {
        emote_dir,
        twitch,
        fetch: FetchSettings {
            channels: fetch.channels,
            keep_going: fetch.keep_going,
        },
        config_file,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();

    let file = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    Ok(resolve_config(file, config_file, |key| {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the emote directory
pub fn emote_dir() -> Result<PathBuf> {
    Ok(config()?.emote_dir.clone())
}
