//! Command-line interface for emotes.
//!
//! Provides commands for fetching emote assets from Twitch, inspecting the
//! catalog built from the emote directory, and showing the resolved
//! configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::TwitchClient;
use crate::config::{self, ResolvedConfig};
use crate::core::{EmoteFetcher, FetchPolicy};
use crate::library::{Catalog, CatalogStore};

/// emotes - Emote catalog loader and Twitch emote fetcher
#[derive(Parser, Debug)]
#[command(name = "emotes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emote directory (overrides EMOTES_DIR and the config file)
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download emotes for channels (plus the global emotes)
    Fetch {
        /// Channel logins (defaults to fetch.channels from the config file)
        channels: Vec<String>,

        /// Keep fetching other channels when one fails
        #[arg(short, long)]
        keep_going: bool,
    },

    /// List providers and channels in the emote directory
    List {
        /// Only show this provider
        #[arg(short, long)]
        provider: Option<String>,

        /// Only show this channel, with every emote in it
        #[arg(short, long)]
        channel: Option<String>,

        /// Print the catalog as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show where an emote code is served from
    Show {
        /// Emote code
        code: String,

        /// Only look in this provider
        #[arg(short, long)]
        provider: Option<String>,

        /// Only look in this channel
        #[arg(short, long)]
        channel: Option<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let cfg = config::config()?;
        let emote_dir = emote_dir_override(self.dir.as_deref(), cfg);

        match self.command {
            Commands::Fetch {
                channels,
                keep_going,
            } => fetch_emotes(cfg, &emote_dir, channels, keep_going).await,
            Commands::List {
                provider,
                channel,
                json,
            } => list_catalog(&emote_dir, provider.as_deref(), channel.as_deref(), json),
            Commands::Show {
                code,
                provider,
                channel,
            } => show_emote(&emote_dir, &code, provider.as_deref(), channel.as_deref()),
            Commands::Config => show_config(cfg, &emote_dir),
        }
    }
}

/// `--dir` wins over the configured directory and is normalized the same way
fn emote_dir_override(dir: Option<&Path>, cfg: &ResolvedConfig) -> PathBuf {
    dir.map(config::normalize_dir)
        .unwrap_or_else(|| cfg.emote_dir.clone())
}

/// Download emotes into the emote directory
async fn fetch_emotes(
    cfg: &ResolvedConfig,
    emote_dir: &Path,
    channels: Vec<String>,
    keep_going: bool,
) -> Result<()> {
    let channels = if channels.is_empty() {
        cfg.fetch.channels.clone()
    } else {
        channels
    };
    let policy = FetchPolicy::from_keep_going(keep_going || cfg.fetch.keep_going);

    let client = TwitchClient::from_settings(&cfg.twitch)?;
    let fetcher = EmoteFetcher::new(client, emote_dir).with_policy(policy);

    let report = fetcher
        .fetch_all(&channels)
        .await
        .context("Failed to fetch emotes")?;

    println!(
        "Fetched {} channels into {}: {} emotes, {} cheers ({} skipped)",
        report.channels,
        emote_dir.display(),
        report.emotes_written,
        report.cheers_written,
        report.skipped_codes
    );

    if !report.is_complete() {
        eprintln!("\nFailed channels:");
        for failure in &report.failures {
            eprintln!("  {}: {}", failure.login, failure.error);
        }
        anyhow::bail!("{} channels failed", report.failures.len());
    }

    Ok(())
}

/// Load the catalog from the emote directory
fn load_catalog(emote_dir: &Path) -> Result<Arc<Catalog>> {
    CatalogStore::new(emote_dir).load()
}

/// List providers, channels and emote counts
fn list_catalog(
    emote_dir: &Path,
    provider: Option<&str>,
    channel: Option<&str>,
    json: bool,
) -> Result<()> {
    let loaded = load_catalog(emote_dir)?;
    let filtered;
    let catalog: &Catalog = if provider.is_some() || channel.is_some() {
        filtered = filter_catalog(&loaded, provider, channel);
        &filtered
    } else {
        &loaded
    };

    if json {
        println!("{}", serde_json::to_string_pretty(catalog)?);
        return Ok(());
    }

    if catalog.provider_count() == 0 {
        println!(
            "No emotes found in {}. Use 'emotes fetch <channel>' to download some.",
            emote_dir.display()
        );
        return Ok(());
    }

    for name in catalog.providers() {
        println!("{}", name);
        let Some(channels) = catalog.provider(name) else {
            continue;
        };

        for (channel_name, emotes) in channels {
            println!("  {:<30} {:>6} emotes", channel_name, emotes.len());
            if channel.is_some() {
                for (code, path) in emotes {
                    println!("    {:<28} {}", code, path);
                }
            }
        }
    }

    println!("\nTotal: {} emotes", catalog.len());

    Ok(())
}

/// Keep only the requested provider and/or channel
fn filter_catalog(catalog: &Catalog, provider: Option<&str>, channel: Option<&str>) -> Catalog {
    let mut filtered = Catalog::new();

    for name in catalog.providers() {
        if provider.is_some_and(|p| p != name) {
            continue;
        }
        let Some(channels) = catalog.provider(name) else {
            continue;
        };

        if channel.is_none() {
            filtered.add_provider(name);
        }
        for (channel_name, emotes) in channels {
            if channel.is_some_and(|c| c != channel_name.as_str()) {
                continue;
            }
            filtered.set_channel(name, channel_name.as_str(), emotes.clone());
        }
    }

    filtered
}

/// Print every path an emote code is registered under
fn show_emote(
    emote_dir: &Path,
    code: &str,
    provider: Option<&str>,
    channel: Option<&str>,
) -> Result<()> {
    let catalog = load_catalog(emote_dir)?;

    let found: Vec<_> = catalog
        .find(code)
        .into_iter()
        .filter(|e| provider.map_or(true, |p| p == e.provider))
        .filter(|e| channel.map_or(true, |c| c == e.channel))
        .collect();

    if found.is_empty() {
        anyhow::bail!("No emote named '{}' in {}", code, emote_dir.display());
    }

    for emote in found {
        println!("{}/{}: {}", emote.provider, emote.channel, emote.path);
    }

    Ok(())
}

/// Show resolved configuration
fn show_config(cfg: &ResolvedConfig, emote_dir: &Path) -> Result<()> {
    let set_or_missing = |value: &Option<String>| {
        if value.as_deref().is_some_and(|v| !v.is_empty()) {
            "(set)"
        } else {
            "(missing)"
        }
    };

    println!("Emotes Configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Emotes: {}", emote_dir.display());
    println!();
    println!("Twitch:");
    println!("  Client ID:     {}", set_or_missing(&cfg.twitch.client_id));
    println!("  Client secret: {}", set_or_missing(&cfg.twitch.client_secret));
    println!("  Helix API:     {}", cfg.twitch.helix_url);
    println!("  Emote API:     {}", cfg.twitch.emote_api_url);
    println!("  CDN:           {}", cfg.twitch.cdn_url);
    println!();
    println!("Fetch:");
    if cfg.fetch.channels.is_empty() {
        println!("  Channels:   (none)");
    } else {
        println!("  Channels:   {}", cfg.fetch.channels.join(", "));
    }
    println!("  Keep going: {}", cfg.fetch.keep_going);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert("twitch", "alice", "pog", "twitch/alice/pog.png");
        catalog.insert("twitch", "bob", "wave", "twitch/bob/wave.png");
        catalog.insert("discord", "alice", "blob", "discord/alice/blob.png");
        catalog
    }

    #[test]
    fn test_filter_by_provider() {
        let filtered = filter_catalog(&sample(), Some("twitch"), None);
        assert_eq!(filtered.provider_count(), 1);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_by_channel() {
        let filtered = filter_catalog(&sample(), None, Some("alice"));
        assert_eq!(filtered.provider_count(), 2);
        assert!(filtered.channel("twitch", "bob").is_none());
        assert_eq!(filtered.get("discord", "alice", "blob"), Some("discord/alice/blob.png"));
    }

    #[test]
    fn test_dir_override_is_normalized() {
        let cfg = config::resolve_config(None, None, |_| None);

        let dir = emote_dir_override(Some(Path::new("./public/emotes/")), &cfg);
        assert_eq!(dir, PathBuf::from("public/emotes"));

        assert_eq!(emote_dir_override(Some(Path::new(".")), &cfg), PathBuf::from("."));
        assert_eq!(emote_dir_override(None, &cfg), cfg.emote_dir);
    }

    #[test]
    fn test_cli_parses_fetch() {
        let cli = Cli::parse_from(["emotes", "fetch", "alice", "bob", "--keep-going"]);
        match cli.command {
            Commands::Fetch {
                channels,
                keep_going,
            } => {
                assert_eq!(channels, vec!["alice", "bob"]);
                assert!(keep_going);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
