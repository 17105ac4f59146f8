//! In-memory emote catalog.
//!
//! Three levels of string keys: provider → channel → code → servable path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Emote code → servable path for one channel
pub type EmoteMap = BTreeMap<String, String>;

/// Channel name → emotes for one provider
pub type ChannelMap = BTreeMap<String, EmoteMap>;

/// Catalog of every emote found on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    providers: BTreeMap<String, ChannelMap>,
}

/// A single catalog entry, borrowed from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmoteRef<'a> {
    pub provider: &'a str,
    pub channel: &'a str,
    pub code: &'a str,
    pub path: &'a str,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider with no channels (no-op if it already exists)
    pub fn add_provider(&mut self, provider: impl Into<String>) -> &mut ChannelMap {
        self.providers.entry(provider.into()).or_default()
    }

    /// Set the emotes of a channel, replacing whatever was there
    pub fn set_channel(
        &mut self,
        provider: impl Into<String>,
        channel: impl Into<String>,
        emotes: EmoteMap,
    ) {
        self.add_provider(provider).insert(channel.into(), emotes);
    }

    /// Insert one emote; a later insert with the same code overwrites the earlier one
    pub fn insert(
        &mut self,
        provider: impl Into<String>,
        channel: impl Into<String>,
        code: impl Into<String>,
        path: impl Into<String>,
    ) {
        self.add_provider(provider)
            .entry(channel.into())
            .or_default()
            .insert(code.into(), path.into());
    }

    /// Channels of a provider
    pub fn provider(&self, provider: &str) -> Option<&ChannelMap> {
        self.providers.get(provider)
    }

    /// Emotes of a channel
    pub fn channel(&self, provider: &str, channel: &str) -> Option<&EmoteMap> {
        self.provider(provider)?.get(channel)
    }

    /// Path of an emote in a specific channel
    pub fn get(&self, provider: &str, channel: &str, code: &str) -> Option<&str> {
        self.channel(provider, channel)?
            .get(code)
            .map(String::as_str)
    }

    /// Every entry registered under `code`, ordered by provider then channel
    pub fn find(&self, code: &str) -> Vec<EmoteRef<'_>> {
        self.iter().filter(|e| e.code == code).collect()
    }

    /// Provider names in order
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Iterate over every emote entry
    pub fn iter(&self) -> impl Iterator<Item = EmoteRef<'_>> {
        self.providers.iter().flat_map(|(provider, channels)| {
            channels.iter().flat_map(move |(channel, emotes)| {
                emotes.iter().map(move |(code, path)| EmoteRef {
                    provider,
                    channel,
                    code,
                    path,
                })
            })
        })
    }

    /// Number of providers
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Total number of emote entries across all channels
    pub fn len(&self) -> usize {
        self.providers
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    /// Check if the catalog holds no emotes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert("twitch", "alice", "pog", "/emotes/twitch/alice/pog.png");
        catalog.insert("twitch", "bob", "pog", "/emotes/twitch/bob/pog.gif");
        catalog.insert("twitch", "bob", "wave", "/emotes/twitch/bob/wave.png");
        catalog.add_provider("discord");
        catalog
    }

    #[test]
    fn test_catalog_get() {
        let catalog = sample();

        assert_eq!(
            catalog.get("twitch", "alice", "pog"),
            Some("/emotes/twitch/alice/pog.png")
        );
        assert_eq!(catalog.get("twitch", "alice", "wave"), None);
        assert_eq!(catalog.get("discord", "alice", "pog"), None);
        assert_eq!(catalog.get("missing", "alice", "pog"), None);
    }

    #[test]
    fn test_catalog_counts() {
        let catalog = sample();

        assert_eq!(catalog.provider_count(), 2);
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
        assert!(catalog.provider("discord").unwrap().is_empty());

        let providers: Vec<_> = catalog.providers().collect();
        assert_eq!(providers, vec!["discord", "twitch"]);
    }

    #[test]
    fn test_catalog_find_across_channels() {
        let catalog = sample();

        let found = catalog.find("pog");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].channel, "alice");
        assert_eq!(found[1].channel, "bob");
        assert_eq!(found[1].path, "/emotes/twitch/bob/pog.gif");

        assert!(catalog.find("nope").is_empty());
    }

    #[test]
    fn test_catalog_insert_overwrites_same_code() {
        let mut catalog = Catalog::new();
        catalog.insert("twitch", "alice", "pog", "first.png");
        catalog.insert("twitch", "alice", "pog", "second.gif");

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("twitch", "alice", "pog"), Some("second.gif"));
    }

    #[test]
    fn test_catalog_serializes_as_nested_maps() {
        let mut catalog = Catalog::new();
        catalog.insert("twitch", "alice", "pog", "twitch/alice/pog.png");

        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"twitch": {"alice": {"pog": "twitch/alice/pog.png"}}})
        );
    }
}
