//! Adapter interfaces for the streaming platform.
//!
//! The fetcher only talks to the platform through [`EmoteSource`], so the
//! HTTP client can be swapped for an in-memory source in tests.

pub mod twitch;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ChannelEmotes, TwitchUser};

pub use twitch::TwitchClient;

/// Errors returned by an emote source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

/// Where emote metadata and images come from
#[async_trait]
pub trait EmoteSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Resolve login names to users.
    ///
    /// The result is not guaranteed to follow the order of `logins`, and
    /// unknown logins are simply missing from it.
    async fn lookup_users(&self, logins: &[String]) -> Result<Vec<TwitchUser>, SourceError>;

    /// Emote list and cheer tiers of a user
    async fn channel_emotes(&self, user_id: &str) -> Result<ChannelEmotes, SourceError>;

    /// Image bytes of an emote
    async fn download_emote(&self, emote_id: u64) -> Result<Vec<u8>, SourceError>;

    /// Image bytes at an arbitrary URL (cheer images)
    async fn download(&self, url: &str) -> Result<Vec<u8>, SourceError>;
}
