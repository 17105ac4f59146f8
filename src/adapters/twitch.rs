//! Twitch-backed emote source.
//!
//! Users are resolved through the Helix API, emote metadata comes from the
//! emote metadata API, and images are pulled from the emoticon CDN.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{EmoteSource, SourceError};
use crate::config::TwitchSettings;
use crate::domain::{ChannelEmotes, TwitchUser};

/// Placeholder for the emote ID in the CDN URL template
pub const CDN_ID_PLACEHOLDER: &str = "{id}";

/// Twitch API client
pub struct TwitchClient {
    client_id: String,
    client_secret: String,
    helix_url: String,
    emote_api_url: String,
    cdn_url: String,
    client: reqwest::Client,
}

/// Envelope of Helix responses
#[derive(Debug, Deserialize)]
struct HelixResponse<T> {
    data: Vec<T>,
}

impl TwitchClient {
    /// Create a client from the resolved settings.
    ///
    /// Fails if either credential is missing.
    pub fn from_settings(settings: &TwitchSettings) -> Result<Self> {
        let client_id = settings
            .client_id
            .clone()
            .filter(|s| !s.is_empty())
            .context("Twitch client ID is not set (set TWITCH_CLIENT_ID or twitch.client_id)")?;
        let client_secret = settings
            .client_secret
            .clone()
            .filter(|s| !s.is_empty())
            .context(
                "Twitch client secret is not set (set TWITCH_CLIENT_SECRET or twitch.client_secret)",
            )?;

        Ok(Self {
            client_id,
            client_secret,
            helix_url: settings.helix_url.trim_end_matches('/').to_string(),
            emote_api_url: settings.emote_api_url.trim_end_matches('/').to_string(),
            cdn_url: settings.cdn_url.clone(),
            client: reqwest::Client::new(),
        })
    }

    /// Build an API URL under the emote metadata API
    fn channel_url(&self, user_id: &str) -> String {
        format!("{}/channels/{}", self.emote_api_url, user_id)
    }

    /// Build the CDN URL of an emote image
    fn emote_url(&self, emote_id: u64) -> String {
        self.cdn_url
            .replace(CDN_ID_PLACEHOLDER, &emote_id.to_string())
    }

    async fn send(request: RequestBuilder) -> Result<Response, SourceError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, SourceError> {
        let response = Self::send(request).await?;
        let url = response.url().to_string();
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| SourceError::Decode { url, source })
    }
}

#[async_trait]
impl EmoteSource for TwitchClient {
    fn name(&self) -> &str {
        "twitch"
    }

    async fn lookup_users(&self, logins: &[String]) -> Result<Vec<TwitchUser>, SourceError> {
        let query: Vec<_> = logins.iter().map(|login| ("login", login)).collect();

        let request = self
            .client
            .get(format!("{}/users", self.helix_url))
            .query(&query)
            .header("Client-ID", &self.client_id)
            .bearer_auth(&self.client_secret);

        let response: HelixResponse<TwitchUser> = Self::get_json(request).await?;
        Ok(response.data)
    }

    async fn channel_emotes(&self, user_id: &str) -> Result<ChannelEmotes, SourceError> {
        Self::get_json(self.client.get(self.channel_url(user_id))).await
    }

    async fn download_emote(&self, emote_id: u64) -> Result<Vec<u8>, SourceError> {
        self.download(&self.emote_url(emote_id)).await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = Self::send(self.client.get(url)).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
