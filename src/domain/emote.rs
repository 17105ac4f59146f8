//! Remote emote records as returned by the platform APIs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Characters that make a code unsafe as a file name or URL path segment.
pub const DISALLOWED_CODE_CHARS: &[char] = &[':', ';', '\\', '[', ']', '|', '?', '&'];

/// Size label picked out of every cheer tier.
pub const CHEER_SIZE: &str = "4";

/// A platform user resolved from a login name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitchUser {
    #[serde(alias = "ID")]
    pub id: String,

    #[serde(alias = "Login")]
    pub login: String,
}

impl TwitchUser {
    pub fn new(id: impl Into<String>, login: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            login: login.into(),
        }
    }

    /// The sentinel entry standing in for platform-wide emotes
    pub fn global() -> Self {
        Self::new("0", "twitch")
    }
}

/// A single emote in a channel's emote list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmoteInfo {
    #[serde(alias = "ID")]
    pub id: u64,

    #[serde(alias = "Code")]
    pub code: String,
}

impl EmoteInfo {
    pub fn new(id: u64, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
        }
    }

    /// File name the emote is stored under, or `None` if the code is unsafe on disk
    pub fn file_name(&self) -> Option<String> {
        if self.code.contains(DISALLOWED_CODE_CHARS) {
            return None;
        }
        Some(format!("{}.png", self.code))
    }
}

/// Bonus tier → size label → image URL
pub type CheerTiers = HashMap<String, HashMap<String, String>>;

/// Everything the emote metadata API knows about one channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEmotes {
    #[serde(default, alias = "Emotes", deserialize_with = "null_as_empty")]
    pub emotes: Vec<EmoteInfo>,

    #[serde(default, alias = "Cheermotes", deserialize_with = "null_as_empty")]
    pub cheermotes: CheerTiers,
}

/// Name of the cheer image written for a tier, e.g. `aliceCheer100.gif`
pub fn cheer_file_name(login: &str, tier: &str) -> String {
    format!("{}Cheer{}.gif", login, tier)
}

// The API sends `null` instead of an empty list or map for channels
// without emotes or bits.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
