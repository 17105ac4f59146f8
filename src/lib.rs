//! emotes - Emote catalog loader and Twitch emote fetcher
//!
//! Keeps the emote images of a chat overlay on disk and loads them into a
//! lookup table keyed by provider, channel and emote code.
//!
//! # Architecture
//!
//! Two halves that only share the directory layout:
//! - The fetcher downloads channel emotes and cheer images into
//!   `<emote dir>/<provider>/<channel>/`
//! - The catalog store scans that tree and swaps the resulting catalog in
//!   as a whole, so readers never see a partial load
//!
//! # Modules
//!
//! - `adapters`: Platform integrations (Twitch)
//! - `core`: Fetch logic (EmoteFetcher)
//! - `domain`: Data structures (TwitchUser, EmoteInfo, FetchReport)
//! - `library`: Catalog, directory scan and catalog store
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Download emotes for two channels plus the global emotes
//! emotes fetch alice bob
//!
//! # Inspect what's on disk
//! emotes list --provider twitch
//! emotes show Kappa
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod library;

// Re-export main types at crate root for convenience
pub use adapters::{EmoteSource, SourceError, TwitchClient};
pub use crate::core::{EmoteFetcher, FetchPolicy};
pub use domain::{ChannelEmotes, EmoteInfo, FetchReport, TwitchUser};
pub use library::{Catalog, CatalogReader, CatalogStore};
