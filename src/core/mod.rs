//! Core fetch logic.
//!
//! This module contains:
//! - Fetcher: resolves channels and writes their emote assets to disk

pub mod fetcher;

pub use fetcher::{EmoteFetcher, FetchPolicy, MAX_LOGINS_PER_LOOKUP};
