//! Domain types shared by the catalog and the fetcher.
//!
//! - Emote records: users, emotes and cheer tiers returned by the platform
//! - Fetch reports: what a fetch run wrote, skipped and failed on

pub mod emote;
pub mod report;

pub use emote::{
    cheer_file_name, ChannelEmotes, CheerTiers, EmoteInfo, TwitchUser, CHEER_SIZE,
    DISALLOWED_CODE_CHARS,
};
pub use report::{ChannelFailure, FetchReport};
