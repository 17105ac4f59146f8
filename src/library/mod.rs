//! Emote library: the on-disk tree and the catalog built from it.
//!
//! # Storage Layout
//!
//! ```text
//! static/
//! └── emotes/                     # root of the tree
//!     └── <provider>/             # e.g. "twitch"
//!         └── <channel>/          # channel login, "twitch" for global emotes
//!             ├── <code>.png      # channel emote
//!             └── <login>Cheer<tier>.gif
//! ```
//!
//! Emotes are served from the web root, so the leading `static` segment is
//! dropped from every path stored in the catalog.

pub mod catalog;
pub mod scan;
pub mod store;

pub use catalog::{Catalog, ChannelMap, EmoteMap, EmoteRef};
pub use scan::{build, parse_name, scan_channel, ScanError, EMOTE_EXTENSIONS};
pub use store::{CatalogReader, CatalogStore};
