//! Outcome of a fetch run.

use serde::Serialize;

/// A channel whose fetch failed while the run kept going
#[derive(Debug, Clone, Serialize)]
pub struct ChannelFailure {
    /// Login of the channel that failed
    pub login: String,

    /// Rendered error chain
    pub error: String,
}

/// Summary of a fetch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchReport {
    /// Channels whose assets were written (including the global channel)
    pub channels: usize,

    /// Emote images written to disk
    pub emotes_written: usize,

    /// Cheer tier images written to disk
    pub cheers_written: usize,

    /// Emotes skipped because their code is unsafe on disk
    pub skipped_codes: usize,

    /// Channels that failed (only populated when failures are isolated)
    pub failures: Vec<ChannelFailure>,
}

impl FetchReport {
    pub fn files_written(&self) -> usize {
        self.emotes_written + self.cheers_written
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
