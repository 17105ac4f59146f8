//! Emote asset fetcher.
//!
//! Resolves channel logins to users, pulls each channel's emote and cheer
//! metadata, downloads the images and writes them into the emote tree the
//! catalog is built from. Everything runs one request at a time.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::adapters::EmoteSource;
use crate::config::TWITCH_PROVIDER;
use crate::domain::{cheer_file_name, ChannelFailure, FetchReport, TwitchUser, CHEER_SIZE};

/// Helix accepts at most this many `login` parameters per request
pub const MAX_LOGINS_PER_LOOKUP: usize = 100;

/// What to do when one channel fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Abort the whole fetch on the first failing channel
    #[default]
    FailFast,

    /// Record the failure and carry on with the next channel
    Isolate,
}

impl FetchPolicy {
    pub fn from_keep_going(keep_going: bool) -> Self {
        if keep_going {
            Self::Isolate
        } else {
            Self::FailFast
        }
    }
}

/// Downloads emote assets into `<root>/<provider>/<login>/`
pub struct EmoteFetcher<S> {
    source: S,
    root: PathBuf,
    provider: String,
    policy: FetchPolicy,
}

impl<S: EmoteSource> EmoteFetcher<S> {
    /// Create a fetcher writing Twitch emotes under `root`
    pub fn new(source: S, root: impl Into<PathBuf>) -> Self {
        Self {
            source,
            root: root.into(),
            provider: TWITCH_PROVIDER.to_string(),
            policy: FetchPolicy::default(),
        }
    }

    /// Set the failure policy
    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the provider directory name
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Get the emote source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Directory a channel's assets are written to
    pub fn channel_dir(&self, login: &str) -> PathBuf {
        self.root.join(&self.provider).join(login)
    }

    /// Fetch and store the emotes of every channel plus the global emotes.
    ///
    /// Existing files are overwritten. Under [`FetchPolicy::FailFast`] the
    /// first failing channel aborts the run; under [`FetchPolicy::Isolate`]
    /// failures are collected in the report.
    #[instrument(skip(self, channels), fields(source = self.source.name(), root = %self.root.display()))]
    pub async fn fetch_all(&self, channels: &[String]) -> Result<FetchReport> {
        let mut users = self.resolve_users(channels).await?;
        users.push(TwitchUser::global());

        let mut report = FetchReport::default();

        for user in &users {
            match self.fetch_channel(user, &mut report).await {
                Ok(()) => report.channels += 1,
                Err(e) => match self.policy {
                    FetchPolicy::FailFast => return Err(e),
                    FetchPolicy::Isolate => {
                        warn!(login = %user.login, "Channel fetch failed: {:#}", e);
                        report.failures.push(ChannelFailure {
                            login: user.login.clone(),
                            error: format!("{:#}", e),
                        });
                    }
                },
            }
        }

        info!(
            channels = report.channels,
            emotes = report.emotes_written,
            cheers = report.cheers_written,
            skipped = report.skipped_codes,
            failed = report.failures.len(),
            "Fetch finished"
        );

        Ok(report)
    }

    /// Resolve channel logins to users, in request order.
    ///
    /// Users are matched by login since the API does not keep request order.
    async fn resolve_users(&self, channels: &[String]) -> Result<Vec<TwitchUser>> {
        let mut logins: Vec<String> = Vec::with_capacity(channels.len());
        for name in channels {
            let login = name.trim().to_lowercase();
            if !login.is_empty() && !logins.contains(&login) {
                logins.push(login);
            }
        }

        let mut found = Vec::with_capacity(logins.len());
        for batch in logins.chunks(MAX_LOGINS_PER_LOOKUP) {
            let users = self
                .source
                .lookup_users(batch)
                .await
                .context("could not look up channel users")?;
            found.extend(users);
        }

        let mut users = Vec::with_capacity(logins.len() + 1);
        for login in &logins {
            match found.iter().find(|u| u.login.eq_ignore_ascii_case(login)) {
                Some(user) => users.push(user.clone()),
                None => warn!("No user found for channel {}", login),
            }
        }

        debug!("Resolved {} of {} channels", users.len(), logins.len());
        Ok(users)
    }

    async fn fetch_channel(&self, user: &TwitchUser, report: &mut FetchReport) -> Result<()> {
        if !is_safe_segment(&user.login) {
            anyhow::bail!("refusing to write emotes for login {:?}", user.login);
        }

        let channel = self
            .source
            .channel_emotes(&user.id)
            .await
            .with_context(|| format!("could not get emote data for \"{}\"", user.id))?;

        let dir = self.channel_dir(&user.login);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("could not create emote directory \"{}\"", dir.display()))?;

        info!(
            login = %user.login,
            emotes = channel.emotes.len(),
            cheers = channel.cheermotes.len(),
            "Fetching channel emotes"
        );

        for emote in &channel.emotes {
            let Some(file_name) = emote.file_name() else {
                debug!("Skipping emote with unsafe code {:?}", emote.code);
                report.skipped_codes += 1;
                continue;
            };

            let bytes = self
                .source
                .download_emote(emote.id)
                .await
                .with_context(|| format!("could not download emote {}", emote.code))?;
            write_asset(&dir.join(file_name), &bytes).await?;
            report.emotes_written += 1;
        }

        let mut tiers: Vec<_> = channel.cheermotes.iter().collect();
        tiers.sort_by(|a, b| a.0.cmp(b.0));

        for (tier, sizes) in tiers {
            let name = cheer_file_name(&user.login, tier);
            if !is_safe_segment(&name) {
                warn!("Skipping cheer tier with unsafe name {:?}", tier);
                continue;
            }

            let Some(url) = sizes.get(CHEER_SIZE) else {
                warn!("Cheer tier {} of {} has no size {} image", tier, user.login, CHEER_SIZE);
                continue;
            };

            let bytes = self
                .source
                .download(url)
                .await
                .with_context(|| format!("could not download emote {}", name))?;
            write_asset(&dir.join(&name), &bytes).await?;
            report.cheers_written += 1;
        }

        Ok(())
    }
}

/// Whether `name` can be used as a single path segment
fn is_safe_segment(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

async fn write_asset(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("could not create emote file in path \"{}\"", path.display()))?;
    debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
