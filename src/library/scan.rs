//! Builds a [`Catalog`] from the emote directory tree.
//!
//! The tree is expected to look like `<root>/<provider>/<channel>/<code>.<ext>`.
//! Only two directory levels are walked; image files are looked up directly
//! inside each channel directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use thiserror::Error;

use super::catalog::{Catalog, EmoteMap};

/// Image extensions picked up in a channel directory, in precedence order
/// (a later extension overwrites an earlier one with the same code).
pub const EMOTE_EXTENSIONS: [&str; 2] = ["png", "gif"];

const STATIC_SEGMENT: &str = "static";
const SEPARATORS: [char; 2] = ['/', '\\'];

/// Errors from scanning a single channel directory
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid glob pattern for *.{extension} in {}: {source}", dir.display())]
    Pattern {
        extension: &'static str,
        dir: PathBuf,
        source: glob::PatternError,
    },

    #[error("unable to glob *.{extension} in {}: {source}", dir.display())]
    Glob {
        extension: &'static str,
        dir: PathBuf,
        source: glob::GlobError,
    },
}

/// Walk `root` and build a catalog of every provider, channel and emote in it.
///
/// Fails only when `root` itself cannot be read. Unreadable provider
/// directories stay in the catalog with no channels, and channels whose scan
/// fails are left out.
pub fn build(root: &Path) -> Result<Catalog> {
    let entries = fs::read_dir(root)
        .with_context(|| format!("could not open emote directory: {}", root.display()))?;

    let mut catalog = Catalog::new();
    let mut providers = Vec::new();

    for entry in entries {
        let entry = entry
            .with_context(|| format!("could not open emote directory: {}", root.display()))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        tracing::debug!("Found provider directory {}", name);
        catalog.add_provider(name.clone());
        providers.push((name, path));
    }

    for (provider, dir) in providers {
        load_channels(&mut catalog, &provider, &dir);
    }

    tracing::info!(
        "Loaded {} emotes from {} providers in {}",
        catalog.len(),
        catalog.provider_count(),
        root.display()
    );

    Ok(catalog)
}

/// Fill in the channels of one provider, logging anything that can't be read
fn load_channels(catalog: &mut Catalog, provider: &str, dir: &Path) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Error reading provider directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Error reading provider directory {}: {}", dir.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let channel = entry.file_name().to_string_lossy().into_owned();
        match scan_channel(&path) {
            Ok(emotes) => {
                tracing::debug!("{}/{}: {} emotes", provider, channel, emotes.len());
                catalog.set_channel(provider, channel, emotes);
            }
            Err(e) => {
                tracing::warn!("Error finding emotes in {}: {}", path.display(), e);
            }
        }
    }
}

/// Collect the emote images directly inside a channel directory.
///
/// PNG files are processed before GIF files, so a GIF wins when both exist
/// for the same code.
pub fn scan_channel(dir: &Path) -> Result<EmoteMap, ScanError> {
    let mut emotes = EmoteMap::new();

    for extension in EMOTE_EXTENSIONS {
        let files = glob_extension(dir, extension)?;
        tracing::trace!("{} *.{} files in {}", files.len(), extension, dir.display());

        for file in files {
            let (code, path) = parse_name(&file);
            emotes.insert(code, path);
        }
    }

    Ok(emotes)
}

fn glob_extension(dir: &Path, extension: &'static str) -> Result<Vec<PathBuf>, ScanError> {
    // Channel names may contain glob metacharacters
    let pattern = Path::new(&Pattern::escape(&dir.to_string_lossy()))
        .join(format!("*.{}", extension));

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let paths = glob::glob_with(&pattern.to_string_lossy(), options).map_err(|source| {
        ScanError::Pattern {
            extension,
            dir: dir.to_path_buf(),
            source,
        }
    })?;

    let mut files = paths
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| ScanError::Glob {
            extension,
            dir: dir.to_path_buf(),
            source,
        })?;

    files.retain(|f| f.is_file());
    files.sort();
    Ok(files)
}

/// Split an emote file path into its code and the path it is served under.
///
/// Leading `static` segments are stripped from the path (with or without a
/// leading separator of either style) so the result can be served from the
/// web root. The code is the file name without its extension.
pub fn parse_name(file: &Path) -> (String, String) {
    let full = file.to_string_lossy();
    let servable = strip_static(&full);

    let base = servable
        .rsplit(SEPARATORS)
        .next()
        .unwrap_or(servable);
    let code = match base.rfind('.') {
        Some(dot) => &base[..dot],
        None => base,
    };

    (code.to_string(), servable.to_string())
}

fn strip_static(path: &str) -> &str {
    let mut rest = path;
    loop {
        let unrooted = rest.strip_prefix(SEPARATORS).unwrap_or(rest);
        match unrooted.strip_prefix(STATIC_SEGMENT) {
            Some(after) if after.is_empty() || after.starts_with(SEPARATORS) => rest = after,
            _ => return rest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_name_strips_static() {
        let (code, path) = parse_name(Path::new("static/emotes/twitch/alice/pogchamp.png"));
        assert_eq!(code, "pogchamp");
        assert_eq!(path, "/emotes/twitch/alice/pogchamp.png");

        let (code, path) = parse_name(Path::new("/static/emotes/twitch/alice/wave.gif"));
        assert_eq!(code, "wave");
        assert_eq!(path, "/emotes/twitch/alice/wave.gif");

        let (_, path) = parse_name(Path::new("\\static\\emotes\\x.png"));
        assert_eq!(path, "\\emotes\\x.png");
    }

    #[test]
    fn test_parse_name_passes_through_other_paths() {
        let (code, path) = parse_name(Path::new("twitch/alice/pogchamp.png"));
        assert_eq!(code, "pogchamp");
        assert_eq!(path, "twitch/alice/pogchamp.png");

        let (_, path) = parse_name(Path::new("staticfiles/emotes/x.png"));
        assert_eq!(path, "staticfiles/emotes/x.png");

        let (_, path) = parse_name(Path::new("emotes/static/x.png"));
        assert_eq!(path, "emotes/static/x.png");
    }

    #[test]
    fn test_parse_name_is_idempotent() {
        for input in [
            "static/emotes/a.png",
            "/static/static/a.png",
            "static",
            "emotes/a.png",
            "./static/a.png",
        ] {
            let (code, once) = parse_name(Path::new(input));
            let (code_again, twice) = parse_name(Path::new(&once));
            assert_eq!(once, twice, "{}", input);
            assert_eq!(code, code_again, "{}", input);
        }
    }

    #[test]
    fn test_parse_name_only_drops_last_extension() {
        let (code, _) = parse_name(Path::new("twitch/alice/aliceCheer1.5.gif"));
        assert_eq!(code, "aliceCheer1.5");

        let (code, _) = parse_name(Path::new("twitch/alice/noext"));
        assert_eq!(code, "noext");
    }

    #[test]
    fn test_scan_channel_gif_wins_over_png() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::write(dir.join("foo.png"), b"png").unwrap();
        fs::write(dir.join("foo.gif"), b"gif").unwrap();
        fs::write(dir.join("bar.png"), b"png").unwrap();
        fs::write(dir.join("notes.txt"), b"text").unwrap();

        let emotes = scan_channel(dir).unwrap();

        assert_eq!(emotes.len(), 2);
        assert!(emotes["foo"].ends_with("foo.gif"));
        assert!(emotes["bar"].ends_with("bar.png"));
    }

    #[test]
    fn test_scan_channel_matches_metacharacters_literally() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("[weird]");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("pog.png"), b"png").unwrap();

        let emotes = scan_channel(&dir).unwrap();
        assert_eq!(emotes.len(), 1);
        assert!(emotes.contains_key("pog"));
    }

    #[test]
    fn test_scan_channel_ignores_hidden_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".png"), b"png").unwrap();

        assert!(scan_channel(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_provider_keeps_empty_entry() {
        let temp = TempDir::new().unwrap();
        let mut catalog = Catalog::new();
        catalog.add_provider("ghost");

        load_channels(&mut catalog, "ghost", &temp.path().join("ghost"));

        assert!(catalog.provider("ghost").unwrap().is_empty());
    }
}
