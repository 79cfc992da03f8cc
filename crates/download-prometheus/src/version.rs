//! Picking the newest released tile out of a bucket listing.

use regex::Regex;
use semver::Version;
use std::cmp::Ordering;

use crate::error::VersionError;

/// File extension of a published tile.
pub const TILE_EXTENSION: &str = "pivotal";

/// The newest released tile found in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestTile {
    /// Parsed version, used for ordering.
    pub version: Version,
    /// Version text exactly as it appears in the file name.
    pub raw: String,
    /// Object key the version came from.
    pub key: String,
}

impl LatestTile {
    /// Object name of this tile: `<label>-<raw>.pivotal`.
    #[must_use]
    pub fn file_name(&self, label: &str) -> String {
        tile_file_name(label, &self.raw)
    }

    /// Version text for messages, without a leading `v`.
    #[must_use]
    pub fn display_version(&self) -> &str {
        self.raw.strip_prefix('v').unwrap_or(&self.raw)
    }
}

/// `<label>-<version>.pivotal`.
#[must_use]
pub fn tile_file_name(label: &str, version: &str) -> String {
    format!("{label}-{version}.{TILE_EXTENSION}")
}

/// Find the highest released version among `keys` for the product `label`.
///
/// A key matches when it ends in `<label>-<version>.pivotal`. Keys whose
/// version does not parse, or carries a pre-release tag, are skipped, and so
/// is `0.0.0`. On ties the first key wins.
///
/// # Errors
///
/// Returns [`VersionError::NoReleases`] when no key holds a released version.
pub fn find_latest<'a, I>(keys: I, label: &str) -> Result<LatestTile, VersionError>
where
    I: IntoIterator<Item = &'a str>,
{
    let pattern = tile_pattern(label)?;
    let floor = Version::new(0, 0, 0);
    let mut latest: Option<LatestTile> = None;

    for key in keys {
        let Some(caps) = pattern.captures(key) else {
            continue;
        };
        let raw = &caps[1];
        let Some(version) = parse_version(raw) else {
            continue;
        };
        if !version.pre.is_empty() {
            continue;
        }

        let best = latest.as_ref().map_or(&floor, |best| &best.version);
        let newer = version.cmp_precedence(best) == Ordering::Greater;
        if newer {
            latest = Some(LatestTile {
                version,
                raw: raw.to_string(),
                key: key.to_string(),
            });
        }
    }

    latest.ok_or_else(|| VersionError::NoReleases(label.to_string()))
}

/// Parse a tile version leniently.
///
/// Accepts an optional leading `v` and one to three numeric components,
/// padding missing minor/patch components with zero, so `1.2` reads as
/// `1.2.0` and `v2` as `2.0.0`. Pre-release and build metadata suffixes are
/// kept.
#[must_use]
pub fn parse_version(text: &str) -> Option<Version> {
    let text = text.strip_prefix('v').unwrap_or(text);

    let core_end = text.find(['-', '+']).unwrap_or(text.len());
    let (core, suffix) = text.split_at(core_end);

    let components: Vec<&str> = core.split('.').collect();
    if components.is_empty()
        || components.len() > 3
        || components
            .iter()
            .any(|c| c.is_empty() || !c.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let mut padded: Vec<String> = components
        .iter()
        .map(|c| match c.trim_start_matches('0') {
            "" => "0".to_string(),
            trimmed => trimmed.to_string(),
        })
        .collect();
    padded.resize(3, "0".to_string());

    Version::parse(&format!("{}{suffix}", padded.join("."))).ok()
}

fn tile_pattern(label: &str) -> Result<Regex, VersionError> {
    let pattern = format!(
        r"(?:^|/){}-(.+)\.{TILE_EXTENSION}$",
        regex::escape(label)
    );
    Regex::new(&pattern).map_err(|e| VersionError::Pattern(e.to_string()))
}
