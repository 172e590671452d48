//! Validated configuration for the analysis pipeline.
//!
//! Settings are validated once, when saved, never silently at use time: an
//! empty release-type set becomes `{album}` and out-of-range export counts
//! become the default, both with a warning log.

use crate::types::ReleaseType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction used when ranking releases and tracks by popularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Least popular first. The default: it is the *un*popularity analyzer.
    Ascending,
    /// Most popular first.
    Descending,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("ascending"),
            SortOrder::Descending => f.write_str("descending"),
        }
    }
}

/// How many items (releases, or tracks per release) to export.
///
/// Either a limit between 1 and 5, or `All`, mirroring the choices the
/// export-count menu offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportCount {
    /// Export up to this many items (1 to 5), clamped to availability.
    Limit(u8),
    /// Export everything available.
    All,
}

impl ExportCount {
    /// Default count used when nothing (or something invalid) is configured.
    pub const DEFAULT: ExportCount = ExportCount::Limit(3);

    /// Resolve the count against the number of available items.
    pub fn clamp_to(&self, available: usize) -> usize {
        match self {
            ExportCount::All => available,
            ExportCount::Limit(n) => (*n as usize).min(available),
        }
    }

    /// Whether the value is within the documented range.
    pub fn is_valid(&self) -> bool {
        match self {
            ExportCount::All => true,
            ExportCount::Limit(n) => (1..=5).contains(n),
        }
    }
}

impl FromStr for ExportCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(ExportCount::All);
        }
        match s.parse::<u8>() {
            Ok(n) if (1..=5).contains(&n) => Ok(ExportCount::Limit(n)),
            _ => Err(format!("export count must be 1-5 or 'all', got: {s}")),
        }
    }
}

impl fmt::Display for ExportCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportCount::All => f.write_str("all"),
            ExportCount::Limit(n) => write!(f, "{n}"),
        }
    }
}

/// Configuration consumed by the fetch/rank/export pipeline.
///
/// Construct with [`Settings::default`] or field syntax, then call
/// [`Settings::validated`] before handing it to a session. Validation
/// substitutes documented defaults instead of failing, so a configuration
/// is never empty or ambiguous downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Release types to include in the catalog fetch. Never empty after
    /// validation; an emptied set falls back to `{album}`.
    pub release_types: Vec<ReleaseType>,
    /// Canonical keyword tags to exclude by name. May legitimately be
    /// empty, which means no filtering.
    pub keyword_tags: Vec<String>,
    /// How many releases to export.
    pub export_releases: ExportCount,
    /// How many tracks per exported release.
    pub export_tracks: ExportCount,
    /// Ranking direction, applied to releases and tracks alike.
    pub sort_order: SortOrder,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            release_types: vec![ReleaseType::Album],
            keyword_tags: crate::filter::DEFAULT_TAGS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            export_releases: ExportCount::DEFAULT,
            export_tracks: ExportCount::DEFAULT,
            sort_order: SortOrder::Ascending,
        }
    }
}

impl Settings {
    /// Validate at save time, substituting documented defaults.
    ///
    /// - an empty release-type set becomes `{album}`
    /// - duplicate release types are collapsed
    /// - an out-of-range export count becomes [`ExportCount::DEFAULT`]
    ///
    /// Each substitution is logged at warn level so it is never silent.
    pub fn validated(mut self) -> Self {
        if self.release_types.is_empty() {
            log::warn!("empty release-type set, substituting default {{album}}");
            self.release_types = vec![ReleaseType::Album];
        }
        self.release_types.sort_unstable();
        self.release_types.dedup();

        if !self.export_releases.is_valid() {
            log::warn!(
                "invalid release export count {:?}, substituting {}",
                self.export_releases,
                ExportCount::DEFAULT
            );
            self.export_releases = ExportCount::DEFAULT;
        }
        if !self.export_tracks.is_valid() {
            log::warn!(
                "invalid track export count {:?}, substituting {}",
                self.export_tracks,
                ExportCount::DEFAULT
            );
            self.export_tracks = ExportCount::DEFAULT;
        }
        self
    }
}
