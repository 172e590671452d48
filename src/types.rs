//! Data types for Spotify catalog metadata.
//!
//! This module contains the core data structures used throughout the crate:
//! artist, release and track metadata as returned by the catalog service,
//! plus the page type used while paginating a release listing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel used when a release year cannot be determined.
pub const UNKNOWN_YEAR: &str = "????";

/// Represents the artist whose catalog is being analyzed.
///
/// Resolved once per search selection and carried end-to-end as a structured
/// (id, name) pair; ids are never re-derived from rendered display text.
///
/// # Examples
///
/// ```rust
/// use unpop::Artist;
///
/// let artist = Artist {
///     id: "4UgQ3EFa8fEeaIEg54uV5b".to_string(),
///     name: "Electric Wizard".to_string(),
///     genres: vec!["doom metal".to_string(), "stoner rock".to_string()],
///     followers: 372_041,
///     url: "https://open.spotify.com/artist/4UgQ3EFa8fEeaIEg54uV5b".to_string(),
/// };
///
/// println!("{artist}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Opaque catalog identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Genre labels attached to the artist (may be empty)
    pub genres: Vec<String>,
    /// Follower count
    pub followers: u64,
    /// Canonical URL for the artist
    pub url: String,
}

impl Artist {
    /// The genre header line for exports: comma-joined, de-duplicated,
    /// sorted, or `"N/A"` when the service reports no genres.
    pub fn genre_line(&self) -> String {
        let mut genres: Vec<&str> = self.genres.iter().map(|g| g.as_str()).collect();
        genres.sort_unstable();
        genres.dedup();
        if genres.is_empty() {
            "N/A".to_string()
        } else {
            genres.join(", ")
        }
    }
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Release classification as reported by the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    Album,
    Single,
    Compilation,
    AppearsOn,
}

impl ReleaseType {
    /// The literal the remote API uses for this release type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Album => "album",
            ReleaseType::Single => "single",
            ReleaseType::Compilation => "compilation",
            ReleaseType::AppearsOn => "appears_on",
        }
    }

    /// Join a set of release types into the single comma-separated filter
    /// expression the release-listing endpoint expects.
    pub fn join(types: &[ReleaseType]) -> String {
        types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "album" => Ok(ReleaseType::Album),
            "single" => Ok(ReleaseType::Single),
            "compilation" => Ok(ReleaseType::Compilation),
            "appears_on" | "appears-on" => Ok(ReleaseType::AppearsOn),
            other => Err(format!("unknown release type: {other}")),
        }
    }
}

/// A release (album/single/compilation) enriched with popularity and year.
///
/// Collected in API discovery order; the collection is treated as an
/// unordered set for filtering and ranking purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Opaque catalog identifier
    pub id: String,
    /// Release title
    pub name: String,
    /// Popularity score in `[0, 100]`
    pub popularity: u8,
    /// Four-digit release year, or [`UNKNOWN_YEAR`]
    pub year: String,
    /// Raw release date as reported by the service ("unknown" on failure)
    pub release_date: String,
    /// Release classification
    pub release_type: ReleaseType,
    /// Canonical URL for the release
    pub url: String,
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [pop: {}]", self.name, self.year, self.popularity)
    }
}

/// A track scoped to exactly one release, enriched with popularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Opaque catalog identifier
    pub id: String,
    /// Track title
    pub name: String,
    /// Popularity score in `[0, 100]`
    pub popularity: u8,
    /// Track length in milliseconds, as listed on the release
    pub duration_ms: u32,
    /// Canonical URL for the track
    pub url: String,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [pop: {}]", self.name, self.popularity)
    }
}

/// Audio features for a track, from the batch audio-features endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    /// Estimated tempo in beats per minute
    pub tempo: f32,
    /// Musical positiveness, `0.0` to `1.0`
    pub valence: f32,
    /// Track length in milliseconds
    pub duration_ms: u32,
}

/// One row of a release listing before enrichment.
///
/// The listing endpoint does not carry popularity or a release date; those
/// come from the per-release detail lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseItem {
    /// Opaque catalog identifier
    pub id: String,
    /// Release title
    pub name: String,
    /// Release classification
    pub release_type: ReleaseType,
}

/// Represents one page of a paginated release listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasePage {
    /// The listing rows on this page
    pub items: Vec<ReleaseItem>,
    /// Offset this page was requested at
    pub offset: u32,
    /// Total number of items, if the service reported one
    pub total: Option<u32>,
}

/// Popularity and date detail for a single release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDetail {
    pub popularity: u8,
    pub release_date: String,
    pub url: String,
}

/// One row of a release's track listing before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackItem {
    pub id: String,
    pub name: String,
    pub duration_ms: u32,
    pub url: String,
}

/// Extract a four-digit year from a raw release date.
///
/// The service reports dates with year, year-month or year-month-day
/// precision. Anything that does not start with four digits degrades to
/// [`UNKNOWN_YEAR`].
pub fn year_from_release_date(release_date: &str) -> String {
    let year = release_date.split('-').next().unwrap_or("");
    if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
        year.to_string()
    } else {
        UNKNOWN_YEAR.to_string()
    }
}
