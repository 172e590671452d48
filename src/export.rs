//! Report assembly.
//!
//! The composer turns a fetched catalog into the final export document. Two
//! renditions cover the same facts: a flat plain-text report with a fixed
//! line grammar, and a structured key-value tree for machine consumption.
//! Given identical inputs (including the timestamp, which the caller
//! captures and passes in), the text report is byte-identical across runs.

use crate::fetcher::CatalogFetcher;
use crate::r#trait::CatalogClient;
use crate::ranking::rank;
use crate::settings::Settings;
use crate::types::{Artist, AudioFeatures, Release, Track};
use crate::{CatalogError, Result};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source label stamped into every text report header.
pub const SOURCE_LABEL: &str = "Spotify API";

/// Assembles export documents from ranked, filtered catalog data.
///
/// Track lists are re-fetched (and re-filtered) at export time rather than
/// read from any earlier fetch, so the exported tracks reflect the catalog
/// as it stands when the export runs.
pub struct ExportComposer<'a, C: CatalogClient + ?Sized> {
    fetcher: &'a CatalogFetcher<'a, C>,
    settings: &'a Settings,
}

impl<'a, C: CatalogClient + ?Sized> ExportComposer<'a, C> {
    pub fn new(fetcher: &'a CatalogFetcher<'a, C>, settings: &'a Settings) -> Self {
        Self { fetcher, settings }
    }

    /// Build the plain-text report as an ordered sequence of lines.
    ///
    /// Releases are ranked by popularity under the configured sort order and
    /// clamped to the configured export count; each exported release gets
    /// its own ranked, clamped track slice. A track-fetch failure for one
    /// release becomes an inline error line and the export continues with
    /// the next release.
    ///
    /// The caller supplies `exported_at` (normally `Local::now()`) so that a
    /// fixed timestamp reproduces the report byte for byte.
    pub async fn compose_report<Tz: TimeZone>(
        &self,
        artist: &Artist,
        releases: &[Release],
        exported_at: DateTime<Tz>,
    ) -> Vec<String>
    where
        Tz::Offset: fmt::Display,
    {
        let ranked = rank(releases, self.settings.sort_order);
        let count = self.settings.export_releases.clamp_to(ranked.len());

        let mut lines = Vec::new();
        lines.push(format!("Unpopularity Export for Artist: {}", artist.name));
        lines.push(format!(
            "Date/Time (Local): {}",
            exported_at.format("%Y-%m-%d %H:%M:%S %Z")
        ));
        lines.push(format!("Genres: {}", artist.genre_line()));
        lines.push(format!("Source: {SOURCE_LABEL}"));
        lines.push(String::new());

        for release in &ranked[..count] {
            lines.push(format!(
                "Album: {} ({}), Popularity: {}",
                release.name, release.year, release.popularity
            ));
            match self.fetcher.fetch_release_tracks(&release.id).await {
                Ok(tracks) => {
                    let ranked_tracks = rank(&tracks, self.settings.sort_order);
                    let track_count = self.settings.export_tracks.clamp_to(ranked_tracks.len());
                    for track in &ranked_tracks[..track_count] {
                        lines.push(format!(
                            "   Track: {}, Popularity: {}",
                            track.name, track.popularity
                        ));
                    }
                }
                Err(e) => {
                    // Partial-failure tolerant: annotate and move on.
                    log::warn!("track fetch failed for release '{}': {e}", release.name);
                    lines.push(format!("  Error fetching tracks: {e}"));
                }
            }
            lines.push(String::new());
        }

        lines
    }
}

/// Join report lines into the final file content.
pub fn render_report(lines: &[String]) -> String {
    lines.join("\n")
}

// =============================================================================
// Structured (key-value tree) export
// =============================================================================

/// Artist block of the structured export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistInfo {
    pub name: String,
    pub genres: Vec<String>,
    pub followers: u64,
    pub url: String,
}

/// One release entry of the structured export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumEntry {
    pub id: String,
    pub name: String,
    pub popularity: u8,
    pub release_date: String,
    pub url: String,
}

/// One track entry of the structured export.
///
/// `tempo` and `valence` are `null` when the service has no audio analysis
/// for the track; the facts that are known stay present either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub id: String,
    pub name: String,
    pub popularity: u8,
    pub duration: String,
    pub duration_ms: u32,
    pub url: String,
    pub tempo: Option<f32>,
    pub valence: Option<f32>,
}

/// The machine-consumable rendition of an export: the same facts as the
/// text report, as a key-value tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExport {
    pub artist_info: ArtistInfo,
    pub albums: Vec<AlbumEntry>,
    pub tracks: Vec<TrackEntry>,
}

impl RawExport {
    /// Assemble the tree from a resolved artist, the fetched release
    /// collection, and the currently selected release's tracks paired with
    /// their audio features (if any).
    pub fn assemble(
        artist: &Artist,
        releases: &[Release],
        tracks: &[(Track, Option<AudioFeatures>)],
    ) -> Self {
        RawExport {
            artist_info: ArtistInfo {
                name: artist.name.clone(),
                genres: artist.genres.clone(),
                followers: artist.followers,
                url: artist.url.clone(),
            },
            albums: releases
                .iter()
                .map(|r| AlbumEntry {
                    id: r.id.clone(),
                    name: r.name.clone(),
                    popularity: r.popularity,
                    release_date: r.release_date.clone(),
                    url: r.url.clone(),
                })
                .collect(),
            tracks: tracks
                .iter()
                .map(|(t, features)| TrackEntry {
                    id: t.id.clone(),
                    name: t.name.clone(),
                    popularity: t.popularity,
                    duration: format_duration(t.duration_ms),
                    duration_ms: t.duration_ms,
                    url: t.url.clone(),
                    tempo: features.as_ref().map(|f| f.tempo),
                    valence: features.as_ref().map(|f| f.valence),
                })
                .collect(),
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

/// Human-readable track length, minutes and zero-padded seconds.
pub fn format_duration(duration_ms: u32) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::KeywordFilterSet;
    use crate::settings::{ExportCount, SortOrder};
    use crate::types::{ReleaseDetail, ReleaseItem, ReleasePage, ReleaseType, TrackItem};
    use async_trait::async_trait;
    use chrono::FixedOffset;

    /// Stub catalog with one fixed track list, and one release id that
    /// always fails its track fetch.
    struct StubCatalog;

    const BROKEN_RELEASE: &str = "broken";

    #[async_trait(?Send)]
    impl CatalogClient for StubCatalog {
        async fn search_artists(&self, _query: &str, _limit: u32) -> crate::Result<Vec<Artist>> {
            unimplemented!()
        }

        async fn get_artist(&self, _artist_id: &str) -> crate::Result<Artist> {
            unimplemented!()
        }

        async fn get_artist_releases_page(
            &self,
            _artist_id: &str,
            _release_types: &[ReleaseType],
            _limit: u32,
            _offset: u32,
        ) -> crate::Result<ReleasePage> {
            unimplemented!()
        }

        async fn get_release_detail(&self, _release_id: &str) -> crate::Result<ReleaseDetail> {
            unimplemented!()
        }

        async fn get_release_tracks(
            &self,
            release_id: &str,
            _limit: u32,
        ) -> crate::Result<Vec<TrackItem>> {
            if release_id == BROKEN_RELEASE {
                return Err(CatalogError::Http("connection reset".to_string()));
            }
            Ok(vec![
                TrackItem {
                    id: "t1".to_string(),
                    name: "Funeralopolis".to_string(),
                    duration_ms: 521_000,
                    url: String::new(),
                },
                TrackItem {
                    id: "t2".to_string(),
                    name: "Vinum Sabbathi".to_string(),
                    duration_ms: 183_000,
                    url: String::new(),
                },
            ])
        }

        async fn get_track_popularity(&self, track_id: &str) -> crate::Result<u8> {
            Ok(match track_id {
                "t1" => 60,
                _ => 10,
            })
        }

        async fn get_audio_features(
            &self,
            _track_ids: &[String],
        ) -> crate::Result<Vec<Option<AudioFeatures>>> {
            unimplemented!()
        }
    }

    fn release(id: &str, name: &str, popularity: u8, year: &str) -> Release {
        Release {
            id: id.to_string(),
            name: name.to_string(),
            popularity,
            year: year.to_string(),
            release_date: format!("{year}-01-01"),
            release_type: ReleaseType::Album,
            url: String::new(),
        }
    }

    fn artist() -> Artist {
        Artist {
            id: "a1".to_string(),
            name: "Electric Wizard".to_string(),
            genres: vec!["stoner rock".to_string(), "doom metal".to_string()],
            followers: 372_041,
            url: "https://open.spotify.com/artist/a1".to_string(),
        }
    }

    fn fixed_timestamp() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, 17, 30, 0)
            .unwrap()
    }

    async fn compose(releases: &[Release], settings: &Settings) -> Vec<String> {
        let client = StubCatalog;
        let fetcher = CatalogFetcher::new(&client, KeywordFilterSet::expand(&[]));
        let composer = ExportComposer::new(&fetcher, settings);
        composer
            .compose_report(&artist(), releases, fixed_timestamp())
            .await
    }

    #[tokio::test]
    async fn header_grammar() {
        let settings = Settings::default().validated();
        let lines = compose(&[], &settings).await;
        assert_eq!(lines[0], "Unpopularity Export for Artist: Electric Wizard");
        assert_eq!(lines[1], "Date/Time (Local): 2024-03-01 17:30:00 +00:00");
        assert_eq!(lines[2], "Genres: doom metal, stoner rock");
        assert_eq!(lines[3], "Source: Spotify API");
        assert_eq!(lines[4], "");
    }

    #[tokio::test]
    async fn releases_ranked_ascending_and_clamped() {
        // Scenario A: [80, 20, 50] ascending exports the two lowest.
        let releases = vec![
            release("r1", "Loud One", 80, "1995"),
            release("r2", "Quiet One", 20, "1998"),
            release("r3", "Middle One", 50, "2000"),
        ];
        let settings = Settings {
            export_releases: ExportCount::Limit(2),
            export_tracks: ExportCount::Limit(1),
            sort_order: SortOrder::Ascending,
            ..Settings::default()
        }
        .validated();

        let lines = compose(&releases, &settings).await;
        let albums: Vec<&String> = lines.iter().filter(|l| l.starts_with("Album:")).collect();
        assert_eq!(albums.len(), 2);
        assert_eq!(albums[0], "Album: Quiet One (1998), Popularity: 20");
        assert_eq!(albums[1], "Album: Middle One (2000), Popularity: 50");
        // Least popular track only, per release.
        let tracks: Vec<&String> = lines.iter().filter(|l| l.starts_with("   Track:")).collect();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0], "   Track: Vinum Sabbathi, Popularity: 10");
    }

    #[tokio::test]
    async fn export_all_with_seven_available_exports_seven() {
        // Scenario C, first half.
        let releases: Vec<Release> = (0..7)
            .map(|i| release(&format!("r{i}"), &format!("Album {i}"), i as u8 * 10, "2001"))
            .collect();
        let settings = Settings {
            export_releases: ExportCount::All,
            ..Settings::default()
        }
        .validated();

        let lines = compose(&releases, &settings).await;
        assert_eq!(lines.iter().filter(|l| l.starts_with("Album:")).count(), 7);
    }

    #[tokio::test]
    async fn export_five_with_three_available_is_clamped() {
        // Scenario C, second half.
        let releases = vec![
            release("r1", "A", 1, "2001"),
            release("r2", "B", 2, "2002"),
            release("r3", "C", 3, "2003"),
        ];
        let settings = Settings {
            export_releases: ExportCount::Limit(5),
            ..Settings::default()
        }
        .validated();

        let lines = compose(&releases, &settings).await;
        assert_eq!(lines.iter().filter(|l| l.starts_with("Album:")).count(), 3);
    }

    #[tokio::test]
    async fn track_fetch_failure_becomes_inline_error() {
        let releases = vec![
            release(BROKEN_RELEASE, "Cursed", 10, "1999"),
            release("r2", "Fine", 20, "2001"),
        ];
        let settings = Settings {
            export_releases: ExportCount::All,
            ..Settings::default()
        }
        .validated();

        let lines = compose(&releases, &settings).await;
        assert!(lines
            .iter()
            .any(|l| l.starts_with("  Error fetching tracks: HTTP error: connection reset")));
        // Export continued past the failing release.
        assert!(lines.iter().any(|l| l.starts_with("Album: Fine")));
        assert!(lines.iter().any(|l| l.starts_with("   Track:")));
    }

    #[tokio::test]
    async fn report_is_deterministic_for_fixed_inputs() {
        let releases = vec![
            release("r1", "A", 42, "2001"),
            release("r2", "B", 42, "2002"),
        ];
        let settings = Settings::default().validated();
        let first = render_report(&compose(&releases, &settings).await);
        let second = render_report(&compose(&releases, &settings).await);
        assert_eq!(first, second);
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(183_000), "3:03");
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59_999), "0:59");
        assert_eq!(format_duration(600_000), "10:00");
    }

    #[test]
    fn raw_export_tree_shape() {
        let releases = vec![release("r1", "Dopethrone", 54, "2000")];
        let track = Track {
            id: "t1".to_string(),
            name: "Funeralopolis".to_string(),
            popularity: 60,
            duration_ms: 521_000,
            url: "https://open.spotify.com/track/t1".to_string(),
        };
        let features = AudioFeatures {
            tempo: 121.5,
            valence: 0.13,
            duration_ms: 521_000,
        };
        let export = RawExport::assemble(&artist(), &releases, &[(track, Some(features))]);

        let json = export.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["artist_info"]["name"], "Electric Wizard");
        assert_eq!(value["artist_info"]["followers"], 372_041);
        assert_eq!(value["albums"][0]["id"], "r1");
        assert_eq!(value["albums"][0]["release_date"], "2000-01-01");
        assert_eq!(value["tracks"][0]["duration"], "8:41");
        assert_eq!(value["tracks"][0]["duration_ms"], 521_000);
        assert!(value["tracks"][0]["tempo"].is_number());
    }

    #[test]
    fn raw_export_missing_features_are_null() {
        let track = Track {
            id: "t1".to_string(),
            name: "Obscure".to_string(),
            popularity: 0,
            duration_ms: 100_000,
            url: String::new(),
        };
        let export = RawExport::assemble(&artist(), &[], &[(track, None)]);
        let value: serde_json::Value =
            serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert!(value["tracks"][0]["tempo"].is_null());
        assert!(value["tracks"][0]["valence"].is_null());
    }
}
