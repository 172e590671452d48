//! Catalog retrieval: pagination, keyword filtering, and enrichment.
//!
//! The fetcher drives the release-page iterator to completion, drops items
//! whose names match the active keyword filter, deduplicates by id, and then
//! enriches each survivor with popularity and release year via per-item
//! detail lookups. Enrichment failures degrade the single item to its
//! documented defaults (popularity 0, year "????"); page failures abort the
//! whole fetch. Results always come back in API discovery order.

use crate::filter::KeywordFilterSet;
use crate::iterator::{ArtistReleasesIterator, AsyncPaginatedIterator};
use crate::r#trait::CatalogClient;
use crate::types::{year_from_release_date, Release, ReleaseType, Track, UNKNOWN_YEAR};
use crate::Result;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;

/// A release's track listing is fetched as a single page of at most this
/// many tracks. Longer releases are truncated; this is a documented
/// limitation, not silently worked around.
pub const TRACK_PAGE_LIMIT: u32 = 50;

/// Retrieves and filters an artist's catalog.
pub struct CatalogFetcher<'a, C: CatalogClient + ?Sized> {
    client: &'a C,
    filter: KeywordFilterSet,
    enrichment_concurrency: usize,
}

impl<'a, C: CatalogClient + ?Sized> CatalogFetcher<'a, C> {
    pub fn new(client: &'a C, filter: KeywordFilterSet) -> Self {
        Self {
            client,
            filter,
            // Strictly sequential by default: one detail round-trip at a
            // time keeps request timing friendly to the service's limits.
            enrichment_concurrency: 1,
        }
    }

    /// Allow up to `concurrency` detail lookups in flight at once.
    ///
    /// Output ordering is unaffected: results are collected by original
    /// index, so the final sequence stays in discovery order.
    pub fn with_enrichment_concurrency(mut self, concurrency: usize) -> Self {
        self.enrichment_concurrency = concurrency.max(1);
        self
    }

    /// The active keyword filter.
    pub fn filter(&self) -> &KeywordFilterSet {
        &self.filter
    }

    /// Retrieve the complete, deduplicated set of releases for an artist.
    ///
    /// Paginates the listing to exhaustion, skips releases whose name
    /// matches the keyword filter, and enriches each survivor with
    /// popularity and release year. The result mirrors discovery order and
    /// is not pre-sorted by popularity.
    pub async fn fetch_releases(
        &self,
        artist_id: &str,
        release_types: &[ReleaseType],
    ) -> Result<Vec<Release>> {
        let mut iterator = ArtistReleasesIterator::new(self.client, artist_id, release_types);
        let items = iterator.collect_all().await?;
        log::debug!(
            "fetched {} listing rows for artist '{}' over {} pages",
            items.len(),
            artist_id,
            iterator.pages_fetched()
        );

        let mut seen: HashSet<String> = HashSet::new();
        let mut survivors = Vec::new();
        for item in items {
            if self.filter.matches(&item.name) {
                log::debug!("skipping release '{}' (keyword filter)", item.name);
                continue;
            }
            if !seen.insert(item.id.clone()) {
                continue;
            }
            survivors.push(item);
        }

        let client = self.client;
        let releases = stream::iter(survivors.into_iter().map(|item| async move {
            match client.get_release_detail(&item.id).await {
                Ok(detail) => Release {
                    year: year_from_release_date(&detail.release_date),
                    id: item.id,
                    name: item.name,
                    popularity: detail.popularity,
                    release_date: detail.release_date,
                    release_type: item.release_type,
                    url: detail.url,
                },
                Err(e) => {
                    // Item-level degradation: keep the release with default
                    // metadata rather than dropping it or aborting.
                    log::debug!("detail lookup failed for release '{}': {e}", item.name);
                    Release {
                        id: item.id,
                        name: item.name,
                        popularity: 0,
                        year: UNKNOWN_YEAR.to_string(),
                        release_date: "unknown".to_string(),
                        release_type: item.release_type,
                        url: String::new(),
                    }
                }
            }
        }))
        .buffered(self.enrichment_concurrency)
        .collect::<Vec<_>>()
        .await;

        Ok(releases)
    }

    /// Retrieve the filtered, enriched track list for one release.
    ///
    /// A single page of up to [`TRACK_PAGE_LIMIT`] tracks is requested (see
    /// the constant's documentation), names are filtered with the same
    /// keyword rules as releases, and each survivor gets a popularity
    /// lookup, defaulting to 0 on failure.
    pub async fn fetch_release_tracks(&self, release_id: &str) -> Result<Vec<Track>> {
        let items = self
            .client
            .get_release_tracks(release_id, TRACK_PAGE_LIMIT)
            .await?;

        let survivors: Vec<_> = items
            .into_iter()
            .filter(|item| {
                let skip = self.filter.matches(&item.name);
                if skip {
                    log::debug!("skipping track '{}' (keyword filter)", item.name);
                }
                !skip
            })
            .collect();

        let client = self.client;
        let tracks = stream::iter(survivors.into_iter().map(|item| async move {
            let popularity = match client.get_track_popularity(&item.id).await {
                Ok(popularity) => popularity,
                Err(e) => {
                    log::debug!("popularity lookup failed for track '{}': {e}", item.name);
                    0
                }
            };
            Track {
                id: item.id,
                name: item.name,
                popularity,
                duration_ms: item.duration_ms,
                url: item.url,
            }
        }))
        .buffered(self.enrichment_concurrency)
        .collect::<Vec<_>>()
        .await;

        Ok(tracks)
    }
}
