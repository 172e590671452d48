//! End-to-end pipeline tests against an in-memory catalog.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use unpop::types::{
    Artist, AudioFeatures, ReleaseDetail, ReleaseItem, ReleasePage, ReleaseType, TrackItem,
};
use unpop::{CatalogClient, CatalogError, CatalogFetcher, KeywordFilterSet, Result};

/// In-memory catalog with scriptable failures and a page-request counter.
#[derive(Default)]
struct FakeCatalog {
    items: Vec<ReleaseItem>,
    details: HashMap<String, ReleaseDetail>,
    tracks: HashMap<String, Vec<TrackItem>>,
    track_popularity: HashMap<String, u8>,
    fail_pages: bool,
    page_requests: Mutex<u32>,
    track_page_limits: Mutex<Vec<u32>>,
}

impl FakeCatalog {
    fn with_items(items: Vec<ReleaseItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    fn page_requests(&self) -> u32 {
        *self.page_requests.lock().unwrap()
    }
}

fn item(id: &str, name: &str) -> ReleaseItem {
    ReleaseItem {
        id: id.to_string(),
        name: name.to_string(),
        release_type: ReleaseType::Album,
    }
}

fn detail(popularity: u8, release_date: &str) -> ReleaseDetail {
    ReleaseDetail {
        popularity,
        release_date: release_date.to_string(),
        url: String::new(),
    }
}

#[async_trait(?Send)]
impl CatalogClient for FakeCatalog {
    async fn search_artists(&self, _query: &str, _limit: u32) -> Result<Vec<Artist>> {
        unimplemented!()
    }

    async fn get_artist(&self, _artist_id: &str) -> Result<Artist> {
        unimplemented!()
    }

    async fn get_artist_releases_page(
        &self,
        _artist_id: &str,
        _release_types: &[ReleaseType],
        limit: u32,
        offset: u32,
    ) -> Result<ReleasePage> {
        *self.page_requests.lock().unwrap() += 1;
        if self.fail_pages {
            return Err(CatalogError::Http("service unavailable".to_string()));
        }
        let start = (offset as usize).min(self.items.len());
        let end = (start + limit as usize).min(self.items.len());
        Ok(ReleasePage {
            items: self.items[start..end].to_vec(),
            offset,
            total: Some(self.items.len() as u32),
        })
    }

    async fn get_release_detail(&self, release_id: &str) -> Result<ReleaseDetail> {
        self.details
            .get(release_id)
            .cloned()
            .ok_or_else(|| CatalogError::Http("detail lookup failed".to_string()))
    }

    async fn get_release_tracks(&self, release_id: &str, limit: u32) -> Result<Vec<TrackItem>> {
        self.track_page_limits.lock().unwrap().push(limit);
        self.tracks
            .get(release_id)
            .cloned()
            .ok_or_else(|| CatalogError::Http("track listing failed".to_string()))
    }

    async fn get_track_popularity(&self, track_id: &str) -> Result<u8> {
        self.track_popularity
            .get(track_id)
            .copied()
            .ok_or_else(|| CatalogError::Http("popularity lookup failed".to_string()))
    }

    async fn get_audio_features(
        &self,
        _track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>> {
        unimplemented!()
    }
}

fn no_filter() -> KeywordFilterSet {
    KeywordFilterSet::expand(&[])
}

#[tokio::test]
async fn pagination_issues_one_request_per_full_page() {
    // 120 items with page size 50 means exactly ceil(120/50) = 3 requests,
    // and every item appears exactly once.
    let items: Vec<ReleaseItem> = (0..120)
        .map(|i| item(&format!("r{i}"), &format!("Album {i}")))
        .collect();
    let mut catalog = FakeCatalog::with_items(items);
    for i in 0..120 {
        catalog
            .details
            .insert(format!("r{i}"), detail((i % 100) as u8, "2001-01-01"));
    }

    let fetcher = CatalogFetcher::new(&catalog, no_filter());
    let releases = fetcher
        .fetch_releases("a1", &[ReleaseType::Album])
        .await
        .unwrap();

    assert_eq!(catalog.page_requests(), 3);
    assert_eq!(releases.len(), 120);
    let mut ids: Vec<&str> = releases.iter().map(|r| r.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 120);
    // Discovery order is preserved, not popularity order.
    assert_eq!(releases[0].id, "r0");
    assert_eq!(releases[119].id, "r119");
}

#[tokio::test]
async fn short_page_terminates_pagination() {
    let items: Vec<ReleaseItem> = (0..37)
        .map(|i| item(&format!("r{i}"), &format!("Album {i}")))
        .collect();
    let mut catalog = FakeCatalog::with_items(items);
    for i in 0..37 {
        catalog.details.insert(format!("r{i}"), detail(1, "2001"));
    }

    let fetcher = CatalogFetcher::new(&catalog, no_filter());
    let releases = fetcher
        .fetch_releases("a1", &[ReleaseType::Album])
        .await
        .unwrap();

    assert_eq!(catalog.page_requests(), 1);
    assert_eq!(releases.len(), 37);
}

#[tokio::test]
async fn empty_catalog_is_one_request_and_no_items() {
    let catalog = FakeCatalog::with_items(vec![]);
    let fetcher = CatalogFetcher::new(&catalog, no_filter());
    let releases = fetcher
        .fetch_releases("a1", &[ReleaseType::Album])
        .await
        .unwrap();
    assert_eq!(catalog.page_requests(), 1);
    assert!(releases.is_empty());
}

#[tokio::test]
async fn keyword_filter_excludes_by_substring() {
    // Scenario B: the "remix" tag catches both alias spellings and also
    // plain substring hits like "Remixology".
    let mut catalog = FakeCatalog::with_items(vec![
        item("r1", "Song (Remix)"),
        item("r2", "Song Remixed"),
        item("r3", "Remixology"),
        item("r4", "Song"),
    ]);
    catalog.details.insert("r4".to_string(), detail(12, "1999-10-01"));

    let filter = KeywordFilterSet::expand(&["remix".to_string()]);
    let fetcher = CatalogFetcher::new(&catalog, filter);
    let releases = fetcher
        .fetch_releases("a1", &[ReleaseType::Album])
        .await
        .unwrap();

    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].name, "Song");
    // The survivor never contains an active substring.
    assert!(!releases[0].name.to_lowercase().contains("remix"));
}

#[tokio::test]
async fn empty_filter_is_identity() {
    let mut catalog = FakeCatalog::with_items(vec![
        item("r1", "Live at Leeds"),
        item("r2", "Dopethrone (Remastered)"),
    ]);
    catalog.details.insert("r1".to_string(), detail(30, "1970-02-14"));
    catalog.details.insert("r2".to_string(), detail(54, "2006-01-01"));

    let fetcher = CatalogFetcher::new(&catalog, no_filter());
    let releases = fetcher
        .fetch_releases("a1", &[ReleaseType::Album])
        .await
        .unwrap();
    assert_eq!(releases.len(), 2);
}

#[tokio::test]
async fn duplicate_listing_rows_are_deduplicated() {
    let mut catalog = FakeCatalog::with_items(vec![
        item("r1", "Dopethrone"),
        item("r1", "Dopethrone"),
        item("r2", "Come My Fanatics..."),
    ]);
    catalog.details.insert("r1".to_string(), detail(54, "2000-09-25"));
    catalog.details.insert("r2".to_string(), detail(47, "1997-01-13"));

    let fetcher = CatalogFetcher::new(&catalog, no_filter());
    let releases = fetcher
        .fetch_releases("a1", &[ReleaseType::Album])
        .await
        .unwrap();
    assert_eq!(releases.len(), 2);
}

#[tokio::test]
async fn detail_failure_degrades_single_item() {
    // r2 has no detail entry: it must survive with popularity 0 and the
    // unknown-year sentinel instead of aborting or being dropped.
    let mut catalog = FakeCatalog::with_items(vec![
        item("r1", "Dopethrone"),
        item("r2", "Obscurum"),
    ]);
    catalog.details.insert("r1".to_string(), detail(54, "2000-09-25"));

    let fetcher = CatalogFetcher::new(&catalog, no_filter());
    let releases = fetcher
        .fetch_releases("a1", &[ReleaseType::Album])
        .await
        .unwrap();

    assert_eq!(releases.len(), 2);
    assert_eq!(releases[0].popularity, 54);
    assert_eq!(releases[0].year, "2000");
    assert_eq!(releases[1].popularity, 0);
    assert_eq!(releases[1].year, "????");
    assert_eq!(releases[1].release_date, "unknown");
}

#[tokio::test]
async fn page_failure_aborts_fetch() {
    let catalog = FakeCatalog {
        fail_pages: true,
        ..FakeCatalog::with_items(vec![item("r1", "Dopethrone")])
    };
    let fetcher = CatalogFetcher::new(&catalog, no_filter());
    let result = fetcher.fetch_releases("a1", &[ReleaseType::Album]).await;
    assert!(matches!(result, Err(CatalogError::Http(_))));
}

#[tokio::test]
async fn parallel_enrichment_preserves_discovery_order() {
    let items: Vec<ReleaseItem> = (0..20)
        .map(|i| item(&format!("r{i}"), &format!("Album {i}")))
        .collect();
    let mut catalog = FakeCatalog::with_items(items);
    for i in 0..20 {
        catalog
            .details
            .insert(format!("r{i}"), detail(i as u8, "2001-01-01"));
    }

    let fetcher =
        CatalogFetcher::new(&catalog, no_filter()).with_enrichment_concurrency(8);
    let releases = fetcher
        .fetch_releases("a1", &[ReleaseType::Album])
        .await
        .unwrap();

    let ids: Vec<String> = releases.iter().map(|r| r.id.clone()).collect();
    let expected: Vec<String> = (0..20).map(|i| format!("r{i}")).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn track_fetch_filters_and_defaults_popularity() {
    let mut catalog = FakeCatalog::default();
    catalog.tracks.insert(
        "r1".to_string(),
        vec![
            TrackItem {
                id: "t1".to_string(),
                name: "Funeralopolis".to_string(),
                duration_ms: 521_000,
                url: String::new(),
            },
            TrackItem {
                id: "t2".to_string(),
                name: "Funeralopolis (Live)".to_string(),
                duration_ms: 540_000,
                url: String::new(),
            },
            TrackItem {
                id: "t3".to_string(),
                name: "Weird Tales".to_string(),
                duration_ms: 900_000,
                url: String::new(),
            },
        ],
    );
    catalog.track_popularity.insert("t1".to_string(), 60);
    // t3 has no popularity entry: defaults to 0.

    let filter = KeywordFilterSet::expand(&["live".to_string()]);
    let fetcher = CatalogFetcher::new(&catalog, filter);
    let tracks = fetcher.fetch_release_tracks("r1").await.unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].name, "Funeralopolis");
    assert_eq!(tracks[0].popularity, 60);
    assert_eq!(tracks[1].name, "Weird Tales");
    assert_eq!(tracks[1].popularity, 0);

    // The listing is requested as a single page of at most 50 tracks.
    assert_eq!(*catalog.track_page_limits.lock().unwrap(), vec![50]);
}

#[tokio::test]
async fn track_listing_failure_is_fatal_for_that_release() {
    let catalog = FakeCatalog::default();
    let fetcher = CatalogFetcher::new(&catalog, no_filter());
    let result = fetcher.fetch_release_tracks("missing").await;
    assert!(matches!(result, Err(CatalogError::Http(_))));
}
