use crate::types::{
    Artist, AudioFeatures, ReleaseDetail, ReleasePage, ReleaseType, TrackItem,
};
use crate::Result;
use async_trait::async_trait;

/// Trait for catalog service operations that can be mocked for testing.
///
/// This trait abstracts the remote catalog as an opaque paginated service:
/// everything the fetch/rank/export pipeline needs from the network goes
/// through here, so tests can drive the pipeline with a fake or mock client
/// instead of live HTTP.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides
/// `MockCatalogClient` that implements this trait using the `mockall`
/// library.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait CatalogClient {
    /// Search for artists by name, returning at most `limit` matches.
    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<Artist>>;

    /// Fetch full detail for one artist (name, genres, followers, url).
    async fn get_artist(&self, artist_id: &str) -> Result<Artist>;

    /// Fetch one page of an artist's release listing.
    ///
    /// `release_types` is joined into a single filter expression for the
    /// remote call. `offset`/`limit` drive the pagination window.
    async fn get_artist_releases_page(
        &self,
        artist_id: &str,
        release_types: &[ReleaseType],
        limit: u32,
        offset: u32,
    ) -> Result<ReleasePage>;

    /// Fetch popularity and release-date detail for one release.
    async fn get_release_detail(&self, release_id: &str) -> Result<ReleaseDetail>;

    /// Fetch the first page (at most `limit`) of a release's track listing.
    async fn get_release_tracks(&self, release_id: &str, limit: u32) -> Result<Vec<TrackItem>>;

    /// Fetch the popularity score for one track.
    async fn get_track_popularity(&self, track_id: &str) -> Result<u8>;

    /// Fetch audio features for a batch of tracks.
    ///
    /// The result is positionally aligned with `track_ids`; tracks the
    /// service has no analysis for come back as `None`.
    async fn get_audio_features(&self, track_ids: &[String])
        -> Result<Vec<Option<AudioFeatures>>>;
}
