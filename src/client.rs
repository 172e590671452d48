//! Concrete [`CatalogClient`] over the Spotify Web API.
//!
//! The client speaks plain JSON over any [`HttpClient`] implementation and
//! handles the client-credentials token exchange itself, caching the bearer
//! token until shortly before it expires. Each endpoint has a dedicated
//! parse function with typed response structs so the wire shapes are easy to
//! test against captured JSON.

use crate::r#trait::CatalogClient;
use crate::retry::{retry_operation, RetryConfig};
use crate::types::{
    Artist, AudioFeatures, ReleaseDetail, ReleaseItem, ReleasePage,
    ReleaseType, TrackItem,
};
use crate::{CatalogError, Result};
use async_trait::async_trait;
use http_client::{HttpClient, Request};
use http_types::{Method, Url};
use serde::Deserialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default base URL for the catalog API.
pub const DEFAULT_API_BASE: &str = "https://api.spotify.com";

/// Default URL for the client-credentials token exchange.
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Refresh the token this many seconds before the service says it expires.
const TOKEN_EXPIRY_SLACK: u64 = 30;

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Main client for the Spotify Web API.
///
/// # Examples
///
/// ```rust,no_run
/// use unpop::{CatalogClient, SpotifyClient};
///
/// #[tokio::main]
/// async fn main() -> unpop::Result<()> {
///     let http_client = http_client::native::NativeClient::new();
///     let client = SpotifyClient::new(
///         Box::new(http_client),
///         "client-id".to_string(),
///         "client-secret".to_string(),
///     );
///
///     let matches = client.search_artists("electric wizard", 5).await?;
///     for artist in matches {
///         println!("{artist}");
///     }
///     Ok(())
/// }
/// ```
pub struct SpotifyClient {
    client: Box<dyn HttpClient>,
    api_base: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
    retry_config: RetryConfig,
}

impl SpotifyClient {
    /// Create a new [`SpotifyClient`] against the public API endpoints.
    ///
    /// # Arguments
    ///
    /// * `client` - Any HTTP client implementation that implements [`HttpClient`]
    /// * `client_id` / `client_secret` - API credentials for the token exchange
    pub fn new(client: Box<dyn HttpClient>, client_id: String, client_secret: String) -> Self {
        Self::with_base_urls(
            client,
            client_id,
            client_secret,
            DEFAULT_API_BASE.to_string(),
            DEFAULT_TOKEN_URL.to_string(),
        )
    }

    /// Create a new [`SpotifyClient`] with custom API and token URLs.
    ///
    /// This is useful for testing against a local stub server.
    pub fn with_base_urls(
        client: Box<dyn HttpClient>,
        client_id: String,
        client_secret: String,
        api_base: String,
        token_url: String,
    ) -> Self {
        Self {
            client,
            api_base,
            token_url,
            client_id,
            client_secret,
            token: Mutex::new(None),
            retry_config: RetryConfig::default(),
        }
    }

    /// Override the rate-limit retry behavior for all requests.
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    fn cached_token(&self) -> Option<String> {
        let guard = self.token.lock().expect("token lock poisoned");
        guard.as_ref().and_then(|t| {
            if t.expires_at > Instant::now() {
                Some(t.access_token.clone())
            } else {
                None
            }
        })
    }

    /// Run the client-credentials exchange and cache the bearer token.
    async fn fetch_token(&self) -> Result<String> {
        let form_string: String = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ]
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

        let url = self
            .token_url
            .parse::<Url>()
            .map_err(|e| CatalogError::Http(format!("invalid token url: {e}")))?;
        let mut request = Request::new(Method::Post, url);
        request.insert_header("Content-Type", "application/x-www-form-urlencoded");
        request.insert_header("Accept", "application/json");
        request.set_body(form_string);

        let mut response = self
            .client
            .send(request)
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        let status: u16 = response.status().into();
        let body = response
            .body_string()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        if !response.status().is_success() {
            log::debug!("token exchange failed with status {status}");
            return Err(CatalogError::Auth(format!(
                "token exchange rejected with status {status}: {}",
                extract_api_error(&body)
            )));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))?;

        let lifetime = token.expires_in.saturating_sub(TOKEN_EXPIRY_SLACK).max(1);
        let mut guard = self.token.lock().expect("token lock poisoned");
        *guard = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });
        log::debug!("obtained access token, valid for {}s", token.expires_in);
        Ok(token.access_token)
    }

    async fn ensure_token(&self) -> Result<String> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }
        self.fetch_token().await
    }

    /// Issue an authenticated GET and return the response body, retrying
    /// rate-limited attempts with backoff.
    async fn get_body(&self, path_and_query: &str) -> Result<String> {
        let outcome = retry_operation(self.retry_config.clone(), path_and_query, || {
            self.get_body_once(path_and_query)
        })
        .await?;
        Ok(outcome.result)
    }

    /// Issue one authenticated GET attempt.
    ///
    /// Non-success statuses are mapped onto the error taxonomy: 429 becomes
    /// [`CatalogError::RateLimit`] (honoring Retry-After), 401 becomes
    /// [`CatalogError::Auth`], anything else [`CatalogError::Api`].
    async fn get_body_once(&self, path_and_query: &str) -> Result<String> {
        let token = self.ensure_token().await?;
        let url = format!("{}{}", self.api_base, path_and_query);

        let url = url
            .parse::<Url>()
            .map_err(|e| CatalogError::Http(format!("invalid request url: {e}")))?;
        let mut request = Request::new(Method::Get, url);
        request.insert_header("Authorization", format!("Bearer {token}"));
        request.insert_header("Accept", "application/json");

        let mut response = self
            .client
            .send(request)
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        let status: u16 = response.status().into();
        log::debug!("GET {path_and_query} -> {status}");

        if status == 429 {
            let retry_after = response
                .header("Retry-After")
                .and_then(|values| values.last().as_str().parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimit { retry_after });
        }

        if status == 401 {
            // The cached token was rejected; drop it so the next call
            // re-runs the exchange.
            let mut guard = self.token.lock().expect("token lock poisoned");
            *guard = None;
            return Err(CatalogError::Auth(
                "access token rejected by the service".to_string(),
            ));
        }

        let body = response
            .body_string()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::Api {
                status,
                message: extract_api_error(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait(?Send)]
impl CatalogClient for SpotifyClient {
    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<Artist>> {
        let path = format!(
            "/v1/search?q={}&type=artist&limit={limit}",
            urlencoding::encode(query)
        );
        let body = self.get_body(&path).await?;
        parse_search_response(&body)
    }

    async fn get_artist(&self, artist_id: &str) -> Result<Artist> {
        let path = format!("/v1/artists/{}", urlencoding::encode(artist_id));
        let body = self.get_body(&path).await?;
        parse_artist_response(&body)
    }

    async fn get_artist_releases_page(
        &self,
        artist_id: &str,
        release_types: &[ReleaseType],
        limit: u32,
        offset: u32,
    ) -> Result<ReleasePage> {
        let path = format!(
            "/v1/artists/{}/albums?include_groups={}&limit={limit}&offset={offset}",
            urlencoding::encode(artist_id),
            ReleaseType::join(release_types),
        );
        let body = self.get_body(&path).await?;
        parse_releases_response(&body, offset)
    }

    async fn get_release_detail(&self, release_id: &str) -> Result<ReleaseDetail> {
        let path = format!("/v1/albums/{}", urlencoding::encode(release_id));
        let body = self.get_body(&path).await?;
        parse_release_detail_response(&body)
    }

    async fn get_release_tracks(&self, release_id: &str, limit: u32) -> Result<Vec<TrackItem>> {
        let path = format!(
            "/v1/albums/{}/tracks?limit={limit}",
            urlencoding::encode(release_id)
        );
        let body = self.get_body(&path).await?;
        parse_release_tracks_response(&body)
    }

    async fn get_track_popularity(&self, track_id: &str) -> Result<u8> {
        let path = format!("/v1/tracks/{}", urlencoding::encode(track_id));
        let body = self.get_body(&path).await?;
        parse_track_popularity_response(&body)
    }

    async fn get_audio_features(
        &self,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>> {
        if track_ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = track_ids.join(",");
        let path = format!("/v1/audio-features?ids={}", urlencoding::encode(&joined));
        let body = self.get_body(&path).await?;
        parse_audio_features_response(&body)
    }
}

// =============================================================================
// Response shapes and parse functions
// =============================================================================

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Pull the error message out of an error body, falling back to the raw
/// body (truncated) when it is not the documented shape.
fn extract_api_error(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorResponse>(body) {
        return parsed.error.message;
    }
    body.chars().take(200).collect()
}

#[derive(Deserialize)]
struct ApiSearchResponse {
    artists: ApiArtistList,
}

#[derive(Deserialize)]
struct ApiArtistList {
    items: Vec<ApiArtist>,
}

#[derive(Deserialize)]
struct ApiArtist {
    id: String,
    name: String,
    #[serde(default)]
    genres: Vec<String>,
    followers: Option<ApiFollowers>,
    external_urls: Option<ApiExternalUrls>,
}

#[derive(Deserialize)]
struct ApiFollowers {
    total: Option<u64>,
}

#[derive(Deserialize)]
struct ApiExternalUrls {
    spotify: Option<String>,
}

impl From<ApiArtist> for Artist {
    fn from(artist: ApiArtist) -> Self {
        Artist {
            id: artist.id,
            name: artist.name,
            genres: artist.genres,
            followers: artist.followers.and_then(|f| f.total).unwrap_or(0),
            url: artist
                .external_urls
                .and_then(|u| u.spotify)
                .unwrap_or_default(),
        }
    }
}

pub(crate) fn parse_search_response(json: &str) -> Result<Vec<Artist>> {
    let response: ApiSearchResponse =
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Ok(response.artists.items.into_iter().map(Artist::from).collect())
}

pub(crate) fn parse_artist_response(json: &str) -> Result<Artist> {
    let artist: ApiArtist =
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Ok(artist.into())
}

#[derive(Deserialize)]
struct ApiReleasesResponse {
    items: Vec<ApiReleaseItem>,
    total: Option<u32>,
}

#[derive(Deserialize)]
struct ApiReleaseItem {
    id: String,
    name: String,
    album_group: Option<String>,
    album_type: Option<String>,
}

pub(crate) fn parse_releases_response(json: &str, offset: u32) -> Result<ReleasePage> {
    let response: ApiReleasesResponse =
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;

    let items = response
        .items
        .into_iter()
        .map(|item| {
            // album_group distinguishes appears-on entries; album_type is
            // the fallback for older response shapes.
            let raw_type = item.album_group.or(item.album_type).unwrap_or_default();
            ReleaseItem {
                id: item.id,
                name: item.name,
                release_type: raw_type.parse().unwrap_or(ReleaseType::Album),
            }
        })
        .collect();

    Ok(ReleasePage {
        items,
        offset,
        total: response.total,
    })
}

#[derive(Deserialize)]
struct ApiReleaseDetail {
    popularity: Option<u32>,
    release_date: Option<String>,
    external_urls: Option<ApiExternalUrls>,
}

pub(crate) fn parse_release_detail_response(json: &str) -> Result<ReleaseDetail> {
    let detail: ApiReleaseDetail =
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Ok(ReleaseDetail {
        popularity: clamp_popularity(detail.popularity),
        release_date: detail.release_date.unwrap_or_else(|| "unknown".to_string()),
        url: detail
            .external_urls
            .and_then(|u| u.spotify)
            .unwrap_or_default(),
    })
}

#[derive(Deserialize)]
struct ApiReleaseTracksResponse {
    items: Vec<ApiTrackItem>,
}

#[derive(Deserialize)]
struct ApiTrackItem {
    id: String,
    name: String,
    duration_ms: Option<u32>,
    external_urls: Option<ApiExternalUrls>,
}

pub(crate) fn parse_release_tracks_response(json: &str) -> Result<Vec<TrackItem>> {
    let response: ApiReleaseTracksResponse =
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Ok(response
        .items
        .into_iter()
        .map(|item| TrackItem {
            id: item.id,
            name: item.name,
            duration_ms: item.duration_ms.unwrap_or(0),
            url: item
                .external_urls
                .and_then(|u| u.spotify)
                .unwrap_or_default(),
        })
        .collect())
}

#[derive(Deserialize)]
struct ApiTrackDetail {
    popularity: Option<u32>,
}

pub(crate) fn parse_track_popularity_response(json: &str) -> Result<u8> {
    let detail: ApiTrackDetail =
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Ok(clamp_popularity(detail.popularity))
}

#[derive(Deserialize)]
struct ApiAudioFeaturesResponse {
    // The batch endpoint answers null for tracks without analysis.
    audio_features: Vec<Option<ApiAudioFeatures>>,
}

#[derive(Deserialize)]
struct ApiAudioFeatures {
    tempo: Option<f32>,
    valence: Option<f32>,
    duration_ms: Option<u32>,
}

pub(crate) fn parse_audio_features_response(json: &str) -> Result<Vec<Option<AudioFeatures>>> {
    let response: ApiAudioFeaturesResponse =
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
    Ok(response
        .audio_features
        .into_iter()
        .map(|entry| {
            entry.map(|f| AudioFeatures {
                tempo: f.tempo.unwrap_or(0.0),
                valence: f.valence.unwrap_or(0.0),
                duration_ms: f.duration_ms.unwrap_or(0),
            })
        })
        .collect())
}

/// Popularity is documented as an integer in `[0, 100]`; clamp anything the
/// service sends outside that range and default a missing score to 0.
fn clamp_popularity(raw: Option<u32>) -> u8 {
    raw.unwrap_or(0).min(100) as u8
}
