use crate::client::SpotifyClient;
use crate::credentials::{CredentialStore, Credentials};
use crate::r#trait::CatalogClient;
use crate::types::Artist;
use std::env;

/// Resolve API credentials: environment variables win, then the saved
/// credential file.
pub fn get_credentials() -> crate::Result<Credentials> {
    if let (Ok(client_id), Ok(client_secret)) = (
        env::var("SPOTIFY_CLIENT_ID"),
        env::var("SPOTIFY_CLIENT_SECRET"),
    ) {
        let credentials = Credentials::new(client_id, client_secret);
        if credentials.is_valid() {
            log::debug!("using credentials from environment");
            return Ok(credentials);
        }
    }
    CredentialStore::load()
}

/// Build the live API client from the resolved credentials.
pub fn build_client() -> crate::Result<SpotifyClient> {
    let credentials = get_credentials()?;
    let http_client = http_client::native::NativeClient::new();
    Ok(SpotifyClient::new(
        Box::new(http_client),
        credentials.client_id,
        credentials.client_secret,
    ))
}

/// Resolve the target artist from either an exact id or a search query.
///
/// Returns `Ok(None)` for the no-op cases (empty query, no matches), after
/// reporting them informationally; the caller should just return.
pub async fn resolve_artist(
    client: &impl CatalogClient,
    artist: Option<String>,
    artist_id: Option<String>,
) -> Result<Option<Artist>, Box<dyn std::error::Error>> {
    if let Some(artist_id) = artist_id {
        return Ok(Some(client.get_artist(&artist_id).await?));
    }

    let query = artist.unwrap_or_default();
    let query = query.trim();
    if query.is_empty() {
        println!("Please provide an artist name (--artist) or id (--artist-id).");
        return Ok(None);
    }

    let matches = client.search_artists(query, 1).await?;
    match matches.into_iter().next() {
        Some(artist) => {
            println!("🎯 Using first match: {artist}");
            Ok(Some(artist))
        }
        None => {
            println!("No matches found for '{query}'.");
            Ok(None)
        }
    }
}
