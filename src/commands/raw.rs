use crate::commands::utils;
use crate::export::RawExport;
use crate::fetcher::CatalogFetcher;
use crate::filter::KeywordFilterSet;
use crate::r#trait::CatalogClient;
use crate::settings::Settings;
use crate::types::{AudioFeatures, ReleaseType, Track};

/// Handle the raw command: dump artist info, the release collection and
/// (optionally) one release's enriched track list as JSON.
pub async fn handle_raw_command(
    client: &impl CatalogClient,
    artist: Option<String>,
    artist_id: Option<String>,
    release_id: Option<String>,
    types: Vec<ReleaseType>,
    skip: Option<Vec<String>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings {
        release_types: types,
        keyword_tags: skip.unwrap_or_else(|| {
            crate::filter::DEFAULT_TAGS
                .iter()
                .map(|t| t.to_string())
                .collect()
        }),
        ..Settings::default()
    }
    .validated();

    let Some(artist) = utils::resolve_artist(client, artist, artist_id).await? else {
        return Ok(());
    };

    let filter = KeywordFilterSet::expand(&settings.keyword_tags);
    let fetcher = CatalogFetcher::new(client, filter);
    let releases = fetcher
        .fetch_releases(&artist.id, &settings.release_types)
        .await?;

    let tracks: Vec<(Track, Option<AudioFeatures>)> = match release_id {
        Some(release_id) => {
            let tracks = fetcher.fetch_release_tracks(&release_id).await?;
            let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
            // Audio features are enrichment: a failed batch lookup degrades
            // every entry to null instead of failing the export.
            let mut features = match client.get_audio_features(&ids).await {
                Ok(features) => features,
                Err(e) => {
                    log::warn!("audio-features lookup failed: {e}");
                    Vec::new()
                }
            };
            features.resize(tracks.len(), None);
            tracks.into_iter().zip(features).collect()
        }
        None => Vec::new(),
    };

    let export = RawExport::assemble(&artist, &releases, &tracks);
    println!("{}", export.to_json()?);
    Ok(())
}
