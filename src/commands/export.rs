use crate::commands::utils;
use crate::export::{render_report, ExportComposer};
use crate::fetcher::CatalogFetcher;
use crate::filter::KeywordFilterSet;
use crate::r#trait::CatalogClient;
use crate::session::Session;
use crate::settings::{ExportCount, Settings, SortOrder};
use crate::types::ReleaseType;
use chrono::Local;
use std::fs;
use std::path::PathBuf;

/// Handle the export command: run the full fetch/filter/rank/export
/// pipeline for one artist and write the report.
#[allow(clippy::too_many_arguments)]
pub async fn handle_export_command(
    client: &impl CatalogClient,
    artist: Option<String>,
    artist_id: Option<String>,
    count: ExportCount,
    tracks: ExportCount,
    order: SortOrder,
    types: Vec<ReleaseType>,
    skip: Option<Vec<String>>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings {
        release_types: types,
        keyword_tags: skip.unwrap_or_else(|| {
            crate::filter::DEFAULT_TAGS
                .iter()
                .map(|t| t.to_string())
                .collect()
        }),
        export_releases: count,
        export_tracks: tracks,
        sort_order: order,
    };

    let mut session = Session::new();
    session.configure(settings);

    let Some(artist) = utils::resolve_artist(client, artist, artist_id).await? else {
        return Ok(());
    };
    session.select_artist(artist.clone());

    let filter = KeywordFilterSet::expand(&session.settings().keyword_tags);
    let fetcher = CatalogFetcher::new(client, filter);

    println!(
        "📥 Fetching {} releases for {}...",
        ReleaseType::join(&session.settings().release_types),
        artist.name
    );
    let releases = fetcher
        .fetch_releases(&artist.id, &session.settings().release_types)
        .await?;
    if releases.is_empty() {
        println!("No releases survived the filters for {}.", artist.name);
        return Ok(());
    }
    println!("   {} releases after filtering", releases.len());
    session.set_releases(releases);

    let composer = ExportComposer::new(&fetcher, session.settings());
    let lines = composer
        .compose_report(&artist, session.releases(), Local::now())
        .await;
    let report = render_report(&lines);

    match output {
        Some(path) => {
            fs::write(&path, &report)?;
            println!("✅ Report written to {}", path.display());
        }
        None => println!("\n{report}"),
    }
    Ok(())
}
