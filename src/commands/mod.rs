pub mod auth;
pub mod export;
pub mod raw;
pub mod search;
pub mod utils;

use crate::settings::{ExportCount, SortOrder};
use crate::types::ReleaseType;
use clap::Subcommand;
use std::path::PathBuf;

fn parse_export_count(s: &str) -> Result<ExportCount, String> {
    s.parse()
}

fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    s.parse()
}

fn parse_release_type(s: &str) -> Result<ReleaseType, String> {
    s.parse()
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for artists by name
    ///
    /// Prints up to --limit matches with their catalog ids. Pick an id and
    /// pass it to `export --artist-id` to skip the search step there.
    ///
    /// Usage examples:
    /// # Find an artist
    /// unpop search "electric wizard"
    Search {
        /// Artist name to search for
        query: String,

        /// Maximum number of matches to show
        #[arg(long, default_value = "5")]
        limit: u32,
    },

    /// Fetch, filter, rank and export an artist's catalog
    ///
    /// Runs the full pipeline: paginates the artist's releases, skips names
    /// matching the keyword filter, ranks by popularity and writes the
    /// unpopularity report.
    ///
    /// Usage examples:
    /// # Three least popular albums, three least popular tracks each
    /// unpop export --artist "electric wizard"
    ///
    /// # Everything, most popular first, to a file
    /// unpop export --artist-id 4UgQ3EFa8fEeaIEg54uV5b --count all --order descending --output report.txt
    ///
    /// # Include singles, keep only the "live" keyword filter
    /// unpop export --artist "boris" --types album,single --skip live
    Export {
        /// Artist name to search for (the first match is used)
        #[arg(long, conflicts_with = "artist_id")]
        artist: Option<String>,

        /// Exact artist id, skipping the search step
        #[arg(long)]
        artist_id: Option<String>,

        /// How many releases to export: 1-5 or 'all'
        #[arg(long, default_value = "3", value_parser = parse_export_count)]
        count: ExportCount,

        /// How many tracks per release to export: 1-5 or 'all'
        #[arg(long, default_value = "3", value_parser = parse_export_count)]
        tracks: ExportCount,

        /// Ranking direction: ascending (least popular first) or descending
        #[arg(long, default_value = "ascending", value_parser = parse_sort_order)]
        order: SortOrder,

        /// Release types to include (album, single, compilation, appears_on)
        #[arg(long, value_delimiter = ',', value_parser = parse_release_type, default_value = "album")]
        types: Vec<ReleaseType>,

        /// Keyword tags to exclude by name; defaults to the built-in tag set
        #[arg(long, value_delimiter = ',')]
        skip: Option<Vec<String>>,

        /// Write the report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Dump the catalog as a structured JSON document
    ///
    /// Emits the same facts as the text report as a key-value tree: artist
    /// info, the release list, and (when --release-id is given) that
    /// release's tracks with audio features.
    Raw {
        /// Artist name to search for (the first match is used)
        #[arg(long, conflicts_with = "artist_id")]
        artist: Option<String>,

        /// Exact artist id, skipping the search step
        #[arg(long)]
        artist_id: Option<String>,

        /// Release whose track list to include
        #[arg(long)]
        release_id: Option<String>,

        /// Release types to include (album, single, compilation, appears_on)
        #[arg(long, value_delimiter = ',', value_parser = parse_release_type, default_value = "album")]
        types: Vec<ReleaseType>,

        /// Keyword tags to exclude by name; defaults to the built-in tag set
        #[arg(long, value_delimiter = ',')]
        skip: Option<Vec<String>>,
    },

    /// Save API credentials for later runs
    Login {
        /// API client id (falls back to $SPOTIFY_CLIENT_ID)
        #[arg(long)]
        client_id: Option<String>,

        /// API client secret (falls back to $SPOTIFY_CLIENT_SECRET)
        #[arg(long)]
        client_secret: Option<String>,
    },

    /// Delete saved API credentials
    Logout,
}

/// Dispatch a parsed command.
pub async fn execute_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Search { query, limit } => {
            let client = utils::build_client()?;
            search::handle_search_command(&client, &query, limit).await
        }
        Commands::Export {
            artist,
            artist_id,
            count,
            tracks,
            order,
            types,
            skip,
            output,
        } => {
            let client = utils::build_client()?;
            export::handle_export_command(
                &client, artist, artist_id, count, tracks, order, types, skip, output,
            )
            .await
        }
        Commands::Raw {
            artist,
            artist_id,
            release_id,
            types,
            skip,
        } => {
            let client = utils::build_client()?;
            raw::handle_raw_command(&client, artist, artist_id, release_id, types, skip).await
        }
        Commands::Login {
            client_id,
            client_secret,
        } => auth::handle_login_command(client_id, client_secret),
        Commands::Logout => auth::handle_logout_command(),
    }
}
