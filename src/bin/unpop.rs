use clap::Parser;
use unpop::commands::{execute_command, Commands};
use unpop::CatalogError;

/// Spotify catalog unpopularity analyzer
#[derive(Parser)]
#[command(
    name = "unpop",
    about = "Surface the least popular releases and tracks in an artist's Spotify catalog",
    long_about = None
)]
struct Cli {
    /// Show detailed debug information
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    if let Err(e) = execute_command(args.command).await {
        eprintln!("❌ Command failed: {e}");
        if matches!(e.downcast_ref::<CatalogError>(), Some(CatalogError::Auth(_))) {
            eprintln!();
            eprintln!("Save credentials first with:");
            eprintln!("  unpop login --client-id <id> --client-secret <secret>");
            eprintln!();
            eprintln!("or set the environment variables:");
            eprintln!("  SPOTIFY_CLIENT_ID=your_client_id");
            eprintln!("  SPOTIFY_CLIENT_SECRET=your_client_secret");
        }
        std::process::exit(1);
    }

    Ok(())
}
