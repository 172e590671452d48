use crate::credentials::{CredentialStore, Credentials};
use std::env;

/// Handle the login command: persist a credential pair for later runs.
pub fn handle_login_command(
    client_id: Option<String>,
    client_secret: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client_id = client_id.or_else(|| env::var("SPOTIFY_CLIENT_ID").ok());
    let client_secret = client_secret.or_else(|| env::var("SPOTIFY_CLIENT_SECRET").ok());

    let (Some(client_id), Some(client_secret)) = (client_id, client_secret) else {
        eprintln!("❌ Both --client-id and --client-secret are required");
        eprintln!("   (or set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET)");
        eprintln!();
        eprintln!("You can create credentials at https://developer.spotify.com");
        std::process::exit(1);
    };

    let credentials = Credentials::new(client_id, client_secret);
    if !credentials.is_valid() {
        eprintln!("❌ Credentials must not be empty");
        std::process::exit(1);
    }

    CredentialStore::save(&credentials)?;
    println!(
        "✅ Credentials saved to {}",
        CredentialStore::credentials_path()?.display()
    );
    Ok(())
}

/// Handle the logout command: delete the saved credential pair.
pub fn handle_logout_command() -> Result<(), Box<dyn std::error::Error>> {
    if !CredentialStore::exists() {
        println!("No saved credentials.");
        return Ok(());
    }
    CredentialStore::remove()?;
    println!("✅ Saved credentials removed");
    Ok(())
}
