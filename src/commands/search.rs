use crate::r#trait::CatalogClient;

/// Handle the search command: list artist matches with their catalog ids.
pub async fn handle_search_command(
    client: &impl CatalogClient,
    query: &str,
    limit: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = query.trim();
    if query.is_empty() {
        // User-input no-op, not an error.
        println!("Please enter an artist name.");
        return Ok(());
    }

    println!("🔍 Searching for artists matching '{query}'...");
    let matches = client.search_artists(query, limit).await?;

    if matches.is_empty() {
        println!("No matches found.");
        return Ok(());
    }

    println!();
    for (index, artist) in matches.iter().enumerate() {
        println!("{}. {artist}", index + 1);
        if !artist.genres.is_empty() {
            println!("   genres: {}", artist.genre_line());
        }
    }
    Ok(())
}
