use thiserror::Error;

/// Error types for catalog operations.
///
/// This enum covers all possible errors that can occur when talking to the
/// Spotify Web API, including network issues, authentication failures,
/// parsing errors, and rate limiting.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use unpop::{CatalogClient, CatalogError, SpotifyClient};
///
/// #[tokio::main]
/// async fn main() {
///     let client = SpotifyClient::new(
///         Box::new(http_client::native::NativeClient::new()),
///         "client-id".to_string(),
///         "client-secret".to_string(),
///     );
///
///     match client.search_artists("electric wizard", 5).await {
///         Ok(artists) => println!("{} matches", artists.len()),
///         Err(CatalogError::Auth(msg)) => eprintln!("Authentication failed: {msg}"),
///         Err(CatalogError::RateLimit { retry_after }) => {
///             eprintln!("Rate limited, retry in {retry_after} seconds");
///         }
///         Err(CatalogError::Http(msg)) => eprintln!("Network error: {msg}"),
///         Err(e) => eprintln!("Other error: {e}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum CatalogError {
    /// HTTP/network related errors.
    ///
    /// This includes connection failures, timeouts, DNS errors, and other
    /// low-level networking issues. A page-level fetch hitting this error
    /// aborts the enclosing operation; a per-item enrichment lookup hitting
    /// it degrades that item to its documented defaults instead.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication failures.
    ///
    /// This occurs when the client-credentials token exchange is rejected,
    /// typically because the stored client id/secret pair is invalid.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The API answered with a non-success status code.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code returned by the service
        status: u16,
        /// Error message extracted from the response body, if any
        message: String,
    },

    /// Failed to parse an API response.
    ///
    /// This can happen when the service changes its response shape or
    /// returns unexpected data formats.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Rate limiting from the service.
    ///
    /// The `retry_after` field indicates how many seconds to wait before
    /// the next request attempt.
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimit {
        /// Number of seconds to wait before retrying
        retry_after: u64,
    },

    /// File system I/O errors.
    ///
    /// This can occur when reading or writing the credential file or an
    /// export file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
