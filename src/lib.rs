pub mod client;
pub mod commands;
pub mod credentials;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod filter;
pub mod iterator;
pub mod ranking;
pub mod retry;
pub mod session;
pub mod settings;
pub mod r#trait;
pub mod types;

pub use client::SpotifyClient;
pub use credentials::{CredentialStore, Credentials};
pub use error::CatalogError;
pub use export::{render_report, ExportComposer, RawExport};
pub use fetcher::CatalogFetcher;
pub use filter::KeywordFilterSet;
pub use iterator::{ArtistReleasesIterator, AsyncPaginatedIterator};
pub use ranking::rank;
pub use session::{Session, SessionState};
pub use settings::{ExportCount, Settings, SortOrder};
pub use r#trait::CatalogClient;
pub use types::{Artist, AudioFeatures, Release, ReleaseType, Track};

#[cfg(feature = "mock")]
pub use r#trait::MockCatalogClient;

pub type Result<T> = std::result::Result<T, CatalogError>;
