use crate::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A client-id / client-secret pair for the token exchange.
///
/// This is the whole secret-provider surface: a simple key-value pair that
/// can be loaded, saved and deleted. How the values are first obtained
/// (developer dashboard, env vars, a prompt in some shell) is out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }

    /// Basic shape check; does not verify the pair against the service.
    pub fn is_valid(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }

    /// Serialize credentials to a JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize credentials from a JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Credential persistence in the XDG data directory.
///
/// Credentials are stored as JSON at `~/.local/share/unpop/credentials.json`.
pub struct CredentialStore;

impl CredentialStore {
    /// Get the credential file path using XDG directories.
    pub fn credentials_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| CatalogError::Auth("Cannot determine XDG data directory".to_string()))?;
        Ok(data_dir.join("unpop").join("credentials.json"))
    }

    /// Save credentials to the XDG data directory, creating the directory
    /// structure as needed.
    pub fn save(credentials: &Credentials) -> Result<()> {
        let path = Self::credentials_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = credentials
            .to_json()
            .map_err(|e| CatalogError::Parse(format!("Failed to serialize credentials: {e}")))?;
        fs::write(&path, json)?;

        log::debug!("Credentials saved to: {}", path.display());
        Ok(())
    }

    /// Load credentials from the XDG data directory.
    ///
    /// Returns an error if no credential file exists or it cannot be parsed.
    pub fn load() -> Result<Credentials> {
        let path = Self::credentials_path()?;

        if !path.exists() {
            return Err(CatalogError::Auth(
                "No saved credentials found".to_string(),
            ));
        }

        let json = fs::read_to_string(&path)?;
        let credentials = Credentials::from_json(&json)
            .map_err(|e| CatalogError::Parse(format!("Failed to parse credential file: {e}")))?;

        log::debug!("Credentials loaded from: {}", path.display());
        Ok(credentials)
    }

    /// Check if a credential file exists.
    pub fn exists() -> bool {
        match Self::credentials_path() {
            Ok(path) => path.exists(),
            Err(_) => false,
        }
    }

    /// Remove the saved credential file, if any.
    pub fn remove() -> Result<()> {
        let path = Self::credentials_path()?;
        if path.exists() {
            fs::remove_file(&path)?;
            log::debug!("Credentials removed from: {}", path.display());
        }
        Ok(())
    }
}
