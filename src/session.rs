//! Pipeline session state.
//!
//! Instead of global mutable application state, the pipeline threads an
//! explicit session through its stages. Collections are replaced wholesale,
//! never patched in place, so an observer sees either the previous complete
//! collection or the new one and never an interleaving.

use crate::settings::Settings;
use crate::types::{Artist, Release, Track};

/// Where the session is in its lifecycle.
///
/// `Idle` means no validated settings yet; `Configured` means settings are
/// in place but the catalog has not been fetched under them; `Fetched` means
/// the release collection reflects the current settings. Any settings change
/// while `Fetched` drops back to `Configured` and requires a fresh fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Configured,
    Fetched,
}

/// Explicit context object carrying the current entity, catalog and
/// settings through the pipeline stages.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    settings: Settings,
    artist: Option<Artist>,
    releases: Vec<Release>,
    selected_release: Option<String>,
    current_tracks: Vec<Track>,
}

impl Session {
    /// Start an idle session with default settings.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            settings: Settings::default().validated(),
            artist: None,
            releases: Vec::new(),
            selected_release: None,
            current_tracks: Vec::new(),
        }
    }

    /// Save settings, validating them first (see [`Settings::validated`]).
    ///
    /// Moves the session to `Configured`: previously fetched data stays
    /// readable as the last complete collection, but a new fetch is
    /// required before the session is `Fetched` again.
    pub fn configure(&mut self, settings: Settings) {
        self.settings = settings.validated();
        self.state = SessionState::Configured;
    }

    /// Resolve the artist for this session.
    ///
    /// Selecting an artist invalidates the per-release track selection
    /// immediately; the release collection is replaced on the next fetch.
    pub fn select_artist(&mut self, artist: Artist) {
        log::debug!("selected artist {artist}");
        self.artist = Some(artist);
        self.selected_release = None;
        self.current_tracks = Vec::new();
        if self.state == SessionState::Fetched {
            self.state = SessionState::Configured;
        }
    }

    /// Replace the release collection wholesale with a fresh fetch result.
    pub fn set_releases(&mut self, releases: Vec<Release>) {
        self.releases = releases;
        self.selected_release = None;
        self.current_tracks = Vec::new();
        self.state = SessionState::Fetched;
    }

    /// Replace the current track collection wholesale for one release.
    pub fn select_release(&mut self, release_id: &str, tracks: Vec<Track>) {
        self.selected_release = Some(release_id.to_string());
        self.current_tracks = tracks;
    }

    /// Remove one release from the collection (set difference, no undo).
    ///
    /// Removing the currently selected release also clears the track
    /// selection. Returns true if a release was actually removed.
    pub fn remove_release(&mut self, release_id: &str) -> bool {
        let before = self.releases.len();
        self.releases.retain(|r| r.id != release_id);
        let removed = self.releases.len() != before;
        if removed && self.selected_release.as_deref() == Some(release_id) {
            self.selected_release = None;
            self.current_tracks = Vec::new();
        }
        removed
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn artist(&self) -> Option<&Artist> {
        self.artist.as_ref()
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn selected_release(&self) -> Option<&str> {
        self.selected_release.as_deref()
    }

    pub fn current_tracks(&self) -> &[Track] {
        &self.current_tracks
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
