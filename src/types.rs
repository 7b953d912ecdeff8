use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Bearer token authorizing calls against exactly one account.
///
/// The token is never printed: `Debug` redacts it so credentials do not end
/// up in logs or panic messages.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into().trim().to_string())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Address of a resource or page, e.g. `https://api.spotify.com/v1/playlists/{id}/tracks`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn new(address: impl Into<String>) -> Self {
        Locator(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which of the two accounts a call or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Source,
    Target,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRole::Source => f.write_str("source"),
            AccountRole::Target => f.write_str("target"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Profile {
    /// Name shown to the user, falling back to the account id when the
    /// account has no display name set.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub track_count: u64,
    pub track_listing_locator: Locator,
}

impl From<Playlist> for PlaylistSummary {
    fn from(playlist: Playlist) -> Self {
        PlaylistSummary {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            track_count: playlist.tracks.total,
            track_listing_locator: playlist.tracks.href,
        }
    }
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub tracks: u64,
    pub id: String,
}

impl From<&PlaylistSummary> for PlaylistTableRow {
    fn from(playlist: &PlaylistSummary) -> Self {
        PlaylistTableRow {
            name: playlist.name.clone(),
            tracks: playlist.track_count,
            id: playlist.id.clone(),
        }
    }
}

/// Catalog identifier of a single track, e.g. `spotify:track:4uLU6hMCjMI75M1A2tKUQC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackReference(String);

impl TrackReference {
    /// Accepts only `<scheme>:track:<id>` references. Local files
    /// (`spotify:local:...`), episodes and anything else without a catalog
    /// identity are rejected.
    pub fn parse(uri: &str) -> Option<Self> {
        let mut parts = uri.splitn(3, ':');
        let scheme = parts.next()?;
        let kind = parts.next()?;
        let id = parts.next()?;

        if scheme.is_empty() || kind != "track" || id.is_empty() {
            return None;
        }

        Some(TrackReference(uri.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a paginated collection. `next` is the locator of the
/// following page, absent on the last one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<Locator>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub tracks: PlaylistTracksRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub href: Locator,
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistTrackItem {
    #[serde(default)]
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackObject {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub is_local: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<TrackReference>,
}
