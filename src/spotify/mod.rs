//! # Spotify Integration Module
//!
//! This module defines the capability the migration engine needs from a music
//! service and provides two interchangeable implementations of it:
//!
//! ```text
//! Migration Layer (Paginator, Copier, Orchestrator)
//!          ↓
//! MusicApi capability
//!     ├── SpotifyApi (reqwest, JSON over HTTPS)
//!     └── DemoApi    (fixed fixtures, artificial delays)
//!          ↓
//! Spotify Web API / nothing
//! ```
//!
//! The implementation is chosen once at startup. Business logic never
//! branches on demo versus live mode; it only talks to [`MusicApi`].
//!
//! ## API Coverage
//!
//! - `GET /me` - Profile of the account owning a credential
//! - `GET /users/{user_id}/playlists` - Paginated playlists of an account
//! - `GET /playlists/{playlist_id}/tracks` - Paginated track entries
//! - `POST /users/{user_id}/playlists` - Create a new playlist
//! - `POST /playlists/{playlist_id}/tracks` - Add up to 100 tracks
//!
//! ## Error Handling
//!
//! Every call returns [`ApiError`] on failure. Calls are never retried here;
//! the caller decides what a failure means for the run.

mod demo;
mod live;

use async_trait::async_trait;

pub use demo::{DemoApi, DemoDelays};
pub use live::SpotifyApi;

use crate::{
    error::ApiError,
    types::{
        CreatePlaylistRequest, Credential, Locator, Page, Playlist, PlaylistTrackItem, Profile,
        TrackReference,
    },
};

/// Operations the migration engine performs against a music service.
///
/// Pages are addressed by [`Locator`]; a page's `next` locator is fed back
/// into the same method until it is absent.
#[async_trait]
pub trait MusicApi: Send + Sync {
    /// Profile of the account the credential belongs to.
    async fn get_profile(&self, credential: &Credential) -> Result<Profile, ApiError>;

    /// Locator of the first page of an account's playlists.
    fn playlists_locator(&self, user_id: &str) -> Locator;

    /// One page of playlists. Entries may be null.
    async fn list_playlists_page(
        &self,
        credential: &Credential,
        locator: &Locator,
    ) -> Result<Page<Option<Playlist>>, ApiError>;

    /// One page of a playlist's track entries.
    async fn list_tracks_page(
        &self,
        credential: &Credential,
        locator: &Locator,
    ) -> Result<Page<PlaylistTrackItem>, ApiError>;

    /// Creates a playlist owned by `user_id` and returns its id.
    async fn create_playlist(
        &self,
        credential: &Credential,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<String, ApiError>;

    /// Appends up to 100 tracks to the end of a playlist.
    async fn add_tracks(
        &self,
        credential: &Credential,
        playlist_id: &str,
        uris: &[TrackReference],
    ) -> Result<(), ApiError>;
}
