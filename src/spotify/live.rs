use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::{
    config::MigratorConfig,
    error::ApiError,
    spotify::MusicApi,
    types::{
        AddTrackToPlaylistRequest, CreatePlaylistRequest, CreatePlaylistResponse, Credential,
        Locator, Page, Playlist, PlaylistTrackItem, Profile, TrackReference,
    },
};

/// Longest response body kept in an error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Spotify Web API client authenticated per call with a bearer credential.
///
/// The client holds no token of its own. Every method receives the
/// [`Credential`] of the account it acts on, so one instance serves both the
/// source and the target account of a migration.
#[derive(Debug, Clone)]
pub struct SpotifyApi {
    http: Client,
    api_url: String,
    page_limit: u32,
}

impl SpotifyApi {
    /// Creates a client from the runtime configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Settings read at startup; `api_url` and `page_limit` are used
    ///
    /// # Returns
    ///
    /// A client talking to `config.api_url` (trailing slash removed) that
    /// requests `config.page_limit` playlists per page.
    ///
    /// # Example
    ///
    /// ```
    /// let config = MigratorConfig::from_env();
    /// let api = SpotifyApi::new(&config);
    /// let profile = api.get_profile(&Credential::new(token)).await?;
    /// ```
    pub fn new(config: &MigratorConfig) -> Self {
        SpotifyApi {
            http: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            page_limit: config.page_limit,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        url: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(credential.secret())
            .send()
            .await?;

        decode(check_status(response).await?).await
    }
}

/// Turns a non-success response into [`ApiError::Status`], keeping the start
/// of the body for the error message.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match body.trim() {
        "" => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        text => text.chars().take(ERROR_BODY_LIMIT).collect(),
    };

    Err(ApiError::Status { status, message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl MusicApi for SpotifyApi {
    /// Fetches the profile of the account a credential belongs to.
    ///
    /// # Arguments
    ///
    /// * `credential` - Access token of the account to look up
    ///
    /// # Returns
    ///
    /// - `Ok(Profile)` - Account id and display name
    /// - `Err(ApiError)` - Network failure, non-success status (expired or
    ///   invalid token) or a body that is not a profile
    ///
    /// # API Endpoint
    ///
    /// Uses Spotify's `GET /me` endpoint.
    async fn get_profile(&self, credential: &Credential) -> Result<Profile, ApiError> {
        let url = format!("{uri}/me", uri = self.api_url);
        self.get_json(credential, &url).await
    }

    fn playlists_locator(&self, user_id: &str) -> Locator {
        Locator::new(format!(
            "{uri}/users/{user_id}/playlists?limit={limit}",
            uri = self.api_url,
            user_id = user_id,
            limit = self.page_limit
        ))
    }

    /// Fetches one page of an account's playlists.
    ///
    /// # Arguments
    ///
    /// * `credential` - Access token of the account owning the playlists
    /// * `locator` - Absolute page URL, either from
    ///   [`MusicApi::playlists_locator`] or the `next` link of the previous page
    ///
    /// # Returns
    ///
    /// - `Ok(Page<Option<Playlist>>)` - Entries of the page; deleted or
    ///   unavailable playlists come back as `None`
    /// - `Err(ApiError)` - Network failure, non-success status or bad body
    async fn list_playlists_page(
        &self,
        credential: &Credential,
        locator: &Locator,
    ) -> Result<Page<Option<Playlist>>, ApiError> {
        self.get_json(credential, locator.as_str()).await
    }

    /// Fetches one page of a playlist's track entries.
    ///
    /// # Arguments
    ///
    /// * `credential` - Access token of the source account
    /// * `locator` - The playlist's `tracks.href` or a `next` link
    ///
    /// # Returns
    ///
    /// - `Ok(Page<PlaylistTrackItem>)` - Raw entries, including local files
    ///   and entries without a track
    /// - `Err(ApiError)` - Network failure, non-success status or bad body
    async fn list_tracks_page(
        &self,
        credential: &Credential,
        locator: &Locator,
    ) -> Result<Page<PlaylistTrackItem>, ApiError> {
        self.get_json(credential, locator.as_str()).await
    }

    /// Creates a new playlist on an account.
    ///
    /// # Arguments
    ///
    /// * `credential` - Access token of the target account
    /// * `user_id` - Id of the account that will own the playlist
    /// * `request` - Name, description and visibility of the new playlist
    ///
    /// # Returns
    ///
    /// - `Ok(String)` - Id of the created playlist
    /// - `Err(ApiError)` - Network failure, non-success status (missing
    ///   `playlist-modify-*` scope, wrong user) or a body without an id
    ///
    /// # API Endpoint
    ///
    /// Uses Spotify's `POST /users/{user_id}/playlists` endpoint.
    async fn create_playlist(
        &self,
        credential: &Credential,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<String, ApiError> {
        let url = format!(
            "{uri}/users/{user_id}/playlists",
            uri = self.api_url,
            user_id = user_id
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(credential.secret())
            .json(request)
            .send()
            .await?;

        let created: CreatePlaylistResponse = decode(check_status(response).await?).await?;
        Ok(created.id)
    }

    /// Appends tracks to the end of a playlist.
    ///
    /// # Arguments
    ///
    /// * `credential` - Access token of the playlist owner
    /// * `playlist_id` - Id of the playlist to extend
    /// * `uris` - At most 100 track references, in the order they are added
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Any success status; the response body (usually a
    ///   `snapshot_id`) is not read
    /// - `Err(ApiError)` - Network failure or non-success status
    ///
    /// # API Endpoint
    ///
    /// Uses Spotify's `POST /playlists/{playlist_id}/tracks` endpoint.
    async fn add_tracks(
        &self,
        credential: &Credential,
        playlist_id: &str,
        uris: &[TrackReference],
    ) -> Result<(), ApiError> {
        let url = format!(
            "{uri}/playlists/{playlist_id}/tracks",
            uri = self.api_url,
            playlist_id = playlist_id
        );
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(credential.secret())
            .json(&body)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}
