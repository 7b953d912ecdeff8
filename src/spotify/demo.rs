use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::time::sleep;

use crate::{
    error::ApiError,
    spotify::MusicApi,
    types::{
        CreatePlaylistRequest, Credential, Locator, Page, Playlist, PlaylistTrackItem,
        PlaylistTracksRef, Profile, TrackObject, TrackReference,
    },
    utils::TRACK_BATCH_SIZE,
};

const DEMO_PAGE_SIZE: usize = 50;

const DEMO_PLAYLISTS: [(&str, &str, u64); 7] = [
    ("1", "Summer Vibes 2024", 45),
    ("2", "Coding Focus", 120),
    ("3", "Workout Mix", 32),
    ("4", "Sad Boi Hours", 15),
    ("5", "Cowboy songs 2025", 57),
    ("6", "Late night driving", 9),
    ("7", "Road Trip", 88),
];

/// Artificial latency per call kind.
#[derive(Debug, Clone, Copy)]
pub struct DemoDelays {
    pub fetch: Duration,
    pub create: Duration,
    pub add: Duration,
}

impl Default for DemoDelays {
    fn default() -> Self {
        DemoDelays {
            fetch: Duration::from_millis(800),
            create: Duration::from_millis(500),
            add: Duration::from_millis(500),
        }
    }
}

impl DemoDelays {
    /// No latency at all.
    pub fn none() -> Self {
        DemoDelays {
            fetch: Duration::ZERO,
            create: Duration::ZERO,
            add: Duration::ZERO,
        }
    }
}

/// Offline stand-in for [`super::SpotifyApi`] serving fixed fixtures.
///
/// Only [`DemoApi::SOURCE_TOKEN`] and [`DemoApi::TARGET_TOKEN`] are accepted;
/// any other credential fails profile lookup with `401 Unauthorized`.
#[derive(Debug)]
pub struct DemoApi {
    delays: DemoDelays,
    created: AtomicUsize,
}

impl Default for DemoApi {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoApi {
    pub const SOURCE_TOKEN: &'static str = "demo-source";
    pub const TARGET_TOKEN: &'static str = "demo-target";

    /// Creates a demo client with the default artificial latency.
    ///
    /// # Fixtures
    ///
    /// - Source account `demo_user_1` ("Alice (Demo)") with seven playlists,
    ///   from "Summer Vibes 2024" (45 tracks) to "Road Trip" (88 tracks)
    /// - Target account `demo_user_2` ("Bob (Demo)")
    /// - Track pages of 50 entries, every entry a catalog track
    /// - Created playlists get ids `demo_new_id_1`, `demo_new_id_2`, ...
    ///
    /// # Example
    ///
    /// ```
    /// let mut migrator = Migrator::new(DemoApi::new());
    /// migrator
    ///     .connect(DemoApi::source_credential(), DemoApi::target_credential())
    ///     .await?;
    /// ```
    pub fn new() -> Self {
        Self::with_delays(DemoDelays::default())
    }

    /// Creates a demo client with custom latency, e.g. [`DemoDelays::none`]
    /// in tests.
    ///
    /// # Arguments
    ///
    /// * `delays` - Sleep applied before each fetch, create and add call
    pub fn with_delays(delays: DemoDelays) -> Self {
        DemoApi {
            delays,
            created: AtomicUsize::new(0),
        }
    }

    pub fn source_credential() -> Credential {
        Credential::new(Self::SOURCE_TOKEN)
    }

    pub fn target_credential() -> Credential {
        Credential::new(Self::TARGET_TOKEN)
    }

    /// Number of playlists created so far.
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

fn not_found(locator: &Locator) -> ApiError {
    ApiError::Status {
        status: StatusCode::NOT_FOUND,
        message: format!("no demo resource at {}", locator),
    }
}

/// Splits `demo:<kind>:<id>?offset=<n>` into id and offset.
fn parse_demo_locator<'a>(locator: &'a Locator, kind: &str) -> Option<(&'a str, usize)> {
    let rest = locator.as_str().strip_prefix("demo:")?;
    let rest = rest.strip_prefix(kind)?.strip_prefix(':')?;
    let (id, query) = rest.split_once('?')?;
    let offset = query.strip_prefix("offset=")?.parse().ok()?;
    Some((id, offset))
}

fn page_locator(kind: &str, id: &str, offset: usize) -> Locator {
    Locator::new(format!("demo:{kind}:{id}?offset={offset}"))
}

fn next_locator(kind: &str, id: &str, offset: usize, total: usize) -> Option<Locator> {
    let next = offset + DEMO_PAGE_SIZE;
    (next < total).then(|| page_locator(kind, id, next))
}

#[async_trait]
impl MusicApi for DemoApi {
    async fn get_profile(&self, credential: &Credential) -> Result<Profile, ApiError> {
        let (id, name) = match credential.secret() {
            Self::SOURCE_TOKEN => ("demo_user_1", "Alice (Demo)"),
            Self::TARGET_TOKEN => ("demo_user_2", "Bob (Demo)"),
            _ => {
                return Err(ApiError::Status {
                    status: StatusCode::UNAUTHORIZED,
                    message: "The access token expired".to_string(),
                });
            }
        };

        Ok(Profile {
            id: id.to_string(),
            display_name: Some(name.to_string()),
        })
    }

    fn playlists_locator(&self, user_id: &str) -> Locator {
        page_locator("playlists", user_id, 0)
    }

    async fn list_playlists_page(
        &self,
        _credential: &Credential,
        locator: &Locator,
    ) -> Result<Page<Option<Playlist>>, ApiError> {
        let (user_id, offset) =
            parse_demo_locator(locator, "playlists").ok_or_else(|| not_found(locator))?;

        let items = DEMO_PLAYLISTS
            .iter()
            .skip(offset)
            .take(DEMO_PAGE_SIZE)
            .map(|(id, name, total)| {
                Some(Playlist {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: None,
                    tracks: PlaylistTracksRef {
                        href: page_locator("tracks", id, 0),
                        total: *total,
                    },
                })
            })
            .collect();

        Ok(Page {
            items,
            next: next_locator("playlists", user_id, offset, DEMO_PLAYLISTS.len()),
        })
    }

    async fn list_tracks_page(
        &self,
        _credential: &Credential,
        locator: &Locator,
    ) -> Result<Page<PlaylistTrackItem>, ApiError> {
        sleep(self.delays.fetch).await;

        let (playlist_id, offset) =
            parse_demo_locator(locator, "tracks").ok_or_else(|| not_found(locator))?;
        let total = DEMO_PLAYLISTS
            .iter()
            .find(|(id, _, _)| *id == playlist_id)
            .map(|(_, _, total)| *total as usize)
            .ok_or_else(|| not_found(locator))?;

        let items = (offset..total.min(offset + DEMO_PAGE_SIZE))
            .map(|n| PlaylistTrackItem {
                track: Some(TrackObject {
                    uri: Some(format!("spotify:track:demo{playlist_id}x{n}")),
                    is_local: false,
                }),
            })
            .collect();

        Ok(Page {
            items,
            next: next_locator("tracks", playlist_id, offset, total),
        })
    }

    async fn create_playlist(
        &self,
        _credential: &Credential,
        _user_id: &str,
        _request: &CreatePlaylistRequest,
    ) -> Result<String, ApiError> {
        sleep(self.delays.create).await;
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("demo_new_id_{n}"))
    }

    async fn add_tracks(
        &self,
        _credential: &Credential,
        _playlist_id: &str,
        uris: &[TrackReference],
    ) -> Result<(), ApiError> {
        sleep(self.delays.add).await;

        if uris.len() > TRACK_BATCH_SIZE.get() {
            return Err(ApiError::Status {
                status: StatusCode::BAD_REQUEST,
                message: "Too many ids requested".to_string(),
            });
        }

        Ok(())
    }
}
