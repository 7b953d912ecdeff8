use crate::{
    error::{MigrateError, Result},
    migration::{ConnectedAccount, Paginator},
    spotify::MusicApi,
    types::{CreatePlaylistRequest, PlaylistSummary, TrackReference},
    utils::{self, TRACK_BATCH_SIZE},
};

/// Outcome of copying one playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyResult {
    Success { tracks_added: usize },
    Failure { message: String },
}

impl CopyResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CopyResult::Success { .. })
    }
}

/// Accounts and API a playlist is copied with.
pub struct CopyContext<'a, A: ?Sized> {
    pub api: &'a A,
    pub source: &'a ConnectedAccount,
    pub target: &'a ConnectedAccount,
}

impl<A: ?Sized> Clone for CopyContext<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: ?Sized> Copy for CopyContext<'_, A> {}

/// Copies one playlist from the source to the target account.
///
/// Fetches every track page of the source playlist, creates a private
/// playlist with the same name on the target account and appends the
/// transferable tracks in batches of [`TRACK_BATCH_SIZE`].
///
/// # Arguments
///
/// * `ctx` - API client and both connected accounts
/// * `playlist` - Source playlist to copy
/// * `log` - Receives one line per completed step
///
/// # Returns
///
/// - `CopyResult::Success { tracks_added }` - Every batch was accepted;
///   `tracks_added` is 0 for a playlist without transferable tracks
/// - `CopyResult::Failure { message }` - The first failing step, rendered
///   from its [`MigrateError`]
///
/// # Log Lines
///
/// - `Fetched N tracks.`
/// - `Created playlist "NAME" on target account.`
/// - `Successfully added N tracks.` or
///   `Skipping track addition: No valid tracks found.`
///
/// # Partial Writes
///
/// Nothing is rolled back. A playlist created before a failed batch stays on
/// the target account together with the batches that were accepted.
pub async fn copy_playlist<A, L>(
    ctx: CopyContext<'_, A>,
    playlist: &PlaylistSummary,
    log: &mut L,
) -> CopyResult
where
    A: MusicApi + ?Sized,
    L: FnMut(String),
{
    match try_copy(ctx, playlist, log).await {
        Ok(tracks_added) => CopyResult::Success { tracks_added },
        Err(e) => CopyResult::Failure {
            message: e.to_string(),
        },
    }
}

async fn try_copy<A, L>(
    ctx: CopyContext<'_, A>,
    playlist: &PlaylistSummary,
    log: &mut L,
) -> Result<usize>
where
    A: MusicApi + ?Sized,
    L: FnMut(String),
{
    let tracks = fetch_tracks(ctx, playlist).await?;
    log(format!("Fetched {} tracks.", tracks.len()));

    let playlist_id = create_copy(ctx, playlist).await?;
    log(format!(
        "Created playlist \"{}\" on target account.",
        playlist.name
    ));

    if tracks.is_empty() {
        log("Skipping track addition: No valid tracks found.".to_string());
        return Ok(0);
    }

    add_tracks(ctx, &playlist_id, &tracks).await?;
    log(format!("Successfully added {} tracks.", tracks.len()));

    Ok(tracks.len())
}

/// All transferable track references of a playlist, in playlist order.
///
/// # Errors
///
/// Returns [`MigrateError::CollectionFetch`] naming the playlist when any
/// track page fails; tracks of earlier pages are discarded.
pub async fn fetch_tracks<A: MusicApi + ?Sized>(
    ctx: CopyContext<'_, A>,
    playlist: &PlaylistSummary,
) -> Result<Vec<TrackReference>> {
    let api = ctx.api;
    let credential = &ctx.source.credential;

    let mut pages = Paginator::new(
        playlist.track_listing_locator.clone(),
        move |locator| async move { api.list_tracks_page(credential, &locator).await },
    );

    let mut tracks = Vec::new();
    while let Some(page) = pages.next_page().await {
        let items = page.map_err(|source| MigrateError::CollectionFetch {
            what: format!("tracks of \"{}\"", playlist.name),
            source,
        })?;
        tracks.extend(utils::extract_track_references(&items));
    }

    Ok(tracks)
}

async fn create_copy<A: MusicApi + ?Sized>(
    ctx: CopyContext<'_, A>,
    playlist: &PlaylistSummary,
) -> Result<String> {
    let request = CreatePlaylistRequest {
        name: playlist.name.clone(),
        description: utils::playlist_description(
            playlist.description.as_deref(),
            ctx.source.profile.label(),
        ),
        public: false,
    };

    ctx.api
        .create_playlist(&ctx.target.credential, &ctx.target.profile.id, &request)
        .await
        .map_err(|source| MigrateError::Write {
            what: format!("create playlist \"{}\"", playlist.name),
            source,
        })
}

async fn add_tracks<A: MusicApi + ?Sized>(
    ctx: CopyContext<'_, A>,
    playlist_id: &str,
    tracks: &[TrackReference],
) -> Result<()> {
    let batches = utils::batch(tracks, TRACK_BATCH_SIZE);
    let count = batches.len();

    for (n, chunk) in batches.into_iter().enumerate() {
        ctx.api
            .add_tracks(&ctx.target.credential, playlist_id, chunk)
            .await
            .map_err(|source| MigrateError::Write {
                what: format!("add track batch {}/{}", n + 1, count),
                source,
            })?;
    }

    Ok(())
}
