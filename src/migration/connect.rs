use crate::{
    error::{MigrateError, Result},
    migration::Paginator,
    spotify::MusicApi,
    types::{AccountRole, Credential, PlaylistSummary, Profile},
};

/// A validated credential together with the profile it belongs to.
#[derive(Debug, Clone)]
pub struct ConnectedAccount {
    pub credential: Credential,
    pub profile: Profile,
}

/// Checks a credential by fetching the profile of its account.
///
/// # Arguments
///
/// * `api` - Music service to ask
/// * `account` - Which side the credential is for; used in the error
/// * `credential` - Token to validate
///
/// # Errors
///
/// Returns [`MigrateError::Auth`] for `account` when the profile lookup
/// fails for any reason (expired token, network error, bad response).
pub async fn validate<A: MusicApi + ?Sized>(
    api: &A,
    account: AccountRole,
    credential: Credential,
) -> Result<ConnectedAccount> {
    let profile = api
        .get_profile(&credential)
        .await
        .map_err(|source| MigrateError::Auth { account, source })?;

    Ok(ConnectedAccount {
        credential,
        profile,
    })
}

/// Fetches every playlist of an account, in the order the API lists them.
///
/// Follows the `next` links from [`MusicApi::playlists_locator`] until the
/// last page. Null entries (deleted or unavailable playlists) are dropped.
///
/// # Errors
///
/// Returns [`MigrateError::CollectionFetch`] if any page fails. No partial
/// list is returned.
pub async fn fetch_playlists<A: MusicApi + ?Sized>(
    api: &A,
    account: &ConnectedAccount,
) -> Result<Vec<PlaylistSummary>> {
    let credential = &account.credential;
    let start = api.playlists_locator(&account.profile.id);

    let playlists = Paginator::new(start, move |locator| async move {
        api.list_playlists_page(credential, &locator).await
    })
    .collect_all()
    .await
    .map_err(|source| MigrateError::CollectionFetch {
        what: "playlists".to_string(),
        source,
    })?;

    Ok(playlists
        .into_iter()
        .flatten()
        .map(PlaylistSummary::from)
        .collect())
}
