use tabled::Table;

use crate::{
    cli::progress,
    error, migration,
    spotify::MusicApi,
    success,
    types::{AccountRole, Credential, PlaylistTableRow},
    warning,
};

/// Prints every playlist of the source account as a table.
pub async fn list_playlists<A: MusicApi>(api: A, source: Credential) {
    let pb = progress::spinner("Fetching source playlists...");

    let account = match migration::validate(&api, AccountRole::Source, source).await {
        Ok(account) => account,
        Err(e) => {
            pb.finish_and_clear();
            error!("{}", e);
        }
    };

    let playlists = match migration::fetch_playlists(&api, &account).await {
        Ok(playlists) => playlists,
        Err(e) => {
            pb.finish_and_clear();
            error!("{}", e);
        }
    };
    pb.finish_and_clear();

    if playlists.is_empty() {
        warning!("No playlists found on source account.");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists.iter().map(PlaylistTableRow::from).collect();
    println!("{}", Table::new(rows));
    success!(
        "{} has {} playlists.",
        account.profile.label(),
        playlists.len()
    );
}
