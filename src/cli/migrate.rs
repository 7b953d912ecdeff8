use crate::{
    cli::progress::{self, TerminalProgress},
    error, info,
    migration::{Migrator, RunReport},
    spotify::MusicApi,
    success,
    types::Credential,
    warning,
};

/// Which source playlists to copy.
#[derive(Debug, Clone)]
pub enum Selection {
    All,
    /// Playlist ids or exact playlist names.
    Named(Vec<String>),
}

/// Connects both accounts, applies the selection and copies the playlists.
pub async fn migrate<A: MusicApi>(
    api: A,
    source: Credential,
    target: Credential,
    selection: Selection,
) {
    let mut migrator = Migrator::new(api);

    let pb = progress::spinner("Connecting accounts...");
    if let Err(e) = migrator.connect(source, target).await {
        pb.finish_and_clear();
        error!("{}", e);
    }
    pb.finish_and_clear();

    if let (Some(from), Some(to)) = (migrator.source_profile(), migrator.target_profile()) {
        success!("Connected {} → {}", from.label(), to.label());
    }
    info!(
        "Found {} playlists on source account.",
        migrator.playlists().len()
    );

    apply_selection(&mut migrator, &selection);

    let selected = migrator.selected().len();
    if selected == 0 {
        error!("No playlists selected. Use --all or --playlist <ID or NAME>.");
    }

    info!("Copying {} playlists...", selected);
    warning!("Please do not close this terminal until the transfer completes.");

    let pb = progress::transfer_bar(selected);
    migrator.subscribe(TerminalProgress::new(pb.clone()));

    let report = match migrator.run().await {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            error!("{}", e);
        }
    };
    pb.finish_and_clear();

    print_report(&report, migrator.target_profile().map(|p| p.label()));
}

fn apply_selection<A: MusicApi>(migrator: &mut Migrator<A>, selection: &Selection) {
    match selection {
        Selection::All => {
            if let Err(e) = migrator.select_all() {
                error!("{}", e);
            }
        }
        Selection::Named(wanted) => {
            for entry in wanted {
                let ids: Vec<String> = migrator
                    .playlists()
                    .iter()
                    .filter(|p| p.id == *entry || p.name == *entry)
                    .map(|p| p.id.clone())
                    .collect();

                if ids.is_empty() {
                    warning!("No playlist with id or name \"{}\" on source account.", entry);
                    continue;
                }

                for id in ids {
                    if let Err(e) = migrator.select(&id) {
                        error!("{}", e);
                    }
                }
            }
        }
    }
}

fn print_report(report: &RunReport, target: Option<&str>) {
    let elapsed = report.finished_at - report.started_at;

    success!(
        "Transfer complete! Processed {} playlists to {} in {}s.",
        report.attempted(),
        target.unwrap_or("target account"),
        elapsed.num_seconds()
    );
    info!(
        "{} succeeded, {} tracks added.",
        report.succeeded(),
        report.tracks_added()
    );

    for failed in report.failures() {
        warning!("\"{}\" was not copied completely.", failed.playlist.name);
    }
}
