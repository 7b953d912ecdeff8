use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::{
    error::{MigrateError, Result},
    migration::{
        ConnectedAccount, CopyContext, CopyResult, Phase, RunObserver, RunState, RunTracker,
        connect, copier,
    },
    spotify::MusicApi,
    types::{AccountRole, Credential, PlaylistSummary, Profile},
};

pub const COMPLETE_ACTION: &str = "Migration Complete!";

/// Connected accounts and the playlists fetched from the source.
struct Session {
    source: ConnectedAccount,
    target: ConnectedAccount,
    playlists: Vec<PlaylistSummary>,
    selection: HashSet<String>,
}

/// Outcome of one playlist within a run.
#[derive(Debug, Clone)]
pub struct PlaylistOutcome {
    pub playlist: PlaylistSummary,
    pub result: CopyResult,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcomes: Vec<PlaylistOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_success())
            .count()
    }

    pub fn tracks_added(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.result {
                CopyResult::Success { tracks_added } => tracks_added,
                CopyResult::Failure { .. } => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &PlaylistOutcome> {
        self.outcomes.iter().filter(|o| !o.result.is_success())
    }
}

/// Drives a migration session through `Idle → Selecting → Transferring → Complete`.
///
/// Playlists are copied strictly one after another, so log lines and progress
/// updates arrive in call order. The selection is frozen when a run starts.
pub struct Migrator<A> {
    api: A,
    phase: Phase,
    session: Option<Session>,
    run: RunTracker,
}

impl<A: MusicApi> Migrator<A> {
    pub fn new(api: A) -> Self {
        Migrator {
            api,
            phase: Phase::Idle,
            session: None,
            run: RunTracker::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run_state(&self) -> &RunState {
        self.run.state()
    }

    /// Registers an observer notified after every run state mutation.
    pub fn subscribe(&mut self, observer: impl RunObserver + 'static) {
        self.run.subscribe(Box::new(observer));
    }

    fn expect_phase(&self, allowed: &[Phase], action: &'static str) -> Result<()> {
        if allowed.contains(&self.phase) {
            return Ok(());
        }
        Err(MigrateError::InvalidTransition {
            from: self.phase,
            action,
        })
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.run.phase(phase);
    }

    /// Validates both credentials and fetches the source playlists.
    ///
    /// Steps run in order: source profile, target profile, source playlists.
    /// On success the migrator moves to [`Phase::Selecting`] with an empty
    /// selection.
    ///
    /// # Arguments
    ///
    /// * `source` - Token of the account playlists are read from
    /// * `target` - Token of the account playlists are created on
    ///
    /// # Errors
    ///
    /// - [`MigrateError::InvalidTransition`] - Not idle
    /// - [`MigrateError::Auth`] - A token was rejected; names the account
    /// - [`MigrateError::CollectionFetch`] - A playlist page failed
    ///
    /// Nothing is kept when any step fails; the migrator stays idle.
    pub async fn connect(&mut self, source: Credential, target: Credential) -> Result<()> {
        self.expect_phase(&[Phase::Idle], "connect accounts")?;

        let source = connect::validate(&self.api, AccountRole::Source, source).await?;
        let target = connect::validate(&self.api, AccountRole::Target, target).await?;
        let playlists = connect::fetch_playlists(&self.api, &source).await?;

        self.session = Some(Session {
            source,
            target,
            playlists,
            selection: HashSet::new(),
        });
        self.enter(Phase::Selecting);
        Ok(())
    }

    pub fn source_profile(&self) -> Option<&Profile> {
        self.session.as_ref().map(|s| &s.source.profile)
    }

    pub fn target_profile(&self) -> Option<&Profile> {
        self.session.as_ref().map(|s| &s.target.profile)
    }

    /// Source playlists in fetch order; empty while idle.
    pub fn playlists(&self) -> &[PlaylistSummary] {
        self.session
            .as_ref()
            .map(|s| s.playlists.as_slice())
            .unwrap_or_default()
    }

    /// Selected playlists in fetch order.
    pub fn selected(&self) -> Vec<&PlaylistSummary> {
        match &self.session {
            Some(s) => s
                .playlists
                .iter()
                .filter(|p| s.selection.contains(&p.id))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn is_selected(&self, playlist_id: &str) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.selection.contains(playlist_id))
    }

    fn selecting_session(&mut self) -> Result<&mut Session> {
        self.expect_phase(&[Phase::Selecting], "change the selection")?;
        self.session.as_mut().ok_or(MigrateError::InvalidTransition {
            from: Phase::Idle,
            action: "change the selection",
        })
    }

    /// Adds a playlist to the selection. Returns `false` for unknown ids.
    pub fn select(&mut self, playlist_id: &str) -> Result<bool> {
        let session = self.selecting_session()?;
        if !session.playlists.iter().any(|p| p.id == playlist_id) {
            return Ok(false);
        }
        session.selection.insert(playlist_id.to_string());
        Ok(true)
    }

    pub fn deselect(&mut self, playlist_id: &str) -> Result<()> {
        self.selecting_session()?.selection.remove(playlist_id);
        Ok(())
    }

    /// Flips the selection of a playlist and returns whether it is now
    /// selected. Unknown ids are left alone.
    pub fn toggle(&mut self, playlist_id: &str) -> Result<bool> {
        let session = self.selecting_session()?;
        if session.selection.remove(playlist_id) {
            return Ok(false);
        }
        if !session.playlists.iter().any(|p| p.id == playlist_id) {
            return Ok(false);
        }
        session.selection.insert(playlist_id.to_string());
        Ok(true)
    }

    /// Selects every playlist, or clears the selection when everything is
    /// already selected.
    pub fn select_all(&mut self) -> Result<()> {
        let session = self.selecting_session()?;
        if session.selection.len() == session.playlists.len() {
            session.selection.clear();
        } else {
            session.selection = session.playlists.iter().map(|p| p.id.clone()).collect();
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) -> Result<()> {
        self.selecting_session()?.selection.clear();
        Ok(())
    }

    /// Copies every selected playlist, in fetch order, then moves to
    /// `Complete`.
    ///
    /// The selection is copied into a queue before the first playlist, so
    /// `total` is fixed for the whole run. Observers see every log line and
    /// progress step as it happens.
    ///
    /// # Returns
    ///
    /// A [`RunReport`] with one outcome per queued playlist and the start and
    /// finish time of the run.
    ///
    /// # Errors
    ///
    /// - [`MigrateError::InvalidTransition`] - Not in [`Phase::Selecting`]
    /// - [`MigrateError::EmptySelection`] - Nothing selected; phase unchanged
    ///
    /// Per-playlist failures are logged and do not stop the run. `completed`
    /// advances once per playlist regardless of its outcome.
    pub async fn run(&mut self) -> Result<RunReport> {
        self.expect_phase(&[Phase::Selecting], "start a transfer")?;
        let queue: Vec<PlaylistSummary> = self.selected().into_iter().cloned().collect();
        if queue.is_empty() {
            return Err(MigrateError::EmptySelection);
        }

        let Some(session) = self.session.as_ref() else {
            return Err(MigrateError::InvalidTransition {
                from: Phase::Idle,
                action: "start a transfer",
            });
        };

        self.phase = Phase::Transferring;
        self.run.phase(Phase::Transferring);
        self.run.reset(queue.len());

        let ctx = CopyContext {
            api: &self.api,
            source: &session.source,
            target: &session.target,
        };
        let run = &mut self.run;
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(queue.len());

        for playlist in queue {
            run.set_action(format!("Copying \"{}\"...", playlist.name));
            run.log(format!("Starting migration for: {}", playlist.name));

            let result =
                copier::copy_playlist(ctx, &playlist, &mut |line: String| run.log(line)).await;
            if let CopyResult::Failure { message } = &result {
                run.log(format!("ERROR copying {}: {}", playlist.name, message));
            }

            run.advance();
            outcomes.push(PlaylistOutcome { playlist, result });
        }

        run.set_action(COMPLETE_ACTION);
        self.enter(Phase::Complete);

        Ok(RunReport {
            outcomes,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Goes back to selection after a run, keeping playlists and selection.
    pub fn copy_more(&mut self) -> Result<()> {
        self.expect_phase(&[Phase::Complete], "copy more playlists")?;
        self.run.reset(0);
        self.enter(Phase::Selecting);
        Ok(())
    }

    /// Forgets both accounts so new credentials can be connected.
    pub fn start_over(&mut self) -> Result<()> {
        self.expect_phase(&[Phase::Selecting, Phase::Complete], "start over")?;
        self.session = None;
        self.run.reset(0);
        self.enter(Phase::Idle);
        Ok(())
    }
}
