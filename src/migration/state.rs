use std::fmt;

/// Lifecycle of a migration session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No accounts connected.
    Idle,
    /// Accounts connected, playlists fetched, selection editable.
    Selecting,
    /// Selected playlists are being copied.
    Transferring,
    /// Last run finished.
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Selecting => "selecting",
            Phase::Transferring => "transferring",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Progress and log of the current run, as seen by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunState {
    pub total: usize,
    pub completed: usize,
    pub current_action: String,
    pub log: Vec<String>,
}

impl RunState {
    /// Share of the run that is done, from 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }

    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

/// What changed in the [`RunState`] since the last notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunChange {
    /// The session moved to another phase.
    Phase(Phase),
    /// State was reset for a new run or cleared.
    Reset,
    /// `current_action` was replaced.
    Action,
    /// One line was appended to `log`.
    Log,
    /// `completed` advanced by one.
    Progress,
}

/// Read-only subscriber to run state changes.
///
/// Called synchronously, in order, after every mutation.
pub trait RunObserver: Send + Sync {
    fn on_change(&self, state: &RunState, change: RunChange);
}

/// Owns the [`RunState`] and fans every mutation out to the observers.
#[derive(Default)]
pub(crate) struct RunTracker {
    state: RunState,
    observers: Vec<Box<dyn RunObserver>>,
}

impl RunTracker {
    pub(crate) fn state(&self) -> &RunState {
        &self.state
    }

    pub(crate) fn subscribe(&mut self, observer: Box<dyn RunObserver>) {
        self.observers.push(observer);
    }

    fn notify(&self, change: RunChange) {
        for observer in &self.observers {
            observer.on_change(&self.state, change);
        }
    }

    pub(crate) fn phase(&self, phase: Phase) {
        self.notify(RunChange::Phase(phase));
    }

    pub(crate) fn reset(&mut self, total: usize) {
        self.state = RunState {
            total,
            ..RunState::default()
        };
        self.notify(RunChange::Reset);
    }

    pub(crate) fn set_action(&mut self, action: impl Into<String>) {
        self.state.current_action = action.into();
        self.notify(RunChange::Action);
    }

    pub(crate) fn log(&mut self, line: impl Into<String>) {
        self.state.log.push(line.into());
        self.notify(RunChange::Log);
    }

    pub(crate) fn advance(&mut self) {
        self.state.completed += 1;
        self.notify(RunChange::Progress);
    }
}
