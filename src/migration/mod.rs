//! # Migration Module
//!
//! The migration engine: everything between "two connected accounts" and
//! "playlists copied to the target".
//!
//! ```text
//! Migrator (lifecycle, selection, run accounting)
//!     ↓ one playlist at a time
//! copy_playlist
//!     ├── Paginator + extract_track_references  (source tracks)
//!     ├── create_playlist                       (target)
//!     └── batch + add_tracks                    (target, ≤ 100 per call)
//!     ↓
//! RunState → RunObserver (presentation layer)
//! ```
//!
//! Failures of a single playlist are turned into a [`CopyResult::Failure`]
//! and logged; only connect-time errors abort an attempt.

mod connect;
mod copier;
mod orchestrator;
mod paginate;
mod state;

pub use connect::{ConnectedAccount, fetch_playlists, validate};
pub use copier::{CopyContext, CopyResult, copy_playlist, fetch_tracks};
pub use orchestrator::{COMPLETE_ACTION, Migrator, PlaylistOutcome, RunReport};
pub use paginate::Paginator;
pub use state::{Phase, RunChange, RunObserver, RunState};

pub(crate) use state::RunTracker;
