//! # CLI Module
//!
//! This module provides the command-line interface layer for the playlist
//! migrator. It is the presentation layer on top of the migration engine: it
//! turns command-line input into a selection, renders run progress and prints
//! the final report.
//!
//! ## Commands
//!
//! - [`list_playlists`] - Shows every playlist of the source account
//! - [`migrate`] - Copies the selected playlists to the target account
//!
//! ## Architecture Design
//!
//! ```text
//! CLI Layer (User Interface, progress rendering)
//!     ↓
//! Migration Layer (Migrator, copier, paginator)
//!     ↓
//! API Layer (MusicApi: SpotifyApi or DemoApi)
//!     ↓
//! Network Layer (HTTP Requests)
//! ```
//!
//! The CLI is generic over [`crate::spotify::MusicApi`]; the binary picks the
//! live client or the demo fixtures once, before any command runs.
//!
//! ## Progress and User Experience
//!
//! - **Spinners** while accounts are connected and playlists fetched
//! - **Progress bar** with `completed/total` and the current playlist
//! - **Log lines** printed above the bar as soon as the engine produces them
//! - **Summary** with attempted and succeeded counts at the end
//!
//! Fatal errors (invalid token, playlists not readable, empty selection) are
//! printed with [`crate::error!`] and end the process. Failures of single
//! playlists during a transfer only show up in the log and the summary.

mod list;
mod migrate;
mod progress;

pub use list::list_playlists;
pub use migrate::Selection;
pub use migrate::migrate;
pub use progress::TerminalProgress;
