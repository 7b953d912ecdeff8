use std::num::NonZeroUsize;

use crate::types::{PlaylistTrackItem, TrackReference};

/// Maximum number of track references the add-tracks endpoint accepts per request.
pub const TRACK_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(size) => size,
    None => unreachable!(),
};

/// Splits `items` into consecutive batches of at most `size` elements.
///
/// Batches cover the input in order without gaps or overlap. An empty input
/// yields no batches at all rather than a single empty one.
pub fn batch<T>(items: &[T], size: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(size.get()).collect()
}

/// Maps one page of playlist entries to the track references that can be
/// transferred, keeping their order.
///
/// Entries without a track object, local files and anything whose uri is not
/// a catalog track identifier are skipped.
pub fn extract_track_references(items: &[PlaylistTrackItem]) -> Vec<TrackReference> {
    items
        .iter()
        .filter_map(|item| item.track.as_ref())
        .filter(|track| !track.is_local)
        .filter_map(|track| track.uri.as_deref())
        .filter_map(TrackReference::parse)
        .collect()
}

/// Description used for the copy: the source description when it has any
/// non-blank content, otherwise a note naming the source account.
pub fn playlist_description(description: Option<&str>, source_account: &str) -> String {
    match description {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => format!("Copied from {} via Spotify Migrator", source_account),
    }
}
