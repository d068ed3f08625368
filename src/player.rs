use std::time::Duration;

/// Opaque reference to a media item in the player's current timeline.
///
/// The host maps these to whatever it uses as chapter identifiers; the
/// seek engine only ever passes them back to the [`ChapterStore`].
///
/// [`ChapterStore`]: crate::chapters::ChapterStore
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaItemId(pub String);

impl MediaItemId {
    pub fn new(id: impl Into<String>) -> Self {
        MediaItemId(id.into())
    }
}

impl std::fmt::Display for MediaItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Transport facade over the host's media player.
///
/// Position, duration and adjacent-item indices report `None` when the
/// transport has no value yet (e.g. during track transitions). Callers
/// must treat `None` as "abort this operation", never as zero.
///
/// Other actors may drive the same transport concurrently, so consumers
/// re-read state per operation instead of caching it.
pub trait Player: Send + Sync {
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn is_playing(&self) -> bool;

    fn current_position(&self) -> Option<Duration>;
    fn duration(&self) -> Option<Duration>;

    fn current_media_item_index(&self) -> Option<usize>;
    fn previous_media_item_index(&self) -> Option<usize>;
    fn next_media_item_index(&self) -> Option<usize>;
    fn media_item_at(&self, index: usize) -> Option<MediaItemId>;

    /// Seek within the current media item.
    fn seek_to(&self, position: Duration);
    /// Seek to a position inside another media item.
    fn seek_to_item(&self, index: usize, position: Duration);
    /// Advance to the start of the next media item, if any.
    fn seek_to_next(&self);
}
