// Chapter-aware audiobook playback core: decodes media-button click/hold
// gestures and drives mark-aware seeking over a host-provided transport.

pub mod button;
pub mod chapters;
pub mod controls;
pub mod player;
pub mod seek;
pub mod settings;

pub use button::{KeyCode, KeyEvent, KeyTransition, MediaButtonHandler};
pub use chapters::{Chapter, ChapterMark, ChapterStore, ChapterStoreError};
pub use player::{MediaItemId, Player};
pub use seek::{SeekHandle, SeekService};
pub use settings::{SettingsError, SettingsStore};
