use crate::button::MediaButtonHandler;
use crate::player::Player;
use crate::seek::SeekHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Bound on how far the double/triple-click mark seeks may travel, so a
/// long gap between marks becomes a mini-seek instead of a huge jump.
pub const MARK_SEEK_MAX_OFFSET: Duration = Duration::from_secs(5 * 60);

/// Back seek applied while the button is held with no prior clicks.
pub const HOLD_SEEK_BACK: Duration = Duration::from_secs(10);

/// Register the default gesture set on the decoder:
///
/// - 1 click: toggle play/pause (or resume after a 4/5-click scrub)
/// - 2 clicks: seek to the next chapter mark
/// - 3 clicks: seek to the previous chapter mark
/// - 4 clicks: continuous rewind
/// - 5 clicks: continuous fast-forward
/// - hold (no clicks): seek back 10 seconds
///
/// The 4/5-click scrubs remember whether playback was running so the next
/// single click resumes instead of toggling; the 2/3-click seeks resume
/// immediately when that flag is set. Only the closures registered here
/// write the flag.
pub fn bind_default_actions(
    handler: &MediaButtonHandler,
    seek: &SeekHandle,
    player: &Arc<dyn Player>,
) {
    let was_playing_before_seek = Arc::new(AtomicBool::new(false));

    {
        let seek = seek.clone();
        let player = Arc::clone(player);
        let was_playing = Arc::clone(&was_playing_before_seek);
        handler.add_click_action(1, move || {
            debug!("Gesture: single click");
            if was_playing.swap(false, Ordering::SeqCst) {
                seek.play();
            } else if player.is_playing() {
                seek.pause();
            } else {
                seek.play();
            }
        });
    }

    {
        let seek = seek.clone();
        let was_playing = Arc::clone(&was_playing_before_seek);
        handler.add_click_action(2, move || {
            debug!("Gesture: double click");
            seek.seek_to_next_mark(MARK_SEEK_MAX_OFFSET);
            if was_playing.swap(false, Ordering::SeqCst) {
                seek.play();
            }
        });
    }

    {
        let seek = seek.clone();
        let was_playing = Arc::clone(&was_playing_before_seek);
        handler.add_click_action(3, move || {
            debug!("Gesture: triple click");
            seek.seek_to_previous_mark(MARK_SEEK_MAX_OFFSET);
            if was_playing.swap(false, Ordering::SeqCst) {
                seek.play();
            }
        });
    }

    {
        let seek = seek.clone();
        let player = Arc::clone(player);
        let was_playing = Arc::clone(&was_playing_before_seek);
        handler.add_click_action(4, move || {
            debug!("Gesture: 4 clicks");
            was_playing.store(player.is_playing(), Ordering::SeqCst);
            seek.rewind();
        });
    }

    {
        let seek = seek.clone();
        let player = Arc::clone(player);
        let was_playing = Arc::clone(&was_playing_before_seek);
        handler.add_click_action(5, move || {
            debug!("Gesture: 5 clicks");
            was_playing.store(player.is_playing(), Ordering::SeqCst);
            seek.fast_forward();
        });
    }

    {
        let seek = seek.clone();
        handler.add_hold_action(0, move || {
            debug!("Gesture: hold");
            seek.seek_back_by(HOLD_SEEK_BACK);
        });
    }
}
