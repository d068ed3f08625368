//! Seek arithmetic: step seeks with media-item carry, mark-aware seeks,
//! and the continuous fast-forward/rewind loop bodies.
//!
//! Every operation re-reads position/duration from the transport at the
//! moment it runs and treats an unset value as "abort as a no-op".

use crate::chapters::{Chapter, ChapterStore};
use crate::player::Player;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Re-sync pause between continuous-scrub iterations, and the slice of
/// playback the listener hears while scrubbing.
pub const SEEK_PLAY_BUFFER: Duration = Duration::from_millis(850);

/// Nominal step of one fast-forward/rewind iteration.
pub const SCRUB_STEP: Duration = Duration::from_secs(10);

/// Positions deeper than this into a mark make "previous" restart the
/// current mark instead of jumping to the one before it.
pub const BACK_SEEK_THRESHOLD: Duration = Duration::from_millis(3_000);

/// Fixed amount for the coarse step-back request.
pub const STEP_BACK_AMOUNT: Duration = Duration::from_secs(30);

/// Fallback step size when the settings store cannot be read.
pub const DEFAULT_SEEK_TIME: Duration = Duration::from_secs(30);

/// Chapter metadata for the media item at `index`, or `None` when the
/// item or its chapter is unknown. Store failures degrade to `None`.
async fn chapter_at(
    player: &dyn Player,
    chapters: &dyn ChapterStore,
    index: usize,
) -> Option<Chapter> {
    let id = player.media_item_at(index)?;
    match chapters.chapter(&id).await {
        Ok(chapter) => chapter,
        Err(e) => {
            error!("Chapter lookup failed for {}: {}", id, e);
            None
        }
    }
}

async fn current_chapter(player: &dyn Player, chapters: &dyn ChapterStore) -> Option<Chapter> {
    let index = player.current_media_item_index()?;
    chapter_at(player, chapters, index).await
}

/// Seek forward by `amount`, carrying overflow past the end of the
/// current item into the next one. With no next item the target clamps
/// to the current duration.
pub(crate) fn step_seek_forward(player: &dyn Player, amount: Duration) {
    let Some(position) = player.current_position() else {
        return;
    };
    let Some(duration) = player.duration() else {
        return;
    };

    let target = position + amount;
    if target > duration {
        match player.next_media_item_index() {
            Some(next) => player.seek_to_item(next, target - duration),
            None => player.seek_to(duration),
        }
    } else {
        player.seek_to(target);
    }
}

/// Seek back by `amount`, carrying underflow past the start of the
/// current item into the previous one (landing at its duration minus the
/// remainder). With no previous item the target clamps to zero.
pub(crate) async fn step_seek_back(
    player: &dyn Player,
    chapters: &dyn ChapterStore,
    amount: Duration,
) {
    let Some(position) = player.current_position() else {
        return;
    };

    if let Some(target) = position.checked_sub(amount) {
        player.seek_to(target);
        return;
    }

    let underflow = amount - position;
    let Some(previous) = player.previous_media_item_index() else {
        player.seek_to(Duration::ZERO);
        return;
    };
    let Some(chapter) = chapter_at(player, chapters, previous).await else {
        return;
    };
    player.seek_to_item(previous, chapter.duration.saturating_sub(underflow));
}

/// Jump to the next chapter mark's start, advancing no further than
/// `position + max_offset` when `max_offset` is non-zero. With no
/// containing or next mark, fall back to the next media item.
pub(crate) async fn seek_to_next_mark(
    player: &dyn Player,
    chapters: &dyn ChapterStore,
    max_offset: Duration,
) {
    let Some(chapter) = current_chapter(player, chapters).await else {
        return;
    };
    let Some(position) = player.current_position() else {
        return;
    };
    let position_ms = position.as_millis() as u64;

    let Some(current_index) = chapter.mark_index_at(position_ms) else {
        player.seek_to_next();
        return;
    };
    let Some(next_mark) = chapter.marks.get(current_index + 1) else {
        player.seek_to_next();
        return;
    };

    let target_ms = if max_offset.is_zero() {
        next_mark.start_ms
    } else {
        next_mark
            .start_ms
            .min(position_ms + max_offset.as_millis() as u64)
    };
    debug!(
        "Next-mark seek: target={}ms, mark start={}ms",
        target_ms, next_mark.start_ms
    );
    player.seek_to(Duration::from_millis(target_ms));
}

/// Jump back to the start of the current mark (when deep inside it) or to
/// the previous mark, bounded from below by `position - max_offset` when
/// `max_offset` is non-zero. With no previous mark, rewind across the
/// item boundary by the remaining offset budget.
pub(crate) async fn seek_to_previous_mark(
    player: &dyn Player,
    chapters: &dyn ChapterStore,
    max_offset: Duration,
) {
    let Some(chapter) = current_chapter(player, chapters).await else {
        return;
    };
    let Some(position) = player.current_position() else {
        return;
    };
    let position_ms = position.as_millis() as u64;

    // Past all marks counts as being in the last one.
    let current_index = match chapter.mark_index_at(position_ms) {
        Some(index) => index,
        None => match chapter.marks.len().checked_sub(1) {
            Some(index) => index,
            None => return,
        },
    };
    let current_mark = &chapter.marks[current_index];

    let bounded_back = |mark_start_ms: u64| {
        if max_offset.is_zero() {
            mark_start_ms
        } else {
            mark_start_ms.max(position_ms.saturating_sub(max_offset.as_millis() as u64))
        }
    };

    if position_ms.saturating_sub(current_mark.start_ms) > BACK_SEEK_THRESHOLD.as_millis() as u64 {
        let target_ms = bounded_back(current_mark.start_ms);
        debug!(
            "Previous-mark seek: restarting mark at {}ms (target {}ms)",
            current_mark.start_ms, target_ms
        );
        player.seek_to(Duration::from_millis(target_ms));
        return;
    }

    if current_index > 0 {
        let previous_mark = &chapter.marks[current_index - 1];
        let target_ms = bounded_back(previous_mark.start_ms);
        debug!(
            "Previous-mark seek: target={}ms, mark start={}ms",
            target_ms, previous_mark.start_ms
        );
        player.seek_to(Duration::from_millis(target_ms));
        return;
    }

    // No previous mark in this chapter: rewind across the item boundary.
    let Some(current_item) = player.current_media_item_index() else {
        return;
    };
    if current_item == 0 {
        player.seek_to(Duration::ZERO);
        return;
    }
    let previous_item = current_item - 1;
    let Some(previous_chapter) = chapter_at(player, chapters, previous_item).await else {
        return;
    };
    let Some(last_mark) = previous_chapter.last_mark() else {
        return;
    };

    let target_ms = if max_offset.is_zero() {
        last_mark.start_ms
    } else {
        // Treat the current position as extending past the previous
        // item's last mark and spend whatever offset budget remains.
        let played = position_ms as i64 - last_mark.end_ms as i64;
        let remaining = max_offset.as_millis() as i64 - played;
        let normalized = last_mark.end_ms as i64 - remaining;
        debug!(
            "Previous-mark seek across items: played={}ms, remaining={}ms, normalized={}ms",
            played, remaining, normalized
        );
        normalized.max(last_mark.start_ms as i64).max(0) as u64
    };
    player.seek_to_item(previous_item, Duration::from_millis(target_ms));
}

/// Body of a continuous fast-forward job: repeat short forward steps with
/// a brief audible slice until the end of the timeline, then restore the
/// play/pause state captured at loop start. Cancellation clears `active`
/// and skips the restore; the cancelling operation owns the transport.
pub(crate) async fn run_fast_forward(player: Arc<dyn Player>, active: Arc<AtomicBool>) {
    let was_playing = player.is_playing();
    debug!("Fast-forward started (was_playing={})", was_playing);
    loop {
        if !active.load(Ordering::SeqCst) {
            return;
        }
        let Some(position) = player.current_position() else {
            break;
        };
        let Some(duration) = player.duration() else {
            break;
        };
        if position >= duration {
            break;
        }
        step_seek_forward(player.as_ref(), SCRUB_STEP - SEEK_PLAY_BUFFER);
        player.play();
        tokio::time::sleep(SEEK_PLAY_BUFFER).await;
    }

    if active.swap(false, Ordering::SeqCst) {
        debug!("Fast-forward finished (restoring was_playing={})", was_playing);
        if was_playing {
            player.play();
        } else {
            player.pause();
        }
    }
}

/// Body of a continuous rewind job, mirroring [`run_fast_forward`] back
/// to the start of the timeline (crossing item boundaries as it goes).
pub(crate) async fn run_rewind(
    player: Arc<dyn Player>,
    chapters: Arc<dyn ChapterStore>,
    active: Arc<AtomicBool>,
) {
    let was_playing = player.is_playing();
    debug!("Rewind started (was_playing={})", was_playing);
    loop {
        if !active.load(Ordering::SeqCst) {
            return;
        }
        let Some(position) = player.current_position() else {
            break;
        };
        if position.is_zero() {
            break;
        }
        step_seek_back(player.as_ref(), chapters.as_ref(), SCRUB_STEP + SEEK_PLAY_BUFFER).await;
        player.play();
        tokio::time::sleep(SEEK_PLAY_BUFFER).await;
    }

    if active.swap(false, Ordering::SeqCst) {
        debug!("Rewind finished (restoring was_playing={})", was_playing);
        if was_playing {
            player.play();
        } else {
            player.pause();
        }
    }
}
