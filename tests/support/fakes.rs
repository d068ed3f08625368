// In-memory fakes for the external collaborators: transport, chapter
// repository and settings storage.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tome::chapters::{Chapter, ChapterStore, ChapterStoreError};
use tome::player::{MediaItemId, Player};
use tome::settings::{SettingsError, SettingsStore};

#[derive(Debug, Clone)]
pub struct FakeItem {
    pub id: MediaItemId,
    pub duration: Duration,
}

#[derive(Debug)]
struct FakePlayerState {
    playing: bool,
    items: Vec<FakeItem>,
    current: usize,
    position: Option<Duration>,
    duration_unset: bool,
    seek_to_next_calls: usize,
    advances: bool,
    play_started_at: Option<Instant>,
}

impl FakePlayerState {
    fn position_now(&self) -> Option<Duration> {
        let base = self.position?;
        match self.play_started_at {
            Some(started_at) if self.playing => Some(base + started_at.elapsed()),
            _ => Some(base),
        }
    }

    /// Pin the position and restart the advance clock from here.
    fn rebase(&mut self, position: Option<Duration>) {
        self.position = position;
        self.play_started_at = (self.advances && self.playing).then(Instant::now);
    }
}

/// Scriptable transport: a fixed timeline of items whose position moves
/// only through `seek_to*` calls.
pub struct FakePlayer {
    state: Mutex<FakePlayerState>,
}

impl FakePlayer {
    pub fn with_items(items: Vec<FakeItem>) -> Self {
        FakePlayer {
            state: Mutex::new(FakePlayerState {
                playing: false,
                items,
                current: 0,
                position: Some(Duration::ZERO),
                duration_unset: false,
                seek_to_next_calls: 0,
                advances: false,
                play_started_at: None,
            }),
        }
    }

    /// While playing, the reported position moves with (virtual) time,
    /// like a real transport.
    pub fn advancing(self) -> Self {
        self.state.lock().unwrap().advances = true;
        self
    }

    /// A single media item of the given duration.
    pub fn single(duration: Duration) -> Self {
        FakePlayer::with_items(vec![FakeItem {
            id: MediaItemId::new("item-0"),
            duration,
        }])
    }

    pub fn set_playing(&self, playing: bool) {
        let mut state = self.state.lock().unwrap();
        let position = state.position_now();
        state.playing = playing;
        state.rebase(position);
    }

    pub fn set_position(&self, position: Duration) {
        self.state.lock().unwrap().rebase(Some(position));
    }

    pub fn set_position_unset(&self) {
        self.state.lock().unwrap().rebase(None);
    }

    pub fn set_duration_unset(&self, unset: bool) {
        self.state.lock().unwrap().duration_unset = unset;
    }

    pub fn set_current_item(&self, index: usize) {
        self.state.lock().unwrap().current = index;
    }

    pub fn position(&self) -> Option<Duration> {
        self.state.lock().unwrap().position_now()
    }

    pub fn current_item(&self) -> usize {
        self.state.lock().unwrap().current
    }

    pub fn seek_to_next_calls(&self) -> usize {
        self.state.lock().unwrap().seek_to_next_calls
    }
}

impl Player for FakePlayer {
    fn play(&self) {
        let mut state = self.state.lock().unwrap();
        if state.advances && !state.playing {
            state.play_started_at = Some(Instant::now());
        }
        state.playing = true;
    }

    fn pause(&self) {
        let mut state = self.state.lock().unwrap();
        let position = state.position_now();
        state.playing = false;
        state.rebase(position);
    }

    fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        state.playing = false;
        state.rebase(None);
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    fn current_position(&self) -> Option<Duration> {
        self.state.lock().unwrap().position_now()
    }

    fn duration(&self) -> Option<Duration> {
        let state = self.state.lock().unwrap();
        if state.duration_unset {
            return None;
        }
        state.items.get(state.current).map(|item| item.duration)
    }

    fn current_media_item_index(&self) -> Option<usize> {
        Some(self.state.lock().unwrap().current)
    }

    fn previous_media_item_index(&self) -> Option<usize> {
        let state = self.state.lock().unwrap();
        state.current.checked_sub(1)
    }

    fn next_media_item_index(&self) -> Option<usize> {
        let state = self.state.lock().unwrap();
        let next = state.current + 1;
        (next < state.items.len()).then_some(next)
    }

    fn media_item_at(&self, index: usize) -> Option<MediaItemId> {
        let state = self.state.lock().unwrap();
        state.items.get(index).map(|item| item.id.clone())
    }

    fn seek_to(&self, position: Duration) {
        self.state.lock().unwrap().rebase(Some(position));
    }

    fn seek_to_item(&self, index: usize, position: Duration) {
        let mut state = self.state.lock().unwrap();
        state.current = index;
        state.rebase(Some(position));
    }

    fn seek_to_next(&self) {
        let mut state = self.state.lock().unwrap();
        state.seek_to_next_calls += 1;
        if state.current + 1 < state.items.len() {
            state.current += 1;
            state.rebase(Some(Duration::ZERO));
        }
    }
}

/// Chapter repository backed by a plain map.
pub struct InMemoryChapterStore {
    chapters: HashMap<MediaItemId, Chapter>,
}

impl InMemoryChapterStore {
    pub fn new(entries: Vec<(MediaItemId, Chapter)>) -> Self {
        InMemoryChapterStore {
            chapters: entries.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        InMemoryChapterStore {
            chapters: HashMap::new(),
        }
    }
}

#[async_trait]
impl ChapterStore for InMemoryChapterStore {
    async fn chapter(&self, id: &MediaItemId) -> Result<Option<Chapter>, ChapterStoreError> {
        Ok(self.chapters.get(id).cloned())
    }
}

/// Chapter repository that always fails, for degraded-path tests.
pub struct FailingChapterStore;

#[async_trait]
impl ChapterStore for FailingChapterStore {
    async fn chapter(&self, _id: &MediaItemId) -> Result<Option<Chapter>, ChapterStoreError> {
        Err(ChapterStoreError::Unavailable("test failure".to_string()))
    }
}

/// Settings store returning fixed values.
pub struct FixedSettings {
    pub seek_time: Duration,
    pub auto_rewind: Duration,
}

impl Default for FixedSettings {
    fn default() -> Self {
        FixedSettings {
            seek_time: Duration::from_secs(30),
            auto_rewind: Duration::from_secs(2),
        }
    }
}

#[async_trait]
impl SettingsStore for FixedSettings {
    async fn seek_time(&self) -> Result<Duration, SettingsError> {
        Ok(self.seek_time)
    }

    async fn auto_rewind_amount(&self) -> Result<Duration, SettingsError> {
        Ok(self.auto_rewind)
    }
}
