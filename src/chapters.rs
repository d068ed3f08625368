use crate::player::MediaItemId;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChapterStoreError {
    #[error("Chapter store unavailable: {0}")]
    Unavailable(String),
    #[error("Corrupt chapter metadata: {0}")]
    Corrupt(String),
}

/// A semantic boundary inside a chapter's audio (scene or paragraph
/// break), in whole milliseconds from the chapter start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterMark {
    pub name: Option<String>,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl ChapterMark {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        ChapterMark {
            name: None,
            start_ms,
            end_ms,
        }
    }

    /// Inclusive on both ends, matching the mark lookup the seek engine
    /// performs: a position exactly on a boundary belongs to whichever
    /// mark the scan reaches first.
    pub fn contains(&self, position_ms: u64) -> bool {
        self.start_ms <= position_ms && position_ms <= self.end_ms
    }
}

/// One chapter of a book: total duration plus its ordered, non-overlapping
/// marks (sorted ascending by `start_ms`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub duration: Duration,
    pub marks: Vec<ChapterMark>,
}

impl Chapter {
    pub fn new(duration: Duration, marks: Vec<ChapterMark>) -> Self {
        Chapter { duration, marks }
    }

    /// Index of the first mark containing `position_ms`, if any.
    pub fn mark_index_at(&self, position_ms: u64) -> Option<usize> {
        self.marks.iter().position(|mark| mark.contains(position_ms))
    }

    pub fn last_mark(&self) -> Option<&ChapterMark> {
        self.marks.last()
    }
}

/// Read-only source of chapter metadata, owned by the host's repository
/// layer. The seek engine re-reads per operation and holds no copy.
#[async_trait]
pub trait ChapterStore: Send + Sync {
    async fn chapter(&self, id: &MediaItemId) -> Result<Option<Chapter>, ChapterStoreError>;
}
