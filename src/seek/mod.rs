mod engine;
mod service;

pub use engine::{
    BACK_SEEK_THRESHOLD, DEFAULT_SEEK_TIME, SCRUB_STEP, SEEK_PLAY_BUFFER, STEP_BACK_AMOUNT,
};
pub use service::{SeekCommand, SeekHandle, SeekService};
