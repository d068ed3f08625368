use std::time::Instant;

/// Hardware key codes the host input layer can deliver.
///
/// Only [`KeyCode::PlayPause`] and [`KeyCode::HeadsetHook`] participate in
/// gesture decoding; everything else is reported as not handled so the
/// host can route it elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    PlayPause,
    HeadsetHook,
    Play,
    Pause,
    Next,
    Previous,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    Down,
    Up,
}

/// One discrete hardware key transition. For a given logical press the
/// down event always precedes its matching up event.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub transition: KeyTransition,
    pub timestamp: Instant,
}

impl KeyEvent {
    pub fn new(code: KeyCode, transition: KeyTransition) -> Self {
        KeyEvent {
            code,
            transition,
            timestamp: Instant::now(),
        }
    }

    pub fn down(code: KeyCode) -> Self {
        KeyEvent::new(code, KeyTransition::Down)
    }

    pub fn up(code: KeyCode) -> Self {
        KeyEvent::new(code, KeyTransition::Up)
    }
}
