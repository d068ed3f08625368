mod handler;
mod key_event;

pub use handler::{MediaButtonHandler, DEFAULT_HANDLER_DELAY};
pub use key_event::{KeyCode, KeyEvent, KeyTransition};
