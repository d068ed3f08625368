use super::{KeyCode, KeyEvent, KeyTransition};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Debounce window used for new handlers unless overridden via
/// [`MediaButtonHandler::set_handler_delay`].
pub const DEFAULT_HANDLER_DELAY: Duration = Duration::from_millis(800);

type Action = Arc<dyn Fn() + Send + Sync>;

/// Transient state of the gesture currently being decoded.
///
/// `count` is the number of completed click cycles, `pending` is true
/// between a key down and its matching up. The generation number ties the
/// armed deadline timer to this session: a timer whose generation no
/// longer matches finalizes nothing.
struct ClickSession {
    count: u32,
    pending: bool,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

struct HandlerState {
    handler_delay: Duration,
    click_actions: HashMap<u32, Action>,
    hold_actions: HashMap<u32, Action>,
    session: Option<ClickSession>,
    next_generation: u64,
}

/// Decodes a raw stream of media-button key transitions into classified
/// gestures: N completed clicks, or N clicks followed by a hold.
///
/// Feed every relevant raw event through [`handle_key_event`]; once the
/// debounce window elapses with no further transition the session
/// finalizes and the action registered for the observed gesture fires.
/// The decoder knows nothing about playback; actions are opaque callbacks.
///
/// [`handle_key_event`]: MediaButtonHandler::handle_key_event
#[derive(Clone)]
pub struct MediaButtonHandler {
    state: Arc<Mutex<HandlerState>>,
    runtime: tokio::runtime::Handle,
}

impl MediaButtonHandler {
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        MediaButtonHandler {
            state: Arc::new(Mutex::new(HandlerState {
                handler_delay: DEFAULT_HANDLER_DELAY,
                click_actions: HashMap::new(),
                hold_actions: HashMap::new(),
                session: None,
                next_generation: 0,
            })),
            runtime,
        }
    }

    /// Register the action fired when exactly `clicks` click cycles
    /// complete with no further click and no hold. Registering the same
    /// count again replaces the previous action.
    pub fn add_click_action(&self, clicks: u32, action: impl Fn() + Send + Sync + 'static) {
        let mut state = self.state.lock().unwrap();
        if state.click_actions.insert(clicks, Arc::new(action)).is_some() {
            debug!("Replaced click action for {} clicks", clicks);
        }
    }

    /// Register the action fired when, after `clicks_before_hold` completed
    /// click cycles, the next press is held past the debounce window.
    pub fn add_hold_action(&self, clicks_before_hold: u32, action: impl Fn() + Send + Sync + 'static) {
        let mut state = self.state.lock().unwrap();
        if state
            .hold_actions
            .insert(clicks_before_hold, Arc::new(action))
            .is_some()
        {
            debug!(
                "Replaced hold action for {} clicks before hold",
                clicks_before_hold
            );
        }
    }

    pub fn handler_delay(&self) -> Duration {
        self.state.lock().unwrap().handler_delay
    }

    /// Set the debounce window. Applies to timers armed from now on.
    pub fn set_handler_delay(&self, delay: Duration) {
        self.state.lock().unwrap().handler_delay = delay;
    }

    /// Feed one raw key transition. Returns whether the event was consumed.
    ///
    /// `None` and unrelated key codes are rejected without touching the
    /// session, and an up with no session is likewise not handled. A
    /// repeated down or up inside a session changes nothing but still
    /// reports consumed: the event belongs to the gesture key, and the
    /// host should not route it anywhere else mid-gesture.
    pub fn handle_key_event(&self, event: Option<&KeyEvent>) -> bool {
        let Some(event) = event else {
            return false;
        };
        if !matches!(event.code, KeyCode::PlayPause | KeyCode::HeadsetHook) {
            return false;
        }
        trace!(
            "Media button event: {:?} {:?} at {:?}",
            event.code,
            event.transition,
            event.timestamp
        );

        let mut state = self.state.lock().unwrap();
        match event.transition {
            KeyTransition::Down => match &mut state.session {
                None => {
                    state.session = Some(ClickSession {
                        count: 0,
                        pending: true,
                        generation: 0,
                        timer: None,
                    });
                    self.arm_timer(&mut state);
                }
                Some(session) if !session.pending => {
                    session.pending = true;
                    self.arm_timer(&mut state);
                }
                Some(_) => {
                    debug!("Repeated key down ignored");
                }
            },
            KeyTransition::Up => match &mut state.session {
                Some(session) if session.pending => {
                    session.count += 1;
                    session.pending = false;
                    self.arm_timer(&mut state);
                }
                Some(_) => {
                    debug!("Repeated key up ignored");
                }
                None => {
                    debug!("Key up without a session ignored");
                    return false;
                }
            },
        }
        true
    }

    /// Re-arm the session's deadline timer, invalidating any previous one.
    ///
    /// Caller holds the state lock and guarantees a session exists. The old
    /// timer is aborted; if it already started firing it will block on the
    /// lock and then bail out on the generation mismatch.
    fn arm_timer(&self, state: &mut HandlerState) {
        state.next_generation += 1;
        let generation = state.next_generation;
        let delay = state.handler_delay;
        let shared = Arc::clone(&self.state);
        let timer = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            Self::finalize(&shared, generation);
        });

        let Some(session) = state.session.as_mut() else {
            timer.abort();
            return;
        };
        session.generation = generation;
        if let Some(old) = session.timer.replace(timer) {
            old.abort();
        }
    }

    /// Deadline fired: classify and dispatch the session, unless it was
    /// superseded by a later transition in the meantime.
    fn finalize(shared: &Arc<Mutex<HandlerState>>, generation: u64) {
        let action = {
            let mut state = shared.lock().unwrap();
            let session = match state.session.take() {
                Some(session) if session.generation == generation => session,
                stale => {
                    // A newer transition re-armed the timer; put the
                    // session back untouched.
                    state.session = stale;
                    return;
                }
            };

            if session.pending {
                debug!("Hold gesture after {} clicks finalized", session.count);
                state.hold_actions.get(&session.count).cloned()
            } else {
                debug!("Click gesture with {} clicks finalized", session.count);
                state.click_actions.get(&session.count).cloned()
            }
        };

        // Dispatch outside the lock so actions may feed the handler again.
        match action {
            Some(action) => (*action)(),
            None => debug!("No action bound for gesture, absorbing"),
        }
    }
}
