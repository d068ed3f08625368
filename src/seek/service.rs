use super::engine::{self, DEFAULT_SEEK_TIME, STEP_BACK_AMOUNT};
use crate::chapters::ChapterStore;
use crate::player::Player;
use crate::settings::SettingsStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc as tokio_mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Seek requests sent to the service
#[derive(Debug, Clone)]
pub enum SeekCommand {
    Play,
    Pause,
    Stop,
    SeekForward { amount: Option<Duration> },
    SeekBack { amount: Option<Duration> },
    SeekToNextMark { max_offset: Duration },
    SeekToPreviousMark { max_offset: Duration },
    FastForward,
    Rewind,
    StepBack,
}

/// Handle to the seek service for sending commands.
///
/// Methods never block and may be called from any thread, including
/// decoder action closures; the service executes commands one at a time
/// in arrival order.
#[derive(Clone)]
pub struct SeekHandle {
    command_tx: tokio_mpsc::UnboundedSender<SeekCommand>,
}

impl SeekHandle {
    pub fn play(&self) {
        let _ = self.command_tx.send(SeekCommand::Play);
    }

    pub fn pause(&self) {
        let _ = self.command_tx.send(SeekCommand::Pause);
    }

    pub fn stop(&self) {
        let _ = self.command_tx.send(SeekCommand::Stop);
    }

    /// Step forward by the user's configured seek time.
    pub fn seek_forward(&self) {
        let _ = self.command_tx.send(SeekCommand::SeekForward { amount: None });
    }

    pub fn seek_forward_by(&self, amount: Duration) {
        let _ = self.command_tx.send(SeekCommand::SeekForward {
            amount: Some(amount),
        });
    }

    /// Step back by the user's configured seek time.
    pub fn seek_back(&self) {
        let _ = self.command_tx.send(SeekCommand::SeekBack { amount: None });
    }

    pub fn seek_back_by(&self, amount: Duration) {
        let _ = self.command_tx.send(SeekCommand::SeekBack {
            amount: Some(amount),
        });
    }

    /// Jump to the next chapter mark, advancing at most `max_offset`
    /// (unbounded when zero).
    pub fn seek_to_next_mark(&self, max_offset: Duration) {
        let _ = self
            .command_tx
            .send(SeekCommand::SeekToNextMark { max_offset });
    }

    /// Jump back to the current or previous chapter mark, moving back at
    /// most `max_offset` (unbounded when zero).
    pub fn seek_to_previous_mark(&self, max_offset: Duration) {
        let _ = self
            .command_tx
            .send(SeekCommand::SeekToPreviousMark { max_offset });
    }

    pub fn fast_forward(&self) {
        let _ = self.command_tx.send(SeekCommand::FastForward);
    }

    pub fn rewind(&self) {
        let _ = self.command_tx.send(SeekCommand::Rewind);
    }

    /// Coarse fixed-size step back (30 s).
    pub fn step_back(&self) {
        let _ = self.command_tx.send(SeekCommand::StepBack);
    }
}

/// The single allowed in-flight continuous scrub. The flag is the
/// cooperative cancellation signal shared with the loop task.
struct SeekJob {
    task: JoinHandle<()>,
    active: Arc<AtomicBool>,
}

/// Seek service translating coarse seek requests into transport calls,
/// honoring chapter-mark and media-item boundaries.
///
/// Commands are processed strictly one at a time, and every command first
/// cancels any running continuous scrub, so at most one [`SeekJob`] is
/// ever active.
pub struct SeekService {
    player: Arc<dyn Player>,
    chapters: Arc<dyn ChapterStore>,
    settings: Arc<dyn SettingsStore>,
    command_rx: tokio_mpsc::UnboundedReceiver<SeekCommand>,
    seek_job: Option<SeekJob>,
}

impl SeekService {
    pub fn start(
        player: Arc<dyn Player>,
        chapters: Arc<dyn ChapterStore>,
        settings: Arc<dyn SettingsStore>,
        runtime_handle: tokio::runtime::Handle,
    ) -> SeekHandle {
        let (command_tx, command_rx) = tokio_mpsc::unbounded_channel();

        let handle = SeekHandle { command_tx };

        runtime_handle.spawn(async move {
            let mut service = SeekService {
                player,
                chapters,
                settings,
                command_rx,
                seek_job: None,
            };
            service.run().await;
        });

        handle
    }

    async fn run(&mut self) {
        info!("SeekService started");

        while let Some(command) = self.command_rx.recv().await {
            // Any request supersedes a running continuous scrub.
            self.cancel_seek_job();

            match command {
                SeekCommand::Play => {
                    self.play().await;
                }
                SeekCommand::Pause => {
                    self.player.pause();
                }
                SeekCommand::Stop => {
                    self.player.stop();
                }
                SeekCommand::SeekForward { amount } => {
                    let amount = self.resolve_seek_amount(amount).await;
                    engine::step_seek_forward(self.player.as_ref(), amount);
                }
                SeekCommand::SeekBack { amount } => {
                    let amount = self.resolve_seek_amount(amount).await;
                    engine::step_seek_back(self.player.as_ref(), self.chapters.as_ref(), amount)
                        .await;
                }
                SeekCommand::SeekToNextMark { max_offset } => {
                    engine::seek_to_next_mark(
                        self.player.as_ref(),
                        self.chapters.as_ref(),
                        max_offset,
                    )
                    .await;
                }
                SeekCommand::SeekToPreviousMark { max_offset } => {
                    engine::seek_to_previous_mark(
                        self.player.as_ref(),
                        self.chapters.as_ref(),
                        max_offset,
                    )
                    .await;
                }
                SeekCommand::StepBack => {
                    engine::step_seek_back(
                        self.player.as_ref(),
                        self.chapters.as_ref(),
                        STEP_BACK_AMOUNT,
                    )
                    .await;
                }
                SeekCommand::FastForward => {
                    self.start_fast_forward();
                }
                SeekCommand::Rewind => {
                    self.start_rewind();
                }
            }
        }

        self.cancel_seek_job();
        info!("SeekService stopped");
    }

    fn cancel_seek_job(&mut self) {
        if let Some(job) = self.seek_job.take() {
            job.active.store(false, Ordering::SeqCst);
            job.task.abort();
            debug!("Cancelled active seek job");
        }
    }

    async fn resolve_seek_amount(&self, amount: Option<Duration>) -> Duration {
        match amount {
            Some(amount) => amount,
            None => match self.settings.seek_time().await {
                Ok(amount) => amount,
                Err(e) => {
                    error!("Failed to read seek time, using default: {}", e);
                    DEFAULT_SEEK_TIME
                }
            },
        }
    }

    /// Play, rewinding a little first when resuming from pause so the
    /// listener regains context.
    async fn play(&self) {
        if !self.player.is_playing() {
            if let Some(position) = self.player.current_position() {
                if !position.is_zero() {
                    let amount = match self.settings.auto_rewind_amount().await {
                        Ok(amount) => amount,
                        Err(e) => {
                            error!("Failed to read auto-rewind amount: {}", e);
                            Duration::ZERO
                        }
                    };
                    if !amount.is_zero() {
                        let target = position.saturating_sub(amount);
                        debug!("Auto-rewind on resume: {:?} -> {:?}", position, target);
                        self.player.seek_to(target);
                    }
                }
            }
        }
        self.player.play();
    }

    fn start_fast_forward(&mut self) {
        let active = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn(engine::run_fast_forward(
            Arc::clone(&self.player),
            Arc::clone(&active),
        ));
        self.seek_job = Some(SeekJob { task, active });
    }

    fn start_rewind(&mut self) {
        let active = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn(engine::run_rewind(
            Arc::clone(&self.player),
            Arc::clone(&self.chapters),
            Arc::clone(&active),
        ));
        self.seek_job = Some(SeekJob { task, active });
    }
}
