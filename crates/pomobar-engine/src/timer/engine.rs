use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use pomobar_core::models::{parse_minutes, DurationKind, SessionState, TickOutcome};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use super::events::{Notice, TimerEvent};
use crate::command::{Command, CommandOutcome};
use crate::prompt::DurationReply;
use crate::surfaces::{DetailPanel, Surfaces};

const TICK_PERIOD: Duration = Duration::from_secs(1);

enum TickStep {
    Continue,
    /// The phase ran out and the next one began under this generation.
    Restarted(u64),
    Finished,
}

/// Alternating work/break countdown. Owns the session state and the
/// repeating tick task; every change is pushed to the host surfaces and to
/// broadcast subscribers.
pub struct SessionTimer {
    state: RwLock<SessionState>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    surfaces: Surfaces,
    event_tx: broadcast::Sender<TimerEvent>,
    /// Assigned under the state lock; orders deliveries made after it.
    sequence: AtomicU64,
}

/// Events published under the state lock, waiting to reach the surfaces.
type Outbox = Vec<(u64, TimerEvent)>;

impl SessionTimer {
    pub fn new(surfaces: Surfaces) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(1000);
        Arc::new(Self {
            state: RwLock::new(SessionState::new()),
            ticker: Mutex::new(None),
            surfaces,
            event_tx,
            sequence: AtomicU64::new(0),
        })
    }

    /// Subscribe to timer events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn is_running(&self) -> bool {
        self.state.read().await.is_running()
    }

    /// Broadcast `event` right away and queue it for the host surfaces.
    /// Callers hold the state lock here, so subscribers see events in order.
    fn publish(&self, outbox: &mut Outbox, event: TimerEvent) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.event_tx.send(event.clone());
        outbox.push((seq, event));
    }

    /// Hand queued events to the host surfaces. Must run after the state
    /// lock is released: surface callbacks may block.
    fn deliver(&self, outbox: Outbox) {
        for (seq, event) in outbox {
            self.surfaces.deliver_in_order(seq, &event.event_type);
        }
    }

    /// Abort the current tick task. Returns whether one existed.
    fn cancel_ticker(&self) -> bool {
        let handle = self
            .ticker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        match handle {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn has_ticker(&self) -> bool {
        self.ticker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    fn spawn_ticker(self: &Arc<Self>, generation: u64) {
        let timer = Arc::downgrade(self);
        let period = TICK_PERIOD;
        let handle = tokio::spawn(Self::run_ticks(timer, generation, period));

        let mut slot = self
            .ticker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    async fn run_ticks(timer: Weak<Self>, mut generation: u64, period: Duration) {
        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticks.tick().await;

            let Some(timer) = timer.upgrade() else {
                break;
            };

            match timer.tick(generation).await {
                TickStep::Continue => {}
                TickStep::Restarted(next) => {
                    generation = next;
                    ticks.reset();
                }
                TickStep::Finished => break,
            }
        }
    }

    async fn tick(&self, generation: u64) -> TickStep {
        let mut outbox = Vec::new();
        let step = {
            let mut state = self.state.write().await;
            self.advance(&mut state, generation, &mut outbox)
        };
        self.deliver(outbox);
        step
    }

    fn advance(
        &self,
        state: &mut SessionState,
        generation: u64,
        outbox: &mut Outbox,
    ) -> TickStep {
        if !state.is_running() || state.generation != generation {
            tracing::debug!(generation, "Stale tick loop exiting");
            return TickStep::Finished;
        }

        match state.tick() {
            TickOutcome::Idle => TickStep::Finished,
            TickOutcome::Counting { remaining } => {
                tracing::debug!(remaining, phase = %state.phase, "Tick");
                self.publish(outbox, TimerEvent::display(generation, state.display()));
                TickStep::Continue
            }
            TickOutcome::PhaseComplete { finished } => {
                self.publish(outbox, TimerEvent::display(generation, state.display()));
                self.publish(
                    outbox,
                    TimerEvent::notice(generation, Notice::PhaseCompleted { finished }),
                );

                let next_phase = state.flip_phase();
                let next = state.begin_phase();
                tracing::info!(
                    "{} phase finished, starting {} ({}s)",
                    finished,
                    next_phase,
                    state.remaining_seconds
                );
                self.publish(outbox, TimerEvent::display(next, state.display()));

                TickStep::Restarted(next)
            }
        }
    }

    /// Begin the current phase's countdown and schedule the tick task.
    fn launch(self: &Arc<Self>, state: &mut SessionState, outbox: &mut Outbox) -> u64 {
        let generation = state.begin_phase();
        self.spawn_ticker(generation);
        self.publish(outbox, TimerEvent::display(generation, state.display()));
        generation
    }

    /// Start (or silently restart) the countdown for the current phase.
    pub async fn start(self: &Arc<Self>, explicit: bool) {
        let mut outbox = Vec::new();
        {
            let mut state = self.state.write().await;

            let superseded = self.cancel_ticker() || state.is_running();
            let generation = self.launch(&mut state, &mut outbox);
            let phase = state.phase;

            if superseded {
                self.publish(
                    &mut outbox,
                    TimerEvent::notice(generation, Notice::Restarted { phase }),
                );
            } else if explicit {
                self.publish(
                    &mut outbox,
                    TimerEvent::notice(generation, Notice::Started { phase }),
                );
            }

            tracing::info!(
                explicit,
                superseded,
                "{} countdown started ({}s)",
                phase,
                state.remaining_seconds
            );
        }
        self.deliver(outbox);
    }

    /// Stop the countdown and hide the display. Returns false when there
    /// was nothing to stop.
    pub async fn stop(&self, show_notification: bool) -> bool {
        let mut outbox = Vec::new();
        {
            let mut state = self.state.write().await;

            let had_ticker = self.cancel_ticker();
            if !had_ticker && !state.is_running() {
                return false;
            }

            state.halt();
            self.publish(&mut outbox, TimerEvent::hidden(state.generation));
            if show_notification {
                self.publish(
                    &mut outbox,
                    TimerEvent::notice(state.generation, Notice::Stopped),
                );
            }
        }
        self.deliver(outbox);

        tracing::info!("Timer stopped");
        true
    }

    /// Restore work phase and default durations, then start over. Does
    /// nothing while idle.
    pub async fn reset(self: &Arc<Self>) -> bool {
        let mut outbox = Vec::new();
        {
            let mut state = self.state.write().await;

            if !state.is_running() && !self.has_ticker() {
                tracing::debug!("Reset ignored, timer is idle");
                return false;
            }

            self.cancel_ticker();
            state.halt();
            self.publish(&mut outbox, TimerEvent::hidden(state.generation));

            state.restore_defaults();
            let generation = self.launch(&mut state, &mut outbox);
            self.publish(&mut outbox, TimerEvent::notice(generation, Notice::Reset));
        }
        self.deliver(outbox);

        tracing::info!("Timer reset to defaults and restarted");
        true
    }

    /// Apply a duration typed by the user. Rejected input leaves the
    /// current value in place and emits an error notice.
    pub async fn configure(&self, kind: DurationKind, input: &str) -> pomobar_core::Result<u64> {
        let mut outbox = Vec::new();
        let applied = {
            let mut state = self.state.write().await;

            let applied = parse_minutes(input).and_then(|minutes| {
                state.set_duration(kind, minutes)?;
                Ok(minutes)
            });

            let notice = match &applied {
                Ok(minutes) => Notice::DurationSet {
                    kind,
                    minutes: *minutes,
                },
                Err(_) => Notice::InvalidDuration { kind },
            };
            self.publish(&mut outbox, TimerEvent::notice(state.generation, notice));
            applied
        };
        self.deliver(outbox);

        match &applied {
            Ok(minutes) => tracing::info!("{} duration set to {} minutes", kind.label(), minutes),
            Err(e) => tracing::warn!("Rejected {} duration {:?}: {}", kind.label(), input, e),
        }
        applied
    }

    /// Apply the answer to a duration prompt once the host supplies it.
    /// A dismissed prompt changes nothing.
    pub fn request_duration(self: &Arc<Self>, reply: DurationReply) -> JoinHandle<()> {
        let timer = Arc::clone(self);
        tokio::spawn(async move {
            let kind = reply.kind();
            match reply.recv().await {
                Some(input) => {
                    let _ = timer.configure(kind, &input).await;
                }
                None => tracing::debug!("{} duration prompt dismissed", kind.label()),
            }
        })
    }

    /// Attach the detail panel. Returns false when one is already open.
    pub async fn show_panel(&self, panel: &Arc<dyn DetailPanel>) -> bool {
        if !self.surfaces.attach_panel(panel) {
            return false;
        }

        let current = {
            let state = self.state.read().await;
            state.is_running().then(|| state.display())
        };
        if let Some(payload) = current {
            panel.post(&payload);
        }

        tracing::debug!("Detail panel attached");
        true
    }

    pub fn panel_closed(&self) {
        self.surfaces.detach_panel();
        tracing::debug!("Detail panel detached");
    }

    pub fn has_panel(&self) -> bool {
        self.surfaces.has_panel()
    }

    /// Run a no-argument command. Commands that need more from the host
    /// are reported back instead of executed.
    pub async fn execute(self: &Arc<Self>, command: Command) -> CommandOutcome {
        tracing::debug!(command = command.id(), "Executing command");
        match command {
            Command::Start => {
                self.start(true).await;
                CommandOutcome::Done
            }
            Command::Stop => {
                self.stop(true).await;
                CommandOutcome::Done
            }
            Command::Reset => {
                self.reset().await;
                CommandOutcome::Done
            }
            Command::SetWorkDuration => CommandOutcome::NeedsDuration(DurationKind::Work),
            Command::SetBreakDuration => CommandOutcome::NeedsDuration(DurationKind::Break),
            Command::ShowPanel => CommandOutcome::NeedsPanel,
        }
    }

    /// Cancel the tick task at process exit without notifying anyone.
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        self.cancel_ticker();
        state.halt();
        tracing::info!("Session timer shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfaces::{NotificationSink, StatusIndicator};

    struct Quiet;

    impl StatusIndicator for Quiet {
        fn show(&self, _text: &str) {}
        fn hide(&self) {}
    }

    impl NotificationSink for Quiet {
        fn info(&self, _message: &str) {}
        fn error(&self, _message: &str) {}
    }

    fn quiet_timer() -> Arc<SessionTimer> {
        let quiet = Arc::new(Quiet);
        SessionTimer::new(Surfaces::new(quiet.clone(), quiet))
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_generation_tick_is_ignored() {
        let timer = quiet_timer();

        timer.start(true).await;
        let first = timer.snapshot().await.generation;
        timer.start(true).await;

        assert!(matches!(timer.tick(first).await, TickStep::Finished));
        assert_eq!(timer.snapshot().await.remaining_seconds, 2700);

        let current = timer.snapshot().await.generation;
        assert!(matches!(timer.tick(current).await, TickStep::Continue));
        assert_eq!(timer.snapshot().await.remaining_seconds, 2699);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_after_stop_finishes() {
        let timer = quiet_timer();

        timer.start(false).await;
        let generation = timer.snapshot().await.generation;
        timer.stop(false).await;

        assert!(matches!(timer.tick(generation).await, TickStep::Finished));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_timer_ends_tick_task() {
        let timer = quiet_timer();
        timer.start(true).await;

        let handle = timer
            .ticker
            .lock()
            .unwrap()
            .take()
            .expect("tick task should be scheduled");
        drop(timer);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("tick task should exit once the timer is gone")
            .unwrap();
    }
}
