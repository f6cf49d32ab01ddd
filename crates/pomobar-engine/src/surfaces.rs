//! Host surfaces the session timer writes to

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use pomobar_core::models::DisplayPayload;

use crate::timer::{Severity, TimerEventType};

/// Single-line, always visible text surface.
pub trait StatusIndicator: Send + Sync {
    fn show(&self, text: &str);
    fn hide(&self);
}

/// Fire-and-forget sink for short messages.
pub trait NotificationSink: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Optional rich view of the countdown. Owned by the host; the timer only
/// keeps a weak handle to it.
pub trait DetailPanel: Send + Sync {
    fn post(&self, payload: &DisplayPayload);

    fn clear(&self) {}
}

pub struct Surfaces {
    status: Arc<dyn StatusIndicator>,
    notifier: Arc<dyn NotificationSink>,
    panel: Mutex<Option<Weak<dyn DetailPanel>>>,
    /// Sequence of the newest display or hide applied so far.
    latest_view: AtomicU64,
}

impl Surfaces {
    pub fn new(status: Arc<dyn StatusIndicator>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            status,
            notifier,
            panel: Mutex::new(None),
            latest_view: AtomicU64::new(0),
        }
    }

    fn panel_slot(&self) -> MutexGuard<'_, Option<Weak<dyn DetailPanel>>> {
        self.panel.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Attach a panel unless a live one is already attached.
    pub fn attach_panel(&self, panel: &Arc<dyn DetailPanel>) -> bool {
        let mut slot = self.panel_slot();
        if slot.as_ref().and_then(Weak::upgrade).is_some() {
            return false;
        }
        *slot = Some(Arc::downgrade(panel));
        true
    }

    pub fn detach_panel(&self) {
        self.panel_slot().take();
    }

    pub fn has_panel(&self) -> bool {
        self.panel_slot().as_ref().and_then(Weak::upgrade).is_some()
    }

    /// Hand the panel to `f` if it is still alive. A dead handle is
    /// dropped so later deliveries skip it.
    fn with_panel(&self, f: impl FnOnce(&dyn DetailPanel)) {
        let panel = {
            let mut slot = self.panel_slot();
            let upgraded = slot.as_ref().map(Weak::upgrade);
            match upgraded {
                Some(Some(panel)) => panel,
                Some(None) => {
                    tracing::warn!("Detail panel is gone, dropping handle");
                    *slot = None;
                    return;
                }
                None => return,
            }
        };
        f(&*panel);
    }

    pub fn post_to_panel(&self, payload: &DisplayPayload) {
        self.with_panel(|panel| panel.post(payload));
    }

    /// Like [`Surfaces::deliver`], but drops a display or hide that arrives
    /// after a newer one was already applied. Notices always go through.
    pub fn deliver_in_order(&self, seq: u64, event: &TimerEventType) {
        if !matches!(event, TimerEventType::Notice { .. })
            && self.latest_view.fetch_max(seq, Ordering::SeqCst) > seq
        {
            tracing::debug!(seq, "Skipping stale display update");
            return;
        }
        self.deliver(event);
    }

    pub fn deliver(&self, event: &TimerEventType) {
        match event {
            TimerEventType::Display { payload } => {
                self.status.show(&payload.status_text());
                self.post_to_panel(payload);
            }
            TimerEventType::Hidden => {
                self.status.hide();
                self.with_panel(|panel| panel.clear());
            }
            TimerEventType::Notice { notice } => {
                let message = notice.message();
                match notice.severity() {
                    Severity::Info => self.notifier.info(&message),
                    Severity::Error => self.notifier.error(&message),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Notice;
    use pomobar_core::models::{DurationKind, Phase};

    #[derive(Default)]
    struct Recorder {
        lines: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, line: String) {
            self.lines.lock().unwrap().push(line);
        }

        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl StatusIndicator for Recorder {
        fn show(&self, text: &str) {
            self.push(format!("show {}", text));
        }

        fn hide(&self) {
            self.push("hide".to_string());
        }
    }

    impl NotificationSink for Recorder {
        fn info(&self, message: &str) {
            self.push(format!("info {}", message));
        }

        fn error(&self, message: &str) {
            self.push(format!("error {}", message));
        }
    }

    impl DetailPanel for Recorder {
        fn post(&self, payload: &DisplayPayload) {
            self.push(format!("panel {}", payload.time_left));
        }
    }

    fn surfaces() -> (Surfaces, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let surfaces = Surfaces::new(recorder.clone(), recorder.clone());
        (surfaces, recorder)
    }

    #[test]
    fn test_deliver_routes_events() {
        let (surfaces, recorder) = surfaces();

        surfaces.deliver(&TimerEventType::Display {
            payload: DisplayPayload::new(2700, 2700, Phase::Work),
        });
        surfaces.deliver(&TimerEventType::Hidden);
        surfaces.deliver(&TimerEventType::Notice {
            notice: Notice::InvalidDuration {
                kind: DurationKind::Work,
            },
        });

        assert_eq!(
            recorder.lines(),
            vec![
                "show Work Session: 45:00".to_string(),
                "hide".to_string(),
                "error Invalid input. Please enter a positive number.".to_string(),
            ]
        );
    }

    #[test]
    fn test_stale_display_is_skipped() {
        let (surfaces, recorder) = surfaces();

        surfaces.deliver_in_order(2, &TimerEventType::Hidden);
        surfaces.deliver_in_order(
            1,
            &TimerEventType::Display {
                payload: DisplayPayload::new(2699, 2700, Phase::Work),
            },
        );
        surfaces.deliver_in_order(
            0,
            &TimerEventType::Notice {
                notice: Notice::Stopped,
            },
        );
        surfaces.deliver_in_order(
            3,
            &TimerEventType::Display {
                payload: DisplayPayload::new(900, 900, Phase::Break),
            },
        );

        assert_eq!(
            recorder.lines(),
            vec![
                "hide".to_string(),
                "info Pomodoro Timer stopped".to_string(),
                "show Break Session: 15:00".to_string(),
            ]
        );
    }

    #[test]
    fn test_panel_is_a_singleton() {
        let (surfaces, _) = surfaces();
        let first: Arc<dyn DetailPanel> = Arc::new(Recorder::default());
        let second: Arc<dyn DetailPanel> = Arc::new(Recorder::default());

        assert!(surfaces.attach_panel(&first));
        assert!(!surfaces.attach_panel(&second));
        assert!(surfaces.has_panel());

        surfaces.detach_panel();
        assert!(!surfaces.has_panel());
        assert!(surfaces.attach_panel(&second));
    }

    #[test]
    fn test_dropped_panel_is_skipped() {
        let (surfaces, _) = surfaces();
        let panel = Arc::new(Recorder::default());
        let handle: Arc<dyn DetailPanel> = panel.clone();
        surfaces.attach_panel(&handle);

        let payload = DisplayPayload::new(5, 10, Phase::Break);
        surfaces.post_to_panel(&payload);
        assert_eq!(panel.lines(), vec!["panel 5".to_string()]);

        drop(handle);
        drop(panel);
        surfaces.post_to_panel(&payload);
        assert!(!surfaces.has_panel());
    }
}
