//! Terminal implementations of the timer's host surfaces

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use pomobar_core::models::DisplayPayload;
use pomobar_engine::{DetailPanel, NotificationSink, StatusIndicator};

const MAX_MESSAGES: usize = 50;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Text shown in the bottom bar; `None` while hidden.
#[derive(Default)]
pub struct StatusLine {
    text: Mutex<Option<String>>,
}

impl StatusLine {
    pub fn text(&self) -> Option<String> {
        lock(&self.text).clone()
    }
}

impl StatusIndicator for StatusLine {
    fn show(&self, text: &str) {
        *lock(&self.text) = Some(text.to_string());
    }

    fn hide(&self) {
        *lock(&self.text) = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// Keeps recent notices for the UI and mirrors them to the desktop.
pub struct Notifier {
    messages: Mutex<VecDeque<Message>>,
    desktop: AtomicBool,
}

impl Notifier {
    pub fn new(desktop: bool) -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            desktop: AtomicBool::new(desktop),
        }
    }

    pub fn latest(&self) -> Option<Message> {
        lock(&self.messages).back().cloned()
    }

    pub fn recent(&self, count: usize) -> Vec<Message> {
        let messages = lock(&self.messages);
        messages
            .iter()
            .rev()
            .take(count)
            .rev()
            .cloned()
            .collect()
    }

    pub fn desktop_enabled(&self) -> bool {
        self.desktop.load(Ordering::Relaxed)
    }

    pub fn set_desktop(&self, enabled: bool) {
        self.desktop.store(enabled, Ordering::Relaxed);
    }

    fn push(&self, text: &str, is_error: bool) {
        let mut messages = lock(&self.messages);
        messages.push_back(Message {
            text: text.to_string(),
            is_error,
        });
        while messages.len() > MAX_MESSAGES {
            messages.pop_front();
        }
    }
}

impl NotificationSink for Notifier {
    fn info(&self, message: &str) {
        tracing::info!(notice = message, "Notice");
        self.push(message, false);
        if self.desktop_enabled() {
            spawn_desktop_notification(message, false);
        }
    }

    fn error(&self, message: &str) {
        tracing::warn!(notice = message, "Error notice");
        self.push(message, true);
        if self.desktop_enabled() {
            spawn_desktop_notification(message, true);
        }
    }
}

/// Desktop notifications go through D-Bus and can stall, so they run on
/// the blocking pool when a runtime is available.
fn spawn_desktop_notification(message: &str, urgent: bool) {
    let body = message.to_string();
    let send = move || {
        if urgent {
            send_urgent_notification("Pomobar", &body);
        } else {
            send_os_notification("Pomobar", &body);
        }
    };

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(send);
        }
        Err(_) => send(),
    }
}

fn send_os_notification(title: &str, body: &str) {
    if let Err(e) = notify_rust::Notification::new()
        .summary(title)
        .body(body)
        .icon("clock")
        .timeout(notify_rust::Timeout::Milliseconds(5000))
        .show()
    {
        tracing::error!("Failed to send notification: {}", e);
    }
}

fn send_urgent_notification(title: &str, body: &str) {
    let mut notification = notify_rust::Notification::new();
    notification
        .summary(title)
        .body(body)
        .icon("dialog-error")
        .timeout(notify_rust::Timeout::Milliseconds(10000));

    #[cfg(all(unix, not(target_os = "macos")))]
    notification.urgency(notify_rust::Urgency::Critical);

    if let Err(e) = notification.show() {
        tracing::error!("Failed to send urgent notification: {}", e);
    }
}

/// Latest payload for the detail panel. The app owns it; the timer only
/// holds a weak reference.
#[derive(Default)]
pub struct PanelView {
    payload: Mutex<Option<DisplayPayload>>,
}

impl PanelView {
    pub fn payload(&self) -> Option<DisplayPayload> {
        *lock(&self.payload)
    }
}

impl DetailPanel for PanelView {
    fn post(&self, payload: &DisplayPayload) {
        *lock(&self.payload) = Some(*payload);
    }

    fn clear(&self) {
        *lock(&self.payload) = None;
    }
}
