//! Application state management

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyModifiers};
use pomobar_core::models::{DisplayPayload, DurationKind};
use pomobar_engine::{
    duration_prompt, Command, CommandOutcome, ConfigManager, DetailPanel, DurationPrompt, Notice,
    SessionTimer, TimerEvent,
};

use crate::host::{Notifier, PanelView, StatusLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Duration,
}

pub struct App {
    pub timer: Arc<SessionTimer>,
    pub config: ConfigManager,
    pub status: Arc<StatusLine>,
    pub notifier: Arc<Notifier>,
    pub panel: Option<Arc<PanelView>>,

    pub input_mode: InputMode,
    pub input_buffer: String,
    pending_prompt: Option<DurationPrompt>,

    pub bell_enabled: bool,
    pub show_help: bool,
    pub should_quit: bool,
}

/// Key bound to each timer command in normal mode.
pub fn command_key(command: Command) -> char {
    match command {
        Command::Start => 's',
        Command::Stop => 'x',
        Command::Reset => 'r',
        Command::SetWorkDuration => 'w',
        Command::SetBreakDuration => 'b',
        Command::ShowPanel => 'p',
    }
}

pub fn key_command(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char(c) => Command::ALL
            .into_iter()
            .find(|command| command_key(*command) == c),
        _ => None,
    }
}

impl App {
    pub fn new(
        timer: Arc<SessionTimer>,
        config: ConfigManager,
        status: Arc<StatusLine>,
        notifier: Arc<Notifier>,
        bell_enabled: bool,
    ) -> Self {
        Self {
            timer,
            config,
            status,
            notifier,
            panel: None,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            pending_prompt: None,
            bell_enabled,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn prompt_text(&self) -> &'static str {
        self.pending_prompt
            .as_ref()
            .map(DurationPrompt::text)
            .unwrap_or("Enter Duration in Minutes")
    }

    pub fn panel_payload(&self) -> Option<DisplayPayload> {
        self.panel.as_ref().and_then(|panel| panel.payload())
    }

    pub async fn run_command(&mut self, command: Command) {
        match self.timer.execute(command).await {
            CommandOutcome::Done => {}
            CommandOutcome::NeedsDuration(kind) => self.open_prompt(kind),
            CommandOutcome::NeedsPanel => self.open_panel().await,
        }
    }

    pub fn open_prompt(&mut self, kind: DurationKind) {
        if let Some(previous) = self.pending_prompt.take() {
            previous.dismiss();
        }

        let (prompt, reply) = duration_prompt(kind);
        self.timer.request_duration(reply);
        self.pending_prompt = Some(prompt);
        self.input_buffer.clear();
        self.input_mode = InputMode::Duration;
    }

    pub fn submit_prompt(&mut self) {
        if let Some(prompt) = self.pending_prompt.take() {
            prompt.submit(std::mem::take(&mut self.input_buffer));
        }
        self.input_mode = InputMode::Normal;
    }

    pub fn dismiss_prompt(&mut self) {
        if let Some(prompt) = self.pending_prompt.take() {
            prompt.dismiss();
        }
        self.input_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Open the detail panel, or leave the existing one in place.
    pub async fn open_panel(&mut self) {
        if self.panel.is_some() {
            tracing::debug!("Detail panel already open");
            return;
        }

        let panel = Arc::new(PanelView::default());
        let handle: Arc<dyn DetailPanel> = panel.clone();
        if self.timer.show_panel(&handle).await {
            self.panel = Some(panel);
        }
    }

    pub fn close_panel(&mut self) {
        if self.panel.take().is_some() {
            self.timer.panel_closed();
        }
    }

    pub async fn toggle_desktop_notifications(&mut self) {
        let enabled = !self.notifier.desktop_enabled();
        self.notifier.set_desktop(enabled);

        if let Err(e) = self.config.update_notifications(Some(enabled), None).await {
            tracing::warn!("Failed to save notification setting: {}", e);
        }
    }

    /// Whether `event` should ring the terminal bell.
    pub fn should_ring(&self, event: &TimerEvent) -> bool {
        self.bell_enabled && matches!(event.as_notice(), Some(Notice::PhaseCompleted { .. }))
    }

    pub async fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        match self.input_mode {
            InputMode::Duration => match code {
                KeyCode::Enter => self.submit_prompt(),
                KeyCode::Esc => self.dismiss_prompt(),
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                }
                KeyCode::Char(c) => self.input_buffer.push(c),
                _ => {}
            },
            InputMode::Normal => {
                if let Some(command) = key_command(code) {
                    self.run_command(command).await;
                    return;
                }

                match code {
                    KeyCode::Char('c') | KeyCode::Esc if self.panel.is_some() => {
                        self.close_panel()
                    }
                    KeyCode::Char('n') => self.toggle_desktop_notifications().await,
                    KeyCode::Char('?') => self.show_help = true,
                    KeyCode::Char('q') => self.should_quit = true,
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomobar_core::models::Phase;
    use pomobar_engine::Surfaces;
    use tempfile::TempDir;

    fn app(temp_dir: &TempDir) -> App {
        let status = Arc::new(StatusLine::default());
        let notifier = Arc::new(Notifier::new(false));
        let timer = SessionTimer::new(Surfaces::new(status.clone(), notifier.clone()));
        let config = ConfigManager::from_file(temp_dir.path().join("config.json")).unwrap();
        App::new(timer, config, status, notifier, true)
    }

    async fn press(app: &mut App, code: KeyCode) {
        app.handle_key(code, KeyModifiers::NONE).await;
    }

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(key_command(KeyCode::Char('s')), Some(Command::Start));
        assert_eq!(key_command(KeyCode::Char('x')), Some(Command::Stop));
        assert_eq!(key_command(KeyCode::Char('r')), Some(Command::Reset));
        assert_eq!(key_command(KeyCode::Char('w')), Some(Command::SetWorkDuration));
        assert_eq!(key_command(KeyCode::Char('b')), Some(Command::SetBreakDuration));
        assert_eq!(key_command(KeyCode::Char('p')), Some(Command::ShowPanel));
        assert_eq!(key_command(KeyCode::Char('q')), None);
        assert_eq!(key_command(KeyCode::Enter), None);

        for command in Command::ALL {
            assert_eq!(key_command(KeyCode::Char(command_key(command))), Some(command));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_stop_keys() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        press(&mut app, KeyCode::Char('s')).await;
        assert!(app.timer.is_running().await);
        assert_eq!(app.status.text().as_deref(), Some("Work Session: 45:00"));

        press(&mut app, KeyCode::Char('x')).await;
        assert!(!app.timer.is_running().await);
        assert_eq!(app.status.text(), None);
        assert_eq!(
            app.notifier.latest().map(|m| m.text).as_deref(),
            Some("Pomodoro Timer stopped")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_duration_prompt_flow() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        press(&mut app, KeyCode::Char('w')).await;
        assert_eq!(app.input_mode, InputMode::Duration);
        assert_eq!(app.prompt_text(), "Enter Work Duration in Minutes");

        press(&mut app, KeyCode::Char('2')).await;
        press(&mut app, KeyCode::Char('5')).await;
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(app.input_mode, InputMode::Normal);
        settle().await;

        assert_eq!(app.timer.snapshot().await.work_duration, 1500);
        assert_eq!(
            app.notifier.latest().map(|m| m.text).as_deref(),
            Some("Work Duration set to 25 minutes")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismissed_prompt_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        press(&mut app, KeyCode::Char('b')).await;
        press(&mut app, KeyCode::Char('9')).await;
        press(&mut app, KeyCode::Esc).await;
        settle().await;

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.input_buffer.is_empty());
        assert_eq!(app.timer.snapshot().await.break_duration, 900);
        assert!(app.notifier.latest().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_duration_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        press(&mut app, KeyCode::Char('b')).await;
        press(&mut app, KeyCode::Char('0')).await;
        press(&mut app, KeyCode::Enter).await;
        settle().await;

        let latest = app.notifier.latest().unwrap();
        assert!(latest.is_error);
        assert_eq!(app.timer.snapshot().await.break_duration, 900);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panel_open_is_singleton() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        press(&mut app, KeyCode::Char('s')).await;
        press(&mut app, KeyCode::Char('p')).await;
        let first = app.panel.clone().unwrap();
        assert_eq!(
            app.panel_payload(),
            Some(DisplayPayload::new(2700, 2700, Phase::Work))
        );

        press(&mut app, KeyCode::Char('p')).await;
        assert!(Arc::ptr_eq(&first, app.panel.as_ref().unwrap()));
        drop(first);

        press(&mut app, KeyCode::Char('c')).await;
        assert!(app.panel.is_none());
        assert!(!app.timer.has_panel());
    }

    #[tokio::test]
    async fn test_toggle_desktop_notifications_persists() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        let path = temp_dir.path().join("config.json");
        let mut config = app.config.get().await;
        config.notifications.desktop = false;
        app.config.update(config).await.unwrap();

        press(&mut app, KeyCode::Char('n')).await;
        assert!(app.notifier.desktop_enabled());
        let reloaded = ConfigManager::from_file(path.clone()).unwrap();
        assert!(reloaded.get().await.notifications.desktop);

        press(&mut app, KeyCode::Char('n')).await;
        assert!(!app.notifier.desktop_enabled());
        let reloaded = ConfigManager::from_file(path).unwrap();
        assert!(!reloaded.get().await.notifications.desktop);
    }

    #[tokio::test]
    async fn test_help_and_quit() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        press(&mut app, KeyCode::Char('?')).await;
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q')).await;
        assert!(!app.show_help);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('q')).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_bell_rings_on_phase_completion() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = app(&temp_dir);

        let completed = TimerEvent::notice(
            1,
            Notice::PhaseCompleted {
                finished: Phase::Work,
            },
        );
        assert!(app.should_ring(&completed));
        assert!(!app.should_ring(&TimerEvent::notice(1, Notice::Stopped)));

        app.bell_enabled = false;
        assert!(!app.should_ring(&completed));
    }
}
