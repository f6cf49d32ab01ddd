mod helpers;
mod input;
mod panel;
mod ring;

use crate::app::{command_key, App, InputMode};
use helpers::{build_hint_line, centered_rect};
use input::draw_input_modal;
use panel::draw_panel;
use pomobar_engine::Command;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

fn hints() -> Vec<(String, &'static str)> {
    let mut hints: Vec<_> = Command::ALL
        .into_iter()
        .map(|command| (command_key(command).to_string(), command.title()))
        .collect();
    hints.extend([
        ("n".to_string(), "Desktop"),
        ("?".to_string(), "Help"),
        ("q".to_string(), "Quit"),
    ]);
    hints
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_title_bar(f, chunks[0]);

    if app.panel.is_some() {
        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(12), Constraint::Length(8)])
            .split(chunks[1]);
        draw_panel(f, app, main[0]);
        draw_messages(f, app, main[1]);
    } else {
        draw_messages(f, app, chunks[1]);
    }

    draw_status_bar(f, app, chunks[2]);

    if app.show_help {
        draw_help_modal(f);
    }

    if app.input_mode == InputMode::Duration {
        draw_input_modal(f, app);
    }
}

fn draw_title_bar(f: &mut Frame, area: Rect) {
    let mut line = build_hint_line(&hints());
    line.spans.insert(
        0,
        Span::styled(
            "◔ Pomobar │ ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    );

    let title = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(title, area);
}

fn draw_messages(f: &mut Frame, app: &App, area: Rect) {
    let capacity = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .notifier
        .recent(capacity)
        .into_iter()
        .rev()
        .map(|message| {
            let style = if message.is_error {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(message.text, style)))
        })
        .collect();

    let title = if app.notifier.desktop_enabled() {
        " Notifications (desktop on) "
    } else {
        " Notifications "
    };

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = match app.status.text() {
        Some(text) => vec![Span::styled(
            format!(" ◔ {} ", text),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )],
        None => vec![Span::styled(" Idle ", Style::default().fg(Color::DarkGray))],
    };

    if let Some(message) = app.notifier.latest() {
        let color = if message.is_error {
            Color::Red
        } else {
            Color::Yellow
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(message.text, Style::default().fg(color)));
    }

    let status = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

fn draw_help_modal(f: &mut Frame) {
    let modal_area = centered_rect(f.area(), 56, 18);

    f.render_widget(Clear, modal_area);

    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut help_text = vec![
        Line::from(Span::styled(
            "  ◔ Pomobar - Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("  COMMANDS", heading)),
    ];
    help_text.extend(Command::ALL.into_iter().map(|command| {
        Line::from(format!("    [{}]          {}", command_key(command), command.title()))
    }));
    help_text.extend([
        Line::from(""),
        Line::from(Span::styled("  VIEW", heading)),
        Line::from("    [c] / [Esc]  Close the timer panel"),
        Line::from("    [n]          Toggle desktop notifications"),
        Line::from("    [q]          Quit"),
        Line::from(Span::styled(
            "  Press any key to close this help",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
    ]);

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("❓ Help")
                .border_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .style(Style::default().bg(Color::Black));

    f.render_widget(help_paragraph, modal_area);
}
