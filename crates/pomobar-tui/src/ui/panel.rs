use crate::app::App;
use crate::ui::helpers::phase_color;
use crate::ui::ring::Ring;
use pomobar_core::models::{format_clock, DisplayPayload};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

pub fn draw_panel(f: &mut Frame, app: &App, area: Rect) {
    match app.panel_payload() {
        Some(payload) => draw_countdown(f, &payload, area),
        None => draw_idle(f, area),
    }
}

fn draw_countdown(f: &mut Frame, payload: &DisplayPayload, area: Rect) {
    let color = phase_color(payload.session_type);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" ◔ {} Session ", payload.session_type))
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    f.render_widget(Ring::new(payload.fraction_left(), color), columns[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(columns[1]);

    let clock = Paragraph::new(Line::from(Span::styled(
        payload.clock(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(clock, rows[1]);

    let total = Paragraph::new(format!("of {}", format_clock(payload.total_time)))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(total, rows[2]);

    let elapsed = 1.0 - payload.fraction_left();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::DarkGray))
        .ratio(elapsed.clamp(0.0, 1.0))
        .label(format!("{:.0}%", elapsed * 100.0));
    f.render_widget(gauge, rows[4]);
}

fn draw_idle(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" ◔ Pomobar ")
        .border_style(Style::default().fg(Color::DarkGray));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Timer stopped",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press [s] to start a work session"),
    ];

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(paragraph, area);
}
