use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use super::{difficulty_color, render_controls};
use crate::app::App;
use crate::models::GameMode;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_title(frame, chunks[0], app);
    render_mode(frame, chunks[1], app);
    render_categories(frame, chunks[2], app);
    render_controls(
        frame,
        chunks[3],
        "j/k category  ·  m mode  ·  d difficulty  ·  enter play  ·  l leaderboard  ·  a about  ·  q quit",
    );
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let content = vec![
        Line::from(Span::styled(
            "QUIZMASTER",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from("Trivia from the Open Trivia Database".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("{}  ", app.player()), Style::default().fg(Color::White)),
            Span::styled(
                format!("High Score: {}", app.high_score()),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(content).alignment(Alignment::Center),
        area,
    );
}

fn render_mode(frame: &mut Frame, area: Rect, app: &App) {
    let mode_style = |mode: GameMode| {
        if app.home.mode == mode {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let mut spans = vec![
        Span::styled(format!("[ {} ]", GameMode::Infinity.label()), mode_style(GameMode::Infinity)),
        Span::raw("  "),
        Span::styled(format!("[ {} ]", GameMode::Classic.label()), mode_style(GameMode::Classic)),
    ];
    if app.home.mode == GameMode::Classic {
        let difficulty = app.home.difficulty;
        spans.push(Span::raw("   Difficulty: "));
        spans.push(Span::styled(
            difficulty.to_string(),
            Style::default().fg(difficulty_color(difficulty)).bold(),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_categories(frame: &mut Frame, area: Rect, app: &App) {
    let home = &app.home;
    let block = Block::default()
        .title(" Categories ")
        .padding(Padding::horizontal(1));

    if home.loading {
        let widget = Paragraph::new("Loading categories...")
            .fg(Color::Yellow)
            .block(block);
        frame.render_widget(widget, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    if let Some(error) = &home.error {
        lines.push(Line::from(Span::styled(
            format!("Could not load categories: {}  (r to retry)", error),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    }

    let names = std::iter::once("Any Category")
        .chain(home.categories.iter().map(|cat| cat.name.as_str()));
    for (index, name) in names.enumerate() {
        let is_selected = index == home.selected;
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };
        lines.push(Line::from(Span::styled(format!(" {} {}", marker, name), style)));
    }

    // Keep the selection in view.
    let visible = area.height.saturating_sub(1) as usize;
    let scroll = (home.selected + 1).saturating_sub(visible);

    let widget = Paragraph::new(lines)
        .block(block)
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}
