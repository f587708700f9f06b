use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use super::question_card::{self, CardState};
use super::{difficulty_color, render_controls, truncate};
use crate::app::App;
use crate::game::{InfinityGame, InfinityPhase};

const HISTORY_PREVIEW_LENGTH: usize = 50;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(game) = app.infinity.as_ref() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(12),
        Constraint::Length(7),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let header = Paragraph::new(format!("{} - Infinity Mode", game.category_name()))
        .alignment(Alignment::Center)
        .fg(Color::Cyan)
        .bold();
    frame.render_widget(header, chunks[0]);

    render_panels(frame, chunks[1], game, app.high_score());
    render_body(frame, chunks[2], game);
    render_history(frame, chunks[3], game);

    let hints = match game.phase() {
        InfinityPhase::Failed(_) => "r retry  ·  q back",
        _ => "j/k or 1-4 choose  ·  enter answer  ·  q back",
    };
    render_controls(frame, chunks[4], hints);
}

fn render_panels(frame: &mut Frame, area: Rect, game: &InfinityGame, high_score: u32) {
    let panels = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    let score = game.score();
    let difficulty = score.difficulty();
    let values = [
        ("Streak", score.streak().to_string(), Color::Cyan),
        ("High Score", high_score.to_string(), Color::Yellow),
        ("Difficulty", difficulty.to_string(), difficulty_color(difficulty)),
    ];

    for ((title, value, color), panel) in values.into_iter().zip(panels.iter()) {
        let widget = Paragraph::new(Span::styled(value, Style::default().fg(color).bold()))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(format!(" {} ", title))
                    .borders(Borders::ALL)
                    .border_style(Color::DarkGray),
            );
        frame.render_widget(widget, *panel);
    }
}

fn render_body(frame: &mut Frame, area: Rect, game: &InfinityGame) {
    // Numbered by streak, so a miss starts the count again.
    let progress = format!("Question {}", game.score().streak() + 1);

    match (game.phase(), game.current_question()) {
        (InfinityPhase::Answering, Some(question)) => {
            let state = CardState::Choosing {
                selected: game.selected_option(),
            };
            question_card::render(frame, area, question, &progress, state);
        }
        (InfinityPhase::Revealed { selected, is_correct }, Some(question)) => {
            let state = CardState::Revealed {
                selected: *selected,
                is_correct: *is_correct,
            };
            question_card::render(frame, area, question, &progress, state);
        }
        (InfinityPhase::Failed(message), _) => {
            let content = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Could not load questions",
                    Style::default().fg(Color::Red).bold(),
                )),
                Line::from(""),
                Line::from(message.as_str().fg(Color::Gray)),
            ];
            frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), area);
        }
        _ => {
            let widget = Paragraph::new("Loading questions...")
                .alignment(Alignment::Center)
                .fg(Color::Yellow);
            frame.render_widget(widget, area);
        }
    }
}

fn render_history(frame: &mut Frame, area: Rect, game: &InfinityGame) {
    let mut lines: Vec<Line> = game
        .score()
        .history()
        .map(|record| {
            let (symbol, color) = if record.is_correct {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };
            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    truncate(&record.question, HISTORY_PREVIEW_LENGTH),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("  {}", record.selected),
                    Style::default().fg(color),
                ),
            ])
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " No answers yet",
            Style::default().fg(Color::DarkGray).italic(),
        )));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(" History ")
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
