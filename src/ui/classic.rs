//! Classic Mode screens: welcome, quiz and result.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use super::question_card::{self, CardState};
use super::{difficulty_color, render_controls, truncate};
use crate::app::App;
use crate::game::{ClassicGame, ClassicPhase, STARTING_LIVES};

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(game) = app.classic.as_ref() else {
        return;
    };

    match &game.phase {
        ClassicPhase::Welcome => render_welcome(frame, area, game),
        ClassicPhase::Loading => render_message(frame, area, "Loading questions...", Color::Yellow, None),
        ClassicPhase::Failed(message) => render_message(
            frame,
            area,
            "Could not load questions",
            Color::Red,
            Some(message.as_str()),
        ),
        ClassicPhase::Quiz => render_quiz(frame, area, game),
        ClassicPhase::Result => render_result(frame, area, game),
    }
}

fn render_welcome(frame: &mut Frame, area: Rect, game: &ClassicGame) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
    ])
    .split(area);

    let difficulty = game.difficulty();
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "CLASSIC MODE",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(game.category_name().fg(Color::White)),
        Line::from(vec![
            Span::styled(
                difficulty.to_string(),
                Style::default().fg(difficulty_color(difficulty)),
            ),
            Span::styled(
                format!(" · {} lives", STARTING_LIVES),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from("to start  ·  q to go back".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[1]);
}

fn render_message(frame: &mut Frame, area: Rect, title: &str, color: Color, detail: Option<&str>) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(7),
        Constraint::Percentage(40),
    ])
    .split(area);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(title.to_string(), Style::default().fg(color).bold())),
        Line::from(""),
    ];
    if let Some(detail) = detail {
        content.push(Line::from(detail.fg(Color::Gray)));
        content.push(Line::from(""));
        content.push(Line::from("r retry  ·  q back".fg(Color::DarkGray)));
    }

    frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), chunks[1]);
}

fn render_quiz(frame: &mut Frame, area: Rect, game: &ClassicGame) {
    let Some(question) = game.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let lives = format!(
        "{}{}",
        "♥ ".repeat(game.lives() as usize),
        "♡ ".repeat(STARTING_LIVES.saturating_sub(game.lives()) as usize)
    );
    let header = Line::from(vec![
        Span::styled(game.category_name().to_string(), Style::default().fg(Color::Cyan).bold()),
        Span::raw("  "),
        Span::styled(lives, Style::default().fg(Color::Red)),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let progress = format!(
        "Question {}/{}",
        game.current_question_number(),
        game.total_questions()
    );
    let state = CardState::Choosing {
        selected: game.selected_option(),
    };
    question_card::render(frame, chunks[1], question, &progress, state);

    render_controls(frame, chunks[2], "j/k navigate  ·  enter select  ·  q quit");
}

fn calculate_percentage(score: usize, total: usize) -> f64 {
    if total > 0 {
        (score as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_result(frame: &mut Frame, area: Rect, game: &ClassicGame) {
    let score = game.calculate_score();
    let asked = game.answered_count();
    let percentage = calculate_percentage(score, asked);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    let headline = if game.lives() == 0 {
        "OUT OF LIVES"
    } else {
        "RESULTS"
    };
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(headline, Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}  ({:.0}%)", score, asked, percentage),
            Style::default().fg(get_grade_color(percentage)).bold(),
        )),
        Line::from(format!("{} · {}", game.category_name(), game.difficulty()).fg(Color::DarkGray)),
        Line::from(""),
    ];
    let summary = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(summary, chunks[1]);

    render_breakdown(frame, chunks[2], game);
    render_controls(frame, chunks[3], "j/k scroll  ·  r restart  ·  q back");
}

fn render_breakdown(frame: &mut Frame, area: Rect, game: &ClassicGame) {
    let lines: Vec<Line> = game
        .answers()
        .iter()
        .zip(game.questions().iter())
        .enumerate()
        .filter(|(_, (answer, _))| answer.is_some())
        .map(|(index, (_, question))| {
            let (symbol, color) = if game.is_answer_correct(index) {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };

            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    truncate(&question.text, QUESTION_PREVIEW_LENGTH),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((game.result_scroll() as u16, 0));
    frame.render_widget(widget, area);
}
