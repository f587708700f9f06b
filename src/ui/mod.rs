mod about;
mod classic;
mod home;
mod infinity;
mod leaderboard;
mod question_card;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::app::{App, Screen};
use crate::models::Difficulty;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.screen {
        Screen::Home => home::render(frame, area, app),
        Screen::Infinity => infinity::render(frame, area, app),
        Screen::Classic => classic::render(frame, area, app),
        Screen::Leaderboard => leaderboard::render(frame, area, &app.leaderboard),
        Screen::About => about::render(frame, area, &app.about),
    }
}

/// One dim, centered line of key hints.
fn render_controls(frame: &mut Frame, area: Rect, hints: &str) {
    let widget = Paragraph::new(hints)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

/// Shortens `text` to `max` characters, adding an ellipsis when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let truncated: String = text.chars().take(max).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
