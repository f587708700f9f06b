//! Question card shared by both game modes.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use super::difficulty_color;
use crate::models::Question;

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// What the card shows about the chosen answer.
#[derive(Debug, Clone, Copy)]
pub enum CardState {
    /// Still choosing; `selected` is highlighted.
    Choosing { selected: usize },
    /// Answer locked in; correct and wrong options are colored.
    Revealed { selected: usize, is_correct: bool },
}

/// `progress` is e.g. "Question 4" or "Question 4/10".
pub fn render(frame: &mut Frame, area: Rect, question: &Question, progress: &str, state: CardState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Color::DarkGray)
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(inner);

    let header = Line::from(vec![
        Span::styled(progress.to_string(), Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled(
            question.difficulty.as_str().to_uppercase(),
            Style::default().fg(difficulty_color(question.difficulty)).bold(),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let text = Paragraph::new(question.text.as_str())
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(text, chunks[1]);

    render_options(frame, chunks[2], question, state);
    render_feedback(frame, chunks[3], question, state);
}

fn render_options(frame: &mut Frame, area: Rect, question: &Question, state: CardState) {
    let correct = question.correct_index();
    let mut lines: Vec<Line> = Vec::with_capacity(question.answers.len() * 2);

    for (index, option) in question.answers.iter().enumerate() {
        let (style, marker) = match state {
            CardState::Choosing { selected } if index == selected => {
                (Style::default().fg(Color::Cyan).bold(), ">")
            }
            CardState::Choosing { .. } => (Style::default().fg(Color::Gray), " "),
            CardState::Revealed { .. } if Some(index) == correct => {
                (Style::default().fg(Color::Green).bold(), "+")
            }
            CardState::Revealed { selected, .. } if index == selected => {
                (Style::default().fg(Color::Red).bold(), "-")
            }
            CardState::Revealed { .. } => (Style::default().fg(Color::DarkGray), " "),
        };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, question: &Question, state: CardState) {
    let CardState::Revealed { is_correct, .. } = state else {
        return;
    };
    let line = if is_correct {
        Line::from(Span::styled("Correct!", Style::default().fg(Color::Green).bold()))
    } else {
        Line::from(vec![
            Span::styled("Wrong. ", Style::default().fg(Color::Red).bold()),
            Span::styled(
                format!("The answer was {}", question.correct),
                Style::default().fg(Color::Gray),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}
