use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use super::render_controls;
use crate::app::{AboutState, FAQ};

pub fn render(frame: &mut Frame, area: Rect, about: &AboutState) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled("ABOUT", Style::default().fg(Color::Cyan).bold())),
        Line::from("Game rules and frequently asked questions".fg(Color::DarkGray)),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(title, chunks[0]);

    let mut lines: Vec<Line> = Vec::new();
    for (index, (question, answer)) in FAQ.iter().enumerate() {
        let is_selected = index == about.selected;
        let is_open = about.open == Some(index);
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::White)
        };
        let marker = if is_open { "v" } else { ">" };

        lines.push(Line::from(Span::styled(format!(" {} {}", marker, question), style)));
        if is_open {
            lines.push(Line::from(Span::styled(
                format!("   {}", answer),
                Style::default().fg(Color::Gray),
            )));
        }
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, chunks[1]);

    render_controls(frame, chunks[2], "j/k move  ·  enter expand  ·  q back");
}
