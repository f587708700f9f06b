use chrono::Local;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use super::{difficulty_color, render_controls, truncate};
use crate::app::LeaderboardView;

pub fn render(frame: &mut Frame, area: Rect, view: &LeaderboardView) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let title = Paragraph::new("LEADERBOARD")
        .alignment(Alignment::Center)
        .fg(Color::Cyan)
        .bold();
    frame.render_widget(title, chunks[0]);

    render_stats(frame, chunks[1], view);
    render_filters(frame, chunks[2], view);
    render_rows(frame, chunks[3], view);

    let hints = if view.searching {
        "type to search  ·  enter/esc done"
    } else {
        "t time  ·  c category  ·  d difficulty  ·  / search  ·  x clear  ·  n/p page  ·  q back"
    };
    render_controls(frame, chunks[4], hints);
}

fn render_stats(frame: &mut Frame, area: Rect, view: &LeaderboardView) {
    let board = &view.board;
    let line = Line::from(vec![
        Span::styled("Top Score ", Style::default().fg(Color::DarkGray)),
        Span::styled(board.top_score().to_string(), Style::default().fg(Color::Yellow).bold()),
        Span::styled("   Entries ", Style::default().fg(Color::DarkGray)),
        Span::styled(board.len().to_string(), Style::default().fg(Color::White).bold()),
        Span::styled("   Categories ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            board.categories().len().to_string(),
            Style::default().fg(Color::White).bold(),
        ),
    ]);

    let widget = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_filters(frame: &mut Frame, area: Rect, view: &LeaderboardView) {
    let filter = &view.filter;
    let category = filter.category.as_deref().unwrap_or("All");
    let difficulty = filter
        .difficulty
        .map(|d| d.to_string())
        .unwrap_or_else(|| "All".to_string());

    let search_style = if view.searching {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if view.searching { "_" } else { "" };

    let line = Line::from(vec![
        Span::styled("Time: ", Style::default().fg(Color::DarkGray)),
        Span::styled(filter.timeframe.to_string(), Style::default().fg(Color::White)),
        Span::styled("  Category: ", Style::default().fg(Color::DarkGray)),
        Span::styled(category.to_string(), Style::default().fg(Color::White)),
        Span::styled("  Difficulty: ", Style::default().fg(Color::DarkGray)),
        Span::styled(difficulty, Style::default().fg(Color::White)),
        Span::styled("  Search: ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{}{}", filter.search, cursor), search_style),
    ]);

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_rows(frame: &mut Frame, area: Rect, view: &LeaderboardView) {
    let page = view.board.page(&view.filter, &Local::now(), view.page);

    if page.rows.is_empty() {
        let widget = Paragraph::new(Span::styled(
            "  No entries match. Finish a game to get on the board.",
            Style::default().fg(Color::DarkGray).italic(),
        ));
        frame.render_widget(widget, area);
        return;
    }

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        format!(
            " {:>4}  {:<16} {:>5}  {:<24} {:<8} {:<14} {}",
            "Rank", "Player", "Score", "Category", "Level", "Mode", "Date"
        ),
        Style::default().fg(Color::DarkGray).bold(),
    ))];

    for row in &page.rows {
        let entry = row.entry;
        let rank_color = match row.rank {
            1 => Color::Yellow,
            2 => Color::White,
            3 => Color::LightRed,
            _ => Color::Gray,
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:>4}  ", row.rank), Style::default().fg(rank_color).bold()),
            Span::styled(
                format!("{:<16} ", truncate(&entry.username, 13)),
                Style::default().fg(Color::White),
            ),
            Span::styled(format!("{:>5}  ", entry.score), Style::default().fg(Color::Cyan).bold()),
            Span::styled(
                format!("{:<24} ", truncate(&entry.category, 21)),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                format!("{:<8} ", entry.difficulty.to_string()),
                Style::default().fg(difficulty_color(entry.difficulty)),
            ),
            Span::styled(format!("{:<14} ", entry.mode.label()), Style::default().fg(Color::Gray)),
            Span::styled(
                entry.date.with_timezone(&Local).format("%Y-%m-%d").to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            " Page {} of {}  ·  {} entries",
            page.number,
            page.total_pages.max(1),
            page.total_entries
        ),
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}
