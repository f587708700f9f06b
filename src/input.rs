//! Key bindings for each screen.

use crossterm::event::KeyCode;

use crate::app::{App, Effect, Screen};
use crate::game::{ClassicPhase, InfinityPhase};

/// Applies a key press and returns the effects it produced.
pub fn handle_key(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match app.screen {
        Screen::Home => handle_home_input(app, key),
        Screen::Infinity => handle_infinity_input(app, key),
        Screen::Classic => handle_classic_input(app, key),
        Screen::Leaderboard => {
            handle_leaderboard_input(app, key);
            Vec::new()
        }
        Screen::About => {
            handle_about_input(app, key);
            Vec::new()
        }
    }
}

/// Maps `1`-`4` and `a`-`d` onto option indices.
fn option_index(c: char) -> Option<usize> {
    match c {
        '1'..='4' => Some(c as usize - '1' as usize),
        'a'..='d' => Some(c as usize - 'a' as usize),
        _ => None,
    }
}

fn handle_home_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.home.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.home.select_next(),
        KeyCode::Tab | KeyCode::Char('m') => app.home.mode = app.home.mode.toggle(),
        KeyCode::Char('d') => app.home.difficulty = app.home.difficulty.cycle(),
        KeyCode::Enter if !app.home.loading => return app.start_game(),
        KeyCode::Char('r') if !app.home.loading => return app.reload_categories(),
        KeyCode::Char('l') => app.open_leaderboard(),
        KeyCode::Char('a') => app.open_about(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
    Vec::new()
}

fn handle_infinity_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    let failed = matches!(app.infinity_phase(), Some(InfinityPhase::Failed(_)));

    match key {
        KeyCode::Up | KeyCode::Char('k') => app.infinity_select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.infinity_select_next(),
        KeyCode::Enter | KeyCode::Char(' ') if !failed => return app.infinity_submit(),
        KeyCode::Enter | KeyCode::Char('r') if failed => return app.infinity_retry(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return app.leave_game(),
        KeyCode::Char(c) => {
            if let Some(index) = option_index(c) {
                app.infinity_select(index);
            }
        }
        _ => {}
    }
    Vec::new()
}

fn handle_classic_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    let Some(phase) = app.classic_phase().cloned() else {
        app.go_home();
        return Vec::new();
    };

    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
        return app.leave_game();
    }

    match phase {
        ClassicPhase::Welcome | ClassicPhase::Failed(_) => {
            if matches!(key, KeyCode::Enter | KeyCode::Char('r')) {
                return app.classic_start();
            }
        }
        ClassicPhase::Loading => {}
        ClassicPhase::Quiz => match key {
            KeyCode::Up | KeyCode::Char('k') => app.classic_select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.classic_select_next(),
            KeyCode::Enter | KeyCode::Char(' ') => return app.classic_submit(),
            KeyCode::Char(c) => {
                if let Some(index) = option_index(c) {
                    app.classic_select(index);
                }
            }
            _ => {}
        },
        ClassicPhase::Result => match key {
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(game) = app.classic.as_mut() {
                    game.scroll_results_down();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(game) = app.classic.as_mut() {
                    game.scroll_results_up();
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => app.classic_restart(),
            _ => {}
        },
    }
    Vec::new()
}

fn handle_leaderboard_input(app: &mut App, key: KeyCode) {
    let view = &mut app.leaderboard;

    if view.searching {
        match key {
            KeyCode::Char(c) => view.push_search(c),
            KeyCode::Backspace => view.pop_search(),
            KeyCode::Enter | KeyCode::Esc => view.searching = false,
            _ => {}
        }
        return;
    }

    match key {
        KeyCode::Char('t') => view.cycle_timeframe(),
        KeyCode::Char('c') => view.cycle_category(),
        KeyCode::Char('d') => view.cycle_difficulty(),
        KeyCode::Char('/') | KeyCode::Char('s') => view.searching = true,
        KeyCode::Char('x') => view.clear_filters(),
        KeyCode::Right | KeyCode::Char('n') => view.next_page(),
        KeyCode::Left | KeyCode::Char('p') => view.previous_page(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.go_home(),
        _ => {}
    }
}

fn handle_about_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.about.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.about.select_next(),
        KeyCode::Enter | KeyCode::Char(' ') => app.about.toggle(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.go_home(),
        _ => {}
    }
}
