//! Screen routing and the effect/event exchange with the async runner.
//!
//! `App` never performs I/O. Methods return [`Effect`]s for the runner to
//! execute; completed work comes back as [`AppEvent`]s.

use std::time::Duration;

use chrono::{Local, Utc};

use crate::data::LEADERBOARD_LIMIT;
use crate::game::{ClassicGame, ClassicPhase, InfinityGame, InfinityPhase};
use crate::models::{
    category_name, Category, Difficulty, GameMode, Leaderboard, LeaderboardEntry,
    LeaderboardFilter, Question,
};

/// Game rules and FAQ shown on the About screen.
pub const FAQ: &[(&str, &str)] = &[
    (
        "What is Infinity Mode?",
        "Questions keep coming for as long as you answer correctly. Every correct answer adds one to your streak; a single miss resets it.",
    ),
    (
        "How is the difficulty determined in Infinity Mode?",
        "Questions start easy. At a streak of 6 they become medium and at 12 they become hard. A wrong answer drops you back to easy.",
    ),
    (
        "What is Classic Mode?",
        "A round of 10 questions at the difficulty you pick, with 3 lives. Each wrong answer costs a life and the round ends when they run out.",
    ),
    (
        "How is the high score kept?",
        "Your best Infinity streak is saved on this machine and only ever goes up.",
    ),
    (
        "How are the leaderboard rankings calculated?",
        "Each finished run is recorded with its score: the best streak for Infinity Mode, correct answers for Classic Mode. Entries are ranked by score.",
    ),
    (
        "Will I see the same question twice?",
        "A session token from the Open Trivia Database prevents repeats. When every question for a query has been served the token is reset automatically.",
    ),
    (
        "Where do the questions come from?",
        "From the Open Trivia Database, a free community-maintained trivia API.",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Infinity,
    Classic,
    Leaderboard,
    About,
}

/// Work requested from the runner.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadCategories,
    FetchInfinity {
        session: u64,
        category: Option<u32>,
        difficulty: Difficulty,
    },
    FetchClassic {
        session: u64,
        category: Option<u32>,
        difficulty: Difficulty,
        amount: u8,
    },
    /// Deliver `AppEvent::AdvanceDue` after `delay`.
    ScheduleAdvance {
        session: u64,
        delay: Duration,
    },
    SaveStreak(u32),
    RecordResult(LeaderboardEntry),
}

/// Completions delivered by the runner.
#[derive(Debug, Clone)]
pub enum AppEvent {
    CategoriesLoaded(Result<Vec<Category>, String>),
    InfinityBatch {
        session: u64,
        difficulty: Difficulty,
        result: Result<Vec<Question>, String>,
    },
    ClassicRound {
        session: u64,
        result: Result<Vec<Question>, String>,
    },
    AdvanceDue {
        session: u64,
    },
}

#[derive(Debug, Clone, Default)]
pub struct HomeState {
    pub categories: Vec<Category>,
    pub loading: bool,
    pub error: Option<String>,
    /// Index into the list, where 0 is "Any Category".
    pub selected: usize,
    pub mode: GameMode,
    /// Difficulty for Classic Mode; Infinity always starts easy.
    pub difficulty: Difficulty,
}

impl HomeState {
    pub fn entry_count(&self) -> usize {
        self.categories.len() + 1
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.selected
            .checked_sub(1)
            .and_then(|index| self.categories.get(index))
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.entry_count();
    }

    pub fn select_previous(&mut self) {
        let count = self.entry_count();
        self.selected = (self.selected + count - 1) % count;
    }
}

#[derive(Debug, Clone, Default)]
pub struct LeaderboardView {
    pub board: Leaderboard,
    pub filter: LeaderboardFilter,
    pub page: usize,
    pub searching: bool,
}

impl LeaderboardView {
    pub fn new(board: Leaderboard) -> Self {
        Self {
            board,
            page: 1,
            ..Default::default()
        }
    }

    pub fn total_pages(&self) -> usize {
        self.board.page(&self.filter, &Local::now(), 1).total_pages
    }

    pub fn next_page(&mut self) {
        self.page = (self.page + 1).min(self.total_pages().max(1));
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn cycle_timeframe(&mut self) {
        self.filter.timeframe = self.filter.timeframe.cycle();
        self.page = 1;
    }

    /// All, then each recorded category in order.
    pub fn cycle_category(&mut self) {
        let categories = self.board.categories();
        self.filter.category = match &self.filter.category {
            None => categories.first().cloned(),
            Some(current) => categories
                .iter()
                .position(|cat| cat == current)
                .and_then(|index| categories.get(index + 1))
                .cloned(),
        };
        self.page = 1;
    }

    pub fn cycle_difficulty(&mut self) {
        self.filter.difficulty = match self.filter.difficulty {
            None => Some(Difficulty::Easy),
            Some(Difficulty::Hard) => None,
            Some(difficulty) => Some(difficulty.cycle()),
        };
        self.page = 1;
    }

    pub fn push_search(&mut self, c: char) {
        self.filter.search.push(c);
        self.page = 1;
    }

    pub fn pop_search(&mut self) {
        self.filter.search.pop();
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filter = LeaderboardFilter::default();
        self.searching = false;
        self.page = 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct AboutState {
    pub selected: usize,
    pub open: Option<usize>,
}

impl AboutState {
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % FAQ.len();
    }

    pub fn select_previous(&mut self) {
        self.selected = (self.selected + FAQ.len() - 1) % FAQ.len();
    }

    pub fn toggle(&mut self) {
        self.open = if self.open == Some(self.selected) {
            None
        } else {
            Some(self.selected)
        };
    }
}

pub struct App {
    pub screen: Screen,
    pub home: HomeState,
    pub infinity: Option<InfinityGame>,
    pub classic: Option<ClassicGame>,
    pub leaderboard: LeaderboardView,
    pub about: AboutState,
    pub should_quit: bool,
    player: String,
    high_score: u32,
    session: u64,
    reveal_delay: Duration,
    classic_length: u8,
}

impl App {
    pub fn new(player: impl Into<String>, high_score: u32, leaderboard: Leaderboard) -> Self {
        Self {
            screen: Screen::Home,
            home: HomeState::default(),
            infinity: None,
            classic: None,
            leaderboard: LeaderboardView::new(leaderboard),
            about: AboutState::default(),
            should_quit: false,
            player: player.into(),
            high_score,
            session: 0,
            reveal_delay: Duration::from_millis(1500),
            classic_length: crate::game::ROUND_LENGTH,
        }
    }

    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    pub fn with_classic_length(mut self, length: u8) -> Self {
        self.classic_length = length.max(1);
        self
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Effects to run once at startup.
    pub fn boot(&mut self) -> Vec<Effect> {
        self.reload_categories()
    }

    pub fn reload_categories(&mut self) -> Vec<Effect> {
        self.home.loading = true;
        self.home.error = None;
        vec![Effect::LoadCategories]
    }

    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
    }

    pub fn open_leaderboard(&mut self) {
        self.leaderboard.page = 1;
        self.leaderboard.searching = false;
        self.screen = Screen::Leaderboard;
    }

    pub fn open_about(&mut self) {
        self.screen = Screen::About;
    }

    /// Starts the game selected on the home screen.
    pub fn start_game(&mut self) -> Vec<Effect> {
        let category_id = self.home.selected_category().map(|cat| cat.id);
        let name = category_name(&self.home.categories, category_id).to_string();
        self.session += 1;

        match self.home.mode {
            GameMode::Infinity => {
                self.infinity = Some(InfinityGame::new(category_id, name));
                self.screen = Screen::Infinity;
                self.pump_infinity()
            }
            GameMode::Classic => {
                self.classic = Some(ClassicGame::new(category_id, name, self.home.difficulty));
                self.screen = Screen::Classic;
                Vec::new()
            }
        }
    }

    /// Ends the running game, recording a result when there is one.
    pub fn leave_game(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();

        if let Some(game) = self.infinity.take() {
            let best = game.score().best_streak();
            if best > 0 {
                let entry = LeaderboardEntry::new(
                    self.player.clone(),
                    best,
                    game.category_name(),
                    game.score().peak_difficulty(),
                    GameMode::Infinity,
                    Utc::now(),
                );
                effects.push(self.record(entry));
            }
        }
        self.classic = None;

        self.session += 1;
        self.screen = Screen::Home;
        effects
    }

    fn record(&mut self, entry: LeaderboardEntry) -> Effect {
        self.leaderboard.board.insert(entry.clone(), LEADERBOARD_LIMIT);
        Effect::RecordResult(entry)
    }

    fn pump_infinity(&mut self) -> Vec<Effect> {
        let session = self.session;
        let Some(game) = self.infinity.as_mut() else {
            return Vec::new();
        };
        match game.needs_fetch() {
            Some(difficulty) => {
                game.begin_fetch();
                vec![Effect::FetchInfinity {
                    session,
                    category: game.category_id(),
                    difficulty,
                }]
            }
            None => Vec::new(),
        }
    }

    pub fn infinity_select_next(&mut self) {
        if let Some(game) = self.infinity.as_mut() {
            game.select_next_option();
        }
    }

    pub fn infinity_select_previous(&mut self) {
        if let Some(game) = self.infinity.as_mut() {
            game.select_previous_option();
        }
    }

    pub fn infinity_select(&mut self, index: usize) {
        if let Some(game) = self.infinity.as_mut() {
            game.select_option(index);
        }
    }

    pub fn infinity_submit(&mut self) -> Vec<Effect> {
        let Some(outcome) = self.infinity.as_mut().and_then(InfinityGame::submit) else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        if outcome.streak > self.high_score {
            self.high_score = outcome.streak;
            effects.push(Effect::SaveStreak(outcome.streak));
        }
        effects.push(Effect::ScheduleAdvance {
            session: self.session,
            delay: self.reveal_delay,
        });
        effects.extend(self.pump_infinity());
        effects
    }

    pub fn infinity_retry(&mut self) -> Vec<Effect> {
        if let Some(game) = self.infinity.as_mut() {
            game.retry();
        }
        self.pump_infinity()
    }

    pub fn classic_start(&mut self) -> Vec<Effect> {
        let session = self.session;
        let amount = self.classic_length;
        let Some(game) = self.classic.as_mut() else {
            return Vec::new();
        };
        if !game.start() {
            return Vec::new();
        }
        vec![Effect::FetchClassic {
            session,
            category: game.category_id(),
            difficulty: game.difficulty(),
            amount,
        }]
    }

    pub fn classic_select_next(&mut self) {
        if let Some(game) = self.classic.as_mut() {
            game.select_next_option();
        }
    }

    pub fn classic_select_previous(&mut self) {
        if let Some(game) = self.classic.as_mut() {
            game.select_previous_option();
        }
    }

    pub fn classic_select(&mut self, index: usize) {
        if let Some(game) = self.classic.as_mut() {
            game.select_option(index);
        }
    }

    pub fn classic_submit(&mut self) -> Vec<Effect> {
        let Some(game) = self.classic.as_mut() else {
            return Vec::new();
        };
        if !game.submit_answer() {
            return Vec::new();
        }

        let entry = LeaderboardEntry::new(
            self.player.clone(),
            game.calculate_score() as u32,
            game.category_name(),
            game.difficulty(),
            GameMode::Classic,
            Utc::now(),
        );
        vec![self.record(entry)]
    }

    pub fn classic_restart(&mut self) {
        if let Some(game) = self.classic.as_mut() {
            game.restart();
        }
        self.session += 1;
    }

    /// Applies a completion from the runner. Events from an earlier session are dropped.
    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::CategoriesLoaded(result) => {
                self.home.loading = false;
                match result {
                    Ok(categories) => {
                        self.home.categories = categories;
                        self.home.error = None;
                        if self.home.selected >= self.home.entry_count() {
                            self.home.selected = 0;
                        }
                    }
                    Err(message) => self.home.error = Some(message),
                }
                Vec::new()
            }
            AppEvent::InfinityBatch {
                session,
                difficulty,
                result,
            } => {
                if session != self.session {
                    return Vec::new();
                }
                if let Some(game) = self.infinity.as_mut() {
                    match result {
                        Ok(questions) => game.receive_batch(difficulty, questions),
                        Err(message) => game.fetch_failed(message),
                    }
                }
                self.pump_infinity()
            }
            AppEvent::ClassicRound { session, result } => {
                if session != self.session {
                    return Vec::new();
                }
                if let Some(game) = self.classic.as_mut() {
                    match result {
                        Ok(questions) => game.load_questions(questions),
                        Err(message) => game.load_failed(message),
                    }
                }
                Vec::new()
            }
            AppEvent::AdvanceDue { session } => {
                if session != self.session {
                    return Vec::new();
                }
                if let Some(game) = self.infinity.as_mut() {
                    game.advance();
                }
                self.pump_infinity()
            }
        }
    }

    pub fn infinity_phase(&self) -> Option<&InfinityPhase> {
        self.infinity.as_ref().map(InfinityGame::phase)
    }

    pub fn classic_phase(&self) -> Option<&ClassicPhase> {
        self.classic.as_ref().map(|game| &game.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: 9,
                name: "General Knowledge".to_string(),
            },
            Category {
                id: 17,
                name: "Science & Nature".to_string(),
            },
        ]
    }

    fn question(n: usize, difficulty: Difficulty) -> Question {
        Question {
            text: format!("Question {}", n),
            correct: "right".to_string(),
            answers: vec!["right".to_string(), "wrong".to_string()],
            difficulty,
            category: "General Knowledge".to_string(),
        }
    }

    fn batch(difficulty: Difficulty) -> Vec<Question> {
        (0..10).map(|n| question(n, difficulty)).collect()
    }

    fn app_with_categories() -> App {
        let mut app = App::new("Tester", 2, Leaderboard::default());
        assert_eq!(app.boot(), vec![Effect::LoadCategories]);
        app.handle_event(AppEvent::CategoriesLoaded(Ok(categories())));
        app
    }

    #[test]
    fn test_categories_loaded_and_failed() {
        let mut app = App::new("Tester", 0, Leaderboard::default());
        app.boot();
        assert!(app.home.loading);

        app.handle_event(AppEvent::CategoriesLoaded(Err("offline".to_string())));
        assert!(!app.home.loading);
        assert_eq!(app.home.error.as_deref(), Some("offline"));

        app.reload_categories();
        app.handle_event(AppEvent::CategoriesLoaded(Ok(categories())));
        assert_eq!(app.home.entry_count(), 3);
        assert!(app.home.error.is_none());
    }

    #[test]
    fn test_start_infinity_requests_easy_batch() {
        let mut app = app_with_categories();
        app.home.selected = 1;

        let effects = app.start_game();

        assert_eq!(app.screen, Screen::Infinity);
        assert_eq!(
            effects,
            vec![Effect::FetchInfinity {
                session: app.session(),
                category: Some(9),
                difficulty: Difficulty::Easy,
            }]
        );
        assert_eq!(
            app.infinity.as_ref().unwrap().category_name(),
            "General Knowledge"
        );
    }

    #[test]
    fn test_answers_save_high_score_and_schedule_advance() {
        let mut app = app_with_categories();
        app.start_game();
        let session = app.session();
        app.handle_event(AppEvent::InfinityBatch {
            session,
            difficulty: Difficulty::Easy,
            result: Ok(batch(Difficulty::Easy)),
        });

        let mut saved = Vec::new();
        for _ in 0..3 {
            app.infinity_select(0);
            for effect in app.infinity_submit() {
                if let Effect::SaveStreak(streak) = effect {
                    saved.push(streak);
                }
            }
            app.handle_event(AppEvent::AdvanceDue { session });
        }

        assert_eq!(saved, vec![3]);
        assert_eq!(app.high_score(), 3);
    }

    #[test]
    fn test_submit_schedules_reveal_delay() {
        let mut app = app_with_categories().with_reveal_delay(Duration::from_millis(10));
        app.start_game();
        let session = app.session();
        app.handle_event(AppEvent::InfinityBatch {
            session,
            difficulty: Difficulty::Easy,
            result: Ok(batch(Difficulty::Easy)),
        });

        app.infinity_select(1);
        let effects = app.infinity_submit();
        assert_eq!(
            effects,
            vec![Effect::ScheduleAdvance {
                session,
                delay: Duration::from_millis(10),
            }]
        );
        assert!(app.infinity_submit().is_empty());
    }

    #[test]
    fn test_stale_events_are_ignored() {
        let mut app = app_with_categories();
        app.start_game();
        let old_session = app.session();
        app.leave_game();
        app.start_game();

        app.handle_event(AppEvent::InfinityBatch {
            session: old_session,
            difficulty: Difficulty::Easy,
            result: Ok(batch(Difficulty::Easy)),
        });

        assert_eq!(app.infinity_phase(), Some(&InfinityPhase::Loading));
    }

    #[test]
    fn test_leaving_infinity_records_best_streak() {
        let mut app = app_with_categories();
        app.start_game();
        let session = app.session();
        app.handle_event(AppEvent::InfinityBatch {
            session,
            difficulty: Difficulty::Easy,
            result: Ok(batch(Difficulty::Easy)),
        });
        app.infinity_select(0);
        app.infinity_submit();

        let effects = app.leave_game();

        assert_eq!(app.screen, Screen::Home);
        assert!(app.infinity.is_none());
        assert!(matches!(
            effects.as_slice(),
            [Effect::RecordResult(entry)] if entry.score == 1 && entry.mode == GameMode::Infinity
        ));
        assert_eq!(app.leaderboard.board.len(), 1);
    }

    #[test]
    fn test_failed_prefetch_waits_for_next_question() {
        let mut app = app_with_categories();
        app.start_game();
        let session = app.session();
        let effects = app.handle_event(AppEvent::InfinityBatch {
            session,
            difficulty: Difficulty::Easy,
            result: Ok(vec![question(0, Difficulty::Easy)]),
        });
        assert_eq!(effects.len(), 1);

        for _ in 0..50 {
            let effects = app.handle_event(AppEvent::InfinityBatch {
                session,
                difficulty: Difficulty::Easy,
                result: Err("rate limited".to_string()),
            });
            assert!(effects.is_empty());
        }
        assert_eq!(app.infinity_phase(), Some(&InfinityPhase::Answering));

        app.infinity_select(0);
        assert!(
            !app
                .infinity_submit()
                .iter()
                .any(|effect| matches!(effect, Effect::FetchInfinity { .. }))
        );

        let effects = app.handle_event(AppEvent::AdvanceDue { session });
        assert!(matches!(effects.as_slice(), [Effect::FetchInfinity { .. }]));
    }

    #[test]
    fn test_leaving_without_answers_records_nothing() {
        let mut app = app_with_categories();
        app.start_game();
        assert!(app.leave_game().is_empty());
    }

    #[test]
    fn test_classic_round_flow() {
        let mut app = app_with_categories().with_classic_length(2);
        app.home.mode = GameMode::Classic;
        app.home.difficulty = Difficulty::Hard;
        app.home.selected = 2;

        assert!(app.start_game().is_empty());
        let effects = app.classic_start();
        let session = app.session();
        assert_eq!(
            effects,
            vec![Effect::FetchClassic {
                session,
                category: Some(17),
                difficulty: Difficulty::Hard,
                amount: 2,
            }]
        );

        app.handle_event(AppEvent::ClassicRound {
            session,
            result: Ok(vec![question(0, Difficulty::Hard), question(1, Difficulty::Hard)]),
        });
        assert_eq!(app.classic_phase(), Some(&ClassicPhase::Quiz));

        assert!(app.classic_submit().is_empty());
        app.classic_select(1);
        let effects = app.classic_submit();
        assert!(matches!(
            effects.as_slice(),
            [Effect::RecordResult(entry)]
                if entry.score == 1
                    && entry.difficulty == Difficulty::Hard
                    && entry.category == "Science & Nature"
        ));
        assert_eq!(app.classic_phase(), Some(&ClassicPhase::Result));
    }

    #[test]
    fn test_leaderboard_view_cycles_filters() {
        let mut view = LeaderboardView::new(Leaderboard::new(vec![
            LeaderboardEntry::new("a", 1, "History", Difficulty::Easy, GameMode::Classic, Utc::now()),
            LeaderboardEntry::new("b", 2, "Science", Difficulty::Easy, GameMode::Classic, Utc::now()),
        ]));

        view.cycle_category();
        assert_eq!(view.filter.category.as_deref(), Some("History"));
        view.cycle_category();
        assert_eq!(view.filter.category.as_deref(), Some("Science"));
        view.cycle_category();
        assert_eq!(view.filter.category, None);

        view.cycle_difficulty();
        view.cycle_difficulty();
        view.cycle_difficulty();
        assert_eq!(view.filter.difficulty, Some(Difficulty::Hard));
        view.cycle_difficulty();
        assert_eq!(view.filter.difficulty, None);

        view.next_page();
        assert_eq!(view.page, 1);
        view.previous_page();
        assert_eq!(view.page, 1);
    }

    #[test]
    fn test_about_toggle() {
        let mut about = AboutState::default();
        about.select_previous();
        assert_eq!(about.selected, FAQ.len() - 1);
        about.toggle();
        assert_eq!(about.open, Some(FAQ.len() - 1));
        about.toggle();
        assert_eq!(about.open, None);
    }
}
