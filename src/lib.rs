//! # quizmaster
//!
//! A terminal trivia game backed by the Open Trivia Database.
//!
//! Infinity Mode serves questions for as long as the player keeps answering
//! correctly, raising the difficulty with the streak. Classic Mode plays a
//! fixed round with three lives. Streaks, the session token and finished
//! runs are kept in a local JSON store.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use quizmaster::{Config, FileStore, Progress, QuizError, QuizMaster};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let data_dir = quizmaster::config::default_data_dir();
//!     let config = Config::from_env(&data_dir);
//!     let store = FileStore::open(data_dir.join(quizmaster::config::STORE_FILE))?;
//!
//!     QuizMaster::new(&config, Progress::new(Arc::new(store)))?
//!         .run()
//!         .await
//! }
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod game;
pub mod input;
pub mod logging;
pub mod models;
pub mod protocol;
pub mod terminal;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

pub use app::{App, AppEvent, Effect, Screen};
pub use client::{OpenTdbClient, PrefetchConfig, Prefetcher, TriviaApi};
pub use config::Config;
pub use data::{FileStore, KeyValueStore, MemoryStore, Progress};
pub use error::{ApiError, QuizError, StoreError};
pub use models::{
    Category, Difficulty, GameMode, Leaderboard, LeaderboardEntry, LeaderboardFilter, Question,
    Timeframe,
};

use models::questions_from_raw;
use terminal::TerminalGuard;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the terminal UI and carries out the effects the app requests.
pub struct QuizMaster<A = OpenTdbClient> {
    app: App,
    api: A,
    prefetcher: Arc<Mutex<Prefetcher<A>>>,
    progress: Progress,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl QuizMaster<OpenTdbClient> {
    /// Builds a runner talking to the configured Open Trivia Database URL.
    pub fn new(config: &Config, progress: Progress) -> Result<Self, QuizError> {
        let api = OpenTdbClient::new(&config.api_base_url, config.request_timeout())?;
        info!(base_url = api.base_url(), "Using trivia provider");
        Ok(Self::with_api(api, progress, config))
    }
}

impl<A> QuizMaster<A>
where
    A: TriviaApi + Clone + 'static,
{
    pub fn with_api(api: A, progress: Progress, config: &Config) -> Self {
        let app = App::new(
            config.player_name.clone(),
            progress.high_score(),
            progress.leaderboard(),
        )
        .with_reveal_delay(config.reveal_delay())
        .with_classic_length(config.classic_length);

        let prefetcher = Prefetcher::new(api.clone(), progress.clone(), config.prefetch());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            app,
            api,
            prefetcher: Arc::new(Mutex::new(prefetcher)),
            progress,
            events_tx,
            events_rx,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Takes over the terminal until the player quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut guard = TerminalGuard::new()?;

        let effects = self.app.boot();
        self.execute_all(effects);

        while !self.app.should_quit {
            guard
                .terminal()
                .draw(|frame| ui::render(frame, &self.app))?;

            self.drain_events();

            if event::poll(INPUT_POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    let effects = if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        self.app.should_quit = true;
                        self.app.leave_game()
                    } else {
                        input::handle_key(&mut self.app, key.code)
                    };
                    self.execute_all(effects);
                }
            }
        }

        info!("Quit requested");
        Ok(())
    }

    /// Applies every completion that has arrived so far.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            let effects = self.app.handle_event(event);
            self.execute_all(effects);
        }
    }

    fn execute_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.execute(effect);
        }
    }

    /// Network and timer work is spawned; storage writes happen inline.
    fn execute(&mut self, effect: Effect) {
        debug!(?effect, "Executing effect");
        let tx = self.events_tx.clone();

        match effect {
            Effect::LoadCategories => {
                let api = self.api.clone();
                tokio::spawn(async move {
                    let result = api.categories().await.map_err(|e| {
                        warn!(error = %e, "Failed to load categories");
                        e.to_string()
                    });
                    let _ = tx.send(AppEvent::CategoriesLoaded(result));
                });
            }
            Effect::FetchInfinity {
                session,
                category,
                difficulty,
            } => {
                let prefetcher = Arc::clone(&self.prefetcher);
                tokio::spawn(async move {
                    let result = prefetcher
                        .lock()
                        .await
                        .fetch_batch(category, Some(difficulty))
                        .await
                        .map(questions_from_raw)
                        .map_err(|e| {
                            warn!(error = %e, ?category, %difficulty, "Infinity batch failed");
                            e.to_string()
                        });
                    let _ = tx.send(AppEvent::InfinityBatch {
                        session,
                        difficulty,
                        result,
                    });
                });
            }
            Effect::FetchClassic {
                session,
                category,
                difficulty,
                amount,
            } => {
                let prefetcher = Arc::clone(&self.prefetcher);
                tokio::spawn(async move {
                    let result = prefetcher
                        .lock()
                        .await
                        .fetch(amount, category, Some(difficulty))
                        .await
                        .map(questions_from_raw)
                        .map_err(|e| {
                            warn!(error = %e, ?category, %difficulty, "Classic round failed");
                            e.to_string()
                        });
                    let _ = tx.send(AppEvent::ClassicRound { session, result });
                });
            }
            Effect::ScheduleAdvance { session, delay } => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(AppEvent::AdvanceDue { session });
                });
            }
            Effect::SaveStreak(streak) => match self.progress.record_streak(streak) {
                Ok(true) => info!(high_score = streak, "New high score"),
                Ok(false) => {}
                Err(e) => warn!(error = %e, "Failed to save high score"),
            },
            Effect::RecordResult(entry) => {
                let (score, mode) = (entry.score, entry.mode);
                match self.progress.record_result(entry) {
                    Ok(_) => info!(score, mode = mode.label(), "Result recorded"),
                    Err(e) => warn!(error = %e, "Failed to record result"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::protocol::{QuestionQuery, QuestionsResponse, RawQuestion};

    #[derive(Clone)]
    struct StaticApi;

    #[async_trait]
    impl TriviaApi for StaticApi {
        async fn categories(&self) -> Result<Vec<Category>, ApiError> {
            Ok(vec![Category {
                id: 9,
                name: "General Knowledge".to_string(),
            }])
        }

        async fn request_token(&self) -> Result<String, ApiError> {
            Ok("token".to_string())
        }

        async fn reset_token(&self, _token: &str) -> Result<(), ApiError> {
            Ok(())
        }

        async fn questions(&self, query: &QuestionQuery) -> Result<QuestionsResponse, ApiError> {
            let results = (0..query.amount)
                .map(|n| RawQuestion {
                    kind: "multiple".to_string(),
                    difficulty: "easy".to_string(),
                    category: "General Knowledge".to_string(),
                    question: format!("Question {}", n),
                    correct_answer: "yes".to_string(),
                    incorrect_answers: vec!["no".to_string(), "maybe".to_string(), "never".to_string()],
                })
                .collect();
            Ok(QuestionsResponse {
                response_code: 0,
                results,
            })
        }
    }

    fn quiz() -> (Progress, QuizMaster<StaticApi>) {
        let progress = Progress::new(Arc::new(MemoryStore::new()));
        let quiz = QuizMaster::with_api(StaticApi, progress.clone(), &Config::default());
        (progress, quiz)
    }

    #[tokio::test]
    async fn test_load_categories_reports_back() {
        let (_, mut quiz) = quiz();
        quiz.execute(Effect::LoadCategories);

        let event = quiz.events_rx.recv().await.unwrap();
        assert!(matches!(
            event,
            AppEvent::CategoriesLoaded(Ok(ref categories)) if categories.len() == 1
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_effects_convert_questions() {
        let (progress, mut quiz) = quiz();
        quiz.execute(Effect::FetchInfinity {
            session: 4,
            category: Some(9),
            difficulty: Difficulty::Easy,
        });

        match quiz.events_rx.recv().await.unwrap() {
            AppEvent::InfinityBatch {
                session,
                difficulty,
                result: Ok(questions),
            } => {
                assert_eq!(session, 4);
                assert_eq!(difficulty, Difficulty::Easy);
                assert_eq!(questions.len(), 10);
                assert_eq!(questions[0].answers.len(), 4);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(progress.token().as_deref(), Some("token"));

        quiz.execute(Effect::FetchClassic {
            session: 5,
            category: None,
            difficulty: Difficulty::Hard,
            amount: 3,
        });
        match quiz.events_rx.recv().await.unwrap() {
            AppEvent::ClassicRound {
                session,
                result: Ok(questions),
            } => {
                assert_eq!(session, 5);
                assert_eq!(questions.len(), 3);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_advance_waits_for_delay() {
        let (_, mut quiz) = quiz();
        let start = tokio::time::Instant::now();
        quiz.execute(Effect::ScheduleAdvance {
            session: 2,
            delay: Duration::from_millis(1500),
        });

        let event = quiz.events_rx.recv().await.unwrap();
        assert!(matches!(event, AppEvent::AdvanceDue { session: 2 }));
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_storage_effects_persist() {
        let (progress, mut quiz) = quiz();

        quiz.execute(Effect::SaveStreak(8));
        quiz.execute(Effect::SaveStreak(3));
        assert_eq!(progress.high_score(), 8);

        quiz.execute(Effect::RecordResult(LeaderboardEntry::new(
            "Tester",
            8,
            "General Knowledge",
            Difficulty::Medium,
            GameMode::Infinity,
            Utc::now(),
        )));
        assert_eq!(progress.leaderboard().len(), 1);
    }

    #[tokio::test]
    async fn test_drain_events_applies_to_app() {
        let (_, mut quiz) = quiz();
        let effects = quiz.app_mut().boot();
        quiz.execute_all(effects);

        let event = quiz.events_rx.recv().await.unwrap();
        quiz.events_tx.send(event).unwrap();
        quiz.drain_events();

        assert!(!quiz.app().home.loading);
        assert_eq!(quiz.app().home.categories.len(), 1);
    }
}
