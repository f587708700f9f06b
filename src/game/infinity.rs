//! Infinity Mode: an unbounded question stream whose difficulty follows the streak.

use std::collections::VecDeque;

use crate::models::{AnswerOutcome, Difficulty, Question, ScoreState};

/// Fetch the next batch once fewer than this many questions are queued.
pub const PREFETCH_THRESHOLD: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfinityPhase {
    /// Waiting for a question to show.
    Loading,
    Answering,
    /// The answer is shown until the game advances.
    Revealed { selected: usize, is_correct: bool },
    /// No question could be loaded.
    Failed(String),
}

pub struct InfinityGame {
    category_id: Option<u32>,
    category_name: String,
    score: ScoreState,
    current: Option<Question>,
    queue: VecDeque<Question>,
    selected_option: usize,
    phase: InfinityPhase,
    fetch_in_flight: bool,
    /// Set by a failed prefetch; cleared when the next question is shown.
    prefetch_failed: bool,
}

impl InfinityGame {
    pub fn new(category_id: Option<u32>, category_name: impl Into<String>) -> Self {
        Self {
            category_id,
            category_name: category_name.into(),
            score: ScoreState::new(),
            current: None,
            queue: VecDeque::new(),
            selected_option: 0,
            phase: InfinityPhase::Loading,
            fetch_in_flight: false,
            prefetch_failed: false,
        }
    }

    pub fn category_id(&self) -> Option<u32> {
        self.category_id
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn phase(&self) -> &InfinityPhase {
        &self.phase
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch_in_flight
    }

    /// Difficulty of the batch to fetch now, if one is needed.
    pub fn needs_fetch(&self) -> Option<Difficulty> {
        if self.fetch_in_flight
            || self.prefetch_failed
            || matches!(self.phase, InfinityPhase::Failed(_))
        {
            return None;
        }
        (self.queue.len() < PREFETCH_THRESHOLD).then(|| self.score.difficulty())
    }

    pub fn begin_fetch(&mut self) {
        self.fetch_in_flight = true;
    }

    /// Queues a fetched batch. Batches for a tier the streak has left are dropped.
    pub fn receive_batch(&mut self, difficulty: Difficulty, questions: Vec<Question>) {
        self.fetch_in_flight = false;
        if difficulty != self.score.difficulty() {
            return;
        }

        self.queue.extend(questions);
        if self.current.is_none() {
            self.show_next();
        }
    }

    /// Records a failed fetch. With nothing to show the game fails; otherwise
    /// prefetching pauses until the next question is shown.
    pub fn fetch_failed(&mut self, message: impl Into<String>) {
        self.fetch_in_flight = false;
        if self.current.is_none() && self.queue.is_empty() {
            self.phase = InfinityPhase::Failed(message.into());
        } else {
            self.prefetch_failed = true;
        }
    }

    /// Leaves the failed state so the next fetch can run.
    pub fn retry(&mut self) {
        if matches!(self.phase, InfinityPhase::Failed(_)) {
            self.phase = InfinityPhase::Loading;
            self.prefetch_failed = false;
        }
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if self.phase == InfinityPhase::Answering && count > 0 {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if self.phase == InfinityPhase::Answering && count > 0 {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    pub fn select_option(&mut self, index: usize) {
        if self.phase == InfinityPhase::Answering && index < self.option_count() {
            self.selected_option = index;
        }
    }

    /// Answers the current question with the selected option.
    ///
    /// Returns `None` unless a question is awaiting an answer.
    pub fn submit(&mut self) -> Option<AnswerOutcome> {
        if self.phase != InfinityPhase::Answering {
            return None;
        }
        let question = self.current.as_ref()?;
        let selected = question.answers.get(self.selected_option)?.clone();

        let outcome = self.score.record(question, &selected);
        self.phase = InfinityPhase::Revealed {
            selected: self.selected_option,
            is_correct: outcome.is_correct,
        };

        if outcome.difficulty_changed {
            self.queue.retain(|q| q.difficulty == outcome.difficulty);
        }

        Some(outcome)
    }

    /// Moves past a revealed answer.
    pub fn advance(&mut self) {
        if matches!(self.phase, InfinityPhase::Revealed { .. }) {
            self.show_next();
        }
    }

    fn show_next(&mut self) {
        self.selected_option = 0;
        self.prefetch_failed = false;
        self.current = self.queue.pop_front();
        self.phase = if self.current.is_some() {
            InfinityPhase::Answering
        } else {
            InfinityPhase::Loading
        };
    }

    fn option_count(&self) -> usize {
        self.current.as_ref().map_or(0, |q| q.answers.len())
    }
}
