//! Classic Mode: a fixed round of questions with a limited number of lives.

use crate::models::{Difficulty, Question};

/// Questions fetched for one Classic round.
pub const ROUND_LENGTH: u8 = 10;
pub const STARTING_LIVES: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassicPhase {
    Welcome,
    Loading,
    Quiz,
    Result,
    Failed(String),
}

pub struct ClassicGame {
    pub phase: ClassicPhase,
    category_id: Option<u32>,
    category_name: String,
    difficulty: Difficulty,
    questions: Vec<Question>,
    current_question_index: usize,
    selected_option: usize,
    answers: Vec<Option<usize>>,
    lives: u8,
    result_scroll: usize,
}

impl ClassicGame {
    pub fn new(category_id: Option<u32>, category_name: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            phase: ClassicPhase::Welcome,
            category_id,
            category_name: category_name.into(),
            difficulty,
            questions: Vec::new(),
            current_question_index: 0,
            selected_option: 0,
            answers: Vec::new(),
            lives: STARTING_LIVES,
            result_scroll: 0,
        }
    }

    pub fn category_id(&self) -> Option<u32> {
        self.category_id
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question_index)
    }

    pub fn current_question_number(&self) -> usize {
        self.current_question_index + 1
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    /// Moves from the welcome screen to loading; the caller fetches the round.
    pub fn start(&mut self) -> bool {
        if matches!(self.phase, ClassicPhase::Welcome | ClassicPhase::Failed(_)) {
            self.phase = ClassicPhase::Loading;
            true
        } else {
            false
        }
    }

    pub fn load_questions(&mut self, questions: Vec<Question>) {
        if self.phase != ClassicPhase::Loading {
            return;
        }
        if questions.is_empty() {
            self.phase = ClassicPhase::Failed("no questions available for this query".to_string());
            return;
        }
        self.answers = vec![None; questions.len()];
        self.questions = questions;
        self.current_question_index = 0;
        self.selected_option = 0;
        self.phase = ClassicPhase::Quiz;
    }

    pub fn load_failed(&mut self, message: impl Into<String>) {
        if self.phase == ClassicPhase::Loading {
            self.phase = ClassicPhase::Failed(message.into());
        }
    }

    fn option_count(&self) -> usize {
        self.current_question().map_or(0, |q| q.answers.len())
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    pub fn select_option(&mut self, index: usize) {
        if index < self.option_count() {
            self.selected_option = index;
        }
    }

    /// Records the selected option. Returns true when the round just ended.
    pub fn submit_answer(&mut self) -> bool {
        if self.phase != ClassicPhase::Quiz {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        let is_correct = question.correct_index() == Some(self.selected_option);

        self.answers[self.current_question_index] = Some(self.selected_option);
        if !is_correct {
            self.lives = self.lives.saturating_sub(1);
        }
        self.current_question_index += 1;
        self.selected_option = 0;

        if self.lives == 0 || self.current_question_index >= self.questions.len() {
            self.phase = ClassicPhase::Result;
            return true;
        }
        false
    }

    pub fn is_answer_correct(&self, index: usize) -> bool {
        match (self.answers.get(index), self.questions.get(index)) {
            (Some(Some(answer)), Some(question)) => question.correct_index() == Some(*answer),
            _ => false,
        }
    }

    pub fn calculate_score(&self) -> usize {
        (0..self.answers.len())
            .filter(|&index| self.is_answer_correct(index))
            .count()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_some()).count()
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.answered_count().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Back to the welcome screen; the next start fetches a fresh round.
    pub fn restart(&mut self) {
        self.phase = ClassicPhase::Welcome;
        self.questions.clear();
        self.answers.clear();
        self.current_question_index = 0;
        self.selected_option = 0;
        self.lives = STARTING_LIVES;
        self.result_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(count: usize) -> Vec<Question> {
        (0..count)
            .map(|n| Question {
                text: format!("Question {}", n),
                correct: "B".to_string(),
                answers: vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()],
                difficulty: Difficulty::Easy,
                category: "Test".to_string(),
            })
            .collect()
    }

    fn started(count: usize) -> ClassicGame {
        let mut game = ClassicGame::new(Some(9), "General Knowledge", Difficulty::Easy);
        assert!(game.start());
        game.load_questions(questions(count));
        game
    }

    #[test]
    fn test_round_ends_after_all_questions() {
        let mut game = started(3);
        assert_eq!(game.phase, ClassicPhase::Quiz);

        game.select_option(1);
        assert!(!game.submit_answer());
        game.select_option(0);
        assert!(!game.submit_answer());
        game.select_option(1);
        assert!(game.submit_answer());

        assert_eq!(game.phase, ClassicPhase::Result);
        assert_eq!(game.calculate_score(), 2);
        assert_eq!(game.lives(), 2);
    }

    #[test]
    fn test_round_ends_when_lives_run_out() {
        let mut game = started(10);
        for _ in 0..STARTING_LIVES {
            game.select_option(3);
            game.submit_answer();
        }

        assert_eq!(game.phase, ClassicPhase::Result);
        assert_eq!(game.lives(), 0);
        assert_eq!(game.answered_count(), 3);
        assert_eq!(game.calculate_score(), 0);
    }

    #[test]
    fn test_selection_wraps_around() {
        let mut game = started(1);
        game.select_previous_option();
        assert_eq!(game.selected_option(), 3);
        game.select_next_option();
        assert_eq!(game.selected_option(), 0);
    }

    #[test]
    fn test_empty_round_fails_and_can_start_again() {
        let mut game = ClassicGame::new(None, "Quiz", Difficulty::Hard);
        game.start();
        game.load_questions(Vec::new());
        assert!(matches!(game.phase, ClassicPhase::Failed(_)));
        assert!(game.start());
        assert_eq!(game.phase, ClassicPhase::Loading);
    }

    #[test]
    fn test_restart_resets_round() {
        let mut game = started(2);
        game.submit_answer();
        game.submit_answer();
        game.scroll_results_down();
        game.scroll_results_down();
        assert_eq!(game.result_scroll(), 1);

        game.restart();
        assert_eq!(game.phase, ClassicPhase::Welcome);
        assert_eq!(game.lives(), STARTING_LIVES);
        assert_eq!(game.total_questions(), 0);
        assert_eq!(game.result_scroll(), 0);
    }
}
