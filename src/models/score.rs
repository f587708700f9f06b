//! Streak tracking for Infinity Mode.

use std::collections::VecDeque;

use super::question::{Difficulty, Question};

/// Number of answers kept in the history panel.
pub const HISTORY_LIMIT: usize = 5;
/// Streak at which questions switch to medium.
pub const MEDIUM_STREAK: u32 = 6;
/// Streak at which questions switch to hard.
pub const HARD_STREAK: u32 = 12;

/// One answered question as shown in the history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question: String,
    pub selected: String,
    pub correct: String,
    pub is_correct: bool,
}

/// What changed after recording an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub streak: u32,
    pub difficulty: Difficulty,
    pub difficulty_changed: bool,
}

/// Running score of one Infinity Mode session.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    streak: u32,
    difficulty: Difficulty,
    history: VecDeque<AnswerRecord>,
    best_streak: u32,
    peak_difficulty: Difficulty,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn peak_difficulty(&self) -> Difficulty {
        self.peak_difficulty
    }

    /// Most recent answer first.
    pub fn history(&self) -> impl Iterator<Item = &AnswerRecord> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Records `selected` as the answer to `question`.
    ///
    /// A correct answer extends the streak and escalates the tier at
    /// [`MEDIUM_STREAK`] and [`HARD_STREAK`]; a miss resets both.
    pub fn record(&mut self, question: &Question, selected: &str) -> AnswerOutcome {
        let is_correct = question.is_correct(selected);
        let previous = self.difficulty;

        self.history.push_front(AnswerRecord {
            question: question.text.clone(),
            selected: selected.to_string(),
            correct: question.correct.clone(),
            is_correct,
        });
        self.history.truncate(HISTORY_LIMIT);

        if is_correct {
            self.streak += 1;
            if self.streak >= HARD_STREAK {
                self.difficulty = Difficulty::Hard;
            } else if self.streak >= MEDIUM_STREAK {
                self.difficulty = Difficulty::Medium;
            }
            self.best_streak = self.best_streak.max(self.streak);
            self.peak_difficulty = self.peak_difficulty.max(self.difficulty);
        } else {
            self.streak = 0;
            self.difficulty = Difficulty::Easy;
        }

        AnswerOutcome {
            is_correct,
            streak: self.streak,
            difficulty: self.difficulty,
            difficulty_changed: previous != self.difficulty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(n: usize) -> Question {
        Question {
            text: format!("Question {}", n),
            correct: "right".to_string(),
            answers: vec!["right".to_string(), "wrong".to_string()],
            difficulty: Difficulty::Easy,
            category: "Test".to_string(),
        }
    }

    #[test]
    fn test_difficulty_escalates_at_thresholds() {
        let mut score = ScoreState::new();
        let mut changes = Vec::new();

        for n in 1..=13 {
            let outcome = score.record(&question(n), "right");
            assert_eq!(outcome.streak, n as u32);
            if outcome.difficulty_changed {
                changes.push((outcome.streak, outcome.difficulty));
            }
        }

        assert_eq!(
            changes,
            vec![(6, Difficulty::Medium), (12, Difficulty::Hard)]
        );
        assert_eq!(score.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn test_miss_resets_streak_and_difficulty() {
        let mut score = ScoreState::new();
        for n in 0..7 {
            score.record(&question(n), "right");
        }
        assert_eq!(score.difficulty(), Difficulty::Medium);

        let outcome = score.record(&question(8), "wrong");
        assert!(!outcome.is_correct);
        assert!(outcome.difficulty_changed);
        assert_eq!(score.streak(), 0);
        assert_eq!(score.difficulty(), Difficulty::Easy);
        assert_eq!(score.best_streak(), 7);
        assert_eq!(score.peak_difficulty(), Difficulty::Medium);
    }

    #[test]
    fn test_miss_on_easy_does_not_report_change() {
        let mut score = ScoreState::new();
        let outcome = score.record(&question(1), "wrong");
        assert!(!outcome.difficulty_changed);
    }

    #[test]
    fn test_history_is_bounded_and_newest_first() {
        let mut score = ScoreState::new();
        for n in 0..8 {
            let answer = if n % 2 == 0 { "right" } else { "wrong" };
            score.record(&question(n), answer);
        }

        assert_eq!(score.history_len(), HISTORY_LIMIT);
        let first = score.history().next().unwrap();
        assert_eq!(first.question, "Question 7");
        assert_eq!(first.selected, "wrong");
        assert_eq!(first.correct, "right");
        assert!(!first.is_correct);

        let last = score.history().last().unwrap();
        assert_eq!(last.question, "Question 3");
    }
}
