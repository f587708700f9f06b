use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::protocol::RawQuestion;

/// Name shown when a category id is not in the provider's list.
pub const FALLBACK_CATEGORY_NAME: &str = "Quiz";

/// Difficulty tier of a question, ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Next tier, wrapping from hard back to easy.
    pub fn cycle(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// A trivia category as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

/// Looks up a category name by id, falling back to a generic label.
pub fn category_name(categories: &[Category], id: Option<u32>) -> &str {
    id.and_then(|id| categories.iter().find(|cat| cat.id == id))
        .map(|cat| cat.name.as_str())
        .unwrap_or(FALLBACK_CATEGORY_NAME)
}

/// A question ready to be shown: entities decoded, options shuffled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub correct: String,
    pub answers: Vec<String>,
    pub difficulty: Difficulty,
    pub category: String,
}

impl Question {
    /// Builds a question from a provider result, shuffling the options with `rng`.
    ///
    /// An unrecognised difficulty label falls back to easy.
    pub fn from_raw<R: Rng + ?Sized>(raw: RawQuestion, rng: &mut R) -> Self {
        let correct = decode_entities(&raw.correct_answer);
        let mut answers: Vec<String> = raw
            .incorrect_answers
            .iter()
            .map(|answer| decode_entities(answer))
            .collect();
        answers.push(correct.clone());
        answers.shuffle(rng);

        Self {
            text: decode_entities(&raw.question),
            correct,
            answers,
            difficulty: raw.difficulty.parse().unwrap_or_default(),
            category: decode_entities(&raw.category),
        }
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct
    }

    /// Position of the correct answer among the shuffled options.
    pub fn correct_index(&self) -> Option<usize> {
        self.answers.iter().position(|answer| *answer == self.correct)
    }
}

/// Converts a provider batch into questions using the thread-local RNG.
pub fn questions_from_raw(raw: Vec<RawQuestion>) -> Vec<Question> {
    let mut rng = rand::rng();
    raw.into_iter()
        .map(|question| Question::from_raw(question, &mut rng))
        .collect()
}

/// The provider HTML-escapes question text (`&quot;`, `&#039;`, ...).
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
