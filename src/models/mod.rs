mod leaderboard;
mod question;
mod score;

pub use leaderboard::{
    GameMode, Leaderboard, LeaderboardEntry, LeaderboardFilter, Page, RankedEntry, Timeframe,
    PAGE_SIZE,
};
pub use question::{
    category_name, decode_entities, questions_from_raw, Category, Difficulty, Question,
    FALLBACK_CATEGORY_NAME,
};
pub use score::{AnswerOutcome, AnswerRecord, ScoreState, HARD_STREAK, HISTORY_LIMIT, MEDIUM_STREAK};
