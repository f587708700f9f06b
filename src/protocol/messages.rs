//! Wire types for the Open Trivia Database.
//!
//! All responses are JSON objects carrying a numeric `response_code`.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::{Category, Difficulty};

/// Default provider location.
pub const DEFAULT_BASE_URL: &str = "https://opentdb.com";

/// Questions fetched per Infinity Mode batch.
pub const BATCH_SIZE: u8 = 10;

/// Provider cap on `amount`.
pub const MAX_AMOUNT: u8 = 50;

pub const CATEGORY_PATH: &str = "/api_category.php";
pub const TOKEN_PATH: &str = "/api_token.php";
pub const QUESTIONS_PATH: &str = "/api.php";

/// Provider response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    /// Not enough questions for the query.
    NoResults,
    InvalidParameter,
    TokenNotFound,
    /// Token has returned every question for the query; reset it.
    TokenEmpty,
    /// Too many requests; the provider allows one every 5 seconds per IP.
    RateLimit,
    Unknown(u8),
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> Self {
        match code {
            0 => ResponseCode::Success,
            1 => ResponseCode::NoResults,
            2 => ResponseCode::InvalidParameter,
            3 => ResponseCode::TokenNotFound,
            4 => ResponseCode::TokenEmpty,
            5 => ResponseCode::RateLimit,
            other => ResponseCode::Unknown(other),
        }
    }
}

impl ResponseCode {
    /// Maps every non-success code onto its error.
    pub fn into_result(self) -> Result<(), ApiError> {
        match self {
            ResponseCode::Success => Ok(()),
            ResponseCode::NoResults => Err(ApiError::NoResults),
            ResponseCode::InvalidParameter => Err(ApiError::InvalidParameter),
            ResponseCode::TokenNotFound => Err(ApiError::TokenNotFound),
            ResponseCode::TokenEmpty => Err(ApiError::TokenEmpty),
            ResponseCode::RateLimit => Err(ApiError::RateLimited),
            ResponseCode::Unknown(code) => Err(ApiError::UnknownCode(code)),
        }
    }
}

/// One question as returned by `api.php`, still HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub category: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub response_code: u8,
    #[serde(default)]
    pub results: Vec<RawQuestion>,
}

impl QuestionsResponse {
    pub fn code(&self) -> ResponseCode {
        ResponseCode::from(self.response_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub response_code: u8,
    #[serde(default)]
    pub response_message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl TokenResponse {
    pub fn code(&self) -> ResponseCode {
        ResponseCode::from(self.response_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub trivia_categories: Vec<Category>,
}

/// Parameters for a question batch. Only multiple-choice questions are requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionQuery {
    pub amount: u8,
    pub category: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub token: Option<String>,
}

impl QuestionQuery {
    pub fn new(amount: u8) -> Self {
        Self {
            amount: amount.clamp(1, MAX_AMOUNT),
            category: None,
            difficulty: None,
            token: None,
        }
    }

    pub fn category(mut self, category: Option<u32>) -> Self {
        self.category = category;
        self
    }

    pub fn difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Query-string pairs; absent filters are omitted.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("amount", self.amount.to_string())];
        if let Some(category) = self.category {
            params.push(("category", category.to_string()));
        }
        if let Some(difficulty) = self.difficulty {
            params.push(("difficulty", difficulty.as_str().to_string()));
        }
        params.push(("type", "multiple".to_string()));
        if let Some(token) = &self.token {
            params.push(("token", token.clone()));
        }
        params
    }
}
