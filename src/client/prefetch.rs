//! Batch fetching with session tokens, a request gate and retry on rate limits.

use std::time::Duration;

use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, info, warn};

use crate::data::Progress;
use crate::error::ApiError;
use crate::models::Difficulty;
use crate::protocol::{BATCH_SIZE, QuestionQuery, RawQuestion};

use super::client::TriviaApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefetchConfig {
    pub batch_size: u8,
    /// Minimum spacing between two question requests.
    pub min_interval: Duration,
    /// Pause after the provider reports a rate limit.
    pub retry_delay: Duration,
    /// Retries and token recoveries allowed per fetch.
    pub max_retries: u32,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            batch_size: BATCH_SIZE,
            min_interval: Duration::from_secs(5),
            retry_delay: Duration::from_secs(5),
            max_retries: 3,
        }
    }
}

/// Owns the session token and the request gate for one provider.
pub struct Prefetcher<A> {
    api: A,
    progress: Progress,
    token: Option<String>,
    last_fetch: Option<Instant>,
    config: PrefetchConfig,
}

impl<A: TriviaApi> Prefetcher<A> {
    /// Starts from the token saved in `progress`, if any.
    pub fn new(api: A, progress: Progress, config: PrefetchConfig) -> Self {
        let token = progress.token();
        Self {
            api,
            progress,
            token,
            last_fetch: None,
            config,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Returns the current token, requesting and persisting one if needed.
    pub async fn ensure_token(&mut self) -> Result<String, ApiError> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        let token = self.api.request_token().await?;
        info!("Obtained new session token");
        if let Err(e) = self.progress.set_token(&token) {
            warn!(error = %e, "Failed to persist session token");
        }
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Drops the token locally and from storage.
    pub fn forget_token(&mut self) {
        self.token = None;
        if let Err(e) = self.progress.clear_token() {
            warn!(error = %e, "Failed to clear session token");
        }
    }

    async fn wait_for_slot(&self) {
        let Some(last) = self.last_fetch else {
            return;
        };
        let ready_at = last + self.config.min_interval;
        if Instant::now() < ready_at {
            debug!(
                wait_ms = (ready_at - Instant::now()).as_millis() as u64,
                "Waiting for request slot"
            );
            sleep_until(ready_at).await;
        }
    }

    /// Fetches one batch of `batch_size` questions.
    pub async fn fetch_batch(
        &mut self,
        category: Option<u32>,
        difficulty: Option<Difficulty>,
    ) -> Result<Vec<RawQuestion>, ApiError> {
        self.fetch(self.config.batch_size, category, difficulty).await
    }

    /// Fetches `amount` questions.
    ///
    /// Rate limits are retried after `retry_delay`; an exhausted token is
    /// reset and an unknown one replaced. Each of those counts as one retry.
    pub async fn fetch(
        &mut self,
        amount: u8,
        category: Option<u32>,
        difficulty: Option<Difficulty>,
    ) -> Result<Vec<RawQuestion>, ApiError> {
        let mut retries = 0;

        loop {
            let token = self.ensure_token().await?;
            self.wait_for_slot().await;

            let query = QuestionQuery::new(amount)
                .category(category)
                .difficulty(difficulty)
                .token(Some(token.clone()));
            let response = self.api.questions(&query).await;
            self.last_fetch = Some(Instant::now());

            let error = match response {
                Ok(body) => match body.code().into_result() {
                    Ok(()) if body.results.is_empty() => return Err(ApiError::NoResults),
                    Ok(()) => {
                        debug!(
                            count = body.results.len(),
                            category = ?category,
                            difficulty = ?difficulty,
                            "Fetched question batch"
                        );
                        return Ok(body.results);
                    }
                    Err(e) => e,
                },
                Err(e) => e,
            };

            let recoverable = matches!(
                error,
                ApiError::RateLimited | ApiError::TokenEmpty | ApiError::TokenNotFound
            );
            if !recoverable {
                return Err(error);
            }
            if retries >= self.config.max_retries {
                warn!(retries, error = %error, "Giving up on question batch");
                return Err(ApiError::RetriesExhausted(retries));
            }
            retries += 1;

            match error {
                ApiError::RateLimited => {
                    warn!(
                        delay_ms = self.config.retry_delay.as_millis() as u64,
                        "Rate limit hit, retrying"
                    );
                    sleep(self.config.retry_delay).await;
                }
                ApiError::TokenEmpty => {
                    warn!("Token exhausted, resetting");
                    match self.api.reset_token(&token).await {
                        Ok(()) => info!("Token reset successful"),
                        Err(ApiError::TokenNotFound) => self.forget_token(),
                        Err(e) => return Err(e),
                    }
                }
                _ => {
                    warn!("Token not recognised, requesting a new one");
                    self.forget_token();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::data::MemoryStore;
    use crate::models::Category;
    use crate::protocol::QuestionsResponse;

    #[derive(Default)]
    struct FakeApi {
        responses: Mutex<VecDeque<Result<QuestionsResponse, ApiError>>>,
        calls: Mutex<Vec<(QuestionQuery, Instant)>>,
        tokens_issued: Mutex<u32>,
        resets: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn scripted(responses: Vec<Result<QuestionsResponse, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(QuestionQuery, Instant)> {
            self.calls.lock().unwrap().clone()
        }

        fn tokens_issued(&self) -> u32 {
            *self.tokens_issued.lock().unwrap()
        }
    }

    #[async_trait]
    impl TriviaApi for FakeApi {
        async fn categories(&self) -> Result<Vec<Category>, ApiError> {
            Ok(Vec::new())
        }

        async fn request_token(&self) -> Result<String, ApiError> {
            let mut issued = self.tokens_issued.lock().unwrap();
            *issued += 1;
            Ok(format!("token-{}", *issued))
        }

        async fn reset_token(&self, token: &str) -> Result<(), ApiError> {
            self.resets.lock().unwrap().push(token.to_string());
            Ok(())
        }

        async fn questions(&self, query: &QuestionQuery) -> Result<QuestionsResponse, ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push((query.clone(), Instant::now()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ApiError::NoResults))
        }
    }

    fn raw(n: usize) -> RawQuestion {
        RawQuestion {
            kind: "multiple".to_string(),
            difficulty: "easy".to_string(),
            category: "General Knowledge".to_string(),
            question: format!("Question {}", n),
            correct_answer: "yes".to_string(),
            incorrect_answers: vec!["no".to_string(), "maybe".to_string(), "never".to_string()],
        }
    }

    fn ok(count: usize) -> Result<QuestionsResponse, ApiError> {
        Ok(QuestionsResponse {
            response_code: 0,
            results: (0..count).map(raw).collect(),
        })
    }

    fn code(response_code: u8) -> Result<QuestionsResponse, ApiError> {
        Ok(QuestionsResponse {
            response_code,
            results: Vec::new(),
        })
    }

    fn prefetcher(api: FakeApi) -> (Progress, Prefetcher<FakeApi>) {
        let progress = Progress::new(Arc::new(MemoryStore::new()));
        let prefetcher = Prefetcher::new(api, progress.clone(), PrefetchConfig::default());
        (progress, prefetcher)
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_and_persists_token() {
        let (progress, mut prefetcher) = prefetcher(FakeApi::scripted(vec![ok(10)]));

        let batch = prefetcher
            .fetch_batch(Some(9), Some(Difficulty::Easy))
            .await
            .unwrap();

        assert_eq!(batch.len(), 10);
        assert_eq!(progress.token().as_deref(), Some("token-1"));

        let calls = prefetcher.api().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.amount, 10);
        assert_eq!(calls[0].0.category, Some(9));
        assert_eq!(calls[0].0.token.as_deref(), Some("token-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reuses_saved_token() {
        let progress = Progress::new(Arc::new(MemoryStore::new()));
        progress.set_token("saved").unwrap();
        let mut prefetcher = Prefetcher::new(
            FakeApi::scripted(vec![ok(3)]),
            progress,
            PrefetchConfig::default(),
        );

        prefetcher.fetch_batch(None, None).await.unwrap();

        assert_eq!(prefetcher.api().tokens_issued(), 0);
        assert_eq!(prefetcher.api().calls()[0].0.token.as_deref(), Some("saved"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_are_spaced_by_min_interval() {
        let (_, mut prefetcher) = prefetcher(FakeApi::scripted(vec![ok(10), ok(10)]));

        prefetcher.fetch_batch(None, None).await.unwrap();
        prefetcher.fetch_batch(None, None).await.unwrap();

        let calls = prefetcher.api().calls();
        assert!(calls[1].1 - calls[0].1 >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_waits_and_retries() {
        let (_, mut prefetcher) = prefetcher(FakeApi::scripted(vec![
            code(5),
            Err(ApiError::RateLimited),
            ok(10),
        ]));

        let batch = prefetcher.fetch_batch(None, None).await.unwrap();

        assert_eq!(batch.len(), 10);
        let calls = prefetcher.api().calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[1].1 - calls[0].1 >= Duration::from_secs(5));
        assert!(calls[2].1 - calls[1].1 >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_token_is_reset() {
        let (progress, mut prefetcher) = prefetcher(FakeApi::scripted(vec![code(4), ok(10)]));

        prefetcher.fetch_batch(Some(9), None).await.unwrap();

        assert_eq!(*prefetcher.api().resets.lock().unwrap(), vec!["token-1"]);
        assert_eq!(prefetcher.api().tokens_issued(), 1);
        assert_eq!(progress.token().as_deref(), Some("token-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_token_is_replaced() {
        let (progress, mut prefetcher) = prefetcher(FakeApi::scripted(vec![code(3), ok(10)]));

        prefetcher.fetch_batch(None, None).await.unwrap();

        assert_eq!(prefetcher.api().tokens_issued(), 2);
        assert_eq!(progress.token().as_deref(), Some("token-2"));
        assert_eq!(
            prefetcher.api().calls()[1].0.token.as_deref(),
            Some("token-2")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_results_is_not_retried() {
        let (_, mut prefetcher) = prefetcher(FakeApi::scripted(vec![code(1), ok(10)]));

        let err = prefetcher.fetch_batch(Some(30), None).await.unwrap_err();

        assert!(matches!(err, ApiError::NoResults));
        assert_eq!(prefetcher.api().calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_parameter_is_not_retried() {
        let (progress, mut prefetcher) = prefetcher(FakeApi::scripted(vec![code(2), ok(10)]));

        let err = prefetcher.fetch_batch(Some(9), None).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidParameter));
        assert_eq!(prefetcher.api().calls().len(), 1);
        assert_eq!(progress.token().as_deref(), Some("token-1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_success_is_no_results() {
        let (_, mut prefetcher) = prefetcher(FakeApi::scripted(vec![code(0)]));
        let err = prefetcher.fetch_batch(None, None).await.unwrap_err();
        assert!(matches!(err, ApiError::NoResults));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_are_capped() {
        let (_, mut prefetcher) =
            prefetcher(FakeApi::scripted(vec![code(5), code(5), code(5), code(5), ok(1)]));

        let err = prefetcher.fetch_batch(None, None).await.unwrap_err();

        assert!(matches!(err, ApiError::RetriesExhausted(3)));
        assert_eq!(prefetcher.api().calls().len(), 4);
    }
}
