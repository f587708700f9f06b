//! HTTP client for the Open Trivia Database.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;
use crate::models::Category;
use crate::protocol::{
    CategoriesResponse, QuestionQuery, QuestionsResponse, TokenResponse, CATEGORY_PATH,
    QUESTIONS_PATH, TOKEN_PATH,
};

/// Operations the quiz needs from a trivia provider.
#[async_trait]
pub trait TriviaApi: Send + Sync {
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;

    /// Requests a fresh session token.
    async fn request_token(&self) -> Result<String, ApiError>;

    /// Makes an exhausted token serve every question again.
    async fn reset_token(&self, token: &str) -> Result<(), ApiError>;

    /// Fetches a batch. The response code is left for the caller to interpret.
    async fn questions(&self, query: &QuestionQuery) -> Result<QuestionsResponse, ApiError>;
}

#[derive(Clone)]
pub struct OpenTdbClient {
    client: Client,
    base_url: String,
}

impl OpenTdbClient {
    /// Builds a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` when the TLS backend cannot be initialised.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quizmaster/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).query(params).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited);
        }
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl TriviaApi for OpenTdbClient {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let body: CategoriesResponse = self.get_json(CATEGORY_PATH, &[]).await?;
        debug!(count = body.trivia_categories.len(), "Fetched categories");
        Ok(body.trivia_categories)
    }

    async fn request_token(&self) -> Result<String, ApiError> {
        let body: TokenResponse = self
            .get_json(TOKEN_PATH, &[("command", "request".to_string())])
            .await?;
        body.code().into_result()?;
        body.token.ok_or(ApiError::MissingToken)
    }

    async fn reset_token(&self, token: &str) -> Result<(), ApiError> {
        let body: TokenResponse = self
            .get_json(
                TOKEN_PATH,
                &[("command", "reset".to_string()), ("token", token.to_string())],
            )
            .await?;
        body.code().into_result()
    }

    async fn questions(&self, query: &QuestionQuery) -> Result<QuestionsResponse, ApiError> {
        self.get_json(QUESTIONS_PATH, &query.params()).await
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves a single canned HTTP response and returns a client pointed at it.
    async fn serve_once(status_line: &'static str, body: &'static str) -> OpenTdbClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        OpenTdbClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_too_many_requests_is_rate_limited() {
        let client = serve_once("429 Too Many Requests", "").await;
        let err = client.categories().await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status() {
        let client = serve_once("500 Internal Server Error", "").await;
        let err = client.questions(&QuestionQuery::new(10)).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::HttpStatus(status) if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn test_request_token_reads_token() {
        let client = serve_once(
            "200 OK",
            r#"{"response_code":0,"response_message":"Token Generated Successfully!","token":"abc123"}"#,
        )
        .await;
        assert_eq!(client.request_token().await.unwrap(), "abc123");
    }

    #[tokio::test]
    async fn test_request_token_without_token_fails() {
        let client = serve_once("200 OK", r#"{"response_code":0}"#).await;
        let err = client.request_token().await.unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
    }

    #[tokio::test]
    async fn test_request_token_surfaces_response_code() {
        let client = serve_once("200 OK", r#"{"response_code":5}"#).await;
        let err = client.request_token().await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited));
    }

    #[tokio::test]
    async fn test_reset_unknown_token_fails() {
        let client = serve_once("200 OK", r#"{"response_code":3}"#).await;
        let err = client.reset_token("stale").await.unwrap_err();
        assert!(matches!(err, ApiError::TokenNotFound));
    }

    #[test]
    fn test_base_url_is_normalised() {
        let client = OpenTdbClient::new("https://opentdb.com/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "https://opentdb.com");
        assert_eq!(
            client.url(QUESTIONS_PATH),
            "https://opentdb.com/api.php"
        );
    }
}
