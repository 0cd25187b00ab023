//! HTTP client for the answer service: one `POST {"query"}` → `{"answer"}` exchange per turn.

use futures_util::future::BoxFuture;
use reqwest::StatusCode;
use url::Url;

use crate::messages::{AnswerResponse, ErrorDetail, HealthResponse, QueryRequest};

/// Anything that turns a query into an answer. The session only talks to this seam.
pub trait AnswerService: Send + Sync {
    fn answer<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<String, ClientError>>;
}

/// Answer request failure. The kinds are kept apart for the developer log only;
/// the chat session treats all of them the same.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error(
        "service returned {status}{}",
        .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default()
    )]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ClientError {
    /// Short stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::InvalidUrl(_) => "invalid_url",
            ClientError::Network(_) => "network",
            ClientError::Status { .. } => "status",
            ClientError::Malformed(_) => "malformed",
        }
    }
}

/// reqwest-backed answer service. No timeout is configured: a request runs until
/// the service replies or the connection fails.
#[derive(Debug, Clone)]
pub struct HttpAnswerService {
    http: reqwest::Client,
    chat_url: Url,
    health_url: Url,
}

impl HttpAnswerService {
    /// `base_url` like `http://localhost:8000`, `chat_path` like `/chat`.
    pub fn new(base_url: &str, chat_path: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)?;
        Ok(Self {
            http: reqwest::Client::new(),
            chat_url: base.join(chat_path)?,
            health_url: base.join("/")?,
        })
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    /// Send one query and return the `answer` field verbatim.
    pub async fn ask(&self, query: &str) -> Result<String, ClientError> {
        tracing::debug!(url = %self.chat_url, query_len = query.len(), "sending query");
        let resp = self
            .http
            .post(self.chat_url.clone())
            .json(&QueryRequest::new(query))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorDetail>(&body)
                .ok()
                .map(ErrorDetail::into_text);
            return Err(ClientError::Status { status, detail });
        }

        let reply: AnswerResponse = serde_json::from_slice(&body)?;
        tracing::debug!(answer_len = reply.answer.len(), "answer received");
        Ok(reply.answer)
    }

    /// `GET /` on the service; returns its status message.
    pub async fn health(&self) -> Result<String, ClientError> {
        let resp = self.http.get(self.health_url.clone()).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                detail: None,
            });
        }
        let reply: HealthResponse = serde_json::from_slice(&body)?;
        Ok(reply.message)
    }
}

impl AnswerService for HttpAnswerService {
    fn answer<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<String, ClientError>> {
        Box::pin(self.ask(query))
    }
}
