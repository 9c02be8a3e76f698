use async_trait::async_trait;
use thiserror::Error;

use cybercj_types::{ChatReply, ChatRequest, ErrorBody, FeedbackRequest};

use crate::config::Endpoints;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatApiError {
    /// The server answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// The request never completed
    #[error("network error: {0}")]
    Network(String),
    /// A 2xx response whose body is not a tutor reply
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Remote tutor endpoints
///
/// Futures are not `Send`: in the browser everything runs on one thread.
#[async_trait(?Send)]
pub trait ChatApi {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, ChatApiError>;

    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<(), ChatApiError>;
}

/// `ChatApi` over HTTP; uses `fetch` when compiled to wasm
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpChatApi {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[async_trait(?Send)]
impl ChatApi for HttpChatApi {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, ChatApiError> {
        log::debug!("POST {} ({} chars)", self.endpoints.chat, request.message.len());

        let response = self
            .client
            .post(&self.endpoints.chat)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .json::<ErrorBody>()
                .await
                .unwrap_or_else(|_| ErrorBody::unknown());
            let message = body.message_or(status.canonical_reason().unwrap_or(""));
            return Err(ChatApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| ChatApiError::Decode(e.to_string()))
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<(), ChatApiError> {
        let response = self
            .client
            .post(&self.endpoints.feedback)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ChatApiError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("").to_string(),
            })
        }
    }
}
