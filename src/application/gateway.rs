//! Contract for the post REST backend.

use async_trait::async_trait;
use thiserror::Error;

use postdesk_api_types::ApiResponse;

use crate::domain::types::{DeleteAck, Post, PostDraft, PostId, PostPage};

/// Transport-level failure. Logical failures (`success: false` with a 2xx
/// status) are not errors here; they come back as the envelope.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("server responded with status {status}")]
    Status {
        status: u16,
        /// `error` field of the response envelope, when the body parsed.
        error: Option<String>,
        body: String,
    },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("failed to parse response body: {0}")]
    Decode(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl GatewayError {
    /// The most specific message available: the backend's own error when the
    /// failing response carried one, else this error's description.
    pub fn most_specific_message(&self) -> Option<String> {
        if let GatewayError::Status {
            error: Some(error), ..
        } = self
            && !error.trim().is_empty()
        {
            return Some(error.clone());
        }
        let rendered = self.to_string();
        (!rendered.trim().is_empty()).then_some(rendered)
    }
}

pub type GatewayResult<T> = Result<ApiResponse<T>, GatewayError>;

/// The five backend operations. Implementations shape requests only: no
/// validation, no retries, no error translation.
#[async_trait]
pub trait PostsGateway: Send + Sync {
    async fn list(&self, limit: u32, offset: u32) -> GatewayResult<PostPage>;

    async fn get_one(&self, id: &PostId) -> GatewayResult<Post>;

    async fn create(&self, draft: &PostDraft) -> GatewayResult<Post>;

    async fn update(&self, id: &PostId, draft: &PostDraft) -> GatewayResult<Post>;

    async fn delete(&self, id: &PostId) -> GatewayResult<DeleteAck>;
}
