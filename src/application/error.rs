use thiserror::Error;

use crate::{
    config::LoadError,
    domain::posts::FieldErrors,
    infra::error::InfraError,
};

use super::gateway::GatewayError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("failed to render view: {0}")]
    Render(#[from] askama::Error),
    #[error("failed to write output: {0}")]
    Output(String),
    #[error("{0}")]
    ActionFailed(String),
    #[error("validation failed: {0}")]
    ValidationFailed(FieldErrors),
    #[error("post `{0}` not found")]
    NotFound(String),
}

impl AppError {
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output(message.into())
    }

    pub fn action_failed(message: impl Into<String>) -> Self {
        Self::ActionFailed(message.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn presentation_message(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Configuration could not be loaded",
            AppError::ValidationFailed(_) => "Post could not be saved",
            AppError::NotFound(_) => "Post not found",
            AppError::Gateway(_) | AppError::ActionFailed(_) => "Backend request failed",
            AppError::Infra(InfraError::Telemetry(_)) => "Logging subsystem could not start",
            AppError::Output(_) => "I/O failure",
            AppError::Render(_) => "Dashboard could not be rendered",
        }
    }
}
