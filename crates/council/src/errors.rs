use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single call to a council member did not produce an answer
///
/// These are returned as values inside a `CallOutcome`, never propagated as panics, so every
/// variant is cheap to clone and serializes alongside a transcript.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallError {
    #[error("No API key configured for the chat completion endpoint")]
    MissingCredential,

    #[error("Rate limited after {attempts} attempts: {detail}")]
    RateLimited { attempts: u32, detail: String },

    #[error("Transport error after {attempts} attempts: {detail}")]
    Transport { attempts: u32, detail: String },

    #[error("Upstream returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    #[error("Invalid response shape: {detail}")]
    InvalidResponseShape { detail: String },

    #[error("Invalid request: {detail}")]
    InvalidRequest { detail: String },

    #[error("Task aborted: {detail}")]
    TaskAborted { detail: String },
}

impl CallError {
    pub fn invalid_response<S: Into<String>>(detail: S) -> Self {
        CallError::InvalidResponseShape {
            detail: detail.into(),
        }
    }

    pub fn invalid_request<S: Into<String>>(detail: S) -> Self {
        CallError::InvalidRequest {
            detail: detail.into(),
        }
    }

    /// Stable tag for the failure, matching the serialized `kind`
    pub fn kind(&self) -> &'static str {
        match self {
            CallError::MissingCredential => "missing_credential",
            CallError::RateLimited { .. } => "rate_limited",
            CallError::Transport { .. } => "transport",
            CallError::Upstream { .. } => "upstream",
            CallError::InvalidResponseShape { .. } => "invalid_response_shape",
            CallError::InvalidRequest { .. } => "invalid_request",
            CallError::TaskAborted { .. } => "task_aborted",
        }
    }
}

pub type CallResult<T> = Result<T, CallError>;
