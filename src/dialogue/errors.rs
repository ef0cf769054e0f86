//! Error types surfaced by dialogue generation.
use std::fmt;

/// Failure categories for a single generation attempt.
#[derive(Debug, Clone)]
pub enum DialogueError {
    /// The transport failed or the provider rejected the request.
    ProviderFailure { message: String },
    /// The provider asked the caller to back off.
    RateLimited { retry_after_seconds: f32 },
    /// The provider answered, but with nothing usable.
    EmptyCompletion,
}

impl DialogueError {
    pub fn provider_failure(message: impl Into<String>) -> Self {
        Self::ProviderFailure {
            message: message.into(),
        }
    }

    pub fn rate_limited(retry_after_seconds: f32) -> Self {
        Self::RateLimited {
            retry_after_seconds,
        }
    }
}

impl fmt::Display for DialogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderFailure { message } => write!(f, "provider failure: {}", message),
            Self::RateLimited {
                retry_after_seconds,
            } => write!(f, "rate limited, retry after {:.1}s", retry_after_seconds),
            Self::EmptyCompletion => write!(f, "provider returned an empty completion"),
        }
    }
}

impl std::error::Error for DialogueError {}
