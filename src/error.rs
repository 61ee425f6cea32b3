use std::error::Error as StdError;

use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

/// Substring that marks a provider-side throttling response.
const RATE_LIMIT_MARKER: &str = "429";

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("HTTP 429 Too Many Requests while fetching {ticker}")]
    RateLimited { ticker: String },
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }

    /// Error text including every source in the chain.
    pub fn full_text(&self) -> String {
        // anyhow keeps its own chain; alternate formatting prints all of it.
        if let AppError::Other(inner) = self {
            return format!("{:#}", inner);
        }
        let mut text = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            text.push_str(": ");
            text.push_str(&cause.to_string());
            source = cause.source();
        }
        text
    }
}

/// How the retry loop treats a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateLimited,
    Other,
}

/// Classify an attempt failure by looking for "429" in its textual form.
///
/// The providers behind the analysis seam expose no structured throttling
/// signal, so the error text is the only thing to go on. `RateLimited` errors
/// raised by this crate carry the marker in their message.
pub fn classify(err: &AppError) -> FailureKind {
    if err.full_text().contains(RATE_LIMIT_MARKER) {
        FailureKind::RateLimited
    } else {
        FailureKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_variant_is_classified_as_rate_limited() {
        let err = AppError::RateLimited {
            ticker: "TCS.NS".to_string(),
        };
        assert_eq!(classify(&err), FailureKind::RateLimited);
        assert!(err.to_string().contains("TCS.NS"));
    }

    #[test]
    fn message_containing_status_code_is_rate_limited() {
        let err = AppError::message("upstream said 429, slow down");
        assert_eq!(classify(&err), FailureKind::RateLimited);
    }

    #[test]
    fn other_messages_are_not_rate_limited() {
        let err = AppError::message("History request failed with status 404 Not Found");
        assert_eq!(classify(&err), FailureKind::Other);
    }

    #[test]
    fn marker_hidden_behind_anyhow_context_is_found() {
        let inner = anyhow::anyhow!("status 429 Too Many Requests");
        let err = AppError::from(inner.context("History request failed for HDFCBANK.NS"));
        assert!(!err.to_string().contains("429"));
        assert_eq!(classify(&err), FailureKind::RateLimited);
    }

    #[test]
    fn io_source_chain_is_searched() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "proxy returned 429");
        let err = AppError::from(io);
        assert_eq!(classify(&err), FailureKind::RateLimited);
    }
}
