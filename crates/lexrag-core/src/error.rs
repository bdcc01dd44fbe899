use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Remote inference service an upstream failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Embedding,
    Rerank,
    Generation,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::Embedding => "embedding",
            Service::Rerank => "rerank",
            Service::Generation => "generation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("corpus artifact not found: {}", .path.display())]
    MissingArtifact { path: PathBuf },

    #[error("corrupt corpus artifact {}: {reason}", .path.display())]
    CorruptArtifact { path: PathBuf, reason: String },

    #[error("{service} request failed ({}): {body}", status_label(.status))]
    Upstream {
        service: Service,
        status: Option<u16>,
        body: String,
    },

    #[error("malformed {service} response: {reason}")]
    MalformedResponse { service: Service, reason: String },

    #[error("embedding dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Whether retrying the same call could plausibly succeed.
    ///
    /// Rate limiting, server-side failures and transport errors (no status)
    /// are transient; everything else is final.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Upstream { status: None, .. } => true,
            Error::Upstream { status: Some(code), .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }

    /// True for failures that should stop the process before serving queries.
    pub fn is_fatal_startup(&self) -> bool {
        matches!(
            self,
            Error::MissingArtifact { .. } | Error::CorruptArtifact { .. } | Error::InvalidConfig(_)
        )
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no response".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(status: Option<u16>) -> Error {
        Error::Upstream { service: Service::Rerank, status, body: String::new() }
    }

    #[test]
    fn transient_classification() {
        assert!(upstream(None).is_transient());
        assert!(upstream(Some(429)).is_transient());
        assert!(upstream(Some(503)).is_transient());
        assert!(!upstream(Some(400)).is_transient());
        assert!(!upstream(Some(401)).is_transient());
        assert!(!Error::InvalidInput("empty".into()).is_transient());
    }

    #[test]
    fn upstream_message_carries_status_and_body() {
        let err = Error::Upstream {
            service: Service::Embedding,
            status: Some(502),
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "embedding request failed (502): bad gateway");
        let err = upstream(None);
        assert_eq!(err.to_string(), "rerank request failed (no response): ");
    }

    #[test]
    fn startup_errors_are_fatal() {
        assert!(Error::MissingArtifact { path: "x".into() }.is_fatal_startup());
        assert!(!upstream(Some(500)).is_fatal_startup());
    }
}
