use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Structured payload submitted to the issue tracker. Derived per free-text
/// submission, never stored or retried.
pub struct Report {
    pub title: String,
    pub body: String,
    pub labels: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Reference to a created issue, formatted into the user confirmation.
pub struct IssueRef {
    pub number: u64,
    pub url: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("github token is not configured; issue submission is disabled")]
    MissingCredential,
    #[error("github create issue request failed: {detail}")]
    Network { detail: String },
    #[error("github create issue failed with status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("failed to decode github create issue response: {detail}")]
    Decode { detail: String },
}

/// Black-box issue tracker consumed by the command router. Submission is
/// synchronous, best-effort, single-attempt.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Whether a tracker credential is configured; consulted by `/status`
    /// and checked before any submission attempt.
    fn is_configured(&self) -> bool;

    async fn create_issue(&self, report: &Report) -> Result<IssueRef, TrackerError>;
}
