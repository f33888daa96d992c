//! GitHub issue-tracker collaborator for NestBot.
//!
//! The runtime only sees the [`IssueTracker`] seam; the concrete
//! [`GithubIssueClient`] performs the single create-issue REST call and
//! reports a missing credential without attempting the network.

pub mod issue_client;
pub mod tracker;

pub use issue_client::*;
pub use tracker::*;
