use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::tracker::{IssueRef, IssueTracker, Report, TrackerError};

const ERROR_DETAIL_MAX_CHARS: usize = 400;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Validated `owner/repo` target for issue creation.
pub struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let (owner, name) = trimmed
            .split_once('/')
            .ok_or_else(|| anyhow!("invalid github repo '{raw}', expected owner/repo"))?;
        let owner = owner.trim();
        let name = name.trim();
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            bail!("invalid github repo '{raw}', expected owner/repo");
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn as_slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct GithubIssueCreateResponse {
    number: u64,
    html_url: String,
}

#[derive(Clone)]
/// GitHub REST client for the create-issue call. Constructed once at
/// startup; a missing token leaves the client in degraded mode rather than
/// failing construction.
pub struct GithubIssueClient {
    http: reqwest::Client,
    api_base: String,
    repo: RepoRef,
    token: Option<String>,
}

impl GithubIssueClient {
    pub fn new(
        api_base: &str,
        token: Option<String>,
        repo_slug: &str,
        request_timeout_ms: u64,
    ) -> Result<Self> {
        let repo = RepoRef::parse(repo_slug)?;
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("nestbot-issue-reporter"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create github api client")?;
        let token = token
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            repo,
            token,
        })
    }

    pub fn repo_slug(&self) -> String {
        self.repo.as_slug()
    }
}

#[async_trait]
impl IssueTracker for GithubIssueClient {
    fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    async fn create_issue(&self, report: &Report) -> Result<IssueRef, TrackerError> {
        let token = self
            .token
            .as_deref()
            .ok_or(TrackerError::MissingCredential)?;
        let payload = json!({
            "title": report.title,
            "body": report.body,
            "labels": report.labels,
        });
        let response = self
            .http
            .post(format!(
                "{}/repos/{}/{}/issues",
                self.api_base, self.repo.owner, self.repo.name
            ))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|error| TrackerError::Network {
                detail: error.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Status {
                status: status.as_u16(),
                detail: truncate_for_error(&body, ERROR_DETAIL_MAX_CHARS),
            });
        }
        let created: GithubIssueCreateResponse =
            response.json().await.map_err(|error| TrackerError::Decode {
                detail: error.to_string(),
            })?;
        Ok(IssueRef {
            number: created.number,
            url: created.html_url,
        })
    }
}

fn truncate_for_error(raw: &str, max_chars: usize) -> String {
    if raw.chars().count() <= max_chars {
        return raw.to_string();
    }
    let truncated: String = raw.chars().take(max_chars).collect();
    format!("{truncated}…")
}
