mod cli_args;

use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use tokio::sync::watch;

use cli_args::Cli;
use nestbot_github::{GithubIssueClient, IssueTracker};
use nestbot_runtime::{CommandRouter, DispatchConfig, DispatchLoop};
use nestbot_telegram::TelegramClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let token = match cli.telegram_bot_token.as_deref() {
        Some(token) if !token.trim().is_empty() => token.to_string(),
        _ => bail!(
            "telegram bot token is required; set --telegram-bot-token or NESTBOT_TELEGRAM_BOT_TOKEN"
        ),
    };

    let transport = TelegramClient::new(&cli.telegram_api_base, &token, cli.request_timeout_ms)?;
    let tracker = GithubIssueClient::new(
        &cli.github_api_base,
        cli.github_token.clone(),
        &cli.github_repo,
        cli.request_timeout_ms,
    )?;
    if tracker.is_configured() {
        println!("github integration enabled: repo={}", tracker.repo_slug());
    } else {
        println!(
            "github integration disabled: repo={} reason=missing_token",
            tracker.repo_slug()
        );
    }

    let repo_slug = tracker.repo_slug();
    let router = CommandRouter::new(Arc::new(tracker), repo_slug);
    let config = DispatchConfig {
        poll_timeout_seconds: cli.poll_timeout_seconds,
        backoff_ceiling_seconds: cli.backoff_ceiling_seconds,
        max_consecutive_failures: cli.max_consecutive_failures,
        poll_once: cli.poll_once,
    };
    let mut dispatch = DispatchLoop::new(transport, router, config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    println!(
        "nestbot starting: poll_timeout_seconds={} backoff_ceiling_seconds={} max_consecutive_failures={} poll_once={}",
        cli.poll_timeout_seconds,
        cli.backoff_ceiling_seconds,
        cli.max_consecutive_failures,
        cli.poll_once
    );
    dispatch.run(shutdown_rx).await
}
