use clap::Parser;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_u32(value: &str) -> Result<u32, String> {
    let parsed = value
        .parse::<u32>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "nestbot",
    about = "Telegram feedback bot for NgonNest with GitHub issue escalation",
    version
)]
pub struct Cli {
    #[arg(
        long,
        env = "NESTBOT_TELEGRAM_BOT_TOKEN",
        help = "Telegram bot token. Required to start the poller."
    )]
    pub telegram_bot_token: Option<String>,

    #[arg(
        long,
        env = "NESTBOT_TELEGRAM_API_BASE",
        default_value = "https://api.telegram.org",
        help = "Base URL of the Telegram Bot API."
    )]
    pub telegram_api_base: String,

    #[arg(
        long,
        env = "NESTBOT_GITHUB_TOKEN",
        help = "GitHub token used to create issues. When absent the bot runs with issue submission disabled."
    )]
    pub github_token: Option<String>,

    #[arg(
        long,
        env = "NESTBOT_GITHUB_REPO",
        default_value = "ken-andre/ngonnest",
        help = "Target repository in owner/name format for feedback and bug issues."
    )]
    pub github_repo: String,

    #[arg(
        long,
        env = "NESTBOT_GITHUB_API_BASE",
        default_value = "https://api.github.com",
        help = "Base URL of the GitHub REST API."
    )]
    pub github_api_base: String,

    #[arg(
        long,
        env = "NESTBOT_POLL_TIMEOUT_SECONDS",
        default_value_t = 30,
        value_parser = parse_positive_u64,
        help = "Requested long-poll timeout in seconds; clamped to the range the platform accepts."
    )]
    pub poll_timeout_seconds: u64,

    #[arg(
        long,
        env = "NESTBOT_BACKOFF_CEILING_SECONDS",
        default_value_t = 64,
        value_parser = parse_positive_u64,
        help = "Maximum backoff sleep in seconds between failed fetch cycles."
    )]
    pub backoff_ceiling_seconds: u64,

    #[arg(
        long,
        env = "NESTBOT_MAX_CONSECUTIVE_FAILURES",
        default_value_t = 10,
        value_parser = parse_positive_u32,
        help = "Fetch failure streak after which the poller stops with an error."
    )]
    pub max_consecutive_failures: u32,

    #[arg(
        long,
        env = "NESTBOT_REQUEST_TIMEOUT_MS",
        default_value_t = 30_000,
        value_parser = parse_positive_u64,
        help = "Per-request HTTP timeout in milliseconds for both Telegram and GitHub calls."
    )]
    pub request_timeout_ms: u64,

    #[arg(
        long,
        default_value_t = false,
        help = "Run a single fetch/route cycle and exit."
    )]
    pub poll_once: bool,
}
