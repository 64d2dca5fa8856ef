//! CLI for the release notifier daemon.
//!
//! Parses the configuration surface, initializes logging, and runs the
//! watch loop until SIGINT or SIGTERM arrives.

use clap::Parser;
use release_notifier::{load_env_file, parse_interval, Config, GitlabConfig, Runner};
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

/// Release Notifier - Watch GitHub repositories and post new releases to Slack and GitLab.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN")]
    github_token: Option<String>,

    /// Repository to watch, as `owner/name`. Repeat for multiple repositories.
    #[arg(short = 'r', long = "repository")]
    repositories: Vec<String>,

    /// Time between poll rounds, e.g. `1h`, `15m`, `90s`.
    #[arg(long, env = "INTERVAL", default_value = "1h", value_parser = parse_interval)]
    interval: Duration,

    /// Slack incoming webhook URL; enables the chat sink.
    #[arg(long, env = "SLACK_HOOK")]
    slack_hook: Option<Url>,

    /// GitLab API token; required for the issue sink.
    #[arg(long, env = "GITLAB_API_TOKEN")]
    gitlab_api_token: Option<String>,

    /// GitLab hostname, optionally with a relative install path.
    #[arg(long, env = "GITLAB_HOSTNAME")]
    gitlab_hostname: Option<String>,

    /// Id of the GitLab project that receives release issues.
    #[arg(long, env = "GITLAB_PROJECT_ID")]
    gitlab_project_id: Option<u64>,

    /// Comma-separated labels attached to created issues.
    #[arg(long, env = "GITLAB_LABELS")]
    gitlab_labels: Option<String>,

    /// Drop releases whose version looks like a pre-release.
    #[arg(long, env = "IGNORE_NONSTABLE")]
    ignore_nonstable: bool,

    /// Log severity: one of debug, info, warn, error.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Seed the process environment before clap reads it.
    let env_entries = load_env_file(".env").unwrap_or(0);

    let args = Args::parse();
    // An unknown severity falls back to info rather than refusing to start.
    let level = args.log_level.parse().unwrap_or(Level::INFO);
    init_tracing(level);
    if env_entries > 0 {
        debug!(entries = env_entries, "loaded environment from .env");
    }

    let Some(github_token) = args.github_token.filter(|t| !t.trim().is_empty()) else {
        error!("GITHUB_TOKEN is required");
        return ExitCode::from(1);
    };
    if args.repositories.is_empty() {
        error!("no repositories to watch, pass at least one -r owner/name");
        return ExitCode::from(1);
    }

    let mut config = Config::new(github_token, args.repositories, args.interval)
        .with_ignore_nonstable(args.ignore_nonstable);
    if let Some(hook) = args.slack_hook {
        config = config.with_slack_hook(hook);
    }
    if let Some(gitlab) = GitlabConfig::from_parts(
        args.gitlab_hostname,
        args.gitlab_api_token,
        args.gitlab_project_id,
        args.gitlab_labels,
    ) {
        config = config.with_gitlab(gitlab);
    }

    let runner = match Runner::new(config) {
        Ok(runner) => runner,
        Err(error) => {
            error!(%error, "startup failed");
            return ExitCode::from(1);
        }
    };

    let shutdown = CancellationToken::new();
    tokio::spawn(listen_for_shutdown(shutdown.clone()));

    runner.run(shutdown).await;
    ExitCode::SUCCESS
}

/// Initializes the global tracing subscriber.
///
/// Emits structured JSON records on stdout, each with a UTC timestamp, the
/// caller's file and line, and the message. `RUST_LOG` overrides the
/// `--log-level` flag when finer per-target filtering is needed.
fn init_tracing(level: Level) {
    tracing_subscriber::registry()
        .with(fmt::layer().json().with_file(true).with_line_number(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level.to_string())),
        )
        .init();
}

/// Cancels the token once SIGINT or SIGTERM arrives.
async fn listen_for_shutdown(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                warn!(%error, "could not install the SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
    shutdown.cancel();
}
