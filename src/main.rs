use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use run_and_yield::config::{AppConfig, LogFormat};
use run_and_yield::outputs::{failure_annotation, write_outputs};
use run_and_yield::platform::github::GitHubPlatform;
use run_and_yield::shutdown::wait_for_shutdown;
use run_and_yield::workflow::run_action;

/// Every input can also be supplied the way GitHub Actions passes action
/// inputs: as an `INPUT_<NAME>` environment variable.
#[derive(Parser)]
#[command(
    name = "run-and-yield",
    about = "Dispatch a GitHub Actions workflow and wait for the run to finish"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Repository owner
    #[arg(long, env = "INPUT_OWNER")]
    owner: Option<String>,

    /// Repository name
    #[arg(long, env = "INPUT_REPOSITORY")]
    repository: Option<String>,

    /// Branch or tag to run the workflow on
    #[arg(long, env = "INPUT_BRANCH")]
    branch: Option<String>,

    /// Workflow id or file name (e.g. build.yml)
    #[arg(long, env = "INPUT_WORKFLOW")]
    workflow: Option<String>,

    /// Token sent as the bearer credential
    #[arg(long, env = "INPUT_ACCESS-TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Minutes to wait for the run to complete
    #[arg(long, env = "INPUT_TIMEOUT")]
    timeout: Option<String>,

    /// Seconds between polls
    #[arg(long, env = "INPUT_POLL-INTERVAL")]
    poll_interval: Option<String>,

    /// Emit progress logs (true/false)
    #[arg(long, env = "INPUT_ENABLE-LOGGING")]
    enable_logging: Option<String>,

    /// Minutes to wait for the dispatched run to appear
    #[arg(long, env = "INPUT_CORRELATION-TIMEOUT")]
    correlation_timeout: Option<String>,

    /// Retry transport errors while polling instead of failing (true/false)
    #[arg(long, env = "INPUT_RETRY-TRANSPORT-ERRORS")]
    retry_transport_errors: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "INPUT_API-URL")]
    api_url: Option<String>,

    /// Log output format: text or json
    #[arg(long, env = "INPUT_LOG-FORMAT")]
    log_format: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("owner", self.owner.clone()),
            ("repository", self.repository.clone()),
            ("branch", self.branch.clone()),
            ("workflow", self.workflow.clone()),
            ("access_token", self.access_token.clone()),
            ("timeout", self.timeout.clone()),
            ("poll_interval", self.poll_interval.clone()),
            ("enable_logging", self.enable_logging.clone()),
            ("correlation_timeout", self.correlation_timeout.clone()),
            ("retry_transport_errors", self.retry_transport_errors.clone()),
            ("api_url", self.api_url.clone()),
            ("log_format", self.log_format.clone()),
        ]
    }
}

fn init_tracing(config: &AppConfig) {
    let default_level = if config.enable_logging { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref(), &cli.overrides())
        .context("Failed to load configuration")?;

    init_tracing(&config);
    tracing::debug!(config = ?config, "Loaded configuration");

    let platform = GitHubPlatform::new(&config.api_url, &config.access_token)?;

    let outcome = tokio::select! {
        outcome = run_action(&platform, &config) => outcome?,
        signal = wait_for_shutdown() => {
            anyhow::bail!("Received {signal} before the workflow run finished")
        }
    };

    if let Some(path) = std::env::var_os("GITHUB_OUTPUT") {
        write_outputs(Path::new(&path), &outcome).context("Failed to write step outputs")?;
    }

    outcome.ensure_success()?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", failure_annotation(&e));
            ExitCode::FAILURE
        }
    }
}
