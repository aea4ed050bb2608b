//! hostrun - dispatch a deployment script to one resolved host and await
//! completion.

use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod sink;

use hostrun_agent_client::AgentClient;
use hostrun_core::{TargetSelector, TaskBody};
use hostrun_dispatch::{
    CommandDispatcher, CompletionPoller, DeploymentOrchestrator, PollConfig, TargetResolver,
};

use config::Config;
use sink::{JsonFileSink, ReportSink};

const ENV_HELP: &str = "\
Environment variables:
  HOSTRUN_AGENT_URL           Base URL of the remote-execution agent (default: http://127.0.0.1:7070)
  HOSTRUN_TARGET_NAME         Required name tag of the target host
  HOSTRUN_TARGET_STATE        Required lifecycle state (default: running)
  HOSTRUN_SCRIPT              Path of the script file to dispatch
  HOSTRUN_REPORT_PATH         Report output path (default: deploy-output.json)
  HOSTRUN_POLL_INTERVAL_SECS  Delay between status queries (default: 10)
  HOSTRUN_MAX_WAIT_SECS       Polling deadline (default: 600)
  HOSTRUN_STATUS_RETRIES      Transient status query retries (default: 3)";

/// Dispatch a deployment script to one resolved host and await completion.
///
/// Takes no flags; all configuration comes from environment variables.
#[derive(Parser)]
#[command(name = "hostrun", version, about, after_help = ENV_HELP)]
struct Cli {}

#[tokio::main]
async fn main() -> ExitCode {
    Cli::parse();

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Configuration error");
            return ExitCode::FAILURE;
        }
    };

    info!(
        agent_url = %config.agent_url,
        target_name = %config.target_name,
        target_state = %config.target_state,
        script = %config.script_path.display(),
        report = %config.report_path.display(),
        interval_secs = config.poll_interval.as_secs(),
        max_wait_secs = config.max_wait.as_secs(),
        "Starting hostrun"
    );

    let script = match fs::read_to_string(&config.script_path) {
        Ok(script) => script,
        Err(e) => {
            error!(path = %config.script_path.display(), error = %e, "Failed to read script");
            return ExitCode::FAILURE;
        }
    };
    let body = match TaskBody::from_script(&script) {
        Ok(body) => body,
        Err(e) => {
            error!(path = %config.script_path.display(), error = %e, "Unusable script");
            return ExitCode::FAILURE;
        }
    };

    let client = Arc::new(AgentClient::new(&config.agent_url));
    let orchestrator = DeploymentOrchestrator::new(
        TargetResolver::new(client.clone()),
        CommandDispatcher::new(client.clone()),
        CompletionPoller::new(
            client,
            PollConfig {
                interval: config.poll_interval,
                max_wait: config.max_wait,
                status_retries: config.status_retries,
            },
        ),
    );

    let selector = TargetSelector::new()
        .name_tag(config.target_name.clone())
        .lifecycle_state(config.target_state.clone());

    // Ctrl-C cancels the await; the run still produces a report.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling run");
            signal_cancel.cancel();
        }
    });

    let report = orchestrator.run(&selector, &body, &cancel).await;

    let sink = JsonFileSink::new(&config.report_path);
    if let Err(e) = sink.write(&report) {
        error!(path = %config.report_path.display(), error = %e, "Failed to persist report");
    }

    let target = report
        .target_id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    info!(target_id = %target, outcome = %report.outcome, "Deployment finished");

    if report.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
