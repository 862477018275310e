use std::future::Future;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use programma::command::{self, Command, CommandError, Reply};
use programma::config::Config;
use programma::notify::NotifyHub;
use programma::observability::{self, COMMANDS_TOTAL};
use programma::record::Snapshot;
use programma::registry::Registry;
use programma::session::Session;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the JSON replies; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    observability::init(config.metrics_port)?;

    let json = tokio::fs::read_to_string(&config.data_path).await?;
    let snapshot = Snapshot::from_json(&json)?;
    let registry = Arc::new(Registry::from_snapshot(snapshot, Arc::new(NotifyHub::new()))?);
    let mut session = Session::open(registry, config.username.clone()).await?;

    info!("programma ready");
    info!("  data: {}", config.data_path.display());
    info!("  user: {}", config.username);
    info!(
        "  metrics: {}",
        config
            .metrics_port
            .map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"))
    );

    let shutdown = shutdown_signal()?;
    tokio::pin!(shutdown);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("input closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let (label, quit, result) = match command::parse_command(&line) {
                    Ok(cmd) => {
                        let label = observability::command_label(&cmd);
                        let quit = cmd == Command::Quit;
                        (label, quit, command::execute(&mut session, cmd).await)
                    }
                    Err(e) => ("invalid", false, Err(e)),
                };
                if let Err(e) = &result {
                    tracing::debug!("{label} failed: {e}");
                }
                let status = if result.is_ok() { "ok" } else { "error" };
                metrics::counter!(COMMANDS_TOTAL, "command" => label, "status" => status).increment(1);
                print_reply(&result)?;
                if quit {
                    break;
                }
            }
            _ = &mut shutdown => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    info!("programma stopped");
    Ok(())
}

fn print_reply(result: &Result<Reply, CommandError>) -> Result<(), serde_json::Error> {
    let out = match result {
        Ok(reply) => serde_json::to_string(reply)?,
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    };
    println!("{out}");
    Ok(())
}

/// Resolves on ctrl-c, or SIGTERM on unix.
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    #[cfg(unix)]
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    Ok(async move {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
    })
}
