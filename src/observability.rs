use std::net::SocketAddr;

use crate::command::Command;

// ── Driver ──────────────────────────────────────────────────────

/// Counter: commands handled. Labels: command, status.
pub const COMMANDS_TOTAL: &str = "programma_commands_total";

/// Histogram: time spent filtering and grouping one render, in seconds.
pub const RENDER_DURATION_SECONDS: &str = "programma_render_duration_seconds";

// ── Data side ───────────────────────────────────────────────────

/// Counter: subscribe/unsubscribe attempts. Labels: action, outcome.
pub const SUBSCRIPTIONS_TOTAL: &str = "programma_subscriptions_total";

/// Counter: snapshots thrown away because a newer one had already been applied.
pub const STALE_SNAPSHOTS_TOTAL: &str = "programma_stale_snapshots_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Map a Command variant to a short label for metrics.
pub fn command_label(cmd: &Command) -> &'static str {
    match cmd {
        Command::Show => "show",
        Command::Tracks => "tracks",
        Command::Calendar(_) => "calendar",
        Command::Schedule(_) => "schedule",
        Command::Eligible(_) => "eligible",
        Command::Track(_) => "track",
        Command::Subscribe(_) => "subscribe",
        Command::Unsubscribe(_) => "unsubscribe",
        Command::Status(_) => "status",
        Command::Refresh => "refresh",
        Command::Quit => "quit",
    }
}
