//! Blastline Simulation Runner
//!
//! Load a scenario, report on it, play it back and print the export.
//!
//! ```text
//! blastline-sim <scenario.json> [speed]
//! ```

use std::env;
use std::sync::Arc;

use blastline_sim::{spawn_playback, Scenario, SequenceStore, SessionConfig, SessionContext};
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blastline_sim=info,blastline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("usage: blastline-sim <scenario.json> [speed]");
        std::process::exit(2);
    };

    let mut config = SessionConfig::from_env()?;
    if let Some(raw) = args.get(2) {
        config.initial_speed = raw.parse()?;
    }
    let period = config.tick_interval;

    let scenario = Scenario::load(path)?;
    tracing::info!(
        scenario = %path,
        holes = scenario.pattern.hole_count(),
        connections = scenario.connections.len(),
        "scenario loaded"
    );

    let mut store = SequenceStore::new(SessionContext::new("local", "local"), config);
    store.set_pattern_data(scenario.pattern);
    store.set_connections(scenario.connections);

    let report = store.validation();
    tracing::info!(
        valid = report.is_valid,
        warnings = report.warnings.len(),
        errors = report.errors.len(),
        "validation"
    );
    for warning in &report.warnings {
        tracing::warn!(kind = ?warning.kind, severity = ?warning.severity, "{}", warning.message);
    }
    for error in &report.errors {
        tracing::error!(kind = ?error.kind, "{}", error.message);
    }
    for suggestion in &report.suggestions {
        tracing::info!("{} ({})", suggestion.message, suggestion.potential_improvement);
    }

    let metrics = store.metrics();
    tracing::info!(
        total_blast_time = metrics.total_blast_time,
        average_delay = metrics.average_delay_between_holes,
        max_simultaneous = metrics.max_simultaneous_detonations,
        efficiency = metrics.efficiency_score,
        safety = metrics.safety_score,
        utilization = metrics.connection_utilization,
        "metrics"
    );
    for marker in store.timeline_markers() {
        tracing::info!(time = marker.time, "{}", marker.label);
    }

    store.play()?;
    let store = Arc::new(Mutex::new(store));
    let frames = spawn_playback(store.clone(), period).await?;

    let store = store.lock().await;
    let state = store.simulation_state();
    tracing::info!(
        frames,
        time = state.current_time,
        steps = state.current_step,
        "playback finished"
    );

    println!("{}", store.export_blast_sequence_data()?.to_json()?);
    Ok(())
}
