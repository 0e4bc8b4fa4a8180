//! End-to-end session scenarios through the public API.

use std::time::Duration;

use blastline_model::{
    BlastConnection, DrillPoint, MarkerKind, PatternData, WarningKind, WorkflowStep,
};
use blastline_sim::{
    ConnectionVisualState, Error, PlaybackPhase, SequenceStore, SessionConfig, SessionContext,
};
use blastline_sequence::ValidationOptions;
use chrono::{TimeZone, Utc};

fn row(n: usize) -> PatternData {
    PatternData::new(
        (1..=n)
            .map(|i| DrillPoint::new(format!("DH{}", i), i as f64 * 3.0, 0.0))
            .collect(),
    )
}

fn session() -> SequenceStore {
    SequenceStore::new(SessionContext::new("PRJ-7", "SITE-2"), SessionConfig::default())
}

#[test]
fn timeline_for_two_delay_groups() {
    let mut store = session();
    store.set_pattern_data(row(4));
    store.set_connections(vec![
        BlastConnection::new("C1", "DH1", "DH2", 100),
        BlastConnection::new("C2", "DH2", "DH3", 100),
        BlastConnection::new("C3", "DH3", "DH4", 300),
    ]);

    let markers = store.timeline_markers();
    let labels: Vec<_> = markers.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Blast Start",
            "Detonation 1 (2 holes)",
            "Detonation 2 (1 holes)",
            "Blast Complete"
        ]
    );
    assert_eq!(markers[3].time, 2300);
    assert_eq!(markers[3].kind, MarkerKind::SequenceEnd);
    assert_eq!(store.simulation_state().total_duration, 2300.0);
    assert_eq!(store.simulation_state().total_steps, 3);
}

#[test]
fn simultaneous_start_scenario() {
    let mut store = session();
    store.set_pattern_data(row(7));
    store.set_connections(
        (1..=6)
            .map(|i| {
                BlastConnection::new(format!("C{}", i), format!("DH{}", i), format!("DH{}", i + 1), 0)
            })
            .collect(),
    );

    let metrics = store.metrics();
    assert_eq!(metrics.total_blast_time, 1000);
    assert_eq!(metrics.average_delay_between_holes, 0);
    assert_eq!(metrics.max_simultaneous_detonations, 6);
    assert_eq!(metrics.efficiency_score, 90);
    assert_eq!(metrics.safety_score, 40);
    assert_eq!(metrics.connection_utilization, 100);

    let report = store.validation();
    assert_eq!(report.warnings_of(WarningKind::TimingOverlap).count(), 1);
    assert!(report.is_valid);
}

#[test]
fn orphan_is_reported_and_strict_mode_fails() {
    let conns = vec![BlastConnection::new("C1", "DH1", "DH2", 100)];

    let mut lenient = session();
    lenient.set_pattern_data(row(3));
    lenient.set_connections(conns.clone());
    let missing: Vec<_> = lenient
        .validation()
        .warnings_of(WarningKind::ConnectionMissing)
        .flat_map(|w| w.affected_holes.clone())
        .collect();
    assert_eq!(missing, vec!["DH3".to_string()]);

    let config = SessionConfig {
        validation: ValidationOptions { strict: true },
        ..Default::default()
    };
    let mut strict = SequenceStore::new(SessionContext::default(), config);
    strict.set_pattern_data(row(3));
    strict.set_connections(conns);
    assert!(!strict.validation().is_valid);
}

#[test]
fn play_pause_seek_stop() {
    let mut store = session();
    store.set_pattern_data(row(3));
    store.set_connections(vec![
        BlastConnection::new("C1", "DH1", "DH2", 200),
        BlastConnection::new("C2", "DH2", "DH3", 600),
    ]);

    store.play().unwrap();
    store.tick(Duration::from_millis(250));
    let frame = store.current_frame();
    assert_eq!(frame.connections["C1"], ConnectionVisualState::Propagating);
    assert_eq!(frame.connections["C2"], ConnectionVisualState::Inactive);

    assert!(store.pause());
    store.seek_to_time(650.0);
    assert_eq!(store.phase(), PlaybackPhase::Paused);
    assert_eq!(store.current_frame().connections["C2"], ConnectionVisualState::Propagating);

    // Seeking backwards shrinks the active set again.
    store.seek_to_time(100.0);
    assert_eq!(store.current_frame().active_connections().count(), 0);

    assert!(store.resume());
    store.tick(Duration::from_millis(100));
    assert_eq!(store.simulation_state().current_time, 200.0);

    assert!(store.stop());
    assert!(store.tick(Duration::from_millis(16)).is_none());
    assert_eq!(store.simulation_state().current_step, 0);
}

#[test]
fn workflow_tracks_session() {
    let mut store = session();
    let wf = store.workflow();
    assert!(!wf.is_completed(WorkflowStep::Pattern));
    assert!(!wf.is_enabled(WorkflowStep::Sequence));

    store.set_pattern_data(row(2));
    store.add_connection(BlastConnection::new("C1", "DH1", "DH2", 0));
    assert!(store.workflow().is_enabled(WorkflowStep::Simulate));
    assert!(!store.workflow().is_completed(WorkflowStep::Simulate));

    store.play().unwrap();
    store.tick(Duration::from_secs(5));
    assert!(store.workflow().is_completed(WorkflowStep::Simulate));
}

#[test]
fn export_preconditions_and_contents() {
    let mut store = session();
    assert!(matches!(store.export_blast_sequence_data(), Err(Error::NoPattern)));

    store.set_pattern_data(row(3));
    let at = Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap();
    let empty = store.export_at(at).unwrap();
    assert_eq!(empty.metadata.total_sequence_time, 0);
    assert!(empty.connections.is_empty());

    store.set_connections(vec![
        BlastConnection::new("C1", "DH1", "DH2", 42),
        BlastConnection::new("C2", "DH2", "DH3", 17),
    ]);
    let data = store.export_at(at).unwrap();
    assert_eq!(data.metadata.total_sequence_time, 42);
    assert_eq!(data.metadata.project_id, "PRJ-7");
    assert_eq!(data.metadata.site_id, "SITE-2");
    assert!(data.connections.iter().all(BlastConnection::has_endpoints));

    let json = data.to_json().unwrap();
    assert!(json.contains("\"exportedAt\": \"2025-01-15T08:00:00.000Z\""));
}

#[test]
fn play_twice_does_not_restart() {
    let mut store = session();
    store.set_pattern_data(row(2));
    store.set_connections(vec![BlastConnection::new("C1", "DH1", "DH2", 500)]);

    store.play().unwrap();
    store.tick(Duration::from_millis(300));
    store.play().unwrap();
    assert_eq!(store.simulation_state().current_time, 300.0);
}
