//! Reactive session store.
//!
//! Owns every slice of a simulation session and republishes each one on its
//! own `watch` channel: consumers read the current value or await the next
//! change. All recomputation runs synchronously inside the mutating call, so
//! a caller observing the store after `set_connections` returns always sees
//! a consistent set of derived results.

use std::time::Duration;

use blastline_model::{
    BlastConnection, PatternData, SimulationMetrics, SimulationSettings, SimulationState,
    TimelineMarker, ValidationReport, WorkflowProgress, WorkflowStep,
};
use blastline_sequence::{
    calculate_metrics, normalize_connections, validate_with, ChainSchedule, Timeline,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{SessionConfig, SessionContext};
use crate::export::BlastSequenceData;
use crate::frame::{generate_frame, AnimationFrame};
use crate::playback::{PlaybackClock, PlaybackPhase};
use crate::{Error, Result};

/// What a data change does to the pattern slice.
enum PatternUpdate {
    Keep,
    Replace(Option<PatternData>),
}

/// Single source of truth of a blast simulation session.
pub struct SequenceStore {
    context: SessionContext,
    config: SessionConfig,
    clock: PlaybackClock,
    current_step: WorkflowStep,
    /// Playback reached the end since the last data change
    simulated: bool,

    pattern: watch::Sender<Option<PatternData>>,
    connections: watch::Sender<Vec<BlastConnection>>,
    state: watch::Sender<SimulationState>,
    settings: watch::Sender<SimulationSettings>,
    validation: watch::Sender<ValidationReport>,
    metrics: watch::Sender<SimulationMetrics>,
    markers: watch::Sender<Vec<TimelineMarker>>,
    workflow: watch::Sender<WorkflowProgress>,
    frame: watch::Sender<AnimationFrame>,
}

impl SequenceStore {
    /// Create an empty session.
    pub fn new(context: SessionContext, config: SessionConfig) -> Self {
        let mut clock = PlaybackClock::new();
        if !clock.set_speed(config.initial_speed) {
            warn!(speed = config.initial_speed, "ignoring invalid initial playback speed");
        }
        let current_step = WorkflowStep::default();

        Self {
            state: watch::channel(SimulationState::from(&clock)).0,
            workflow: watch::channel(WorkflowProgress::derive(false, false, false, current_step)).0,
            pattern: watch::channel(None).0,
            connections: watch::channel(Vec::new()).0,
            settings: watch::channel(SimulationSettings::default()).0,
            validation: watch::channel(ValidationReport::clean()).0,
            metrics: watch::channel(SimulationMetrics::empty()).0,
            markers: watch::channel(Vec::new()).0,
            frame: watch::channel(AnimationFrame::default()).0,
            context,
            config,
            clock,
            current_step,
            simulated: false,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // --- Pattern ---

    /// Replace the drill pattern. Existing connections are re-normalized
    /// against it.
    pub fn set_pattern_data(&mut self, pattern: PatternData) {
        self.halt_for_data_change();
        info!(holes = pattern.hole_count(), "pattern loaded");
        let connections = self.connections();
        self.store_data(PatternUpdate::Replace(Some(pattern)), connections);
    }

    pub fn pattern_data(&self) -> Option<PatternData> {
        self.pattern.borrow().clone()
    }

    pub fn has_pattern_data(&self) -> bool {
        self.pattern.borrow().is_some()
    }

    /// Drop the pattern together with every connection.
    pub fn clear_pattern_data(&mut self) {
        self.halt_for_data_change();
        self.store_data(PatternUpdate::Replace(None), Vec::new());
    }

    // --- Connections ---

    /// Replace all connections and recompute every derived slice.
    pub fn set_connections(&mut self, connections: Vec<BlastConnection>) {
        self.halt_for_data_change();
        self.store_data(PatternUpdate::Keep, connections);
    }

    pub fn connections(&self) -> Vec<BlastConnection> {
        self.connections.borrow().clone()
    }

    pub fn add_connection(&mut self, connection: BlastConnection) {
        let mut connections = self.connections();
        connections.push(connection);
        self.set_connections(connections);
    }

    /// Remove a connection by id. Returns whether it existed.
    pub fn remove_connection(&mut self, id: &str) -> bool {
        let mut connections = self.connections();
        let before = connections.len();
        connections.retain(|c| c.id != id);
        if connections.len() == before {
            return false;
        }
        self.set_connections(connections);
        true
    }

    /// Replace the connection with the same id. Returns whether it existed.
    pub fn update_connection(&mut self, connection: BlastConnection) -> bool {
        let mut connections = self.connections();
        let Some(slot) = connections.iter_mut().find(|c| c.id == connection.id) else {
            return false;
        };
        *slot = connection;
        self.set_connections(connections);
        true
    }

    pub fn clear_connections(&mut self) {
        self.set_connections(Vec::new());
    }

    // --- Derived slices ---

    pub fn simulation_state(&self) -> SimulationState {
        self.state.borrow().clone()
    }

    pub fn settings(&self) -> SimulationSettings {
        self.settings.borrow().clone()
    }

    /// Replace the display settings. Rejected when out of range.
    pub fn update_settings(&mut self, settings: SimulationSettings) -> Result<()> {
        settings.check()?;
        self.settings.send_replace(settings);
        self.publish_frame();
        Ok(())
    }

    pub fn validation(&self) -> ValidationReport {
        self.validation.borrow().clone()
    }

    pub fn metrics(&self) -> SimulationMetrics {
        *self.metrics.borrow()
    }

    pub fn timeline_markers(&self) -> Vec<TimelineMarker> {
        self.markers.borrow().clone()
    }

    pub fn workflow(&self) -> WorkflowProgress {
        self.workflow.borrow().clone()
    }

    pub fn set_current_workflow_step(&mut self, step: WorkflowStep) {
        self.current_step = step;
        self.publish_workflow();
    }

    pub fn current_frame(&self) -> AnimationFrame {
        self.frame.borrow().clone()
    }

    /// Cumulative reading of the current connection delays.
    pub fn chain_schedule(&self) -> ChainSchedule {
        ChainSchedule::build(&self.connections.borrow())
    }

    // --- Playback ---

    pub fn phase(&self) -> PlaybackPhase {
        self.clock.phase()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Start playback from the beginning.
    ///
    /// Needs a pattern with at least one hole and at least one connection.
    /// Calling it while already playing changes nothing.
    pub fn play(&mut self) -> Result<()> {
        if self.pattern.borrow().as_ref().map_or(true, PatternData::is_empty) {
            return Err(Error::NoPattern);
        }
        if self.connections.borrow().is_empty() {
            return Err(Error::NoConnections);
        }
        if self.clock.play() {
            info!(
                total_duration = self.clock.total_duration(),
                steps = self.clock.total_steps(),
                speed = self.clock.speed(),
                "playback started"
            );
            self.publish_state();
            self.publish_frame();
        }
        Ok(())
    }

    pub fn pause(&mut self) -> bool {
        let changed = self.clock.pause();
        if changed {
            info!(time = self.clock.current_time(), "playback paused");
            self.publish_state();
        }
        changed
    }

    pub fn resume(&mut self) -> bool {
        let changed = self.clock.resume();
        if changed {
            info!(time = self.clock.current_time(), "playback resumed");
            self.publish_state();
            self.publish_frame();
        }
        changed
    }

    /// Halt and rewind. Once this returns no tick produces a frame.
    pub fn stop(&mut self) -> bool {
        let changed = self.clock.stop();
        if changed {
            info!("playback stopped");
            self.publish_state();
            self.publish_frame();
        }
        changed
    }

    pub fn restart(&mut self) -> Result<()> {
        self.stop();
        self.play()
    }

    /// Jump to `time` ms, clamped to the timeline.
    pub fn seek_to_time(&mut self, time: f64) {
        let at = self.clock.seek(time);
        debug!(requested = time, at, "seek");
        self.publish_state();
        self.publish_frame();
    }

    /// Jump to the delay of the `step`-th connection in time order.
    pub fn seek_to_step(&mut self, step: usize) -> Result<()> {
        let total = self.clock.total_steps();
        self.clock
            .seek_to_step(step)
            .ok_or(Error::StepOutOfRange { step, total })?;
        self.publish_state();
        self.publish_frame();
        Ok(())
    }

    pub fn set_playback_speed(&mut self, speed: f64) -> Result<()> {
        if !self.clock.set_speed(speed) {
            return Err(Error::InvalidSpeed(speed));
        }
        self.publish_state();
        Ok(())
    }

    /// Advance playback by `elapsed` wall time.
    ///
    /// The only operation that moves time while playing. Returns the new
    /// frame, or `None` when not playing.
    pub fn tick(&mut self, elapsed: Duration) -> Option<AnimationFrame> {
        self.clock.advance(elapsed)?;

        if !self.clock.is_playing() && self.clock.reached_end() {
            info!(time = self.clock.current_time(), "playback complete");
            self.simulated = true;
            self.publish_workflow();
        }
        self.publish_state();
        Some(self.publish_frame())
    }

    // --- Export ---

    /// Export the session stamped with the current time.
    pub fn export_blast_sequence_data(&self) -> Result<BlastSequenceData> {
        self.export_at(Utc::now())
    }

    pub fn export_at(&self, exported_at: DateTime<Utc>) -> Result<BlastSequenceData> {
        let pattern = self.pattern.borrow();
        let pattern = pattern.as_ref().ok_or(Error::NoPattern)?;
        let data = BlastSequenceData::assemble(
            pattern,
            &self.connections.borrow(),
            &self.context,
            exported_at,
        );
        info!(
            project = %self.context.project_id,
            connections = data.connections.len(),
            "blast sequence exported"
        );
        Ok(data)
    }

    // --- Subscriptions ---

    pub fn subscribe_pattern(&self) -> watch::Receiver<Option<PatternData>> {
        self.pattern.subscribe()
    }

    pub fn subscribe_connections(&self) -> watch::Receiver<Vec<BlastConnection>> {
        self.connections.subscribe()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SimulationState> {
        self.state.subscribe()
    }

    pub fn subscribe_settings(&self) -> watch::Receiver<SimulationSettings> {
        self.settings.subscribe()
    }

    pub fn subscribe_validation(&self) -> watch::Receiver<ValidationReport> {
        self.validation.subscribe()
    }

    pub fn subscribe_metrics(&self) -> watch::Receiver<SimulationMetrics> {
        self.metrics.subscribe()
    }

    pub fn subscribe_markers(&self) -> watch::Receiver<Vec<TimelineMarker>> {
        self.markers.subscribe()
    }

    pub fn subscribe_workflow(&self) -> watch::Receiver<WorkflowProgress> {
        self.workflow.subscribe()
    }

    pub fn subscribe_frames(&self) -> watch::Receiver<AnimationFrame> {
        self.frame.subscribe()
    }

    // --- Pipeline ---

    /// Editing the data under a running session ends it.
    fn halt_for_data_change(&mut self) {
        if matches!(self.clock.phase(), PlaybackPhase::Playing | PlaybackPhase::Paused) {
            warn!("sequence data changed during playback, stopping");
            self.clock.stop();
        }
    }

    /// Replace the session data and republish every derived slice.
    ///
    /// normalize → validation → timeline → metrics → markers → workflow →
    /// frame, all published before the pattern and connections themselves:
    /// a subscriber woken by new input finds the derived slices matching it.
    fn store_data(&mut self, update: PatternUpdate, connections: Vec<BlastConnection>) {
        let replace_pattern = matches!(update, PatternUpdate::Replace(_));
        let pattern = match update {
            PatternUpdate::Keep => self.pattern.borrow().clone(),
            PatternUpdate::Replace(pattern) => pattern,
        };

        let connections = normalize_connections(pattern.as_ref(), connections);
        let report = validate_with(pattern.as_ref(), &connections, self.config.validation);
        let timeline = Timeline::build(&connections);
        let metrics = calculate_metrics(pattern.as_ref(), &connections);
        debug!(
            connections = connections.len(),
            valid = report.is_valid,
            warnings = report.warnings.len(),
            total_duration = timeline.total_duration,
            "sequence recomputed"
        );

        self.validation.send_replace(report);
        self.clock
            .load(timeline.total_duration, connections.iter().map(|c| c.delay));
        self.publish_state();
        self.metrics.send_replace(metrics);
        self.markers.send_replace(timeline.markers);

        self.simulated = false;
        self.workflow
            .send_replace(self.progress(pattern.is_some(), !connections.is_empty()));
        self.frame
            .send_replace(self.frame_at(pattern.as_ref(), &connections));

        if replace_pattern {
            self.pattern.send_replace(pattern);
        }
        self.connections.send_replace(connections);
    }

    fn publish_state(&self) {
        self.state.send_replace(SimulationState::from(&self.clock));
    }

    fn progress(&self, has_pattern: bool, has_connections: bool) -> WorkflowProgress {
        WorkflowProgress::derive(has_pattern, has_connections, self.simulated, self.current_step)
    }

    fn publish_workflow(&self) {
        let progress = self.progress(self.has_pattern_data(), !self.connections.borrow().is_empty());
        self.workflow.send_replace(progress);
    }

    fn frame_at(&self, pattern: Option<&PatternData>, connections: &[BlastConnection]) -> AnimationFrame {
        generate_frame(
            self.clock.current_time(),
            pattern,
            connections,
            &self.settings.borrow(),
        )
    }

    fn publish_frame(&self) -> AnimationFrame {
        let frame = self.frame_at(self.pattern.borrow().as_ref(), &self.connections.borrow());
        self.frame.send_replace(frame.clone());
        frame
    }
}
