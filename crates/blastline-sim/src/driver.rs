//! Host tick task.
//!
//! Drives a playing store in wall time. The task owns no playback state:
//! it measures the time since its previous tick and hands it to
//! [`SequenceStore::tick`], exiting as soon as the store stops playing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use crate::store::SequenceStore;

/// Tick `store` every `period` until playback pauses, stops or completes.
///
/// Returns the number of frames produced.
pub async fn drive(store: Arc<Mutex<SequenceStore>>, period: Duration) -> usize {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last = Instant::now();
    let mut frames = 0;

    loop {
        interval.tick().await;
        let now = Instant::now();
        let elapsed = now - last;
        last = now;

        let mut store = store.lock().await;
        if store.tick(elapsed).is_none() {
            break;
        }
        frames += 1;
        if !store.is_playing() {
            break;
        }
    }

    debug!(frames, "playback driver exited");
    frames
}

/// Run [`drive`] on its own task.
pub fn spawn_playback(store: Arc<Mutex<SequenceStore>>, period: Duration) -> JoinHandle<usize> {
    tokio::spawn(drive(store, period))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SessionConfig, SessionContext};
    use crate::playback::PlaybackPhase;
    use blastline_model::{BlastConnection, DrillPoint, PatternData};

    fn shared() -> Arc<Mutex<SequenceStore>> {
        let mut store = SequenceStore::new(SessionContext::new("P1", "S1"), SessionConfig::default());
        store.set_pattern_data(PatternData::new(vec![
            DrillPoint::new("H1", 0.0, 0.0),
            DrillPoint::new("H2", 3.0, 0.0),
        ]));
        store.set_connections(vec![BlastConnection::new("C1", "H1", "H2", 100)]);
        Arc::new(Mutex::new(store))
    }

    #[tokio::test(start_paused = true)]
    async fn plays_to_completion() {
        let store = shared();
        store.lock().await.play().unwrap();

        let frames = spawn_playback(store.clone(), Duration::from_millis(16))
            .await
            .unwrap();

        let store = store.lock().await;
        assert!(frames > 100);
        assert_eq!(store.phase(), PlaybackPhase::Paused);
        assert_eq!(store.simulation_state().current_time, 2100.0);
        assert_eq!(store.current_frame().time, 2100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_the_task() {
        let store = shared();
        store.lock().await.play().unwrap();

        let handle = spawn_playback(store.clone(), Duration::from_millis(16));
        time::sleep(Duration::from_millis(200)).await;
        assert!(store.lock().await.stop());

        handle.await.unwrap();
        let state = store.lock().await.simulation_state();
        assert_eq!(state.current_time, 0.0);
        assert!(!state.is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_store_produces_nothing() {
        let store = shared();
        let frames = drive(store.clone(), Duration::from_millis(16)).await;
        assert_eq!(frames, 0);
        assert_eq!(store.lock().await.phase(), PlaybackPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_shortens_wall_time() {
        let store = shared();
        {
            let mut s = store.lock().await;
            s.set_playback_speed(4.0).unwrap();
            s.play().unwrap();
        }

        let start = Instant::now();
        drive(store.clone(), Duration::from_millis(10)).await;
        let wall = start.elapsed();

        // 2100ms of simulated time at 4x
        assert!(wall >= Duration::from_millis(520));
        assert!(wall <= Duration::from_millis(540));
    }
}
