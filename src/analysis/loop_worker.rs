use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::video::PlaybackState;

use super::pipeline::AnalysisPipeline;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Drives `pipeline` at `tick_interval` until cancelled or the frame source ends.
pub async fn analysis_loop(
    pipeline: Arc<Mutex<AnalysisPipeline>>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    stats_every_ticks: u64,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let stats_every_ticks = stats_every_ticks.max(1);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let mut guard = pipeline.lock().await;
                let outcome = guard.tick(clock.now());

                if (outcome.schedule.index + 1) % stats_every_ticks == 0 {
                    let stats = guard.stats().snapshot();
                    log_info!(
                        "tick {}: similarity {} | poses {}/{} | rackets {}/{} | faults {}",
                        outcome.schedule.index,
                        guard.session().similarity(),
                        stats.pose_count,
                        stats.tick_count,
                        stats.racket_count,
                        stats.racket_runs,
                        stats.fault_count,
                    );
                }

                if outcome.playback == PlaybackState::Ended {
                    log_info!("frame source ended after {} ticks", outcome.schedule.index + 1);
                    break;
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("analysis loop shutting down");
                break;
            }
        }
    }
}
