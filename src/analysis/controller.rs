use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::info;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::session::{SessionRecord, SessionRecorder};
use crate::settings::debug_enabled;

use super::{
    loop_worker::analysis_loop,
    pipeline::{AnalysisPipeline, AnalysisSnapshot, TickOutcome},
};

/// Ownership of exactly one running tick loop.
///
/// [`stop`](Self::stop) consumes the handle, so a loop can only be cancelled
/// through the handle that started it. Dropping a live handle cancels the loop.
pub struct TickLoopHandle {
    cancel_token: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

impl TickLoopHandle {
    pub fn spawn<F>(make_loop: impl FnOnce(CancellationToken) -> F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(make_loop(cancel_token.clone()));
        Self {
            cancel_token: Some(cancel_token),
            handle: Some(handle),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    pub async fn stop(mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        match self.handle.take() {
            Some(handle) => handle.await.context("analysis loop task failed to join"),
            None => Ok(()),
        }
    }
}

impl Drop for TickLoopHandle {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

/// Async front door to an [`AnalysisPipeline`]: start/stop the tick loop,
/// read snapshots, save and reset the session.
#[derive(Clone)]
pub struct AnalysisController {
    pipeline: Arc<Mutex<AnalysisPipeline>>,
    recorder: Arc<SessionRecorder>,
    clock: Arc<dyn Clock>,
    ticker: Arc<Mutex<Option<TickLoopHandle>>>,
    stats_every_ticks: u64,
}

impl AnalysisController {
    pub fn new(pipeline: AnalysisPipeline, recorder: SessionRecorder, clock: Arc<dyn Clock>) -> Self {
        Self {
            pipeline: Arc::new(Mutex::new(pipeline)),
            recorder: Arc::new(recorder),
            clock,
            ticker: Arc::new(Mutex::new(None)),
            stats_every_ticks: if debug_enabled() { 1 } else { 60 },
        }
    }

    pub async fn start(&self) -> Result<()> {
        let mut ticker = self.ticker.lock().await;
        if ticker.as_ref().is_some_and(|t| !t.is_finished()) {
            bail!("analysis already running");
        }
        if let Some(finished) = ticker.take() {
            finished.stop().await?;
        }

        let tick_interval = self.pipeline.lock().await.tick_interval();
        let pipeline = Arc::clone(&self.pipeline);
        let clock = Arc::clone(&self.clock);
        let stats_every_ticks = self.stats_every_ticks;

        *ticker = Some(TickLoopHandle::spawn(move |token| {
            analysis_loop(pipeline, clock, tick_interval, stats_every_ticks, token)
        }));
        info!("analysis started ({tick_interval:?} per tick)");
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        let handle = self.ticker.lock().await.take();
        match handle {
            Some(handle) => {
                handle.stop().await?;
                info!("analysis stopped");
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub async fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    /// Runs one tick on the caller's task, outside the loop.
    pub async fn tick_once(&self) -> TickOutcome {
        let mut pipeline = self.pipeline.lock().await;
        pipeline.tick(self.clock.now())
    }

    pub async fn snapshot(&self) -> AnalysisSnapshot {
        self.pipeline.lock().await.snapshot()
    }

    /// Persists the current session. Sink failures are returned, not swallowed.
    ///
    /// The pipeline lock covers only the capture, so ticks keep running while
    /// the sink writes.
    pub async fn save_session(&self) -> Result<SessionRecord> {
        let record = {
            let pipeline = self.pipeline.lock().await;
            self.recorder.capture(pipeline.session(), Utc::now())
        };
        self.recorder.persist(record).await
    }

    pub async fn reset(&self) {
        self.pipeline.lock().await.reset_session();
        info!("analysis session reset");
    }
}
