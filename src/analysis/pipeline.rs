use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::clock::{FrameClock, TickSchedule};
use crate::coaching::{insights_for, recommend_drills, Drill, Insight};
use crate::metrics::{MetricExtractor, MetricVector};
use crate::pose::{FrameContext, PlayerRegion, PoseSource, PoseSourceKind};
use crate::racket::{accept_detection, DetectorConfig, RacketBox, RacketDetector, TrackingQuality};
use crate::scoring::TargetProfile;
use crate::session::SessionState;
use crate::settings::AnalysisSettings;
use crate::video::{FrameSource, PlaybackState, VideoFrame};

use super::{
    stats::{StatsSnapshot, TickRecord, TickStats},
    tracking::{Guidance, TrackingMonitor},
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Result of one pass through the stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOutcome {
    pub schedule: TickSchedule,
    pub playback: PlaybackState,
    pub pose: bool,
    /// Accepted racket box from the latest detector run.
    pub racket: Option<RacketBox>,
    pub extracted: Option<MetricVector>,
    pub similarity: Option<u8>,
    pub guidance: Option<Guidance>,
}

/// Everything a UI needs to render the current analysis state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSnapshot {
    pub metrics: MetricVector,
    pub similarity: u8,
    pub history_len: usize,
    pub racket: Option<RacketBox>,
    pub tracking_quality: TrackingQuality,
    pub guidance: Option<Guidance>,
    pub insights: Vec<Insight>,
    pub drills: Vec<Drill>,
    pub pose_source: PoseSourceKind,
    pub pose_unavailable: bool,
    pub playback: PlaybackState,
    pub stats: StatsSnapshot,
}

/// One frame-driven analysis session: frame source through scorer.
///
/// Every stage runs synchronously inside [`tick`](Self::tick). Stage faults
/// are logged and counted; they never abort the tick.
pub struct AnalysisPipeline {
    frames: Box<dyn FrameSource>,
    pose_source: Box<dyn PoseSource>,
    clock: FrameClock,
    detector: RacketDetector,
    extractor: MetricExtractor,
    target: TargetProfile,
    acceptance: f32,
    session: SessionState,
    tracking: TrackingMonitor,
    stats: TickStats,
    racket: Option<RacketBox>,
    guidance: Option<Guidance>,
    playback: PlaybackState,
}

impl AnalysisPipeline {
    /// Fails when `settings` are out of range.
    pub fn new(
        settings: &AnalysisSettings,
        frames: Box<dyn FrameSource>,
        pose_source: Box<dyn PoseSource>,
    ) -> Result<Self> {
        settings.validate().context("invalid analysis settings")?;
        let playback = frames.playback_state();
        Ok(Self {
            frames,
            pose_source,
            clock: FrameClock::new(settings.tick_hz, settings.racket_hz)?,
            detector: RacketDetector::new(DetectorConfig::default()),
            extractor: MetricExtractor::with_interval(
                settings.dominant_side,
                settings.extraction_interval(),
            ),
            target: TargetProfile::default(),
            acceptance: settings.racket_acceptance,
            session: SessionState::new(),
            tracking: TrackingMonitor::new(settings.absence_guidance_after()),
            stats: TickStats::new(),
            racket: None,
            guidance: None,
            playback,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        self.clock.tick_interval()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    pub fn tick(&mut self, now: Duration) -> TickOutcome {
        let started = Instant::now();
        let schedule = self.clock.tick(now);
        let mut fault: Option<String> = None;

        self.playback = self.frames.playback_state();
        let frame = if self.playback.is_playing() {
            match self.frames.current_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    log_warn!("frame read failed on tick {}: {err:#}", schedule.index);
                    fault = Some(format!("frame: {err:#}"));
                    None
                }
            }
        } else {
            None
        };

        let ctx = FrameContext {
            playback: self.playback,
            frame: frame.as_ref(),
            now,
        };
        let live = ctx.is_live();
        let pose = if schedule.run_pose {
            self.pose_source.produce(&ctx)
        } else {
            None
        };

        let region = match (&pose, &frame) {
            (Some(pose), Some(frame)) => {
                Some(PlayerRegion::from_pose(pose, frame.width(), frame.height()))
            }
            _ => None,
        };

        let mut racket_ran = false;
        if let (true, Some(frame)) = (schedule.run_racket, &frame) {
            racket_ran = true;
            match self.detect_racket(frame, region.as_ref()) {
                Ok(found) => self.racket = found,
                Err(err) => {
                    log_warn!("racket detection failed on tick {}: {err:#}", schedule.index);
                    fault.get_or_insert_with(|| format!("racket: {err:#}"));
                    self.racket = None;
                }
            }
        }

        let mut extracted = None;
        let mut similarity = None;
        if let Some(pose) = &pose {
            if let Some(vector) = self.extractor.extract(pose, now) {
                similarity = Some(self.session.record(vector, &self.target));
                extracted = Some(vector);
            }
        }

        if live {
            self.tracking
                .observe(now, pose.is_some(), racket_ran.then(|| self.racket.is_some()));
        } else {
            self.tracking.clear();
        }
        let guidance = self.tracking.guidance(now);
        if guidance != self.guidance {
            if let Some(g) = guidance {
                log_debug!("tracking guidance: {}", g.message());
            }
            self.guidance = guidance;
        }

        self.stats.record(TickRecord {
            index: schedule.index,
            at_ms: now.as_millis() as u64,
            pose: pose.is_some(),
            racket_ran,
            racket_confidence: if racket_ran {
                self.racket.map(|b| b.confidence)
            } else {
                None
            },
            similarity,
            fault,
            elapsed_us: started.elapsed().as_micros() as u64,
        });

        TickOutcome {
            schedule,
            playback: self.playback,
            pose: pose.is_some(),
            racket: self.racket,
            extracted,
            similarity,
            guidance,
        }
    }

    fn detect_racket(
        &mut self,
        frame: &VideoFrame,
        region: Option<&PlayerRegion>,
    ) -> anyhow::Result<Option<RacketBox>> {
        let found = self
            .detector
            .detect(frame.pixels(), frame.width(), frame.height(), region)?;
        Ok(accept_detection(found, self.acceptance))
    }

    /// Clears the session state; frame source and stage throttles keep running.
    pub fn reset_session(&mut self) {
        self.session.reset();
        self.extractor.reset();
    }

    pub fn snapshot(&self) -> AnalysisSnapshot {
        let metrics = self.session.current();
        let has_metrics = !self.session.history().is_empty();
        AnalysisSnapshot {
            metrics,
            similarity: self.session.similarity(),
            history_len: self.session.history().len(),
            racket: self.racket,
            tracking_quality: TrackingQuality::from_detection(self.racket.as_ref()),
            guidance: self.guidance,
            insights: if has_metrics {
                insights_for(&metrics)
            } else {
                Vec::new()
            },
            drills: if has_metrics {
                recommend_drills(&metrics)
            } else {
                Vec::new()
            },
            pose_source: self.pose_source.kind(),
            pose_unavailable: self.pose_source.is_unavailable(),
            playback: self.playback,
            stats: self.stats.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{reference_pose, AbsentPoseSource, SimulatedPoseSource};
    use crate::video::SyntheticCourtSource;
    use anyhow::anyhow;

    fn settings() -> AnalysisSettings {
        AnalysisSettings::default()
    }

    fn still_reference() -> Box<dyn PoseSource> {
        Box::new(SimulatedPoseSource::new(reference_pose()).with_amplitude(0.0))
    }

    fn court() -> Box<dyn FrameSource> {
        Box::new(SyntheticCourtSource::new(320, 180).with_racket_at(Some((220, 60))))
    }

    fn at(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    struct BrokenFrames;

    impl FrameSource for BrokenFrames {
        fn playback_state(&self) -> PlaybackState {
            PlaybackState::Playing
        }

        fn current_frame(&mut self) -> anyhow::Result<Option<VideoFrame>> {
            Err(anyhow!("decoder lost sync"))
        }
    }

    #[test]
    fn reference_pose_scores_100_and_finds_racket() {
        let mut pipeline = AnalysisPipeline::new(&settings(), court(), still_reference()).unwrap();
        let out = pipeline.tick(at(0));
        assert!(out.pose);
        assert_eq!(out.similarity, Some(100));
        let racket = out.racket.expect("racket on first tick");
        assert!(racket.confidence >= 0.6);

        let snap = pipeline.snapshot();
        assert_eq!(snap.similarity, 100);
        assert_eq!(snap.history_len, 1);
        assert_ne!(snap.tracking_quality, TrackingQuality::None);
        assert_eq!(snap.drills.len(), 1);
        assert_eq!(snap.pose_source, PoseSourceKind::Simulated);
    }

    #[test]
    fn extraction_is_throttled_inside_the_tick_stream() {
        let mut pipeline = AnalysisPipeline::new(&settings(), court(), still_reference()).unwrap();
        let step = Duration::from_micros(16_667);
        let mut extracted = 0;
        for i in 0..60u32 {
            if pipeline.tick(step * i).extracted.is_some() {
                extracted += 1;
            }
        }
        // 60 ticks at 60 Hz span ~983 ms: extractions at 0, 100, ..., 900 ms.
        assert_eq!(extracted, 10);
        assert_eq!(pipeline.session().history().len(), 10);
        assert_eq!(pipeline.stats().snapshot().racket_runs, 30);
    }

    #[test]
    fn paused_video_produces_nothing() {
        let mut frames = SyntheticCourtSource::new(320, 180);
        frames.pause();
        let mut pipeline = AnalysisPipeline::new(&settings(), Box::new(frames), still_reference()).unwrap();
        let out = pipeline.tick(at(0));
        assert!(!out.pose);
        assert_eq!(out.playback, PlaybackState::Paused);
        assert!(pipeline.session().history().is_empty());
        assert_eq!(out.guidance, None);
    }

    #[test]
    fn frame_fault_is_contained() {
        let mut pipeline =
            AnalysisPipeline::new(&settings(), Box::new(BrokenFrames), still_reference()).unwrap();
        for i in 0..3 {
            let out = pipeline.tick(at(i * 100));
            assert!(!out.pose);
        }
        let stats = pipeline.stats().snapshot();
        assert_eq!(stats.tick_count, 3);
        assert_eq!(stats.fault_count, 3);
    }

    #[test]
    fn absent_pose_eventually_gives_guidance() {
        let mut pipeline =
            AnalysisPipeline::new(&settings(), court(), Box::new(AbsentPoseSource)).unwrap();
        assert_eq!(pipeline.tick(at(0)).guidance, None);
        let out = pipeline.tick(at(3_000));
        assert_eq!(out.guidance, Some(Guidance::NoPlayer));
        let snap = pipeline.snapshot();
        assert!(snap.pose_unavailable);
        assert!(snap.insights.is_empty());
    }

    #[test]
    fn reset_session_zeroes_state() {
        let mut pipeline = AnalysisPipeline::new(&settings(), court(), still_reference()).unwrap();
        pipeline.tick(at(0));
        pipeline.tick(at(100));
        pipeline.reset_session();
        let snap = pipeline.snapshot();
        assert_eq!(snap.metrics, MetricVector::ZERO);
        assert_eq!(snap.similarity, 0);
        assert_eq!(snap.history_len, 0);
        assert!(pipeline.tick(at(110)).extracted.is_some());
    }

    #[test]
    fn out_of_range_settings_are_refused() {
        let mut stalled = settings();
        stalled.tick_hz = 0;
        assert!(AnalysisPipeline::new(&stalled, court(), still_reference()).is_err());

        let mut permissive = settings();
        permissive.racket_acceptance = 0.1;
        assert!(AnalysisPipeline::new(&permissive, court(), still_reference()).is_err());
    }
}
