use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::video::{PlaybackState, VideoFrame};

use super::{Landmark, LandmarkIndex, PoseSample};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// What the pose stage sees on a tick.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub playback: PlaybackState,
    pub frame: Option<&'a VideoFrame>,
    pub now: Duration,
}

impl FrameContext<'_> {
    /// Paused, ended or stream-less video produces no pose and must not
    /// advance any producer state.
    pub fn is_live(&self) -> bool {
        self.playback.is_playing() && self.frame.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PoseSourceKind {
    Neural,
    Simulated,
    Absent,
}

/// What to fall back to when the neural estimator cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PoseFallback {
    #[default]
    Simulated,
    Absent,
}

/// Produces one pose per tick, or `None` when the subject is absent.
pub trait PoseSource: Send {
    fn produce(&mut self, ctx: &FrameContext<'_>) -> Option<PoseSample>;

    /// True when the source can never produce a pose (failed initialisation).
    fn is_unavailable(&self) -> bool {
        false
    }

    fn kind(&self) -> PoseSourceKind;
}

/// Host-supplied landmark model. Opaque to the pipeline.
pub trait PoseEstimator: Send {
    /// Landmarks for `frame`, `Ok(None)` when no person is visible.
    /// `timestamp_ms` strictly increases between calls.
    fn estimate(&mut self, frame: &VideoFrame, timestamp_ms: u64) -> Result<Option<Vec<Landmark>>>;
}

/// Estimator slot for builds that ship without a landmark model; loading
/// always fails, which routes the pipeline to its fallback source.
pub struct MissingModel;

impl MissingModel {
    pub fn load() -> Result<Self> {
        anyhow::bail!("no pose model bundled with this build")
    }
}

impl PoseEstimator for MissingModel {
    fn estimate(&mut self, _frame: &VideoFrame, _timestamp_ms: u64) -> Result<Option<Vec<Landmark>>> {
        Ok(None)
    }
}

/// Delegates to a loaded [`PoseEstimator`]; per-tick failures become "no pose".
pub struct NeuralPoseSource<E> {
    estimator: Option<E>,
    last_timestamp_ms: Option<u64>,
    failures: u64,
}

impl<E: PoseEstimator> NeuralPoseSource<E> {
    pub fn initialize<F>(load: F) -> Self
    where
        F: FnOnce() -> Result<E>,
    {
        let estimator = match load() {
            Ok(estimator) => {
                info!("pose estimator loaded");
                Some(estimator)
            }
            Err(err) => {
                warn!("pose estimator unavailable: {err:#}");
                None
            }
        };

        Self {
            estimator,
            last_timestamp_ms: None,
            failures: 0,
        }
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    fn next_timestamp(&mut self, frame_ts: Duration) -> u64 {
        let candidate = frame_ts.as_millis() as u64;
        let ts = match self.last_timestamp_ms {
            Some(last) if candidate <= last => last + 1,
            _ => candidate,
        };
        self.last_timestamp_ms = Some(ts);
        ts
    }
}

impl<E: PoseEstimator> PoseSource for NeuralPoseSource<E> {
    fn produce(&mut self, ctx: &FrameContext<'_>) -> Option<PoseSample> {
        let frame = ctx.frame.filter(|_| ctx.playback.is_playing())?;
        if self.estimator.is_none() {
            return None;
        }

        let timestamp_ms = self.next_timestamp(frame.timestamp);
        let estimator = self.estimator.as_mut()?;

        let landmarks = match estimator.estimate(frame, timestamp_ms) {
            Ok(Some(landmarks)) => landmarks,
            Ok(None) => return None,
            Err(err) => {
                self.failures += 1;
                log_warn!("pose estimation failed at {timestamp_ms}ms: {err:#}");
                return None;
            }
        };

        match PoseSample::from_slice(&landmarks) {
            Ok(pose) => Some(pose),
            Err(err) => {
                self.failures += 1;
                log_warn!("discarding malformed pose at {timestamp_ms}ms: {err:#}");
                None
            }
        }
    }

    fn is_unavailable(&self) -> bool {
        self.estimator.is_none()
    }

    fn kind(&self) -> PoseSourceKind {
        PoseSourceKind::Neural
    }
}

/// Stand-in producer: a base pose with slow sinusoidal sway, plus optional
/// seeded jitter. Output depends only on the number of live ticks seen.
pub struct SimulatedPoseSource {
    base: PoseSample,
    phase: f32,
    step: f32,
    amplitude: f32,
    jitter: f32,
    rng: StdRng,
}

impl SimulatedPoseSource {
    pub fn new(base: PoseSample) -> Self {
        Self {
            base,
            phase: 0.0,
            step: 0.12,
            amplitude: 0.004,
            jitter: 0.0,
            rng: StdRng::seed_from_u64(0),
        }
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_jitter(mut self, jitter: f32, seed: u64) -> Self {
        self.jitter = jitter;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn synthesize(&mut self) -> PoseSample {
        let t = self.phase;
        let mut lm = [Landmark::default(); LandmarkIndex::COUNT];
        for (i, base) in self.base.landmarks().iter().enumerate() {
            let offset = i as f32 * 0.37;
            let mut x = base.x + self.amplitude * (t + offset).sin();
            let mut y = base.y + self.amplitude * (t * 0.8 + offset).cos();
            if self.jitter > 0.0 {
                x += self.rng.gen_range(-self.jitter..=self.jitter);
                y += self.rng.gen_range(-self.jitter..=self.jitter);
            }
            lm[i] = Landmark { x, y, z: base.z };
        }
        PoseSample::new(lm).unwrap_or_else(|_| self.base.clone())
    }
}

impl PoseSource for SimulatedPoseSource {
    fn produce(&mut self, ctx: &FrameContext<'_>) -> Option<PoseSample> {
        if !ctx.is_live() {
            return None;
        }
        let pose = self.synthesize();
        self.phase += self.step;
        Some(pose)
    }

    fn kind(&self) -> PoseSourceKind {
        PoseSourceKind::Simulated
    }
}

/// Permanently absent producer used when no estimator exists and simulation is off.
pub struct AbsentPoseSource;

impl PoseSource for AbsentPoseSource {
    fn produce(&mut self, _ctx: &FrameContext<'_>) -> Option<PoseSample> {
        None
    }

    fn is_unavailable(&self) -> bool {
        true
    }

    fn kind(&self) -> PoseSourceKind {
        PoseSourceKind::Absent
    }
}

/// Picks the neural source when it loaded, otherwise degrades per `fallback`.
pub fn select_pose_source<E>(
    neural: Option<NeuralPoseSource<E>>,
    fallback: PoseFallback,
    simulated_base: PoseSample,
) -> Box<dyn PoseSource>
where
    E: PoseEstimator + 'static,
{
    match neural {
        Some(source) if !source.is_unavailable() => Box::new(source),
        _ => match fallback {
            PoseFallback::Simulated => {
                info!("using simulated pose source");
                Box::new(SimulatedPoseSource::new(simulated_base))
            }
            PoseFallback::Absent => {
                warn!("no pose source available; analysis will report no pose");
                Box::new(AbsentPoseSource)
            }
        },
    }
}
