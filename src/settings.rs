use anyhow::{bail, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    ops::RangeInclusive,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::metrics::DominantSide;
use crate::pose::PoseFallback;
use crate::racket::DEFAULT_ACCEPTANCE;
use crate::session::DEFAULT_ANALYSIS_TYPE;

pub const DATA_DIR_ENV: &str = "STROKELAB_DATA_DIR";
pub const DEBUG_ENV: &str = "STROKELAB_DEBUG";
const DEFAULT_DATA_DIR: &str = "strokelab-data";

pub const TICK_HZ_RANGE: RangeInclusive<u32> = 1..=240;
pub const RACKET_HZ_RANGE: RangeInclusive<u32> = 1..=120;
pub const EXTRACTION_INTERVAL_MS_RANGE: RangeInclusive<u64> = 10..=5_000;
/// Detections below 0.6 are never emitted.
pub const ACCEPTANCE_RANGE: RangeInclusive<f32> = 0.6..=0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub tick_hz: u32,
    pub racket_hz: u32,
    pub extraction_interval_ms: u64,
    pub racket_acceptance: f32,
    pub dominant_side: DominantSide,
    pub pose_fallback: PoseFallback,
    pub absence_guidance_after_ms: u64,
    pub analysis_type: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            racket_hz: 30,
            extraction_interval_ms: 100,
            racket_acceptance: DEFAULT_ACCEPTANCE,
            dominant_side: DominantSide::Right,
            pose_fallback: PoseFallback::Simulated,
            absence_guidance_after_ms: 3_000,
            analysis_type: DEFAULT_ANALYSIS_TYPE.into(),
        }
    }
}

impl AnalysisSettings {
    pub fn extraction_interval(&self) -> Duration {
        Duration::from_millis(self.extraction_interval_ms)
    }

    pub fn absence_guidance_after(&self) -> Duration {
        Duration::from_millis(self.absence_guidance_after_ms)
    }

    /// Rejects rates and thresholds the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        check_range("tick_hz", self.tick_hz, &TICK_HZ_RANGE)?;
        check_range("racket_hz", self.racket_hz, &RACKET_HZ_RANGE)?;
        check_range(
            "extraction_interval_ms",
            self.extraction_interval_ms,
            &EXTRACTION_INTERVAL_MS_RANGE,
        )?;
        check_range("racket_acceptance", self.racket_acceptance, &ACCEPTANCE_RANGE)
    }

    /// Pulls every numeric field back into its valid range.
    pub fn clamped(mut self) -> Self {
        self.tick_hz = clamp_to(self.tick_hz, &TICK_HZ_RANGE);
        self.racket_hz = clamp_to(self.racket_hz, &RACKET_HZ_RANGE);
        self.extraction_interval_ms =
            clamp_to(self.extraction_interval_ms, &EXTRACTION_INTERVAL_MS_RANGE);
        self.racket_acceptance = if self.racket_acceptance.is_nan() {
            DEFAULT_ACCEPTANCE
        } else {
            clamp_to(self.racket_acceptance, &ACCEPTANCE_RANGE)
        };
        self
    }
}

fn check_range<T>(field: &str, value: T, range: &RangeInclusive<T>) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if !range.contains(&value) {
        bail!(
            "{field} must be within {}..={}, got {value}",
            range.start(),
            range.end()
        );
    }
    Ok(())
}

fn clamp_to<T: PartialOrd + Copy>(value: T, range: &RangeInclusive<T>) -> T {
    if value < *range.start() {
        *range.start()
    } else if value > *range.end() {
        *range.end()
    } else {
        value
    }
}

/// Settings persisted as pretty JSON next to the session database.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AnalysisSettings>,
}

impl SettingsStore {
    /// Loads settings from `path`. A missing file yields defaults; an
    /// unreadable one is logged and replaced by defaults. Out-of-range
    /// values are clamped.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            let loaded: AnalysisSettings = serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring corrupt settings at {}: {err}", path.display());
                AnalysisSettings::default()
            });
            if let Err(err) = loaded.validate() {
                warn!("Clamping settings from {}: {err}", path.display());
            }
            loaded.clamped()
        } else {
            AnalysisSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> AnalysisSettings {
        self.read().clone()
    }

    pub fn update(&self, settings: AnalysisSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.write();
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &AnalysisSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create settings directory {}", parent.display())
                })?;
            }
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, AnalysisSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AnalysisSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Root directory for the database and settings file.
pub fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
