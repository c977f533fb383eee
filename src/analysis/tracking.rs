use std::time::Duration;

use serde::Serialize;

/// Troubleshooting hint shown after a sustained loss of tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Guidance {
    NoPlayer,
    NoRacket,
}

impl Guidance {
    pub fn message(&self) -> &'static str {
        match self {
            Guidance::NoPlayer => {
                "No player detected. Make sure your whole body is in frame and the scene is well lit."
            }
            Guidance::NoRacket => {
                "Racket not found. Keep the racket visible and avoid backgrounds close to its colour."
            }
        }
    }
}

/// Tracks how long pose and racket have been continuously missing.
#[derive(Debug, Clone)]
pub struct TrackingMonitor {
    guidance_after: Duration,
    pose_missing_since: Option<Duration>,
    racket_missing_since: Option<Duration>,
}

impl TrackingMonitor {
    pub fn new(guidance_after: Duration) -> Self {
        Self {
            guidance_after,
            pose_missing_since: None,
            racket_missing_since: None,
        }
    }

    /// `racket` is `None` on ticks where the detector did not run.
    pub fn observe(&mut self, now: Duration, pose_present: bool, racket: Option<bool>) {
        update(&mut self.pose_missing_since, now, pose_present);
        if let Some(found) = racket {
            update(&mut self.racket_missing_since, now, found);
        }
    }

    /// Forget any running absence, e.g. while playback is paused.
    pub fn clear(&mut self) {
        self.pose_missing_since = None;
        self.racket_missing_since = None;
    }

    pub fn guidance(&self, now: Duration) -> Option<Guidance> {
        let overdue = |since: Option<Duration>| {
            since.is_some_and(|s| now.saturating_sub(s) >= self.guidance_after)
        };
        if overdue(self.pose_missing_since) {
            Some(Guidance::NoPlayer)
        } else if overdue(self.racket_missing_since) {
            Some(Guidance::NoRacket)
        } else {
            None
        }
    }
}

fn update(since: &mut Option<Duration>, now: Duration, present: bool) {
    if present {
        *since = None;
    } else if since.is_none() {
        *since = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn guidance_only_after_sustained_absence() {
        let mut monitor = TrackingMonitor::new(ms(3_000));
        monitor.observe(ms(0), true, Some(false));
        monitor.observe(ms(2_000), true, Some(false));
        assert_eq!(monitor.guidance(ms(2_999)), None);
        monitor.observe(ms(3_000), true, Some(false));
        assert_eq!(monitor.guidance(ms(3_000)), Some(Guidance::NoRacket));

        monitor.observe(ms(3_100), true, Some(true));
        assert_eq!(monitor.guidance(ms(3_100)), None);
    }

    #[test]
    fn missing_player_takes_precedence() {
        let mut monitor = TrackingMonitor::new(ms(1_000));
        monitor.observe(ms(0), false, Some(false));
        assert_eq!(monitor.guidance(ms(1_500)), Some(Guidance::NoPlayer));
    }

    #[test]
    fn skipped_racket_ticks_do_not_reset_absence() {
        let mut monitor = TrackingMonitor::new(ms(100));
        monitor.observe(ms(0), true, Some(false));
        monitor.observe(ms(50), true, None);
        monitor.observe(ms(120), true, None);
        assert_eq!(monitor.guidance(ms(120)), Some(Guidance::NoRacket));
    }

    #[test]
    fn clear_forgets_absence() {
        let mut monitor = TrackingMonitor::new(ms(100));
        monitor.observe(ms(0), false, Some(false));
        monitor.clear();
        assert_eq!(monitor.guidance(ms(500)), None);
    }
}
