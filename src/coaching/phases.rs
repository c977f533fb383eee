use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionPhase {
    Preparation,
    Loading,
    Acceleration,
    Contact,
    FollowThrough,
}

impl MotionPhase {
    pub const ALL: [MotionPhase; 5] = [
        MotionPhase::Preparation,
        MotionPhase::Loading,
        MotionPhase::Acceleration,
        MotionPhase::Contact,
        MotionPhase::FollowThrough,
    ];

    /// Lenient parse of a phase name; unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "preparation" => Some(Self::Preparation),
            "loading" => Some(Self::Loading),
            "acceleration" => Some(Self::Acceleration),
            "contact" => Some(Self::Contact),
            "follow-through" | "followthrough" => Some(Self::FollowThrough),
            _ => None,
        }
    }

    pub fn feedback(&self) -> &'static str {
        match self {
            MotionPhase::Preparation => {
                "Set your stance sideways to the net and keep the toss arm relaxed."
            }
            MotionPhase::Loading => "Bend the knees and coil the shoulders while the toss rises.",
            MotionPhase::Acceleration => {
                "Drive up from the legs and let the racket drop behind your back."
            }
            MotionPhase::Contact => "Hit at full extension, slightly in front of your body.",
            MotionPhase::FollowThrough => "Let the racket finish across your body and land balanced.",
        }
    }
}

pub const DEFAULT_PHASE_FEEDBACK: &str = "Keep your motion smooth and controlled.";

/// Feedback for a phase given by name, falling back to a generic message.
pub fn phase_feedback(name: &str) -> &'static str {
    MotionPhase::parse(name)
        .map(|p| p.feedback())
        .unwrap_or(DEFAULT_PHASE_FEEDBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_phases_have_specific_feedback() {
        for phase in MotionPhase::ALL {
            assert_ne!(phase.feedback(), DEFAULT_PHASE_FEEDBACK);
        }
        assert_eq!(phase_feedback("Follow Through"), MotionPhase::FollowThrough.feedback());
    }

    #[test]
    fn unknown_phase_gets_default() {
        assert_eq!(phase_feedback("recovery"), DEFAULT_PHASE_FEEDBACK);
    }
}
