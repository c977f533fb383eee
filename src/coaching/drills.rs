use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::insights::{classify, InsightStatus};
use crate::metrics::{Metric, MetricVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Drill {
    pub title: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub duration_minutes: u32,
    pub priority: Priority,
}

fn drill_for(metric: Metric) -> Drill {
    match metric {
        Metric::Elbow => Drill {
            title: "Trophy Position Hold",
            description: "Pause in the trophy position for three seconds, then swing up to full extension.",
            difficulty: Difficulty::Beginner,
            duration_minutes: 10,
            priority: Priority::High,
        },
        Metric::Knee => Drill {
            title: "Knee Bend Loading",
            description: "Shadow serves focusing on a deep, balanced knee bend before driving up.",
            difficulty: Difficulty::Intermediate,
            duration_minutes: 10,
            priority: Priority::High,
        },
        Metric::XFactor => Drill {
            title: "Shoulder Coil Turns",
            description: "Rotate the shoulders past the hips with a racket across your back, hold, release.",
            difficulty: Difficulty::Intermediate,
            duration_minutes: 8,
            priority: Priority::Medium,
        },
        Metric::ContactHeight => Drill {
            title: "Toss and Reach",
            description: "Toss and catch at full reach to groove a consistent, high contact point.",
            difficulty: Difficulty::Beginner,
            duration_minutes: 5,
            priority: Priority::Medium,
        },
        Metric::FollowThrough => Drill {
            title: "Finish Line Swings",
            description: "Slow swings that finish with the racket across the opposite hip.",
            difficulty: Difficulty::Beginner,
            duration_minutes: 5,
            priority: Priority::Low,
        },
    }
}

fn consistency_drill() -> Drill {
    Drill {
        title: "Serve Consistency",
        description: "Hit 20 serves to one target, tracking how many land in.",
        difficulty: Difficulty::Intermediate,
        duration_minutes: 15,
        priority: Priority::Low,
    }
}

/// One drill per metric outside its good band, plus the consistency drill,
/// ordered by descending priority. Equal priorities keep metric order.
pub fn recommend_drills(vector: &MetricVector) -> Vec<Drill> {
    let mut drills: Vec<Drill> = Metric::ALL
        .iter()
        .filter(|&&m| classify(m, vector.get(m)).status != InsightStatus::Good)
        .map(|&m| drill_for(m))
        .collect();
    drills.push(consistency_drill());
    drills.sort_by_key(|d| Reverse(d.priority.rank()));
    drills
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::TargetProfile;

    #[test]
    fn bent_elbow_gets_trophy_drill_first() {
        let v = MetricVector {
            elbow: 120.0,
            knee: 145.0,
            x_factor: 45.0,
            contact_height: 220.0,
            follow_through: 15.0,
        };
        let drills = recommend_drills(&v);
        let titles: Vec<_> = drills.iter().map(|d| d.title).collect();
        assert_eq!(titles, vec!["Trophy Position Hold", "Serve Consistency"]);
        assert_eq!(drills[0].priority, Priority::High);
        assert_eq!(drills[1].priority, Priority::Low);
    }

    #[test]
    fn in_band_vector_gets_only_consistency() {
        let drills = recommend_drills(&TargetProfile::default().as_vector());
        assert_eq!(drills.len(), 1);
        assert_eq!(drills[0].title, "Serve Consistency");
    }

    #[test]
    fn ties_keep_insertion_order() {
        let v = MetricVector {
            elbow: 100.0,
            knee: 122.0,
            x_factor: 20.0,
            contact_height: 185.0,
            follow_through: 5.0,
        };
        let titles: Vec<_> = recommend_drills(&v).iter().map(|d| d.title).collect();
        assert_eq!(
            titles,
            vec![
                "Trophy Position Hold",
                "Knee Bend Loading",
                "Shoulder Coil Turns",
                "Toss and Reach",
                "Finish Line Swings",
                "Serve Consistency",
            ]
        );
    }
}
