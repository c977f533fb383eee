use std::collections::HashMap;

/// A scan centre whose neighbourhood scored above the candidate threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub x: f32,
    pub y: f32,
    pub score: f32,
}

/// A connected group of candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub members: Vec<Candidate>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Mean position of the members.
    pub fn centroid(&self) -> (f32, f32) {
        let n = self.members.len().max(1) as f32;
        let (sx, sy) = self
            .members
            .iter()
            .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
        (sx / n, sy / n)
    }

    pub fn mean_score(&self) -> f32 {
        let n = self.members.len().max(1) as f32;
        self.members.iter().map(|c| c.score).sum::<f32>() / n
    }
}

type Cell = (i64, i64);

fn cell_of(candidate: &Candidate, size: f32) -> Cell {
    (
        (candidate.x / size).floor() as i64,
        (candidate.y / size).floor() as i64,
    )
}

/// Greedy connected-component grouping: two candidates within `radius` share a
/// cluster, and membership is transitive through chains of such pairs.
///
/// Candidates are bucketed into a grid of `radius`-sized cells so each
/// expansion only inspects the 3x3 block of cells around a member. Clusters
/// come out in the order of their first (seed) candidate.
pub fn cluster_candidates(candidates: &[Candidate], radius: f32) -> Vec<Cluster> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let cell_size = radius.max(f32::EPSILON);
    let radius_sq = radius * radius;

    let mut grid: HashMap<Cell, Vec<usize>> = HashMap::new();
    for (i, candidate) in candidates.iter().enumerate() {
        grid.entry(cell_of(candidate, cell_size)).or_default().push(i);
    }

    let mut assigned = vec![false; candidates.len()];
    let mut clusters = Vec::new();

    for seed in 0..candidates.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;

        let mut members = vec![seed];
        let mut cursor = 0;
        while cursor < members.len() {
            let current = candidates[members[cursor]];
            let (cx, cy) = cell_of(&current, cell_size);

            for gx in (cx - 1)..=(cx + 1) {
                for gy in (cy - 1)..=(cy + 1) {
                    let Some(bucket) = grid.get(&(gx, gy)) else {
                        continue;
                    };
                    for &j in bucket {
                        if assigned[j] {
                            continue;
                        }
                        let other = &candidates[j];
                        let dx = other.x - current.x;
                        let dy = other.y - current.y;
                        if dx * dx + dy * dy <= radius_sq {
                            assigned[j] = true;
                            members.push(j);
                        }
                    }
                }
            }
            cursor += 1;
        }

        members.sort_unstable();
        clusters.push(Cluster {
            members: members.into_iter().map(|i| candidates[i]).collect(),
        });
    }

    clusters
}

/// Largest cluster; the earliest one wins a tie.
pub fn largest(clusters: &[Cluster]) -> Option<&Cluster> {
    clusters.iter().fold(None, |best: Option<&Cluster>, cluster| match best {
        Some(b) if b.len() >= cluster.len() => Some(b),
        _ => Some(cluster),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f32, y: f32) -> Candidate {
        Candidate { x, y, score: 1.0 }
    }

    #[test]
    fn chains_are_transitive() {
        // A-B and B-C within 30px, A-C are 50px apart.
        let candidates = [c(0.0, 0.0), c(100.0, 100.0), c(25.0, 0.0), c(50.0, 0.0)];
        let clusters = cluster_candidates(&candidates, 30.0);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![c(0.0, 0.0), c(25.0, 0.0), c(50.0, 0.0)]);
        assert_eq!(clusters[1].members, vec![c(100.0, 100.0)]);
    }

    #[test]
    fn boundary_distance_joins() {
        let clusters = cluster_candidates(&[c(0.0, 0.0), c(30.0, 0.0)], 30.0);
        assert_eq!(clusters.len(), 1);

        let clusters = cluster_candidates(&[c(0.0, 0.0), c(30.5, 0.0)], 30.0);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn chain_across_many_cells() {
        let candidates: Vec<Candidate> = (0..40).map(|i| c(i as f32 * 29.0, 3.0)).collect();
        let clusters = cluster_candidates(&candidates, 30.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 40);
    }

    #[test]
    fn negative_coordinates_bucket_correctly() {
        let clusters = cluster_candidates(&[c(-5.0, -5.0), c(5.0, 5.0)], 30.0);
        assert_eq!(clusters.len(), 1);
    }

    #[test]
    fn every_candidate_lands_in_exactly_one_cluster() {
        let candidates: Vec<Candidate> = (0..50)
            .map(|i| c((i * 37 % 400) as f32, (i * 53 % 300) as f32))
            .collect();
        let clusters = cluster_candidates(&candidates, 30.0);
        let total: usize = clusters.iter().map(Cluster::len).sum();
        assert_eq!(total, candidates.len());
    }

    #[test]
    fn largest_prefers_earliest_on_tie() {
        let clusters = cluster_candidates(&[c(0.0, 0.0), c(200.0, 0.0)], 30.0);
        let best = largest(&clusters).unwrap();
        assert_eq!(best.members[0], c(0.0, 0.0));
        assert!(largest(&[]).is_none());
    }

    #[test]
    fn centroid_and_mean_score() {
        let cluster = Cluster {
            members: vec![
                Candidate { x: 0.0, y: 0.0, score: 0.8 },
                Candidate { x: 10.0, y: 20.0, score: 1.0 },
            ],
        };
        assert_eq!(cluster.centroid(), (5.0, 10.0));
        assert!((cluster.mean_score() - 0.9).abs() < 1e-6);
    }
}
