/// Tunable thresholds for the classical racket detector.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Candidate centres are sampled every `scan_stride` pixels on both axes.
    pub scan_stride: usize,

    /// Neighbourhood half extents around each candidate (31x51 window).
    pub window_half_width: i64,
    pub window_half_height: i64,
    pub window_stride: usize,

    /// Minimum neighbourhood score for a centre to become a candidate.
    pub candidate_threshold: f32,

    /// Candidates closer than this (pixels) join the same cluster.
    pub cluster_radius: f32,

    /// Synthesised box size in pixels, centred on the cluster centroid.
    pub box_width: f32,
    pub box_height: f32,

    /// A pose hint narrows the search only above this confidence.
    pub min_region_confidence: f32,

    /// Pixel class weights
    pub weight_frame: f32,
    pub weight_string: f32,
    pub weight_handle: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            scan_stride: 3,
            window_half_width: 15,
            window_half_height: 25,
            window_stride: 2,
            candidate_threshold: 0.7,
            cluster_radius: 30.0,
            box_width: 50.0,
            box_height: 70.0,
            min_region_confidence: 0.5,
            weight_frame: 1.5,
            weight_string: 1.2,
            weight_handle: 1.0,
        }
    }
}
