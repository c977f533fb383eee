pub mod analysis;
pub mod clock;
pub mod coaching;
pub mod db;
pub mod metrics;
pub mod pose;
pub mod racket;
pub mod scoring;
pub mod session;
pub mod settings;
pub mod utils;
pub mod video;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use analysis::{AnalysisController, AnalysisPipeline};
use clock::MonotonicClock;
use db::Database;
use metrics::DominantSide;
use pose::{mirrored, reference_pose, select_pose_source, MissingModel, NeuralPoseSource};
use session::{SessionRecorder, SessionSink};
use settings::{data_dir, SettingsStore};
use video::{FrameSource, ImageSequenceSource, SyntheticCourtSource};

const SEQUENCE_FPS: u32 = 30;
const DEFAULT_RUN_SECONDS: u64 = 5;

/// Runs the analysis loop for a while, then saves and lists sessions.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "strokelab", about = "Real-time stroke biomechanics analysis")]
pub struct CliArgs {
    /// Directory of frames to analyse; a synthetic court is used when omitted
    #[arg(value_name = "FRAMES_DIR")]
    pub frames_dir: Option<PathBuf>,

    /// How long to run the loop, in seconds
    #[arg(long, default_value_t = DEFAULT_RUN_SECONDS)]
    pub seconds: u64,

    /// Read metrics from the left arm and leg
    #[arg(long = "left")]
    pub left_handed: bool,
}

pub async fn run(args: CliArgs) -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("StrokeLab starting up...");

    let data_dir = data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let settings_store = SettingsStore::new(data_dir.join("settings.json"))?;
    let mut settings = settings_store.get();
    if args.left_handed {
        settings.dominant_side = DominantSide::Left;
    }

    let frames: Box<dyn FrameSource> = match &args.frames_dir {
        Some(dir) => Box::new(ImageSequenceSource::from_dir(dir, SEQUENCE_FPS)?),
        None => Box::new(SyntheticCourtSource::new(640, 360).with_sweep(40)),
    };

    let base_pose = match settings.dominant_side {
        DominantSide::Right => reference_pose(),
        DominantSide::Left => mirrored(&reference_pose()),
    };
    let neural = NeuralPoseSource::initialize(MissingModel::load);
    let pose_source = select_pose_source(Some(neural), settings.pose_fallback, base_pose);

    let database = Database::new(data_dir.join("strokelab.sqlite3"))?;
    let sink: Arc<dyn SessionSink> = Arc::new(database);
    let recorder = SessionRecorder::new(settings.analysis_type.clone(), Arc::clone(&sink));

    let pipeline = AnalysisPipeline::new(&settings, frames, pose_source)?;
    let controller = AnalysisController::new(pipeline, recorder, Arc::new(MonotonicClock::new()));

    controller.start().await?;
    let deadline = tokio::time::Instant::now() + Duration::from_secs(args.seconds);
    while tokio::time::Instant::now() < deadline && controller.is_running().await {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    controller.stop().await?;

    let snapshot = controller.snapshot().await;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    let record = controller.save_session().await?;
    println!("saved session {} (similarity {})", record.id, record.final_similarity);

    for entry in sink.list_index().await? {
        println!(
            "{}  {}  similarity {}",
            entry.timestamp.to_rfc3339(),
            entry.key,
            entry.similarity
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("strokelab").chain(list.iter().copied()))
    }

    #[test]
    fn parses_defaults_and_flags() {
        let parsed = args(&[]).unwrap();
        assert_eq!(parsed.frames_dir, None);
        assert_eq!(parsed.seconds, DEFAULT_RUN_SECONDS);
        assert!(!parsed.left_handed);

        let parsed = args(&["clips/serve", "--seconds", "12", "--left"]).unwrap();
        assert_eq!(parsed.frames_dir, Some(PathBuf::from("clips/serve")));
        assert_eq!(parsed.seconds, 12);
        assert!(parsed.left_handed);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(args(&["--seconds"]).is_err());
        assert!(args(&["--seconds", "soon"]).is_err());
        assert!(args(&["--fast"]).is_err());
        assert!(args(&["a", "b"]).is_err());
    }
}
