use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};

use super::{FrameSource, PlaybackState, VideoFrame};

const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// File-backed frame source: a directory of still images played in name order.
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    cursor: usize,
    frame_interval: Duration,
    paused: bool,
}

impl ImageSequenceSource {
    pub fn from_dir(dir: &Path, fps: u32) -> Result<Self> {
        if fps == 0 {
            bail!("frame rate must be greater than zero");
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read frame directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_supported(path))
            .collect();
        paths.sort();

        if paths.is_empty() {
            bail!("no image frames found in {}", dir.display());
        }

        Ok(Self {
            paths,
            cursor: 0,
            frame_interval: Duration::from_secs_f64(1.0 / fps as f64),
            paused: false,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn play(&mut self) {
        self.paused = false;
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

impl FrameSource for ImageSequenceSource {
    fn playback_state(&self) -> PlaybackState {
        if self.cursor >= self.paths.len() {
            PlaybackState::Ended
        } else if self.paused {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        }
    }

    fn current_frame(&mut self) -> Result<Option<VideoFrame>> {
        if !self.playback_state().is_playing() {
            return Ok(None);
        }

        let index = self.cursor;
        self.cursor += 1;

        let path = &self.paths[index];
        let image = image::open(path)
            .with_context(|| format!("failed to decode frame {}", path.display()))?
            .to_rgba8();

        Ok(Some(VideoFrame::new(
            image,
            self.frame_interval * index as u32,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::synthetic::{blank_court, paint_racket};

    #[test]
    fn plays_frames_in_name_order_then_ends() {
        let dir = tempfile::tempdir().unwrap();
        let mut with_racket = blank_court(40, 30);
        paint_racket(&mut with_racket, 20, 10);
        with_racket.save(dir.path().join("frame_002.png")).unwrap();
        blank_court(40, 30).save(dir.path().join("frame_001.png")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut source = ImageSequenceSource::from_dir(dir.path(), 30).unwrap();
        assert_eq!(source.len(), 2);

        let first = source.current_frame().unwrap().unwrap();
        assert_eq!(first.timestamp, Duration::ZERO);
        assert_eq!(first.image, blank_court(40, 30));

        let second = source.current_frame().unwrap().unwrap();
        assert_eq!(second.image, with_racket);

        assert_eq!(source.playback_state(), PlaybackState::Ended);
        assert!(source.current_frame().unwrap().is_none());
    }

    #[test]
    fn empty_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageSequenceSource::from_dir(dir.path(), 30).is_err());
    }

    #[test]
    fn paused_sequence_does_not_advance() {
        let dir = tempfile::tempdir().unwrap();
        blank_court(8, 8).save(dir.path().join("a.png")).unwrap();
        let mut source = ImageSequenceSource::from_dir(dir.path(), 30).unwrap();
        source.pause();
        assert!(source.current_frame().unwrap().is_none());
        source.play();
        assert!(source.current_frame().unwrap().is_some());
    }
}
