/// Muxing the downloaded streams into one container
use crate::error::{Result, ToolError};
use crate::ui::{merge_spinner, Palette, Tone};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{info, warn};

/// Combines a video stream and an audio stream into `output`
#[async_trait]
pub trait Muxer: Send + Sync {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<()>;
}

/// Muxer backed by the `ffmpeg` executable
#[derive(Debug, Clone)]
pub struct FfmpegMuxer {
    ffmpeg_path: PathBuf,
}

impl FfmpegMuxer {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

impl Default for FfmpegMuxer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl Muxer for FfmpegMuxer {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<()> {
        let status = tokio::process::Command::new(&self.ffmpeg_path)
            .args(["-y", "-loglevel", "error", "-i"])
            .arg(video)
            .arg("-i")
            .arg(audio)
            .args(["-c:v", "copy", "-c:a", "aac"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| ToolError::Encoder(format!("failed to start {}: {e}", self.ffmpeg_path.display())))?;

        if !status.success() {
            return Err(ToolError::Encoder(format!(
                "ffmpeg exited with {status} while writing {}",
                output.display()
            )));
        }
        Ok(())
    }
}

/// Mux `video` and `audio` into `output`
///
/// Inputs are removed only after a successful mux; on failure they stay on
/// disk so the merge can be retried.
pub async fn merge_streams(
    muxer: &dyn Muxer,
    palette: &Palette,
    video: &Path,
    audio: &Path,
    output: &Path,
) -> Result<()> {
    let spinner = merge_spinner(palette, "Merging video and audio");
    let result = muxer.mux(video, audio, output).await;
    spinner.finish_and_clear();
    result?;

    for input in [video, audio] {
        if let Err(e) = tokio::fs::remove_file(input).await {
            warn!("Failed to remove {}: {}", input.display(), e);
        }
    }

    info!("🎬 Merged into {}", output.display());
    palette.say(Tone::Success, format!("{} merged", output.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingMuxer;

    #[async_trait]
    impl Muxer for FailingMuxer {
        async fn mux(&self, _video: &Path, _audio: &Path, _output: &Path) -> Result<()> {
            Err(ToolError::Encoder("boom".into()))
        }
    }

    struct CopyMuxer;

    #[async_trait]
    impl Muxer for CopyMuxer {
        async fn mux(&self, video: &Path, _audio: &Path, output: &Path) -> Result<()> {
            tokio::fs::copy(video, output).await?;
            Ok(())
        }
    }

    fn inputs(dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
        let video = dir.join("t_video.m4s");
        let audio = dir.join("t_audio.m4s");
        std::fs::write(&video, b"v").unwrap();
        std::fs::write(&audio, b"a").unwrap();
        (video, audio, dir.join("t.mp4"))
    }

    #[tokio::test]
    async fn test_failed_merge_keeps_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let (video, audio, output) = inputs(dir.path());

        let result = merge_streams(&FailingMuxer, &Palette::default(), &video, &audio, &output).await;
        assert!(matches!(result, Err(ToolError::Encoder(_))));
        assert!(video.exists());
        assert!(audio.exists());
    }

    #[tokio::test]
    async fn test_successful_merge_removes_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let (video, audio, output) = inputs(dir.path());

        merge_streams(&CopyMuxer, &Palette::default(), &video, &audio, &output)
            .await
            .unwrap();
        assert!(!video.exists());
        assert!(!audio.exists());
        assert_eq!(std::fs::read(&output).unwrap(), b"v");
    }

    #[test]
    fn test_missing_encoder_is_encoder_error() {
        let dir = tempfile::tempdir().unwrap();
        let (video, audio, output) = inputs(dir.path());

        let muxer = FfmpegMuxer::new(dir.path().join("no-such-ffmpeg"));
        let result = tokio_test::block_on(muxer.mux(&video, &audio, &output));
        assert!(matches!(result, Err(ToolError::Encoder(_))));
        assert!(!output.exists());
    }
}
