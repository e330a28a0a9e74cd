/// Streaming downloads with a single backup retry
use super::StreamDescriptor;
use crate::error::Result;
use crate::ui::{download_bar, Palette, Tone};
use futures::StreamExt;
use indicatif::{MultiProgress, ProgressBar};
use reqwest::Client;
use std::fmt;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

/// Result of one GET against one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Completed { bytes: u64 },
    Failed { reason: String },
}

/// Which URL of a descriptor produced a download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlRole {
    Primary,
    Backup,
}

impl fmt::Display for UrlRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlRole::Primary => write!(f, "primary"),
            UrlRole::Backup => write!(f, "backup"),
        }
    }
}

/// Final state of one stream after primary and optional backup attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    Downloaded { role: UrlRole, bytes: u64 },
    /// Destination already existed with content
    Skipped,
    Failed { reason: String },
}

impl StreamOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StreamOutcome::Failed { .. })
    }
}

/// Fetches stream bodies to disk
#[derive(Clone)]
pub struct Downloader {
    client: Client,
    chunk_size: usize,
    palette: Palette,
    multi: MultiProgress,
}

impl Downloader {
    pub fn new(client: Client, chunk_size: usize, palette: Palette) -> Self {
        Self {
            client,
            chunk_size,
            palette,
            multi: MultiProgress::new(),
        }
    }

    /// Hide progress bars, for non-interactive runs and tests
    pub fn hidden(mut self) -> Self {
        self.multi = MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden());
        self
    }

    /// One attempt against `url`; a partial file is removed on failure
    pub async fn download_once(&self, url: &str, dest: &Path) -> AttemptOutcome {
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut bar = None;
        let result = self.fetch_to(url, dest, &name, &mut bar).await;
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        match result {
            Ok(bytes) => {
                self.palette.say(Tone::Success, format!("{} downloaded", dest.display()));
                AttemptOutcome::Completed { bytes }
            }
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(dest).await {
                    if rm.kind() != std::io::ErrorKind::NotFound {
                        warn!("Failed to remove partial file {}: {}", dest.display(), rm);
                    }
                }
                self.palette.say(Tone::Warning, e.to_string());
                AttemptOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn fetch_to(
        &self,
        url: &str,
        dest: &Path,
        name: &str,
        bar: &mut Option<ProgressBar>,
    ) -> Result<u64> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let progress = bar.insert(download_bar(&self.multi, &self.palette, name, response.content_length()));

        let file = tokio::fs::File::create(dest).await?;
        let mut writer = BufWriter::with_capacity(self.chunk_size, file);
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }
        writer.flush().await?;

        debug!("Wrote {} bytes from {} to {}", written, url, dest.display());
        Ok(written)
    }

    /// Download one stream, falling back to its backup URL exactly once
    pub async fn download_stream(&self, stream: &StreamDescriptor, dest: &Path) -> StreamOutcome {
        match tokio::fs::metadata(dest).await {
            Ok(meta) if meta.len() > 0 => {
                self.palette.say(Tone::Accent, format!("{} already exists, skipping", dest.display()));
                return StreamOutcome::Skipped;
            }
            _ => {}
        }

        let reason = match self.download_once(&stream.primary, dest).await {
            AttemptOutcome::Completed { bytes } => {
                return StreamOutcome::Downloaded {
                    role: UrlRole::Primary,
                    bytes,
                }
            }
            AttemptOutcome::Failed { reason } => reason,
        };

        let Some(backup) = stream.backup.as_deref() else {
            return StreamOutcome::Failed { reason };
        };

        self.palette.say(Tone::Accent, "Retrying with the backup URL");
        info!("Primary URL failed for {}: {}", dest.display(), reason);
        match self.download_once(backup, dest).await {
            AttemptOutcome::Completed { bytes } => StreamOutcome::Downloaded {
                role: UrlRole::Backup,
                bytes,
            },
            AttemptOutcome::Failed { reason } => StreamOutcome::Failed { reason },
        }
    }

    /// Download video and audio concurrently and wait for both
    pub async fn download_pair(
        &self,
        video: &StreamDescriptor,
        video_dest: &Path,
        audio: &StreamDescriptor,
        audio_dest: &Path,
    ) -> (StreamOutcome, StreamOutcome) {
        tokio::join!(
            self.download_stream(video, video_dest),
            self.download_stream(audio, audio_dest)
        )
    }
}
