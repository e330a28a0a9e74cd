/// One page URL from fetch to merged file
use super::download::{Downloader, StreamOutcome};
use super::merge::{merge_streams, FfmpegMuxer, Muxer};
use super::playinfo::{decode_page, extract_playinfo, extract_title};
use super::quality::select_streams;
use super::session::{build_client, normalize_url, CookieStore};
use crate::config::VideoConfig;
use crate::ui::{Palette, Tone};
use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

/// How one URL ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Merged {
        output: PathBuf,
        video: StreamOutcome,
        audio: StreamOutcome,
    },
    /// At least one stream failed; nothing was merged
    DownloadFailed {
        video: StreamOutcome,
        audio: StreamOutcome,
    },
}

/// Output paths derived from the video title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub video: PathBuf,
    pub audio: PathBuf,
    pub merged: PathBuf,
}

impl OutputPaths {
    pub fn new(save_dir: &std::path::Path, title: &str) -> Self {
        Self {
            video: save_dir.join(format!("{title}_video.m4s")),
            audio: save_dir.join(format!("{title}_audio.m4s")),
            merged: save_dir.join(format!("{title}.mp4")),
        }
    }
}

/// GET the page and decode it to text
pub async fn fetch_page(client: &Client, url: &Url) -> crate::error::Result<String> {
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response.bytes().await?;
    debug!("Fetched {} bytes from {}", bytes.len(), url);
    Ok(decode_page(&bytes, content_type.as_deref()))
}

/// Downloads the best streams of a video page and merges them
pub struct VideoFetcher {
    config: VideoConfig,
    palette: Palette,
    muxer: Box<dyn Muxer>,
    show_progress: bool,
}

impl VideoFetcher {
    pub fn new(config: VideoConfig, palette: Palette) -> Self {
        let muxer = FfmpegMuxer::new(config.ffmpeg_path.clone());
        Self {
            config,
            palette,
            muxer: Box::new(muxer),
            show_progress: true,
        }
    }

    pub fn with_muxer(mut self, muxer: Box<dyn Muxer>) -> Self {
        self.muxer = muxer;
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn cookie_store(&self) -> CookieStore {
        CookieStore::new(self.config.cookie_path())
    }

    pub async fn run(&self, raw_url: &str) -> Result<FetchOutcome> {
        let url = normalize_url(raw_url).with_context(|| format!("Invalid video URL: {raw_url}"))?;
        let cookie = self.cookie_store().read().context("Failed to read the stored cookie")?;
        let client = build_client(&self.config, &cookie, &url)?;

        let html = fetch_page(&client, &url)
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;
        let title = extract_title(&html)?;
        let info = extract_playinfo(&html)?;
        let pair = select_streams(&info, self.config.high_quality_threshold)?;

        self.palette.say(Tone::Accent, format!("\n{title}"));
        self.palette.say(
            pair.tier.tone(),
            format!("Resolution: {} × {}", pair.video.width, pair.video.height),
        );
        info!("📺 {} at {}x{} ({:?})", title, pair.video.width, pair.video.height, pair.tier);

        tokio::fs::create_dir_all(&self.config.save_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.config.save_dir.display()))?;
        let paths = OutputPaths::new(&self.config.save_dir, &title);

        let mut downloader = Downloader::new(client, self.config.chunk_size, self.palette.clone());
        if !self.show_progress {
            downloader = downloader.hidden();
        }
        let (video, audio) = downloader
            .download_pair(&pair.video, &paths.video, &pair.audio, &paths.audio)
            .await;

        if video.is_failed() || audio.is_failed() {
            warn!("Skipping merge for {}: video {:?}, audio {:?}", title, video, audio);
            self.palette.say(Tone::Error, format!("Download failed for {title}"));
            return Ok(FetchOutcome::DownloadFailed { video, audio });
        }

        merge_streams(self.muxer.as_ref(), &self.palette, &paths.video, &paths.audio, &paths.merged)
            .await
            .with_context(|| format!("Failed to merge {title}"))?;

        Ok(FetchOutcome::Merged {
            output: paths.merged,
            video,
            audio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::new(Path::new("/tmp/dl"), "标题");
        assert_eq!(paths.video, Path::new("/tmp/dl/标题_video.m4s"));
        assert_eq!(paths.audio, Path::new("/tmp/dl/标题_audio.m4s"));
        assert_eq!(paths.merged, Path::new("/tmp/dl/标题.mp4"));
    }
}
