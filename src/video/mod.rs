//! Fetch a video page, download its best DASH streams and mux them
//!
//! The pipeline is split the way the data flows: [`session`] builds the
//! HTTP client, [`playinfo`] pulls the title and playback payload out of the
//! page, [`quality`] picks the streams, [`download`] fetches both at once
//! and [`merge`] hands them to the encoder. [`VideoFetcher`] ties it together.

pub mod download;
pub mod fetcher;
pub mod merge;
pub mod playinfo;
pub mod quality;
pub mod session;

pub use download::{AttemptOutcome, Downloader, StreamOutcome, UrlRole};
pub use fetcher::{FetchOutcome, VideoFetcher};
pub use merge::{merge_streams, FfmpegMuxer, Muxer};
pub use playinfo::{extract_playinfo, extract_title, PlayInfo};
pub use quality::{select_streams, select_video_index, QualityTier};
pub use session::{build_client, normalize_url, CookieStore};

use serde::{Deserialize, Serialize};

/// One chosen media stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    pub width: u32,
    pub height: u32,
    pub primary: String,
    pub backup: Option<String>,
}

impl StreamDescriptor {
    pub fn max_dimension(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// Video and audio stream selected for one download session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPair {
    pub video: StreamDescriptor,
    pub audio: StreamDescriptor,
    pub tier: QualityTier,
}
