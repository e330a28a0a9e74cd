/// Resolution tier selection
use super::playinfo::{PlayInfo, Track};
use super::{StreamDescriptor, StreamPair};
use crate::error::{Result, ToolError};
use crate::ui::Tone;
use serde::{Deserialize, Serialize};

/// Index of the preferred video track
const PREFERRED_INDEX: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    Standard,
    High,
}

impl QualityTier {
    pub fn from_dimensions(width: u32, height: u32, threshold: u32) -> Self {
        if width.max(height) >= threshold {
            QualityTier::High
        } else {
            QualityTier::Standard
        }
    }

    /// Colour cue for the resolution line
    pub fn tone(self) -> Tone {
        match self {
            QualityTier::High => Tone::Accent,
            QualityTier::Standard => Tone::Warning,
        }
    }
}

/// Pick the video track to download
///
/// Track 2 wins when it reaches `threshold` or shares track 0's width;
/// otherwise track 0. Payloads with fewer than three tracks use track 0.
pub fn select_video_index(tracks: &[Track], threshold: u32) -> usize {
    let (Some(first), Some(candidate)) = (tracks.first(), tracks.get(PREFERRED_INDEX)) else {
        return 0;
    };

    if candidate.width.max(candidate.height) >= threshold || candidate.width == first.width {
        PREFERRED_INDEX
    } else {
        0
    }
}

fn descriptor(track: &Track) -> StreamDescriptor {
    StreamDescriptor {
        width: track.width,
        height: track.height,
        primary: track.base_url.clone(),
        backup: track.backup(),
    }
}

/// Choose the video and audio streams for a payload
pub fn select_streams(info: &PlayInfo, threshold: u32) -> Result<StreamPair> {
    let dash = &info.data.dash;
    if dash.video.is_empty() {
        return Err(ToolError::payload("payload has no video tracks"));
    }
    let audio = dash
        .audio
        .first()
        .ok_or_else(|| ToolError::payload("payload has no audio tracks"))?;

    let video = descriptor(&dash.video[select_video_index(&dash.video, threshold)]);
    let tier = QualityTier::from_dimensions(video.width, video.height, threshold);

    Ok(StreamPair {
        video,
        audio: descriptor(audio),
        tier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(width: u32, height: u32) -> Track {
        Track {
            width,
            height,
            base_url: format!("http://v/{width}x{height}"),
            backup_url: None,
        }
    }

    #[test]
    fn test_high_candidate_wins() {
        let tracks = [track(3840, 2160), track(2560, 1440), track(1920, 1080)];
        assert_eq!(select_video_index(&tracks, 1920), 2);

        let portrait = [track(720, 1280), track(720, 1280), track(1080, 1920)];
        assert_eq!(select_video_index(&portrait, 1920), 2);
    }

    #[test]
    fn test_same_width_keeps_candidate() {
        let tracks = [track(1280, 720), track(1280, 720), track(1280, 720)];
        assert_eq!(select_video_index(&tracks, 1920), 2);
    }

    #[test]
    fn test_falls_back_to_first() {
        let tracks = [track(1440, 1080), track(1280, 720), track(852, 480)];
        assert_eq!(select_video_index(&tracks, 1920), 0);
    }

    #[test]
    fn test_short_payload_uses_first() {
        assert_eq!(select_video_index(&[track(1920, 1080)], 1920), 0);
        assert_eq!(select_video_index(&[], 1920), 0);
    }

    #[test]
    fn test_tier_colour() {
        assert_eq!(QualityTier::from_dimensions(1280, 720, 1920).tone(), Tone::Warning);
        assert_eq!(QualityTier::from_dimensions(1080, 1920, 1920).tone(), Tone::Accent);
    }
}
