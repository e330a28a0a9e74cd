/// Title and playback payload extraction from a video page
use crate::error::{Result, ToolError};
use crate::filename::sanitize_title;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

const PLAYINFO_PREFIX: &str = "window.__playinfo__=";
const HEAD_SCRIPT_LIMIT: usize = 4;

/// Playback payload embedded in the page head
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayInfo {
    pub data: PlayData,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayData {
    pub dash: Dash,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Dash {
    #[serde(default)]
    pub video: Vec<Track>,
    #[serde(default)]
    pub audio: Vec<Track>,
}

/// One DASH representation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(rename = "baseUrl", alias = "base_url")]
    pub base_url: String,
    #[serde(rename = "backupUrl", alias = "backup_url", default)]
    pub backup_url: Option<Vec<String>>,
}

impl Track {
    pub fn backup(&self) -> Option<String> {
        self.backup_url.as_ref().and_then(|urls| urls.first().cloned())
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ToolError::payload(format!("bad selector {css}: {e}")))
}

/// Video title, made safe for use as a filename
pub fn extract_title(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let title_sel = selector("div#viewbox_report div.video-info-title div h1")?;

    let title = document
        .select(&title_sel)
        .next()
        .map(|h1| h1.text().collect::<String>())
        .ok_or_else(|| ToolError::payload("video title not found"))?;

    let title = sanitize_title(&title);
    if title.is_empty() {
        return Err(ToolError::payload("video title is empty"));
    }
    Ok(title)
}

/// Parse the `window.__playinfo__` payload
///
/// The payload lives in the last of the first four `<script>` elements of
/// `<head>`.
pub fn extract_playinfo(html: &str) -> Result<PlayInfo> {
    let document = Html::parse_document(html);
    let script_sel = selector("head script")?;

    let script = document
        .select(&script_sel)
        .take(HEAD_SCRIPT_LIMIT)
        .last()
        .ok_or_else(|| ToolError::payload("no script in page head"))?;

    let text = script.text().collect::<String>();
    let json = text.trim().strip_prefix(PLAYINFO_PREFIX).ok_or_else(|| {
        ToolError::payload("playback payload not found in page head")
    })?;

    let info: PlayInfo = serde_json::from_str(json)?;
    debug!(
        "Payload has {} video and {} audio tracks",
        info.data.dash.video.len(),
        info.data.dash.audio.len()
    );
    Ok(info)
}

/// Decode a page body
///
/// The charset from `Content-Type` wins; otherwise the encoding is guessed
/// from the bytes.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(|ct| {
            ct.split(';')
                .filter_map(|part| part.trim().strip_prefix("charset="))
                .next()
        })
        .and_then(|label| encoding_rs::Encoding::for_label(label.trim_matches('"').as_bytes()));

    let encoding = declared.unwrap_or_else(|| {
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(bytes, true);
        detector.guess(None, true)
    });

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!("Page decoded as {} with replacement characters", used.name());
    }
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
<script>var a = 1;</script>
<script src="x.js"></script>
<script>window.__INITIAL_STATE__ = {};</script>
<script>window.__playinfo__={"data":{"dash":{"video":[{"width":1280,"height":720,"baseUrl":"http://v/0","backupUrl":["http://b/0"]}],"audio":[{"base_url":"http://a/0","backup_url":["http://ab/0"]}]}}}</script>
<script>var late = 2;</script>
</head><body>
<div id="viewbox_report"><div class="video-info-title"><div><h1>A/B: "test"</h1></div></div></div>
</body></html>"#;

    #[test]
    fn test_extract_title_sanitizes() {
        assert_eq!(extract_title(PAGE).unwrap(), "A B   test");
    }

    #[test]
    fn test_extract_title_missing() {
        assert!(matches!(extract_title("<html></html>"), Err(ToolError::Payload(_))));
    }

    #[test]
    fn test_extract_playinfo_accepts_both_key_styles() {
        let info = extract_playinfo(PAGE).unwrap();
        let video = &info.data.dash.video[0];
        assert_eq!(video.base_url, "http://v/0");
        assert_eq!(video.backup().as_deref(), Some("http://b/0"));
        assert_eq!(info.data.dash.audio[0].base_url, "http://a/0");
        assert_eq!(info.data.dash.audio[0].backup().as_deref(), Some("http://ab/0"));
    }

    #[test]
    fn test_extract_playinfo_without_payload() {
        let page = "<html><head><script>var a = 1;</script></head></html>";
        assert!(matches!(extract_playinfo(page), Err(ToolError::Payload(_))));
    }

    #[test]
    fn test_decode_page_uses_declared_charset() {
        let (bytes, _, _) = encoding_rs::GBK.encode("你好");
        assert_eq!(decode_page(&bytes, Some("text/html; charset=gbk")), "你好");
        assert_eq!(decode_page("你好".as_bytes(), None), "你好");
    }
}
