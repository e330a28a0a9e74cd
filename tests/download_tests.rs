//! Integration tests for the video pipeline using wiremock.
//!
//! HTTP responses are mocked; the encoder is replaced by an in-process muxer.

use async_trait::async_trait;
use chore_kit::config::ConfigBuilder;
use chore_kit::error::{Result as ToolResult, ToolError};
use chore_kit::ui::Palette;
use chore_kit::video::{Downloader, FetchOutcome, Muxer, StreamDescriptor, StreamOutcome, UrlRole, VideoFetcher};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes video bytes followed by audio bytes
struct ConcatMuxer;

#[async_trait]
impl Muxer for ConcatMuxer {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> ToolResult<()> {
        let mut merged = tokio::fs::read(video).await?;
        merged.extend(tokio::fs::read(audio).await?);
        tokio::fs::write(output, merged).await?;
        Ok(())
    }
}

fn downloader() -> Downloader {
    Downloader::new(reqwest::Client::new(), 1024 * 1024, Palette::default()).hidden()
}

/// A local address nothing listens on
fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/media.m4s")
}

fn page(base: &str) -> String {
    format!(
        r#"<html><head>
<meta charset="utf-8">
<script>window.__pinia={{}}</script>
<script>window.__playinfo__={{"data":{{"dash":{{
"video":[
  {{"width":1280,"height":720,"baseUrl":"{base}/v0","backupUrl":["{base}/v0b"]}},
  {{"width":1280,"height":720,"baseUrl":"{base}/v1","backupUrl":[]}},
  {{"width":852,"height":480,"baseUrl":"{base}/v2","backupUrl":[]}}
],
"audio":[{{"baseUrl":"{base}/a0","backupUrl":["{base}/a0b"]}}]
}}}}}}</script>
</head><body>
<div id="viewbox_report"><div class="video-info-title"><div><h1>测试: 视频</h1></div></div></div>
</body></html>"#
    )
}

#[tokio::test]
async fn test_http_error_falls_back_to_backup_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/backup"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"media".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("clip_video.m4s");
    let stream = StreamDescriptor {
        width: 1920,
        height: 1080,
        primary: format!("{}/primary", server.uri()),
        backup: Some(format!("{}/backup", server.uri())),
    };

    let outcome = downloader().download_stream(&stream, &dest).await;
    assert_eq!(
        outcome,
        StreamOutcome::Downloaded {
            role: UrlRole::Backup,
            bytes: 5
        }
    );
    assert_eq!(std::fs::read(&dest).unwrap(), b"media");
}

#[tokio::test]
async fn test_unreachable_primary_tries_backup_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/backup"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("clip_audio.m4s");
    // An empty leftover counts as absent and is cleaned up on failure
    std::fs::write(&dest, b"").unwrap();

    let stream = StreamDescriptor {
        width: 0,
        height: 0,
        primary: unreachable_url(),
        backup: Some(format!("{}/backup", server.uri())),
    };

    let outcome = downloader().download_stream(&stream, &dest).await;
    assert!(outcome.is_failed());
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_failure_without_backup_is_reported() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("clip_video.m4s");
    let stream = StreamDescriptor {
        width: 0,
        height: 0,
        primary: unreachable_url(),
        backup: None,
    };

    match downloader().download_stream(&stream, &dest).await {
        StreamOutcome::Failed { reason } => assert!(!reason.is_empty()),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetcher_downloads_and_merges() {
    let server = MockServer::start().await;
    let base = server.uri();
    let page_url = format!("{base}/video/BV1/");

    Mock::given(method("GET"))
        .and(path("/video/BV1/"))
        .and(header("cookie", "SESSDATA=abc"))
        .and(header("referer", page_url.as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(page(&base)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"VIDEO".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"AUDIO".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let cookie_file = dir.path().join("bilibili.txt");
    std::fs::write(&cookie_file, "SESSDATA=abc\n").unwrap();
    let save_dir = dir.path().join("Download");

    let config = ConfigBuilder::new()
        .with_save_dir(save_dir.clone())
        .with_cookie_file(cookie_file)
        .build();
    let fetcher = VideoFetcher::new(config.video, Palette::default())
        .with_muxer(Box::new(ConcatMuxer))
        .without_progress();

    let outcome = fetcher.run(&format!("{base}/video/BV1?p=2")).await.unwrap();
    let FetchOutcome::Merged { output, video, audio } = outcome else {
        panic!("expected a merged file");
    };

    assert_eq!(output, save_dir.join("测试  视频.mp4"));
    assert_eq!(std::fs::read(&output).unwrap(), b"VIDEOAUDIO");
    assert_eq!(video, StreamOutcome::Downloaded { role: UrlRole::Primary, bytes: 5 });
    assert_eq!(audio, StreamOutcome::Downloaded { role: UrlRole::Primary, bytes: 5 });
    assert!(!save_dir.join("测试  视频_video.m4s").exists());
    assert!(!save_dir.join("测试  视频_audio.m4s").exists());
}

#[tokio::test]
async fn test_fetcher_skips_merge_when_a_stream_fails() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/video/BV1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(&base)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"AUDIO".to_vec()))
        .mount(&server)
        .await;
    // /v0 and /v0b are not mounted and answer 404

    let dir = TempDir::new().unwrap();
    let save_dir = dir.path().join("Download");
    let config = ConfigBuilder::new()
        .with_save_dir(save_dir.clone())
        .with_cookie_file(dir.path().join("missing-cookie.txt"))
        .build();
    let fetcher = VideoFetcher::new(config.video, Palette::default())
        .with_muxer(Box::new(ConcatMuxer))
        .without_progress();

    let outcome = fetcher.run(&format!("{base}/video/BV1")).await.unwrap();
    match outcome {
        FetchOutcome::DownloadFailed { video, audio } => {
            assert!(video.is_failed());
            assert!(!audio.is_failed());
        }
        other => panic!("expected a failed download, got {other:?}"),
    }
    assert!(!save_dir.join("测试  视频.mp4").exists());
    assert!(save_dir.join("测试  视频_audio.m4s").exists());
}

#[tokio::test]
async fn test_fetcher_rejects_page_without_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/video/BV2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><script>var x = 1;</script></head><body>
<div id="viewbox_report"><div class="video-info-title"><div><h1>t</h1></div></div></div>
</body></html>"#,
        ))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = ConfigBuilder::new()
        .with_save_dir(dir.path().to_path_buf())
        .with_cookie_file(dir.path().join("cookie.txt"))
        .build();
    let fetcher = VideoFetcher::new(config.video, Palette::default()).without_progress();

    let err = fetcher.run(&format!("{}/video/BV2", server.uri())).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<ToolError>(), Some(ToolError::Payload(_))));
}
