/// HTTP session setup: page URL, stored cookie and client headers
use crate::config::VideoConfig;
use crate::error::{Result, ToolError};
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, REFERER, USER_AGENT};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Drop the query and fragment and make sure the path ends with `/`
pub fn normalize_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Session cookie kept in a sidecar text file
#[derive(Debug, Clone)]
pub struct CookieStore {
    path: PathBuf,
}

impl CookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored cookie, or an empty string when the file is missing
    pub fn read(&self) -> Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(cookie) => Ok(cookie.trim().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("No cookie file at {}, requesting anonymously", self.path.display());
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the stored cookie
    pub fn overwrite(&self, cookie: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, cookie.trim())?;
        info!("🍪 Cookie saved to {}", self.path.display());
        Ok(())
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| ToolError::Config(format!("invalid {name} header: {e}")))
}

/// Client sending `User-Agent`, `Cookie` and `Referer` on every request
pub fn build_client(config: &VideoConfig, cookie: &str, referer: &Url) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value("User-Agent", &config.user_agent)?);
    if !cookie.is_empty() {
        headers.insert(COOKIE, header_value("Cookie", cookie)?);
    }
    headers.insert(REFERER, header_value("Referer", referer.as_str())?);

    let client = Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()?;
    debug!("HTTP client ready for {}", referer);
    Ok(client)
}
