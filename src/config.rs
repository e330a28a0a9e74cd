use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ui::Palette;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the chore-kit tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Video fetch-and-merge settings
    pub video: VideoConfig,

    /// Manuscript chapter check settings
    pub chapters: ChapterConfig,

    /// Batch rename settings
    pub rename: RenameConfig,

    /// Terminal output settings
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Base directory for merged videos and temporary streams
    pub save_dir: PathBuf,

    /// Session cookie sidecar file (defaults to `bilibili.txt` next to the executable)
    pub cookie_file: Option<PathBuf>,

    /// User agent sent with every request
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Write buffer size for streamed downloads (bytes)
    pub chunk_size: usize,

    /// Resolution (max of width/height) at which a track counts as high quality
    pub high_quality_threshold: u32,

    /// Encoder executable used to mux video and audio
    pub ffmpeg_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterConfig {
    /// Chapters with fewer characters are highlighted
    pub counts_warning: usize,

    /// Chapters with fewer body lines are highlighted
    pub lines_warning: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameConfig {
    /// Name lengths offered by the random strategy
    pub random_lengths: Vec<usize>,

    /// Upper bound (inclusive) of random collision disambiguators
    pub disambiguator_max: u32,

    /// Passes a single clean-up rule may take before it is considered stuck
    pub max_passes_per_rule: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Colours used for console output
    pub palette: Palette,

    /// Separator line printed around menus
    pub delimiter: String,
}

impl VideoConfig {
    /// Resolve the cookie sidecar path
    pub fn cookie_path(&self) -> PathBuf {
        if let Some(path) = &self.cookie_file {
            return path.clone();
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("bilibili.txt")))
            .unwrap_or_else(|| PathBuf::from("bilibili.txt"))
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let mut config_paths = vec![
            PathBuf::from("chore-kit.toml"),
            PathBuf::from("config/chore-kit.toml"),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("chore-kit").join("config.toml"));
        }

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path.display());
                        return Ok(config.with_env_overrides());
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(Self::from_env())
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config.with_env_overrides())
    }

    /// Defaults with environment variable overrides
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(save_dir) = std::env::var("CHORE_KIT_SAVE_DIR") {
            self.video.save_dir = PathBuf::from(save_dir);
        }

        if let Ok(cookie_file) = std::env::var("CHORE_KIT_COOKIE_FILE") {
            self.video.cookie_file = Some(PathBuf::from(cookie_file));
        }

        if let Ok(timeout) = std::env::var("CHORE_KIT_TIMEOUT") {
            match timeout.parse() {
                Ok(seconds) => self.video.timeout_seconds = seconds,
                Err(_) => tracing::warn!("Ignoring invalid CHORE_KIT_TIMEOUT: {}", timeout),
            }
        }

        self
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.video.timeout_seconds == 0 {
            return Err(anyhow!("video.timeout_seconds must be greater than 0"));
        }

        if self.video.chunk_size == 0 {
            return Err(anyhow!("video.chunk_size must be greater than 0"));
        }

        if self.rename.random_lengths.iter().any(|&len| len == 0) {
            return Err(anyhow!("rename.random_lengths must not contain 0"));
        }

        if self.rename.disambiguator_max == 0 {
            return Err(anyhow!("rename.disambiguator_max must be greater than 0"));
        }

        if self.rename.max_passes_per_rule == 0 {
            return Err(anyhow!("rename.max_passes_per_rule must be greater than 0"));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "chore-kit configuration:\n\
            - Save directory: {}\n\
            - Cookie file: {}\n\
            - Request timeout: {}s\n\
            - Chapter warnings: < {} chars, < {} lines\n\
            - Random name lengths: {:?}",
            self.video.save_dir.display(),
            self.video.cookie_path().display(),
            self.video.timeout_seconds,
            self.chapters.counts_warning,
            self.chapters.lines_warning,
            self.rename.random_lengths,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            video: VideoConfig {
                save_dir: dirs::video_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("bilibili")
                    .join("Download"),
                cookie_file: None,
                user_agent: DEFAULT_USER_AGENT.to_string(),
                timeout_seconds: 120,
                chunk_size: 1024 * 1024, // 1 MiB
                high_quality_threshold: 1920,
                ffmpeg_path: PathBuf::from("ffmpeg"),
            },
            chapters: ChapterConfig {
                counts_warning: 2000,
                lines_warning: 30,
            },
            rename: RenameConfig {
                random_lengths: vec![9, 15],
                disambiguator_max: 99_999,
                max_passes_per_rule: 32,
            },
            ui: UiConfig {
                palette: Palette::default(),
                delimiter: "-".repeat(40),
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_save_dir(mut self, dir: PathBuf) -> Self {
        self.config.video.save_dir = dir;
        self
    }

    pub fn with_cookie_file(mut self, path: PathBuf) -> Self {
        self.config.video.cookie_file = Some(path);
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.video.timeout_seconds = seconds;
        self
    }

    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.config.video.chunk_size = bytes;
        self
    }

    pub fn with_chapter_warnings(mut self, counts: usize, lines: usize) -> Self {
        self.config.chapters.counts_warning = counts;
        self.config.chapters.lines_warning = lines;
        self
    }

    pub fn with_max_passes_per_rule(mut self, passes: usize) -> Self {
        self.config.rename.max_passes_per_rule = passes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
