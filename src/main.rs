use anyhow::{Context, Result};
use chore_kit::chapters::{ChapterChecker, FileOutcome};
use chore_kit::config::Config;
use chore_kit::rename::{run_batch, CleanupOutcome, CleanupRenamer, RandomRenamer};
use chore_kit::ui::{prompt_targets, AutoConfirm, Confirm, Decision, Palette, TerminalConfirm, Tone};
use chore_kit::video::{FetchOutcome, VideoFetcher};
use clap::{Parser, Subcommand};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chore-kit", version)]
#[command(about = "Video fetch-and-merge, manuscript chapter check and batch rename")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file to use instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Apply every proposed change without asking
    #[arg(short = 'y', long, global = true, conflicts_with = "dry_run")]
    yes: bool,

    /// Show proposed changes without applying any
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a video page's streams and merge them
    Video {
        /// Replace the stored session cookie before downloading
        #[arg(long)]
        cookie: Option<String>,
        /// Page URLs; prompts for them when none are given
        urls: Vec<String>,
    },
    /// Check and renumber chapter headings of manuscripts
    Chapters {
        /// Manuscript files or folders of manuscripts
        paths: Vec<String>,
    },
    /// Rename the entries of folders
    Rename {
        #[command(subcommand)]
        mode: RenameMode,
    },
    /// Inspect or write the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum RenameMode {
    /// Give every entry a random alphanumeric name
    Random {
        /// Name length (defaults to the first configured preset)
        #[arg(short, long)]
        length: Option<usize>,
        dirs: Vec<String>,
    },
    /// Strip short-video title noise from file names
    Clean {
        /// Treat each folder as a parent of `UID*` folders
        #[arg(long)]
        batch: bool,
        dirs: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration to a file
    Init { path: PathBuf },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "debug".to_string()
    } else {
        std::env::var("CHORE_KIT_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string())
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chore_kit={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn confirmer(cli: &Cli, palette: &Palette) -> Box<dyn Confirm> {
    if cli.yes {
        Box::new(AutoConfirm(Decision::Apply))
    } else if cli.dry_run {
        Box::new(AutoConfirm(Decision::Skip))
    } else {
        Box::new(TerminalConfirm::new(palette.clone()))
    }
}

/// Run `handle` on each target, or on prompted targets when none were given
///
/// A failing target is reported and the session moves on to the next one.
fn drive<F>(palette: &Palette, targets: &[String], prompt: &str, mut handle: F) -> Result<()>
where
    F: FnMut(&str) -> Result<ControlFlow<()>>,
{
    let mut step = |target: &str| match handle(target) {
        Ok(flow) => flow,
        Err(e) => {
            debug!("Target {} failed: {:?}", target, e);
            palette.say(Tone::Error, format!("{e:#}"));
            ControlFlow::Continue(())
        }
    };

    if targets.is_empty() {
        return prompt_targets(palette, prompt, step);
    }
    for target in targets {
        if step(target).is_break() {
            break;
        }
    }
    Ok(())
}

fn run_video(config: Config, cookie: Option<&str>, urls: &[String]) -> Result<()> {
    let palette = config.ui.palette.clone();
    let fetcher = VideoFetcher::new(config.video, palette.clone());
    if let Some(cookie) = cookie {
        fetcher.cookie_store().overwrite(cookie)?;
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
    drive(&palette, urls, "Video URL", |url| {
        match runtime.block_on(fetcher.run(url))? {
            FetchOutcome::Merged { output, .. } => info!("✅ Saved {}", output.display()),
            FetchOutcome::DownloadFailed { video, audio } => {
                info!("❌ Not merged: video {:?}, audio {:?}", video, audio)
            }
        }
        Ok(ControlFlow::Continue(()))
    })
}

fn run_chapters(config: Config, confirm: &mut dyn Confirm, paths: &[String]) -> Result<()> {
    let palette = config.ui.palette.clone();
    let checker = ChapterChecker::new(config.chapters, palette.clone(), config.ui.delimiter);

    drive(&palette, paths, "Manuscript path", |target| {
        let path = Path::new(target);
        let quit = if path.is_dir() {
            checker
                .check_dir(path, &mut *confirm)?
                .iter()
                .any(|(_, outcome)| *outcome == FileOutcome::Quit)
        } else {
            checker.check_file(path, &mut *confirm)? == FileOutcome::Quit
        };
        Ok(if quit { ControlFlow::Break(()) } else { ControlFlow::Continue(()) })
    })
}

fn run_random(config: Config, length: Option<usize>, dirs: &[String]) -> Result<()> {
    let palette = config.ui.palette.clone();
    let length = length
        .or_else(|| config.rename.random_lengths.first().copied())
        .unwrap_or(9);
    anyhow::ensure!(length > 0, "Name length must be greater than 0");
    let renamer = RandomRenamer::new(length, palette.clone());

    drive(&palette, dirs, "Folder path", |dir| {
        let renamed = renamer.run(Path::new(dir))?;
        palette.say(Tone::Success, format!("{} entries renamed", renamed.len()));
        Ok(ControlFlow::Continue(()))
    })
}

fn run_clean(config: Config, confirm: &mut dyn Confirm, batch: bool, dirs: &[String]) -> Result<()> {
    let palette = config.ui.palette.clone();
    let renamer = CleanupRenamer::new(&config.rename, palette.clone())?;

    drive(&palette, dirs, "Folder path", |dir| {
        let path = Path::new(dir);
        let outcomes = if batch {
            run_batch(path, &renamer, &mut *confirm)?
        } else {
            vec![(path.to_path_buf(), renamer.run(path, &mut *confirm)?)]
        };

        let mut quit = false;
        for (dir, outcome) in &outcomes {
            match outcome {
                CleanupOutcome::Completed { renamed, dir: final_dir } => palette.say(
                    Tone::Success,
                    format!("{}: {} renames, now {}", dir.display(), renamed, final_dir.display()),
                ),
                CleanupOutcome::Declined { renamed } => palette.say(
                    Tone::Warning,
                    format!("{}: stopped after {} renames", dir.display(), renamed),
                ),
                CleanupOutcome::Quit { .. } => quit = true,
            }
        }
        Ok(if quit { ControlFlow::Break(()) } else { ControlFlow::Continue(()) })
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let palette = config.ui.palette.clone();
    let mut confirm = confirmer(&cli, &palette);
    debug!("Configuration loaded:\n{}", config.summary());

    match &cli.command {
        Commands::Video { cookie, urls } => run_video(config, cookie.as_deref(), urls),
        Commands::Chapters { paths } => run_chapters(config, confirm.as_mut(), paths),
        Commands::Rename { mode } => match mode {
            RenameMode::Random { length, dirs } => run_random(config, *length, dirs),
            RenameMode::Clean { batch, dirs } => run_clean(config, confirm.as_mut(), *batch, dirs),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", config.summary());
                Ok(())
            }
            ConfigAction::Init { path } => config.save(path),
        },
    }
}
