/// Regex clean-up of short-video platform titles
use super::{list_entries, RenamePlanEntry};
use crate::config::RenameConfig;
use crate::error::{Result, ToolError};
use crate::filename::{stem_of, strip_disambiguator, suffix_of};
use crate::ui::{Cell, Confirm, Decision, Palette, Table, Tone};
use rand::Rng;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Ordered clean-up rules as (pattern, replacement)
pub const DEFAULT_RULES: [(&str, &str); 7] = [
    (r"^.*-视频-", ""),
    (r" *#无任何不良引导", ""),
    (r" *(回复 *)?@.*? (?!\()", ""),
    (r" *(回复 *)?@.*", ""),
    (r"^ *#.*? (?!\()", ""),
    (r"^ *#", ""),
    (r" *#.*", ""),
];

static UID_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UID\d+_").expect("static uid pattern"));

/// Drop a leading `UID<digits>_` from a folder name
pub fn strip_uid_prefix(name: &str) -> Cow<'_, str> {
    UID_PREFIX_RE.replace(name, "")
}

/// One substitution applied to file stems
#[derive(Debug, Clone)]
pub struct CleanupRule {
    pattern: fancy_regex::Regex,
    replacement: String,
}

impl CleanupRule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: fancy_regex::Regex::new(pattern)?,
            replacement: replacement.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Replace every match in `stem`
    pub fn apply(&self, stem: &str) -> Result<String> {
        Ok(self
            .pattern
            .try_replacen(stem, 0, self.replacement.as_str())?
            .into_owned())
    }
}

/// Compiled [`DEFAULT_RULES`]
pub fn default_rules() -> Result<Vec<CleanupRule>> {
    DEFAULT_RULES
        .iter()
        .map(|(pattern, replacement)| CleanupRule::new(pattern, replacement))
        .collect()
}

/// How a clean-up run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Every rule is exhausted; `dir` is the folder's final path
    Completed { renamed: usize, dir: PathBuf },
    /// A pass was declined; the folder keeps its name
    Declined { renamed: usize },
    /// The user asked to stop the session
    Quit { renamed: usize },
}

/// Applies the clean-up rules to one folder, one confirmed pass at a time
pub struct CleanupRenamer {
    rules: Vec<CleanupRule>,
    palette: Palette,
    disambiguator_max: u32,
    max_passes_per_rule: usize,
}

impl CleanupRenamer {
    pub fn new(config: &RenameConfig, palette: Palette) -> Result<Self> {
        Ok(Self::with_rules(default_rules()?, config, palette))
    }

    pub fn with_rules(rules: Vec<CleanupRule>, config: &RenameConfig, palette: Palette) -> Self {
        Self {
            rules,
            palette,
            disambiguator_max: config.disambiguator_max,
            max_passes_per_rule: config.max_passes_per_rule,
        }
    }

    pub fn rules(&self) -> &[CleanupRule] {
        &self.rules
    }

    /// Plan one pass of `rule` over every entry of `dir`
    ///
    /// Stems already present in the folder and stems planned earlier in the
    /// same pass are both off limits; a colliding stem gets a random
    /// ` (N)` suffix instead.
    pub fn plan_pass<R: Rng + ?Sized>(
        &self,
        dir: &Path,
        rule: &CleanupRule,
        rng: &mut R,
    ) -> Result<Vec<RenamePlanEntry>> {
        let entries = list_entries(dir)?;
        let mut claimed: HashSet<String> = entries.iter().map(|p| stem_of(p)).collect();
        let mut plan = Vec::new();

        for path in entries {
            let old_stem = stem_of(&path);
            let mut new_stem = rule.apply(&old_stem)?;
            if new_stem == old_stem {
                continue;
            }
            if new_stem.trim().is_empty() {
                warn!("Rule {} would leave {} without a name, skipping", rule.as_str(), path.display());
                continue;
            }

            if claimed.contains(&new_stem) {
                new_stem = self.disambiguate(&new_stem, &claimed, rng);
            }
            claimed.insert(new_stem.clone());

            let target = path.with_file_name(format!("{new_stem}{}", suffix_of(&path)));
            plan.push(RenamePlanEntry::new(path, target));
        }

        debug!("Rule {} plans {} renames in {}", rule.as_str(), plan.len(), dir.display());
        Ok(plan)
    }

    fn disambiguate<R: Rng + ?Sized>(&self, stem: &str, claimed: &HashSet<String>, rng: &mut R) -> String {
        let base = strip_disambiguator(stem);
        loop {
            let candidate = format!("{base} ({})", rng.gen_range(1..=self.disambiguator_max));
            if !claimed.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Plan table shown before a pass is confirmed
    pub fn plan_table(&self, rule: &CleanupRule, plan: &[RenamePlanEntry]) -> Table {
        let mut table = Table::new(["Original name", "New name"])
            .with_title(format!("\nRenaming with pattern {}", rule.as_str()));
        for entry in plan {
            table.add_row(vec![
                Cell::toned(entry.from_name(), Tone::Accent),
                Cell::toned(entry.to_name(), Tone::Success),
            ]);
        }
        table
    }

    /// Run every rule to exhaustion on `dir`, then strip its `UID..._` prefix
    pub fn run(&self, dir: &Path, confirm: &mut dyn Confirm) -> anyhow::Result<CleanupOutcome> {
        let mut rng = rand::thread_rng();
        let mut renamed = 0;
        let mut index = 0;
        let mut passes = 0;

        while let Some(rule) = self.rules.get(index) {
            let plan = self.plan_pass(dir, rule, &mut rng)?;
            if plan.is_empty() {
                index += 1;
                passes = 0;
                continue;
            }

            passes += 1;
            if passes > self.max_passes_per_rule {
                return Err(ToolError::NotConverging {
                    rule: rule.as_str().to_string(),
                    passes: self.max_passes_per_rule,
                }
                .into());
            }

            println!("{}", self.plan_table(rule, &plan).render(&self.palette));
            match confirm.decide("Apply these renames?")? {
                Decision::Apply => {
                    for entry in &plan {
                        entry.apply()?;
                    }
                    renamed += plan.len();
                }
                Decision::Skip => return Ok(CleanupOutcome::Declined { renamed }),
                Decision::Quit => return Ok(CleanupOutcome::Quit { renamed }),
            }
        }

        let final_dir = self.strip_dir_prefix(dir)?;
        info!("🧹 Cleaned {} names in {}", renamed, final_dir.display());
        Ok(CleanupOutcome::Completed {
            renamed,
            dir: final_dir,
        })
    }

    fn strip_dir_prefix(&self, dir: &Path) -> Result<PathBuf> {
        let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return Ok(dir.to_path_buf());
        };

        let stripped = strip_uid_prefix(&name);
        if stripped == name.as_str() || stripped.is_empty() {
            return Ok(dir.to_path_buf());
        }

        let entry = RenamePlanEntry::new(dir.to_path_buf(), dir.with_file_name(&*stripped));
        entry.apply()?;
        self.palette.say(
            Tone::Success,
            format!("{} -> {}", entry.from_name(), entry.to_name()),
        );
        Ok(entry.to)
    }
}

/// Clean every `UID*` folder inside `parent`, asking before each one
pub fn run_batch(
    parent: &Path,
    renamer: &CleanupRenamer,
    confirm: &mut dyn Confirm,
) -> anyhow::Result<Vec<(PathBuf, CleanupOutcome)>> {
    let mut outcomes = Vec::new();

    for child in list_entries(parent)? {
        let name = child
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !child.is_dir() || !name.starts_with("UID") {
            continue;
        }

        match confirm.decide(&format!("Rename {name}?"))? {
            Decision::Apply => {
                let outcome = renamer.run(&child, confirm)?;
                let quit = matches!(outcome, CleanupOutcome::Quit { .. });
                outcomes.push((child, outcome));
                if quit {
                    break;
                }
            }
            Decision::Skip => continue,
            Decision::Quit => break,
        }
    }

    Ok(outcomes)
}
