/// Random fixed-length renaming
use super::{list_entries, RenamePlanEntry};
use crate::error::Result;
use crate::filename::suffix_of;
use crate::ui::{Palette, Tone};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::info;

/// Lowercase letters and digits
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Draw `length` independent characters from [`ALPHABET`]
pub fn random_name<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Name given to the `index`-th child of a renamed directory
///
/// The extension keeps its separating space: `"<dir> (<index>) <.ext>"`.
pub fn numbered_child_name(dir_name: &str, index: usize, suffix: &str) -> String {
    format!("{dir_name} ({index}) {suffix}").trim_end().to_string()
}

/// Gives every entry of a directory a random name
pub struct RandomRenamer {
    name_length: usize,
    palette: Palette,
}

impl RandomRenamer {
    pub fn new(name_length: usize, palette: Palette) -> Self {
        Self { name_length, palette }
    }

    /// Rename every entry of `dir`; sub-directories also get their children numbered
    pub fn run(&self, dir: &Path) -> Result<Vec<RenamePlanEntry>> {
        let mut rng = rand::thread_rng();
        let mut done = Vec::new();

        for path in list_entries(dir)? {
            if path.is_dir() {
                done.extend(self.rename_dir(&path, &mut rng)?);
            } else {
                done.push(self.rename_file(&path, &mut rng)?);
            }
        }

        info!("🎲 Randomly renamed {} entries in {}", done.len(), dir.display());
        Ok(done)
    }

    fn rename_file<R: Rng + ?Sized>(&self, path: &Path, rng: &mut R) -> Result<RenamePlanEntry> {
        let (_, target) = self.free_name(path, rng);
        let entry = RenamePlanEntry::new(path.to_path_buf(), target);
        entry.apply()?;
        self.palette.say(Tone::Success, format!("{} renamed", path.display()));
        Ok(entry)
    }

    fn rename_dir<R: Rng + ?Sized>(&self, path: &Path, rng: &mut R) -> Result<Vec<RenamePlanEntry>> {
        let (new_name, new_dir) = self.free_name(path, rng);
        let dir_entry = RenamePlanEntry::new(path.to_path_buf(), new_dir.clone());
        dir_entry.apply()?;

        let mut done = vec![dir_entry];
        // Listing order is whatever the platform returns
        for (index, child) in list_entries(&new_dir)?.into_iter().enumerate() {
            let target = new_dir.join(numbered_child_name(&new_name, index + 1, &suffix_of(&child)));
            if target == child {
                continue;
            }
            let entry = RenamePlanEntry::new(child, target);
            entry.apply()?;
            done.push(entry);
        }

        self.palette.say(Tone::Success, format!("{} renamed", path.display()));
        Ok(done)
    }

    /// Draw names until one does not exist next to `path`
    fn free_name<R: Rng + ?Sized>(&self, path: &Path, rng: &mut R) -> (String, PathBuf) {
        let suffix = suffix_of(path);
        loop {
            let name = random_name(rng, self.name_length);
            let candidate = path.with_file_name(format!("{name}{suffix}"));
            if !candidate.exists() {
                return (name, candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_name_uses_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        let name = random_name(&mut rng, 15);
        assert_eq!(name.len(), 15);
        assert!(name.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_numbered_child_name() {
        assert_eq!(numbered_child_name("abc", 1, ".mp4"), "abc (1) .mp4");
        assert_eq!(numbered_child_name("abc", 12, ""), "abc (12)");
    }
}
