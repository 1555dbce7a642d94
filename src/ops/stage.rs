//! Fixture staging.
//!
//! Scenario fixtures live next to the scenario scripts that drive them.
//! Staging copies a fixture tree into a scenario's working directory,
//! leaving the scripts and version-control metadata behind.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

use crate::util::fs::ensure_dir;

/// Name prefix of scenario scripts, never staged.
pub const SCRIPT_PREFIX: &str = "gyptest";

/// Version-control metadata directories, never staged.
pub const VCS_DIRS: &[&str] = &[".svn", ".git"];

/// Whether an entry is left out of a staged copy.
pub fn is_excluded(name: &str) -> bool {
    name.starts_with(SCRIPT_PREFIX) || VCS_DIRS.contains(&name)
}

fn excluded(entry: &DirEntry) -> bool {
    entry.depth() > 0 && is_excluded(&entry.file_name().to_string_lossy())
}

/// Copy the fixture tree at `source` into `dest`.
///
/// Excluded directories are pruned along with everything below them.
/// Returns the number of files copied.
pub fn copy_test_configuration(source: &Path, dest: &Path) -> Result<usize> {
    ensure_dir(dest)?;

    let mut copied = 0;
    for entry in WalkDir::new(source)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !excluded(e))
    {
        let entry =
            entry.with_context(|| format!("failed to walk fixture: {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("{} is outside {}", entry.path().display(), source.display()))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            copied += 1;
        }
    }

    tracing::debug!(
        "Staged {} file(s) from {} into {}",
        copied,
        source.display(),
        dest.display()
    );
    Ok(copied)
}

/// Move `source` to `destination`, creating the destination's parent.
pub fn relocate(source: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        ensure_dir(parent)?;
    }
    fs::rename(source, destination).with_context(|| {
        format!(
            "failed to move {} to {}",
            source.display(),
            destination.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScenarioFixture;
    use tempfile::TempDir;

    #[test]
    fn test_is_excluded() {
        assert!(is_excluded("gyptest-all.py"));
        assert!(is_excluded("gyptest"));
        assert!(is_excluded(".svn"));
        assert!(is_excluded(".git"));
        assert!(!is_excluded("hello.gyp"));
        assert!(!is_excluded("my-gyptest.py"));
    }

    #[test]
    fn test_copy_skips_scripts_and_vcs() {
        let fixture = ScenarioFixture::hello()
            .with_file("src/lib.c", "int f(void) { return 0; }\n")
            .with_file("src/.svn/entries", "10\n")
            .with_file("gyptest-data/skip.txt", "skip\n");
        let source = fixture.create();
        let dest = TempDir::new().unwrap();

        let copied = copy_test_configuration(source.path(), dest.path()).unwrap();

        assert_eq!(copied, 3);
        assert!(dest.path().join("hello.gyp").is_file());
        assert!(dest.path().join("hello.c").is_file());
        assert!(dest.path().join("src").join("lib.c").is_file());
        assert!(!dest.path().join("gyptest-hello.py").exists());
        assert!(!dest.path().join("src").join(".svn").exists());
        assert!(!dest.path().join("gyptest-data").exists());
    }

    #[test]
    fn test_copy_into_missing_destination() {
        let source = ScenarioFixture::hello().create();
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("nested").join("work");

        copy_test_configuration(source.path(), &dest).unwrap();
        assert_eq!(
            fs::read_to_string(dest.join("hello.gyp")).unwrap(),
            fs::read_to_string(source.path().join("hello.gyp")).unwrap()
        );
    }

    #[test]
    fn test_relocate_creates_parent() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("hello.c"), "").unwrap();

        let dest = tmp.path().join("relocate").join("src");
        relocate(&src, &dest).unwrap();

        assert!(dest.join("hello.c").is_file());
        assert!(!src.exists());
    }
}
