//! Temporary defaults files.
//!
//! ```no_run
//! use structparse_test_helpers::defaults::DefaultsFile;
//!
//! let file = DefaultsFile::yaml("count: 3\n").expect("write defaults");
//! let args = ["--load-defaults", file.path().as_str()];
//! ```

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A defaults file inside a private temporary directory.
///
/// The directory and the file are removed when the value is dropped.
#[derive(Debug)]
pub struct DefaultsFile {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl DefaultsFile {
    /// Write `contents` to a file called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created, its path is not
    /// valid UTF-8, or the file cannot be written.
    pub fn named(name: &str, contents: &str) -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let root = Utf8Path::from_path(dir.path())
            .ok_or_else(|| anyhow!("temp dir is not valid UTF-8: {}", dir.path().display()))?;
        let path = root.join(name);
        std::fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(Self { _dir: dir, path })
    }

    /// Write `contents` to `defaults.yaml`.
    ///
    /// # Errors
    ///
    /// As for [`DefaultsFile::named`].
    pub fn yaml(contents: &str) -> Result<Self> {
        Self::named("defaults.yaml", contents)
    }

    /// Location of the file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Directory containing the file.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        self.path.parent().unwrap_or(&self.path)
    }

    /// `--load-defaults=<path>` as a single token.
    #[must_use]
    pub fn flag(&self) -> String {
        format!("--load-defaults={}", self.path)
    }
}
