//! Working directory guard.
//!
//! Relative `--load-defaults` paths resolve against the process working
//! directory. Tests that change it hold [`CwdGuard`], which serialises access
//! through a global mutex and restores the previous directory on drop.
//!
//! ```no_run
//! use structparse_test_helpers::cwd;
//!
//! let guard = cwd::set_dir("/tmp").expect("set cwd");
//! // Relative paths now resolve under `/tmp`.
//! drop(guard);
//! ```

use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use parking_lot::{Mutex, MutexGuard};

static CWD_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

/// Restores the working directory captured by [`set_dir`] when dropped.
#[must_use = "dropping restores the prior working directory"]
pub struct CwdGuard {
    original: Utf8PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl CwdGuard {
    /// The directory that will be restored.
    #[must_use]
    pub const fn original(&self) -> &Utf8PathBuf {
        &self.original
    }

    /// Restore the original directory now, reporting failures.
    ///
    /// # Errors
    ///
    /// Returns an error if `set_current_dir` fails.
    pub fn restore(&self) -> std::io::Result<()> {
        std::env::set_current_dir(&self.original)
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ignored = std::env::set_current_dir(&self.original);
    }
}

/// Switch the working directory to `path` until the guard is dropped.
///
/// The original directory is read before switching so a non-UTF-8 original
/// leaves the process where it was.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read or is not valid
/// UTF-8, or if `path` cannot be entered.
pub fn set_dir(path: impl AsRef<std::path::Path>) -> Result<CwdGuard> {
    let lock = CWD_MUTEX.lock();
    let current = std::env::current_dir().context("read current dir")?;
    let original = Utf8PathBuf::from_path_buf(current)
        .map_err(|raw| anyhow!("cwd is not valid UTF-8: {}", raw.display()))?;
    std::env::set_current_dir(path.as_ref())
        .with_context(|| format!("enter {}", path.as_ref().display()))?;
    Ok(CwdGuard {
        original,
        _lock: lock,
    })
}
