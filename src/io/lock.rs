use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const LOCK_FILE: &str = ".lock";

/// Advisory `flock` on `<data dir>/.lock`. The TUI holds it for its whole
/// session; CLI write commands hold it for one load-mutate-save cycle.
/// The holder's pid is written into the file so a busy error can name it.
#[derive(Debug)]
pub struct DataLock {
    file: File,
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("data directory is in use by another tick process{}", holder_suffix(.holder))]
    Busy { path: PathBuf, holder: Option<u32> },
}

fn holder_suffix(holder: &Option<u32>) -> String {
    holder.map(|pid| format!(" (pid {})", pid)).unwrap_or_default()
}

impl DataLock {
    /// Lock `dir`, polling until `timeout` has passed
    pub fn acquire(dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = dir.join(LOCK_FILE);
        let open_err = |source| LockError::Open {
            path: path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(open_err)?;

        let deadline = Instant::now() + timeout;
        while !flock_exclusive(&file) {
            if Instant::now() >= deadline {
                return Err(LockError::Busy {
                    holder: read_holder(&mut file),
                    path,
                });
            }
            std::thread::sleep(Duration::from_millis(20));
        }

        record_holder(&mut file).map_err(open_err)?;
        log::debug!("locked {}", path.display());
        Ok(DataLock { file, path })
    }

    /// Lock without waiting
    pub fn try_acquire(dir: &Path) -> Result<Self, LockError> {
        Self::acquire(dir, Duration::ZERO)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DataLock {
    fn drop(&mut self) {
        // The file stays: a waiter may already have it open, and unlinking
        // would let a newcomer lock a fresh file alongside it. The flock
        // itself goes away with the handle.
        let _ = self.file.set_len(0);
    }
}

fn record_holder(file: &mut File) -> std::io::Result<()> {
    file.set_len(0)?;
    file.rewind()?;
    write!(file, "{}", std::process::id())?;
    file.flush()
}

fn read_holder(file: &mut File) -> Option<u32> {
    let mut text = String::new();
    file.rewind().ok()?;
    file.read_to_string(&mut text).ok()?;
    text.trim().parse().ok()
}

#[cfg(unix)]
fn flock_exclusive(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor is owned by `file` and stays open for the call
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn flock_exclusive(_file: &File) -> bool {
    true
}
