//! Filesystem coordination store
//!
//! The only backend that works across OS processes. Ranks agree out of band
//! on a directory (local temp path or shared mount) and publish one file per
//! key:
//!
//! ```text
//! <base>/
//!   rank0.addr      raw bytes published under "rank0.addr"
//!   rank1.addr
//!   ...
//! ```
//!
//! File existence is the synchronization signal. `wait` polls with a
//! metadata query at a fixed interval rather than opening files.
//!
//! # Partial writes
//!
//! `set` writes into an anonymous temp file in `<base>` and renames it over
//! the key's path. Rename is atomic within a directory, so a waiter that sees
//! the file exist always reads a complete value. Temp files carry a `.tmp`
//! prefix, which is why keys may not start with `.tmp`.
//!
//! # Keys
//!
//! A key maps to exactly one entry directly under `<base>`. Keys that are
//! empty, `.`/`..`, or contain a path separator or NUL are rejected with
//! `InvalidKey`.

use rendezvous_core::{Error, Result, Store, Timeout};
use std::fs;
use std::io::{ErrorKind, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default interval between readiness checks in `wait`.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

const TEMP_PREFIX: &str = ".tmp";

/// Published files are readable by every rank sharing the directory.
#[cfg(unix)]
const KEY_FILE_MODE: u32 = 0o644;

/// Directory-backed store shared between processes.
///
/// # Example
///
/// ```ignore
/// use rendezvous_storage::FileStore;
///
/// let store = FileStore::open("/tmp/job-42")?;
/// store.set("rank1.addr", b"10.0.0.2:4000")?;
/// store.wait(&["rank0.addr"], Timeout::default())?;
/// let peer = store.get("rank0.addr")?;
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    base: PathBuf,
    poll_interval: Duration,
    timeout: Timeout,
}

impl FileStore {
    /// Open a store rooted at `path`, creating the directory if needed.
    ///
    /// An existing directory is reused as is.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_poll_interval(path, DEFAULT_POLL_INTERVAL)
    }

    /// Open a store that polls at `poll_interval` while waiting.
    pub fn with_poll_interval(path: impl AsRef<Path>, poll_interval: Duration) -> Result<Self> {
        let base = path.as_ref().to_path_buf();
        match fs::create_dir(&base) {
            Ok(()) => debug!(path = %base.display(), "created file store directory"),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && base.is_dir() => {
                debug!(path = %base.display(), "reusing file store directory")
            }
            Err(e) => return Err(e.into()),
        }
        Ok(Self {
            base,
            poll_interval,
            timeout: Timeout::default(),
        })
    }

    /// Bound `wait_default` by `timeout` instead of 30 seconds.
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base directory of this store
    pub fn path(&self) -> &Path {
        &self.base
    }

    /// Interval between readiness checks
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base.join(key))
    }
}

fn is_present(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "empty key"
    } else if key == "." || key == ".." {
        "relative path component"
    } else if key.contains(&['/', '\\', '\0'][..]) {
        "contains a path separator or NUL"
    } else if key.starts_with(TEMP_PREFIX) {
        "reserved for temporary files"
    } else {
        return Ok(());
    };
    debug!(key, reason, "rejected key");
    Err(Error::invalid_key(key, reason))
}

impl Store for FileStore {
    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.key_path(key)?;
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.base)?;
        file.write_all(value)?;
        file.flush()?;
        #[cfg(unix)]
        file.as_file()
            .set_permissions(fs::Permissions::from_mode(KEY_FILE_MODE))?;
        file.persist(&path).map_err(|e| e.error)?;
        trace!(key, len = value.len(), "published key");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.key_path(key)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::key_not_found(key),
            _ => Error::Io(e),
        })
    }

    fn wait(&self, keys: &[&str], timeout: Timeout) -> Result<()> {
        let paths = keys
            .iter()
            .map(|key| self.key_path(key))
            .collect::<Result<Vec<_>>>()?;
        let start = Instant::now();
        let mut logged = false;
        loop {
            let mut ready = true;
            for path in &paths {
                if !is_present(path)? {
                    ready = false;
                    break;
                }
            }
            if ready {
                return Ok(());
            }

            if let Timeout::After(limit) = timeout {
                if start.elapsed() > limit {
                    let mut missing = Vec::new();
                    for (key, path) in keys.iter().zip(&paths) {
                        if !is_present(path)? {
                            missing.push(key.to_string());
                        }
                    }
                    if missing.is_empty() {
                        return Ok(());
                    }
                    debug!(?missing, ?limit, path = %self.base.display(), "wait timed out");
                    return Err(Error::Timeout {
                        keys: missing,
                        timeout: limit,
                    });
                }
            }

            if !logged {
                trace!(?keys, ?timeout, path = %self.base.display(), "polling for key files");
                logged = true;
            }
            thread::sleep(self.poll_interval);
        }
    }

    fn default_timeout(&self) -> Timeout {
        self.timeout
    }
}
