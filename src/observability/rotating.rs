//! Append-only line file with numbered backups.
//!
//! When the file grows past its size limit it is renamed to `<name>.1`, older
//! backups shift up by one (`.1` → `.2`, ...) and the oldest beyond the
//! retention count is removed. Writing then continues in a fresh file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Size limit of the live file (8 MiB).
const MAX_BYTES: u64 = 8 * 1024 * 1024;

/// Number of backups kept.
const KEEP_BACKUPS: usize = 3;

/// Line-oriented file writer with size-based rotation.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    keep: usize,
    file: Mutex<Option<File>>,
}

impl RotatingFile {
    /// Writer for `path` with the default limits.
    pub const fn new(path: PathBuf) -> Self {
        Self::with_limits(path, MAX_BYTES, KEEP_BACKUPS)
    }

    /// Writer for `path` rotating past `max_bytes` and keeping `keep` backups.
    pub const fn with_limits(path: PathBuf, max_bytes: u64, keep: usize) -> Self {
        Self {
            path,
            max_bytes,
            keep,
            file: Mutex::new(None),
        }
    }

    /// Path of the live file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of backup number `n` (1 is the most recent).
    pub fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    /// Appends `line` and a newline, rotating first if the file is full.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if rotating, opening or writing fails.
    pub fn append_line(&self, line: &str) -> io::Result<()> {
        let mut slot = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "trace file lock poisoned"))?;

        let full = fs::metadata(&self.path).is_ok_and(|meta| meta.len() >= self.max_bytes);
        if full {
            *slot = None;
            self.rotate()?;
        }

        if slot.is_none() {
            *slot = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        if let Some(file) = slot.as_mut() {
            writeln!(file, "{line}")?;
            file.flush()?;
        }
        Ok(())
    }

    fn rotate(&self) -> io::Result<()> {
        if self.keep == 0 {
            return fs::remove_file(&self.path);
        }

        let oldest = self.backup_path(self.keep);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.keep).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("keep", &self.keep)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_into_numbered_backups() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFile::with_limits(dir.path().join("trace.json"), 8, 2);

        for line in ["first-line", "second-line", "third-line", "fourth-line"] {
            writer.append_line(line).unwrap();
        }

        let read = |path: PathBuf| fs::read_to_string(path).unwrap();
        assert_eq!(read(writer.path().to_path_buf()), "fourth-line\n");
        assert_eq!(read(writer.backup_path(1)), "third-line\n");
        assert_eq!(read(writer.backup_path(2)), "second-line\n");
        assert!(!writer.backup_path(3).exists());
    }

    #[test]
    fn appends_below_limit() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFile::with_limits(dir.path().join("trace.json"), 1024, 1);

        writer.append_line("a").unwrap();
        writer.append_line("b").unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "a\nb\n");
        assert!(!writer.backup_path(1).exists());
    }
}
