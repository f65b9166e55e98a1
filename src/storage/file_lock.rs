use std::fs::{File, OpenOptions};
use std::io::Write;
use crate::core::error::{Error, ErrorKind, Result};
use crate::storage::layout::StorageLayout;

/// Exclusive hold on a store directory for the lifetime of an open store.
/// The lock file carries the holder's pid for diagnostics.
pub struct FileLock {
    file: File,
}

impl FileLock {
    pub fn acquire(storage: &StorageLayout) -> Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(storage.lock_path())?;

        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            use libc::{flock, LOCK_EX, LOCK_NB};

            // SAFETY: the descriptor belongs to `file`, which outlives the call.
            let rc = unsafe { flock(file.as_raw_fd(), LOCK_EX | LOCK_NB) };
            if rc != 0 {
                let cause = std::io::Error::last_os_error();
                let holder = std::fs::read_to_string(storage.lock_path()).unwrap_or_default();
                return Err(Error::new(
                    ErrorKind::Io,
                    format!(
                        "Store at {} is locked by another process (pid {}): {}",
                        storage.base_dir.display(),
                        holder.trim(),
                        cause,
                    ),
                ));
            }
        }

        file.set_len(0)?;
        write!(file, "{}", std::process::id())?;
        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.set_len(0);

        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            use libc::{flock, LOCK_UN};

            // SAFETY: the descriptor is still owned by `self.file`.
            unsafe {
                flock(self.file.as_raw_fd(), LOCK_UN);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageLayout::new(dir.path().to_path_buf()).unwrap();

        let held = FileLock::acquire(&storage).unwrap();
        let err = FileLock::acquire(&storage).err().unwrap();
        assert_eq!(err.kind, ErrorKind::Io);
        assert!(err.context.contains(&std::process::id().to_string()));

        drop(held);
        assert!(FileLock::acquire(&storage).is_ok());
    }
}
