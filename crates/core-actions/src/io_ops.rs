//! File collaborator: open, read and write the edited file.
//!
//! The file is opened once at startup and kept open for the whole session.
//! A read-write open refused for permissions falls back to read-only; every
//! save rewinds, writes the full document and truncates to its length.

use core_state::Access;
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("{}: no such file", .path.display())]
    NotFound { path: PathBuf },
    #[error("{}: not a regular file", .path.display())]
    NotRegularFile { path: PathBuf },
    #[error("{}: permission denied", .path.display())]
    PermissionDenied { path: PathBuf },
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: u64, actual: u64 },
    #[error("{source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    fn from_open(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            ErrorKind::NotFound => FileError::NotFound { path },
            ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            _ => FileError::Io { path, source },
        }
    }
}

/// Destination for a serialized document.
pub trait DocumentSink {
    fn write_document(&mut self, bytes: &[u8]) -> Result<(), FileError>;
}

/// The open file being edited.
#[derive(Debug)]
pub struct EditFile {
    file: File,
    path: PathBuf,
    access: Access,
    len: u64,
}

/// Open `path` for editing, falling back to read-only when writes are refused.
pub fn open_for_edit(path: &Path) -> Result<EditFile, FileError> {
    let meta = std::fs::metadata(path).map_err(|e| FileError::from_open(path, e))?;
    if !meta.is_file() {
        return Err(FileError::NotRegularFile {
            path: path.to_path_buf(),
        });
    }
    let (file, access) = match OpenOptions::new().read(true).write(true).open(path) {
        Ok(f) => (f, Access::ReadWrite),
        Err(e) if matches!(e.kind(), ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem) => {
            tracing::warn!(target: "io", path = %path.display(), error = %e, "open_read_only_fallback");
            let f = File::open(path).map_err(|e| FileError::from_open(path, e))?;
            (f, Access::ReadOnly)
        }
        Err(e) => return Err(FileError::from_open(path, e)),
    };
    tracing::info!(target: "io", path = %path.display(), bytes = meta.len(), ?access, "file_opened");
    Ok(EditFile {
        file,
        path: path.to_path_buf(),
        access,
        len: meta.len(),
    })
}

impl EditFile {
    pub fn access(&self) -> Access {
        self.access
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size reported when the file was opened.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the whole file from the start.
    pub fn read_all(&mut self) -> Result<Vec<u8>, FileError> {
        let mut buf = Vec::with_capacity(self.len as usize);
        self.file
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.file.read_to_end(&mut buf))
            .map_err(|source| FileError::Io {
                path: self.path.clone(),
                source,
            })?;
        let actual = buf.len() as u64;
        if actual < self.len {
            return Err(FileError::ShortRead {
                expected: self.len,
                actual,
            });
        }
        Ok(buf)
    }

    /// Replace the file's contents with `bytes`.
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), FileError> {
        if matches!(self.access, Access::ReadOnly) {
            return Err(FileError::WriteFailed {
                path: self.path.clone(),
                source: io::Error::from(ErrorKind::PermissionDenied),
            });
        }
        let file = &mut self.file;
        let res = file
            .seek(SeekFrom::Start(0))
            .and_then(|_| file.write_all(bytes))
            .and_then(|_| file.set_len(bytes.len() as u64))
            .and_then(|_| file.flush());
        match res {
            Ok(()) => {
                self.len = bytes.len() as u64;
                Ok(())
            }
            Err(source) => {
                tracing::error!(target: "io", path = %self.path.display(), error = %source, "file_write_error");
                Err(FileError::WriteFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }
}

impl DocumentSink for EditFile {
    fn write_document(&mut self, bytes: &[u8]) -> Result<(), FileError> {
        self.write_all(bytes)
    }
}

/// In-memory sink recording every write; optionally fails each one.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub writes: Vec<Vec<u8>>,
    pub fail_with: Option<ErrorKind>,
}

impl MemorySink {
    pub fn failing(kind: ErrorKind) -> Self {
        Self {
            writes: Vec::new(),
            fail_with: Some(kind),
        }
    }

    pub fn last(&self) -> Option<&[u8]> {
        self.writes.last().map(Vec::as_slice)
    }
}

impl DocumentSink for MemorySink {
    fn write_document(&mut self, bytes: &[u8]) -> Result<(), FileError> {
        if let Some(kind) = self.fail_with {
            return Err(FileError::WriteFailed {
                path: PathBuf::from("<memory>"),
                source: io::Error::from(kind),
            });
        }
        self.writes.push(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tmp(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn open_and_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tmp(&dir, "a.txt", b"ab\ncd\n");
        let mut f = open_for_edit(&path).unwrap();
        assert_eq!(f.access(), Access::ReadWrite);
        assert_eq!(f.len(), 6);
        assert_eq!(f.read_all().unwrap(), b"ab\ncd\n");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_for_edit(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, FileError::NotFound { .. }), "{err:?}");
        assert!(err.to_string().ends_with("nope.txt: no such file"));
    }

    #[test]
    fn file_shrunk_after_open_is_short_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tmp(&dir, "s.txt", b"abc\nde\n");
        let mut f = open_for_edit(&path).unwrap();
        OpenOptions::new()
            .write(true)
            .open(&path)
            .unwrap()
            .set_len(2)
            .unwrap();
        let err = f.read_all().unwrap_err();
        assert!(
            matches!(err, FileError::ShortRead { expected: 7, actual: 2 }),
            "{err:?}"
        );
    }

    #[test]
    fn directory_is_not_regular() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_for_edit(dir.path()).unwrap_err();
        assert!(matches!(err, FileError::NotRegularFile { .. }), "{err:?}");
    }

    #[test]
    fn write_truncates_longer_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_tmp(&dir, "t.txt", b"a much longer original\n");
        let mut f = open_for_edit(&path).unwrap();
        f.write_all(b"short\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"short\n");
        assert_eq!(f.len(), 6);
        f.write_all(b"longer again\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"longer again\n");
    }

    #[cfg(unix)]
    #[test]
    fn read_only_permissions_fall_back() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = write_tmp(&dir, "ro.txt", b"x\n");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o444)).unwrap();
        let mut f = open_for_edit(&path).unwrap();
        // Root ignores mode bits; only assert the fallback when it applied.
        if f.access() == Access::ReadOnly {
            assert_eq!(f.read_all().unwrap(), b"x\n");
            let err = f.write_all(b"y\n").unwrap_err();
            assert!(matches!(err, FileError::WriteFailed { .. }));
            assert_eq!(std::fs::read(&path).unwrap(), b"x\n");
        }
    }

    #[test]
    fn memory_sink_records_or_fails() {
        let mut ok = MemorySink::default();
        ok.write_document(b"a\n").unwrap();
        assert_eq!(ok.last(), Some(&b"a\n"[..]));

        let mut bad = MemorySink::failing(ErrorKind::StorageFull);
        assert!(bad.write_document(b"a\n").is_err());
        assert!(bad.writes.is_empty());
    }
}
