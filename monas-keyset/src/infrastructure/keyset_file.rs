//! Reading and writing keyset bytes from files or the standard streams.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum KeysetFileError {
    #[error("input file does not exist: {}", .0.display())]
    InputMissing(PathBuf),

    #[error("input file is a directory: {}", .0.display())]
    InputIsDirectory(PathBuf),

    #[error("credential file does not exist: {}", .0.display())]
    CredentialMissing(PathBuf),

    #[error("credential file is a directory: {}", .0.display())]
    CredentialIsDirectory(PathBuf),

    #[error("output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl KeysetFileError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        KeysetFileError::Io {
            path: path.into(),
            source,
        }
    }
}

/// The input must exist and be a regular file.
pub fn validate_input(path: &Path) -> Result<(), KeysetFileError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(KeysetFileError::InputIsDirectory(path.to_path_buf())),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(KeysetFileError::InputMissing(path.to_path_buf()))
        }
        Err(e) => Err(KeysetFileError::io(path, e)),
    }
}

/// The credential must exist and be a regular file.
pub fn validate_credential(path: &Path) -> Result<(), KeysetFileError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            Err(KeysetFileError::CredentialIsDirectory(path.to_path_buf()))
        }
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(KeysetFileError::CredentialMissing(path.to_path_buf()))
        }
        Err(e) => Err(KeysetFileError::io(path, e)),
    }
}

/// The output must not exist yet.
pub fn validate_output(path: &Path) -> Result<(), KeysetFileError> {
    match fs::symlink_metadata(path) {
        Ok(_) => Err(KeysetFileError::OutputExists(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(KeysetFileError::io(path, e)),
    }
}

/// Reads all bytes from `path`, or from standard input when `path` is `None`.
pub fn read_input(path: Option<&Path>) -> Result<Vec<u8>, KeysetFileError> {
    let bytes = match path {
        Some(path) => fs::read(path).map_err(|e| KeysetFileError::io(path, e))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .map_err(|e| KeysetFileError::io("<stdin>", e))?;
            buf
        }
    };
    debug!(len = bytes.len(), from_stdin = path.is_none(), "read keyset input");
    Ok(bytes)
}

/// Writes `bytes` to `path`, or to standard output when `path` is `None`.
///
/// A file is first written to a temporary sibling and then moved into place
/// without replacing anything, so `path` either does not exist or holds the
/// complete output.
pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<(), KeysetFileError> {
    let Some(path) = path else {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(bytes)
            .and_then(|()| stdout.flush())
            .map_err(|e| KeysetFileError::io("<stdout>", e))?;
        return Ok(());
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| KeysetFileError::io(dir, e))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| KeysetFileError::io(tmp.path(), e))?;

    tmp.persist_noclobber(path).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            KeysetFileError::OutputExists(path.to_path_buf())
        } else {
            KeysetFileError::io(path, e.error)
        }
    })?;
    debug!(len = bytes.len(), path = %path.display(), "wrote keyset output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn input_checks() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("keyset.json");
        fs::write(&file, b"{}").unwrap();

        assert!(validate_input(&file).is_ok());
        assert!(matches!(
            validate_input(dir.path()),
            Err(KeysetFileError::InputIsDirectory(_))
        ));
        assert!(matches!(
            validate_input(&dir.path().join("missing")),
            Err(KeysetFileError::InputMissing(_))
        ));
    }

    #[test]
    fn credential_checks() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            validate_credential(&dir.path().join("creds.json")),
            Err(KeysetFileError::CredentialMissing(_))
        ));
        assert!(matches!(
            validate_credential(dir.path()),
            Err(KeysetFileError::CredentialIsDirectory(_))
        ));
    }

    #[test]
    fn write_then_read() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.bin");

        assert!(validate_output(&out).is_ok());
        write_output(Some(&out), b"\x01\x02\x03").unwrap();
        assert_eq!(read_input(Some(&out)).unwrap(), b"\x01\x02\x03");
        assert!(matches!(
            validate_output(&out),
            Err(KeysetFileError::OutputExists(_))
        ));
    }

    #[test]
    fn write_never_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.json");
        fs::write(&out, b"original").unwrap();

        let err = write_output(Some(&out), b"new").expect_err("must not clobber");
        assert!(matches!(err, KeysetFileError::OutputExists(_)));
        assert_eq!(fs::read(&out).unwrap(), b"original");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
