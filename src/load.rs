//! Loading bencoded files from disk.
//!
//! The file is read into a single shared buffer and decoded with
//! [`decode_shared`], so the returned tree owns its byte strings without a
//! second copy of the payloads.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

use crate::bencode::{decode_shared, DecodeError, DecodeOptions, OwnedValue};

/// Errors that can occur when loading a bencoded file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file contents are not valid bencode.
    #[error("failed to decode {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

impl LoadError {
    /// Returns the decode error, if the file was read but failed to decode.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            LoadError::Decode { source, .. } => Some(source),
            LoadError::Io { .. } => None,
        }
    }
}

/// Reads and decodes the bencoded file at `path`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read and
/// [`LoadError::Decode`] if its contents are not a single valid value.
///
/// # Examples
///
/// ```no_run
/// use bdecode::bencode::DecodeOptions;
/// use bdecode::load::load_file;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let torrent = load_file("example.torrent", &DecodeOptions::default())?;
/// println!("{:#}", torrent);
/// # Ok(())
/// # }
/// ```
pub fn load_file(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<OwnedValue, LoadError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), size = data.len(), "loaded bencoded file");

    decode_shared(&Bytes::from(data), options).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bencode::{ErrorKind, Value};
    use tempfile::TempDir;

    #[test]
    fn test_load_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.torrent");
        std::fs::write(&path, b"d4:infod4:name4:test12:piece lengthi16384eee").unwrap();

        let value = load_file(&path, &DecodeOptions::default()).unwrap();
        let info = value.get(b"info").unwrap();
        assert_eq!(info.get(b"name").and_then(Value::as_str), Some("test"));
        assert_eq!(
            info.get(b"piece length").and_then(Value::as_integer),
            Some(16384)
        );
        assert!(!value.is_borrowed());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_file(temp.path().join("missing"), &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.decode_error().is_none());
    }

    #[test]
    fn test_load_invalid_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.torrent");
        std::fs::write(&path, b"d4:name5:cream").unwrap();

        let err = load_file(&path, &DecodeOptions::default()).unwrap_err();
        assert_eq!(
            err.decode_error().map(|e| e.kind()),
            Some(ErrorKind::UnterminatedDictionary)
        );
        assert!(err.to_string().contains("broken.torrent"), "{}", err);
    }

    #[test]
    fn test_load_error_source_chain() {
        use std::error::Error as _;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.torrent");
        std::fs::write(&path, b"").unwrap();

        let err = load_file(&path, &DecodeOptions::default()).unwrap_err();
        assert!(!err.to_string().contains("empty input"), "{}", err);
        let source = err.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.starts_with("empty input at byte 0"), "{}", source);
    }
}
