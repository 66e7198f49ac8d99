//! Reload checksums: the first 12 hex characters of a file's SHA-256
//! digest (spec.md §4.9), or a status tag when the file is missing or
//! unreadable.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::types::ArtifactStatus;

/// Computes the checksum12 status for `path`: `Checksum(hex12)` on
/// success, `Missing` if the file does not exist, `Error(reason)` for
/// any other I/O failure.
pub fn checksum_status(path: &Path) -> ArtifactStatus {
    if !path.exists() {
        return ArtifactStatus::Missing;
    }
    match std::fs::read(path) {
        Ok(bytes) => {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            let digest = hex::encode(hasher.finalize());
            ArtifactStatus::Checksum(digest[..12].to_string())
        }
        Err(e) => ArtifactStatus::Error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn checksum_is_twelve_hex_chars() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"hello").unwrap();
        match checksum_status(f.path()) {
            ArtifactStatus::Checksum(s) => assert_eq!(s.len(), 12),
            other => panic!("expected checksum, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_reports_missing() {
        assert_eq!(
            checksum_status(Path::new("/nonexistent/file/path.json")),
            ArtifactStatus::Missing
        );
    }

    #[test]
    fn same_contents_produce_same_checksum() {
        let mut f1 = NamedTempFile::new().unwrap();
        f1.write_all(b"same content").unwrap();
        let mut f2 = NamedTempFile::new().unwrap();
        f2.write_all(b"same content").unwrap();
        assert_eq!(checksum_status(f1.path()), checksum_status(f2.path()));
    }
}
