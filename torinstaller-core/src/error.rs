use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T, E = InstallerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to {url} failed with code {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("release metadata has no string `tag_name` field")]
    MissingTag,

    #[error("extracting {}: {source}", archive.display())]
    Archive {
        archive: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("registry: {0}")]
    Registry(String),

    #[error("game path is not valid Unicode: {}", .0.display())]
    NonUnicodePath(PathBuf),

    #[error("could not determine the per-user config directory")]
    NoConfigDir,

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl InstallerError {
    pub(crate) fn io(action: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io { action, path: path.as_ref().to_path_buf(), source }
    }
}

/// Read a file's raw bytes, mapping "not found" to `Ok(None)`.
pub(crate) fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(InstallerError::io("read", path, e)),
    }
}

/// Write `contents` to `path`, truncating, readable by the owner only.
pub(crate) fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    use std::io::Write;
    let mut opts = std::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(path).map_err(|e| InstallerError::io("open", path, e))?;
    file.write_all(contents).map_err(|e| InstallerError::io("write", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_optional(&dir.path().join("absent.txt")).unwrap().is_none());
    }

    #[test]
    fn write_private_truncates_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("f.txt");
        write_private(&p, b"a much longer value").unwrap();
        write_private(&p, b"short").unwrap();
        assert_eq!(read_optional(&p).unwrap().as_deref(), Some(&b"short"[..]));
    }

    #[cfg(unix)]
    #[test]
    fn write_private_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("f.txt");
        write_private(&p, b"x").unwrap();
        let mode = std::fs::metadata(&p).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
