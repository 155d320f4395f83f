use crate::error::{read_optional, write_private, Result};
use std::path::{Path, PathBuf};

pub const VERSION_FILE: &str = "version.txt";

/// The `version.txt` marker recording which release is installed in a game directory.
#[derive(Debug, Clone)]
pub struct VersionMarker {
    path: PathBuf,
}

impl VersionMarker {
    pub fn in_game_dir(game_dir: &Path) -> Self {
        Self { path: game_dir.join(VERSION_FILE) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw marker contents; `None` when nothing was ever installed by this tool.
    /// Bytes that are not UTF-8 simply never match a release tag.
    pub fn read(&self) -> Result<Option<Vec<u8>>> {
        read_optional(&self.path)
    }

    pub fn write(&self, tag: &str) -> Result<()> {
        write_private(&self.path, tag.as_bytes())
    }
}
