use crate::archive::ArchiveExtractor;
use crate::cleanup::clean_game_dir;
use crate::error::{InstallerError, Result};
use crate::github::{Downloader, ReleaseRepo};
use crate::version::VersionMarker;
use std::fs;
use std::path::Path;
use tracing::info;

/// Whether the game directory gets stripped before the new release is unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallKind {
    /// No `version.txt` yet: clean, then install.
    Fresh,
    /// A different version is present: unpack over it as-is.
    Upgrade,
}

pub struct Installer<'a> {
    pub repo: &'a ReleaseRepo,
    pub downloader: &'a dyn Downloader,
    pub extractor: &'a dyn ArchiveExtractor,
}

impl Installer<'_> {
    /// Bring `game_dir` up to `version`. Each step must succeed before the next
    /// runs; a failure leaves the directory as the failing step left it.
    pub fn install(&self, game_dir: &Path, version: &str, kind: InstallKind) -> Result<()> {
        info!("Installing {} into {} ({:?})", version, game_dir.display(), kind);
        if kind == InstallKind::Fresh {
            clean_game_dir(game_dir)?;
        }

        let archive = game_dir.join(self.repo.archive_file_name(version));
        self.downloader.download(&self.repo.asset_url(version), &archive)?;
        self.extractor.extract(&archive, game_dir)?;
        fs::remove_file(&archive).map_err(|e| InstallerError::io("remove", &archive, e))?;

        VersionMarker::in_game_dir(game_dir).write(version)?;
        info!("The Other Roles {} installed", version);
        Ok(())
    }
}
