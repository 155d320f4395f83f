use crate::error::{InstallerError, Result};
use std::fs::{self, File};
use std::path::Path;
use tracing::{info, warn};
use zip::ZipArchive;

/// Unpacks an archive on disk into a directory, overwriting existing files.
pub trait ArchiveExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        let zip_err = |source: zip::result::ZipError| InstallerError::Archive { archive: archive.to_path_buf(), source };
        let file = File::open(archive).map_err(|e| InstallerError::io("open", archive, e))?;
        let mut zip = ZipArchive::new(file).map_err(zip_err)?;
        let total = zip.len();
        info!("Extracting {} entries into {}", total, dest.display());

        for i in 0..total {
            let mut entry = zip.by_index(i).map_err(zip_err)?;
            let Some(rel) = entry.enclosed_name().map(Path::to_path_buf) else {
                warn!("skipping archive entry outside the target: {}", entry.name());
                continue;
            };
            let outpath = dest.join(rel);
            if entry.is_dir() {
                fs::create_dir_all(&outpath).map_err(|e| InstallerError::io("create directory", &outpath, e))?;
                continue;
            }
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent).map_err(|e| InstallerError::io("create directory", parent, e))?;
            }
            let mut out = File::create(&outpath).map_err(|e| InstallerError::io("create", &outpath, e))?;
            std::io::copy(&mut entry, &mut out).map_err(|e| InstallerError::io("extract", &outpath, e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;

    /// Build a stored (uncompressed) zip with the given entries; names ending in
    /// `/` become directories.
    pub(crate) fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        let opts = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, data) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, opts).unwrap();
            } else {
                zip.start_file(*name, opts).unwrap();
                zip.write_all(data.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn extracts_nested_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("mod.zip");
        write_zip(&archive, &[
            ("BepInEx/", ""),
            ("BepInEx/plugins/TheOtherRoles.dll", "dll"),
            ("winhttp.dll", "proxy"),
        ]);
        let dest = tmp.path().join("game");
        fs::create_dir_all(&dest).unwrap();

        ZipExtractor.extract(&archive, &dest).unwrap();

        assert_eq!(fs::read(dest.join("BepInEx/plugins/TheOtherRoles.dll")).unwrap(), b"dll");
        assert_eq!(fs::read(dest.join("winhttp.dll")).unwrap(), b"proxy");
    }

    #[test]
    fn overwrites_existing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("mod.zip");
        write_zip(&archive, &[("winhttp.dll", "new")]);
        fs::write(tmp.path().join("winhttp.dll"), b"old and longer").unwrap();

        ZipExtractor.extract(&archive, tmp.path()).unwrap();

        assert_eq!(fs::read(tmp.path().join("winhttp.dll")).unwrap(), b"new");
    }

    #[test]
    fn skips_entries_escaping_the_target() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("evil.zip");
        write_zip(&archive, &[("../escaped.txt", "x"), ("ok.txt", "y")]);
        let dest = tmp.path().join("game");
        fs::create_dir_all(&dest).unwrap();

        ZipExtractor.extract(&archive, &dest).unwrap();

        assert!(!tmp.path().join("escaped.txt").exists());
        assert!(dest.join("ok.txt").exists());
    }

    #[test]
    fn corrupt_archive_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("broken.zip");
        fs::write(&archive, b"<html>Not Found</html>").unwrap();
        let err = ZipExtractor.extract(&archive, tmp.path()).unwrap_err();
        assert!(matches!(err, InstallerError::Archive { .. }));
    }
}
