use crate::error::{InstallerError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Top-level game entries that survive a fresh install.
pub const GAME_DIR_KEEP: &[&str] = &[
    "Among Us_Data",
    "BepInEx",
    "Among Us.exe",
    "baselib.dll",
    "GameAssembly.dll",
    "UnityCrashHandler32.exe",
    "UnityPlayer.dll",
    "version.txt",
];

pub const BEPINEX_DIR: &str = "BepInEx";

/// Entries inside `BepInEx` that survive; the loader's own settings live in `config`.
pub const BEPINEX_KEEP: &[&str] = &["config"];

/// Remove every immediate child of `dir` whose name is not in `keep`.
/// Returns the removed paths.
pub fn clean_folder(dir: &Path, keep: &[&str]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| InstallerError::io("list", dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| InstallerError::io("list", dir, e))?;
        let name = entry.file_name();
        if keep.iter().any(|k| name.to_str() == Some(*k)) {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| InstallerError::io("inspect", &path, e))?;
        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| InstallerError::io("remove", &path, e))?;
        } else {
            fs::remove_file(&path).map_err(|e| InstallerError::io("remove", &path, e))?;
        }
        debug!("removed {}", path.display());
        removed.push(path);
    }
    Ok(removed)
}

/// Strip a game directory back to the vanilla files before a fresh install.
pub fn clean_game_dir(game_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = clean_folder(game_dir, GAME_DIR_KEEP)?;
    let bepinex = game_dir.join(BEPINEX_DIR);
    if bepinex.is_dir() {
        removed.extend(clean_folder(&bepinex, BEPINEX_KEEP)?);
    }
    info!("cleanup removed {} entries from {}", removed.len(), game_dir.display());
    Ok(removed)
}
