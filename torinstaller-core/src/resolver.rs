use crate::dialogs::{PathPicker, PICK_TITLE_FIRST, PICK_TITLE_RETRY};
use crate::error::Result;
use crate::steam::{locate_game_in_steam, validate_game_path, RegistryReader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(PathBuf),
    /// The user closed the manual picker.
    Cancelled,
}

/// Where a resolved path came from; only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    CommandLine,
    Config,
    Steam,
    Manual,
}

/// Resolve the game directory: command line, saved config, Steam detection,
/// then the manual picker until a valid folder is chosen or the user cancels.
pub fn resolve_game_path(
    cli_path: Option<&Path>,
    saved_path: Option<&str>,
    registry: &dyn RegistryReader,
    picker: &dyn PathPicker,
) -> Resolution {
    let found = |path: PathBuf, source: Source| {
        info!("using game directory {} ({:?})", path.display(), source);
        Resolution::Found(path)
    };

    if let Some(p) = cli_path {
        if validate_game_path(p) {
            return found(p.to_path_buf(), Source::CommandLine);
        }
        warn!("--gamePath {} has no game executable, ignoring", p.display());
    }
    if let Some(p) = saved_path.map(Path::new) {
        if validate_game_path(p) {
            return found(p.to_path_buf(), Source::Config);
        }
    }
    match detect_via_steam(registry) {
        Ok(p) => return found(p, Source::Steam),
        Err(e) => warn!("{e}"),
    }
    match pick_until_valid(picker) {
        Some(p) => found(p, Source::Manual),
        None => Resolution::Cancelled,
    }
}

fn detect_via_steam(registry: &dyn RegistryReader) -> Result<PathBuf> {
    let root = registry.steam_install_root()?;
    locate_game_in_steam(&root)
}

fn pick_until_valid(picker: &dyn PathPicker) -> Option<PathBuf> {
    let mut dir = picker.pick_folder(PICK_TITLE_FIRST)?;
    while !validate_game_path(&dir) {
        dir = picker.pick_folder(PICK_TITLE_RETRY)?;
    }
    Some(dir)
}
