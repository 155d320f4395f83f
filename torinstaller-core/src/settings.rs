use crate::error::{read_optional, write_private, InstallerError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerSettings {
    #[serde(rename = "Autostart", default, skip_serializing_if = "Option::is_none")]
    pub autostart: Option<bool>,
    #[serde(rename = "GamePath", default, skip_serializing_if = "Option::is_none")]
    pub game_path: Option<String>,
}

impl InstallerSettings {
    /// Fold this run's choices into the stored preferences. An explicit
    /// `--autostart` always wins; the game path is always replaced.
    pub fn record_run(&mut self, autostart_flag: Option<bool>, game_path: &Path) -> Result<()> {
        let path = game_path
            .to_str()
            .ok_or_else(|| InstallerError::NonUnicodePath(game_path.to_path_buf()))?;
        if let Some(flag) = autostart_flag {
            self.autostart = Some(flag);
        }
        self.game_path = Some(path.to_owned());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store rooted at the per-user config directory
    /// (`%APPDATA%\Mo\the other roles installer\config.json` on Windows).
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "Mo", "the other roles installer")
            .ok_or(InstallerError::NoConfigDir)?;
        Ok(Self { path: settings_file(dirs.config_dir(), cfg!(windows)) })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<InstallerSettings> {
        let Some(bytes) = read_optional(&self.path)? else {
            debug!("no config at {}, using defaults", self.path.display());
            return Ok(InstallerSettings::default());
        };
        serde_json::from_slice(&bytes).map_err(|source| InstallerError::Json {
            context: self.path.display().to_string(),
            source,
        })
    }

    pub fn save(&self, settings: &InstallerSettings) -> Result<()> {
        let text = serde_json::to_vec(settings).map_err(|source| InstallerError::Json {
            context: "settings".into(),
            source,
        })?;
        if let Some(parent) = self.path.parent() {
            create_private_dir(parent)?;
        }
        write_private(&self.path, &text)?;
        debug!("saved config to {}", self.path.display());
        Ok(())
    }
}

const SETTINGS_FILE: &str = "config.json";

// On Windows `ProjectDirs::config_dir` ends in an extra `config` folder; the
// file lives directly in the project folder there.
fn settings_file(project_config_dir: &Path, roaming_layout: bool) -> PathBuf {
    let dir = match project_config_dir.parent() {
        Some(parent) if roaming_layout && project_config_dir.ends_with("config") => parent,
        _ => project_config_dir,
    };
    dir.join(SETTINGS_FILE)
}

fn create_private_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(|e| InstallerError::io("create directory", dir, e))
}
