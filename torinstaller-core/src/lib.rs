pub mod error;
pub mod settings;
pub mod version;
pub mod steam;
pub mod dialogs;
pub mod resolver;
pub mod github;
pub mod archive;
pub mod cleanup;
pub mod install;
pub mod launch;
pub mod logging;
pub mod orchestrator;

pub use error::{InstallerError, Result};
pub use settings::{InstallerSettings, SettingsStore};
pub use version::VersionMarker;
pub use steam::{validate_game_path, RegistryReader, SystemRegistry};
pub use dialogs::{Confirmer, PathPicker};
pub use resolver::{resolve_game_path, Resolution};
pub use github::{Downloader, GitHubReleases, ReleaseChecker, ReleaseRepo};
pub use archive::{ArchiveExtractor, ZipExtractor};
pub use cleanup::{clean_folder, clean_game_dir};
pub use install::{InstallKind, Installer};
pub use launch::{Launcher, SteamLauncher};
pub use logging::init_logging;
pub use orchestrator::{run, Collaborators, RunOptions, RunOutcome};
