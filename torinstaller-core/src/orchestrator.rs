use crate::archive::ArchiveExtractor;
use crate::dialogs::{installed_prompt, up_to_date_prompt, Confirmer, PathPicker};
use crate::error::Result;
use crate::github::{Downloader, ReleaseChecker, ReleaseRepo};
use crate::install::{InstallKind, Installer};
use crate::launch::Launcher;
use crate::resolver::{resolve_game_path, Resolution};
use crate::settings::SettingsStore;
use crate::steam::RegistryReader;
use crate::version::VersionMarker;
use std::path::PathBuf;
use tracing::info;

/// What the user asked for on the command line this run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// `Some` only when `--autostart` was passed explicitly.
    pub autostart: Option<bool>,
    pub game_path: Option<PathBuf>,
}

/// Every OS and network dependency of a run, built once in `main`.
pub struct Collaborators<'a> {
    pub registry: &'a dyn RegistryReader,
    pub picker: &'a dyn PathPicker,
    pub confirmer: &'a dyn Confirmer,
    pub releases: &'a dyn ReleaseChecker,
    pub downloader: &'a dyn Downloader,
    pub extractor: &'a dyn ArchiveExtractor,
    pub launcher: &'a dyn Launcher,
    pub repo: &'a ReleaseRepo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Installed { version: String, kind: InstallKind },
    AlreadyCurrent { version: String },
    /// The manual folder picker was closed; nothing else happened.
    Cancelled,
}

/// One full run: load config, resolve the game, compare versions, install if
/// stale, offer to launch, then save config.
pub fn run(opts: &RunOptions, store: &SettingsStore, deps: &Collaborators<'_>) -> Result<RunOutcome> {
    let mut settings = store.load()?;

    let game_dir = match resolve_game_path(
        opts.game_path.as_deref(),
        settings.game_path.as_deref(),
        deps.registry,
        deps.picker,
    ) {
        Resolution::Found(dir) => dir,
        Resolution::Cancelled => {
            info!("folder selection cancelled");
            return Ok(RunOutcome::Cancelled);
        }
    };
    let autostart = opts.autostart.or(settings.autostart).unwrap_or(false);

    let latest = deps.releases.latest_tag()?;
    info!("latest release is {}", latest);
    let installed = VersionMarker::in_game_dir(&game_dir).read()?;

    let outcome = match installed {
        Some(current) if current == latest.as_bytes() => {
            info!("{} is already installed", latest);
            offer_launch(autostart, up_to_date_prompt(&latest), deps);
            RunOutcome::AlreadyCurrent { version: latest }
        }
        other => {
            let kind = if other.is_none() { InstallKind::Fresh } else { InstallKind::Upgrade };
            let installer = Installer { repo: deps.repo, downloader: deps.downloader, extractor: deps.extractor };
            installer.install(&game_dir, &latest, kind)?;
            offer_launch(autostart, installed_prompt(&latest), deps);
            RunOutcome::Installed { version: latest, kind }
        }
    };

    settings.record_run(opts.autostart, &game_dir)?;
    store.save(&settings)?;
    Ok(outcome)
}

fn offer_launch(autostart: bool, (title, message): (&str, String), deps: &Collaborators<'_>) {
    if autostart || deps.confirmer.confirm(title, &message) {
        deps.launcher.launch();
    }
}
