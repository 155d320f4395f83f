#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

mod args;
mod dialogs;

use anyhow::Context;
use args::Args;
use clap::Parser;
use dialogs::NativeDialogs;
use std::process::ExitCode;
use torinstaller_core::{
	run, Collaborators, GitHubReleases, ReleaseRepo, RunOutcome, SettingsStore, SteamLauncher, SystemRegistry,
	ZipExtractor,
};
use tracing::{error, info};

fn main() -> ExitCode {
	let _log_guard = torinstaller_core::init_logging();
	let args = Args::parse();
	info!("torinstaller {}", env!("CARGO_PKG_VERSION"));

	match install(&args) {
		Ok(outcome) => {
			info!("finished: {:?}", outcome);
			ExitCode::SUCCESS
		}
		Err(e) => {
			let message = format!("{e:#}");
			error!("{}", message);
			dialogs::show_error(&message);
			ExitCode::FAILURE
		}
	}
}

fn install(args: &Args) -> anyhow::Result<RunOutcome> {
	let store = SettingsStore::new()?;
	info!("config file: {}", store.path().display());
	let github = GitHubReleases::new(ReleaseRepo::default()).context("setting up the HTTP client")?;
	let dialogs = NativeDialogs;
	let deps = Collaborators {
		registry: &SystemRegistry,
		picker: &dialogs,
		confirmer: &dialogs,
		releases: &github,
		downloader: &github,
		extractor: &ZipExtractor,
		launcher: &SteamLauncher,
		repo: github.repo(),
	};
	Ok(run(&args.run_options(), &store, &deps)?)
}
