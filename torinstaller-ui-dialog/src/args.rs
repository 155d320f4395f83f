use clap::Parser;
use std::path::PathBuf;

/// Installs or updates The Other Roles for Among Us.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "torinstaller", version, about)]
pub struct Args {
	/// Start the game automatically on success; remembered for later runs
	#[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
	pub autostart: Option<bool>,

	/// Path to the game, overriding detection
	#[arg(long = "gamePath", value_name = "DIR")]
	pub game_path: Option<PathBuf>,
}

impl Args {
	pub fn run_options(&self) -> torinstaller_core::RunOptions {
		torinstaller_core::RunOptions { autostart: self.autostart, game_path: self.game_path.clone() }
	}
}
