use crate::steam::STEAM_APP_ID;
use std::process::Command;
use tracing::{info, warn};

/// Starts the game without waiting on it.
pub trait Launcher {
    fn launch(&self);
}

pub fn steam_run_url() -> String {
    format!("steam://rungameid/{STEAM_APP_ID}")
}

/// Hands the `steam://` URL to the platform's handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SteamLauncher;

#[cfg(windows)]
fn launch_command(url: &str) -> Command {
    let mut cmd = Command::new("rundll32");
    cmd.args(["url.dll,FileProtocolHandler", url]);
    cmd
}

#[cfg(not(windows))]
fn launch_command(url: &str) -> Command {
    let program = match which::which("steam") {
        Ok(steam) => steam,
        Err(_) if cfg!(target_os = "macos") => "open".into(),
        Err(_) => "xdg-open".into(),
    };
    let mut cmd = Command::new(program);
    cmd.arg(url);
    cmd
}

impl Launcher for SteamLauncher {
    fn launch(&self) {
        let url = steam_run_url();
        info!("Starting game via {}", url);
        if let Err(e) = launch_command(&url).spawn() {
            warn!("could not start the game: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_url_targets_among_us() {
        assert_eq!(steam_run_url(), "steam://rungameid/945360");
    }

    #[test]
    fn command_passes_the_url() {
        let cmd = launch_command("steam://rungameid/945360");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args.last().map(String::as_str), Some("steam://rungameid/945360"));
    }
}
