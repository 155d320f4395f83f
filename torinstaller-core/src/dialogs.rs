use std::path::PathBuf;

/// Blocking directory chooser. `None` means the user cancelled.
pub trait PathPicker {
    fn pick_folder(&self, title: &str) -> Option<PathBuf>;
}

/// Blocking yes/no question.
pub trait Confirmer {
    fn confirm(&self, title: &str, message: &str) -> bool;
}

pub const PICK_TITLE_FIRST: &str = "Couldn't autodetect the Among Us folder. \nPlease enter it manually.";
pub const PICK_TITLE_RETRY: &str =
    "The given folder doesn't contain a working Among Us installation. \nPlease try again.";

pub fn installed_prompt(version: &str) -> (&'static str, String) {
    (
        "Successfully installed",
        format!("The Other Roles {version} is successfully installed. \nStart the game now?"),
    )
}

pub fn up_to_date_prompt(version: &str) -> (&'static str, String) {
    (
        "Already up to date",
        format!("The latest Version ({version}) is already installed. \nStart the game now?"),
    )
}
