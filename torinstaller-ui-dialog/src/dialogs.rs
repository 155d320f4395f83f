use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::path::PathBuf;
use torinstaller_core::{Confirmer, PathPicker};

/// Native modal dialogs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDialogs;

impl PathPicker for NativeDialogs {
	fn pick_folder(&self, title: &str) -> Option<PathBuf> {
		FileDialog::new().set_title(title).pick_folder()
	}
}

impl Confirmer for NativeDialogs {
	fn confirm(&self, title: &str, message: &str) -> bool {
		let answer = MessageDialog::new()
			.set_level(MessageLevel::Info)
			.set_title(title)
			.set_description(message)
			.set_buttons(MessageButtons::YesNo)
			.show();
		matches!(answer, MessageDialogResult::Yes)
	}
}

pub fn show_error(message: &str) {
	let _ = MessageDialog::new()
		.set_level(MessageLevel::Error)
		.set_title("Error")
		.set_description(message)
		.set_buttons(MessageButtons::Ok)
		.show();
}
