use crate::error::{InstallerError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const GAME_EXECUTABLE: &str = "Among Us.exe";
pub const GAME_INSTALL_FOLDER: &str = "Among Us";
pub const STEAM_APP_ID: u32 = 945360;

/// A directory holds the game iff the executable sits directly inside it.
pub fn validate_game_path(dir: &Path) -> bool {
    !dir.as_os_str().is_empty() && dir.join(GAME_EXECUTABLE).is_file()
}

/// Source of the Steam client's install root.
pub trait RegistryReader {
    fn steam_install_root(&self) -> Result<PathBuf>;
}

/// Reads `InstallPath` under `HKLM\SOFTWARE\WOW6432Node\Valve\Steam`, then the native view.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRegistry;

#[cfg(windows)]
impl RegistryReader for SystemRegistry {
    fn steam_install_root(&self) -> Result<PathBuf> {
        use windows::core::w;
        use windows::Win32::Foundation::ERROR_SUCCESS;
        use windows::Win32::System::Registry::{RegGetValueW, HKEY_LOCAL_MACHINE, RRF_RT_REG_SZ};

        let keys = [
            (w!("SOFTWARE\\WOW6432Node\\Valve\\Steam"), "SOFTWARE\\WOW6432Node\\Valve\\Steam"),
            (w!("SOFTWARE\\Valve\\Steam"), "SOFTWARE\\Valve\\Steam"),
        ];
        let mut last = String::from("Steam registry key not found");
        for (key, key_name) in keys {
            let mut buf = [0u16; 1024];
            let mut len = (buf.len() * std::mem::size_of::<u16>()) as u32;
            let status = unsafe {
                RegGetValueW(
                    HKEY_LOCAL_MACHINE,
                    key,
                    w!("InstallPath"),
                    RRF_RT_REG_SZ,
                    None,
                    Some(buf.as_mut_ptr().cast::<core::ffi::c_void>()),
                    Some(&mut len as *mut u32),
                )
            };
            if status != ERROR_SUCCESS {
                last = format!("HKLM\\{key_name}\\InstallPath: error {}", status.0);
                debug!("{}", last);
                continue;
            }
            let chars = (len as usize / 2).min(buf.len());
            let value = String::from_utf16_lossy(&buf[..chars]);
            return Ok(PathBuf::from(value.trim_end_matches('\0')));
        }
        Err(InstallerError::Registry(last))
    }
}

/// Hosts without a registry: look for a Steam root in the usual home locations.
#[cfg(not(windows))]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRegistry;

#[cfg(not(windows))]
impl RegistryReader for SystemRegistry {
    fn steam_install_root(&self) -> Result<PathBuf> {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| InstallerError::Registry("HOME is not set".into()))?;
        [
            home.join(".local/share/Steam"),
            home.join(".steam/steam"),
            home.join(".var/app/com.valvesoftware.Steam/.local/share/Steam"),
        ]
        .into_iter()
        .find(|root| root.join("steamapps").is_dir())
        .ok_or_else(|| InstallerError::Registry("no Steam installation found".into()))
    }
}

/// Library roots listed in `steamapps/libraryfolders.vdf`.
///
/// Handles the old `"1" "D:\\SteamLibrary"` layout as well as the newer nested
/// blocks carrying a `"path"` entry.
pub fn parse_library_folders(text: &str) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    for line in text.lines() {
        let tokens = quoted_tokens(line.trim());
        let [key, value] = tokens.as_slice() else { continue };
        let is_library = key == "path" || (!key.is_empty() && key.chars().all(|c| c.is_ascii_digit()));
        if !is_library {
            continue;
        }
        let p = PathBuf::from(value);
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

// Splits `"a" "b\\c"` into its unescaped quoted strings.
fn quoted_tokens(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c != '"' {
            continue;
        }
        let mut tok = String::new();
        while let Some(c) = chars.next() {
            match c {
                '"' => break,
                '\\' => match chars.next() {
                    Some('n') => tok.push('\n'),
                    Some('t') => tok.push('\t'),
                    Some(other) => tok.push(other),
                    None => tok.push('\\'),
                },
                _ => tok.push(c),
            }
        }
        tokens.push(tok);
    }
    tokens
}

fn game_dir_in_library(library_root: &Path) -> PathBuf {
    library_root.join("steamapps").join("common").join(GAME_INSTALL_FOLDER)
}

/// Find the game under a Steam root: the default library first, then the
/// extra libraries the client knows about.
pub fn locate_game_in_steam(steam_root: &Path) -> Result<PathBuf> {
    let default = game_dir_in_library(steam_root);
    if validate_game_path(&default) {
        return Ok(default);
    }
    let vdf = steam_root.join("steamapps").join("libraryfolders.vdf");
    if let Ok(text) = fs::read_to_string(&vdf) {
        for lib in parse_library_folders(&text) {
            let candidate = game_dir_in_library(&lib);
            debug!("checking Steam library {}", candidate.display());
            if validate_game_path(&candidate) {
                return Ok(candidate);
            }
        }
    }
    Err(InstallerError::Registry(format!(
        "Game not at the same location as steam ({})",
        default.display()
    )))
}
