//! Best-guess location of the Stardew Valley installation.

use std::env;
use std::path::PathBuf;

use super::fs::Filesystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }
}

/// Ordered install locations to probe for `platform`.
///
/// `var` resolves environment variables. A missing variable is treated as an
/// empty base, which yields a relative path that will not normally exist.
pub fn candidates(platform: Platform, var: &dyn Fn(&str) -> Option<String>) -> Vec<PathBuf> {
    let under = |name: &str, rel: &str| PathBuf::from(var(name).unwrap_or_default()).join(rel);

    match platform {
        Platform::Windows => vec![
            PathBuf::from(r"C:\Program Files\Stardew Valley"),
            PathBuf::from(r"C:\Program Files (x86)\Stardew Valley"),
            under("LocalAppData", "StardewValley"),
            PathBuf::from(r"D:\Games\Stardew Valley"),
        ],
        Platform::MacOs => vec![
            PathBuf::from("/Applications/Stardew Valley.app/Contents/MacOS"),
            under("HOME", "Applications/Stardew Valley.app/Contents/MacOS"),
        ],
        Platform::Linux => vec![
            under("HOME", ".local/share/Steam/steamapps/common/Stardew Valley"),
            under("HOME", ".steam/steamapps/common/Stardew Valley"),
            PathBuf::from("/opt/stardew-valley"),
        ],
        Platform::Other => Vec::new(),
    }
}

/// First candidate for `platform` that exists on `fs`, if any.
pub fn detect(
    platform: Platform,
    fs: &dyn Filesystem,
    var: &dyn Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    candidates(platform, var)
        .into_iter()
        .find(|p| !p.as_os_str().is_empty() && fs.exists(p))
}

/// Detect using the host platform and the process environment.
pub fn detect_install_path(fs: &dyn Filesystem) -> Option<PathBuf> {
    detect(Platform::current(), fs, &|name| env::var(name).ok())
}
