use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;

const CONFIG_DIR_NAME: &str = "stardew-mcp";
const CONFIG_FILE_NAME: &str = "installer.toml";

/// Installer settings: where the sources live and which toolchains build them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    pub project: ProjectConfig,
    pub toolchains: ToolchainConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Checkout root; every other project path is relative to it
    pub root: PathBuf,
    pub server_dir: PathBuf,
    /// Output name passed to `go build -o`
    pub server_binary: String,
    pub plugin_dir: PathBuf,
    /// Build output directory, relative to `plugin_dir`
    pub plugin_output: PathBuf,
    /// Folder name created under `<game>/Mods/`
    pub plugin_name: String,
    /// Generated server config, relative to `root`
    pub config_file: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            server_dir: PathBuf::from("mcp-server"),
            server_binary: "stardew-mcp".to_string(),
            plugin_dir: PathBuf::from("mod/StardewMCP"),
            plugin_output: PathBuf::from("bin/Release/net6.0"),
            plugin_name: "StardewMCP".to_string(),
            config_file: PathBuf::from("mcp-server/config.yaml"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub server: String,
    pub plugin: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            server: "go".to_string(),
            plugin: "dotnet".to_string(),
        }
    }
}

impl InstallerConfig {
    /// `<config dir>/stardew-mcp/installer.toml`, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: InstallerConfig = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallerError;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = InstallerConfig::load_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.toolchains.server, "go");
        assert_eq!(config.toolchains.plugin, "dotnet");
        assert_eq!(config.project.plugin_name, "StardewMCP");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("installer.toml");
        std::fs::write(
            &path,
            "[project]\nroot = \"/src/stardew-mcp\"\n\n[toolchains]\nplugin = \"dotnet8\"\n",
        )
        .unwrap();

        let config = InstallerConfig::load_from(&path).unwrap();
        assert_eq!(config.project.root, PathBuf::from("/src/stardew-mcp"));
        assert_eq!(config.project.server_dir, PathBuf::from("mcp-server"));
        assert_eq!(config.toolchains.server, "go");
        assert_eq!(config.toolchains.plugin, "dotnet8");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("installer.toml");
        std::fs::write(&path, "[project\nroot = ").unwrap();

        let err = InstallerConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, InstallerError::ConfigParse(_)));
    }
}
