use std::path::PathBuf;

use crate::config::InstallerConfig;

/// Feature toggles chosen on the options screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    pub gateway: bool,
    pub remote: bool,
    pub auto_start: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            gateway: false,
            remote: false,
            auto_start: true,
        }
    }
}

/// Concrete locations and tools for one install run.
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub server_toolchain: String,
    pub plugin_toolchain: String,
    pub server_dir: PathBuf,
    pub server_binary: String,
    pub plugin_dir: PathBuf,
    pub plugin_artifacts: PathBuf,
    pub plugin_name: String,
    pub config_path: PathBuf,
    /// Game folder chosen on the path screen
    pub install_path: PathBuf,
    pub options: InstallOptions,
}

impl InstallPlan {
    pub fn new(config: &InstallerConfig, install_path: PathBuf, options: InstallOptions) -> Self {
        let project = &config.project;
        let plugin_dir = project.root.join(&project.plugin_dir);

        Self {
            server_toolchain: config.toolchains.server.clone(),
            plugin_toolchain: config.toolchains.plugin.clone(),
            server_dir: project.root.join(&project.server_dir),
            server_binary: project.server_binary.clone(),
            plugin_artifacts: plugin_dir.join(&project.plugin_output),
            plugin_dir,
            plugin_name: project.plugin_name.clone(),
            config_path: project.root.join(&project.config_file),
            install_path,
            options,
        }
    }

    /// `<install path>/Mods/<plugin name>`
    pub fn mod_target(&self) -> PathBuf {
        self.install_path.join("Mods").join(&self.plugin_name)
    }
}
