use super::config_file::ServerConfig;
use super::error::{Component, InstallError, Result};
use super::pipeline::StepContext;

/// Identifier for each install step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    CheckServerToolchain,
    CheckPluginToolchain,
    BuildServer,
    BuildPlugin,
    InstallPlugin,
    WriteConfig,
}

impl StepId {
    pub fn start_message(&self) -> &'static str {
        match self {
            StepId::CheckServerToolchain => "Checking Go installation...",
            StepId::CheckPluginToolchain => "Checking .NET SDK...",
            StepId::BuildServer => "Building Go MCP Server...",
            StepId::BuildPlugin => "Building C# Stardew Mod...",
            StepId::InstallPlugin => "Installing mod to Stardew Valley...",
            StepId::WriteConfig => "Creating configuration...",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            StepId::CheckServerToolchain => "✓ Go found!",
            StepId::CheckPluginToolchain => "✓ .NET found!",
            StepId::BuildServer => "✓ Go MCP Server built!",
            StepId::BuildPlugin => "✓ C# Mod built!",
            StepId::InstallPlugin => "✓ Mod installed!",
            StepId::WriteConfig => "✓ Configuration created!",
        }
    }
}

pub type StepAction = fn(&StepContext<'_>) -> Result<()>;

/// One entry of the fixed install sequence.
pub struct PipelineStep {
    pub id: StepId,
    pub action: StepAction,
    /// Cumulative progress once this step succeeds
    pub target: f64,
    /// Whether a failure aborts the remaining steps
    pub fatal_on_failure: bool,
}

pub static STEPS: [PipelineStep; 6] = [
    PipelineStep {
        id: StepId::CheckServerToolchain,
        action: check_server_toolchain,
        target: 0.15,
        fatal_on_failure: true,
    },
    PipelineStep {
        id: StepId::CheckPluginToolchain,
        action: check_plugin_toolchain,
        target: 0.30,
        fatal_on_failure: true,
    },
    PipelineStep {
        id: StepId::BuildServer,
        action: build_server,
        target: 0.50,
        fatal_on_failure: true,
    },
    PipelineStep {
        id: StepId::BuildPlugin,
        action: build_plugin,
        target: 0.70,
        fatal_on_failure: true,
    },
    PipelineStep {
        id: StepId::InstallPlugin,
        action: install_plugin,
        target: 0.85,
        fatal_on_failure: true,
    },
    // The mod is already in place by now, so a config failure is only logged
    PipelineStep {
        id: StepId::WriteConfig,
        action: write_config,
        target: 1.0,
        fatal_on_failure: false,
    },
];

fn require_toolchain(ctx: &StepContext<'_>, name: &str) -> Result<()> {
    if ctx.runner.exists(name) {
        Ok(())
    } else {
        Err(InstallError::ToolchainMissing {
            name: name.to_string(),
        })
    }
}

fn check_server_toolchain(ctx: &StepContext<'_>) -> Result<()> {
    require_toolchain(ctx, &ctx.plan.server_toolchain)
}

fn check_plugin_toolchain(ctx: &StepContext<'_>) -> Result<()> {
    require_toolchain(ctx, &ctx.plan.plugin_toolchain)
}

fn build_server(ctx: &StepContext<'_>) -> Result<()> {
    let plan = ctx.plan;
    ctx.run_tool(
        &plan.server_toolchain,
        &["build", "-o", &plan.server_binary],
        &plan.server_dir,
    )
    .map_err(|e| InstallError::BuildFailed {
        component: Component::Server,
        cause: e.to_string(),
    })
}

fn build_plugin(ctx: &StepContext<'_>) -> Result<()> {
    let plan = ctx.plan;
    ctx.run_tool(
        &plan.plugin_toolchain,
        &["build", "-c", "Release"],
        &plan.plugin_dir,
    )
    .map_err(|e| InstallError::BuildFailed {
        component: Component::Plugin,
        cause: e.to_string(),
    })
}

fn install_plugin(ctx: &StepContext<'_>) -> Result<()> {
    let target = ctx.plan.mod_target();
    let failed = |e: std::io::Error| InstallError::InstallFailed {
        cause: format!("{}: {e}", target.display()),
    };

    ctx.fs.create_dir_all(&target).map_err(failed)?;
    ctx.fs
        .copy_dir(&ctx.plan.plugin_artifacts, &target)
        .map_err(failed)
}

fn write_config(ctx: &StepContext<'_>) -> Result<()> {
    let contents = ServerConfig::with_auto_start(ctx.plan.options.auto_start).to_string();
    ctx.fs
        .write_file(&ctx.plan.config_path, &contents)
        .map_err(|e| InstallError::ConfigWriteFailed {
            cause: format!("{}: {e}", ctx.plan.config_path.display()),
        })
}
