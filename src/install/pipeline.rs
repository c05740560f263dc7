use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::plan::InstallPlan;
use super::state::{LogLevel, SharedPipeline, lock};
use super::steps::STEPS;
use crate::system::{CommandError, CommandRunner, Filesystem};

/// Everything a step needs while it runs.
pub struct StepContext<'a> {
    pub plan: &'a InstallPlan,
    pub runner: &'a dyn CommandRunner,
    pub fs: &'a dyn Filesystem,
    state: &'a SharedPipeline,
}

impl StepContext<'_> {
    /// Run an external tool, mirroring each output line into the shared
    /// state so the install screen can show it.
    pub fn run_tool(&self, program: &str, args: &[&str], cwd: &Path) -> Result<(), CommandError> {
        let state = self.state;
        self.runner.run(program, args, cwd, &mut |line| {
            lock(state).tool_output = Some(line.to_string());
        })
    }
}

/// A started install: the plan to execute and the state it reports into.
#[derive(Debug, Clone)]
pub struct InstallJob {
    pub plan: InstallPlan,
    pub state: SharedPipeline,
}

impl InstallJob {
    /// Run every step in order on the calling thread.
    ///
    /// The first fatal failure stops the run and records the fatal error;
    /// otherwise the pipeline ends done with progress at 1.0.
    pub fn run(&self, runner: &dyn CommandRunner, fs: &dyn Filesystem) {
        let ctx = StepContext {
            plan: &self.plan,
            runner,
            fs,
            state: &self.state,
        };

        info!("Starting installation into {:?}", self.plan.install_path);
        lock(&self.state).start();

        for step in STEPS.iter() {
            lock(&self.state).log(LogLevel::Info, step.id.start_message());

            match (step.action)(&ctx) {
                Ok(()) => {
                    info!("{:?} succeeded", step.id);
                    let mut state = lock(&self.state);
                    state.log(LogLevel::Success, step.id.success_message());
                    state.advance(step.target);
                }
                Err(e) if step.fatal_on_failure => {
                    error!("{:?} failed: {}", step.id, e);
                    let mut state = lock(&self.state);
                    state.log(LogLevel::Error, format!("Failed: {e}"));
                    state.fail(e.to_string());
                    return;
                }
                Err(e) => {
                    warn!("{:?} failed, continuing: {}", step.id, e);
                    lock(&self.state).log(LogLevel::Error, format!("Failed: {e}"));
                }
            }
        }

        let mut state = lock(&self.state);
        state.tool_output = None;
        state.finish();
        info!("Installation complete");
    }
}

/// Run `job` on the blocking pool. The handle may be dropped; the install
/// keeps running until it finishes or fails.
pub fn spawn(
    job: InstallJob,
    runner: Arc<dyn CommandRunner>,
    fs: Arc<dyn Filesystem>,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || job.run(runner.as_ref(), fs.as_ref()))
}
