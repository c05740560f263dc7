use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Maximum number of log lines retained; older lines are evicted first.
pub const LOG_CAPACITY: usize = 100;

/// Pipeline state shared between the background install task and the UI.
pub type SharedPipeline = Arc<Mutex<PipelineState>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogLine {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

/// FIFO log buffer bounded to [`LOG_CAPACITY`] lines.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    lines: VecDeque<LogLine>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.lines.len() == LOG_CAPACITY {
            self.lines.pop_front();
        }
        self.lines.push_back(LogLine {
            at: Local::now(),
            level,
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogLine> + ExactSizeIterator {
        self.lines.iter()
    }

    /// The last `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &LogLine> {
        self.lines.iter().skip(self.lines.len().saturating_sub(n))
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.lines.iter().filter(|l| l.level == level).count()
    }
}

/// Where the pipeline is in its single run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelinePhase {
    NotStarted,
    Running,
    Failed(String),
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub running: bool,
    pub done_successfully: bool,
    pub fatal_error: Option<String>,
    progress: f64,
    pub logs: LogBuffer,
    /// Most recent raw line printed by an external build tool
    pub tool_output: Option<String>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedPipeline {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_terminal(&self) -> bool {
        self.done_successfully || self.fatal_error.is_some()
    }

    /// Terminal flags take precedence: fatal error, then done, then running.
    pub fn phase(&self) -> PipelinePhase {
        if let Some(err) = &self.fatal_error {
            PipelinePhase::Failed(err.clone())
        } else if self.done_successfully {
            PipelinePhase::Done
        } else if self.running {
            PipelinePhase::Running
        } else {
            PipelinePhase::NotStarted
        }
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push(level, message);
    }

    pub(crate) fn start(&mut self) {
        if !self.is_terminal() {
            self.running = true;
        }
    }

    /// Raise progress to `target`; never lowers it.
    pub(crate) fn advance(&mut self, target: f64) {
        let target = target.clamp(0.0, 1.0);
        if target > self.progress {
            self.progress = target;
        }
    }

    pub(crate) fn fail(&mut self, message: String) {
        if self.is_terminal() {
            return;
        }
        self.running = false;
        self.fatal_error = Some(message);
    }

    pub(crate) fn finish(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.progress = 1.0;
        self.running = false;
        self.done_successfully = true;
    }
}

/// Lock the shared state, recovering it if a writer panicked mid-update.
pub fn lock(shared: &SharedPipeline) -> MutexGuard<'_, PipelineState> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
