use clap::Parser;
use crossterm::{
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use stardew_installer::config::InstallerConfig;
use stardew_installer::error::{InstallerError, Result};
use stardew_installer::event::{Event, EventHandler};
use stardew_installer::install;
use stardew_installer::system::{
    CommandRunner, Filesystem, LocalFs, SystemCommandRunner, detect_install_path,
};
use stardew_installer::ui;
use stardew_installer::wizard::{Wizard, WizardAction};
use std::io::stdout;
use std::panic;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stardew-mcp-installer")]
#[command(author, version, about = "Build and install the Stardew MCP server and mod")]
struct Args {
    /// Path to installer config file (default: <config dir>/stardew-mcp/installer.toml)
    #[arg(long)]
    config: Option<String>,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging only if log file is specified
    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting stardew-mcp-installer");
        }
    }

    let config = load_config(args.config.as_deref());

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let runtime = tokio::runtime::Runtime::new()?;
    let mut terminal = setup_terminal()?;

    let result = runtime.block_on(run_wizard(&mut terminal, config));

    restore_terminal()?;

    // A running install is abandoned rather than awaited
    runtime.shutdown_background();

    if let Err(ref e) = result {
        error!("Installer error: {}", e);
    }

    result
}

fn load_config(path: Option<&str>) -> InstallerConfig {
    let loaded = match path {
        Some(path) => InstallerConfig::load_from(path),
        None => InstallerConfig::load(),
    };
    loaded.unwrap_or_else(|e| {
        warn!("Ignoring installer config: {}", e);
        InstallerConfig::default()
    })
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| InstallerError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| InstallerError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).map_err(|e| InstallerError::Terminal(e.to_string()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| InstallerError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen)
        .map_err(|e| InstallerError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run_wizard(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: InstallerConfig,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut events = EventHandler::new(tick_rate);

    let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner);
    let fs: Arc<dyn Filesystem> = Arc::new(LocalFs);

    let detected = detect_install_path(fs.as_ref());
    info!("Detected install path: {:?}", detected);

    let mut wizard = Wizard::new(config, detected);
    if let Ok((width, height)) = terminal::size() {
        wizard.resize(width, height);
    }

    loop {
        terminal
            .draw(|frame| ui::draw(frame, &wizard))
            .map_err(|e| InstallerError::Terminal(e.to_string()))?;

        let Some(event) = events.next().await else {
            break;
        };

        match event {
            Event::Key(key) => match wizard.handle_key(key) {
                Some(WizardAction::Quit) => break,
                Some(WizardAction::StartInstall(job)) => {
                    // Detached: there is no cancel, quitting simply abandons it
                    drop(install::spawn(job, runner.clone(), fs.clone()));
                }
                None => {}
            },
            Event::Resize(width, height) => wizard.resize(width, height),
            Event::Tick => wizard.tick(),
        }
    }

    info!("Exiting installer");
    Ok(())
}
