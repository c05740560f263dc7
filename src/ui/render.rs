//! Maps wizard state to the text of the current screen.
//!
//! Nothing in here mutates state or touches the terminal; [`super::draw`]
//! decides where the text goes.

use ratatui::prelude::*;

use crate::install::{PipelinePhase, PipelineState, lock};
use crate::wizard::{OptionId, Screen, Viewport, WelcomeChoice, Wizard};

const PROGRESS_WIDTH: usize = 40;
const DEFAULT_LOG_ROWS: usize = 10;
const TOOL_OUTPUT_WIDTH: usize = 64;

pub fn render(wizard: &Wizard) -> Text<'static> {
    let lines = match wizard.screen {
        Screen::Welcome => welcome(wizard),
        Screen::PathSelection => path_selection(wizard),
        Screen::Options => options(wizard),
        Screen::Install => install(wizard),
    };
    Text::from(lines)
}

fn welcome(wizard: &Wizard) -> Vec<Line<'static>> {
    let theme = &wizard.theme;
    let choice = wizard.welcome_choice();

    let mut lines = vec![
        Line::styled("Stardew MCP Installer", theme.title_style()).centered(),
        Line::styled("Lobster Edition", theme.style()).centered(),
        Line::default(),
        Line::styled("This installer will set up everything you need:", theme.style()),
        Line::default(),
    ];
    for feature in [
        "Build Go MCP Server",
        "Build C# Stardew Valley Mod",
        "Install mod to your game folder",
        "Configure OpenClaw & Remote options",
    ] {
        lines.push(Line::styled(format!("  * {feature}"), theme.style()));
    }
    lines.push(Line::default());
    lines.push(
        Line::from(vec![
            Span::styled(
                "[ Install Everything ]",
                theme.button_style(choice == WelcomeChoice::Install),
            ),
            Span::raw("   "),
            Span::styled("[ Exit ]", theme.button_style(choice == WelcomeChoice::Exit)),
        ])
        .centered(),
    );
    lines.push(Line::default());
    lines.push(Line::styled("Use ↑↓ to select, Enter to confirm", theme.muted_style()).centered());
    lines
}

fn path_selection(wizard: &Wizard) -> Vec<Line<'static>> {
    let theme = &wizard.theme;
    let detected = if wizard.detected_path.is_empty() {
        "(not found)".to_string()
    } else {
        wizard.detected_path.clone()
    };

    let (before, after) = wizard.install_path.split_at_cursor();
    let mut rest = after.chars();
    let caret = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());

    vec![
        Line::styled("Stardew Valley Location", theme.header_style()),
        Line::default(),
        Line::styled(format!("Auto-detected: {detected}"), theme.info_style()),
        Line::default(),
        Line::from(vec![
            Span::styled("Path: ", theme.style()),
            Span::styled(before.to_string(), theme.style()),
            Span::styled(caret, theme.style().add_modifier(Modifier::REVERSED)),
            Span::styled(rest.as_str().to_string(), theme.style()),
        ]),
        Line::default(),
        Line::styled("Enter the path where Stardew Valley is installed", theme.style()),
        Line::styled("Press TAB to use auto-detected path", theme.style()),
        Line::default(),
        Line::styled("Enter: next   Ctrl+C: quit", theme.muted_style()),
    ]
}

fn options(wizard: &Wizard) -> Vec<Line<'static>> {
    let theme = &wizard.theme;
    let mut lines = vec![
        Line::styled("Additional Options", theme.header_style()),
        Line::default(),
    ];

    for (idx, option) in OptionId::ALL.iter().enumerate() {
        let focused = idx == wizard.option_cursor;
        let cursor = if focused { ">" } else { " " };
        let mark = if option.is_set(&wizard.options) { "✓" } else { " " };
        let style = if focused {
            theme.header_style()
        } else {
            theme.style()
        };
        lines.push(Line::styled(
            format!("{cursor} [{mark}] {}. {}", idx + 1, option.label()),
            style,
        ));
    }

    lines.push(Line::default());
    lines.push(Line::styled(
        "↑↓: move   Space/1-3: toggle   Enter: Install Now",
        theme.muted_style(),
    ));
    lines
}

fn install(wizard: &Wizard) -> Vec<Line<'static>> {
    let Some(shared) = wizard.pipeline() else {
        return running(wizard, &PipelineState::new());
    };
    let state = lock(shared);

    match state.phase() {
        PipelinePhase::Failed(message) => failed(wizard, &message),
        PipelinePhase::Done => done(wizard),
        PipelinePhase::Running | PipelinePhase::NotStarted => running(wizard, &state),
    }
}

fn failed(wizard: &Wizard, message: &str) -> Vec<Line<'static>> {
    let theme = &wizard.theme;
    vec![
        Line::styled("Installing...", theme.header_style()),
        Line::default(),
        Line::styled(format!("Error: {message}"), theme.error_style()),
        Line::default(),
        Line::styled(
            "Fix the problem above, then run the installer again.",
            theme.style(),
        ),
        Line::default(),
        Line::styled("q: quit", theme.muted_style()),
    ]
}

fn done(wizard: &Wizard) -> Vec<Line<'static>> {
    let theme = &wizard.theme;
    let project = &wizard.config.project;
    let server = project
        .root
        .join(&project.server_dir)
        .join(&project.server_binary);

    let mut lines = vec![
        Line::styled("Installation Complete!", theme.success_style().add_modifier(Modifier::BOLD))
            .centered(),
        Line::default(),
        Line::styled("Next Steps:", theme.style()),
        Line::styled("  1. Start Stardew Valley through SMAPI", theme.style()),
        Line::styled("  2. Load your save file", theme.style()),
        Line::styled(format!("  3. Run the MCP server: {}", server.display()), theme.style()),
        Line::default(),
        Line::styled("Enabled Options:", theme.style()),
    ];

    let enabled: Vec<_> = OptionId::ALL
        .iter()
        .filter(|o| o.is_set(&wizard.options))
        .collect();
    if enabled.is_empty() {
        lines.push(Line::styled("  • Default configuration", theme.style()));
    } else {
        for option in enabled {
            lines.push(Line::styled(format!("  • {}", option.label()), theme.style()));
        }
    }

    lines.push(Line::default());
    lines.push(Line::styled("[ Exit ]", theme.button_style(true)).centered());
    lines.push(Line::styled("Press Enter to exit", theme.muted_style()).centered());
    lines
}

fn running(wizard: &Wizard, state: &PipelineState) -> Vec<Line<'static>> {
    let theme = &wizard.theme;
    let rows = log_rows(wizard.viewport);

    let mut lines = vec![
        Line::styled(
            format!("Installing... {}", wizard.spinner_char()),
            theme.header_style(),
        ),
        Line::default(),
    ];

    let tail: Vec<Line<'static>> = state
        .logs
        .tail(rows)
        .map(|l| {
            Line::from(vec![
                Span::styled(format!("[{}] ", l.at.format("%H:%M:%S")), theme.muted_style()),
                Span::styled(l.message.clone(), theme.log_style(l.level)),
            ])
        })
        .collect();
    let padding = rows.saturating_sub(tail.len());
    lines.extend(tail);
    lines.extend(std::iter::repeat_n(Line::default(), padding));

    lines.push(Line::default());
    lines.push(Line::styled(progress_bar(state.progress()), theme.header_style()));

    let output = state
        .tool_output
        .as_deref()
        .map(|s| truncate(s, TOOL_OUTPUT_WIDTH))
        .unwrap_or_default();
    lines.push(Line::styled(format!("> {output}"), theme.muted_style()));
    lines
}

/// Log rows that fit the viewport around the fixed install chrome.
fn log_rows(viewport: Viewport) -> usize {
    if viewport.height == 0 {
        return DEFAULT_LOG_ROWS;
    }
    (viewport.height as usize).saturating_sub(12).clamp(3, 20)
}

pub fn progress_bar(fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    let filled = ((fraction * PROGRESS_WIDTH as f64).round() as usize).min(PROGRESS_WIDTH);
    format!(
        "{}{} {:>3}%",
        "█".repeat(filled),
        "░".repeat(PROGRESS_WIDTH - filled),
        (fraction * 100.0).round() as u32
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InstallerConfig;
    use crate::install::LogLevel;
    use crate::wizard::WizardAction;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::path::PathBuf;

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn press(w: &mut Wizard, code: KeyCode) -> Option<WizardAction> {
        w.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn installing() -> Wizard {
        let mut w = Wizard::new(InstallerConfig::default(), Some(PathBuf::from("/opt/sv")));
        press(&mut w, KeyCode::Enter);
        press(&mut w, KeyCode::Enter);
        press(&mut w, KeyCode::Enter);
        assert_eq!(w.screen, Screen::Install);
        w
    }

    #[test]
    fn welcome_shows_both_choices() {
        let w = Wizard::new(InstallerConfig::default(), None);
        let lines = plain(&render(&w));
        assert!(lines.iter().any(|l| l.contains("[ Install Everything ]") && l.contains("[ Exit ]")));
    }

    #[test]
    fn path_screen_shows_detection_and_field() {
        let mut w = Wizard::new(InstallerConfig::default(), None);
        press(&mut w, KeyCode::Enter);
        press(&mut w, KeyCode::Char('/'));
        press(&mut w, KeyCode::Char('g'));

        let lines = plain(&render(&w));
        assert!(lines.contains(&"Auto-detected: (not found)".to_string()));
        assert!(lines.contains(&"Path: /g ".to_string()));
    }

    #[test]
    fn options_screen_marks_enabled_flags() {
        let mut w = Wizard::new(InstallerConfig::default(), None);
        press(&mut w, KeyCode::Enter);
        press(&mut w, KeyCode::Enter);
        press(&mut w, KeyCode::Char('1'));

        let lines = plain(&render(&w));
        assert!(lines.contains(&"> [✓] 1. Enable OpenClaw Gateway".to_string()));
        assert!(lines.contains(&"  [ ] 2. Enable Remote Server Mode".to_string()));
        assert!(lines.contains(&"  [✓] 3. Auto-start agent on connect".to_string()));
    }

    #[test]
    fn install_view_prefers_fatal_error_over_done() {
        let w = installing();
        {
            let mut state = lock(w.pipeline().unwrap());
            state.start();
            state.log(LogLevel::Info, "Checking Go installation...");
            state.fail("ToolchainMissing: go".to_string());
            // Simulate a racing done flag; the error must still win
            state.done_successfully = true;
        }
        let lines = plain(&render(&w));
        assert!(lines.contains(&"Error: ToolchainMissing: go".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Installation Complete")));
    }

    #[test]
    fn install_view_lists_enabled_options_when_done() {
        let w = installing();
        {
            let mut state = lock(w.pipeline().unwrap());
            state.start();
            state.finish();
        }
        let lines = plain(&render(&w));
        assert!(lines.iter().any(|l| l.contains("Installation Complete!")));
        assert!(lines.contains(&"  • Auto-start agent on connect".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Gateway")));
    }

    #[test]
    fn done_view_resolves_server_under_project_root() {
        let mut w = installing();
        w.config.project.root = PathBuf::from("/src/stardew-mcp");
        {
            let mut state = lock(w.pipeline().unwrap());
            state.start();
            state.finish();
        }

        let expected = PathBuf::from("/src/stardew-mcp")
            .join("mcp-server")
            .join("stardew-mcp");
        let lines = plain(&render(&w));
        assert!(lines.contains(&format!("  3. Run the MCP server: {}", expected.display())));
    }

    #[test]
    fn install_view_shows_log_tail_and_progress_while_running() {
        let mut w = installing();
        w.resize(80, 17);
        {
            let mut state = lock(w.pipeline().unwrap());
            state.start();
            for i in 0..8 {
                state.log(LogLevel::Info, format!("step {i}"));
            }
            state.advance(0.5);
            state.tool_output = Some("Restore complete".to_string());
        }
        let lines = plain(&render(&w));
        let logged: Vec<_> = lines.iter().filter(|l| l.contains("step ")).collect();
        assert_eq!(logged.len(), 5);
        assert!(logged[0].ends_with("step 3"));
        assert!(lines.iter().any(|l| l.ends_with(" 50%")));
        assert!(lines.contains(&"> Restore complete".to_string()));
    }

    #[test]
    fn progress_bar_is_proportional() {
        assert_eq!(progress_bar(0.0), format!("{}   0%", "░".repeat(40)));
        assert_eq!(progress_bar(1.0), format!("{} 100%", "█".repeat(40)));
        let half = progress_bar(0.5);
        assert_eq!(half.chars().filter(|c| *c == '█').count(), 20);
    }

    #[test]
    fn render_does_not_change_state() {
        let w = installing();
        let before = (w.screen, w.selected_choice, w.options, w.viewport);
        let _ = render(&w);
        let _ = render(&w);
        assert_eq!(before, (w.screen, w.selected_choice, w.options, w.viewport));
    }
}
