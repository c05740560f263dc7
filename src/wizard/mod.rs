mod input;

pub use input::TextField;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use tracing::info;

use crate::config::InstallerConfig;
use crate::install::{InstallJob, InstallOptions, InstallPlan, PipelineState, SharedPipeline};
use crate::ui::Theme;

/// Wizard screens, in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    PathSelection,
    Options,
    Install,
}

/// Buttons on the welcome screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WelcomeChoice {
    Install = 0,
    Exit = 1,
}

impl WelcomeChoice {
    const LAST: usize = 1;

    fn from_index(idx: usize) -> Self {
        if idx == 0 {
            WelcomeChoice::Install
        } else {
            WelcomeChoice::Exit
        }
    }
}

/// Toggles on the options screen, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionId {
    Gateway,
    Remote,
    AutoStart,
}

impl OptionId {
    pub const ALL: [OptionId; 3] = [OptionId::Gateway, OptionId::Remote, OptionId::AutoStart];

    pub fn label(&self) -> &'static str {
        match self {
            OptionId::Gateway => "Enable OpenClaw Gateway",
            OptionId::Remote => "Enable Remote Server Mode",
            OptionId::AutoStart => "Auto-start agent on connect",
        }
    }

    pub fn is_set(&self, options: &InstallOptions) -> bool {
        match self {
            OptionId::Gateway => options.gateway,
            OptionId::Remote => options.remote,
            OptionId::AutoStart => options.auto_start,
        }
    }

    fn toggle(&self, options: &mut InstallOptions) {
        match self {
            OptionId::Gateway => options.gateway = !options.gateway,
            OptionId::Remote => options.remote = !options.remote,
            OptionId::AutoStart => options.auto_start = !options.auto_start,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

/// Actions the event loop must carry out on behalf of the wizard
#[derive(Debug)]
pub enum WizardAction {
    Quit,
    /// Run the install in the background; emitted at most once
    StartInstall(InstallJob),
}

/// Wizard state: the single source of truth for what is on screen.
pub struct Wizard {
    pub config: InstallerConfig,
    pub theme: Theme,

    pub screen: Screen,
    pub selected_choice: usize,
    pub install_path: TextField,
    pub detected_path: String,
    pub options: InstallOptions,
    pub option_cursor: usize,
    pub viewport: Viewport,

    /// Created when the install screen is entered, never replaced
    pipeline: Option<SharedPipeline>,

    spinner_frame: usize,
}

impl Wizard {
    pub fn new(config: InstallerConfig, detected: Option<PathBuf>) -> Self {
        let detected_path = detected
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        Self {
            config,
            theme: Theme::default(),
            screen: Screen::Welcome,
            selected_choice: 0,
            install_path: TextField::new(),
            detected_path,
            options: InstallOptions::default(),
            option_cursor: 0,
            viewport: Viewport::default(),
            pipeline: None,
            spinner_frame: 0,
        }
    }

    pub fn pipeline(&self) -> Option<&SharedPipeline> {
        self.pipeline.as_ref()
    }

    pub fn welcome_choice(&self) -> WelcomeChoice {
        WelcomeChoice::from_index(self.selected_choice)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Viewport { width, height };
    }

    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 4;
    }

    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
        SPINNER[self.spinner_frame]
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<WizardAction> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if is_ctrl_chord(key.modifiers) && key.code == KeyCode::Char('c') {
            return Some(WizardAction::Quit);
        }

        // 'q' is text on the path screen
        if key.code == KeyCode::Char('q') && self.screen != Screen::PathSelection {
            return Some(WizardAction::Quit);
        }

        match self.screen {
            Screen::Welcome => self.handle_welcome_key(key),
            Screen::PathSelection => self.handle_path_key(key),
            Screen::Options => self.handle_options_key(key),
            Screen::Install => self.handle_install_key(key),
        }
    }

    fn handle_welcome_key(&mut self, key: KeyEvent) -> Option<WizardAction> {
        match key.code {
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') | KeyCode::Char('w') => {
                self.selected_choice = self.selected_choice.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') | KeyCode::Char('s') => {
                self.selected_choice = (self.selected_choice + 1).min(WelcomeChoice::LAST);
            }
            KeyCode::Enter => match self.welcome_choice() {
                WelcomeChoice::Install => {
                    self.install_path.set(&self.detected_path);
                    self.screen = Screen::PathSelection;
                }
                WelcomeChoice::Exit => return Some(WizardAction::Quit),
            },
            _ => {}
        }
        None
    }

    fn handle_path_key(&mut self, key: KeyEvent) -> Option<WizardAction> {
        let field = &mut self.install_path;
        match key.code {
            KeyCode::Enter => {
                info!("Install path set to {:?}", field.content());
                self.screen = Screen::Options;
            }
            KeyCode::Tab => field.set(&self.detected_path),
            KeyCode::Backspace => {
                field.delete_back();
            }
            KeyCode::Delete => {
                field.delete_forward();
            }
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            KeyCode::Home => field.move_start(),
            KeyCode::End => field.move_end(),
            // AltGr arrives as Ctrl+Alt and must still produce text
            KeyCode::Char(c) if is_ctrl_chord(key.modifiers) => match c {
                'u' => field.clear(),
                'a' => field.move_start(),
                'e' => field.move_end(),
                _ => {}
            },
            KeyCode::Char(c) => field.insert(c),
            _ => {}
        }
        None
    }

    fn handle_options_key(&mut self, key: KeyEvent) -> Option<WizardAction> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.option_cursor = self.option_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.option_cursor = (self.option_cursor + 1).min(OptionId::ALL.len() - 1);
            }
            KeyCode::Char(' ') => OptionId::ALL[self.option_cursor].toggle(&mut self.options),
            KeyCode::Char(c @ '1'..='3') => {
                let idx = (c as usize) - ('1' as usize);
                OptionId::ALL[idx].toggle(&mut self.options);
                self.option_cursor = idx;
            }
            KeyCode::Enter => return self.begin_install().map(WizardAction::StartInstall),
            _ => {}
        }
        None
    }

    fn handle_install_key(&mut self, key: KeyEvent) -> Option<WizardAction> {
        if key.code != KeyCode::Enter {
            return None;
        }
        let done = self
            .pipeline
            .as_ref()
            .is_some_and(|p| crate::install::lock(p).done_successfully);
        done.then_some(WizardAction::Quit)
    }

    /// Move to the install screen and hand out the job to run. Returns `None`
    /// if the install was already started.
    fn begin_install(&mut self) -> Option<InstallJob> {
        if self.screen == Screen::Install || self.pipeline.is_some() {
            return None;
        }

        let plan = InstallPlan::new(
            &self.config,
            PathBuf::from(self.install_path.content()),
            self.options,
        );
        info!("Starting install with {:?}", plan.options);

        let state = PipelineState::shared();
        self.pipeline = Some(state.clone());
        self.screen = Screen::Install;

        Some(InstallJob { plan, state })
    }
}

fn is_ctrl_chord(modifiers: KeyModifiers) -> bool {
    modifiers.contains(KeyModifiers::CONTROL) && !modifiers.contains(KeyModifiers::ALT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn wizard() -> Wizard {
        Wizard::new(InstallerConfig::default(), Some(PathBuf::from("/opt/stardew-valley")))
    }

    fn to_options(w: &mut Wizard) {
        w.handle_key(press(KeyCode::Enter));
        w.handle_key(press(KeyCode::Enter));
        assert_eq!(w.screen, Screen::Options);
    }

    #[test]
    fn welcome_selection_is_clamped() {
        let mut w = wizard();
        let keys = [
            KeyCode::Up,
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Down,
            KeyCode::Down,
            KeyCode::Char('w'),
            KeyCode::Char('s'),
            KeyCode::Char('s'),
            KeyCode::Left,
            KeyCode::Left,
            KeyCode::Right,
        ];
        for code in keys {
            w.handle_key(press(code));
            assert!(w.selected_choice <= 1);
        }
        assert_eq!(w.welcome_choice(), WelcomeChoice::Exit);
    }

    #[test]
    fn exit_quits_without_starting_install() {
        let mut w = wizard();
        w.handle_key(press(KeyCode::Down));
        let action = w.handle_key(press(KeyCode::Enter));
        assert!(matches!(action, Some(WizardAction::Quit)));
        assert_eq!(w.screen, Screen::Welcome);
        assert!(w.pipeline().is_none());
    }

    #[test]
    fn install_seeds_path_from_detection() {
        let mut w = wizard();
        assert!(w.handle_key(press(KeyCode::Enter)).is_none());
        assert_eq!(w.screen, Screen::PathSelection);
        assert_eq!(w.install_path.content(), "/opt/stardew-valley");
    }

    #[test]
    fn path_field_edits_and_resets() {
        let mut w = wizard();
        w.handle_key(press(KeyCode::Enter));
        w.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        for c in "/games/quest".chars() {
            assert!(w.handle_key(press(KeyCode::Char(c))).is_none());
        }
        assert_eq!(w.install_path.content(), "/games/quest");

        w.handle_key(press(KeyCode::Backspace));
        assert_eq!(w.install_path.content(), "/games/ques");

        w.handle_key(press(KeyCode::Tab));
        assert_eq!(w.install_path.content(), "/opt/stardew-valley");
        assert_eq!(w.screen, Screen::PathSelection);
    }

    #[test]
    fn path_field_accepts_altgr_characters() {
        let mut w = wizard();
        w.handle_key(press(KeyCode::Enter));
        w.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));

        w.handle_key(KeyEvent::new(KeyCode::Char('C'), KeyModifiers::SHIFT));
        w.handle_key(KeyEvent::new(KeyCode::Char(':'), KeyModifiers::SHIFT));
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        for c in ['\\', '{', '@', 'c'] {
            assert!(w.handle_key(KeyEvent::new(KeyCode::Char(c), altgr)).is_none());
        }
        assert_eq!(w.install_path.content(), "C:\\{@c");

        w.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(w.install_path.cursor(), 0);
    }

    #[test]
    fn options_toggle_independently() {
        let mut w = wizard();
        to_options(&mut w);
        assert_eq!(w.options, InstallOptions::default());

        w.handle_key(press(KeyCode::Char(' ')));
        assert!(w.options.gateway);

        w.handle_key(press(KeyCode::Down));
        w.handle_key(press(KeyCode::Down));
        w.handle_key(press(KeyCode::Down));
        assert_eq!(w.option_cursor, 2);
        w.handle_key(press(KeyCode::Char(' ')));
        assert!(!w.options.auto_start);

        w.handle_key(press(KeyCode::Char('2')));
        assert!(w.options.remote);
        assert_eq!(w.option_cursor, 1);
        assert!(w.options.gateway);
    }

    #[test]
    fn install_starts_exactly_once() {
        let mut w = wizard();
        to_options(&mut w);

        let job = match w.handle_key(press(KeyCode::Enter)) {
            Some(WizardAction::StartInstall(job)) => job,
            other => panic!("expected StartInstall, got {other:?}"),
        };
        assert_eq!(w.screen, Screen::Install);
        assert_eq!(job.plan.install_path, PathBuf::from("/opt/stardew-valley"));
        assert!(job.plan.options.auto_start);

        // Still running: Enter does nothing and never restarts the pipeline
        assert!(w.handle_key(press(KeyCode::Enter)).is_none());
        assert!(w.begin_install().is_none());
        assert!(std::sync::Arc::ptr_eq(w.pipeline().unwrap(), &job.state));
    }

    #[test]
    fn quit_is_accepted_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let mut w = wizard();
        assert!(matches!(w.handle_key(ctrl_c), Some(WizardAction::Quit)));

        w.handle_key(press(KeyCode::Enter));
        assert!(matches!(w.handle_key(ctrl_c), Some(WizardAction::Quit)));
        // Plain 'q' is part of a path
        assert!(w.handle_key(press(KeyCode::Char('q'))).is_none());

        w.handle_key(press(KeyCode::Enter));
        assert!(matches!(
            w.handle_key(press(KeyCode::Char('q'))),
            Some(WizardAction::Quit)
        ));
    }

    #[test]
    fn resize_never_changes_screen() {
        let mut w = wizard();
        w.handle_key(press(KeyCode::Enter));
        w.resize(120, 40);
        assert_eq!(w.viewport, Viewport { width: 120, height: 40 });
        assert_eq!(w.screen, Screen::PathSelection);
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut w = wizard();
        let mut release = press(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert!(w.handle_key(release).is_none());
        assert_eq!(w.screen, Screen::Welcome);
    }
}
