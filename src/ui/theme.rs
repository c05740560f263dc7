use ratatui::style::{Color, Modifier, Style};

use crate::install::LogLevel;

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub accent: Color,
    pub foreground: Color,
    pub error: Color,
    pub success: Color,
    pub info: Color,
    pub border: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Red,
            foreground: Color::White,
            error: Color::LightRed,
            success: Color::Green,
            info: Color::Yellow,
            border: Color::Cyan,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    pub fn style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn button_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(Color::White)
                .bg(self.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).bg(self.primary)
        }
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn info_style(&self) -> Style {
        Style::default().fg(self.info)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn log_style(&self, level: LogLevel) -> Style {
        match level {
            LogLevel::Info => self.info_style(),
            LogLevel::Success => self.success_style(),
            LogLevel::Error => self.error_style(),
        }
    }
}
