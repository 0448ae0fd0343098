//! Semantic color roles and style builders for the settings screen.
//!
//! Two palettes ship: Dracula for truecolor terminals and an ANSI-256
//! fallback. `UVADMIN_COLOR_MODE` (`truecolor`/`ansi256`) overrides the
//! detection based on `COLORTERM`/`TERM`.

use std::env;
use std::fmt::Debug;

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};
use tracing::debug;
use uploadvalidator_engine::PanelState;
use uploadvalidator_types::NoticeLevel;

pub const COLOR_MODE_ENV: &str = "UVADMIN_COLOR_MODE";

/// Semantic color roles used throughout the UI.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub surface: Color,
    pub border: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub focus: Color,
}

/// Theme trait exposes semantic roles and common style builders.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }
    fn accent_style(&self) -> Style {
        Style::default().fg(self.roles().accent).add_modifier(Modifier::BOLD)
    }

    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().focus } else { self.roles().border };
        Style::default().fg(color)
    }

    fn selection_style(&self) -> Style {
        Style::default().fg(self.roles().selection_fg).bg(self.roles().selection_bg)
    }

    fn notice_style(&self, level: NoticeLevel) -> Style {
        let color = match level {
            NoticeLevel::Info => self.roles().info,
            NoticeLevel::Warning => self.roles().warning,
            NoticeLevel::Error => self.roles().error,
        };
        Style::default().fg(color)
    }

    fn status_success(&self) -> Style {
        Style::default().fg(self.roles().success)
    }

    /// Style of the status line for the panel's current state.
    fn panel_state_style(&self, state: &PanelState) -> Style {
        match state {
            PanelState::LoadFailed(_) => self.notice_style(NoticeLevel::Error),
            PanelState::LoadedDirty | PanelState::Empty => self.notice_style(NoticeLevel::Warning),
            PanelState::LoadedClean => self.status_success(),
            PanelState::Unloaded | PanelState::Loading | PanelState::Saving => self.text_secondary_style(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DraculaTheme {
    roles: ThemeRoles,
}

impl Default for DraculaTheme {
    fn default() -> Self {
        let comment = Color::Rgb(0x62, 0x72, 0xA4);
        let current_line = Color::Rgb(0x44, 0x47, 0x5A);
        let foreground = Color::Rgb(0xF8, 0xF8, 0xF2);
        Self {
            roles: ThemeRoles {
                surface: Color::Rgb(0x28, 0x2A, 0x36),
                border: current_line,
                text: foreground,
                text_secondary: comment,
                text_muted: comment,
                accent: Color::Rgb(0xFF, 0x79, 0xC6),
                info: Color::Rgb(0x8B, 0xE9, 0xFD),
                success: Color::Rgb(0x50, 0xFA, 0x7B),
                warning: Color::Rgb(0xFF, 0xB8, 0x6C),
                error: Color::Rgb(0xFF, 0x55, 0x55),
                selection_bg: current_line,
                selection_fg: foreground,
                focus: Color::Rgb(0x8B, 0xE9, 0xFD),
            },
        }
    }
}

impl Theme for DraculaTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

#[derive(Debug, Clone)]
pub struct Ansi256Theme {
    roles: ThemeRoles,
}

impl Default for Ansi256Theme {
    fn default() -> Self {
        Self {
            roles: ThemeRoles {
                surface: Color::Indexed(235),
                border: Color::Indexed(240),
                text: Color::Indexed(252),
                text_secondary: Color::Indexed(245),
                text_muted: Color::Indexed(242),
                accent: Color::Indexed(212),
                info: Color::Indexed(117),
                success: Color::Indexed(84),
                warning: Color::Indexed(215),
                error: Color::Indexed(203),
                selection_bg: Color::Indexed(238),
                selection_fg: Color::Indexed(255),
                focus: Color::Indexed(117),
            },
        }
    }
}

impl Theme for Ansi256Theme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

/// Picks the palette the terminal can display.
pub fn load() -> Box<dyn Theme> {
    if supports_truecolor() {
        Box::new(DraculaTheme::default())
    } else {
        debug!("ANSI-only terminal detected; using the 256-color palette");
        Box::new(Ansi256Theme::default())
    }
}

fn supports_truecolor() -> bool {
    match env::var(COLOR_MODE_ENV).ok().as_deref().map(str::trim) {
        Some("truecolor" | "24bit") => return true,
        Some("ansi256" | "256") => return false,
        _ => {}
    }
    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    color_term.contains("truecolor") || color_term.contains("24bit") || term.contains("truecolor")
}

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a>(theme: &'a dyn Theme, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(if focused { BorderType::Thick } else { BorderType::Plain })
        .border_style(theme.border_style(focused))
        .style(Style::default().bg(theme.roles().surface).fg(theme.roles().text));
    if let Some(title) = title {
        block = block.title(Span::styled(
            title,
            theme.text_secondary_style().add_modifier(Modifier::BOLD),
        ));
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_mode_override_selects_palette() {
        temp_env::with_var(COLOR_MODE_ENV, Some("ansi256"), || {
            assert!(!supports_truecolor());
        });
        temp_env::with_var(COLOR_MODE_ENV, Some("truecolor"), || {
            assert!(supports_truecolor());
        });
    }

    #[test]
    fn notice_styles_follow_severity() {
        let theme = DraculaTheme::default();
        assert_eq!(theme.notice_style(NoticeLevel::Error).fg, Some(theme.roles().error));
        assert_eq!(theme.notice_style(NoticeLevel::Warning).fg, Some(theme.roles().warning));
    }

    #[test]
    fn status_line_style_follows_panel_state() {
        let theme = DraculaTheme::default();
        let failed = PanelState::LoadFailed("HTTP 403: forbidden".into());
        assert_eq!(theme.panel_state_style(&failed).fg, Some(theme.roles().error));
        assert_eq!(theme.panel_state_style(&PanelState::LoadedDirty).fg, Some(theme.roles().warning));
        assert_eq!(theme.panel_state_style(&PanelState::LoadedClean), theme.status_success());
    }
}
