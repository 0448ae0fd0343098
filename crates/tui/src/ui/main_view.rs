//! Top-level view: global shortcuts, layout, and delegation to components.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};
use uploadvalidator_types::{Effect, Msg};

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::components::{HintBarComponent, NoticesComponent, SettingsComponent};

const NOTICES_HEIGHT: u16 = 7;

#[derive(Debug, Default)]
pub struct MainView {
    settings: SettingsComponent,
    notices: NoticesComponent,
    hints: HintBarComponent,
}

impl MainView {
    pub fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => return app.save(),
                KeyCode::Char('r') => return app.reload(),
                KeyCode::Char('z') => return app.discard(),
                KeyCode::Char('c') => return vec![Effect::Quit],
                _ => {}
            }
        }
        if key.code == KeyCode::Esc {
            return vec![Effect::Quit];
        }
        self.settings.handle_key_events(app, key)
    }

    pub fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let mut effects = app.update(&msg);
        effects.extend(self.settings.handle_message(app, &msg));
        effects
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let [body, notices, hints] = Layout::vertical([
            Constraint::Min(8),
            Constraint::Length(NOTICES_HEIGHT),
            Constraint::Length(2),
        ])
        .areas(area);
        self.settings.render(frame, body, app);
        self.notices.render(frame, notices, app);
        self.hints.render(frame, hints, app);
    }
}
