//! Single-line strip with key bindings and the focused setting's description.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::ui::components::component::Component;

const HINTS: &[(&str, &str)] = &[
    ("Tab", "next"),
    ("Enter", "add"),
    ("Del", "remove"),
    ("Ctrl-S", "save"),
    ("Ctrl-R", "reload"),
    ("Ctrl-Z", "discard"),
    ("Esc", "quit"),
];

#[derive(Debug, Default)]
pub struct HintBarComponent;

impl Component for HintBarComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let [description, keys] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(rect);

        if let Some(view) = app.settings.focused_index().and_then(|index| app.settings.editors.get(index)) {
            let text = Span::styled(view.descriptor.description, app.theme.text_secondary_style());
            frame.render_widget(Paragraph::new(text), description);
        }

        let mut spans = Vec::with_capacity(HINTS.len() * 2);
        for (key, action) in HINTS {
            spans.push(Span::styled(*key, app.theme.accent_style()));
            spans.push(Span::styled(format!(" {action}  "), app.theme.text_muted_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), keys);
    }
}
