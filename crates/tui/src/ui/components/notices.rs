//! Message area: panel status plus the most recent notices.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme;

const THROBBER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Default)]
pub struct NoticesComponent;

impl Component for NoticesComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let block = theme::block(app.theme.as_ref(), Some("Messages"), false);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let mut status = Vec::new();
        if app.executing {
            status.push(Span::styled(
                format!("{} ", THROBBER[app.throbber_idx % THROBBER.len()]),
                app.theme.accent_style(),
            ));
        }
        status.push(Span::styled(
            app.status_line(),
            app.theme.panel_state_style(&app.panel.state()),
        ));

        let visible = usize::from(inner.height.saturating_sub(1));
        let skip = app.notices.len().saturating_sub(visible);
        let mut lines = vec![Line::from(status)];
        lines.extend(app.notices.iter().skip(skip).map(|logged| {
            Line::from(vec![
                Span::styled(format!("{} ", logged.at.format("%H:%M:%S")), app.theme.text_muted_style()),
                Span::styled(logged.notice.to_string(), app.theme.notice_style(logged.notice.level)),
            ])
        }));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
