//! Component system for the settings TUI.
//!
//! Components are self-contained UI elements: they handle the events routed
//! to them, mutate [`App`] state, render into a `Rect`, and report side
//! effects back to the runtime as [`Effect`]s instead of performing them.

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use uploadvalidator_types::{Effect, Msg};

use crate::app::App;

pub(crate) trait Component {
    /// Handle an application-level message the component cares about.
    fn handle_message(&mut self, _app: &mut App, _msg: &Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into `rect`.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);
}
