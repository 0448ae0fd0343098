//! Application state and the pure update function.
//!
//! `App` owns the engine's [`SettingsPanel`] plus the per-editor view state.
//! Key handlers and [`App::update`] mutate this state and return [`Effect`]s;
//! nothing here performs I/O.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use rat_focus::{Focus, FocusBuilder};
use tracing::{debug, info};
use uploadvalidator_engine::{Completion, EditOutcome, PanelError, PanelState, SettingsPanel};
use uploadvalidator_types::{Effect, ExecOutcome, Msg, Notice};

use crate::ui::components::settings::SettingsViewState;
use crate::ui::theme::{self, Theme};

/// Number of notices kept for the message area.
const NOTICE_LOG_CAPACITY: usize = 200;

/// Startup options for the application state.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Server base URL, shown in the title bar.
    pub server_url: String,
    /// Disable every editor regardless of server permissions.
    pub read_only: bool,
}

/// A notice together with the time it was raised.
#[derive(Debug, Clone)]
pub struct LoggedNotice {
    pub at: DateTime<Local>,
    pub notice: Notice,
}

pub struct App {
    pub panel: SettingsPanel,
    pub settings: SettingsViewState,
    pub focus: Focus,
    pub theme: Box<dyn Theme>,
    pub server_url: String,
    /// Notices shown in the message area, oldest first.
    pub notices: VecDeque<LoggedNotice>,
    /// Whether a request is in flight
    pub executing: bool,
    /// Animation frame for the execution throbber
    pub throbber_idx: usize,
}

impl App {
    pub fn new(options: AppOptions) -> Self {
        let mut panel = SettingsPanel::new();
        panel.set_read_only(options.read_only);
        let settings = SettingsViewState::default();
        let focus = FocusBuilder::build_for(&settings);
        Self {
            panel,
            settings,
            focus,
            theme: theme::load(),
            server_url: options.server_url,
            notices: VecDeque::new(),
            executing: false,
            throbber_idx: 0,
        }
    }

    /// Points the panel at `repo` and requests its settings.
    pub fn activate(&mut self, repo: &str) -> Vec<Effect> {
        let request = self.panel.activate(repo);
        self.settings.reset();
        vec![
            Effect::LoadConfigRequested {
                generation: request.generation,
                repo: request.repo,
            },
            Effect::RememberRepository(repo.to_string()),
        ]
    }

    pub fn reload(&mut self) -> Vec<Effect> {
        match self.panel.reload() {
            Ok(request) => {
                self.settings.reset();
                vec![Effect::LoadConfigRequested {
                    generation: request.generation,
                    repo: request.repo,
                }]
            }
            Err(error) => self.refuse(error),
        }
    }

    pub fn save(&mut self) -> Vec<Effect> {
        match self.panel.begin_save() {
            Ok(request) => vec![Effect::SaveConfigRequested {
                generation: request.generation,
                repo: request.repo,
                input: request.input,
            }],
            Err(error) => self.refuse(error),
        }
    }

    pub fn discard(&mut self) -> Vec<Effect> {
        if let Err(error) = self.panel.discard_changes() {
            return self.refuse(error);
        }
        self.settings.sync_with(&self.panel);
        self.collect_panel_notices();
        Vec::new()
    }

    /// Adds the text typed into the focused editor.
    pub fn submit_focused(&mut self) -> Vec<Effect> {
        let Some(view) = self.settings.focused_mut() else {
            return Vec::new();
        };
        let result = view.submit(&mut self.panel);
        self.after_edit(result)
    }

    /// Removes the highlighted row of the focused editor.
    pub fn delete_focused(&mut self) -> Vec<Effect> {
        let Some(view) = self.settings.focused_mut() else {
            return Vec::new();
        };
        let result = view.delete_selected(&mut self.panel);
        self.after_edit(result)
    }

    /// Number of entries held by the editor bound to `setting`.
    pub fn entry_count(&self, setting: &str) -> usize {
        self.panel.editor(setting).map_or(0, |row| row.editor.entries().len())
    }

    /// Rebuilds the focus ring, keeping the current focus when possible.
    pub fn rebuild_focus(&mut self) {
        let old_focus = std::mem::take(&mut self.focus);
        self.focus = FocusBuilder::rebuild_for(&self.settings, Some(old_focus));
        if self.focus.focused().is_none() {
            self.focus.first();
        }
    }

    /// One-line summary of the panel state for the status bar.
    pub fn status_line(&self) -> String {
        let repo = self.panel.repo_name().unwrap_or("-");
        let state = match self.panel.state() {
            PanelState::Unloaded => "no project selected".to_string(),
            PanelState::Loading => "loading".to_string(),
            PanelState::Empty => "uploadvalidator is not configured for this project".to_string(),
            PanelState::LoadFailed(message) => format!("load failed: {message}"),
            PanelState::LoadedClean => "saved".to_string(),
            PanelState::LoadedDirty => "unsaved changes".to_string(),
            PanelState::Saving => "saving".to_string(),
        };
        let mode = if self.panel.is_read_only() { " (read-only)" } else { "" };
        format!("{repo}: {state}{mode}")
    }

    /// Applies a message and returns follow-up effects.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % 10;
                }
            }
            Msg::Resize(..) => {}
            Msg::ExecCompleted(outcome) => self.apply_outcome(outcome),
        }
        Vec::new()
    }

    fn apply_outcome(&mut self, outcome: &ExecOutcome) {
        match outcome {
            ExecOutcome::ConfigLoaded { generation, result } => {
                if self.panel.finish_load(*generation, result.clone()) == Completion::Applied {
                    self.settings.sync_with(&self.panel);
                    info!(state = ?self.panel.state(), "settings panel refreshed");
                }
            }
            ExecOutcome::ConfigSaved { generation, result } => {
                if self.panel.finish_save(*generation, result.clone()) == Completion::Applied {
                    self.settings.sync_with(&self.panel);
                }
            }
            ExecOutcome::Log(line) => self.push_notice(Notice::info(line.clone())),
        }
        self.collect_panel_notices();
    }

    fn after_edit(&mut self, result: Result<EditOutcome, PanelError>) -> Vec<Effect> {
        match result {
            Ok(outcome) => debug!(?outcome, "entry edit"),
            Err(error) => self.push_notice(Notice::error(error.to_string())),
        }
        self.collect_panel_notices();
        Vec::new()
    }

    fn refuse(&mut self, error: PanelError) -> Vec<Effect> {
        self.push_notice(Notice::warning(error.to_string()));
        Vec::new()
    }

    fn collect_panel_notices(&mut self) {
        for notice in self.panel.take_notices() {
            self.push_notice(notice);
        }
    }

    pub fn push_notice(&mut self, notice: Notice) {
        if self.notices.len() == NOTICE_LOG_CAPACITY {
            self.notices.pop_front();
        }
        self.notices.push_back(LoggedNotice { at: Local::now(), notice });
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uploadvalidator_types::{ConfigInfo, NoticeLevel};

    use super::*;

    fn config() -> ConfigInfo {
        serde_json::from_value(json!({
            "plugin_config": {
                "uploadvalidator": {
                    "blockedFileExtension": { "type": "ARRAY", "values": ["exe"] }
                }
            }
        }))
        .expect("config info")
    }

    fn loaded_app() -> App {
        let mut app = App::new(AppOptions::default());
        let effects = app.activate("platform/build");
        let Some(Effect::LoadConfigRequested { generation, .. }) = effects.first().cloned() else {
            panic!("expected a load request, got {effects:?}");
        };
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ConfigLoaded {
            generation,
            result: Ok(config()),
        })));
        app
    }

    #[test]
    fn activate_requests_load_and_remembers_repository() {
        let mut app = App::new(AppOptions::default());
        let effects = app.activate("platform/build");
        assert_eq!(
            effects,
            vec![
                Effect::LoadConfigRequested {
                    generation: 1,
                    repo: "platform/build".into()
                },
                Effect::RememberRepository("platform/build".into()),
            ]
        );
        assert_eq!(app.panel.state(), PanelState::Loading);
    }

    #[test]
    fn save_emits_request_and_failure_is_logged() {
        let mut app = loaded_app();
        app.panel.add_entry("blockedFileExtension", "bat").expect("known");
        let effects = app.save();
        let Some(Effect::SaveConfigRequested { generation, input, .. }) = effects.first().cloned() else {
            panic!("expected a save request, got {effects:?}");
        };
        assert_eq!(
            input.plugin_config_values["uploadvalidator"]["blockedFileExtension"].values,
            vec!["exe".to_string(), "bat".to_string()]
        );
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ConfigSaved {
            generation,
            result: Err("HTTP 500: boom".into()),
        })));
        assert_eq!(app.panel.state(), PanelState::LoadedDirty);
        let last = &app.notices.back().expect("notice").notice;
        assert_eq!(last.level, NoticeLevel::Error);
        assert_eq!(last.message, "HTTP 500: boom");
    }

    #[test]
    fn save_before_load_is_refused_with_a_notice() {
        let mut app = App::new(AppOptions::default());
        assert!(app.save().is_empty());
        assert_eq!(app.notices.back().map(|logged| logged.notice.level), Some(NoticeLevel::Warning));
    }

    #[test]
    fn stale_load_does_not_touch_the_panel() {
        let mut app = App::new(AppOptions::default());
        app.activate("one");
        app.activate("two");
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ConfigLoaded {
            generation: 1,
            result: Ok(config()),
        })));
        assert_eq!(app.panel.state(), PanelState::Loading);
        assert_eq!(app.status_line(), "two: loading");
    }

    #[test]
    fn read_only_status_is_reported() {
        let app = App::new(AppOptions {
            server_url: "https://review.example.com".into(),
            read_only: true,
        });
        assert!(app.status_line().ends_with("(read-only)"));
    }

    #[test]
    fn discard_restores_loaded_entries() {
        let mut app = loaded_app();
        app.panel.add_entry("blockedFileExtension", "bat").expect("known");
        app.discard();
        assert_eq!(app.panel.state(), PanelState::LoadedClean);
        assert_eq!(app.entry_count("blockedFileExtension"), 1);
    }
}
