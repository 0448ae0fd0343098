//! # Upload Validator Settings TUI
//!
//! Terminal interface for editing the list-valued `uploadvalidator` settings
//! of one Gerrit project. Each setting gets its own entry list; edits are
//! collected into a pending record and written back with a single save.
//!
//! ## Architecture
//!
//! State updates are pure (`app`, components) and report [`Effect`]s; the
//! `cmd` layer executes them against a
//! [`ProjectConfigApi`](uploadvalidator_api::ProjectConfigApi) and the
//! runtime feeds the outcomes back as messages.
//!
//! [`Effect`]: uploadvalidator_types::Effect

mod app;
mod cmd;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use uploadvalidator_api::ProjectConfigApi;
use uploadvalidator_util::UserPreferences;

pub use app::AppOptions;

/// Everything the TUI needs to start.
pub struct TuiConfig {
    pub api: Arc<dyn ProjectConfigApi>,
    pub preferences: Arc<UserPreferences>,
    /// Project whose settings are opened on startup.
    pub repo: String,
    pub options: AppOptions,
}

/// Runs the settings TUI until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be put into (or restored from)
/// raw mode or drawing fails. REST failures are shown inside the UI.
pub async fn run(config: TuiConfig) -> Result<()> {
    let app = app::App::new(config.options);
    let context = cmd::CommandContext {
        api: config.api,
        preferences: config.preferences,
    };
    ui::runtime::run_app(app, context, config.repo).await
}
