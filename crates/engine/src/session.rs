//! Async drivers that run a [`SettingsPanel`] against a live API.
//!
//! The TUI executes panel requests through its own effect loop; these helpers
//! serve the headless commands, which simply await each request in turn.

use thiserror::Error;
use tracing::debug;
use uploadvalidator_api::ProjectConfigApi;
use uploadvalidator_types::{ConfigInfo, Notice};

use crate::entry_list::EditOutcome;
use crate::panel::{LoadRequest, PanelError, PanelState, SaveRequest, SettingsPanel};

/// Failure of a headless load/edit/save sequence.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error("failed to load settings for '{repo}': {message}")]
    Load { repo: String, message: String },
    #[error("failed to save settings for '{repo}': {message}")]
    Save { repo: String, message: String },
    #[error("project '{0}' has no uploadvalidator configuration")]
    NotConfigured(String),
    #[error("'{setting}' is not editable on this server")]
    NotEditable { setting: String },
}

/// Direction of a batch edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Add,
    Remove,
}

/// Summary of a batch edit applied by [`edit_and_save`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditReport {
    /// Values that changed the list.
    pub applied: Vec<String>,
    /// Values that were already present (add) or absent (remove).
    pub skipped: Vec<String>,
    /// Whether a save request was issued.
    pub saved: bool,
    /// Alerts and warnings raised along the way.
    pub notices: Vec<Notice>,
}

/// Performs a load request and returns the outcome in the form the panel expects.
pub async fn execute_load(api: &dyn ProjectConfigApi, request: &LoadRequest) -> Result<ConfigInfo, String> {
    debug!(repo = %request.repo, generation = request.generation, "fetching project config");
    api.fetch_project_config(&request.repo)
        .await
        .map_err(|error| error.to_string())
}

/// Performs a save request and returns the outcome in the form the panel expects.
pub async fn execute_save(api: &dyn ProjectConfigApi, request: &SaveRequest) -> Result<(), String> {
    debug!(repo = %request.repo, generation = request.generation, "storing project config");
    api.store_project_config(&request.repo, &request.input)
        .await
        .map_err(|error| error.to_string())
}

/// Activates `repo` and waits for its settings.
pub async fn load(panel: &mut SettingsPanel, api: &dyn ProjectConfigApi, repo: &str) -> Result<PanelState, SessionError> {
    let request = panel.activate(repo);
    let result = execute_load(api, &request).await;
    panel.finish_load(request.generation, result);
    match panel.state() {
        PanelState::LoadFailed(message) => Err(SessionError::Load {
            repo: repo.to_string(),
            message,
        }),
        state => Ok(state),
    }
}

/// Saves the pending settings and waits for the server's answer.
pub async fn save(panel: &mut SettingsPanel, api: &dyn ProjectConfigApi) -> Result<(), SessionError> {
    let request = panel.begin_save()?;
    let result = execute_save(api, &request).await;
    panel.finish_save(request.generation, result.clone());
    result.map_err(|message| SessionError::Save {
        repo: request.repo,
        message,
    })
}

/// Loads `repo`, applies `values` to `setting`, and saves when anything changed.
pub async fn edit_and_save(
    panel: &mut SettingsPanel,
    api: &dyn ProjectConfigApi,
    repo: &str,
    setting: &str,
    action: EditAction,
    values: &[String],
) -> Result<EditReport, SessionError> {
    match load(panel, api, repo).await? {
        PanelState::Empty => return Err(SessionError::NotConfigured(repo.to_string())),
        PanelState::LoadedClean => {}
        state => debug!(?state, "unexpected state after load"),
    }

    let mut report = EditReport::default();
    for value in values {
        let outcome = match action {
            EditAction::Add => panel.add_entry(setting, value)?,
            EditAction::Remove => panel.delete_entry(setting, value)?,
        };
        match outcome {
            EditOutcome::Changed(_) => report.applied.push(value.clone()),
            EditOutcome::Ignored | EditOutcome::Rejected(_) => report.skipped.push(value.clone()),
            EditOutcome::Disabled => {
                return Err(SessionError::NotEditable {
                    setting: setting.to_string(),
                });
            }
        }
    }
    report.notices.extend(panel.take_notices());

    if panel.is_dirty() {
        save(panel, api).await?;
        report.saved = true;
    }
    report.notices.extend(panel.take_notices());
    Ok(report)
}
