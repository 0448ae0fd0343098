//! Settings panel: load, pending-edit tracking, and save orchestration.
//!
//! The panel performs no I/O. [`SettingsPanel::activate`] and
//! [`SettingsPanel::begin_save`] hand out request descriptions; the caller
//! executes them and reports back through [`SettingsPanel::finish_load`] and
//! [`SettingsPanel::finish_save`]. Every request carries the activation
//! generation it was issued under, and completions from an older generation
//! are discarded so switching repositories mid-flight cannot apply a stale
//! response.

use std::collections::VecDeque;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info, warn};
use uploadvalidator_types::{
    ConfigInfo, ConfigInput, ConfigParameterInfo, Notice, PLUGIN_NAME, PluginSettings, SETTINGS, SettingDescriptor,
    SettingValues,
};

use crate::entry_list::{ChangeKind, EditOutcome, EntryListEditor, ListChanged};
use crate::lint::lint_entry;

/// Maximum number of undelivered notices kept by the panel.
pub const NOTICE_CAPACITY: usize = 64;

/// Parameter type Gerrit reports for list-valued settings.
const ARRAY_TYPE: &str = "ARRAY";

/// Externally visible state of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    Unloaded,
    Loading,
    /// The server has no section for this plugin yet.
    Empty,
    /// The load request failed; carries the transport message.
    LoadFailed(String),
    LoadedClean,
    LoadedDirty,
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Unloaded,
    Loading,
    Empty,
    LoadFailed,
    Loaded,
    Saving,
}

/// Errors for requests that are not valid in the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("no repository has been activated")]
    NoRepository,
    #[error("settings are not loaded")]
    NotLoaded,
    #[error("a save is already in progress")]
    SaveInFlight,
    #[error("unknown setting '{0}'")]
    UnknownSetting(String),
}

/// A load the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: u64,
    pub repo: String,
}

/// A save the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub generation: u64,
    pub repo: String,
    pub input: ConfigInput,
}

/// Whether a completion was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Stale,
}

/// One row of the data-driven setting → editor table.
#[derive(Debug, Clone)]
pub struct SettingEditor {
    pub descriptor: &'static SettingDescriptor,
    pub editor: EntryListEditor,
    /// Whether the pending record contains this setting.
    pub populated: bool,
    /// Whether the server allows editing this setting.
    pub editable: bool,
}

impl SettingEditor {
    fn new(descriptor: &'static SettingDescriptor) -> Self {
        let mut editor = EntryListEditor::new(descriptor.key);
        editor.set_disabled(true);
        Self {
            descriptor,
            editor,
            populated: false,
            editable: true,
        }
    }

    fn reset(&mut self) {
        self.editor.set_entries(Vec::new());
        self.editor.set_disabled(true);
        self.populated = false;
        self.editable = true;
    }
}

/// Container owning one [`EntryListEditor`] per catalog setting.
#[derive(Debug, Clone)]
pub struct SettingsPanel {
    repo_name: Option<String>,
    generation: u64,
    phase: Phase,
    load_error: Option<String>,
    dirty: bool,
    read_only: bool,
    configuration: PluginSettings,
    pending: PluginSettings,
    editors: Vec<SettingEditor>,
    notices: VecDeque<Notice>,
}

impl Default for SettingsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsPanel {
    /// Builds a panel over the full setting catalog.
    pub fn new() -> Self {
        Self::with_settings(SETTINGS)
    }

    /// Builds a panel over an explicit catalog slice.
    pub fn with_settings(settings: &'static [SettingDescriptor]) -> Self {
        Self {
            repo_name: None,
            generation: 0,
            phase: Phase::Unloaded,
            load_error: None,
            dirty: false,
            read_only: false,
            configuration: PluginSettings::new(),
            pending: PluginSettings::new(),
            editors: settings.iter().map(SettingEditor::new).collect(),
            notices: VecDeque::new(),
        }
    }

    // ----- Accessors -----

    pub fn repo_name(&self) -> Option<&str> {
        self.repo_name.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn state(&self) -> PanelState {
        match self.phase {
            Phase::Unloaded => PanelState::Unloaded,
            Phase::Loading => PanelState::Loading,
            Phase::Empty => PanelState::Empty,
            Phase::LoadFailed => PanelState::LoadFailed(self.load_error.clone().unwrap_or_default()),
            Phase::Loaded if self.dirty => PanelState::LoadedDirty,
            Phase::Loaded => PanelState::LoadedClean,
            Phase::Saving => PanelState::Saving,
        }
    }

    /// Last configuration fetched from the server.
    pub fn configuration(&self) -> &PluginSettings {
        &self.configuration
    }

    /// Proposed next configuration, sent wholesale on save.
    pub fn pending(&self) -> &PluginSettings {
        &self.pending
    }

    pub fn editors(&self) -> &[SettingEditor] {
        &self.editors
    }

    pub fn editor(&self, setting: &str) -> Option<&SettingEditor> {
        self.editors.iter().find(|row| row.descriptor.key == setting)
    }

    /// Drains undelivered notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        self.refresh_disabled();
    }

    // ----- Load -----

    /// Starts a new activation for `repo`, discarding all state of the
    /// previous one.
    pub fn activate(&mut self, repo: impl Into<String>) -> LoadRequest {
        let repo = repo.into();
        self.generation += 1;
        self.repo_name = Some(repo.clone());
        self.phase = Phase::Loading;
        self.dirty = false;
        self.load_error = None;
        self.configuration.clear();
        self.pending.clear();
        for row in &mut self.editors {
            row.reset();
        }
        info!(repo = %repo, generation = self.generation, "loading upload validator settings");
        LoadRequest {
            generation: self.generation,
            repo,
        }
    }

    /// Re-issues the load for the current repository.
    pub fn reload(&mut self) -> Result<LoadRequest, PanelError> {
        if self.phase == Phase::Saving {
            return Err(PanelError::SaveInFlight);
        }
        let repo = self.repo_name.clone().ok_or(PanelError::NoRepository)?;
        Ok(self.activate(repo))
    }

    /// Applies the outcome of a load issued under `generation`.
    pub fn finish_load(&mut self, generation: u64, result: Result<ConfigInfo, String>) -> Completion {
        if generation != self.generation || self.phase != Phase::Loading {
            debug!(generation, current = self.generation, "discarding stale load result");
            return Completion::Stale;
        }
        match result {
            Ok(info) => match info.plugin_section(PLUGIN_NAME) {
                Some(section) => self.apply_section(section),
                None => {
                    info!(repo = ?self.repo_name, "no {PLUGIN_NAME} configuration present");
                    self.phase = Phase::Empty;
                }
            },
            Err(message) => {
                warn!(repo = ?self.repo_name, error = %message, "loading settings failed");
                self.push_notice(Notice::error(format!("Failed to load settings: {message}")));
                self.load_error = Some(message);
                self.phase = Phase::LoadFailed;
            }
        }
        self.refresh_disabled();
        Completion::Applied
    }

    fn apply_section(&mut self, section: &IndexMap<String, ConfigParameterInfo>) {
        let mut configuration = PluginSettings::new();
        for (key, parameter) in section {
            if !self.is_list_setting(key, parameter) {
                continue;
            }
            let mut editor = EntryListEditor::new(key.clone());
            editor.set_entries(parameter.values.clone());
            if editor.entries().len() != parameter.values.len() {
                warn!(setting = %key, "dropping duplicate entries reported by the server");
            }
            configuration.insert(key.clone(), SettingValues::new(editor.entries().to_vec()));
        }

        for row in &mut self.editors {
            let key = row.descriptor.key;
            match configuration.get(key) {
                Some(setting) => {
                    row.editor.set_entries(setting.values.clone());
                    row.populated = true;
                    row.editable = section.get(key).is_none_or(ConfigParameterInfo::is_editable);
                }
                None => row.reset(),
            }
        }

        self.pending = configuration.clone();
        self.configuration = configuration;
        self.dirty = false;
        self.phase = Phase::Loaded;
        info!(
            repo = ?self.repo_name,
            settings = self.configuration.len(),
            "upload validator settings loaded"
        );
    }

    fn is_list_setting(&self, key: &str, parameter: &ConfigParameterInfo) -> bool {
        match parameter.kind.as_deref() {
            Some(kind) => kind == ARRAY_TYPE,
            None => self.editors.iter().any(|row| row.descriptor.key == key),
        }
    }

    // ----- Edits -----

    /// Adds `candidate` to the editor of `setting` and mirrors the result.
    pub fn add_entry(&mut self, setting: &str, candidate: &str) -> Result<EditOutcome, PanelError> {
        let index = self.editor_index(setting)?;
        let outcome = self.editors[index].editor.add_entry(candidate);
        self.route_outcome(&outcome);
        Ok(outcome)
    }

    /// Deletes `identifier` from the editor of `setting` and mirrors the result.
    pub fn delete_entry(&mut self, setting: &str, identifier: &str) -> Result<EditOutcome, PanelError> {
        let index = self.editor_index(setting)?;
        let outcome = self.editors[index].editor.delete_entry(identifier);
        self.route_outcome(&outcome);
        Ok(outcome)
    }

    /// Deletes the row at `position` from the editor of `setting`.
    pub fn delete_at(&mut self, setting: &str, position: usize) -> Result<EditOutcome, PanelError> {
        let index = self.editor_index(setting)?;
        let outcome = self.editors[index].editor.delete_at(position);
        self.route_outcome(&outcome);
        Ok(outcome)
    }

    /// Listener for editor change notifications.
    ///
    /// Overwrites the pending values of the notified setting with the full
    /// resulting list and marks the panel dirty.
    pub fn on_list_changed(&mut self, change: &ListChanged) {
        if self.phase != Phase::Loaded {
            debug!(setting = %change.setting, "ignoring change outside of a loaded panel");
            return;
        }
        self.pending
            .insert(change.setting.clone(), SettingValues::new(change.all_entries.clone()));
        self.dirty = true;
        if let Some(row) = self.editors.iter_mut().find(|row| row.descriptor.key == change.setting) {
            row.populated = true;
        }

        if change.kind == ChangeKind::Added
            && let Some(row) = self.editor(&change.setting)
            && let Some(warning) = lint_entry(row.descriptor, &change.entry)
        {
            self.push_notice(Notice::warning(warning));
        }
    }

    /// Restores every editor and the pending record to the loaded configuration.
    pub fn discard_changes(&mut self) -> Result<(), PanelError> {
        match self.phase {
            Phase::Loaded => {}
            Phase::Saving => return Err(PanelError::SaveInFlight),
            _ => return Err(PanelError::NotLoaded),
        }
        if !self.dirty {
            return Ok(());
        }
        self.pending = self.configuration.clone();
        for row in &mut self.editors {
            let loaded = self.configuration.get(row.descriptor.key);
            row.populated = loaded.is_some();
            row.editor
                .set_entries(loaded.map(|setting| setting.values.clone()).unwrap_or_default());
        }
        self.dirty = false;
        self.push_notice(Notice::info("Discarded unsaved changes."));
        Ok(())
    }

    fn editor_index(&self, setting: &str) -> Result<usize, PanelError> {
        self.editors
            .iter()
            .position(|row| row.descriptor.key == setting)
            .ok_or_else(|| PanelError::UnknownSetting(setting.to_string()))
    }

    fn route_outcome(&mut self, outcome: &EditOutcome) {
        match outcome {
            EditOutcome::Changed(change) => self.on_list_changed(change),
            EditOutcome::Rejected(notice) => self.push_notice(notice.clone()),
            EditOutcome::Ignored | EditOutcome::Disabled => {}
        }
    }

    // ----- Save -----

    /// Snapshots the pending record into a save request and enters `Saving`.
    ///
    /// Editors are disabled until [`finish_save`](Self::finish_save) so no edit
    /// can race the in-flight request.
    pub fn begin_save(&mut self) -> Result<SaveRequest, PanelError> {
        match self.phase {
            Phase::Loaded => {}
            Phase::Saving => return Err(PanelError::SaveInFlight),
            _ => return Err(PanelError::NotLoaded),
        }
        let repo = self.repo_name.clone().ok_or(PanelError::NoRepository)?;
        self.phase = Phase::Saving;
        self.refresh_disabled();
        info!(repo = %repo, dirty = self.dirty, "saving upload validator settings");
        Ok(SaveRequest {
            generation: self.generation,
            repo,
            input: ConfigInput::for_plugin(PLUGIN_NAME, self.pending.clone()),
        })
    }

    /// Applies the outcome of a save issued under `generation`.
    pub fn finish_save(&mut self, generation: u64, result: Result<(), String>) -> Completion {
        if generation != self.generation || self.phase != Phase::Saving {
            debug!(generation, current = self.generation, "discarding stale save result");
            return Completion::Stale;
        }
        self.phase = Phase::Loaded;
        match result {
            Ok(()) => {
                self.configuration = self.pending.clone();
                self.dirty = false;
                self.push_notice(Notice::info("Settings saved."));
            }
            Err(message) => {
                warn!(repo = ?self.repo_name, error = %message, "saving settings failed");
                self.push_notice(Notice::error(message));
            }
        }
        self.refresh_disabled();
        Completion::Applied
    }

    // ----- Internals -----

    fn refresh_disabled(&mut self) {
        let accepting_edits = self.phase == Phase::Loaded && !self.read_only;
        for row in &mut self.editors {
            row.editor.set_disabled(!(accepting_edits && row.editable));
        }
    }

    fn push_notice(&mut self, notice: Notice) {
        debug!(level = %notice.level, message = %notice.message, "panel notice");
        if self.notices.len() == NOTICE_CAPACITY {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uploadvalidator_types::NoticeLevel;

    fn config(section: serde_json::Value) -> ConfigInfo {
        serde_json::from_value(json!({ "plugin_config": { "uploadvalidator": section } })).expect("config info")
    }

    fn loaded_panel(section: serde_json::Value) -> SettingsPanel {
        let mut panel = SettingsPanel::new();
        let request = panel.activate("platform/build");
        assert_eq!(panel.finish_load(request.generation, Ok(config(section))), Completion::Applied);
        panel
    }

    fn values(panel: &SettingsPanel, key: &str) -> Option<Vec<String>> {
        panel.pending().get(key).map(|setting| setting.values.clone())
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn new_panel_is_unloaded_with_disabled_editors() {
        let panel = SettingsPanel::new();
        assert_eq!(panel.state(), PanelState::Unloaded);
        assert_eq!(panel.editors().len(), SETTINGS.len());
        assert!(panel.editors().iter().all(|row| row.editor.is_disabled()));
    }

    #[test]
    fn load_populates_configuration_pending_and_editors() {
        let panel = loaded_panel(json!({
            "blockedFileExtension": { "type": "ARRAY", "values": ["exe", "dll"] },
            "requiredFooter": { "type": "ARRAY", "values": ["Bug"] }
        }));
        assert_eq!(panel.state(), PanelState::LoadedClean);
        assert_eq!(panel.configuration(), panel.pending());
        let row = panel.editor("blockedFileExtension").expect("row");
        assert_eq!(row.editor.entries(), ["exe".to_string(), "dll".to_string()]);
        assert!(row.populated);
        assert!(!row.editor.is_disabled());
        let absent = panel.editor("binaryTypes").expect("row");
        assert!(absent.editor.entries().is_empty());
        assert!(!absent.populated);
        assert!(!absent.editor.is_disabled());
    }

    #[test]
    fn non_list_parameters_are_excluded_and_unknown_arrays_kept() {
        let panel = loaded_panel(json!({
            "rejectWindowsLineEndings": { "type": "BOOLEAN", "values": ["true"] },
            "maxPathLength": { "type": "INT", "values": ["200"] },
            "futureList": { "type": "ARRAY", "values": ["x"] },
            "project": { "values": ["^platform/.*"] }
        }));
        assert!(panel.configuration().get("rejectWindowsLineEndings").is_none());
        assert!(panel.configuration().get("maxPathLength").is_none());
        assert_eq!(values(&panel, "futureList"), Some(strings(&["x"])));
        assert_eq!(values(&panel, "project"), Some(strings(&["^platform/.*"])));
    }

    #[test]
    fn missing_plugin_section_is_the_empty_state() {
        let mut panel = SettingsPanel::new();
        let request = panel.activate("platform/build");
        panel.finish_load(request.generation, Ok(ConfigInfo::default()));
        assert_eq!(panel.state(), PanelState::Empty);
        assert!(panel.editors().iter().all(|row| row.editor.is_disabled()));
        assert_eq!(panel.begin_save(), Err(PanelError::NotLoaded));
    }

    #[test]
    fn load_failure_is_reported_and_blocks_edits() {
        let mut panel = SettingsPanel::new();
        let request = panel.activate("platform/build");
        panel.finish_load(request.generation, Err("HTTP 403: forbidden".into()));
        assert_eq!(panel.state(), PanelState::LoadFailed("HTTP 403: forbidden".into()));
        let notices = panel.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].message.contains("HTTP 403: forbidden"));
        assert_eq!(
            panel.add_entry("blockedFileExtension", "exe").expect("known"),
            EditOutcome::Disabled
        );
    }

    #[test]
    fn add_then_save_succeeds_and_returns_to_clean() {
        let mut panel = loaded_panel(json!({
            "blockedFileExtension": { "type": "ARRAY", "values": ["exe"] }
        }));
        panel.add_entry("blockedFileExtension", "bat").expect("known setting");
        assert_eq!(panel.state(), PanelState::LoadedDirty);
        assert_eq!(values(&panel, "blockedFileExtension"), Some(strings(&["exe", "bat"])));

        let request = panel.begin_save().expect("save request");
        assert_eq!(panel.state(), PanelState::Saving);
        assert_eq!(
            serde_json::to_value(&request.input).expect("encode"),
            json!({
                "plugin_config_values": {
                    "uploadvalidator": { "blockedFileExtension": { "values": ["exe", "bat"] } }
                }
            })
        );

        panel.finish_save(request.generation, Ok(()));
        assert_eq!(panel.state(), PanelState::LoadedClean);
        assert_eq!(panel.configuration(), panel.pending());
        let notices = panel.take_notices();
        assert_eq!(notices.last().map(|notice| notice.level), Some(NoticeLevel::Info));
    }

    #[test]
    fn failed_save_keeps_pending_dirty_and_surfaces_error_verbatim() {
        let mut panel = loaded_panel(json!({
            "blockedFileExtension": { "type": "ARRAY", "values": ["exe"] }
        }));
        panel.add_entry("blockedFileExtension", "bat").expect("known setting");
        let request = panel.begin_save().expect("save request");
        panel.finish_save(request.generation, Err("HTTP 409: conflict".into()));

        assert_eq!(panel.state(), PanelState::LoadedDirty);
        assert_eq!(values(&panel, "blockedFileExtension"), Some(strings(&["exe", "bat"])));
        let notices = panel.take_notices();
        assert_eq!(notices, vec![Notice::error("HTTP 409: conflict")]);
    }

    #[test]
    fn saving_unmodified_settings_round_trips_the_loaded_configuration() {
        let mut panel = loaded_panel(json!({
            "blockedFileExtension": { "type": "ARRAY", "values": ["exe"] },
            "requiredFooter": { "type": "ARRAY", "values": ["Change-Id"] }
        }));
        let loaded = panel.configuration().clone();
        let request = panel.begin_save().expect("save request");
        assert_eq!(request.input, ConfigInput::for_plugin(PLUGIN_NAME, loaded));
        panel.finish_save(request.generation, Err("offline".into()));
        assert_eq!(panel.state(), PanelState::LoadedClean);
    }

    #[test]
    fn pending_mirrors_editor_after_every_change() {
        let mut panel = loaded_panel(json!({
            "requiredFooter": { "type": "ARRAY", "values": ["Bug"] }
        }));
        panel.add_entry("requiredFooter", "Change-Id").expect("known");
        panel.delete_entry("requiredFooter", "Bug").expect("known");
        panel.add_entry("binaryTypes", "application/zip").expect("known");
        for row in panel.editors() {
            if let Some(setting) = panel.pending().get(row.descriptor.key) {
                assert_eq!(row.editor.entries(), setting.values.as_slice());
            }
        }
        assert_eq!(values(&panel, "binaryTypes"), Some(strings(&["application/zip"])));
    }

    #[test]
    fn removing_last_entry_keeps_setting_with_empty_values() {
        let mut panel = loaded_panel(json!({
            "requiredFooter": { "type": "ARRAY", "values": ["Bug"] }
        }));
        panel.delete_at("requiredFooter", 0).expect("known");
        assert_eq!(values(&panel, "requiredFooter"), Some(Vec::new()));
        assert!(panel.is_dirty());
    }

    #[test]
    fn duplicate_add_raises_alert_without_dirtying() {
        let mut panel = loaded_panel(json!({
            "blockedFileExtension": { "type": "ARRAY", "values": ["exe"] }
        }));
        panel.add_entry("blockedFileExtension", "exe").expect("known");
        assert_eq!(panel.state(), PanelState::LoadedClean);
        assert_eq!(
            panel.take_notices(),
            vec![Notice::warning(crate::entry_list::DUPLICATE_ENTRY_MESSAGE)]
        );
    }

    #[test]
    fn invalid_regex_entry_is_added_with_a_warning() {
        let mut panel = loaded_panel(json!({
            "blockedKeywordPattern": { "type": "ARRAY", "values": [] }
        }));
        let outcome = panel.add_entry("blockedKeywordPattern", "foo(").expect("known");
        assert!(outcome.changed().is_some());
        let notices = panel.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn second_save_is_rejected_while_in_flight_and_editors_lock() {
        let mut panel = loaded_panel(json!({
            "blockedFileExtension": { "type": "ARRAY", "values": ["exe"] }
        }));
        panel.begin_save().expect("first save");
        assert_eq!(panel.begin_save(), Err(PanelError::SaveInFlight));
        assert_eq!(
            panel.add_entry("blockedFileExtension", "bat").expect("known"),
            EditOutcome::Disabled
        );
        assert_eq!(panel.reload(), Err(PanelError::SaveInFlight));
    }

    #[test]
    fn stale_completions_are_discarded_after_reactivation() {
        let mut panel = SettingsPanel::new();
        let first = panel.activate("platform/build");
        let second = panel.activate("platform/tools");
        let stale = config(json!({ "blockedFileExtension": { "type": "ARRAY", "values": ["exe"] } }));
        assert_eq!(panel.finish_load(first.generation, Ok(stale)), Completion::Stale);
        assert_eq!(panel.state(), PanelState::Loading);
        panel.finish_load(second.generation, Ok(config(json!({}))));
        assert_eq!(panel.state(), PanelState::LoadedClean);
        assert_eq!(panel.repo_name(), Some("platform/tools"));

        let save = panel.begin_save().expect("save");
        panel.activate("platform/other");
        assert_eq!(panel.finish_save(save.generation, Ok(())), Completion::Stale);
        assert_eq!(panel.state(), PanelState::Loading);
    }

    #[test]
    fn non_editable_settings_and_read_only_mode_disable_editors() {
        let mut panel = loaded_panel(json!({
            "blockedFileExtension": { "type": "ARRAY", "values": ["exe"], "editable": false },
            "requiredFooter": { "type": "ARRAY", "values": ["Bug"] }
        }));
        assert!(panel.editor("blockedFileExtension").expect("row").editor.is_disabled());
        assert!(!panel.editor("requiredFooter").expect("row").editor.is_disabled());
        panel.set_read_only(true);
        assert!(panel.editors().iter().all(|row| row.editor.is_disabled()));
    }

    #[test]
    fn discard_restores_loaded_configuration() {
        let mut panel = loaded_panel(json!({
            "blockedFileExtension": { "type": "ARRAY", "values": ["exe"] }
        }));
        panel.add_entry("blockedFileExtension", "bat").expect("known");
        panel.add_entry("requiredFooter", "Bug").expect("known");
        panel.discard_changes().expect("discard");
        assert_eq!(panel.state(), PanelState::LoadedClean);
        assert_eq!(panel.pending(), panel.configuration());
        assert!(panel.pending().get("requiredFooter").is_none());
        assert_eq!(
            panel.editor("blockedFileExtension").expect("row").editor.entries(),
            ["exe".to_string()]
        );
    }

    #[test]
    fn first_edit_of_absent_setting_marks_it_populated() {
        let mut panel = loaded_panel(json!({}));
        assert!(!panel.editor("requiredFooter").expect("row").populated);
        panel.add_entry("requiredFooter", "Bug").expect("known");
        assert!(panel.editor("requiredFooter").expect("row").populated);
        panel.discard_changes().expect("discard");
        assert!(!panel.editor("requiredFooter").expect("row").populated);
    }

    #[test]
    fn duplicate_server_values_are_deduplicated_on_load() {
        let panel = loaded_panel(json!({
            "binaryTypes": { "type": "ARRAY", "values": ["a", "b", "a"] }
        }));
        assert_eq!(values(&panel, "binaryTypes"), Some(strings(&["a", "b"])));
    }

    #[test]
    fn unknown_setting_is_an_error() {
        let mut panel = loaded_panel(json!({}));
        assert_eq!(
            panel.add_entry("nope", "x"),
            Err(PanelError::UnknownSetting("nope".into()))
        );
    }

    #[test]
    fn notice_queue_is_bounded() {
        let mut panel = loaded_panel(json!({
            "blockedFileExtension": { "type": "ARRAY", "values": ["exe"] }
        }));
        for _ in 0..(NOTICE_CAPACITY + 10) {
            panel.add_entry("blockedFileExtension", "exe").expect("known");
        }
        assert_eq!(panel.take_notices().len(), NOTICE_CAPACITY);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const KEYS: [&str; 3] = ["blockedFileExtension", "requiredFooter", "binaryTypes"];

    fn edits() -> impl Strategy<Value = Vec<(usize, bool, String)>> {
        prop::collection::vec((0..KEYS.len(), any::<bool>(), "[a-c]{0,2}"), 0..40)
    }

    fn loaded() -> SettingsPanel {
        let mut panel = SettingsPanel::new();
        let request = panel.activate("platform/build");
        let info = ConfigInfo {
            plugin_config: Some(IndexMap::from([(
                PLUGIN_NAME.to_string(),
                IndexMap::from([(
                    "blockedFileExtension".to_string(),
                    ConfigParameterInfo {
                        kind: Some(ARRAY_TYPE.into()),
                        values: vec!["a".into()],
                        ..Default::default()
                    },
                )]),
            )])),
        };
        panel.finish_load(request.generation, Ok(info));
        panel
    }

    proptest! {
        /// After any edit sequence every editor shows exactly its pending
        /// values, and the panel is dirty once any edit has landed.
        #[test]
        fn pending_mirrors_editors(ops in edits()) {
            let mut panel = loaded();
            let mut changed = false;
            for (key, add, value) in ops {
                let outcome = if add {
                    panel.add_entry(KEYS[key], &value)
                } else {
                    panel.delete_entry(KEYS[key], &value)
                };
                changed |= matches!(outcome, Ok(EditOutcome::Changed(_)));
                for row in panel.editors() {
                    let pending = panel.pending().get(row.descriptor.key);
                    prop_assert_eq!(row.populated, pending.is_some());
                    let shown = pending.map(|setting| setting.values.as_slice()).unwrap_or_default();
                    prop_assert_eq!(row.editor.entries(), shown);
                }
                prop_assert!(panel.pending().contains_key("blockedFileExtension"));
                prop_assert_eq!(panel.is_dirty(), changed);
            }
        }
    }
}
