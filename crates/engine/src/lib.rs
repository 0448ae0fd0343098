//! # Upload Validator Engine
//!
//! State management for editing the list-valued settings of the
//! `uploadvalidator` plugin on a single project.
//!
//! ## Architecture
//!
//! - **`entry_list`**: [`EntryListEditor`], an ordered, duplicate-free list
//!   with add/remove that reports every change with the full resulting list.
//! - **`panel`**: [`SettingsPanel`], which owns one editor per catalog
//!   setting, mirrors edits into a pending record, and turns load and save
//!   into explicit requests tagged with an activation generation.
//! - **`lint`**: advisory checks for pattern-valued entries.
//! - **`session`**: async helpers that drive a panel against a
//!   [`ProjectConfigApi`](uploadvalidator_api::ProjectConfigApi).
//!
//! ## Usage
//!
//! ```rust
//! use uploadvalidator_engine::{Completion, PanelState, SettingsPanel};
//! use uploadvalidator_types::ConfigInfo;
//!
//! let mut panel = SettingsPanel::new();
//! let request = panel.activate("platform/build");
//! // ... fetch the project config for `request.repo` ...
//! assert_eq!(panel.finish_load(request.generation, Ok(ConfigInfo::default())), Completion::Applied);
//! assert_eq!(panel.state(), PanelState::Empty);
//! ```

pub mod entry_list;
pub mod lint;
pub mod panel;
pub mod session;

pub use entry_list::{ChangeKind, DUPLICATE_ENTRY_MESSAGE, EditOutcome, EntryListEditor, ListChanged};
pub use lint::lint_entry;
pub use panel::{
    Completion, LoadRequest, NOTICE_CAPACITY, PanelError, PanelState, SaveRequest, SettingEditor, SettingsPanel,
};
pub use session::{EditAction, EditReport, SessionError, edit_and_save, execute_load, execute_save, load, save};
