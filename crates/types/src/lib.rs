//! Shared type definitions for the upload validator admin tools.
//!
//! - [`settings`]: the static catalog of list-valued settings.
//! - [`wire`]: JSON shapes of the project config endpoint.
//! - [`Effect`], [`Msg`], [`ExecOutcome`]: the message vocabulary between
//!   pure state updates and the effect executor in the TUI.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod settings;
pub mod wire;

pub use settings::{EntryKind, PLUGIN_NAME, SETTINGS, SettingDescriptor, find_setting};
pub use wire::{ConfigInfo, ConfigInput, ConfigParameterInfo, PluginSettings, SettingValues};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        f.write_str(label)
    }
}

/// A transient, non-fatal message for the user (alerts and error notices).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Side effects requested by state updates and executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch `/projects/{repo}/config` for the given panel generation.
    LoadConfigRequested { generation: u64, repo: String },
    /// Store the pending settings for the given panel generation.
    SaveConfigRequested {
        generation: u64,
        repo: String,
        input: ConfigInput,
    },
    /// Persist the repository as the last one opened.
    RememberRepository(String),
    /// Leave the application.
    Quit,
}

/// Result of an asynchronous effect.
///
/// Transport failures are carried as display strings so they can be shown to
/// the user verbatim.
#[derive(Debug, Clone)]
pub enum ExecOutcome {
    ConfigLoaded {
        generation: u64,
        result: Result<ConfigInfo, String>,
    },
    ConfigSaved {
        generation: u64,
        result: Result<(), String>,
    },
    /// Plain log line produced by an effect with no state transition.
    Log(String),
}

/// Messages that can be sent to update the application state.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (throbber animation while requests are in flight).
    Tick,
    /// Terminal resized.
    Resize(u16, u16),
    /// Background execution completed with outcome.
    ExecCompleted(Box<ExecOutcome>),
}
