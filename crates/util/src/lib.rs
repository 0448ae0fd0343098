//! Utility helpers shared by the upload validator admin crates: path
//! handling, preference persistence, and secret redaction.

pub mod path_processing;
pub mod preferences;
pub mod text_processing;

pub use path_processing::{APP_DIR_NAME, app_config_dir, expand_tilde};
pub use preferences::{PreferencesError, PreferencesPayload, UserPreferences};
pub use text_processing::{redact_sensitive, redact_sensitive_with};
