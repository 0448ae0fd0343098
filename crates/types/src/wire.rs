//! JSON shapes exchanged with the `/projects/{name}/config` endpoint.
//!
//! Only the fields this workspace reads are modeled; everything else in the
//! server's response is ignored on deserialization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Values of one list setting, as sent back to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingValues {
    #[serde(default)]
    pub values: Vec<String>,
}

impl SettingValues {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }
}

impl From<Vec<String>> for SettingValues {
    fn from(values: Vec<String>) -> Self {
        Self { values }
    }
}

/// Mapping from setting key to its values, in the order the server reported them.
pub type PluginSettings = IndexMap<String, SettingValues>;

/// Server-side description of one plugin configuration parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigParameterInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub values: Vec<String>,
    /// `None` means the server did not say; treated as editable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inheritable: Option<bool>,
}

impl ConfigParameterInfo {
    pub fn is_editable(&self) -> bool {
        self.editable.unwrap_or(true)
    }
}

/// Subset of the project `ConfigInfo` response that carries plugin sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_config: Option<IndexMap<String, IndexMap<String, ConfigParameterInfo>>>,
}

impl ConfigInfo {
    /// Returns the section for `plugin`, if the server sent one.
    pub fn plugin_section(&self, plugin: &str) -> Option<&IndexMap<String, ConfigParameterInfo>> {
        self.plugin_config.as_ref().and_then(|sections| sections.get(plugin))
    }
}

/// Body of the `PUT /projects/{name}/config` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInput {
    pub plugin_config_values: IndexMap<String, PluginSettings>,
}

impl ConfigInput {
    /// Wraps a full settings record as the new configuration of `plugin`.
    pub fn for_plugin(plugin: &str, settings: PluginSettings) -> Self {
        let mut plugin_config_values = IndexMap::new();
        plugin_config_values.insert(plugin.to_string(), settings);
        Self { plugin_config_values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_info_ignores_unknown_fields_and_defaults_values() {
        let raw = json!({
            "description": "project",
            "plugin_config": {
                "uploadvalidator": {
                    "blockedFileExtension": {
                        "display_name": "Blocked File Extensions",
                        "type": "ARRAY",
                        "values": ["exe"],
                        "permitted_values": []
                    },
                    "requiredFooter": { "type": "ARRAY" }
                }
            }
        });
        let info: ConfigInfo = serde_json::from_value(raw).expect("decode config info");
        let section = info.plugin_section("uploadvalidator").expect("section present");
        assert_eq!(section["blockedFileExtension"].values, vec!["exe".to_string()]);
        assert!(section["requiredFooter"].values.is_empty());
        assert!(section["requiredFooter"].is_editable());
    }

    #[test]
    fn config_input_serializes_nested_plugin_values() {
        let mut settings = PluginSettings::new();
        settings.insert("blockedFileExtension".into(), vec!["exe".to_string(), "bat".to_string()].into());
        let body = serde_json::to_value(ConfigInput::for_plugin("uploadvalidator", settings)).expect("encode");
        assert_eq!(
            body,
            json!({
                "plugin_config_values": {
                    "uploadvalidator": { "blockedFileExtension": { "values": ["exe", "bat"] } }
                }
            })
        );
    }
}
