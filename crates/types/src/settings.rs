//! Catalog of the list-valued settings exposed by the upload validator plugin.
//!
//! The catalog is the single source of truth for which settings the panel
//! edits and in which order they are displayed. Adding a setting is a matter
//! of appending a row to [`SETTINGS`]; nothing else in the workspace names a
//! setting key directly.

use std::fmt;

/// Identifier of the plugin's section inside a project's configuration.
pub const PLUGIN_NAME: &str = "uploadvalidator";

/// How the server interprets the entries of a setting.
///
/// Used for client-side linting only; the server remains authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Free-form literal values (extensions, content types, footers).
    Plain,
    /// Each entry is a regular expression.
    Regex,
    /// Each entry is a ref name, a `refs/...` prefix, or a `^refs/...` regex.
    RefPattern,
}

/// Static metadata describing a single list-valued setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDescriptor {
    /// Key used on the wire (e.g. `blockedFileExtension`).
    pub key: &'static str,
    /// Human-readable label.
    pub display_name: &'static str,
    /// One-line help text shown next to the editor.
    pub description: &'static str,
    pub kind: EntryKind,
}

impl fmt::Display for SettingDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key)
    }
}

/// Every setting the panel knows about, in display order.
pub const SETTINGS: &[SettingDescriptor] = &[
    SettingDescriptor {
        key: "allowedAuthorEmailPattern",
        display_name: "Allowed Author Email Pattern",
        description: "Only commits with author email matching one of these regex patterns will be accepted.",
        kind: EntryKind::Regex,
    },
    SettingDescriptor {
        key: "allowedCommitterEmailPattern",
        display_name: "Allowed Committer Email Pattern",
        description: "Only commits with committer email matching one of these regex patterns will be accepted.",
        kind: EntryKind::Regex,
    },
    SettingDescriptor {
        key: "binaryTypes",
        display_name: "Binary Types",
        description: "Content types treated as binary and skipped by content checks.",
        kind: EntryKind::Plain,
    },
    SettingDescriptor {
        key: "blockedContentType",
        display_name: "Blocked Content Type",
        description: "Pushes of commits that contain files with blocked content types will be rejected.",
        kind: EntryKind::Plain,
    },
    SettingDescriptor {
        key: "blockedFileExtension",
        display_name: "Blocked File Extensions",
        description: "Pushes of commits that contain files with these extensions will be rejected.",
        kind: EntryKind::Plain,
    },
    SettingDescriptor {
        key: "blockedKeywordPattern",
        display_name: "Blocked Keyword Pattern",
        description: "Pushes of commits that contain files with blocked keywords will be rejected.",
        kind: EntryKind::Regex,
    },
    SettingDescriptor {
        key: "invalidFilenamePattern",
        display_name: "Invalid Filename Pattern",
        description: "Pushes of commits that contain filenames matching one of these patterns will be rejected.",
        kind: EntryKind::Regex,
    },
    SettingDescriptor {
        key: "project",
        display_name: "Projects",
        description: "Only projects that match this regex will be validated.",
        kind: EntryKind::Regex,
    },
    SettingDescriptor {
        key: "ref",
        display_name: "Refs",
        description: "Only refs that match this regex will be validated.",
        kind: EntryKind::RefPattern,
    },
    SettingDescriptor {
        key: "requiredFooter",
        display_name: "Required Footers",
        description: "Pushes of commits that miss any of the footers will be rejected.",
        kind: EntryKind::Plain,
    },
];

/// Looks up a catalog row by its wire key (exact, case-sensitive).
pub fn find_setting(key: &str) -> Option<&'static SettingDescriptor> {
    SETTINGS.iter().find(|descriptor| descriptor.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_are_unique() {
        for (index, descriptor) in SETTINGS.iter().enumerate() {
            assert!(
                SETTINGS[index + 1..].iter().all(|other| other.key != descriptor.key),
                "duplicate key {}",
                descriptor.key
            );
        }
    }

    #[test]
    fn find_setting_is_case_sensitive() {
        assert!(find_setting("blockedFileExtension").is_some());
        assert!(find_setting("blockedfileextension").is_none());
        assert_eq!(find_setting("ref").map(|d| d.kind), Some(EntryKind::RefPattern));
    }
}
