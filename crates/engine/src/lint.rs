//! Advisory checks for newly added entries.
//!
//! The server compiles these settings with a backtracking regex dialect
//! (lookaround, backreferences), so patterns are checked with `fancy-regex`.
//! These checks only warn; they never block an edit.

use fancy_regex::Regex;
use uploadvalidator_types::{EntryKind, SettingDescriptor};

/// Returns a warning for `value` when it looks invalid for `descriptor`.
pub fn lint_entry(descriptor: &SettingDescriptor, value: &str) -> Option<String> {
    match descriptor.kind {
        EntryKind::Plain => None,
        EntryKind::Regex => regex_error(value).map(|reason| {
            format!(
                "'{value}' in {} may be rejected: not a valid regular expression ({reason})",
                descriptor.display_name
            )
        }),
        EntryKind::RefPattern => lint_ref_pattern(value).map(|reason| {
            format!("'{value}' in {} may be rejected: {reason}", descriptor.display_name)
        }),
    }
}

fn lint_ref_pattern(value: &str) -> Option<String> {
    if let Some(pattern) = value.strip_prefix('^') {
        if !pattern.starts_with("refs/") {
            return Some("ref regexes must start with ^refs/".into());
        }
        return regex_error(value).map(|reason| format!("not a valid regular expression ({reason})"));
    }
    if !value.starts_with("refs/") {
        return Some("ref names must start with refs/".into());
    }
    None
}

fn regex_error(pattern: &str) -> Option<String> {
    Regex::new(pattern).err().map(|error| error_cause(&error.to_string()).to_string())
}

/// Wrapped engine errors render as a multi-line report whose last line names the cause.
fn error_cause(text: &str) -> &str {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uploadvalidator_types::find_setting;

    fn descriptor(key: &str) -> &'static SettingDescriptor {
        find_setting(key).expect("known setting")
    }

    #[test]
    fn plain_entries_are_never_flagged() {
        assert!(lint_entry(descriptor("blockedFileExtension"), "(((").is_none());
    }

    #[test]
    fn broken_regex_is_flagged() {
        let warning = lint_entry(descriptor("blockedKeywordPattern"), "foo(").expect("warning");
        assert!(warning.contains("Blocked Keyword Pattern"), "{warning}");
        assert!(lint_entry(descriptor("blockedKeywordPattern"), "secret_[a-z]+").is_none());
    }

    #[test]
    fn lookaround_and_backreferences_are_accepted() {
        assert_eq!(
            lint_entry(
                descriptor("allowedAuthorEmailPattern"),
                r"^(?!.*@evil\.com).*@example\.com$"
            ),
            None
        );
        assert_eq!(lint_entry(descriptor("blockedKeywordPattern"), r"(foo)\1"), None);
    }

    #[test]
    fn warning_names_the_cause_not_a_header() {
        let warning = lint_entry(descriptor("blockedKeywordPattern"), "foo(").expect("warning");
        assert!(!warning.contains("()"), "{warning}");
        assert!(!warning.trim_end().ends_with("error:)"), "{warning}");
        assert_eq!(
            error_cause("regex parse error:\n    foo(\n       ^\nerror: unclosed group\n"),
            "error: unclosed group"
        );
    }

    #[test]
    fn ref_patterns_follow_ref_section_rules() {
        let refs = descriptor("ref");
        assert!(lint_entry(refs, "refs/heads/main").is_none());
        assert!(lint_entry(refs, "refs/heads/*").is_none());
        assert!(lint_entry(refs, "^refs/heads/release-.*").is_none());
        assert!(lint_entry(refs, "^refs/heads/(?!sandbox/).*").is_none());
        assert!(lint_entry(refs, "heads/main").is_some());
        assert!(lint_entry(refs, "^heads/.*").is_some());
        assert!(lint_entry(refs, "^refs/heads/(").is_some());
    }
}
