//! # Text Processing Utilities
//!
//! Redaction of credentials before text reaches logs or the screen. Gerrit
//! HTTP passwords travel as basic-auth headers and occasionally appear in
//! URLs as user info, so both shapes are covered.

use once_cell::sync::Lazy;
use regex::Regex;

/// Redacts values that look like secrets in a string.
///
/// Key names and URL hosts are preserved so the output stays useful for
/// debugging.
///
/// # Example
/// ```rust
/// use uploadvalidator_util::redact_sensitive;
///
/// let redacted = redact_sensitive("Authorization: Basic YWxpY2U6c2VjcmV0");
/// assert_eq!(redacted, "Authorization: [REDACTED]");
///
/// let redacted = redact_sensitive("GERRIT_PASSWORD=hunter2");
/// assert_eq!(redacted, "GERRIT_PASSWORD=[REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    redact_sensitive_with(input, "[REDACTED]")
}

/// Redacts sensitive-looking values, using a custom replacement token.
pub fn redact_sensitive_with(input: &str, replacement: &str) -> String {
    let mut redacted = input.to_string();

    for pattern in get_redact_patterns().iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                let suffix = captures.get(3).map(|m| m.as_str()).unwrap_or("");
                format!("{}{}{}", prefix, replacement, suffix)
            })
            .to_string();
    }

    redacted
}

/// Returns the compiled redaction patterns, built once.
///
/// Every pattern captures `(prefix)(secret)(suffix?)`; only the secret group
/// is replaced.
pub fn get_redact_patterns() -> &'static Vec<Regex> {
    static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(build_redact_patterns);

    &REDACT_PATTERNS
}

fn build_redact_patterns() -> Vec<Regex> {
    [
        r"(?i)(authorization:\s+)([^\r\n]+)()",
        r"(?i)((?:^|\b)(?:Bearer|Basic)\s+)([A-Za-z0-9\-._~+/]+=*)()",
        r"(?i)(\b[A-Z0-9_]*(?:PASSWORD|TOKEN|SECRET|KEY)=)([^\s]+)()",
        r"(?i)(\bpassword\s+)([^\s]+)()",
        r"(https?://[^\s:/@]+:)([^\s@/]+)(@)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
}
