//! Discovery of Gerrit HTTP credentials.
//!
//! Resolution order:
//! - `GERRIT_USERNAME` + `GERRIT_PASSWORD` environment variables
//! - the `~/.netrc` stanza whose `machine` equals the server host

use std::{env, fmt, fs};

pub const USERNAME_ENV: &str = "GERRIT_USERNAME";
pub const PASSWORD_ENV: &str = "GERRIT_PASSWORD";

/// HTTP basic credentials (username + Gerrit HTTP password).
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Resolve credentials for `host` from the environment, then `~/.netrc`.
pub fn resolve_credentials(host: &str) -> Option<Credentials> {
    credentials_from_env().or_else(|| netrc_credentials(host))
}

fn credentials_from_env() -> Option<Credentials> {
    let username = env::var(USERNAME_ENV).ok().filter(|value| !value.trim().is_empty())?;
    let password = env::var(PASSWORD_ENV).ok().filter(|value| !value.is_empty())?;
    Some(Credentials {
        username: username.trim().to_string(),
        password,
    })
}

fn netrc_credentials(host: &str) -> Option<Credentials> {
    let home = dirs_next::home_dir()?;
    let content = fs::read_to_string(home.join(".netrc")).ok()?;
    parse_netrc_for_host(&content, host)
}

/// Small `.netrc` parser extracting the `login`/`password` pair of one machine.
///
/// ```text
/// machine review.example.com
///   login alice
///   password <HTTP PASSWORD>
/// ```
///
/// A `default` stanza is used when no machine matches.
pub fn parse_netrc_for_host(content: &str, host: &str) -> Option<Credentials> {
    let mut tokens = content.split_whitespace();
    let mut in_matching_stanza = false;
    let mut matched: (Option<String>, Option<String>) = (None, None);
    let mut fallback: (Option<String>, Option<String>) = (None, None);
    let mut in_default = false;

    while let Some(token) = tokens.next() {
        match token {
            "machine" => {
                if in_matching_stanza {
                    break;
                }
                in_default = false;
                in_matching_stanza = tokens.next().is_some_and(|machine| machine.eq_ignore_ascii_case(host));
            }
            "default" => {
                if in_matching_stanza {
                    break;
                }
                in_default = true;
            }
            "login" => {
                let value = tokens.next().map(str::to_string);
                if in_matching_stanza {
                    matched.0 = value;
                } else if in_default {
                    fallback.0 = value;
                }
            }
            "password" => {
                let value = tokens.next().map(str::to_string);
                if in_matching_stanza {
                    matched.1 = value;
                } else if in_default {
                    fallback.1 = value;
                }
            }
            _ => {}
        }
    }

    match (matched, fallback) {
        ((Some(username), Some(password)), _) => Some(Credentials { username, password }),
        (_, (Some(username), Some(password))) => Some(Credentials { username, password }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETRC: &str = "machine github.com login octo password gh-token\n\
                         machine review.example.com\n  login alice\n  password s3cret\n\
                         default login anon password anon-pass\n";

    #[test]
    fn picks_matching_machine() {
        let credentials = parse_netrc_for_host(NETRC, "review.example.com").expect("credentials");
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "s3cret");
    }

    #[test]
    fn falls_back_to_default_stanza() {
        let credentials = parse_netrc_for_host(NETRC, "other.example.com").expect("credentials");
        assert_eq!(credentials.username, "anon");
    }

    #[test]
    fn incomplete_stanza_yields_none() {
        assert!(parse_netrc_for_host("machine review.example.com login alice", "review.example.com").is_none());
    }

    #[test]
    fn env_credentials_take_precedence() {
        temp_env::with_vars(
            [(USERNAME_ENV, Some("bob")), (PASSWORD_ENV, Some("pw"))],
            || {
                let credentials = resolve_credentials("review.example.com").expect("credentials");
                assert_eq!(credentials.username, "bob");
                assert_eq!(credentials.password, "pw");
            },
        );
    }

    #[test]
    fn debug_output_hides_password() {
        let credentials = Credentials {
            username: "alice".into(),
            password: "s3cret".into(),
        };
        assert!(!format!("{credentials:?}").contains("s3cret"));
    }
}
