//! Gerrit REST client for project plugin configuration.
//!
//! This crate provides a lightweight client for the two endpoints the upload
//! validator admin tools need. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Discovering credentials from `GERRIT_USERNAME`/`GERRIT_PASSWORD` or `~/.netrc`
//! - Validating the server base URL (https unless localhost)
//! - Stripping Gerrit's `)]}'` response guard before JSON decoding
//!
//! The primary entry point is [`GerritClient`]; consumers depend on the
//! [`ProjectConfigApi`] trait so they can be exercised against fakes.
//!
//! # Example
//!
//! ```ignore
//! use uploadvalidator_api::{GerritClient, ProjectConfigApi};
//!
//! async fn show() -> anyhow::Result<()> {
//!     let client = GerritClient::from_env(None)?;
//!     let config = client.fetch_project_config("platform/build").await?;
//!     println!("{:?}", config.plugin_section("uploadvalidator"));
//!     Ok(())
//! }
//! ```

mod client;
mod credentials;
mod error;

pub use client::{BASE_URL_ENV, GerritClient, ProjectConfigApi, XSSI_PREFIX, project_config_path, strip_xssi_prefix};
pub use credentials::{Credentials, PASSWORD_ENV, USERNAME_ENV, parse_netrc_for_host, resolve_credentials};
pub use error::ApiError;
