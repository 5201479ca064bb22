//! Backend base-URL resolution.
//!
//! The base URL is resolved once at startup from an ordered chain of
//! sources; the first source yielding a non-empty value wins:
//!
//! | # | Source              | Applies when                          |
//! |---|---------------------|---------------------------------------|
//! | 1 | `SERVER_URL` global | always                                |
//! | 2 | `?server=` param    | always                                |
//! | 3 | stored `SERVER_URL` | page loaded from the filesystem       |
//! | 4 | `localhost:5000`    | page loaded from the filesystem       |
//!
//! When nothing matches the base stays empty and every API path is relative
//! to the current origin. The result is an [`ApiBase`] value handed to
//! whoever needs it; nothing is kept in a global.

use std::fmt;

use crate::config::{DEFAULT_SERVER_URL, FILE_PROTOCOL, SERVER_QUERY_PARAM, SERVER_URL_KEY};
use crate::error::StorageResult;

/// Host environment the base URL is resolved from.
///
/// Implemented by the browser bindings (window globals, `location`,
/// `localStorage`) and by the native CLI (env vars, page URL, storage file).
pub trait Environment {
    /// Pre-set global override, if the host defines one.
    fn server_url_override(&self) -> Option<String>;

    /// Raw query string of the current page, with or without the leading `?`.
    fn query_string(&self) -> Option<String>;

    /// Page protocol including the trailing colon (`"file:"`, `"https:"`).
    fn protocol(&self) -> Option<String>;

    /// Read a persisted value. Errors mean the storage itself is unavailable.
    fn stored_item(&self, key: &str) -> StorageResult<Option<String>>;
}

/// Which link of the chain produced the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrlSource {
    /// Global `SERVER_URL` override.
    Override,
    /// `server` query-string parameter.
    QueryString,
    /// Value persisted under `SERVER_URL`.
    Stored,
    /// Built-in default for filesystem pages.
    Default,
    /// Nothing matched; paths stay relative to the page origin.
    Origin,
}

impl BaseUrlSource {
    pub fn label(&self) -> &'static str {
        match self {
            BaseUrlSource::Override => "global override",
            BaseUrlSource::QueryString => "query string",
            BaseUrlSource::Stored => "stored setting",
            BaseUrlSource::Default => "built-in default",
            BaseUrlSource::Origin => "current origin",
        }
    }
}

impl fmt::Display for BaseUrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

type SourceFn = fn(&dyn Environment) -> Option<String>;

/// Resolution chain, in priority order.
const RESOLUTION_CHAIN: [(BaseUrlSource, SourceFn); 4] = [
    (BaseUrlSource::Override, from_override),
    (BaseUrlSource::QueryString, from_query_string),
    (BaseUrlSource::Stored, from_storage),
    (BaseUrlSource::Default, from_file_default),
];

/// Resolved backend base URL.
///
/// Empty means "same origin as the page". Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiBase {
    base: String,
}

impl ApiBase {
    /// Wrap an already known base URL.
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Base that keeps every path relative to the current origin.
    pub fn relative() -> Self {
        Self::default()
    }

    /// Resolve the base URL from `env`.
    pub fn resolve(env: &dyn Environment) -> Self {
        Self::resolve_traced(env).0
    }

    /// Resolve the base URL from `env`, also reporting which source won.
    pub fn resolve_traced(env: &dyn Environment) -> (Self, BaseUrlSource) {
        for (source, resolve) in RESOLUTION_CHAIN {
            if let Some(base) = resolve(env).filter(|b| !b.is_empty()) {
                log::debug!("Server base URL {} (from {})", base, source);
                return (Self::new(base), source);
            }
        }
        log::debug!("No server base URL configured, using current origin");
        (Self::relative(), BaseUrlSource::Origin)
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// True when API paths are left relative to the page origin.
    pub fn is_relative(&self) -> bool {
        self.base.is_empty()
    }

    /// Build the URL for an API path.
    ///
    /// The path always gets a leading `/`; a trailing `/` on the base is
    /// dropped so the two never double up.
    pub fn api(&self, path: &str) -> String {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        if self.base.is_empty() {
            path
        } else {
            format!("{}{}", strip_trailing_slash(&self.base), path)
        }
    }
}

impl fmt::Display for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

/// Drop a single trailing slash.
fn strip_trailing_slash(s: &str) -> &str {
    s.strip_suffix('/').unwrap_or(s)
}

fn is_file_page(env: &dyn Environment) -> bool {
    env.protocol().as_deref() == Some(FILE_PROTOCOL)
}

fn from_override(env: &dyn Environment) -> Option<String> {
    env.server_url_override()
        .map(|s| strip_trailing_slash(&s).to_string())
}

fn from_query_string(env: &dyn Environment) -> Option<String> {
    let query = env.query_string()?;
    let query = query.strip_prefix('?').unwrap_or(&query);

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == SERVER_QUERY_PARAM)
        .map(|(_, value)| strip_trailing_slash(&value).to_string())
}

fn from_storage(env: &dyn Environment) -> Option<String> {
    if !is_file_page(env) {
        return None;
    }
    match env.stored_item(SERVER_URL_KEY) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("Stored {} unreadable, ignoring: {}", SERVER_URL_KEY, e);
            None
        }
    }
}

fn from_file_default(env: &dyn Environment) -> Option<String> {
    is_file_page(env).then(|| DEFAULT_SERVER_URL.to_string())
}
