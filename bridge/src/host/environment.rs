//! Native resolution environment.

use url::Url;

use super::storage::FileStorage;
use crate::error::StorageResult;
use crate::resolver::Environment;

/// [`Environment`] for the CLI: override from the process environment, a page
/// URL standing in for `window.location`, and a [`FileStorage`].
#[derive(Debug, Clone)]
pub struct NativeEnvironment {
    server_url: Option<String>,
    page_url: Option<Url>,
    storage: FileStorage,
}

impl NativeEnvironment {
    pub fn new(server_url: Option<String>, page_url: Option<Url>, storage: FileStorage) -> Self {
        Self {
            server_url,
            page_url,
            storage,
        }
    }

    pub fn page_url(&self) -> Option<&Url> {
        self.page_url.as_ref()
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }
}

impl Environment for NativeEnvironment {
    fn server_url_override(&self) -> Option<String> {
        self.server_url.clone()
    }

    fn query_string(&self) -> Option<String> {
        self.page_url
            .as_ref()
            .and_then(|u| u.query())
            .map(str::to_string)
    }

    fn protocol(&self) -> Option<String> {
        self.page_url.as_ref().map(|u| format!("{}:", u.scheme()))
    }

    fn stored_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage.get_item(key)
    }
}
