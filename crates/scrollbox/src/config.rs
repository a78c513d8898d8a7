//! Widget configuration.

use serde::{Deserialize, Serialize};

use crate::storage::SCROLL_KEY;

/// Names shared between the widget and the pages that embed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollboxConfig {
    /// Custom element tag the widget registers.
    pub element_name: String,
    /// Session storage key holding the scroll offset.
    pub storage_key: String,
    /// Global variable holding the page's path back to the site root.
    pub root_path_global: String,
}

impl Default for ScrollboxConfig {
    fn default() -> Self {
        Self {
            element_name: "mdbook-sidebar-scrollbox".to_string(),
            storage_key: SCROLL_KEY.to_string(),
            root_path_global: "path_to_root".to_string(),
        }
    }
}

impl ScrollboxConfig {
    /// Parse a TOML document; missing fields keep their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}
