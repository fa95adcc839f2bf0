//! `[gatsby]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [gatsby]
//! bin = "node_modules/gatsby/dist/bin/gatsby.js"  # Relative to root, else looked up on PATH
//! port = 8000                                      # Development server port
//! open = true                                      # Open a browser on `start`
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Generator executable and development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatsbyConfig {
    /// Generator executable.
    pub bin: PathBuf,

    /// Development server port.
    pub port: u16,

    /// Pass `-o` to the development server.
    pub open: bool,
}

impl Default for GatsbyConfig {
    fn default() -> Self {
        Self {
            bin: "node_modules/gatsby/dist/bin/gatsby.js".into(),
            port: 8000,
            open: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_gatsby_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(
            config.gatsby.bin,
            PathBuf::from("node_modules/gatsby/dist/bin/gatsby.js")
        );
        assert_eq!(config.gatsby.port, 8000);
        assert!(config.gatsby.open);
    }

    #[test]
    fn test_gatsby_config() {
        let config = test_parse_config("[gatsby]\nbin = \"gatsby\"\nport = 9000\nopen = false");
        assert_eq!(config.gatsby.bin, PathBuf::from("gatsby"));
        assert_eq!(config.gatsby.port, 9000);
        assert!(!config.gatsby.open);
    }
}
