use pagebuilder_editor::EditorOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "pagebuilder.config.json";

/// Page builder configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the client-local history store
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// Directory published pages are written to
    #[serde(default = "default_publish_dir")]
    pub publish_dir: String,

    /// Page file used when `--page` is not given
    #[serde(default = "default_page")]
    pub page: String,

    /// Session options (`gridCols`, `historyLimit`, `defaultViewport`)
    #[serde(flatten)]
    pub editor: EditorOptions,
}

fn default_storage_dir() -> String {
    ".pagebuilder".to_string()
}

fn default_publish_dir() -> String {
    "dist".to_string()
}

fn default_page() -> String {
    "page.json".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the history store directory
    pub fn get_storage_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.storage_dir)
    }

    pub fn get_publish_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.publish_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            publish_dir: default_publish_dir(),
            page: default_page(),
            editor: EditorOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebuilder_common::Viewport;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "storageDir": ".history",
            "page": "pages/home.json",
            "gridCols": 6,
            "historyLimit": 20,
            "defaultViewport": "mobile"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.storage_dir, ".history");
        assert_eq!(config.publish_dir, "dist");
        assert_eq!(config.page, "pages/home.json");
        assert_eq!(config.editor.grid_cols, 6);
        assert_eq!(config.editor.history_limit, 20);
        assert_eq!(config.editor.default_viewport, Viewport::Mobile);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage_dir, ".pagebuilder");
        assert_eq!(config.editor.grid_cols, 12);
        assert_eq!(config.editor.history_limit, 100);

        let parsed: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config, Config::default());
    }
}
