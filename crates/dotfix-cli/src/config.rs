//! Configuration file support for dotfix
//!
//! Loads `.dotfix.toml` from current directory or parent directories.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".dotfix.toml";

const DEFAULT_EXTENSIONS: [&str; 2] = ["dot", "gv"];

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub actions: ActionsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns to exclude from processing
    pub exclude: Vec<String>,
    /// File extensions picked up when walking directories
    pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Command ids never offered by `actions`
    pub disabled: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json" or "diff"
    pub format: Option<String>,
}

impl Config {
    /// Load config from `.dotfix.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Whether a file found while walking a directory is a DOT file
    pub fn has_dot_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().map(|e| e.to_string_lossy()) else {
            return false;
        };
        match &self.paths.extensions {
            Some(extensions) => extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)),
            None => DEFAULT_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(&ext)),
        }
    }

    pub fn is_action_enabled(&self, command_id: &str) -> bool {
        !self.actions.disabled.iter().any(|id| id == command_id)
    }

    /// Disabled ids that do not name a known command
    pub fn unknown_disabled_actions<'a>(&'a self, known: &[&str]) -> Vec<&'a str> {
        self.actions
            .disabled
            .iter()
            .filter(|id| !known.contains(&id.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Check if a path should be excluded based on config patterns
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.paths.exclude {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
                if let Some(file_name) = path.file_name() {
                    if glob_pattern.matches(&file_name.to_string_lossy()) {
                        return true;
                    }
                }
            }

            // Directory patterns match any path segment
            if pattern.ends_with('/') {
                let dir_pattern = pattern.trim_end_matches('/');
                if path_str.contains(&format!("/{}/", dir_pattern))
                    || path_str.starts_with(&format!("{}/", dir_pattern))
                {
                    return true;
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_config(dir: &Path, content: &str) {
        fs::write(dir.join(CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn test_load_basic_config() {
        let temp = TempDir::new().unwrap();
        create_config(
            temp.path(),
            r#"
[paths]
exclude = ["build/", "*.generated.dot"]
extensions = ["dot"]

[actions]
disabled = ["DOT.consolidateDescendants"]

[output]
format = "json"
"#,
        );

        let (config, path) = Config::load_from(temp.path().to_path_buf())
            .unwrap()
            .unwrap();

        assert_eq!(path, temp.path().join(CONFIG_FILE_NAME));
        assert_eq!(
            config.paths.exclude,
            vec!["build/".to_string(), "*.generated.dot".to_string()]
        );
        assert_eq!(config.paths.extensions, Some(vec!["dot".to_string()]));
        assert!(!config.is_action_enabled("DOT.consolidateDescendants"));
        assert!(config.is_action_enabled("DOT.changeEdgeOp"));
        assert_eq!(config.output.format, Some("json".to_string()));
    }

    #[test]
    fn test_load_from_parent_directory() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "[output]\nformat = \"diff\"\n");
        let nested = temp.path().join("graphs").join("deep");
        fs::create_dir_all(&nested).unwrap();

        let (config, path) = Config::load_from(nested).unwrap().unwrap();
        assert_eq!(path, temp.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.output.format, Some("diff".to_string()));
    }

    #[test]
    fn test_load_empty_config() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "");

        let (config, _) = Config::load_from(temp.path().to_path_buf())
            .unwrap()
            .unwrap();

        assert!(config.paths.exclude.is_empty());
        assert!(config.paths.extensions.is_none());
        assert!(config.actions.disabled.is_empty());
        assert!(config.output.format.is_none());
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "[paths]\nexclude = 3\n");
        let err = Config::load_from(temp.path().to_path_buf()).unwrap_err();
        assert!(format!("{:#}", err).contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_no_config_found() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(temp.path().to_path_buf()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_default_extensions() {
        let config = Config::default();
        assert!(config.has_dot_extension(Path::new("a/graph.dot")));
        assert!(config.has_dot_extension(Path::new("graph.GV")));
        assert!(!config.has_dot_extension(Path::new("graph.txt")));
        assert!(!config.has_dot_extension(Path::new("Makefile")));
    }

    #[test]
    fn test_unknown_disabled_actions() {
        let config = Config {
            actions: ActionsConfig {
                disabled: vec!["DOT.changeEdgeOp".to_string(), "DOT.nope".to_string()],
            },
            ..Default::default()
        };
        assert_eq!(
            config.unknown_disabled_actions(&["DOT.changeEdgeOp"]),
            vec!["DOT.nope"]
        );
    }

    #[test]
    fn test_should_exclude_glob() {
        let config = Config {
            paths: PathsConfig {
                exclude: vec!["*.generated.dot".to_string()],
                extensions: None,
            },
            ..Default::default()
        };

        assert!(config.should_exclude(Path::new("deps.generated.dot")));
        assert!(!config.should_exclude(Path::new("deps.dot")));
    }

    #[test]
    fn test_should_exclude_directory() {
        let config = Config {
            paths: PathsConfig {
                exclude: vec!["build/".to_string()],
                extensions: None,
            },
            ..Default::default()
        };

        assert!(config.should_exclude(Path::new("project/build/out.dot")));
        assert!(config.should_exclude(Path::new("build/out.dot")));
        assert!(!config.should_exclude(Path::new("src/build.dot")));
    }
}
