use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid format pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

fn default_skip_tags() -> Vec<String> {
    ["script", "style", "pre", "code", "tt", "figure"]
        .iter()
        .map(|t| t.to_string())
        .collect()
}

fn default_python() -> PathBuf {
    PathBuf::from("python")
}

/// Locations of the external renderers. Unset entries are looked up on `PATH`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererConfig {
    #[serde(default = "default_python")]
    pub python: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rst2html: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asciidoctor: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            rst2html: None,
            asciidoctor: None,
        }
    }
}

impl RendererConfig {
    /// Path of the `rst2html` script, falling back to a `PATH` lookup.
    pub fn resolve_rst2html(&self) -> PathBuf {
        self.rst2html.clone().unwrap_or_else(|| {
            ["rst2html.py", "rst2html"]
                .iter()
                .find_map(|name| which::which(name).ok())
                .unwrap_or_else(|| PathBuf::from("rst2html.py"))
        })
    }

    /// Path of the `asciidoctor` executable, falling back to a `PATH` lookup.
    pub fn resolve_asciidoctor(&self) -> PathBuf {
        self.asciidoctor.clone().unwrap_or_else(|| {
            which::which("asciidoctor").unwrap_or_else(|_| PathBuf::from("asciidoctor"))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Tags whose contents are never linted.
    #[serde(default = "default_skip_tags")]
    pub skip_tags: Vec<String>,
    /// Class names whose elements are never linted.
    #[serde(default)]
    pub skip_classes: Vec<String>,
    #[serde(default)]
    pub renderers: RendererConfig,
    /// File name glob to format name, e.g. `"*.txt" = "markdown"`.
    #[serde(default)]
    pub formats: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip_tags: default_skip_tags(),
            skip_classes: Vec::new(),
            renderers: RendererConfig::default(),
            formats: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.validate_patterns()?;

        // Expand shell variables and tilde in renderer paths
        let renderers = &mut config.renderers;
        renderers.python = Self::expand_path(&renderers.python).unwrap_or(renderers.python.clone());
        for path in [&mut renderers.rst2html, &mut renderers.asciidoctor]
            .into_iter()
            .flatten()
        {
            *path = Self::expand_path(path).unwrap_or(path.clone());
        }

        log::debug!("loaded config from {}", config_path.display());
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/proseline");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Format name configured for `path`, matched against its file name.
    ///
    /// Patterns are tried in sorted order and the first match wins.
    pub fn format_for(&self, path: &Path) -> Option<&str> {
        let file_name = path.file_name()?.to_string_lossy();
        self.formats
            .iter()
            .find(|(pattern, _)| {
                glob::Pattern::new(pattern).is_ok_and(|pattern| pattern.matches(&file_name))
            })
            .map(|(_, format)| format.as_str())
    }

    fn validate_patterns(&self) -> Result<(), ConfigError> {
        for pattern in self.formats.keys() {
            glob::Pattern::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }
        Ok(())
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/proseline/config.toml"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(
            config.skip_tags,
            vec!["script", "style", "pre", "code", "tt", "figure"]
        );
        assert_eq!(config.renderers.python, PathBuf::from("python"));
    }

    #[test]
    fn test_full_config_parses() {
        let config: Config = toml::from_str(
            r#"
skip_tags = ["pre", "kbd"]
skip_classes = ["no-lint"]

[renderers]
python = "/usr/bin/python3"
rst2html = "/opt/docutils/rst2html.py"

[formats]
"*.txt" = "markdown"
"#,
        )
        .unwrap();

        assert_eq!(config.skip_tags, vec!["pre", "kbd"]);
        assert_eq!(config.skip_classes, vec!["no-lint"]);
        assert_eq!(config.renderers.python, PathBuf::from("/usr/bin/python3"));
        assert_eq!(
            config.renderers.rst2html,
            Some(PathBuf::from("/opt/docutils/rst2html.py"))
        );
        assert_eq!(config.renderers.asciidoctor, None);
        assert_eq!(config.formats.get("*.txt").map(String::as_str), Some("markdown"));
    }

    #[test]
    fn test_format_for_matches_file_name() {
        let mut config = Config::default();
        config.formats.insert("*.txt".into(), "markdown".into());
        config.formats.insert("README*".into(), "rst".into());

        assert_eq!(config.format_for(Path::new("docs/notes.txt")), Some("markdown"));
        assert_eq!(config.format_for(Path::new("README")), Some("rst"));
        assert_eq!(config.format_for(Path::new("guide.md")), None);
    }

    #[test]
    fn test_explicit_renderer_paths_are_not_resolved() {
        let renderers = RendererConfig {
            python: PathBuf::from("python3"),
            rst2html: Some(PathBuf::from("/custom/rst2html.py")),
            asciidoctor: Some(PathBuf::from("/custom/asciidoctor")),
        };

        assert_eq!(
            renderers.resolve_rst2html(),
            PathBuf::from("/custom/rst2html.py")
        );
        assert_eq!(
            renderers.resolve_asciidoctor(),
            PathBuf::from("/custom/asciidoctor")
        );
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("PROSELINE_TEST_TOOLS", "/test/tools");
        }

        let expanded = Config::expand_path(Path::new("$PROSELINE_TEST_TOOLS/asciidoctor"));
        assert_eq!(expanded, Some(PathBuf::from("/test/tools/asciidoctor")));

        unsafe {
            env::remove_var("PROSELINE_TEST_TOOLS");
        }
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(Path::new("~/bin/rst2html.py")).unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("bin/rst2html.py"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_path(temp_dir.path().join("nonexistent.toml")).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let mut config = Config::default();
        config.skip_classes.push("draft".into());
        config.renderers.asciidoctor = Some(PathBuf::from("/usr/local/bin/asciidoctor"));

        config.save_to_path(&config_file).unwrap();
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "skip_tags = [").unwrap();

        let result = Config::load_from_path(&config_file);
        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[formats]\n\"[.txt\" = \"markdown\"\n").unwrap();

        let result = Config::load_from_path(&config_file);
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }
}
