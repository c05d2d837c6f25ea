use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default name of the namespace the built-ins are registered under.
pub const DEFAULT_NAMESPACE: &str = "builtins";

pub const DEFAULT_DOC: &str = "Built-in functions, exceptions, and other objects.\n\n\
Noteworthy: None is the 'nil' object; Ellipsis represents '...' in slices.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where `print` writes when no `file` argument is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
}

impl OutputTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputTarget::Stdout => "stdout",
            OutputTarget::Stderr => "stderr",
        }
    }
}

/// What the start-up registration pass installs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuiltinsConfig {
    /// Namespace the functions are registered under
    pub namespace: String,
    /// Namespace documentation
    pub doc: String,
    /// Default sink for `print`
    pub output: OutputTarget,
    /// Built-ins to leave out of the namespace
    pub disabled: Vec<String>,
}

impl Default for BuiltinsConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            doc: DEFAULT_DOC.to_string(),
            output: OutputTarget::Stdout,
            disabled: Vec::new(),
        }
    }
}

impl BuiltinsConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        !self.disabled.iter().any(|d| d == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let config = BuiltinsConfig::from_toml_str("").unwrap();
        assert_eq!(config, BuiltinsConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = BuiltinsConfig::from_toml_str(
            r#"
            namespace = "core"
            doc = "core functions"
            output = "stderr"
            disabled = ["print", "hash"]
            "#,
        )
        .unwrap();
        assert_eq!(config.namespace, "core");
        assert_eq!(config.output, OutputTarget::Stderr);
        assert!(!config.is_enabled("print"));
        assert!(config.is_enabled("abs"));
    }

    #[test]
    fn rejects_unknown_output() {
        let err = BuiltinsConfig::from_toml_str(r#"output = "printer""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "disabled = [\"round\"]").unwrap();
        let config = BuiltinsConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.disabled, vec!["round".to_string()]);
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);

        let missing = BuiltinsConfig::load_from_file("/nonexistent/builtins.toml");
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn serializes_back_to_toml() {
        let config = BuiltinsConfig {
            disabled: vec!["len".to_string()],
            ..BuiltinsConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(BuiltinsConfig::from_toml_str(&text).unwrap(), config);
    }
}
