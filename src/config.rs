//! Formatter configuration.
//!
//! Display strings, date pattern and cache size. Every field has a default,
//! so a YAML file only needs to name what it overrides:
//!
//! ```yaml
//! labels:
//!   exists: "is present"
//! date_format: "%Y-%m-%d"
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming a YAML config file.
pub const CONFIG_ENV_VAR: &str = "FILTER_EXPRESSION_CONFIG";

/// Display strings. Templates use `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayLabels {
    /// Marker shown before a negated group.
    pub group_negation: String,
    /// Prefix of a negated predicate.
    pub negated_prefix: String,
    pub exists: String,
    pub is_one_of: String,
    pub warning_title: String,
    /// `{field}`
    pub warning_message: String,
    pub error_title: String,
    pub range_separator: String,
    /// `{title}`
    pub remove_aria_label: String,
    pub actions_aria_label: String,
    pub menu: MenuLabels,
    /// `{title}`
    pub save_success: String,
    /// `{error}`
    pub save_failure: String,
}

impl Default for DisplayLabels {
    fn default() -> Self {
        Self {
            group_negation: "NOT".to_string(),
            negated_prefix: "NOT ".to_string(),
            exists: "exists".to_string(),
            is_one_of: "is one of".to_string(),
            warning_title: "Warning".to_string(),
            warning_message: "Field {field} does not exist in current view".to_string(),
            error_title: "Error".to_string(),
            range_separator: " to ".to_string(),
            remove_aria_label: "Remove {title}".to_string(),
            actions_aria_label: "Filter actions".to_string(),
            menu: MenuLabels::default(),
            save_success: "Your query \"{title}\" was saved".to_string(),
            save_failure: "An error occured while saving your query: {error}".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuLabels {
    pub edit: String,
    pub invert: String,
    pub duplicate: String,
    pub disable: String,
    pub enable: String,
    pub save_as_filter: String,
    pub remove: String,
}

impl Default for MenuLabels {
    fn default() -> Self {
        Self {
            edit: "Edit".to_string(),
            invert: "Invert".to_string(),
            duplicate: "Duplicate".to_string(),
            disable: "Temporarily disable".to_string(),
            enable: "Re-enable".to_string(),
            save_as_filter: "Save as filter".to_string(),
            remove: "Remove".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    pub labels: DisplayLabels,
    /// chrono format string for date field values.
    pub date_format: String,
    /// Maximum cached renders; 0 disables caching.
    pub cache_capacity: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            labels: DisplayLabels::default(),
            date_format: "%b %-d, %Y @ %H:%M:%S%.3f".to_string(),
            cache_capacity: 256,
        }
    }
}

impl FormatterConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: FormatterConfig =
            serde_yaml::from_str(yaml).context("Failed to parse formatter config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.date_format.trim().is_empty() {
            bail!("date_format must not be empty");
        }
        if !self.labels.warning_message.contains("{field}") {
            bail!("labels.warning_message must name the field with {{field}}");
        }
        Ok(())
    }
}

/// Replace `{name}` placeholders in a display template.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{}}}", name), value)
        })
}

/// Loads `FormatterConfig` from a YAML file.
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Use the file named by `FILTER_EXPRESSION_CONFIG`, or defaults when unset.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load(&self) -> Result<FormatterConfig> {
        let Some(path) = &self.path else {
            info!("No formatter config file given, using defaults");
            return Ok(FormatterConfig::default());
        };

        info!("Loading formatter configuration from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        FormatterConfig::from_yaml_str(&content)
            .with_context(|| format!("Invalid formatter config in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = FormatterConfig::from_yaml_str("labels:\n  exists: is present\n").unwrap();
        assert_eq!(config.labels.exists, "is present");
        assert_eq!(config.labels.is_one_of, "is one of");
        assert_eq!(config.cache_capacity, 256);
    }

    #[test]
    fn test_invalid_warning_template_rejected() {
        let err = FormatterConfig::from_yaml_str("labels:\n  warning_message: gone\n").unwrap_err();
        assert!(err.to_string().contains("warning_message"));
    }

    #[test]
    fn test_fill_template() {
        assert_eq!(
            fill("Field {field} does not exist", &[("field", "host")]),
            "Field host does not exist"
        );
        assert_eq!(fill("no placeholders", &[("x", "y")]), "no placeholders");
    }

    #[test]
    fn test_loader_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "date_format: \"%Y-%m-%d\"\ncache_capacity: 4").unwrap();
        let config = ConfigLoader::new(file.path()).load().unwrap();
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.cache_capacity, 4);
    }

    #[test]
    fn test_loader_from_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "labels:\n  exists: is present").unwrap();

        std::env::set_var(CONFIG_ENV_VAR, file.path());
        let loader = ConfigLoader::from_env();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(loader.path(), Some(file.path()));
        assert_eq!(loader.load().unwrap().labels.exists, "is present");

        let unset = ConfigLoader::from_env();
        assert_eq!(unset.path(), None);
        assert_eq!(unset.load().unwrap(), FormatterConfig::default());
    }

    #[test]
    fn test_loader_missing_file_errors() {
        let loader = ConfigLoader::new("/nonexistent/filter-expression.yaml");
        let err = loader.load().unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
