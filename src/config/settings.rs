//! Configuration settings for the crossword solver

use crate::csp::SearchLimits;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub solver: SolverConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Run AC-3 before searching
    pub enforce_arc_consistency: bool,
    /// Give up after expanding this many search nodes
    pub max_nodes: Option<u64>,
    /// Give up after this many seconds of search
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_statistics: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Visual,
    Png,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            enforce_arc_consistency: true,
            max_nodes: None,
            timeout_seconds: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_statistics: false,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path` if it exists, otherwise fall back to defaults
    pub fn from_file_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) if path.as_ref().exists() => Self::from_file(path),
            Some(path) => anyhow::bail!("Config file does not exist: {}", path.as_ref().display()),
            None => Ok(Self::default()),
        }
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.max_nodes == Some(0) {
            anyhow::bail!("Maximum search nodes must be positive");
        }

        if self.solver.timeout_seconds == Some(0) {
            anyhow::bail!("Timeout must be positive");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(max_nodes) = cli_overrides.max_nodes {
            self.solver.max_nodes = Some(max_nodes);
        }
        if let Some(timeout) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = Some(timeout);
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if cli_overrides.no_arc_consistency {
            self.solver.enforce_arc_consistency = false;
        }
        if cli_overrides.show_statistics {
            self.output.show_statistics = true;
        }
    }

    /// Search budgets derived from the solver section
    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_nodes: self.solver.max_nodes,
            time_limit: self.solver.timeout_seconds.map(Duration::from_secs),
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub max_nodes: Option<u64>,
    pub timeout_seconds: Option<u64>,
    pub format: Option<OutputFormat>,
    pub no_arc_consistency: bool,
    pub show_statistics: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.solver.enforce_arc_consistency);
        assert_eq!(settings.search_limits(), SearchLimits::unlimited());
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.solver.max_nodes = Some(5000);
        settings.output.format = OutputFormat::Json;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = "solver:\n  enforce_arc_consistency: false\n  max_nodes: null\n  timeout_seconds: 30\noutput:\n  format: visual\n  show_statistics: true\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();

        assert!(!settings.solver.enforce_arc_consistency);
        assert_eq!(settings.output.format, OutputFormat::Visual);
        assert_eq!(settings.search_limits().time_limit, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_validation_rejects_zero_budgets() {
        let mut settings = Settings::default();
        settings.solver.max_nodes = Some(0);
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.solver.timeout_seconds = Some(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        assert!(Settings::from_file_or_default(Some("does/not/exist.yaml")).is_err());
        assert!(Settings::from_file_or_default(None::<&str>).is_ok());
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::default();
        settings.merge_with_cli(&CliOverrides {
            max_nodes: Some(10),
            format: Some(OutputFormat::Visual),
            no_arc_consistency: true,
            ..Default::default()
        });

        assert_eq!(settings.solver.max_nodes, Some(10));
        assert_eq!(settings.solver.timeout_seconds, None);
        assert_eq!(settings.output.format, OutputFormat::Visual);
        assert!(!settings.solver.enforce_arc_consistency);
    }
}
