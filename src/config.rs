use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub diagram: DiagramConfig,
    pub output: OutputConfig,
}

/// Scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub manifest_dirs: Vec<String>,
    pub env_file_cap: usize,
}

/// Diagram settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub theme: Theme,
    pub style: Style,
    pub legend: bool,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub path: Option<PathBuf>,
}

/// Diagram color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Auto,
    Dark,
    Light,
    Plain,
}

/// Diagram styling level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Fancy,
    Plain,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Md,
    Mermaid,
    Json,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            manifest_dirs: vec![
                "k8s".to_string(),
                "kubernetes".to_string(),
                "deploy".to_string(),
                "manifests".to_string(),
                "charts".to_string(),
            ],
            env_file_cap: 20,
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            style: Style::default(),
            legend: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            path: None,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        theme: Option<String>,
        style: Option<String>,
        legend: bool,
        format: Option<String>,
        out: Option<PathBuf>,
    ) {
        if let Some(t) = theme {
            self.diagram.theme = match t.as_str() {
                "dark" => Theme::Dark,
                "light" => Theme::Light,
                "plain" => Theme::Plain,
                _ => Theme::Auto,
            };
        }

        if let Some(s) = style {
            self.diagram.style = match s.as_str() {
                "plain" => Style::Plain,
                _ => Style::Fancy,
            };
        }

        if legend {
            self.diagram.legend = true;
        }

        if let Some(f) = format {
            self.output.format = match f.as_str() {
                "mermaid" => OutputFormat::Mermaid,
                "json" => OutputFormat::Json,
                _ => OutputFormat::Md,
            };
        }

        if let Some(path) = out {
            self.output.path = Some(path);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.scan.env_file_cap == 0 {
            return Err(Error::config_validation("env_file_cap must be at least 1"));
        }

        if self.scan.manifest_dirs.is_empty() {
            return Err(Error::config_validation(
                "at least one manifest directory required",
            ));
        }

        Ok(())
    }
}
