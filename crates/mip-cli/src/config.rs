//! TOML configuration for the intake driver.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mip_ingest::{DEFAULT_DELIMITERS, InferenceOptions};
use mip_standards::default_rules_root;
use mip_validate::OutputNames;
use serde::{Deserialize, Serialize};

/// Every key is optional; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub sample_size: usize,
    pub max_skip_ratio: f64,
    pub delimiter_candidates: Vec<String>,
    pub output: OutputNames,
    /// Name of the Phase 2 rejects file, written next to the table.
    pub filtered_name: String,
    pub session_name: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        let inference = InferenceOptions::default();
        Self {
            sample_size: inference.sample_size,
            max_skip_ratio: inference.max_skip_ratio,
            delimiter_candidates: DEFAULT_DELIMITERS.iter().map(ToString::to_string).collect(),
            output: OutputNames::default(),
            filtered_name: "filtered.csv".to_string(),
            session_name: "session.json".to_string(),
        }
    }
}

impl IntakeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    /// Defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn inference_options(&self) -> InferenceOptions {
        InferenceOptions {
            sample_size: self.sample_size,
            max_skip_ratio: self.max_skip_ratio,
        }
    }

    pub fn delimiters(&self) -> Vec<&str> {
        self.delimiter_candidates.iter().map(String::as_str).collect()
    }
}

/// `--rules` wins, then `MIP_RULES_DIR`, then `./rules`.
pub fn rules_dir(flag: Option<&Path>) -> PathBuf {
    flag.map_or_else(default_rules_root, Path::to_path_buf)
}

/// Accept `\t` spelled out on the command line.
pub fn unescape_delimiter(text: &str) -> String {
    match text {
        "\\t" | "tab" | "TAB" => "\t".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: IntakeConfig = toml::from_str(
            r#"
            sample_size = 50
            [output]
            accepted = "ok.txt"
            "#,
        )
        .unwrap();
        assert_eq!(config.sample_size, 50);
        assert_eq!(config.max_skip_ratio, 0.9);
        assert_eq!(config.output.accepted, "ok.txt");
        assert_eq!(config.output.duplicates, "duplicates.txt");
        assert_eq!(config.delimiters(), vec![",", ";", "\t", "|"]);
    }

    #[test]
    fn explicit_rules_flag_wins() {
        assert_eq!(rules_dir(Some(Path::new("/tmp/r"))), PathBuf::from("/tmp/r"));
    }

    #[test]
    fn tab_is_unescaped() {
        assert_eq!(unescape_delimiter("\\t"), "\t");
        assert_eq!(unescape_delimiter(";"), ";");
    }
}
