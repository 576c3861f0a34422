//! Review session persisted between `diagnose` and `assemble`.
//!
//! A reviewer edits the `fix` and `override` fields of the unknown labels in
//! the JSON file; nothing else is expected to change.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mip_model::{DiagnosisResult, InputFormat};
use mip_validate::StreamPaths;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub source: PathBuf,
    pub format: InputFormat,
    pub diagnosis: DiagnosisResult,
    #[serde(default)]
    pub ignore_scenarios: Vec<String>,
    pub streams: StreamPaths,
    pub output_dir: PathBuf,
}

impl Session {
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize session")?;
        std::fs::write(path, json).with_context(|| format!("write session {}", path.display()))
    }

    /// Load a session and reject reviewer edits that both fix and override a label.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read session {}", path.display()))?;
        let session: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse session {}", path.display()))?;
        session
            .diagnosis
            .validate_resolutions()
            .with_context(|| format!("invalid review edits in {}", path.display()))?;
        Ok(session)
    }
}
