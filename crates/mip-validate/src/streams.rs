//! Destination files for classified rows.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use mip_model::RowClass;
use serde::{Deserialize, Serialize};

use crate::error::{DiagnosisError, Result};

/// File names of the four row streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputNames {
    pub structural_issues: String,
    pub ignored_scenarios: String,
    pub duplicates: String,
    pub accepted: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            structural_issues: "structural_issues.txt".to_string(),
            ignored_scenarios: "ignored_scenarios.txt".to_string(),
            duplicates: "duplicates.txt".to_string(),
            accepted: "accepted.txt".to_string(),
        }
    }
}

impl OutputNames {
    pub fn name(&self, class: RowClass) -> &str {
        match class {
            RowClass::StructuralIssue => &self.structural_issues,
            RowClass::IgnoredScenario => &self.ignored_scenarios,
            RowClass::Duplicate => &self.duplicates,
            RowClass::Accepted => &self.accepted,
        }
    }
}

/// Resolved paths of the four row streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPaths {
    pub structural_issues: PathBuf,
    pub ignored_scenarios: PathBuf,
    pub duplicates: PathBuf,
    pub accepted: PathBuf,
}

impl StreamPaths {
    pub fn new(dir: &Path, names: &OutputNames) -> Self {
        Self {
            structural_issues: dir.join(&names.structural_issues),
            ignored_scenarios: dir.join(&names.ignored_scenarios),
            duplicates: dir.join(&names.duplicates),
            accepted: dir.join(&names.accepted),
        }
    }

    pub fn path(&self, class: RowClass) -> &Path {
        match class {
            RowClass::StructuralIssue => &self.structural_issues,
            RowClass::IgnoredScenario => &self.ignored_scenarios,
            RowClass::Duplicate => &self.duplicates,
            RowClass::Accepted => &self.accepted,
        }
    }
}

struct Sink {
    path: PathBuf,
    writer: BufWriter<File>,
}

/// Open writers for every stream. Opening truncates.
pub(crate) struct RowSinks {
    sinks: [Sink; 4],
}

impl RowSinks {
    pub(crate) fn create(paths: &StreamPaths) -> Result<Self> {
        let open = |class: RowClass| -> Result<Sink> {
            let path = paths.path(class).to_path_buf();
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(|e| DiagnosisError::io(parent, e))?;
            }
            let file = File::create(&path).map_err(|e| DiagnosisError::io(&path, e))?;
            Ok(Sink {
                path,
                writer: BufWriter::new(file),
            })
        };
        Ok(Self {
            sinks: [
                open(RowClass::StructuralIssue)?,
                open(RowClass::IgnoredScenario)?,
                open(RowClass::Duplicate)?,
                open(RowClass::Accepted)?,
            ],
        })
    }

    fn sink(&mut self, class: RowClass) -> &mut Sink {
        let index = match class {
            RowClass::StructuralIssue => 0,
            RowClass::IgnoredScenario => 1,
            RowClass::Duplicate => 2,
            RowClass::Accepted => 3,
        };
        &mut self.sinks[index]
    }

    /// Append `line`, followed by ` # note` when a note is given.
    pub(crate) fn write(&mut self, class: RowClass, line: &str, note: Option<&str>) -> Result<()> {
        let sink = self.sink(class);
        let written = match note {
            Some(note) => writeln!(sink.writer, "{line} # {note}"),
            None => writeln!(sink.writer, "{line}"),
        };
        written.map_err(|e| DiagnosisError::io(&sink.path, e))
    }

    pub(crate) fn finish(self) -> Result<()> {
        for mut sink in self.sinks {
            sink.writer
                .flush()
                .map_err(|e| DiagnosisError::io(&sink.path, e))?;
        }
        Ok(())
    }
}
