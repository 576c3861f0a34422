use std::path::PathBuf;

use mip_ingest::InferenceReport;
use mip_model::InputFormat;
use mip_output::{AssembledOutput, FilterOutcome};

use crate::session::Session;

#[derive(Debug)]
pub struct InferResult {
    pub format: InputFormat,
    /// Steps that were neither guessed nor overridden are `false`.
    pub report: InferenceReport,
}

#[derive(Debug)]
pub struct DiagnoseResult {
    pub session_path: PathBuf,
    pub session: Session,
}

#[derive(Debug)]
pub struct AssembleResult {
    pub assembled: AssembledOutput,
    pub filter: FilterOutcome,
    /// Unknown labels with neither a fix nor an override.
    pub unresolved: usize,
    pub has_overrides: bool,
}

#[derive(Debug)]
pub struct RulesResult {
    pub root: PathBuf,
    pub tables: Vec<(String, usize)>,
}
