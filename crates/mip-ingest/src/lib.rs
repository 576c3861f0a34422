//! Model-output ingestion utilities.
//!
//! This crate reads raw delimited files without assuming their layout and
//! infers an [`InputFormat`](mip_model::InputFormat) from bounded samples.
//!
//! # Features
//!
//! - **Line reading**: lossy UTF-8 decoding, CR/LF tolerant, streaming
//! - **Field handling**: delimiter splitting, quote stripping, numeric parsing
//! - **Format inference**: delimiter, header, skip count, and column roles
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use mip_ingest::{FormatInference, InferenceOptions, DEFAULT_DELIMITERS};
//! use mip_standards::RuleRepository;
//!
//! let rules = RuleRepository::load(Path::new("rules"))?;
//! let mut session = FormatInference::open(Path::new("upload.csv"), InferenceOptions::default())?;
//! let report = session.infer(&DEFAULT_DELIMITERS, &rules)?;
//! println!("{}", session.format());
//! ```

mod error;
mod fields;
mod inference;
mod lines;
mod sniff;

// === Error Types ===
pub use error::{IngestError, Result};

// === Field Handling ===
pub use fields::{
    is_plausible_year, modal_count, parse_value, parse_year, split_line, strip_quotes,
};

// === Line Reading ===
pub use lines::{LineReader, open_lines, read_lines};

// === Format Inference ===
pub use inference::{
    DEFAULT_DELIMITERS, FormatInference, InferenceOptions, InferenceReport, ParsedSample,
};
pub use sniff::{HeaderVote, sniff_delimiter, vote_header};
