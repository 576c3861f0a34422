#![deny(unsafe_code)]

pub mod csv_utils;
pub mod error;
pub mod fuzzy;
pub mod paths;
pub mod repository;
pub mod tables;

pub use crate::error::{Result, StandardsError};
pub use crate::paths::{RULES_ENV_VAR, default_rules_root};
pub use crate::repository::{RuleRepository, RuleRepositoryBuilder};
pub use crate::tables::{FixTable, LabelTable, RangeTable, ValueRange};
