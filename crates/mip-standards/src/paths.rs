use std::path::PathBuf;

/// Environment variable for overriding the rule-set directory.
pub const RULES_ENV_VAR: &str = "MIP_RULES_DIR";

/// Get the default rule-set directory.
///
/// Checks the `MIP_RULES_DIR` environment variable first, then falls back to
/// `rules/` relative to the working directory.
pub fn default_rules_root() -> PathBuf {
    if let Ok(root) = std::env::var(RULES_ENV_VAR)
        && !root.trim().is_empty()
    {
        return PathBuf::from(root);
    }
    PathBuf::from("rules")
}
