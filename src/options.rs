use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Knobs for one resolution call. Every field has a default, so `{}` is a
/// valid options document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveOptions {
    /// Branches nested deeper than this are dropped with a diagnostic.
    pub max_depth: usize,
    /// Active locale. Falls back to the page's, then `Languages.default`.
    pub current_lang: Option<String>,
    /// Resolve top-level sections and batch pages on the rayon pool.
    pub parallel: bool,
    /// Also replace `$name` inside larger strings when instantiating blocks.
    pub interpolate_block_vars: bool,
    /// Stamp block roots with `testId = "block-<name>"`.
    pub block_test_ids: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            current_lang: None,
            parallel: true,
            interpolate_block_vars: false,
            block_test_ids: true,
        }
    }
}

impl ResolveOptions {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}
