use serde::Deserialize;

pub const DEFAULT_MAX_DEPTH: usize = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Subtrees nested deeper than this are skipped.
    pub max_depth: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Reconciling deeper than this fails with `DomError::DepthLimit`.
    pub max_depth: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
