use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CssomError {
    #[error("index {index} is out of range for a rule list of length {len}")]
    IndexSize { index: usize, len: usize },
    #[error("failed to parse CSS: {0}")]
    Syntax(String),
    #[error("rule at index {0} is not a grouping rule")]
    NotAGroupingRule(usize),
    #[error("rule at index {0} is not a style rule")]
    NotAStyleRule(usize),
}
