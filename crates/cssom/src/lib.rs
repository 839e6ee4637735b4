//! Minimal CSS object model for live style sheets.
//!
//! Only the structure the replay side needs is modelled: ordered rule lists,
//! grouping rules holding nested lists, and property declarations on style
//! rules. Selectors and values are kept as text.

mod error;
pub mod sheet;
pub mod syntax;

pub use error::CssomError;
pub use sheet::{CssGroupingRule, CssRule, CssRuleList, CssStyleDeclaration, CssStyleRule, StyleSheet};
pub use syntax::{Declaration, parse_declarations, parse_rule, parse_rules};
