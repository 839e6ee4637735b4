//! Table-driven child-list scenarios stored as TOML.
//!
//! ```toml
//! format = "children-diff-v1"
//!
//! [[case]]
//! name = "append"
//! old = [1]
//! new = [1, 2, 3]
//! inserts = 2
//! ```
//!
//! Omitted operation counts are not checked.

use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CHILDREN_DIFF_FORMAT_V1: &str = "children-diff-v1";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChildrenDiffCase {
    pub name: String,
    pub old: Vec<i32>,
    pub new: Vec<i32>,
    #[serde(default)]
    pub inserts: Option<usize>,
    #[serde(default)]
    pub moves: Option<usize>,
    #[serde(default)]
    pub removes: Option<usize>,
    /// Ids expected to be gone from the live mirror afterwards.
    #[serde(default)]
    pub unbound: Vec<i32>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ChildrenDiffManifest {
    format: String,
    #[serde(rename = "case")]
    cases: Vec<ChildrenDiffCase>,
}

pub fn load_children_diff_cases(path: &Path) -> Vec<ChildrenDiffCase> {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read scenario file {path:?}: {err}"));
    parse_children_diff_cases(&content, path)
}

pub fn parse_children_diff_cases(content: &str, path: &Path) -> Vec<ChildrenDiffCase> {
    let manifest: ChildrenDiffManifest = toml::from_str(content)
        .unwrap_or_else(|err| panic!("invalid scenario file {path:?}: {err}"));
    assert_eq!(
        manifest.format, CHILDREN_DIFF_FORMAT_V1,
        "unsupported format in {path:?}"
    );
    assert!(!manifest.cases.is_empty(), "scenario file {path:?} has no cases");
    let mut names = std::collections::BTreeSet::new();
    for case in &manifest.cases {
        assert!(
            names.insert(case.name.as_str()),
            "duplicate case '{}' in {path:?}",
            case.name
        );
    }
    manifest.cases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cases_and_optional_counts() {
        let cases = parse_children_diff_cases(
            "format = \"children-diff-v1\"\n\n[[case]]\nname = \"a\"\nold = [1]\nnew = [1, 2]\ninserts = 1\n",
            Path::new("inline.toml"),
        );
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].inserts, Some(1));
        assert_eq!(cases[0].moves, None);
        assert!(cases[0].unbound.is_empty());
    }

    #[test]
    #[should_panic(expected = "unsupported format")]
    fn rejects_other_formats() {
        parse_children_diff_cases(
            "format = \"v0\"\n\n[[case]]\nname = \"a\"\nold = []\nnew = []\n",
            Path::new("inline.toml"),
        );
    }
}
