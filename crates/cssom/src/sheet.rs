//! Live style sheet objects.
//!
//! Index semantics follow the CSSOM: `insert_rule` accepts `index <= len`,
//! `delete_rule` requires `index < len`, and both fail without touching the
//! list otherwise.

use crate::error::CssomError;
use crate::syntax::{Declaration, normalize_property_name, parse_rule, parse_rules};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleSheet {
    rules: CssRuleList,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, CssomError> {
        Ok(Self {
            rules: CssRuleList::from_rules(parse_rules(text)?),
        })
    }

    pub fn css_rules(&self) -> &CssRuleList {
        &self.rules
    }

    pub fn css_rules_mut(&mut self) -> &mut CssRuleList {
        &mut self.rules
    }

    pub fn insert_rule(&mut self, rule: &str, index: usize) -> Result<usize, CssomError> {
        self.rules.insert_rule(rule, index)
    }

    pub fn delete_rule(&mut self, index: usize) -> Result<(), CssomError> {
        self.rules.delete_rule(index)
    }

    pub fn css_text(&self) -> String {
        self.rules.css_text()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CssRuleList {
    rules: Vec<CssRule>,
}

impl CssRuleList {
    pub fn from_rules(rules: Vec<CssRule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CssRule> {
        self.rules.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CssRule> {
        self.rules.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CssRule> {
        self.rules.iter()
    }

    pub fn insert_rule(&mut self, rule: &str, index: usize) -> Result<usize, CssomError> {
        let len = self.rules.len();
        if index > len {
            return Err(CssomError::IndexSize { index, len });
        }
        let parsed = parse_rule(rule)?;
        log::trace!(target: "cssom", "insert rule at {index}: {rule}");
        self.rules.insert(index, parsed);
        Ok(index)
    }

    pub fn delete_rule(&mut self, index: usize) -> Result<(), CssomError> {
        let len = self.rules.len();
        if index >= len {
            return Err(CssomError::IndexSize { index, len });
        }
        log::trace!(target: "cssom", "delete rule at {index}");
        self.rules.remove(index);
        Ok(())
    }

    /// Mutable access to the grouping rule at `index`.
    pub fn grouping_mut(&mut self, index: usize) -> Result<&mut CssGroupingRule, CssomError> {
        let len = self.rules.len();
        match self.rules.get_mut(index) {
            Some(CssRule::Grouping(group)) => Ok(group),
            Some(_) => Err(CssomError::NotAGroupingRule(index)),
            None => Err(CssomError::IndexSize { index, len }),
        }
    }

    /// Mutable access to the style rule at `index`.
    pub fn style_mut(&mut self, index: usize) -> Result<&mut CssStyleRule, CssomError> {
        let len = self.rules.len();
        match self.rules.get_mut(index) {
            Some(CssRule::Style(rule)) => Ok(rule),
            Some(_) => Err(CssomError::NotAStyleRule(index)),
            None => Err(CssomError::IndexSize { index, len }),
        }
    }

    pub fn css_text(&self) -> String {
        self.rules
            .iter()
            .map(CssRule::css_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a CssRuleList {
    type Item = &'a CssRule;
    type IntoIter = std::slice::Iter<'a, CssRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CssRule {
    Style(CssStyleRule),
    Grouping(CssGroupingRule),
    /// At-rules kept verbatim (`@import`, `@font-face`, `@keyframes`, ...).
    Other(String),
}

impl CssRule {
    pub fn as_style(&self) -> Option<&CssStyleRule> {
        match self {
            CssRule::Style(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn as_grouping(&self) -> Option<&CssGroupingRule> {
        match self {
            CssRule::Grouping(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn css_text(&self) -> String {
        match self {
            CssRule::Style(rule) => rule.css_text(),
            CssRule::Grouping(rule) => rule.css_text(),
            CssRule::Other(text) => text.clone(),
        }
    }
}

impl fmt::Display for CssRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css_text())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CssStyleRule {
    pub selector_text: String,
    pub style: CssStyleDeclaration,
}

impl CssStyleRule {
    pub fn css_text(&self) -> String {
        let body = self.style.css_text();
        if body.is_empty() {
            format!("{} {{ }}", self.selector_text)
        } else {
            format!("{} {{ {} }}", self.selector_text, body)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CssGroupingRule {
    /// Prelude including the at-keyword, e.g. `@media print`.
    pub condition: String,
    pub css_rules: CssRuleList,
}

impl CssGroupingRule {
    pub fn insert_rule(&mut self, rule: &str, index: usize) -> Result<usize, CssomError> {
        self.css_rules.insert_rule(rule, index)
    }

    pub fn delete_rule(&mut self, index: usize) -> Result<(), CssomError> {
        self.css_rules.delete_rule(index)
    }

    pub fn css_text(&self) -> String {
        let mut out = format!("{} {{", self.condition);
        for rule in &self.css_rules {
            out.push_str("\n  ");
            out.push_str(&rule.css_text());
        }
        out.push_str("\n}");
        out
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CssStyleDeclaration {
    declarations: Vec<Declaration>,
}

impl CssStyleDeclaration {
    pub fn from_declarations(declarations: Vec<Declaration>) -> Self {
        let mut style = Self::default();
        for decl in declarations {
            style.upsert(decl);
        }
        style
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Returns `""` when the property is not set.
    pub fn get_property_value(&self, name: &str) -> &str {
        let name = normalize_property_name(name);
        self.find(&name).map(|d| d.value.as_str()).unwrap_or("")
    }

    /// Returns `"important"` or `""`.
    pub fn get_property_priority(&self, name: &str) -> &str {
        let name = normalize_property_name(name);
        match self.find(&name) {
            Some(decl) if decl.important => "important",
            _ => "",
        }
    }

    /// An absent or empty value removes the property. Priorities other than
    /// `important` (or empty) make the call a no-op.
    pub fn set_property(&mut self, name: &str, value: Option<&str>, priority: Option<&str>) {
        let name = normalize_property_name(name.trim());
        if name.is_empty() {
            return;
        }
        let value = value.map(str::trim).unwrap_or("");
        if value.is_empty() {
            self.remove_property(&name);
            return;
        }
        let important = match priority.map(str::trim).unwrap_or("") {
            "" => false,
            p if p.eq_ignore_ascii_case("important") => true,
            _ => return,
        };
        self.upsert(Declaration {
            name,
            value: value.to_string(),
            important,
        });
    }

    /// Returns the previous value, or `""` if the property was not set.
    pub fn remove_property(&mut self, name: &str) -> String {
        let name = normalize_property_name(name);
        match self.declarations.iter().position(|d| d.name == name) {
            Some(pos) => self.declarations.remove(pos).value,
            None => String::new(),
        }
    }

    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|d| {
                if d.important {
                    format!("{}: {} !important;", d.name, d.value)
                } else {
                    format!("{}: {};", d.name, d.value)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn find(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    fn upsert(&mut self, decl: Declaration) {
        match self.declarations.iter_mut().find(|d| d.name == decl.name) {
            Some(existing) => *existing = decl,
            None => self.declarations.push(decl),
        }
    }
}
