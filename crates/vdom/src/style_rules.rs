//! Replays queued [`VirtualStyleRule`]s against a live [`StyleSheet`].
//!
//! Rule positions are paths: every element but the last selects a grouping
//! rule, the last is the index inside the list reached that way. A path of
//! length one addresses the sheet's own rule list.
//!
//! Application is best effort. A rule that fails (index out of range,
//! unparsable text, path through a non-grouping rule) is logged and skipped;
//! the rest of the batch still runs.

use core_types::{RulePosition, VirtualStyleRule};
use cssom::{CssRuleList, CssomError, StyleSheet};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StyleRuleError {
    #[error(transparent)]
    Cssom(#[from] CssomError),
    #[error("empty rule path")]
    EmptyPath,
}

pub fn apply_rules(sheet: &mut StyleSheet, rules: &[VirtualStyleRule]) {
    for rule in rules {
        apply_rule(sheet, rule);
    }
}

pub fn apply_rule(sheet: &mut StyleSheet, rule: &VirtualStyleRule) {
    if let Err(err) = try_apply_rule(sheet, rule) {
        log::debug!(target: "vdom.style", "skipping style rule {rule:?}: {err}");
    }
}

pub fn try_apply_rule(sheet: &mut StyleSheet, rule: &VirtualStyleRule) -> Result<(), StyleRuleError> {
    match rule {
        VirtualStyleRule::Insert { css_text, index } => {
            let path: &[usize] = match index {
                Some(position) => position_path(position),
                None => &[0],
            };
            let (list, index) = resolve(sheet, path)?;
            list.insert_rule(css_text, index)?;
        }
        VirtualStyleRule::Remove { index } => {
            let (list, index) = resolve(sheet, position_path(index))?;
            list.delete_rule(index)?;
        }
        VirtualStyleRule::SetProperty {
            index,
            property,
            value,
            priority,
        } => {
            let (list, index) = resolve(sheet, index)?;
            list.style_mut(index)?.style.set_property(
                property,
                value.as_deref(),
                priority.as_deref(),
            );
        }
        VirtualStyleRule::RemoveProperty { index, property } => {
            let (list, index) = resolve(sheet, index)?;
            list.style_mut(index)?.style.remove_property(property);
        }
    }
    Ok(())
}

fn position_path(position: &RulePosition) -> &[usize] {
    match position {
        RulePosition::Index(index) => std::slice::from_ref(index),
        RulePosition::Path(path) => path,
    }
}

// Walk the grouping rules named by all but the last path element.
fn resolve<'a>(
    sheet: &'a mut StyleSheet,
    path: &[usize],
) -> Result<(&'a mut CssRuleList, usize), StyleRuleError> {
    let (&last, parents) = path.split_last().ok_or(StyleRuleError::EmptyPath)?;
    let mut list = sheet.css_rules_mut();
    for &index in parents {
        list = &mut list.grouping_mut(index)?.css_rules;
    }
    Ok((list, last))
}
