use crate::error::CssomError;
use crate::sheet::{CssGroupingRule, CssRule, CssRuleList, CssStyleDeclaration, CssStyleRule};
use std::borrow::Cow;

// A single CSS property: "color: red" or "color: red !important"
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    pub important: bool,
}

// At-rules whose block holds a nested rule list.
const GROUPING_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "container",
    "layer",
    "document",
    "-moz-document",
    "scope",
    "starting-style",
];

// One top-level construct: `prelude { body }` or `prelude;`
struct RawBlock<'a> {
    prelude: &'a str,
    body: Option<&'a str>,
    text: &'a str,
}

// input: "div { color: red; } @media print { p { margin: 0; } }"
// output: [Style(div ...), Grouping(@media print [Style(p ...)])]
pub fn parse_rules(input: &str) -> Result<Vec<CssRule>, CssomError> {
    split_blocks(input)?
        .into_iter()
        .map(rule_from_block)
        .collect()
}

/// Parse text that must contain exactly one rule, as `insertRule` requires.
pub fn parse_rule(input: &str) -> Result<CssRule, CssomError> {
    let mut blocks = split_blocks(input)?;
    if blocks.len() != 1 {
        return Err(CssomError::Syntax(format!(
            "expected exactly one rule, found {}",
            blocks.len()
        )));
    }
    match blocks.pop() {
        Some(block) => rule_from_block(block),
        None => Err(CssomError::Syntax("empty rule text".to_string())),
    }
}

// input: "color: red; font-size: 12px !important;"
// output: [Declaration { color, red, false }, Declaration { font-size, 12px, true }]
pub fn parse_declarations(input: &str) -> Vec<Declaration> {
    let input = strip_comments(input);
    split_top_level(&input, b';')
        .into_iter()
        .filter_map(|pair| {
            let (n, v) = pair.split_once(':')?;
            let name = normalize_property_name(n.trim());
            if name.is_empty() {
                return None;
            }
            let (value, important) = strip_important(v.trim());
            Some(Declaration {
                name,
                value: value.to_string(),
                important,
            })
        })
        .collect()
}

pub(crate) fn normalize_property_name(name: &str) -> String {
    // Custom properties are case-sensitive.
    if name.starts_with("--") {
        name.to_string()
    } else {
        name.to_ascii_lowercase()
    }
}

fn strip_important(value: &str) -> (&str, bool) {
    const IMPORTANT: &str = "!important";
    if value.len() >= IMPORTANT.len() {
        let split = value.len() - IMPORTANT.len();
        if value.is_char_boundary(split) && value[split..].eq_ignore_ascii_case(IMPORTANT) {
            return (value[..split].trim_end(), true);
        }
    }
    (value, false)
}

fn rule_from_block(block: RawBlock<'_>) -> Result<CssRule, CssomError> {
    if let Some(rest) = block.prelude.strip_prefix('@') {
        let name = rest
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        return match block.body {
            Some(body) if GROUPING_AT_RULES.contains(&name.as_str()) => {
                let rules = parse_rules(body)?;
                Ok(CssRule::Grouping(CssGroupingRule {
                    condition: collapse_whitespace(block.prelude),
                    css_rules: CssRuleList::from_rules(rules),
                }))
            }
            _ => Ok(CssRule::Other(block.text.to_string())),
        };
    }

    let Some(body) = block.body else {
        return Err(CssomError::Syntax(format!(
            "style rule '{}' has no declaration block",
            block.prelude
        )));
    };
    if block.prelude.is_empty() {
        return Err(CssomError::Syntax("style rule is missing a selector".to_string()));
    }
    Ok(CssRule::Style(CssStyleRule {
        selector_text: collapse_whitespace(block.prelude),
        style: CssStyleDeclaration::from_declarations(parse_declarations(body)),
    }))
}

fn split_blocks(input: &str) -> Result<Vec<RawBlock<'_>>, CssomError> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut out = Vec::new();
    let mut i = 0;
    loop {
        i = skip_whitespace_and_comments(bytes, i)?;
        if i >= len {
            break;
        }
        let start = i;
        let mut j = i;
        loop {
            if j >= len {
                let text = input[start..].trim();
                out.push(RawBlock {
                    prelude: text,
                    body: None,
                    text,
                });
                i = len;
                break;
            }
            match bytes[j] {
                b'"' | b'\'' => j = skip_string(bytes, j)?,
                b'/' if bytes.get(j + 1) == Some(&b'*') => j = skip_comment(bytes, j)?,
                b';' => {
                    let text = input[start..j].trim();
                    if !text.is_empty() {
                        out.push(RawBlock {
                            prelude: text,
                            body: None,
                            text,
                        });
                    }
                    i = j + 1;
                    break;
                }
                b'{' => {
                    let close = matching_brace(bytes, j)?;
                    out.push(RawBlock {
                        prelude: input[start..j].trim(),
                        body: Some(&input[j + 1..close]),
                        text: input[start..=close].trim(),
                    });
                    i = close + 1;
                    break;
                }
                b'}' => {
                    return Err(CssomError::Syntax(format!("unexpected '}}' at byte {j}")));
                }
                _ => j += 1,
            }
        }
    }
    Ok(out)
}

fn skip_whitespace_and_comments(bytes: &[u8], mut i: usize) -> Result<usize, CssomError> {
    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
        } else if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i = skip_comment(bytes, i)?;
        } else {
            break;
        }
    }
    Ok(i)
}

// Returns the index just past the closing quote.
fn skip_string(bytes: &[u8], open: usize) -> Result<usize, CssomError> {
    let quote = bytes[open];
    let mut k = open + 1;
    while k < bytes.len() {
        if bytes[k] == b'\\' {
            k += 2;
            continue;
        }
        if bytes[k] == quote {
            return Ok(k + 1);
        }
        k += 1;
    }
    Err(CssomError::Syntax(format!("unterminated string at byte {open}")))
}

// Returns the index just past the closing `*/`.
fn skip_comment(bytes: &[u8], open: usize) -> Result<usize, CssomError> {
    let mut k = open + 2;
    while k + 1 < bytes.len() {
        if bytes[k] == b'*' && bytes[k + 1] == b'/' {
            return Ok(k + 2);
        }
        k += 1;
    }
    Err(CssomError::Syntax(format!("unterminated comment at byte {open}")))
}

fn matching_brace(bytes: &[u8], open: usize) -> Result<usize, CssomError> {
    let mut depth = 0usize;
    let mut k = open;
    while k < bytes.len() {
        match bytes[k] {
            b'"' | b'\'' => {
                k = skip_string(bytes, k)?;
                continue;
            }
            b'/' if bytes.get(k + 1) == Some(&b'*') => {
                k = skip_comment(bytes, k)?;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(k);
                }
            }
            _ => {}
        }
        k += 1;
    }
    Err(CssomError::Syntax(format!("unbalanced '{{' at byte {open}")))
}

// Split on `sep` outside of strings and parentheses.
fn split_top_level(input: &str, sep: u8) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut parts = Vec::new();
    let mut parens = 0usize;
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let mut k = 0;
    while k < bytes.len() {
        let b = bytes[k];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    k += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'(' => parens += 1,
                b')' => parens = parens.saturating_sub(1),
                _ if b == sep && parens == 0 => {
                    parts.push(&input[start..k]);
                    start = k + 1;
                }
                _ => {}
            },
        }
        k += 1;
    }
    if start < input.len() {
        parts.push(&input[start..]);
    }
    parts
}

fn strip_comments(input: &str) -> Cow<'_, str> {
    if !input.contains("/*") {
        return Cow::Borrowed(input);
    }
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut start = 0;
    let mut k = 0;
    while k < bytes.len() {
        match bytes[k] {
            b'"' | b'\'' => {
                k = skip_string(bytes, k).unwrap_or(bytes.len());
            }
            b'/' if bytes.get(k + 1) == Some(&b'*') => {
                out.push_str(&input[start..k]);
                k = skip_comment(bytes, k).unwrap_or(bytes.len());
                start = k;
            }
            _ => k += 1,
        }
    }
    out.push_str(&input[start..]);
    Cow::Owned(out)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_style_and_grouping_rules() {
        let rules = parse_rules(
            "div, #id { color: red; }\n@media (max-width: 600px) { p { margin: 0 } .a { top: 1px; } }",
        )
        .expect("parse");
        assert_eq!(rules.len(), 2);
        let style = rules[0].as_style().expect("style rule");
        assert_eq!(style.selector_text, "div, #id");
        assert_eq!(style.style.get_property_value("color"), "red");

        let group = rules[1].as_grouping().expect("grouping rule");
        assert_eq!(group.condition, "@media (max-width: 600px)");
        assert_eq!(group.css_rules.len(), 2);
        assert_eq!(
            group.css_rules.get(1).and_then(CssRule::as_style).map(|r| r.selector_text.as_str()),
            Some(".a")
        );
    }

    #[test]
    fn keeps_non_grouping_at_rules_opaque() {
        let rules = parse_rules(
            "@import url(\"a.css\");\n@font-face { font-family: X; }\n@keyframes spin { from { top: 0 } to { top: 10px } }",
        )
        .expect("parse");
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0], CssRule::Other("@import url(\"a.css\")".to_string()));
        assert!(matches!(&rules[1], CssRule::Other(text) if text.starts_with("@font-face")));
        assert!(matches!(&rules[2], CssRule::Other(text) if text.ends_with("}")));
    }

    #[test]
    fn declarations_respect_strings_and_priority() {
        let decls = parse_declarations(
            "content: \"a;b\"; COLOR: Red !important; background: url(data:x;y); --Var: 1",
        );
        assert_eq!(decls.len(), 4);
        assert_eq!(decls[0].value, "\"a;b\"");
        assert_eq!(decls[1].name, "color");
        assert_eq!(decls[1].value, "Red");
        assert!(decls[1].important);
        assert_eq!(decls[2].value, "url(data:x;y)");
        assert_eq!(decls[3].name, "--Var");
    }

    #[test]
    fn parse_rule_requires_exactly_one_rule() {
        assert!(parse_rule("a { color: red }").is_ok());
        assert!(matches!(
            parse_rule("a { } b { }"),
            Err(CssomError::Syntax(_))
        ));
        assert!(matches!(parse_rule("   "), Err(CssomError::Syntax(_))));
        assert!(matches!(parse_rule("a { color: red"), Err(CssomError::Syntax(_))));
        assert!(matches!(parse_rule("div;"), Err(CssomError::Syntax(_))));
    }

    #[test]
    fn comments_are_skipped() {
        let rules = parse_rules("/* lead */ a { /* inner } */ color: red; }").expect("parse");
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rules[0].as_style().map(|r| r.style.get_property_value("color")),
            Some("red")
        );
    }
}
