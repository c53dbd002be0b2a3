//! Line-oriented reader for `/** ... */` documentation blocks.
//!
//! Recognised tags:
//! - `@param [type] [$name] [description]` (the name may be written `...$x` or `&$x`)
//! - `@return [type] [description]`
//! - `@method [static] [type] name(args) [description]`
//!
//! A tag runs until the next tag or blank line; continuation lines are
//! folded into its body.

use super::{Annotation, AnnotationParser};
use crate::errors::AnnotationError;

#[derive(Debug, Clone, Copy, Default)]
pub struct DocBlockParser;

impl DocBlockParser {
    pub fn new() -> Self {
        Self
    }
}

impl AnnotationParser for DocBlockParser {
    fn parse(&self, doc_comment: &str) -> Result<Vec<Annotation>, AnnotationError> {
        let mut annotations = Vec::new();

        for (tag, body) in split_tags(doc_comment) {
            match tag {
                "param" => annotations.push(parse_param(&body)),
                "return" => annotations.push(parse_return(&body)),
                "method" => annotations.push(
                    parse_method(&body).unwrap_or_else(Annotation::Invalid),
                ),
                _ => {}
            }
        }

        Ok(annotations)
    }
}

fn strip_line(line: &str) -> &str {
    let mut line = line.trim();
    if let Some(rest) = line.strip_prefix("/**") {
        line = rest;
    }
    if let Some(rest) = line.strip_suffix("*/") {
        line = rest;
    }
    line = line.trim_start();
    if let Some(rest) = line.strip_prefix('*') {
        line = rest;
    }
    line.trim()
}

fn split_tags(doc_comment: &str) -> Vec<(&str, String)> {
    let mut tags: Vec<(&str, String)> = Vec::new();
    let mut open = false;

    for line in doc_comment.lines().map(strip_line) {
        if let Some(tagged) = line.strip_prefix('@') {
            let (tag, body) = match tagged.split_once(char::is_whitespace) {
                Some((tag, body)) => (tag, body.trim().to_string()),
                None => (tagged, String::new()),
            };
            tags.push((tag, body));
            open = true;
        } else if line.is_empty() {
            open = false;
        } else if open && let Some((_, body)) = tags.last_mut() {
            body.push(' ');
            body.push_str(line);
        }
    }

    tags
}

fn is_variable(token: &str) -> bool {
    token.trim_start_matches(['&', '.']).starts_with('$')
}

fn variable_name(token: &str) -> &str {
    token.trim_start_matches(['&', '.']).trim_start_matches('$')
}

fn parse_param(body: &str) -> Annotation {
    let mut tokens = body.split_whitespace();
    let first = tokens.next().unwrap_or_default();

    let (type_hint, variable) = if is_variable(first) {
        ("", first)
    } else {
        let variable = tokens.next().filter(|t| is_variable(t)).unwrap_or_default();
        (first, variable)
    };

    Annotation::Param {
        type_hint: type_hint.to_string(),
        variable: variable_name(variable).to_string(),
    }
}

fn parse_return(body: &str) -> Annotation {
    Annotation::Return {
        type_hint: body
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// The return type defaults to `void` when the tag omits it, with or
/// without a leading `static`.
fn parse_method(body: &str) -> Result<Annotation, AnnotationError> {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    let malformed = || AnnotationError::Malformed {
        tag: "method".to_string(),
        text: collapsed.clone(),
    };

    let (head, signature) = collapsed
        .find('(')
        .map(|open| collapsed.split_at(open))
        .ok_or_else(malformed)?;

    let mut prefix: Vec<&str> = head.split_whitespace().collect();
    let name = prefix
        .pop()
        .filter(|name| is_identifier(name))
        .ok_or_else(malformed)?;

    if prefix.is_empty() || prefix == ["static"] {
        prefix.push("void");
    }

    Ok(Annotation::Method {
        name: name.to_string(),
        rendered: format!("{} {name}{signature}", prefix.join(" ")),
    })
}
