//! Attribute selector parsing and matching.
//!
//! Supported forms, combinable with AND semantics:
//! - `[name]` matches elements carrying the attribute
//! - `[name="value"]` / `[name='value']` / `[name=value]` exact match

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::page::document::Element;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("expected '[' at offset {0}")]
    ExpectedOpen(usize),

    #[error("unterminated attribute condition")]
    Unterminated,

    #[error("missing attribute name")]
    MissingName,

    #[error("unterminated quoted value")]
    UnterminatedQuote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeCondition {
    name: String,
    value: Option<String>,
}

impl AttributeCondition {
    fn matches(&self, element: &Element) -> bool {
        match (&self.value, element.attribute(&self.name)) {
            (None, found) => found.is_some(),
            (Some(expected), Some(actual)) => expected == actual,
            (Some(_), None) => false,
        }
    }
}

/// A parsed attribute selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    conditions: Vec<AttributeCondition>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut conditions = Vec::new();
        let mut rest = trimmed;
        while !rest.is_empty() {
            let offset = trimmed.len() - rest.len();
            let body = rest
                .strip_prefix('[')
                .ok_or(SelectorError::ExpectedOpen(offset))?;
            let (condition, remaining) = parse_condition(body)?;
            conditions.push(condition);
            rest = remaining.trim_start();
        }

        Ok(Self {
            source: trimmed.to_string(),
            conditions,
        })
    }

    /// Returns true if every condition holds for the element.
    pub fn matches(&self, element: &Element) -> bool {
        self.conditions.iter().all(|c| c.matches(element))
    }

    /// Build an element that this selector matches.
    pub fn template(&self, tag: &str) -> Element {
        self.conditions.iter().fold(Element::new(tag), |element, c| {
            element.with_attribute(c.name.clone(), c.value.clone().unwrap_or_default())
        })
    }
}

/// Parse one condition after its opening bracket, returning the remainder
/// after the closing bracket.
fn parse_condition(body: &str) -> Result<(AttributeCondition, &str), SelectorError> {
    let name_end = body
        .find(|c: char| c == '=' || c == ']')
        .ok_or(SelectorError::Unterminated)?;
    let name = body[..name_end].trim();
    if name.is_empty() {
        return Err(SelectorError::MissingName);
    }

    let after_name = &body[name_end..];
    if let Some(rest) = after_name.strip_prefix(']') {
        let condition = AttributeCondition {
            name: name.to_string(),
            value: None,
        };
        return Ok((condition, rest));
    }

    // Skip '='.
    let value_part = after_name[1..].trim_start();
    let (value, rest) = match value_part.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = &value_part[1..];
            let close = inner.find(quote).ok_or(SelectorError::UnterminatedQuote)?;
            let rest = inner[close + 1..]
                .trim_start()
                .strip_prefix(']')
                .ok_or(SelectorError::Unterminated)?;
            (inner[..close].to_string(), rest)
        }
        Some(_) => {
            let close = value_part.find(']').ok_or(SelectorError::Unterminated)?;
            (value_part[..close].trim().to_string(), &value_part[close + 1..])
        }
        None => return Err(SelectorError::Unterminated),
    };

    let condition = AttributeCondition {
        name: name.to_string(),
        value: Some(value),
    };
    Ok((condition, rest))
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
