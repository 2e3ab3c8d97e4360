//! Evaluated attribute expressions.
//!
//! The upstream parser hands over expressions that are already evaluated:
//! literals, references to other blocks, or markers for references it
//! could not resolve. Every node keeps its own source range so list
//! elements can be attributed individually.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{GraphError, GraphResult};
use crate::range::Range;

const REFERENCE_PATTERN: &str =
    r"^([A-Za-z_][A-Za-z0-9_-]*)\.([A-Za-z_][A-Za-z0-9_-]*)((?:\[[^\]]*\]|\.[A-Za-z0-9_-]+)*)$";

static REFERENCE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

/// An evaluated expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Expr {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Node>),
    Reference(Reference),
    /// A reference the parser could not resolve, kept as source text.
    Unresolved(String),
}

impl Expr {
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Null => "null",
            Expr::Bool(_) => "bool",
            Expr::Int(_) => "int",
            Expr::Float(_) => "float",
            Expr::String(_) => "string",
            Expr::List(_) => "list",
            Expr::Reference(_) => "reference",
            Expr::Unresolved(_) => "unresolved",
        }
    }

    /// Bool conversion, accepting the string forms HCL coerces.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Expr::Bool(b) => Some(*b),
            Expr::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// String conversion; numbers and bools render as HCL would.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Expr::String(s) => Some(s.clone()),
            Expr::Int(i) => Some(i.to_string()),
            Expr::Float(f) => Some(f.to_string()),
            Expr::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Expr::Int(i) => Some(*i),
            Expr::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Expr::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Expr::List(items) => Some(items),
            _ => None,
        }
    }
}

/// An expression with the source range it was written at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub expr: Expr,
    pub range: Range,
}

impl Node {
    pub fn new(expr: Expr, range: Range) -> Self {
        Self { expr, range }
    }
}

/// Identity of a block: `(type, label)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ReferenceKey {
    pub type_name: String,
    pub label: String,
}

impl ReferenceKey {
    pub fn new(type_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            label: label.into(),
        }
    }
}

impl std::fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.type_name, self.label)
    }
}

/// A traversal such as `azurerm_storage_account.example.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    pub type_name: String,
    pub label: String,
    /// Remaining traversal after the label, if any (`name`, `id`, ...).
    pub attribute: Option<String>,
}

impl Reference {
    pub fn new(type_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            label: label.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Parse `<type>.<label>[.<attr>...]`. Indices anywhere after the label
    /// (`[0]`, `["key"]`, legacy `.0`) are dropped from the attribute path.
    pub fn parse(text: &str) -> GraphResult<Self> {
        let regex = REFERENCE_REGEX
            .get_or_init(|| Regex::new(REFERENCE_PATTERN).ok())
            .as_ref()
            .ok_or_else(|| GraphError::InvalidReference(text.to_string()))?;

        let captures = regex
            .captures(text.trim())
            .ok_or_else(|| GraphError::InvalidReference(text.to_string()))?;

        let attribute = captures.get(3).and_then(|m| attribute_path(m.as_str()));

        Ok(Self {
            type_name: captures[1].to_string(),
            label: captures[2].to_string(),
            attribute,
        })
    }

    pub fn key(&self) -> ReferenceKey {
        ReferenceKey::new(&self.type_name, &self.label)
    }
}

/// Attribute segments of a traversal suffix, without index steps.
fn attribute_path(suffix: &str) -> Option<String> {
    let mut unindexed = String::with_capacity(suffix.len());
    let mut depth = 0usize;
    for c in suffix.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => unindexed.push(c),
            _ => {}
        }
    }

    let segments: Vec<&str> = unindexed
        .split('.')
        .filter(|s| !s.is_empty() && !s.chars().all(|c| c.is_ascii_digit()))
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("."))
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.type_name, self.label)?;
        if let Some(attribute) = &self.attribute {
            write!(f, ".{}", attribute)?;
        }
        Ok(())
    }
}

/// A named attribute of a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: Node,
}

impl Attribute {
    pub fn new(name: impl Into<String>, expr: Expr, range: Range) -> Self {
        Self {
            name: name.into(),
            value: Node::new(expr, range),
        }
    }

    pub fn expr(&self) -> &Expr {
        &self.value.expr
    }

    pub fn range(&self) -> &Range {
        &self.value.range
    }
}
