//! Resource blocks and typed attribute access.

use serde::Serialize;
use tracing::warn;

use crate::expr::{Attribute, Expr, Reference, ReferenceKey};
use crate::range::Range;
use crate::value::{BoolValue, IntValue, StringValue, Value};

/// A single parsed declaration: `resource "<type_name>" "<label>" { ... }`
/// at the top level, or a nested block such as `network_rules { ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub type_name: String,
    /// Empty for singleton and nested blocks.
    pub label: String,
    /// Attributes in declaration order.
    pub attributes: Vec<Attribute>,
    /// Nested blocks in declaration order.
    pub children: Vec<Block>,
    pub range: Range,
}

/// Result of looking a name up on a block.
#[derive(Debug, Clone, Copy)]
pub enum Lookup<'a> {
    /// No attribute or nested block of that name, or an explicit `null`.
    Absent,
    Scalar(&'a Attribute),
    List(&'a Attribute),
    Reference(&'a Attribute, &'a Reference),
    Unresolved(&'a Attribute),
    Block(&'a Block),
}

impl<'a> Lookup<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    pub fn attribute(&self) -> Option<&'a Attribute> {
        match *self {
            Lookup::Scalar(attr)
            | Lookup::List(attr)
            | Lookup::Reference(attr, _)
            | Lookup::Unresolved(attr) => Some(attr),
            Lookup::Absent | Lookup::Block(_) => None,
        }
    }
}

impl Block {
    pub fn new(type_name: impl Into<String>, label: impl Into<String>, range: Range) -> Self {
        Self {
            type_name: type_name.into(),
            label: label.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            range,
        }
    }

    pub fn key(&self) -> ReferenceKey {
        ReferenceKey::new(&self.type_name, &self.label)
    }

    /// First attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        !self.lookup(name).is_absent()
    }

    /// First nested block of the given type.
    pub fn child(&self, type_name: &str) -> Option<&Block> {
        self.children.iter().find(|b| b.type_name == type_name)
    }

    pub fn children_of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.children.iter().filter(move |b| b.type_name == type_name)
    }

    /// Look up an attribute, falling back to a nested block of that name.
    pub fn lookup(&self, name: &str) -> Lookup<'_> {
        if let Some(attr) = self.attribute(name) {
            return match attr.expr() {
                Expr::Null => Lookup::Absent,
                Expr::List(_) => Lookup::List(attr),
                Expr::Reference(reference) => Lookup::Reference(attr, reference),
                Expr::Unresolved(_) => Lookup::Unresolved(attr),
                _ => Lookup::Scalar(attr),
            };
        }
        match self.child(name) {
            Some(block) => Lookup::Block(block),
            None => Lookup::Absent,
        }
    }

    /// Look up a dotted path such as `queue_properties.logging.version`.
    ///
    /// Every segment but the last must name a nested block.
    pub fn lookup_path(&self, path: &str) -> Lookup<'_> {
        let mut segments: Vec<&str> = path.split('.').collect();
        let last = match segments.pop() {
            Some(last) if !last.is_empty() => last,
            _ => return Lookup::Absent,
        };

        let mut current = self;
        for segment in segments {
            match current.child(segment) {
                Some(child) => current = child,
                None => return Lookup::Absent,
            }
        }
        current.lookup(last)
    }

    /// Extract a typed value from an attribute.
    ///
    /// Absent attributes and attributes that do not convert yield the
    /// default with `Defaulted` provenance; conversion failures are logged.
    pub fn extract<T>(
        &self,
        name: &str,
        default: T,
        expected: &str,
        convert: impl Fn(&Expr) -> Option<T>,
    ) -> Value<T> {
        let attr = match self.lookup(name).attribute() {
            Some(attr) => attr,
            None => return Value::defaulted(default),
        };
        match convert(attr.expr()) {
            Some(value) => Value::explicit(value, attr.range().clone()),
            None => {
                self.warn_mismatch(attr, expected);
                Value::defaulted(default)
            }
        }
    }

    pub fn bool_value(&self, name: &str, default: bool) -> BoolValue {
        self.extract(name, default, "bool", Expr::as_bool)
    }

    pub fn string_value(&self, name: &str, default: &str) -> StringValue {
        self.extract(name, default.to_string(), "string", Expr::as_string)
    }

    pub fn int_value(&self, name: &str, default: i64) -> IntValue {
        self.extract(name, default, "number", Expr::as_int)
    }

    /// Whether a string attribute equals `expected`, ignoring ASCII case.
    pub fn equals_ignore_case(&self, name: &str, expected: &str, default: bool) -> BoolValue {
        self.extract(name, default, "string", |expr| {
            expr.as_string().map(|s| s.eq_ignore_ascii_case(expected))
        })
    }

    /// Extract a list of strings, each element with its own range.
    ///
    /// A bare string is accepted as a one-element list. Elements that do
    /// not convert are skipped.
    pub fn string_values(&self, name: &str) -> Vec<StringValue> {
        let attr = match self.lookup(name).attribute() {
            Some(attr) => attr,
            None => return Vec::new(),
        };

        match attr.expr() {
            Expr::List(items) => items
                .iter()
                .filter_map(|item| match item.expr.as_string() {
                    Some(s) => Some(StringValue::explicit(s, item.range.clone())),
                    None => {
                        warn!(
                            "{} at {}: list element of kind {} is not a string, skipping",
                            attr.name,
                            item.range,
                            item.expr.kind()
                        );
                        None
                    }
                })
                .collect(),
            expr => match expr.as_string() {
                Some(s) => vec![StringValue::explicit(s, attr.range().clone())],
                None => {
                    self.warn_mismatch(attr, "list");
                    Vec::new()
                }
            },
        }
    }

    fn warn_mismatch(&self, attr: &Attribute, expected: &str) {
        warn!(
            "{}.{} at {}: expected {}, found {}; treating as missing",
            self.type_name,
            attr.name,
            attr.range(),
            expected,
            attr.expr().kind()
        );
    }
}
