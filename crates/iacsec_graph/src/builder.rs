//! Fluent construction of blocks.
//!
//! Used by parser front-ends and tests. Ranges are written as line numbers;
//! the file is set once on the outermost builder and inherited by nested
//! blocks, attributes and list elements on [`BlockBuilder::build`].

use crate::block::Block;
use crate::expr::{Attribute, Expr, Node, Reference};
use crate::range::Range;

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Bool(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Int(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Int(value.into())
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Float(value)
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::String(value.to_string())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Expr::String(value)
    }
}

impl From<Reference> for Expr {
    fn from(value: Reference) -> Self {
        Expr::Reference(value)
    }
}

/// Builder for a [`Block`] and its nested blocks.
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    type_name: String,
    label: String,
    file: Option<String>,
    start_line: usize,
    end_line: usize,
    attributes: Vec<Attribute>,
    children: Vec<BlockBuilder>,
}

impl BlockBuilder {
    pub fn new(type_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            label: label.into(),
            file: None,
            start_line: 1,
            end_line: 1,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn lines(mut self, start: usize, end: usize) -> Self {
        self.start_line = start;
        self.end_line = end;
        self
    }

    /// Single-line attribute.
    pub fn attr(self, name: impl Into<String>, value: impl Into<Expr>, line: usize) -> Self {
        self.attr_span(name, value, line, line)
    }

    pub fn attr_span(
        mut self,
        name: impl Into<String>,
        value: impl Into<Expr>,
        start: usize,
        end: usize,
    ) -> Self {
        self.attributes
            .push(Attribute::new(name, value.into(), pending(start, end)));
        self
    }

    /// Single-line list attribute; every element shares the line.
    pub fn list_attr<I, V>(self, name: impl Into<String>, items: I, line: usize) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Expr>,
    {
        let items = items.into_iter().map(|item| (item, line));
        self.list_attr_lines(name, items, line, line)
    }

    /// List attribute spanning several lines, one line per element.
    pub fn list_attr_lines<I, V>(
        mut self,
        name: impl Into<String>,
        items: I,
        start: usize,
        end: usize,
    ) -> Self
    where
        I: IntoIterator<Item = (V, usize)>,
        V: Into<Expr>,
    {
        let nodes = items
            .into_iter()
            .map(|(item, line)| Node::new(item.into(), pending(line, line)))
            .collect();
        self.attributes
            .push(Attribute::new(name, Expr::List(nodes), pending(start, end)));
        self
    }

    /// Reference attribute such as `azurerm_storage_account.example.name`.
    ///
    /// Text that is not a valid traversal is kept as an unresolved marker.
    pub fn reference(self, name: impl Into<String>, target: &str, line: usize) -> Self {
        let expr = match Reference::parse(target) {
            Ok(reference) => Expr::Reference(reference),
            Err(_) => Expr::Unresolved(target.to_string()),
        };
        self.attr(name, expr, line)
    }

    pub fn unresolved(self, name: impl Into<String>, text: impl Into<String>, line: usize) -> Self {
        self.attr(name, Expr::Unresolved(text.into()), line)
    }

    pub fn child(mut self, child: BlockBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn build(self) -> Block {
        let file = self.file.clone().unwrap_or_default();
        self.build_in(&file)
    }

    fn build_in(self, inherited: &str) -> Block {
        let file = self.file.unwrap_or_else(|| inherited.to_string());

        let attributes = self
            .attributes
            .into_iter()
            .map(|mut attr| {
                stamp(&mut attr.value, &file);
                attr
            })
            .collect();

        let children = self
            .children
            .into_iter()
            .map(|child| child.build_in(&file))
            .collect();

        Block {
            type_name: self.type_name,
            label: self.label,
            attributes,
            children,
            range: Range::new(file, self.start_line, self.end_line),
        }
    }
}

fn pending(start: usize, end: usize) -> Range {
    Range::new(String::new(), start, end)
}

fn stamp(node: &mut Node, file: &str) {
    if node.range.file.is_empty() {
        node.range.file = file.to_string();
    }
    if let Expr::List(items) = &mut node.expr {
        for item in items {
            stamp(item, file);
        }
    }
}
