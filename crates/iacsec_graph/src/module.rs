//! Modules and the module set.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::block::Block;
use crate::error::{GraphError, GraphResult};
use crate::expr::{Expr, Node, Reference, ReferenceKey};
use crate::range::Range;

/// The blocks of one configuration unit (a file or an included module).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    pub path: String,
    /// Number of lines in the source, when the parser reports it.
    pub line_count: Option<usize>,
    pub blocks: Vec<Block>,
}

impl Module {
    pub fn new(path: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            path: path.into(),
            line_count: None,
            blocks,
        }
    }

    pub fn with_line_count(mut self, line_count: usize) -> Self {
        self.line_count = Some(line_count);
        self
    }

    /// Blocks of a type, in declaration order.
    pub fn blocks_of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.blocks.iter().filter(move |b| b.type_name == type_name)
    }

    /// First block declared with this type and label.
    pub fn block(&self, type_name: &str, label: &str) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|b| b.type_name == type_name && b.label == label)
    }

    /// Check that the module has a path and every range in it is well formed.
    pub fn validate(&self) -> GraphResult<()> {
        if self.path.trim().is_empty() {
            return Err(GraphError::InvalidModule {
                path: self.path.clone(),
                reason: "module has no path".to_string(),
            });
        }
        for block in &self.blocks {
            self.validate_block(block)?;
        }
        Ok(())
    }

    fn validate_block(&self, block: &Block) -> GraphResult<()> {
        self.validate_range(&block.range)?;
        for attr in &block.attributes {
            self.validate_node(&attr.value)?;
        }
        for child in &block.children {
            if !block.range.contains(&child.range) {
                return Err(self.range_error(&child.range, "nested block outside its parent"));
            }
            self.validate_block(child)?;
        }
        Ok(())
    }

    fn validate_node(&self, node: &Node) -> GraphResult<()> {
        self.validate_range(&node.range)?;
        if let Expr::List(items) = &node.expr {
            for item in items {
                self.validate_node(item)?;
            }
        }
        Ok(())
    }

    fn validate_range(&self, range: &Range) -> GraphResult<()> {
        if range.file.is_empty() {
            return Err(self.range_error(range, "range has no file"));
        }
        if range.start_line == 0 {
            return Err(self.range_error(range, "lines are 1-based"));
        }
        if range.start_line > range.end_line {
            return Err(self.range_error(range, "start after end"));
        }
        if let Some(count) = self.line_count {
            if range.end_line > count {
                return Err(self.range_error(range, &format!("file has {} lines", count)));
            }
        }
        Ok(())
    }

    fn range_error(&self, range: &Range, reason: &str) -> GraphError {
        GraphError::InvalidRange {
            file: if range.file.is_empty() {
                self.path.clone()
            } else {
                range.file.clone()
            },
            start: range.start_line,
            end: range.end_line,
            reason: reason.to_string(),
        }
    }
}

/// Position of a top-level block within a module set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockId {
    pub module: usize,
    pub index: usize,
}

/// A top-level block together with its id and owning module.
#[derive(Debug, Clone, Copy)]
pub struct BlockRef<'a> {
    pub id: BlockId,
    pub module: &'a Module,
    pub block: &'a Block,
}

impl<'a> std::ops::Deref for BlockRef<'a> {
    type Target = Block;

    fn deref(&self) -> &Block {
        self.block
    }
}

/// Every module of a scan, indexed for global lookup.
///
/// Built once and read-only afterwards, so it can be shared across
/// threads and adapters without locking.
#[derive(Debug, Clone, Default)]
pub struct ModuleSet {
    modules: Vec<Module>,
    by_type: HashMap<String, Vec<BlockId>>,
    by_key: HashMap<ReferenceKey, BlockId>,
}

impl ModuleSet {
    /// Index modules in inclusion order; the root module comes first.
    pub fn new(modules: Vec<Module>) -> Self {
        let mut by_type: HashMap<String, Vec<BlockId>> = HashMap::new();
        let mut by_key: HashMap<ReferenceKey, BlockId> = HashMap::new();

        for (module_index, module) in modules.iter().enumerate() {
            for (index, block) in module.blocks.iter().enumerate() {
                let id = BlockId {
                    module: module_index,
                    index,
                };
                by_type.entry(block.type_name.clone()).or_default().push(id);

                let key = block.key();
                if let Some(first) = by_key.get(&key) {
                    debug!(
                        "Duplicate block {} at {}; first declaration ({:?}) wins",
                        key, block.range, first
                    );
                } else {
                    by_key.insert(key, id);
                }
            }
        }

        Self {
            modules,
            by_type,
            by_key,
        }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Total number of top-level blocks.
    pub fn block_count(&self) -> usize {
        self.modules.iter().map(|m| m.blocks.len()).sum()
    }

    pub fn get(&self, id: BlockId) -> Option<BlockRef<'_>> {
        let module = self.modules.get(id.module)?;
        let block = module.blocks.get(id.index)?;
        Some(BlockRef { id, module, block })
    }

    /// Blocks of a type across all modules, in inclusion then declaration order.
    pub fn blocks_of_type(&self, type_name: &str) -> Vec<BlockRef<'_>> {
        self.by_type
            .get(type_name)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    /// All top-level blocks in inclusion then declaration order.
    pub fn blocks(&self) -> impl Iterator<Item = BlockRef<'_>> {
        self.modules.iter().enumerate().flat_map(|(module_index, module)| {
            module.blocks.iter().enumerate().map(move |(index, block)| BlockRef {
                id: BlockId {
                    module: module_index,
                    index,
                },
                module,
                block,
            })
        })
    }

    /// First block declared with this type and label, in any module.
    pub fn block(&self, type_name: &str, label: &str) -> Option<BlockRef<'_>> {
        self.by_key
            .get(&ReferenceKey::new(type_name, label))
            .and_then(|id| self.get(*id))
    }

    pub fn resolve_reference(&self, reference: &Reference) -> Option<BlockRef<'_>> {
        self.block(&reference.type_name, &reference.label)
    }

    /// Reject sets that cannot be adapted: no modules, or malformed ranges.
    pub fn validate(&self) -> GraphResult<()> {
        if self.modules.is_empty() {
            return Err(GraphError::EmptyModuleSet("no modules".to_string()));
        }
        for module in &self.modules {
            module.validate()?;
        }
        Ok(())
    }
}

impl From<Vec<Module>> for ModuleSet {
    fn from(modules: Vec<Module>) -> Self {
        Self::new(modules)
    }
}
