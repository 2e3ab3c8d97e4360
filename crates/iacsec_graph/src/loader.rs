//! Loading module sets from parser output documents.
//!
//! A document is the serialized form of what a parser front-end produces:
//!
//! ```yaml
//! modules:
//!   - path: main.tf
//!     line_count: 41
//!     blocks:
//!       - type: azurerm_storage_account
//!         label: example
//!         lines: [7, 27]
//!         attributes:
//!           - { name: enable_https_traffic_only, lines: [10, 10], value: true }
//!           - { name: bypass, lines: [25, 25], value: [Metrics, AzureServices] }
//!         blocks:
//!           - type: network_rules
//!             lines: [23, 26]
//!       - type: azurerm_storage_container
//!         label: example
//!         lines: [37, 41]
//!         attributes:
//!           - { name: storage_account_name, lines: [38, 38], ref: azurerm_storage_account.example.name }
//!           - { name: resource_group_name, lines: [39, 39], unresolved: var.rg }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::block::Block;
use crate::error::{GraphError, GraphResult};
use crate::expr::{Attribute, Expr, Node, Reference};
use crate::module::{Module, ModuleSet};
use crate::range::Range;

/// Root of a module-set document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleSetDocument {
    #[serde(default)]
    pub modules: Vec<ModuleDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDocument {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
    #[serde(default)]
    pub blocks: Vec<BlockDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDocument {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub label: String,
    pub lines: (usize, usize),
    #[serde(default)]
    pub attributes: Vec<AttributeDocument>,
    #[serde(default)]
    pub blocks: Vec<BlockDocument>,
}

/// One attribute; at most one of `value`, `ref` and `unresolved` is set.
/// None of them means an explicit `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDocument {
    pub name: String,
    pub lines: (usize, usize),
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unresolved: Option<String>,
    /// Per-element line spans for list values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<(usize, usize)>>,
}

impl ModuleSetDocument {
    /// Convert into a module set. Ranges are not validated here.
    pub fn into_module_set(self) -> GraphResult<ModuleSet> {
        let modules = self
            .modules
            .into_iter()
            .map(ModuleDocument::into_module)
            .collect::<GraphResult<Vec<_>>>()?;
        Ok(ModuleSet::new(modules))
    }
}

impl ModuleDocument {
    fn into_module(self) -> GraphResult<Module> {
        let blocks = self
            .blocks
            .into_iter()
            .map(|b| b.into_block(&self.path))
            .collect::<GraphResult<Vec<_>>>()?;
        Ok(Module {
            path: self.path,
            line_count: self.line_count,
            blocks,
        })
    }
}

impl BlockDocument {
    fn into_block(self, file: &str) -> GraphResult<Block> {
        let attributes = self
            .attributes
            .into_iter()
            .map(|a| a.into_attribute(file))
            .collect::<GraphResult<Vec<_>>>()?;
        let children = self
            .blocks
            .into_iter()
            .map(|b| b.into_block(file))
            .collect::<GraphResult<Vec<_>>>()?;
        Ok(Block {
            type_name: self.type_name,
            label: self.label,
            attributes,
            children,
            range: Range::new(file, self.lines.0, self.lines.1),
        })
    }
}

impl AttributeDocument {
    fn into_attribute(self, file: &str) -> GraphResult<Attribute> {
        let range = Range::new(file, self.lines.0, self.lines.1);
        let invalid = |reason: &str| GraphError::InvalidAttribute {
            file: file.to_string(),
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        let expr = match (&self.value, &self.reference, &self.unresolved) {
            (None, None, None) => Expr::Null,
            (Some(value), None, None) => {
                convert_value(value, &range, self.elements.as_deref(), file).map_err(|e| invalid(&e))?
            }
            (None, Some(reference), None) => match Reference::parse(reference) {
                Ok(parsed) => Expr::Reference(parsed),
                Err(_) => {
                    debug!(
                        "Keeping '{}' on {} in {} as an unresolved expression",
                        reference, self.name, file
                    );
                    Expr::Unresolved(reference.clone())
                }
            },
            (None, None, Some(text)) => Expr::Unresolved(text.clone()),
            _ => return Err(invalid("only one of value, ref and unresolved may be set")),
        };

        Ok(Attribute::new(self.name, expr, range))
    }
}

fn convert_value(
    value: &serde_json::Value,
    range: &Range,
    elements: Option<&[(usize, usize)]>,
    file: &str,
) -> Result<Expr, String> {
    use serde_json::Value as Json;

    Ok(match value {
        Json::Null => Expr::Null,
        Json::Bool(b) => Expr::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Expr::Int(i),
            None => Expr::Float(n.as_f64().ok_or_else(|| format!("unrepresentable number {}", n))?),
        },
        Json::String(s) => Expr::String(s.clone()),
        Json::Array(items) => {
            if let Some(spans) = elements {
                if spans.len() != items.len() {
                    return Err(format!(
                        "{} element spans for {} list items",
                        spans.len(),
                        items.len()
                    ));
                }
            }
            let nodes = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let item_range = match elements {
                        Some(spans) => Range::new(file, spans[i].0, spans[i].1),
                        None => range.clone(),
                    };
                    convert_value(item, &item_range, None, file).map(|expr| Node::new(expr, item_range))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Expr::List(nodes)
        }
        Json::Object(_) => return Err("object values are not supported".to_string()),
    })
}

/// Loads module sets from documents on disk or in memory.
pub struct ModuleSetLoader;

impl ModuleSetLoader {
    pub fn from_yaml_str(content: &str) -> GraphResult<ModuleSet> {
        let document: ModuleSetDocument = serde_yaml::from_str(content)?;
        Self::finish(document)
    }

    pub fn from_json_str(content: &str) -> GraphResult<ModuleSet> {
        let document: ModuleSetDocument = serde_json::from_str(content)?;
        Self::finish(document)
    }

    /// Load a document file or a directory of documents.
    pub fn load(path: &Path) -> GraphResult<ModuleSet> {
        if path.is_dir() {
            Self::load_dir(path)
        } else {
            Self::load_file(path)
        }
    }

    /// Load one document, choosing the format by extension.
    pub fn load_file(path: &Path) -> GraphResult<ModuleSet> {
        let document = Self::read_document(path)?;
        Self::finish(document)
    }

    /// Load every document under a directory, in sorted path order.
    pub fn load_dir(dir: &Path) -> GraphResult<ModuleSet> {
        let mut combined = ModuleSetDocument::default();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || document_format(path).is_none() {
                continue;
            }
            let document = Self::read_document(path)?;
            combined.modules.extend(document.modules);
        }

        if combined.modules.is_empty() {
            return Err(GraphError::EmptyModuleSet(dir.display().to_string()));
        }
        Self::finish(combined)
    }

    fn read_document(path: &Path) -> GraphResult<ModuleSetDocument> {
        debug!("Reading module set document from {:?}", path);
        let content = fs::read_to_string(path)?;
        match document_format(path) {
            Some(DocumentFormat::Yaml) => Ok(serde_yaml::from_str(&content)?),
            Some(DocumentFormat::Json) => Ok(serde_json::from_str(&content)?),
            None => Err(GraphError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    fn finish(document: ModuleSetDocument) -> GraphResult<ModuleSet> {
        let modules = document.into_module_set()?;
        modules.validate()?;
        info!(
            "Loaded {} modules with {} blocks",
            modules.len(),
            modules.block_count()
        );
        Ok(modules)
    }
}

enum DocumentFormat {
    Yaml,
    Json,
}

fn document_format(path: &Path) -> Option<DocumentFormat> {
    match path.extension()?.to_str()? {
        "yaml" | "yml" => Some(DocumentFormat::Yaml),
        "json" => Some(DocumentFormat::Json),
        _ => None,
    }
}
