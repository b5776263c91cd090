use crate::ast::{CdlDocument, ConstantDecl, DictBlock, Item, ValueKind, ValueNode};
use crate::error::TransformError;
use crate::value::Value;
use indexmap::IndexMap;
use miette::NamedSource;
use std::sync::Arc;

/// The output of a successful transformation: the merged top-level document
/// and the constant table in its final state (for inspection; the table is
/// built fresh on every `transform` call).
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub root: Value,
    pub constants: IndexMap<String, Value>,
}

/// Reduces a parse tree to a resolved document in a single bottom-up pass,
/// resolving `[NAME]` references against the constants defined earlier in
/// document order.
///
/// The transformer itself only carries the source text for error spans; all
/// mutable state lives inside one `transform` call, so a `Transformer` can be
/// reused or shared across threads freely.
pub struct Transformer {
    source: Arc<NamedSource<String>>,
}

impl Transformer {
    pub fn new(source_text: &str) -> Self {
        Self::new_with_name(source_text, "source.cdl".to_string())
    }

    pub fn new_with_name(source_text: &str, name: String) -> Self {
        Self {
            source: Arc::new(NamedSource::new(name, source_text.to_string())),
        }
    }

    /// Walks the top-level items in document order. Constant declarations
    /// update the table and contribute nothing to the output; dict blocks are
    /// evaluated and merged into the document.
    ///
    /// Merge policy, here and for duplicate keys within a block: the key
    /// keeps its first-seen position, the last value wins.
    pub fn transform(&self, document: &CdlDocument) -> Result<Transformed, TransformError> {
        let mut constants: IndexMap<String, Value> = IndexMap::new();
        let mut root: IndexMap<String, Value> = IndexMap::new();

        for item in &document.items {
            match item {
                Item::Constant(decl) => self.define_constant(decl, &mut constants)?,
                Item::Dict(block) => {
                    let dict = self.eval_dict(block, &constants)?;
                    for (key, value) in dict {
                        root.insert(key, value);
                    }
                    log::trace!("merged top-level block, document now has {} keys", root.len());
                }
            }
        }

        Ok(Transformed {
            root: Value::Dict(root),
            constants,
        })
    }

    /// `(define NAME value)`: evaluate the value against the constants known
    /// so far, then insert or overwrite. Redefinition is allowed; later
    /// references see the most recent preceding definition.
    fn define_constant(
        &self,
        decl: &ConstantDecl,
        constants: &mut IndexMap<String, Value>,
    ) -> Result<(), TransformError> {
        let value = self.eval_value(&decl.value, constants)?;
        log::debug!("defined constant '{}'", decl.name);
        constants.insert(decl.name.clone(), value);
        Ok(())
    }

    fn eval_dict(
        &self,
        block: &DictBlock,
        constants: &IndexMap<String, Value>,
    ) -> Result<IndexMap<String, Value>, TransformError> {
        let mut dict = IndexMap::new();
        for assignment in &block.assignments {
            let value = self.eval_value(&assignment.value, constants)?;
            dict.insert(assignment.key.clone(), value);
        }
        Ok(dict)
    }

    fn eval_value(
        &self,
        node: &ValueNode,
        constants: &IndexMap<String, Value>,
    ) -> Result<Value, TransformError> {
        match &node.kind {
            ValueKind::Integer(raw) => {
                raw.parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| TransformError::IntegerOverflow {
                        literal: raw.clone(),
                        src: (*self.source).clone(),
                        span: (node.pos_start, node.pos_end - node.pos_start).into(),
                    })
            }
            ValueKind::String(s) => Ok(Value::Str(s.clone())),
            ValueKind::Dict(block) => Ok(Value::Dict(self.eval_dict(block, constants)?)),
            ValueKind::ConstantRef(name) => constants.get(name).cloned().ok_or_else(|| {
                TransformError::UndefinedConstant {
                    name: name.clone(),
                    src: (*self.source).clone(),
                    span: (node.pos_start, node.pos_end - node.pos_start).into(),
                }
            }),
        }
    }
}
