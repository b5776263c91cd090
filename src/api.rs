use crate::ast::CdlDocument;
use crate::error::CdlError;
use crate::parser::Parser;
use crate::transform::Transformer;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// The result of a successful analysis of a CDL document.
/// This struct contains the fully resolved document alongside the parse tree
/// it came from, and provides methods for serialization.
#[derive(Debug)]
pub struct AnalysisResult {
    /// The merged top-level document (always a `Value::Dict`).
    pub root: Value,
    /// The parse tree the document was resolved from.
    pub document: CdlDocument,
    /// The constant table in its final state.
    pub constants: IndexMap<String, Value>,
}

impl Serialize for AnalysisResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.root.serialize(serializer)
    }
}

impl AnalysisResult {
    /// Serializes the resolved document into a TOML string, the target
    /// configuration format. Key order follows declaration order.
    ///
    /// # Errors
    /// Returns a `toml::ser::Error` if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(&self)
    }

    /// Serializes the resolved document into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the resolved document into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }
}

/// Analyzes a CDL source string: parses it and resolves it into a document.
///
/// This is the primary entry point for processing CDL data. It returns an
/// `AnalysisResult` on success, which contains the resolved document and
/// provides methods for serialization.
///
/// # Arguments
///
/// * `source` - The CDL source code as a string.
/// * `file_name` - The name of the file being analyzed (used for error reporting).
///
/// # Errors
///
/// Returns a `CdlError` if parsing or transformation fails.
pub fn analyze(source: &str, file_name: &str) -> Result<AnalysisResult, CdlError> {
    let mut parser = Parser::new_with_name(source, file_name.to_string())?;
    let document = parser.parse_document()?;

    let transformer = Transformer::new_with_name(source, file_name.to_string());
    let transformed = transformer.transform(&document)?;

    Ok(AnalysisResult {
        root: transformed.root,
        document,
        constants: transformed.constants,
    })
}
