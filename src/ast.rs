/// The parse tree for a CDL source file: the top-level items in document
/// order, before any constant resolution has happened.
#[derive(Debug, PartialEq, Clone)]
pub struct CdlDocument {
    pub items: Vec<Item>,
}

/// A top-level item. Constants declare a name for later `[NAME]` references;
/// dict blocks contribute their keys to the final document.
#[derive(Debug, PartialEq, Clone)]
pub enum Item {
    Constant(ConstantDecl),
    Dict(DictBlock),
}

/// `(define NAME value)`
#[derive(Debug, PartialEq, Clone)]
pub struct ConstantDecl {
    pub name: String,
    pub value: ValueNode,
    pub pos_start: usize,
    pub pos_end: usize,
}

/// `begin (assignment ";")* end`
#[derive(Debug, PartialEq, Clone)]
pub struct DictBlock {
    pub assignments: Vec<Assignment>,
    pub pos_start: usize,
    pub pos_end: usize,
}

/// `NAME := value`
#[derive(Debug, PartialEq, Clone)]
pub struct Assignment {
    pub key: String,
    pub value: ValueNode,
}

/// A value position in the grammar, with its source span.
#[derive(Debug, PartialEq, Clone)]
pub struct ValueNode {
    pub kind: ValueKind,
    pub pos_start: usize,
    pub pos_end: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ValueKind {
    /// An integer literal, kept as its raw lexeme. The transformer parses it
    /// into an `i64` and reports overflow with this node's span.
    Integer(String),
    /// A string literal with escapes already decoded by the lexer.
    String(String),
    /// A nested `begin ... end` block.
    Dict(DictBlock),
    /// A `[NAME]` constant reference, resolved at transform time.
    ConstantRef(String),
}
