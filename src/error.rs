use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CdlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Transform(#[from] TransformError),
}

/// Syntax errors: the token stream does not match the CDL grammar.
/// No partial parse tree is produced.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("Unexpected token")]
    #[diagnostic(
        code(parser::unexpected_token),
        help("The parser found a token it did not expect in this position.")
    )]
    UnexpectedToken {
        #[source_code]
        src: NamedSource<String>,
        #[label("Expected {expected}, but found this")]
        span: SourceSpan,
        expected: String,
    },

    #[error("Unexpected end of file")]
    #[diagnostic(
        code(parser::unexpected_eof),
        help("The file ended unexpectedly. The parser expected more tokens.")
    )]
    UnexpectedEof {
        #[source_code]
        src: NamedSource<String>,
        #[label("File ended unexpectedly here")]
        span: SourceSpan,
    },

    #[error("Missing expected token")]
    #[diagnostic(
        code(parser::missing_expected_token),
        help("The parser expected a specific token that was not found.")
    )]
    MissingExpectedToken {
        #[source_code]
        src: NamedSource<String>,
        #[label("Expected {expected} here")]
        span: SourceSpan,
        expected: String,
    },
}

impl ParserError {
    /// The source span the error points at, for callers that want to map it
    /// to a line and column themselves.
    pub fn span(&self) -> SourceSpan {
        match self {
            ParserError::UnexpectedToken { span, .. }
            | ParserError::UnexpectedEof { span, .. }
            | ParserError::MissingExpectedToken { span, .. } => *span,
        }
    }
}

/// Semantic errors raised while reducing a parse tree to a document.
/// Any of these aborts the whole transformation.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum TransformError {
    #[error("Undefined constant: {name}")]
    #[diagnostic(
        code(transform::undefined_constant),
        help("A constant must be declared with `(define NAME value)` before it is referenced.")
    )]
    UndefinedConstant {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("No preceding definition for `{name}`")]
        span: SourceSpan,
    },

    #[error("Integer literal out of range: {literal}")]
    #[diagnostic(
        code(transform::integer_overflow),
        help("Integer values must fit in a signed 64-bit integer.")
    )]
    IntegerOverflow {
        literal: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("Does not fit in an i64")]
        span: SourceSpan,
    },
}

impl TransformError {
    pub fn span(&self) -> SourceSpan {
        match self {
            TransformError::UndefinedConstant { span, .. }
            | TransformError::IntegerOverflow { span, .. } => *span,
        }
    }
}
