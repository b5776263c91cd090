pub mod api;
pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod transform;
pub mod utils;
pub mod value;

pub use api::{analyze, AnalysisResult};
