//! Parser for module definition files

mod args;
pub mod ast;
mod indent;
pub mod lexer;
mod scanner;

pub(crate) use args::{closing_paren, split_arguments};
pub use ast::*;
pub use indent::{minimum_indent, normalize_indentation};
pub use scanner::{parse_module, source_lines, SourceLine};
