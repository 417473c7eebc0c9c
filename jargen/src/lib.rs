//! Front end for the JARGEN scripting language: a lexer, a lexical
//! validator and a recursive-descent parser producing a parse tree.

pub mod diagnostics;
pub mod error;
pub mod ir;
pub mod parser;
pub mod span;

pub use error::{JargenError, LexError, LexErrorKind, SyntaxError};
pub use ir::{NodeType, ParseTreeNode};
pub use parser::{Analysis, ParseOutcome, TokenStream, analyze, flatten, lex, parse, tokenize, validate};
