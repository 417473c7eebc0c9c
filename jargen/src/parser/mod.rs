pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod validator;

use tracing::debug;

use crate::error::{JargenError, LexError};
use crate::ir::ParseTreeNode;

pub use lexer::tokenize;
pub use parser::{ParseOutcome, parse};
pub use token::{Token, TokenKind, TokenLine, TokenLines, TokenStream};
pub use validator::{find_matching_brace, validate};

/// A program that made it through every stage.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub lines: TokenLines,
    pub tree: ParseTreeNode,
}

/// Tokenizes and validates. Either stage failing discards the tokens.
pub fn lex(source: &str) -> Result<TokenLines, LexError> {
    let lines = tokenize(source)?;
    validate(lines)
}

pub fn flatten(lines: TokenLines) -> TokenStream {
    TokenStream::from_lines(lines)
}

/// Runs the whole front end: text to token lines to parse tree.
pub fn analyze(source: &str) -> Result<Analysis, JargenError> {
    let lines = lex(source)?;
    let outcome = parse(flatten(lines.clone()));

    if !outcome.is_success() {
        debug!(errors = outcome.error_count, "syntax analysis failed");
        return Err(JargenError::Syntax {
            errors: outcome.errors,
        });
    }
    Ok(Analysis {
        lines,
        tree: outcome.tree,
    })
}
