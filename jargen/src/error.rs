use thiserror::Error;

use crate::span::Span;

/// What went wrong during tokenizing or lexical validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    #[error("input content is empty")]
    EmptyInput,

    #[error("invalid number format")]
    InvalidNumber,

    #[error("invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("invalid operator '{0}'")]
    InvalidOperator(char),

    #[error("unclosed string literal")]
    UnclosedString,

    #[error("expected '(' after '{keyword}'")]
    ExpectedOpenParen { keyword: String },

    #[error("missing closing parenthesis after '{keyword}'")]
    MissingCloseParen { keyword: String },

    #[error("missing parameters for '{keyword}'")]
    MissingParameters { keyword: String },

    #[error("invalid parameters inside parentheses for '{keyword}': expected {expected}, found {found}")]
    InvalidParameterCount {
        keyword: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid parameter '{lexeme}' in '{keyword}': expected {expected}")]
    InvalidParameter {
        keyword: String,
        lexeme: String,
        expected: &'static str,
    },

    #[error("missing semi-colon in '{keyword}', found '{lexeme}'")]
    MissingSemicolon { keyword: String, lexeme: String },

    #[error("expected '{{' after '{after}'")]
    ExpectedBlock { after: String },

    #[error("missing closing brace for block")]
    MissingCloseBrace,

    #[error("empty block after '{after}'")]
    EmptyBlock { after: String },

    #[error("expected a function name after 'trend'")]
    ExpectedFunctionName,

    #[error("invalid parameter '{lexeme}' in function '{function}'")]
    InvalidFunctionParameter { function: String, lexeme: String },

    #[error("expected '[' after 'line ='")]
    ExpectedOpenBracket,

    #[error("missing closing ']' in 'line' list")]
    MissingCloseBracket,

    #[error("invalid token '{0}' in 'line' list, expected integers separated by commas")]
    InvalidLineEntry(String),

    #[error("out-of-range line number {value}, max lines = {max}")]
    LineOutOfRange { value: String, max: usize },
}

/// A character-level or validator-level defect. Any of these aborts the
/// whole lex stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {}, column {}", .span.line, .span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }
}

/// A production-level mismatch found by the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[Syntax Error @ token index {index}]: {message}")]
pub struct SyntaxError {
    pub index: usize,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum JargenError {
    #[error("lexical analysis failed: {0}")]
    Lex(#[from] LexError),

    #[error("syntax analysis failed with {} error(s)", .errors.len())]
    Syntax { errors: Vec<SyntaxError> },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
