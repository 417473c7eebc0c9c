use std::fmt;

use super::grammar::{Bracket, Delimiter, Operator};
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Integer,
    FloatNumber,
    String,
    Identifier,
    /// A word immediately followed by `(`: a call or definition name
    Function,
    Keyword,
    ReservedWord,
    Operator(Operator),
    Bracket(Bracket),
    Delimiter(Delimiter),
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::FloatNumber => "Float Number",
            Self::String => "String",
            Self::Identifier => "Identifier",
            Self::Function => "Function",
            Self::Keyword => "Keyword",
            Self::ReservedWord => "Reserved Word",
            Self::Operator(op) => op.name(),
            Self::Bracket(bracket) => bracket.name(),
            Self::Delimiter(delimiter) => delimiter.name(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// True for a keyword or reserved word spelled `word`.
    pub fn is_word(&self, word: &str) -> bool {
        matches!(self.kind, TokenKind::Keyword | TokenKind::ReservedWord) && self.lexeme == word
    }

    pub fn is_bracket(&self, bracket: Bracket) -> bool {
        self.kind == TokenKind::Bracket(bracket)
    }

    pub fn is_delimiter(&self, delimiter: Delimiter) -> bool {
        self.kind == TokenKind::Delimiter(delimiter)
    }

    pub fn operator(&self) -> Option<Operator> {
        match self.kind {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.kind, self.lexeme)
    }
}

/// Tokens of one physical source line. Lines without tokens are kept so
/// that the list length equals the source line count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLine {
    pub line: usize,
    pub tokens: Vec<Token>,
}

pub type TokenLines = Vec<TokenLine>;

/// Flat token sequence with a read cursor. Only `advance` moves the cursor.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Concatenates the lines in order, dropping the line structure.
    pub fn from_lines(lines: TokenLines) -> Self {
        Self::new(lines.into_iter().flat_map(|line| line.tokens).collect())
    }

    pub fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.position + offset)
    }

    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, Span::default())
    }

    #[test]
    fn kind_names_follow_symbol_tables() {
        assert_eq!(TokenKind::FloatNumber.name(), "Float Number");
        assert_eq!(
            TokenKind::Operator(Operator::GreaterEqual).to_string(),
            "Greater Than or Equal To Operator"
        );
        assert_eq!(TokenKind::Delimiter(Delimiter::Semicolon).name(), "Semi-colon");
    }

    #[test]
    fn cursor_stops_at_end() {
        let mut stream = TokenStream::new(vec![
            token(TokenKind::Identifier, "x"),
            token(TokenKind::Operator(Operator::Increment), "++"),
        ]);
        assert_eq!(stream.current().map(|t| t.lexeme.as_str()), Some("x"));
        assert_eq!(stream.peek(1).map(|t| t.lexeme.as_str()), Some("++"));
        stream.advance();
        stream.advance();
        assert!(stream.current().is_none());
        assert!(stream.is_at_end());
        assert!(stream.advance().is_none());
        assert_eq!(stream.position(), 2);
    }

    #[test]
    fn flattening_keeps_order() {
        let lines = vec![
            TokenLine {
                line: 1,
                tokens: vec![token(TokenKind::Keyword, "flex")],
            },
            TokenLine {
                line: 2,
                tokens: vec![],
            },
            TokenLine {
                line: 3,
                tokens: vec![token(TokenKind::Identifier, "x")],
            },
        ];
        let stream = TokenStream::from_lines(lines);
        let lexemes: Vec<_> = stream.tokens().iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, ["flex", "x"]);
    }

    #[test]
    fn word_matching_ignores_identifiers() {
        assert!(token(TokenKind::ReservedWord, "num").is_word("num"));
        assert!(!token(TokenKind::Identifier, "line").is_word("line"));
    }
}
