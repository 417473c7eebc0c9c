use tracing::{debug, trace};

use super::grammar::{self, Bracket, Delimiter, OPERATOR_START, Operator};
use super::token::{Token, TokenKind, TokenLine, TokenLines};
use crate::error::{LexError, LexErrorKind};
use crate::span::Span;

/// Splits `source` into lines and classifies every lexeme on them.
///
/// Stops at the first defect; no partial result is returned.
pub fn tokenize(source: &str) -> Result<TokenLines, LexError> {
    if source.trim().is_empty() {
        return Err(LexError::new(LexErrorKind::EmptyInput, Span::point(1, 1)));
    }

    let mut lines = Vec::new();
    for (index, text) in source.split('\n').enumerate() {
        let line = index + 1;
        let tokens = LineScanner::new(text, line).scan()?;
        lines.push(TokenLine { line, tokens });
    }

    debug!(
        lines = lines.len(),
        tokens = lines.iter().map(|l| l.tokens.len()).sum::<usize>(),
        "tokenized source"
    );
    Ok(lines)
}

struct LineScanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl LineScanner {
    fn new(text: &str, line: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line,
            tokens: Vec::new(),
        }
    }

    fn scan(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(ch) = self.peek(0) {
            let start = self.pos;
            if ch.is_ascii_digit() || (ch == '.' && self.peek(1).is_some_and(|c| c.is_ascii_digit())) {
                self.scan_number()?;
            } else if ch.is_alphanumeric() {
                self.scan_word();
            } else if ch == '"' || ch == '\'' {
                self.scan_string(ch)?;
            } else if OPERATOR_START.contains(&ch) {
                self.scan_operator(ch)?;
            } else if let Some(bracket) = Bracket::from_char(ch) {
                self.pos += 1;
                self.push(TokenKind::Bracket(bracket), start);
            } else if let Some(delimiter) = Delimiter::from_char(ch) {
                self.pos += 1;
                self.push(TokenKind::Delimiter(delimiter), start);
            } else if ch.is_whitespace() {
                self.pos += 1;
            } else {
                return Err(self.error(LexErrorKind::InvalidCharacter(ch), start));
            }
        }
        Ok(self.tokens)
    }

    fn scan_number(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let mut dots = 0;
        while let Some(ch) = self.peek(0) {
            match ch {
                '0'..='9' => {}
                '.' => {
                    dots += 1;
                    if dots > 1 {
                        return Err(self.error(LexErrorKind::InvalidNumber, self.pos));
                    }
                }
                _ => break,
            }
            self.pos += 1;
        }

        let kind = if dots > 0 {
            TokenKind::FloatNumber
        } else {
            TokenKind::Integer
        };
        self.push(kind, start);
        Ok(())
    }

    fn scan_word(&mut self) {
        let start = self.pos;
        while self.peek(0).is_some_and(char::is_alphanumeric) {
            self.pos += 1;
        }

        let word: String = self.chars[start..self.pos].iter().collect();
        let kind = if grammar::is_keyword(&word) {
            TokenKind::Keyword
        } else if grammar::is_reserved_word(&word) {
            TokenKind::ReservedWord
        } else if self.peek(0) == Some('(') {
            // Not consumed: the parenthesis becomes its own token.
            TokenKind::Function
        } else {
            TokenKind::Identifier
        };
        self.push(kind, start);
    }

    fn scan_string(&mut self, quote: char) -> Result<(), LexError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek(0) {
                Some(ch) => {
                    self.pos += 1;
                    if ch == quote {
                        break;
                    }
                }
                None => return Err(self.error(LexErrorKind::UnclosedString, start)),
            }
        }
        self.push(TokenKind::String, start);
        Ok(())
    }

    fn scan_operator(&mut self, ch: char) -> Result<(), LexError> {
        let start = self.pos;
        if let Some(next) = self.peek(1) {
            let pair: String = [ch, next].iter().collect();
            if let Some(op) = Operator::from_symbol(&pair) {
                self.pos += 2;
                self.push(TokenKind::Operator(op), start);
                return Ok(());
            }
        }

        let single = Operator::from_symbol(ch.encode_utf8(&mut [0; 4]))
            .ok_or_else(|| self.error(LexErrorKind::InvalidOperator(ch), start))?;
        self.pos += 1;
        self.push(TokenKind::Operator(single), start);
        Ok(())
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Emits the characters from `start` up to the cursor as one token.
    fn push(&mut self, kind: TokenKind, start: usize) {
        let lexeme: String = self.chars[start..self.pos].iter().collect();
        let span = Span::new(self.line, start + 1, self.pos - start);
        trace!(line = self.line, column = start + 1, %kind, lexeme = %lexeme, "token");
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    fn error(&self, kind: LexErrorKind, at: usize) -> LexError {
        LexError::new(kind, Span::point(self.line, at + 1))
    }
}
