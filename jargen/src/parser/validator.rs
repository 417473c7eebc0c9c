//! Structural checks run on the token lines before the grammar-driven parse.
//!
//! These catch malformed control headers (wrong arity, wrong operand kinds),
//! empty bodies and out-of-range `line` references with a line/column,
//! which the parser alone would only report as a token index.

use tracing::debug;

use super::grammar::{Bracket, Construct, Delimiter, Operator, ParamClass};
use super::token::{Token, TokenKind, TokenLines};
use crate::error::{LexError, LexErrorKind};

/// Checks the whole program and hands the lines back untouched on success.
pub fn validate(lines: TokenLines) -> Result<TokenLines, LexError> {
    let tokens: Vec<Token> = lines
        .iter()
        .flat_map(|line| line.tokens.iter().cloned())
        .collect();

    let validator = Validator {
        tokens: &tokens,
        line_count: lines.len(),
    };
    if let Err(err) = validator.run() {
        debug!(at = %err.span, kind = %err.kind, "lexical validation rejected program");
        return Err(err);
    }
    Ok(lines)
}

/// Finds the `}` closing the block opened at `start`.
///
/// Returns the index of the closing brace and whether anything other than
/// braces sits between the two. `start` must point at a `{`.
pub fn find_matching_brace(stream: &[Token], start: usize) -> Result<(usize, bool), LexError> {
    let open = &stream[start];
    let mut depth = 0usize;
    let mut non_empty = false;

    for (index, token) in stream.iter().enumerate().skip(start) {
        match token.kind {
            TokenKind::Bracket(Bracket::OpenBrace) => depth += 1,
            TokenKind::Bracket(Bracket::CloseBrace) => {
                depth -= 1;
                if depth == 0 {
                    return Ok((index, non_empty));
                }
            }
            _ => non_empty = true,
        }
    }

    Err(LexError::new(LexErrorKind::MissingCloseBrace, open.span))
}

struct Validator<'a> {
    tokens: &'a [Token],
    line_count: usize,
}

impl Validator<'_> {
    fn run(&self) -> Result<(), LexError> {
        for (index, token) in self.tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Keyword => {
                    if let Some(construct) = Construct::from_keyword(&token.lexeme) {
                        self.check_construct(index, construct)?;
                    } else if token.lexeme == "else" {
                        self.check_else(index)?;
                    }
                }
                TokenKind::ReservedWord if token.lexeme == "trend" => self.check_trend(index)?,
                TokenKind::Function => self.check_function(index)?,
                TokenKind::Identifier if token.lexeme == "line" && self.is_assign(index + 1) => {
                    self.check_line(index)?
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn check_construct(&self, index: usize, construct: Construct) -> Result<(), LexError> {
        let (params, close) = self.header_params(index)?;
        let keyword = construct.keyword();

        // spill(...) and post(...) only need balanced parentheses.
        if let Some(shape) = construct.shape() {
            self.check_params(index, keyword, &params, shape)?;
        }
        if construct.requires_block() {
            self.check_block(close, keyword)?;
        }
        Ok(())
    }

    fn check_params(
        &self,
        index: usize,
        keyword: &str,
        params: &[&Token],
        shape: &[ParamClass],
    ) -> Result<(), LexError> {
        if params.is_empty() {
            return Err(self.error(
                index,
                LexErrorKind::MissingParameters {
                    keyword: keyword.to_string(),
                },
            ));
        }
        if params.len() != shape.len() {
            return Err(self.error(
                index,
                LexErrorKind::InvalidParameterCount {
                    keyword: keyword.to_string(),
                    expected: shape.len(),
                    found: params.len(),
                },
            ));
        }

        for (param, class) in params.iter().zip(shape) {
            if !class.accepts(&param.kind) {
                let kind = match class {
                    ParamClass::Semicolon => LexErrorKind::MissingSemicolon {
                        keyword: keyword.to_string(),
                        lexeme: param.lexeme.clone(),
                    },
                    _ => LexErrorKind::InvalidParameter {
                        keyword: keyword.to_string(),
                        lexeme: param.lexeme.clone(),
                        expected: class.describe(),
                    },
                };
                return Err(LexError::new(kind, param.span));
            }
        }
        Ok(())
    }

    fn check_else(&self, index: usize) -> Result<(), LexError> {
        match self.tokens.get(index + 1) {
            // else-if: the `sus` header is checked on its own.
            Some(next) if next.is_word("sus") => Ok(()),
            Some(_) => self.check_block(index, "else"),
            None => Err(self.error(
                index,
                LexErrorKind::ExpectedBlock {
                    after: "else".to_string(),
                },
            )),
        }
    }

    fn check_trend(&self, index: usize) -> Result<(), LexError> {
        match self.tokens.get(index + 1) {
            Some(next) if next.kind == TokenKind::Function => Ok(()),
            _ => Err(self.error(index, LexErrorKind::ExpectedFunctionName)),
        }
    }

    fn check_function(&self, index: usize) -> Result<(), LexError> {
        let name = &self.tokens[index].lexeme;
        let (params, close) = self.header_params(index)?;

        if let Some(bad) = params.iter().find(|param| {
            !matches!(
                param.kind,
                TokenKind::Identifier
                    | TokenKind::Delimiter(Delimiter::Comma)
                    | TokenKind::ReservedWord
                    | TokenKind::Integer
                    | TokenKind::FloatNumber
            )
        }) {
            return Err(LexError::new(
                LexErrorKind::InvalidFunctionParameter {
                    function: name.clone(),
                    lexeme: bad.lexeme.clone(),
                },
                bad.span,
            ));
        }

        let is_definition = index > 0 && self.tokens[index - 1].is_word("trend");
        if is_definition {
            self.check_block(close, name)?;
        }
        Ok(())
    }

    fn check_line(&self, index: usize) -> Result<(), LexError> {
        let line = self.tokens[index].span.line;
        match self.tokens.get(index + 2) {
            Some(open) if open.is_bracket(Bracket::OpenBracket) => {}
            _ => return Err(self.error(index + 1, LexErrorKind::ExpectedOpenBracket)),
        }

        for entry in self.tokens[index + 3..].iter().take_while(|t| t.span.line == line) {
            match entry.kind {
                TokenKind::Bracket(Bracket::CloseBracket) => return Ok(()),
                TokenKind::Delimiter(Delimiter::Comma) => {}
                TokenKind::Integer => {
                    let in_range = entry
                        .lexeme
                        .parse::<usize>()
                        .is_ok_and(|value| (1..=self.line_count).contains(&value));
                    if !in_range {
                        return Err(LexError::new(
                            LexErrorKind::LineOutOfRange {
                                value: entry.lexeme.clone(),
                                max: self.line_count,
                            },
                            entry.span,
                        ));
                    }
                }
                _ => {
                    return Err(LexError::new(
                        LexErrorKind::InvalidLineEntry(entry.lexeme.clone()),
                        entry.span,
                    ));
                }
            }
        }
        Err(self.error(index + 2, LexErrorKind::MissingCloseBracket))
    }

    /// Collects the tokens between the `(` following `index` and the first
    /// `)` on the same line.
    fn header_params(&self, index: usize) -> Result<(Vec<&Token>, usize), LexError> {
        let head = &self.tokens[index];
        match self.tokens.get(index + 1) {
            Some(open) if open.is_bracket(Bracket::OpenParen) => {}
            _ => {
                return Err(self.error(
                    index,
                    LexErrorKind::ExpectedOpenParen {
                        keyword: head.lexeme.clone(),
                    },
                ));
            }
        }

        let mut params = Vec::new();
        for (offset, token) in self.tokens[index + 2..].iter().enumerate() {
            if token.span.line != head.span.line {
                break;
            }
            if token.is_bracket(Bracket::CloseParen) {
                return Ok((params, index + 2 + offset));
            }
            params.push(token);
        }

        Err(self.error(
            index,
            LexErrorKind::MissingCloseParen {
                keyword: head.lexeme.clone(),
            },
        ))
    }

    /// Requires a non-empty `{ ... }` block right after `index`.
    fn check_block(&self, index: usize, after: &str) -> Result<(), LexError> {
        let open = index + 1;
        match self.tokens.get(open) {
            Some(token) if token.is_bracket(Bracket::OpenBrace) => {}
            _ => {
                return Err(self.error(
                    index,
                    LexErrorKind::ExpectedBlock {
                        after: after.to_string(),
                    },
                ));
            }
        }

        let (_, non_empty) = find_matching_brace(self.tokens, open)?;
        if !non_empty {
            return Err(self.error(
                open,
                LexErrorKind::EmptyBlock {
                    after: after.to_string(),
                },
            ));
        }
        Ok(())
    }

    fn is_assign(&self, index: usize) -> bool {
        self.tokens
            .get(index)
            .is_some_and(|t| t.operator() == Some(Operator::Assign))
    }

    fn error(&self, index: usize, kind: LexErrorKind) -> LexError {
        LexError::new(kind, self.tokens[index].span)
    }
}
