use tracing::{debug, warn};

use super::grammar::{Bracket, Construct, DECLARATION_WORDS, Delimiter, Operator};
use super::token::{Token, TokenKind, TokenStream};
use crate::error::SyntaxError;
use crate::ir::{NodeType, ParseTreeNode};

/// Result of a parse pass. The tree is always present; it is only
/// trustworthy when `error_count` is zero.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub tree: ParseTreeNode,
    pub error_count: usize,
    pub errors: Vec<SyntaxError>,
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        self.error_count == 0
    }
}

/// Builds a `PROGRAM` tree from a flat token stream. Never fails outright:
/// mismatches are counted and the statement list stops at the first one.
pub fn parse(tokens: TokenStream) -> ParseOutcome {
    let mut parser = Parser::new(tokens);
    let tree = parser.parse_program();
    debug!(
        nodes = tree.node_count(),
        errors = parser.errors.len(),
        "parsed token stream"
    );
    ParseOutcome {
        tree,
        error_count: parser.errors.len(),
        errors: parser.errors,
    }
}

/// Deepest run of nested blocks, brackets and parentheses the parser
/// descends into before giving up on the program.
pub const MAX_NESTING: usize = 128;

struct Parser {
    stream: TokenStream,
    errors: Vec<SyntaxError>,
    depth: usize,
}

impl Parser {
    fn new(stream: TokenStream) -> Self {
        Self {
            stream,
            errors: Vec::new(),
            depth: 0,
        }
    }

    fn parse_program(&mut self) -> ParseTreeNode {
        let errors_before = self.errors.len();
        let list = self.parse_statement_list();

        if self.errors.len() == errors_before {
            if list.children().is_empty() {
                self.report_error("Empty program or invalid statements.");
            } else if let Some(token) = self.stream.current() {
                let message = format!("Unexpected token {token} after last statement");
                self.report_error(message);
            }
        }

        ParseTreeNode::new(NodeType::Program).with_child(list)
    }

    fn parse_statement_list(&mut self) -> ParseTreeNode {
        let mut node = ParseTreeNode::new(NodeType::StatementList);
        while self.can_start_statement() {
            match self.parse_statement() {
                Some(statement) => node.add_child(statement),
                None => break,
            }
        }
        node
    }

    fn can_start_statement(&self) -> bool {
        let Some(token) = self.stream.current() else {
            return false;
        };
        match token.kind {
            TokenKind::Keyword | TokenKind::ReservedWord => {
                DECLARATION_WORDS.contains(&token.lexeme.as_str())
                    || Construct::from_keyword(&token.lexeme).is_some()
                    || matches!(token.lexeme.as_str(), "trend" | "reply")
            }
            TokenKind::Identifier | TokenKind::Function => true,
            TokenKind::Bracket(Bracket::OpenBrace) => true,
            _ => false,
        }
    }

    fn parse_statement(&mut self) -> Option<ParseTreeNode> {
        let token = self.stream.current()?.clone();

        let statement = match token.kind {
            TokenKind::Keyword | TokenKind::ReservedWord => {
                if DECLARATION_WORDS.contains(&token.lexeme.as_str()) {
                    self.parse_declaration()
                } else if let Some(construct) = Construct::from_keyword(&token.lexeme) {
                    match construct {
                        Construct::If => return self.parse_if_chain(),
                        Construct::For => return self.parse_for_stmt(),
                        Construct::While => {
                            return self.parse_guarded(construct, NodeType::WhileStmt);
                        }
                        Construct::Switch => {
                            return self.parse_guarded(construct, NodeType::SwitchStmt);
                        }
                        Construct::Print => self.parse_print_stmt(),
                        Construct::Input => self.parse_input_stmt(),
                    }
                } else if token.lexeme == "trend" {
                    return self.parse_function_definition();
                } else if token.lexeme == "reply" {
                    self.parse_return_stmt()
                } else {
                    self.report_error(format!("Unrecognized statement start: {token}"));
                    None
                }
            }
            TokenKind::Function => self.parse_function_call(),
            TokenKind::Identifier if token.lexeme == "line" && self.peek_is_assign(1) => {
                self.parse_line_stmt()
            }
            TokenKind::Identifier => self.parse_assignment_or_expr(),
            TokenKind::Bracket(Bracket::OpenBrace) => return self.parse_block(),
            _ => {
                self.report_error(format!("Unrecognized statement start: {token}"));
                None
            }
        }?;

        // Simple statements may carry a trailing semicolon.
        self.skip_delimiter(Delimiter::Semicolon);
        Some(statement)
    }

    // Declarations: flex age = 21

    fn parse_declaration(&mut self) -> Option<ParseTreeNode> {
        let keyword = self.stream.advance()?.lexeme.clone();
        let mut node = ParseTreeNode::with_value(NodeType::Declaration, keyword);

        let ident = self.expect_kind(TokenKind::Identifier)?;
        let ident_node = ParseTreeNode::with_value(NodeType::Identifier, ident.lexeme);

        match self.current_operator() {
            Some(op) if op.is_assignment() => {
                self.stream.advance();
                let value = self.parse_expression()?;
                node.add_child(
                    ParseTreeNode::with_value(NodeType::AssignOp, op.symbol())
                        .with_child(ident_node)
                        .with_child(value),
                );
            }
            _ => node.add_child(ident_node),
        }
        Some(node)
    }

    // If chains: sus (...) { } else sus (...) { } else { }

    fn parse_if_chain(&mut self) -> Option<ParseTreeNode> {
        let mut chain = ParseTreeNode::new(NodeType::IfChain);
        chain.add_child(self.parse_if_block(NodeType::IfBlock)?);

        while self.check_word("else") {
            self.stream.advance();
            if self.check_word("sus") {
                chain.add_child(self.parse_if_block(NodeType::ElseIfBlock)?);
            } else {
                // A plain else closes the chain.
                chain.add_child(self.parse_else_block()?);
                break;
            }
        }
        Some(chain)
    }

    fn parse_if_block(&mut self, node_type: NodeType) -> Option<ParseTreeNode> {
        let condition = self.parse_condition_header(Construct::If)?;
        let block = self.parse_block()?;
        Some(
            ParseTreeNode::new(node_type)
                .with_child(condition)
                .with_child(block),
        )
    }

    fn parse_else_block(&mut self) -> Option<ParseTreeNode> {
        let list = self.parse_braced_list()?;
        Some(ParseTreeNode::new(NodeType::ElseBlock).with_child(list))
    }

    // Loops and switch

    fn parse_for_stmt(&mut self) -> Option<ParseTreeNode> {
        let mut node = ParseTreeNode::new(NodeType::ForStmt);
        self.expect_word(Construct::For.keyword())?;
        self.expect_bracket(Bracket::OpenParen)?;

        node.add_child(self.parse_expression()?);
        self.expect_delimiter(Delimiter::Semicolon)?;
        node.add_child(self.parse_expression()?);
        self.expect_delimiter(Delimiter::Semicolon)?;
        node.add_child(self.parse_expression()?);

        self.expect_bracket(Bracket::CloseParen)?;
        node.add_child(self.parse_block()?);
        Some(node)
    }

    /// `talk (expr) { ... }` and `mood (expr) { ... }`.
    fn parse_guarded(&mut self, construct: Construct, node_type: NodeType) -> Option<ParseTreeNode> {
        let condition = self.parse_condition_header(construct)?;
        let block = self.parse_block()?;
        Some(
            ParseTreeNode::new(node_type)
                .with_child(condition)
                .with_child(block),
        )
    }

    /// `keyword ( expr )`, returning the expression.
    fn parse_condition_header(&mut self, construct: Construct) -> Option<ParseTreeNode> {
        self.expect_word(construct.keyword())?;
        self.expect_bracket(Bracket::OpenParen)?;
        let expr = self.parse_expression()?;
        self.expect_bracket(Bracket::CloseParen)?;
        Some(expr)
    }

    // Input / output

    fn parse_print_stmt(&mut self) -> Option<ParseTreeNode> {
        let expr = self.parse_condition_header(Construct::Print)?;
        Some(ParseTreeNode::new(NodeType::PrintStmt).with_child(expr))
    }

    fn parse_input_stmt(&mut self) -> Option<ParseTreeNode> {
        self.expect_word(Construct::Input.keyword())?;
        self.expect_bracket(Bracket::OpenParen)?;
        let ident = self.expect_kind(TokenKind::Identifier)?;
        self.expect_bracket(Bracket::CloseParen)?;
        Some(
            ParseTreeNode::new(NodeType::InputStmt)
                .with_child(ParseTreeNode::with_value(NodeType::Identifier, ident.lexeme)),
        )
    }

    // Functions

    fn parse_function_definition(&mut self) -> Option<ParseTreeNode> {
        self.expect_word("trend")?;
        let name = self.expect_kind(TokenKind::Function)?;
        self.expect_bracket(Bracket::OpenParen)?;
        let params = self.parse_param_list()?;
        self.expect_bracket(Bracket::CloseParen)?;
        let block = self.parse_block()?;

        Some(
            ParseTreeNode::with_value(NodeType::FunctionDef, name.lexeme)
                .with_child(params)
                .with_child(block),
        )
    }

    fn parse_param_list(&mut self) -> Option<ParseTreeNode> {
        let mut params = ParseTreeNode::new(NodeType::ParamList);

        while let Some(token) = self.stream.current() {
            if token.is_bracket(Bracket::CloseParen) {
                break;
            }
            if !matches!(token.kind, TokenKind::Keyword | TokenKind::ReservedWord) {
                let message = format!("Parameter type must be a keyword (e.g. num), got {token}");
                self.report_error(message);
                return None;
            }
            let type_name = self.stream.advance()?.lexeme.clone();
            let ident = self.expect_kind(TokenKind::Identifier)?;

            params.add_child(
                ParseTreeNode::new(NodeType::Param)
                    .with_child(ParseTreeNode::with_value(NodeType::Type, type_name))
                    .with_child(ParseTreeNode::with_value(NodeType::Identifier, ident.lexeme)),
            );

            if !self.skip_delimiter(Delimiter::Comma) {
                break;
            }
        }
        Some(params)
    }

    fn parse_function_call(&mut self) -> Option<ParseTreeNode> {
        let name = self.expect_kind(TokenKind::Function)?;
        let mut node = ParseTreeNode::with_value(NodeType::FunctionCall, name.lexeme);
        self.expect_bracket(Bracket::OpenParen)?;

        if !self.check_bracket(Bracket::CloseParen) {
            loop {
                node.add_child(self.parse_expression()?);
                if !self.skip_delimiter(Delimiter::Comma) {
                    break;
                }
            }
        }
        self.expect_bracket(Bracket::CloseParen)?;
        Some(node)
    }

    fn parse_return_stmt(&mut self) -> Option<ParseTreeNode> {
        self.expect_word("reply")?;
        let expr = self.parse_expression()?;
        Some(ParseTreeNode::new(NodeType::ReturnStmt).with_child(expr))
    }

    // line = [1, 2, 3]

    fn parse_line_stmt(&mut self) -> Option<ParseTreeNode> {
        let mut node = ParseTreeNode::new(NodeType::LineStmt);
        self.stream.advance();
        self.expect_operator(Operator::Assign)?;
        self.expect_bracket(Bracket::OpenBracket)?;

        if !self.check_bracket(Bracket::CloseBracket) {
            loop {
                let number = self.expect_kind(TokenKind::Integer)?;
                node.add_child(ParseTreeNode::with_value(NodeType::Integer, number.lexeme));
                if !self.skip_delimiter(Delimiter::Comma) {
                    break;
                }
            }
        }
        self.expect_bracket(Bracket::CloseBracket)?;
        Some(node)
    }

    // Blocks

    fn parse_block(&mut self) -> Option<ParseTreeNode> {
        let list = self.parse_braced_list()?;
        Some(ParseTreeNode::new(NodeType::Block).with_child(list))
    }

    fn parse_braced_list(&mut self) -> Option<ParseTreeNode> {
        self.nested(Self::parse_braced_body)
    }

    fn parse_braced_body(&mut self) -> Option<ParseTreeNode> {
        self.expect_bracket(Bracket::OpenBrace)?;
        let errors_before = self.errors.len();
        let list = self.parse_statement_list();
        if self.errors.len() != errors_before {
            return None;
        }
        self.expect_bracket(Bracket::CloseBrace)?;
        Some(list)
    }

    // Assignment or expression statement: x = ..., x++, x

    fn parse_assignment_or_expr(&mut self) -> Option<ParseTreeNode> {
        let ident = self.expect_kind(TokenKind::Identifier)?;
        let ident_node = ParseTreeNode::with_value(NodeType::Identifier, ident.lexeme);
        let node = ParseTreeNode::new(NodeType::ExprStmt);

        let inner = match self.current_operator() {
            Some(op) if op.is_assignment() => {
                self.stream.advance();
                let value = if self.check_bracket(Bracket::OpenBracket) {
                    self.parse_array_literal()?
                } else {
                    self.parse_expression()?
                };
                ParseTreeNode::with_value(NodeType::AssignmentOp, op.symbol())
                    .with_child(ident_node)
                    .with_child(value)
            }
            Some(op) if op.is_inc_dec() => {
                self.stream.advance();
                ParseTreeNode::with_value(NodeType::IncDecOp, op.symbol()).with_child(ident_node)
            }
            _ => ParseTreeNode::new(NodeType::Expr).with_child(ident_node),
        };
        Some(node.with_child(inner))
    }

    fn parse_array_literal(&mut self) -> Option<ParseTreeNode> {
        self.nested(Self::parse_array_body)
    }

    fn parse_array_body(&mut self) -> Option<ParseTreeNode> {
        let mut node = ParseTreeNode::new(NodeType::ArrayLiteral);
        self.expect_bracket(Bracket::OpenBracket)?;

        if !self.check_bracket(Bracket::CloseBracket) {
            loop {
                let is_call = self
                    .stream
                    .current()
                    .is_some_and(|token| token.kind == TokenKind::Function);
                let element = if is_call {
                    self.parse_function_call()?
                } else {
                    self.parse_expression()?
                };
                node.add_child(element);
                if !self.skip_delimiter(Delimiter::Comma) {
                    break;
                }
            }
        }
        self.expect_bracket(Bracket::CloseBracket)?;
        Some(node)
    }

    // Expressions: a flat left-associative chain, every operator at the
    // same strength, so `a + b * c` is `(a + b) * c`.

    fn parse_expression(&mut self) -> Option<ParseTreeNode> {
        let mut left = self.parse_primary()?;

        while let Some(op) = self.current_operator().filter(|op| op.is_binary()) {
            self.stream.advance();
            let right = self.parse_primary()?;
            left = ParseTreeNode::with_value(NodeType::BinaryOp, op.symbol())
                .with_child(left)
                .with_child(right);
        }
        Some(left)
    }

    fn parse_primary(&mut self) -> Option<ParseTreeNode> {
        let Some(token) = self.stream.current().cloned() else {
            self.report_error("Unexpected end of tokens in expression");
            return None;
        };

        let node_type = match token.kind {
            TokenKind::Bracket(Bracket::OpenParen) => {
                return self.nested(|parser| {
                    parser.stream.advance();
                    let inner = parser.parse_expression()?;
                    parser.expect_bracket(Bracket::CloseParen)?;
                    Some(inner)
                });
            }
            TokenKind::Bracket(Bracket::OpenBracket) => return self.parse_array_literal(),
            TokenKind::Integer => NodeType::Integer,
            TokenKind::FloatNumber => NodeType::FloatNumber,
            TokenKind::String => NodeType::String,
            TokenKind::Identifier => NodeType::Identifier,
            _ => {
                self.report_error(format!("Invalid expression token: {token}"));
                return None;
            }
        };
        self.stream.advance();
        let literal = ParseTreeNode::with_value(node_type, token.lexeme);

        match self.current_operator() {
            Some(op) if op.is_inc_dec() => {
                self.stream.advance();
                Some(ParseTreeNode::with_value(NodeType::PostfixOp, op.symbol()).with_child(literal))
            }
            _ => Some(literal),
        }
    }

    // Helpers

    /// Runs `production` one nesting level deeper. Past [`MAX_NESTING`]
    /// levels it reports an error instead.
    fn nested(
        &mut self,
        production: impl FnOnce(&mut Self) -> Option<ParseTreeNode>,
    ) -> Option<ParseTreeNode> {
        if self.depth >= MAX_NESTING {
            let message = format!("Nesting too deep (more than {MAX_NESTING} levels)");
            self.report_error(message);
            return None;
        }
        self.depth += 1;
        let node = production(self);
        self.depth -= 1;
        node
    }

    fn report_error(&mut self, message: impl Into<String>) {
        let error = SyntaxError {
            index: self.stream.position(),
            message: message.into(),
        };
        warn!(index = error.index, "{}", error.message);
        self.errors.push(error);
    }

    /// Consumes the current token if `matches` accepts it; otherwise reports
    /// what was expected and returns `None`.
    fn expect(&mut self, expected: &str, matches: impl Fn(&Token) -> bool) -> Option<Token> {
        match self.stream.current() {
            Some(token) if matches(token) => {
                let token = token.clone();
                self.stream.advance();
                Some(token)
            }
            Some(token) => {
                let message = format!("Expected {expected}, got {token}");
                self.report_error(message);
                None
            }
            None => {
                self.report_error(format!("Unexpected end of tokens. Expected {expected}"));
                None
            }
        }
    }

    fn expect_kind(&mut self, kind: TokenKind) -> Option<Token> {
        self.expect(kind.name(), |token| token.kind == kind)
    }

    fn expect_word(&mut self, word: &str) -> Option<Token> {
        self.expect(&format!("'{word}'"), |token| token.is_word(word))
    }

    fn expect_bracket(&mut self, bracket: Bracket) -> Option<Token> {
        self.expect(&format!("'{}'", bracket.symbol()), |token| {
            token.is_bracket(bracket)
        })
    }

    fn expect_delimiter(&mut self, delimiter: Delimiter) -> Option<Token> {
        self.expect(&format!("'{}'", delimiter.symbol()), |token| {
            token.is_delimiter(delimiter)
        })
    }

    fn expect_operator(&mut self, op: Operator) -> Option<Token> {
        self.expect(&format!("'{}'", op.symbol()), |token| {
            token.operator() == Some(op)
        })
    }

    fn skip_delimiter(&mut self, delimiter: Delimiter) -> bool {
        let found = self
            .stream
            .current()
            .is_some_and(|token| token.is_delimiter(delimiter));
        if found {
            self.stream.advance();
        }
        found
    }

    fn check_word(&self, word: &str) -> bool {
        self.stream.current().is_some_and(|token| token.is_word(word))
    }

    fn check_bracket(&self, bracket: Bracket) -> bool {
        self.stream
            .current()
            .is_some_and(|token| token.is_bracket(bracket))
    }

    fn current_operator(&self) -> Option<Operator> {
        self.stream.current().and_then(Token::operator)
    }

    fn peek_is_assign(&self, offset: usize) -> bool {
        self.stream
            .peek(offset)
            .is_some_and(|token| token.operator() == Some(Operator::Assign))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn parse_source(source: &str) -> ParseOutcome {
        parse(TokenStream::from_lines(tokenize(source).unwrap()))
    }

    /// Statements directly under PROGRAM > STATEMENT_LIST.
    fn statements(outcome: &ParseOutcome) -> &[ParseTreeNode] {
        outcome.tree.children()[0].children()
    }

    fn shape(node: &ParseTreeNode) -> String {
        let head = match node.value() {
            Some(value) => format!("{}({value})", node.node_type()),
            None => node.node_type().to_string(),
        };
        if node.children().is_empty() {
            head
        } else {
            let children: Vec<String> = node.children().iter().map(shape).collect();
            format!("{head}[{}]", children.join(" "))
        }
    }

    #[test]
    fn declaration_with_initializer() {
        let outcome = parse_source("flex x = 10");
        assert!(outcome.is_success());
        assert_eq!(
            shape(&statements(&outcome)[0]),
            "DECLARATION(flex)[ASSIGN_OP(=)[IDENTIFIER(x) INTEGER(10)]]"
        );
    }

    #[test]
    fn declaration_without_initializer_and_num() {
        let outcome = parse_source("num count;\nbet h = 5.9");
        assert!(outcome.is_success());
        let stmts = statements(&outcome);
        assert_eq!(shape(&stmts[0]), "DECLARATION(num)[IDENTIFIER(count)]");
        assert_eq!(
            shape(&stmts[1]),
            "DECLARATION(bet)[ASSIGN_OP(=)[IDENTIFIER(h) FLOAT_NUMBER(5.9)]]"
        );
    }

    #[test]
    fn expressions_have_no_precedence() {
        let outcome = parse_source("x = a + b * c");
        assert_eq!(
            shape(&statements(&outcome)[0]),
            "EXPR_STMT[ASSIGNMENT_OP(=)[IDENTIFIER(x) \
             BINARY_OP(*)[BINARY_OP(+)[IDENTIFIER(a) IDENTIFIER(b)] IDENTIFIER(c)]]]"
        );
    }

    #[test]
    fn parentheses_group() {
        let outcome = parse_source("x = a + (b * c)");
        assert_eq!(
            shape(&statements(&outcome)[0]),
            "EXPR_STMT[ASSIGNMENT_OP(=)[IDENTIFIER(x) \
             BINARY_OP(+)[IDENTIFIER(a) BINARY_OP(*)[IDENTIFIER(b) IDENTIFIER(c)]]]]"
        );
    }

    #[test]
    fn if_chain_with_else_if_and_else() {
        let outcome = parse_source(
            "sus(x >= 90) { spill(\"A\"); }\n\
             else sus(x >= 80) { spill(\"B\") }\n\
             else { spill(\"C\") }\n\
             spill(x)",
        );
        assert!(outcome.is_success(), "{:?}", outcome.errors);
        let stmts = statements(&outcome);
        assert_eq!(stmts.len(), 2);

        let chain = &stmts[0];
        assert_eq!(chain.node_type(), NodeType::IfChain);
        let tags: Vec<NodeType> = chain.children().iter().map(ParseTreeNode::node_type).collect();
        assert_eq!(
            tags,
            [NodeType::IfBlock, NodeType::ElseIfBlock, NodeType::ElseBlock]
        );
        assert_eq!(
            shape(&chain.children()[0]),
            "IF_BLOCK[BINARY_OP(>=)[IDENTIFIER(x) INTEGER(90)] \
             BLOCK[STATEMENT_LIST[PRINT_STMT[STRING(\"A\")]]]]"
        );
    }

    #[test]
    fn plain_else_ends_the_chain() {
        let outcome = parse_source("sus(x > 1) { x++ } else { x-- } else { x++ }");
        assert!(!outcome.is_success());
        assert_eq!(statements(&outcome)[0].children().len(), 2);
    }

    #[test]
    fn for_loop() {
        let outcome = parse_source("forreal(i = 1; i <= 5; i++) {\n  spill(i)\n}");
        assert!(outcome.is_success(), "{:?}", outcome.errors);
        assert_eq!(
            shape(&statements(&outcome)[0]),
            "FOR_STMT[BINARY_OP(=)[IDENTIFIER(i) INTEGER(1)] \
             BINARY_OP(<=)[IDENTIFIER(i) INTEGER(5)] \
             POSTFIX_OP(++)[IDENTIFIER(i)] \
             BLOCK[STATEMENT_LIST[PRINT_STMT[IDENTIFIER(i)]]]]"
        );
    }

    #[test]
    fn while_switch_input() {
        let outcome = parse_source("talk(n != 0) { post(n) n-- }\nmood(n) { spill(n) }");
        assert!(outcome.is_success(), "{:?}", outcome.errors);
        let stmts = statements(&outcome);
        assert_eq!(
            shape(&stmts[0]),
            "WHILE_STMT[BINARY_OP(!=)[IDENTIFIER(n) INTEGER(0)] \
             BLOCK[STATEMENT_LIST[INPUT_STMT[IDENTIFIER(n)] EXPR_STMT[INCDEC_OP(--)[IDENTIFIER(n)]]]]]"
        );
        assert_eq!(stmts[1].node_type(), NodeType::SwitchStmt);
    }

    #[test]
    fn function_definition() {
        let outcome = parse_source("trend add(num a, num b) { reply a + b; }");
        assert!(outcome.is_success(), "{:?}", outcome.errors);
        assert_eq!(
            shape(&statements(&outcome)[0]),
            "FUNCTION_DEF(add)[PARAM_LIST[PARAM[TYPE(num) IDENTIFIER(a)] PARAM[TYPE(num) IDENTIFIER(b)]] \
             BLOCK[STATEMENT_LIST[RETURN_STMT[BINARY_OP(+)[IDENTIFIER(a) IDENTIFIER(b)]]]]]"
        );
    }

    #[test]
    fn calls_and_array_literals() {
        let outcome = parse_source("add(1, x)\nops = [add(1, 2), 3, [4]]\nline = [1, 2]");
        assert!(outcome.is_success(), "{:?}", outcome.errors);
        let stmts = statements(&outcome);
        assert_eq!(shape(&stmts[0]), "FUNCTION_CALL(add)[INTEGER(1) IDENTIFIER(x)]");
        assert_eq!(
            shape(&stmts[1]),
            "EXPR_STMT[ASSIGNMENT_OP(=)[IDENTIFIER(ops) \
             ARRAY_LITERAL[FUNCTION_CALL(add)[INTEGER(1) INTEGER(2)] INTEGER(3) ARRAY_LITERAL[INTEGER(4)]]]]"
        );
        assert_eq!(shape(&stmts[2]), "LINE_STMT[INTEGER(1) INTEGER(2)]");
    }

    #[test]
    fn bare_identifier_statement() {
        let outcome = parse_source("x");
        assert_eq!(shape(&statements(&outcome)[0]), "EXPR_STMT[EXPR[IDENTIFIER(x)]]");
    }

    #[test]
    fn first_error_stops_the_statement_list() {
        let outcome = parse_source("flex x = 1\nflex = 2\nflex y = 3");
        assert_eq!(outcome.error_count, 1);
        assert_eq!(statements(&outcome).len(), 1);
        assert_eq!(outcome.errors[0].index, 5);
        assert!(outcome.errors[0].message.contains("Expected Identifier"));
    }

    #[test]
    fn missing_close_brace_is_one_error() {
        let outcome = parse_source("talk(x > 1) { x++");
        assert_eq!(outcome.error_count, 1);
        assert!(outcome.errors[0].message.contains("Unexpected end of tokens"));
    }

    #[test]
    fn leftover_tokens_are_reported() {
        let outcome = parse_source("x++ }");
        assert_eq!(outcome.error_count, 1);
        assert!(outcome.errors[0].message.starts_with("Unexpected token"));
    }

    #[test]
    fn empty_program_is_reported() {
        let outcome = parse_source(";");
        assert_eq!(outcome.error_count, 1);
        assert!(outcome.errors[0].message.starts_with("Empty program"));
    }

    #[test]
    fn parameter_types_must_be_words() {
        let outcome = parse_source("trend f(a b) { reply a }");
        assert_eq!(outcome.error_count, 1);
        assert!(outcome.errors[0].message.contains("Parameter type"));
    }

    #[test]
    fn nesting_is_capped() {
        let shallow = format!("x = {}1{}", "(".repeat(100), ")".repeat(100));
        assert!(parse_source(&shallow).is_success());

        let deep = format!("x = {}1{}", "(".repeat(50_000), ")".repeat(50_000));
        let outcome = parse_source(&deep);
        assert_eq!(outcome.error_count, 1);
        assert!(outcome.errors[0].message.starts_with("Nesting too deep"));
        assert_eq!(outcome.errors[0].index, 2 + MAX_NESTING);

        let blocks = format!("{}x{}", "{ ".repeat(10_000), "} ".repeat(10_000));
        assert_eq!(parse_source(&blocks).error_count, 1);

        let arrays = format!("x = {}1{}", "[".repeat(10_000), "]".repeat(10_000));
        assert_eq!(parse_source(&arrays).error_count, 1);
    }

    #[test]
    fn bad_primary() {
        let outcome = parse_source("spill(;)");
        assert_eq!(outcome.error_count, 1);
        assert!(outcome.errors[0].message.starts_with("Invalid expression token"));
    }
}
