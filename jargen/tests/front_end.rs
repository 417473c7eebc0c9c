//! End-to-end checks of the public pipeline: tokenize, validate, parse.

use jargen::parser::grammar::{OPERATORS, Operator};
use jargen::parser::TokenKind;
use jargen::{JargenError, LexErrorKind, NodeType, ParseTreeNode, analyze, flatten, lex, parse, tokenize};

fn program_statements(tree: &ParseTreeNode) -> &[ParseTreeNode] {
    tree.child(0).map(ParseTreeNode::children).unwrap_or(&[])
}

fn lex_kind(source: &str) -> LexErrorKind {
    match analyze(source) {
        Err(JargenError::Lex(err)) => err.kind,
        Err(other) => panic!("expected a lex error, got {other}"),
        Ok(_) => panic!("expected a lex error, program was accepted"),
    }
}

#[test]
fn declaration_has_a_single_assign_child() {
    for keyword in ["flex", "nocap", "bet"] {
        let source = format!("{keyword} total = 42");
        let analysis = analyze(&source).unwrap();
        let statements = program_statements(&analysis.tree);
        assert_eq!(statements.len(), 1);

        let decl = &statements[0];
        assert_eq!(decl.node_type(), NodeType::Declaration);
        assert_eq!(decl.value(), Some(keyword));
        assert_eq!(decl.children().len(), 1);

        let assign = &decl.children()[0];
        assert_eq!(assign.node_type(), NodeType::AssignOp);
        let kinds: Vec<NodeType> = assign.children().iter().map(ParseTreeNode::node_type).collect();
        assert_eq!(kinds, [NodeType::Identifier, NodeType::Integer]);
    }
}

/// Prints a declaration back as source text.
fn reconstruct(decl: &ParseTreeNode) -> String {
    let keyword = decl.value().unwrap_or_default();
    let assign = &decl.children()[0];
    let operands: Vec<&str> = assign
        .children()
        .iter()
        .filter_map(ParseTreeNode::value)
        .collect();
    format!(
        "{keyword} {} {} {}",
        operands[0],
        assign.value().unwrap_or_default(),
        operands[1]
    )
}

#[test]
fn declaration_survives_reconstruction() {
    for source in ["nocap speed = 3.25", "bet label = \"hi there\";", "flex n = 7"] {
        let first = analyze(source).unwrap();
        let decl = &program_statements(&first.tree)[0];
        let printed = reconstruct(decl);

        let second = analyze(&printed).unwrap();
        assert_eq!(first.tree, second.tree, "{source} -> {printed}");
    }
}

#[test]
fn two_character_operators_are_single_tokens() {
    for (symbol, op, _) in OPERATORS.iter().filter(|(s, _, _)| s.len() == 2) {
        let source = format!("a {symbol} b");
        let tokens: Vec<TokenKind> = tokenize(&source)
            .unwrap()
            .into_iter()
            .flat_map(|line| line.tokens)
            .map(|token| token.kind)
            .collect();
        assert_eq!(
            tokens,
            [TokenKind::Identifier, TokenKind::Operator(*op), TokenKind::Identifier],
            "{symbol}"
        );
    }
}

#[test]
fn if_with_comparison_and_body() {
    let analysis = analyze("sus(x >= 90) { spill(\"A\"); }").unwrap();
    let chain = &program_statements(&analysis.tree)[0];
    assert_eq!(chain.node_type(), NodeType::IfChain);
    assert_eq!(chain.children().len(), 1);

    let if_block = &chain.children()[0];
    assert_eq!(if_block.node_type(), NodeType::IfBlock);
    let condition = &if_block.children()[0];
    assert_eq!(condition.node_type(), NodeType::BinaryOp);
    assert_eq!(condition.value(), Some(">="));

    let block = &if_block.children()[1];
    assert_eq!(block.node_type(), NodeType::Block);
    assert!(block.find(NodeType::PrintStmt).is_some());
}

#[test]
fn empty_if_body_is_a_lex_error() {
    assert!(matches!(
        lex_kind("sus(x >= 90) { }"),
        LexErrorKind::EmptyBlock { .. }
    ));
}

#[test]
fn line_statement_range() {
    let padding = "\n".repeat(9);

    let err = lex(&format!("line = [1, 2, 999]{padding}")).unwrap_err();
    assert!(matches!(err.kind, LexErrorKind::LineOutOfRange { ref value, max: 10 } if value == "999"));
    assert!(err.to_string().contains("999"));

    let analysis = analyze(&format!("line = [1, 2, 3]{padding}")).unwrap();
    let stmt = &program_statements(&analysis.tree)[0];
    assert_eq!(stmt.node_type(), NodeType::LineStmt);
    assert_eq!(stmt.children().len(), 3);
    assert!(stmt.children().iter().all(|c| c.node_type() == NodeType::Integer));
}

#[test]
fn unterminated_string_never_reaches_the_parser() {
    let err = lex("spill(\"hello)").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnclosedString);
    assert!(err.to_string().contains("unclosed string literal"));
    assert!(matches!(lex_kind("spill(\"hello)"), LexErrorKind::UnclosedString));
}

#[test]
fn function_definition_shape() {
    let analysis = analyze("trend add(num a, num b) { reply a + b; }").unwrap();
    let def = &program_statements(&analysis.tree)[0];
    assert_eq!(def.node_type(), NodeType::FunctionDef);
    assert_eq!(def.value(), Some("add"));

    let params = &def.children()[0];
    assert_eq!(params.node_type(), NodeType::ParamList);
    assert_eq!(params.children().len(), 2);
    assert!(params.children().iter().all(|p| p.node_type() == NodeType::Param));

    let block = &def.children()[1];
    assert_eq!(block.node_type(), NodeType::Block);
    assert!(block.find(NodeType::ReturnStmt).is_some());
}

#[test]
fn full_program() {
    let source = r#"
flex grade = 85
nocap limit = 3
sus(grade >= 90) {
    spill("A")
}
else sus(grade >= 80) {
    spill("B")
}
else {
    spill("C")
}
forreal(i = 1; i <= limit; i++) {
    spill(i)
}
talk(limit > 0) {
    limit--
}
trend add(num a, num b) {
    reply a + b
}
total = [add(1, 2), add(3, 4)]
post(name)
"#;
    let analysis = analyze(source).unwrap();
    let kinds: Vec<NodeType> = program_statements(&analysis.tree)
        .iter()
        .map(ParseTreeNode::node_type)
        .collect();
    assert_eq!(
        kinds,
        [
            NodeType::Declaration,
            NodeType::Declaration,
            NodeType::IfChain,
            NodeType::ForStmt,
            NodeType::WhileStmt,
            NodeType::FunctionDef,
            NodeType::ExprStmt,
            NodeType::InputStmt,
        ]
    );
}

#[test]
fn parse_is_usable_without_validation() {
    // The parser alone does not know about arity; it only checks grammar.
    let outcome = parse(flatten(tokenize("sus(x) { spill(x) }").unwrap()));
    assert!(outcome.is_success());
    assert_eq!(outcome.tree.node_type(), NodeType::Program);
}

#[test]
fn syntax_failure_carries_every_reported_error() {
    match analyze("spill(x) x = ") {
        Err(JargenError::Syntax { errors }) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].index, 6);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn operator_names_are_human_readable() {
    let lines = tokenize(">=").unwrap();
    assert_eq!(
        lines[0].tokens[0].kind.name(),
        "Greater Than or Equal To Operator"
    );
    assert_eq!(Operator::GreaterEqual.symbol(), ">=");
}

#[test]
fn runaway_nesting_is_a_syntax_error() {
    let source = format!("x = {}1{}", "(".repeat(50_000), ")".repeat(50_000));
    match analyze(&source) {
        Err(JargenError::Syntax { errors }) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].message.starts_with("Nesting too deep"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
