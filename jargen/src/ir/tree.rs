use std::fmt;

/// Tag of a parse tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Program,
    StatementList,
    Declaration,
    Identifier,
    AssignOp,
    IfChain,
    IfBlock,
    ElseIfBlock,
    ElseBlock,
    ForStmt,
    WhileStmt,
    PrintStmt,
    InputStmt,
    SwitchStmt,
    FunctionDef,
    ParamList,
    Param,
    Type,
    FunctionCall,
    LineStmt,
    ReturnStmt,
    Block,
    ExprStmt,
    AssignmentOp,
    IncDecOp,
    Expr,
    ArrayLiteral,
    BinaryOp,
    PostfixOp,
    Integer,
    FloatNumber,
    String,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Program => "PROGRAM",
            Self::StatementList => "STATEMENT_LIST",
            Self::Declaration => "DECLARATION",
            Self::Identifier => "IDENTIFIER",
            Self::AssignOp => "ASSIGN_OP",
            Self::IfChain => "IF_CHAIN",
            Self::IfBlock => "IF_BLOCK",
            Self::ElseIfBlock => "ELSE_IF_BLOCK",
            Self::ElseBlock => "ELSE_BLOCK",
            Self::ForStmt => "FOR_STMT",
            Self::WhileStmt => "WHILE_STMT",
            Self::PrintStmt => "PRINT_STMT",
            Self::InputStmt => "INPUT_STMT",
            Self::SwitchStmt => "SWITCH_STMT",
            Self::FunctionDef => "FUNCTION_DEF",
            Self::ParamList => "PARAM_LIST",
            Self::Param => "PARAM",
            Self::Type => "TYPE",
            Self::FunctionCall => "FUNCTION_CALL",
            Self::LineStmt => "LINE_STMT",
            Self::ReturnStmt => "RETURN_STMT",
            Self::Block => "BLOCK",
            Self::ExprStmt => "EXPR_STMT",
            Self::AssignmentOp => "ASSIGNMENT_OP",
            Self::IncDecOp => "INCDEC_OP",
            Self::Expr => "EXPR",
            Self::ArrayLiteral => "ARRAY_LITERAL",
            Self::BinaryOp => "BINARY_OP",
            Self::PostfixOp => "POSTFIX_OP",
            Self::Integer => "INTEGER",
            Self::FloatNumber => "FLOAT_NUMBER",
            Self::String => "STRING",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the parse tree: a tag, an optional literal value and ordered
/// children. Built bottom-up by the parser; callers only ever append
/// finished nodes to a parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTreeNode {
    node_type: NodeType,
    value: Option<String>,
    children: Vec<ParseTreeNode>,
}

impl ParseTreeNode {
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            value: None,
            children: Vec::new(),
        }
    }

    pub fn with_value(node_type: NodeType, value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(node_type)
        }
    }

    /// Builder form of [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: ParseTreeNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: ParseTreeNode) {
        self.children.push(child);
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn children(&self) -> &[ParseTreeNode] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&ParseTreeNode> {
        self.children.get(index)
    }

    /// First node of the given type in pre-order, including `self`.
    pub fn find(&self, node_type: NodeType) -> Option<&ParseTreeNode> {
        if self.node_type == node_type {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(node_type))
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ParseTreeNode::node_count).sum::<usize>()
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.node_type, indent = depth * 2)?;
        if let Some(value) = &self.value {
            write!(f, "({value})")?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ParseTreeNode {
    /// One node per line, two spaces of indent per level.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
