//! Fixed symbol tables of the JARGEN language.
//!
//! Everything here is static data: the lexer, the validator and the parser
//! all read from the same tables so that they cannot drift apart.

use super::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    PowAssign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Increment,
    Decrement,
    Not,
    And,
    Or,
    EqualTo,
    NotEqualTo,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
}

/// Symbol, operator and display name, in table order.
pub const OPERATORS: [(&str, Operator, &str); 24] = [
    ("=", Operator::Assign, "Equal Sign"),
    ("+=", Operator::AddAssign, "Addition Assignment"),
    ("-=", Operator::SubAssign, "Subtraction Assignment"),
    ("*=", Operator::MulAssign, "Multiplication Assignment"),
    ("/=", Operator::DivAssign, "Division Assignment"),
    ("%=", Operator::RemAssign, "Remainder Assignment"),
    ("^=", Operator::PowAssign, "Exponentiation Assignment"),
    ("+", Operator::Add, "Addition Operator"),
    ("-", Operator::Sub, "Subtraction Operator"),
    ("*", Operator::Mul, "Multiplication Operator"),
    ("/", Operator::Div, "Division Operator"),
    ("%", Operator::Rem, "Remainder Operator"),
    ("^", Operator::Pow, "Exponentiation Operator"),
    ("++", Operator::Increment, "Increment Operator"),
    ("--", Operator::Decrement, "Decrement Operator"),
    ("!", Operator::Not, "Logical NOT Operator"),
    ("&&", Operator::And, "Logical AND Operator"),
    ("||", Operator::Or, "Logical OR Operator"),
    ("==", Operator::EqualTo, "Equal To Operator"),
    ("!=", Operator::NotEqualTo, "Not Equal To Operator"),
    (">", Operator::Greater, "Greater Than Operator"),
    ("<", Operator::Less, "Less Than Operator"),
    (">=", Operator::GreaterEqual, "Greater Than or Equal To Operator"),
    ("<=", Operator::LessEqual, "Less Than or Equal To Operator"),
];

/// Characters that may begin an operator. `&` and `|` only ever appear doubled.
pub const OPERATOR_START: [char; 12] = ['=', '+', '-', '*', '/', '%', '^', '>', '<', '!', '&', '|'];

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        OPERATORS
            .iter()
            .find(|(sym, _, _)| *sym == symbol)
            .map(|(_, op, _)| *op)
    }

    fn entry(self) -> &'static (&'static str, Operator, &'static str) {
        // Every variant has exactly one row, in declaration order.
        &OPERATORS[self as usize]
    }

    pub fn symbol(self) -> &'static str {
        self.entry().0
    }

    pub fn name(self) -> &'static str {
        self.entry().2
    }

    /// The nine relational/logical kinds allowed between two values in a
    /// `sus` or `talk` condition.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Not
                | Self::And
                | Self::Or
                | Self::EqualTo
                | Self::NotEqualTo
                | Self::Greater
                | Self::Less
                | Self::GreaterEqual
                | Self::LessEqual
        )
    }

    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Self::Assign
                | Self::AddAssign
                | Self::SubAssign
                | Self::MulAssign
                | Self::DivAssign
                | Self::RemAssign
                | Self::PowAssign
        )
    }

    pub fn is_inc_dec(self) -> bool {
        matches!(self, Self::Increment | Self::Decrement)
    }

    /// Operators that may join two primaries in an expression chain.
    /// Increment and decrement are postfix-only.
    pub fn is_binary(self) -> bool {
        !self.is_inc_dec()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bracket {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
}

pub const BRACKETS: [(char, Bracket, &str); 6] = [
    ('(', Bracket::OpenParen, "Open Parenthesis"),
    (')', Bracket::CloseParen, "Close Parenthesis"),
    ('[', Bracket::OpenBracket, "Open Bracket"),
    (']', Bracket::CloseBracket, "Close Bracket"),
    ('{', Bracket::OpenBrace, "Open Curly Brace"),
    ('}', Bracket::CloseBrace, "Close Curly Brace"),
];

impl Bracket {
    pub fn from_char(ch: char) -> Option<Self> {
        BRACKETS.iter().find(|(c, _, _)| *c == ch).map(|(_, b, _)| *b)
    }

    pub fn symbol(self) -> char {
        BRACKETS[self as usize].0
    }

    pub fn name(self) -> &'static str {
        BRACKETS[self as usize].2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Comma,
    Semicolon,
    At,
}

pub const DELIMITERS: [(char, Delimiter, &str); 3] = [
    (',', Delimiter::Comma, "Comma"),
    (';', Delimiter::Semicolon, "Semi-colon"),
    ('@', Delimiter::At, "At Sign"),
];

impl Delimiter {
    pub fn from_char(ch: char) -> Option<Self> {
        DELIMITERS.iter().find(|(c, _, _)| *c == ch).map(|(_, d, _)| *d)
    }

    pub fn symbol(self) -> char {
        DELIMITERS[self as usize].0
    }

    pub fn name(self) -> &'static str {
        DELIMITERS[self as usize].2
    }
}

pub const KEYWORDS: [&str; 17] = [
    "flex", "nocap", "bet", "forreal", "sus", "else", "tryme", "mood", "ouchy", "spill", "loop",
    "like", "unlike", "reply", "post", "talk", "scene",
];

pub const RESERVED_WORDS: [&str; 12] = [
    "tru", "barbers", "cancel", "fresh", "stat", "super", "class", "char", "num", "caption",
    "feed", "trend",
];

/// Words that open a declaration. `num` is a reserved word, the rest are keywords.
pub const DECLARATION_WORDS: [&str; 4] = ["flex", "nocap", "bet", "num"];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// One slot in the parenthesised header of a control construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamClass {
    /// `Integer`, `FloatNumber` or `Identifier`
    Value,
    Comparison,
    Assignment,
    IncDec,
    Semicolon,
}

impl ParamClass {
    pub fn accepts(self, kind: &TokenKind) -> bool {
        match self {
            Self::Value => matches!(
                kind,
                TokenKind::Integer | TokenKind::FloatNumber | TokenKind::Identifier
            ),
            Self::Comparison => matches!(kind, TokenKind::Operator(op) if op.is_comparison()),
            Self::Assignment => matches!(kind, TokenKind::Operator(op) if op.is_assignment()),
            Self::IncDec => matches!(kind, TokenKind::Operator(op) if op.is_inc_dec()),
            Self::Semicolon => matches!(kind, TokenKind::Delimiter(Delimiter::Semicolon)),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Value => "an integer, float or identifier",
            Self::Comparison => "a comparison or logical operator",
            Self::Assignment => "an assignment operator",
            Self::IncDec => "'++' or '--'",
            Self::Semicolon => "';'",
        }
    }
}

use ParamClass::{Assignment, Comparison, IncDec, Semicolon, Value};

const CONDITION_SHAPE: [ParamClass; 3] = [Value, Comparison, Value];
const SWITCH_SHAPE: [ParamClass; 1] = [Value];
const FOR_SHAPE: [ParamClass; 10] = [
    Value, Assignment, Value, Semicolon, Value, Comparison, Value, Semicolon, Value, IncDec,
];

/// Keyword-headed constructs that take a parenthesised header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    Print,
    Input,
    If,
    While,
    Switch,
    For,
}

impl Construct {
    pub const ALL: [Construct; 6] = [
        Self::Print,
        Self::Input,
        Self::If,
        Self::While,
        Self::Switch,
        Self::For,
    ];

    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.keyword() == word)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Print => "spill",
            Self::Input => "post",
            Self::If => "sus",
            Self::While => "talk",
            Self::Switch => "mood",
            Self::For => "forreal",
        }
    }

    /// Expected token classes between the parentheses, or `None` when the
    /// header is not shape-checked (`spill`, `post`).
    pub fn shape(self) -> Option<&'static [ParamClass]> {
        match self {
            Self::Print | Self::Input => None,
            Self::If | Self::While => Some(&CONDITION_SHAPE),
            Self::Switch => Some(&SWITCH_SHAPE),
            Self::For => Some(&FOR_SHAPE),
        }
    }

    /// Whether a `{ ... }` body must follow the closing parenthesis.
    pub fn requires_block(self) -> bool {
        self.shape().is_some()
    }
}
