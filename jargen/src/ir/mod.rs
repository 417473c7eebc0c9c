pub mod tree;

pub use tree::{NodeType, ParseTreeNode};
