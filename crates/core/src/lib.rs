//! # docpath-core
//!
//! XPath-style path queries over ordered, attributed document trees.
//!
//! - **datasource**: the node contract a document model implements
//! - **axes**: the thirteen traversal axes and node addresses
//! - **ast**: the path model (`Docpath`, steps, unions, predicates)
//! - **predicate**: the bracket expression language
//! - **parser**: compiles path text such as `//section[@name == "n"]`
//!
//! ```
//! use docpath_core::compile;
//! use docpath_core::datasource::tests::create_test_tree;
//!
//! let tree = create_test_tree();
//! let path = compile("//section[1]/title").unwrap();
//! assert_eq!(path.findall(tree.root()).unwrap().len(), 7);
//! ```

pub mod ast;
pub mod axes;
pub mod datasource;
pub mod engine;
pub mod error;
pub mod node;
pub mod parser;
pub mod predicate;

pub use ast::{Docpath, NodeTest, PathExpr, Step};
pub use axes::{Axis, node_address};
pub use datasource::{Attribute, AttributeValue, DocumentNode, NodeType};
pub use error::DocpathError;
pub use node::{Address, AttributeNode, Located, NodeRef};
pub use parser::compile;
pub use predicate::Predicate;

// Re-export test utilities for integration testing in downstream crates
pub use datasource::tests;
