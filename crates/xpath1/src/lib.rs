//! XPath 1.0 expressions evaluated against any tree that implements [`DataSourceNode`].
//!
//! The overlay engine composes a path string for every transform node and hands it
//! to [`select_nodes`], which parses it, evaluates it from the document node and
//! returns the matching nodes in document order.

pub mod ast;
pub mod axes;
pub mod datasource;
pub mod engine;
pub mod error;
pub mod functions;
pub mod operators;
pub mod parser;

pub use ast::{Axis, BinaryOperator, Expression, NodeTest, PathExpr, PathOrigin, Step};
pub use datasource::{DataSourceNode, NodeType, QName};
pub use engine::{EvaluationContext, XPathValue, evaluate, select_nodes};
pub use error::XPathError;
pub use parser::parse_expression;
