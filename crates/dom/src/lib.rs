//! A mutable XML document model that round-trips its source text.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by [`NodeId`].
//! Parsing keeps whitespace, comments, the declaration and the element start
//! positions so edits can be written back without disturbing untouched markup.

pub mod document;
pub mod error;
pub mod parser;
pub mod serialize;

pub use document::{Attribute, Document, NodeId, NodeKind, XML_NAMESPACE, XMLNS_NAMESPACE};
pub use error::{DomError, TextPosition, get_line_col_from_pos};
