//! The node abstraction the evaluator is written against.
use std::hash::Hash;

/// A qualified name, consisting of an optional prefix and a local part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub prefix: Option<&'a str>,
    pub local_part: &'a str,
}

impl<'a> QName<'a> {
    /// Splits `prefix:local` at the first colon.
    pub fn parse(name: &'a str) -> Self {
        match name.split_once(':') {
            Some((prefix, local_part)) => QName {
                prefix: Some(prefix),
                local_part,
            },
            None => QName {
                prefix: None,
                local_part: name,
            },
        }
    }

    /// True if this name is spelled exactly as `name` (prefix included).
    pub fn matches(&self, name: &str) -> bool {
        match (self.prefix, name.split_once(':')) {
            (Some(prefix), Some((p, local))) => prefix == p && self.local_part == local,
            (None, None) => self.local_part == name,
            _ => false,
        }
    }
}

impl std::fmt::Display for QName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local_part),
            None => f.write_str(self.local_part),
        }
    }
}

/// The type of a node, aligned with the XPath 1.0 data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

/// A navigable node of a tree the evaluator can query.
///
/// Implementations are cheap handles (`Copy`) into a tree that outlives `'a`.
/// `Ord` must follow document order: results are sorted with it.
pub trait DataSourceNode<'a>:
    std::fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord
{
    fn node_type(&self) -> NodeType;

    /// Qualified name for elements, attributes and processing instructions (the PI
    /// target). `None` for root, text and comment nodes.
    fn name(&self) -> Option<QName<'a>>;

    /// The XPath `string()` value of the node.
    fn string_value(&self) -> String;

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// `None` for the root node. The parent of an attribute is its owner element.
    fn parent(&self) -> Option<Self>;
}
