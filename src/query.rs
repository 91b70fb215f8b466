//! Runs composed paths against the target document.
//!
//! [`TargetNode`] exposes a [`Document`] to the XPath evaluator. Namespace
//! declarations are not attributes, and the XML declaration, doctype and
//! top-level whitespace are not children, matching the XPath data model.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use xmloverlay_dom::{Document, NodeId, NodeKind};
use xmloverlay_xpath1::{DataSourceNode, NodeType, QName, XPathError, select_nodes};

#[derive(Debug, Clone, Copy)]
pub struct TargetNode<'a> {
    doc: &'a Document,
    id: NodeId,
    /// Index into the owner's attribute list for attribute nodes.
    attribute: Option<usize>,
}

impl<'a> TargetNode<'a> {
    pub fn new(doc: &'a Document, id: NodeId) -> Self {
        TargetNode {
            doc,
            id,
            attribute: None,
        }
    }
}

impl PartialEq for TargetNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id && self.attribute == other.attribute
    }
}

impl Eq for TargetNode<'_> {}

impl Hash for TargetNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.attribute.hash(state);
    }
}

impl PartialOrd for TargetNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Document order. An element sorts before its attributes, which sort before its
/// children.
impl Ord for TargetNode<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.doc
            .compare_document_order(self.id, other.id)
            .then_with(|| self.attribute.cmp(&other.attribute))
    }
}

fn is_exposed_child(doc: &Document, parent: NodeId, child: NodeId) -> bool {
    match doc.kind(child) {
        NodeKind::Declaration | NodeKind::DocumentType => false,
        NodeKind::Whitespace | NodeKind::SignificantWhitespace => {
            doc.kind(parent) != NodeKind::Document
        }
        _ => true,
    }
}

impl<'a> DataSourceNode<'a> for TargetNode<'a> {
    fn node_type(&self) -> NodeType {
        if self.attribute.is_some() {
            return NodeType::Attribute;
        }
        match self.doc.kind(self.id) {
            NodeKind::Document => NodeType::Root,
            NodeKind::Element => NodeType::Element,
            NodeKind::Text
            | NodeKind::CData
            | NodeKind::Whitespace
            | NodeKind::SignificantWhitespace => NodeType::Text,
            NodeKind::Comment => NodeType::Comment,
            // Declarations and doctypes are never handed out by `children`.
            NodeKind::ProcessingInstruction
            | NodeKind::Declaration
            | NodeKind::DocumentType => NodeType::ProcessingInstruction,
        }
    }

    fn name(&self) -> Option<QName<'a>> {
        let doc = self.doc;
        if let Some(index) = self.attribute {
            return doc
                .attributes(self.id)
                .get(index)
                .map(|attr| QName::parse(attr.name.as_str()));
        }
        match doc.kind(self.id) {
            NodeKind::Element | NodeKind::ProcessingInstruction => {
                Some(QName::parse(doc.name(self.id)))
            }
            _ => None,
        }
    }

    fn string_value(&self) -> String {
        match self.attribute {
            Some(index) => self
                .doc
                .attributes(self.id)
                .get(index)
                .map(|attr| attr.value.clone())
                .unwrap_or_default(),
            None => self.doc.text_content(self.id),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        let doc = self.doc;
        let id = self.id;
        if self.attribute.is_some() || doc.kind(id) != NodeKind::Element {
            return Box::new(std::iter::empty());
        }
        Box::new(
            doc.attributes(id)
                .iter()
                .enumerate()
                .filter(|(_, attr)| !attr.is_namespace_declaration())
                .map(move |(index, _)| TargetNode {
                    doc,
                    id,
                    attribute: Some(index),
                }),
        )
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        let doc = self.doc;
        let id = self.id;
        if self.attribute.is_some() {
            return Box::new(std::iter::empty());
        }
        Box::new(
            doc.children(id)
                .iter()
                .copied()
                .filter(move |&child| is_exposed_child(doc, id, child))
                .map(move |child| TargetNode::new(doc, child)),
        )
    }

    fn parent(&self) -> Option<Self> {
        if self.attribute.is_some() {
            return Some(TargetNode::new(self.doc, self.id));
        }
        self.doc
            .parent(self.id)
            .map(|parent| TargetNode::new(self.doc, parent))
    }
}

/// A node picked by a path, detached from the borrow of the document so the
/// caller can go on to mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected {
    Node(NodeId),
    Attribute { owner: NodeId, name: String },
}

/// Evaluates `path` from the document node and returns the matches in document order.
pub fn select(doc: &Document, path: &str) -> Result<Vec<Selected>, XPathError> {
    let nodes = select_nodes(path, TargetNode::new(doc, doc.root()))?;
    Ok(nodes
        .into_iter()
        .map(|node| match node.attribute {
            Some(index) => Selected::Attribute {
                owner: node.id,
                name: doc
                    .attributes(node.id)
                    .get(index)
                    .map(|attr| attr.name.clone())
                    .unwrap_or_default(),
            },
            None => Selected::Node(node.id),
        })
        .collect())
}

/// The first match if it is an element.
pub fn select_element(doc: &Document, path: &str) -> Result<Option<NodeId>, XPathError> {
    Ok(select(doc, path)?.into_iter().next().and_then(|selected| match selected {
        Selected::Node(id) if doc.kind(id) == NodeKind::Element => Some(id),
        _ => None,
    }))
}
