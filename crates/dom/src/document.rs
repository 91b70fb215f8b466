//! The arena that holds every node of a document, and the operations to read and
//! rearrange it.

use crate::error::{DomError, TextPosition};
use log::trace;
use std::cmp::Ordering;

/// The namespace bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
/// The namespace of `xmlns` and `xmlns:*` declaration attributes.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Handle to a node in a [`Document`]. Only meaningful for the document that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    /// `<?xml ...?>`, kept verbatim.
    Declaration,
    /// `<!DOCTYPE ...>`, kept verbatim.
    DocumentType,
    Element,
    Text,
    CData,
    Whitespace,
    /// Whitespace created by an edit rather than read from the source.
    SignificantWhitespace,
    Comment,
    ProcessingInstruction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// True for `xmlns` and `xmlns:*`.
    pub fn is_namespace_declaration(&self) -> bool {
        self.name == "xmlns" || self.prefix() == Some("xmlns")
    }

    /// The prefix this attribute declares: `Some(None)` for a default namespace
    /// declaration, `Some(Some(p))` for `xmlns:p`, `None` for ordinary attributes.
    pub fn declared_prefix(&self) -> Option<Option<&str>> {
        if self.name == "xmlns" {
            Some(None)
        } else if self.prefix() == Some("xmlns") {
            Some(Some(self.local_name()))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    /// Element name or processing-instruction target.
    name: String,
    /// Character content; the full markup for declarations and doctypes.
    value: String,
    attributes: Vec<Attribute>,
    parent: Option<NodeId>,
    /// Slot in the parent's `children`; stale while detached.
    index: usize,
    children: Vec<NodeId>,
    position: Option<TextPosition>,
    /// Serialize as `<x />` while the element has no children.
    self_closing: bool,
}

impl NodeData {
    fn new(kind: NodeKind, name: String, value: String) -> Self {
        NodeData {
            kind,
            name,
            value,
            attributes: Vec::new(),
            parent: None,
            index: 0,
            children: Vec::new(),
            position: None,
            self_closing: false,
        }
    }
}

/// An ordered XML tree. Every node lives in one arena owned by the document;
/// detached nodes stay allocated but are unreachable from [`Document::root`].
///
/// The arena never shrinks, so a long-lived document that is edited over and
/// over keeps the memory of everything ever removed or replaced. Parse a fresh
/// document per run when that matters.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only the document node.
    pub fn new() -> Self {
        Document {
            nodes: vec![NodeData::new(
                NodeKind::Document,
                String::new(),
                String::new(),
            )],
        }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    pub(crate) fn alloc(&mut self, data_kind: NodeKind, name: &str, value: &str) -> NodeId {
        self.nodes
            .push(NodeData::new(data_kind, name.to_string(), value.to_string()));
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn set_position(&mut self, id: NodeId, position: TextPosition) {
        self.data_mut(id).position = Some(position);
    }

    pub(crate) fn set_self_closing(&mut self, id: NodeId, self_closing: bool) {
        self.data_mut(id).self_closing = self_closing;
    }

    pub(crate) fn is_self_closing(&self, id: NodeId) -> bool {
        self.data(id).self_closing
    }

    pub(crate) fn push_attribute(&mut self, id: NodeId, attribute: Attribute) {
        self.data_mut(id).attributes.push(attribute);
    }

    // --- Navigation ---

    /// The document node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The single top-level element, if the document has one.
    pub fn document_element(&self) -> Option<NodeId> {
        self.child_elements(self.root()).next()
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.data(id).kind
    }

    /// Qualified element name or processing-instruction target; empty otherwise.
    pub fn name(&self, id: NodeId) -> &str {
        &self.data(id).name
    }

    pub fn local_name(&self, id: NodeId) -> &str {
        let name = self.name(id);
        name.split_once(':').map_or(name, |(_, local)| local)
    }

    pub fn prefix(&self, id: NodeId) -> Option<&str> {
        self.name(id).split_once(':').map(|(prefix, _)| prefix)
    }

    /// Text of character nodes and comments, data of processing instructions.
    pub fn value(&self, id: NodeId) -> &str {
        &self.data(id).value
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.kind(child) == NodeKind::Element)
    }

    fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        Some((parent, self.data(id).index))
    }

    /// Rewrites the stored slot of every child of `parent` from `from` onwards.
    fn reindex_from(&mut self, parent: NodeId, from: usize) {
        for index in from..self.children(parent).len() {
            let child = self.children(parent)[index];
            self.data_mut(child).index = index;
        }
    }

    fn depth(&self, id: NodeId) -> usize {
        self.ancestors_or_self(id).count() - 1
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .map(|prev| self.children(parent)[prev])
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Where the element started in the parsed source, if it was parsed.
    pub fn position(&self, id: NodeId) -> Option<TextPosition> {
        self.data(id).position
    }

    /// True for both whitespace kinds.
    pub fn is_whitespace(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            NodeKind::Whitespace | NodeKind::SignificantWhitespace
        )
    }

    /// True while `id` is reachable from the document node.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors_or_self(id).any(|node| node == self.root())
    }

    /// `id` followed by its parent, grandparent and so on.
    pub fn ancestors_or_self(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&node| self.parent(node))
    }

    /// Orders two nodes of the same tree by document order: an ancestor comes
    /// before its descendants, siblings by position. Nodes of different detached
    /// subtrees are ordered by their subtree roots' handles.
    pub fn compare_document_order(&self, a: NodeId, b: NodeId) -> Ordering {
        let (mut a, mut b) = (a, b);
        let (depth_a, depth_b) = (self.depth(a), self.depth(b));
        for _ in depth_b..depth_a {
            a = self.parent_or_self(a);
        }
        for _ in depth_a..depth_b {
            b = self.parent_or_self(b);
        }
        if a == b {
            return depth_a.cmp(&depth_b);
        }
        loop {
            match (self.parent(a), self.parent(b)) {
                (Some(pa), Some(pb)) if pa == pb => {
                    return self.data(a).index.cmp(&self.data(b).index);
                }
                (Some(pa), Some(pb)) => {
                    a = pa;
                    b = pb;
                }
                _ => return a.cmp(&b),
            }
        }
    }

    fn parent_or_self(&self, id: NodeId) -> NodeId {
        self.parent(id).unwrap_or(id)
    }

    /// Concatenated text of all descendant text-like nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Document | NodeKind::Element => {
                let mut out = String::new();
                self.collect_text(id, &mut out);
                out
            }
            _ => self.value(id).to_string(),
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for &child in self.children(id) {
            match self.kind(child) {
                NodeKind::Element => self.collect_text(child, out),
                NodeKind::Text
                | NodeKind::CData
                | NodeKind::Whitespace
                | NodeKind::SignificantWhitespace => out.push_str(self.value(child)),
                _ => {}
            }
        }
    }

    // --- Attributes ---

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        &self.data(id).attributes
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Updates the attribute in place, or appends it when absent.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let attributes = &mut self.data_mut(id).attributes;
        match attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => attributes.push(Attribute::new(name, value)),
        }
    }

    /// Removes the attribute and returns its value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        let attributes = &mut self.data_mut(id).attributes;
        let index = attributes.iter().position(|a| a.name == name)?;
        Some(attributes.remove(index).value)
    }

    // --- Namespaces ---

    /// The namespace URI bound to `prefix` (`None` for the default namespace) in
    /// scope at `id`.
    pub fn resolve_prefix(&self, id: NodeId, prefix: Option<&str>) -> Option<&str> {
        match prefix {
            Some("xml") => return Some(XML_NAMESPACE),
            Some("xmlns") => return Some(XMLNS_NAMESPACE),
            _ => {}
        }
        self.ancestors_or_self(id)
            .filter(|&node| self.kind(node) == NodeKind::Element)
            .find_map(|node| {
                self.attributes(node)
                    .iter()
                    .find(|a| a.declared_prefix() == Some(prefix))
                    .map(|a| a.value.as_str())
            })
            .filter(|uri| !uri.is_empty())
    }

    /// Unprefixed attributes are in no namespace; declarations are in the xmlns namespace.
    pub fn attribute_namespace(&self, id: NodeId, attribute: &Attribute) -> Option<&str> {
        if attribute.is_namespace_declaration() {
            return Some(XMLNS_NAMESPACE);
        }
        match attribute.prefix() {
            Some(prefix) => self.resolve_prefix(id, Some(prefix)),
            None => None,
        }
    }

    /// Finds an attribute by local name and namespace URI, whatever prefix it uses.
    pub fn find_attribute_ns(&self, id: NodeId, local_name: &str, uri: &str) -> Option<&Attribute> {
        self.attributes(id).iter().find(|a| {
            !a.is_namespace_declaration()
                && a.local_name() == local_name
                && self.attribute_namespace(id, a) == Some(uri)
        })
    }

    // --- Construction ---

    /// A detached element; serializes as `<name />` until it gets children.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let id = self.alloc(NodeKind::Element, name, "");
        self.set_self_closing(id, true);
        id
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text, "", text)
    }

    pub fn create_whitespace(&mut self, text: &str, significant: bool) -> NodeId {
        let kind = if significant {
            NodeKind::SignificantWhitespace
        } else {
            NodeKind::Whitespace
        };
        self.alloc(kind, "", text)
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Comment, "", text)
    }

    pub fn create_processing_instruction(&mut self, target: &str, data: &str) -> NodeId {
        self.alloc(NodeKind::ProcessingInstruction, target, data)
    }

    /// Deep-copies `node` from `source` into this document as a detached subtree.
    ///
    /// `keep_attribute` is asked about every attribute of every copied element.
    /// Copied elements without children serialize in the short form.
    pub fn import_node<F>(&mut self, source: &Document, node: NodeId, keep_attribute: &mut F) -> NodeId
    where
        F: FnMut(&Document, NodeId, &Attribute) -> bool,
    {
        let data = source.data(node);
        let copy = self.alloc(data.kind, &data.name, &data.value);
        if data.kind == NodeKind::Element {
            self.set_self_closing(copy, true);
            for attribute in &data.attributes {
                if keep_attribute(source, node, attribute) {
                    self.push_attribute(copy, attribute.clone());
                }
            }
        }
        for &child in source.children(node) {
            let child_copy = self.import_node(source, child, keep_attribute);
            self.insert_at(copy, usize::MAX, child_copy);
        }
        copy
    }

    // --- Mutation ---

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.ancestors_or_self(parent).any(|node| node == child) {
            return Err(DomError::HierarchyRequest(self.describe(child)));
        }
        Ok(())
    }

    fn describe(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Element | NodeKind::ProcessingInstruction => self.name(id).to_string(),
            other => format!("{:?}", other),
        }
    }

    fn insert_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.data_mut(child).parent = Some(parent);
        // Once an element has held children it keeps the long form.
        self.data_mut(parent).self_closing = false;
        let children = &mut self.data_mut(parent).children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.reindex_from(parent, index);
    }

    /// Appends `child` as the last child of `parent`, detaching it first if needed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insertable(parent, child)?;
        self.detach(child);
        let index = self.children(parent).len();
        self.insert_at(parent, index, child);
        trace!("appended {} under {}", self.describe(child), self.describe(parent));
        Ok(())
    }

    /// Inserts `new_node` as the sibling immediately before `reference`.
    pub fn insert_before(&mut self, reference: NodeId, new_node: NodeId) -> Result<(), DomError> {
        self.insert_next_to(reference, new_node, 0)
    }

    /// Inserts `new_node` as the sibling immediately after `reference`.
    pub fn insert_after(&mut self, reference: NodeId, new_node: NodeId) -> Result<(), DomError> {
        self.insert_next_to(reference, new_node, 1)
    }

    fn insert_next_to(&mut self, reference: NodeId, new_node: NodeId, offset: usize) -> Result<(), DomError> {
        let parent = self
            .parent(reference)
            .ok_or_else(|| DomError::NoParent(self.describe(reference)))?;
        self.check_insertable(parent, new_node)?;
        self.detach(new_node);
        let (_, index) = self
            .index_in_parent(reference)
            .ok_or_else(|| DomError::NoParent(self.describe(reference)))?;
        self.insert_at(parent, index + offset, new_node);
        Ok(())
    }

    /// Unlinks `id` from its parent. The subtree stays intact and can be re-inserted.
    pub fn detach(&mut self, id: NodeId) {
        if let Some((parent, index)) = self.index_in_parent(id) {
            self.data_mut(parent).children.remove(index);
            self.reindex_from(parent, index);
        }
        self.data_mut(id).parent = None;
    }

    /// Detaches every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.data_mut(id).children);
        for child in children {
            self.data_mut(child).parent = None;
        }
    }
}
