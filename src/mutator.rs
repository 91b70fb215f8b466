//! Edits to the target document that keep its indentation and comments coherent.

use crate::error::MutationError;
use log::trace;
use xmloverlay_dom::{Attribute, Document, NodeId, NodeKind};

/// Where a new node goes relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Before,
    After,
    /// As the last child of the anchor.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentDirection {
    Previous,
    Following,
}

/// The whitespace run directly in front of `node`, joined in document order.
pub fn whitespace_before(doc: &Document, node: NodeId) -> Option<String> {
    let mut run = Vec::new();
    let mut current = doc.previous_sibling(node);
    while let Some(sibling) = current.filter(|&s| doc.is_whitespace(s)) {
        run.push(doc.value(sibling));
        current = doc.previous_sibling(sibling);
    }
    if run.is_empty() {
        return None;
    }
    run.reverse();
    Some(run.concat())
}

fn is_root_element(doc: &Document, node: NodeId) -> bool {
    doc.parent(node)
        .is_some_and(|parent| doc.kind(parent) == NodeKind::Document)
}

/// Inserts `node` next to or inside `anchor`, adding whitespace so it lines up
/// with its neighbours.
///
/// Before and After repeat the whitespace run found in front of the anchor on the
/// far side of the new node. Append derives an indent from the whitespace in front
/// of the anchor's parent, one `indent_unit` deeper, and wraps the new node in it.
pub fn insert(
    doc: &mut Document,
    node: NodeId,
    anchor: NodeId,
    insertion: Insertion,
    indent_unit: &str,
) -> Result<(), MutationError> {
    match insertion {
        Insertion::Before | Insertion::After => {
            let run = whitespace_before(doc, anchor);
            if is_root_element(doc, anchor) {
                return Err(MutationError::RootElement);
            }
            if insertion == Insertion::Before {
                doc.insert_before(anchor, node)?;
            } else {
                doc.insert_after(anchor, node)?;
            }
            if let Some(run) = run {
                let spacer = doc.create_whitespace(&run, true);
                if insertion == Insertion::Before {
                    doc.insert_after(node, spacer)?;
                } else {
                    doc.insert_before(node, spacer)?;
                }
            }
        }
        Insertion::Append => {
            let outer = doc
                .parent(anchor)
                .and_then(|parent| whitespace_before(doc, parent));
            doc.append_child(anchor, node)?;
            if let Some(outer) = outer {
                let leading = format!("{}{}", outer.replace(['\r', '\n'], ""), indent_unit);
                let trailing = format!("{}{}", outer, indent_unit);
                let leading = doc.create_whitespace(&leading, true);
                doc.insert_before(node, leading)?;
                let trailing = doc.create_whitespace(&trailing, true);
                doc.insert_after(node, trailing)?;
            }
        }
    }
    trace!("inserted {:?} {:?} {:?}", node, insertion, anchor);
    Ok(())
}

/// The nearest comment beside `node`, looking past whitespace only.
pub fn adjacent_comment(doc: &Document, node: NodeId, direction: CommentDirection) -> Option<NodeId> {
    let step = |n: NodeId| match direction {
        CommentDirection::Previous => doc.previous_sibling(n),
        CommentDirection::Following => doc.next_sibling(n),
    };
    let mut current = step(node);
    while let Some(sibling) = current.filter(|&s| doc.is_whitespace(s)) {
        current = step(sibling);
    }
    current.filter(|&n| doc.kind(n) == NodeKind::Comment)
}

/// Removes the nearest comment beside `node` together with one whitespace node on
/// each side of it. Returns whether a comment was found.
pub fn remove_adjacent_comment(doc: &mut Document, node: NodeId, direction: CommentDirection) -> bool {
    let Some(comment) = adjacent_comment(doc, node, direction) else {
        return false;
    };
    for neighbour in [doc.previous_sibling(comment), doc.next_sibling(comment)] {
        if let Some(ws) = neighbour.filter(|&n| doc.is_whitespace(n)) {
            doc.detach(ws);
        }
    }
    doc.detach(comment);
    true
}

/// Creates a comment whose text may spell line breaks as the two-character
/// sequences `\r` and `\n`.
pub fn create_comment(doc: &mut Document, text: &str) -> NodeId {
    let text = text.replace("\\r", "\r").replace("\\n", "\n");
    doc.create_comment(&text)
}

/// Deep-copies a transform element into `target`, dropping every attribute in the
/// directive namespace and every declaration of that namespace.
pub fn clone_stripped(
    target: &mut Document,
    source: &Document,
    element: NodeId,
    directive_namespace: &str,
) -> NodeId {
    target.import_node(source, element, &mut |doc: &Document, owner: NodeId, attr: &Attribute| {
        !is_directive_attribute(doc, owner, attr, directive_namespace)
    })
}

/// True for attributes in the directive namespace and for declarations binding it.
pub fn is_directive_attribute(doc: &Document, owner: NodeId, attr: &Attribute, namespace: &str) -> bool {
    if attr.is_namespace_declaration() {
        return attr.value == namespace;
    }
    doc.attribute_namespace(owner, attr) == Some(namespace)
}

/// Replaces the document content with `element`, keeping the XML declaration.
pub fn replace_document(doc: &mut Document, element: NodeId) -> Result<(), MutationError> {
    let root = doc.root();
    let declaration = doc
        .children(root)
        .iter()
        .copied()
        .find(|&n| doc.kind(n) == NodeKind::Declaration);
    doc.clear_children(root);
    if let Some(declaration) = declaration {
        doc.append_child(root, declaration)?;
    }
    doc.append_child(root, element)?;
    Ok(())
}

/// Replaces `old` with `new` in its parent.
pub fn replace_node(doc: &mut Document, old: NodeId, new: NodeId) -> Result<(), MutationError> {
    doc.insert_after(old, new)?;
    doc.detach(old);
    Ok(())
}

/// Sets each attribute by name; missing ones are appended.
pub fn set_attributes<'v>(doc: &mut Document, element: NodeId, attributes: impl IntoIterator<Item = (&'v str, &'v str)>) {
    for (name, value) in attributes {
        doc.set_attribute(element, name, value);
    }
}

/// Removes each named attribute that is present. Returns how many were removed.
pub fn remove_attributes(doc: &mut Document, element: NodeId, names: &[String]) -> usize {
    names
        .iter()
        .filter(|name| doc.remove_attribute(element, name).is_some())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(doc: &Document, name: &str) -> NodeId {
        fn walk(doc: &Document, node: NodeId, name: &str) -> Option<NodeId> {
            if doc.kind(node) == NodeKind::Element && doc.name(node) == name {
                return Some(node);
            }
            doc.children(node).iter().find_map(|&c| walk(doc, c, name))
        }
        walk(doc, doc.root(), name).unwrap()
    }

    #[test]
    fn test_insert_before_repeats_indent() {
        let mut doc = Document::parse("<a>\n  <b />\n</a>").unwrap();
        let b = find(&doc, "b");
        let c = doc.create_element("c");
        insert(&mut doc, c, b, Insertion::Before, "  ").unwrap();
        assert_eq!(doc.to_xml(), "<a>\n  <c />\n  <b />\n</a>");
    }

    #[test]
    fn test_insert_after_repeats_indent() {
        let mut doc = Document::parse("<a>\n  <b />\n</a>").unwrap();
        let b = find(&doc, "b");
        let c = doc.create_element("c");
        insert(&mut doc, c, b, Insertion::After, "  ").unwrap();
        assert_eq!(doc.to_xml(), "<a>\n  <b />\n  <c />\n</a>");
    }

    #[test]
    fn test_append_indents_one_level_deeper() {
        let source = "<?xml version=\"1.0\"?>\n<r>\n  <a>\n    <b />\n  </a>\n</r>";
        let mut doc = Document::parse(source).unwrap();
        let a = find(&doc, "a");
        let c = doc.create_element("c");
        insert(&mut doc, c, a, Insertion::Append, "  ").unwrap();
        assert_eq!(
            doc.to_xml(),
            "<?xml version=\"1.0\"?>\n<r>\n  <a>\n    <b />\n    <c />\n  </a>\n</r>"
        );
    }

    #[test]
    fn test_append_without_surrounding_whitespace() {
        let mut doc = Document::parse("<a><b /></a>").unwrap();
        let b = find(&doc, "b");
        let c = doc.create_element("c");
        insert(&mut doc, c, b, Insertion::Append, "  ").unwrap();
        assert_eq!(doc.to_xml(), "<a><b><c /></b></a>");
    }

    #[test]
    fn test_sibling_insert_at_root_element_fails() {
        let mut doc = Document::parse("<a />").unwrap();
        let a = find(&doc, "a");
        let c = doc.create_element("c");
        assert_eq!(
            insert(&mut doc, c, a, Insertion::Before, "  "),
            Err(MutationError::RootElement)
        );
        assert_eq!(doc.to_xml(), "<a />");
    }

    #[test]
    fn test_remove_previous_comment_with_whitespace() {
        let mut doc = Document::parse("<b>  <!--hello-->  <c /></b>").unwrap();
        let c = find(&doc, "c");
        assert!(remove_adjacent_comment(&mut doc, c, CommentDirection::Previous));
        assert_eq!(doc.to_xml(), "<b><c /></b>");
    }

    #[test]
    fn test_remove_following_comment_only_past_whitespace() {
        let mut doc = Document::parse("<b><c /><d /><!--hello--></b>").unwrap();
        let c = find(&doc, "c");
        assert!(!remove_adjacent_comment(&mut doc, c, CommentDirection::Following));
        let d = find(&doc, "d");
        assert!(remove_adjacent_comment(&mut doc, d, CommentDirection::Following));
        assert_eq!(doc.to_xml(), "<b><c /><d /></b>");
    }

    #[test]
    fn test_comment_escapes() {
        let mut doc = Document::new();
        let comment = create_comment(&mut doc, "\\r\\nabc\\n");
        assert_eq!(doc.value(comment), "\r\nabc\n");
    }

    #[test]
    fn test_clone_strips_directives() {
        let source = Document::parse(
            "<a xmlns:x=\"urn:d\"><b k=\"1\" x:Transform=\"Insert\"><c x:Locator=\"Match(k)\" /></b></a>",
        )
        .unwrap();
        let b = find(&source, "b");
        let mut target = Document::parse("<a />").unwrap();
        let copy = clone_stripped(&mut target, &source, b, "urn:d");
        assert_eq!(target.outer_xml(copy), "<b k=\"1\"><c /></b>");
    }

    #[test]
    fn test_replace_document_keeps_declaration() {
        let mut doc = Document::parse("<?xml version=\"1.0\"?>\n<!--x--><a />").unwrap();
        let z = doc.create_element("z");
        replace_document(&mut doc, z).unwrap();
        assert_eq!(doc.to_xml(), "<?xml version=\"1.0\"?><z />");
    }

    #[test]
    fn test_attribute_edits() {
        let mut doc = Document::parse("<a k=\"1\" v=\"2\" />").unwrap();
        let a = find(&doc, "a");
        set_attributes(&mut doc, a, [("v", "3"), ("w", "4")]);
        let removed = remove_attributes(&mut doc, a, &["k".to_string(), "missing".to_string()]);
        assert_eq!(removed, 1);
        assert_eq!(doc.to_xml(), "<a v=\"3\" w=\"4\" />");
    }
}
