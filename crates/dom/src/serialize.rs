//! Writes a [`Document`] back to XML text.
//!
//! Markup read verbatim (the declaration, doctype, comments, CDATA and whitespace)
//! is written verbatim. Character data and attribute values are escaped.

use crate::document::{Attribute, Document, NodeId, NodeKind};
use quick_xml::escape::partial_escape;
use std::fmt;

fn write_attribute(out: &mut String, attribute: &Attribute) {
    out.push(' ');
    out.push_str(&attribute.name);
    out.push_str("=\"");
    out.push_str(&partial_escape(&attribute.value).replace('"', "&quot;"));
    out.push('"');
}

impl Document {
    /// The whole document as text.
    pub fn to_xml(&self) -> String {
        self.outer_xml(self.root())
    }

    /// Markup for `id` and everything below it.
    pub fn outer_xml(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Markup for the children of `id`.
    pub fn inner_xml(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// The opening tag of an element, without content or end tag, keeping only the
    /// attributes `keep` accepts. A childless short-form element renders as `<x />`.
    pub fn start_tag<F>(&self, id: NodeId, mut keep: F) -> String
    where
        F: FnMut(&Attribute) -> bool,
    {
        let mut out = String::from("<");
        out.push_str(self.name(id));
        for attribute in self.attributes(id) {
            if keep(attribute) {
                write_attribute(&mut out, attribute);
            }
        }
        if self.children(id).is_empty() && self.is_self_closing(id) {
            out.push_str(" />");
        } else {
            out.push('>');
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Document => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeKind::Element => {
                out.push_str(&self.start_tag(id, |_| true));
                let children = self.children(id);
                if children.is_empty() && self.is_self_closing(id) {
                    return;
                }
                for &child in children {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(self.name(id));
                out.push('>');
            }
            NodeKind::Text => out.push_str(&partial_escape(self.value(id))),
            NodeKind::CData => {
                out.push_str("<![CDATA[");
                out.push_str(self.value(id));
                out.push_str("]]>");
            }
            NodeKind::Comment => {
                out.push_str("<!--");
                out.push_str(self.value(id));
                out.push_str("-->");
            }
            NodeKind::ProcessingInstruction => {
                out.push_str("<?");
                out.push_str(self.name(id));
                if !self.value(id).is_empty() {
                    out.push(' ');
                    out.push_str(self.value(id));
                }
                out.push_str("?>");
            }
            NodeKind::Declaration
            | NodeKind::DocumentType
            | NodeKind::Whitespace
            | NodeKind::SignificantWhitespace => out.push_str(self.value(id)),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_verbatim() {
        let source = "<?xml version=\"1.0\"?>\n<!DOCTYPE a>\n<a x=\"1\">\n  <!-- c -->\n  <b></b>\n  <c />\n  <?pi data?>\n  <![CDATA[<raw>]]>\n</a>";
        let doc = Document::parse(source).unwrap();
        assert_eq!(doc.to_xml(), source);
    }

    #[test]
    fn test_escaping() {
        let doc = Document::parse("<a v=\"&lt;&amp;&quot;\">x &gt; y &amp; z</a>").unwrap();
        assert_eq!(doc.to_string(), "<a v=\"&lt;&amp;&quot;\">x &gt; y &amp; z</a>");
    }

    #[test]
    fn test_new_elements_use_short_form() {
        let mut doc = Document::parse("<a></a>").unwrap();
        let a = doc.document_element().unwrap();
        let b = doc.create_element("b");
        doc.set_attribute(b, "k", "v");
        doc.append_child(a, b).unwrap();
        assert_eq!(doc.to_xml(), "<a><b k=\"v\" /></a>");
        assert_eq!(doc.inner_xml(a), "<b k=\"v\" />");
    }

    #[test]
    fn test_emptied_element_keeps_long_form() {
        let mut doc = Document::parse("<a><b/></a>").unwrap();
        let a = doc.document_element().unwrap();
        let b = doc.children(a)[0];
        doc.detach(b);
        assert_eq!(doc.to_xml(), "<a></a>");
    }

    #[test]
    fn test_start_tag_filters_attributes() {
        let doc = Document::parse("<a xmlns:t=\"urn:t\" t:x=\"1\" y=\"2\"><b/></a>").unwrap();
        let a = doc.document_element().unwrap();
        let tag = doc.start_tag(a, |attr| !attr.is_namespace_declaration());
        assert_eq!(tag, "<a t:x=\"1\" y=\"2\">");
        let b = doc.children(a)[0];
        assert_eq!(doc.start_tag(b, |_| true), "<b />");
    }
}
