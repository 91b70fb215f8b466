//! Builds a [`Document`] from XML text with quick-xml, keeping every whitespace run,
//! comment and processing instruction so the document can be written back unchanged.

use crate::document::{Attribute, Document, NodeId, NodeKind};
use crate::error::{DomError, TextPosition, get_line_col_from_pos};
use log::debug;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::str::FromStr;

struct OpenElement {
    id: NodeId,
    name: String,
    position: TextPosition,
}

struct DocumentBuilder<'s> {
    source: &'s str,
    reader: Reader<&'s [u8]>,
    doc: Document,
    stack: Vec<OpenElement>,
}

impl<'s> DocumentBuilder<'s> {
    fn new(source: &'s str) -> Self {
        let mut reader = Reader::from_str(source);
        let config = reader.config_mut();
        config.trim_text_start = false;
        config.trim_text_end = false;
        // End tags are matched here so the error can name both tags with positions.
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        DocumentBuilder {
            source,
            reader,
            doc: Document::new(),
            stack: Vec::new(),
        }
    }

    fn position_at(&self, offset: usize) -> TextPosition {
        get_line_col_from_pos(self.source, offset).into()
    }

    fn raw(&self, start: usize) -> &'s str {
        let end = self.reader.buffer_position() as usize;
        self.source.get(start..end).unwrap_or_default()
    }

    fn syntax_error(&self, message: impl Into<String>, offset: usize) -> DomError {
        DomError::Syntax {
            message: message.into(),
            position: self.position_at(offset),
        }
    }

    fn current_parent(&self) -> NodeId {
        self.stack.last().map_or(self.doc.root(), |open| open.id)
    }

    fn attach(&mut self, node: NodeId) -> Result<(), DomError> {
        let parent = self.current_parent();
        self.doc.append_child(parent, node)
    }

    fn build(mut self) -> Result<Document, DomError> {
        loop {
            let event_start = self.reader.buffer_position() as usize;
            let event = self
                .reader
                .read_event()
                .map_err(|e| self.syntax_error(e.to_string(), self.reader.error_position() as usize))?;
            match event {
                Event::Start(e) => {
                    let id = self.start_element(&e, event_start, false)?;
                    let name = self.doc.name(id).to_string();
                    let position = self.position_at(event_start + 1);
                    self.stack.push(OpenElement { id, name, position });
                }
                Event::Empty(e) => {
                    self.start_element(&e, event_start, true)?;
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    let end_position = self.position_at(event_start + 2);
                    match self.stack.pop() {
                        Some(open) if open.name == name => {}
                        Some(open) => {
                            return Err(DomError::MismatchedEndTag {
                                start: open.name,
                                start_position: open.position,
                                end: name,
                                end_position,
                            });
                        }
                        None => {
                            return Err(DomError::UnexpectedEndTag {
                                name,
                                position: end_position,
                            });
                        }
                    }
                }
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| self.syntax_error(err.to_string(), event_start))?;
                    self.text(&text, event_start)?;
                }
                Event::CData(_) => {
                    let raw = self.raw(event_start);
                    let content = raw
                        .strip_prefix("<![CDATA[")
                        .and_then(|s| s.strip_suffix("]]>"))
                        .unwrap_or(raw);
                    self.outside_root_check(event_start)?;
                    let id = self.doc.alloc(NodeKind::CData, "", content);
                    self.attach(id)?;
                }
                Event::Comment(_) => {
                    let raw = self.raw(event_start);
                    let content = raw
                        .strip_prefix("<!--")
                        .and_then(|s| s.strip_suffix("-->"))
                        .unwrap_or(raw);
                    let id = self.doc.create_comment(content);
                    self.attach(id)?;
                }
                Event::Decl(_) => {
                    let raw = self.raw(event_start);
                    let id = self.doc.alloc(NodeKind::Declaration, "xml", raw);
                    self.attach(id)?;
                }
                Event::PI(_) => {
                    let raw = self.raw(event_start);
                    let body = raw
                        .strip_prefix("<?")
                        .and_then(|s| s.strip_suffix("?>"))
                        .unwrap_or(raw);
                    let (target, data) = match body.split_once(|c: char| c.is_ascii_whitespace()) {
                        Some((target, data)) => (target, data.trim_start()),
                        None => (body, ""),
                    };
                    let id = self.doc.create_processing_instruction(target, data);
                    self.attach(id)?;
                }
                Event::DocType(_) => {
                    let raw = self.raw(event_start);
                    let id = self.doc.alloc(NodeKind::DocumentType, "", raw);
                    self.attach(id)?;
                }
                Event::Eof => break,
            }
        }

        if !self.stack.is_empty() {
            let open: Vec<String> = self
                .stack
                .iter()
                .map(|open| format!("'{}' at {}", open.name, open.position))
                .collect();
            return Err(DomError::UnclosedElements(open.join(", ")));
        }
        if self.doc.document_element().is_none() {
            return Err(DomError::MissingRoot);
        }
        debug!("parsed document with {} top-level nodes", self.doc.children(self.doc.root()).len());
        Ok(self.doc)
    }

    fn start_element(&mut self, e: &BytesStart<'_>, event_start: usize, empty: bool) -> Result<NodeId, DomError> {
        if self.stack.is_empty() && self.doc.document_element().is_some() {
            return Err(DomError::MultipleRoots {
                position: self.position_at(event_start + 1),
            });
        }
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let id = self.doc.alloc(NodeKind::Element, &name, "");
        self.doc.set_position(id, self.position_at(event_start + 1));
        self.doc.set_self_closing(id, empty);
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.syntax_error(err.to_string(), event_start))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| self.syntax_error(err.to_string(), event_start))?;
            if self.doc.attribute(id, &key).is_some() {
                return Err(self.syntax_error(format!("'{}' is a duplicate attribute name.", key), event_start + 1));
            }
            self.doc.push_attribute(id, Attribute::new(key, value.into_owned()));
        }
        self.attach(id)?;
        Ok(id)
    }

    fn text(&mut self, text: &str, event_start: usize) -> Result<(), DomError> {
        if text.is_empty() {
            return Ok(());
        }
        let id = if text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n')) {
            self.doc.create_whitespace(text, false)
        } else {
            self.outside_root_check(event_start)?;
            self.doc.create_text(text)
        };
        self.attach(id)
    }

    fn outside_root_check(&self, event_start: usize) -> Result<(), DomError> {
        if self.stack.is_empty() {
            return Err(DomError::TextOutsideRoot {
                position: self.position_at(event_start),
            });
        }
        Ok(())
    }
}

impl Document {
    /// Parses `source`, preserving whitespace, comments and the declaration.
    pub fn parse(source: &str) -> Result<Document, DomError> {
        DocumentBuilder::new(source).build()
    }
}

impl FromStr for Document {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::parse(s)
    }
}
