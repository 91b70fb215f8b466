//! The recursive walk over a transform document.
//!
//! Every element of the transform document is visited depth-first. Its Locator
//! joins the [`LocatorStack`] built by its ancestors, and if it carries a Transform
//! the composed path is evaluated against the target and the edit applied. Kinds
//! that consume the transform element's subtree stop the descent.

use crate::config::TransformerConfig;
use crate::directive::{TransformKind, TransformSpec};
use crate::error::{DirectiveError, ErrorKind, MutationError, TransformError};
use crate::grammar::DirectiveAttribute;
use crate::locator::Locator;
use crate::mutator::{self, CommentDirection, Insertion};
use crate::query::{self, Selected};
use crate::stack::LocatorStack;
use log::{debug, trace};
use xmloverlay_dom::{Document, NodeId};

/// Applies transform documents to target documents.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    config: TransformerConfig,
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TransformerConfig) -> Self {
        Transformer { config }
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Parses `transform_source` and applies its directives to `target` in place.
    ///
    /// Edits made before a failing directive are kept; the target is left as it
    /// was at the point of failure.
    pub fn apply(&self, target: &mut Document, transform_source: &str) -> Result<(), TransformError> {
        let transform = Document::parse(transform_source)?;
        self.apply_document(target, &transform)
    }

    /// Applies an already parsed transform document.
    pub fn apply_document(&self, target: &mut Document, transform: &Document) -> Result<(), TransformError> {
        let Some(root) = transform.document_element() else {
            return Err(TransformError::Document(xmloverlay_dom::DomError::MissingRoot));
        };
        debug!(
            "applying transform rooted at <{}> with directive namespace {}",
            transform.name(root),
            self.config.directive_namespace
        );
        let mut walk = Walk {
            transform,
            target,
            config: &self.config,
            applied: 0,
        };
        walk.visit(root, None)?;
        debug!("transform finished, {} directive(s) applied", walk.applied);
        Ok(())
    }
}

struct Walk<'t> {
    transform: &'t Document,
    target: &'t mut Document,
    config: &'t TransformerConfig,
    applied: usize,
}

impl Walk<'_> {
    fn visit(&mut self, element: NodeId, parent: Option<&LocatorStack<'_>>) -> Result<(), TransformError> {
        let spec = self.transform_spec(element)?;
        let locator = self.locator(element, spec.as_ref())?;
        let stack = match parent {
            Some(parent) => parent.push(locator),
            None => LocatorStack::root(locator),
        };

        let descend = match &spec {
            Some(spec) => {
                let path = stack.compose();
                trace!(
                    "<{}> at depth {}: {} against '{}'",
                    self.transform.name(element),
                    stack.depth(),
                    spec.kind,
                    path
                );
                self.apply(element, spec, &path)?;
                self.applied += 1;
                spec.kind.descends()
            }
            None => true,
        };

        if descend {
            let transform = self.transform;
            for child in transform.child_elements(element) {
                self.visit(child, Some(&stack))?;
            }
        }
        Ok(())
    }

    fn directive_value(&self, element: NodeId, attribute: DirectiveAttribute) -> Option<&str> {
        self.transform
            .find_attribute_ns(element, attribute.local_name(), &self.config.directive_namespace)
            .map(|attr| attr.value.as_str())
    }

    fn transform_spec(&self, element: NodeId) -> Result<Option<TransformSpec>, TransformError> {
        self.directive_value(element, DirectiveAttribute::Transform)
            .map(TransformSpec::parse)
            .transpose()
            .map_err(|e| self.directive_error(element, e))
    }

    fn locator(&self, element: NodeId, spec: Option<&TransformSpec>) -> Result<Locator, TransformError> {
        let name = self.transform.name(element);
        if let Some(spec) = spec {
            if matches!(spec.kind, TransformKind::InsertBefore | TransformKind::InsertAfter) {
                return Ok(Locator::xpath(spec.content.as_deref().unwrap_or_default()));
            }
        }
        match self.directive_value(element, DirectiveAttribute::Locator) {
            Some(value) => Locator::parse(value, name, self.transform.attributes(element))
                .map_err(|e| self.directive_error(element, e)),
            None if spec.is_some_and(|s| s.kind == TransformKind::Insert) => {
                Ok(Locator::implied_parent())
            }
            None => Ok(Locator::implied(name)),
        }
    }

    // --- Errors ---

    fn error(&self, element: NodeId, kind: ErrorKind, message: String) -> TransformError {
        let namespace = self.config.directive_namespace.as_str();
        let tag = self.transform.start_tag(element, |attr| {
            !(attr.prefix() == Some("xmlns") && attr.value == namespace)
        });
        TransformError::Directive {
            kind,
            message,
            element: tag,
            location: self.transform.position(element),
        }
    }

    fn directive_error(&self, element: NodeId, err: DirectiveError) -> TransformError {
        self.error(element, err.kind(), err.to_string())
    }

    fn mutation_error(&self, element: NodeId, err: MutationError) -> TransformError {
        match err {
            MutationError::RootElement => {
                self.error(element, ErrorKind::RootEditNotAllowed, err.to_string())
            }
            MutationError::Dom(dom) => TransformError::Document(dom),
        }
    }

    // --- Targets ---

    fn select(&self, element: NodeId, path: &str) -> Result<Vec<Selected>, TransformError> {
        query::select(self.target, path).map_err(|e| {
            self.error(
                element,
                ErrorKind::PathEvaluationFailed,
                format!(
                    "The Locator XPath '{}' for a Transform threw an exception ({})",
                    path, e
                ),
            )
        })
    }

    /// The first match when it is an element.
    fn find_target(&self, element: NodeId, path: &str) -> Result<Option<NodeId>, TransformError> {
        query::select_element(self.target, path).map_err(|e| {
            self.error(
                element,
                ErrorKind::PathEvaluationFailed,
                format!(
                    "The Locator XPath '{}' for a Transform threw an exception ({})",
                    path, e
                ),
            )
        })
    }

    fn require_target(&self, element: NodeId, path: &str, kind: TransformKind) -> Result<NodeId, TransformError> {
        self.find_target(element, path)?.ok_or_else(|| {
            let action = match kind {
                TransformKind::Insert => format!("Transform {}", kind),
                _ => "transform".to_string(),
            };
            self.error(
                element,
                ErrorKind::TargetNotFound,
                format!(
                    "The Locator XPath '{}' did not match an element in the target document, cannot apply {}",
                    path, action
                ),
            )
        })
    }

    // --- Application ---

    fn apply(&mut self, element: NodeId, spec: &TransformSpec, path: &str) -> Result<(), TransformError> {
        match spec.kind {
            TransformKind::Remove | TransformKind::RemoveAll => {
                let selected = self.select(element, path)?;
                let limit = if spec.kind == TransformKind::Remove { 1 } else { usize::MAX };
                let mut removed = 0;
                for item in selected.into_iter().take(limit) {
                    match item {
                        Selected::Node(id) if id != self.target.root() => {
                            self.target.detach(id);
                            removed += 1;
                        }
                        Selected::Attribute { owner, name } => {
                            self.target.remove_attribute(owner, &name);
                            removed += 1;
                        }
                        Selected::Node(_) => {}
                    }
                }
                debug!("{} removed {} node(s) matching '{}'", spec.kind, removed, path);
            }
            TransformKind::Insert => {
                let parent = self.require_target(element, path, spec.kind)?;
                let copy = self.clone_element(element);
                mutator::insert(self.target, copy, parent, Insertion::Append, &self.config.indent_unit)
                    .map_err(|e| self.mutation_error(element, e))?;
                debug!("{} appended <{}>", spec.kind, self.transform.name(element));
            }
            TransformKind::Replace => {
                let old = self.require_target(element, path, spec.kind)?;
                let copy = self.clone_element(element);
                let at_root = self
                    .target
                    .parent(old)
                    .is_some_and(|parent| parent == self.target.root());
                let result = if at_root {
                    mutator::replace_document(self.target, copy)
                } else {
                    mutator::replace_node(self.target, old, copy)
                };
                result.map_err(|e| self.mutation_error(element, e))?;
                debug!("{} replaced '{}'", spec.kind, path);
            }
            TransformKind::InsertBefore | TransformKind::InsertAfter => {
                let anchor = self.require_target(element, path, spec.kind)?;
                let copy = self.clone_element(element);
                let insertion = if spec.kind == TransformKind::InsertBefore {
                    Insertion::Before
                } else {
                    Insertion::After
                };
                mutator::insert(self.target, copy, anchor, insertion, &self.config.indent_unit)
                    .map_err(|e| self.mutation_error(element, e))?;
                debug!("{} placed <{}>", spec.kind, self.transform.name(element));
            }
            TransformKind::Comment => {
                let anchor = self.require_target(element, path, spec.kind)?;
                let comment = mutator::create_comment(self.target, spec.content.as_deref().unwrap_or_default());
                mutator::insert(self.target, comment, anchor, Insertion::Before, &self.config.indent_unit)
                    .map_err(|e| self.mutation_error(element, e))?;
                debug!("{} added before '{}'", spec.kind, path);
            }
            TransformKind::RemovePreviousComment | TransformKind::RemoveFollowingComment => {
                let direction = if spec.kind == TransformKind::RemovePreviousComment {
                    CommentDirection::Previous
                } else {
                    CommentDirection::Following
                };
                if let Some(node) = self.find_target(element, path)? {
                    let removed = mutator::remove_adjacent_comment(self.target, node, direction);
                    debug!("{} removed a comment: {}", spec.kind, removed);
                }
            }
            TransformKind::RemoveAttributes => {
                let node = self.require_target(element, path, spec.kind)?;
                let names = spec.attribute_names().unwrap_or_default();
                let removed = mutator::remove_attributes(self.target, node, names);
                debug!("{} removed {} attribute(s)", spec.kind, removed);
            }
            TransformKind::SetAttributes => {
                let node = self.require_target(element, path, spec.kind)?;
                let transform = self.transform;
                let namespace = self.config.directive_namespace.as_str();
                let values: Vec<(&str, &str)> = match spec.attribute_names() {
                    None => transform
                        .attributes(element)
                        .iter()
                        .filter(|attr| !mutator::is_directive_attribute(transform, element, attr, namespace))
                        .map(|attr| (attr.name.as_str(), attr.value.as_str()))
                        .collect(),
                    Some(names) => {
                        let mut values = Vec::with_capacity(names.len());
                        for name in names {
                            let value = transform.attribute(element, name).ok_or_else(|| {
                                self.error(
                                    element,
                                    ErrorKind::UnknownAttribute,
                                    format!(
                                        "Transform {} specifies a nonexistent attribute: '{}'",
                                        spec.kind, name
                                    ),
                                )
                            })?;
                            values.push((name.as_str(), value));
                        }
                        values
                    }
                };
                debug!("{} writing {} attribute(s)", spec.kind, values.len());
                mutator::set_attributes(self.target, node, values);
            }
        }
        Ok(())
    }

    fn clone_element(&mut self, element: NodeId) -> NodeId {
        mutator::clone_stripped(
            self.target,
            self.transform,
            element,
            &self.config.directive_namespace,
        )
    }
}
