//! Locator directives: how a transform element picks its target nodes.

use crate::error::DirectiveError;
use crate::grammar::{DirectiveAttribute, parse_directive, split_names};
use xmloverlay_dom::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorKind {
    /// No Locator attribute; the element name alone selects.
    Implied,
    Match,
    Condition,
    XPath,
}

/// A resolved locator and the path fragment it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub kind: LocatorKind,
    pub path: String,
}

impl Locator {
    /// `/name`, used when no Locator attribute is present.
    pub fn implied(element_name: &str) -> Self {
        Locator {
            kind: LocatorKind::Implied,
            path: format!("/{}", element_name),
        }
    }

    /// An implied locator that adds nothing to the path. An Insert without a
    /// Locator targets the parent, so its own name must not appear.
    pub fn implied_parent() -> Self {
        Locator {
            kind: LocatorKind::Implied,
            path: String::new(),
        }
    }

    pub fn xpath(expr: &str) -> Self {
        Locator {
            kind: LocatorKind::XPath,
            path: expr.to_string(),
        }
    }

    /// Parses a Locator attribute value found on the element `element_name`, whose
    /// attributes supply the values for `Match`.
    pub fn parse(
        value: &str,
        element_name: &str,
        attributes: &[Attribute],
    ) -> Result<Self, DirectiveError> {
        let directive = parse_directive(value, DirectiveAttribute::Locator)?;
        let Some(args) = directive.args else {
            return Err(DirectiveError::MissingOpenParenthesis {
                attribute: DirectiveAttribute::Locator,
                value: directive.name.to_string(),
            });
        };
        let args = args.trim();
        let value = value.trim();

        if directive.is("Match") {
            let names = split_names(args);
            if names.is_empty() {
                return Err(DirectiveError::EmptyMatchList(value.to_string()));
            }
            let mut predicates = Vec::with_capacity(names.len());
            for name in &names {
                let attribute = attributes
                    .iter()
                    .find(|a| &a.name == name)
                    .ok_or_else(|| DirectiveError::UnknownMatchAttribute(name.clone()))?;
                predicates.push(format!("@{}={}", name, xpath_literal(&attribute.value)));
            }
            Ok(Locator {
                kind: LocatorKind::Match,
                path: format!("/{}[{}]", element_name, predicates.join(" and ")),
            })
        } else if directive.is("Condition") {
            if args.is_empty() {
                return Err(DirectiveError::EmptyLocatorArgument {
                    value: value.to_string(),
                    what: "a condition",
                });
            }
            Ok(Locator {
                kind: LocatorKind::Condition,
                path: format!("/{}[{}]", element_name, args),
            })
        } else if directive.is("XPath") {
            if args.is_empty() {
                return Err(DirectiveError::EmptyLocatorArgument {
                    value: value.to_string(),
                    what: "an xpath",
                });
            }
            Ok(Locator::xpath(args))
        } else {
            Err(DirectiveError::UnknownLocatorKind(value.to_string()))
        }
    }
}

/// Quotes `value` as an XPath string literal. Values holding both quote
/// characters are assembled with `concat()`.
fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
