//! The shared `Name` / `Name(args)` syntax of directive attribute values.

use crate::error::DirectiveError;
use std::fmt;

/// The two directive attributes a transform element may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveAttribute {
    Transform,
    Locator,
}

impl DirectiveAttribute {
    /// Local name of the attribute inside the directive namespace.
    pub fn local_name(self) -> &'static str {
        match self {
            DirectiveAttribute::Transform => "Transform",
            DirectiveAttribute::Locator => "Locator",
        }
    }
}

impl fmt::Display for DirectiveAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

/// A directive value split into its name and raw argument text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'v> {
    pub name: &'v str,
    /// Everything between the first `(` and the final `)`, untrimmed.
    pub args: Option<&'v str>,
}

impl Directive<'_> {
    /// Case-insensitive comparison of the directive name.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Splits a trimmed directive value. A value without `(` is a bare name; a value
/// with one must end with `)`.
pub fn parse_directive(
    value: &str,
    attribute: DirectiveAttribute,
) -> Result<Directive<'_>, DirectiveError> {
    let value = value.trim();
    let Some(open) = value.find('(') else {
        return Ok(Directive {
            name: value,
            args: None,
        });
    };
    if !value.ends_with(')') {
        return Err(DirectiveError::MissingCloseParenthesis {
            attribute,
            value: value.to_string(),
        });
    }
    Ok(Directive {
        name: value[..open].trim(),
        args: Some(&value[open + 1..value.len() - 1]),
    })
}

/// Comma-separated names with surrounding blanks removed and empty entries dropped.
pub fn split_names(args: &str) -> Vec<String> {
    args.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
