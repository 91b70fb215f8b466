use crate::directive::TransformKind;
use crate::grammar::DirectiveAttribute;
use thiserror::Error;
use xmloverlay_dom::{DomError, TextPosition};

/// The category of a failed directive, independent of its message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedDirective,
    UnknownLocatorKind,
    UnknownTransformKind,
    EmptyArgument,
    EmptyArgumentList,
    UnknownAttribute,
    TargetNotFound,
    PathEvaluationFailed,
    RootEditNotAllowed,
}

/// Failures found while reading a single directive value, before any node context
/// is attached.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectiveError {
    #[error("Invalid {attribute} value '{value}', does not include an open parenthesis")]
    MissingOpenParenthesis {
        attribute: DirectiveAttribute,
        value: String,
    },

    #[error("Invalid {attribute} value '{value}', does not end with a close parenthesis")]
    MissingCloseParenthesis {
        attribute: DirectiveAttribute,
        value: String,
    },

    #[error("Invalid Locator value '{0}', must be Match, Condition or Xpath")]
    UnknownLocatorKind(String),

    #[error("Invalid Transform type: {0}")]
    UnknownTransformKind(String),

    /// `what` reads "a condition" or "an xpath".
    #[error("Invalid Locator value '{value}', does not specify {what}")]
    EmptyLocatorArgument { value: String, what: &'static str },

    #[error("Invalid Locator value '{0}', does not specify any attribute names")]
    EmptyMatchList(String),

    #[error("Transform {kind} cannot have an empty {what}")]
    EmptyTransformArgument {
        kind: TransformKind,
        what: &'static str,
    },

    #[error("Transform {0} cannot have an empty list of attributes")]
    EmptyAttributeList(TransformKind),

    #[error("Match Locator specified a nonexistent attribute: '{0}'")]
    UnknownMatchAttribute(String),

    #[error("Transform Comment text '{0}' cannot contain '--' or end with '-'")]
    InvalidCommentText(String),
}

impl DirectiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DirectiveError::MissingOpenParenthesis { .. }
            | DirectiveError::MissingCloseParenthesis { .. }
            | DirectiveError::InvalidCommentText(_) => ErrorKind::MalformedDirective,
            DirectiveError::UnknownLocatorKind(_) => ErrorKind::UnknownLocatorKind,
            DirectiveError::UnknownTransformKind(_) => ErrorKind::UnknownTransformKind,
            DirectiveError::EmptyLocatorArgument { .. }
            | DirectiveError::EmptyTransformArgument { .. } => ErrorKind::EmptyArgument,
            DirectiveError::EmptyMatchList(_) | DirectiveError::EmptyAttributeList(_) => {
                ErrorKind::EmptyArgumentList
            }
            DirectiveError::UnknownMatchAttribute(_) => ErrorKind::UnknownAttribute,
        }
    }
}

/// Failures of the low-level edits performed on the target document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Cannot apply transform to root element")]
    RootElement,

    #[error(transparent)]
    Dom(#[from] DomError),
}

fn location_suffix(location: &Option<TextPosition>) -> String {
    match location {
        Some(position) => format!(" ({})", position),
        None => String::new(),
    }
}

/// The error returned by a transform call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// The target or transform text is not well-formed XML.
    #[error(transparent)]
    Document(#[from] DomError),

    /// A directive could not be read or applied. `element` is the opening tag of
    /// the transform element that carried it.
    #[error("{message} on element {element}{}", location_suffix(.location))]
    Directive {
        kind: ErrorKind,
        message: String,
        element: String,
        location: Option<TextPosition>,
    },
}

impl TransformError {
    /// `None` for documents that failed to parse.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            TransformError::Document(_) => None,
            TransformError::Directive { kind, .. } => Some(*kind),
        }
    }
}
