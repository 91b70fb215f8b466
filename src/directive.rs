//! Transform directives: what a transform element does to its target.

use crate::error::DirectiveError;
use crate::grammar::{DirectiveAttribute, parse_directive, split_names};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Replace,
    Insert,
    InsertBefore,
    InsertAfter,
    Remove,
    RemoveAll,
    RemoveAttributes,
    SetAttributes,
    Comment,
    RemovePreviousComment,
    RemoveFollowingComment,
}

impl TransformKind {
    pub const ALL: [TransformKind; 11] = [
        TransformKind::Replace,
        TransformKind::Insert,
        TransformKind::InsertBefore,
        TransformKind::InsertAfter,
        TransformKind::Remove,
        TransformKind::RemoveAll,
        TransformKind::RemoveAttributes,
        TransformKind::SetAttributes,
        TransformKind::Comment,
        TransformKind::RemovePreviousComment,
        TransformKind::RemoveFollowingComment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TransformKind::Replace => "Replace",
            TransformKind::Insert => "Insert",
            TransformKind::InsertBefore => "InsertBefore",
            TransformKind::InsertAfter => "InsertAfter",
            TransformKind::Remove => "Remove",
            TransformKind::RemoveAll => "RemoveAll",
            TransformKind::RemoveAttributes => "RemoveAttributes",
            TransformKind::SetAttributes => "SetAttributes",
            TransformKind::Comment => "Comment",
            TransformKind::RemovePreviousComment => "RemovePreviousComment",
            TransformKind::RemoveFollowingComment => "RemoveFollowingComment",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Whether the walk continues into the transform element's children after
    /// this kind is applied. Kinds that copy or delete the element's subtree stop.
    pub fn descends(self) -> bool {
        !matches!(
            self,
            TransformKind::Replace
                | TransformKind::Insert
                | TransformKind::Remove
                | TransformKind::RemoveAll
        )
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed Transform attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSpec {
    pub kind: TransformKind,
    /// The raw argument text, present whenever parentheses were written.
    pub content: Option<String>,
    /// `content` split into attribute names.
    pub attributes: Option<Vec<String>>,
}

impl TransformSpec {
    pub fn parse(value: &str) -> Result<Self, DirectiveError> {
        let directive = parse_directive(value, DirectiveAttribute::Transform)?;
        let kind = TransformKind::from_name(directive.name)
            .ok_or_else(|| DirectiveError::UnknownTransformKind(directive.name.to_string()))?;
        let content = directive.args.map(str::to_string);
        let attributes = directive.args.map(split_names);
        let has_content = content.as_deref().is_some_and(|c| !c.is_empty());

        match kind {
            TransformKind::Comment if !has_content => {
                return Err(DirectiveError::EmptyTransformArgument {
                    kind,
                    what: "argument",
                });
            }
            TransformKind::Comment => {
                let text = content.as_deref().unwrap_or_default();
                if text.contains("--") || text.ends_with('-') {
                    return Err(DirectiveError::InvalidCommentText(text.to_string()));
                }
            }
            TransformKind::InsertBefore | TransformKind::InsertAfter if !has_content => {
                return Err(DirectiveError::EmptyTransformArgument {
                    kind,
                    what: "XPath argument",
                });
            }
            TransformKind::RemoveAttributes
                if attributes.as_ref().is_none_or(|names| names.is_empty()) =>
            {
                return Err(DirectiveError::EmptyAttributeList(kind));
            }
            _ => {}
        }

        Ok(TransformSpec {
            kind,
            content,
            attributes,
        })
    }

    /// The explicit attribute-name list, if one with at least one name was given.
    pub fn attribute_names(&self) -> Option<&[String]> {
        self.attributes
            .as_deref()
            .filter(|names| !names.is_empty())
    }
}
