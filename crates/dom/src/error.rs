use thiserror::Error;

/// A 1-based line/column position in the parsed source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextPosition {
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for TextPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

impl From<(usize, usize)> for TextPosition {
    fn from((line, col): (usize, usize)) -> Self {
        TextPosition { line, col }
    }
}

/// Converts a byte offset into `source` into a line/column pair.
pub fn get_line_col_from_pos(source: &str, pos: usize) -> (usize, usize) {
    let pos = pos.min(source.len());
    let before = source.get(..pos).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let col = match before.rfind('\n') {
        Some(last_nl) => before[last_nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, col)
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("{message} Line {}, position {}.", position.line, position.col)]
    Syntax {
        message: String,
        position: TextPosition,
    },

    #[error(
        "The '{start}' start tag on line {} position {} does not match the end tag of '{end}'. Line {}, position {}.",
        start_position.line,
        start_position.col,
        end_position.line,
        end_position.col
    )]
    MismatchedEndTag {
        start: String,
        start_position: TextPosition,
        end: String,
        end_position: TextPosition,
    },

    #[error("Unexpected end tag '{name}'. Line {}, position {}.", position.line, position.col)]
    UnexpectedEndTag { name: String, position: TextPosition },

    #[error("Unexpected end of file. The following elements are not closed: {0}.")]
    UnclosedElements(String),

    #[error("Root element is missing.")]
    MissingRoot,

    #[error("There are multiple root elements. Line {}, position {}.", position.line, position.col)]
    MultipleRoots { position: TextPosition },

    #[error("Data at the root level is invalid. Line {}, position {}.", position.line, position.col)]
    TextOutsideRoot { position: TextPosition },

    #[error("The node '{0}' has no parent to insert next to.")]
    NoParent(String),

    #[error("The node '{0}' cannot be inserted into its own subtree.")]
    HierarchyRequest(String),
}
