//! Overlay transforms for XML documents.
//!
//! A transform document mirrors the shape of a target document. Elements in it
//! carry `Transform` and `Locator` attributes in the directive namespace; each
//! Locator narrows a path through the target and each Transform edits what the
//! path selects. Untouched target markup, including whitespace and comments, is
//! written back as it was read.
//!
//! ```
//! let result = xmloverlay::transform_str(
//!     "<a><b key=\"abc\" value=\"def\" /></a>",
//!     r#"<a xmlns:xdt="http://schemas.microsoft.com/XML-Document-Transform">
//!          <b key="abc" value="ghi" xdt:Locator="Match(key)" xdt:Transform="SetAttributes(value)" />
//!        </a>"#,
//! )
//! .unwrap();
//! assert_eq!(result, "<a><b key=\"abc\" value=\"ghi\" /></a>");
//! ```

pub mod config;
pub mod directive;
pub mod engine;
pub mod error;
pub mod grammar;
pub mod locator;
pub mod mutator;
pub mod query;
pub mod stack;

pub use config::{DIRECTIVE_NAMESPACE, TransformerConfig};
pub use directive::{TransformKind, TransformSpec};
pub use engine::Transformer;
pub use error::{DirectiveError, ErrorKind, TransformError};
pub use locator::{Locator, LocatorKind};
pub use stack::LocatorStack;
pub use xmloverlay_dom::{Document, DomError, NodeId, TextPosition};

/// Applies `transform_source` to `target` with the default configuration.
pub fn apply_transform(target: &mut Document, transform_source: &str) -> Result<(), TransformError> {
    Transformer::new().apply(target, transform_source)
}

/// Parses `target_source`, applies the transform and returns the serialized result.
pub fn transform_str(target_source: &str, transform_source: &str) -> Result<String, TransformError> {
    let mut target = Document::parse(target_source)?;
    apply_transform(&mut target, transform_source)?;
    Ok(target.to_xml())
}
