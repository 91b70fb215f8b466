#![allow(dead_code)]

use xmloverlay::{Document, ErrorKind, TransformError, Transformer};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const XDT: &str = "http://schemas.microsoft.com/XML-Document-Transform";

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const ROOT_INDENT: &str = "                  ";
const BODY_INDENT: &str = "                    ";

/// Wraps `body` in a transform document rooted at `<a>` with the directive
/// namespace bound to `xdt`. The root element name sits at line 2, column 20 and
/// `body` starts at line 3 with its first element name at column 22.
pub fn transform_doc(body: &str) -> String {
    transform_doc_with_root("", body)
}

/// Like [`transform_doc`] with extra attributes on the root `<a>`.
pub fn transform_doc_with_root(root_attributes: &str, body: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n{ROOT_INDENT}<a xmlns:xdt=\"{XDT}\"{root_attributes}>\n{BODY_INDENT}{body}\n{ROOT_INDENT}</a>"
    )
}

/// Applies `transform` to `target` and returns the serialized target.
pub fn apply(target: &str, transform: &str) -> Result<String, TransformError> {
    init_logger();
    let mut doc = Document::parse(target)?;
    Transformer::new().apply(&mut doc, transform)?;
    Ok(doc.to_xml())
}

/// Applies a transform that must fail and returns its error.
pub fn apply_err(target: &str, transform: &str) -> TransformError {
    match apply(target, transform) {
        Ok(result) => panic!("transform succeeded unexpectedly: {}", result),
        Err(e) => e,
    }
}

/// Asserts both the kind and the full rendered message of a failed transform.
pub fn assert_fails(target: &str, transform: &str, kind: ErrorKind, message: &str) {
    let err = apply_err(target, transform);
    assert_eq!(err.kind(), Some(kind), "unexpected error: {}", err);
    assert_eq!(err.to_string(), message);
}
