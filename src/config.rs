/// The namespace that marks `Transform` and `Locator` attributes as directives.
pub const DIRECTIVE_NAMESPACE: &str = "http://schemas.microsoft.com/XML-Document-Transform";

/// Settings for a [`Transformer`](crate::Transformer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformerConfig {
    /// Directives are recognised by this namespace URI, whatever prefix binds it.
    pub directive_namespace: String,
    /// Extra indentation given to nodes appended by `Insert`.
    pub indent_unit: String,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        TransformerConfig {
            directive_namespace: DIRECTIVE_NAMESPACE.to_string(),
            indent_unit: "  ".to_string(),
        }
    }
}

impl TransformerConfig {
    pub fn with_directive_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.directive_namespace = namespace.into();
        self
    }

    pub fn with_indent_unit(mut self, indent_unit: impl Into<String>) -> Self {
        self.indent_unit = indent_unit.into();
        self
    }
}
