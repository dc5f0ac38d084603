use indexmap::IndexMap;

use crate::backend::models::Value;

/// Static description of a wrapped operation.
///
/// Populated once at registration (or from the capability table) and served
/// directly by the forwarding wrapper; none of these fields depend on the
/// eventual result, so reading them never forces or forwards anything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    pub name: String,
    pub qualified_name: String,
    pub module: String,
    pub doc: Option<String>,
    /// Defaults of trailing positional parameters, in declaration order
    pub defaults: Vec<Value>,
    /// Defaults addressable by keyword
    pub keyword_defaults: IndexMap<String, Value>,
    /// Parameter name -> type annotation
    pub annotations: IndexMap<String, String>,
    pub code: CodeInfo,
    /// Names the body captures from its enclosing scope
    pub captures: Vec<String>,
}

/// Shape of the wrapped body
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeInfo {
    pub params: Vec<String>,
    pub variadic: bool,
}

impl CodeInfo {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Metadata {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Metadata {
            qualified_name: name.clone(),
            name,
            ..Default::default()
        }
    }

    pub fn with_qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.qualified_name = qualified_name.into();
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_params(mut self, params: Vec<String>) -> Self {
        self.code.params = params;
        self
    }
}
