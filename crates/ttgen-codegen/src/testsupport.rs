//! Minimal stand-ins for the checker-owned `ValueNode`/`TemplateNode`/
//! `ReferenceNode` implementations, used only by unit tests in this crate.

use ttgen_core::ast_node::{
    ReferenceNode, StaticTypeInfo, StaticTypeKind, TemplateKind, TemplateNode, ValueNode,
};
use ttgen_core::{Expression, GenError, SourceLocation};

#[derive(Clone)]
pub struct MockValue {
    pub expr: String,
    pub kind: StaticTypeKind,
    pub const_bool: Option<bool>,
    pub const_int: Option<i64>,
    pub is_const: bool,
}

impl MockValue {
    pub fn new(expr: impl Into<String>) -> Self {
        MockValue {
            expr: expr.into(),
            kind: StaticTypeKind::Other,
            const_bool: None,
            const_int: None,
            is_const: false,
        }
    }

    pub fn boolean(expr: impl Into<String>) -> Self {
        MockValue {
            kind: StaticTypeKind::Boolean,
            ..MockValue::new(expr)
        }
    }

    pub fn integer(expr: impl Into<String>) -> Self {
        MockValue {
            kind: StaticTypeKind::Integer,
            ..MockValue::new(expr)
        }
    }

    pub fn const_bool(b: bool) -> Self {
        MockValue {
            const_bool: Some(b),
            is_const: true,
            ..MockValue::boolean(if b { "true" } else { "false" })
        }
    }

    pub fn const_int(n: i64) -> Self {
        MockValue {
            const_int: Some(n),
            is_const: true,
            ..MockValue::integer(n.to_string())
        }
    }

    pub fn boxed(self) -> Box<dyn ValueNode> {
        Box::new(self)
    }
}

/// Shorthand matching the name used by callers who only care about an
/// unresolved-at-compile-time boolean scrutinee (e.g. a union selector).
pub struct ConstBoolValue;

impl ConstBoolValue {
    pub fn unknown() -> Box<dyn ValueNode> {
        MockValue::boolean("sel").boxed()
    }
}

impl ValueNode for MockValue {
    fn static_type(&self) -> StaticTypeInfo {
        StaticTypeInfo {
            descriptor_name: "Mock".into(),
            kind: self.kind.clone(),
            done_extension: false,
            decode_match_descriptor: None,
        }
    }

    fn is_compile_time_const(&self) -> bool {
        self.is_const
    }

    fn const_fold_bool(&self) -> Option<bool> {
        self.const_bool
    }

    fn const_fold_int(&self) -> Option<i64> {
        self.const_int
    }

    fn single_expr_form(&self) -> Option<String> {
        Some(self.expr.clone())
    }

    fn generate(&self) -> Result<Expression, GenError> {
        Ok(Expression::value(self.expr.clone()))
    }

    fn location(&self) -> Option<SourceLocation> {
        None
    }
}

#[derive(Clone)]
pub struct MockTemplate {
    pub expr: String,
    pub kind: TemplateKind,
    pub static_kind: StaticTypeKind,
    pub decode_match: bool,
    pub decode_match_descriptor: Option<String>,
    pub decode_match_encoding: Option<String>,
}

impl MockTemplate {
    pub fn new(expr: impl Into<String>) -> Self {
        MockTemplate {
            expr: expr.into(),
            kind: TemplateKind::SpecificValue,
            static_kind: StaticTypeKind::Other,
            decode_match: false,
            decode_match_descriptor: None,
            decode_match_encoding: None,
        }
    }

    pub fn boxed(self) -> Box<dyn TemplateNode> {
        Box::new(self)
    }

    /// A `decode_match` template that decodes into `descriptor` using
    /// `encoding` (`None` for the statically-default encoding).
    pub fn decode_match_into(self, descriptor: impl Into<String>, encoding: Option<&str>) -> Box<dyn TemplateNode> {
        Box::new(MockTemplate {
            decode_match: true,
            decode_match_descriptor: Some(descriptor.into()),
            decode_match_encoding: encoding.map(str::to_string),
            ..self
        })
    }
}

impl TemplateNode for MockTemplate {
    fn static_type(&self) -> StaticTypeInfo {
        StaticTypeInfo {
            descriptor_name: "Mock".into(),
            kind: self.static_kind.clone(),
            done_extension: false,
            decode_match_descriptor: self.decode_match_descriptor.clone(),
        }
    }

    fn kind(&self) -> TemplateKind {
        self.kind
    }

    fn is_decode_match(&self) -> bool {
        self.decode_match
    }

    fn decode_match_encoding(&self) -> Option<String> {
        self.decode_match_encoding.clone()
    }

    fn generate(&self) -> Result<Expression, GenError> {
        Ok(Expression::value(self.expr.clone()))
    }

    fn location(&self) -> Option<SourceLocation> {
        None
    }
}

#[derive(Clone)]
pub struct MockRef {
    pub expr: String,
    pub kind: StaticTypeKind,
}

impl MockRef {
    pub fn new(expr: impl Into<String>) -> Self {
        MockRef {
            expr: expr.into(),
            kind: StaticTypeKind::Other,
        }
    }

    pub fn boxed(self) -> Box<dyn ReferenceNode> {
        Box::new(self)
    }
}

impl ReferenceNode for MockRef {
    fn static_type(&self) -> StaticTypeInfo {
        StaticTypeInfo {
            descriptor_name: "Mock".into(),
            kind: self.kind.clone(),
            done_extension: false,
            decode_match_descriptor: None,
        }
    }

    fn single_expr_form(&self) -> Option<String> {
        Some(self.expr.clone())
    }

    fn generate(&self) -> Result<Expression, GenError> {
        Ok(Expression::value(self.expr.clone()))
    }

    fn location(&self) -> Option<SourceLocation> {
        None
    }
}
