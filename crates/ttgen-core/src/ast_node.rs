//! Opaque externally-owned AST nodes (§3).
//!
//! Values, templates, and references are owned by the checker's AST, not by
//! this crate. The generator borrows them and asks each for exactly the
//! handful of facts §3 lists; it never inspects or mutates their internals.
//! `ttgen-codegen` is generic over these traits so a real checker's AST node
//! types can implement them without this crate depending on that AST.

use crate::error::GenError;
use crate::expr::Expression;
use crate::location::SourceLocation;

/// The generator-visible shape of a static type: just enough to drive the
/// dispatcher's non-obvious decisions (select-case switch-vs-cascade,
/// select-union's tag switch, the done-extension check, and the
/// decode-match redirect optimisation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTypeInfo {
    /// Name used in emitted type descriptors / class names.
    pub descriptor_name: String,
    pub kind: StaticTypeKind,
    /// Present iff this type can be produced by `X.done(template, redirect)`
    /// (§4.3 "Done type-check", property 7).
    pub done_extension: bool,
    /// If this type is reachable through a `decode_match` template, the
    /// descriptor name of the type it decodes into -- used by the redirect
    /// optimisation (property 8).
    pub decode_match_descriptor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticTypeKind {
    Integer,
    Boolean,
    CharString,
    UniversalCharString,
    Enumerated,
    Union { alternatives: Vec<String> },
    Component,
    AddressOfSut,
    Anytype,
    Other,
}

/// A value node: a literal, a computed expression, or a compile-time
/// constant, owned by the checker's AST.
pub trait ValueNode {
    fn static_type(&self) -> StaticTypeInfo;
    fn is_compile_time_const(&self) -> bool;
    /// `Some(b)` iff this value is a compile-time-constant boolean,
    /// used for guard constant-folding (§4.3 if/for/while, property 3).
    fn const_fold_bool(&self) -> Option<bool>;
    /// `Some(n)` iff this value is a compile-time-constant integer that
    /// fits the target's native integer width, for select-case's switch
    /// form (§4.3).
    fn const_fold_int(&self) -> Option<i64>;
    /// The node's own single-expression textual form, if it has one
    /// without any preamble/postamble.
    fn single_expr_form(&self) -> Option<String>;
    /// Full code generation: may populate preamble/postamble.
    fn generate(&self) -> Result<Expression, GenError>;
    fn location(&self) -> Option<SourceLocation>;
}

/// The six-kind template shape every emitted template class shares
/// (specific value, omit, any-value, any-or-omit, value-list,
/// complemented-list) — §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    SpecificValue,
    Omit,
    AnyValue,
    AnyOrOmit,
    ValueList,
    ComplementedList,
}

pub trait TemplateNode {
    fn static_type(&self) -> StaticTypeInfo;
    fn kind(&self) -> TemplateKind;
    /// `true` iff this template is a `decode_match` construct (Glossary).
    fn is_decode_match(&self) -> bool;
    /// For a `decode_match` template: the string-encoding expression used
    /// to re-encode before decode, if statically known.
    fn decode_match_encoding(&self) -> Option<String>;
    fn generate(&self) -> Result<Expression, GenError>;
    fn location(&self) -> Option<SourceLocation>;
}

/// A reference to a variable/port/timer/component, owned by the checker's
/// AST (used by redirects, `from`, `to`, `done`/`killed`/`timeout`).
pub trait ReferenceNode {
    fn static_type(&self) -> StaticTypeInfo;
    fn single_expr_form(&self) -> Option<String>;
    fn generate(&self) -> Result<Expression, GenError>;
    fn location(&self) -> Option<SourceLocation>;
}
