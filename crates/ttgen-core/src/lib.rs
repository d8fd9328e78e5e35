//! ttgen-core: shared foundation for the protocol-testing-language code generator.
//!
//! This crate provides the primitives shared between the statement/ILT
//! generator (`ttgen-codegen`) and the runtime ABI surface it targets
//! (`ttgen-runtime-abi`):
//!
//! - `location`: source spans attached to every statement and AST node.
//! - `expr`: the `Expression` struct — the preamble/expr/postamble contract
//!   every sub-generator produces.
//! - `options`: `GenOptions`, the generation-time config bag (§6).
//! - `error`: the generator's error taxonomy (§7) — fatal logic errors,
//!   skip-on-semantic-error, and non-fatal warnings.
//! - `ast_node`: opaque traits for the externally-owned value/template/
//!   reference AST nodes the generator only ever borrows.
//! - `ident`: per-compilation-unit fresh-name generation (§9).

pub mod ast_node;
pub mod error;
pub mod expr;
pub mod ident;
pub mod location;
pub mod options;

pub use ast_node::{ReferenceNode, TemplateNode, ValueNode};
pub use error::{GenError, Warning};
pub use expr::Expression;
pub use ident::TempIds;
pub use location::SourceLocation;
pub use options::GenOptions;
