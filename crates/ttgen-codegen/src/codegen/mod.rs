//! The statement/expression code generator (§4).
//!
//! Key concepts:
//! - **Expression contract** (`ttgen_core::expr::Expression`): every
//!   sub-generator returns `preamble; lhs = expr; postamble`, never a bare
//!   string, so callers can always splice setup/teardown around a value.
//! - **Four-sink model** (`state::CompilationUnit`): every emitter writes
//!   into `class_defs`/`methods`/`def_glob_vars`/`src_glob_vars`, never
//!   returns a whole-program string.
//! - **`Ctx`** (`context::Ctx`): the scope/loop/alt-nesting context threaded
//!   down through recursive emission instead of AST back-pointers (§9).
//! - **Interleave Lowering Transform** (`ilt`): the largest single piece —
//!   turns `interleave` (and any `alt` with an embedded receive) into an
//!   explicit state-vector-driven dispatch loop (§4.4).
//!
//! Module structure, in dependency order:
//! - `state`, `context` — shared generator state and scope context.
//! - `enums`, `funcref` — L1: the two small-type value/template emitters
//!   (§4.1, §4.2).
//! - `redirects` — value/parameter/index redirect emission, shared by
//!   `receive` and `comm`.
//! - `control_flow`, `comm`, `misc` — straightforward L2 statement kinds.
//! - `receive` — the standalone receive loop and matcher-argument tables.
//! - `alt`, `ilt` — standalone alt and the ILT branch/interleave form.
//! - `dispatch` — the top-level per-kind dispatcher (§4.3), the only module
//!   that needs to know every `StatementKind` variant.
//! - `program` — assembles a whole compilation unit from a checked module.

pub mod alt;
pub mod comm;
pub mod context;
pub mod control_flow;
pub mod dispatch;
pub mod enums;
pub mod funcref;
pub mod ilt;
pub mod misc;
pub mod program;
pub mod receive;
pub mod redirects;
pub mod state;

pub use context::Ctx;
pub use state::CompilationUnit;
