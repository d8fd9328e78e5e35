//! ttgen-runtime-abi: the fixed runtime ABI generated code calls into (§6).
//!
//! This crate does **not** implement the runtime (ports, timers, the
//! component scheduler, the snapshot loop are the checker/runtime team's
//! responsibility, per `spec.md` §1's explicit non-goals for this back-end).
//! It exists only to:
//!
//! 1. Give the generator a single, data-driven place to look up the exact
//!    name and calling convention of each ABI entry point it emits calls to
//!    (`decls`), the same way the teacher's `codegen/runtime.rs` centralises
//!    `RUNTIME_DECLARATIONS` instead of scattering `writeln!` calls.
//! 2. Provide a small in-memory reference simulation (`sim`) used only by
//!    `ttgen-codegen`'s integration tests, so a generated call sequence can
//!    be sanity-checked against *some* runtime without requiring the real
//!    one (spec.md §8: "round-trip building the generated source with a
//!    reference runtime stub").

pub mod decls;
pub mod sim;

pub use decls::{AbiDecl, RUNTIME_DECLARATIONS};
