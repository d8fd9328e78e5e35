//! `CompilationUnit`: the four text sinks plus generator-owned state (§6).
//!
//! Directly analogous to the teacher's `CodeGen` struct in
//! `codegen/state.rs`: a handful of growable string buffers plus counters,
//! threaded through every `codegen_*` call as `&mut self` instead of the
//! source's mutable pointer-to-pointer sinks (§9 "Text sinks" redesign
//! note).

use ttgen_core::{GenOptions, TempIds, Warning};

/// The four named sinks a compilation unit writes into (§6).
pub struct CompilationUnit {
    /// All class declarations, in dependency order.
    pub class_defs: String,
    /// All method and free-function bodies.
    pub methods: String,
    /// Declarations of process-wide globals (erroneous-attribute descriptor
    /// pointers, registered converters).
    pub def_glob_vars: String,
    /// Initialisation fragments for those globals.
    pub src_glob_vars: String,

    pub(crate) ids: TempIds,
    pub options: GenOptions,
    pub warnings: Vec<Warning>,
}

impl CompilationUnit {
    pub fn new(options: GenOptions) -> Self {
        CompilationUnit {
            class_defs: String::new(),
            methods: String::new(),
            def_glob_vars: String::new(),
            src_glob_vars: String::new(),
            ids: TempIds::new(),
            options,
            warnings: Vec::new(),
        }
    }

    pub fn fresh_tmp(&mut self, prefix: &str) -> String {
        self.ids.fresh_tmp(prefix)
    }

    pub fn fresh_label(&mut self, prefix: &str) -> String {
        self.ids.fresh_label(prefix)
    }

    pub fn fresh_branch_id(&mut self) -> usize {
        self.ids.fresh_branch_id()
    }

    pub fn fresh_state_var(&mut self, prefix: &str) -> String {
        self.ids.fresh_state_var(prefix)
    }

    pub fn fresh_ilt_prefix(&mut self) -> String {
        self.ids.fresh_ilt_prefix()
    }

    pub fn warn(&mut self, message: impl Into<String>, location: Option<ttgen_core::SourceLocation>) {
        self.warnings.push(Warning::new(message, location));
    }
}

impl Default for CompilationUnit {
    fn default() -> Self {
        CompilationUnit::new(GenOptions::default())
    }
}
