//! Runtime ABI entry-point table.
//!
//! Modeled directly on the teacher's `codegen/runtime.rs`
//! `RUNTIME_DECLARATIONS`: a single `static` table instead of duplicated
//! `writeln!` calls scattered across the dispatcher, so the generator and
//! any consumer (docs, tests) share one source of truth for the exact
//! names §6 requires to be emitted verbatim.

use std::sync::LazyLock;

/// One runtime ABI entry point: its verbatim call-site name, a short
/// signature comment, and the category it is grouped under (§6).
pub struct AbiDecl {
    pub name: &'static str,
    pub signature: &'static str,
    pub category: &'static str,
}

pub static RUNTIME_DECLARATIONS: LazyLock<Vec<AbiDecl>> = LazyLock::new(|| {
    vec![
        // Snapshot
        AbiDecl {
            name: "TTCN_Snapshot::take_new",
            signature: "fn take_new(blocking: bool)",
            category: "snapshot",
        },
        // Default altsteps
        AbiDecl {
            name: "TTCN_Default::try_altsteps",
            signature: "fn try_altsteps() -> alt_status",
            category: "default-altstep",
        },
        AbiDecl {
            name: "TTCN_Default::deactivate_all_current",
            signature: "fn deactivate_all_current()",
            category: "default-altstep",
        },
        AbiDecl {
            name: "TTCN_Default::activate",
            signature: "fn activate(altstep: &dyn AltstepFn) -> DefaultHandle",
            category: "default-altstep",
        },
        // Runtime lifecycle
        AbiDecl {
            name: "TTCN_Runtime::stop_execution",
            signature: "fn stop_execution()",
            category: "lifecycle",
        },
        AbiDecl {
            name: "TTCN_Runtime::stop_component",
            signature: "fn stop_component(compref: ComponentRef)",
            category: "lifecycle",
        },
        AbiDecl {
            name: "TTCN_Runtime::kill_component",
            signature: "fn kill_component(compref: ComponentRef)",
            category: "lifecycle",
        },
        AbiDecl {
            name: "TTCN_Runtime::component_done",
            signature: "fn component_done(compref: ComponentRef) -> alt_status",
            category: "lifecycle",
        },
        AbiDecl {
            name: "TTCN_Runtime::component_killed",
            signature: "fn component_killed(compref: ComponentRef) -> alt_status",
            category: "lifecycle",
        },
        AbiDecl {
            name: "TTCN_Runtime::setverdict",
            signature: "fn setverdict(verdict: Verdict, reason: Option<&str>)",
            category: "verdict",
        },
        AbiDecl {
            name: "TTCN_Runtime::set_port_state",
            signature: "fn set_port_state(port: &Port, state: PortState, reason: Option<&str>, silent: bool)",
            category: "port",
        },
        // Ports
        AbiDecl {
            name: "PORT::all_start",
            signature: "fn all_start()",
            category: "any-port",
        },
        AbiDecl {
            name: "PORT::all_stop",
            signature: "fn all_stop()",
            category: "any-port",
        },
        AbiDecl {
            name: "PORT::any_receive",
            signature: "fn any_receive(from: Option<&Template>, sender_redirect: Option<&mut dyn ValueRedirect>, index_redirect: Option<&mut dyn IndexRedirect>) -> alt_status",
            category: "any-port",
        },
        AbiDecl {
            name: "PORT::any_check_receive",
            signature: "fn any_check_receive(from: Option<&Template>) -> alt_status",
            category: "any-port",
        },
        // Errors (§7)
        AbiDecl {
            name: "TTCN_error",
            signature: "fn ttcn_error(fmt: &str, args: &[&dyn Display])",
            category: "error",
        },
        AbiDecl {
            name: "TTCN_EncDec_ErrorContext::error",
            signature: "fn enc_dec_error(kind: EncDecErrorKind, fmt: &str, args: &[&dyn Display])",
            category: "error",
        },
        // Debugger
        AbiDecl {
            name: "TTCN3_Debug_Scope",
            signature: "struct DebugScope::new(name: &str)",
            category: "debugger",
        },
        AbiDecl {
            name: "DEBUGGER_STORE_RETURN_VALUE",
            signature: "macro store_return_value!(tmp, expr)",
            category: "debugger",
        },
    ]
});

/// Look up a declaration by its verbatim emitted name.
pub fn find(name: &str) -> Option<&'static AbiDecl> {
    RUNTIME_DECLARATIONS.iter().find(|d| d.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_declaration_has_a_category() {
        for decl in RUNTIME_DECLARATIONS.iter() {
            assert!(!decl.category.is_empty(), "{} missing category", decl.name);
        }
    }

    #[test]
    fn take_new_is_declared() {
        assert!(find("TTCN_Snapshot::take_new").is_some());
    }
}
