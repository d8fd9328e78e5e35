//! Standalone alt (§4.5): an alt with no receiving statement embedded in
//! any branch body. When any branch does embed a receiving statement, the
//! ILT branch form (`codegen::ilt`) is used instead (§4.3 "alt").

use std::fmt::Write as _;

use ttgen_core::GenError;

use crate::ast::{AltGuard, AltGuardTag, AltStmt};

use super::context::Ctx;
use super::dispatch::emit_block;
use super::state::CompilationUnit;

/// `true` iff no branch body contains a statement that itself suspends
/// (conservatively: any receiving-kind statement or nested alt/interleave).
pub fn is_standalone(stmt: &AltStmt) -> bool {
    stmt.branches.iter().all(|b| !block_has_receive(&b.body))
}

fn block_has_receive(block: &crate::ast::StatementBlock) -> bool {
    use crate::ast::StatementKind::*;
    block.statements.iter().any(|s| {
        matches!(
            s.kind,
            Receive(_)
                | Trigger(_)
                | CheckReceive(_)
                | Getcall(_)
                | CheckGetcall(_)
                | Getreply(_)
                | CheckGetreply(_)
                | Catch(_)
                | CheckCatch(_)
                | Check(_)
                | Done(_)
                | Killed(_)
                | Timeout(_)
                | Alt(_)
                | Interleave(_)
        )
    })
}

fn any_guard_can_repeat(branches: &[AltGuard]) -> bool {
    branches.iter().any(|b| match &b.tag {
        AltGuardTag::OpGuard | AltGuardTag::AltstepRef { .. } | AltGuardTag::Invoke { .. } => true,
        AltGuardTag::Else => false,
    })
}

/// One guard-evaluation phase shared between a standalone alt iteration and
/// an altstep body branch. Returns the generated text plus the flag
/// variable name it assigned.
///
/// A receiving guard op contributes a single matcher-invocation assignment
/// here, not a full statement emission: the enclosing `for(;;)` (in
/// `emit_standalone_alt`/the altstep body) is already the polling loop, so
/// wrapping the op in its own standalone receive loop would block inside
/// one branch and never write a result to `flag` for the others to see.
pub(crate) fn emit_branch_check(
    cu: &mut CompilationUnit,
    flag: &str,
    guard: &AltGuard,
) -> Result<String, GenError> {
    let mut out = String::new();
    writeln!(out, "if ({flag} == ALT_UNCHECKED) {{")?;
    if let Some(cond) = &guard.guard_expr {
        let e = cond.generate()?;
        out.push_str(&e.preamble);
        writeln!(out, "  {flag} = ({}) ? ALT_MAYBE : ALT_NO;", e.expr)?;
        out.push_str(&e.postamble);
    } else {
        writeln!(out, "  {flag} = ALT_MAYBE;")?;
    }
    writeln!(out, "}}")?;

    match &guard.tag {
        AltGuardTag::Else => {}
        AltGuardTag::OpGuard => {
            if let Some(op) = &guard.operation {
                match super::receive::build_matcher_for_guard_op(cu, op)? {
                    Some((op_pre, matcher_expr, _can_repeat)) => {
                        out.push_str(&op_pre);
                        writeln!(out, "if ({flag} == ALT_MAYBE) {flag} = {matcher_expr};")?;
                    }
                    None => {
                        writeln!(out, "if ({flag} == ALT_MAYBE) {{")?;
                        out.push_str(&super::dispatch::emit_statement(cu, &Ctx::root(), op)?);
                        writeln!(out, "}}")?;
                    }
                }
            }
        }
        AltGuardTag::AltstepRef { name, args } => {
            let arglist = render_args(args)?;
            writeln!(out, "if ({flag} == ALT_MAYBE) {flag} = {name}({arglist});")?;
        }
        AltGuardTag::Invoke { funcref, args } => {
            let f = funcref.generate()?;
            let arglist = render_args(args)?;
            writeln!(out, "if ({flag} == ALT_MAYBE) {flag} = {}.invoke({arglist});", f.expr)?;
        }
    }
    Ok(out)
}

pub(crate) fn render_args(args: &[crate::ast::ValBox]) -> Result<String, GenError> {
    let mut parts = Vec::with_capacity(args.len());
    for a in args {
        parts.push(a.generate()?.expr);
    }
    Ok(parts.join(", "))
}

/// Emits a standalone alt as a statement (§4.5).
pub fn emit_standalone_alt(cu: &mut CompilationUnit, ctx: &Ctx, stmt: &AltStmt) -> Result<String, GenError> {
    let has_else = stmt.branches.iter().any(|b| matches!(b.tag, AltGuardTag::Else));
    let needs_top_label = any_guard_can_repeat(&stmt.branches);
    let end_label = cu.fresh_label("Alt_end");
    let loop_ctx = ctx.enter_alt(Some(end_label.clone()));

    let mut out = String::new();
    writeln!(out, "{{")?;
    for (i, _) in stmt.branches.iter().enumerate() {
        let init = if stmt.branches[i].guard_expr.is_some() {
            "ALT_UNCHECKED"
        } else {
            "ALT_MAYBE"
        };
        writeln!(out, "alt_status __af_{i} = {init};")?;
    }
    if !has_else {
        writeln!(out, "alt_status __af_default = ALT_MAYBE;")?;
    }

    let top_label = cu.fresh_label("Alt_top");
    if needs_top_label {
        writeln!(out, "{top_label}:")?;
    }
    writeln!(out, "for (;;) {{")?;

    for (i, guard) in stmt.branches.iter().enumerate() {
        let flag = format!("__af_{i}");
        out.push_str(&emit_branch_check(cu, &flag, guard)?);
        writeln!(out, "if ({flag} == ALT_YES) {{")?;
        out.push_str(&emit_block(cu, &loop_ctx, &guard.body)?);
        writeln!(out, "  goto {end_label};")?;
        writeln!(out, "}}")?;
        if needs_top_label {
            writeln!(out, "if ({flag} == ALT_REPEAT) goto {top_label};")?;
        }
    }

    if has_else {
        let else_guard = stmt
            .branches
            .iter()
            .find(|b| matches!(b.tag, AltGuardTag::Else))
            .expect("has_else checked above");
        out.push_str(&emit_block(cu, &loop_ctx, &else_guard.body)?);
        writeln!(out, "goto {end_label};")?;
    } else {
        writeln!(out, "if (__af_default == ALT_MAYBE) {{")?;
        writeln!(out, "  __af_default = TTCN_Default::try_altsteps();")?;
        writeln!(out, "  if (__af_default == ALT_YES || __af_default == ALT_BREAK) goto {end_label};")?;
        if needs_top_label {
            writeln!(out, "  if (__af_default == ALT_REPEAT) goto {top_label};")?;
        }
        writeln!(out, "}}")?;
        let all_flags = (0..stmt.branches.len())
            .map(|i| format!("__af_{i} == ALT_NO"))
            .chain(std::iter::once("__af_default == ALT_NO".to_string()))
            .collect::<Vec<_>>()
            .join(" && ");
        writeln!(out, "if ({all_flags})")?;
        writeln!(
            out,
            "  TTCN_error(\"no-branch-chosen: none of the branches can be chosen\");"
        )?;
        writeln!(out, "TTCN_Snapshot::take_new(TRUE);")?;
    }

    writeln!(out, "}}")?;
    writeln!(out, "{end_label}:;")?;
    writeln!(out, "}}")?;
    Ok(out)
}

/// Emits an altstep body (§4.5): each branch's `YES` path `return`s
/// `ALT_YES`, `REPEAT` paths `return ALT_REPEAT`, `BREAK` paths
/// `return ALT_BREAK`; a default-slot-less altstep returns a cached
/// `ret_val`, the OR-reduction of the branches' `MAYBE` flags.
pub fn emit_altstep_body(cu: &mut CompilationUnit, ctx: &Ctx, stmt: &AltStmt) -> Result<String, GenError> {
    let altstep_ctx = ctx.enter_altstep();
    let mut out = String::new();
    writeln!(out, "alt_status ret_val = ALT_NO;")?;

    for (i, guard) in stmt.branches.iter().enumerate() {
        let flag = format!("__af_{i}");
        writeln!(out, "alt_status {flag} = {};", if guard.guard_expr.is_some() { "ALT_UNCHECKED" } else { "ALT_MAYBE" })?;
        out.push_str(&emit_branch_check(cu, &flag, guard)?);
        writeln!(out, "if ({flag} == ALT_REPEAT) return ALT_REPEAT;")?;
        writeln!(out, "if ({flag} == ALT_YES) {{")?;
        out.push_str(&emit_block(cu, &altstep_ctx, &guard.body)?);
        writeln!(out, "  return ALT_YES;")?;
        writeln!(out, "}}")?;
        writeln!(out, "if ({flag} == ALT_MAYBE) ret_val = ALT_MAYBE;")?;
    }

    writeln!(out, "return ret_val;")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::MockValue;
    use ttgen_core::GenOptions;

    fn else_branch() -> AltGuard {
        AltGuard {
            tag: AltGuardTag::Else,
            guard_expr: None,
            operation: None,
            body: crate::ast::StatementBlock::new(vec![]),
            location: None,
        }
    }

    /// Property 4: a standalone alt with an `else` emits neither the
    /// default-altstep probe nor the no-match error path.
    #[test]
    fn alt_with_else_skips_default_probe() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let stmt = AltStmt {
            branches: vec![
                AltGuard {
                    tag: AltGuardTag::OpGuard,
                    guard_expr: Some(MockValue::const_bool(true).boxed()),
                    operation: None,
                    body: crate::ast::StatementBlock::new(vec![]),
                    location: None,
                },
                else_branch(),
            ],
        };
        let out = emit_standalone_alt(&mut cu, &Ctx::root(), &stmt).unwrap();
        assert!(!out.contains("try_altsteps"));
        assert!(!out.contains("no-branch-chosen"));
    }

    /// Property 4 (without-else leg): both are present.
    #[test]
    fn alt_without_else_has_default_probe_and_error() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let stmt = AltStmt {
            branches: vec![AltGuard {
                tag: AltGuardTag::OpGuard,
                guard_expr: Some(MockValue::const_bool(true).boxed()),
                operation: None,
                body: crate::ast::StatementBlock::new(vec![]),
                location: None,
            }],
        };
        let out = emit_standalone_alt(&mut cu, &Ctx::root(), &stmt).unwrap();
        assert!(out.contains("try_altsteps"));
        assert!(out.contains("no-branch-chosen"));
    }

    #[test]
    fn altstep_default_slot_less_returns_or_reduction() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let stmt = AltStmt {
            branches: vec![AltGuard {
                tag: AltGuardTag::OpGuard,
                guard_expr: Some(MockValue::const_bool(true).boxed()),
                operation: None,
                body: crate::ast::StatementBlock::new(vec![]),
                location: None,
            }],
        };
        let out = emit_altstep_body(&mut cu, &Ctx::root(), &stmt).unwrap();
        assert!(out.contains("return ret_val;"));
        assert!(out.contains("return ALT_YES;"));
    }
}
