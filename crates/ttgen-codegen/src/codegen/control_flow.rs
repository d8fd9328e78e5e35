//! Control-flow statement emission: if / select-case / select-union /
//! for / while / do-while / break / continue (§4.3).

use std::fmt::Write as _;

use ttgen_core::GenError;

use crate::ast::{
    DoWhileStmt, ForStmt, IfStmt, SelectCaseStmt, SelectUnionStmt, Statement, StatementBlock,
    StatementKind, WhileStmt,
};
use ttgen_core::ast_node::StaticTypeKind;

use super::context::{Ctx, JumpTarget, LoopLabels};
use super::dispatch::emit_block;
use super::state::CompilationUnit;

/// **block** (§4.3): an exception-handling prologue when tagged `try`/
/// `catch` (the `catch` variant binds a named exception-message variable),
/// otherwise a braced compound preceded by a debug-scope marker when
/// debugging is enabled.
pub fn emit_block_statement(
    cu: &mut CompilationUnit,
    ctx: &Ctx,
    block: &StatementBlock,
) -> Result<String, GenError> {
    use crate::ast::ExceptionTag;

    let mut out = String::new();
    if cu.options.debugger_active {
        writeln!(out, "{{ TTCN3_Debug_Scope __dbg_scope(\"block\");")?;
    } else {
        writeln!(out, "{{")?;
    }

    match block.exception_tag {
        ExceptionTag::Try => {
            writeln!(out, "try {{")?;
            out.push_str(&emit_block(cu, ctx, block)?);
            writeln!(out, "}}")?;
        }
        ExceptionTag::Catch => {
            let binding = block
                .catch_binding
                .as_deref()
                .ok_or_else(|| GenError::fatal("catch block missing magic exception binding"))?;
            writeln!(out, "catch (const TTCN_Error& {binding}) {{")?;
            out.push_str(&emit_block(cu, ctx, block)?);
            writeln!(out, "}}")?;
        }
        ExceptionTag::None => {
            out.push_str(&emit_block(cu, ctx, block)?);
        }
    }
    writeln!(out, "}}")?;
    Ok(out)
}

/// **if** (§4.3): a linearised cascade. A compile-time-true clause makes
/// the remaining clauses unreachable (warning, non-fatal); a
/// compile-time-false clause is dropped.
pub fn emit_if(cu: &mut CompilationUnit, ctx: &Ctx, stmt: &IfStmt) -> Result<String, GenError> {
    let mut out = String::new();
    let mut emitted_any = false;
    let mut unreachable_tail_warned = false;

    for clause in &stmt.clauses {
        if unreachable_tail_warned {
            cu.warn("unreachable if/elseif clause after a compile-time-true guard", None);
            continue;
        }
        match clause.condition.const_fold_bool() {
            Some(false) => continue,
            Some(true) => {
                let body = emit_block(cu, ctx, &clause.body)?;
                if emitted_any {
                    writeln!(out, "else {{")?;
                } else {
                    writeln!(out, "{{")?;
                }
                out.push_str(&body);
                writeln!(out, "}}")?;
                emitted_any = true;
                unreachable_tail_warned = true;
            }
            None => {
                let cond = clause.condition.generate()?;
                let kw = if emitted_any { "else if" } else { "if" };
                if !cond.preamble.is_empty() {
                    out.push_str(&cond.preamble);
                }
                writeln!(out, "{kw} ({}) {{", cond.expr)?;
                out.push_str(&emit_block(cu, ctx, &clause.body)?);
                writeln!(out, "}}")?;
                if !cond.postamble.is_empty() {
                    out.push_str(&cond.postamble);
                }
                emitted_any = true;
            }
        }
    }

    if !unreachable_tail_warned {
        if let Some(else_branch) = &stmt.else_branch {
            if emitted_any {
                writeln!(out, "else {{")?;
            } else {
                writeln!(out, "{{")?;
            }
            out.push_str(&emit_block(cu, ctx, else_branch)?);
            writeln!(out, "}}")?;
        }
    }

    Ok(out)
}

/// **select-case** (§4.3): switch form when the scrutinee is integer-typed,
/// every case value is compile-time foldable, and the values fit the
/// target's native integer; cascade form otherwise.
pub fn emit_select_case(
    cu: &mut CompilationUnit,
    ctx: &Ctx,
    stmt: &SelectCaseStmt,
) -> Result<String, GenError> {
    let is_integer = matches!(stmt.scrutinee.static_type().kind, StaticTypeKind::Integer);
    let all_foldable = stmt
        .arms
        .iter()
        .all(|arm| arm.values.iter().all(|v| v.const_fold_int().is_some()));

    if is_integer && all_foldable && !stmt.arms.is_empty() {
        emit_select_case_switch(cu, ctx, stmt)
    } else {
        emit_select_case_cascade(cu, ctx, stmt)
    }
}

fn emit_select_case_switch(
    cu: &mut CompilationUnit,
    ctx: &Ctx,
    stmt: &SelectCaseStmt,
) -> Result<String, GenError> {
    let scrutinee = stmt.scrutinee.generate()?;
    let mut out = String::new();
    out.push_str(&scrutinee.preamble);
    writeln!(out, "switch ({}.get_long_long_val()) {{", scrutinee.expr)?;

    let mut seen = std::collections::HashSet::new();
    for arm in &stmt.arms {
        for v in &arm.values {
            let n = v.const_fold_int().expect("checked all_foldable above");
            if seen.insert(n) {
                writeln!(out, "case({n}):")?;
            }
        }
        out.push_str(&emit_block(cu, ctx, &arm.body)?);
        writeln!(out, "break;")?;
    }
    if let Some(else_branch) = &stmt.else_branch {
        writeln!(out, "default:")?;
        out.push_str(&emit_block(cu, ctx, else_branch)?);
        writeln!(out, "break;")?;
    }
    writeln!(out, "}}")?;
    out.push_str(&scrutinee.postamble);
    Ok(out)
}

fn emit_select_case_cascade(
    cu: &mut CompilationUnit,
    ctx: &Ctx,
    stmt: &SelectCaseStmt,
) -> Result<String, GenError> {
    let scrutinee_tmp = cu.fresh_tmp("sel");
    let scrutinee = stmt.scrutinee.generate()?;
    let mut out = String::new();
    out.push_str(&scrutinee.preamble);
    writeln!(out, "auto& {scrutinee_tmp} = {};", scrutinee.expr)?;
    out.push_str(&scrutinee.postamble);

    let mut emitted_any = false;
    for arm in &stmt.arms {
        let conds: Vec<String> = arm
            .values
            .iter()
            .map(|v| -> Result<String, GenError> {
                let e = v.generate()?;
                if cu.options.omit_in_value_list {
                    Ok(format!("{}.match({scrutinee_tmp}, TRUE)", e.expr))
                } else {
                    Ok(format!("{}.match({scrutinee_tmp})", e.expr))
                }
            })
            .collect::<Result<_, _>>()?;
        let kw = if emitted_any { "else if" } else { "if" };
        writeln!(out, "{kw} ({}) {{", conds.join(" || "))?;
        out.push_str(&emit_block(cu, ctx, &arm.body)?);
        writeln!(out, "}}")?;
        emitted_any = true;
    }
    if let Some(else_branch) = &stmt.else_branch {
        let kw = if emitted_any { "else" } else { "if (TRUE)" };
        writeln!(out, "{kw} {{")?;
        out.push_str(&emit_block(cu, ctx, else_branch)?);
        writeln!(out, "}}")?;
    }
    Ok(out)
}

/// **select-union** (§4.3): a switch on the tag selector; an `UNBOUND`
/// selector triggers a runtime error.
pub fn emit_select_union(
    cu: &mut CompilationUnit,
    ctx: &Ctx,
    stmt: &SelectUnionStmt,
) -> Result<String, GenError> {
    let scrutinee = stmt.scrutinee.generate()?;
    let mut out = String::new();
    out.push_str(&scrutinee.preamble);
    writeln!(out, "if ({}.get_selection() == UNBOUND_VALUE)", scrutinee.expr)?;
    writeln!(out, "  TTCN_error(\"unbound-operand: select union on unbound value\");")?;
    writeln!(out, "switch ({}.get_selection()) {{", scrutinee.expr)?;
    for arm in &stmt.arms {
        writeln!(out, "case(ALT_{}):", arm.alternative)?;
        out.push_str(&emit_block(cu, ctx, &arm.body)?);
        writeln!(out, "break;")?;
    }
    if let Some(else_branch) = &stmt.else_branch {
        writeln!(out, "default:")?;
        out.push_str(&emit_block(cu, ctx, else_branch)?);
        writeln!(out, "break;")?;
    }
    writeln!(out, "}}")?;
    out.push_str(&scrutinee.postamble);
    Ok(out)
}

/// **for / while / do-while** (§4.3): constant-fold the condition. A
/// compile-time-false condition emits only an unreachable-code comment; a
/// compile-time-true condition emits an infinite loop with no exit check;
/// a compile-time-false `do-while` condition emits the body once.
pub fn emit_while(cu: &mut CompilationUnit, ctx: &Ctx, stmt: &WhileStmt) -> Result<String, GenError> {
    match stmt.condition.const_fold_bool() {
        Some(false) => Ok("/* unreachable: while(false) */\n".to_string()),
        Some(true) => {
            let labels = LoopLabels {
                next_label: Some(cu.fresh_label("W_next")),
                end_label: Some(cu.fresh_label("W_end")),
            };
            let loop_ctx = ctx.enter_loop(labels.clone());
            let mut out = String::new();
            writeln!(out, "for (;;) {{")?;
            writeln!(out, "{}:", labels.next_label.as_ref().unwrap())?;
            out.push_str(&emit_block(cu, &loop_ctx, &stmt.body)?);
            writeln!(out, "}}")?;
            writeln!(out, "{}:;", labels.end_label.as_ref().unwrap())?;
            Ok(out)
        }
        None => {
            let labels = LoopLabels {
                next_label: Some(cu.fresh_label("W_next")),
                end_label: Some(cu.fresh_label("W_end")),
            };
            let loop_ctx = ctx.enter_loop(labels.clone());
            let cond = stmt.condition.generate()?;
            let mut out = String::new();
            writeln!(out, "for (;;) {{")?;
            writeln!(out, "{}:", labels.next_label.as_ref().unwrap())?;
            out.push_str(&cond.preamble);
            writeln!(out, "if (!({})) goto {};", cond.expr, labels.end_label.as_ref().unwrap())?;
            out.push_str(&cond.postamble);
            out.push_str(&emit_block(cu, &loop_ctx, &stmt.body)?);
            writeln!(out, "}}")?;
            writeln!(out, "{}:;", labels.end_label.as_ref().unwrap())?;
            Ok(out)
        }
    }
}

pub fn emit_do_while(
    cu: &mut CompilationUnit,
    ctx: &Ctx,
    stmt: &DoWhileStmt,
) -> Result<String, GenError> {
    if stmt.condition.const_fold_bool() == Some(false) {
        let labels = LoopLabels::default();
        let loop_ctx = ctx.enter_loop(labels);
        return emit_block(cu, &loop_ctx, &stmt.body);
    }

    let labels = LoopLabels {
        next_label: Some(cu.fresh_label("DW_next")),
        end_label: Some(cu.fresh_label("DW_end")),
    };
    let loop_ctx = ctx.enter_loop(labels.clone());
    let mut out = String::new();
    writeln!(out, "do {{")?;
    out.push_str(&emit_block(cu, &loop_ctx, &stmt.body)?);
    writeln!(out, "{}:;", labels.next_label.as_ref().unwrap())?;
    if stmt.condition.const_fold_bool() == Some(true) {
        writeln!(out, "}} while (TRUE);")?;
    } else {
        let cond = stmt.condition.generate()?;
        out.push_str(&cond.preamble);
        writeln!(out, "}} while ({});", cond.expr)?;
        out.push_str(&cond.postamble);
    }
    writeln!(out, "{}:;", labels.end_label.as_ref().unwrap())?;
    Ok(out)
}

pub fn emit_for(cu: &mut CompilationUnit, ctx: &Ctx, stmt: &ForStmt) -> Result<String, GenError> {
    if let Some(cond) = &stmt.condition {
        if cond.const_fold_bool() == Some(false) {
            return Ok("/* unreachable: for(...; false; ...) */\n".to_string());
        }
    }

    let labels = LoopLabels {
        next_label: Some(cu.fresh_label("F_next")),
        end_label: Some(cu.fresh_label("F_end")),
    };
    let loop_ctx = ctx.enter_loop(labels.clone());
    let mut out = String::new();
    writeln!(out, "{{")?;
    if let Some(init) = &stmt.init {
        out.push_str(&super::dispatch::emit_statement(cu, ctx, init)?);
    }
    writeln!(out, "for (;;) {{")?;
    match &stmt.condition {
        Some(cond) if cond.const_fold_bool() != Some(true) => {
            let c = cond.generate()?;
            out.push_str(&c.preamble);
            writeln!(out, "if (!({})) goto {};", c.expr, labels.end_label.as_ref().unwrap())?;
            out.push_str(&c.postamble);
        }
        _ => {}
    }
    out.push_str(&emit_block(cu, &loop_ctx, &stmt.body)?);
    writeln!(out, "{}:;", labels.next_label.as_ref().unwrap())?;
    if let Some(step) = &stmt.step {
        out.push_str(&super::dispatch::emit_statement(cu, ctx, step)?);
    }
    writeln!(out, "}}")?;
    writeln!(out, "{}:;", labels.end_label.as_ref().unwrap())?;
    writeln!(out, "}}")?;
    Ok(out)
}

/// **break / continue** (§4.3): resolved via `Ctx::resolve_break`/
/// `resolve_continue` — `goto` a generated label, `return ALT_BREAK`
/// inside an altstep, or the target's native keyword.
pub fn emit_break(ctx: &Ctx) -> String {
    match ctx.resolve_break() {
        JumpTarget::Goto(label) => format!("goto {label};\n"),
        JumpTarget::ReturnAltBreak => "return ALT_BREAK;\n".to_string(),
        JumpTarget::Native => "break;\n".to_string(),
    }
}

pub fn emit_continue(ctx: &Ctx) -> String {
    match ctx.resolve_continue() {
        JumpTarget::Goto(label) => format!("goto {label};\n"),
        JumpTarget::ReturnAltBreak => unreachable!("continue never resolves to ALT_BREAK"),
        JumpTarget::Native => "continue;\n".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SelectCaseArm;
    use crate::testsupport::{ConstBoolValue, MockValue};

    /// S3: `select (u) { case (a) { ... } case else { ... } }`.
    #[test]
    fn select_union_emits_switch_on_selection() {
        let mut cu = CompilationUnit::default();
        let stmt = SelectUnionStmt {
            scrutinee: ConstBoolValue::unknown(),
            arms: vec![crate::ast::SelectUnionArm {
                alternative: "a".into(),
                body: StatementBlock::new(vec![]),
            }],
            else_branch: Some(StatementBlock::new(vec![])),
        };
        let out = emit_select_union(&mut cu, &Ctx::root(), &stmt).unwrap();
        assert!(out.contains("switch ("));
        assert!(out.contains("get_selection()"));
        assert!(out.contains("case(ALT_a):"));
        assert!(out.contains("default:"));
    }

    /// S4: `while (true) { p.receive; }` at statement scope (not inside an
    /// `alt`/`interleave`) lowers to an ordinary infinite `for(;;)` whose
    /// body contains its own standalone receive loop, with the blocking
    /// snapshot nested inside that inner loop rather than hoisted out.
    #[test]
    fn s4_standalone_receive_nested_in_while_loop() {
        use crate::ast::{ReceiveKind, ReceiveOp};
        use crate::testsupport::{ConstBoolValue, MockRef};

        let mut cu = CompilationUnit::default();
        let receive_stmt = Statement::new(
            StatementKind::Receive(ReceiveOp {
                kind: ReceiveKind::Receive,
                port: Some(MockRef::new("p").boxed()),
                template: None,
                return_value_match: None,
                signature_name: None,
                from: None,
                sender_redirect: None,
                value_redirect: None,
                param_redirect: None,
                index_redirect: None,
            }),
            None,
        );
        let stmt = WhileStmt {
            condition: ConstBoolValue::unknown(),
            body: StatementBlock::new(vec![receive_stmt]),
        };
        let out = emit_while(&mut cu, &Ctx::root(), &stmt).unwrap();
        let outer_for = out.find("for (;;)").expect("outer loop present");
        let inner_take_new_false = out.find("take_new(FALSE)").expect("standalone receive loop present");
        let inner_take_new_true = out.find("take_new(TRUE)").expect("blocking snapshot present");
        assert!(outer_for < inner_take_new_false);
        assert!(inner_take_new_false < inner_take_new_true);
    }

    /// S2: `select (x) { case (1) { stop; } case (2) { repeat; } }` with
    /// `x: integer` emits a switch with `case(1):` and `case(2):`.
    #[test]
    fn select_case_with_foldable_integer_values_uses_switch_form() {
        let mut cu = CompilationUnit::default();
        let stmt = SelectCaseStmt {
            scrutinee: MockValue::integer("x").boxed(),
            arms: vec![
                SelectCaseArm {
                    values: vec![MockValue::const_int(1).boxed()],
                    body: StatementBlock::new(vec![Statement::new(StatementKind::StopTestcase, None)]),
                },
                SelectCaseArm {
                    values: vec![MockValue::const_int(2).boxed()],
                    body: StatementBlock::new(vec![Statement::new(StatementKind::Repeat, None)]),
                },
            ],
            else_branch: None,
        };
        let out = emit_select_case(&mut cu, &Ctx::root(), &stmt).unwrap();
        assert!(out.contains("switch (x.get_long_long_val())"));
        assert!(out.contains("case(1):"));
        assert!(out.contains("case(2):"));
    }
}
