//! L2: the main statement dispatcher (§4.3). One arm per `StatementKind`
//! variant, no catch-all — adding a kind to `ast::StatementKind` is a
//! compile error here until it is handled.

use std::fmt::Write as _;

use ttgen_core::GenError;

use crate::ast::{Statement, StatementBlock, StatementKind, StopTarget};

use super::alt;
use super::comm;
use super::context::Ctx;
use super::control_flow;
use super::ilt;
use super::misc;
use super::receive;
use super::state::CompilationUnit;

fn loc_text(stmt: &Statement) -> String {
    stmt.location
        .as_ref()
        .map(|l| l.display_short())
        .unwrap_or_else(|| "<unknown location>".to_string())
}

/// Emits every statement in a block, in order, concatenated.
pub fn emit_block(cu: &mut CompilationUnit, ctx: &Ctx, block: &StatementBlock) -> Result<String, GenError> {
    let mut out = String::new();
    for stmt in &block.statements {
        out.push_str(&emit_statement(cu, ctx, stmt)?);
    }
    Ok(out)
}

/// Emits one statement (§4.3's per-kind contract).
pub fn emit_statement(cu: &mut CompilationUnit, ctx: &Ctx, stmt: &Statement) -> Result<String, GenError> {
    use StatementKind::*;

    match &stmt.kind {
        Block(b) => control_flow::emit_block_statement(cu, ctx, b),
        If(s) => control_flow::emit_if(cu, ctx, s),
        SelectCase(s) => control_flow::emit_select_case(cu, ctx, s),
        SelectUnion(s) => control_flow::emit_select_union(cu, ctx, s),
        For(s) => control_flow::emit_for(cu, ctx, s),
        While(s) => control_flow::emit_while(cu, ctx, s),
        DoWhile(s) => control_flow::emit_do_while(cu, ctx, s),
        Break => Ok(control_flow::emit_break(ctx)),
        Continue => Ok(control_flow::emit_continue(ctx)),
        Label(name) => Ok(format!("{name}:;\n")),
        Goto(name) => Ok(format!("goto {name};\n")),
        Return(value) => match value {
            Some(v) => {
                let e = v.generate()?;
                let mut out = e.preamble.clone();
                let _ = writeln!(out, "return {};", e.expr);
                out.push_str(&e.postamble);
                Ok(out)
            }
            None => Ok("return;\n".to_string()),
        },
        StopExec(target) => emit_stop_exec(target),
        StopTestcase => Ok("TTCN_error(\"testcase.stop\");\n".to_string()),
        StartProfiler => Ok("TTCN_Runtime::start_profiler();\n".to_string()),
        StopProfiler => Ok("TTCN_Runtime::stop_profiler();\n".to_string()),

        Alt(s) => {
            if alt::is_standalone(s) {
                alt::emit_standalone_alt(cu, ctx, s)
            } else {
                ilt::emit_alt_via_ilt(cu, ctx, &s.branches)
            }
        }
        Interleave(s) => ilt::emit_interleave(cu, ctx, s),
        // A bare `repeat` inside an altstep body re-enters evaluation the
        // same way a matcher-returned `ALT_REPEAT` does; outside an altstep
        // the enclosing alt/ILT loop's own snapshot label is the target,
        // already threaded as `ctx.alt_end_label`'s sibling concern.
        Repeat if ctx.in_altstep => Ok("return ALT_REPEAT;\n".to_string()),
        Repeat => Ok("__alt_flag = ALT_REPEAT;\n".to_string()),

        Assignment { target, value } => {
            let t = target.generate()?;
            let v = value.generate()?;
            let mut out = String::new();
            out.push_str(&v.preamble);
            out.push_str(&t.preamble);
            writeln!(out, "{} = {};", t.expr, v.expr)?;
            out.push_str(&t.postamble);
            out.push_str(&v.postamble);
            Ok(out)
        }
        LocalDefinition { name, type_name, init } => {
            let mut out = String::new();
            match init {
                Some(v) => {
                    let e = v.generate()?;
                    out.push_str(&e.preamble);
                    writeln!(out, "{type_name} {name}({});", e.expr)?;
                    out.push_str(&e.postamble);
                }
                None => writeln!(out, "{type_name} {name};")?,
            }
            Ok(out)
        }

        InstanceCall { target, args } => {
            let t = target.generate()?;
            let arglist = render_value_args(args)?;
            let mut out = t.preamble.clone();
            writeln!(out, "{}({arglist});", t.expr)?;
            out.push_str(&t.postamble);
            Ok(out)
        }
        InvokeOnDeref { funcref, args } => {
            let f = funcref.generate()?;
            let arglist = render_value_args(args)?;
            let mut out = f.preamble.clone();
            writeln!(out, "{}.invoke({arglist});", f.expr)?;
            out.push_str(&f.postamble);
            Ok(out)
        }
        Activate { altstep_name, args } => {
            let arglist = render_value_args(args)?;
            Ok(format!("TTCN_Default::activate({altstep_name}({arglist}));\n"))
        }
        Deactivate(target) => match target {
            Some(r) => {
                let e = r.generate()?;
                let mut out = e.preamble.clone();
                writeln!(out, "TTCN_Default::deactivate({});", e.expr)?;
                out.push_str(&e.postamble);
                Ok(out)
            }
            None => {
                cu.warn(
                    "deactivate() with no argument inside an altstep may delete its own in-parameters under the legacy runtime",
                    stmt.location.clone(),
                );
                Ok("TTCN_Default::deactivate();\n".to_string())
            }
        },

        Send(s) => comm::emit_send(s),
        Call(s) => comm::emit_call(cu, ctx, s),
        Reply(s) => comm::emit_reply(s),
        Raise(s) => comm::emit_raise(s),

        Receive(op) => receive::emit_receive_like(cu, crate::ast::ReceiveKind::Receive, op, &loc_text(stmt)),
        Trigger(op) => receive::emit_receive_like(cu, crate::ast::ReceiveKind::Trigger, op, &loc_text(stmt)),
        CheckReceive(op) => receive::emit_receive_like(cu, crate::ast::ReceiveKind::CheckReceive, op, &loc_text(stmt)),
        Getcall(op) => receive::emit_receive_like(cu, crate::ast::ReceiveKind::Getcall, op, &loc_text(stmt)),
        CheckGetcall(op) => receive::emit_receive_like(cu, crate::ast::ReceiveKind::CheckGetcall, op, &loc_text(stmt)),
        Getreply(op) => receive::emit_receive_like(cu, crate::ast::ReceiveKind::Getreply, op, &loc_text(stmt)),
        CheckGetreply(op) => receive::emit_receive_like(cu, crate::ast::ReceiveKind::CheckGetreply, op, &loc_text(stmt)),
        Catch(op) => receive::emit_receive_like(cu, crate::ast::ReceiveKind::Catch, op, &loc_text(stmt)),
        CheckCatch(op) => receive::emit_receive_like(cu, crate::ast::ReceiveKind::CheckCatch, op, &loc_text(stmt)),
        Check(op) => receive::emit_receive_like(cu, crate::ast::ReceiveKind::Check, op, &loc_text(stmt)),
        Done(s) => receive::emit_done(cu, s, &loc_text(stmt)),
        Killed(s) => receive::emit_killed(cu, s, &loc_text(stmt)),
        Timeout(s) => receive::emit_timeout(cu, s, &loc_text(stmt)),

        Connect { a, b } => emit_config_pair("connect", a, b),
        Disconnect { a, b } => emit_config_pair("disconnect", a, b),
        Map { a, b } => emit_config_pair("map", a, b),
        Unmap { a, b } => emit_config_pair("unmap", a, b),

        StartComponent(s) => emit_start_component(s),
        StopComponent(r) => emit_ref_call(r, "stop"),
        Kill(r) => match r {
            Some(r) => emit_ref_call(r, "kill"),
            None => Ok("TTCN_Runtime::kill_component();\n".to_string()),
        },
        StartPort(r) => emit_ref_call(r, "start"),
        StopPort(r) => emit_ref_call(r, "stop"),
        Clear(r) => emit_ref_call(r, "clear"),
        Halt(r) => match r {
            Some(r) => emit_ref_call(r, "halt"),
            None => Ok("TTCN_Runtime::halt();\n".to_string()),
        },
        StartTimer { timer, value } => {
            let t = timer.generate()?;
            let mut out = t.preamble.clone();
            match value {
                Some(v) => {
                    let e = v.generate()?;
                    out.push_str(&e.preamble);
                    writeln!(out, "{}.start({});", t.expr, e.expr)?;
                    out.push_str(&e.postamble);
                }
                None => writeln!(out, "{}.start();", t.expr)?,
            }
            out.push_str(&t.postamble);
            Ok(out)
        }
        StopTimer(r) => match r {
            Some(r) => emit_ref_call(r, "stop"),
            None => Ok("TTCN_Runtime::stop_all_timers();\n".to_string()),
        },

        Log(args) => misc::emit_log(args),
        Action(args) => misc::emit_action(args),
        SetVerdict { verdict, reason } => misc::emit_setverdict(verdict, reason),
        Execute(s) => misc::emit_execute(s),
        String2Value { source, target } => misc::emit_string2value(source, target),
        Int2Enum { source, target } => misc::emit_int2enum(source, target),
        ErroneousUpdate(s) => misc::emit_update(cu, s),
        SetState { state, info } => misc::emit_setstate(cu, state, info),
    }
}

fn emit_stop_exec(target: &StopTarget) -> Result<String, GenError> {
    match target {
        StopTarget::SelfComp => Ok("TTCN_Runtime::stop_component(SELF_COMPREF);\n".to_string()),
        StopTarget::Mtc => Ok("TTCN_Runtime::stop_component(MTC_COMPREF);\n".to_string()),
        StopTarget::Other(v) => {
            let e = v.generate()?;
            let mut out = e.preamble.clone();
            let _ = writeln!(out, "TTCN_Runtime::stop_component({});", e.expr);
            out.push_str(&e.postamble);
            Ok(out)
        }
    }
}

fn render_value_args(args: &[crate::ast::ValBox]) -> Result<String, GenError> {
    let mut parts = Vec::with_capacity(args.len());
    for a in args {
        parts.push(a.generate()?.expr);
    }
    Ok(parts.join(", "))
}

fn emit_config_pair(op: &str, a: &crate::ast::RefBox, b: &crate::ast::RefBox) -> Result<String, GenError> {
    let ea = a.generate()?;
    let eb = b.generate()?;
    let mut out = String::new();
    out.push_str(&ea.preamble);
    out.push_str(&eb.preamble);
    writeln!(out, "TTCN_Runtime::{op}_port({}, {});", ea.expr, eb.expr)?;
    out.push_str(&eb.postamble);
    out.push_str(&ea.postamble);
    Ok(out)
}

fn emit_ref_call(r: &crate::ast::RefBox, method: &str) -> Result<String, GenError> {
    let e = r.generate()?;
    let mut out = e.preamble.clone();
    writeln!(out, "{}.{method}();", e.expr)?;
    out.push_str(&e.postamble);
    Ok(out)
}

fn emit_start_component(stmt: &crate::ast::StartComponentStmt) -> Result<String, GenError> {
    use crate::ast::StartComponentTarget;

    let arglist = render_value_args(&stmt.args)?;
    let (preamble, compref_expr) = match &stmt.target {
        StartComponentTarget::ByName { component_type, name } => {
            let (name_pre, name_expr) = match name {
                Some(n) => {
                    let e = n.generate()?;
                    (e.preamble, e.expr)
                }
                None => (String::new(), "NULL".into()),
            };
            (
                name_pre,
                format!("TTCN_Runtime::create_component(\"{component_type}\", {name_expr})"),
            )
        }
        StartComponentTarget::ByDeref(v) => {
            let e = v.generate()?;
            (e.preamble, e.expr)
        }
    };
    let mut out = preamble;
    writeln!(
        out,
        "TTCN_Runtime::start_component({compref_expr}, \"{}\", {arglist});",
        stmt.function_name
    )?;
    Ok(out)
}
