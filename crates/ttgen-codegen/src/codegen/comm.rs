//! Sending operations: send / call / reply / raise (§4.3 "Sending operations").

use std::fmt::Write as _;

use ttgen_core::GenError;

use crate::ast::{CallStmt, RaiseStmt, ReplyStmt, SendStmt};

use super::context::Ctx;
use super::dispatch::emit_block;
use super::ilt::emit_alt_via_ilt;
use super::state::CompilationUnit;

fn port_expr(port: &Option<crate::ast::RefBox>) -> Result<(String, String), GenError> {
    match port {
        Some(p) => {
            let e = p.generate()?;
            Ok((e.preamble, e.expr))
        }
        None => Ok((String::new(), "TTCN_Runtime::any_port".into())),
    }
}

fn to_clause(to: &Option<crate::ast::ValBox>) -> Result<(String, Option<String>), GenError> {
    match to {
        Some(v) => {
            let e = v.generate()?;
            Ok((e.preamble, Some(e.expr)))
        }
        None => Ok((String::new(), None)),
    }
}

pub fn emit_send(stmt: &SendStmt) -> Result<String, GenError> {
    let (port_pre, port) = port_expr(&stmt.port)?;
    let msg = stmt.message.generate()?;
    let (to_pre, to) = to_clause(&stmt.to)?;

    let mut out = String::new();
    out.push_str(&port_pre);
    out.push_str(&msg.preamble);
    out.push_str(&to_pre);
    match to {
        Some(to_expr) => writeln!(out, "{port}.send({}, {to_expr});", msg.expr)?,
        None => writeln!(out, "{port}.send({});", msg.expr)?,
    }
    out.push_str(&msg.postamble);
    Ok(out)
}

pub fn emit_call(cu: &mut CompilationUnit, ctx: &Ctx, stmt: &CallStmt) -> Result<String, GenError> {
    let (port_pre, port) = port_expr(&stmt.port)?;
    let msg = stmt.message.generate()?;
    let (to_pre, to) = to_clause(&stmt.to)?;

    let mut out = String::new();
    writeln!(out, "{{")?;
    out.push_str(&port_pre);
    out.push_str(&msg.preamble);
    out.push_str(&to_pre);

    let call_body = stmt.body.as_ref();
    let timer_expr = match call_body.and_then(|b| b.timer.as_ref()) {
        Some(t) => {
            let e = t.generate()?;
            out.push_str(&e.preamble);
            Some(e.expr)
        }
        None => None,
    };

    match (&to, &timer_expr) {
        (Some(to_expr), Some(timer)) => {
            writeln!(out, "{port}.call({}, {to_expr}, {timer});", msg.expr)?
        }
        (Some(to_expr), None) => writeln!(out, "{port}.call({}, {to_expr});", msg.expr)?,
        (None, Some(timer)) => writeln!(out, "{port}.call({}, {timer});", msg.expr)?,
        (None, None) => writeln!(out, "{port}.call({});", msg.expr)?,
    }
    out.push_str(&msg.postamble);

    if let Some(body) = call_body {
        if !body.alt_branches.is_empty() {
            // The checker has already retargeted every embedded getreply/catch
            // in this mini-alt to `stmt.port`/`stmt.signature_name`; the
            // generator defers to the same ILT-branch lowering a top-level
            // `interleave` uses, since a call body's branches may themselves
            // embed receives.
            out.push_str(&emit_alt_via_ilt(cu, ctx, &body.alt_branches)?);
        }
    }

    writeln!(out, "}}")?;
    Ok(out)
}

pub fn emit_reply(stmt: &ReplyStmt) -> Result<String, GenError> {
    let (port_pre, port) = port_expr(&stmt.port)?;
    let msg = stmt.message.generate()?;
    let (to_pre, to) = to_clause(&stmt.to)?;

    let mut out = String::new();
    out.push_str(&port_pre);
    out.push_str(&msg.preamble);
    out.push_str(&to_pre);

    let reply_expr = match &stmt.reply_value {
        Some(v) => {
            let e = v.generate()?;
            out.push_str(&e.preamble);
            format!("{}.set_reply_value({})", msg.expr, e.expr)
        }
        None => msg.expr.clone(),
    };

    match to {
        Some(to_expr) => writeln!(out, "{port}.reply({reply_expr}, {to_expr});")?,
        None => writeln!(out, "{port}.reply({reply_expr});")?,
    }
    out.push_str(&msg.postamble);
    Ok(out)
}

pub fn emit_raise(stmt: &RaiseStmt) -> Result<String, GenError> {
    let (port_pre, port) = port_expr(&stmt.port)?;
    let exc = stmt.exception.generate()?;
    let (to_pre, to) = to_clause(&stmt.to)?;

    let mut out = String::new();
    out.push_str(&port_pre);
    out.push_str(&exc.preamble);
    out.push_str(&to_pre);
    match to {
        Some(to_expr) => writeln!(out, "{port}.raise({}, {}, {to_expr});", stmt.signature_name, exc.expr)?,
        None => writeln!(out, "{port}.raise({}, {});", stmt.signature_name, exc.expr)?,
    }
    out.push_str(&exc.postamble);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{MockRef, MockValue};
    use ttgen_core::GenOptions;

    #[test]
    fn send_with_to_clause_passes_both_args() {
        let stmt = SendStmt {
            port: Some(MockRef::new("p").boxed()),
            message: MockValue::new("m").boxed(),
            to: Some(MockValue::new("dest").boxed()),
        };
        let out = emit_send(&stmt).unwrap();
        assert!(out.contains("p.send(m, dest);"));
    }

    #[test]
    fn call_without_timer_or_body_is_a_bare_call() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let stmt = CallStmt {
            port: Some(MockRef::new("p").boxed()),
            signature_name: "Sig".into(),
            message: MockValue::new("m").boxed(),
            to: None,
            body: None,
        };
        let out = emit_call(&mut cu, &Ctx::root(), &stmt).unwrap();
        assert!(out.contains("p.call(m);"));
    }

    #[test]
    fn reply_with_value_sets_reply_value() {
        let stmt = ReplyStmt {
            port: Some(MockRef::new("p").boxed()),
            signature_name: "Sig".into(),
            message: MockValue::new("m").boxed(),
            reply_value: Some(MockValue::new("v").boxed()),
            to: None,
        };
        let out = emit_reply(&stmt).unwrap();
        assert!(out.contains("m.set_reply_value(v)"));
    }

    #[test]
    fn raise_includes_signature_name() {
        let stmt = RaiseStmt {
            port: Some(MockRef::new("p").boxed()),
            signature_name: "Sig".into(),
            exception: MockValue::new("e").boxed(),
            to: None,
        };
        let out = emit_raise(&stmt).unwrap();
        assert!(out.contains("p.raise(Sig, e);"));
    }
}
