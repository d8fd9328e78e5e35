//! Receiving operations: the standalone receive loop and per-kind matcher
//! construction (§4.3, §5, property 6).

use std::fmt::Write as _;

use ttgen_core::ast_node::StaticTypeKind;
use ttgen_core::GenError;

use crate::ast::{
    DoneStmt, DoneTarget, IndexRedirect, KilledStmt, KilledTarget, ParamRedirect, ReceiveKind,
    ReceiveOp, TimeoutStmt, TimeoutTarget, ValueRedirect,
};

use super::redirects::{emit_index_redirect, emit_param_redirect, emit_value_redirect};
use super::state::CompilationUnit;

/// Wraps a matcher expression in the standalone receive loop shape required
/// by property 6: exactly one `take_new(FALSE)` before the loop and exactly
/// one `take_new(TRUE)` at the end of each iteration.
fn wrap_standalone_loop(
    cu: &mut CompilationUnit,
    matcher_preamble: &str,
    matcher_expr: &str,
    can_repeat: bool,
    location_text: &str,
) -> String {
    let label = cu.fresh_label("R");
    let mut out = String::new();
    let _ = writeln!(out, "{{");
    let _ = writeln!(out, "{label}:");
    out.push_str(matcher_preamble);
    let _ = writeln!(out, "alt_status alt_flag = ALT_UNCHECKED, default_flag = ALT_UNCHECKED;");
    let _ = writeln!(out, "TTCN_Snapshot::take_new(FALSE);");
    let _ = writeln!(out, "for (;;) {{");
    let _ = writeln!(out, "  if (alt_flag != ALT_NO) {{");
    let _ = writeln!(out, "    alt_flag = {matcher_expr};");
    let _ = writeln!(out, "    if (alt_flag == ALT_YES) break;");
    if can_repeat {
        let _ = writeln!(out, "    if (alt_flag == ALT_REPEAT) goto {label};");
    }
    let _ = writeln!(out, "  }}");
    let _ = writeln!(out, "  if (default_flag != ALT_NO) {{");
    let _ = writeln!(out, "    default_flag = TTCN_Default::try_altsteps();");
    let _ = writeln!(out, "    if (default_flag == ALT_YES || default_flag == ALT_BREAK) break;");
    let _ = writeln!(out, "    if (default_flag == ALT_REPEAT) goto {label};");
    let _ = writeln!(out, "  }}");
    let _ = writeln!(out, "  if (alt_flag == ALT_NO && default_flag == ALT_NO)");
    let _ = writeln!(
        out,
        "    TTCN_error(\"no-branch-chosen: none of the branches can be chosen at {location_text}\");"
    );
    let _ = writeln!(out, "  TTCN_Snapshot::take_new(TRUE);");
    let _ = writeln!(out, "}}");
    let _ = writeln!(out, "}}");
    out
}

fn port_expr(op_port: &Option<crate::ast::RefBox>) -> Result<(String, String), GenError> {
    match op_port {
        Some(p) => {
            let e = p.generate()?;
            Ok((e.preamble, e.expr))
        }
        None => Ok((String::new(), "TTCN_Runtime::any_port".into())),
    }
}

/// Legacy `&(variable)` redirect, or `NULL` when absent. A rich runtime-2
/// redirect synthesises a `Value_Redirect_Interface` subclass whose
/// `set_values` body reuses [`emit_value_redirect`]'s per-entry logic.
fn value_redirect_arg(
    cu: &mut CompilationUnit,
    redirect: &Option<ValueRedirect>,
    matched_template: Option<&dyn ttgen_core::ast_node::TemplateNode>,
) -> Result<(String, String), GenError> {
    let Some(redirect) = redirect else {
        return Ok((String::new(), "NULL".into()));
    };

    if !cu.options.use_runtime_2() {
        if redirect.entries.len() != 1 || !redirect.entries[0].sub_path.is_empty() {
            return Err(GenError::fatal(
                "legacy runtime cannot express a multi-entry or sub-path value redirect",
            ));
        }
        let target = redirect.entries[0].target.generate()?;
        return Ok((target.preamble, format!("&({})", target.expr)));
    }

    let class = format!("Value_Redirect_{}", cu.fresh_tmp("vr"));
    let body = emit_value_redirect(cu, redirect, "(*received_value)", matched_template)?;
    let mut class_text = String::new();
    let _ = writeln!(class_text, "class {class} : public Value_Redirect_Interface {{");
    let _ = writeln!(class_text, "public:");
    let _ = writeln!(
        class_text,
        "  void set_values(const Base_Type* received_value) override {{"
    );
    class_text.push_str(&body);
    let _ = writeln!(class_text, "  }}");
    let _ = writeln!(class_text, "}};");
    cu.class_defs.push_str(&class_text);

    let instance = cu.fresh_tmp("vr_inst");
    let preamble = format!("{class} {instance};\n");
    Ok((preamble, format!("&{instance}")))
}

/// Legacy `&(variable)` redirect, or `NULL` when absent, for a
/// `call`/`getcall`/`reply`/`getreply` parameter list -- the parameter-list
/// analogue of [`value_redirect_arg`] (§4.3 matcher table).
fn param_redirect_arg(
    cu: &mut CompilationUnit,
    redirect: &Option<ParamRedirect>,
) -> Result<(String, String), GenError> {
    let Some(redirect) = redirect else {
        return Ok((String::new(), "NULL".into()));
    };

    if !cu.options.use_runtime_2() {
        if redirect.entries.len() != 1 {
            return Err(GenError::fatal(
                "legacy runtime cannot express a multi-entry parameter redirect",
            ));
        }
        let Some(target) = &redirect.entries[0].target else {
            return Ok((String::new(), "NULL".into()));
        };
        let target = target.generate()?;
        return Ok((target.preamble, format!("&({})", target.expr)));
    }

    let class = format!("Param_Redirect_{}", cu.fresh_tmp("pr"));
    let body = emit_param_redirect(cu, redirect, "(*params)")?;
    let mut class_text = String::new();
    let _ = writeln!(class_text, "class {class} : public Parameter_Redirect_Interface {{");
    let _ = writeln!(class_text, "public:");
    let _ = writeln!(
        class_text,
        "  void set_values(const Base_Type* params) override {{"
    );
    class_text.push_str(&body);
    let _ = writeln!(class_text, "  }}");
    let _ = writeln!(class_text, "}};");
    cu.class_defs.push_str(&class_text);

    let instance = cu.fresh_tmp("pr_inst");
    let preamble = format!("{class} {instance};\n");
    Ok((preamble, format!("&{instance}")))
}

fn index_redirect_arg(redirect: &Option<IndexRedirect>, index_vars: &[&str]) -> Result<String, GenError> {
    match redirect {
        None => Ok("NULL".into()),
        Some(r) => {
            // The textual redirect assignment is emitted by the caller right
            // after the matcher succeeds; here we only need the argument the
            // matcher passes so the runtime knows where the index lives.
            let _ = emit_index_redirect(r, index_vars)?;
            Ok("&__index_redirect".into())
        }
    }
}

fn from_or_sender_arg(op: &ReceiveOp) -> Result<(String, String, String), GenError> {
    let mut preamble = String::new();
    let from_expr = match &op.from {
        Some(t) => {
            let e = t.generate()?;
            preamble.push_str(&e.preamble);
            e.expr
        }
        None => match &op.sender_redirect {
            Some(sr) if sr.static_type().kind == StaticTypeKind::AddressOfSut => {
                "any_value_template<address_type>()".into()
            }
            _ => "any_compref_template()".into(),
        },
    };
    let sender_expr = match &op.sender_redirect {
        Some(sr) => {
            let e = sr.generate()?;
            preamble.push_str(&e.preamble);
            format!("&({})", e.expr)
        }
        None => "NULL".into(),
    };
    Ok((preamble, from_expr, sender_expr))
}

/// Builds the per-kind matcher expression from §4.3's table.
pub fn build_matcher(cu: &mut CompilationUnit, kind: ReceiveKind, op: &ReceiveOp) -> Result<(String, String), GenError> {
    let (port_pre, port) = port_expr(&op.port)?;
    let (from_pre, from, sender) = from_or_sender_arg(op)?;
    let (vr_pre, vr) = value_redirect_arg(cu, &op.value_redirect, op.template.as_deref())?;
    let (pr_pre, pr) = param_redirect_arg(cu, &op.param_redirect)?;
    let index = index_redirect_arg(&op.index_redirect, &["__idx"])?;

    let mut preamble = String::new();
    preamble.push_str(&port_pre);
    preamble.push_str(&from_pre);
    preamble.push_str(&vr_pre);
    preamble.push_str(&pr_pre);

    let template_expr = match &op.template {
        Some(t) => t.generate()?.expr,
        None => "ANY_VALUE".into(),
    };

    let expr = match kind {
        ReceiveKind::Receive | ReceiveKind::Trigger | ReceiveKind::CheckReceive => {
            format!("{port}.receive({template_expr}, {vr}, {from}, {sender}, {index})")
        }
        ReceiveKind::Getcall | ReceiveKind::CheckGetcall => {
            let signature = op
                .signature_name
                .as_deref()
                .ok_or_else(|| GenError::fatal("getcall missing signature name"))?;
            let param = format!("{signature}_call_redirect({pr})");
            format!("{port}.getcall({template_expr}, {from}, {param}, {sender}, {index})")
        }
        ReceiveKind::Getreply | ReceiveKind::CheckGetreply => {
            let signature = op
                .signature_name
                .as_deref()
                .ok_or_else(|| GenError::fatal("getreply missing signature name"))?;
            let return_match = match &op.return_value_match {
                Some(t) => t.generate()?.expr,
                None => "ANY_VALUE".into(),
            };
            let param = format!("{signature}_reply_redirect({vr}, {pr})");
            format!(
                "{port}.getreply({template_expr}.set_value_template({return_match}), {from}, {param}, {sender}, {index})"
            )
        }
        ReceiveKind::Catch | ReceiveKind::CheckCatch => {
            let signature = op
                .signature_name
                .as_deref()
                .ok_or_else(|| GenError::fatal("catch missing signature name"))?;
            format!(
                "{port}.get_exception({signature}_exception_template({template_expr}, {vr}), {from}, {sender}, {index})"
            )
        }
        ReceiveKind::Check => {
            format!("{port}.check({from}, {sender}, {index})")
        }
    };

    Ok((preamble, expr))
}

pub fn emit_receive_like(
    cu: &mut CompilationUnit,
    kind: ReceiveKind,
    op: &ReceiveOp,
    location_text: &str,
) -> Result<String, GenError> {
    let (preamble, expr) = build_matcher(cu, kind, op)?;
    Ok(wrap_standalone_loop(cu, &preamble, &expr, kind.can_repeat(), location_text))
}

/// **done** (§4.3, property 7): the matched template's static type must
/// carry the "done extension"; otherwise the generator falls back to the
/// error type and records a diagnostic (the checker is assumed to have
/// already rejected this, so here it is a fatal assertion).
fn build_done_matcher(cu: &mut CompilationUnit, stmt: &DoneStmt) -> Result<(String, String), GenError> {
    if let Some(template) = &stmt.value_match {
        if !template.static_type().done_extension {
            return Err(GenError::fatal(
                "done(match, ...) target type has no done extension",
            ));
        }
    }

    let (preamble, target_expr) = match &stmt.target {
        DoneTarget::Component(c) => {
            let e = c.generate()?;
            (e.preamble, e.expr)
        }
        DoneTarget::AnyComponent => (String::new(), "TTCN_Runtime::any_compref".into()),
        DoneTarget::AllComponent => (String::new(), "TTCN_Runtime::all_compref".into()),
    };

    let (vr_pre, vr) = value_redirect_arg(cu, &stmt.value_redirect, stmt.value_match.as_deref())?;
    let index = index_redirect_arg(&stmt.index_redirect, &["__idx"])?;

    let mut full_preamble = preamble;
    full_preamble.push_str(&vr_pre);

    let expr = match &stmt.value_match {
        Some(t) => {
            let m = t.generate()?.expr;
            format!("TTCN_Runtime::component_done({target_expr}, {m}, {vr}, {index})")
        }
        None => format!("{target_expr}.done({index})"),
    };

    Ok((full_preamble, expr))
}

pub fn emit_done(cu: &mut CompilationUnit, stmt: &DoneStmt, location_text: &str) -> Result<String, GenError> {
    let (preamble, expr) = build_done_matcher(cu, stmt)?;
    Ok(wrap_standalone_loop(cu, &preamble, &expr, true, location_text))
}

fn build_killed_matcher(stmt: &KilledStmt) -> Result<(String, String), GenError> {
    let index = index_redirect_arg(&stmt.index_redirect, &["__idx"])?;
    match &stmt.target {
        KilledTarget::Component(c) => {
            let e = c.generate()?;
            Ok((e.preamble, format!("{}.killed({index})", e.expr)))
        }
        KilledTarget::AnyComponent => Ok((String::new(), format!("TTCN_Runtime::any_component_killed({index})"))),
        KilledTarget::AllComponent => Ok((String::new(), format!("TTCN_Runtime::all_component_killed({index})"))),
    }
}

pub fn emit_killed(cu: &mut CompilationUnit, stmt: &KilledStmt, location_text: &str) -> Result<String, GenError> {
    let (preamble, expr) = build_killed_matcher(stmt)?;
    Ok(wrap_standalone_loop(cu, &preamble, &expr, true, location_text))
}

fn build_timeout_matcher(stmt: &TimeoutStmt) -> Result<(String, String), GenError> {
    let index = index_redirect_arg(&stmt.index_redirect, &["__idx"])?;
    match &stmt.target {
        TimeoutTarget::Timer(t) => {
            let e = t.generate()?;
            Ok((e.preamble, format!("{}.timeout({index})", e.expr)))
        }
        TimeoutTarget::AnyTimer => Ok((String::new(), format!("TTCN_Runtime::any_timer_timeout({index})"))),
    }
}

pub fn emit_timeout(cu: &mut CompilationUnit, stmt: &TimeoutStmt, location_text: &str) -> Result<String, GenError> {
    let (preamble, expr) = build_timeout_matcher(stmt)?;
    Ok(wrap_standalone_loop(cu, &preamble, &expr, false, location_text))
}

/// A single matcher-invocation form of a guard operation, for use inside an
/// `alt`/`interleave` branch's guard-operation phase (§4.3, §4.4): returns
/// `Some((preamble, expr, can_repeat))` for a receiving statement kind
/// (`receive`/`trigger`/`getcall`/`getreply`/`catch`/`check`/`done`/`killed`/
/// `timeout`, with or without `check`), `None` for anything else, in which
/// case the caller falls back to a full statement emission.
pub fn build_matcher_for_guard_op(
    cu: &mut CompilationUnit,
    stmt: &crate::ast::Statement,
) -> Result<Option<(String, String, bool)>, GenError> {
    use crate::ast::StatementKind::*;

    let (preamble, expr, can_repeat) = match &stmt.kind {
        Receive(op) => {
            let (p, e) = build_matcher(cu, ReceiveKind::Receive, op)?;
            (p, e, ReceiveKind::Receive.can_repeat())
        }
        Trigger(op) => {
            let (p, e) = build_matcher(cu, ReceiveKind::Trigger, op)?;
            (p, e, ReceiveKind::Trigger.can_repeat())
        }
        CheckReceive(op) => {
            let (p, e) = build_matcher(cu, ReceiveKind::CheckReceive, op)?;
            (p, e, ReceiveKind::CheckReceive.can_repeat())
        }
        Getcall(op) => {
            let (p, e) = build_matcher(cu, ReceiveKind::Getcall, op)?;
            (p, e, ReceiveKind::Getcall.can_repeat())
        }
        CheckGetcall(op) => {
            let (p, e) = build_matcher(cu, ReceiveKind::CheckGetcall, op)?;
            (p, e, ReceiveKind::CheckGetcall.can_repeat())
        }
        Getreply(op) => {
            let (p, e) = build_matcher(cu, ReceiveKind::Getreply, op)?;
            (p, e, ReceiveKind::Getreply.can_repeat())
        }
        CheckGetreply(op) => {
            let (p, e) = build_matcher(cu, ReceiveKind::CheckGetreply, op)?;
            (p, e, ReceiveKind::CheckGetreply.can_repeat())
        }
        Catch(op) => {
            let (p, e) = build_matcher(cu, ReceiveKind::Catch, op)?;
            (p, e, ReceiveKind::Catch.can_repeat())
        }
        CheckCatch(op) => {
            let (p, e) = build_matcher(cu, ReceiveKind::CheckCatch, op)?;
            (p, e, ReceiveKind::CheckCatch.can_repeat())
        }
        Check(op) => {
            let (p, e) = build_matcher(cu, ReceiveKind::Check, op)?;
            (p, e, ReceiveKind::Check.can_repeat())
        }
        Done(s) => {
            let (p, e) = build_done_matcher(cu, s)?;
            (p, e, true)
        }
        Killed(s) => {
            let (p, e) = build_killed_matcher(s)?;
            (p, e, true)
        }
        Timeout(s) => {
            let (p, e) = build_timeout_matcher(s)?;
            (p, e, false)
        }
        _ => return Ok(None),
    };
    Ok(Some((preamble, expr, can_repeat)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{MockRef, MockTemplate};
    use ttgen_core::GenOptions;

    /// Property 6: exactly one non-blocking and one blocking `take_new` per
    /// standalone receive loop.
    #[test]
    fn standalone_loop_has_exactly_one_of_each_take_new() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let op = ReceiveOp {
            kind: ReceiveKind::Receive,
            port: Some(MockRef::new("p").boxed()),
            template: Some(MockTemplate::new("t").boxed()),
            return_value_match: None,
            signature_name: None,
            from: None,
            sender_redirect: None,
            value_redirect: None,
            param_redirect: None,
            index_redirect: None,
        };
        let out = emit_receive_like(&mut cu, ReceiveKind::Receive, &op, "x.ttcn:1").unwrap();
        assert_eq!(out.matches("take_new(FALSE)").count(), 1);
        assert_eq!(out.matches("take_new(TRUE)").count(), 1);
    }

    #[test]
    fn receive_never_emits_repeat_goto() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let op = ReceiveOp {
            kind: ReceiveKind::Receive,
            port: Some(MockRef::new("p").boxed()),
            template: Some(MockTemplate::new("t").boxed()),
            return_value_match: None,
            signature_name: None,
            from: None,
            sender_redirect: None,
            value_redirect: None,
            param_redirect: None,
            index_redirect: None,
        };
        let out = emit_receive_like(&mut cu, ReceiveKind::Receive, &op, "x.ttcn:1").unwrap();
        assert!(!out.contains("ALT_REPEAT"));
    }

    #[test]
    fn trigger_can_repeat() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let op = ReceiveOp {
            kind: ReceiveKind::Trigger,
            port: Some(MockRef::new("p").boxed()),
            template: Some(MockTemplate::new("t").boxed()),
            return_value_match: None,
            signature_name: None,
            from: None,
            sender_redirect: None,
            value_redirect: None,
            param_redirect: None,
            index_redirect: None,
        };
        let out = emit_receive_like(&mut cu, ReceiveKind::Trigger, &op, "x.ttcn:1").unwrap();
        assert!(out.contains("ALT_REPEAT"));
    }

    /// S6: `p.getreply(sig_call value tmpl) value (v @decoded)` — a decoded
    /// value redirect on a `getreply` picks the re-decode path (a synthesised
    /// `Value_Redirect_Interface` subclass calling `.decode(`) rather than a
    /// plain copy, under runtime-2.
    #[test]
    fn getreply_with_decoded_value_redirect_synthesises_decode_class() {
        use crate::ast::{PathStep, ValueRedirect, ValueRedirectEntry};
        use ttgen_core::GenOptions;

        let mut options = GenOptions::default();
        options.runtime = ttgen_core::options::RuntimeGeneration::Runtime2;
        let mut cu = CompilationUnit::new(options);

        let op = ReceiveOp {
            kind: ReceiveKind::Getreply,
            port: Some(MockRef::new("p").boxed()),
            template: Some(MockTemplate::new("t").boxed()),
            return_value_match: Some(MockTemplate::new("ret_t").boxed()),
            signature_name: Some("sig".into()),
            from: None,
            sender_redirect: None,
            value_redirect: Some(ValueRedirect {
                entries: vec![ValueRedirectEntry {
                    target: MockRef::new("v").boxed(),
                    sub_path: vec![PathStep::Field("f".into())],
                    decoded: true,
                    string_encoding: None,
                    decoded_target_type: Some("MyMsg".into()),
                }],
            }),
            param_redirect: None,
            index_redirect: None,
        };
        let out = emit_receive_like(&mut cu, ReceiveKind::Getreply, &op, "x.ttcn:1").unwrap();
        assert!(out.contains("getreply("));
        assert!(cu.class_defs.contains("Value_Redirect_Interface"));
        assert!(cu.class_defs.contains("MyMsg_descr_"));
        assert!(cu.class_defs.contains(".decode("));
    }

    /// Property 8: a whole-value `@decoded` redirect whose target type and
    /// string encoding match the matched template's own `decode_match`
    /// reuses that template's decoded result instead of re-decoding.
    #[test]
    fn getreply_reuses_decoded_result_when_matched_template_already_decoded_it() {
        use crate::ast::ValueRedirectEntry;
        use ttgen_core::GenOptions;

        let mut options = GenOptions::default();
        options.runtime = ttgen_core::options::RuntimeGeneration::Runtime2;
        let mut cu = CompilationUnit::new(options);

        let op = ReceiveOp {
            kind: ReceiveKind::Getreply,
            port: Some(MockRef::new("p").boxed()),
            template: Some(MockTemplate::new("t").decode_match_into("MyMsg", None)),
            return_value_match: Some(MockTemplate::new("ret_t").boxed()),
            signature_name: Some("sig".into()),
            from: None,
            sender_redirect: None,
            value_redirect: Some(ValueRedirect {
                entries: vec![ValueRedirectEntry {
                    target: MockRef::new("v").boxed(),
                    sub_path: vec![],
                    decoded: true,
                    string_encoding: None,
                    decoded_target_type: Some("MyMsg".into()),
                }],
            }),
            param_redirect: None,
            index_redirect: None,
        };
        let out = emit_receive_like(&mut cu, ReceiveKind::Getreply, &op, "x.ttcn:1").unwrap();
        assert!(out.contains("getreply("));
        assert!(cu.class_defs.contains("decode_match_result()"));
        assert!(!cu.class_defs.contains(".decode(MyMsg_descr_"));
    }

    /// §4.3: `getcall`'s `_call_redirect` argument unpacks the parameter
    /// redirect, never the (always-absent) value redirect.
    #[test]
    fn getcall_wires_param_redirect_into_call_redirect() {
        use crate::ast::{ParamRedirect, ParamRedirectEntry};

        let mut options = GenOptions::default();
        options.runtime = ttgen_core::options::RuntimeGeneration::Runtime2;
        let mut cu = CompilationUnit::new(options);

        let op = ReceiveOp {
            kind: ReceiveKind::Getcall,
            port: Some(MockRef::new("p").boxed()),
            template: Some(MockTemplate::new("t").boxed()),
            return_value_match: None,
            signature_name: Some("sig".into()),
            from: None,
            sender_redirect: None,
            value_redirect: None,
            param_redirect: Some(ParamRedirect {
                entries: vec![ParamRedirectEntry {
                    target: Some(MockRef::new("p_out").boxed()),
                    decoded: false,
                    string_encoding: None,
                    decoded_target_type: None,
                }],
            }),
            index_redirect: None,
        };
        let (_, expr) = build_matcher(&mut cu, ReceiveKind::Getcall, &op).unwrap();
        assert!(expr.contains("sig_call_redirect(&pr_inst_"));
        assert!(!expr.contains("sig_call_redirect(NULL"));
        assert!(cu.class_defs.contains("Parameter_Redirect_Interface"));
        assert!(cu.class_defs.contains("p_out = (*params).get_field(0);"));
    }

    /// §4.3: `getreply`'s `_reply_redirect` argument takes both the value
    /// redirect and the parameter redirect.
    #[test]
    fn getreply_wires_both_value_and_param_redirect_into_reply_redirect() {
        use crate::ast::{ParamRedirect, ParamRedirectEntry, ValueRedirect, ValueRedirectEntry};

        let mut options = GenOptions::default();
        options.runtime = ttgen_core::options::RuntimeGeneration::Runtime2;
        let mut cu = CompilationUnit::new(options);

        let op = ReceiveOp {
            kind: ReceiveKind::Getreply,
            port: Some(MockRef::new("p").boxed()),
            template: Some(MockTemplate::new("t").boxed()),
            return_value_match: Some(MockTemplate::new("ret_t").boxed()),
            signature_name: Some("sig".into()),
            from: None,
            sender_redirect: None,
            value_redirect: Some(ValueRedirect {
                entries: vec![ValueRedirectEntry {
                    target: MockRef::new("v_out").boxed(),
                    sub_path: vec![],
                    decoded: false,
                    string_encoding: None,
                    decoded_target_type: None,
                }],
            }),
            param_redirect: Some(ParamRedirect {
                entries: vec![ParamRedirectEntry {
                    target: Some(MockRef::new("p_out").boxed()),
                    decoded: false,
                    string_encoding: None,
                    decoded_target_type: None,
                }],
            }),
            index_redirect: None,
        };
        let (_, expr) = build_matcher(&mut cu, ReceiveKind::Getreply, &op).unwrap();
        assert!(expr.contains("sig_reply_redirect(&vr_inst_") && expr.contains(", &pr_inst_"));
        assert!(cu.class_defs.contains("Value_Redirect_Interface"));
        assert!(cu.class_defs.contains("Parameter_Redirect_Interface"));
    }

    #[test]
    fn done_without_done_extension_is_fatal() {
        use ttgen_core::ast_node::{StaticTypeInfo, TemplateKind, TemplateNode};

        struct NoDoneExtTemplate;
        impl TemplateNode for NoDoneExtTemplate {
            fn static_type(&self) -> StaticTypeInfo {
                StaticTypeInfo {
                    descriptor_name: "X".into(),
                    kind: StaticTypeKind::Other,
                    done_extension: false,
                    decode_match_descriptor: None,
                }
            }
            fn kind(&self) -> TemplateKind {
                TemplateKind::AnyValue
            }
            fn is_decode_match(&self) -> bool {
                false
            }
            fn decode_match_encoding(&self) -> Option<String> {
                None
            }
            fn generate(&self) -> Result<ttgen_core::Expression, GenError> {
                Ok(ttgen_core::Expression::value("x"))
            }
            fn location(&self) -> Option<ttgen_core::SourceLocation> {
                None
            }
        }

        let mut cu = CompilationUnit::new(GenOptions::default());
        let stmt = DoneStmt {
            target: DoneTarget::AnyComponent,
            value_match: Some(Box::new(NoDoneExtTemplate)),
            value_redirect: None,
            index_redirect: None,
        };
        let err = emit_done(&mut cu, &stmt, "x.ttcn:1").unwrap_err();
        assert!(matches!(err, GenError::Fatal { .. }));
    }
}
