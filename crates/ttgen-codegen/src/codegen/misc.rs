//! The remaining statement kinds with no dedicated module: log/action,
//! setverdict, execute(testcase), string2value/int2enum, `@update`, and
//! setstate (§4.3).

use std::fmt::Write as _;

use ttgen_core::GenError;

use crate::ast::{ExecuteStmt, UpdateStmt, ValBox};

use super::state::CompilationUnit;

fn render_args(args: &[ValBox]) -> Result<String, GenError> {
    let mut parts = Vec::with_capacity(args.len());
    for a in args {
        parts.push(a.generate()?.expr);
    }
    Ok(parts.join(", "))
}

pub fn emit_log(args: &[ValBox]) -> Result<String, GenError> {
    let mut out = String::new();
    writeln!(out, "TTCN_Logger::begin_event(TTCN_Logger::USER_LOG);")?;
    for a in args {
        let e = a.generate()?;
        out.push_str(&e.preamble);
        writeln!(out, "TTCN_Logger::log_event_str({});", e.expr)?;
        out.push_str(&e.postamble);
    }
    writeln!(out, "TTCN_Logger::end_event();")?;
    Ok(out)
}

pub fn emit_action(args: &[ValBox]) -> Result<String, GenError> {
    let arglist = render_args(args)?;
    Ok(format!("TTCN_Runtime::action_debug({arglist});\n"))
}

pub fn emit_setverdict(verdict: &ValBox, reason: &Option<ValBox>) -> Result<String, GenError> {
    let v = verdict.generate()?;
    let mut out = String::new();
    out.push_str(&v.preamble);
    match reason {
        Some(r) => {
            let re = r.generate()?;
            out.push_str(&re.preamble);
            writeln!(out, "TTCN_Runtime::setverdict({}, {});", v.expr, re.expr)?;
            out.push_str(&re.postamble);
        }
        None => writeln!(out, "TTCN_Runtime::setverdict({});", v.expr)?,
    }
    out.push_str(&v.postamble);
    Ok(out)
}

pub fn emit_execute(stmt: &ExecuteStmt) -> Result<String, GenError> {
    let arglist = render_args(&stmt.args)?;
    let timer_expr = match &stmt.timer {
        Some(t) => Some(t.generate()?.expr),
        None => None,
    };
    let call = match timer_expr {
        Some(t) => format!("{}({arglist}, {t})", stmt.testcase_name),
        None => format!("{}({arglist})", stmt.testcase_name),
    };
    Ok(format!("TTCN_Runtime::execute_testcase({call});\n"))
}

pub fn emit_string2value(source: &ValBox, target: &crate::ast::RefBox) -> Result<String, GenError> {
    let s = source.generate()?;
    let t = target.generate()?;
    let mut out = String::new();
    out.push_str(&s.preamble);
    out.push_str(&t.preamble);
    writeln!(out, "str2value({}, {});", s.expr, t.expr)?;
    out.push_str(&t.postamble);
    out.push_str(&s.postamble);
    Ok(out)
}

pub fn emit_int2enum(source: &ValBox, target: &crate::ast::RefBox) -> Result<String, GenError> {
    let s = source.generate()?;
    let t = target.generate()?;
    let mut out = String::new();
    out.push_str(&s.preamble);
    out.push_str(&t.preamble);
    writeln!(out, "{} = decltype({})::int2enum({});", t.expr, t.expr, s.expr)?;
    out.push_str(&t.postamble);
    out.push_str(&s.postamble);
    Ok(out)
}

/// **@update** (§4.3): a parametrised template's descriptor is referred to
/// via a process-wide pointer (written into `def_glob_vars`); a plain
/// template/constant stores it directly. The descriptor table entry's
/// initialisation may reference local variables, so it is emitted at the
/// `@update` site and only registered globally, never initialised there.
pub fn emit_update(cu: &mut CompilationUnit, stmt: &UpdateStmt) -> Result<String, GenError> {
    let mut out = String::new();
    match &stmt.descriptor {
        None => {
            if stmt.is_parametrised_template {
                writeln!(out, "{}_err_descr_ptr = NULL;", stmt.target_name)?;
            } else {
                writeln!(out, "{}.set_err_descr(NULL);", stmt.target_name)?;
            }
        }
        Some(descr) => {
            let d = descr.generate()?;
            out.push_str(&d.preamble);
            let tmp = cu.fresh_tmp("errdescr");
            writeln!(out, "Erroneous_Descriptor {tmp}({});", d.expr)?;
            out.push_str(&d.postamble);
            if stmt.is_parametrised_template {
                writeln!(
                    cu.def_glob_vars,
                    "extern Erroneous_Descriptor* {}_err_descr_ptr;",
                    stmt.target_name
                )?;
                writeln!(out, "{}_err_descr_ptr = &{tmp};", stmt.target_name)?;
            } else {
                writeln!(out, "{}.set_err_descr(&{tmp});", stmt.target_name)?;
            }
        }
    }
    Ok(out)
}

/// **setstate** (§4.3): the first argument is constant-folded when
/// possible; it must be one of the four port-state values `0..3`.
pub fn emit_setstate(cu: &mut CompilationUnit, state: &ValBox, info: &Option<crate::ast::TemplBox>) -> Result<String, GenError> {
    let s = state.generate()?;
    let mut out = String::new();
    out.push_str(&s.preamble);

    if let Some(n) = state.const_fold_int() {
        if !(0..=3).contains(&n) {
            return Err(GenError::fatal(format!(
                "setstate: constant port-state value {n} out of range 0..3"
            )));
        }
    }

    let reason_expr = match info {
        Some(t) => {
            let e = t.generate()?;
            cu.warn("setstate template instance is logged, not matched", None);
            format!("{}.log()", e.expr)
        }
        None => "NULL".into(),
    };
    writeln!(out, "TTCN_Runtime::set_port_state({}, {reason_expr}, FALSE);", s.expr)?;
    out.push_str(&s.postamble);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{MockRef, MockValue};
    use ttgen_core::GenOptions;

    #[test]
    fn setverdict_with_reason_passes_both() {
        let out = emit_setverdict(&MockValue::new("fail").boxed(), &Some(MockValue::new("r").boxed())).unwrap();
        assert!(out.contains("setverdict(fail, r);"));
    }

    #[test]
    fn setstate_rejects_out_of_range_constant() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let err = emit_setstate(&mut cu, &MockValue::const_int(7).boxed(), &None).unwrap_err();
        assert!(matches!(err, GenError::Fatal { .. }));
    }

    #[test]
    fn setstate_in_range_constant_is_accepted() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let out = emit_setstate(&mut cu, &MockValue::const_int(2).boxed(), &None).unwrap();
        assert!(out.contains("set_port_state(2, NULL, FALSE);"));
    }

    #[test]
    fn update_detach_on_parametrised_template_nulls_the_pointer() {
        let stmt = UpdateStmt {
            target_name: "tmpl".into(),
            descriptor: None,
            is_parametrised_template: true,
        };
        let mut cu = CompilationUnit::new(GenOptions::default());
        let out = emit_update(&mut cu, &stmt).unwrap();
        assert!(out.contains("tmpl_err_descr_ptr = NULL;"));
    }

    #[test]
    fn int2enum_assigns_through_target_enum_type() {
        let out = emit_int2enum(&MockValue::new("5").boxed(), &MockRef::new("e").boxed()).unwrap();
        assert!(out.contains("int2enum(5)"));
    }
}
