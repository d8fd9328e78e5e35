//! Redirect emission: value / parameter / index redirects (§3, §4.3).

use std::fmt::Write as _;

use ttgen_core::ast_node::TemplateNode;
use ttgen_core::GenError;

use crate::ast::{
    IndexRedirect, IndexRedirectShape, ParamRedirect, PathStep, ValueRedirect, ValueRedirectEntry,
};

use super::state::CompilationUnit;

/// Property 8: does this entry qualify for the decode-reuse optimisation
/// instead of a fresh re-decode? Only a whole-value redirect (no sub-path)
/// can be compared against the matched template as a unit -- the opaque
/// `TemplateNode` boundary (§3) exposes no way to ask "what template
/// matched at this sub-path", so a redirect with a non-empty `sub_path`
/// always takes the re-decode branch.
fn reuses_decoded_result(entry: &ValueRedirectEntry, matched: Option<&dyn TemplateNode>) -> bool {
    if !entry.sub_path.is_empty() {
        return false;
    }
    let Some(matched) = matched else { return false };
    if !matched.is_decode_match() {
        return false;
    }
    let Some(decoded_type) = &entry.decoded_target_type else {
        return false;
    };
    if matched.static_type().decode_match_descriptor.as_deref() != Some(decoded_type.as_str()) {
        return false;
    }
    match (&entry.string_encoding, matched.decode_match_encoding()) {
        (None, None) => true,
        (Some(v), Some(enc)) => v.single_expr_form().as_deref() == Some(enc.as_str()),
        _ => false,
    }
}

fn path_suffix(path: &[PathStep]) -> String {
    let mut out = String::new();
    for step in path {
        match step {
            PathStep::Field(name) => {
                let _ = write!(out, ".{name}()");
            }
            PathStep::Index(i) => {
                let _ = write!(out, "[{i}]");
            }
        }
    }
    out
}

/// Emits the statements that copy a received value (or its `decoded`
/// sub-fields) into each value-redirect entry's target. `source_expr` is
/// the already-bound expression for the whole received value.
pub fn emit_value_redirect(
    cu: &mut CompilationUnit,
    redirect: &ValueRedirect,
    source_expr: &str,
    matched: Option<&dyn TemplateNode>,
) -> Result<String, GenError> {
    let mut out = String::new();
    for entry in &redirect.entries {
        let target = entry.target.generate()?;
        out.push_str(&target.preamble);
        let suffix = path_suffix(&entry.sub_path);

        if entry.decoded && reuses_decoded_result(entry, matched) {
            // Property 8: the matched template already decoded this value
            // with the same target type and string encoding -- copy its
            // result instead of re-encoding and re-decoding the bytes.
            writeln!(out, "{} = {source_expr}.decode_match_result();", target.expr)?;
        } else if entry.decoded {
            // runtime-2 rich redirect: re-decode the raw octetstring sub-field
            // into the declared target type instead of a plain copy.
            let decoded_type = entry
                .decoded_target_type
                .as_deref()
                .ok_or_else(|| GenError::fatal("decoded value redirect missing target type"))?;
            let tmp = cu.fresh_tmp("vr_dec");
            writeln!(out, "{decoded_type} {tmp};")?;
            if let Some(enc) = &entry.string_encoding {
                let enc_expr = enc.generate()?;
                out.push_str(&enc_expr.preamble);
                writeln!(
                    out,
                    "{tmp}.decode({decoded_type}_descr_, {source_expr}{suffix}, {});",
                    enc_expr.expr
                )?;
                out.push_str(&enc_expr.postamble);
            } else {
                writeln!(
                    out,
                    "{tmp}.decode({decoded_type}_descr_, {source_expr}{suffix});"
                )?;
            }
            writeln!(out, "{} = {tmp};", target.expr)?;
        } else {
            writeln!(out, "{} = {source_expr}{suffix};", target.expr)?;
        }
        out.push_str(&target.postamble);
    }
    Ok(out)
}

/// Emits the statements that unpack a `call`/`getcall`/`reply`/`getreply`
/// parameter list into each parameter-redirect entry, using `source_expr`
/// as a pre-bound variable naming the whole signature's parameter list and
/// `slot_field(i)` to name field `i` of that parameter list.
pub fn emit_param_redirect(
    cu: &mut CompilationUnit,
    redirect: &ParamRedirect,
    source_expr: &str,
) -> Result<String, GenError> {
    let mut out = String::new();
    for (i, entry) in redirect.entries.iter().enumerate() {
        let Some(target) = &entry.target else {
            continue;
        };
        let target = target.generate()?;
        out.push_str(&target.preamble);
        let field = format!("{source_expr}.get_field({i})");

        if entry.decoded {
            let decoded_type = entry
                .decoded_target_type
                .as_deref()
                .ok_or_else(|| GenError::fatal("decoded param redirect missing target type"))?;
            let tmp = cu.fresh_tmp("pr_dec");
            writeln!(out, "{decoded_type} {tmp};")?;
            writeln!(out, "{tmp}.decode({decoded_type}_descr_, {field});")?;
            writeln!(out, "{} = {tmp};", target.expr)?;
        } else {
            writeln!(out, "{} = {field};", target.expr)?;
        }
        out.push_str(&target.postamble);
    }
    Ok(out)
}

/// Emits the assignment that stores the matched branch/port index from an
/// `any from`/`done`/`killed`/`timeout` index redirect (§4.3, three shapes).
pub fn emit_index_redirect(
    redirect: &IndexRedirect,
    index_vars: &[&str],
) -> Result<String, GenError> {
    let target = redirect.target.generate()?;
    let mut out = String::new();
    out.push_str(&target.preamble);
    match (&redirect.shape, index_vars) {
        (IndexRedirectShape::SingleInteger, [i]) => {
            writeln!(out, "{} = {i};", target.expr)?;
        }
        (IndexRedirectShape::OneDimensional, [i]) => {
            writeln!(out, "{}[0] = {i};", target.expr)?;
        }
        (IndexRedirectShape::MultiDimensional { dims }, idxs) if idxs.len() == dims.len() => {
            for (d, i) in idxs.iter().enumerate() {
                writeln!(out, "{}[{d}] = {i};", target.expr)?;
            }
        }
        _ => {
            return Err(GenError::fatal(
                "index redirect shape does not match the number of resolved indices",
            ));
        }
    }
    out.push_str(&target.postamble);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ParamRedirectEntry, ValueRedirectEntry};
    use crate::testsupport::MockRef;
    use ttgen_core::GenOptions;

    #[test]
    fn plain_value_redirect_copies_field() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let redirect = ValueRedirect {
            entries: vec![ValueRedirectEntry {
                target: MockRef::new("v_out").boxed(),
                sub_path: vec![PathStep::Field("f".into())],
                decoded: false,
                string_encoding: None,
                decoded_target_type: None,
            }],
        };
        let out = emit_value_redirect(&mut cu, &redirect, "received", None).unwrap();
        assert!(out.contains("v_out = received.f();"));
    }

    #[test]
    fn decoded_value_redirect_calls_decode() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let redirect = ValueRedirect {
            entries: vec![ValueRedirectEntry {
                target: MockRef::new("v_out").boxed(),
                sub_path: vec![],
                decoded: true,
                string_encoding: None,
                decoded_target_type: Some("MyMsg".into()),
            }],
        };
        let out = emit_value_redirect(&mut cu, &redirect, "received", None).unwrap();
        assert!(out.contains("MyMsg_descr_"));
        assert!(out.contains(".decode("));
    }

    /// Property 8: when the matched template is itself a `decode_match`
    /// into the same target type with the same (absent) string encoding,
    /// the redirect copies the already-decoded result instead of
    /// re-decoding.
    #[test]
    fn decoded_value_redirect_reuses_matching_decode_match_template() {
        use crate::testsupport::MockTemplate;

        let mut cu = CompilationUnit::new(GenOptions::default());
        let redirect = ValueRedirect {
            entries: vec![ValueRedirectEntry {
                target: MockRef::new("v_out").boxed(),
                sub_path: vec![],
                decoded: true,
                string_encoding: None,
                decoded_target_type: Some("MyMsg".into()),
            }],
        };
        let matched = MockTemplate::new("t").decode_match_into("MyMsg", None);
        let out = emit_value_redirect(&mut cu, &redirect, "received", Some(matched.as_ref())).unwrap();
        assert!(out.contains("v_out = received.decode_match_result();"));
        assert!(!out.contains(".decode(MyMsg_descr_"));
    }

    /// A mismatched target type falls back to re-decoding rather than
    /// silently reusing an unrelated decode result.
    #[test]
    fn decoded_value_redirect_falls_back_when_descriptor_differs() {
        use crate::testsupport::MockTemplate;

        let mut cu = CompilationUnit::new(GenOptions::default());
        let redirect = ValueRedirect {
            entries: vec![ValueRedirectEntry {
                target: MockRef::new("v_out").boxed(),
                sub_path: vec![],
                decoded: true,
                string_encoding: None,
                decoded_target_type: Some("MyMsg".into()),
            }],
        };
        let matched = MockTemplate::new("t").decode_match_into("OtherMsg", None);
        let out = emit_value_redirect(&mut cu, &redirect, "received", Some(matched.as_ref())).unwrap();
        assert!(out.contains(".decode(MyMsg_descr_"));
    }

    #[test]
    fn padded_param_redirect_slot_is_skipped() {
        let redirect = ParamRedirect {
            entries: vec![ParamRedirectEntry {
                target: None,
                decoded: false,
                string_encoding: None,
                decoded_target_type: None,
            }],
        };
        let mut cu = CompilationUnit::new(GenOptions::default());
        let out = emit_param_redirect(&mut cu, &redirect, "params").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn index_redirect_shape_mismatch_is_fatal() {
        let redirect = IndexRedirect {
            target: MockRef::new("idx").boxed(),
            shape: IndexRedirectShape::SingleInteger,
        };
        let err = emit_index_redirect(&redirect, &["0", "1"]).unwrap_err();
        assert!(matches!(err, GenError::Fatal { .. }));
    }
}
