//! L1: function-reference value/template emitter (§4.2).
//!
//! Three kinds (function, altstep, testcase) share the same template-class
//! shape as the enum emitter (§4.1); only the value class differs per kind.

use std::fmt::Write as _;

use ttgen_core::GenError;

use super::state::CompilationUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FuncRefKind {
    Function,
    Altstep,
    Testcase,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FuncRefDef {
    pub kind: FuncRefKind,
    pub name: String,
    /// Textual fragment of the formal-parameter list, opaque to this
    /// emitter beyond being spliced verbatim into signatures.
    pub formal_params: String,
    /// Only meaningful for `Function`.
    pub return_type: Option<String>,
    pub runs_on_type: Option<String>,
    /// Functions that run on `self` may not be `start()`-ed or have their
    /// address looked up for encode/decode (§4.2).
    pub runs_on_self: bool,
    pub startable: bool,
}

fn class_name(def: &FuncRefDef) -> String {
    format!("{}_ref", def.name)
}

pub fn emit_funcref(cu: &mut CompilationUnit, def: &FuncRefDef) -> Result<(), GenError> {
    emit_value_class(cu, def)?;
    emit_template_class(cu, def)?;
    Ok(())
}

fn unbound_message(def: &FuncRefDef) -> &'static str {
    match def.kind {
        FuncRefKind::Function => "unbound-operand: call of unbound function reference",
        FuncRefKind::Altstep => "unbound-operand: invoke of unbound altstep reference",
        FuncRefKind::Testcase => "unbound-operand: execute of unbound testcase reference",
    }
}

fn emit_value_class(cu: &mut CompilationUnit, def: &FuncRefDef) -> Result<(), GenError> {
    let class = class_name(def);
    let params = &def.formal_params;

    writeln!(cu.class_defs, "class {class} {{")?;
    writeln!(cu.class_defs, "public:")?;
    writeln!(cu.class_defs, "  {class}();")?;
    writeln!(cu.class_defs, "  {class}& operator=(const {class}& other);")?;
    writeln!(cu.class_defs, "  boolean operator==(const {class}& other) const;")?;

    match def.kind {
        FuncRefKind::Function => {
            let ret = def.return_type.as_deref().unwrap_or("void");
            writeln!(cu.class_defs, "  {ret} invoke({params});")?;
            if def.startable {
                writeln!(cu.class_defs, "  void start(COMPONENT compref, {params});")?;
            }
            if !def.runs_on_self {
                writeln!(cu.class_defs, "  int encode_txt(TTCN_Buffer& buf) const;")?;
                writeln!(cu.class_defs, "  void decode_txt(TTCN_Buffer& buf);")?;
            }
        }
        FuncRefKind::Altstep => {
            writeln!(cu.class_defs, "  alt_status invoke({params});")?;
            writeln!(cu.class_defs, "  alt_status invoke_standalone({params});")?;
            writeln!(cu.class_defs, "  Default_Base* activate({params});")?;
        }
        FuncRefKind::Testcase => {
            writeln!(cu.class_defs, "  verdicttype execute({params});")?;
        }
    }

    writeln!(cu.class_defs, "private:")?;
    writeln!(cu.class_defs, "  void* func_ptr;")?;
    writeln!(cu.class_defs, "  boolean bound_flag;")?;
    writeln!(cu.class_defs, "}};")?;
    writeln!(cu.class_defs)?;

    writeln!(cu.methods, "{class}::{class}() : func_ptr(nullptr), bound_flag(FALSE) {{}}")?;
    writeln!(cu.methods)?;

    writeln!(cu.methods, "{class}& {class}::operator=(const {class}& other) {{")?;
    writeln!(cu.methods, "  if (!other.bound_flag)")?;
    writeln!(cu.methods, "    TTCN_error(\"{}\");", unbound_message(def))?;
    writeln!(cu.methods, "  func_ptr = other.func_ptr;")?;
    writeln!(cu.methods, "  bound_flag = TRUE;")?;
    writeln!(cu.methods, "  return *this;")?;
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    match def.kind {
        FuncRefKind::Function => {
            let ret = def.return_type.as_deref().unwrap_or("void");
            writeln!(cu.methods, "{ret} {class}::invoke({params}) {{")?;
            writeln!(cu.methods, "  if (!bound_flag || func_ptr == nullptr)")?;
            writeln!(cu.methods, "    TTCN_error(\"{}\");", unbound_message(def))?;
            writeln!(cu.methods, "  return reinterpret_cast<{ret}(*)({params})>(func_ptr)(/* args */);")?;
            writeln!(cu.methods, "}}")?;
            writeln!(cu.methods)?;
            if !def.runs_on_self {
                writeln!(cu.methods, "int {class}::encode_txt(TTCN_Buffer& buf) const {{")?;
                writeln!(cu.methods, "  buf.put_int(lookup_function_address(func_ptr));")?;
                writeln!(cu.methods, "  return 0;")?;
                writeln!(cu.methods, "}}")?;
                writeln!(cu.methods)?;
            }
        }
        FuncRefKind::Altstep => {
            writeln!(cu.methods, "alt_status {class}::invoke({params}) {{")?;
            writeln!(cu.methods, "  if (!bound_flag)")?;
            writeln!(cu.methods, "    TTCN_error(\"{}\");", unbound_message(def))?;
            writeln!(cu.methods, "  return reinterpret_cast<alt_status(*)({params})>(func_ptr)(/* args */);")?;
            writeln!(cu.methods, "}}")?;
            writeln!(cu.methods)?;
        }
        FuncRefKind::Testcase => {
            writeln!(cu.methods, "verdicttype {class}::execute({params}) {{")?;
            writeln!(cu.methods, "  if (!bound_flag)")?;
            writeln!(cu.methods, "    TTCN_error(\"{}\");", unbound_message(def))?;
            writeln!(cu.methods, "  return reinterpret_cast<verdicttype(*)({params})>(func_ptr)(/* args */);")?;
            writeln!(cu.methods, "}}")?;
            writeln!(cu.methods)?;
        }
    }

    Ok(())
}

fn emit_template_class(cu: &mut CompilationUnit, def: &FuncRefDef) -> Result<(), GenError> {
    let class = class_name(def);
    let tmpl = format!("{class}_template");

    writeln!(cu.class_defs, "class {tmpl} {{")?;
    writeln!(cu.class_defs, "public:")?;
    writeln!(cu.class_defs, "  enum template_kind {{")?;
    writeln!(
        cu.class_defs,
        "    SPECIFIC_VALUE, OMIT_VALUE, ANY_VALUE, ANY_OR_OMIT, VALUE_LIST, COMPLEMENTED_LIST"
    )?;
    writeln!(cu.class_defs, "  }};")?;
    writeln!(cu.class_defs, "  {tmpl}();")?;
    writeln!(cu.class_defs, "  boolean match(const {class}& other) const;")?;
    writeln!(cu.class_defs, "  {class} list_item(int index) const;")?;
    writeln!(cu.class_defs, "  void log() const;")?;
    writeln!(cu.class_defs, "  void log_match(const {class}& v) const;")?;
    writeln!(cu.class_defs, "private:")?;
    writeln!(cu.class_defs, "  template_kind kind;")?;
    writeln!(cu.class_defs, "  {class} single_value;")?;
    writeln!(cu.class_defs, "  std::vector<{class}> list_values;")?;
    writeln!(cu.class_defs, "}};")?;
    writeln!(cu.class_defs)?;

    writeln!(cu.methods, "{tmpl}::{tmpl}() : kind(ANY_VALUE) {{}}")?;
    writeln!(cu.methods)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttgen_core::GenOptions;

    #[test]
    fn altstep_activate_returns_default_base_pointer() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let def = FuncRefDef {
            kind: FuncRefKind::Altstep,
            name: "my_altstep".into(),
            formal_params: "".into(),
            return_type: None,
            runs_on_type: Some("MyComp".into()),
            runs_on_self: false,
            startable: false,
        };
        emit_funcref(&mut cu, &def).unwrap();
        assert!(cu.class_defs.contains("Default_Base* activate"));
    }

    #[test]
    fn function_running_on_self_has_no_encode_entry_point() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        let def = FuncRefDef {
            kind: FuncRefKind::Function,
            name: "f".into(),
            formal_params: "".into(),
            return_type: Some("integer".into()),
            runs_on_type: None,
            runs_on_self: true,
            startable: false,
        };
        emit_funcref(&mut cu, &def).unwrap();
        assert!(!cu.class_defs.contains("encode_txt"));
    }
}
