//! Top-level assembly: given a checked module's definitions, drives every
//! emitter and returns the finished `CompilationUnit` (§2 "Data flow").
//!
//! A function/testcase body is an ordinary `StatementBlock` dispatched at
//! `Ctx::root()`; an altstep body is the one `AltStmt` dispatched through
//! `alt::emit_altstep_body` regardless of whether any individual branch
//! would, on its own, qualify as "standalone" (§4.5: altstep bodies are
//! always compiled in the altstep-return-value form, never as a free-
//! standing blocking loop).

use ttgen_core::{GenError, GenOptions};

use crate::ast::{AltStmt, StatementBlock};

use super::alt;
use super::context::Ctx;
use super::dispatch::emit_block;
use super::enums::{emit_enum, EnumDef};
use super::funcref::{emit_funcref, FuncRefDef};
use super::state::CompilationUnit;

pub struct FunctionDef {
    pub name: String,
    pub formal_params: String,
    pub return_type: Option<String>,
    pub body: StatementBlock,
}

pub struct AltstepDef {
    pub name: String,
    pub formal_params: String,
    pub body: AltStmt,
}

pub struct TestcaseDef {
    pub name: String,
    pub formal_params: String,
    pub body: StatementBlock,
}

/// A whole compilation unit's worth of already-checked definitions: the
/// generator's only input (§1 "the core receives an already-checked AST").
#[derive(Default)]
pub struct CheckedModule {
    pub enums: Vec<EnumDef>,
    pub funcrefs: Vec<FuncRefDef>,
    pub functions: Vec<FunctionDef>,
    pub altsteps: Vec<AltstepDef>,
    pub testcases: Vec<TestcaseDef>,
}

fn emit_function(cu: &mut CompilationUnit, def: &FunctionDef) -> Result<(), GenError> {
    let ret = def.return_type.as_deref().unwrap_or("void");
    let body = emit_block(cu, &Ctx::root(), &def.body)?;
    cu.class_defs
        .push_str(&format!("{ret} {}({});\n", def.name, def.formal_params));
    cu.methods.push_str(&format!(
        "{ret} {}({}) {{\n{body}}}\n\n",
        def.name, def.formal_params
    ));
    Ok(())
}

fn emit_altstep(cu: &mut CompilationUnit, def: &AltstepDef) -> Result<(), GenError> {
    let body = alt::emit_altstep_body(cu, &Ctx::root(), &def.body)?;
    cu.class_defs
        .push_str(&format!("alt_status {}({});\n", def.name, def.formal_params));
    cu.methods.push_str(&format!(
        "alt_status {}({}) {{\n{body}}}\n\n",
        def.name, def.formal_params
    ));
    Ok(())
}

fn emit_testcase(cu: &mut CompilationUnit, def: &TestcaseDef) -> Result<(), GenError> {
    let body = emit_block(cu, &Ctx::root(), &def.body)?;
    cu.class_defs
        .push_str(&format!("verdicttype {}({});\n", def.name, def.formal_params));
    cu.methods.push_str(&format!(
        "verdicttype {}({}) {{\n{body}  return TTCN_Runtime::get_final_verdict();\n}}\n\n",
        def.name, def.formal_params
    ));
    Ok(())
}

/// Generates the four text sinks for one module. Definitions are emitted
/// in the order L1 (enums, funcrefs) then L2 (functions, altsteps,
/// testcases) since later sinks may reference the earlier ones' class
/// names but never the reverse.
pub fn generate_module(options: GenOptions, module: &CheckedModule) -> Result<CompilationUnit, GenError> {
    let mut cu = CompilationUnit::new(options);

    for e in &module.enums {
        emit_enum(&mut cu, e)?;
    }
    for f in &module.funcrefs {
        emit_funcref(&mut cu, f)?;
    }
    for f in &module.functions {
        emit_function(&mut cu, f)?;
    }
    for a in &module.altsteps {
        emit_altstep(&mut cu, a)?;
    }
    for t in &module.testcases {
        emit_testcase(&mut cu, t)?;
    }

    Ok(cu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AltGuard, AltGuardTag};
    use crate::codegen::enums::EnumElement;
    use crate::testsupport::MockValue;

    #[test]
    fn module_emits_enum_before_function_that_might_reference_it() {
        let module = CheckedModule {
            enums: vec![EnumDef {
                name: "Color".into(),
                display_name: "Color".into(),
                elements: vec![EnumElement {
                    name: "RED".into(),
                    numeric_value: 0,
                    text_alias: None,
                }],
            }],
            functions: vec![FunctionDef {
                name: "f_noop".into(),
                formal_params: "".into(),
                return_type: None,
                body: StatementBlock::new(vec![]),
            }],
            ..Default::default()
        };
        let cu = generate_module(GenOptions::default(), &module).unwrap();
        let color_pos = cu.class_defs.find("class Color").unwrap();
        let func_pos = cu.class_defs.find("f_noop").unwrap();
        assert!(color_pos < func_pos);
    }

    #[test]
    fn altstep_body_is_always_compiled_in_return_value_form() {
        let module = CheckedModule {
            altsteps: vec![AltstepDef {
                name: "a_default".into(),
                formal_params: "".into(),
                body: AltStmt {
                    branches: vec![AltGuard {
                        tag: AltGuardTag::OpGuard,
                        guard_expr: Some(MockValue::const_bool(true).boxed()),
                        operation: None,
                        body: StatementBlock::new(vec![]),
                        location: None,
                    }],
                },
            }],
            ..Default::default()
        };
        let cu = generate_module(GenOptions::default(), &module).unwrap();
        assert!(cu.methods.contains("alt_status a_default"));
        assert!(cu.methods.contains("return ALT_YES;"));
    }
}
