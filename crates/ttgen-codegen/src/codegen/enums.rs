//! L1: enum value/template class emitter (§4.1).
//!
//! Grounded on the teacher's `codegen/words.rs`, which emits one pair of
//! functions (wrapper + impl) per word definition from a flat descriptor —
//! here one value class + one template class is emitted per enum
//! definition from a flat `EnumDef` descriptor, written straight into the
//! `class_defs`/`methods` sinks rather than returned as a string, matching
//! how the teacher's per-word emitters push directly into `self.output`.

use std::fmt::Write as _;

use ttgen_core::GenError;

use super::state::CompilationUnit;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EnumElement {
    pub name: String,
    pub numeric_value: i64,
    pub text_alias: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub display_name: String,
    pub elements: Vec<EnumElement>,
}

impl EnumDef {
    /// Minimum unsigned bit width needed to represent every element's
    /// numeric value, plus a sign bit if any value is negative (used by
    /// the RAW encode/decode entry point, §4.1).
    pub fn raw_bit_width(&self) -> u32 {
        let has_negative = self.elements.iter().any(|e| e.numeric_value < 0);
        let max_magnitude = self
            .elements
            .iter()
            .map(|e| e.numeric_value.unsigned_abs())
            .max()
            .unwrap_or(0);
        let mut bits = 64 - max_magnitude.leading_zeros().min(64);
        if bits == 0 {
            bits = 1;
        }
        if has_negative {
            bits += 1;
        }
        bits
    }

    fn class_name(&self) -> String {
        self.name.clone()
    }
}

/// Emits the value class and template class for one enum definition,
/// writing into `cu`'s `class_defs` and `methods` sinks.
pub fn emit_enum(cu: &mut CompilationUnit, def: &EnumDef) -> Result<(), GenError> {
    emit_value_class(cu, def)?;
    emit_template_class(cu, def)?;
    Ok(())
}

fn emit_value_class(cu: &mut CompilationUnit, def: &EnumDef) -> Result<(), GenError> {
    let class = def.class_name();

    writeln!(cu.class_defs, "class {class} {{")?;
    writeln!(cu.class_defs, "public:")?;
    writeln!(cu.class_defs, "  enum enum_type {{")?;
    for el in &def.elements {
        writeln!(cu.class_defs, "    {} = {},", el.name, el.numeric_value)?;
    }
    writeln!(cu.class_defs, "    UNKNOWN_VALUE, UNBOUND_VALUE")?;
    writeln!(cu.class_defs, "  }};")?;
    writeln!(cu.class_defs, "  {class}();")?;
    writeln!(cu.class_defs, "  {class}(int other_value);")?;
    writeln!(cu.class_defs, "  {class}& operator=(const {class}& other);")?;
    writeln!(
        cu.class_defs,
        "  boolean operator==(const {class}& other) const;"
    )?;
    writeln!(cu.class_defs, "  boolean operator<(const {class}& other) const;")?;
    writeln!(cu.class_defs, "  static const char* enum_to_str({class} v, boolean textual);")?;
    writeln!(cu.class_defs, "  static {class} str_to_enum(const char* s);")?;
    writeln!(cu.class_defs, "  static boolean is_valid_enum(int v);")?;
    writeln!(cu.class_defs, "  int enum2int() const;")?;
    writeln!(cu.class_defs, "  static {class} int2enum(int v);")?;
    writeln!(cu.class_defs, "  int as_int() const;")?;
    writeln!(cu.class_defs, "  static {class} from_int(int v);")?;
    writeln!(cu.class_defs, "  void log() const;")?;
    writeln!(cu.class_defs, "  void set_param(Module_Param& param);")?;
    writeln!(cu.class_defs, "  int encode_txt(TTCN_Buffer& buf) const;")?;
    writeln!(cu.class_defs, "  void decode_txt(TTCN_Buffer& buf);")?;
    if cu.options.codecs.ber {
        writeln!(cu.class_defs, "  void BER_encode(TTCN_Buffer& buf) const;")?;
        writeln!(cu.class_defs, "  void BER_decode(TTCN_Buffer& buf);")?;
    }
    if cu.options.codecs.raw {
        writeln!(cu.class_defs, "  void RAW_encode(TTCN_Buffer& buf) const;")?;
        writeln!(cu.class_defs, "  void RAW_decode(TTCN_Buffer& buf);")?;
    }
    if cu.options.codecs.text {
        writeln!(cu.class_defs, "  void TEXT_encode(TTCN_Buffer& buf) const;")?;
        writeln!(cu.class_defs, "  void TEXT_decode(TTCN_Buffer& buf);")?;
    }
    if cu.options.codecs.xer {
        writeln!(cu.class_defs, "  void XER_encode(TTCN_Buffer& buf) const;")?;
        writeln!(cu.class_defs, "  void XER_decode(TTCN_Buffer& buf);")?;
    }
    if cu.options.codecs.json {
        writeln!(cu.class_defs, "  void JSON_encode(TTCN_Buffer& buf) const;")?;
        writeln!(cu.class_defs, "  void JSON_decode(TTCN_Buffer& buf);")?;
    }
    writeln!(cu.class_defs, "private:")?;
    writeln!(cu.class_defs, "  enum_type enum_value;")?;
    writeln!(cu.class_defs, "}};")?;
    writeln!(cu.class_defs)?;

    writeln!(cu.methods, "{class}::{class}() : enum_value(UNBOUND_VALUE) {{}}")?;
    writeln!(cu.methods)?;

    writeln!(cu.methods, "{class}::{class}(int other_value) {{")?;
    writeln!(cu.methods, "  if (!is_valid_enum(other_value))")?;
    writeln!(
        cu.methods,
        "    TTCN_error(\"invalid-numeric: %d is not a valid {class} value\", other_value);"
    )?;
    writeln!(cu.methods, "  enum_value = static_cast<enum_type>(other_value);")?;
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    writeln!(cu.methods, "{class}& {class}::operator=(const {class}& other) {{")?;
    writeln!(cu.methods, "  if (other.enum_value == UNBOUND_VALUE)")?;
    writeln!(cu.methods, "    TTCN_error(\"unbound-operand: copy of unbound {class}\");")?;
    writeln!(cu.methods, "  enum_value = other.enum_value;")?;
    writeln!(cu.methods, "  return *this;")?;
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    writeln!(
        cu.methods,
        "boolean {class}::operator==(const {class}& other) const {{"
    )?;
    writeln!(
        cu.methods,
        "  if (enum_value == UNBOUND_VALUE || other.enum_value == UNBOUND_VALUE)"
    )?;
    writeln!(cu.methods, "    TTCN_error(\"unbound-operand: comparing unbound {class}\");")?;
    writeln!(cu.methods, "  return enum_value == other.enum_value;")?;
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    writeln!(
        cu.methods,
        "boolean {class}::operator<(const {class}& other) const {{"
    )?;
    writeln!(
        cu.methods,
        "  if (enum_value == UNBOUND_VALUE || other.enum_value == UNBOUND_VALUE)"
    )?;
    writeln!(cu.methods, "    TTCN_error(\"unbound-operand: comparing unbound {class}\");")?;
    writeln!(cu.methods, "  return enum_value < other.enum_value;")?;
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    writeln!(
        cu.methods,
        "const char* {class}::enum_to_str({class} v, boolean textual) {{"
    )?;
    writeln!(cu.methods, "  switch (v.enum_value) {{")?;
    for el in &def.elements {
        let label = match (&el.text_alias, true) {
            (Some(alias), _) => format!(
                "textual && \"{alias}\"[0] ? \"{alias}\" : \"{}\"",
                el.name
            ),
            (None, _) => format!("\"{}\"", el.name),
        };
        writeln!(cu.methods, "    case {}: return {};", el.name, label)?;
    }
    writeln!(cu.methods, "    default: return \"<unknown>\";")?;
    writeln!(cu.methods, "  }}")?;
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    writeln!(cu.methods, "{class} {class}::str_to_enum(const char* s) {{")?;
    for el in &def.elements {
        writeln!(
            cu.methods,
            "  if (strcmp(s, \"{}\") == 0{}) return {class}({});",
            el.name,
            el.text_alias
                .as_ref()
                .map(|a| format!(" || strcmp(s, \"{a}\") == 0"))
                .unwrap_or_default(),
            el.numeric_value
        )?;
    }
    writeln!(cu.methods, "  return {class}(UNKNOWN_VALUE);")?;
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    writeln!(cu.methods, "boolean {class}::is_valid_enum(int v) {{")?;
    write!(cu.methods, "  return ")?;
    if def.elements.is_empty() {
        writeln!(cu.methods, "FALSE;")?;
    } else {
        let disjuncts: Vec<String> = def
            .elements
            .iter()
            .map(|e| format!("v == {}", e.numeric_value))
            .collect();
        writeln!(cu.methods, "{};", disjuncts.join(" || "))?;
    }
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    writeln!(cu.methods, "int {class}::enum2int() const {{")?;
    writeln!(
        cu.methods,
        "  if (enum_value == UNBOUND_VALUE || enum_value == UNKNOWN_VALUE)"
    )?;
    writeln!(
        cu.methods,
        "    TTCN_error(\"unbound-operand: enum2int of unbound/unknown {class}\");"
    )?;
    writeln!(cu.methods, "  return static_cast<int>(enum_value);")?;
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    writeln!(cu.methods, "{class} {class}::int2enum(int v) {{")?;
    writeln!(cu.methods, "  if (!is_valid_enum(v))")?;
    writeln!(cu.methods, "    TTCN_error(\"invalid-numeric: %d is not a valid {class} value\", v);")?;
    writeln!(cu.methods, "  return {class}(v);")?;
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    writeln!(cu.methods, "int {class}::as_int() const {{ return static_cast<int>(enum_value); }}")?;
    writeln!(cu.methods, "{class} {class}::from_int(int v) {{ return {class}(v); }}")?;
    writeln!(cu.methods)?;

    writeln!(cu.methods, "int {class}::encode_txt(TTCN_Buffer& buf) const {{")?;
    writeln!(cu.methods, "  buf.put_int(enum2int());")?;
    writeln!(cu.methods, "  return 0;")?;
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    writeln!(cu.methods, "void {class}::decode_txt(TTCN_Buffer& buf) {{")?;
    writeln!(cu.methods, "  int v = buf.get_int();")?;
    writeln!(cu.methods, "  if (!is_valid_enum(v))")?;
    writeln!(
        cu.methods,
        "    TTCN_error(\"invalid-numeric: decoded value %d is not a valid {class}\", v);"
    )?;
    writeln!(cu.methods, "  enum_value = static_cast<enum_type>(v);")?;
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    if cu.options.codecs.raw {
        let width = def.raw_bit_width();
        writeln!(cu.methods, "void {class}::RAW_encode(TTCN_Buffer& buf) const {{")?;
        writeln!(cu.methods, "  RAW_encode_enum_type(buf, {width}, enum2int());")?;
        writeln!(cu.methods, "}}")?;
        writeln!(cu.methods, "void {class}::RAW_decode(TTCN_Buffer& buf) {{")?;
        writeln!(cu.methods, "  int v = RAW_decode_enum_type(buf, {width});")?;
        writeln!(cu.methods, "  if (!is_valid_enum(v))")?;
        writeln!(cu.methods, "    TTCN_error(\"invalid-numeric: RAW-decoded %d is not a valid {class}\", v);")?;
        writeln!(cu.methods, "  enum_value = static_cast<enum_type>(v);")?;
        writeln!(cu.methods, "}}")?;
        writeln!(cu.methods)?;
    }

    if cu.options.codecs.text {
        writeln!(cu.methods, "void {class}::TEXT_encode(TTCN_Buffer& buf) const {{")?;
        writeln!(cu.methods, "  TEXT_encode_enum_type(buf, ENUM_TEXT_TOKENS_{class});")?;
        writeln!(cu.methods, "}}")?;
        writeln!(cu.methods, "void {class}::TEXT_decode(TTCN_Buffer& buf) {{")?;
        writeln!(cu.methods, "  TEXT_decode_enum_type(buf, ENUM_TEXT_TOKENS_{class});")?;
        writeln!(cu.methods, "}}")?;
        writeln!(cu.methods)?;
    }

    if cu.options.codecs.xer {
        writeln!(cu.methods, "void {class}::XER_encode(TTCN_Buffer& buf) const {{")?;
        writeln!(
            cu.methods,
            "  XER_encode_enum_type(buf, ENUM_XER_DESCR_{class}, xerUseNumber);"
        )?;
        writeln!(cu.methods, "}}")?;
        writeln!(cu.methods, "void {class}::XER_decode(TTCN_Buffer& buf) {{")?;
        writeln!(cu.methods, "  buf.skip_whitespace();")?;
        writeln!(
            cu.methods,
            "  XER_decode_enum_type(buf, ENUM_XER_DESCR_{class}, xerUseNumber);"
        )?;
        writeln!(cu.methods, "}}")?;
        writeln!(cu.methods)?;
    }

    if cu.options.codecs.json {
        writeln!(cu.methods, "void {class}::JSON_encode(TTCN_Buffer& buf) const {{")?;
        writeln!(cu.methods, "  JSON_encode_enum_type(buf, enum_to_str(*this, FALSE));")?;
        writeln!(cu.methods, "}}")?;
        writeln!(cu.methods, "void {class}::JSON_decode(TTCN_Buffer& buf) {{")?;
        writeln!(cu.methods, "  *this = str_to_enum(JSON_decode_enum_type(buf));")?;
        writeln!(cu.methods, "}}")?;
        writeln!(cu.methods)?;
    }

    Ok(())
}

fn emit_template_class(cu: &mut CompilationUnit, def: &EnumDef) -> Result<(), GenError> {
    let class = def.class_name();
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
    writeln!(cu.class_defs, "  {tmpl}& operator=(const {tmpl}& other);")?;
    writeln!(cu.class_defs, "  boolean match(const {class}& other) const;")?;
    writeln!(cu.class_defs, "  boolean match(const {tmpl}& other) const;")?;
    writeln!(cu.class_defs, "  {class} list_item(int index) const;")?;
    writeln!(cu.class_defs, "  void log() const;")?;
    writeln!(cu.class_defs, "  void log_match(const {class}& v) const;")?;
    writeln!(cu.class_defs, "  boolean is_value() const;")?;
    writeln!(cu.class_defs, "  void set_param(Module_Param& param);")?;
    writeln!(cu.class_defs, "  Module_Param* get_param(Module_Param_Name& name) const;")?;
    writeln!(cu.class_defs, "  int encode_txt(TTCN_Buffer& buf) const;")?;
    writeln!(cu.class_defs, "  void decode_txt(TTCN_Buffer& buf);")?;
    writeln!(cu.class_defs, "private:")?;
    writeln!(cu.class_defs, "  template_kind kind;")?;
    writeln!(cu.class_defs, "  {class} single_value;")?;
    writeln!(cu.class_defs, "  std::vector<{class}> list_values;")?;
    writeln!(cu.class_defs, "}};")?;
    writeln!(cu.class_defs)?;

    writeln!(cu.methods, "{tmpl}::{tmpl}() : kind(ANY_VALUE) {{}}")?;
    writeln!(cu.methods)?;
    writeln!(cu.methods, "boolean {tmpl}::match(const {class}& other) const {{")?;
    writeln!(cu.methods, "  switch (kind) {{")?;
    writeln!(cu.methods, "    case SPECIFIC_VALUE: return single_value == other;")?;
    writeln!(cu.methods, "    case ANY_VALUE: case ANY_OR_OMIT: return TRUE;")?;
    writeln!(cu.methods, "    case VALUE_LIST: {{")?;
    writeln!(cu.methods, "      for (const auto& v : list_values) if (v == other) return TRUE;")?;
    writeln!(cu.methods, "      return FALSE;")?;
    writeln!(cu.methods, "    }}")?;
    writeln!(cu.methods, "    case COMPLEMENTED_LIST: {{")?;
    writeln!(cu.methods, "      for (const auto& v : list_values) if (v == other) return FALSE;")?;
    writeln!(cu.methods, "      return TRUE;")?;
    writeln!(cu.methods, "    }}")?;
    writeln!(cu.methods, "    default: return FALSE;")?;
    writeln!(cu.methods, "  }}")?;
    writeln!(cu.methods, "}}")?;
    writeln!(cu.methods)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttgen_core::GenOptions;

    fn sample_enum() -> EnumDef {
        EnumDef {
            name: "E".into(),
            display_name: "E".into(),
            elements: vec![
                EnumElement { name: "a".into(), numeric_value: 1, text_alias: None },
                EnumElement { name: "b".into(), numeric_value: 2, text_alias: None },
            ],
        }
    }

    /// S1: `enum E { a=1, b=2 }` with RAW enabled emits `RAW_decode_enum_type(..., 2, ...)`.
    #[test]
    fn s1_raw_decode_uses_two_bits() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        emit_enum(&mut cu, &sample_enum()).unwrap();
        assert!(cu.methods.contains("RAW_decode_enum_type(buf, 2)"));
    }

    #[test]
    fn unknown_value_display_name_is_angle_bracket_unknown() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        emit_enum(&mut cu, &sample_enum()).unwrap();
        assert!(cu.methods.contains("<unknown>"));
    }

    #[test]
    fn str_to_enum_falls_back_to_unknown() {
        let mut cu = CompilationUnit::new(GenOptions::default());
        emit_enum(&mut cu, &sample_enum()).unwrap();
        assert!(cu.methods.contains("return E(UNKNOWN_VALUE);"));
    }
}
