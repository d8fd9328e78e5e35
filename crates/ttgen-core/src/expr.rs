//! The `Expression` struct — the unit of code exchanged between sub-generators.
//!
//! Contract (§3): `preamble; lhs = expr; postamble`. Any sub-generator that
//! cannot express itself as a single expression pushes statements into
//! `preamble` (setup) or `postamble` (teardown) instead.

/// Three text buffers: setup statements, the value expression itself, and
/// teardown statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expression {
    pub preamble: String,
    pub expr: String,
    pub postamble: String,
}

impl Expression {
    /// A bare expression with no setup/teardown.
    pub fn value(expr: impl Into<String>) -> Self {
        Expression {
            preamble: String::new(),
            expr: expr.into(),
            postamble: String::new(),
        }
    }

    pub fn is_trivial(&self) -> bool {
        self.preamble.is_empty() && self.postamble.is_empty()
    }

    /// Append another expression's preamble/postamble around this one,
    /// preserving the contract's ordering: outer preamble, inner preamble,
    /// ..., inner postamble, outer postamble.
    pub fn wrap_with(mut self, outer_preamble: &str, outer_postamble: &str) -> Self {
        let mut preamble = String::with_capacity(outer_preamble.len() + self.preamble.len());
        preamble.push_str(outer_preamble);
        preamble.push_str(&self.preamble);
        self.preamble = preamble;
        self.postamble.push_str(outer_postamble);
        self
    }

    /// Flatten into a single statement sequence assigning into `lhs`.
    pub fn assign_into(&self, lhs: &str) -> String {
        let mut out = String::new();
        if !self.preamble.is_empty() {
            out.push_str(&self.preamble);
            if !self.preamble.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push_str(&format!("{} = {};\n", lhs, self.expr));
        if !self.postamble.is_empty() {
            out.push_str(&self.postamble);
            if !self.postamble.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_expression_has_no_preamble() {
        let e = Expression::value("1 + 2");
        assert!(e.is_trivial());
    }

    #[test]
    fn assign_into_emits_contract_order() {
        let mut e = Expression::value("tmp_3");
        e.preamble = "int tmp_3 = compute();".to_string();
        e.postamble = "cleanup(tmp_3);".to_string();
        let rendered = e.assign_into("x");
        let pre_pos = rendered.find("compute").unwrap();
        let assign_pos = rendered.find("x = tmp_3").unwrap();
        let post_pos = rendered.find("cleanup").unwrap();
        assert!(pre_pos < assign_pos && assign_pos < post_pos);
    }
}
