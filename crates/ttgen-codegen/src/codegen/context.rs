//! The context value threaded down through recursive emission (§9).
//!
//! Replaces the source's `my_sb`/`my_def` back-pointers stored on AST
//! nodes: instead of an AST node reaching back up to its enclosing scope,
//! the dispatcher passes a `Ctx` down to every recursive call. `Ctx` is
//! small and `Clone`, so nested emitters build a modified copy with
//! `.enter_loop(...)`/`.enter_alt(...)` rather than mutating shared state.

#[derive(Debug, Clone, Default)]
pub struct LoopLabels {
    /// `goto` target for `continue`, generated only when the loop was
    /// re-emitted in ILT form because it contains a receiving statement,
    /// or when a nested alt/interleave needed a `continue` retarget (§4.4
    /// "Nesting").
    pub next_label: Option<String>,
    /// `goto` target for `break`, generated under the same conditions.
    pub end_label: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Ctx {
    /// Labels of the innermost enclosing `for`/`while`/`do-while`.
    pub loop_labels: Option<LoopLabels>,
    /// End label of the innermost enclosing alt/interleave's own dispatch
    /// loop (used when `break` is resolved from inside that alt/interleave
    /// and no enclosing loop claims it first).
    pub alt_end_label: Option<String>,
    /// `true` while emitting statements whose nearest enclosing scope is an
    /// alt/interleave branch body (controls `break`/`continue` routing,
    /// §4.3).
    pub in_alt_or_interleave: bool,
    /// `true` while emitting an altstep body (`break` there becomes
    /// `return ALT_BREAK`, §4.3).
    pub in_altstep: bool,
}

impl Ctx {
    pub fn root() -> Self {
        Ctx::default()
    }

    pub fn enter_loop(&self, labels: LoopLabels) -> Self {
        Ctx {
            loop_labels: Some(labels),
            alt_end_label: self.alt_end_label.clone(),
            in_alt_or_interleave: false,
            in_altstep: self.in_altstep,
        }
    }

    pub fn enter_alt(&self, end_label: Option<String>) -> Self {
        Ctx {
            loop_labels: self.loop_labels.clone(),
            alt_end_label: end_label,
            in_alt_or_interleave: true,
            in_altstep: self.in_altstep,
        }
    }

    pub fn enter_altstep(&self) -> Self {
        Ctx {
            loop_labels: None,
            alt_end_label: None,
            in_alt_or_interleave: false,
            in_altstep: true,
        }
    }
}

/// Where a `break`/`continue` statement resolves to (§4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpTarget {
    Goto(String),
    ReturnAltBreak,
    Native,
}

impl Ctx {
    pub fn resolve_break(&self) -> JumpTarget {
        if self.in_alt_or_interleave {
            if let Some(labels) = &self.loop_labels {
                if let Some(end) = &labels.end_label {
                    return JumpTarget::Goto(end.clone());
                }
            }
            if self.in_altstep {
                return JumpTarget::ReturnAltBreak;
            }
            if let Some(end) = &self.alt_end_label {
                return JumpTarget::Goto(end.clone());
            }
        } else if self.in_altstep {
            return JumpTarget::ReturnAltBreak;
        }
        JumpTarget::Native
    }

    pub fn resolve_continue(&self) -> JumpTarget {
        if let Some(labels) = &self.loop_labels {
            if let Some(next) = &labels.next_label {
                return JumpTarget::Goto(next.clone());
            }
        }
        JumpTarget::Native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_inside_loop_with_end_label_goes_there_even_in_alt() {
        let ctx = Ctx::root()
            .enter_loop(LoopLabels {
                next_label: Some("L_next".into()),
                end_label: Some("L_end".into()),
            })
            .enter_alt(Some("Alt_end".into()));
        assert_eq!(ctx.resolve_break(), JumpTarget::Goto("L_end".into()));
    }

    #[test]
    fn break_inside_altstep_returns_alt_break() {
        let ctx = Ctx::root().enter_altstep().enter_alt(None);
        assert_eq!(ctx.resolve_break(), JumpTarget::ReturnAltBreak);
    }

    #[test]
    fn break_inside_plain_alt_goes_to_its_own_end_label() {
        let ctx = Ctx::root().enter_alt(Some("Alt_end".into()));
        assert_eq!(ctx.resolve_break(), JumpTarget::Goto("Alt_end".into()));
    }

    #[test]
    fn break_outside_everything_is_native() {
        let ctx = Ctx::root();
        assert_eq!(ctx.resolve_break(), JumpTarget::Native);
    }

    #[test]
    fn continue_without_generated_label_is_native() {
        let ctx = Ctx::root();
        assert_eq!(ctx.resolve_continue(), JumpTarget::Native);
    }
}
