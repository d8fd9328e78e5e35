//! Fresh-identifier generation (§9's "Identifier freshness" redesign note).
//!
//! One `TempIds` per compilation unit, exactly like the teacher's
//! `CodeGen::temp_counter`/`block_counter`/`quot_counter` fields: names are
//! unique per unit and stable under re-run (a monotonic counter, reset at
//! the start of each run rather than persisted anywhere).

#[derive(Debug, Clone, Default)]
pub struct TempIds {
    tmp_counter: usize,
    label_counter: usize,
    branch_counter: usize,
    state_var_counter: usize,
    ilt_counter: usize,
}

impl TempIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh_tmp(&mut self, prefix: &str) -> String {
        let id = self.tmp_counter;
        self.tmp_counter += 1;
        format!("{prefix}_{id}")
    }

    pub fn fresh_label(&mut self, prefix: &str) -> String {
        let id = self.label_counter;
        self.label_counter += 1;
        format!("{prefix}_l{id}")
    }

    pub fn fresh_branch_id(&mut self) -> usize {
        let id = self.branch_counter;
        self.branch_counter += 1;
        id
    }

    pub fn fresh_state_var(&mut self, prefix: &str) -> String {
        let id = self.state_var_counter;
        self.state_var_counter += 1;
        format!("{prefix}_s{id}")
    }

    /// One prefix per top-level `interleave` in a compilation unit: `T` for
    /// the first, `T1`/`T2`/... afterwards, so that state/flag array names
    /// stay readable without colliding across sibling interleaves.
    pub fn fresh_ilt_prefix(&mut self) -> String {
        let id = self.ilt_counter;
        self.ilt_counter += 1;
        if id == 0 {
            "T".to_string()
        } else {
            format!("T{id}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_stable() {
        let mut ids = TempIds::new();
        assert_eq!(ids.fresh_tmp("t"), "t_0");
        assert_eq!(ids.fresh_tmp("t"), "t_1");
        assert_eq!(ids.fresh_label("T"), "T_l0");
        assert_eq!(ids.fresh_branch_id(), 0);
        assert_eq!(ids.fresh_branch_id(), 1);
    }
}
