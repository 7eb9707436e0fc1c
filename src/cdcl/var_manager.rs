use crate::cdcl::clause_db::ClauseIndex;
use crate::cdcl::{Branching, Polarity};
use crate::common::{LBool, Lit, Var};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

enum BranchingState {
    Lexicographic,
    Vsids {
        activity: Vec<f64>,
        var_inc: f64,
        var_decay: f64,
    },
}

/// Per-variable assignment state: value, decision level, antecedent clause,
/// plus the branching bookkeeping for decisions.
pub struct VarManager {
    assigns: Vec<LBool>,
    reason: Vec<Option<ClauseIndex>>,
    level: Vec<i32>,
    branching: BranchingState,
    polarity: Polarity,
    rng: StdRng,
}

impl VarManager {
    pub fn new(branching: Branching, polarity: Polarity, seed: u64) -> Self {
        VarManager {
            assigns: vec![],
            reason: vec![],
            level: vec![],
            branching: match branching {
                Branching::Lexicographic => BranchingState::Lexicographic,
                Branching::Vsids { var_inc, var_decay } => BranchingState::Vsids {
                    activity: vec![],
                    var_inc,
                    var_decay: 1.0 / var_decay,
                },
            },
            polarity,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn n_vars(&self) -> usize {
        self.assigns.len()
    }

    pub fn new_var(&mut self) -> Var {
        let v = Var::new(self.n_vars());
        self.assigns.push(LBool::Undef);
        self.reason.push(None);
        self.level.push(-1);
        if let BranchingState::Vsids { activity, .. } = &mut self.branching {
            activity.push(0.0);
        }
        v
    }

    pub fn value(&self, x: Var) -> LBool {
        self.assigns[x.index()]
    }

    pub fn value_lit(&self, p: Lit) -> LBool {
        if p.sign() {
            !self.assigns[p.var().index()]
        } else {
            self.assigns[p.var().index()]
        }
    }

    /// Next decision literal: an unassigned variable in the configured
    /// order, with the configured polarity.
    pub fn select_lit(&mut self) -> Lit {
        let var = self.select_var();
        let sign = match self.polarity {
            Polarity::Positive => false,
            Polarity::Negative => true,
            Polarity::Random => self.rng.gen(),
        };
        Lit::new(var, sign)
    }

    fn select_var(&self) -> Var {
        let mut unassigned = (0..self.n_vars()).filter(|&v| self.assigns[v] == LBool::Undef);
        let chosen = match &self.branching {
            BranchingState::Lexicographic => unassigned.next(),
            BranchingState::Vsids { activity, .. } => {
                unassigned.max_by(|&x, &y| activity[x].partial_cmp(&activity[y]).unwrap())
            }
        };
        Var::new(chosen.expect("no unassigned variable to decide on"))
    }

    pub fn update(&mut self, var: Var, value: LBool, level: i32, reason: Option<ClauseIndex>) {
        self.assigns[var.index()] = value;
        self.level[var.index()] = level;
        self.reason[var.index()] = reason;
    }

    pub fn reset(&mut self, var: Var) {
        self.update(var, LBool::Undef, -1, None);
    }

    pub fn get_level(&self, var: Var) -> i32 {
        self.level[var.index()]
    }

    pub fn get_reason(&self, var: Var) -> Option<ClauseIndex> {
        self.reason[var.index()]
    }

    /// Bump activity of every variable in a newly learnt clause.
    pub fn after_learnt_clause(&mut self, ps: &[Lit]) {
        if let BranchingState::Vsids {
            activity, var_inc, ..
        } = &mut self.branching
        {
            for p in ps {
                let x = p.var().index();
                activity[x] += *var_inc;
                if activity[x] > 1e100 {
                    for a in activity.iter_mut() {
                        *a *= 1e-100;
                    }
                    *var_inc *= 1e-100;
                }
            }
        }
    }

    /// Decay all activities after a learnt clause has been recorded.
    pub fn after_record_learnt_clause(&mut self) {
        if let BranchingState::Vsids {
            var_inc, var_decay, ..
        } = &mut self.branching
        {
            *var_inc *= *var_decay;
        }
    }

    pub fn model(&self) -> Vec<bool> {
        self.assigns.iter().map(|&x| x == LBool::True).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(branching: Branching) -> VarManager {
        let mut vm = VarManager::new(branching, Polarity::Positive, 0);
        for _ in 0..3 {
            vm.new_var();
        }
        vm
    }

    #[test]
    fn lexicographic_selects_lowest_unassigned() {
        let mut vm = manager(Branching::Lexicographic);
        vm.update(Var::new(0), LBool::True, 0, None);
        assert_eq!(vm.select_lit(), Var::new(1).pos());
    }

    #[test]
    fn negative_polarity_flips_the_decision() {
        let mut vm = VarManager::new(Branching::Lexicographic, Polarity::Negative, 0);
        vm.new_var();
        assert_eq!(vm.select_lit(), Var::new(0).neg());
    }

    #[test]
    fn vsids_prefers_bumped_variables() {
        let mut vm = manager(Branching::Vsids {
            var_inc: 1.0,
            var_decay: 0.95,
        });
        vm.after_learnt_clause(&[Var::new(2).neg()]);
        assert_eq!(vm.select_lit(), Var::new(2).pos());
    }

    #[test]
    fn reset_clears_level_and_reason() {
        let mut vm = manager(Branching::Lexicographic);
        vm.update(Var::new(1), LBool::False, 2, Some(ClauseIndex::Orig(0)));
        vm.reset(Var::new(1));
        assert_eq!(vm.value(Var::new(1)), LBool::Undef);
        assert_eq!(vm.get_level(Var::new(1)), -1);
        assert_eq!(vm.get_reason(Var::new(1)), None);
    }
}
