use crate::common::Lit;

/// The assignment trail: literals in assignment order, with the boundaries
/// of each decision level.
#[derive(Debug)]
pub struct Trail {
    trail: Vec<Lit>,
    trail_lim: Vec<i32>,
}

impl Trail {
    pub fn new() -> Self {
        Trail {
            trail: vec![],
            trail_lim: vec![],
        }
    }

    pub fn n_assigns(&self) -> usize {
        self.trail.len()
    }

    pub fn decision_level(&self) -> i32 {
        self.trail_lim.len() as i32
    }

    pub fn add_at_current_dl(&mut self, p: Lit) {
        self.trail.push(p);
    }

    pub fn new_dl(&mut self) {
        self.trail_lim.push(self.trail.len() as i32);
    }

    pub fn pop(&mut self) -> Option<Lit> {
        self.trail.pop()
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    pub fn trail_lim_pop(&mut self) -> Option<i32> {
        self.trail_lim.pop()
    }

    /// Literal at `index` in assignment order. Conflict analysis walks the
    /// trail backwards through this without consuming it.
    pub fn get(&self, index: usize) -> Lit {
        self.trail[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Var;

    #[test]
    fn decision_level_counts_open_levels() {
        let mut trail = Trail::new();
        assert_eq!(trail.decision_level(), 0);
        trail.add_at_current_dl(Var::new(0).pos());
        trail.new_dl();
        trail.add_at_current_dl(Var::new(1).neg());
        assert_eq!(trail.decision_level(), 1);
        assert_eq!(trail.n_assigns(), 2);
    }

    #[test]
    fn pop_returns_most_recent_assignment() {
        let mut trail = Trail::new();
        trail.add_at_current_dl(Var::new(0).pos());
        trail.add_at_current_dl(Var::new(1).pos());
        assert_eq!(trail.pop(), Some(Var::new(1).pos()));
        assert_eq!(trail.get(0), Var::new(0).pos());
    }

    #[test]
    fn level_boundary_marks_assignment_count() {
        let mut trail = Trail::new();
        trail.add_at_current_dl(Var::new(0).pos());
        trail.new_dl();
        assert_eq!(trail.trail_lim_pop(), Some(1));
    }
}
