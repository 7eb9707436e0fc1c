use crate::common::Clause;

/// Index of a clause in the store.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ClauseIndex {
    /// An input clause.
    Orig(usize),
    /// A learnt clause.
    Lrnt(usize),
}

/// The growing clause store: input clauses in input order followed by learnt
/// clauses in learn order. Clauses are never removed, so indices stay valid
/// for the lifetime of the solver.
pub struct ClauseDb {
    original: Vec<Clause>,
    learnts: Vec<Clause>,
}

impl ClauseDb {
    pub fn new() -> Self {
        ClauseDb {
            original: vec![],
            learnts: vec![],
        }
    }

    pub fn original_len(&self) -> usize {
        self.original.len()
    }

    pub fn learnts_len(&self) -> usize {
        self.learnts.len()
    }

    pub fn add_original(&mut self, cl: Clause) -> ClauseIndex {
        let ci = ClauseIndex::Orig(self.original.len());
        self.original.push(cl);
        ci
    }

    pub fn add_learnt(&mut self, cl: Clause) -> ClauseIndex {
        let ci = ClauseIndex::Lrnt(self.learnts.len());
        self.learnts.push(cl);
        ci
    }

    pub fn get(&self, ci: ClauseIndex) -> &Clause {
        match ci {
            ClauseIndex::Orig(i) => &self.original[i],
            ClauseIndex::Lrnt(i) => &self.learnts[i],
        }
    }

    /// All clause indices in scan order: originals first, then learnts in
    /// the order they were recorded.
    pub fn indices(&self) -> impl Iterator<Item = ClauseIndex> {
        (0..self.original.len())
            .map(ClauseIndex::Orig)
            .chain((0..self.learnts.len()).map(ClauseIndex::Lrnt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Var;

    #[test]
    fn indices_scan_originals_before_learnts() {
        let mut db = ClauseDb::new();
        db.add_original(Clause {
            lits: vec![Var::new(0).pos()],
        });
        db.add_learnt(Clause {
            lits: vec![Var::new(0).neg()],
        });
        db.add_original(Clause {
            lits: vec![Var::new(1).pos()],
        });
        let order: Vec<ClauseIndex> = db.indices().collect();
        assert_eq!(
            order,
            vec![
                ClauseIndex::Orig(0),
                ClauseIndex::Orig(1),
                ClauseIndex::Lrnt(0)
            ]
        );
    }

    #[test]
    fn get_resolves_both_kinds_of_index() {
        let mut db = ClauseDb::new();
        let orig = db.add_original(Clause {
            lits: vec![Var::new(0).pos()],
        });
        let lrnt = db.add_learnt(Clause {
            lits: vec![Var::new(1).neg()],
        });
        assert_eq!(db.get(orig).lits, vec![Var::new(0).pos()]);
        assert_eq!(db.get(lrnt).lits, vec![Var::new(1).neg()]);
        assert_eq!(db.original_len(), 1);
        assert_eq!(db.learnts_len(), 1);
    }
}
