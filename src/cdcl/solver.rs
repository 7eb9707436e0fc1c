use super::clause_db::{ClauseDb, ClauseIndex};
use super::graph::{GraphSnapshot, ImplicationGraph, VertexId};
use super::trail::Trail;
use super::{SolverOptions, VarManager};
use crate::common::errors::*;
use crate::common::{Clause, LBool, Lit, Solution, Var, UNDEF_LIT};
use crate::parser;
use std::fs::File;
use std::io;
use std::path::Path;

/// How a clause stands under the current partial assignment.
enum ClauseStatus {
    Satisfied,
    Unresolved,
    Unit(Lit),
    Falsified,
}

/// A CDCL solver that keeps an explicit implication graph of its reasoning.
///
/// One `Solver` value owns all search state; construct a fresh one per
/// query. After [`Solver::solve`] returns, the trail and graph are left in
/// their final state, so [`Solver::graph_snapshot`] shows how the answer
/// was reached.
pub struct Solver {
    clause_db: ClauseDb,
    var_manager: VarManager,
    trail: Trail,
    graph: ImplicationGraph,
    /// Set when an empty clause is added. An empty clause can never be
    /// satisfied, so it is an immediate unsatisfiability witness.
    found_empty_clause: bool,
}

impl Solver {
    /// Create a new CDCL solver.
    pub fn new(options: SolverOptions) -> Self {
        Solver {
            clause_db: ClauseDb::new(),
            var_manager: VarManager::new(options.branching, options.polarity, options.seed),
            trail: Trail::new(),
            graph: ImplicationGraph::new(),
            found_empty_clause: false,
        }
    }

    /// Read a formula in DIMACS CNF format from a file.
    pub fn new_from_file<P: AsRef<Path>>(path: P, options: SolverOptions) -> Result<Self> {
        let file = File::open(path)?;
        Self::new_from_buf_reader(&mut io::BufReader::new(file), options)
    }

    /// Read a formula in DIMACS CNF format from a buffer reader.
    pub fn new_from_buf_reader<F>(reader: &mut F, options: SolverOptions) -> Result<Self>
    where
        F: io::BufRead,
    {
        let cnf = parser::parse_dimacs_from_buf_reader(reader)?;
        let mut solver = Self::new(options);
        solver.new_vars(cnf.n_vars);
        for clause in cnf.clauses {
            solver.add_clause(clause.lits);
        }
        Ok(solver)
    }

    /// Add a new variable to the solver.
    pub fn new_var(&mut self) -> Var {
        self.var_manager.new_var()
    }

    /// Add `n` new variables to the solver.
    pub fn new_vars(&mut self, n: usize) -> Vec<Var> {
        (0..n).map(|_| self.new_var()).collect()
    }

    /// Returns the number of variables in the formula.
    pub fn n_vars(&self) -> usize {
        self.var_manager.n_vars()
    }

    /// Returns the number of input clauses in the formula.
    pub fn n_clauses(&self) -> usize {
        self.clause_db.original_len()
    }

    /// Returns the number of learnt clauses in the formula.
    pub fn n_learnts(&self) -> usize {
        self.clause_db.learnts_len()
    }

    /// Returns the assignment of the variable.
    pub fn value(&self, x: Var) -> LBool {
        self.var_manager.value(x)
    }

    /// Returns the number of assigned variables.
    fn n_assigns(&self) -> usize {
        self.trail.n_assigns()
    }

    /// Returns the current decision level.
    fn decision_level(&self) -> i32 {
        self.trail.decision_level()
    }

    /// Add a clause over previously created variables. Duplicate literals
    /// are dropped and a tautological clause is ignored; an empty clause
    /// marks the whole formula unsatisfiable.
    pub fn add_clause(&mut self, mut lits: Vec<Lit>) {
        lits.sort_by_key(|l| (l.var().index(), l.sign()));
        lits.dedup();
        for i in 1..lits.len() {
            if lits[i - 1] == !lits[i] {
                return;
            }
        }
        if lits.is_empty() {
            self.found_empty_clause = true;
        } else {
            self.clause_db.add_original(Clause { lits });
        }
    }

    /// Read-only snapshot of the implication graph.
    pub fn graph_snapshot(&self) -> GraphSnapshot {
        self.graph.snapshot()
    }

    /// Decide satisfiability of the formula.
    ///
    /// Returns [`Solution::Sat`] with a total model covering every
    /// variable, or [`Solution::Unsat`].
    pub fn solve(&mut self) -> Solution {
        if self.found_empty_clause {
            return Solution::Unsat;
        }

        // A conflict vertex left over from a previous solve is stale; the
        // scan below re-derives it if the conflict still stands.
        self.graph.clear_conflict();

        loop {
            debug_assert!(self.graph_mirrors_trail(), "graph out of sync with trail");
            match self.propagate() {
                Some(_) => {
                    // A conflict with no decisions active is conclusive.
                    if self.decision_level() == 0 {
                        return Solution::Unsat;
                    }
                    let (learnt, btlevel) = self.analyze();
                    self.cancel_until(btlevel);
                    self.record(learnt);
                }
                None => {
                    if self.n_assigns() == self.n_vars() {
                        return Solution::Sat(self.var_manager.model());
                    }
                    let p = self.var_manager.select_lit();
                    self.assume(p);
                }
            }
        }
    }

    fn clause_status(&self, ci: ClauseIndex) -> ClauseStatus {
        let mut unassigned = None;
        let mut n_unassigned = 0;
        for &l in &self.clause_db.get(ci).lits {
            match self.var_manager.value_lit(l) {
                LBool::True => return ClauseStatus::Satisfied,
                LBool::False => {}
                LBool::Undef => {
                    n_unassigned += 1;
                    unassigned = Some(l);
                }
            }
        }
        match (n_unassigned, unassigned) {
            (0, _) => ClauseStatus::Falsified,
            (1, Some(l)) => ClauseStatus::Unit(l),
            _ => ClauseStatus::Unresolved,
        }
    }

    /// Scan the formula in order for unit and falsified clauses, applying
    /// forced assignments until fixpoint or conflict. The scan restarts
    /// from the first clause after every application, so propagation is
    /// reproducible for a fixed formula and decision history. Nothing is
    /// mutated after a conflict is found, apart from recording the
    /// conflict vertex itself.
    fn propagate(&mut self) -> Option<ClauseIndex> {
        'scan: loop {
            for ci in self.clause_db.indices() {
                match self.clause_status(ci) {
                    ClauseStatus::Satisfied | ClauseStatus::Unresolved => {}
                    ClauseStatus::Unit(p) => {
                        self.enqueue(p, ci);
                        continue 'scan;
                    }
                    ClauseStatus::Falsified => {
                        let level = self.decision_level();
                        let parents: Vec<Var> = self
                            .clause_db
                            .get(ci)
                            .lits
                            .iter()
                            .map(|l| l.var())
                            .collect();
                        self.graph.add_conflict(level, parents);
                        return Some(ci);
                    }
                }
            }
            return None;
        }
    }

    /// Apply a forced assignment: bind the variable, extend the trail, and
    /// mirror the step in the implication graph with in-edges from the
    /// other variables of the forcing clause.
    fn enqueue(&mut self, p: Lit, from: ClauseIndex) {
        let level = self.decision_level();
        self.var_manager
            .update(p.var(), LBool::from(!p.sign()), level, Some(from));
        self.trail.add_at_current_dl(p);
        let parents: Vec<Var> = self
            .clause_db
            .get(from)
            .lits
            .iter()
            .map(|l| l.var())
            .filter(|&v| v != p.var())
            .collect();
        self.graph.add_implied(p, level, parents);
    }

    /// Open a new decision level and bind a freely chosen literal.
    fn assume(&mut self, p: Lit) {
        self.trail.new_dl();
        let level = self.decision_level();
        self.var_manager
            .update(p.var(), LBool::from(!p.sign()), level, None);
        self.trail.add_at_current_dl(p);
        self.graph.add_decision(p, level);
    }

    /// First-UIP conflict analysis: resolve backward along the trail,
    /// reading antecedents from the implication graph, until a single
    /// marked literal of the current level remains. That literal is the
    /// first unique implication point; the learnt clause is its negation
    /// (slot 0, asserting) plus the negations of every marked literal
    /// below the current level. The backtrack level is the second-highest
    /// level among the learnt literals, 0 for a unit learnt clause.
    ///
    /// Only called with the conflict vertex on record and decision level
    /// above 0. Reads state, never mutates it; all truncation happens in
    /// `cancel_until`.
    fn analyze(&self) -> (Vec<Lit>, i32) {
        let current = self.decision_level();
        let mut seen = vec![false; self.n_vars()];
        let mut counter = 0;
        let mut learnt = vec![UNDEF_LIT]; // slot 0 becomes the asserting literal
        let mut btlevel = 0;

        let mut reason = self.graph.parent_lits(VertexId::Conflict);
        let mut index = self.trail.n_assigns();
        let mut p;

        loop {
            for q in reason {
                let v = q.var();
                if !seen[v.index()] {
                    seen[v.index()] = true;
                    let q_level = self.var_manager.get_level(v);
                    if q_level == current {
                        counter += 1;
                    } else {
                        learnt.push(!q);
                        btlevel = btlevel.max(q_level);
                    }
                }
            }

            // Walk back to the most recent marked trail literal.
            loop {
                assert!(index > 0, "conflict analysis walked off the trail");
                index -= 1;
                p = self.trail.get(index);
                if seen[p.var().index()] {
                    break;
                }
            }

            counter -= 1;
            if counter == 0 {
                break;
            }
            reason = self.graph.parent_lits(VertexId::Var(p.var()));
        }

        learnt[0] = !p;
        (learnt, btlevel)
    }

    /// Undo the most recent decision level: unbind every variable assigned
    /// at it and drop the matching graph vertices.
    fn cancel(&mut self) {
        let mut c = self.trail.trail_len() as i32
            - self.trail.trail_lim_pop().expect("cancel called at level 0");
        while c != 0 {
            let p = self.trail.pop().expect("trail shorter than its level marks");
            self.var_manager.reset(p.var());
            self.graph.remove(p.var());
            c -= 1;
        }
    }

    /// Backtrack: discard every assignment and graph vertex with decision
    /// level strictly greater than `level`, along with the conflict vertex.
    fn cancel_until(&mut self, level: i32) {
        assert!(
            level >= 0 && level < self.decision_level(),
            "backtrack target {} out of range at level {}",
            level,
            self.decision_level()
        );
        self.graph.clear_conflict();
        while self.decision_level() > level {
            self.cancel();
        }
    }

    /// Append a learnt clause to the formula. It is not applied here: the
    /// next propagation pass finds it unit and forces the asserting
    /// literal.
    fn record(&mut self, lits: Vec<Lit>) {
        self.var_manager.after_learnt_clause(&lits);
        self.clause_db.add_learnt(Clause { lits });
        self.var_manager.after_record_learnt_clause();
    }

    /// The graph must mirror the trail exactly: one live vertex per
    /// assigned variable, with parents matching the antecedent clause.
    fn graph_mirrors_trail(&self) -> bool {
        if self.graph.len() != self.n_assigns() {
            return false;
        }
        for i in 0..self.trail.n_assigns() {
            let p = self.trail.get(i);
            if !self.graph.contains(p.var()) {
                return false;
            }
            if let Some(ci) = self.var_manager.get_reason(p.var()) {
                let clause_vars: Vec<Var> = self
                    .clause_db
                    .get(ci)
                    .lits
                    .iter()
                    .map(|l| l.var())
                    .filter(|&v| v != p.var())
                    .collect();
                if self.graph.parent_vars(p.var()) != clause_vars.as_slice() {
                    return false;
                }
            }
        }
        true
    }
}
