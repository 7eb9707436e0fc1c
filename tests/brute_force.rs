//! Property tests pitting the solver against exhaustive enumeration on
//! small formulas: a returned model must satisfy every clause, and an
//! unsat verdict must mean no assignment exists.

use graphsat::cdcl::{Branching, Polarity, Solver, SolverOptions};
use graphsat::common::Solution;
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

const UNIVERSE: usize = 4;

/// A clause as (variable index, negated) pairs over the small universe.
type SmallClause = Vec<(usize, bool)>;

fn build(input: &[Vec<i8>]) -> Vec<SmallClause> {
    input
        .iter()
        .map(|clause| {
            clause
                .iter()
                .filter(|&&l| l != 0)
                .map(|&l| {
                    let l = l as i32;
                    (((l.abs() as usize) - 1) % UNIVERSE, l < 0)
                })
                .collect()
        })
        .collect()
}

fn brute_force_satisfiable(clauses: &[SmallClause]) -> bool {
    (0..1usize << UNIVERSE).any(|bits| {
        clauses.iter().all(|clause| {
            clause
                .iter()
                .any(|&(v, negated)| (bits & (1 << v) != 0) != negated)
        })
    })
}

fn satisfies(clauses: &[SmallClause], model: &[bool]) -> bool {
    clauses
        .iter()
        .all(|clause| clause.iter().any(|&(v, negated)| model[v] != negated))
}

fn solve_with(clauses: &[SmallClause], options: SolverOptions) -> Solution {
    let mut solver = Solver::new(options);
    let vars = solver.new_vars(UNIVERSE);
    for clause in clauses {
        solver.add_clause(
            clause
                .iter()
                .map(|&(v, negated)| if negated { vars[v].neg() } else { vars[v].pos() })
                .collect(),
        );
    }
    solver.solve()
}

#[quickcheck]
fn agrees_with_brute_force(input: Vec<Vec<i8>>) -> TestResult {
    if input.len() > 12 {
        return TestResult::discard();
    }
    let clauses = build(&input);
    let expected = brute_force_satisfiable(&clauses);
    match solve_with(&clauses, SolverOptions::default()) {
        Solution::Sat(model) => TestResult::from_bool(expected && satisfies(&clauses, &model)),
        Solution::Unsat => TestResult::from_bool(!expected),
    }
}

#[quickcheck]
fn heuristics_agree_on_satisfiability(input: Vec<Vec<i8>>) -> TestResult {
    if input.len() > 12 {
        return TestResult::discard();
    }
    let clauses = build(&input);
    let lex = solve_with(&clauses, SolverOptions::default());
    let vsids = solve_with(
        &clauses,
        SolverOptions {
            branching: Branching::Vsids {
                var_inc: 1.0,
                var_decay: 0.95,
            },
            polarity: Polarity::Random,
            seed: 7,
        },
    );
    let sat = matches!(lex, Solution::Sat(_));
    // Models may differ between heuristics; the verdict may not.
    TestResult::from_bool(sat == matches!(vsids, Solution::Sat(_)))
}

#[quickcheck]
fn models_are_total_over_the_universe(input: Vec<Vec<i8>>) -> TestResult {
    if input.len() > 12 {
        return TestResult::discard();
    }
    let clauses = build(&input);
    match solve_with(&clauses, SolverOptions::default()) {
        Solution::Sat(model) => TestResult::from_bool(model.len() == UNIVERSE),
        Solution::Unsat => TestResult::discard(),
    }
}
