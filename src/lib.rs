//! `graphsat` is a CDCL SAT solver.
//!
//! While solving, it maintains an explicit implication graph of its
//! reasoning, which can be read back as a snapshot after (or between)
//! solves and rendered for inspection.
//!
//! ## An example
//!
//! ```rust
//! use graphsat::cdcl::{Solver, SolverOptions};
//! use graphsat::common::Solution;
//!
//! let input = "
//! c toy instance
//! p cnf 3 3
//! 1 0
//! -1 2 0
//! -2 3 0
//! ";
//! let mut solver =
//!     Solver::new_from_buf_reader(&mut input.as_bytes(), SolverOptions::default()).unwrap();
//! match solver.solve() {
//!     Solution::Sat(model) => assert!(model[0] && model[1] && model[2]),
//!     Solution::Unsat => unreachable!(),
//! }
//! println!("{}", solver.graph_snapshot().to_dot());
//! ```

/// Common types
pub mod common;

/// DIMACS CNF parser
pub mod parser;

/// The CDCL solver
pub mod cdcl;
