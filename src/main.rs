use graphsat::cdcl::{Branching, Polarity, Solver, SolverOptions};
use graphsat::common::Solution;
use std::path::PathBuf;
use std::process::exit;
use structopt::StructOpt;

/// CDCL SAT solver with an inspectable implication graph.
#[derive(StructOpt)]
#[structopt(name = "graphsat")]
struct Opt {
    /// Input formula in DIMACS CNF format.
    #[structopt(parse(from_os_str))]
    file: PathBuf,

    /// Branching heuristic: lex or vsids.
    #[structopt(long, default_value = "lex")]
    branching: String,

    /// Decision polarity: pos, neg or rand.
    #[structopt(long, default_value = "pos")]
    polarity: String,

    /// Seed for the rand polarity mode.
    #[structopt(long, default_value = "0")]
    seed: u64,

    /// Write the final implication graph as Graphviz dot to this file.
    #[structopt(long, parse(from_os_str))]
    dot: Option<PathBuf>,
}

fn main() {
    let opt = Opt::from_args();

    let branching = match opt.branching.as_str() {
        "lex" => Branching::Lexicographic,
        "vsids" => Branching::Vsids {
            var_inc: 1.0,
            var_decay: 0.95,
        },
        other => {
            eprintln!("unknown branching heuristic: {}", other);
            exit(1);
        }
    };
    let polarity = match opt.polarity.as_str() {
        "pos" => Polarity::Positive,
        "neg" => Polarity::Negative,
        "rand" => Polarity::Random,
        other => {
            eprintln!("unknown polarity mode: {}", other);
            exit(1);
        }
    };
    let options = SolverOptions {
        branching,
        polarity,
        seed: opt.seed,
    };

    let mut solver = match Solver::new_from_file(&opt.file, options) {
        Ok(solver) => solver,
        Err(e) => {
            eprintln!("error: {}", e);
            exit(1);
        }
    };

    let solution = solver.solve();

    if let Some(dot_path) = &opt.dot {
        if let Err(e) = std::fs::write(dot_path, solver.graph_snapshot().to_dot()) {
            eprintln!("error: {}", e);
            exit(1);
        }
    }

    match solution {
        Solution::Sat(model) => {
            println!("SAT");
            for (i, &v) in model.iter().enumerate() {
                let l = (i + 1) as i64;
                print!("{} ", if v { l } else { -l });
            }
            println!("0");
        }
        Solution::Unsat => println!("UNSAT"),
    }
}
