use crate::common::errors::*;
use crate::common::{Clause, Var};
use regex::Regex;
use std::io::BufRead;

/// A parsed DIMACS CNF formula.
pub struct DimacsCnf {
    /// Number of variables declared in the header.
    pub n_vars: usize,
    /// Clauses in input order.
    pub clauses: Vec<Clause>,
}

/// Parse a DIMACS CNF formula from a buffer reader.
///
/// Blank lines and `c` comment lines are skipped. Each remaining line is
/// read as one clause of integer literals terminated by `0`; reading stops
/// once the clause count from the `p cnf` header is reached.
pub fn parse_dimacs_from_buf_reader<F>(reader: &mut F) -> Result<DimacsCnf>
where
    F: std::io::BufRead,
{
    let header = Regex::new(r"p\s+cnf\s+(\d+)\s+(\d+)").unwrap();
    let literal = Regex::new(r"-?\d+").unwrap();

    let mut n_vars = 0usize;
    let mut n_clauses = 0usize;
    let mut clauses = vec![];

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        if line.starts_with('p') {
            if let Some(cap) = header.captures(line) {
                n_vars = cap[1].parse()?;
                n_clauses = cap[2].parse()?;
            }
        } else {
            let mut lits = vec![];
            for m in literal.find_iter(line) {
                let l = m.as_str().parse::<i32>()?;
                if l == 0 {
                    continue;
                }
                let var = Var::new((l.abs() - 1) as usize);
                lits.push(if l < 0 { var.neg() } else { var.pos() });
            }
            clauses.push(Clause { lits });
            if clauses.len() == n_clauses {
                break;
            }
        }
    }

    Ok(DimacsCnf { n_vars, clauses })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_header_and_clauses() {
        let input = "c comment\np cnf 3 2\n1 -2 0\n2 3 0\n";
        let cnf = parse_dimacs_from_buf_reader(&mut input.as_bytes()).unwrap();
        assert_eq!(cnf.n_vars, 3);
        assert_eq!(cnf.clauses.len(), 2);
        assert_eq!(cnf.clauses[0].lits, vec![Var::new(0).pos(), Var::new(1).neg()]);
        assert_eq!(cnf.clauses[1].lits, vec![Var::new(1).pos(), Var::new(2).pos()]);
    }

    #[test]
    fn terminating_zero_is_not_a_literal() {
        let input = "p cnf 1 1\n1 0\n";
        let cnf = parse_dimacs_from_buf_reader(&mut input.as_bytes()).unwrap();
        assert_eq!(cnf.clauses[0].lits, vec![Var::new(0).pos()]);
    }

    #[test]
    fn stops_after_declared_clause_count() {
        let input = "p cnf 2 1\n1 2 0\n-1 -2 0\n";
        let cnf = parse_dimacs_from_buf_reader(&mut input.as_bytes()).unwrap();
        assert_eq!(cnf.clauses.len(), 1);
    }
}
