use anyhow::Result;
use std::fmt::Display;

/// The answer computed by a DQBF solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Skolem functions making the matrix valid exist.
    Satisfiable,
    /// No Skolem function selection makes the matrix valid.
    Unsatisfiable,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Satisfiable => write!(f, "SATISFIABLE"),
            Verdict::Unsatisfiable => write!(f, "UNSATISFIABLE"),
        }
    }
}

/// A trait for solvers able to decide the satisfiability of a DQBF instance.
pub trait SatisfiabilityComputer {
    /// Decides the satisfiability of the underlying instance.
    ///
    /// Errors are reserved for internal inconsistencies (a broken encoding, a
    /// refinement cycle, an oracle failure); they do not encode an UNSAT
    /// answer.
    fn check_satisfiability(&mut self) -> Result<Verdict>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_display() {
        assert_eq!("SATISFIABLE", Verdict::Satisfiable.to_string());
        assert_eq!("UNSATISFIABLE", Verdict::Unsatisfiable.to_string());
    }
}
