use crate::sat::{Literal, SatSolver, SolvingResult};
use anyhow::{anyhow, Result};

/// The second SAT instance of the CEGAR loop, accumulating blocking clauses
/// over the expansion variables.
///
/// Each refinement contributes one blocking clause. A satisfying assignment
/// over the realized expansion variables is the hint steering the next
/// counterexample query; unsatisfiability proves that no selection of
/// expansion-variable values survives all observed counterexamples, which is
/// the UNSAT verdict for the whole formula.
pub(crate) struct ExpansionBlocker {
    solver: Box<dyn SatSolver>,
}

impl ExpansionBlocker {
    pub(crate) fn new(solver: Box<dyn SatSolver>) -> Self {
        Self { solver }
    }

    /// Adds the blocking clause produced by a refinement step.
    pub(crate) fn add_blocking_clause(&mut self, clause: Vec<Literal>) {
        self.solver.add_clause(clause);
    }

    /// Solves the blocking clauses and reads back the hint over the given
    /// expansion variables.
    ///
    /// Returns [Option::None] on unsatisfiability.
    pub(crate) fn solve_hint(
        &mut self,
        expansion_vars: &[usize],
    ) -> Result<Option<Vec<Literal>>> {
        if let Some(max_var) = expansion_vars.iter().max() {
            self.solver.reserve(*max_var);
        }
        match self.solver.solve() {
            SolvingResult::Satisfiable(assignment) => {
                Ok(Some(assignment.literals_of(expansion_vars)))
            }
            SolvingResult::Unsatisfiable => Ok(None),
            SolvingResult::Unknown => Err(anyhow!("the SAT oracle returned an unknown status")),
        }
    }
}
