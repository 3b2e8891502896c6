use super::{Assignment, Literal, SatSolver, SolvingListener, SolvingResult};
use cadical::Solver as CadicalCSolver;

/// A wrapper around the CaDiCaL SAT solver.
///
/// See CaDiCaL on [crates.io](https://crates.io/crates/cadical).
#[derive(Default)]
pub struct CadicalSolver {
    solver: CadicalCSolver,
    listeners: Vec<Box<dyn SolvingListener>>,
}

impl SatSolver for CadicalSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.solver
            .add_clause(cl.into_iter().map(|l| isize::from(l) as i32))
    }

    fn solve(&mut self) -> SolvingResult {
        self.solve_under_assumptions(&[])
    }

    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> SolvingResult {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(self.solver.max_variable() as usize, self.n_clauses()));
        let solving_result = match self
            .solver
            .solve_with(assumptions.iter().map(|l| isize::from(*l) as i32))
        {
            Some(true) => {
                let assignment = Assignment::new(
                    (1..=self.solver.max_variable())
                        .map(|i| self.solver.value(i))
                        .collect(),
                );
                SolvingResult::Satisfiable(assignment)
            }
            Some(false) => SolvingResult::Unsatisfiable,
            None => SolvingResult::Unknown,
        };
        self.listeners
            .iter()
            .for_each(|l| l.solving_end(&solving_result));
        solving_result
    }

    fn failed_assumptions(&mut self, assumptions: &[Literal]) -> Vec<Literal> {
        assumptions
            .iter()
            .filter(|l| self.solver.failed(isize::from(**l) as i32))
            .copied()
            .collect()
    }

    fn phase(&mut self, _l: Literal) {
        // The bindings expose no explicit phase selection; CaDiCaL's phase
        // saving already warm-starts the next search from the last model.
    }

    fn n_vars(&self) -> usize {
        self.solver.max_variable() as usize
    }

    fn n_clauses(&self) -> usize {
        self.solver.num_clauses()
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.solver.reserve(new_max_id as i32);
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.listeners.push(listener);
    }
}
