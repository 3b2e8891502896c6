use super::CegarDqbfSolver;
use crate::sat::Literal;
use anyhow::{anyhow, Result};

/// Enumerates the model functions of a satisfiable instance.
///
/// For each of the `2^n` assignments of the `n` universal variables, the
/// induced existential values are read back from the counterexample instance
/// of a [CegarDqbfSolver] whose CEGAR loop ended on a satisfiable verdict.
pub struct ModelFunctionsExtractor<'a, 'b> {
    solver: &'a mut CegarDqbfSolver<'b>,
}

impl<'a, 'b> ModelFunctionsExtractor<'a, 'b> {
    /// Builds a new extractor borrowing the solver.
    pub fn new(solver: &'a mut CegarDqbfSolver<'b>) -> Self {
        Self { solver }
    }

    /// Returns the number of universal assignments to enumerate.
    ///
    /// An error is returned when the number of universal variables makes the
    /// enumeration unrepresentable.
    pub fn n_universal_assignments(&self) -> Result<usize> {
        let n_universals = self.solver.instance().n_universals();
        if n_universals >= usize::BITS as usize {
            return Err(anyhow!(
                "cannot enumerate the assignments of {} universal variables",
                n_universals
            ));
        }
        Ok(1 << n_universals)
    }

    /// Enumerates the model functions, calling back once per universal
    /// assignment with the assignment and the induced existential values.
    ///
    /// Universal variable `i` toggles with bit `i` of the enumeration index;
    /// the first row is the all-false assignment. An unsatisfiable query
    /// stops the enumeration with an error, as the normal CEGAR exit
    /// guarantees every universal assignment admits a model.
    pub fn enumerate_model_functions<F>(&mut self, mut consumer: F) -> Result<()>
    where
        F: FnMut(&[Literal], &[Literal]) -> Result<()>,
    {
        let universals = self.solver.instance().universals().to_vec();
        for index in 0..self.n_universal_assignments()? {
            let universal_assignment = universals
                .iter()
                .enumerate()
                .map(|(i, u)| Literal::of_var(*u, (index >> i) & 1 == 1))
                .collect::<Vec<Literal>>();
            let existentials = self.solver.model_functions_under(&universal_assignment)?;
            consumer(&universal_assignment, &existentials)?;
        }
        Ok(())
    }
}
