use super::{
    decision_list::DecisionListEncoder, expansion::ExpansionBlocker, SatisfiabilityComputer,
    Verdict,
};
use crate::{
    dqbf::DqbfInstance,
    sat::{self, Literal, SatSolver, SatSolverFactoryFn, SolvingResult},
    utils::{IdCounter, VarNames},
};
use anyhow::{anyhow, Result};
use log::debug;
use std::{cell::RefCell, rc::Rc};

// A spurious candidate: a universal assignment together with the subset of
// the forced existential literals actually contributing to the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Counterexample {
    pub(crate) universal_assignment: Vec<Literal>,
    pub(crate) existential_core: Vec<Literal>,
}

fn format_literals(names: &VarNames, literals: &[Literal]) -> String {
    let str_literals = literals
        .iter()
        .map(|l| {
            let name = names.name_of(usize::from(l.var()));
            if l.is_positive() {
                name
            } else {
                format!("~{}", name)
            }
        })
        .collect::<Vec<String>>();
    format!("[{}]", str_literals.join(", "))
}

/// A CEGAR-based DQBF solver maintaining candidate Skolem functions as
/// symbolic decision lists.
///
/// The solver iteratively queries a counterexample SAT instance for a
/// universal assignment falsifying the current candidate, refines the
/// decision lists accordingly, and steers the search for the next candidate
/// through a second SAT instance accumulating blocking clauses over the
/// expansion variables. The loop stops when the counterexample query becomes
/// unsatisfiable (the formula is true) or the blocking clauses become
/// contradictory (the formula is false).
///
/// The solver must be built after the instance is complete: it takes over the
/// shared identifier counter to allocate its encoding variables.
///
/// # Example
///
/// ```
/// # use skolibri::dqbf::DqbfInstance;
/// # use skolibri::encodings::TseitinEncoder;
/// # use skolibri::solvers::{CegarDqbfSolver, SatisfiabilityComputer, Verdict};
/// let mut instance = DqbfInstance::new();
/// instance.new_existential("y").unwrap();
/// instance.set_output("y").unwrap();
/// let matrix = TseitinEncoder::default().encode_matrix(&mut instance);
/// let mut solver = CegarDqbfSolver::new(&instance, matrix).unwrap();
/// assert_eq!(Verdict::Satisfiable, solver.check_satisfiability().unwrap());
/// ```
pub struct CegarDqbfSolver<'a> {
    instance: &'a DqbfInstance,
    counter: Rc<RefCell<IdCounter>>,
    encoder: DecisionListEncoder,
    ce_solver: Box<dyn SatSolver>,
    blocker: ExpansionBlocker,
    expansion_hint: Vec<Literal>,
    last_counterexample: Option<Counterexample>,
    output_gate: Literal,
    iterations: usize,
}

impl<'a> CegarDqbfSolver<'a> {
    /// Builds a new CEGAR solver for an instance and its matrix.
    ///
    /// The underlying SAT solvers are the ones returned by
    /// [default_solver](crate::sat::default_solver).
    ///
    /// An error is returned if the instance has no output gate.
    pub fn new(instance: &'a DqbfInstance, matrix: Vec<Vec<Literal>>) -> Result<Self> {
        Self::new_with_sat_solver_factory(instance, matrix, Box::new(sat::default_solver))
    }

    /// Builds a new CEGAR solver for an instance and its matrix.
    ///
    /// The two underlying SAT solvers (the counterexample instance and the
    /// expansion instance) are built through the provided factory.
    ///
    /// An error is returned if the instance has no output gate.
    pub fn new_with_sat_solver_factory(
        instance: &'a DqbfInstance,
        matrix: Vec<Vec<Literal>>,
        solver_factory: Box<SatSolverFactoryFn>,
    ) -> Result<Self> {
        let output_gate = instance
            .output_gate()
            .map(|g| Literal::of_var(g, true))
            .ok_or_else(|| anyhow!("the instance has no output gate"))?;
        let mut ce_solver = (solver_factory)();
        for cl in matrix {
            ce_solver.add_clause(cl);
        }
        let mut encoder = DecisionListEncoder::new(instance);
        for e in instance.existentials() {
            encoder.init_model(*e, ce_solver.as_mut())?;
        }
        Ok(Self {
            instance,
            counter: instance.counter(),
            encoder,
            ce_solver,
            blocker: ExpansionBlocker::new((solver_factory)()),
            expansion_hint: Vec::new(),
            last_counterexample: None,
            output_gate,
            iterations: 0,
        })
    }

    /// Returns the number of CEGAR iterations performed so far.
    pub fn n_iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the number of expansion variables populated so far.
    pub fn n_expansion_vars(&self) -> usize {
        self.encoder.n_expansion_vars()
    }

    /// Returns the name table, including the solver's encoding variables.
    pub fn names(&self) -> &VarNames {
        self.encoder.names()
    }

    // The assumptions replayed on every counterexample query.
    fn counterexample_assumptions(&self) -> Vec<Literal> {
        let mut assumptions = vec![self.output_gate.negate()];
        assumptions.append(&mut self.encoder.standard_assumptions());
        assumptions.extend(self.expansion_hint.iter().copied());
        assumptions
    }

    // Queries the counterexample instance for a universal assignment
    // falsifying the current candidate, then re-solves to extract the core of
    // existential literals contributing to the falsification.
    fn next_counterexample(&mut self) -> Result<Option<Counterexample>> {
        let assumptions = self.counterexample_assumptions();
        if let Some(previous) = &self.last_counterexample {
            for l in &previous.universal_assignment {
                self.ce_solver.phase(*l);
            }
        }
        self.ce_solver.reserve(self.counter.borrow().value());
        let model = match self.ce_solver.solve_under_assumptions(&assumptions) {
            SolvingResult::Satisfiable(model) => model,
            SolvingResult::Unsatisfiable => return Ok(None),
            SolvingResult::Unknown => {
                return Err(anyhow!("the SAT oracle returned an unknown status"))
            }
        };
        let universal_assignment = model.literals_of(self.instance.universals());
        let existential_assignment = model.literals_of(self.instance.existentials());
        if log::log_enabled!(log::Level::Debug) {
            for line in self.encoder.internal_snapshot(&model) {
                debug!("  {}", line);
            }
        }
        let mut verification = Vec::with_capacity(
            universal_assignment.len() + existential_assignment.len() + 1,
        );
        verification.extend(universal_assignment.iter().copied());
        verification.extend(existential_assignment.iter().copied());
        verification.push(self.output_gate);
        match self.ce_solver.solve_under_assumptions(&verification) {
            SolvingResult::Unsatisfiable => {
                let existential_core = self.ce_solver.failed_assumptions(&existential_assignment);
                Ok(Some(Counterexample {
                    universal_assignment,
                    existential_core,
                }))
            }
            SolvingResult::Satisfiable(_) => Err(anyhow!(
                "the counterexample verification solve was expected to be unsatisfiable"
            )),
            SolvingResult::Unknown => Err(anyhow!("the SAT oracle returned an unknown status")),
        }
    }

    // Installs one rule per core literal and returns the blocking clause for
    // the expansion instance.
    fn refine(&mut self, counterexample: &Counterexample) -> Result<Vec<Literal>> {
        let mut blocking_clause = Vec::with_capacity(counterexample.existential_core.len());
        for lit in &counterexample.existential_core {
            let e = usize::from(lit.var());
            let premise = counterexample
                .universal_assignment
                .iter()
                .filter(|u| self.encoder.is_dependency_of(e, usize::from(u.var())))
                .copied()
                .collect::<Vec<Literal>>();
            let expansion_var = self
                .encoder
                .expansion_variable(e, &premise, self.ce_solver.as_mut())?;
            // The next candidate must not force e to this polarity again on
            // this universal assignment.
            let flipped_default = !lit.is_positive();
            self.encoder.set_default(e, flipped_default)?;
            blocking_clause.push(Literal::of_var(expansion_var, flipped_default));
            debug!(
                "  refined {} under premise {} (expansion variable {})",
                self.encoder.names().name_of(e),
                format_literals(self.encoder.names(), &premise),
                self.encoder.names().name_of(expansion_var),
            );
        }
        Ok(blocking_clause)
    }

    /// Computes the existential values the candidate induces on a universal
    /// assignment.
    ///
    /// Only meaningful once [check_satisfiability](SatisfiabilityComputer::check_satisfiability)
    /// returned [Verdict::Satisfiable]; an unsatisfiable query here reveals an
    /// internal inconsistency and is reported as an error.
    pub fn model_functions_under(
        &mut self,
        universal_assignment: &[Literal],
    ) -> Result<Vec<Literal>> {
        let mut assumptions = self.encoder.standard_assumptions();
        assumptions.extend(self.expansion_hint.iter().copied());
        assumptions.extend(universal_assignment.iter().copied());
        self.ce_solver.reserve(self.counter.borrow().value());
        match self.ce_solver.solve_under_assumptions(&assumptions) {
            SolvingResult::Satisfiable(model) => {
                Ok(model.literals_of(self.instance.existentials()))
            }
            SolvingResult::Unsatisfiable => Err(anyhow!(
                "no induced existential assignment for universal assignment {}",
                format_literals(self.encoder.names(), universal_assignment)
            )),
            SolvingResult::Unknown => Err(anyhow!("the SAT oracle returned an unknown status")),
        }
    }

    pub(crate) fn instance(&self) -> &DqbfInstance {
        self.instance
    }
}

impl SatisfiabilityComputer for CegarDqbfSolver<'_> {
    fn check_satisfiability(&mut self) -> Result<Verdict> {
        loop {
            self.iterations += 1;
            debug!("CEGAR iteration {}", self.iterations);
            let counterexample = match self.next_counterexample()? {
                Some(c) => c,
                None => {
                    debug!("no counterexample left after {} iterations", self.iterations);
                    return Ok(Verdict::Satisfiable);
                }
            };
            debug!(
                "counterexample: universal assignment {}, existential core {}",
                format_literals(self.encoder.names(), &counterexample.universal_assignment),
                format_literals(self.encoder.names(), &counterexample.existential_core),
            );
            if self.last_counterexample.as_ref() == Some(&counterexample) {
                return Err(anyhow!(
                    "cycle detected: the counterexample of iteration {} repeats the previous one",
                    self.iterations
                ));
            }
            let blocking_clause = self.refine(&counterexample)?;
            self.last_counterexample = Some(counterexample);
            debug!(
                "blocking clause {}",
                format_literals(self.encoder.names(), &blocking_clause),
            );
            self.blocker.add_blocking_clause(blocking_clause);
            match self
                .blocker
                .solve_hint(self.encoder.expansion_var_ids())?
            {
                Some(hint) => self.expansion_hint = hint,
                None => return Ok(Verdict::Unsatisfiable),
            }
        }
    }
}
