//! The CEGAR loop deciding DQBF satisfiability and its companion components.

mod cegar_solver;
pub use cegar_solver::CegarDqbfSolver;

mod decision_list;

mod expansion;

mod model_extractor;
pub use model_extractor::ModelFunctionsExtractor;

mod specs;
pub use specs::SatisfiabilityComputer;
pub use specs::Verdict;
