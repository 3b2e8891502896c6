//! The DQBF instance model: quantifier prefix, dependency lists and gate circuit.

mod dqbf_instance;
pub use dqbf_instance::DqbfInstance;

mod gates;
pub use gates::Gate;
pub use gates::GateKind;
