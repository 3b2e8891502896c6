use crate::sat::Literal;
use anyhow::{anyhow, Result};
use std::{fmt::Display, str::FromStr};

/// The connective computed by a [Gate].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    /// Conjunction of the gate inputs.
    And,
    /// Disjunction of the gate inputs.
    Or,
    /// Exclusive disjunction of the gate inputs.
    Xor,
}

impl FromStr for GateKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(GateKind::And),
            "or" => Ok(GateKind::Or),
            "xor" => Ok(GateKind::Xor),
            _ => Err(anyhow!(r#"unknown gate kind "{}""#, s)),
        }
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateKind::And => write!(f, "and"),
            GateKind::Or => write!(f, "or"),
            GateKind::Xor => write!(f, "xor"),
        }
    }
}

/// A gate definition of the circuit: an output variable, a connective, and
/// the input literals the connective is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    output: usize,
    kind: GateKind,
    inputs: Vec<Literal>,
}

impl Gate {
    pub(crate) fn new(output: usize, kind: GateKind, inputs: Vec<Literal>) -> Self {
        Self {
            output,
            kind,
            inputs,
        }
    }

    /// Returns the identifier of the gate output.
    pub fn output(&self) -> usize {
        self.output
    }

    /// Returns the connective computed by the gate.
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Returns the input literals of the gate.
    pub fn inputs(&self) -> &[Literal] {
        &self.inputs
    }
}
