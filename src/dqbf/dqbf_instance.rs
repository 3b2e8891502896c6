use super::{Gate, GateKind};
use crate::{
    sat::Literal,
    utils::{IdCounter, VarNames},
};
use anyhow::{anyhow, Result};
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
};

/// A DQBF instance given as a quantified gate circuit.
///
/// An instance aggregates the quantifier prefix (ordered universal variables
/// and existential variables with their dependency lists), the gate
/// definitions, the output gate, the diagnostic name table and the shared
/// identifier counter.
///
/// All identifiers are allocated through the counter, which is later handed
/// to the solver; the instance must be complete before the solver is built so
/// that identifier allocations never interleave.
///
/// # Example
///
/// ```
/// # use skolibri::dqbf::DqbfInstance;
/// let mut instance = DqbfInstance::new();
/// instance.new_universal("x").unwrap();
/// instance.new_existential("y").unwrap();
/// assert_eq!(1, instance.n_universals());
/// assert_eq!(1, instance.n_existentials());
/// ```
#[derive(Default)]
pub struct DqbfInstance {
    names: VarNames,
    counter: Rc<RefCell<IdCounter>>,
    universals: Vec<usize>,
    universal_set: HashSet<usize>,
    existentials: Vec<usize>,
    dependencies: HashMap<usize, Vec<usize>>,
    gates: Vec<Gate>,
    gate_outputs: HashSet<usize>,
    output_gate: Option<usize>,
    n_aux_vars: usize,
}

impl DqbfInstance {
    /// Builds an empty instance with a fresh identifier counter.
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create_id(&mut self, name: &str) -> Result<usize> {
        if let Some(id) = self.names.id_of(name) {
            return Ok(id);
        }
        let id = self.counter.borrow_mut().next_id();
        self.names.register(id, name)?;
        Ok(id)
    }

    fn check_not_quantified(&self, name: &str) -> Result<()> {
        if let Some(id) = self.names.id_of(name) {
            if self.universal_set.contains(&id) || self.dependencies.contains_key(&id) {
                return Err(anyhow!(r#"the variable "{}" is already quantified"#, name));
            }
        }
        Ok(())
    }

    /// Declares a new universal variable and returns its identifier.
    ///
    /// An error is returned if the name is already quantified.
    pub fn new_universal(&mut self, name: &str) -> Result<usize> {
        self.check_not_quantified(name)?;
        let id = self.get_or_create_id(name)?;
        self.universals.push(id);
        self.universal_set.insert(id);
        Ok(id)
    }

    /// Declares a new existential variable and returns its identifier.
    ///
    /// Its dependency list is initialized with the universal variables
    /// declared so far; use [set_dependencies](Self::set_dependencies) to
    /// override it.
    ///
    /// An error is returned if the name is already quantified.
    pub fn new_existential(&mut self, name: &str) -> Result<usize> {
        self.check_not_quantified(name)?;
        let id = self.get_or_create_id(name)?;
        self.existentials.push(id);
        self.dependencies.insert(id, self.universals.clone());
        Ok(id)
    }

    /// Overrides the dependency list of an existential variable.
    ///
    /// If the name is still unquantified, it is declared existential first.
    /// Each dependency must name a declared universal variable.
    pub fn set_dependencies(&mut self, name: &str, deps: &[&str]) -> Result<()> {
        let id = match self.names.id_of(name) {
            Some(id) if self.universal_set.contains(&id) => {
                return Err(anyhow!(
                    r#"cannot set dependencies of the universal variable "{}""#,
                    name
                ))
            }
            Some(id) if self.dependencies.contains_key(&id) => id,
            _ => self.new_existential(name)?,
        };
        let mut dep_ids = Vec::with_capacity(deps.len());
        for dep in deps {
            match self.names.id_of(dep) {
                Some(dep_id) if self.universal_set.contains(&dep_id) => dep_ids.push(dep_id),
                _ => {
                    return Err(anyhow!(
                        r#"the dependency "{}" of "{}" is not a universal variable"#,
                        dep,
                        name
                    ))
                }
            }
        }
        self.dependencies.insert(id, dep_ids);
        Ok(())
    }

    /// Defines a gate and returns the identifier of its output.
    ///
    /// Inputs are given as `(name, negated)` pairs; unknown input names are
    /// registered on the fly (they may be gates defined later).
    /// An error is returned if the gate output is a quantified variable or an
    /// already-defined gate.
    pub fn new_gate(&mut self, name: &str, kind: GateKind, inputs: &[(&str, bool)]) -> Result<usize> {
        if let Some(id) = self.names.id_of(name) {
            if self.universal_set.contains(&id) || self.dependencies.contains_key(&id) {
                return Err(anyhow!(
                    r#"cannot define a gate on the quantified variable "{}""#,
                    name
                ));
            }
            if self.gate_outputs.contains(&id) {
                return Err(anyhow!(r#"the gate "{}" is defined twice"#, name));
            }
        }
        let output = self.get_or_create_id(name)?;
        let mut input_literals = Vec::with_capacity(inputs.len());
        for (input_name, negated) in inputs {
            let input_id = self.get_or_create_id(input_name)?;
            input_literals.push(Literal::of_var(input_id, !negated));
        }
        self.gates.push(Gate::new(output, kind, input_literals));
        self.gate_outputs.insert(output);
        Ok(output)
    }

    /// Sets the output gate of the instance.
    ///
    /// An error is returned if the output gate is already set.
    pub fn set_output(&mut self, name: &str) -> Result<usize> {
        if self.output_gate.is_some() {
            return Err(anyhow!("the output gate is defined twice"));
        }
        let id = self.get_or_create_id(name)?;
        self.output_gate = Some(id);
        Ok(id)
    }

    /// Allocates a fresh Tseitin auxiliary variable.
    pub(crate) fn new_aux_var(&mut self, hint: &str) -> usize {
        let id = self.counter.borrow_mut().next_id();
        // Registration cannot clash: the id is part of the name.
        self.names
            .register(id, &format!("_aux_{}_{}", hint, id))
            .unwrap();
        self.n_aux_vars += 1;
        id
    }

    /// Returns the universal variables, in declaration order.
    pub fn universals(&self) -> &[usize] {
        &self.universals
    }

    /// Returns the existential variables, in declaration order.
    pub fn existentials(&self) -> &[usize] {
        &self.existentials
    }

    /// Returns the dependency list of an existential variable.
    pub fn dependencies_of(&self, id: usize) -> Result<&[usize]> {
        self.dependencies
            .get(&id)
            .map(|d| d.as_slice())
            .ok_or_else(|| anyhow!("no existential variable with identifier {}", id))
    }

    /// Returns `true` if and only if the identifier refers to a universal variable.
    pub fn is_universal(&self, id: usize) -> bool {
        self.universal_set.contains(&id)
    }

    /// Returns `true` if and only if the identifier refers to an existential variable.
    pub fn is_existential(&self, id: usize) -> bool {
        self.dependencies.contains_key(&id)
    }

    /// Returns the gate definitions, in definition order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Returns the output gate identifier, if set.
    pub fn output_gate(&self) -> Option<usize> {
        self.output_gate
    }

    /// Returns the diagnostic name table.
    pub fn names(&self) -> &VarNames {
        &self.names
    }

    /// Returns the shared identifier counter.
    pub fn counter(&self) -> Rc<RefCell<IdCounter>> {
        Rc::clone(&self.counter)
    }

    /// Returns the number of universal variables.
    pub fn n_universals(&self) -> usize {
        self.universals.len()
    }

    /// Returns the number of existential variables.
    pub fn n_existentials(&self) -> usize {
        self.existentials.len()
    }

    /// Returns the number of gate definitions.
    pub fn n_gates(&self) -> usize {
        self.gates.len()
    }

    /// Returns the number of Tseitin auxiliary variables allocated so far.
    pub fn n_aux_vars(&self) -> usize {
        self.n_aux_vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause;

    #[test]
    fn test_implicit_dependencies() {
        let mut instance = DqbfInstance::new();
        let x1 = instance.new_universal("x1").unwrap();
        let y1 = instance.new_existential("y1").unwrap();
        let x2 = instance.new_universal("x2").unwrap();
        let y2 = instance.new_existential("y2").unwrap();
        assert_eq!(&[x1], instance.dependencies_of(y1).unwrap());
        assert_eq!(&[x1, x2], instance.dependencies_of(y2).unwrap());
    }

    #[test]
    fn test_dependency_override() {
        let mut instance = DqbfInstance::new();
        let x1 = instance.new_universal("x1").unwrap();
        instance.new_universal("x2").unwrap();
        let y = instance.new_existential("y").unwrap();
        instance.set_dependencies("y", &["x1"]).unwrap();
        assert_eq!(&[x1], instance.dependencies_of(y).unwrap());
    }

    #[test]
    fn test_depend_declares_existential() {
        let mut instance = DqbfInstance::new();
        instance.new_universal("x").unwrap();
        instance.set_dependencies("y", &["x"]).unwrap();
        assert_eq!(1, instance.n_existentials());
    }

    #[test]
    fn test_dependency_on_non_universal() {
        let mut instance = DqbfInstance::new();
        instance.new_universal("x").unwrap();
        instance.new_existential("y").unwrap();
        assert!(instance.set_dependencies("y", &["z"]).is_err());
        assert!(instance.set_dependencies("y", &["y"]).is_err());
    }

    #[test]
    fn test_dependencies_of_universal() {
        let mut instance = DqbfInstance::new();
        let x = instance.new_universal("x").unwrap();
        assert!(instance.set_dependencies("x", &[]).is_err());
        assert!(instance.dependencies_of(x).is_err());
    }

    #[test]
    fn test_quantify_twice() {
        let mut instance = DqbfInstance::new();
        instance.new_universal("x").unwrap();
        assert!(instance.new_universal("x").is_err());
        assert!(instance.new_existential("x").is_err());
    }

    #[test]
    fn test_gate_with_forward_reference() {
        let mut instance = DqbfInstance::new();
        instance.new_universal("x").unwrap();
        let g = instance
            .new_gate("g", GateKind::And, &[("x", false), ("h", true)])
            .unwrap();
        let h_id = instance.names().id_of("h").unwrap();
        assert_eq!(
            &clause![1, -(h_id as isize)],
            instance.gates()[0].inputs()
        );
        assert_eq!(g, instance.gates()[0].output());
    }

    #[test]
    fn test_gate_redefinition() {
        let mut instance = DqbfInstance::new();
        instance.new_gate("g", GateKind::Or, &[]).unwrap();
        assert!(instance.new_gate("g", GateKind::And, &[]).is_err());
    }

    #[test]
    fn test_gate_on_quantified_variable() {
        let mut instance = DqbfInstance::new();
        instance.new_universal("x").unwrap();
        assert!(instance.new_gate("x", GateKind::And, &[]).is_err());
    }

    #[test]
    fn test_output_gate() {
        let mut instance = DqbfInstance::new();
        let g = instance.new_gate("g", GateKind::And, &[]).unwrap();
        assert_eq!(g, instance.set_output("g").unwrap());
        assert!(instance.set_output("g").is_err());
    }

    #[test]
    fn test_output_on_plain_variable() {
        let mut instance = DqbfInstance::new();
        let y = instance.new_existential("y").unwrap();
        assert_eq!(y, instance.set_output("y").unwrap());
    }

    #[test]
    fn test_aux_var_naming() {
        let mut instance = DqbfInstance::new();
        let aux = instance.new_aux_var("xor_3");
        assert_eq!(format!("_aux_xor_3_{}", aux), instance.names().name_of(aux));
        assert_eq!(1, instance.n_aux_vars());
    }

    #[test]
    fn test_counter_is_shared() {
        let instance = {
            let mut instance = DqbfInstance::new();
            instance.new_universal("x").unwrap();
            instance
        };
        let counter = instance.counter();
        let next = counter.borrow_mut().next_id();
        assert_eq!(2, next);
    }
}
