use crate::{
    dqbf::DqbfInstance,
    sat::{Assignment, Literal, SatSolver},
    utils::{IdCounter, VarNames},
};
use anyhow::{anyhow, Result};
use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap, HashSet},
    rc::Rc,
};

// The rolling tail of the decision list of an existential variable.
//
// The value literal is stored signed: its polarity is the current default
// value of the existential. The fire variable is the one the next rule will
// be built on; until then it acts as the always-enabled default rule and is
// assumed true on every query.
struct RuleTail {
    value: Literal,
    no_fired: usize,
    fire: usize,
    n_rules: usize,
}

struct RuleFireVar {
    existential: usize,
    var: usize,
    premise: String,
}

struct NoRuleFiredVar {
    existential: usize,
    var: usize,
    rule_index: usize,
}

// The rule index is not consulted by the algorithm; it only feeds the debug
// snapshot.
struct ValueVar {
    existential: usize,
    var: usize,
    rule_index: usize,
}

fn format_premise(premise: &[Literal]) -> String {
    if premise.is_empty() {
        return "true".to_string();
    }
    let str_literals = premise
        .iter()
        .map(|l| {
            let var = usize::from(l.var());
            if l.is_positive() {
                var.to_string()
            } else {
                format!("~{}", var)
            }
        })
        .collect::<Vec<String>>();
    format!("[{}]", str_literals.join(", "))
}

/// Maintains the symbolic decision lists of the existential variables inside
/// the counterexample SAT instance.
///
/// For each existential variable, an ordered list of `(premise, value)` rules
/// is encoded as CNF; the first rule whose premise holds binds the
/// existential to its value, and an implicit default rule closes the list.
/// Rules are only appended; the clauses of previous generations stay in the
/// solver, and three rolling tail variables per existential track the current
/// default branch.
///
/// The encoder also owns the expansion-variable cache: a `(existential,
/// canonical premise)` pair maps to a dedicated variable, allocated on first
/// request together with the rule linking it to the decision list.
pub(crate) struct DecisionListEncoder {
    counter: Rc<RefCell<IdCounter>>,
    names: VarNames,
    dependencies: BTreeMap<usize, HashSet<usize>>,
    tails: BTreeMap<usize, RuleTail>,
    permanent_assumptions: Vec<Literal>,
    expansion_vars: HashMap<(usize, Vec<isize>), usize>,
    expansion_var_ids: Vec<usize>,
    all_rule_fire_vars: Vec<RuleFireVar>,
    all_no_rule_fired_vars: Vec<NoRuleFiredVar>,
    all_value_vars: Vec<ValueVar>,
}

impl DecisionListEncoder {
    pub(crate) fn new(instance: &DqbfInstance) -> Self {
        let dependencies = instance
            .existentials()
            .iter()
            .map(|e| {
                let deps = instance
                    .dependencies_of(*e)
                    .unwrap()
                    .iter()
                    .copied()
                    .collect::<HashSet<usize>>();
                (*e, deps)
            })
            .collect();
        Self {
            counter: instance.counter(),
            names: instance.names().clone(),
            dependencies,
            tails: BTreeMap::new(),
            permanent_assumptions: Vec::new(),
            expansion_vars: HashMap::new(),
            expansion_var_ids: Vec::new(),
            all_rule_fire_vars: Vec::new(),
            all_no_rule_fired_vars: Vec::new(),
            all_value_vars: Vec::new(),
        }
    }

    fn check_existential(&self, e: usize) -> Result<()> {
        if self.dependencies.contains_key(&e) {
            Ok(())
        } else {
            Err(anyhow!("no existential variable with identifier {}", e))
        }
    }

    /// Initializes the decision list of an existential variable.
    ///
    /// Allocates the initial value, no-rule-fired and fire variables and
    /// asserts the default-branch equivalence. Calling it again on an
    /// initialized variable has no effect.
    pub(crate) fn init_model(&mut self, e: usize, solver: &mut dyn SatSolver) -> Result<()> {
        self.check_existential(e)?;
        if self.tails.contains_key(&e) {
            return Ok(());
        }
        let name = self.names.name_of(e);
        let value_1 = self.counter.borrow_mut().next_id();
        self.names.rename(value_1, &format!("{}_value_1", name));
        self.all_value_vars.push(ValueVar {
            existential: e,
            var: value_1,
            rule_index: 1,
        });
        let no_fired_0 = self.counter.borrow_mut().next_id();
        self.names.rename(no_fired_0, &format!("{}_nofired_0", name));
        self.all_no_rule_fired_vars.push(NoRuleFiredVar {
            existential: e,
            var: no_fired_0,
            rule_index: 0,
        });
        let fire_1 = self.counter.borrow_mut().next_id();
        self.names.rename(fire_1, &format!("{}_fire_1", name));
        self.all_rule_fire_vars.push(RuleFireVar {
            existential: e,
            var: fire_1,
            premise: "default".to_string(),
        });
        self.tails.insert(
            e,
            RuleTail {
                value: Literal::of_var(value_1, true),
                no_fired: no_fired_0,
                fire: fire_1,
                n_rules: 1,
            },
        );
        // No rule has fired at position 0, by definition.
        solver.add_clause(vec![Literal::of_var(no_fired_0, true)]);
        // If the default rule is the one to fire, e <-> value_1.
        let e_lit = Literal::of_var(e, true);
        let n_lit = Literal::of_var(no_fired_0, true);
        let f_lit = Literal::of_var(fire_1, true);
        let v_lit = Literal::of_var(value_1, true);
        solver.add_clause(vec![n_lit.negate(), f_lit.negate(), e_lit.negate(), v_lit]);
        solver.add_clause(vec![n_lit.negate(), f_lit.negate(), e_lit, v_lit.negate()]);
        Ok(())
    }

    /// Sets the default value of an existential variable.
    ///
    /// The flip is recorded in the sign of the tail value literal, which is
    /// replayed as an assumption on every query.
    pub(crate) fn set_default(&mut self, e: usize, value: bool) -> Result<()> {
        let tail = self
            .tails
            .get_mut(&e)
            .ok_or_else(|| anyhow!("the model of existential variable {} is not initialized", e))?;
        tail.value = Literal::of_var(usize::from(tail.value.var()), value);
        Ok(())
    }

    /// Appends a rule to the decision list of an existential variable.
    ///
    /// The rule fires exactly when its premise holds and no earlier rule
    /// fired; it then binds the existential to its conclusion. A fixed
    /// conclusion is installed as a permanent assumption on the rule's value
    /// variable; a `value_var` conclusion is linked by equivalence instead.
    pub(crate) fn add_rule(
        &mut self,
        e: usize,
        premise: &[Literal],
        conclusion: bool,
        value_var: Option<usize>,
        solver: &mut dyn SatSolver,
    ) -> Result<()> {
        let name = self.names.name_of(e);
        let tail = self
            .tails
            .get_mut(&e)
            .ok_or_else(|| anyhow!("the model of existential variable {} is not initialized", e))?;
        let prev_n = Literal::of_var(tail.no_fired, true);
        let this_f = Literal::of_var(tail.fire, true);
        let this_v = usize::from(tail.value.var());
        let rule_num = tail.n_rules;
        tail.n_rules += 1;
        let next_f = self.counter.borrow_mut().next_id();
        let this_n = self.counter.borrow_mut().next_id();
        let next_v = self.counter.borrow_mut().next_id();
        tail.fire = next_f;
        tail.no_fired = this_n;
        tail.value = Literal::of_var(next_v, true);

        let premise_name = format_premise(premise);
        self.names.rename(
            usize::from(this_f.var()),
            &format!("{}_fire_{}_premise_{}", name, rule_num, premise_name),
        );
        if let Some(tracked) = self
            .all_rule_fire_vars
            .iter_mut()
            .find(|v| v.existential == e && v.var == usize::from(this_f.var()))
        {
            tracked.premise = premise_name;
        }
        self.names
            .rename(next_f, &format!("{}_fire_{}", name, rule_num + 1));
        self.names
            .rename(this_n, &format!("{}_nofired_{}", name, rule_num));
        self.names
            .rename(next_v, &format!("{}_value_{}", name, rule_num + 1));
        self.all_rule_fire_vars.push(RuleFireVar {
            existential: e,
            var: next_f,
            premise: "default".to_string(),
        });
        self.all_no_rule_fired_vars.push(NoRuleFiredVar {
            existential: e,
            var: this_n,
            rule_index: rule_num,
        });
        self.all_value_vars.push(ValueVar {
            existential: e,
            var: next_v,
            rule_index: rule_num + 1,
        });

        // this_f <-> premise /\ prev_n
        for lit in premise {
            solver.add_clause(vec![this_f.negate(), *lit]);
        }
        solver.add_clause(vec![this_f.negate(), prev_n]);
        let mut fire_cl = Vec::with_capacity(2 + premise.len());
        fire_cl.push(this_f);
        fire_cl.push(prev_n.negate());
        fire_cl.extend(premise.iter().map(|l| l.negate()));
        solver.add_clause(fire_cl);
        // this_n <-> prev_n /\ -this_f
        let this_n_lit = Literal::of_var(this_n, true);
        solver.add_clause(vec![this_n_lit.negate(), prev_n]);
        solver.add_clause(vec![this_n_lit.negate(), this_f.negate()]);
        solver.add_clause(vec![this_n_lit, prev_n.negate(), this_f]);
        // The successor default branch: e <-> next_v when reached.
        let e_lit = Literal::of_var(e, true);
        let next_f_lit = Literal::of_var(next_f, true);
        let next_v_lit = Literal::of_var(next_v, true);
        solver.add_clause(vec![
            next_f_lit.negate(),
            this_n_lit.negate(),
            e_lit.negate(),
            next_v_lit,
        ]);
        solver.add_clause(vec![
            next_f_lit.negate(),
            this_n_lit.negate(),
            e_lit,
            next_v_lit.negate(),
        ]);
        // Conclusion linkage.
        match value_var {
            None => self
                .permanent_assumptions
                .push(Literal::of_var(this_v, conclusion)),
            Some(var) => {
                let this_v_lit = Literal::of_var(this_v, true);
                let var_lit = Literal::of_var(var, true);
                solver.add_clause(vec![this_v_lit.negate(), var_lit]);
                solver.add_clause(vec![this_v_lit, var_lit.negate()]);
            }
        }
        Ok(())
    }

    /// Returns the expansion variable of `(e, premise)`, allocating it on
    /// first request.
    ///
    /// Allocation atomically installs the rule binding the decision list of
    /// `e` to the new variable under the canonicalized premise; later lookups
    /// return the same variable without touching the solver.
    ///
    /// An error is returned if the premise leaves the dependency set of `e`.
    pub(crate) fn expansion_variable(
        &mut self,
        e: usize,
        premise: &[Literal],
        solver: &mut dyn SatSolver,
    ) -> Result<usize> {
        self.check_existential(e)?;
        let deps = &self.dependencies[&e];
        for lit in premise {
            let var = usize::from(lit.var());
            if !deps.contains(&var) {
                return Err(anyhow!(
                    "the premise variable {} is not a dependency of {}",
                    self.names.name_of(var),
                    self.names.name_of(e)
                ));
            }
        }
        let mut canonical = premise.to_vec();
        canonical.sort_unstable_by_key(|l| usize::from(l.var()));
        let key = (
            e,
            canonical.iter().map(|l| isize::from(*l)).collect::<Vec<isize>>(),
        );
        if let Some(var) = self.expansion_vars.get(&key) {
            return Ok(*var);
        }
        let expansion_var = self.counter.borrow_mut().next_id();
        let str_assignment = canonical
            .iter()
            .map(|l| {
                format!(
                    "{}{}",
                    usize::from(l.var()),
                    if l.is_positive() { "T" } else { "F" }
                )
            })
            .collect::<Vec<String>>()
            .join("_");
        let exist_name = self.names.name_of(e);
        self.names
            .rename(expansion_var, &format!("exp_{}_{}", exist_name, str_assignment));
        self.expansion_vars.insert(key, expansion_var);
        self.add_rule(e, &canonical, true, Some(expansion_var), solver)?;
        self.expansion_var_ids.push(expansion_var);
        Ok(expansion_var)
    }

    /// Returns the assumptions replayed on every counterexample query: the
    /// permanent conclusion literals, then the tail fire variables, then the
    /// (signed) tail value variables.
    pub(crate) fn standard_assumptions(&self) -> Vec<Literal> {
        let mut assumptions =
            Vec::with_capacity(self.permanent_assumptions.len() + 2 * self.tails.len());
        assumptions.extend(self.permanent_assumptions.iter().copied());
        assumptions.extend(self.tails.values().map(|t| Literal::of_var(t.fire, true)));
        assumptions.extend(self.tails.values().map(|t| t.value));
        assumptions
    }

    /// Returns all expansion variables, in allocation order.
    pub(crate) fn expansion_var_ids(&self) -> &[usize] {
        &self.expansion_var_ids
    }

    /// Returns the number of expansion variables allocated so far.
    pub(crate) fn n_expansion_vars(&self) -> usize {
        self.expansion_var_ids.len()
    }

    /// Returns `true` if and only if `u` belongs to the dependency set of `e`.
    pub(crate) fn is_dependency_of(&self, e: usize, u: usize) -> bool {
        self.dependencies
            .get(&e)
            .map(|deps| deps.contains(&u))
            .unwrap_or(false)
    }

    /// Returns the name table, including the encoding variable names.
    pub(crate) fn names(&self) -> &VarNames {
        &self.names
    }

    /// Formats the polarities of the internal encoding variables under an
    /// assignment of the counterexample instance. Diagnostics only.
    pub(crate) fn internal_snapshot(&self, assignment: &Assignment) -> Vec<String> {
        let mut lines =
            Vec::with_capacity(self.all_rule_fire_vars.len() + self.all_no_rule_fired_vars.len());
        let polarity = |var: usize| {
            if assignment.value_of(var) == Some(true) {
                '+'
            } else {
                '-'
            }
        };
        for v in &self.all_rule_fire_vars {
            lines.push(format!(
                "{}: {} (premise {}, for {})",
                self.names.name_of(v.var),
                polarity(v.var),
                v.premise,
                self.names.name_of(v.existential),
            ));
        }
        for v in &self.all_no_rule_fired_vars {
            lines.push(format!(
                "{}: {} (rule {}, for {})",
                self.names.name_of(v.var),
                polarity(v.var),
                v.rule_index,
                self.names.name_of(v.existential),
            ));
        }
        for v in &self.all_value_vars {
            lines.push(format!(
                "{}: {} (rule {}, for {})",
                self.names.name_of(v.var),
                polarity(v.var),
                v.rule_index,
                self.names.name_of(v.existential),
            ));
        }
        lines
    }
}
