use crate::{
    dqbf::{DqbfInstance, GateKind},
    sat::Literal,
};

/// Translates the gate circuit of an instance into CNF clauses.
///
/// Each gate yields the standard equivalence clauses between its output
/// variable and the connective applied to its inputs. XOR gates with more
/// than two inputs are chained through fresh auxiliary variables allocated
/// via the instance's shared counter.
///
/// The resulting clause set is the matrix handed to the solver; it is
/// satisfied by exactly the assignments propagating every gate correctly.
#[derive(Default)]
pub struct TseitinEncoder;

impl TseitinEncoder {
    /// Translates the gates of the instance, returning the matrix clauses.
    pub fn encode_matrix(&self, instance: &mut DqbfInstance) -> Vec<Vec<Literal>> {
        let mut cnf = Vec::new();
        let gates = instance.gates().to_vec();
        for gate in &gates {
            let output = Literal::of_var(gate.output(), true);
            match gate.kind() {
                GateKind::And => encode_and(&mut cnf, output, gate.inputs()),
                GateKind::Or => encode_or(&mut cnf, output, gate.inputs()),
                GateKind::Xor => encode_xor(&mut cnf, instance, output, gate.inputs()),
            }
        }
        cnf
    }
}

fn encode_and(cnf: &mut Vec<Vec<Literal>>, output: Literal, inputs: &[Literal]) {
    for input in inputs {
        cnf.push(vec![output.negate(), *input]);
    }
    let mut full_cl = Vec::with_capacity(1 + inputs.len());
    full_cl.push(output);
    full_cl.extend(inputs.iter().map(|l| l.negate()));
    cnf.push(full_cl);
}

fn encode_or(cnf: &mut Vec<Vec<Literal>>, output: Literal, inputs: &[Literal]) {
    for input in inputs {
        cnf.push(vec![input.negate(), output]);
    }
    let mut full_cl = Vec::with_capacity(1 + inputs.len());
    full_cl.push(output.negate());
    full_cl.extend(inputs.iter().copied());
    cnf.push(full_cl);
}

fn encode_xor(
    cnf: &mut Vec<Vec<Literal>>,
    instance: &mut DqbfInstance,
    output: Literal,
    inputs: &[Literal],
) {
    match inputs {
        [] => cnf.push(vec![output.negate()]),
        [input] => {
            cnf.push(vec![output.negate(), *input]);
            cnf.push(vec![output, input.negate()]);
        }
        [lhs, rhs] => encode_xor2(cnf, output, *lhs, *rhs),
        _ => {
            let gate_id = usize::from(output.var());
            let mut prev = Literal::of_var(instance.new_aux_var(&format!("xor_{}", gate_id)), true);
            encode_xor2(cnf, prev, inputs[0], inputs[1]);
            for (i, input) in inputs
                .iter()
                .enumerate()
                .take(inputs.len() - 1)
                .skip(2)
            {
                let aux = Literal::of_var(
                    instance.new_aux_var(&format!("xor_{}_{}", gate_id, i)),
                    true,
                );
                encode_xor2(cnf, aux, prev, *input);
                prev = aux;
            }
            encode_xor2(cnf, output, prev, *inputs.last().unwrap());
        }
    }
}

fn encode_xor2(cnf: &mut Vec<Vec<Literal>>, output: Literal, lhs: Literal, rhs: Literal) {
    cnf.push(vec![output.negate(), lhs.negate(), rhs.negate()]);
    cnf.push(vec![output.negate(), lhs, rhs]);
    cnf.push(vec![output, lhs.negate(), rhs]);
    cnf.push(vec![output, lhs, rhs.negate()]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause;

    #[test]
    fn test_and_gate() {
        let mut instance = DqbfInstance::new();
        instance.new_universal("x").unwrap();
        instance.new_existential("y").unwrap();
        instance
            .new_gate("g", GateKind::And, &[("x", false), ("y", true)])
            .unwrap();
        let cnf = TseitinEncoder::default().encode_matrix(&mut instance);
        assert_eq!(
            vec![clause![-3, 1], clause![-3, -2], clause![3, -1, 2]],
            cnf
        );
    }

    #[test]
    fn test_or_gate() {
        let mut instance = DqbfInstance::new();
        instance.new_universal("x").unwrap();
        instance.new_existential("y").unwrap();
        instance
            .new_gate("g", GateKind::Or, &[("x", false), ("y", false)])
            .unwrap();
        let cnf = TseitinEncoder::default().encode_matrix(&mut instance);
        assert_eq!(
            vec![clause![-1, 3], clause![-2, 3], clause![-3, 1, 2]],
            cnf
        );
    }

    #[test]
    fn test_empty_and_forces_true() {
        let mut instance = DqbfInstance::new();
        instance.new_gate("g", GateKind::And, &[]).unwrap();
        let cnf = TseitinEncoder::default().encode_matrix(&mut instance);
        assert_eq!(vec![clause![1]], cnf);
    }

    #[test]
    fn test_empty_or_forces_false() {
        let mut instance = DqbfInstance::new();
        instance.new_gate("g", GateKind::Or, &[]).unwrap();
        let cnf = TseitinEncoder::default().encode_matrix(&mut instance);
        assert_eq!(vec![clause![-1]], cnf);
    }

    #[test]
    fn test_xor2_gate() {
        let mut instance = DqbfInstance::new();
        instance.new_universal("x").unwrap();
        instance.new_existential("y").unwrap();
        instance
            .new_gate("g", GateKind::Xor, &[("x", false), ("y", false)])
            .unwrap();
        let cnf = TseitinEncoder::default().encode_matrix(&mut instance);
        assert_eq!(
            vec![
                clause![-3, -1, -2],
                clause![-3, 1, 2],
                clause![3, -1, 2],
                clause![3, 1, -2]
            ],
            cnf
        );
        assert_eq!(0, instance.n_aux_vars());
    }

    #[test]
    fn test_xor1_gate() {
        let mut instance = DqbfInstance::new();
        instance.new_universal("x").unwrap();
        instance.new_gate("g", GateKind::Xor, &[("x", true)]).unwrap();
        let cnf = TseitinEncoder::default().encode_matrix(&mut instance);
        assert_eq!(vec![clause![-2, -1], clause![2, 1]], cnf);
    }

    #[test]
    fn test_empty_xor_forces_false() {
        let mut instance = DqbfInstance::new();
        instance.new_gate("g", GateKind::Xor, &[]).unwrap();
        let cnf = TseitinEncoder::default().encode_matrix(&mut instance);
        assert_eq!(vec![clause![-1]], cnf);
    }

    #[test]
    fn test_wide_xor_chains_through_aux_vars() {
        let mut instance = DqbfInstance::new();
        instance.new_universal("a").unwrap();
        instance.new_universal("b").unwrap();
        instance.new_universal("c").unwrap();
        instance
            .new_gate(
                "g",
                GateKind::Xor,
                &[("a", false), ("b", false), ("c", false)],
            )
            .unwrap();
        let cnf = TseitinEncoder::default().encode_matrix(&mut instance);
        assert_eq!(1, instance.n_aux_vars());
        // aux <-> a xor b, then g <-> aux xor c
        assert_eq!(8, cnf.len());
        let aux = instance.names().id_of("_aux_xor_4_5").unwrap() as isize;
        assert_eq!(clause![-aux, -1, -2], cnf[0]);
        assert_eq!(clause![4, aux, -3], cnf[7]);
    }
}
