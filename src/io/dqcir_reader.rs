use super::{InstanceReader, WarningHandler};
use crate::dqbf::{DqbfInstance, GateKind};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::io::{BufRead, BufReader, Read};

const VAR_NAME_PATTERN: &str = r"[_[:alpha:]][_[:alpha:]\d]*";

lazy_static! {
    static ref QUANTIFIER_LINE_PATTERN: Regex =
        Regex::new(r"^\s*(forall|exists)\(([^)]*)\)\s*$").unwrap();
    static ref DEPEND_LINE_PATTERN: Regex = Regex::new(r"^\s*depend\(([^)]*)\)\s*$").unwrap();
    static ref OUTPUT_LINE_PATTERN: Regex = Regex::new(&format!(
        r"^\s*output\(\s*({})\s*\)\s*$",
        VAR_NAME_PATTERN
    ))
    .unwrap();
    static ref GATE_LINE_PATTERN: Regex = Regex::new(&format!(
        r"^\s*({})\s*=\s*([[:alpha:]]+)\(([^)]*)\)\s*$",
        VAR_NAME_PATTERN
    ))
    .unwrap();
    static ref VAR_NAME_ONLY_PATTERN: Regex =
        Regex::new(&format!(r"^{}$", VAR_NAME_PATTERN)).unwrap();
}

/// A reader for the DQCIR format.
///
/// This object is used to read a [`DqbfInstance`] encoded using the DQCIR
/// input format, a line-oriented circuit format for DQBF.
///
/// # DQCIR format
///
/// Lines starting with `#` are comments and blank lines are ignored. The
/// remaining lines are directives:
///   * `forall(x1, x2)` declares universal variables;
///   * `exists(y1, y2)` declares existential variables depending on all the
///     universal variables declared so far;
///   * `depend(y, x1, x2)` overrides the dependencies of an existential;
///   * `g = and(a, -b)` (resp. `or`, `xor`) defines a gate, a `-` prefix
///     negating an input;
///   * `output(g)` names the output gate.
///
/// The following content encodes a formula whose only Skolem function for
/// `y` mirrors `x2`:
///
/// ```text
/// forall(x1, x2)
/// exists(y)
/// g1 = or(y, -x2)
/// g2 = or(-y, x2)
/// g = and(g1, g2)
/// output(g)
/// ```
///
/// # Example
///
/// ```
/// # use skolibri::dqbf::DqbfInstance;
/// # use skolibri::io::{DqcirReader, InstanceReader};
/// fn read_instance_from_str(s: &str) -> DqbfInstance {
///     let reader = DqcirReader::default();
///     reader.read(&mut s.as_bytes()).expect("invalid DQCIR instance")
/// }
/// # read_instance_from_str("forall(x)\nexists(y)\ng = or(x, y)\noutput(g)\n");
/// ```
#[derive(Default)]
pub struct DqcirReader {
    warning_handlers: Vec<WarningHandler>,
}

fn check_var_name(name: &str) -> Result<&str> {
    if VAR_NAME_ONLY_PATTERN.is_match(name) {
        Ok(name)
    } else {
        Err(anyhow!(r#"invalid variable name "{}""#, name))
    }
}

fn split_args(args: &str) -> impl Iterator<Item = &str> {
    args.split(',').map(str::trim).filter(|a| !a.is_empty())
}

fn parse_input_literal(arg: &str) -> Result<(&str, bool)> {
    match arg.strip_prefix('-') {
        Some(name) => Ok((check_var_name(name.trim())?, true)),
        None => Ok((check_var_name(arg)?, false)),
    }
}

impl DqcirReader {
    fn warn(&self, line_index: usize, message: String) {
        self.warning_handlers
            .iter()
            .for_each(|h| (h)(1 + line_index, message.clone()));
    }

    fn read_quantifier_line(
        &self,
        instance: &mut DqbfInstance,
        line_index: usize,
        quantifier: &str,
        args: &str,
    ) -> Result<()> {
        let mut n_vars = 0;
        for name in split_args(args) {
            check_var_name(name)?;
            match quantifier {
                "forall" => instance.new_universal(name)?,
                "exists" => instance.new_existential(name)?,
                _ => unreachable!(),
            };
            n_vars += 1;
        }
        if n_vars == 0 {
            self.warn(line_index, format!("empty {}(...) block", quantifier));
        }
        Ok(())
    }

    fn read_depend_line(&self, instance: &mut DqbfInstance, args: &str) -> Result<()> {
        let mut args_iter = split_args(args);
        let existential = args_iter
            .next()
            .ok_or_else(|| anyhow!("missing existential variable in depend(...)"))?;
        check_var_name(existential)?;
        let deps = args_iter
            .map(check_var_name)
            .collect::<Result<Vec<&str>>>()?;
        instance.set_dependencies(existential, &deps)
    }

    fn read_gate_line(
        &self,
        instance: &mut DqbfInstance,
        name: &str,
        kind: &str,
        args: &str,
    ) -> Result<()> {
        let kind = kind.parse::<GateKind>()?;
        let inputs = split_args(args)
            .map(parse_input_literal)
            .collect::<Result<Vec<(&str, bool)>>>()?;
        instance.new_gate(name, kind, &inputs).map(|_| ())
    }
}

impl InstanceReader for DqcirReader {
    fn read(&self, reader: &mut dyn Read) -> Result<DqbfInstance> {
        let mut instance = DqbfInstance::new();
        let br = BufReader::new(reader);
        for (i, line) in br.lines().enumerate() {
            let context = || format!("while reading line with index {}", i);
            let l = line.with_context(context)?;
            let l = l.trim();
            if l.is_empty() || l.starts_with('#') {
                continue;
            }
            if let Some(c) = QUANTIFIER_LINE_PATTERN.captures(l) {
                self.read_quantifier_line(
                    &mut instance,
                    i,
                    c.get(1).unwrap().as_str(),
                    c.get(2).unwrap().as_str(),
                )
                .with_context(context)?;
                continue;
            }
            if let Some(c) = DEPEND_LINE_PATTERN.captures(l) {
                self.read_depend_line(&mut instance, c.get(1).unwrap().as_str())
                    .with_context(context)?;
                continue;
            }
            if let Some(c) = OUTPUT_LINE_PATTERN.captures(l) {
                instance
                    .set_output(c.get(1).unwrap().as_str())
                    .with_context(context)?;
                continue;
            }
            if let Some(c) = GATE_LINE_PATTERN.captures(l) {
                self.read_gate_line(
                    &mut instance,
                    c.get(1).unwrap().as_str(),
                    c.get(2).unwrap().as_str(),
                    c.get(3).unwrap().as_str(),
                )
                .with_context(context)?;
                continue;
            }
            return Err(anyhow!("syntax error in line \"{}\"", l)).with_context(context);
        }
        if instance.output_gate().is_none() {
            return Err(anyhow!("the instance has no output gate"));
        }
        Ok(instance)
    }

    fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{clause, Literal};
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_quantifier_line_pattern_ok() {
        assert!(QUANTIFIER_LINE_PATTERN.is_match("forall(x1, x2)"));
        assert!(QUANTIFIER_LINE_PATTERN.is_match("   exists(y)   "));
        assert!(QUANTIFIER_LINE_PATTERN.is_match("forall()"));
    }

    #[test]
    fn test_quantifier_line_pattern_not_ok() {
        ["forall(x1", "forall x1", "all(x1)", "forall(x))(", "exists"]
            .iter()
            .for_each(|l| assert!(!QUANTIFIER_LINE_PATTERN.is_match(l)));
    }

    #[test]
    fn test_gate_line_pattern_ok() {
        assert!(GATE_LINE_PATTERN.is_match("g = and(a, b)"));
        assert!(GATE_LINE_PATTERN.is_match("g=or(-a,b)"));
        assert!(GATE_LINE_PATTERN.is_match("  g_1 = xor()  "));
    }

    #[test]
    fn test_gate_line_pattern_not_ok() {
        ["= and(a)", "g = and(a", "1g = and(a)", "g = (a)"]
            .iter()
            .for_each(|l| assert!(!GATE_LINE_PATTERN.is_match(l)));
    }

    #[test]
    fn test_read_full_instance() {
        let instance_str = r#"
        # a small DQBF
        forall(x1, x2)
        exists(y1)
        depend(y2, x2)
        g1 = and(x1, -y1)
        g2 = or(g1, y2)
        output(g2)
        "#;
        let reader = DqcirReader::default();
        let instance = reader.read(&mut instance_str.as_bytes()).unwrap();
        assert_eq!(2, instance.n_universals());
        assert_eq!(2, instance.n_existentials());
        assert_eq!(2, instance.n_gates());
        let x1 = instance.names().id_of("x1").unwrap();
        let x2 = instance.names().id_of("x2").unwrap();
        let y1 = instance.names().id_of("y1").unwrap();
        let y2 = instance.names().id_of("y2").unwrap();
        assert_eq!(&[x1, x2], instance.dependencies_of(y1).unwrap());
        assert_eq!(&[x2], instance.dependencies_of(y2).unwrap());
        assert_eq!(
            clause![x1 as isize, -(y1 as isize)],
            instance.gates()[0].inputs()
        );
        assert_eq!(
            Some(instance.names().id_of("g2").unwrap()),
            instance.output_gate()
        );
    }

    #[test]
    fn test_read_syntax_error() {
        let instance_str = "forall(x)\nexists(y)\nwhatever\noutput(y)\n";
        assert!(DqcirReader::default()
            .read(&mut instance_str.as_bytes())
            .is_err());
    }

    #[test]
    fn test_read_unknown_gate_kind() {
        let instance_str = "exists(y)\ng = nand(y)\noutput(g)\n";
        assert!(DqcirReader::default()
            .read(&mut instance_str.as_bytes())
            .is_err());
    }

    #[test]
    fn test_read_invalid_var_name() {
        let instance_str = "forall(1x)\nexists(y)\noutput(y)\n";
        assert!(DqcirReader::default()
            .read(&mut instance_str.as_bytes())
            .is_err());
    }

    #[test]
    fn test_read_missing_output() {
        let instance_str = "forall(x)\nexists(y)\n";
        assert!(DqcirReader::default()
            .read(&mut instance_str.as_bytes())
            .is_err());
    }

    #[test]
    fn test_read_depend_without_existential() {
        let instance_str = "forall(x)\ndepend()\noutput(x)\n";
        assert!(DqcirReader::default()
            .read(&mut instance_str.as_bytes())
            .is_err());
    }

    #[test]
    fn test_read_dependency_on_unknown_universal() {
        let instance_str = "forall(x)\ndepend(y, z)\noutput(y)\n";
        assert!(DqcirReader::default()
            .read(&mut instance_str.as_bytes())
            .is_err());
    }

    #[test]
    fn test_read_warn_empty_quantifier_block() {
        let instance_str = "forall()\nexists(y)\noutput(y)\n";
        let warnings = Rc::new(RefCell::new(vec![]));
        let warnings_clone = Rc::clone(&warnings);
        let mut reader = DqcirReader::default();
        reader.add_warning_handler(Box::new(move |i, w| {
            warnings_clone.borrow_mut().push((i, w))
        }));
        reader.read(&mut instance_str.as_bytes()).unwrap();
        assert_eq!(
            vec![(1, "empty forall(...) block".to_string())],
            warnings.borrow().clone()
        );
    }

    #[test]
    fn test_read_negated_gate_inputs() {
        let instance_str = "exists(y)\ng = and(-y, - y)\noutput(g)\n";
        let instance = DqcirReader::default()
            .read(&mut instance_str.as_bytes())
            .unwrap();
        let y = instance.names().id_of("y").unwrap() as isize;
        assert_eq!(clause![-y, -y], instance.gates()[0].inputs());
    }
}
