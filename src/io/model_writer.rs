use crate::{sat::Literal, solvers::Verdict, utils::VarNames};
use anyhow::{Context, Result};
use std::io::Write;

/// A writer for solving verdicts and model functions.
///
/// The verdict is written as a single `SATISFIABLE` or `UNSATISFIABLE` line.
/// Model functions are written one universal assignment per row, mapping the
/// assignment to the induced existential values; variables are displayed by
/// name, a `~` prefix denoting a false value:
///
/// ```text
/// [~x1, x2] -> [y]
/// ```
#[derive(Default)]
pub struct ModelWriter;

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

impl ModelWriter {
    /// Writes the final verdict.
    pub fn write_verdict(&self, writer: &mut dyn Write, verdict: Verdict) -> Result<()> {
        let context = "while writing the verdict";
        writeln!(writer, "{}", verdict).context(context)?;
        writer.flush().context(context)
    }

    /// Writes the model-function row associated with a universal assignment.
    pub fn write_model_row(
        &self,
        writer: &mut dyn Write,
        names: &VarNames,
        universals: &[Literal],
        existentials: &[Literal],
    ) -> Result<()> {
        let context = "while writing a model row";
        writeln!(
            writer,
            "{} -> {}",
            format_literals(names, universals),
            format_literals(names, existentials)
        )
        .context(context)?;
        writer.flush().context(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause;
    use std::io::BufWriter;

    fn names_xy() -> VarNames {
        let mut names = VarNames::default();
        names.register(1, "x1").unwrap();
        names.register(2, "x2").unwrap();
        names.register(3, "y").unwrap();
        names
    }

    #[test]
    fn test_write_verdict() {
        let writer = ModelWriter::default();
        let mut buffer = BufWriter::new(Vec::new());
        writer
            .write_verdict(&mut buffer, Verdict::Satisfiable)
            .unwrap();
        assert_eq!(
            "SATISFIABLE\n",
            String::from_utf8(buffer.into_inner().unwrap()).unwrap()
        );
    }

    #[test]
    fn test_write_model_row() {
        let writer = ModelWriter::default();
        let mut buffer = BufWriter::new(Vec::new());
        writer
            .write_model_row(&mut buffer, &names_xy(), &clause![-1, 2], &clause![3])
            .unwrap();
        assert_eq!(
            "[~x1, x2] -> [y]\n",
            String::from_utf8(buffer.into_inner().unwrap()).unwrap()
        );
    }

    #[test]
    fn test_write_model_row_without_universals() {
        let writer = ModelWriter::default();
        let mut buffer = BufWriter::new(Vec::new());
        writer
            .write_model_row(&mut buffer, &names_xy(), &clause![], &clause![-3])
            .unwrap();
        assert_eq!(
            "[] -> [~y]\n",
            String::from_utf8(buffer.into_inner().unwrap()).unwrap()
        );
    }
}
