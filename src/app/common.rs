use anyhow::{Context, Result};
use crusti_app_helper::{info, warn, Arg};
use skolibri::{
    dqbf::DqbfInstance,
    io::{DqcirReader, InstanceReader},
    sat::{self, SatSolver, SatSolverFactoryFn, SolvingListener, SolvingResult},
};
use std::{
    fs::{self, File},
    io::{BufReader, Read},
    path::PathBuf,
};

pub(crate) const ARG_INPUT: &str = "INPUT";

pub(crate) fn input_args() -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .empty_values(false)
        .multiple(false)
        .help("the input file that contains the DQCIR instance")
        .required(true)
}

pub(crate) fn read_file_path(file_path: &str) -> Result<DqbfInstance> {
    let mut reader = DqcirReader::default();
    reader.add_warning_handler(Box::new(|line, msg| warn!("at line {}: {}", line, msg)));
    let instance = read_file_path_with(file_path, &|r| reader.read(r))?;
    info!(
        "the instance has {} universal variable(s), {} existential variable(s) and {} gate(s)",
        instance.n_universals(),
        instance.n_existentials(),
        instance.n_gates(),
    );
    Ok(instance)
}

pub(crate) fn read_file_path_with<F, R>(file_path: &str, reader: &F) -> Result<R>
where
    F: Fn(&mut dyn Read) -> Result<R>,
{
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut file_reader = BufReader::new(File::open(canonicalized)?);
    (reader)(&mut file_reader)
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}

pub(crate) fn logged_solver_factory() -> Box<SatSolverFactoryFn> {
    Box::new(|| {
        let mut solver = sat::default_solver();
        solver.add_listener(Box::<SatSolvingLogger>::default());
        solver
    })
}

#[derive(Default)]
struct SatSolvingLogger;

impl SolvingListener for SatSolvingLogger {
    fn solving_start(&self, n_vars: usize, n_clauses: usize) {
        info!(
            "launching SAT solver on an instance with {} variables and {} clauses",
            n_vars, n_clauses
        );
    }

    fn solving_end(&self, result: &SolvingResult) {
        let r = match result {
            SolvingResult::Satisfiable(_) => "SAT",
            SolvingResult::Unsatisfiable => "UNSAT",
            SolvingResult::Unknown => "UNKNOWN",
        };
        info!("SAT solver ended with result {}", r);
    }
}
