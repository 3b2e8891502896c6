use super::common;
use anyhow::Result;
use crusti_app_helper::{
    info, logging_level_cli_arg, AppSettings, Arg, ArgMatches, Command, SubCommand,
};
use skolibri::{
    encodings::TseitinEncoder,
    io::ModelWriter,
    solvers::{CegarDqbfSolver, ModelFunctionsExtractor, SatisfiabilityComputer, Verdict},
};

const CMD_NAME: &str = "solve";

const ARG_MODEL: &str = "MODEL";

const SAT_EXIT_CODE: i32 = 10;
const UNSAT_EXIT_CODE: i32 = 20;

pub(crate) struct SolveCommand;

impl SolveCommand {
    pub(crate) fn new() -> Self {
        SolveCommand
    }
}

impl<'a> Command<'a> for SolveCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> crusti_app_helper::App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Solves a DQBF instance")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(logging_level_cli_arg())
            .arg(
                Arg::with_name(ARG_MODEL)
                    .short("m")
                    .long("with-model")
                    .takes_value(false)
                    .help("enumerate the model functions in case the instance is satisfiable")
                    .required(false),
            )
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches.value_of(common::ARG_INPUT).unwrap();
        let mut instance = common::read_file_path(file)?;
        let matrix = TseitinEncoder::default().encode_matrix(&mut instance);
        info!(
            "the Tseitin translation produced {} clause(s) and {} auxiliary variable(s)",
            matrix.len(),
            instance.n_aux_vars(),
        );
        let mut solver = CegarDqbfSolver::new_with_sat_solver_factory(
            &instance,
            matrix,
            common::logged_solver_factory(),
        )?;
        let verdict = solver.check_satisfiability()?;
        info!(
            "solved after {} iteration(s), with {} expansion variable(s)",
            solver.n_iterations(),
            solver.n_expansion_vars(),
        );
        let writer = ModelWriter::default();
        writer.write_verdict(&mut std::io::stdout(), verdict)?;
        if verdict == Verdict::Satisfiable && arg_matches.is_present(ARG_MODEL) {
            let names = solver.names().clone();
            let mut extractor = ModelFunctionsExtractor::new(&mut solver);
            info!(
                "enumerating the model functions of {} universal assignment(s)",
                extractor.n_universal_assignments()?,
            );
            extractor.enumerate_model_functions(|universals, existentials| {
                writer.write_model_row(&mut std::io::stdout(), &names, universals, existentials)
            })?;
        }
        std::process::exit(match verdict {
            Verdict::Satisfiable => SAT_EXIT_CODE,
            Verdict::Unsatisfiable => UNSAT_EXIT_CODE,
        })
    }
}
