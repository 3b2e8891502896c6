use super::common;
use anyhow::Result;
use crusti_app_helper::{
    info, logging_level_cli_arg, AppSettings, ArgMatches, Command, SubCommand,
};

const CMD_NAME: &str = "check";

pub(crate) struct CheckCommand;

impl CheckCommand {
    pub(crate) fn new() -> Self {
        CheckCommand
    }
}

impl<'a> Command<'a> for CheckCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> crusti_app_helper::App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks a DQCIR input file for errors and displays its quantifier structure")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches.value_of(common::ARG_INPUT).unwrap();
        let instance = common::read_file_path(file)?;
        let names = instance.names();
        for e in instance.existentials() {
            let deps = instance
                .dependencies_of(*e)?
                .iter()
                .map(|d| names.name_of(*d))
                .collect::<Vec<String>>();
            info!("{} depends on [{}]", names.name_of(*e), deps.join(", "));
        }
        info!(
            "the output gate is {}",
            names.name_of(instance.output_gate().unwrap()),
        );
        Ok(())
    }
}
