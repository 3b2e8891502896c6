use app::{AuthorsCommand, CheckCommand, SolveCommand};
use crusti_app_helper::{AppHelper, Command};

mod app;

const AUTHORS: &str = "Emmanuel Renard <emmanuel.renard@posteo.net>";

fn main() {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        AUTHORS,
        "Skolibri, a CEGAR-based solver for Dependency Quantified Boolean Formulas.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(AuthorsCommand::new(app_name, app_version, AUTHORS)),
        Box::new(CheckCommand::new()),
        Box::new(SolveCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app.launch_app();
}
