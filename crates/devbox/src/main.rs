// Console output is this binary's job.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod commands;
mod terminal;
mod tracing;

use std::process::ExitCode;

use crate::cli::{Cli, Commands};
use crate::commands::Session;
use crate::tracing::TracingConfig;

fn main() -> ExitCode {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: cli.tracing_format(),
        level: cli.level.into(),
    };
    if let Err(error) = crate::tracing::init_tracing(tracing_config) {
        eprintln!("{error:?}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let code = error.exit_code();
            eprintln!("{:?}", miette::Report::new(error));
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: &Cli) -> devbox_core::Result<()> {
    match &cli.command {
        Commands::Version => {
            println!("{}", commands::version::get_version_info());
            Ok(())
        }
        Commands::List => {
            let session = Session::from_cli(cli)?;
            print!("{}", commands::list::render(&session.catalog, &session.config));
            Ok(())
        }
        Commands::Create(args) => commands::create::execute(&Session::from_cli(cli)?, args),
        Commands::Update { ids } => commands::update::execute(&Session::from_cli(cli)?, ids),
        Commands::BuildPython => commands::build_python::execute(&Session::from_cli(cli)?),
        Commands::Test { build, tests } => {
            commands::test::execute(&Session::from_cli(cli)?, *build, tests)
        }
        Commands::Coverage { subcommand } => {
            commands::coverage::execute(&Session::from_cli(cli)?, subcommand)
        }
    }
}
