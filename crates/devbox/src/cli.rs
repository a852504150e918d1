use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use devbox_core::Selection;

use crate::tracing::{LogLevel, TracingFormat};

#[derive(Parser, Debug)]
#[command(name = "devbox")]
#[command(about = "Assemble a ready-to-use CPython contributor environment")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    #[arg(long, global = true, help = "Output logs in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "DEVBOX_ROOT",
        default_value = ".",
        help = "Directory the box is assembled in"
    )]
    pub root: PathBuf,

    #[arg(
        long,
        global = true,
        env = "DEVBOX_CONFIG",
        help = "Configuration file (default: <root>/devbox.toml when present)"
    )]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Log format after applying the `--json` shorthand.
    pub fn tracing_format(&self) -> TracingFormat {
        if self.json {
            TracingFormat::Json
        } else {
            self.log_format
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Fetch (and optionally build) items into the box")]
    Create(CreateArgs),
    #[command(about = "Refresh already fetched repositories in place")]
    Update {
        #[arg(help = "Items to update (default: every fetched repository)")]
        ids: Vec<String>,
    },
    #[command(about = "Build CPython from the box's clone")]
    BuildPython,
    #[command(about = "Run CPython's test suite as rigorously as possible")]
    Test {
        #[arg(long, help = "Build CPython first if needed")]
        build: bool,
        #[arg(help = "Tests to run (default: the whole suite)")]
        tests: Vec<String>,
    },
    #[command(about = "Use coverage.py on CPython's standard library")]
    Coverage {
        #[command(subcommand)]
        subcommand: CoverageCommands,
    },
    #[command(about = "List the items a box can contain")]
    List,
    #[command(about = "Show version information")]
    Version,
}

#[derive(Args, Debug, Default)]
#[group(id = "selection", multiple = false)]
pub struct CreateArgs {
    #[arg(long, help = "Every item")]
    pub all: bool,
    #[arg(long, help = "Every item that does not need a web browser")]
    pub basic: bool,
    #[arg(long, help = "CPython, the devguide and the PEPs")]
    pub minimum: bool,
    #[arg(long, help = "Also build documentation and reports")]
    pub build: bool,
    #[arg(long, short = 'y', help = "Skip the size confirmation")]
    pub yes: bool,
}

impl CreateArgs {
    /// The selection named by flags, if any.
    pub fn selection(&self) -> Option<Selection> {
        if self.all {
            Some(Selection::All)
        } else if self.basic {
            Some(Selection::Basic)
        } else if self.minimum {
            Some(Selection::Minimum)
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CoverageCommands {
    #[command(about = "Build coverage.py's C tracer against the built CPython")]
    Build,
    #[command(about = "Run coverage.py over the standard library")]
    Run {
        #[arg(help = "Tests to run (default: all tests)")]
        tests: Vec<String>,
    },
    #[command(about = "Generate an HTML coverage report")]
    Html {
        #[arg(help = "Where to save the report (default: <root>/coverage_report)")]
        directory: Option<PathBuf>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        temp_env::with_vars_unset(["DEVBOX_ROOT", "DEVBOX_CONFIG"], || {
            let cli = Cli::try_parse_from(["devbox", "version"]).unwrap();

            assert_eq!(cli.level, LogLevel::Warn);
            assert!(!cli.json);
            assert_eq!(cli.tracing_format(), TracingFormat::Compact);
            assert_eq!(cli.root, PathBuf::from("."));
            assert!(cli.config.is_none());
            assert!(matches!(cli.command, Commands::Version));
        });
    }

    #[test]
    fn test_cli_log_level_parsing() {
        let cli = Cli::try_parse_from(["devbox", "--level", "debug", "list"]).unwrap();
        assert_eq!(cli.level, LogLevel::Debug);

        let cli = Cli::try_parse_from(["devbox", "-l", "error", "list"]).unwrap();
        assert_eq!(cli.level, LogLevel::Error);

        assert!(Cli::try_parse_from(["devbox", "--level", "invalid", "list"]).is_err());
    }

    #[test]
    fn test_log_format_selection() {
        let cli = Cli::try_parse_from(["devbox", "--log-format", "pretty", "list"]).unwrap();
        assert_eq!(cli.tracing_format(), TracingFormat::Pretty);

        let cli =
            Cli::try_parse_from(["devbox", "list", "--log-format", "pretty", "--json"]).unwrap();
        assert_eq!(cli.tracing_format(), TracingFormat::Json);

        assert!(Cli::try_parse_from(["devbox", "--log-format", "xml", "list"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["devbox", "list", "--json", "--root", "/tmp/box"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.root, PathBuf::from("/tmp/box"));
    }

    #[test]
    fn test_root_from_environment() {
        temp_env::with_var("DEVBOX_ROOT", Some("/srv/box"), || {
            let cli = Cli::try_parse_from(["devbox", "list"]).unwrap();
            assert_eq!(cli.root, PathBuf::from("/srv/box"));
        });
    }

    #[test]
    fn test_create_selection_flags() {
        let cli = Cli::try_parse_from(["devbox", "create", "--minimum", "--build"]).unwrap();
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.selection(), Some(Selection::Minimum));
        assert!(args.build);
        assert!(!args.yes);

        let cli = Cli::try_parse_from(["devbox", "create", "-y"]).unwrap();
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.selection(), None);
        assert!(args.yes);
    }

    #[test]
    fn test_create_selection_flags_are_exclusive() {
        let result = Cli::try_parse_from(["devbox", "create", "--all", "--basic"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ArgumentConflict
        );
    }

    #[test]
    fn test_coverage_subcommands() {
        let cli =
            Cli::try_parse_from(["devbox", "coverage", "run", "test_os", "test_sys"]).unwrap();
        let Commands::Coverage {
            subcommand: CoverageCommands::Run { tests },
        } = cli.command
        else {
            panic!("expected coverage run");
        };
        assert_eq!(tests, vec!["test_os", "test_sys"]);

        let cli = Cli::try_parse_from(["devbox", "coverage", "html"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Coverage {
                subcommand: CoverageCommands::Html { directory: None }
            }
        ));
    }

    #[test]
    fn test_build_python_name() {
        let cli = Cli::try_parse_from(["devbox", "build-python"]).unwrap();
        assert!(matches!(cli.command, Commands::BuildPython));
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Cli::try_parse_from(["devbox"]).is_err());
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["devbox", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
