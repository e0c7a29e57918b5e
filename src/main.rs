//! appcfg: inspect per-application YAML configuration files.

use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use appcfg::{ConfigLoader, load_config};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use env_logger::fmt::WriteStyle;
use log::{LevelFilter, debug};
use serde_yaml::Value;

const APP_NAME: &str = env!("CARGO_PKG_NAME");

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.common);

    match cli.command {
        Command::Path(cmd) => handle_path(&cmd),
        Command::Show(cmd) => handle_show(&cli.common, cmd),
        Command::Completions { shell } => {
            handle_completions(shell);
            Ok(())
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Inspect per-application YAML configuration files.",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Clone, Args)]
struct CommonOpts {
    /// Reduce output to only errors
    #[arg(short, long, action = clap::ArgAction::SetTrue, global = true)]
    quiet: bool,
    /// Increase logging verbosity (stackable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Enable debug logging (equivalent to -vv)
    #[arg(long, global = true)]
    debug: bool,
    /// Enable trace logging (overrides other levels)
    #[arg(long, global = true)]
    trace: bool,
    /// Output JSON instead of YAML
    #[arg(long, global = true)]
    json: bool,
    /// Disable ANSI colors in output
    #[arg(long = "no-color", global = true, conflicts_with = "color")]
    no_color: bool,
    /// Control color output (auto, always, never)
    #[arg(long, value_enum, default_value_t = ColorOption::Auto, global = true)]
    color: ColorOption,
    /// Emit additional diagnostics for troubleshooting
    #[arg(long = "diagnostics", global = true)]
    diagnostics: bool,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorOption {
    /// Detect terminal capabilities automatically.
    Auto,
    /// Always emit ANSI color codes.
    Always,
    /// Never emit ANSI color codes.
    Never,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the config file path for an application
    Path(PathCommand),
    /// Load a config file and print its content
    Show(ShowCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Args)]
struct PathCommand {
    /// Application name
    #[arg(value_name = "APP")]
    app: String,
}

#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
struct ShowCommand {
    /// Load $HOME/.config/<APP>.yaml
    #[arg(long, value_name = "APP")]
    app: Option<String>,
    /// Load an explicit file
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
}

fn init_logging(common: &CommonOpts) {
    if common.quiet {
        log::set_max_level(LevelFilter::Off);
        return;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if let Some(level) = requested_log_level(common) {
        builder.filter_level(level);
    }

    let force_color =
        matches!(common.color, ColorOption::Always) || env::var_os("FORCE_COLOR").is_some();
    let disable_color = common.no_color
        || matches!(common.color, ColorOption::Never)
        || env::var_os("NO_COLOR").is_some()
        || (!force_color && !io::stderr().is_terminal());

    if disable_color {
        builder.write_style(WriteStyle::Never);
    } else if force_color {
        builder.write_style(WriteStyle::Always);
    } else {
        builder.write_style(WriteStyle::Auto);
    }

    if common.diagnostics {
        builder.format_timestamp_millis();
        builder.format_module_path(true);
        builder.format_target(true);
    }

    if let Err(err) = builder.try_init() {
        if common.verbose > 0 {
            eprintln!("logger already initialized: {err}");
        }
    }
}

/// Level chosen on the command line, if any; `RUST_LOG` applies otherwise.
const fn requested_log_level(common: &CommonOpts) -> Option<LevelFilter> {
    if common.trace {
        Some(LevelFilter::Trace)
    } else if common.debug {
        Some(LevelFilter::Debug)
    } else {
        match common.verbose {
            0 => None,
            1 => Some(LevelFilter::Info),
            2 => Some(LevelFilter::Debug),
            _ => Some(LevelFilter::Trace),
        }
    }
}

fn handle_path(cmd: &PathCommand) -> Result<()> {
    let path = ConfigLoader::new().app_config_path(&cmd.app)?;
    println!("{}", path.display());
    Ok(())
}

fn handle_show(common: &CommonOpts, cmd: ShowCommand) -> Result<()> {
    let mut document = Value::Null;
    match (cmd.app, cmd.file) {
        (Some(app), _) => ConfigLoader::new().load_app_config(&app, &mut document)?,
        (None, Some(file)) => load_config(&file, &mut document)?,
        (None, None) => bail!("either --app or --file is required"),
    }
    debug!("loaded document: {document:?}");

    let output = if common.json {
        serde_json::to_string_pretty(&document).context("serializing config to JSON")?
    } else {
        serde_yaml::to_string(&document).context("serializing config to YAML")?
    };
    print!("{output}");
    if common.json {
        println!();
    }
    Ok(())
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_requires_a_source() {
        assert!(Cli::try_parse_from([APP_NAME, "show"]).is_err());
        assert!(Cli::try_parse_from([APP_NAME, "show", "--app", "a", "--file", "b"]).is_err());
        assert!(Cli::try_parse_from([APP_NAME, "show", "--file", "b.yaml"]).is_ok());
    }

    #[test]
    fn verbosity_flags_map_to_levels() {
        let cli = Cli::try_parse_from([APP_NAME, "-vv", "path", "x"]).unwrap();
        assert_eq!(requested_log_level(&cli.common), Some(LevelFilter::Debug));

        let cli = Cli::try_parse_from([APP_NAME, "path", "x"]).unwrap();
        assert_eq!(requested_log_level(&cli.common), None);

        let cli = Cli::try_parse_from([APP_NAME, "--trace", "path", "x"]).unwrap();
        assert_eq!(requested_log_level(&cli.common), Some(LevelFilter::Trace));
    }
}
