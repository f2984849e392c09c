mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use pkgbind_lib::consts::PACKAGES_PATH_ENV;
use pkgbind_lib::shell::Shell;

use crate::output::{OutputFormat, print_error};

/// pkgbind - bind host interpreters as relocatable packages
#[derive(Parser)]
#[command(name = "pkgbind")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase log verbosity (-v debug, -vv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Log level when RUST_LOG is not set
  #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
  log_level: LogLevel,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
  Error,
  Warn,
  Info,
  Debug,
  Trace,
}

impl LogLevel {
  fn directive(self, verbose: u8) -> &'static str {
    match (self, verbose) {
      (_, 2..) | (LogLevel::Trace, _) => "trace",
      (_, 1) | (LogLevel::Debug, _) => "debug",
      (LogLevel::Info, _) => "info",
      (LogLevel::Warn, _) => "warn",
      (LogLevel::Error, _) => "error",
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Bind an interpreter installed on this host as a package
  Bind {
    #[command(subcommand)]
    target: BindTarget,
  },

  /// Print an activation script for an installed package
  Env {
    /// Package version directory (<install-path>/<name>/<version>)
    package_dir: PathBuf,

    /// Variant subpath (defaults to the host variant)
    #[arg(long)]
    variant: Option<PathBuf>,

    /// Shell to generate the script for (auto-detected if not specified)
    #[arg(short, long)]
    shell: Option<Shell>,

    /// Capability range as NAME=RANGE, e.g. dcc_python=1
    #[arg(short = 'c', long = "capability", value_name = "NAME=RANGE")]
    capabilities: Vec<String>,
  },

  /// Display host platform and default paths
  Info {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },
}

#[derive(Subcommand)]
enum BindTarget {
  /// Bind the host's Python
  Python {
    /// Use this executable instead of searching PATH
    #[arg(long)]
    exe: Option<PathBuf>,

    /// Accepted version range, e.g. ">=3.7, <3.13"
    #[arg(short, long)]
    range: Option<String>,

    /// Directory packages are installed under
    #[arg(long, env = PACKAGES_PATH_ENV)]
    install_path: Option<PathBuf>,

    /// Extra directory to search for the executable (repeatable)
    #[arg(long = "search-path", value_name = "DIR")]
    search_paths: Vec<PathBuf>,

    /// Replace an already installed package of the same version
    #[arg(short, long)]
    force: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level.directive(cli.verbose)));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Bind { target } => match target {
      BindTarget::Python {
        exe,
        range,
        install_path,
        search_paths,
        force,
        output,
      } => cmd::cmd_bind_python(cmd::BindArgs {
        exe,
        range,
        install_path,
        search_paths,
        force,
        output,
      }),
    },
    Commands::Env {
      package_dir,
      variant,
      shell,
      capabilities,
    } => cmd::cmd_env(&package_dir, variant, shell, &capabilities),
    Commands::Info { output } => cmd::cmd_info(output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::CommandFactory;

  #[test]
  fn cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn verbosity_raises_log_level() {
    assert_eq!(LogLevel::Warn.directive(0), "warn");
    assert_eq!(LogLevel::Warn.directive(1), "debug");
    assert_eq!(LogLevel::Error.directive(2), "trace");
    assert_eq!(LogLevel::Info.directive(0), "info");
  }
}
