use clap::{Parser, Subcommand};
use commit_message_validator::commands::{self, HookKind, ValidateArgs};
use commit_message_validator::core::error::{ValidatorError, print_error};
use commit_message_validator::rules::Platform;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Validate commit messages against Gerrit, GitHub and GitLab conventions
#[derive(Parser)]
#[command(name = "commit-message-validator")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,

  #[command(flatten)]
  validate: ValidateArgs,
}

#[derive(Subcommand)]
enum Commands {
  /// Validate a commit, a range of commits or a message file (default)
  #[command(visible_alias = "lint")]
  Validate(ValidateArgs),

  /// Install the validator as a git hook in the current repository
  #[command(visible_alias = "install")]
  InstallHook {
    /// Hook to install
    #[arg(long, value_enum, default_value_t = HookKind::PostCommit)]
    hook: HookKind,
  },

  /// Validate the most recent non-merge commits of a repository
  Sample {
    /// Repository to sample
    repo: PathBuf,
    /// Number of commits to sample
    #[arg(default_value_t = 10)]
    count: usize,
    /// Rule set to apply (default: config file, then detection)
    #[arg(long, value_enum)]
    platform: Option<Platform>,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Logs go to stderr so `--json` output on stdout stays parseable
fn init_tracing() {
  let filter = EnvFilter::try_from_env("COMMIT_VALIDATOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing();

  let result = match cli.command {
    None => commands::run_validate(&cli.validate),
    Some(Commands::Validate(args)) => commands::run_validate(&args),
    Some(Commands::InstallHook { hook }) => commands::run_install(hook),
    Some(Commands::Sample { repo, count, platform }) => commands::run_sample(&repo, count, platform),
  };

  if let Err(e) = result {
    handle_error(e);
  }
}

fn handle_error(err: ValidatorError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
