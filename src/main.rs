//! Pomodoko CLI - focus timer and task list
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short rest
//! - 15 minutes of long rest after 4 pomodoros

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use pomodoko::cli::{run_phases, App, Cli, Commands, Display, PrefsCommand, TaskCommand};
use pomodoko::config::AppConfig;
use pomodoko::types::Position;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let command = match cli.command {
        Some(command) => command,
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    if let Commands::Completions { shell } = command {
        generate_completions(shell);
        return Ok(());
    }

    let config = AppConfig::resolve(cli.database);
    tracing::debug!(database = %config.database, data_dir = %config.data_dir.display(), "Configuration resolved");
    let app = App::open(&config)
        .with_context(|| format!("failed to open database {}", config.database))?;

    match command {
        Commands::Task(task) => execute_task(&app, task)?,
        Commands::Prefs(PrefsCommand::Show) => {
            Display::show_preferences(&app.preferences()?);
        }
        Commands::Prefs(PrefsCommand::Set(args)) => {
            if args.is_empty() {
                anyhow::bail!("nothing to change; pass --pomodoro, --short-rest or --long-rest");
            }
            Display::show_preferences(&app.update_preferences(&args)?);
        }
        Commands::Timer(args) => {
            let preferences = app
                .preferences()
                .context("failed to load preferences")?;
            run_phases(preferences, args.phases, tokio::signal::ctrl_c())
                .await
                .context("timer stopped unexpectedly")?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Executes a task subcommand.
fn execute_task(app: &App, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::List => Display::show_tasks(&app.tasks().snapshot()),
        TaskCommand::Add { name, x, y } => {
            let task = app.add_task(name.as_deref(), Position::new(x, y))?;
            Display::show_task_saved("added", &task);
        }
        TaskCommand::Rename { id, name } => {
            Display::show_task_saved("renamed", &app.rename_task(id, &name)?);
        }
        TaskCommand::Done { id } => {
            Display::show_task_saved("completed", &app.set_completed(id, true)?);
        }
        TaskCommand::Undone { id } => {
            Display::show_task_saved("reopened", &app.set_completed(id, false)?);
        }
        TaskCommand::Toggle { id } => {
            Display::show_task_saved("toggled", &app.toggle_task(id)?);
        }
        TaskCommand::Move { id, x, y } => {
            Display::show_task_saved("moved", &app.move_task(id, Position::new(x, y))?);
        }
        TaskCommand::Remove { id } => {
            Display::show_task_removed(&app.remove_task(id)?);
        }
    }
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
