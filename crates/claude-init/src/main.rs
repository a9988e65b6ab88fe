//! claude-init - install the Claude Code toolkit and scaffold projects from it

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use installer_core::{
    init_globals, init_project, CliclackUi, GlobalsOptions, InstallError, Layout, ProjectOptions,
    RunOutcome,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `debug` or `installer_core=trace`
const LOG_ENV: &str = "CLAUDE_INIT_LOG";

/// Conventional exit status after SIGINT
const INTERRUPTED_EXIT: u8 = 130;

#[derive(Parser, Debug)]
#[command(name = "claude-init")]
#[command(about = "Claude Code project toolkit")]
#[command(version)]
#[command(after_help = "Examples:
  claude-init init-globals
  claude-init init-globals --from /path/to/toolkit --force
  claude-init init-project
  claude-init init-project --name myapp --collection myapp-search
  claude-init init-project --no-mcp --force")]
pub struct Args {
    /// Print diagnostic logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install global agents, templates, and rules into ~/.claude/
    InitGlobals(GlobalsArgs),
    /// Scaffold Claude Code files in the current directory
    InitProject(ProjectArgs),
}

#[derive(Parser, Debug)]
pub struct GlobalsArgs {
    /// Path to toolkit directory (auto-detected if running from it)
    #[arg(long = "from", value_name = "DIR")]
    pub from: Option<PathBuf>,

    /// Overwrite existing files without prompting (originals backed up)
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ProjectArgs {
    /// Project name (default: current directory name)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Qdrant collection name (auto-configures .mcp.json)
    #[arg(long, value_name = "NAME")]
    pub collection: Option<String>,

    /// Skip .mcp.json creation
    #[arg(long = "no-mcp")]
    pub no_mcp: bool,

    /// Overwrite existing files without prompting (originals backed up)
    #[arg(long)]
    pub force: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn run(command: Command, interrupt: Arc<AtomicBool>) -> Result<RunOutcome> {
    let layout = Layout::from_env()?;
    let mut ui = CliclackUi::with_interrupt(interrupt);

    match command {
        Command::InitGlobals(args) => {
            let opts = GlobalsOptions {
                source: args.from,
                force: args.force,
                self_binary: std::env::current_exe()
                    .context("Failed to locate the running executable")?,
                path_var: std::env::var_os("PATH"),
            };
            init_globals(&opts, &layout, &mut ui)
        }
        Command::InitProject(args) => {
            let opts = ProjectOptions {
                project_dir: std::env::current_dir()
                    .context("Failed to read the current directory")?,
                name: args.name,
                collection: args.collection,
                no_mcp: args.no_mcp,
                force: args.force,
                render_dir: None,
            };
            init_project(&opts, &layout, &mut ui)
        }
    }
}

fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // First Ctrl+C stops the run between files so scoped temp files are dropped;
    // a second one exits immediately
    let interrupt = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupt);
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        if handler_flag.swap(true, Ordering::SeqCst) {
            std::process::exit(INTERRUPTED_EXIT.into());
        }
    })
    .ok();

    let args = Args::parse();
    init_logging(args.verbose);

    let Some(command) = args.command else {
        let _ = Args::command().print_help();
        return ExitCode::FAILURE;
    };

    let result = run(command, interrupt);

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        // A user abort at the conflict prompt is not a failure
        Ok(RunOutcome::Completed(_)) | Ok(RunOutcome::Aborted) => ExitCode::SUCCESS,
        Err(err) => {
            installer_core::tui::report_error(&err);
            match err.downcast_ref::<InstallError>() {
                Some(InstallError::Interrupted) => ExitCode::from(INTERRUPTED_EXIT),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_init_project_flags() {
        let args = Args::parse_from([
            "claude-init",
            "init-project",
            "--name",
            "myapp",
            "--collection",
            "myapp-search",
            "--no-mcp",
            "--force",
        ]);
        match args.command {
            Some(Command::InitProject(p)) => {
                assert_eq!(p.name.as_deref(), Some("myapp"));
                assert_eq!(p.collection.as_deref(), Some("myapp-search"));
                assert!(p.no_mcp);
                assert!(p.force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_init_globals_flags() {
        let args = Args::parse_from(["claude-init", "-v", "init-globals", "--from", "/tk"]);
        assert!(args.verbose);
        match args.command {
            Some(Command::InitGlobals(g)) => {
                assert_eq!(g.from, Some(PathBuf::from("/tk")));
                assert!(!g.force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_is_allowed_by_parser() {
        let args = Args::parse_from(["claude-init"]);
        assert!(args.command.is_none());
    }
}
