//! Beads Guard - workflow enforcement hooks and a knowledge log for
//! bead-driven Claude Code orchestration.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use beads_guard::commands::{HookInstaller, DEFAULT_HOOK_TIMEOUT};
use beads_guard::config::{ConfigLoader, GuardConfig};
use beads_guard::display;
use beads_guard::hooks::{resolve_project_dir, ErrorLog, HookContext, HookEvent, HookHandler};
use beads_guard::knowledge::{KnowledgeStore, Recall, SearchQuery, DEFAULT_RECENT};
use beads_guard::probe::SystemRunner;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HookEventArg {
    PreToolUse,
    PostToolUse,
    SubagentStop,
    SessionStart,
    UserPromptSubmit,
    PreCompact,
}

impl From<HookEventArg> for HookEvent {
    fn from(arg: HookEventArg) -> Self {
        match arg {
            HookEventArg::PreToolUse => HookEvent::PreToolUse,
            HookEventArg::PostToolUse => HookEvent::PostToolUse,
            HookEventArg::SubagentStop => HookEvent::SubagentStop,
            HookEventArg::SessionStart => HookEvent::SessionStart,
            HookEventArg::UserPromptSubmit => HookEvent::UserPromptSubmit,
            HookEventArg::PreCompact => HookEvent::PreCompact,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "beads-guard",
    about = "Workflow hooks and knowledge log for bead-driven Claude Code orchestration",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: .beads-guard.toml, then ~/.config/beads-guard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle a Claude Code hook event (reads JSON from stdin).
    Hook {
        #[arg(value_enum)]
        event: HookEventArg,
    },
    /// Search the knowledge log.
    Recall {
        /// Keyword to search for (case-insensitive).
        query: Option<String>,
        /// Only entries of this type (e.g. learned, investigation).
        #[arg(long = "type")]
        kind: Option<String>,
        /// Include archived entries.
        #[arg(long)]
        all: bool,
        /// Show the last N entries instead of searching.
        #[arg(long, num_args = 0..=1, default_missing_value = "10")]
        recent: Option<usize>,
        /// Show counts.
        #[arg(long)]
        stats: bool,
    },
    /// Register beads-guard hooks in Claude Code settings.
    InstallHooks {
        /// Settings file to edit (default: ~/.claude/settings.json).
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Hook timeout in milliseconds.
        #[arg(long, default_value_t = DEFAULT_HOOK_TIMEOUT)]
        timeout: u32,
        /// Edit <project>/.claude/settings.json instead.
        #[arg(long)]
        project: bool,
    },
    /// Remove beads-guard hooks from Claude Code settings.
    UninstallHooks {
        #[arg(long)]
        settings: Option<PathBuf>,
        #[arg(long)]
        project: bool,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load config, falling back to defaults when the file is broken.
fn load_config(explicit: Option<PathBuf>, project_dir: &Path) -> GuardConfig {
    match ConfigLoader::resolve(explicit, project_dir).load() {
        Ok(config) => config,
        Err(e) => {
            ErrorLog::for_project(project_dir).record("config", &e);
            GuardConfig::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_dir = resolve_project_dir();
    let config = load_config(cli.config, &project_dir);

    match cli.command {
        Commands::Hook { event } => {
            run_hook(event.into(), config).await;
            ExitCode::SUCCESS
        }
        Commands::Recall {
            query,
            kind,
            all,
            recent,
            stats,
        } => run_recall(&project_dir, &config, query, kind.as_deref(), all, recent, stats),
        Commands::InstallHooks {
            settings,
            timeout,
            project,
        } => match installer(settings, project, &project_dir) {
            Ok(installer) => match installer.with_timeout(timeout).install() {
                Ok(result) => {
                    println!(
                        "Installed {} hooks into {}",
                        result.installed.len(),
                        result.settings_path.display()
                    );
                    if result.replaced_existing {
                        println!("Replaced existing beads-guard hooks.");
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e),
            },
            Err(e) => fail(&e),
        },
        Commands::UninstallHooks { settings, project } => {
            match installer(settings, project, &project_dir).and_then(|i| i.uninstall()) {
                Ok(result) if result.removed.is_empty() => {
                    println!("No beads-guard hooks found in {}", result.settings_path.display());
                    ExitCode::SUCCESS
                }
                Ok(result) => {
                    let events: Vec<&str> = result.removed.iter().map(|e| e.name()).collect();
                    println!(
                        "Removed hooks for {} from {}",
                        events.join(", "),
                        result.settings_path.display()
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e),
            }
        }
    }
}

/// Run one hook invocation. Never fails: whatever happens, the hook exits 0.
async fn run_hook(event: HookEvent, config: GuardConfig) {
    let mut raw = String::new();
    if let Err(e) = tokio::io::stdin().read_to_string(&mut raw).await {
        tracing::warn!(error = %e, "Failed to read hook input");
    }

    let runner = Arc::new(SystemRunner::new(config.commands.timeout()));
    let handler = HookHandler::new(HookContext::from_env(config, runner));
    let output = handler.handle_json(event, &raw).await;

    match output.render() {
        Ok(Some(text)) => display::print(&text),
        Ok(None) => {}
        Err(e) => handler.context().errors().record(event.cli_arg(), &e),
    }
}

fn run_recall(
    project_dir: &Path,
    config: &GuardConfig,
    query: Option<String>,
    kind: Option<&str>,
    all: bool,
    recent: Option<usize>,
    stats: bool,
) -> ExitCode {
    let store = KnowledgeStore::for_project(project_dir, &config.knowledge);
    if store.is_empty() {
        display::print(&display::render_empty_store());
        return ExitCode::SUCCESS;
    }

    let recall = Recall::new(&store);
    let color = display::use_color();

    if stats {
        display::print(&display::render_stats(&recall.stats(), color));
        return ExitCode::SUCCESS;
    }
    if let Some(n) = recent {
        let n = if n == 0 { DEFAULT_RECENT } else { n };
        display::print(&display::render_recent(n, &recall.recent(n), color));
        return ExitCode::SUCCESS;
    }

    let Some(keyword) = query.filter(|q| !q.is_empty()) else {
        println!("{}", display::RECALL_USAGE);
        return ExitCode::FAILURE;
    };

    let mut search = SearchQuery::new(keyword.as_str());
    if let Some(kind) = kind {
        search = search.with_type(kind);
    }
    if all {
        search = search.with_archive();
    }
    let results = recall.search(&search);
    display::print(&display::render_search(&keyword, kind, &results, color));
    ExitCode::SUCCESS
}

fn installer(
    settings: Option<PathBuf>,
    project: bool,
    project_dir: &Path,
) -> Result<HookInstaller, beads_guard::commands::InstallError> {
    let binary = HookInstaller::current_exe()?;
    let installer = if project {
        HookInstaller::for_project(binary, project_dir)
    } else {
        HookInstaller::new(binary)?
    };
    Ok(match settings {
        Some(path) => installer.with_settings_path(path),
        None => installer,
    })
}

fn fail(error: &dyn std::error::Error) -> ExitCode {
    eprintln!("Error: {error}");
    ExitCode::FAILURE
}
