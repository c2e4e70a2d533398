use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use crate::commands::CommandContext;
use crate::config::CliConfig;
use anyhow::Result;
use campus_access::{Action, ModuleIdentifier};

/// CLI for campus access control
#[derive(Parser, Debug)]
#[command(name = "campus", about = "Resolve and check academic access rights")]
pub struct Cli {
    /// Path to configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Academy dataset (JSON), overrides $CAMPUS_DATA
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// A module addressed by numeric id or by code
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ModuleTarget {
    /// Numeric module id
    #[arg(long)]
    pub module_id: Option<u32>,

    /// Level module code, e.g. AC31007
    #[arg(long)]
    pub code: Option<String>,
}

impl ModuleTarget {
    pub fn identifier(&self) -> Option<ModuleIdentifier> {
        match (&self.module_id, &self.code) {
            (Some(id), _) => Some(ModuleIdentifier::ById(*id)),
            (None, Some(code)) => Some(ModuleIdentifier::ByCode(code.clone())),
            (None, None) => None,
        }
    }
}

/// Resource an access check runs against
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct CheckTarget {
    #[arg(long)]
    pub module_id: Option<u32>,

    #[arg(long)]
    pub code: Option<String>,

    /// Course id
    #[arg(long)]
    pub course: Option<u32>,
}

/// Subcommands for configuration inspection
#[derive(Subcommand, Debug)]
#[command(about = "Inspect CLI configuration")]
pub enum ConfigCommands {
    /// Show current effective configuration
    Show,
}

/// Top-level commands for campus
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a user's permissions table on a module
    ResolveModule {
        #[arg(long)]
        user: u32,

        #[command(flatten)]
        target: ModuleTarget,
    },

    /// Resolve a user's permissions table on a course
    ResolveCourse {
        #[arg(long)]
        user: u32,

        #[arg(long)]
        course: u32,
    },

    /// Decide whether a user may perform an action
    Check {
        #[arg(long)]
        user: u32,

        #[command(flatten)]
        target: CheckTarget,

        /// READ, WRITE, UPDATE or DELETE
        #[arg(long)]
        action: Action,
    },

    /// Decide whether a user may submit coursework for an assignment
    CanSubmit {
        #[arg(long)]
        username: String,

        #[arg(long)]
        assignment: u32,
    },

    /// Look a role up by name
    Role { name: String },

    /// List modules visible to a user
    Modules {
        #[arg(long)]
        user: u32,
    },

    /// List courses visible to a user
    Courses {
        #[arg(long)]
        user: u32,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Write the demo academy dataset to a file
    SampleData { path: PathBuf },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CliConfig::resolve_config(cli.config, cli.data)?;

    // These two never touch the dataset
    let command = match cli.command {
        Commands::Config { command } => return commands::config::handle_config_command(&config, command),
        Commands::SampleData { path } => return commands::sample::write_sample_data(&path),
        other => other,
    };

    let ctx = CommandContext::new(&config)?;

    match command {
        Commands::ResolveModule { user, target } => {
            commands::resolve::resolve_module(&ctx, user, &target).await?;
        }
        Commands::ResolveCourse { user, course } => {
            commands::resolve::resolve_course(&ctx, user, course).await?;
        }
        Commands::Check { user, target, action } => {
            commands::check::check_access(&ctx, user, &target, action).await?;
        }
        Commands::CanSubmit { username, assignment } => {
            commands::check::can_submit(&ctx, &username, assignment).await?;
        }
        Commands::Role { name } => {
            commands::roles::show_role(&ctx, &name).await?;
        }
        Commands::Modules { user } => {
            commands::listing::list_modules(&ctx, user).await?;
        }
        Commands::Courses { user } => {
            commands::listing::list_courses(&ctx, user).await?;
        }
        Commands::Config { .. } | Commands::SampleData { .. } => {
            // handled before the dataset is loaded
        }
    }

    Ok(())
}
