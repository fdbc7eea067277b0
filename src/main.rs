use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use plancraft::assign::AssignRequest;
use plancraft::config::PlanCraftConfig;
use plancraft::models::{Priority, TaskStatus};
use plancraft::workload::TieBreak;

mod cmd;

#[derive(Parser)]
#[command(name = "plancraft")]
#[command(version, about = "Task manager client with workload-balanced assignment")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to every confirmation prompt
    #[arg(long, global = true)]
    pub yes: bool,

    /// API base URL (overrides plancraft.toml)
    #[arg(long, global = true, env = "PLANCRAFT_API_URL")]
    pub api_url: Option<String>,

    /// Path to plancraft.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Tie-break for equal loads when auto-assigning: input-order or name
    #[arg(long, global = true)]
    pub tie_break: Option<TieBreak>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a session as the given user
    Login {
        #[arg(long)]
        email: String,
        /// Display name (defaults to "User")
        #[arg(long)]
        name: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List and manage teams
    Teams {
        #[command(subcommand)]
        command: Option<TeamsCommands>,
    },
    /// List, create and inspect projects
    Projects {
        #[command(subcommand)]
        command: Option<ProjectsCommands>,
    },
    /// Work with a project's tasks
    Tasks {
        #[command(subcommand)]
        command: TasksCommands,
    },
    /// Show each team member's open-task load for a project
    Workload {
        project_id: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Overview of projects, tasks and team workload
    Dashboard {
        #[command(subcommand)]
        command: Option<DashboardCommands>,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum TeamsCommands {
    List,
    Create {
        name: String,
    },
    /// Add a member to a team
    AddMember {
        team_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: String,
        /// Maximum open tasks this member should carry
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        capacity: u32,
    },
}

#[derive(Subcommand, Clone)]
pub enum ProjectsCommands {
    List,
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        team_id: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Show a project, its team and its board
    Show {
        id: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum TasksCommands {
    /// Show the kanban board of a project
    Board {
        project_id: String,
    },
    /// Create a task
    Add {
        project_id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "Low")]
        priority: Priority,
        #[arg(long, default_value = "pending")]
        status: TaskStatus,
        /// Member name (taken literally), or "Unassigned"
        #[arg(long, default_value = "Unassigned")]
        assign: AssignRequest,
        /// Assign to the least-loaded team member
        #[arg(long, conflicts_with = "assign")]
        auto: bool,
    },
    /// Move a task to another column
    Move {
        task_id: String,
        /// pending, in-progress or done
        status: TaskStatus,
        /// Project the task belongs to
        #[arg(long)]
        project: String,
    },
    /// Delete a task and show the updated board
    Delete {
        task_id: String,
        /// Project the task belongs to
        #[arg(long)]
        project: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum DashboardCommands {
    Stats,
    /// Ask the server to redistribute open tasks
    Rebalance,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default plancraft.toml file
    Init,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    plancraft::logging::init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        plancraft::ui::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = PlanCraftConfig::with_cli_args(
        cli.config_file.clone(),
        cli.api_url.clone(),
        cli.tie_break,
        cli.verbose,
    )?;
    let ctx = cmd::AppContext {
        config,
        yes: cli.yes,
    };

    match cli.command {
        Commands::Login { email, name } => cmd::cmd_login(&ctx, &email, name.as_deref()).await?,
        Commands::Logout => cmd::cmd_logout(&ctx)?,
        Commands::Whoami => cmd::cmd_whoami(&ctx)?,
        Commands::Teams { command } => cmd::cmd_teams(&ctx, command).await?,
        Commands::Projects { command } => cmd::cmd_projects(&ctx, command).await?,
        Commands::Tasks { command } => cmd::cmd_tasks(&ctx, command).await?,
        Commands::Workload { project_id, json } => {
            cmd::cmd_workload(&ctx, &project_id, json).await?
        }
        Commands::Dashboard { command } => cmd::cmd_dashboard(&ctx, command).await?,
        Commands::Config { command } => cmd::cmd_config(&ctx, command)?,
    }

    Ok(())
}
