use std::error::Error;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use engine::{Engine, ProjectNew, ProjectStage};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "projectledger_admin")]
#[command(about = "Admin utilities for ProjectLedger (bootstrap projects, inspect budgets)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./projectledger.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Project(Project),
}

#[derive(Args, Debug)]
struct Project {
    #[command(subcommand)]
    command: ProjectCommand,
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    Create(ProjectCreateArgs),
    List,
    /// Print the budget summary of a project.
    Budget(ProjectBudgetArgs),
    /// Move a project to another stage.
    Stage(ProjectStageArgs),
}

#[derive(Args, Debug)]
struct ProjectCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    budget: f64,
    /// First day, `YYYY-MM-DD`.
    #[arg(long, value_parser = parse_day)]
    start: DateTime<Utc>,
    /// Last day, `YYYY-MM-DD`.
    #[arg(long, value_parser = parse_day)]
    end: DateTime<Utc>,
    #[arg(long)]
    manager: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct ProjectBudgetArgs {
    #[arg(long)]
    id: Uuid,
}

#[derive(Args, Debug)]
struct ProjectStageArgs {
    #[arg(long)]
    id: Uuid,
    #[arg(long)]
    stage: String,
}

fn parse_day(raw: &str) -> Result<DateTime<Utc>, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db.clone()).build().await?;

    let Command::Project(Project { command }) = cli.command;
    match command {
        ProjectCommand::Create(args) => {
            let mut cmd = ProjectNew::new(&args.name, args.budget, args.start, args.end);
            if let Some(manager) = args.manager {
                cmd = cmd.manager_id(manager);
            }
            if let Some(description) = args.description {
                cmd = cmd.description(description);
            }
            let project = engine.create_project(cmd).await?;
            println!("created project: {} ({})", project.name, project.id);
        }
        ProjectCommand::List => {
            for project in engine.list_projects().await? {
                println!(
                    "{}\t{}\t{}\t{:.2}",
                    project.id,
                    project.stage.as_str(),
                    project.name,
                    project.budget
                );
            }
        }
        ProjectCommand::Budget(args) => {
            let summary = engine.budget_summary(args.id).await?;
            println!("budget:    {:.2}", summary.budget);
            println!("spent:     {:.2}", summary.total_expenses);
            println!("remaining: {:.2}", summary.remaining);
            println!("used:      {:.1}%", summary.percentage_used);
        }
        ProjectCommand::Stage(args) => {
            let stage = match ProjectStage::try_from(args.stage.as_str()) {
                Ok(stage) => stage,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            let project = engine.set_project_stage(args.id, stage).await?;
            println!("project {} is now {}", project.id, project.stage.as_str());
        }
    }

    drop(engine);
    db.close().await?;
    Ok(())
}
