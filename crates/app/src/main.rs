use clap::Parser;
use migration::{Migrator, MigratorTrait};

mod settings;

#[derive(Parser, Debug)]
#[command(name = "projectledger")]
#[command(about = "Project finance server: resources, expenses and budgets")]
struct Cli {
    /// Settings file, without extension.
    #[arg(long, env = "PROJECTLEDGER_SETTINGS", default_value = "settings")]
    settings: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.settings)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "projectledger={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect_database(&settings.database).await?;

    match settings.server {
        Some(server) => {
            tracing::info!("Found server settings...");
            let engine = engine::Engine::builder()
                .database(db.clone())
                .build()
                .await?;
            let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
            if let Err(err) = server::run(engine, &bind, server.port).await {
                tracing::error!("server failed: {err}");
            }
        }
        None => tracing::info!("No server settings, database migrated"),
    }

    db.close().await?;
    Ok(())
}

async fn connect_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
