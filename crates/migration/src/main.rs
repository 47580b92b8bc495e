//! Applies or reverts the ledger schema outside the application.
//!
//! `DATABASE_URL` selects the database; the ledger file next to the
//! binary is used otherwise.

use sea_orm::{Database, DbErr};
use sea_orm_migration::prelude::*;

use migration::Migrator;

const DEFAULT_DATABASE_URL: &str = "sqlite:./projectledger.db?mode=rwc";
const USAGE: &str = "usage: migration [up | down [steps] | fresh | status]";

enum Command {
    Up,
    Down(u32),
    Fresh,
    Status,
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> Option<Self> {
        let command = match args.next().as_deref() {
            None | Some("up") => Self::Up,
            Some("down") => match args.next() {
                Some(steps) => Self::Down(steps.parse().ok()?),
                None => Self::Down(1),
            },
            Some("fresh") => Self::Fresh,
            Some("status") => Self::Status,
            Some(_) => return None,
        };
        args.next().is_none().then_some(command)
    }

    async fn run(self, db: &sea_orm::DatabaseConnection) -> Result<(), DbErr> {
        match self {
            Self::Up => Migrator::up(db, None).await,
            Self::Down(steps) => Migrator::down(db, Some(steps)).await,
            Self::Fresh => Migrator::fresh(db).await,
            Self::Status => Migrator::status(db).await,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let Some(command) = Command::parse(std::env::args().skip(1)) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = Database::connect(&url).await?;
    command.run(&db).await?;
    db.close().await?;
    Ok(())
}
