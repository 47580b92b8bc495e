use sea_orm::DatabaseConnection;

use crate::{Expense, Resource, ResultEngine};

mod budget;
mod dashboard;
mod expenses;
mod milestones;
mod projects;
mod resources;
mod sync;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// Every operation touching a linked resource/expense pair goes through this,
/// so readers never observe half of a derivation, propagation or cascade.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// A resource and the expense linked to it, created together.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkedPair {
    pub expense: Expense,
    pub resource: Resource,
}

/// Entry point for every project finance operation.
///
/// The engine does not own the database lifecycle: the connection is opened
/// by the caller, handed over through [`EngineBuilder::database`] and closed
/// by the caller once the engine is dropped.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
