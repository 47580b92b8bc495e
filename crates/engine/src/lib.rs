//! Project finance engine.
//!
//! The engine keeps two record kinds consistent: allocatable [`Resource`]s and
//! ledger [`Expense`]s. Cost-bearing resources derive an expense, edits to a
//! linked expense flow back onto its resource and deleting either side of a
//! linked pair removes both. See [`sync`] for the rules and [`Engine`] for the
//! operations.

pub use budget::{BudgetSummary, DashboardStats};
pub use commands::{
    ExpenseNew, ExpenseUpdate, MilestoneNew, ProjectNew, ProjectUpdate, ResourceNew,
    ResourceUpdate,
};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseType};
pub use milestones::Milestone;
pub use ops::{Engine, EngineBuilder, LinkedPair};
pub use projects::{Project, ProjectStage};
pub use resources::{Resource, ResourceType};

mod budget;
mod commands;
mod error;
mod expenses;
mod milestones;
mod ops;
mod projects;
mod resources;
pub mod sync;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
