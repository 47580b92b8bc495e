use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use api_types::ErrorResponse;
pub use server::{router, run, run_with_listener};

mod dashboard;
mod expenses;
mod milestones;
mod projects;
mod resources;
mod server;

pub mod types {
    pub mod project {
        pub use api_types::project::{
            ProjectNew, ProjectStage, ProjectUpdate, ProjectView, StageQuery,
        };
    }

    pub mod resource {
        pub use api_types::resource::{ResourceNew, ResourceType, ResourceUpdate, ResourceView};
    }

    pub mod expense {
        pub use api_types::expense::{
            ExpenseNew, ExpenseType, ExpenseUpdate, ExpenseView, ExpenseWithResource,
            LinkedPairView,
        };
    }

    pub mod milestone {
        pub use api_types::milestone::{MilestoneNew, MilestoneView};
    }

    pub mod stats {
        pub use api_types::stats::{BudgetSummary, DashboardStats};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        err if err.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
