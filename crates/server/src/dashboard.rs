use api_types::stats::DashboardStats;
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

pub async fn stats(State(state): State<ServerState>) -> Result<Json<DashboardStats>, ServerError> {
    let stats = state.engine.dashboard_stats().await?;
    Ok(Json(DashboardStats {
        total_projects: stats.total_projects,
        active_projects: stats.active_projects,
        total_expenses: stats.total_expenses,
        overdue_milestones: stats.overdue_milestones,
    }))
}
