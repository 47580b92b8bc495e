//! Milestone endpoints.

use api_types::milestone::{MilestoneNew, MilestoneView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn map_milestone(milestone: engine::Milestone) -> MilestoneView {
    MilestoneView {
        id: milestone.id,
        project_id: milestone.project_id,
        title: milestone.title,
        description: milestone.description,
        due_date: milestone.due_date,
        completed: milestone.completed,
        completed_date: milestone.completed_date,
        created_at: milestone.created_at,
    }
}

pub async fn milestone_new(
    State(state): State<ServerState>,
    Json(payload): Json<MilestoneNew>,
) -> Result<Json<MilestoneView>, ServerError> {
    let mut cmd = engine::MilestoneNew::new(payload.project_id, payload.title, payload.due_date);
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    let milestone = state.engine.create_milestone(cmd).await?;
    Ok(Json(map_milestone(milestone)))
}

pub async fn list(
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<MilestoneView>>, ServerError> {
    let milestones = state
        .engine
        .list_milestones(project_id)
        .await?
        .into_iter()
        .map(map_milestone)
        .collect();
    Ok(Json(milestones))
}

pub async fn complete(
    State(state): State<ServerState>,
    Path(milestone_id): Path<Uuid>,
) -> Result<Json<MilestoneView>, ServerError> {
    let milestone = state.engine.complete_milestone(milestone_id).await?;
    Ok(Json(map_milestone(milestone)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(milestone_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_milestone(milestone_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
