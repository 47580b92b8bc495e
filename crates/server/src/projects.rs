//! Project endpoints.

use api_types::{
    project::{ProjectNew, ProjectStage, ProjectUpdate, ProjectView, StageQuery},
    stats::BudgetSummary,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn stage_from_engine(stage: engine::ProjectStage) -> ProjectStage {
    match stage {
        engine::ProjectStage::Initiation => ProjectStage::Initiation,
        engine::ProjectStage::Planning => ProjectStage::Planning,
        engine::ProjectStage::Execution => ProjectStage::Execution,
        engine::ProjectStage::Monitoring => ProjectStage::Monitoring,
        engine::ProjectStage::Closing => ProjectStage::Closing,
        engine::ProjectStage::Closed => ProjectStage::Closed,
    }
}

fn stage_to_engine(stage: ProjectStage) -> engine::ProjectStage {
    match stage {
        ProjectStage::Initiation => engine::ProjectStage::Initiation,
        ProjectStage::Planning => engine::ProjectStage::Planning,
        ProjectStage::Execution => engine::ProjectStage::Execution,
        ProjectStage::Monitoring => engine::ProjectStage::Monitoring,
        ProjectStage::Closing => engine::ProjectStage::Closing,
        ProjectStage::Closed => engine::ProjectStage::Closed,
    }
}

fn map_project(project: engine::Project) -> ProjectView {
    ProjectView {
        id: project.id,
        name: project.name,
        description: project.description,
        stage: stage_from_engine(project.stage),
        start_date: project.start_date,
        end_date: project.end_date,
        budget: project.budget,
        manager_id: project.manager_id,
        created_at: project.created_at,
        updated_at: project.updated_at,
    }
}

pub async fn project_new(
    State(state): State<ServerState>,
    Json(payload): Json<ProjectNew>,
) -> Result<Json<ProjectView>, ServerError> {
    let mut cmd = engine::ProjectNew::new(
        payload.name,
        payload.budget,
        payload.start_date,
        payload.end_date,
    )
    .manager_id(payload.manager_id);
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }

    let project = state.engine.create_project(cmd).await?;
    Ok(Json(map_project(project)))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<ProjectView>>, ServerError> {
    let projects = state
        .engine
        .list_projects()
        .await?
        .into_iter()
        .map(map_project)
        .collect();
    Ok(Json(projects))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectView>, ServerError> {
    let project = state.engine.project(project_id).await?;
    Ok(Json(map_project(project)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<ProjectUpdate>,
) -> Result<Json<ProjectView>, ServerError> {
    let patch = engine::ProjectUpdate {
        name: payload.name,
        description: payload.description,
        stage: payload.stage.map(stage_to_engine),
        start_date: payload.start_date,
        end_date: payload.end_date,
        budget: payload.budget,
    };
    if patch == engine::ProjectUpdate::default() {
        return Err(ServerError::Generic(
            "provide at least one field to update".to_string(),
        ));
    }

    let project = state.engine.update_project(project_id, patch).await?;
    Ok(Json(map_project(project)))
}

pub async fn set_stage(
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<StageQuery>,
) -> Result<Json<ProjectView>, ServerError> {
    let stage = engine::ProjectStage::try_from(query.stage.as_str())?;
    let project = state.engine.set_project_stage(project_id, stage).await?;
    Ok(Json(map_project(project)))
}

pub async fn budget_summary(
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<BudgetSummary>, ServerError> {
    let summary = state.engine.budget_summary(project_id).await?;
    Ok(Json(BudgetSummary {
        budget: summary.budget,
        total_expenses: summary.total_expenses,
        remaining: summary.remaining,
        percentage_used: summary.percentage_used,
    }))
}
