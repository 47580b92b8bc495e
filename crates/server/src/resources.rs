//! Resource endpoints.

use api_types::resource::{ResourceNew, ResourceType, ResourceUpdate, ResourceView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn kind_to_engine(kind: ResourceType) -> engine::ResourceType {
    match kind {
        ResourceType::TeamMember => engine::ResourceType::TeamMember,
        ResourceType::Vendor => engine::ResourceType::Vendor,
        ResourceType::Equipment => engine::ResourceType::Equipment,
        ResourceType::Material => engine::ResourceType::Material,
    }
}

fn kind_from_engine(kind: engine::ResourceType) -> ResourceType {
    match kind {
        engine::ResourceType::TeamMember => ResourceType::TeamMember,
        engine::ResourceType::Vendor => ResourceType::Vendor,
        engine::ResourceType::Equipment => ResourceType::Equipment,
        engine::ResourceType::Material => ResourceType::Material,
    }
}

pub(crate) fn map_resource(resource: engine::Resource) -> ResourceView {
    ResourceView {
        id: resource.id,
        project_id: resource.project_id,
        name: resource.name,
        kind: kind_from_engine(resource.kind),
        cost_per_unit: resource.cost_per_unit,
        allocated_amount: resource.allocated_amount,
        availability: resource.availability,
        description: resource.description,
        created_at: resource.created_at,
        updated_at: resource.updated_at,
    }
}

pub(crate) fn resource_cmd(payload: ResourceNew) -> engine::ResourceNew {
    let mut cmd = engine::ResourceNew::new(
        payload.project_id,
        payload.name,
        kind_to_engine(payload.kind),
    )
    .allocated_amount(payload.allocated_amount)
    .availability(payload.availability);
    if let Some(cost) = payload.cost_per_unit {
        cmd = cmd.cost_per_unit(cost);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    cmd
}

pub async fn resource_new(
    State(state): State<ServerState>,
    Json(payload): Json<ResourceNew>,
) -> Result<Json<ResourceView>, ServerError> {
    let resource = state.engine.create_resource(resource_cmd(payload)).await?;
    Ok(Json(map_resource(resource)))
}

pub async fn list(
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<ResourceView>>, ServerError> {
    let resources = state
        .engine
        .list_resources(project_id)
        .await?
        .into_iter()
        .map(map_resource)
        .collect();
    Ok(Json(resources))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(resource_id): Path<Uuid>,
) -> Result<Json<ResourceView>, ServerError> {
    let resource = state.engine.resource(resource_id).await?;
    Ok(Json(map_resource(resource)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(resource_id): Path<Uuid>,
    Json(payload): Json<ResourceUpdate>,
) -> Result<Json<ResourceView>, ServerError> {
    let patch = engine::ResourceUpdate {
        name: payload.name,
        kind: payload.kind.map(kind_to_engine),
        cost_per_unit: payload.cost_per_unit,
        allocated_amount: payload.allocated_amount,
        availability: payload.availability,
        description: payload.description,
    };
    if patch == engine::ResourceUpdate::default() {
        return Err(ServerError::Generic(
            "provide at least one field to update".to_string(),
        ));
    }

    let resource = state.engine.update_resource(resource_id, patch).await?;
    Ok(Json(map_resource(resource)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(resource_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_resource(resource_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
