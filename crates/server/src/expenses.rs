//! Expense endpoints.

use api_types::expense::{
    ExpenseNew, ExpenseType, ExpenseUpdate, ExpenseView, ExpenseWithResource, LinkedPairView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    resources::{map_resource, resource_cmd},
    server::ServerState,
};

fn type_to_engine(expense_type: ExpenseType) -> engine::ExpenseType {
    match expense_type {
        ExpenseType::Resource => engine::ExpenseType::Resource,
        ExpenseType::Vendor => engine::ExpenseType::Vendor,
        ExpenseType::Equipment => engine::ExpenseType::Equipment,
        ExpenseType::Material => engine::ExpenseType::Material,
        ExpenseType::Other => engine::ExpenseType::Other,
    }
}

fn type_from_engine(expense_type: engine::ExpenseType) -> ExpenseType {
    match expense_type {
        engine::ExpenseType::Resource => ExpenseType::Resource,
        engine::ExpenseType::Vendor => ExpenseType::Vendor,
        engine::ExpenseType::Equipment => ExpenseType::Equipment,
        engine::ExpenseType::Material => ExpenseType::Material,
        engine::ExpenseType::Other => ExpenseType::Other,
    }
}

fn map_expense(expense: engine::Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        project_id: expense.project_id,
        description: expense.description,
        amount: expense.amount,
        expense_type: type_from_engine(expense.expense_type),
        resource_id: expense.resource_id,
        date: expense.date,
        created_at: expense.created_at,
        updated_at: expense.updated_at,
    }
}

fn expense_cmd(payload: ExpenseNew) -> engine::ExpenseNew {
    let cmd = engine::ExpenseNew::new(
        payload.project_id,
        payload.description,
        payload.amount,
        type_to_engine(payload.expense_type),
    );
    match payload.date {
        Some(date) => cmd.date(date),
        None => cmd,
    }
}

pub async fn expense_new(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.create_expense(expense_cmd(payload)).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn with_resource(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseWithResource>,
) -> Result<Json<LinkedPairView>, ServerError> {
    let pair = state
        .engine
        .create_expense_with_resource(
            expense_cmd(payload.expense),
            resource_cmd(payload.resource),
        )
        .await?;
    Ok(Json(LinkedPairView {
        expense: map_expense(pair.expense),
        resource: map_resource(pair.resource),
    }))
}

pub async fn list(
    State(state): State<ServerState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(project_id)
        .await?
        .into_iter()
        .map(map_expense)
        .collect();
    Ok(Json(expenses))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(expense_id).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let patch = engine::ExpenseUpdate {
        description: payload.description,
        amount: payload.amount,
        expense_type: payload.expense_type.map(type_to_engine),
        date: payload.date,
    };
    if patch == engine::ExpenseUpdate::default() {
        return Err(ServerError::Generic(
            "provide at least one field to update".to_string(),
        ));
    }

    let expense = state.engine.update_expense(expense_id, patch).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
