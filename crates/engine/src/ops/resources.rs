use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, Resource, ResourceNew, ResourceUpdate, ResultEngine, resources,
    sync::needs_rederivation,
};

use super::{Engine, projects::require_project, sync, with_tx};

/// Load a resource or fail with `KeyNotFound`.
pub(super) async fn require_resource<C: ConnectionTrait>(
    db: &C,
    resource_id: Uuid,
) -> ResultEngine<Resource> {
    find_resource(db, resource_id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("resource not exists".to_string()))
}

pub(super) async fn find_resource<C: ConnectionTrait>(
    db: &C,
    resource_id: Uuid,
) -> ResultEngine<Option<Resource>> {
    resources::Entity::find_by_id(resource_id.to_string())
        .one(db)
        .await?
        .map(Resource::try_from)
        .transpose()
}

impl Engine {
    /// Create a resource and, when it is cost-bearing and priced, its derived
    /// expense.
    ///
    /// Only the resource is returned; use [`Engine::linked_expenses`] to read
    /// the derived expense.
    pub async fn create_resource(&self, cmd: ResourceNew) -> ResultEngine<Resource> {
        let resource = Resource::new(cmd, Utc::now())?;
        with_tx!(self, |db_tx| {
            require_project(&db_tx, resource.project_id).await?;
            resources::ActiveModel::from(&resource)
                .insert(&db_tx)
                .await?;
            sync::derive_expense_for(&db_tx, &resource).await?;
            tracing::info!(resource_id = %resource.id, kind = resource.kind.as_str(), "resource created");
            Ok(resource)
        })
    }

    pub async fn resource(&self, resource_id: Uuid) -> ResultEngine<Resource> {
        require_resource(&self.database, resource_id).await
    }

    /// Resources of a project, oldest first.
    pub async fn list_resources(&self, project_id: Uuid) -> ResultEngine<Vec<Resource>> {
        resources::Entity::find()
            .filter(resources::Column::ProjectId.eq(project_id.to_string()))
            .order_by_asc(resources::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Resource::try_from)
            .collect()
    }

    /// Expenses referencing a resource. At most one for resources managed
    /// exclusively through the engine.
    pub async fn linked_expenses(&self, resource_id: Uuid) -> ResultEngine<Vec<Expense>> {
        sync::linked_expenses(&self.database, resource_id).await
    }

    /// Apply the present fields of `patch`.
    ///
    /// When the update changes an input of the derived expense (price, type,
    /// name or allocation) of a resource that derives one before or after
    /// the update, the linked expense is deleted and derived again from the
    /// updated resource. Edits made directly on the old expense are
    /// discarded. Other resources keep their linked expense untouched.
    pub async fn update_resource(
        &self,
        resource_id: Uuid,
        patch: ResourceUpdate,
    ) -> ResultEngine<Resource> {
        let patch = patch.normalized()?;
        with_tx!(self, |db_tx| {
            let before = require_resource(&db_tx, resource_id).await?;
            let mut resource = before.clone();
            resource.apply(&patch, Utc::now());
            resources::ActiveModel::from(&resource)
                .update(&db_tx)
                .await?;

            if needs_rederivation(&before, &resource) {
                let removed = sync::remove_linked_expenses(&db_tx, resource_id).await?;
                let derived = sync::derive_expense_for(&db_tx, &resource).await?;
                tracing::debug!(
                    resource_id = %resource_id,
                    removed,
                    derived = derived.is_some(),
                    "resource expense re-derived"
                );
            }
            Ok(resource)
        })
    }

    /// Delete a resource together with every expense referencing it.
    pub async fn delete_resource(&self, resource_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_resource(&db_tx, resource_id).await?;
            let removed = sync::remove_linked_expenses(&db_tx, resource_id).await?;
            resources::Entity::delete_by_id(resource_id.to_string())
                .exec(&db_tx)
                .await?;
            tracing::info!(resource_id = %resource_id, expenses = removed, "resource deleted");
            Ok(())
        })
    }
}
