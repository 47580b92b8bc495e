use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseNew, ExpenseUpdate, Resource, ResourceNew, ResultEngine,
    expenses, resources,
};

use super::{Engine, LinkedPair, projects::require_project, resources::find_resource, sync, with_tx};

/// Load an expense or fail with `KeyNotFound`.
pub(super) async fn require_expense<C: ConnectionTrait>(
    db: &C,
    expense_id: Uuid,
) -> ResultEngine<Expense> {
    let model = expenses::Entity::find_by_id(expense_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
    Expense::try_from(model)
}

impl Engine {
    /// Record an unlinked expense. A missing date defaults to now.
    ///
    /// This never creates a resource.
    pub async fn create_expense(&self, cmd: ExpenseNew) -> ResultEngine<Expense> {
        let expense = Expense::new(cmd, Utc::now())?;
        with_tx!(self, |db_tx| {
            require_project(&db_tx, expense.project_id).await?;
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            Ok(expense)
        })
    }

    /// Create a resource and an expense already linked to it.
    ///
    /// The supplied expense is authoritative: no expense is derived from the
    /// resource, so the pair never carries a duplicate.
    pub async fn create_expense_with_resource(
        &self,
        expense: ExpenseNew,
        resource: ResourceNew,
    ) -> ResultEngine<LinkedPair> {
        if expense.project_id != resource.project_id {
            return Err(EngineError::InvalidValue(
                "expense and resource must belong to the same project".to_string(),
            ));
        }
        let now = Utc::now();
        let resource = Resource::new(resource, now)?;
        let mut expense = Expense::new(expense, now)?;
        expense.resource_id = Some(resource.id);

        with_tx!(self, |db_tx| {
            require_project(&db_tx, resource.project_id).await?;
            resources::ActiveModel::from(&resource)
                .insert(&db_tx)
                .await?;
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            tracing::info!(
                resource_id = %resource.id,
                expense_id = %expense.id,
                "linked expense and resource created"
            );
            Ok(LinkedPair { expense, resource })
        })
    }

    pub async fn expense(&self, expense_id: Uuid) -> ResultEngine<Expense> {
        require_expense(&self.database, expense_id).await
    }

    /// Expenses of a project, ordered by date.
    pub async fn list_expenses(&self, project_id: Uuid) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .filter(expenses::Column::ProjectId.eq(project_id.to_string()))
            .order_by_asc(expenses::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    /// Apply the present fields of `patch`.
    ///
    /// On a linked expense the same fields are propagated to the resource:
    /// the description renames it, a translatable type retypes it and the
    /// amount re-prices it over its allocation. Absent fields leave the
    /// resource untouched.
    pub async fn update_expense(
        &self,
        expense_id: Uuid,
        patch: ExpenseUpdate,
    ) -> ResultEngine<Expense> {
        patch.validate()?;
        with_tx!(self, |db_tx| {
            let mut expense = require_expense(&db_tx, expense_id).await?;
            if expense.is_linked() && patch.amount.is_some_and(|amount| amount < 0.0) {
                return Err(EngineError::InvalidAmount(
                    "amount of a resource expense must be >= 0".to_string(),
                ));
            }

            expense.apply(&patch, Utc::now());
            expenses::ActiveModel::from(&expense).update(&db_tx).await?;

            if let Some(resource_id) = expense.resource_id {
                sync::propagate_expense_to_resource(&db_tx, resource_id, &patch).await?;
            }
            Ok(expense)
        })
    }

    /// Delete an expense.
    ///
    /// Deleting a linked expense deletes its resource and, with it, every
    /// expense referencing that resource. When the resource is already gone
    /// only this expense is removed.
    pub async fn delete_expense(&self, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let expense = require_expense(&db_tx, expense_id).await?;

            let linked_resource = match expense.resource_id {
                Some(resource_id) => find_resource(&db_tx, resource_id).await?,
                None => None,
            };

            match linked_resource {
                Some(resource) => {
                    let removed = sync::remove_linked_expenses(&db_tx, resource.id).await?;
                    resources::Entity::delete_by_id(resource.id.to_string())
                        .exec(&db_tx)
                        .await?;
                    tracing::info!(
                        expense_id = %expense_id,
                        resource_id = %resource.id,
                        expenses = removed,
                        "linked expense deleted with its resource"
                    );
                }
                None => {
                    expenses::Entity::delete_by_id(expense_id.to_string())
                        .exec(&db_tx)
                        .await?;
                    tracing::info!(expense_id = %expense_id, "expense deleted");
                }
            }
            Ok(())
        })
    }
}
