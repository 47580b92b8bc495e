//! Database side of the synchronization rules in [`crate::sync`].
//!
//! These helpers never open a transaction of their own: they run on the
//! handle the calling operation already holds.

use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    Expense, ExpenseUpdate, Resource, ResultEngine, expenses, resources,
    sync::{derived_expense, propagate_to_resource},
};

use super::resources::find_resource;

/// Insert the expense `resource` derives, if it derives one.
pub(super) async fn derive_expense_for<C: ConnectionTrait>(
    db: &C,
    resource: &Resource,
) -> ResultEngine<Option<Expense>> {
    let Some(expense) = derived_expense(resource, Utc::now()) else {
        return Ok(None);
    };
    expenses::ActiveModel::from(&expense).insert(db).await?;
    tracing::debug!(
        resource_id = %resource.id,
        expense_id = %expense.id,
        amount = expense.amount,
        "expense derived from resource"
    );
    Ok(Some(expense))
}

pub(super) async fn linked_expenses<C: ConnectionTrait>(
    db: &C,
    resource_id: Uuid,
) -> ResultEngine<Vec<Expense>> {
    expenses::Entity::find()
        .filter(expenses::Column::ResourceId.eq(resource_id.to_string()))
        .all(db)
        .await?
        .into_iter()
        .map(Expense::try_from)
        .collect()
}

/// Delete every expense referencing `resource_id` and return how many went.
pub(super) async fn remove_linked_expenses<C: ConnectionTrait>(
    db: &C,
    resource_id: Uuid,
) -> ResultEngine<u64> {
    let result = expenses::Entity::delete_many()
        .filter(expenses::Column::ResourceId.eq(resource_id.to_string()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Push the fields present in `changes` onto the linked resource.
///
/// A resource that no longer exists is skipped, not reported: the link is
/// advisory once one side is gone.
pub(super) async fn propagate_expense_to_resource<C: ConnectionTrait>(
    db: &C,
    resource_id: Uuid,
    changes: &ExpenseUpdate,
) -> ResultEngine<Option<Resource>> {
    let Some(mut resource) = find_resource(db, resource_id).await? else {
        tracing::debug!(resource_id = %resource_id, "linked resource gone, propagation skipped");
        return Ok(None);
    };

    let propagation = propagate_to_resource(&resource, changes);
    if propagation.is_empty() {
        return Ok(None);
    }

    propagation.apply(&mut resource, Utc::now());
    resources::ActiveModel::from(&resource).update(db).await?;
    tracing::debug!(resource_id = %resource_id, "expense changes propagated to resource");
    Ok(Some(resource))
}
