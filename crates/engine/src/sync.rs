//! Resource ⇄ Expense synchronization rules.
//!
//! Everything here is pure: the functions compute what has to be written and
//! the `ops` layer writes it inside the caller's database transaction.
//!
//! Two directions are covered:
//!
//! - **Derivation** (resource → expense): a `vendor`, `equipment` or
//!   `material` resource with a positive `cost_per_unit` owns exactly one
//!   expense described as `"<Type>: <name>"` whose amount is
//!   `cost_per_unit * allocated_amount` (or `cost_per_unit` alone when
//!   nothing is allocated). Team members and unpriced resources own none.
//! - **Propagation** (expense → resource): edits to a linked expense flow
//!   back onto the resource, field by field, for the fields present in the
//!   edit only.
//!
//! The description → name rule splits on the first `": "` and keeps the
//! tail. It is a textual heuristic: a description typed by hand without the
//! separator becomes the whole name.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Expense, ExpenseType, ExpenseUpdate, Resource, ResourceType};

/// Separator between the type title and the resource name in a derived
/// expense description.
pub const DESCRIPTION_SEPARATOR: &str = ": ";

impl ResourceType {
    /// Human title used as the description prefix.
    pub fn title(self) -> &'static str {
        match self {
            Self::TeamMember => "Team Member",
            Self::Vendor => "Vendor",
            Self::Equipment => "Equipment",
            Self::Material => "Material",
        }
    }

    /// Expense type a resource of this type derives, if any.
    pub fn expense_type(self) -> Option<ExpenseType> {
        match self {
            Self::Vendor => Some(ExpenseType::Vendor),
            Self::Equipment => Some(ExpenseType::Equipment),
            Self::Material => Some(ExpenseType::Material),
            Self::TeamMember => None,
        }
    }

    pub fn is_cost_bearing(self) -> bool {
        self.expense_type().is_some()
    }
}

impl ExpenseType {
    /// Partial mapping back onto a resource type.
    ///
    /// `resource` and `other` have no counterpart: callers must leave the
    /// resource type unchanged for them.
    pub fn resource_type(self) -> Option<ResourceType> {
        match self {
            Self::Vendor => Some(ResourceType::Vendor),
            Self::Equipment => Some(ResourceType::Equipment),
            Self::Material => Some(ResourceType::Material),
            Self::Resource | Self::Other => None,
        }
    }
}

/// Amount of the expense derived from a resource.
fn derived_amount(cost_per_unit: f64, allocated_amount: f64) -> f64 {
    if allocated_amount > 0.0 {
        cost_per_unit * allocated_amount
    } else {
        cost_per_unit
    }
}

/// Compute the expense a resource must own, or `None` when it must own none.
pub fn derived_expense(resource: &Resource, now: DateTime<Utc>) -> Option<Expense> {
    let expense_type = resource.kind.expense_type()?;
    let cost = resource.cost_per_unit.filter(|cost| *cost > 0.0)?;

    Some(Expense {
        id: Uuid::new_v4(),
        project_id: resource.project_id,
        description: format!(
            "{}{DESCRIPTION_SEPARATOR}{}",
            resource.kind.title(),
            resource.name
        ),
        amount: derived_amount(cost, resource.allocated_amount),
        expense_type,
        resource_id: Some(resource.id),
        date: now,
        created_at: now,
        updated_at: None,
    })
}

fn owns_derived_expense(resource: &Resource) -> bool {
    resource.kind.is_cost_bearing() && resource.cost_per_unit.is_some_and(|cost| cost > 0.0)
}

/// `true` when updating `before` into `after` changes the expense the
/// resource must own.
///
/// Resources that derive nothing on either side keep whatever expense is
/// linked to them, such as the one of a pair created together.
pub fn needs_rederivation(before: &Resource, after: &Resource) -> bool {
    if !owns_derived_expense(before) && !owns_derived_expense(after) {
        return false;
    }
    before.kind != after.kind
        || before.name != after.name
        || before.cost_per_unit != after.cost_per_unit
        || before.allocated_amount != after.allocated_amount
}

/// Resource name encoded in an expense description.
///
/// `"Material: Premium Steel"` yields `"Premium Steel"`; a description without
/// the separator (including the empty one) is taken whole.
pub fn name_from_description(description: &str) -> &str {
    match description.split_once(DESCRIPTION_SEPARATOR) {
        Some((_, name)) => name,
        None => description,
    }
}

/// Resource fields derived from an expense edit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourcePropagation {
    pub name: Option<String>,
    pub kind: Option<ResourceType>,
    pub cost_per_unit: Option<f64>,
}

impl ResourcePropagation {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.kind.is_none() && self.cost_per_unit.is_none()
    }

    /// Merge the derived fields into `resource` as one update.
    pub fn apply(&self, resource: &mut Resource, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            resource.name = name.clone();
        }
        if let Some(kind) = self.kind {
            resource.kind = kind;
        }
        if let Some(cost) = self.cost_per_unit {
            resource.cost_per_unit = Some(cost);
        }
        resource.updated_at = Some(now);
    }
}

/// Compute how an expense edit maps onto its linked resource.
///
/// Only fields present in `changes` produce a change; the expense `date` has
/// no resource counterpart.
pub fn propagate_to_resource(resource: &Resource, changes: &ExpenseUpdate) -> ResourcePropagation {
    ResourcePropagation {
        name: changes
            .description
            .as_deref()
            .map(|description| name_from_description(description).to_string()),
        kind: changes.expense_type.and_then(ExpenseType::resource_type),
        cost_per_unit: changes.amount.map(|amount| {
            if resource.allocated_amount > 0.0 {
                amount / resource.allocated_amount
            } else {
                amount
            }
        }),
    }
}
