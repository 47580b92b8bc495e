//! The module contains `Expense` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ExpenseNew, ExpenseUpdate, ResultEngine,
    util::{ensure_finite, parse_uuid},
};

/// Ledger category of an expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseType {
    Resource,
    Vendor,
    Equipment,
    Material,
    Other,
}

impl ExpenseType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::Vendor => "vendor",
            Self::Equipment => "equipment",
            Self::Material => "material",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for ExpenseType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "resource" => Ok(Self::Resource),
            "vendor" => Ok(Self::Vendor),
            "equipment" => Ok(Self::Equipment),
            "material" => Ok(Self::Material),
            "other" => Ok(Self::Other),
            other => Err(EngineError::InvalidValue(format!(
                "invalid expense type: {other}"
            ))),
        }
    }
}

/// A ledger entry recording money spent on a project.
///
/// `resource_id` is a weak back-reference to the resource that generated the
/// expense. It is only ever set by the engine, never chosen by the caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub project_id: Uuid,
    pub description: String,
    pub amount: f64,
    pub expense_type: ExpenseType,
    pub resource_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Expense {
    /// Build a validated, unlinked expense. A missing `date` defaults to `now`.
    pub fn new(cmd: ExpenseNew, now: DateTime<Utc>) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            project_id: cmd.project_id,
            description: cmd.description,
            amount: ensure_finite(cmd.amount, "amount")?,
            expense_type: cmd.expense_type,
            resource_id: None,
            date: cmd.date.unwrap_or(now),
            created_at: now,
            updated_at: None,
        })
    }

    /// `true` when the expense was generated by (or created together with) a
    /// resource.
    pub fn is_linked(&self) -> bool {
        self.resource_id.is_some()
    }

    /// Apply the present fields of `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: &ExpenseUpdate, now: DateTime<Utc>) {
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(expense_type) = patch.expense_type {
            self.expense_type = expense_type;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        self.updated_at = Some(now);
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: String,
    pub description: String,
    pub amount: f64,
    pub expense_type: String,
    /// Not a foreign key: the link is advisory once either side is gone.
    pub resource_id: Option<String>,
    pub date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Projects,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(value: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            project_id: ActiveValue::Set(value.project_id.to_string()),
            description: ActiveValue::Set(value.description.clone()),
            amount: ActiveValue::Set(value.amount),
            expense_type: ActiveValue::Set(value.expense_type.as_str().to_string()),
            resource_id: ActiveValue::Set(value.resource_id.map(|id| id.to_string())),
            date: ActiveValue::Set(value.date),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            project_id: parse_uuid(&model.project_id, "project")?,
            description: model.description,
            amount: model.amount,
            expense_type: ExpenseType::try_from(model.expense_type.as_str())?,
            resource_id: model
                .resource_id
                .filter(|id| !id.is_empty())
                .map(|id| parse_uuid(&id, "resource"))
                .transpose()?,
            date: model.date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
