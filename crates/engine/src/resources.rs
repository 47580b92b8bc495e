//! The module contains `Resource` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResourceNew, ResourceUpdate, ResultEngine,
    util::{ensure_non_negative, normalize_optional_text, normalize_required_name, parse_uuid},
};

/// What a resource represents inside a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    TeamMember,
    Vendor,
    Equipment,
    Material,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TeamMember => "team_member",
            Self::Vendor => "vendor",
            Self::Equipment => "equipment",
            Self::Material => "material",
        }
    }
}

impl TryFrom<&str> for ResourceType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "team_member" => Ok(Self::TeamMember),
            "vendor" => Ok(Self::Vendor),
            "equipment" => Ok(Self::Equipment),
            "material" => Ok(Self::Material),
            other => Err(EngineError::InvalidValue(format!(
                "invalid resource type: {other}"
            ))),
        }
    }
}

/// An allocatable project asset: a person, a vendor, a piece of equipment
/// or a material.
///
/// Cost-bearing resources own at most one derived [`Expense`]. The link lives
/// on the expense side (`Expense::resource_id`) and is discovered by query.
///
/// [`Expense`]: crate::Expense
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub kind: ResourceType,
    pub cost_per_unit: Option<f64>,
    pub allocated_amount: f64,
    pub availability: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource {
    /// Build a validated resource from its creation command.
    pub fn new(cmd: ResourceNew, now: DateTime<Utc>) -> ResultEngine<Self> {
        let cost_per_unit = cmd
            .cost_per_unit
            .map(|cost| ensure_non_negative(cost, "cost_per_unit"))
            .transpose()?;
        Ok(Self {
            id: Uuid::new_v4(),
            project_id: cmd.project_id,
            name: normalize_required_name(&cmd.name, "resource name")?,
            kind: cmd.kind,
            cost_per_unit,
            allocated_amount: ensure_non_negative(cmd.allocated_amount, "allocated_amount")?,
            availability: cmd.availability.trim().to_string(),
            description: normalize_optional_text(cmd.description.as_deref()),
            created_at: now,
            updated_at: None,
        })
    }

    /// Apply the present fields of `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: &ResourceUpdate, now: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(cost) = patch.cost_per_unit {
            self.cost_per_unit = Some(cost);
        }
        if let Some(allocated) = patch.allocated_amount {
            self.allocated_amount = allocated;
        }
        if let Some(availability) = &patch.availability {
            self.availability = availability.clone();
        }
        if let Some(description) = &patch.description {
            self.description = normalize_optional_text(Some(description));
        }
        self.updated_at = Some(now);
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub kind: String,
    pub cost_per_unit: Option<f64>,
    pub allocated_amount: f64,
    pub availability: String,
    pub description: Option<String>,
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

impl From<&Resource> for ActiveModel {
    fn from(value: &Resource) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            project_id: ActiveValue::Set(value.project_id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            cost_per_unit: ActiveValue::Set(value.cost_per_unit),
            allocated_amount: ActiveValue::Set(value.allocated_amount),
            availability: ActiveValue::Set(value.availability.clone()),
            description: ActiveValue::Set(value.description.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Resource {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "resource")?,
            project_id: parse_uuid(&model.project_id, "project")?,
            name: model.name,
            kind: ResourceType::try_from(model.kind.as_str())?,
            cost_per_unit: model.cost_per_unit,
            allocated_amount: model.allocated_amount,
            availability: model.availability,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
