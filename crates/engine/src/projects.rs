//! The module contains `Project` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ProjectNew, ResultEngine,
    util::{ensure_non_negative, normalize_optional_text, normalize_required_name, parse_uuid},
};

/// Lifecycle stage of a project.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStage {
    #[default]
    Initiation,
    Planning,
    Execution,
    Monitoring,
    Closing,
    Closed,
}

impl ProjectStage {
    pub const ALL: [Self; 6] = [
        Self::Initiation,
        Self::Planning,
        Self::Execution,
        Self::Monitoring,
        Self::Closing,
        Self::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initiation => "initiation",
            Self::Planning => "planning",
            Self::Execution => "execution",
            Self::Monitoring => "monitoring",
            Self::Closing => "closing",
            Self::Closed => "closed",
        }
    }

    /// A project counts as active until it enters `closing`.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Closing | Self::Closed)
    }
}

impl TryFrom<&str> for ProjectStage {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "initiation" => Ok(Self::Initiation),
            "planning" => Ok(Self::Planning),
            "execution" => Ok(Self::Execution),
            "monitoring" => Ok(Self::Monitoring),
            "closing" => Ok(Self::Closing),
            "closed" => Ok(Self::Closed),
            other => Err(EngineError::InvalidValue(format!(
                "invalid project stage: {other}"
            ))),
        }
    }
}

/// A project.
///
/// The project carries the declared `budget` that expenses are measured
/// against. Resources, expenses and milestones reference it by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub stage: ProjectStage,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub budget: f64,
    pub manager_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Build a validated project from its creation command.
    pub fn new(cmd: ProjectNew, now: DateTime<Utc>) -> ResultEngine<Self> {
        let project = Self {
            id: Uuid::new_v4(),
            name: normalize_required_name(&cmd.name, "project name")?,
            description: normalize_optional_text(cmd.description.as_deref()),
            stage: ProjectStage::default(),
            start_date: cmd.start_date,
            end_date: cmd.end_date,
            budget: ensure_non_negative(cmd.budget, "budget")?,
            manager_id: cmd.manager_id.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        project.ensure_schedule()?;
        Ok(project)
    }

    pub(crate) fn ensure_schedule(&self) -> ResultEngine<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidValue(
                "end_date must not be before start_date".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub stage: String,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,
    pub budget: f64,
    pub manager_id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::resources::Entity")]
    Resources,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
    #[sea_orm(has_many = "super::milestones::Entity")]
    Milestones,
}

impl Related<super::resources::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resources.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::milestones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Milestones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Project> for ActiveModel {
    fn from(value: &Project) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            stage: ActiveValue::Set(value.stage.as_str().to_string()),
            start_date: ActiveValue::Set(value.start_date),
            end_date: ActiveValue::Set(value.end_date),
            budget: ActiveValue::Set(value.budget),
            manager_id: ActiveValue::Set(value.manager_id.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Project {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "project")?,
            name: model.name,
            description: model.description,
            stage: ProjectStage::try_from(model.stage.as_str())?,
            start_date: model.start_date,
            end_date: model.end_date,
            budget: model.budget,
            manager_id: model.manager_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
