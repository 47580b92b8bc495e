//! The module contains `Milestone` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, MilestoneNew, ResultEngine,
    util::{normalize_optional_text, normalize_required_name, parse_uuid},
};

/// A dated checkpoint inside a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    pub completed_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Milestone {
    pub fn new(cmd: MilestoneNew, now: DateTime<Utc>) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            project_id: cmd.project_id,
            title: normalize_required_name(&cmd.title, "milestone title")?,
            description: normalize_optional_text(cmd.description.as_deref()),
            due_date: cmd.due_date,
            completed: false,
            completed_date: None,
            created_at: now,
        })
    }

    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.completed = true;
        self.completed_date = Some(now);
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date < now
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "milestones")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTimeUtc,
    pub completed: bool,
    pub completed_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Projects,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Milestone> for ActiveModel {
    fn from(value: &Milestone) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            project_id: ActiveValue::Set(value.project_id.to_string()),
            title: ActiveValue::Set(value.title.clone()),
            description: ActiveValue::Set(value.description.clone()),
            due_date: ActiveValue::Set(value.due_date),
            completed: ActiveValue::Set(value.completed),
            completed_date: ActiveValue::Set(value.completed_date),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Milestone {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "milestone")?,
            project_id: parse_uuid(&model.project_id, "project")?,
            title: model.title,
            description: model.description,
            due_date: model.due_date,
            completed: model.completed,
            completed_date: model.completed_date,
            created_at: model.created_at,
        })
    }
}
