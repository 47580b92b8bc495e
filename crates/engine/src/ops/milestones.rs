use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, Milestone, MilestoneNew, ResultEngine, milestones};

use super::{Engine, projects::require_project, with_tx};

async fn require_milestone<C: ConnectionTrait>(
    db: &C,
    milestone_id: Uuid,
) -> ResultEngine<Milestone> {
    let model = milestones::Entity::find_by_id(milestone_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("milestone not exists".to_string()))?;
    Milestone::try_from(model)
}

impl Engine {
    pub async fn create_milestone(&self, cmd: MilestoneNew) -> ResultEngine<Milestone> {
        let milestone = Milestone::new(cmd, Utc::now())?;
        with_tx!(self, |db_tx| {
            require_project(&db_tx, milestone.project_id).await?;
            milestones::ActiveModel::from(&milestone)
                .insert(&db_tx)
                .await?;
            Ok(milestone)
        })
    }

    /// Milestones of a project, earliest due first.
    pub async fn list_milestones(&self, project_id: Uuid) -> ResultEngine<Vec<Milestone>> {
        milestones::Entity::find()
            .filter(milestones::Column::ProjectId.eq(project_id.to_string()))
            .order_by_asc(milestones::Column::DueDate)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Milestone::try_from)
            .collect()
    }

    /// Mark a milestone completed now. Completing it again moves the
    /// completion date.
    pub async fn complete_milestone(&self, milestone_id: Uuid) -> ResultEngine<Milestone> {
        with_tx!(self, |db_tx| {
            let mut milestone = require_milestone(&db_tx, milestone_id).await?;
            milestone.complete(Utc::now());
            milestones::ActiveModel::from(&milestone)
                .update(&db_tx)
                .await?;
            tracing::info!(milestone_id = %milestone_id, "milestone completed");
            Ok(milestone)
        })
    }

    pub async fn delete_milestone(&self, milestone_id: Uuid) -> ResultEngine<()> {
        let result = milestones::Entity::delete_by_id(milestone_id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("milestone not exists".to_string()));
        }
        Ok(())
    }
}
