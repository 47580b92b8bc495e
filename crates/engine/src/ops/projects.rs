use chrono::Utc;
use sea_orm::{ConnectionTrait, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Project, ProjectNew, ProjectStage, ProjectUpdate, ResultEngine, projects,
    util::normalize_optional_text,
};

use super::{Engine, with_tx};

/// Load a project or fail with `KeyNotFound`.
pub(super) async fn require_project<C: ConnectionTrait>(
    db: &C,
    project_id: Uuid,
) -> ResultEngine<Project> {
    let model = projects::Entity::find_by_id(project_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("project not exists".to_string()))?;
    Project::try_from(model)
}

impl Engine {
    pub async fn create_project(&self, cmd: ProjectNew) -> ResultEngine<Project> {
        let project = Project::new(cmd, Utc::now())?;
        projects::ActiveModel::from(&project)
            .insert(&self.database)
            .await?;
        tracing::info!(project_id = %project.id, "project created");
        Ok(project)
    }

    pub async fn project(&self, project_id: Uuid) -> ResultEngine<Project> {
        require_project(&self.database, project_id).await
    }

    /// All projects, oldest first.
    pub async fn list_projects(&self) -> ResultEngine<Vec<Project>> {
        projects::Entity::find()
            .order_by_asc(projects::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Project::try_from)
            .collect()
    }

    /// Apply the present fields of `patch` and stamp `updated_at`.
    pub async fn update_project(
        &self,
        project_id: Uuid,
        patch: ProjectUpdate,
    ) -> ResultEngine<Project> {
        let patch = patch.normalized()?;
        with_tx!(self, |db_tx| {
            let mut project = require_project(&db_tx, project_id).await?;

            if let Some(name) = patch.name {
                project.name = name;
            }
            if let Some(description) = patch.description.as_deref() {
                project.description = normalize_optional_text(Some(description));
            }
            if let Some(stage) = patch.stage {
                project.stage = stage;
            }
            if let Some(start_date) = patch.start_date {
                project.start_date = start_date;
            }
            if let Some(end_date) = patch.end_date {
                project.end_date = end_date;
            }
            if let Some(budget) = patch.budget {
                project.budget = budget;
            }
            project.ensure_schedule()?;
            project.updated_at = Utc::now();

            projects::ActiveModel::from(&project).update(&db_tx).await?;
            Ok(project)
        })
    }

    /// Move a project to another lifecycle stage.
    pub async fn set_project_stage(
        &self,
        project_id: Uuid,
        stage: ProjectStage,
    ) -> ResultEngine<Project> {
        let project = self
            .update_project(project_id, ProjectUpdate::default().stage(stage))
            .await?;
        tracing::info!(project_id = %project_id, stage = stage.as_str(), "project stage changed");
        Ok(project)
    }
}
