use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryFilter, QuerySelect, prelude::*};

use crate::{
    DashboardStats, ProjectStage, ResultEngine, budget::total_amount, expenses, milestones,
    projects,
};

use super::Engine;

impl Engine {
    /// Portfolio counters across every project.
    pub async fn dashboard_stats(&self) -> ResultEngine<DashboardStats> {
        let total_projects = projects::Entity::find().count(&self.database).await?;
        let active_projects = projects::Entity::find()
            .filter(
                projects::Column::Stage.is_in(
                    ProjectStage::ALL
                        .into_iter()
                        .filter(|stage| stage.is_active())
                        .map(ProjectStage::as_str),
                ),
            )
            .count(&self.database)
            .await?;

        let amounts: Vec<f64> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Amount)
            .into_tuple()
            .all(&self.database)
            .await?;

        let overdue_milestones = milestones::Entity::find()
            .filter(milestones::Column::Completed.eq(false))
            .filter(milestones::Column::DueDate.lt(Utc::now()))
            .count(&self.database)
            .await?;

        Ok(DashboardStats {
            total_projects,
            active_projects,
            total_expenses: total_amount(amounts),
            overdue_milestones,
        })
    }
}
