use sea_orm::{QueryFilter, QuerySelect, prelude::*};
use uuid::Uuid;

use crate::{BudgetSummary, ResultEngine, expenses};

use super::{Engine, projects::require_project};

impl Engine {
    /// Compare the project's budget with the sum of all its expenses.
    ///
    /// Linked and unlinked expenses count alike; resources only count through
    /// the expense they derive.
    pub async fn budget_summary(&self, project_id: Uuid) -> ResultEngine<BudgetSummary> {
        let project = require_project(&self.database, project_id).await?;
        let amounts: Vec<f64> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Amount)
            .filter(expenses::Column::ProjectId.eq(project_id.to_string()))
            .into_tuple()
            .all(&self.database)
            .await?;
        Ok(BudgetSummary::new(project.budget, amounts))
    }
}
