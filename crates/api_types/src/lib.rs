use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod project {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ProjectStage {
        Initiation,
        Planning,
        Execution,
        Monitoring,
        Closing,
        Closed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectNew {
        pub name: String,
        pub description: Option<String>,
        pub start_date: DateTime<Utc>,
        pub end_date: DateTime<Utc>,
        pub budget: f64,
        #[serde(default)]
        pub manager_id: String,
    }

    /// Partial update: absent fields are left as they are.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProjectUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub stage: Option<ProjectStage>,
        pub start_date: Option<DateTime<Utc>>,
        pub end_date: Option<DateTime<Utc>>,
        pub budget: Option<f64>,
    }

    /// Query string of `PUT /projects/{id}/stage`.
    ///
    /// Kept as text: the stage is parsed by the engine, which names the
    /// rejected value.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct StageQuery {
        pub stage: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectView {
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
}

pub mod resource {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ResourceType {
        TeamMember,
        Vendor,
        Equipment,
        Material,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResourceNew {
        pub project_id: Uuid,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: ResourceType,
        pub cost_per_unit: Option<f64>,
        #[serde(default)]
        pub allocated_amount: f64,
        #[serde(default)]
        pub availability: String,
        pub description: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ResourceUpdate {
        pub name: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<ResourceType>,
        pub cost_per_unit: Option<f64>,
        pub allocated_amount: Option<f64>,
        pub availability: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResourceView {
        pub id: Uuid,
        pub project_id: Uuid,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: ResourceType,
        pub cost_per_unit: Option<f64>,
        pub allocated_amount: f64,
        pub availability: String,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: Option<DateTime<Utc>>,
    }
}

pub mod expense {
    use super::{resource::ResourceNew, resource::ResourceView, *};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ExpenseType {
        Resource,
        Vendor,
        Equipment,
        Material,
        Other,
    }

    /// A manual expense. It can never name a resource: links are created by
    /// the server only.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub project_id: Uuid,
        pub description: String,
        pub amount: f64,
        pub expense_type: ExpenseType,
        /// Defaults to the creation time.
        pub date: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub description: Option<String>,
        pub amount: Option<f64>,
        pub expense_type: Option<ExpenseType>,
        pub date: Option<DateTime<Utc>>,
    }

    /// Body of `POST /expenses/with-resource`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseWithResource {
        pub expense: ExpenseNew,
        pub resource: ResourceNew,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LinkedPairView {
        pub expense: ExpenseView,
        pub resource: ResourceView,
    }
}

pub mod milestone {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MilestoneNew {
        pub project_id: Uuid,
        pub title: String,
        pub description: Option<String>,
        pub due_date: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MilestoneView {
        pub id: Uuid,
        pub project_id: Uuid,
        pub title: String,
        pub description: Option<String>,
        pub due_date: DateTime<Utc>,
        pub completed: bool,
        pub completed_date: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSummary {
        pub budget: f64,
        pub total_expenses: f64,
        pub remaining: f64,
        pub percentage_used: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardStats {
        pub total_projects: u64,
        pub active_projects: u64,
        pub total_expenses: f64,
        pub overdue_milestones: u64,
    }
}
