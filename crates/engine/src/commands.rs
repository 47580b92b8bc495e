//! Command structs for engine operations.
//!
//! These types group parameters for create and update operations, keeping
//! call sites readable and avoiding long argument lists. Update commands are
//! partial: a `None` field means "leave it as it is", never "clear it".

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    ExpenseType, ProjectStage, ResourceType, ResultEngine,
    util::{ensure_finite, ensure_non_negative, normalize_required_name},
};

/// Create a resource.
#[derive(Clone, Debug)]
pub struct ResourceNew {
    pub project_id: Uuid,
    pub name: String,
    pub kind: ResourceType,
    pub cost_per_unit: Option<f64>,
    pub allocated_amount: f64,
    pub availability: String,
    pub description: Option<String>,
}

impl ResourceNew {
    #[must_use]
    pub fn new(project_id: Uuid, name: impl Into<String>, kind: ResourceType) -> Self {
        Self {
            project_id,
            name: name.into(),
            kind,
            cost_per_unit: None,
            allocated_amount: 0.0,
            availability: String::new(),
            description: None,
        }
    }

    #[must_use]
    pub fn cost_per_unit(mut self, cost: f64) -> Self {
        self.cost_per_unit = Some(cost);
        self
    }

    #[must_use]
    pub fn allocated_amount(mut self, amount: f64) -> Self {
        self.allocated_amount = amount;
        self
    }

    #[must_use]
    pub fn availability(mut self, availability: impl Into<String>) -> Self {
        self.availability = availability.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of a resource.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceUpdate {
    pub name: Option<String>,
    pub kind: Option<ResourceType>,
    pub cost_per_unit: Option<f64>,
    pub allocated_amount: Option<f64>,
    pub availability: Option<String>,
    pub description: Option<String>,
}

impl ResourceUpdate {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: ResourceType) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn cost_per_unit(mut self, cost: f64) -> Self {
        self.cost_per_unit = Some(cost);
        self
    }

    #[must_use]
    pub fn allocated_amount(mut self, amount: f64) -> Self {
        self.allocated_amount = Some(amount);
        self
    }

    #[must_use]
    pub fn availability(mut self, availability: impl Into<String>) -> Self {
        self.availability = Some(availability.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate the present fields and return the patch with trimmed text.
    pub(crate) fn normalized(mut self) -> ResultEngine<Self> {
        if let Some(name) = &self.name {
            self.name = Some(normalize_required_name(name, "resource name")?);
        }
        if let Some(cost) = self.cost_per_unit {
            ensure_non_negative(cost, "cost_per_unit")?;
        }
        if let Some(allocated) = self.allocated_amount {
            ensure_non_negative(allocated, "allocated_amount")?;
        }
        if let Some(availability) = &self.availability {
            self.availability = Some(availability.trim().to_string());
        }
        Ok(self)
    }
}

/// Create an expense.
///
/// There is no `resource_id` here: linking happens only through
/// `Engine::create_expense_with_resource` or derivation from a resource.
#[derive(Clone, Debug)]
pub struct ExpenseNew {
    pub project_id: Uuid,
    pub description: String,
    pub amount: f64,
    pub expense_type: ExpenseType,
    pub date: Option<DateTime<Utc>>,
}

impl ExpenseNew {
    #[must_use]
    pub fn new(
        project_id: Uuid,
        description: impl Into<String>,
        amount: f64,
        expense_type: ExpenseType,
    ) -> Self {
        Self {
            project_id,
            description: description.into(),
            amount,
            expense_type,
            date: None,
        }
    }

    #[must_use]
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// Partial update of an expense.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub expense_type: Option<ExpenseType>,
    pub date: Option<DateTime<Utc>>,
}

impl ExpenseUpdate {
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn expense_type(mut self, expense_type: ExpenseType) -> Self {
        self.expense_type = Some(expense_type);
        self
    }

    #[must_use]
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if let Some(amount) = self.amount {
            ensure_finite(amount, "amount")?;
        }
        Ok(())
    }
}

/// Create a project.
#[derive(Clone, Debug)]
pub struct ProjectNew {
    pub name: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub budget: f64,
    pub manager_id: String,
}

impl ProjectNew {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        budget: f64,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            start_date,
            end_date,
            budget,
            manager_id: String::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn manager_id(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = manager_id.into();
        self
    }
}

/// Partial update of a project.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub stage: Option<ProjectStage>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub budget: Option<f64>,
}

impl ProjectUpdate {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn stage(mut self, stage: ProjectStage) -> Self {
        self.stage = Some(stage);
        self
    }

    #[must_use]
    pub fn budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub(crate) fn normalized(mut self) -> ResultEngine<Self> {
        if let Some(name) = &self.name {
            self.name = Some(normalize_required_name(name, "project name")?);
        }
        if let Some(budget) = self.budget {
            ensure_non_negative(budget, "budget")?;
        }
        Ok(self)
    }
}

/// Create a milestone.
#[derive(Clone, Debug)]
pub struct MilestoneNew {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}

impl MilestoneNew {
    #[must_use]
    pub fn new(project_id: Uuid, title: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: None,
            due_date,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
