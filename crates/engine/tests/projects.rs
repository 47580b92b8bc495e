use chrono::{Duration, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Engine, EngineError, ExpenseNew, ExpenseType, ExpenseUpdate, MilestoneNew, ProjectNew,
    ProjectStage, ProjectUpdate, ResourceNew, ResourceType,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn project(name: &str, budget: f64) -> ProjectNew {
    let start = Utc::now();
    ProjectNew::new(name, budget, start, start + Duration::days(30))
}

#[tokio::test]
async fn create_and_list_projects() {
    let (engine, _db) = engine_with_db().await;

    let warehouse = engine
        .create_project(
            project("Warehouse", 100_000.0)
                .description("North site")
                .manager_id("pm-1"),
        )
        .await
        .unwrap();
    let office = engine.create_project(project("Office", 5000.0)).await.unwrap();

    assert_eq!(warehouse.stage, ProjectStage::Initiation);
    assert_eq!(warehouse.description.as_deref(), Some("North site"));
    assert_eq!(engine.project(warehouse.id).await.unwrap(), warehouse);
    assert_eq!(engine.list_projects().await.unwrap(), vec![warehouse, office]);
}

#[tokio::test]
async fn project_validation() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.create_project(project("  ", 10.0)).await,
        Err(EngineError::InvalidName(_))
    ));
    assert!(matches!(
        engine.create_project(project("Road", -1.0)).await,
        Err(EngineError::InvalidAmount(_))
    ));

    let start = Utc::now();
    assert!(matches!(
        engine
            .create_project(ProjectNew::new("Road", 1.0, start, start - Duration::days(1)))
            .await,
        Err(EngineError::InvalidValue(_))
    ));
}

#[tokio::test]
async fn update_and_stage_change() {
    let (engine, _db) = engine_with_db().await;
    let created = engine.create_project(project("Warehouse", 1000.0)).await.unwrap();

    let updated = engine
        .update_project(
            created.id,
            ProjectUpdate::default().name("Warehouse B").budget(2000.0),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Warehouse B");
    assert_eq!(updated.budget, 2000.0);
    assert!(updated.updated_at >= created.updated_at);

    let staged = engine
        .set_project_stage(created.id, ProjectStage::Execution)
        .await
        .unwrap();
    assert_eq!(staged.stage, ProjectStage::Execution);
    assert_eq!(staged.name, "Warehouse B");

    assert_eq!(
        engine
            .set_project_stage(Uuid::new_v4(), ProjectStage::Closed)
            .await,
        Err(EngineError::KeyNotFound("project not exists".to_string()))
    );
}

#[tokio::test]
async fn budget_summary_counts_every_expense() {
    let (engine, _db) = engine_with_db().await;
    let project = engine.create_project(project("Warehouse", 100_000.0)).await.unwrap();

    engine
        .create_resource(
            ResourceNew::new(project.id, "Acme Consulting", ResourceType::Vendor)
                .cost_per_unit(150.0)
                .allocated_amount(40.0),
        )
        .await
        .unwrap();
    engine
        .create_expense(ExpenseNew::new(project.id, "Permits", 500.0, ExpenseType::Other))
        .await
        .unwrap();

    let summary = engine.budget_summary(project.id).await.unwrap();
    assert_eq!(summary.budget, 100_000.0);
    assert_eq!(summary.total_expenses, 6500.0);
    assert_eq!(summary.remaining, 93_500.0);
    assert!((summary.percentage_used - 6.5).abs() < 1e-9);
}

#[tokio::test]
async fn budget_follows_linked_edits_and_deletes() {
    let (engine, _db) = engine_with_db().await;
    let project = engine.create_project(project("Warehouse", 10_000.0)).await.unwrap();
    let resource = engine
        .create_resource(
            ResourceNew::new(project.id, "Crane", ResourceType::Equipment).cost_per_unit(2500.0),
        )
        .await
        .unwrap();
    let expense = engine.linked_expenses(resource.id).await.unwrap().remove(0);

    engine
        .update_expense(expense.id, ExpenseUpdate::default().amount(3000.0))
        .await
        .unwrap();
    assert_eq!(
        engine.budget_summary(project.id).await.unwrap().total_expenses,
        3000.0
    );

    engine.delete_resource(resource.id).await.unwrap();
    let summary = engine.budget_summary(project.id).await.unwrap();
    assert_eq!(summary.total_expenses, 0.0);
    assert_eq!(summary.remaining, 10_000.0);
}

#[tokio::test]
async fn zero_budget_and_unknown_project() {
    let (engine, _db) = engine_with_db().await;
    let project = engine.create_project(project("Pro bono", 0.0)).await.unwrap();
    engine
        .create_expense(ExpenseNew::new(project.id, "Coffee", 12.0, ExpenseType::Other))
        .await
        .unwrap();

    let summary = engine.budget_summary(project.id).await.unwrap();
    assert_eq!(summary.percentage_used, 0.0);
    assert_eq!(summary.remaining, -12.0);

    assert_eq!(
        engine.budget_summary(Uuid::new_v4()).await,
        Err(EngineError::KeyNotFound("project not exists".to_string()))
    );
}

#[tokio::test]
async fn milestones_lifecycle() {
    let (engine, _db) = engine_with_db().await;
    let project = engine.create_project(project("Warehouse", 1000.0)).await.unwrap();
    let now = Utc::now();

    let late = engine
        .create_milestone(MilestoneNew::new(project.id, "Permits", now + Duration::days(10)))
        .await
        .unwrap();
    let early = engine
        .create_milestone(
            MilestoneNew::new(project.id, "Survey", now + Duration::days(1))
                .description("Soil survey"),
        )
        .await
        .unwrap();

    assert_eq!(
        engine.list_milestones(project.id).await.unwrap(),
        vec![early.clone(), late.clone()]
    );

    let completed = engine.complete_milestone(early.id).await.unwrap();
    assert!(completed.completed);
    assert!(completed.completed_date.is_some());

    engine.delete_milestone(late.id).await.unwrap();
    assert_eq!(
        engine.delete_milestone(late.id).await,
        Err(EngineError::KeyNotFound("milestone not exists".to_string()))
    );
    assert_eq!(engine.list_milestones(project.id).await.unwrap(), vec![completed]);
}

#[tokio::test]
async fn milestone_requires_project() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_milestone(MilestoneNew::new(Uuid::new_v4(), "Survey", Utc::now()))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("project not exists".to_string()));
    assert!(matches!(
        engine.complete_milestone(Uuid::new_v4()).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn dashboard_stats_across_projects() {
    let (engine, _db) = engine_with_db().await;
    let now = Utc::now();

    let warehouse = engine.create_project(project("Warehouse", 1000.0)).await.unwrap();
    let office = engine.create_project(project("Office", 1000.0)).await.unwrap();
    engine
        .set_project_stage(office.id, ProjectStage::Closed)
        .await
        .unwrap();

    engine
        .create_expense(ExpenseNew::new(warehouse.id, "Permits", 200.0, ExpenseType::Other))
        .await
        .unwrap();
    engine
        .create_expense(ExpenseNew::new(office.id, "Desks", 300.0, ExpenseType::Material))
        .await
        .unwrap();

    engine
        .create_milestone(MilestoneNew::new(warehouse.id, "Survey", now - Duration::days(2)))
        .await
        .unwrap();
    let done = engine
        .create_milestone(MilestoneNew::new(warehouse.id, "Design", now - Duration::days(1)))
        .await
        .unwrap();
    engine.complete_milestone(done.id).await.unwrap();
    engine
        .create_milestone(MilestoneNew::new(office.id, "Move in", now + Duration::days(5)))
        .await
        .unwrap();

    let stats = engine.dashboard_stats().await.unwrap();
    assert_eq!(stats.total_projects, 2);
    assert_eq!(stats.active_projects, 1);
    assert_eq!(stats.total_expenses, 500.0);
    assert_eq!(stats.overdue_milestones, 1);
}
