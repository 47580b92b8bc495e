use chrono::{Duration, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Engine, EngineError, ExpenseNew, ExpenseType, ExpenseUpdate, ProjectNew, ResourceNew,
    ResourceType, ResourceUpdate,
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

async fn new_project(engine: &Engine) -> Uuid {
    let start = Utc::now();
    engine
        .create_project(ProjectNew::new(
            "Warehouse",
            100_000.0,
            start,
            start + Duration::days(90),
        ))
        .await
        .unwrap()
        .id
}

fn acme(project_id: Uuid) -> ResourceNew {
    ResourceNew::new(project_id, "Acme Consulting", ResourceType::Vendor)
        .cost_per_unit(150.0)
        .allocated_amount(40.0)
        .availability("On-demand")
}

#[tokio::test]
async fn vendor_resource_derives_one_expense() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;

    let resource = engine.create_resource(acme(project_id)).await.unwrap();

    let linked = engine.linked_expenses(resource.id).await.unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].amount, 6000.0);
    assert_eq!(linked[0].expense_type, ExpenseType::Vendor);
    assert_eq!(linked[0].description, "Vendor: Acme Consulting");
    assert_eq!(linked[0].project_id, project_id);

    let expenses = engine.list_expenses(project_id).await.unwrap();
    assert_eq!(expenses, linked);
}

#[tokio::test]
async fn team_member_and_unpriced_resources_derive_nothing() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;

    let engineer = engine
        .create_resource(
            ResourceNew::new(project_id, "Dana", ResourceType::TeamMember)
                .cost_per_unit(90.0)
                .allocated_amount(160.0),
        )
        .await
        .unwrap();
    let steel = engine
        .create_resource(ResourceNew::new(project_id, "Steel", ResourceType::Material))
        .await
        .unwrap();
    let free = engine
        .create_resource(
            ResourceNew::new(project_id, "Loaner crane", ResourceType::Equipment)
                .cost_per_unit(0.0),
        )
        .await
        .unwrap();

    for id in [engineer.id, steel.id, free.id] {
        assert!(engine.linked_expenses(id).await.unwrap().is_empty());
    }
    assert!(engine.list_expenses(project_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn resource_for_unknown_project_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.create_resource(acme(Uuid::new_v4())).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("project not exists".to_string()));
}

#[tokio::test]
async fn repricing_resource_replaces_its_expense() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();
    let before = engine.linked_expenses(resource.id).await.unwrap();

    let updated = engine
        .update_resource(resource.id, ResourceUpdate::default().cost_per_unit(200.0))
        .await
        .unwrap();
    assert_eq!(updated.cost_per_unit, Some(200.0));
    assert!(updated.updated_at.is_some());

    let after = engine.linked_expenses(resource.id).await.unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].amount, 8000.0);
    assert_ne!(after[0].id, before[0].id);
}

#[tokio::test]
async fn renaming_or_retyping_resource_rewrites_description() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();

    engine
        .update_resource(
            resource.id,
            ResourceUpdate::default()
                .name("Acme Rentals")
                .kind(ResourceType::Equipment),
        )
        .await
        .unwrap();

    let linked = engine.linked_expenses(resource.id).await.unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].description, "Equipment: Acme Rentals");
    assert_eq!(linked[0].expense_type, ExpenseType::Equipment);
}

#[tokio::test]
async fn retyping_to_team_member_drops_the_expense() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();

    engine
        .update_resource(
            resource.id,
            ResourceUpdate::default().kind(ResourceType::TeamMember),
        )
        .await
        .unwrap();

    assert!(engine.linked_expenses(resource.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn availability_edit_keeps_the_expense() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();
    let before = engine.linked_expenses(resource.id).await.unwrap();

    engine
        .update_resource(
            resource.id,
            ResourceUpdate::default().availability("Weekdays"),
        )
        .await
        .unwrap();

    assert_eq!(engine.linked_expenses(resource.id).await.unwrap(), before);
}

#[tokio::test]
async fn deleting_resource_deletes_its_expenses() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();
    let manual = engine
        .create_expense(ExpenseNew::new(
            project_id,
            "Permits",
            250.0,
            ExpenseType::Other,
        ))
        .await
        .unwrap();

    engine.delete_resource(resource.id).await.unwrap();

    assert_eq!(
        engine.resource(resource.id).await,
        Err(EngineError::KeyNotFound("resource not exists".to_string()))
    );
    let left = engine.list_expenses(project_id).await.unwrap();
    assert_eq!(left, vec![manual]);
}

#[tokio::test]
async fn deleting_missing_resource_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    assert_eq!(
        engine.delete_resource(Uuid::new_v4()).await,
        Err(EngineError::KeyNotFound("resource not exists".to_string()))
    );
}

#[tokio::test]
async fn amount_edit_reprices_resource_over_allocation() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine
        .create_resource(
            ResourceNew::new(project_id, "Laptop", ResourceType::Equipment)
                .cost_per_unit(1200.0)
                .allocated_amount(3.0),
        )
        .await
        .unwrap();
    let expense = engine.linked_expenses(resource.id).await.unwrap().remove(0);
    assert_eq!(expense.amount, 3600.0);

    let updated = engine
        .update_expense(expense.id, ExpenseUpdate::default().amount(4500.0))
        .await
        .unwrap();
    assert_eq!(updated.amount, 4500.0);
    assert_eq!(updated.resource_id, Some(resource.id));

    let resource = engine.resource(resource.id).await.unwrap();
    assert_eq!(resource.cost_per_unit, Some(1500.0));
    assert_eq!(resource.allocated_amount, 3.0);
    assert_eq!(resource.name, "Laptop");
    assert_eq!(resource.kind, ResourceType::Equipment);
    assert!(resource.updated_at.is_some());
}

#[tokio::test]
async fn description_edit_renames_resource() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine
        .create_resource(
            ResourceNew::new(project_id, "Steel", ResourceType::Material).cost_per_unit(12.5),
        )
        .await
        .unwrap();
    let expense = engine.linked_expenses(resource.id).await.unwrap().remove(0);
    assert_eq!(expense.amount, 12.5);

    engine
        .update_expense(
            expense.id,
            ExpenseUpdate::default().description("Material: Premium Steel"),
        )
        .await
        .unwrap();
    assert_eq!(engine.resource(resource.id).await.unwrap().name, "Premium Steel");

    engine
        .update_expense(expense.id, ExpenseUpdate::default().description("Rebar"))
        .await
        .unwrap();
    assert_eq!(engine.resource(resource.id).await.unwrap().name, "Rebar");
}

#[tokio::test]
async fn untranslatable_type_leaves_resource_type_alone() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();
    let expense = engine.linked_expenses(resource.id).await.unwrap().remove(0);

    engine
        .update_expense(
            expense.id,
            ExpenseUpdate::default().expense_type(ExpenseType::Other),
        )
        .await
        .unwrap();
    assert_eq!(
        engine.resource(resource.id).await.unwrap().kind,
        ResourceType::Vendor
    );

    engine
        .update_expense(
            expense.id,
            ExpenseUpdate::default().expense_type(ExpenseType::Material),
        )
        .await
        .unwrap();
    assert_eq!(
        engine.resource(resource.id).await.unwrap().kind,
        ResourceType::Material
    );
}

#[tokio::test]
async fn date_only_edit_does_not_touch_resource() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();
    let expense = engine.linked_expenses(resource.id).await.unwrap().remove(0);

    let date = Utc::now() - Duration::days(2);
    let updated = engine
        .update_expense(expense.id, ExpenseUpdate::default().date(date))
        .await
        .unwrap();
    assert_eq!(updated.date, date);

    assert_eq!(engine.resource(resource.id).await.unwrap(), resource);
}

#[tokio::test]
async fn negative_amount_on_linked_expense_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();
    let expense = engine.linked_expenses(resource.id).await.unwrap().remove(0);

    let err = engine
        .update_expense(expense.id, ExpenseUpdate::default().amount(-10.0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert_eq!(engine.expense(expense.id).await.unwrap(), expense);
}

#[tokio::test]
async fn unlinked_expense_update_has_no_side_effects() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();
    let manual = engine
        .create_expense(ExpenseNew::new(
            project_id,
            "Permits",
            250.0,
            ExpenseType::Other,
        ))
        .await
        .unwrap();
    assert!(!manual.is_linked());

    let updated = engine
        .update_expense(
            manual.id,
            ExpenseUpdate::default().description("Vendor: Acme Consulting").amount(-5.0),
        )
        .await
        .unwrap();
    assert_eq!(updated.amount, -5.0);
    assert_eq!(engine.resource(resource.id).await.unwrap(), resource);
}

#[tokio::test]
async fn update_of_missing_expense_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    assert_eq!(
        engine
            .update_expense(Uuid::new_v4(), ExpenseUpdate::default().amount(1.0))
            .await,
        Err(EngineError::KeyNotFound("expense not exists".to_string()))
    );
}

#[tokio::test]
async fn deleting_linked_expense_deletes_resource() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();
    let expense = engine.linked_expenses(resource.id).await.unwrap().remove(0);

    engine.delete_expense(expense.id).await.unwrap();

    assert!(matches!(
        engine.resource(resource.id).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(engine.list_expenses(project_id).await.unwrap().is_empty());
    assert!(engine.list_resources(project_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_linked_expense_removes_sibling_expenses() {
    let (engine, db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();
    let expense = engine.linked_expenses(resource.id).await.unwrap().remove(0);

    // A second expense pointing at the same resource, written outside the engine.
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO expenses (id, project_id, description, amount, expense_type, resource_id, date, created_at) \
         SELECT ?, project_id, description, amount, expense_type, resource_id, date, created_at \
         FROM expenses WHERE id = ?",
        vec![Uuid::new_v4().to_string().into(), expense.id.to_string().into()],
    ))
    .await
    .unwrap();
    assert_eq!(engine.linked_expenses(resource.id).await.unwrap().len(), 2);

    engine.delete_expense(expense.id).await.unwrap();

    assert!(engine.linked_expenses(resource.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn expense_with_vanished_resource_is_deleted_alone() {
    let (engine, db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();
    let expense = engine.linked_expenses(resource.id).await.unwrap().remove(0);

    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "DELETE FROM resources WHERE id = ?",
        vec![resource.id.to_string().into()],
    ))
    .await
    .unwrap();

    // Propagation towards a missing resource is skipped.
    let updated = engine
        .update_expense(expense.id, ExpenseUpdate::default().amount(10.0))
        .await
        .unwrap();
    assert_eq!(updated.amount, 10.0);

    engine.delete_expense(expense.id).await.unwrap();
    assert!(engine.list_expenses(project_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_unlinked_expense_leaves_resources() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();
    let manual = engine
        .create_expense(ExpenseNew::new(
            project_id,
            "Permits",
            250.0,
            ExpenseType::Other,
        ))
        .await
        .unwrap();

    engine.delete_expense(manual.id).await.unwrap();

    assert_eq!(engine.resource(resource.id).await.unwrap(), resource);
    assert_eq!(engine.linked_expenses(resource.id).await.unwrap().len(), 1);
    assert_eq!(
        engine.delete_expense(manual.id).await,
        Err(EngineError::KeyNotFound("expense not exists".to_string()))
    );
}

#[tokio::test]
async fn expense_with_resource_creates_one_linked_pair() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;

    let pair = engine
        .create_expense_with_resource(
            ExpenseNew::new(project_id, "Vendor: Acme", 900.0, ExpenseType::Vendor),
            ResourceNew::new(project_id, "Acme", ResourceType::Vendor)
                .cost_per_unit(300.0)
                .allocated_amount(3.0),
        )
        .await
        .unwrap();

    assert_eq!(pair.expense.resource_id, Some(pair.resource.id));
    let linked = engine.linked_expenses(pair.resource.id).await.unwrap();
    assert_eq!(linked, vec![pair.expense.clone()]);
    assert_eq!(engine.list_resources(project_id).await.unwrap(), vec![pair.resource]);
}

#[tokio::test]
async fn expense_with_resource_across_projects_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let first = new_project(&engine).await;
    let second = new_project(&engine).await;

    let err = engine
        .create_expense_with_resource(
            ExpenseNew::new(first, "Vendor: Acme", 900.0, ExpenseType::Vendor),
            ResourceNew::new(second, "Acme", ResourceType::Vendor),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidValue(_)));
    assert!(engine.list_resources(second).await.unwrap().is_empty());
    assert!(engine.list_expenses(first).await.unwrap().is_empty());
}

#[tokio::test]
async fn manual_expense_for_unknown_project_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_expense(ExpenseNew::new(
            Uuid::new_v4(),
            "Permits",
            250.0,
            ExpenseType::Other,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn renaming_team_member_of_a_pair_keeps_its_expense() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let pair = engine
        .create_expense_with_resource(
            ExpenseNew::new(project_id, "Resource: Dana", 5000.0, ExpenseType::Resource),
            ResourceNew::new(project_id, "Dana", ResourceType::TeamMember)
                .cost_per_unit(50.0)
                .allocated_amount(100.0),
        )
        .await
        .unwrap();

    let renamed = engine
        .update_resource(pair.resource.id, ResourceUpdate::default().name("Dana K"))
        .await
        .unwrap();

    assert_eq!(renamed.name, "Dana K");
    assert_eq!(
        engine.linked_expenses(pair.resource.id).await.unwrap(),
        vec![pair.expense]
    );
    let summary = engine.budget_summary(project_id).await.unwrap();
    assert_eq!(summary.total_expenses, 5000.0);
}

#[tokio::test]
async fn renaming_unpriced_material_of_a_pair_keeps_its_expense() {
    let (engine, _db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let pair = engine
        .create_expense_with_resource(
            ExpenseNew::new(project_id, "Material: Gravel", 800.0, ExpenseType::Material),
            ResourceNew::new(project_id, "Gravel", ResourceType::Material).allocated_amount(20.0),
        )
        .await
        .unwrap();

    engine
        .update_resource(
            pair.resource.id,
            ResourceUpdate::default().name("Crushed Gravel").allocated_amount(25.0),
        )
        .await
        .unwrap();

    assert_eq!(
        engine.linked_expenses(pair.resource.id).await.unwrap(),
        vec![pair.expense]
    );
}

#[tokio::test]
async fn failed_cascade_commits_nothing() {
    let (engine, db) = engine_with_db().await;
    let project_id = new_project(&engine).await;
    let resource = engine.create_resource(acme(project_id)).await.unwrap();
    let expenses = engine.linked_expenses(resource.id).await.unwrap();
    db.execute_unprepared(
        "CREATE TRIGGER keep_resources BEFORE DELETE ON resources \
         BEGIN SELECT RAISE(ABORT, 'resources are locked'); END",
    )
    .await
    .unwrap();

    let err = engine.delete_expense(expenses[0].id).await.unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));
    let err = engine.delete_resource(resource.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    assert_eq!(engine.resource(resource.id).await.unwrap(), resource);
    assert_eq!(engine.linked_expenses(resource.id).await.unwrap(), expenses);
}
