use axum::{
    Router,
    routing::{delete, get, post, put},
};

use std::sync::Arc;

use crate::{dashboard, expenses, milestones, projects, resources};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn api() -> Router<ServerState> {
    Router::new()
        .route(
            "/projects",
            post(projects::project_new).get(projects::list),
        )
        .route("/projects/{id}", get(projects::get).put(projects::update))
        .route("/projects/{id}/stage", put(projects::set_stage))
        .route("/projects/{id}/resources", get(resources::list))
        .route("/projects/{id}/expenses", get(expenses::list))
        .route("/projects/{id}/milestones", get(milestones::list))
        .route("/projects/{id}/budget-summary", get(projects::budget_summary))
        .route("/resources", post(resources::resource_new))
        .route(
            "/resources/{id}",
            get(resources::get)
                .put(resources::update)
                .delete(resources::remove),
        )
        .route("/expenses", post(expenses::expense_new))
        .route("/expenses/with-resource", post(expenses::with_resource))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::remove),
        )
        .route("/milestones", post(milestones::milestone_new))
        .route("/milestones/{id}/complete", put(milestones::complete))
        .route("/milestones/{id}", delete(milestones::remove))
        .route("/dashboard/stats", get(dashboard::stats))
}

/// Build the HTTP application around `engine`. Every endpoint lives under
/// `/api`.
pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };
    Router::new().nest("/api", api()).with_state(state)
}

pub async fn run(engine: Engine, bind: &str, port: u16) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    run_with_listener(engine, listener).await
}

/// Serve until Ctrl-C (or SIGTERM on unix), then let in-flight requests
/// finish.
pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
