use dotenvy::dotenv;

use deliver::router::init_router;
use deliver::state::init_app_state;
use deliver_observability::init_logging;

#[tokio::main]
async fn main() {
    dotenv().ok();

    init_logging();

    let state = init_app_state().await;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .expect("Failed to run database migrations");

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind to 0.0.0.0:3000");
    tracing::info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.expect("Server error");
}
