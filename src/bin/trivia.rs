use anyhow::Context;
use trivia_api::db;
use trivia_api::quiz::shared_rng;
use trivia_api::server::app::{run_server, AppState};
use trivia_api::settings::Settings;
use trivia_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = Settings::load()?;

    let pool = db::establish_connection(&settings.database)
        .await
        .context("Failed to connect to the database")?;

    tracing::info!("Running db migrations...");
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    if settings.quiz.seed.is_some() {
        tracing::warn!("Quiz selection is seeded, questions will repeat between restarts");
    }
    let state = AppState::new(pool, shared_rng(settings.quiz.seed));
    run_server(state, &settings.application.address()).await
}
