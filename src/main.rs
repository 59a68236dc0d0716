mod app;
mod auth;
mod config;
mod db;
mod error;
mod state;
mod todos;

#[cfg(test)]
mod testing;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "taskboard=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::debug!(server = ?config.server, jwt = ?config.jwt, "configuration loaded");

    let db = db::connect(&config).await?;
    db::migrate(&db).await?;

    let server = config.server.clone();
    let app = app::build_app(AppState::new(config, db))?;
    app::serve(app, &server).await
}
