use shoutbox::{app, config::Config, db, AppState};
use sqlx::sqlite::SqlitePoolOptions;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shoutbox=debug,info")),
        )
        .init();

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(&config.database_url)
        .await?;
    db::migrate(&db_pool).await?;

    let app_state = AppState {
        db_pool,
        tx: broadcast::channel(256).0,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}
