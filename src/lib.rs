pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod messages;
pub mod res;
pub mod session;

use axum::{debug_handler, extract::FromRef, response::{Html, IntoResponse, Redirect, Response}, routing::get, Router};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, Session, SessionManagerLayer};

pub use error::{AppError, AppResult};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub tx: broadcast::Sender<messages::BroadcastEvent>,
}

pub fn app(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(30)));

    Router::new()
        .route("/", get(index))
        .merge(auth::router())
        .nest("/api/messages", messages::router())
        .with_state(state)
        .layer(session_layer)
        .layer(CorsLayer::permissive())
}

#[debug_handler]
async fn index(session: Session) -> AppResult<Response> {
    if session.get::<String>(session::USER_ID).await?.is_some() {
        Ok(
            Html(crate::include_res!(str, "/pages/shoutbox.html"))
            .into_response()
        )
    } else {
        Ok(
            Redirect::to("/login")
                .into_response()
        )
    }
}
