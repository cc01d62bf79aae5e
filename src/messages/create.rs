use axum::{debug_handler, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tower_sessions::Session;

use crate::{db::User, session, AppError, AppResult, AppState};

use super::{relative::relative_time, AuthorJson, BroadcastEvent, MessageJson, CHANNEL};

/// Longest accepted content, in characters, after trimming.
pub const MAX_CONTENT_LEN: usize = 1000;

#[derive(Deserialize)]
pub(crate) struct CreateMessage {
    content: Option<String>,
}

/// Validates, persists, then publishes. Content is stored with leading and
/// trailing whitespace removed, otherwise exactly as submitted. The publish
/// happens only after the row is durable; a publish with no one listening
/// is logged and the request still succeeds.
pub async fn create_message(
    db_pool: &SqlitePool,
    tx: &broadcast::Sender<BroadcastEvent>,
    user: &User,
    content: &str,
) -> AppResult<MessageJson> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation {
            field: "content",
            message: "The content field is required.".to_owned(),
        });
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(AppError::Validation {
            field: "content",
            message: format!("The content field must not be greater than {MAX_CONTENT_LEN} characters."),
        });
    }

    let created_at = OffsetDateTime::now_utc().unix_timestamp();
    let id = sqlx::query("INSERT INTO messages (user_id,content,created_at) VALUES (?,?,?)")
        .bind(&user.id)
        .bind(content)
        .bind(created_at)
        .execute(db_pool)
        .await?
        .last_insert_rowid();

    let message = MessageJson {
        id,
        content: content.to_owned(),
        user: AuthorJson {
            id: user.id.clone(),
            name: user.name.clone(),
        },
        created_at: relative_time(created_at, created_at),
    };

    match tx.send(BroadcastEvent::new(message.clone())) {
        Ok(subscribers) => {
            tracing::debug!("message {id} fanned out to {subscribers} subscribers on '{CHANNEL}'");
        }
        Err(_) => {
            tracing::warn!("message {id} persisted but no subscriber was listening on '{CHANNEL}'");
        }
    }

    Ok(message)
}

#[debug_handler(state = AppState)]
pub(crate) async fn create(
    State(db_pool): State<SqlitePool>,
    State(tx): State<broadcast::Sender<BroadcastEvent>>,
    session: Session,

    Json(CreateMessage { content }): Json<CreateMessage>,
) -> AppResult<(StatusCode, Json<MessageJson>)> {
    let Some(user) = session::current_user(&session, &db_pool).await? else {
        return Err(AppError::Auth);
    };

    let message = create_message(&db_pool, &tx, &user, content.as_deref().unwrap_or("")).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
