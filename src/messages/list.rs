use axum::{debug_handler, extract::State, Json};
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower_sessions::Session;

use crate::{session, AppError, AppResult};

use super::{relative::relative_time, AuthorJson, MessageJson};

/// At most this many messages come back from a list call.
pub const LIST_CAP: i64 = 50;

/// The 50 most recent messages, oldest-first, author attached. The query
/// takes the newest rows so the cap drops old history, then reverses so the
/// wire order reads as a transcript.
pub async fn list_recent(db_pool: &SqlitePool) -> AppResult<Vec<MessageJson>> {
    let now = OffsetDateTime::now_utc().unix_timestamp();

    let mut rows: Vec<(i64, String, String, String, i64)> = sqlx::query_as(
        "SELECT m.id, m.content, u.id, u.name, m.created_at
         FROM messages m JOIN users u ON u.id = m.user_id
         ORDER BY m.id DESC LIMIT ?",
    )
    .bind(LIST_CAP)
    .fetch_all(db_pool)
    .await?;
    rows.reverse();

    Ok(rows
        .into_iter()
        .map(|(id, content, user_id, name, created_at)| MessageJson {
            id,
            content,
            user: AuthorJson { id: user_id, name },
            created_at: relative_time(created_at, now),
        })
        .collect())
}

#[debug_handler]
pub(crate) async fn list(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Json<Vec<MessageJson>>> {
    if session::current_user(&session, &db_pool).await?.is_none() {
        return Err(AppError::Auth);
    }

    Ok(Json(list_recent(&db_pool).await?))
}
