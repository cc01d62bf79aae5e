use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{db::User, AppResult};

pub const USER_ID: &str = "user_id";

/// Resolves the session to its user row. `None` means no one is signed in
/// (or the session outlived the user row), which callers turn into 401.
pub async fn current_user(session: &Session, db_pool: &SqlitePool) -> AppResult<Option<User>> {
    let Some(user_id) = session.get::<String>(USER_ID).await? else {
        return Ok(None);
    };

    let row: Option<(String, String)> = sqlx::query_as("SELECT id,name FROM users WHERE id=?")
        .bind(&user_id)
        .fetch_optional(db_pool)
        .await?;

    Ok(row.map(|(id, name)| User { id, name }))
}
