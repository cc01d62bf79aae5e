use sqlx::SqlitePool;

/// The authenticated principal a message hangs off of. Identity itself is
/// established elsewhere; handlers only ever see id and display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// Creates the schema on a fresh database; a no-op on an existing one.
///
/// Message ids are assigned by SQLite and only ever grow, so id order is
/// creation order. `created_at` is unix seconds, set by the insert path.
pub async fn migrate(db_pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        )",
    )
    .execute(db_pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(id),
            content TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )",
    )
    .execute(db_pool)
    .await?;

    Ok(())
}
