use rand::seq::IndexedRandom;
use sqlx::SqlitePool;
use uuid::Uuid;

mod login;
mod logout;

use axum::{routing::get, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login::login_page).post(login::login))
        .route("/logout", get(logout::logout))
}

/// Registers a user row for this sign-in and returns its id. Display names
/// are taken as given; a blank one gets a generated alias.
pub(crate) async fn create_user(db_pool: &SqlitePool, name: &str) -> Result<String, sqlx::Error> {
    let id = Uuid::now_v7().to_string();
    let name = match name.trim() {
        "" => random_alias(),
        trimmed => trimmed.to_owned(),
    };

    tracing::info!("adding user {name}#{id}");
    sqlx::query("INSERT INTO users (id,name) VALUES (?,?)")
        .bind(&id)
        .bind(&name)
        .execute(db_pool)
        .await?;

    Ok(id)
}

fn random_alias() -> String {
    let adjectives = [
        "Quick", "Lazy", "Mysterious", "Jolly", "Brave", "Silent", "Witty", "Fierce",
        "Clever", "Gentle", "Wild", "Calm", "Bold", "Shy", "Proud", "Happy", "Sad",
        "Eager", "Fancy", "Rusty", "Golden", "Silver", "Bright", "Dark", "Lucky",
        ];

    let nouns = [
        "Fox", "Bear", "Eagle", "Wolf", "Dragon", "Tiger", "Lion", "Owl", "Rabbit",
        "Falcon", "Hawk", "Shark", "Panda", "Kitten", "Puppy", "Phoenix", "Griffin",
        "Unicorn", "Turtle", "Dolphin", "Whale", "Elephant", "Giraffe", "Zebra",
    ];

    format!("{} {}", adjectives.choose(&mut rand::rng()).unwrap(), nouns.choose(&mut rand::rng()).unwrap())
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn pool() -> SqlitePool {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::migrate(&db_pool).await.unwrap();
        db_pool
    }

    #[tokio::test]
    async fn create_user_trims_display_name() {
        let db_pool = pool().await;
        let id = create_user(&db_pool, "  Alice  ").await.unwrap();

        let (name,): (String,) = sqlx::query_as("SELECT name FROM users WHERE id=?")
            .bind(&id)
            .fetch_one(&db_pool)
            .await
            .unwrap();
        assert_eq!(name, "Alice");
    }

    #[tokio::test]
    async fn blank_display_name_gets_an_alias() {
        let db_pool = pool().await;
        let id = create_user(&db_pool, "   ").await.unwrap();

        let (name,): (String,) = sqlx::query_as("SELECT name FROM users WHERE id=?")
            .bind(&id)
            .fetch_one(&db_pool)
            .await
            .unwrap();
        assert!(!name.trim().is_empty());
        assert!(name.contains(' '));
    }
}
