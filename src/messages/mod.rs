mod create;
mod event;
mod list;
mod relative;
mod ws;

use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::AppState;

pub use create::{create_message, MAX_CONTENT_LEN};
pub use event::BroadcastEvent;
pub use list::{list_recent, LIST_CAP};
pub use relative::relative_time;

/// Topic every client subscribes to. There is exactly one.
pub const CHANNEL: &str = "shoutbox";

/// Event name carried in every broadcast envelope.
pub const EVENT_NAME: &str = ".message.new";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list).post(create::create))
        .route("/ws", get(ws::subscribe))
}

/// Wire shape of a message, shared by the list response, the create
/// response, and the broadcast payload. `created_at` is rendered relative
/// ("3 minutes ago") at the moment the message leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageJson {
    pub id: i64,
    pub content: String,
    pub user: AuthorJson,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorJson {
    pub id: String,
    pub name: String,
}
