use axum::{
    debug_handler,
    extract::{ws::Message as WsMessage, State, WebSocketUpgrade},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tower_sessions::Session;

use crate::{session, AppError, AppResult, AppState};

use super::{BroadcastEvent, CHANNEL};

/// Subscribes this connection to the `shoutbox` channel. Every broadcast
/// event becomes one JSON text frame. Posting goes through HTTP, so inbound
/// frames are drained and dropped; a close frame (or the peer vanishing)
/// ends the subscription, which is released by dropping the receiver.
#[debug_handler(state = AppState)]
pub(crate) async fn subscribe(
    State(db_pool): State<SqlitePool>,
    State(tx): State<broadcast::Sender<BroadcastEvent>>,
    session: Session,

    ws: WebSocketUpgrade,
) -> AppResult<Response> {
    if session::current_user(&session, &db_pool).await?.is_none() {
        return Err(AppError::Auth);
    }

    Ok(ws.on_upgrade(async move |stream| {
        let mut rx = tx.subscribe();
        let (mut sender, mut receiver) = stream.split();

        let mut forward_task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        let Ok(frame) = serde_json::to_string(&event) else {
                            break;
                        };
                        if sender.send(frame.into()).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!("'{CHANNEL}' subscriber lagged, {missed} events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        while let Some(Ok(frame)) = receiver.next().await {
            if let WsMessage::Close(_) = frame {
                break;
            }
        }

        forward_task.abort();
        let _ = (&mut forward_task).await;
    }))
}
