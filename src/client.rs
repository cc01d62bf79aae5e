use std::future::Future;

use tokio::sync::broadcast;

use crate::messages::{BroadcastEvent, MessageJson};

/// Advisory only. Display state for a status indicator; never gates
/// sending or receiving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connected,
}

/// Client-side view of the shoutbox: fetched history merged with live
/// broadcast events. One instance per connected client; everything it
/// talks to is handed in by the caller.
///
/// The view is only ever written from two places: `activate` (history
/// replace) and `apply` (event merge). Submitting a message does NOT touch
/// the view; the broadcast echo of the created message is what makes it
/// appear, and `apply`'s id-dedup keeps a replayed or double-delivered
/// event from showing twice.
#[derive(Debug, Default)]
pub struct ShoutboxSession {
    messages: Vec<MessageJson>,
    connection: Option<ConnectionStatus>,
    compose: String,
}

impl ShoutboxSession {
    pub fn new() -> ShoutboxSession {
        ShoutboxSession::default()
    }

    /// Replace the local view with freshly fetched history.
    pub fn activate(&mut self, history: Vec<MessageJson>) {
        self.messages = history;
    }

    /// Merge one broadcast event. An id already in the view is a replayed
    /// or echoed copy and is dropped; returns whether the view changed.
    pub fn apply(&mut self, event: BroadcastEvent) -> bool {
        if self.messages.iter().any(|m| m.id == event.message.id) {
            return false;
        }
        self.messages.push(event.message);
        true
    }

    pub fn set_compose(&mut self, text: impl Into<String>) {
        self.compose = text.into();
    }

    /// Take the compose buffer for sending, or `None` when it holds only
    /// whitespace. The buffer clears either way and stays cleared even if
    /// the send later fails.
    pub fn submit(&mut self) -> Option<String> {
        let content = std::mem::take(&mut self.compose);
        let content = content.trim();
        if content.is_empty() {
            None
        } else {
            Some(content.to_owned())
        }
    }

    pub fn on_subscribed(&mut self) {
        self.connection = Some(ConnectionStatus::Connected);
    }

    pub fn on_connection_lost(&mut self) {
        self.connection = Some(ConnectionStatus::Disconnected);
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection.unwrap_or(ConnectionStatus::Disconnected)
    }

    pub fn messages(&self) -> &[MessageJson] {
        &self.messages
    }

    /// The entry a view scrolled to the bottom shows.
    pub fn latest(&self) -> Option<&MessageJson> {
        self.messages.last()
    }

    /// True when the view renders the "no messages yet" placeholder.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Drives a session from a live subscription until the channel closes or
/// `shutdown` resolves. Pending events are drained before a shutdown is
/// honored. The receiver is owned here and dropped on every exit path,
/// which is what unsubscribes the session.
pub async fn run(
    session: &mut ShoutboxSession,
    mut rx: broadcast::Receiver<BroadcastEvent>,
    shutdown: impl Future<Output = ()>,
) {
    session.on_subscribed();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            recv = rx.recv() => match recv {
                Ok(event) => {
                    session.apply(event);
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = &mut shutdown => break,
        }
    }

    session.on_connection_lost();
}

#[cfg(test)]
mod tests {
    use crate::messages::AuthorJson;

    use super::*;

    fn message(id: i64, content: &str) -> MessageJson {
        MessageJson {
            id,
            content: content.to_owned(),
            user: AuthorJson {
                id: "0198b5e0-0000-7000-8000-000000000000".to_owned(),
                name: "Rusty Fox".to_owned(),
            },
            created_at: "1 second ago".to_owned(),
        }
    }

    #[test]
    fn activate_replaces_the_view() {
        let mut session = ShoutboxSession::new();
        session.apply(BroadcastEvent::new(message(7, "stale")));

        session.activate(vec![message(1, "a"), message(2, "b")]);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.latest().unwrap().id, 2);
    }

    #[test]
    fn duplicate_event_ids_collapse_to_one_entry() {
        let mut session = ShoutboxSession::new();

        assert!(session.apply(BroadcastEvent::new(message(1, "hello"))));
        assert!(!session.apply(BroadcastEvent::new(message(1, "hello"))));

        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].id, 1);
    }

    #[test]
    fn echo_of_listed_message_is_dropped() {
        let mut session = ShoutboxSession::new();
        session.activate(vec![message(1, "a"), message(2, "b")]);

        assert!(!session.apply(BroadcastEvent::new(message(2, "b"))));
        assert!(session.apply(BroadcastEvent::new(message(3, "c"))));
        assert_eq!(session.messages().len(), 3);
    }

    #[test]
    fn submit_takes_and_clears_the_buffer() {
        let mut session = ShoutboxSession::new();
        session.set_compose("  hello there  ");

        assert_eq!(session.submit().as_deref(), Some("hello there"));
        assert_eq!(session.submit(), None);

        // the view is untouched until the echo lands
        assert!(session.is_empty());
    }

    #[test]
    fn blank_compose_is_not_submitted() {
        let mut session = ShoutboxSession::new();
        session.set_compose("   ");
        assert_eq!(session.submit(), None);
    }

    #[test]
    fn status_follows_subscription_callbacks() {
        let mut session = ShoutboxSession::new();
        assert_eq!(session.connection(), ConnectionStatus::Disconnected);

        session.on_subscribed();
        assert_eq!(session.connection(), ConnectionStatus::Connected);

        session.on_connection_lost();
        assert_eq!(session.connection(), ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn run_merges_events_until_the_channel_closes() {
        let (tx, rx) = broadcast::channel(8);
        let mut session = ShoutboxSession::new();

        tx.send(BroadcastEvent::new(message(1, "hi"))).unwrap();
        tx.send(BroadcastEvent::new(message(1, "hi"))).unwrap();
        tx.send(BroadcastEvent::new(message(2, "again"))).unwrap();
        drop(tx);

        run(&mut session, rx, std::future::pending()).await;

        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.connection(), ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn run_drains_pending_events_before_shutdown() {
        let (tx, rx) = broadcast::channel(8);
        let mut session = ShoutboxSession::new();

        tx.send(BroadcastEvent::new(message(1, "hi"))).unwrap();
        tx.send(BroadcastEvent::new(message(2, "there"))).unwrap();

        run(&mut session, rx, std::future::ready(())).await;

        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.connection(), ConnectionStatus::Disconnected);
    }
}
