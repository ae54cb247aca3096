//! Live-update fan-out.
//!
//! Every state change is published once to a broadcast channel. Each
//! subscriber carries the identity it connected with and only sees events
//! for records that identity may read. Delivery is at-most-once with no
//! replay: a subscriber that falls behind gets a [`Delivery::Resync`] and is
//! expected to refetch the list.

pub mod socket;

use std::sync::Arc;

use serde_json::json;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::auth::AuthUser;
use crate::models::Submission;

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

impl EventKind {
    /// Event name on the wire, as the web view expects it.
    pub fn wire_name(&self) -> &'static str {
        match self {
            EventKind::Created => "newComplaint",
            EventKind::Updated => "complaintUpdated",
            EventKind::Deleted => "complaintDeleted",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiveEvent {
    pub kind: EventKind,
    pub submission: Arc<Submission>,
}

impl LiveEvent {
    pub fn visible_to(&self, viewer: &AuthUser) -> bool {
        viewer.is_admin() || self.submission.is_owned_by(&viewer.user_id)
    }
}

#[derive(Debug, Clone)]
pub enum Delivery {
    Event(LiveEvent),
    /// Events were dropped for this subscriber; it must refetch.
    Resync,
}

impl Delivery {
    pub fn to_frame(&self) -> serde_json::Value {
        match self {
            Delivery::Event(event) => json!({
                "event": event.kind.wire_name(),
                "data": event.submission.as_ref(),
            }),
            Delivery::Resync => json!({ "event": "resync" }),
        }
    }
}

pub struct Notifier {
    tx: broadcast::Sender<LiveEvent>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Fire-and-forget. Returns how many subscribers were connected.
    pub fn publish(&self, kind: EventKind, submission: &Submission) -> usize {
        let event = LiveEvent {
            kind,
            submission: Arc::new(submission.clone()),
        };
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(
                    "Published {} for submission {} to {receivers} subscriber(s)",
                    kind.wire_name(),
                    submission.id
                );
                receivers
            }
            // No subscribers connected
            Err(_) => 0,
        }
    }

    /// Subscribe with the visibility scope of `viewer`.
    pub fn subscribe(&self, viewer: AuthUser) -> Subscription {
        Subscription {
            viewer,
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

pub struct Subscription {
    viewer: AuthUser,
    rx: broadcast::Receiver<LiveEvent>,
}

impl Subscription {
    pub fn viewer(&self) -> &AuthUser {
        &self.viewer
    }

    /// Next delivery in this subscriber's scope, or `None` once the notifier is gone.
    pub async fn next(&mut self) -> Option<Delivery> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.visible_to(&self.viewer) => {
                    return Some(Delivery::Event(event));
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "Live subscriber {} lagged, {skipped} event(s) dropped",
                        self.viewer.user_id
                    );
                    return Some(Delivery::Resync);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
