use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};

use crate::auth::AuthUser;
use crate::live::Subscription;
use crate::state::SharedState;

/// `GET /api/live`: authenticated WebSocket carrying scoped live events.
pub async fn connect(
    auth: AuthUser,
    State(state): State<SharedState>,
    ws: WebSocketUpgrade,
) -> Response {
    // Scope is fixed at handshake; a reconnect computes it again
    let subscription = state.notifier.subscribe(auth);
    ws.on_upgrade(move |socket| serve(socket, subscription))
}

async fn serve(socket: WebSocket, mut subscription: Subscription) {
    let user_id = subscription.viewer().user_id.clone();
    tracing::info!("Live client connected ({user_id})");

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            delivery = subscription.next() => {
                let Some(delivery) = delivery else { break };
                let frame = delivery.to_frame().to_string();
                if sender.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!("Live socket error for {user_id}: {e}");
                        break;
                    }
                    // Clients only listen; anything they send is ignored
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::info!("Live client disconnected ({user_id})");
}
