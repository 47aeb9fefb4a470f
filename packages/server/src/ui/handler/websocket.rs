//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientCommand, ConnectionId},
    infrastructure::dto::conversion::decode_command,
    ui::state::AppState,
    usecase::PresenceOutcome,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards queued frames from `rx` to the WebSocket sink.
///
/// Every notification addressed to this connection goes through `rx`, so
/// frames reach the client in the order the use cases produced them.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive notifications
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_usecase.execute(tx).await;
    tracing::info!("Connection '{}' opened", connection_id);

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_id_clone, text);
                    match decode_command(&text) {
                        Ok(command) => {
                            dispatch(&state_clone, &connection_id_clone, command).await;
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Ignoring frame from '{}': {}",
                                connection_id_clone,
                                e
                            );
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to forward notifications to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match state.disconnect_usecase.execute(&connection_id).await {
        PresenceOutcome::NotRegistered => {
            tracing::info!("Connection '{}' closed", connection_id);
        }
        PresenceOutcome::StillConnected => {
            tracing::info!("Connection '{}' closed, session still online", connection_id);
        }
        PresenceOutcome::GracePeriod { epoch, .. } => {
            tracing::info!(
                "Connection '{}' closed, grace period #{} started",
                connection_id,
                epoch
            );
        }
        PresenceOutcome::Offline(_) => {
            tracing::info!("Connection '{}' closed, session offline", connection_id);
        }
    }
}

/// Route one normalized command to its use case. Failures are logged and dropped.
async fn dispatch(state: &AppState, connection_id: &ConnectionId, command: ClientCommand) {
    let kind = command.kind();
    let result: Result<(), String> = match command {
        ClientCommand::Join { name, client_id } => state
            .join_usecase
            .execute(connection_id.clone(), name, client_id)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientCommand::SwitchRoom { room } => state
            .switch_room_usecase
            .execute(connection_id, room)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientCommand::Send { content, room } => state
            .send_message_usecase
            .send_text(connection_id, content, room)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientCommand::File { file, room } => state
            .send_message_usecase
            .send_file(connection_id, file, room)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
        ClientCommand::PrivateSend { target, content } => state
            .private_message_usecase
            .execute(connection_id, &target, content)
            .await
            .map_err(|e| e.to_string()),
        ClientCommand::Typing => state
            .typing_usecase
            .execute(connection_id)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string()),
    };

    if let Err(e) = result {
        tracing::warn!("Dropped '{}' from '{}': {}", kind, connection_id, e);
    }
}
