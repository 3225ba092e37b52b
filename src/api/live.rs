use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::api::{ApiError, AppState};
use crate::db::FightStore;
use crate::models::live::parse_client_message;
use crate::models::ServerMessage;
use crate::simulator::LiveFightState;
use crate::workers::LiveFightHandle;

/// Current simulator snapshot
pub async fn live_fight(State(state): State<AppState>) -> Result<Json<LiveFightState>, ApiError> {
    Ok(Json(state.live.snapshot().await?))
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// One subscriber session: snapshot first, then every broadcast, while admin actions flow the other way
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Snapshot and receiver come from the worker together, so later messages always follow it
    let (snapshot, mut updates) = match state.live.subscribe_with_snapshot().await {
        Ok(subscription) => subscription,
        Err(e) => {
            warn!("Could not read live fight state: {}", e);
            return;
        }
    };
    if !send_message(&mut sender, &ServerMessage::FightUpdate(Box::new(snapshot))).await {
        return;
    }
    info!("Live subscriber connected");

    let mut send_task = tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(message) => {
                    if !send_message(&mut sender, &message).await {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!("Live subscriber lagged by {} messages", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let live = state.live.clone();
    let store = Arc::clone(&state.store);
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => handle_client_text(&text, &live, &store).await,
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("Live subscriber disconnected");
}

/// Returns false once the socket is gone
async fn send_message(sender: &mut SplitSink<WebSocket, Message>, message: &ServerMessage) -> bool {
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to encode live message: {}", e);
            return true;
        }
    };
    sender.send(Message::Text(text)).await.is_ok()
}

async fn handle_client_text(text: &str, live: &LiveFightHandle, store: &FightStore) {
    let action = match parse_client_message(text) {
        Ok(Some(action)) => action,
        Ok(None) => return,
        Err(e) => {
            warn!("Ignoring malformed live message: {}", e);
            return;
        }
    };

    debug!("Admin action: {:?}", action);
    if let Err(e) = live.apply(action, store).await {
        warn!("Admin action rejected: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use futures_util::{SinkExt, StreamExt};
    use serde_json::{json, Value};
    use tokio::net::{TcpListener, TcpStream};
    use tokio_tungstenite::tungstenite::Message as WsMessage;
    use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

    use super::handle_client_text;
    use crate::api::build_router;
    use crate::api::tests::{get_json, test_state};
    use crate::api::AppState;
    use crate::models::AdminAction;

    type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

    async fn serve(state: AppState) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, build_router(state)).await });
        format!("ws://{}/ws", addr)
    }

    async fn next_json(client: &mut Client) -> Value {
        loop {
            match client.next().await.unwrap().unwrap() {
                WsMessage::Text(text) => return serde_json::from_str(&text).unwrap(),
                WsMessage::Close(frame) => panic!("socket closed: {:?}", frame),
                _ => continue,
            }
        }
    }

    async fn send_text(client: &mut Client, text: String) {
        client.send(WsMessage::Text(text)).await.unwrap();
    }

    #[tokio::test]
    async fn test_ws_session() {
        let (state, _dir) = test_state().await;
        let url = serve(state).await;

        let (mut admin, _) = connect_async(url.as_str()).await.unwrap();
        let (mut viewer, _) = connect_async(url.as_str()).await.unwrap();

        for client in [&mut admin, &mut viewer] {
            let first = next_json(client).await;
            assert_eq!(first["type"], "fightUpdate");
            assert_eq!(first["data"]["inProgress"], false);
        }

        // Garbage and unknown message types leave the session open
        send_text(&mut admin, "not json at all".to_string()).await;
        send_text(&mut admin, json!({"type": "chat", "text": "hi"}).to_string()).await;

        let start = json!({
            "type": "adminAction",
            "action": "startFight",
            "data": {"fighter1Id": 1, "fighter2Id": 2}
        });
        send_text(&mut admin, start.to_string()).await;

        for client in [&mut admin, &mut viewer] {
            let update = next_json(client).await;
            assert_eq!(update["type"], "fightUpdate");
            assert_eq!(update["data"]["inProgress"], true);
            assert_eq!(update["data"]["fighter1"]["name"], "CHARLES OLIVEIRA");
            assert_eq!(update["data"]["timeRemaining"], "5:00");
        }

        // One client leaving does not end the other's session
        admin.close(None).await.unwrap();
        drop(admin);

        let end = json!({"type": "adminAction", "action": "endFight", "data": {}});
        send_text(&mut viewer, end.to_string()).await;
        let result = next_json(&mut viewer).await;
        assert_eq!(result["type"], "fightEnd");
        assert_eq!(result["data"]["winner"], "Draw");
        assert_eq!(result["data"]["method"], "Decision");
    }

    #[tokio::test]
    async fn test_malformed_client_text_is_ignored() {
        let (state, _dir) = test_state().await;

        handle_client_text("{\"type\": \"adminAction\", \"action\": \"explode\"}", &state.live, &state.store).await;
        handle_client_text("[1, 2, 3]", &state.live, &state.store).await;

        let snapshot = state.live.snapshot().await.unwrap();
        assert!(!snapshot.in_progress);
    }

    #[tokio::test]
    async fn test_live_fight_snapshot_idle() {
        let (state, _dir) = test_state().await;
        let (status, json) = get_json(build_router(state), "/api/live-fight").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["inProgress"], false);
        assert_eq!(json["timeRemaining"], "5:00");
        assert_eq!(json["bettingOdds"]["fighter2"]["moneyline"], 125);
    }

    #[tokio::test]
    async fn test_admin_start_resolves_fighters() {
        let (state, _dir) = test_state().await;

        state
            .live
            .apply(
                AdminAction::StartFight {
                    fighter1_id: 1,
                    fighter2_id: 2,
                },
                &state.store,
            )
            .await
            .unwrap();

        let (status, json) = get_json(build_router(state.clone()), "/api/live-fight").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["inProgress"], true);
        assert_eq!(json["currentRound"], 1);
        assert_eq!(json["fighter1"]["name"], "CHARLES OLIVEIRA");
        assert_eq!(json["fighter1Score"]["round1"], 0);

        state
            .live
            .apply(AdminAction::EndFight { method: None }, &state.store)
            .await
            .unwrap();
        let (_, json) = get_json(build_router(state), "/api/live-fight").await;
        assert_eq!(json["inProgress"], false);
    }

    #[tokio::test]
    async fn test_admin_start_with_unknown_fighter_stays_idle() {
        let (state, _dir) = test_state().await;

        let result = state
            .live
            .apply(
                AdminAction::StartFight {
                    fighter1_id: 1,
                    fighter2_id: 50,
                },
                &state.store,
            )
            .await;
        assert!(result.is_err());

        let snapshot = state.live.snapshot().await.unwrap();
        assert!(!snapshot.in_progress);
        assert!(snapshot.fighter1.is_none());
    }
}
