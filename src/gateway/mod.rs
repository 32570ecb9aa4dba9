pub mod dispatcher;
pub mod events;
pub mod heartbeat;
pub mod session;
pub mod snapshot;
pub mod topics;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::db;
use crate::state::AppState;
use events::{GatewayMessage, IdentifyData};
use heartbeat::{HEARTBEAT_INTERVAL, HEARTBEAT_TIMEOUT, IDENTIFY_TIMEOUT};
use session::GatewaySession;

type WsSink = SplitSink<WebSocket, Message>;

pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn send_json(sink: &mut WsSink, value: &serde_json::Value) -> bool {
    sink.send(Message::Text(value.to_string().into()))
        .await
        .is_ok()
}

async fn invalidate(sink: &mut WsSink) {
    let msg = serde_json::json!({
        "op": events::opcode::INVALID_SESSION,
        "data": { "resumable": false }
    });
    let _ = send_json(sink, &msg).await;
    let _ = sink.send(Message::Close(None)).await;
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_sink, mut ws_stream) = socket.split();

    let hello = serde_json::json!({
        "op": events::opcode::HELLO,
        "data": {
            "heartbeat_interval": HEARTBEAT_INTERVAL.as_millis() as u64
        }
    });
    if !send_json(&mut ws_sink, &hello).await {
        return;
    }

    let identify_timeout = tokio::time::sleep(IDENTIFY_TIMEOUT);
    tokio::pin!(identify_timeout);

    let (member_id, is_admin, topics) = loop {
        tokio::select! {
            _ = &mut identify_timeout => {
                tracing::debug!("gateway client never identified");
                invalidate(&mut ws_sink).await;
                return;
            }
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let Ok(gw_msg) = serde_json::from_str::<GatewayMessage>(&text) else {
                            continue;
                        };
                        if gw_msg.op != events::opcode::IDENTIFY {
                            continue;
                        }
                        let identify = gw_msg
                            .data
                            .and_then(|data| serde_json::from_value::<IdentifyData>(data).ok());
                        let Some(identify) = identify else {
                            invalidate(&mut ws_sink).await;
                            return;
                        };
                        match db::auth::resolve_token(&state.db, &identify.token).await {
                            Ok(Some((member_id, is_admin))) => {
                                break (member_id, is_admin, topics::resolve(identify.topics));
                            }
                            Ok(None) => {
                                invalidate(&mut ws_sink).await;
                                return;
                            }
                            Err(e) => {
                                tracing::error!("gateway token lookup failed: {e}");
                                invalidate(&mut ws_sink).await;
                                return;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                    _ => {}
                }
            }
        }
    };

    let session_id = uuid::Uuid::new_v4().to_string();

    // Subscribe before reading the snapshot so nothing written in between is lost.
    let mut broadcast_rx = state.dispatcher.subscribe();
    state.dispatcher.register_session(GatewaySession {
        session_id: session_id.clone(),
        member_id: member_id.clone(),
    });
    tracing::info!(
        %session_id,
        %member_id,
        ?topics,
        sessions = state.dispatcher.session_count(),
        "gateway session identified"
    );

    let ready = match snapshot::build_ready(&state, &session_id, &member_id, is_admin).await {
        Ok(data) => serde_json::json!({
            "op": events::opcode::EVENT,
            "seq": 1,
            "type": "ready",
            "data": data
        }),
        Err(e) => {
            tracing::error!("failed to build ready snapshot: {e}");
            state.dispatcher.remove_session(&session_id);
            invalidate(&mut ws_sink).await;
            return;
        }
    };

    if send_json(&mut ws_sink, &ready).await {
        run_session(
            &mut ws_sink,
            &mut ws_stream,
            &mut broadcast_rx,
            &member_id,
            is_admin,
            &topics,
        )
        .await;
    }

    state.dispatcher.remove_session(&session_id);
    tracing::info!(
        %session_id,
        %member_id,
        sessions = state.dispatcher.session_count(),
        "gateway session closed"
    );
}

async fn run_session(
    ws_sink: &mut WsSink,
    ws_stream: &mut futures_util::stream::SplitStream<WebSocket>,
    broadcast_rx: &mut tokio::sync::broadcast::Receiver<events::Broadcast>,
    member_id: &str,
    is_admin: bool,
    topics: &[String],
) {
    let mut seq: u64 = 1;
    let mut last_heartbeat = tokio::time::Instant::now();
    let mut heartbeat_check = tokio::time::interval(HEARTBEAT_INTERVAL);

    loop {
        tokio::select! {
            broadcast = broadcast_rx.recv() => {
                match broadcast {
                    Ok(broadcast) => {
                        if !broadcast.audience.reaches(member_id, is_admin) {
                            continue;
                        }
                        if !topics::wants(topics, broadcast.event.event_type()) {
                            continue;
                        }
                        seq += 1;
                        if !send_json(ws_sink, &broadcast.event.to_envelope(seq)).await {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(%member_id, skipped, "gateway session lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            _ = heartbeat_check.tick() => {
                if last_heartbeat.elapsed() > HEARTBEAT_TIMEOUT {
                    tracing::debug!(%member_id, "gateway session timed out");
                    break;
                }
            }
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let Ok(gw_msg) = serde_json::from_str::<GatewayMessage>(&text) else {
                            continue;
                        };
                        if gw_msg.op == events::opcode::HEARTBEAT {
                            last_heartbeat = tokio::time::Instant::now();
                            let ack = serde_json::json!({ "op": events::opcode::HEARTBEAT_ACK });
                            if !send_json(ws_sink, &ack).await {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }
}
