mod common;

use common::{authenticated_json_request, authenticated_request, TestMember, TestServer};
use futures_util::{SinkExt, StreamExt};
use http::{Method, StatusCode};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Next JSON text frame, failing the test after two seconds of silence.
async fn next_json(ws: &mut Ws) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for gateway message")
            .expect("gateway stream ended")
            .expect("gateway error");
        if msg.is_text() {
            let text = msg.into_text().unwrap();
            return serde_json::from_str(&text).unwrap();
        }
    }
}

async fn send_json(ws: &mut Ws, value: serde_json::Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

/// Connects, identifies and returns the socket along with the READY payload.
async fn identify(
    addr: &str,
    member: &TestMember,
    topics: Option<Vec<&str>>,
) -> (Ws, serde_json::Value) {
    let (mut ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    let hello = next_json(&mut ws).await;
    assert_eq!(hello["op"], 4);

    let mut data = json!({ "token": member.token });
    if let Some(topics) = topics {
        data["topics"] = json!(topics);
    }
    send_json(&mut ws, json!({ "op": 2, "data": data })).await;

    let ready = next_json(&mut ws).await;
    assert_eq!(ready["op"], 0);
    assert_eq!(ready["type"], "ready");
    assert_eq!(ready["seq"], 1);
    (ws, ready)
}

#[tokio::test]
async fn test_ws_hello_contains_heartbeat_interval() {
    let server = TestServer::new().await;
    let addr = server.spawn().await;
    let (mut ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    let hello = next_json(&mut ws).await;
    assert_eq!(hello["op"], 4, "expected HELLO opcode (4)");
    assert_eq!(hello["data"]["heartbeat_interval"], 45_000);
}

#[tokio::test]
async fn test_ws_invalid_identify_gets_invalid_session() {
    let server = TestServer::new().await;
    let addr = server.spawn().await;
    let (mut ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    let _ = next_json(&mut ws).await;

    send_json(&mut ws, json!({ "op": 2, "data": { "token": "not-a-token" } })).await;
    let msg = next_json(&mut ws).await;
    assert_eq!(msg["op"], 5, "expected INVALID_SESSION opcode (5)");
}

#[tokio::test]
async fn test_ws_malformed_identify_gets_invalid_session() {
    let server = TestServer::new().await;
    let addr = server.spawn().await;
    let (mut ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    let _ = next_json(&mut ws).await;

    send_json(&mut ws, json!({ "op": 2, "data": { "topics": ["wall"] } })).await;
    let msg = next_json(&mut ws).await;
    assert_eq!(msg["op"], 5);
}

#[tokio::test]
async fn test_ws_ready_snapshot() {
    let server = TestServer::new().await;
    let ana = server.create_member_with_token("ana").await;
    let ben = server.create_member("ben", false).await;
    server.assign(ana.id(), &ben.id, &ben.id).await;
    santaserver::db::wishlists::create_item(server.pool(), &ben.id, "Skates", "")
        .await
        .unwrap();
    let addr = server.spawn().await;

    let (_ws, ready) = identify(&addr, &ana, None).await;
    let data = &ready["data"];
    assert_eq!(data["member"]["id"], ana.id());
    assert_eq!(data["member"]["santa_for"], ben.id.as_str());
    assert_eq!(data["members"].as_array().unwrap().len(), 2);
    assert_eq!(data["questions"].as_array().unwrap().len(), 8);
    assert_eq!(data["wishlists"][0]["title"], "Skates");
    assert!(data["roasts_received"].as_array().unwrap().is_empty());
    assert_eq!(data["online_member_ids"], json!([ana.id()]));
    assert!(data["session_id"].is_string());
}

#[tokio::test]
async fn test_ws_heartbeat_ack() {
    let server = TestServer::new().await;
    let ana = server.create_member_with_token("ana").await;
    let addr = server.spawn().await;

    let (mut ws, _) = identify(&addr, &ana, None).await;
    send_json(&mut ws, json!({ "op": 1 })).await;
    let ack = next_json(&mut ws).await;
    assert_eq!(ack["op"], 3);
}

#[tokio::test]
async fn test_ws_receives_typed_events_in_sequence() {
    let server = TestServer::new().await;
    let ana = server.create_member_with_token("ana").await;
    let ben = server.create_member_with_token("ben").await;
    let addr = server.spawn().await;

    let (mut ws, _) = identify(&addr, &ana, None).await;

    let response = server
        .router()
        .oneshot(authenticated_json_request(
            Method::POST,
            "/api/v1/wall",
            &ben.auth_header(),
            &json!({ "body": "Ho ho ho" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let event = next_json(&mut ws).await;
    assert_eq!(event["op"], 0);
    assert_eq!(event["type"], "wall.create");
    assert_eq!(event["seq"], 2);
    assert_eq!(event["data"]["body"], "Ho ho ho");
    let message_id = event["data"]["id"].as_str().unwrap().to_string();

    server
        .router()
        .oneshot(authenticated_request(
            Method::PUT,
            &format!("/api/v1/wall/{message_id}/like"),
            &ben.auth_header(),
        ))
        .await
        .unwrap();

    let event = next_json(&mut ws).await;
    assert_eq!(event["type"], "wall.like");
    assert_eq!(event["seq"], 3);
    assert_eq!(event["data"]["likes"], 1);
}

#[tokio::test]
async fn test_ws_topic_filtering() {
    let server = TestServer::new().await;
    let ana = server.create_member_with_token("ana").await;
    let addr = server.spawn().await;

    let (mut ws, _) = identify(&addr, &ana, Some(vec!["wall"])).await;

    let app = server.router();
    app.clone()
        .oneshot(authenticated_json_request(
            Method::POST,
            "/api/v1/wishlists",
            &ana.auth_header(),
            &json!({ "title": "Snow globe" }),
        ))
        .await
        .unwrap();
    app.oneshot(authenticated_json_request(
        Method::POST,
        "/api/v1/wall",
        &ana.auth_header(),
        &json!({ "body": "only this one" }),
    ))
    .await
    .unwrap();

    let event = next_json(&mut ws).await;
    assert_eq!(event["type"], "wall.create");
    assert_eq!(event["seq"], 2);
}

#[tokio::test]
async fn test_ws_empty_topic_list_receives_everything() {
    let server = TestServer::new().await;
    let ana = server.create_member_with_token("ana").await;
    let addr = server.spawn().await;

    let (mut ws, _) = identify(&addr, &ana, Some(vec![])).await;

    server
        .router()
        .oneshot(authenticated_json_request(
            Method::POST,
            "/api/v1/wall",
            &ana.auth_header(),
            &json!({ "body": "anyone there?" }),
        ))
        .await
        .unwrap();

    let event = next_json(&mut ws).await;
    assert_eq!(event["type"], "wall.create");
    assert_eq!(event["seq"], 2);
}

#[tokio::test]
async fn test_ws_admin_ready_separates_all_roasts() {
    let server = TestServer::new().await;
    let ana = server.create_member_with_token("ana").await;
    let ben = server.create_member_with_token("ben").await;
    let santa = server.create_admin_with_token("santa").await;
    santaserver::db::roasts::create_roast(server.pool(), ana.id(), ben.id(), "Tinsel for brains")
        .await
        .unwrap();
    let addr = server.spawn().await;

    let (_santa_ws, ready) = identify(&addr, &santa, None).await;
    assert!(ready["data"]["roasts_sent"].as_array().unwrap().is_empty());
    let all = ready["data"]["roasts"].as_array().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["sender_id"], ana.id());

    let (_ana_ws, ready) = identify(&addr, &ana, None).await;
    assert_eq!(ready["data"]["roasts_sent"].as_array().unwrap().len(), 1);
    assert!(ready["data"].get("roasts").is_none());
}

#[tokio::test]
async fn test_ws_roast_events_respect_audience() {
    let server = TestServer::new().await;
    let ana = server.create_member_with_token("ana").await;
    let ben = server.create_member_with_token("ben").await;
    let santa = server.create_admin_with_token("santa").await;
    server.assign(ana.id(), ben.id(), ben.id()).await;
    let addr = server.spawn().await;

    let (mut ana_ws, _) = identify(&addr, &ana, None).await;
    let (mut ben_ws, _) = identify(&addr, &ben, None).await;
    let (mut santa_ws, _) = identify(&addr, &santa, None).await;

    let app = server.router();
    let response = app
        .clone()
        .oneshot(authenticated_json_request(
            Method::POST,
            "/api/v1/roasts",
            &ana.auth_header(),
            &json!({ "message": "You wrap presents like a raccoon." }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let event = next_json(&mut ana_ws).await;
    assert_eq!(event["type"], "roast.create");
    let event = next_json(&mut santa_ws).await;
    assert_eq!(event["type"], "roast.create");
    assert_eq!(event["data"]["sender_id"], ana.id());

    app.clone()
        .oneshot(authenticated_request(
            Method::POST,
            "/api/v1/roasts/release-all",
            &santa.auth_header(),
        ))
        .await
        .unwrap();

    // The recipient's first event is the anonymous delivery, never roast.create.
    let event = next_json(&mut ben_ws).await;
    assert_eq!(event["type"], "roast.received");
    assert_eq!(event["seq"], 2);
    assert_eq!(event["data"]["message"], "You wrap presents like a raccoon.");
    assert!(event["data"].get("sender_id").is_none());

    let event = next_json(&mut ana_ws).await;
    assert_eq!(event["type"], "roast.update");
    assert_eq!(event["data"]["released"], true);

    // Admins see the update but not the recipient copy.
    let event = next_json(&mut santa_ws).await;
    assert_eq!(event["type"], "roast.update");
    app.oneshot(authenticated_json_request(
        Method::POST,
        "/api/v1/wall",
        &ben.auth_header(),
        &json!({ "body": "marker" }),
    ))
    .await
    .unwrap();
    let event = next_json(&mut santa_ws).await;
    assert_eq!(event["type"], "wall.create");
}

#[tokio::test]
async fn test_ws_answers_reach_voter_and_admins_only() {
    let server = TestServer::new().await;
    let ana = server.create_member_with_token("ana").await;
    let ben = server.create_member_with_token("ben").await;
    let addr = server.spawn().await;

    let (mut ben_ws, _) = identify(&addr, &ben, Some(vec!["answers", "badges"])).await;

    server
        .router()
        .oneshot(authenticated_json_request(
            Method::PUT,
            "/api/v1/answers/@me/fun",
            &ana.auth_header(),
            &json!({ "target_id": ben.id() }),
        ))
        .await
        .unwrap();

    // ben only sees the recomputed badges, not ana's vote.
    let event = next_json(&mut ben_ws).await;
    assert_eq!(event["type"], "badges.update");
    assert_eq!(event["data"][0]["member_id"], ben.id());
}
