#![allow(dead_code)]

use axum::body::Body;
use http::{Method, Request};
use santaserver::db;
use santaserver::models::member::MemberRow;
use santaserver::routes;
use santaserver::state::AppState;
use sqlx::SqlitePool;

/// A member created for testing, bundling the row with a raw bearer token.
pub struct TestMember {
    pub member: MemberRow,
    pub token: String,
}

impl TestMember {
    pub fn id(&self) -> &str {
        &self.member.id
    }

    /// Returns the Authorization header value.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Test server that owns an in-memory SQLite pool and full AppState.
/// Each instance is isolated, so tests may run in parallel.
pub struct TestServer {
    pub state: AppState,
}

impl TestServer {
    /// Create a new TestServer with an in-memory SQLite database.
    pub async fn new() -> Self {
        let pool = db::create_pool("sqlite::memory:")
            .await
            .expect("failed to create test pool");

        Self {
            state: AppState::new(pool, true, 30),
        }
    }

    /// Returns an Axum Router wired to this server's state for `oneshot()` calls.
    pub fn router(&self) -> axum::Router {
        routes::router(self.state.clone())
    }

    /// Returns a reference to the underlying SQLite pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.state.db
    }

    /// Binds a TCP listener on port 0, spawns the server, and returns the address.
    pub async fn spawn(&self) -> String {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("127.0.0.1:{}", addr.port())
    }

    /// Create a member without a password. Its access code is `code-<name>`.
    pub async fn create_member(&self, name: &str, is_admin: bool) -> MemberRow {
        let id = santaserver::snowflake::generate();
        db::members::create_member(self.pool(), &id, name, &format!("code-{name}"), is_admin)
            .await
            .expect("failed to create test member")
    }

    /// Create a member and issue it a bearer token directly.
    pub async fn create_member_with_token(&self, name: &str) -> TestMember {
        let member = self.create_member(name, false).await;
        let token = db::auth::issue_token(self.pool(), &member.id, 30)
            .await
            .expect("failed to issue test token");
        TestMember { member, token }
    }

    pub async fn create_admin_with_token(&self, name: &str) -> TestMember {
        let member = self.create_member(name, true).await;
        let token = db::auth::issue_token(self.pool(), &member.id, 30)
            .await
            .expect("failed to issue test token");
        TestMember { member, token }
    }

    /// Sets gift and roast assignments directly in the database.
    pub async fn assign(&self, member_id: &str, santa_for: &str, roast_target: &str) {
        db::members::update_assignments(
            self.pool(),
            member_id,
            Some(santa_for),
            Some(roast_target),
        )
        .await
        .expect("failed to assign test member");
    }
}

// ---------------------------------------------------------------------------
// Request builder helpers
// ---------------------------------------------------------------------------

/// Build an authenticated request with no body.
pub fn authenticated_request(method: Method, uri: &str, auth_header: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", auth_header)
        .body(Body::empty())
        .unwrap()
}

/// Build an authenticated request with a JSON body.
pub fn authenticated_json_request(
    method: Method,
    uri: &str,
    auth_header: &str,
    body: &serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", auth_header)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Build an unauthenticated request with a JSON body.
pub fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Parse a response body into a `serde_json::Value`.
pub async fn parse_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Login request body.
pub fn login_body(access_code: &str, password: &str) -> serde_json::Value {
    serde_json::json!({ "access_code": access_code, "password": password })
}
