/// An identified gateway connection, tracked for presence.
#[derive(Debug, Clone)]
pub struct GatewaySession {
    pub session_id: String,
    pub member_id: String,
}
