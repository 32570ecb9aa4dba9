use std::time::Duration;

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(45);
pub const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(90);
/// How long a fresh connection may wait before sending IDENTIFY.
pub const IDENTIFY_TIMEOUT: Duration = Duration::from_secs(30);
