use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallMessage {
    pub id: String,
    pub author_id: String,
    pub body: String,
    pub likes: i64,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateWallMessage {
    pub body: String,
}
