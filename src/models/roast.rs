use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roast {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub message: String,
    pub released: bool,
    pub released_at: Option<String>,
    pub created_at: String,
}

/// What a recipient sees: the letter, never who wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivedRoast {
    pub id: String,
    pub message: String,
    pub released_at: Option<String>,
}

impl Roast {
    pub fn to_received(&self) -> ReceivedRoast {
        ReceivedRoast {
            id: self.id.clone(),
            message: self.message.clone(),
            released_at: self.released_at.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRoast {
    pub message: String,
}
