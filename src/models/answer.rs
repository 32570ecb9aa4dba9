use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub voter_id: String,
    pub question_id: String,
    pub target_id: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveAnswer {
    pub target_id: String,
}
