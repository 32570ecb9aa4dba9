use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: String,
    pub member_id: String,
    pub title: String,
    pub note: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateWishlistItem {
    pub title: String,
    pub note: Option<String>,
}
