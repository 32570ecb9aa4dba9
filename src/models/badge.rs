use serde::Serialize;

/// Winner of one connection question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeWinner {
    pub question_id: &'static str,
    pub title: &'static str,
    pub emoji: &'static str,
    pub member_id: String,
    pub votes: u32,
}

/// Activity badge unlocked by a member's own actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub emoji: &'static str,
}

/// Per-member activity counts used to unlock achievements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberActivity {
    pub wishlist_items: i64,
    pub wall_posts: i64,
    pub answers: i64,
    pub roasts_sent: i64,
    pub roasts_received: i64,
}
