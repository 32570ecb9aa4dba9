use serde::{Deserialize, Serialize};

use crate::models::answer::Answer;
use crate::models::badge::BadgeWinner;
use crate::models::roast::{ReceivedRoast, Roast};
use crate::models::wall::WallMessage;
use crate::models::wishlist::WishlistItem;

/// Opcodes for gateway messages.
pub mod opcode {
    pub const EVENT: u8 = 0;
    pub const HEARTBEAT: u8 = 1;
    pub const IDENTIFY: u8 = 2;
    pub const HEARTBEAT_ACK: u8 = 3;
    pub const HELLO: u8 = 4;
    pub const INVALID_SESSION: u8 = 5;
}

/// Gateway message envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub op: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// IDENTIFY payload data.
#[derive(Debug, Deserialize)]
pub struct IdentifyData {
    pub token: String,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
}

/// A single state change, serialized as `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ChangeEvent {
    #[serde(rename = "wishlist.create")]
    WishlistCreate(WishlistItem),
    #[serde(rename = "wishlist.delete")]
    WishlistDelete { id: String, member_id: String },
    #[serde(rename = "roast.create")]
    RoastCreate(Roast),
    #[serde(rename = "roast.update")]
    RoastUpdate(Roast),
    /// Recipient-facing copy of a released roast. Never names the sender.
    #[serde(rename = "roast.received")]
    RoastReceived(ReceivedRoast),
    #[serde(rename = "answer.upsert")]
    AnswerUpsert(Answer),
    #[serde(rename = "badges.update")]
    BadgesUpdate(Vec<BadgeWinner>),
    #[serde(rename = "assignment.update")]
    AssignmentUpdate {
        member_id: String,
        santa_for: Option<String>,
        roast_target: Option<String>,
    },
    #[serde(rename = "wall.create")]
    WallCreate(WallMessage),
    #[serde(rename = "wall.like")]
    WallLike { id: String, likes: i64 },
}

impl ChangeEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ChangeEvent::WishlistCreate(_) => "wishlist.create",
            ChangeEvent::WishlistDelete { .. } => "wishlist.delete",
            ChangeEvent::RoastCreate(_) => "roast.create",
            ChangeEvent::RoastUpdate(_) => "roast.update",
            ChangeEvent::RoastReceived(_) => "roast.received",
            ChangeEvent::AnswerUpsert(_) => "answer.upsert",
            ChangeEvent::BadgesUpdate(_) => "badges.update",
            ChangeEvent::AssignmentUpdate { .. } => "assignment.update",
            ChangeEvent::WallCreate(_) => "wall.create",
            ChangeEvent::WallLike { .. } => "wall.like",
        }
    }

    /// Wraps the event in an EVENT envelope carrying `seq`.
    pub fn to_envelope(&self, seq: u64) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert("op".to_string(), serde_json::json!(opcode::EVENT));
            obj.insert("seq".to_string(), serde_json::json!(seq));
        }
        value
    }
}

/// Who may see a broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    Everyone,
    Members(Vec<String>),
    MembersAndAdmins(Vec<String>),
}

impl Audience {
    pub fn reaches(&self, member_id: &str, is_admin: bool) -> bool {
        match self {
            Audience::Everyone => true,
            Audience::Members(ids) => ids.iter().any(|id| id == member_id),
            Audience::MembersAndAdmins(ids) => is_admin || ids.iter().any(|id| id == member_id),
        }
    }
}

/// Broadcast message sent through the gateway channel.
#[derive(Debug, Clone)]
pub struct Broadcast {
    pub audience: Audience,
    pub event: ChangeEvent,
}
