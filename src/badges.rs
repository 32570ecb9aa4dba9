//! Badge computation.
//!
//! Connection badges are derived from the current answer set every time they
//! are requested; nothing here is persisted.

use sqlx::SqlitePool;
use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::db;
use crate::error::AppError;
use crate::models::answer::Answer;
use crate::models::badge::{Achievement, BadgeWinner, MemberActivity};
use crate::models::member::Member;
use crate::models::question::{Question, QUESTIONS};

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "wishlist",
        title: "Wishlist Pro",
        emoji: "🎖",
    },
    Achievement {
        id: "message",
        title: "Message Hero",
        emoji: "🏆",
    },
    Achievement {
        id: "game",
        title: "Game Player",
        emoji: "🎮",
    },
    Achievement {
        id: "roast_sent",
        title: "Sharp Tongue",
        emoji: "🔥",
    },
    Achievement {
        id: "roast_received",
        title: "Survivor",
        emoji: "💥",
    },
];

/// Loads members and answers and computes the current winners.
pub async fn load_winners(pool: &SqlitePool) -> Result<Vec<BadgeWinner>, AppError> {
    let members: Vec<Member> = db::members::list_members(pool)
        .await?
        .iter()
        .map(|row| row.to_public())
        .collect();
    let answers = db::answers::list_all(pool).await?;
    Ok(compute_winners(&members, &answers))
}

/// Winners for every fixed question, in question order.
pub fn compute_winners(members: &[Member], answers: &[Answer]) -> Vec<BadgeWinner> {
    QUESTIONS
        .iter()
        .filter_map(|q| winner_for(q, members, answers))
        .collect()
}

/// Only non-admin members are candidates. Votes for anyone else are dropped.
/// Ties go to the lowest member id, compared as numbers when ids are numeric
/// so "9" beats "10".
pub fn winner_for(question: &Question, members: &[Member], answers: &[Answer]) -> Option<BadgeWinner> {
    let mut counts: BTreeMap<&str, u32> = members
        .iter()
        .filter(|m| !m.is_admin)
        .map(|m| (m.id.as_str(), 0))
        .collect();

    for answer in answers.iter().filter(|a| a.question_id == question.id) {
        if let Some(count) = counts.get_mut(answer.target_id.as_str()) {
            *count += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, votes)| *votes > 0)
        .max_by_key(|(member_id, votes)| (*votes, Reverse(id_order(*member_id))))
        .map(|(member_id, votes)| BadgeWinner {
            question_id: question.id,
            title: question.badge_title,
            emoji: question.badge_emoji,
            member_id: member_id.to_string(),
            votes,
        })
}

fn id_order(id: &str) -> (Option<u64>, &str) {
    (id.parse().ok(), id)
}

pub fn achievements_for(activity: &MemberActivity) -> Vec<Achievement> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| match a.id {
            "wishlist" => activity.wishlist_items > 0,
            "message" => activity.wall_posts > 0,
            "game" => activity.answers > 0,
            "roast_sent" => activity.roasts_sent > 0,
            "roast_received" => activity.roasts_received > 0,
            _ => false,
        })
        .copied()
        .collect()
}
