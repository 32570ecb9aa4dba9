use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::badge::MemberActivity;

pub async fn member_activity(
    pool: &SqlitePool,
    member_id: &str,
) -> Result<MemberActivity, AppError> {
    let row = sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(
        "SELECT \
         (SELECT COUNT(*) FROM wishlist_items WHERE member_id = ?1), \
         (SELECT COUNT(*) FROM wall_messages WHERE author_id = ?1), \
         (SELECT COUNT(*) FROM answers WHERE voter_id = ?1), \
         (SELECT COUNT(*) FROM roasts WHERE sender_id = ?1), \
         (SELECT COUNT(*) FROM roasts WHERE recipient_id = ?1 AND released = 1)",
    )
    .bind(member_id)
    .fetch_one(pool)
    .await?;

    Ok(MemberActivity {
        wishlist_items: row.0,
        wall_posts: row.1,
        answers: row.2,
        roasts_sent: row.3,
        roasts_received: row.4,
    })
}
