mod admin;
mod answers;
mod auth;
mod badges;
mod health;
mod members;
mod questions;
mod roasts;
mod test_seed;
pub mod wall;
mod wishlists;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ws", get(crate::gateway::ws_upgrade))
        .route("/test/seed", post(test_seed::seed))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/version", get(health::version))
        // Auth
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Members
        .route("/members", get(members::list_members))
        .route("/members/@me", get(members::get_current_member))
        .route("/members/{member_id}", get(members::get_member))
        .route(
            "/members/{member_id}/wishlist",
            get(wishlists::list_member_wishlist),
        )
        // Wishlists
        .route(
            "/wishlists",
            get(wishlists::list_wishlists).post(wishlists::create_item),
        )
        .route("/wishlists/{item_id}", delete(wishlists::delete_item))
        // Questions and answers
        .route("/questions", get(questions::list_questions))
        .route("/answers", get(answers::list_all_answers))
        .route("/answers/@me", get(answers::list_own_answers))
        .route("/answers/@me/lock", post(answers::lock_answers))
        .route("/answers/@me/{question_id}", put(answers::save_answer))
        // Badges
        .route("/badges", get(badges::list_badges))
        .route("/badges/@me", get(badges::own_badges))
        // Roasts
        .route("/roasts", get(roasts::list_all).post(roasts::create_roast))
        .route("/roasts/sent", get(roasts::list_sent))
        .route("/roasts/received", get(roasts::list_received))
        .route("/roasts/release-all", post(roasts::release_all))
        .route("/roasts/{roast_id}/release", post(roasts::release_roast))
        // Wall
        .route("/wall", get(wall::list_messages).post(wall::create_message))
        .route("/wall/{message_id}/like", put(wall::like_message))
        // Admin
        .route("/admin/members", get(admin::list_members))
        .route(
            "/admin/members/{member_id}/assignments",
            patch(admin::update_assignments),
        )
}
