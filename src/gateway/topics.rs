/// Every topic a session may subscribe to.
pub const ALL_TOPICS: &[&str] = &["wishlists", "roasts", "answers", "badges", "members", "wall"];

/// Map an event type to the topic that carries it.
pub fn topic_for_event(event_type: &str) -> Option<&'static str> {
    match event_type {
        "wishlist.create" | "wishlist.delete" => Some("wishlists"),
        "roast.create" | "roast.update" | "roast.received" => Some("roasts"),
        "answer.upsert" => Some("answers"),
        "badges.update" => Some("badges"),
        "assignment.update" => Some("members"),
        "wall.create" | "wall.like" => Some("wall"),
        _ => None,
    }
}

/// Resolve an IDENTIFY topic list. Unknown names are dropped; a list that is
/// omitted, empty, or left empty after dropping subscribes to everything.
pub fn resolve(requested: Option<Vec<String>>) -> Vec<String> {
    let mut topics: Vec<String> = requested
        .unwrap_or_default()
        .into_iter()
        .filter(|t| ALL_TOPICS.contains(&t.as_str()))
        .collect();
    if topics.is_empty() {
        return ALL_TOPICS.iter().map(|t| t.to_string()).collect();
    }
    topics.sort();
    topics.dedup();
    topics
}

/// Whether a session subscribed to `topics` should receive `event_type`.
pub fn wants(topics: &[String], event_type: &str) -> bool {
    match topic_for_event(event_type) {
        Some(topic) => topics.iter().any(|t| t == topic),
        None => true,
    }
}
