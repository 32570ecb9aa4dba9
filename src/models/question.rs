use serde::Serialize;

/// A fixed connection question. Its winner earns the attached badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub label: &'static str,
    pub badge_title: &'static str,
    pub badge_emoji: &'static str,
}

pub const QUESTIONS: &[Question] = &[
    Question {
        id: "coffee",
        label: "Who would you like to have coffee with?",
        badge_title: "Coffee Buddy",
        badge_emoji: "☕",
    },
    Question {
        id: "roadtrip",
        label: "Who would you go on a road trip with?",
        badge_title: "Road Trip Star",
        badge_emoji: "🚗",
    },
    Question {
        id: "ignore",
        label: "Whose text would you ignore?",
        badge_title: "Ghosted Most",
        badge_emoji: "📵",
    },
    Question {
        id: "trust",
        label: "Who do you trust the most?",
        badge_title: "Most Trusted",
        badge_emoji: "🤝",
    },
    Question {
        id: "time",
        label: "Who do you want to spend more time with?",
        badge_title: "Most Wanted Time",
        badge_emoji: "⏳",
    },
    Question {
        id: "crime",
        label: "Who is your partner in crime?",
        badge_title: "Partner-in-Crime Magnet",
        badge_emoji: "🕵️",
    },
    Question {
        id: "admire",
        label: "Who do you admire & love for their capabilities?",
        badge_title: "Most Admired",
        badge_emoji: "❤️",
    },
    Question {
        id: "fun",
        label: "Who is the most fun person?",
        badge_title: "Most Fun",
        badge_emoji: "🎉",
    },
];

pub fn find(question_id: &str) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == question_id)
}
