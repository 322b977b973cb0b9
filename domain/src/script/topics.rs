//! Topic pools drawn from when a session is started without a topic

use crate::session::entities::SessionType;
use rand::Rng;
use rand::seq::SliceRandom;

const BRAINSTORM: &[&str] = &[
    "A weekend slot for local bands",
    "Reviving the late-night request show",
    "A listener-curated morning playlist",
    "Podcast spin-offs from our best interviews",
    "A summer festival tie-in week",
    "Bringing back vinyl Fridays",
];

const NEWS: &[&str] = &[
    "Morning headlines format refresh",
    "Covering the city council budget vote",
    "Weather and traffic inserts at rush hour",
    "A weekly local culture digest",
    "Breaking-news interruption policy",
];

const RUBRIC: &[&str] = &[
    "A new rubric about forgotten hits of the 90s",
    "Five-minute artist spotlight",
    "Listener stories between tracks",
    "Behind the song: short production stories",
    "Neighbourhood sound portraits",
];

const SCHEDULE: &[&str] = &[
    "Rebalancing the weekday grid",
    "Holiday week programming",
    "Moving the evening talk block",
    "Overnight automation windows",
    "Weekend schedule for the winter season",
];

const REVIEW: &[&str] = &[
    "Last week's on-air performance",
    "Listener feedback from the past month",
    "Jingle rotation and station imaging",
    "Morning show pacing",
    "Audience numbers after the grid change",
];

pub fn topic_pool(session_type: SessionType) -> &'static [&'static str] {
    match session_type {
        SessionType::Brainstorm => BRAINSTORM,
        SessionType::News => NEWS,
        SessionType::Rubric => RUBRIC,
        SessionType::Schedule => SCHEDULE,
        SessionType::Review => REVIEW,
    }
}

/// Uniform draw from the session type's pool
pub fn pick_topic<R: Rng + ?Sized>(rng: &mut R, session_type: SessionType) -> String {
    topic_pool(session_type)
        .choose(rng)
        .copied()
        .unwrap_or(session_type.display_name())
        .to_string()
}
