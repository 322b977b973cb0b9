//! Scripted persona contributions.
//!
//! Keyed by `(persona, session type)`. A persona without lines for a type
//! speaks from its `brainstorm` pool; a persona with no pool at all (a
//! roster member without compiled lines) uses [`GENERIC`]. Lines may contain
//! `{topic}`.

use crate::core::string::fill_topic;
use crate::session::entities::SessionType;
use rand::Rng;
use rand::seq::SliceRandom;

type Pool = &'static [&'static str];

const GENERIC: Pool = &[
    "On {topic}: I can take a piece of this, let me know what you need from me.",
    "I like where {topic} is going. Let's keep it simple for the first week.",
];

const POOLS: &[(&str, SessionType, Pool)] = &[
    // music_editor
    (
        "music_editor",
        SessionType::Brainstorm,
        &[
            "For {topic} I'd build a playlist around three anchor tracks and rotate the rest weekly.",
            "{topic} could work with a genre-hopping hour. Listeners love a surprise.",
            "Let's test {topic} with a one-off special before committing airtime.",
        ],
    ),
    (
        "music_editor",
        SessionType::Rubric,
        &[
            "A rubric on {topic} needs a signature track. I'll shortlist five options.",
            "Keep the {topic} rubric under six minutes so it fits between two songs.",
        ],
    ),
    (
        "music_editor",
        SessionType::Review,
        &[
            "Rotation fatigue is showing. For {topic} I'd refresh a third of the heavy list.",
            "Two tracks got too many skips this week; I'll pull them from {topic}.",
        ],
    ),
    // news_editor
    (
        "news_editor",
        SessionType::Brainstorm,
        &[
            "There's a local news angle on {topic} we shouldn't miss.",
            "I can pair {topic} with a short interview from our reporters.",
        ],
    ),
    (
        "news_editor",
        SessionType::News,
        &[
            "For {topic} I'd lead with the local impact, then national context.",
            "Let's keep {topic} to ninety seconds with one sound bite.",
            "I'll have two verified sources on {topic} before we go on air.",
        ],
    ),
    (
        "news_editor",
        SessionType::Schedule,
        &["Top-of-the-hour news must stay fixed whatever we do with {topic}."],
    ),
    // host
    (
        "host",
        SessionType::Brainstorm,
        &[
            "I'd love to open {topic} live with a listener call-in.",
            "{topic} needs a catchy on-air name. Give me a day to pitch three.",
            "Let me try {topic} as a running gag across the morning show.",
        ],
    ),
    (
        "host",
        SessionType::Rubric,
        &["I can voice the {topic} rubric, but the intro has to be under twenty seconds."],
    ),
    (
        "host",
        SessionType::Review,
        &["Honestly, the pacing on {topic} felt rushed. I want more room for listener calls."],
    ),
    // sound_engineer
    (
        "sound_engineer",
        SessionType::Brainstorm,
        &[
            "From the studio side {topic} is doable; I'll need one extra mic setup.",
            "If {topic} goes live outside, I'll prep the remote kit.",
        ],
    ),
    (
        "sound_engineer",
        SessionType::Schedule,
        &["Any move around {topic} must leave me a ten-minute changeover window."],
    ),
    (
        "sound_engineer",
        SessionType::Review,
        &["Levels drifted during {topic}. I'll recalibrate the loudness chain."],
    ),
    // marketing
    (
        "marketing",
        SessionType::Brainstorm,
        &[
            "{topic} is very shareable. I'll plan short clips for socials.",
            "We could find a partner brand for {topic} and cover part of the costs.",
        ],
    ),
    (
        "marketing",
        SessionType::Rubric,
        &["Give the {topic} rubric a hashtag and I'll run a teaser week."],
    ),
    // analyst
    (
        "analyst",
        SessionType::Brainstorm,
        &[
            "Our 25-34 audience peaks in the evening; {topic} should target that window.",
            "I'll set up a before/after comparison so we know if {topic} works.",
        ],
    ),
    (
        "analyst",
        SessionType::Schedule,
        &["Data says weekday mornings are our strongest slot. Don't move {topic} there blindly."],
    ),
    (
        "analyst",
        SessionType::Review,
        &["Listening time rose four percent after {topic}. Retention after 9pm still dips."],
    ),
];

fn lookup(persona_id: &str, session_type: SessionType) -> Option<Pool> {
    POOLS
        .iter()
        .find(|(id, t, _)| *id == persona_id && *t == session_type)
        .map(|(.., pool)| *pool)
}

/// Pool for `(persona, type)`, falling back to `brainstorm`, then to [`GENERIC`]
pub fn contribution_pool(persona_id: &str, session_type: SessionType) -> Pool {
    lookup(persona_id, session_type)
        .or_else(|| lookup(persona_id, SessionType::Brainstorm))
        .unwrap_or(GENERIC)
}

/// Draw one scripted line and fill in the topic
pub fn pick_contribution<R: Rng + ?Sized>(
    rng: &mut R,
    persona_id: &str,
    session_type: SessionType,
    topic: &str,
) -> String {
    let line = contribution_pool(persona_id, session_type)
        .choose(rng)
        .copied()
        .unwrap_or(GENERIC[0]);
    fill_topic(line, topic)
}
