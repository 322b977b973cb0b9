//! Deterministic texts: coordinator turns and the offline fallbacks used
//! whenever an AI call or its parse fails.

use crate::analysis::{AnalysisCategory, AnalysisDraft, CategoryMap};
use crate::core::string::truncate_chars;
use crate::persona::defaults::COORDINATOR_ID;
use crate::session::deliverable::{Deliverable, DeliverableDraft, Priority};
use crate::session::entities::{Session, SessionType};
use crate::session::synthesis::{Contribution, SynthesisDraft};
use crate::task::{PlanDraft, TaskStep};

/// Coordinator's opening line; deterministic for a given type/topic/team
pub fn opening_message(session_type: SessionType, topic: &str, participant_names: &[String]) -> String {
    let team = if participant_names.is_empty() {
        "everyone".to_string()
    } else {
        participant_names.join(", ")
    };
    format!(
        "Good morning, {team}. Today's {} is about \"{topic}\". \
         Give me your take from your own desk, short and concrete.",
        session_type.display_name().to_lowercase()
    )
}

/// Coordinator's closing line carrying the synthesis
pub fn closing_message(summary: &str, report: &str) -> String {
    format!("Thanks, team. Summary: {summary}\n\n{report}")
}

fn excerpt(c: &Contribution) -> String {
    format!("{}: {}", c.persona_label, truncate_chars(&c.text, 160))
}

/// Offline synthesis built from the literal contributions
pub fn template_synthesis(
    session_type: SessionType,
    topic: &str,
    contributions: &[Contribution],
) -> SynthesisDraft {
    let report = if contributions.is_empty() {
        format!("No contributions were recorded for \"{topic}\".")
    } else {
        let lines: Vec<String> = contributions.iter().map(excerpt).collect();
        format!("Team input on \"{topic}\":\n{}", lines.join("\n"))
    };
    SynthesisDraft {
        summary: format!(
            "{} on \"{topic}\" with {} contribution(s). Automatic summary, AI synthesis unavailable.",
            session_type.display_name(),
            contributions.len()
        ),
        report,
        deliverables: template_deliverables(session_type, topic, contributions),
    }
}

/// The fixed pair of deliverables used by the offline synthesis and for padding
pub fn template_deliverables(
    session_type: SessionType,
    topic: &str,
    contributions: &[Contribution],
) -> Vec<DeliverableDraft> {
    let ideas = if contributions.is_empty() {
        "- (no input)".to_string()
    } else {
        contributions
            .iter()
            .map(|c| format!("- {}", excerpt(c)))
            .collect::<Vec<_>>()
            .join("\n")
    };
    vec![
        DeliverableDraft::new(
            session_type.as_str(),
            format!("Proposal: {topic}"),
            format!("Collected proposals from the {}:\n{ideas}", session_type.display_name().to_lowercase()),
            Priority::High,
        ),
        DeliverableDraft::new(
            "action_items",
            format!("Next steps: {topic}"),
            "1. Producer reviews the proposals\n2. Owners confirm feasibility\n3. Pilot on air next week"
                .to_string(),
            Priority::Medium,
        ),
    ]
}

/// Offline implementation plan: one step per approved deliverable plus a review step
pub fn template_plan(session: &Session, approved: &[Deliverable]) -> PlanDraft {
    let mut steps: Vec<TaskStep> = approved
        .iter()
        .enumerate()
        .map(|(i, d)| {
            TaskStep::new(
                format!("Implement: {}", d.title),
                COORDINATOR_ID,
                format!("Week {}", i + 1),
            )
        })
        .collect();
    steps.push(TaskStep::new(
        "Review results on air and collect feedback",
        "analyst",
        format!("Week {}", approved.len() + 1),
    ));
    PlanDraft {
        title: format!("Implementation: {}", session.topic),
        plan: format!(
            "Roll out {} approved item(s) from the {} on \"{}\" one per week, then review.",
            approved.len(),
            session.session_type.display_name().to_lowercase(),
            session.topic
        ),
        steps,
    }
}

/// What each persona is asked to analyse in the compiled analysis
pub fn area_of_responsibility(persona_id: &str) -> &'static str {
    match persona_id {
        "music_editor" => "music format, playlists and new rotations",
        "news_editor" => "news blocks, information programming and rubrics",
        "host" => "on-air presentation, show pacing and listener interaction",
        "sound_engineer" => "audio quality, studio equipment and technical operations",
        "marketing" => "promotion, social media and partnerships",
        "analyst" => "audience data, ratings and listening trends",
        _ => "the station's overall programming",
    }
}

/// Offline stand-in for a persona whose analysis call failed
pub fn template_contribution(persona_name: &str, persona_id: &str) -> String {
    format!(
        "{persona_name} has no fresh analysis this time. Ongoing focus: {}.",
        area_of_responsibility(persona_id)
    )
}

/// Baseline suggestions per category, also used to pad thin AI reports
pub fn template_categories() -> CategoryMap {
    AnalysisCategory::ALL
        .into_iter()
        .map(|c| {
            let suggestions: &[&str] = match c {
                AnalysisCategory::Programming => &[
                    "Audit the weekday grid for overlapping talk segments",
                    "Pilot one new evening show for four weeks",
                ],
                AnalysisCategory::Rubrics => &[
                    "Retire the lowest-rated rubric",
                    "Test a short listener-stories rubric",
                ],
                AnalysisCategory::MusicFormat => &[
                    "Reduce heavy rotation repeats during drive time",
                    "Add a weekly local music hour",
                ],
                AnalysisCategory::NewRotations => &[
                    "Add three new releases to light rotation",
                    "Review listener requests for rotation candidates",
                ],
                AnalysisCategory::Technical => &[
                    "Recalibrate loudness across all studios",
                    "Schedule a backup stream failover test",
                ],
                AnalysisCategory::Marketing => &[
                    "Publish weekly highlight clips on social media",
                    "Approach one local partner for a co-branded segment",
                ],
            };
            (c, suggestions.iter().map(|s| s.to_string()).collect())
        })
        .collect()
}

/// Offline compiled analysis
pub fn template_analysis(contributor_count: usize) -> AnalysisDraft {
    AnalysisDraft {
        summary: format!(
            "Automatic station overview from {contributor_count} team member(s). AI merge unavailable."
        ),
        categories: template_categories(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn contributions() -> Vec<Contribution> {
        vec![
            Contribution::new("host", "🎙️ Leo (Morning host)", "Let's do a call-in."),
            Contribution::new("marketing", "📣 Sasha (Marketing lead)", "Clips for socials."),
        ]
    }

    #[test]
    fn template_synthesis_has_two_deliverables_built_from_input() {
        let s = template_synthesis(SessionType::Brainstorm, "X", &contributions());
        assert_eq!(s.deliverables.len(), 2);
        assert!(s.report.contains("Let's do a call-in."));
        assert!(s.deliverables[0].content.contains("Clips for socials."));
        assert!(s.summary.contains("2 contribution(s)"));
    }

    #[test]
    fn opening_message_is_deterministic() {
        let names = vec!["Leo".to_string(), "Sasha".to_string()];
        assert_eq!(
            opening_message(SessionType::News, "Budget", &names),
            opening_message(SessionType::News, "Budget", &names)
        );
    }

    #[test]
    fn template_plan_has_step_per_deliverable_plus_review() {
        let now = Utc::now();
        let session = Session::new("s1", SessionType::Rubric, "90s hits", vec![], now);
        let approved = vec![Deliverable::pending(
            "d1",
            "s1",
            DeliverableDraft::new("rubric", "Forgotten hits", "c", Priority::High),
            now,
        )];
        let plan = template_plan(&session, &approved);
        assert_eq!(plan.steps.len(), 2);
        assert!(plan.steps[0].step.contains("Forgotten hits"));
    }

    #[test]
    fn template_categories_cover_all_six() {
        let cats = template_categories();
        assert_eq!(cats.len(), 6);
        assert!(cats.values().all(|v| v.len() >= 2));
    }
}
