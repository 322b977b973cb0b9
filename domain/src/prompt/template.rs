//! Prompt templates for the coordinator and persona calls

use crate::analysis::{AnalysisCategory, PersonaContribution};
use crate::persona::entities::Persona;
use crate::script::templates::area_of_responsibility;
use crate::session::deliverable::Deliverable;
use crate::session::entities::{Session, SessionType};
use crate::session::synthesis::{Contribution, MAX_DELIVERABLES, MIN_DELIVERABLES};

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    fn roster_lines(roster: &[Persona]) -> String {
        roster
            .iter()
            .map(|p| format!("- {} [{}]", p.label(), p.id))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// System prompt for the coordinator: role plus the team it works with
    pub fn coordinator_system(coordinator: &Persona, roster: &[Persona]) -> String {
        format!(
            r#"You are {name}, the {role} of a radio station.
You run editorial meetings, turn the team's ideas into concrete decisions and
write clear, practical outputs that the station can act on.

Your team:
{team}

Be concise and specific. Refer to team members by name."#,
            name = coordinator.name,
            role = coordinator.role.to_lowercase(),
            team = Self::roster_lines(roster),
        )
    }

    /// User prompt asking the coordinator to synthesize a session
    pub fn synthesis_request(
        session_type: SessionType,
        topic: &str,
        contributions: &[Contribution],
    ) -> String {
        let mut prompt = format!(
            "Session: {}\nTopic: {}\n\nThe team said:\n",
            session_type.display_name(),
            topic
        );
        for c in contributions {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", c.persona_label, c.text));
        }
        prompt.push_str(&format!(
            r#"
Synthesize the discussion. Respond with JSON only, in exactly this shape:
{{
  "summary": "two or three sentences",
  "report": "a short structured report",
  "deliverables": [
    {{"type": "idea|rubric|playlist|action_items|schedule", "title": "...", "content": "...", "priority": "low|medium|high"}}
  ]
}}
Produce between {MIN_DELIVERABLES} and {MAX_DELIVERABLES} deliverables."#
        ));
        prompt
    }

    /// User prompt asking the coordinator for an implementation plan
    pub fn plan_request(session: &Session, approved: &[Deliverable]) -> String {
        let mut prompt = format!(
            "The {} on \"{}\" was approved with these deliverables:\n",
            session.session_type.display_name().to_lowercase(),
            session.topic
        );
        for d in approved {
            prompt.push_str(&format!(
                "\n--- {} ({}, {} priority) ---\n{}\n",
                d.title,
                d.kind,
                d.priority.as_str(),
                d.content
            ));
        }
        if let Some(feedback) = session.feedback.as_deref().filter(|f| !f.is_empty()) {
            prompt.push_str(&format!("\nManagement feedback: {feedback}\n"));
        }
        prompt.push_str(
            r#"
Write an implementation plan. Respond with JSON only, in exactly this shape:
{
  "title": "...",
  "plan": "a short paragraph",
  "steps": [
    {"step": "...", "assignee": "team member id", "deadline": "..."}
  ]
}"#,
        );
        prompt
    }

    /// System prompt for one persona's part of the compiled analysis
    pub fn analysis_system(persona: &Persona) -> String {
        format!(
            "You are {}, the {} of a radio station. You are responsible for {}. \
             Answer as yourself, in at most five short bullet points.",
            persona.name,
            persona.role.to_lowercase(),
            area_of_responsibility(&persona.id)
        )
    }

    pub fn analysis_request(persona: &Persona) -> String {
        format!(
            "Review the current state of {} at our station. \
             What works, what does not, and what would you change next month?",
            area_of_responsibility(&persona.id)
        )
    }

    /// User prompt asking the coordinator to merge every persona's analysis
    pub fn merge_request(contributions: &[PersonaContribution]) -> String {
        let mut prompt = String::from("Your team sent these analyses:\n");
        for c in contributions {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", c.persona_name, c.text));
        }
        let keys = AnalysisCategory::ALL
            .iter()
            .map(|c| format!("    \"{}\": [\"...\"]", c.as_str()))
            .collect::<Vec<_>>()
            .join(",\n");
        prompt.push_str(&format!(
            r#"
Merge them into one station report. Respond with JSON only, in exactly this shape:
{{
  "summary": "...",
  "categories": {{
{keys}
  }}
}}
Give 2 to 4 concrete suggestions per category."#
        ));
        prompt
    }

    pub fn connection_test_system() -> &'static str {
        "You are a connectivity check. Reply with a single short sentence."
    }

    pub fn connection_test_prompt() -> &'static str {
        "Say hello and name the model you are."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::defaults::default_team;

    #[test]
    fn coordinator_system_lists_roster() {
        let team = default_team();
        let prompt = PromptTemplate::coordinator_system(&team[0], &team);
        assert!(prompt.contains("Vera"));
        assert!(prompt.contains("[sound_engineer]"));
    }

    #[test]
    fn synthesis_request_attributes_contributions() {
        let prompt = PromptTemplate::synthesis_request(
            SessionType::Rubric,
            "90s hits",
            &[Contribution::new("host", "Leo (Host)", "Call-ins!")],
        );
        assert!(prompt.contains("--- Leo (Host) ---\nCall-ins!"));
        assert!(prompt.contains("\"deliverables\""));
        assert!(prompt.contains("between 2 and 5"));
    }

    #[test]
    fn merge_request_names_every_category() {
        let prompt = PromptTemplate::merge_request(&[]);
        for c in AnalysisCategory::ALL {
            assert!(prompt.contains(c.as_str()));
        }
    }
}
