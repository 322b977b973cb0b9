//! Compiled cross-agent analysis.
//!
//! Every non-coordinator persona contributes a short analysis of its own
//! area; the coordinator merges them into one report with a fixed set of
//! suggestion categories. Only the latest report is kept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIN_SUGGESTIONS: usize = 2;
pub const MAX_SUGGESTIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisCategory {
    Programming,
    Rubrics,
    MusicFormat,
    NewRotations,
    Technical,
    Marketing,
}

impl AnalysisCategory {
    pub const ALL: [AnalysisCategory; 6] = [
        AnalysisCategory::Programming,
        AnalysisCategory::Rubrics,
        AnalysisCategory::MusicFormat,
        AnalysisCategory::NewRotations,
        AnalysisCategory::Technical,
        AnalysisCategory::Marketing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisCategory::Programming => "programming",
            AnalysisCategory::Rubrics => "rubrics",
            AnalysisCategory::MusicFormat => "music_format",
            AnalysisCategory::NewRotations => "new_rotations",
            AnalysisCategory::Technical => "technical",
            AnalysisCategory::Marketing => "marketing",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisCategory::Programming => "Programming",
            AnalysisCategory::Rubrics => "Rubrics",
            AnalysisCategory::MusicFormat => "Music format",
            AnalysisCategory::NewRotations => "New rotations",
            AnalysisCategory::Technical => "Technical",
            AnalysisCategory::Marketing => "Marketing",
        }
    }

    /// Lenient lookup used by the report parser (`music-format`, `Music Format`...)
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Self::ALL.into_iter().find(|c| c.as_str() == key)
    }
}

impl std::fmt::Display for AnalysisCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One persona's input to the compiled analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaContribution {
    pub persona_id: String,
    pub persona_name: String,
    pub text: String,
    #[serde(rename = "isAIGenerated")]
    pub is_ai_generated: bool,
}

pub type CategoryMap = BTreeMap<AnalysisCategory, Vec<String>>;

/// The coordinator's merged report, as produced (before persistence)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisDraft {
    pub summary: String,
    pub categories: CategoryMap,
}

impl AnalysisDraft {
    /// Force every category to hold between 2 and 4 suggestions, topping up
    /// from `template` where the model produced too few.
    pub fn normalized(mut self, template: &CategoryMap) -> Self {
        for category in AnalysisCategory::ALL {
            let entry = self.categories.entry(category).or_default();
            entry.retain(|s| !s.trim().is_empty());
            if entry.len() < MIN_SUGGESTIONS
                && let Some(fill) = template.get(&category)
            {
                for suggestion in fill {
                    if entry.len() >= MIN_SUGGESTIONS {
                        break;
                    }
                    if !entry.contains(suggestion) {
                        entry.push(suggestion.clone());
                    }
                }
            }
            entry.truncate(MAX_SUGGESTIONS);
        }
        self
    }
}

/// Persisted "latest analysis" record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledAnalysis {
    pub id: String,
    pub summary: String,
    pub categories: CategoryMap,
    pub contributions: Vec<PersonaContribution>,
    #[serde(rename = "isAIGenerated")]
    pub is_ai_generated: bool,
    pub created_at: DateTime<Utc>,
}

impl CompiledAnalysis {
    pub fn new(
        id: impl Into<String>,
        draft: AnalysisDraft,
        contributions: Vec<PersonaContribution>,
        is_ai_generated: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            summary: draft.summary,
            categories: draft.categories,
            contributions,
            is_ai_generated,
            created_at,
        }
    }
}
