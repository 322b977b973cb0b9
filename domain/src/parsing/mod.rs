//! Defensive extraction of structured answers from model text.
//!
//! Models wrap JSON in prose and code fences, emit numbers where strings
//! were asked for, and nest reports as objects. Every parser here accepts
//! all of that and only fails when no usable object is present; callers
//! recover from any [`ParseError`] with a template.

use crate::analysis::{AnalysisCategory, AnalysisDraft, CategoryMap};
use crate::session::deliverable::{DeliverableDraft, Priority};
use crate::session::synthesis::SynthesisDraft;
use crate::task::{PlanDraft, TaskStep};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no JSON object found in response")]
    NoObject,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("missing or empty field: {0}")]
    MissingField(&'static str),
}

/// Remove a surrounding markdown code fence (```json ... ```), if any
pub fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string (e.g. `json`) on the fence line
    let body = rest.split_once('\n').map(|(_, b)| b).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// The first balanced `{...}` in `text`, ignoring braces inside strings
pub fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Strip fences, locate the object and decode it
pub fn decode_object(text: &str) -> Result<Value, ParseError> {
    let body = strip_fences(text);
    let object = extract_object(body).ok_or(ParseError::NoObject)?;
    let value: Value =
        serde_json::from_str(object).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(ParseError::NoObject)
    }
}

/// Render any JSON value as prose: strings as-is, arrays line by line,
/// objects as `key: value` lines. Empty results are `None`.
pub fn json_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(json_text)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => map
            .iter()
            .filter_map(|(k, v)| json_text(v).map(|t| format!("{k}: {t}")))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    (!text.is_empty()).then_some(text)
}

fn field_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| value.get(*k).and_then(json_text))
}

/// `{summary, report, deliverables:[{type,title,content,priority}]}`
///
/// The deliverable count is not enforced here; see
/// [`SynthesisDraft::fit_deliverables`].
pub fn parse_synthesis(text: &str) -> Result<SynthesisDraft, ParseError> {
    let json = decode_object(text)?;
    let summary = field_text(&json, &["summary"]).ok_or(ParseError::MissingField("summary"))?;
    let report = field_text(&json, &["report"]).unwrap_or_default();

    let deliverables = json
        .get("deliverables")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let title = field_text(item, &["title", "name"])?;
                    let kind = field_text(item, &["type", "kind"]).unwrap_or_else(|| "idea".into());
                    let content =
                        field_text(item, &["content", "description"]).unwrap_or_default();
                    let priority = item
                        .get("priority")
                        .and_then(Value::as_str)
                        .map(Priority::parse_lenient)
                        .unwrap_or_default();
                    Some(DeliverableDraft::new(kind, title, content, priority))
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(SynthesisDraft {
        summary,
        report,
        deliverables,
    })
}

/// `{title, plan, steps:[{step, assignee, deadline}]}`; at least one step required
pub fn parse_plan(text: &str) -> Result<PlanDraft, ParseError> {
    let json = decode_object(text)?;
    let title = field_text(&json, &["title"]).ok_or(ParseError::MissingField("title"))?;
    let plan = field_text(&json, &["plan", "description"]).unwrap_or_default();

    let steps: Vec<TaskStep> = json
        .get("steps")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    // Bare strings are accepted as steps
                    if let Some(s) = item.as_str() {
                        return (!s.trim().is_empty()).then(|| TaskStep::new(s.trim(), "", ""));
                    }
                    let step = field_text(item, &["step", "description", "task"])?;
                    let assignee = field_text(item, &["assignee", "owner"]).unwrap_or_default();
                    let deadline = field_text(item, &["deadline", "due"]).unwrap_or_default();
                    Some(TaskStep::new(step, assignee, deadline))
                })
                .collect()
        })
        .unwrap_or_default();

    if steps.is_empty() {
        return Err(ParseError::MissingField("steps"));
    }
    Ok(PlanDraft { title, plan, steps })
}

/// `{summary, categories:{<category>: [suggestion, ...]}}`
///
/// Unknown category keys are dropped; a single string counts as one
/// suggestion. Counts are normalized by [`AnalysisDraft::normalized`].
pub fn parse_analysis(text: &str) -> Result<AnalysisDraft, ParseError> {
    let json = decode_object(text)?;
    let summary = field_text(&json, &["summary"]).unwrap_or_default();
    let raw = json
        .get("categories")
        .and_then(Value::as_object)
        .ok_or(ParseError::MissingField("categories"))?;

    let mut categories = CategoryMap::new();
    for (key, value) in raw {
        let Some(category) = AnalysisCategory::parse_lenient(key) else {
            continue;
        };
        let suggestions: Vec<String> = match value {
            Value::Array(items) => items.iter().filter_map(json_text).collect(),
            other => json_text(other).into_iter().collect(),
        };
        categories.entry(category).or_default().extend(suggestions);
    }

    if categories.is_empty() {
        return Err(ParseError::MissingField("categories"));
    }
    Ok(AnalysisDraft {
        summary,
        categories,
    })
}
