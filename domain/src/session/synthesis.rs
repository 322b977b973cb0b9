//! Synthesis value objects: what goes into the coordinator call and what
//! comes back out of it.

use super::deliverable::DeliverableDraft;

pub const MIN_DELIVERABLES: usize = 2;
pub const MAX_DELIVERABLES: usize = 5;

/// One attributed persona turn fed into synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub persona_id: String,
    pub persona_label: String,
    pub text: String,
}

impl Contribution {
    pub fn new(
        persona_id: impl Into<String>,
        persona_label: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            persona_id: persona_id.into(),
            persona_label: persona_label.into(),
            text: text.into(),
        }
    }
}

/// Coordinator output (parsed or templated)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisDraft {
    pub summary: String,
    pub report: String,
    pub deliverables: Vec<DeliverableDraft>,
}

impl SynthesisDraft {
    /// Bring the deliverable count into `[2, 5]`.
    ///
    /// Too few are topped up from `template` (in order); too many are cut.
    pub fn fit_deliverables(mut self, template: Vec<DeliverableDraft>) -> Self {
        self.deliverables.retain(|d| !d.title.trim().is_empty());
        let mut fill = template.into_iter();
        while self.deliverables.len() < MIN_DELIVERABLES {
            match fill.next() {
                Some(d) => self.deliverables.push(d),
                None => break,
            }
        }
        self.deliverables.truncate(MAX_DELIVERABLES);
        self
    }
}
