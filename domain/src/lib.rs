//! Domain layer for newsroom
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Personas and routing
//!
//! Every member of the broadcast team is a **persona** with its own AI
//! provider configuration ([`AgentConfig`]). A call made on behalf of a
//! persona is routed to its provider and, when that fails, through a
//! deterministic fallback chain (same-provider downgrade, then another
//! provider). The outcome is always a [`CallResult`], never an error.
//!
//! ## Editorial sessions
//!
//! A **session** collects one scripted contribution per persona, asks the
//! coordinator to synthesize them into **deliverables**, and then waits for
//! human approval. Approved deliverables feed the implementation-task
//! planner. The **autopilot** starts sessions on a rotating schedule.

pub mod analysis;
pub mod autopilot;
pub mod call;
pub mod core;
pub mod notification;
pub mod parsing;
pub mod persona;
pub mod prompt;
pub mod providers;
pub mod script;
pub mod session;
pub mod task;

// Re-export commonly used types
pub use analysis::{AnalysisCategory, AnalysisDraft, CategoryMap, CompiledAnalysis, PersonaContribution};
pub use autopilot::{AutopilotConfig, AutopilotPatch, SkipReason, TickDecision, TickOutcome};
pub use call::{
    CallFailure, CallOutcome, CallOverride, CallResult, CallResultView, FailureKind, Message, Role,
};
pub use core::error::DomainError;
pub use notification::{MessageFormat, NotificationEvent, NotificationPatch, NotificationSettings};
pub use parsing::ParseError;
pub use persona::{
    defaults::COORDINATOR_ID,
    entities::{AgentConfig, AgentConfigPatch, Persona},
};
pub use prompt::PromptTemplate;
pub use providers::{ModelSpec, ProviderKind};
pub use session::{
    deliverable::{Deliverable, DeliverableDraft, DeliverableStatus, Priority},
    entities::{Session, SessionStatus, SessionType, TranscriptMessage},
    synthesis::{Contribution, SynthesisDraft},
};
pub use task::{ImplementationTask, PlanDraft, StepStatus, TaskStatus, TaskStep};
