//! Application layer for newsroom
//!
//! This crate contains use cases, port definitions, typed repositories and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod stores;
pub mod use_cases;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::RouterParams;
pub use ports::{
    credentials::CredentialSource,
    kv_store::{KeyValueStore, StoreError},
    notifier::{NotificationSink, NotifyError},
    provider::{ProviderAdapter, ProviderError, ProviderRequest},
    roster::RosterSource,
};
pub use stores::{AgentConfigStore, EditorialRepository, SettingsRepository};
pub use use_cases::autopilot::{AutopilotError, AutopilotUseCase};
pub use use_cases::call_ai::CallRouter;
pub use use_cases::compile_analysis::{AnalysisError, CompileAnalysisUseCase};
pub use use_cases::manage_config::{ConfigStoreError, ManageConfigUseCase, ProviderModels};
pub use use_cases::moderation::ModerationUseCase;
pub use use_cases::notify::Notifier;
pub use use_cases::plan_tasks::{PlanTasksUseCase, PlannerError};
pub use use_cases::run_session::{RunSessionInput, SessionError, SessionOrchestrator, SessionRun};
