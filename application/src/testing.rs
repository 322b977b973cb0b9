//! Hand-written port mocks shared by the use-case tests

use crate::ports::credentials::CredentialSource;
use crate::ports::kv_store::{KeyValueStore, StoreError};
use crate::ports::notifier::{NotificationSink, NotifyError};
use crate::ports::provider::{ProviderAdapter, ProviderError, ProviderRequest};
use crate::ports::roster::RosterSource;
use async_trait::async_trait;
use newsroom_domain::persona::defaults::default_team;
use newsroom_domain::{MessageFormat, Persona, ProviderKind};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.data.lock().unwrap().len()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.data
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.data.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.data.lock().unwrap().remove(key).is_some())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StoreError> {
        Ok(self
            .data
            .lock()
            .unwrap()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

/// Adapter answering from a script; once the script runs out it repeats
/// `otherwise`
pub struct ScriptedAdapter {
    kind: ProviderKind,
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    otherwise: Result<String, ProviderError>,
    delay: Option<Duration>,
    pub requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedAdapter {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            script: Mutex::new(VecDeque::new()),
            otherwise: Ok(format!("{} says hello", kind.as_str())),
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn then(self, result: Result<String, ProviderError>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn otherwise(mut self, result: Result<String, ProviderError>) -> Self {
        self.otherwise = result;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn models_called(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.model.clone())
            .collect()
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn send(&self, request: &ProviderRequest) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.otherwise.clone())
    }
}

pub struct StaticCredentials(pub HashSet<ProviderKind>);

impl StaticCredentials {
    pub fn all() -> Self {
        Self(ProviderKind::ALL.into_iter().collect())
    }

    pub fn none() -> Self {
        Self(HashSet::new())
    }

    pub fn only(kinds: &[ProviderKind]) -> Self {
        Self(kinds.iter().copied().collect())
    }
}

impl CredentialSource for StaticCredentials {
    fn api_key(&self, provider: ProviderKind) -> Option<String> {
        self.0
            .contains(&provider)
            .then(|| format!("test-key-{}", provider.as_str()))
    }
}

pub struct StaticRoster(pub Vec<Persona>);

impl StaticRoster {
    pub fn standard() -> Self {
        Self(default_team())
    }
}

#[async_trait]
impl RosterSource for StaticRoster {
    async fn team(&self) -> Result<Vec<Persona>, StoreError> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send_message(
        &self,
        destination: &str,
        text: &str,
        _format: MessageFormat,
    ) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport("sink down".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), text.to_string()));
        Ok(())
    }
}

/// A well-formed synthesis answer with `deliverables` items
pub fn synthesis_json(deliverables: usize) -> String {
    let items: Vec<serde_json::Value> = (0..deliverables)
        .map(|i| {
            serde_json::json!({
                "type": "segment",
                "title": format!("Idea {i}"),
                "content": "Details",
                "priority": "high"
            })
        })
        .collect();
    serde_json::json!({
        "summary": "AI summary",
        "report": "AI report",
        "deliverables": items
    })
    .to_string()
}

/// A well-formed plan answer with `steps` steps
pub fn plan_json(steps: usize) -> String {
    let items: Vec<serde_json::Value> = (0..steps)
        .map(|i| serde_json::json!({"step": format!("Step {i}"), "assignee": "host", "deadline": "Friday"}))
        .collect();
    serde_json::json!({"title": "AI plan", "plan": "Do the work", "steps": items}).to_string()
}
