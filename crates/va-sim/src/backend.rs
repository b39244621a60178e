//! Scripted completion backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use va_core::{ApiKey, ArtifactKind, BackendError, ChatRequest, CompletionBackend};

use crate::fault::{FaultInjector, InjectedFault};

/// What the backend does when a stage calls it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Well-formed body whose first choice carries this text
    Reply(String),
    /// Error status with a short body
    Status(u16),
    /// This exact body, returned with a success status
    Malformed(Value),
    /// Transport failure
    NetworkDown,
    /// Never answers
    Stall,
}

/// One request as the backend saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub stage: ArtifactKind,
    pub request: ChatRequest,
    pub authorization: String,
}

/// Backend answering from a per-stage script.
///
/// Stages without an explicit outcome get a plausible default reply for a
/// recipe app, wrapped in the fences a real model tends to add.
pub struct ScriptedBackend {
    script: HashMap<ArtifactKind, Outcome>,
    calls: Mutex<Vec<RecordedCall>>,
    faults: Option<Mutex<FaultInjector>>,
    latency: Option<Duration>,
    response_count: AtomicU64,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            script: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            faults: None,
            latency: None,
            response_count: AtomicU64::new(0),
        }
    }

    /// Script the outcome for one stage.
    #[must_use]
    pub fn with(mut self, stage: ArtifactKind, outcome: Outcome) -> Self {
        self.script.insert(stage, outcome);
        self
    }

    /// Layer seeded random faults over the script.
    #[must_use]
    pub fn with_faults(mut self, injector: FaultInjector) -> Self {
        self.faults = Some(Mutex::new(injector));
        self
    }

    /// Delay every answer by a fixed amount.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Stages that issued a request, in arrival order.
    pub fn stages_called(&self) -> Vec<ArtifactKind> {
        lock(&self.calls).iter().map(|c| c.stage).collect()
    }

    /// The request a stage sent, if it sent one.
    pub fn call_for(&self, stage: ArtifactKind) -> Option<RecordedCall> {
        lock(&self.calls).iter().find(|c| c.stage == stage).cloned()
    }

    fn outcome_for(&self, stage: ArtifactKind) -> Outcome {
        let injected = self
            .faults
            .as_ref()
            .and_then(|faults| lock(faults).next_fault());

        match injected {
            Some(InjectedFault::Status(status)) => Outcome::Status(status),
            Some(InjectedFault::NetworkDown) => Outcome::NetworkDown,
            Some(InjectedFault::Malformed) => Outcome::Malformed(json!({"choices": []})),
            None => self
                .script
                .get(&stage)
                .cloned()
                .unwrap_or_else(|| Outcome::Reply(default_reply(stage).to_string())),
        }
    }

    fn delay(&self) -> Option<Duration> {
        let injected = self
            .faults
            .as_ref()
            .and_then(|faults| lock(faults).maybe_latency());
        match (self.latency, injected) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        }
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(
        &self,
        stage: ArtifactKind,
        request: &ChatRequest,
        api_key: &ApiKey,
    ) -> Result<Value, BackendError> {
        lock(&self.calls).push(RecordedCall {
            stage,
            request: request.clone(),
            authorization: api_key.bearer(),
        });

        let outcome = self.outcome_for(stage);
        if let Some(delay) = self.delay() {
            tokio::time::sleep(delay).await;
        }
        debug!(%stage, ?outcome, "simulated completion");

        match outcome {
            Outcome::Reply(text) => {
                let id = self.response_count.fetch_add(1, Ordering::Relaxed);
                Ok(json!({
                    "id": format!("sim-{}", id),
                    "object": "chat.completion",
                    "model": request.model,
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": text},
                        "finish_reason": "stop"
                    }]
                }))
            }
            Outcome::Status(status) => Err(BackendError::Status {
                status,
                body: format!("{{\"error\":\"simulated status {}\"}}", status),
            }),
            Outcome::Malformed(body) => Ok(body),
            Outcome::NetworkDown => Err(BackendError::Network(
                "simulated connection reset".to_string(),
            )),
            Outcome::Stall => std::future::pending().await,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Default model output per stage.
pub fn default_reply(stage: ArtifactKind) -> &'static str {
    match stage {
        ArtifactKind::Specification => {
            "1. Core features\n\
             - Search recipes by name or ingredient\n\
             - Mark recipes as favorites\n\
             - Share a recipe link\n\
             2. Layout: header with search bar, recipe grid, favorites drawer\n\
             3. Aesthetic: warm glassmorphism\n\
             4. Colors: #ff7a59 to #ffb347 gradient on cream\n\
             5. Interactions: card hover lift, heart pop animation\n\
             6. JavaScript: filter list, persist favorites in localStorage"
        }
        ArtifactKind::Markup => {
            "```html\n<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
             <link rel=\"stylesheet\" href=\"style.css\">\n</head>\n<body>\n\
             <header><input id=\"search\" type=\"search\"></header>\n\
             <main id=\"recipes\"></main>\n\
             <script src=\"script.js\"></script>\n</body>\n</html>\n```"
        }
        ArtifactKind::Styling => {
            "```css\nbody { font-family: system-ui; background: #fff8ef; }\n\
             .card:hover { transform: translateY(-4px); }\n```"
        }
        ArtifactKind::Behavior => {
            "```javascript\ndocument.addEventListener('DOMContentLoaded', () => {\n\
             console.log('recipes ready');\n});\n```"
        }
    }
}
