use super::backend::GenerativeBackend;
use super::error::EnrichError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Replays a fixed sequence of outcomes, one per call
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, EnrichError>>>,
    calls: AtomicUsize,
    last_system: Mutex<String>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<String, EnrichError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            last_system: Mutex::new(String::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_system(&self) -> String {
        self.last_system.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, system: &str, _user: &str) -> Result<String, EnrichError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_system.lock().unwrap() = system.to_string();
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(EnrichError::EmptyResponse))
    }
}

/// Answers every details prompt, except those naming one of `failing`
pub struct PlaceBackend {
    failing: Vec<String>,
    calls: AtomicUsize,
}

impl PlaceBackend {
    pub fn failing_for(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| format!("\"{}\"", n)).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeBackend for PlaceBackend {
    async fn generate(&self, _system: &str, user: &str) -> Result<String, EnrichError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if self.failing.iter().any(|n| user.contains(n.as_str())) {
            return Err(EnrichError::Network("connection reset".to_string()));
        }
        Ok(r#"{"details": {"title": "Generated", "content": "Generated article"}}"#.to_string())
    }
}
