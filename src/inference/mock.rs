use std::collections::VecDeque;
use std::sync::Mutex;

use super::{ChatMessage, InferenceClient, InferenceError};

/// Mock inference client for testing. Replays queued responses in order
/// and records every request it receives.
pub struct MockInferenceClient {
    responses: Mutex<VecDeque<String>>,
    fallback: String,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockInferenceClient {
    /// Answers every call with `response`.
    pub fn new(response: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: response.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers calls with `responses` in order, then repeats the last one.
    pub fn with_sequence(responses: &[&str]) -> Self {
        let fallback = responses.last().copied().unwrap_or_default().to_string();
        Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            fallback,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every message list received so far.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

impl InferenceClient for MockInferenceClient {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, InferenceError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }
        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());
        Ok(next.unwrap_or_else(|| self.fallback.clone()).trim().to_string())
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

/// Inference client whose every call fails with a connection error.
#[derive(Default)]
pub struct FailingInferenceClient {
    calls: Mutex<usize>,
}

impl FailingInferenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| *c).unwrap_or_default()
    }
}

impl InferenceClient for FailingInferenceClient {
    fn complete(&self, _messages: &[ChatMessage]) -> Result<String, InferenceError> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        Err(InferenceError::Connection("http://unreachable.invalid".into()))
    }

    fn model(&self) -> &str {
        "failing-model"
    }
}
