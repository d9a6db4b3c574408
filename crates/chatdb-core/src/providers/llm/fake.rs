use super::LlmClient;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Deterministic backend for tests and offline use. Responses are served
/// from a queue in order; an exhausted queue behaves like a backend that
/// returned an error payload.
#[derive(Default)]
pub struct FakeClient {
    responses: Mutex<VecDeque<String>>,
}

impl FakeClient {
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
        }
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(&self, _prompt: &str, _temperature: f32) -> anyhow::Result<String> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("fake backend has no scripted response"))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
