use async_trait::async_trait;

/// Text-generation backend. Any provider satisfying this surface is
/// substitutable; the handle is constructed once at startup and shared.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str, temperature: f32) -> anyhow::Result<String>;
    fn provider_name(&self) -> &'static str;
}

pub mod fake;
pub mod openai;
