use crate::errors::PipelineError;
use crate::model::GenerationTask;
use crate::prompts;
use crate::providers::llm::LlmClient;
use std::sync::Arc;

// SQL-producing tasks run at temperature 0 so repeated requests yield the
// same statements; explanation gets a little phrasing latitude.
const SQL_TEMPERATURE: f32 = 0.0;
const EXPLAIN_TEMPERATURE: f32 = 0.3;

/// Bridges a generation task to the backend. Output is raw text: the
/// generator never executes, validates, or sanitizes what comes back.
pub struct StatementGenerator {
    client: Arc<dyn LlmClient>,
}

impl StatementGenerator {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    pub fn provider_name(&self) -> &'static str {
        self.client.provider_name()
    }

    pub async fn generate(&self, task: &GenerationTask) -> anyhow::Result<String> {
        let (prompt, temperature) = match task {
            GenerationTask::CreateTable { description } => {
                (prompts::create_table(description), SQL_TEMPERATURE)
            }
            GenerationTask::InsertRows { table, description } => {
                (prompts::insert_rows(table, description), SQL_TEMPERATURE)
            }
            GenerationTask::SelectQuery { question, schema } => {
                (prompts::select_query(question, schema), SQL_TEMPERATURE)
            }
            GenerationTask::ExplainResult {
                question,
                sql,
                rows,
            } => (
                prompts::explain_result(question, sql, rows),
                EXPLAIN_TEMPERATURE,
            ),
        };

        tracing::debug!(
            provider = self.client.provider_name(),
            temperature,
            prompt_len = prompt.len(),
            "generation request"
        );

        let text = match self.client.complete(&prompt, temperature).await {
            Ok(text) => text,
            Err(e) => {
                return Err(match e.downcast::<PipelineError>() {
                    Ok(pipeline_err) => pipeline_err.into(),
                    Err(other) => PipelineError::GenerationBackend(other.to_string()).into(),
                });
            }
        };

        if text.trim().is_empty() {
            return Err(
                PipelineError::GenerationBackend("backend returned empty output".into()).into(),
            );
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::llm::fake::FakeClient;

    #[tokio::test]
    async fn backend_error_maps_to_generation_backend_class() {
        let gen = StatementGenerator::new(Arc::new(FakeClient::default()));
        let err = gen
            .generate(&GenerationTask::CreateTable {
                description: "a table".into(),
            })
            .await
            .unwrap_err();
        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::GenerationBackend(msg)) => {
                assert!(msg.contains("no scripted response"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_output_is_a_backend_error() {
        let gen = StatementGenerator::new(Arc::new(FakeClient::scripted(["   "])));
        let err = gen
            .generate(&GenerationTask::CreateTable {
                description: "a table".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::GenerationBackend(_))
        ));
    }
}
