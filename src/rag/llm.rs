//! Step 6: LLM invocation (P11), with a deterministic stub fallback when
//! no LLM client is configured.

use super::models::RetrievedChunk;
use super::prompt::SYSTEM_PROMPT;
use crate::ai::AIClient;

/// Calls the configured LLM, or falls back to a deterministic stub
/// answer that lists available `[Source N]` references without
/// inventing content.
pub async fn invoke(client: Option<&AIClient>, user_prompt: &str, retrieved: &[RetrievedChunk]) -> Result<String, String> {
    match client {
        Some(client) if client.is_configured() => {
            client.prompt_with_system(SYSTEM_PROMPT, user_prompt).await.map(|r| r.content)
        }
        _ => Ok(stub_answer(retrieved)),
    }
}

fn stub_answer(retrieved: &[RetrievedChunk]) -> String {
    if retrieved.is_empty() {
        return super::models::INSUFFICIENT_EVIDENCE.to_string();
    }
    let refs: Vec<String> = (1..=retrieved.len()).map(|i| format!("[Source {i}]")).collect();
    format!("Evidence is available in {}. Review the cited sources for details.", refs.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str) -> RetrievedChunk {
        RetrievedChunk {
            chunk_id: id.to_string(),
            document_id: "doc-1".to_string(),
            page_range: [1, 1],
            speaker: None,
            text: "text".to_string(),
            score: 0.9,
        }
    }

    #[tokio::test]
    async fn falls_back_to_stub_when_no_client_configured() {
        let result = invoke(None, "prompt", &[chunk("C-0001")]).await.unwrap();
        assert!(result.contains("[Source 1]"));
    }

    #[tokio::test]
    async fn stub_with_no_sources_returns_insufficient_evidence() {
        let result = invoke(None, "prompt", &[]).await.unwrap();
        assert_eq!(result, super::super::models::INSUFFICIENT_EVIDENCE);
    }
}
