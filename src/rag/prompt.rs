//! Step 5: evidence-context and prompt assembly (P11).

use super::models::{GraphFact, RetrievedChunk};
use super::timeline_checker::RelevantEvent;

/// Verbatim forensic system prompt - the only wording the LLM receives
/// as instructions. Never paraphrase.
pub const SYSTEM_PROMPT: &str = "You are a forensic evidence reporting system for law enforcement investigations.

CRITICAL RULES:
1. You MUST answer ONLY using the provided evidence.
2. You MUST NOT add facts that are not in the evidence.
3. You MUST NOT guess, assume, or infer beyond what is explicitly stated.
4. You MUST cite sources for every factual claim using [Source N] format.
5. If evidence is insufficient to answer, say so clearly.
6. You MUST NOT use probabilistic language like \"likely\", \"probably\", \"might have\".
7. You MUST NOT make guilt determinations or judgments.
8. You MUST NOT resolve contradictions - report them as found.

Your answers will be used in legal proceedings. Accuracy and citation are mandatory.";

const NO_EVIDENCE: &str = "No relevant evidence found.";
const CHARS_PER_TOKEN: usize = 4;

/// Builds the fixed three-section evidence context, truncated to
/// `max_context_tokens` at a 4-chars-per-token estimate, backtracking to
/// the last complete `"\n[Source"` boundary so no citation is sliced.
pub fn build_context(retrieved: &[RetrievedChunk], facts: &[GraphFact], events: &[RelevantEvent], max_context_tokens: usize) -> String {
    let mut sections = Vec::new();

    if !retrieved.is_empty() {
        let mut block = String::from("RETRIEVED EVIDENCE:\n");
        for (i, chunk) in retrieved.iter().enumerate() {
            let speaker = chunk.speaker.as_deref().unwrap_or("Unknown");
            block.push_str(&format!("[Source {}: {}] (Speaker: {})\n{}\n\n", i + 1, chunk.chunk_id, speaker, chunk.text));
        }
        sections.push(block.trim_end().to_string());
    }

    if !facts.is_empty() {
        let mut block = String::from("\nKNOWN RELATIONSHIPS:\n");
        for fact in facts {
            block.push_str(&format!("- {} {} {}\n", fact.subject, fact.predicate, fact.object));
        }
        sections.push(block.trim_end().to_string());
    }

    if !events.is_empty() {
        let mut block = String::from("\nTIMELINE:\n");
        for event in events {
            block.push_str(&format!("- [{}] {}\n", event.timestamp, event.description));
        }
        sections.push(block.trim_end().to_string());
    }

    if sections.is_empty() {
        return NO_EVIDENCE.to_string();
    }

    let context = sections.join("\n");
    truncate_context(context, max_context_tokens)
}

fn truncate_context(context: String, max_context_tokens: usize) -> String {
    let char_budget = max_context_tokens * CHARS_PER_TOKEN;
    if context.len() <= char_budget {
        return context;
    }
    // Accented names survive P4's NFC step, so char_budget may land
    // mid-codepoint - back off to the nearest char boundary first.
    let mut cut_at = char_budget.min(context.len());
    while cut_at > 0 && !context.is_char_boundary(cut_at) {
        cut_at -= 1;
    }
    let cut = &context[..cut_at];
    let boundary = cut.rfind("\n[Source").unwrap_or(cut_at);
    format!("{}\n[Context truncated due to length]", &context[..boundary])
}

/// Builds the user-facing prompt: evidence context, the question, and an
/// optional limitations section.
pub fn build_user_prompt(context: &str, question: &str, limitations: &[String]) -> String {
    let mut prompt = format!("EVIDENCE CONTEXT:\n{context}\n\nQUESTION:\n{question}\n");
    if !limitations.is_empty() {
        prompt.push_str("\nKNOWN LIMITATIONS:\n");
        for limitation in limitations {
            prompt.push_str(&format!("- {limitation}\n"));
        }
    }
    prompt
}
