use anyhow::Result;

use crate::resolver::RetrievedContext;
use extract::LlmClient;

pub fn build_answer_prompt(query: &str, context: &RetrievedContext) -> String {
    let bundle = &context.bundle;
    let chapter = bundle.chapter.as_deref().unwrap_or("not recorded");
    let section = bundle.section.as_deref().unwrap_or("not recorded");
    let punishment = bundle.punishment.as_deref().unwrap_or("not recorded");

    format!(
        r#"You are a legal assistant answering a question about criminal law.

CONTEXT (retrieved from the statute graph):
Offence: {}
Chapter: {}
Section: {}
Punishment: {}

USER QUESTION: {}

INSTRUCTIONS:
- Answer using only the context above; do not draw on outside knowledge
- Name the offence, the section it falls under, and the punishment
- Explain in plain language how the context applies to the question
- If the context does not cover the question, say so plainly

ANSWER:"#,
        bundle.offence, chapter, section, punishment, query
    )
}

/// Feeds the retrieved context and original query to the LLM to produce
/// the final explanation. Grounding is a prompt instruction only; the
/// model's adherence is not verified.
pub struct AnswerComposer<C: LlmClient> {
    llm: C,
}

impl<C: LlmClient> AnswerComposer<C> {
    pub fn new(llm: C) -> Self {
        Self { llm }
    }

    pub async fn compose(&self, query: &str, context: &RetrievedContext) -> Result<String> {
        let prompt = build_answer_prompt(query, context);
        self.llm.generate(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph::ContextBundle;

    #[test]
    fn prompt_carries_context_and_query() {
        let context = RetrievedContext {
            offence: "theft".into(),
            similarity: 0.91,
            bundle: ContextBundle {
                offence: "theft".into(),
                chapter: Some("Chapter XVII".into()),
                section: Some("303".into()),
                punishment: Some("imprisonment up to 3 years".into()),
            },
        };

        let prompt = build_answer_prompt("someone stole my bicycle", &context);

        assert!(prompt.contains("Offence: theft"));
        assert!(prompt.contains("Section: 303"));
        assert!(prompt.contains("imprisonment up to 3 years"));
        assert!(prompt.contains("someone stole my bicycle"));
    }

    #[test]
    fn missing_edges_render_as_not_recorded() {
        let context = RetrievedContext {
            offence: "sedition".into(),
            similarity: 0.5,
            bundle: ContextBundle {
                offence: "sedition".into(),
                chapter: None,
                section: None,
                punishment: None,
            },
        };

        let prompt = build_answer_prompt("what is sedition?", &context);
        assert!(prompt.contains("Section: not recorded"));
    }
}
