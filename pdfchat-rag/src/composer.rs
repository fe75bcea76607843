//! Prompt assembly and answer generation.
//!
//! The [`AnswerComposer`] binds retrieved context to a question through a
//! fixed [`PromptTemplate`] and hands the assembled messages to a
//! [`ChatProvider`]. Each call is independent; there is no conversational
//! memory across turns.

use std::sync::Arc;

use tracing::info;

use crate::chat::{ChatProvider, Message, Role};
use crate::config::RagConfig;
use crate::error::{RagError, Result};
use crate::retriever::Retriever;

/// Placeholder substituted with the user's question.
const INPUT_PLACEHOLDER: &str = "{input}";
/// Placeholder substituted with the concatenated retrieval context.
const CONTEXT_PLACEHOLDER: &str = "{context}";

/// Separator between chunk texts in the assembled context.
const CONTEXT_SEPARATOR: &str = "\n\n";

/// A fixed, ordered sequence of role-tagged message templates.
///
/// Templates may carry the `{input}` and `{context}` placeholders; rendering
/// is plain string substitution, applied to every message. The template is
/// set once at construction and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    messages: Vec<(Role, String)>,
}

impl PromptTemplate {
    /// Create a template from role-tagged message templates.
    pub fn new(messages: Vec<(Role, String)>) -> Self {
        Self { messages }
    }

    /// Substitute `{input}` and `{context}` into every message, preserving
    /// role tags and order.
    pub fn render(&self, input: &str, context: &str) -> Vec<Message> {
        self.messages
            .iter()
            .map(|(role, template)| {
                let content = template
                    .replace(INPUT_PLACEHOLDER, input)
                    .replace(CONTEXT_PLACEHOLDER, context);
                Message::new(*role, content)
            })
            .collect()
    }
}

impl Default for PromptTemplate {
    /// A system instruction plus a user turn carrying the question and the
    /// retrieved context.
    fn default() -> Self {
        Self::new(vec![
            (
                Role::System,
                "You are an excellent and helpful assistant. \
                 Answer the question based only on the data provided."
                    .to_string(),
            ),
            (
                Role::User,
                "Use the user question {input} to answer the question. \
                 Use only the {context} to answer the question."
                    .to_string(),
            ),
        ])
    }
}

/// Answers questions by retrieving context and invoking the chat provider.
///
/// Stateless per call: the only state persisting across calls is the index
/// contents and the fixed template.
pub struct AnswerComposer {
    retriever: Retriever,
    chat_provider: Arc<dyn ChatProvider>,
    template: PromptTemplate,
    top_k: usize,
    max_context_chars: usize,
}

impl AnswerComposer {
    /// Create a composer with the default prompt template.
    pub fn new(
        retriever: Retriever,
        chat_provider: Arc<dyn ChatProvider>,
        config: &RagConfig,
    ) -> Self {
        Self {
            retriever,
            chat_provider,
            template: PromptTemplate::default(),
            top_k: config.top_k,
            max_context_chars: config.max_context_chars,
        }
    }

    /// Replace the prompt template.
    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    /// Answer `question` from the ingested document.
    ///
    /// Retrieves the configured number of chunks, joins their text in
    /// retrieval order, renders the template, and returns the chat
    /// completion verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ContextTooLarge`] if the joined context exceeds
    /// the configured limit, and propagates retrieval and
    /// [`RagError::Chat`] failures.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let results = self.retriever.retrieve(question, self.top_k).await?;

        let context = results
            .iter()
            .map(|r| r.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);
        let context_chars = context.chars().count();
        if context_chars > self.max_context_chars {
            return Err(RagError::ContextTooLarge {
                length: context_chars,
                limit: self.max_context_chars,
            });
        }

        let messages = self.template.render(question, &context);
        let answer = self.chat_provider.complete(&messages).await?;

        info!(
            retrieved = results.len(),
            context_chars,
            answer_chars = answer.len(),
            "answered question"
        );
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_both_placeholders_in_every_message() {
        let template = PromptTemplate::new(vec![
            (Role::System, "ctx: {context}".to_string()),
            (Role::User, "q: {input}, again: {context}".to_string()),
        ]);
        let messages = template.render("why?", "because");
        assert_eq!(messages[0], Message::new(Role::System, "ctx: because"));
        assert_eq!(messages[1], Message::new(Role::User, "q: why?, again: because"));
    }

    #[test]
    fn default_template_has_system_then_user_roles() {
        let messages = PromptTemplate::default().render("q", "c");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("q"));
        assert!(messages[1].content.contains("c"));
    }

    #[test]
    fn render_without_placeholders_leaves_text_untouched() {
        let template = PromptTemplate::new(vec![(Role::System, "fixed".to_string())]);
        assert_eq!(template.render("q", "c")[0].content, "fixed");
    }
}
