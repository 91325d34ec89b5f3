//! Prompt templates for grounded answers

/// Prompt builder for context-grounded questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// System instruction sent with every question
    pub fn system_prompt() -> &'static str {
        "You are a helpful assistant that answers questions based on the provided context. \
         If the context doesn't contain enough information to answer the question, say so."
    }

    /// User message combining the assembled context and the question
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            "Context:\n{context}\n\nQuestion: {question}\n\nAnswer based on the context above:",
            context = context,
            question = question
        )
    }
}
