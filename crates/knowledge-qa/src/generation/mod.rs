//! Context assembly and prompt construction for answer generation

pub mod context;
pub mod prompt;

pub use context::ContextAssembler;
pub use prompt::PromptBuilder;
