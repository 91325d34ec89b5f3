//! Provenance-tagged context window rendered from ranked chunks

use crate::types::RankedChunk;

/// Separator between rendered chunk blocks
const BLOCK_SEPARATOR: &str = "\n\n";

/// Renders ranked chunks into the context string sent to the LLM
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAssembler {
    /// Optional cap on the rendered length, in characters
    max_chars: Option<usize>,
}

impl ContextAssembler {
    /// Assembler without a length budget
    pub fn new() -> Self {
        Self { max_chars: None }
    }

    /// Assembler that keeps the context within `max_chars` characters
    pub fn with_budget(max_chars: Option<usize>) -> Self {
        Self { max_chars }
    }

    /// Header line identifying where a chunk came from
    pub fn block_header(chunk: &RankedChunk) -> String {
        format!("[From {}, section {}]:", chunk.filename, chunk.chunk_index)
    }

    /// Render one chunk as a tagged block
    pub fn render_block(chunk: &RankedChunk) -> String {
        format!("{}\n{}", Self::block_header(chunk), chunk.chunk_text)
    }

    /// Render chunks in the given (ranked) order
    ///
    /// With a budget, whole blocks are kept while they fit. A first block
    /// that alone exceeds the budget is cut at a character boundary.
    pub fn assemble(&self, ranked: &[RankedChunk]) -> String {
        let blocks = ranked.iter().map(Self::render_block);

        let Some(budget) = self.max_chars else {
            return blocks.collect::<Vec<_>>().join(BLOCK_SEPARATOR);
        };

        let mut context = String::new();
        let mut used = 0usize;

        for block in blocks {
            let separator = if context.is_empty() { 0 } else { BLOCK_SEPARATOR.len() };
            let block_chars = block.chars().count();

            if used + separator + block_chars <= budget {
                if separator > 0 {
                    context.push_str(BLOCK_SEPARATOR);
                }
                context.push_str(&block);
                used += separator + block_chars;
                continue;
            }

            if context.is_empty() {
                context.extend(block.chars().take(budget));
                tracing::debug!("Context budget {} truncated the top-ranked chunk", budget);
            }
            break;
        }

        context
    }
}
