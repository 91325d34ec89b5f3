//! Fixed-width word windows with overlap

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};

/// Word-window chunker with configurable size and overlap
#[derive(Debug, Clone, Copy)]
pub struct WordChunker {
    /// Words per window
    chunk_size: usize,
    /// Words shared by consecutive windows
    overlap: usize,
}

impl WordChunker {
    /// Create a new chunker; `overlap` must be smaller than `chunk_size`
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::validation("chunk_size must be positive"));
        }
        if overlap >= chunk_size {
            return Err(Error::validation(format!(
                "overlap ({}) must be less than chunk_size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    /// Create from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Words advanced between window starts
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Split text into overlapping windows of whitespace-separated words
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();

        (0..words.len())
            .step_by(self.stride())
            .map(|start| {
                let end = (start + self.chunk_size).min(words.len());
                words[start..end].join(" ")
            })
            .filter(|window| !window.is_empty())
            .collect()
    }
}

impl Default for WordChunker {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
        }
    }
}
