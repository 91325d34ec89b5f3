//! TF-IDF vector space fitted over the chunk corpus
//!
//! A [`VectorSpace`] is an immutable value: fitting produces a new space and
//! every vector compared against it must have been produced by its
//! [`VectorSpace::transform`].

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use super::Vector;

/// Tokens are runs of two or more word characters
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"))
}

/// Lowercased tokens of `text`
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    token_pattern()
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Fitted vocabulary and inverse-document-frequency weights
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorSpace {
    /// Term to column index
    vocabulary: HashMap<String, usize>,
    /// Column index to term, sorted
    terms: Vec<String>,
    /// Smoothed IDF per column
    idf: Vec<f32>,
    /// Number of texts the space was fitted on
    corpus_size: usize,
}

impl VectorSpace {
    /// Fit a space over `corpus`, keeping at most `max_features` terms
    ///
    /// Terms are ranked by total frequency across the corpus (ties broken
    /// alphabetically); columns follow alphabetical term order. The IDF is
    /// `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit<S: AsRef<str>>(corpus: &[S], max_features: usize) -> Self {
        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for text in corpus {
            let mut seen: HashSet<String> = HashSet::new();
            for token in tokenize(text.as_ref()) {
                *term_counts.entry(token.clone()).or_default() += 1;
                if seen.insert(token.clone()) {
                    *doc_freq.entry(token).or_default() += 1;
                }
            }
        }

        let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let n = corpus.len() as f64;
        let idf = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                (((1.0 + n) / (1.0 + df)).ln() + 1.0) as f32
            })
            .collect();

        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        tracing::debug!(
            "Fitted vector space: {} terms over {} texts",
            terms.len(),
            corpus.len()
        );

        Self {
            vocabulary,
            terms,
            idf,
            corpus_size: corpus.len(),
        }
    }

    /// Project `text` into this space (L2-normalized TF-IDF)
    ///
    /// Out-of-vocabulary terms contribute nothing; a text without any known
    /// term maps to the zero vector.
    pub fn transform(&self, text: &str) -> Vector {
        let mut vector = vec![0.0f32; self.dimension()];

        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                vector[idx] += 1.0;
            }
        }

        for (weight, idf) in vector.iter_mut().zip(&self.idf) {
            *weight *= idf;
        }

        let norm = vector.iter().map(|w| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for weight in &mut vector {
                *weight /= norm;
            }
        }

        vector
    }

    /// Transform every text in order
    pub fn transform_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vector> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }

    /// Vocabulary size; the length of every vector this space produces
    pub fn dimension(&self) -> usize {
        self.terms.len()
    }

    /// Whether the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Vocabulary in column order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of texts the space was fitted on
    pub fn corpus_size(&self) -> usize {
        self.corpus_size
    }
}
