//! In-memory corpus snapshot and the refit/re-embed step behind every change

use chrono::Utc;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::retrieval::{Vector, VectorSpace};
use crate::storage::DocumentDb;
use crate::types::{Chunk, Document, NewChunk};

/// The corpus as seen by queries: one vector space and every chunk embedded in it
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    space: VectorSpace,
    filenames: HashMap<i64, String>,
    chunks: Vec<Chunk>,
}

impl CorpusIndex {
    /// Rebuild from the store, refitting over all stored chunks
    ///
    /// Stored vectors that disagree with the refit space are rewritten.
    pub fn load(db: &DocumentDb, max_features: usize) -> Result<Self> {
        let documents = db.list_documents()?;
        let mut chunks = db.load_chunks()?;

        let space = fit_space(chunks.iter().map(|c| c.text.as_str()), max_features);

        let mut repaired = Vec::new();
        for chunk in &mut chunks {
            let vector = space.transform(&chunk.text);
            if chunk.vector != vector {
                repaired.push((chunk.id, vector.clone()));
                chunk.vector = vector;
            }
        }

        if !repaired.is_empty() {
            tracing::warn!(
                "Rewrote {} stored chunk vectors to match the current vocabulary",
                repaired.len()
            );
            db.update_vectors(&repaired)?;
        }

        let filenames = documents
            .into_iter()
            .map(|doc| (doc.id, doc.filename))
            .collect();

        Ok(Self {
            space,
            filenames,
            chunks,
        })
    }

    /// Fitted space every chunk vector belongs to
    pub fn space(&self) -> &VectorSpace {
        &self.space
    }

    /// All chunks in store order
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of documents in the corpus
    pub fn document_count(&self) -> usize {
        self.filenames.len()
    }

    /// Whether a document is part of the corpus
    pub fn contains_document(&self, document_id: i64) -> bool {
        self.filenames.contains_key(&document_id)
    }

    /// Filename of a document
    pub fn filename(&self, document_id: i64) -> Option<&str> {
        self.filenames.get(&document_id).map(String::as_str)
    }

    /// Add a document: refit over existing + new chunks, re-embed all, persist, return the new index
    pub fn with_document(
        &self,
        db: &DocumentDb,
        filename: &str,
        raw_text: &str,
        pieces: Vec<String>,
        max_features: usize,
    ) -> Result<(CorpusIndex, Document)> {
        let space = fit_space(
            self.chunks
                .iter()
                .map(|c| c.text.as_str())
                .chain(pieces.iter().map(String::as_str)),
            max_features,
        );

        let (existing, reembedded) = reembed(&space, &self.chunks);

        let vectors = space.transform_all(&pieces);
        let new_chunks: Vec<NewChunk> = pieces
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(index, (text, vector))| NewChunk {
                text,
                index: index as u32,
                vector,
            })
            .collect();

        let (document, stored) =
            db.insert_document(filename, raw_text, Utc::now(), &new_chunks, &reembedded)?;

        let mut filenames = self.filenames.clone();
        filenames.insert(document.id, document.filename.clone());

        let mut chunks = existing;
        chunks.extend(stored);

        Ok((
            CorpusIndex {
                space,
                filenames,
                chunks,
            },
            document,
        ))
    }

    /// Remove a document: refit over the remaining chunks, re-embed, persist, return the new index
    pub fn without_document(
        &self,
        db: &DocumentDb,
        document_id: i64,
        max_features: usize,
    ) -> Result<(CorpusIndex, usize)> {
        if !self.contains_document(document_id) {
            return Err(Error::DocumentNotFound(document_id));
        }

        let remaining: Vec<Chunk> = self
            .chunks
            .iter()
            .filter(|c| c.document_id != document_id)
            .cloned()
            .collect();
        let removed_chunks = self.chunks.len() - remaining.len();

        let space = fit_space(remaining.iter().map(|c| c.text.as_str()), max_features);
        let (chunks, reembedded) = reembed(&space, &remaining);

        if !db.delete_document(document_id, &reembedded)? {
            return Err(Error::DocumentNotFound(document_id));
        }

        let mut filenames = self.filenames.clone();
        filenames.remove(&document_id);

        Ok((
            CorpusIndex {
                space,
                filenames,
                chunks,
            },
            removed_chunks,
        ))
    }
}

fn fit_space<'a>(texts: impl Iterator<Item = &'a str>, max_features: usize) -> VectorSpace {
    let corpus: Vec<&str> = texts.collect();
    VectorSpace::fit(&corpus, max_features)
}

/// Re-embed `chunks` in `space`; returns updated chunks and the `(id, vector)` pairs to persist
fn reembed(space: &VectorSpace, chunks: &[Chunk]) -> (Vec<Chunk>, Vec<(i64, Vector)>) {
    let updated: Vec<Chunk> = chunks
        .iter()
        .map(|chunk| Chunk {
            vector: space.transform(&chunk.text),
            ..chunk.clone()
        })
        .collect();

    let pairs = updated.iter().map(|c| (c.id, c.vector.clone())).collect();
    (updated, pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_dimension_invariant(index: &CorpusIndex, db: &DocumentDb) {
        let dim = index.space().dimension();
        assert!(index.chunks().iter().all(|c| c.vector.len() == dim));
        assert!(db.load_chunks().unwrap().iter().all(|c| c.vector.len() == dim));
    }

    #[test]
    fn test_adding_documents_keeps_one_space() {
        let db = DocumentDb::in_memory().unwrap();
        let index = CorpusIndex::default();

        let (index, first) = index
            .with_document(&db, "a.txt", "apples grow on trees", vec!["apples grow on trees".into()], 1000)
            .unwrap();
        let dim_after_first = index.space().dimension();

        let (index, _) = index
            .with_document(&db, "b.txt", "bananas ripen quickly", vec!["bananas ripen quickly".into()], 1000)
            .unwrap();

        assert!(index.space().dimension() > dim_after_first);
        assert_eq!(index.document_count(), 2);
        assert_eq!(index.filename(first.id), Some("a.txt"));
        assert_dimension_invariant(&index, &db);
    }

    #[test]
    fn test_removing_document_refits() {
        let db = DocumentDb::in_memory().unwrap();
        let (index, a) = CorpusIndex::default()
            .with_document(&db, "a.txt", "alpha words", vec!["alpha words".into()], 1000)
            .unwrap();
        let (index, _) = index
            .with_document(&db, "b.txt", "beta terms", vec!["beta terms".into()], 1000)
            .unwrap();

        let (index, removed) = index.without_document(&db, a.id, 1000).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(index.space().terms(), &["beta", "terms"]);
        assert!(index.chunks().iter().all(|c| c.document_id != a.id));
        assert_dimension_invariant(&index, &db);
    }

    #[test]
    fn test_removing_unknown_document_is_not_found() {
        let db = DocumentDb::in_memory().unwrap();
        let result = CorpusIndex::default().without_document(&db, 42, 1000);
        assert!(matches!(result, Err(Error::DocumentNotFound(42))));
    }

    #[test]
    fn test_store_failure_leaves_index_untouched() {
        let db = DocumentDb::in_memory().unwrap();
        let (index, _) = CorpusIndex::default()
            .with_document(&db, "a.txt", "alpha", vec!["alpha".into()], 1000)
            .unwrap();

        db.execute_batch(
            "CREATE TRIGGER reject_all BEFORE INSERT ON chunks
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

        let result = index.with_document(&db, "b.txt", "beta", vec!["beta".into()], 1000);
        assert!(result.is_err());
        assert_eq!(index.document_count(), 1);
        assert_eq!(index.space().terms(), &["alpha"]);
        assert_eq!(db.count_documents().unwrap(), 1);
        assert_eq!(db.load_chunks().unwrap()[0].vector.len(), 1);
    }

    #[test]
    fn test_load_repairs_stale_vectors() {
        let db = DocumentDb::in_memory().unwrap();
        // vectors written against an unrelated vocabulary
        db.insert_document(
            "a.txt",
            "cat mat",
            Utc::now(),
            &[NewChunk { text: "cat mat".into(), index: 0, vector: vec![1.0] }],
            &[],
        )
        .unwrap();
        db.insert_document(
            "b.txt",
            "dog rug",
            Utc::now(),
            &[NewChunk { text: "dog rug".into(), index: 0, vector: vec![0.2, 0.4, 0.6] }],
            &[],
        )
        .unwrap();

        let index = CorpusIndex::load(&db, 1000).unwrap();
        assert_eq!(index.space().dimension(), 4);
        assert_eq!(index.document_count(), 2);
        assert_dimension_invariant(&index, &db);
    }
}
