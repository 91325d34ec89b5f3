//! Ingest, remove and query against one consistent corpus
//!
//! Writers (ingest, remove) hold the write lock across refit, re-embedding,
//! commit and swap. The owned guard travels into the blocking task, so commit
//! and swap complete together even if the caller is dropped. Readers hold the
//! read lock only while transforming the question and ranking, and call the
//! LLM after releasing it.

mod index;

pub use index::CorpusIndex;

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::config::QaConfig;
use crate::error::{Error, Result};
use crate::generation::ContextAssembler;
use crate::ingestion::WordChunker;
use crate::providers::{ComponentHealth, LlmProvider};
use crate::retrieval::rank;
use crate::storage::DocumentDb;
use crate::types::{AnswerResponse, DocumentSummary, IngestResponse, RankedChunk, Source};

/// Knowledge base over uploaded text documents
pub struct KnowledgeBase {
    db: Arc<DocumentDb>,
    index: Arc<RwLock<Arc<CorpusIndex>>>,
    llm: Arc<dyn LlmProvider>,
    chunker: WordChunker,
    assembler: ContextAssembler,
    max_features: usize,
    top_k: usize,
    excerpt_chars: usize,
}

impl KnowledgeBase {
    /// Open the knowledge base, refitting over everything already stored
    pub async fn open(
        config: &QaConfig,
        db: Arc<DocumentDb>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        let chunker = WordChunker::from_config(&config.chunking)?;
        let max_features = config.vectorizer.max_features;

        let store = Arc::clone(&db);
        let index = run_blocking(move || CorpusIndex::load(&store, max_features)).await?;

        tracing::info!(
            "Loaded {} documents ({} chunks, vocabulary of {} terms)",
            index.document_count(),
            index.space().corpus_size(),
            index.space().dimension()
        );

        Ok(Self {
            db,
            index: Arc::new(RwLock::new(Arc::new(index))),
            llm,
            chunker,
            assembler: ContextAssembler::with_budget(config.retrieval.max_context_chars),
            max_features,
            top_k: config.retrieval.top_k,
            excerpt_chars: config.retrieval.excerpt_chars,
        })
    }

    /// Add a document, refit the vocabulary and re-embed every chunk
    pub async fn ingest(&self, filename: &str, text: &str) -> Result<IngestResponse> {
        let pieces = self.chunker.chunk(text);
        if pieces.is_empty() {
            return Err(Error::validation("Document contains no text"));
        }
        let chunk_count = pieces.len();

        let mut guard = Arc::clone(&self.index).write_owned().await;
        let db = Arc::clone(&self.db);
        let max_features = self.max_features;
        let filename = filename.to_string();
        let text = text.to_string();

        let document = run_blocking(move || {
            let (next, document) =
                guard.with_document(&db, &filename, &text, pieces, max_features)?;

            tracing::info!(
                "Ingested {} as document {} ({} chunks, vocabulary of {} terms)",
                document.filename,
                document.id,
                chunk_count,
                next.space().dimension()
            );

            *guard = Arc::new(next);
            Ok(document)
        })
        .await?;

        Ok(IngestResponse::new(document.id, document.filename, chunk_count))
    }

    /// Delete a document, then refit over what remains
    pub async fn remove(&self, document_id: i64) -> Result<()> {
        let mut guard = Arc::clone(&self.index).write_owned().await;
        if !guard.contains_document(document_id) {
            return Err(Error::DocumentNotFound(document_id));
        }

        let db = Arc::clone(&self.db);
        let max_features = self.max_features;

        run_blocking(move || {
            let (next, removed_chunks) = guard.without_document(&db, document_id, max_features)?;

            tracing::info!(
                "Removed document {} ({} chunks, vocabulary now {} terms)",
                document_id,
                removed_chunks,
                next.space().dimension()
            );

            *guard = Arc::new(next);
            Ok(())
        })
        .await
    }

    /// Top-ranked chunks for a question
    pub async fn retrieve(&self, question: &str) -> Result<Vec<RankedChunk>> {
        let index = self.index.read().await;
        if index.chunks().is_empty() {
            return Err(Error::NoDocuments);
        }

        let query = index.space().transform(question);
        let scored = rank(
            &query,
            index.chunks().iter().map(|chunk| (chunk.vector.as_slice(), chunk)),
        )?;

        let ranked = scored
            .into_iter()
            .take(self.top_k)
            .map(|scored| RankedChunk {
                chunk_text: scored.item.text.clone(),
                filename: index
                    .filename(scored.item.document_id)
                    .unwrap_or_default()
                    .to_string(),
                chunk_index: scored.item.index,
                similarity_score: scored.score,
            })
            .collect();

        Ok(ranked)
    }

    /// Answer a question from the most relevant chunks, citing them as sources
    pub async fn query(&self, question: &str) -> Result<AnswerResponse> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::EmptyQuestion);
        }

        let start = Instant::now();
        let ranked = self.retrieve(question).await?;
        let context = self.assembler.assemble(&ranked);

        tracing::debug!(
            "Retrieved {} chunks ({} context chars) for question",
            ranked.len(),
            context.len()
        );

        let answer = self.llm.generate_answer(question, &context).await?;

        let sources = ranked
            .iter()
            .map(|chunk| Source::from_ranked(chunk, self.excerpt_chars))
            .collect();

        tracing::info!(
            "Answered question with {} sources in {}ms",
            ranked.len(),
            start.elapsed().as_millis()
        );

        Ok(AnswerResponse { answer, sources })
    }

    /// All documents, newest first
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        let db = Arc::clone(&self.db);
        let documents = run_blocking(move || db.list_documents()).await?;
        Ok(documents.iter().map(DocumentSummary::from).collect())
    }

    /// Number of documents in the corpus
    pub async fn document_count(&self) -> usize {
        self.index.read().await.document_count()
    }

    /// Current corpus snapshot
    pub async fn snapshot(&self) -> Arc<CorpusIndex> {
        Arc::clone(&*self.index.read().await)
    }

    /// Store health
    pub async fn database_health(&self) -> ComponentHealth {
        let db = Arc::clone(&self.db);
        match run_blocking(move || db.ping()).await {
            Ok(()) => ComponentHealth::Healthy,
            Err(e) => ComponentHealth::Unhealthy(e.to_string()),
        }
    }

    /// Upstream LLM health
    pub async fn llm_health(&self) -> ComponentHealth {
        self.llm.health_check().await
    }

    /// Name and model of the answer generator
    pub fn llm_info(&self) -> (&str, &str) {
        (self.llm.name(), self.llm.model())
    }
}

/// Run store and refit work off the async reactor
async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::internal(format!("Blocking task failed: {}", e)))?
}
