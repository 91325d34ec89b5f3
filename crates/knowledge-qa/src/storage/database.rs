//! SQLite document and chunk store
//!
//! Chunk vectors are stored as JSON arrays of floats. Every write that changes
//! the corpus also rewrites the vectors of the surviving chunks inside the
//! same transaction, so a committed store is always in one vector space.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, Transaction};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::retrieval::Vector;
use crate::types::{Chunk, Document, NewChunk};

/// SQLite-backed document store
pub struct DocumentDb {
    conn: Arc<Mutex<Connection>>,
}

impl DocumentDb {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let journal: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!("Opened {} (journal_mode={})", path.display(), journal);

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Run raw SQL against the connection (for testing failure paths)
    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.lock().execute_batch(sql)?;
        Ok(())
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.pragma_update(None, "foreign_keys", "ON")?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                content TEXT NOT NULL,
                upload_date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS chunks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                document_id INTEGER NOT NULL,
                chunk_text TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                embedding TEXT NOT NULL,
                FOREIGN KEY (document_id) REFERENCES documents(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_chunks_document_id ON chunks(document_id);
            "#,
        )?;

        Ok(())
    }

    /// Cheap liveness probe
    pub fn ping(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Insert a document and its chunks, rewriting `reembedded` vectors, atomically
    pub fn insert_document(
        &self,
        filename: &str,
        raw_text: &str,
        upload_timestamp: DateTime<Utc>,
        chunks: &[NewChunk],
        reembedded: &[(i64, Vector)],
    ) -> Result<(Document, Vec<Chunk>)> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO documents (filename, content, upload_date) VALUES (?1, ?2, ?3)",
            params![filename, raw_text, upload_timestamp],
        )?;
        let document_id = tx.last_insert_rowid();

        let mut stored = Vec::with_capacity(chunks.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO chunks (document_id, chunk_text, chunk_index, embedding) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for chunk in chunks {
                stmt.execute(params![
                    document_id,
                    chunk.text,
                    chunk.index,
                    serde_json::to_string(&chunk.vector)?,
                ])?;
                stored.push(Chunk {
                    id: tx.last_insert_rowid(),
                    document_id,
                    text: chunk.text.clone(),
                    index: chunk.index,
                    vector: chunk.vector.clone(),
                });
            }
        }

        write_vectors(&tx, reembedded)?;
        tx.commit()?;

        let document = Document {
            id: document_id,
            filename: filename.to_string(),
            raw_text: raw_text.to_string(),
            upload_timestamp,
        };

        Ok((document, stored))
    }

    /// Delete a document and its chunks, rewriting `reembedded` vectors, atomically
    ///
    /// Returns `false` (and changes nothing) if the document does not exist.
    pub fn delete_document(&self, document_id: i64, reembedded: &[(i64, Vector)]) -> Result<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM chunks WHERE document_id = ?1", params![document_id])?;
        let deleted = tx.execute("DELETE FROM documents WHERE id = ?1", params![document_id])?;
        if deleted == 0 {
            // dropping the transaction rolls it back
            return Ok(false);
        }

        write_vectors(&tx, reembedded)?;
        tx.commit()?;
        Ok(true)
    }

    /// Rewrite stored vectors in one transaction
    pub fn update_vectors(&self, vectors: &[(i64, Vector)]) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        write_vectors(&tx, vectors)?;
        tx.commit()?;
        Ok(())
    }

    /// All documents, newest first
    pub fn list_documents(&self) -> Result<Vec<Document>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, filename, content, upload_date FROM documents ORDER BY upload_date DESC, id DESC",
        )?;
        let documents = stmt
            .query_map([], row_to_document)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(documents)
    }

    /// Get a document by ID
    #[cfg(test)]
    pub(crate) fn get_document(&self, document_id: i64) -> Result<Option<Document>> {
        use rusqlite::OptionalExtension;

        let conn = self.conn.lock();
        let document = conn
            .query_row(
                "SELECT id, filename, content, upload_date FROM documents WHERE id = ?1",
                params![document_id],
                row_to_document,
            )
            .optional()?;
        Ok(document)
    }

    /// Number of stored documents
    pub fn count_documents(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All chunks, grouped by document and ordered by index
    pub fn load_chunks(&self) -> Result<Vec<Chunk>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, document_id, chunk_text, chunk_index, embedding FROM chunks ORDER BY document_id, chunk_index",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, document_id, text, index, embedding)| {
                let vector: Vector = serde_json::from_str(&embedding).map_err(|e| {
                    Error::internal(format!("Chunk {} has an unreadable embedding: {}", id, e))
                })?;
                Ok(Chunk {
                    id,
                    document_id,
                    text,
                    index,
                    vector,
                })
            })
            .collect()
    }
}

fn write_vectors(tx: &Transaction<'_>, vectors: &[(i64, Vector)]) -> Result<()> {
    let mut stmt = tx.prepare("UPDATE chunks SET embedding = ?2 WHERE id = ?1")?;
    for (chunk_id, vector) in vectors {
        stmt.execute(params![chunk_id, serde_json::to_string(vector)?])?;
    }
    Ok(())
}

fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        filename: row.get(1)?,
        raw_text: row.get(2)?,
        upload_timestamp: row.get(3)?,
    })
}
