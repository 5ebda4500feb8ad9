use std::{
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use redb::{
    Database,
    ReadableDatabase,
    ReadableTable,
    ReadableTableMetadata,
    TableDefinition,
};
use uuid::Uuid;

use crate::error::Result;

const DOCUMENTS: TableDefinition<&str, &[u8]> =
    TableDefinition::new("documents");

/// Fixed-width prefix: 8 bytes created_at + 4 bytes dimension.
const HEADER_SIZE: usize = 12;

/// Generate a fresh document ID.
///
/// IDs are assigned at store time; chunks themselves carry no identity.
pub fn new_doc_id() -> String {
    format!("doc:{}", Uuid::new_v4())
}

/// A document as stored: its text, user-supplied label and metadata, and
/// the embedding vector it was indexed under.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub content: String,
    pub label: String,
    pub metadata: String,
    /// Unix timestamp (seconds) of when the document was stored.
    pub created_at: u64,
    pub embedding: Vec<f32>,
}

/// A KNN result: the matched document and its L2 distance from the query.
#[derive(Debug, Clone)]
pub struct KnnMatch {
    pub doc: StoredDocument,
    pub distance: f32,
}

/// Stores embedded documents keyed by document ID.
///
/// Binary format per entry:
/// - 8 bytes: created_at unix seconds (u64 LE)
/// - 4 bytes: embedding dimension D (u32 LE)
/// - D * 4 bytes: f32 LE embedding values
/// - 4 bytes content length (u32 LE) + UTF-8 content
/// - 4 bytes label length (u32 LE) + UTF-8 label
/// - 4 bytes metadata length (u32 LE) + UTF-8 metadata
pub struct VectorStore {
    db: Database,
}

impl VectorStore {
    /// Open or create a document store at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// # let tmp = tempfile::tempdir().unwrap();
    /// use textvault::store::VectorStore;
    ///
    /// let store = VectorStore::open(&tmp.path().join("store.redb")).unwrap();
    /// assert_eq!(store.count().unwrap(), 0);
    /// ```
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path)?;

        let txn = db.begin_write()?;
        txn.open_table(DOCUMENTS)?;
        txn.commit()?;

        Ok(Self { db })
    }

    /// Store a document under `id`, stamping it with the current time.
    /// An existing entry with the same ID is overwritten.
    pub fn put(
        &self,
        id: &str,
        content: &str,
        embedding: &[f32],
        label: &str,
        metadata: &str,
    ) -> Result<()> {
        let created_at = unix_now();
        let bytes = encode_record(content, label, metadata, created_at, embedding);

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(DOCUMENTS)?;
            table.insert(id, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Retrieve a document by ID, or None if absent.
    pub fn get(&self, id: &str) -> Result<Option<StoredDocument>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS)?;

        let Some(guard) = table.get(id)? else {
            return Ok(None);
        };

        Ok(decode_record(id, guard.value()))
    }

    /// Remove a document. Returns whether an entry existed.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(DOCUMENTS)?;
            table.remove(id)?.is_some()
        };
        txn.commit()?;
        Ok(removed)
    }

    /// List all stored document IDs.
    pub fn list_ids(&self) -> Result<Vec<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS)?;
        let mut result = Vec::new();
        for entry in table.iter()? {
            let (k, _) = entry?;
            result.push(k.value().to_string());
        }
        Ok(result)
    }

    /// Number of stored documents.
    pub fn count(&self) -> Result<usize> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS)?;
        Ok(table.len()? as usize)
    }

    /// Remove every stored document.
    pub fn clear(&self) -> Result<()> {
        let txn = self.db.begin_write()?;
        txn.delete_table(DOCUMENTS)?;
        txn.open_table(DOCUMENTS)?;
        txn.commit()?;
        Ok(())
    }

    /// Nearest-neighbor search: the `k` documents closest to `query` by L2
    /// distance, ascending. With a `label` filter only documents whose label
    /// matches exactly are considered. Entries whose stored dimension does
    /// not match the query length cannot be compared and are skipped, as are
    /// undecodable entries.
    pub fn knn(
        &self,
        query: &[f32],
        k: usize,
        label: Option<&str>,
    ) -> Result<Vec<KnnMatch>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS)?;

        let mut matches = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            let Some(doc) = decode_record(key.value(), value.value()) else {
                continue;
            };
            if doc.embedding.len() != query.len() {
                continue;
            }
            if let Some(want) = label {
                if doc.label != want {
                    continue;
                }
            }

            let distance = l2_distance(query, &doc.embedding);
            matches.push(KnnMatch { doc, distance });
        }

        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        matches.truncate(k);
        Ok(matches)
    }
}

impl std::fmt::Debug for VectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStore").finish_non_exhaustive()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

fn encode_record(
    content: &str,
    label: &str,
    metadata: &str,
    created_at: u64,
    embedding: &[f32],
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(
        HEADER_SIZE
            + embedding.len() * 4
            + 12
            + content.len()
            + label.len()
            + metadata.len(),
    );

    bytes.extend_from_slice(&created_at.to_le_bytes());
    bytes.extend_from_slice(&(embedding.len() as u32).to_le_bytes());
    bytes.extend_from_slice(bytemuck::cast_slice(embedding));
    for field in [content, label, metadata] {
        bytes.extend_from_slice(&(field.len() as u32).to_le_bytes());
        bytes.extend_from_slice(field.as_bytes());
    }

    bytes
}

fn decode_record(id: &str, bytes: &[u8]) -> Option<StoredDocument> {
    if bytes.len() < HEADER_SIZE {
        return None;
    }

    let created_at = u64::from_le_bytes(bytes[0..8].try_into().ok()?);
    let dimension = u32::from_le_bytes(bytes[8..12].try_into().ok()?) as usize;

    let vec_end = HEADER_SIZE.checked_add(dimension.checked_mul(4)?)?;
    if bytes.len() < vec_end {
        return None;
    }

    // The value buffer's alignment is redb's business, so the floats are
    // re-read rather than cast in place.
    let embedding: Vec<f32> = bytes[HEADER_SIZE..vec_end]
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes(c.try_into().expect("4-byte chunk")))
        .collect();

    let mut offset = vec_end;
    let mut fields = Vec::with_capacity(3);
    for _ in 0..3 {
        if bytes.len() < offset + 4 {
            return None;
        }
        let len =
            u32::from_le_bytes(bytes[offset..offset + 4].try_into().ok()?)
                as usize;
        offset += 4;
        if bytes.len() < offset + len {
            return None;
        }
        fields.push(
            std::str::from_utf8(&bytes[offset..offset + len])
                .ok()?
                .to_string(),
        );
        offset += len;
    }

    let metadata = fields.pop()?;
    let label = fields.pop()?;
    let content = fields.pop()?;

    Some(StoredDocument {
        id: id.to_string(),
        content,
        label,
        metadata,
        created_at,
        embedding,
    })
}
