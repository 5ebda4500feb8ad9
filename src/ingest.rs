//! Ingestion orchestration: split a document with one of the four chunking
//! strategies, embed every resulting chunk, and store it.
//!
//! The size limit (in practice the embedding backend's vector length) and
//! both collaborators are explicit parameters of every call; nothing here
//! holds process-wide state. Embedding and storage run sequentially per
//! chunk and the first failure aborts the whole ingest.

use crate::{
    chunking::chunk_text,
    delimiter::{leading_lines, split_with_delimiter},
    embedding::EmbeddingProvider,
    error::{Error, Result},
    hierarchy::render_with_hierarchy,
    sections::{extract_section_heading, split_by_sections},
    store::{VectorStore, new_doc_id},
    subdivide::{enforce_size_limit, enforce_size_limit_with_header},
};

/// Number of leading non-blank lines re-attached to delimiter sub-pieces.
const DELIMITER_HEADER_LINES: usize = 2;

/// Embed a single text and store it. Returns the assigned document ID.
pub async fn embed_and_store(
    provider: &dyn EmbeddingProvider,
    store: &VectorStore,
    content: &str,
    label: &str,
    metadata: &str,
) -> Result<String> {
    if content.is_empty() {
        return Err(Error::InvalidArgument("content is required".into()));
    }

    let embedding = provider.embed(content).await?;
    let id = new_doc_id();
    store.put(&id, content, &embedding, label, metadata)?;
    Ok(id)
}

/// Chunk a document into fixed-size overlapping windows and store every
/// chunk. All chunks share the same label and metadata. Returns the stored
/// chunk IDs in document order.
pub async fn ingest_windows(
    provider: &dyn EmbeddingProvider,
    store: &VectorStore,
    document: &str,
    window: usize,
    overlap: usize,
    size_limit: usize,
    label: &str,
    metadata: &str,
) -> Result<Vec<String>> {
    if document.is_empty() {
        return Err(Error::InvalidArgument("document is required".into()));
    }
    if window == 0 {
        return Err(Error::InvalidArgument(
            "chunk size must be greater than zero".into(),
        ));
    }
    if overlap >= window {
        return Err(Error::InvalidArgument(
            "overlap must be less than chunk size".into(),
        ));
    }
    if window > size_limit {
        return Err(Error::InvalidArgument(format!(
            "chunk size ({window}) must be less than or equal to the embedding dimension ({size_limit})"
        )));
    }

    let chunks = chunk_text(document, window, overlap);
    if chunks.is_empty() {
        return Err(Error::InvalidArgument(
            "no chunks generated from the document".into(),
        ));
    }

    store_chunks(provider, store, &chunks, label, metadata).await
}

/// Split a document on a literal delimiter and store every piece, breaking
/// oversized pieces into sub-pieces no larger than `size_limit`. Each
/// sub-piece after the first gets the piece's first two non-blank lines
/// re-attached so it keeps its identifying context.
pub async fn ingest_delimited(
    provider: &dyn EmbeddingProvider,
    store: &VectorStore,
    document: &str,
    delimiter: &str,
    size_limit: usize,
    label: &str,
    metadata: &str,
) -> Result<Vec<String>> {
    if document.is_empty() {
        return Err(Error::InvalidArgument("document is required".into()));
    }
    if delimiter.is_empty() {
        return Err(Error::InvalidArgument("delimiter is required".into()));
    }
    check_size_limit(size_limit)?;

    let pieces = split_with_delimiter(document, delimiter);
    if pieces.is_empty() {
        return Err(Error::InvalidArgument(
            "no chunks generated from the document".into(),
        ));
    }

    let mut ids = Vec::new();
    for piece in &pieces {
        let header = leading_lines(piece, DELIMITER_HEADER_LINES);
        let subs =
            enforce_size_limit_with_header(piece, &header, size_limit);
        if subs.len() > 1 {
            tracing::debug!(
                sub_pieces = subs.len(),
                "piece exceeded size limit, subdivided"
            );
        }
        ids.extend(store_chunks(provider, store, &subs, label, metadata).await?);
    }

    Ok(ids)
}

/// Split a markdown document into heading-delimited sections and store
/// them, subdividing oversized sections with their heading re-attached to
/// every sub-piece after the first.
pub async fn ingest_sections(
    provider: &dyn EmbeddingProvider,
    store: &VectorStore,
    document: &str,
    size_limit: usize,
    label: &str,
    metadata: &str,
) -> Result<Vec<String>> {
    if document.is_empty() {
        return Err(Error::InvalidArgument("document is required".into()));
    }
    check_size_limit(size_limit)?;

    let sections = split_by_sections(document);
    if sections.is_empty() {
        return Err(Error::InvalidArgument(
            "no sections generated from the document".into(),
        ));
    }

    let mut ids = Vec::new();
    for section in &sections {
        let heading = extract_section_heading(section);
        let subs =
            enforce_size_limit_with_header(section, &heading, size_limit);
        if subs.len() > 1 {
            tracing::debug!(
                sub_pieces = subs.len(),
                "section exceeded size limit, subdivided"
            );
        }
        ids.extend(store_chunks(provider, store, &subs, label, metadata).await?);
    }

    Ok(ids)
}

/// Render a markdown document into TITLE/HIERARCHY/CONTENT chunks and store
/// them. Unlike the delimiter and section strategies, oversized chunks are
/// subdivided without re-attaching the rendered header.
pub async fn ingest_hierarchy(
    provider: &dyn EmbeddingProvider,
    store: &VectorStore,
    document: &str,
    size_limit: usize,
    label: &str,
    metadata: &str,
) -> Result<Vec<String>> {
    if document.is_empty() {
        return Err(Error::InvalidArgument("document is required".into()));
    }
    check_size_limit(size_limit)?;

    let chunks = render_with_hierarchy(document);
    if chunks.is_empty() {
        return Err(Error::InvalidArgument(
            "no chunks generated from the document".into(),
        ));
    }

    let mut ids = Vec::new();
    for chunk in &chunks {
        let subs = enforce_size_limit(chunk, size_limit);
        if subs.len() > 1 {
            tracing::debug!(
                sub_pieces = subs.len(),
                "chunk exceeded size limit, subdivided"
            );
        }
        ids.extend(store_chunks(provider, store, &subs, label, metadata).await?);
    }

    Ok(ids)
}

fn check_size_limit(size_limit: usize) -> Result<()> {
    if size_limit == 0 {
        return Err(Error::InvalidArgument(
            "size limit must be greater than zero".into(),
        ));
    }
    Ok(())
}

async fn store_chunks(
    provider: &dyn EmbeddingProvider,
    store: &VectorStore,
    chunks: &[String],
    label: &str,
    metadata: &str,
) -> Result<Vec<String>> {
    let mut ids = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let embedding = provider.embed(chunk).await?;
        let id = new_doc_id();
        store.put(&id, chunk, &embedding, label, metadata)?;
        ids.push(id);
    }
    Ok(ids)
}
