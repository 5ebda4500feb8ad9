//! Query orchestration: embed the query text, run a nearest-neighbor scan,
//! and shape the results.

use serde::Serialize;

use crate::{
    embedding::EmbeddingProvider,
    error::{Error, Result},
    store::VectorStore,
};

/// A similarity search request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Query text to embed and match against stored documents.
    pub query: String,
    /// Maximum number of results.
    pub max_count: usize,
    /// Restrict matches to documents with this exact label.
    pub label: Option<String>,
    /// Drop matches farther than this distance.
    pub distance_threshold: Option<f32>,
}

/// One search result, closest first.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub content: String,
    pub label: String,
    pub metadata: String,
    pub distance: f32,
    /// RFC 3339 timestamp of when the document was stored.
    pub created_at: String,
}

/// Embed the query and return the nearest stored documents by ascending L2
/// distance, after applying the optional label and distance filters.
pub async fn similarity_search(
    provider: &dyn EmbeddingProvider,
    store: &VectorStore,
    request: &SearchRequest,
) -> Result<Vec<SearchHit>> {
    if request.query.is_empty() {
        return Err(Error::InvalidArgument("query text is required".into()));
    }
    let max_count = request.max_count.max(1);

    let query_embedding = provider.embed(&request.query).await?;
    let matches =
        store.knn(&query_embedding, max_count, request.label.as_deref())?;

    let mut hits: Vec<SearchHit> = matches
        .into_iter()
        .filter(|m| match request.distance_threshold {
            Some(threshold) => m.distance <= threshold,
            None => true,
        })
        .map(|m| SearchHit {
            id: m.doc.id,
            content: m.doc.content,
            label: m.doc.label,
            metadata: m.doc.metadata,
            distance: m.distance,
            created_at: format_rfc3339(m.doc.created_at),
        })
        .collect();

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    Ok(hits)
}

/// Format a unix timestamp (seconds) as an RFC 3339 UTC string.
fn format_rfc3339(unix_secs: u64) -> String {
    chrono::DateTime::from_timestamp(unix_secs as i64, 0)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_default()
}
