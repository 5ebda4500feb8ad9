use std::sync::Arc;

use rmcp::{
    ServerHandler,
    ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult,
        Content,
        Implementation,
        ServerCapabilities,
        ServerInfo,
    },
    tool,
    tool_handler,
    tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    config::BackendConfig,
    data_dir::DataDir,
    embedding::{EmbeddingProvider, HttpEmbedder},
    error,
    ingest,
    search::{self, SearchRequest},
    store::VectorStore,
};

/// Default number of search results when max_count is not given.
const DEFAULT_MAX_COUNT: usize = 1;

struct VaultState {
    provider: Arc<dyn EmbeddingProvider>,
    store: VectorStore,
}

#[derive(Clone)]
pub struct TextvaultMcpServer {
    state: Arc<VaultState>,
    tool_router: ToolRouter<Self>,
}

impl TextvaultMcpServer {
    fn new(state: VaultState) -> Self {
        Self {
            state: Arc::new(state),
            tool_router: Self::tool_router(),
        }
    }

    fn size_limit(&self) -> usize {
        self.state.provider.dimension()
    }
}

#[tool_router(router = tool_router)]
impl TextvaultMcpServer {
    #[tool(
        name = "about_textvault",
        description = "This tool provides information about the textvault MCP server."
    )]
    pub async fn about(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
            "This MCP server is a text RAG system backed by an embedded vector store",
        )]))
    }

    #[tool(
        name = "get_embedding_model_info",
        description = "Get information about the embedding model being used, including the model ID and dimension."
    )]
    pub async fn model_info(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        let structured = json!({
            "model_id": self.state.provider.model_id(),
            "dimension": self.state.provider.dimension(),
        });

        Ok(structured_result(structured.to_string(), structured))
    }

    /// Embed one text and store it with optional label and metadata.
    #[tool(
        name = "create_embedding",
        description = "Create and store an embedding from text content with optional label and metadata."
    )]
    pub async fn create_embedding(
        &self,
        params: Parameters<CreateEmbeddingParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        let label = params.label.unwrap_or_default();
        let metadata = params.metadata.unwrap_or_default();

        let id = ingest::embed_and_store(
            self.state.provider.as_ref(),
            &self.state.store,
            &params.content,
            &label,
            &metadata,
        )
        .await
        .map_err(|e| mcp_error("failed to create embedding", e))?;

        let structured = json!({
            "success": true,
            "id": id,
            "content": params.content,
            "label": label,
            "metadata": metadata,
            "created_at": now_rfc3339(),
        });

        Ok(structured_result(format!("Stored document {id}"), structured))
    }

    #[tool(
        name = "similarity_search",
        description = "Search for similar documents based on text query. Returns documents ordered by similarity (closest first). Optionally filter by distance threshold."
    )]
    pub async fn similarity_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        self.run_search(
            params.text,
            None,
            params.max_count,
            params.distance_threshold,
        )
        .await
    }

    #[tool(
        name = "similarity_search_with_label",
        description = "Search for similar documents based on text query, filtered by label. Returns documents ordered by similarity (closest first). Optionally filter by distance threshold."
    )]
    pub async fn similarity_search_with_label(
        &self,
        params: Parameters<SearchWithLabelParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;
        if params.label.is_empty() {
            return Err(rmcp::ErrorData::invalid_params(
                "label parameter is required",
                None,
            ));
        }
        self.run_search(
            params.text,
            Some(params.label),
            params.max_count,
            params.distance_threshold,
        )
        .await
    }

    #[tool(
        name = "chunk_and_store",
        description = "Chunk a document into smaller pieces with overlap and store all chunks with embeddings. All chunks will share the same label and metadata."
    )]
    pub async fn chunk_and_store(
        &self,
        params: Parameters<ChunkAndStoreParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;

        let ids = ingest::ingest_windows(
            self.state.provider.as_ref(),
            &self.state.store,
            &params.document,
            params.chunk_size,
            params.overlap,
            self.size_limit(),
            &params.label.unwrap_or_default(),
            &params.metadata.unwrap_or_default(),
        )
        .await
        .map_err(|e| mcp_error("failed to chunk and store", e))?;

        Ok(chunks_stored_result(ids))
    }

    #[tool(
        name = "split_and_store_with_delimiter",
        description = "Split a document by a literal delimiter and store all chunks with embeddings. Chunks larger than the embedding dimension are automatically subdivided, with the chunk's first lines re-attached for context. All chunks will share the same label and metadata."
    )]
    pub async fn split_and_store_with_delimiter(
        &self,
        params: Parameters<SplitWithDelimiterParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;

        let ids = ingest::ingest_delimited(
            self.state.provider.as_ref(),
            &self.state.store,
            &params.document,
            &params.delimiter,
            self.size_limit(),
            &params.label.unwrap_or_default(),
            &params.metadata.unwrap_or_default(),
        )
        .await
        .map_err(|e| mcp_error("failed to split and store", e))?;

        Ok(chunks_stored_result(ids))
    }

    #[tool(
        name = "split_and_store_markdown_sections",
        description = "Split a markdown document by sections (headers like #, ##, ###) and store all sections with embeddings. Sections larger than the embedding dimension are automatically subdivided. All chunks will share the same label and metadata."
    )]
    pub async fn split_and_store_markdown_sections(
        &self,
        params: Parameters<MarkdownDocumentParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;

        let ids = ingest::ingest_sections(
            self.state.provider.as_ref(),
            &self.state.store,
            &params.document,
            self.size_limit(),
            &params.label.unwrap_or_default(),
            &params.metadata.unwrap_or_default(),
        )
        .await
        .map_err(|e| mcp_error("failed to split and store", e))?;

        Ok(chunks_stored_result(ids))
    }

    #[tool(
        name = "split_and_store_markdown_with_hierarchy",
        description = "EXPERIMENTAL: Split a markdown document by headers, preserving hierarchical context (parent headers) in each chunk. Each chunk includes TITLE, HIERARCHY, and CONTENT metadata. Chunks larger than the embedding dimension are automatically subdivided. All chunks share the same label and metadata."
    )]
    pub async fn split_and_store_markdown_with_hierarchy(
        &self,
        params: Parameters<MarkdownDocumentParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let params = params.0;

        let ids = ingest::ingest_hierarchy(
            self.state.provider.as_ref(),
            &self.state.store,
            &params.document,
            self.size_limit(),
            &params.label.unwrap_or_default(),
            &params.metadata.unwrap_or_default(),
        )
        .await
        .map_err(|e| mcp_error("failed to split and store", e))?;

        Ok(chunks_stored_result(ids))
    }
}

impl TextvaultMcpServer {
    async fn run_search(
        &self,
        text: String,
        label: Option<String>,
        max_count: Option<usize>,
        distance_threshold: Option<f32>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let request = SearchRequest {
            query: text,
            max_count: max_count.unwrap_or(DEFAULT_MAX_COUNT),
            label,
            distance_threshold,
        };

        let hits = search::similarity_search(
            self.state.provider.as_ref(),
            &self.state.store,
            &request,
        )
        .await
        .map_err(|e| mcp_error("failed to perform similarity search", e))?;

        let suffix = if hits.len() == 1 { "" } else { "s" };
        let summary = format!("Found {} result{suffix}", hits.len());
        let structured = json!({
            "success": true,
            "results": hits,
        });

        Ok(structured_result(summary, structured))
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for TextvaultMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info =
            Implementation::new("textvault", env!("CARGO_PKG_VERSION")).with_title("textvault MCP");
        info.instructions = Some(
            "Store text with create_embedding or one of the split_and_store tools, then retrieve it with similarity_search."
                .to_string(),
        );
        info
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateEmbeddingParams {
    /// The text content to create an embedding from.
    pub content: String,
    /// Optional label/tag for the document.
    pub label: Option<String>,
    /// Optional metadata for the document.
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// The text query to search for similar documents.
    pub text: String,
    /// Maximum number of results to return (default: 1).
    pub max_count: Option<usize>,
    /// Only return documents with distance <= threshold.
    pub distance_threshold: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchWithLabelParams {
    /// The text query to search for similar documents.
    pub text: String,
    /// The label to filter documents by.
    pub label: String,
    /// Maximum number of results to return (default: 1).
    pub max_count: Option<usize>,
    /// Only return documents with distance <= threshold.
    pub distance_threshold: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChunkAndStoreParams {
    /// The document content to chunk and store.
    pub document: String,
    /// Size of each chunk in characters (must be <= embedding dimension).
    pub chunk_size: usize,
    /// Characters of overlap between consecutive chunks (must be < chunk_size).
    pub overlap: usize,
    /// Optional label to apply to all chunks.
    pub label: Option<String>,
    /// Optional metadata to apply to all chunks.
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SplitWithDelimiterParams {
    /// The document content to split and store.
    pub document: String,
    /// The literal delimiter to split on.
    pub delimiter: String,
    /// Optional label to apply to all chunks.
    pub label: Option<String>,
    /// Optional metadata to apply to all chunks.
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MarkdownDocumentParams {
    /// The markdown document content to split and store.
    pub document: String,
    /// Optional label to apply to all chunks.
    pub label: Option<String>,
    /// Optional metadata to apply to all chunks.
    pub metadata: Option<String>,
}

fn structured_result(
    summary: String,
    structured: serde_json::Value,
) -> CallToolResult {
    let mut result = CallToolResult::success(vec![Content::text(summary)]);
    result.structured_content = Some(structured);
    result
}

fn chunks_stored_result(ids: Vec<String>) -> CallToolResult {
    let count = ids.len();
    let structured = json!({
        "success": true,
        "chunk_ids": ids,
        "chunks_stored": count,
        "created_at": now_rfc3339(),
    });

    structured_result(format!("Stored {count} chunks"), structured)
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

fn mcp_error(message: &str, error: impl std::fmt::Display) -> rmcp::ErrorData {
    rmcp::ErrorData::internal_error(
        message.to_string(),
        Some(json!({ "error": error.to_string() })),
    )
}

/// Serve the MCP server over stdio until the client disconnects.
pub fn run_mcp(config: &BackendConfig, data_dir: &DataDir) -> error::Result<()> {
    let store = VectorStore::open(&data_dir.store_db())?;
    let provider = Arc::new(HttpEmbedder::new(config));

    let server = TextvaultMcpServer::new(VaultState { provider, store });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            error::Error::Config(format!("failed to start tokio runtime: {e}"))
        })?;

    runtime.block_on(async move {
        let transport = rmcp::transport::stdio();
        let running = server.serve(transport).await.map_err(|e| {
            error::Error::Config(format!(
                "MCP server initialization failed: {e}"
            ))
        })?;
        running.waiting().await.map_err(|e| {
            error::Error::Config(format!("MCP server error: {e}"))
        })?;
        Ok(())
    })
}
