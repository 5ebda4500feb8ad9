//! textvault - a text RAG store with semantic chunking and vector search.
//!
//! textvault turns raw text into embeddings via an OpenAI-compatible HTTP
//! backend, stores them with label and metadata in an embedded
//! [redb](https://github.com/cberner/redb) database, and answers
//! nearest-neighbor queries. Long documents can be pre-processed by one of
//! four splitting strategies — fixed windows, delimiter records, markdown
//! sections, or a markdown heading hierarchy — before storage, with
//! oversized pieces subdivided so no chunk exceeds the embedding dimension.
//!
//! # Quick start
//!
//! ```no_run
//! use textvault::{BackendConfig, DataDir, HttpEmbedder, VectorStore};
//! use textvault::search::{SearchRequest, similarity_search};
//!
//! # async fn run() -> textvault::Result<()> {
//! let data_dir = DataDir::resolve(None)?;
//! let store = VectorStore::open(&data_dir.store_db())?;
//! let provider = HttpEmbedder::new(&BackendConfig::default());
//!
//! let request = SearchRequest {
//!     query: "rust ownership".to_string(),
//!     max_count: 5,
//!     label: None,
//!     distance_threshold: None,
//! };
//! let hits = similarity_search(&provider, &store, &request).await?;
//! for hit in &hits {
//!     println!("{} {:.3} {}", hit.id, hit.distance, hit.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod data_dir;
pub mod delimiter;
pub mod embedding;
pub mod error;
pub mod hierarchy;
pub mod ingest;
pub mod mcp;
pub mod search;
pub mod sections;
pub mod store;
pub mod subdivide;

pub use config::BackendConfig;
pub use data_dir::DataDir;
pub use embedding::{EmbeddingProvider, HttpEmbedder};
pub use error::{Error, Result};
pub use store::VectorStore;
