use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "textvault",
    about = "A text RAG store with semantic chunking and vector search"
)]
pub struct Cli {
    /// Override the data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Override the embedding backend base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override the embedding model ID
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Override the embedding vector dimension
    #[arg(long, global = true)]
    pub dimension: Option<usize>,

    /// API key for the embedding backend
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Embed a single text and store it
    Embed(EmbedArgs),
    /// Search stored documents by similarity
    Search(SearchArgs),
    /// Chunk a document file with a splitting strategy and store all chunks
    Ingest(IngestArgs),
    /// Retrieve a stored document by ID
    Get(GetArgs),
    /// Remove a stored document by ID
    Remove(RemoveArgs),
    /// Show system status and statistics
    Status(StatusArgs),
    /// Remove every stored document
    Clear,
    /// Start MCP server for AI agent integration
    Mcp,
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Embed --

#[derive(Debug, Parser)]
pub struct EmbedArgs {
    /// The text content to embed and store
    pub content: String,

    /// Label/tag applied to the document
    #[arg(short, long, default_value = "")]
    pub label: String,

    /// Free-form metadata stored with the document
    #[arg(short, long, default_value = "")]
    pub metadata: String,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query
    pub query: String,

    /// Number of results to return
    #[arg(short = 'n', long, default_value = "5")]
    pub count: usize,

    /// Only match documents with this exact label
    #[arg(short, long)]
    pub label: Option<String>,

    /// Drop results farther than this L2 distance
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Ingest --

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Fixed-size overlapping windows
    Windows,
    /// Split on a literal delimiter
    Delimiter,
    /// Split on markdown headings
    Sections,
    /// Markdown headings with ancestor context
    Hierarchy,
}

#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// Path to the document to ingest
    pub file: PathBuf,

    /// Splitting strategy
    #[arg(short, long, value_enum, default_value = "sections")]
    pub strategy: Strategy,

    /// Window size in characters (windows strategy; defaults to the
    /// embedding dimension)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap in characters between consecutive windows
    #[arg(long, default_value = "0")]
    pub overlap: usize,

    /// Delimiter to split on (delimiter strategy)
    #[arg(short, long, default_value = "---")]
    pub delimiter: String,

    /// Label applied to every chunk
    #[arg(short, long, default_value = "")]
    pub label: String,

    /// Metadata applied to every chunk
    #[arg(short, long, default_value = "")]
    pub metadata: String,
}

// -- Get --

#[derive(Debug, Parser)]
pub struct GetArgs {
    /// Document ID (doc:...)
    pub id: String,

    /// Output as JSON with metadata
    #[arg(long)]
    pub json: bool,
}

// -- Remove --

#[derive(Debug, Parser)]
pub struct RemoveArgs {
    /// Document ID (doc:...)
    pub id: String,
}

// -- Status --

#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "textvault",
            &mut std::io::stdout(),
        );
    }
}
