use clap::Parser;
use tracing_subscriber::EnvFilter;

use textvault::{
    BackendConfig,
    DataDir,
    HttpEmbedder,
    VectorStore,
    cli::{Cli, Command, GetArgs, IngestArgs, SearchArgs, Strategy},
    error,
    ingest,
    mcp,
    search::{self, SearchRequest},
};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("TEXTVAULT_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
    let config = BackendConfig::resolve(
        cli.base_url,
        cli.api_key,
        cli.model,
        cli.dimension,
    )?;

    match cli.command {
        Command::Embed(args) => {
            let store = VectorStore::open(&data_dir.store_db())?;
            let provider = HttpEmbedder::new(&config);
            let id = runtime()?.block_on(ingest::embed_and_store(
                &provider,
                &store,
                &args.content,
                &args.label,
                &args.metadata,
            ))?;
            println!("{id}");
        }
        Command::Search(args) => {
            let store = VectorStore::open(&data_dir.store_db())?;
            let provider = HttpEmbedder::new(&config);
            cmd_search(&provider, &store, &args)?;
        }
        Command::Ingest(args) => {
            let store = VectorStore::open(&data_dir.store_db())?;
            let provider = HttpEmbedder::new(&config);
            cmd_ingest(&provider, &store, &config, &args)?;
        }
        Command::Get(args) => {
            let store = VectorStore::open(&data_dir.store_db())?;
            cmd_get(&store, &args)?;
        }
        Command::Remove(args) => {
            let store = VectorStore::open(&data_dir.store_db())?;
            if !store.remove(&args.id)? {
                return Err(error::Error::NotFound {
                    kind: "document",
                    name: args.id,
                });
            }
            println!("Removed {}", args.id);
        }
        Command::Status(args) => {
            let store = VectorStore::open(&data_dir.store_db())?;
            cmd_status(&store, &config, &data_dir, args.json)?;
        }
        Command::Clear => {
            let store = VectorStore::open(&data_dir.store_db())?;
            let count = store.count()?;
            store.clear()?;
            println!("Removed {count} document(s)");
        }
        Command::Mcp => {
            mcp::run_mcp(&config, &data_dir)?;
        }
        Command::Completions(args) => {
            args.generate();
        }
    }

    Ok(())
}

fn runtime() -> error::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            error::Error::Config(format!("failed to start tokio runtime: {e}"))
        })
}

fn cmd_search(
    provider: &HttpEmbedder,
    store: &VectorStore,
    args: &SearchArgs,
) -> error::Result<()> {
    let request = SearchRequest {
        query: args.query.clone(),
        max_count: args.count,
        label: args.label.clone(),
        distance_threshold: args.threshold,
    };

    let hits =
        runtime()?.block_on(search::similarity_search(provider, store, &request))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&hits)
                .map_err(|e| error::Error::Config(e.to_string()))?
        );
    } else if hits.is_empty() {
        println!("No matching documents.");
    } else {
        for hit in &hits {
            println!("{}\t{:.4}\t{}", hit.id, hit.distance, preview(&hit.content));
        }
    }
    Ok(())
}

/// First line of the content, shortened for terminal output.
fn preview(content: &str) -> String {
    const MAX: usize = 80;
    let line = content.lines().next().unwrap_or("");
    if line.chars().count() > MAX {
        let cut: String = line.chars().take(MAX).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

fn cmd_ingest(
    provider: &HttpEmbedder,
    store: &VectorStore,
    config: &BackendConfig,
    args: &IngestArgs,
) -> error::Result<()> {
    let document = std::fs::read_to_string(&args.file)?;
    let size_limit = config.dimension;
    let rt = runtime()?;

    let ids = match args.strategy {
        Strategy::Windows => {
            let window = args.chunk_size.unwrap_or(size_limit);
            rt.block_on(ingest::ingest_windows(
                provider,
                store,
                &document,
                window,
                args.overlap,
                size_limit,
                &args.label,
                &args.metadata,
            ))?
        }
        Strategy::Delimiter => rt.block_on(ingest::ingest_delimited(
            provider,
            store,
            &document,
            &args.delimiter,
            size_limit,
            &args.label,
            &args.metadata,
        ))?,
        Strategy::Sections => rt.block_on(ingest::ingest_sections(
            provider,
            store,
            &document,
            size_limit,
            &args.label,
            &args.metadata,
        ))?,
        Strategy::Hierarchy => rt.block_on(ingest::ingest_hierarchy(
            provider,
            store,
            &document,
            size_limit,
            &args.label,
            &args.metadata,
        ))?,
    };

    println!("Stored {} chunk(s)", ids.len());
    for id in &ids {
        println!("{id}");
    }
    Ok(())
}

fn cmd_get(store: &VectorStore, args: &GetArgs) -> error::Result<()> {
    let doc = store.get(&args.id)?.ok_or_else(|| error::Error::NotFound {
        kind: "document",
        name: args.id.clone(),
    })?;

    if args.json {
        let value = serde_json::json!({
            "id": doc.id,
            "content": doc.content,
            "label": doc.label,
            "metadata": doc.metadata,
            "created_at": doc.created_at,
            "dimension": doc.embedding.len(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&value)
                .map_err(|e| error::Error::Config(e.to_string()))?
        );
    } else {
        print!("{}", doc.content);
        if !doc.content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

fn cmd_status(
    store: &VectorStore,
    config: &BackendConfig,
    data_dir: &DataDir,
    json: bool,
) -> error::Result<()> {
    let doc_count = store.count()?;

    if json {
        println!(
            "{{\"data_dir\":\"{}\",\"model\":\"{}\",\"dimension\":{},\"documents\":{doc_count}}}",
            data_dir.root().display(),
            config.model,
            config.dimension
        );
    } else {
        println!("Data directory: {}", data_dir.root().display());
        println!("Model: {}", config.model);
        println!("Dimension: {}", config.dimension);
        println!("Documents: {doc_count}");
    }
    Ok(())
}
