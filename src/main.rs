use axum::{
    Router,
    extract::Extension,
    routing::{delete, get, post},
};
use comics_search::config::Config;
use comics_search::index::{IndexBuilder, IndexStore};
use comics_search::search::SearchService;
use comics_search::search::handlers::{
    handle_db_search, handle_get_comics, handle_index_search, handle_search_by_word,
};
use comics_search::source::XkcdClient;
use comics_search::storage::{ComicsStore, MemoryStore, SqliteStore};
use comics_search::update::UpdateService;
use comics_search::update::handlers::{handle_drop, handle_stats, handle_status, handle_update};
use comics_search::words::KeywordNormalizer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut bind_addr: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--bind" if i + 1 < args.len() => {
                bind_addr = Some(args[i + 1].clone());
                i += 2;
            }
            "--help" | "-h" => {
                eprintln!("Usage: {} [--config <file.toml>] [--bind <addr:port>]", args[0]);
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    let mut config = Config::load(config_path.as_deref())?;
    if let Some(addr) = bind_addr {
        config.address = addr;
    }
    config.validate()?;

    tracing_subscriber::fmt()
        .with_max_level(config.max_level()?)
        .init();

    tracing::info!("Starting comics search on {}", config.address);
    tracing::debug!("Configuration: {:?}", config);

    let cancel = CancellationToken::new();

    // 1. Storage:
    let store: Arc<dyn ComicsStore> = if config.in_memory() {
        tracing::info!("Using in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        tracing::info!("Using SQLite store at {}", config.db_path);
        Arc::new(SqliteStore::open(Path::new(&config.db_path))?)
    };

    // 2. Collaborators:
    let source = Arc::new(XkcdClient::new(&config.source_url, config.source_timeout())?);
    let words = Arc::new(KeywordNormalizer::new());

    // 3. Update pipeline:
    let updater = UpdateService::new(store.clone(), source, words.clone(), config.concurrency)?;

    // 4. Index (initial build happens before serving):
    let index = IndexStore::new(IndexBuilder::new(store.clone()), config.index_ttl());
    let index_loop = index.clone().start(cancel.clone()).await;

    let search = SearchService::new(store, index, words);

    // 5. Scheduled updates:
    let scheduler = config.update_interval().map(|period| {
        tracing::info!("Scheduled updates every {:?}", period);
        tokio::spawn(updater.clone().run_every(period, cancel.clone()))
    });

    // 6. HTTP Router:
    let app = Router::new()
        .route("/api/db/update", post(handle_update))
        .route("/api/db/stats", get(handle_stats))
        .route("/api/db/status", get(handle_status))
        .route("/api/db", delete(handle_drop))
        .route("/api/search", get(handle_db_search))
        .route("/api/isearch", get(handle_index_search))
        .route("/api/index/word/:word", get(handle_search_by_word))
        .route("/api/index/comics/:id", get(handle_get_comics))
        .layer(Extension(updater))
        .layer(Extension(search));

    // 7. Start HTTP server:
    let listener = tokio::net::TcpListener::bind(&config.address).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown");

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
            shutdown.cancel();
        })
        .await?;

    cancel.cancel();
    if let Err(e) = index_loop.await {
        tracing::error!("Index refresh loop failed: {}", e);
    }
    if let Some(scheduler) = scheduler
        && let Err(e) = scheduler.await
    {
        tracing::error!("Update scheduler failed: {}", e);
    }

    Ok(())
}
