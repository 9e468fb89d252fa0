use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use mybooks_api::database::authors::PgAuthorStore;
use mybooks_api::database::books::PgBookStore;
use mybooks_api::database::tags::PgTagStore;
use mybooks_api::database::user_books::PgUserBookStore;
use mybooks_api::database::{self, PgHealthProbe};
use mybooks_api::enrich::HttpAuthorDirectory;
use mybooks_api::openlibrary::OpenLibraryClient;
use mybooks_api::session::RedisSessionStore;
use mybooks_api::state::AppState;
use mybooks_api::{config, routes};

#[derive(Debug, Parser)]
#[command(name = "mybooks-api", about = "Book catalog web services")]
struct Args {
    /// Port to listen on (overrides PORT / config)
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind (overrides BIND_ADDRESS / config)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, REDIS_URL, etc.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("starting MyBooks API in {:?} mode", config.environment);

    let pool = database::new_pool()
        .await
        .context("failed to open database pool")?;

    let sessions = RedisSessionStore::connect(&config.session.redis_url)
        .await
        .context("failed to connect to session store")?;

    let state = AppState {
        sessions: Arc::new(sessions),
        authors: Arc::new(PgAuthorStore::new(pool.clone())),
        books: Arc::new(PgBookStore::new(pool.clone())),
        tags: Arc::new(PgTagStore::new(pool.clone())),
        user_books: Arc::new(PgUserBookStore::new(pool.clone())),
        health: Arc::new(PgHealthProbe::new(pool)),
        author_directory: Arc::new(HttpAuthorDirectory::from_config()?),
        openlibrary: Arc::new(OpenLibraryClient::from_config()?),
    };

    let app = routes::app(state);

    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", bind, port);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server")?;

    Ok(())
}
