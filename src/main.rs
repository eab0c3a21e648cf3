use std::net::SocketAddr;

use anyhow::Context;

use todo_api::{
    config::AppConfig, db::connection::open_store, logging::init_tracing, routes::app,
    state::AppState,
};

#[tokio::main]
async fn main() {
    // tracing is configured from the loaded config, so report this one on stderr
    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("failed to load config: {err:?}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cfg).await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    init_tracing(&cfg.logging)?;

    let addr: SocketAddr = cfg
        .bind_address()
        .parse()
        .with_context(|| format!("invalid listen address {}", cfg.bind_address()))?;
    let store = open_store(&cfg).await?;
    let state = AppState::new(cfg, store);

    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
