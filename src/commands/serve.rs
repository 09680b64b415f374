// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use axum::{routing::get, Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};

/// Static-file host for the built web client. Unknown routes fall back to
/// index.html so client-side routing works on refresh.
pub fn handle(m: &clap::ArgMatches) -> Result<()> {
    let dir = PathBuf::from(m.get_one::<String>("dir").unwrap());
    let port = *m.get_one::<u16>("port").unwrap();
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(serve(dir, port))
}

async fn serve(dir: PathBuf, port: u16) -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
    if !dir.is_dir() {
        anyhow::bail!("Static dir {} does not exist", dir.display());
    }

    let app = Router::new()
        .route("/health", get(health))
        .fallback_service(ServeDir::new(&dir).fallback(ServeFile::new(dir.join("index.html"))))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving {} on http://{}", dir.display(), addr);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
