use std::net::SocketAddr;

use axum::Router;
use configs::{AppConfig, ServerConfig};
use service::SiteContext;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .map_err(|_| StartupError::InvalidAddr(format!("{}:{}", cfg.host, cfg.port)))
}

/// Router over the backend named in the configuration.
pub fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let ctx = SiteContext::from_config(cfg)?;
    Ok(routes::build_router(ctx, build_cors()))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg)?;
    let addr = bind_addr(&cfg.server)?;
    info!(%addr, backend = %cfg.backend.base_url, event = "listening", "starting server crate");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_rejects_hostnames() {
        let cfg = ServerConfig { host: "localhost".into(), port: 8080, worker_threads: None };
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidAddr(_))));
        let cfg = ServerConfig { host: "0.0.0.0".into(), port: 9000, worker_threads: None };
        assert_eq!(bind_addr(&cfg).unwrap().port(), 9000);
    }
}
