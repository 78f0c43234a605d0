// Static site server: serves index.html and the data/ JSON files the viewer loads.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub struct SiteServer {
    addr: SocketAddr,
    site_dir: PathBuf,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

/// Router serving `site_dir`; directory requests fall back to `index.html`.
pub fn site_router(site_dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(site_dir))
        .layer(TraceLayer::new_for_http())
}

impl SiteServer {
    /// Bind `bind_addr` (port 0 picks a free port) and start serving in the background.
    pub async fn start(site_dir: &Path, bind_addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(bind_addr).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = site_router(site_dir);

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
            {
                error!("site server error: {}", e);
            }
        });

        info!("serving {} at http://{}/", site_dir.display(), addr);
        Ok(Self {
            addr,
            site_dir: site_dir.to_path_buf(),
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Base URL of the site root, with a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn site_dir(&self) -> &Path {
        &self.site_dir
    }

    /// Serve until Ctrl-C, then shut down gracefully.
    pub async fn run_until_ctrl_c(mut self) -> Result<()> {
        tokio::signal::ctrl_c().await?;
        info!("shutting down site server");
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.task.await?;
        Ok(())
    }

    /// Shutdown the server gracefully.
    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
