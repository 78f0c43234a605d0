use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use catalog_viewer::catalog::crawler::{crawl_all, crawler_for};
use catalog_viewer::catalog::index_store::IndexStore;
use catalog_viewer::catalog::model::Store;
use catalog_viewer::catalog::site::generate_site;
use catalog_viewer::config::ViewerConfig;
use catalog_viewer::engine::loader::{LoadOutcome, Loader};
use catalog_viewer::page::diagnostics::TracingDiagnostics;
use catalog_viewer::page::output::Page;
use catalog_viewer::server::handler::SiteServer;
use catalog_viewer::source::http_source::HttpSource;
use catalog_viewer::source::select_source;
use catalog_viewer::telemetry::init_tracing;

#[derive(Parser)]
#[command(name = "catalog-viewer", about = "Store catalog crawler, site generator and data viewer")]
struct Cli {
    /// Path to a JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Site root directory (overrides the config file). For `load`, reads the
    /// data index from this directory instead of over HTTP.
    #[arg(long, global = true)]
    site_dir: Option<PathBuf>,
    /// Defaults to `load`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch data/index.json and render it into the viewer page.
    Load {
        /// Site URL to fetch from (overrides the config file).
        #[arg(long)]
        base_url: Option<String>,
        /// Write the page here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Crawl store catalogs into the per-store index files.
    Crawl {
        /// Stores to crawl, e.g. `--store aldi,lidl`. Defaults to the configured stores.
        #[arg(long = "store", value_delimiter = ',')]
        stores: Vec<Store>,
    },
    /// Generate data/index.json and index.html from the index files.
    Generate,
    /// Crawl, then generate.
    Run,
    /// Serve the site directory over HTTP.
    Serve {
        /// Address to bind (overrides the config file).
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };
    let site_dir = cli.site_dir;
    if let Some(dir) = &site_dir {
        config.site_dir = dir.clone();
    }

    match cli.command {
        None => load(&config, None, site_dir.as_deref(), None).await,
        Some(Command::Load { base_url, out }) => {
            load(&config, base_url.as_deref(), site_dir.as_deref(), out).await
        }
        Some(Command::Crawl { stores }) => {
            let stores = if stores.is_empty() {
                config.stores.clone()
            } else {
                stores
            };
            crawl(&config, &stores).await.map(|_| ())
        }
        Some(Command::Generate) => generate(&config).map(|_| ()),
        Some(Command::Run) => {
            info!("starting crawlers...");
            if let Err(e) = crawl(&config, &config.stores).await {
                error!("error in run: {:#}", e);
            }
            info!("generating index page...");
            match generate(&config) {
                Ok(_) => info!("all tasks completed successfully"),
                Err(e) => error!("error in run: {:#}", e),
            }
            Ok(())
        }
        Some(Command::Serve { bind }) => {
            let bind = bind.unwrap_or_else(|| config.bind_addr.clone());
            let server = SiteServer::start(&config.site_dir, &bind).await?;
            server.run_until_ctrl_c().await
        }
    }
}

async fn load(
    config: &ViewerConfig,
    base_url: Option<&str>,
    site_dir: Option<&Path>,
    out: Option<PathBuf>,
) -> Result<()> {
    let source = select_source(config, base_url, site_dir)?;

    let page = Arc::new(Page::viewer());
    let outcome = Loader::new(source, page.clone(), Arc::new(TracingDiagnostics))
        .load()
        .await;
    if outcome == LoadOutcome::Failed {
        info!("page rendered with the failure message");
    }

    let html = page.to_html();
    match out {
        Some(path) => {
            fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))?
        }
        None => print!("{}", html),
    }
    Ok(())
}

async fn crawl(config: &ViewerConfig, stores: &[Store]) -> Result<usize> {
    let http = Arc::new(HttpSource::new(&config.base_url)?);
    let now = Local::now().naive_local();
    let crawlers: Vec<_> = stores
        .iter()
        .map(|&store| crawler_for(store, http.clone(), now))
        .collect();

    let index = IndexStore::new(config.data_dir());
    let completed = crawl_all(&crawlers, &index).await;
    info!("{} of {} crawlers completed", completed, crawlers.len());
    Ok(completed)
}

fn generate(config: &ViewerConfig) -> Result<usize> {
    let now = Local::now().naive_local();
    generate_site(&config.site_dir, &config.stores, now)
}
