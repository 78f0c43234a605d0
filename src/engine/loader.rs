// One-shot loader: fetch the data index, render it into the page, or show the failure message.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::render::render_pretty;
use crate::config::{CONTENT_ELEMENT_ID, DATA_INDEX_PATH, LOAD_FAILURE_MESSAGE};
use crate::page::diagnostics::DiagnosticSink;
use crate::page::output::OutputSink;
use crate::source::traits::ResourceSource;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Anything that keeps the data index from reaching the page.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch {path}")]
    Fetch {
        path: String,
        #[source]
        source: BoxError,
    },
    #[error("response body is not valid JSON")]
    Decode(#[from] serde_json::Error),
    #[error("failed to render content")]
    Render(#[source] BoxError),
    #[error("failed to write #{element}")]
    Output {
        element: String,
        #[source]
        source: BoxError,
    },
}

/// Terminal state of a load. A `Loader` that has not run yet is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered,
    Failed,
}

pub struct Loader {
    source: Arc<dyn ResourceSource>,
    output: Arc<dyn OutputSink>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Loader {
    pub fn new(
        source: Arc<dyn ResourceSource>,
        output: Arc<dyn OutputSink>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            source,
            output,
            diagnostics,
        }
    }

    /// Run the load exactly once. The content element is always overwritten,
    /// either with the rendered data or with the failure message.
    pub async fn load(self) -> LoadOutcome {
        debug!("loading {}", DATA_INDEX_PATH);
        match self.try_load().await {
            Ok(()) => {
                info!("rendered {} into #{}", DATA_INDEX_PATH, CONTENT_ELEMENT_ID);
                LoadOutcome::Rendered
            }
            Err(e) => {
                self.diagnostics
                    .error(&format!("{}:", LOAD_FAILURE_MESSAGE), &anyhow::Error::new(e));
                if let Err(e) = self
                    .output
                    .replace_content(CONTENT_ELEMENT_ID, LOAD_FAILURE_MESSAGE)
                {
                    warn!("cannot write failure message: {:#}", e);
                }
                LoadOutcome::Failed
            }
        }
    }

    async fn try_load(&self) -> Result<(), LoadError> {
        let body = self
            .source
            .fetch(DATA_INDEX_PATH)
            .await
            .map_err(|e| LoadError::Fetch {
                path: DATA_INDEX_PATH.to_string(),
                source: e.into(),
            })?;

        let data: Value = serde_json::from_slice(&body)?;
        let html = render_pretty(&data).map_err(|e| LoadError::Render(e.into()))?;

        self.output
            .replace_content(CONTENT_ELEMENT_ID, &html)
            .map_err(|e| LoadError::Output {
                element: CONTENT_ELEMENT_ID.to_string(),
                source: e.into(),
            })?;
        Ok(())
    }
}
