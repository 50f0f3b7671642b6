// src/probe/mod.rs
// =============================================================================
// This module visits candidate pages and decides which ones "worked".
//
// Submodules:
// - outcome: what a single probe can end up as
// - render: the Renderer trait ("navigate, then measure the root element")
// - http: raw-HTML engine, reqwest + scraper (no JavaScript)
// - browser: headless Chromium engine, the default (cargo feature "browser")
// - runner: the bounded worker pool that drives a whole run
// =============================================================================

mod outcome;
mod render;
mod http;
#[cfg(feature = "browser")]
mod browser;
mod runner;

use std::sync::Arc;

pub use outcome::{Outcome, ProbeError, ProbeRecord};
pub use render::Renderer;
pub use runner::{Observer, ProbeRunner, RunReport, RunnerConfig};

use crate::config::{Engine, Settings};

// Creates the rendering engine selected in the settings
pub async fn build_renderer(settings: &Settings) -> Result<Arc<dyn Renderer>, ProbeError> {
    match settings.engine {
        Engine::Http => {
            let renderer = http::HttpRenderer::new(&settings.root_selector, settings.timeout)?;
            Ok(Arc::new(renderer))
        }
        #[cfg(feature = "browser")]
        Engine::Browser => {
            let renderer =
                browser::BrowserRenderer::launch(&settings.root_selector, settings.timeout).await?;
            Ok(Arc::new(renderer))
        }
        #[cfg(not(feature = "browser"))]
        Engine::Browser => Err(ProbeError::Renderer(
            "this build does not include the browser engine (enable the 'browser' feature)"
                .to_string(),
        )),
    }
}

pub fn validate_selector(root_selector: &str) -> Result<(), ProbeError> {
    http::parse_selector(root_selector).map(|_| ())
}

impl From<&Settings> for RunnerConfig {
    fn from(settings: &Settings) -> Self {
        RunnerConfig {
            base_url: settings.base_url.clone(),
            concurrency: settings.concurrency,
            probe_timeout: settings.timeout,
        }
    }
}
