// src/probe/browser.rs
// =============================================================================
// Headless Chromium engine (cargo feature "browser", on by default).
//
// Pages that build their content with JavaScript have an empty root element in
// the raw HTML. This engine lets Chromium run the page, waits for the load
// event, then reads the root element straight out of the live DOM.
//
// One browser is launched per run; each probe gets its own tab. The tab is
// closed when the measurement is taken, when the page times out, and also
// when the runner drops the probe early. Set CHROMIUM_REMOTE_DEBUGGING_URL to
// reuse an already-running Chrome instead of launching one.
// =============================================================================

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use super::outcome::ProbeError;
use super::render::Renderer;

pub struct BrowserRenderer {
    // None once close() ran
    browser: RwLock<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
    selector: String,
    timeout: Duration,
}

impl BrowserRenderer {
    pub async fn launch(root_selector: &str, timeout: Duration) -> Result<Self, ProbeError> {
        let remote_debugging_url = std::env::var("CHROMIUM_REMOTE_DEBUGGING_URL").ok();

        let (browser, mut handler) = if let Some(url) = remote_debugging_url {
            tracing::info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url)
                .await
                .map_err(|e| ProbeError::Renderer(format!("failed to connect to Chrome: {}", e)))?
        } else {
            let config = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(timeout)
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .build()
                .map_err(ProbeError::Renderer)?;

            Browser::launch(config)
                .await
                .map_err(|e| ProbeError::Renderer(format!("failed to launch Chrome: {}", e)))?
        };

        // The handler has to be polled for the browser connection to make progress
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser: RwLock::new(Some(browser)),
            handler: Mutex::new(Some(handle)),
            selector: root_selector.to_string(),
            timeout,
        })
    }

    async fn measure_page(&self, page: &Page, url: &str) -> Result<usize, ProbeError> {
        page.goto(url)
            .await
            .map_err(|e| ProbeError::Navigation(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ProbeError::Navigation(e.to_string()))?;

        let length: i64 = page
            .evaluate(measure_script(&self.selector)?)
            .await
            .map_err(|e| ProbeError::Renderer(e.to_string()))?
            .into_value()
            .map_err(|e| ProbeError::Renderer(e.to_string()))?;

        root_length(length, &self.selector)
    }
}

// Evaluates to the trimmed length of the root's inner HTML, or -1 when there
// is no root (a JS null comes back without a value). The selector is embedded
// as a JSON string literal so quotes in it cannot break the script.
fn measure_script(selector: &str) -> Result<String, ProbeError> {
    let selector = serde_json::to_string(selector).map_err(|e| ProbeError::Renderer(e.to_string()))?;
    Ok(format!(
        "(() => {{ const root = document.querySelector({}); \
         return root ? root.innerHTML.trim().length : -1; }})()",
        selector
    ))
}

// -1 (or anything negative) from measure_script means the root was not found
fn root_length(length: i64, selector: &str) -> Result<usize, ProbeError> {
    usize::try_from(length).map_err(|_| ProbeError::RootMissing {
        selector: selector.to_string(),
    })
}

// Owns a tab until it is closed
//
// close() closes it in place. If the guard is dropped instead (the runner's
// timeout cancelled the probe future), the close is handed to the runtime.
struct TabGuard {
    page: Option<Page>,
}

impl TabGuard {
    fn new(page: Page) -> Self {
        Self { page: Some(page) }
    }

    async fn close(mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::debug!(error = %e, "failed to close tab");
            }
        }
    }
}

impl Drop for TabGuard {
    fn drop(&mut self) {
        let Some(page) = self.page.take() else {
            return;
        };
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                if let Err(e) = page.close().await {
                    tracing::debug!(error = %e, "failed to close abandoned tab");
                }
            });
        }
    }
}

#[async_trait]
impl Renderer for BrowserRenderer {
    async fn measure(&self, url: &str) -> Result<usize, ProbeError> {
        let guard = self.browser.read().await;
        let browser = guard
            .as_ref()
            .ok_or_else(|| ProbeError::Renderer("browser already closed".to_string()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ProbeError::Renderer(e.to_string()))?;
        let tab = TabGuard::new(page.clone());

        let result = match tokio::time::timeout(self.timeout, self.measure_page(&page, url)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
        };

        tab.close().await;
        result
    }

    async fn close(&self) -> Result<(), ProbeError> {
        let result = match self.browser.write().await.take() {
            Some(mut browser) => {
                let closed = browser
                    .close()
                    .await
                    .map(|_| ())
                    .map_err(|e| ProbeError::Renderer(e.to_string()));
                if closed.is_ok() {
                    let _ = browser.wait().await;
                }
                closed
            }
            None => Ok(()),
        };

        if let Some(handle) = self.handler.lock().await.take() {
            handle.abort();
        }

        result
    }
}
