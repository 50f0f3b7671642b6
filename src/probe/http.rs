// src/probe/http.rs
// =============================================================================
// The default rendering engine: plain HTTP + HTML parsing.
//
// How a page is measured:
// - GET the URL (following up to 10 redirects)
// - Anything other than a 2xx final status counts as a failed navigation
// - Parse the body with scraper and find the root element (default "#root")
// - Return the length of its inner HTML after trimming whitespace
//
// This does not run JavaScript. For client-rendered sites use the
// browser engine (cargo feature "browser").
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

use super::outcome::ProbeError;
use super::render::Renderer;

const USER_AGENT: &str = concat!("pathprobe/", env!("CARGO_PKG_VERSION"));

pub struct HttpRenderer {
    client: Client,
    selector: Selector,
    selector_text: String,
    timeout: Duration,
}

impl HttpRenderer {
    // Builds the engine
    //
    // Parameters:
    //   root_selector: CSS selector of the element to measure
    //   timeout: request timeout, also reported when a request times out
    pub fn new(root_selector: &str, timeout: Duration) -> Result<Self, ProbeError> {
        let selector = parse_selector(root_selector)?;

        // One client for the whole run so connections get reused
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProbeError::Renderer(e.to_string()))?;

        Ok(Self {
            client,
            selector,
            selector_text: root_selector.to_string(),
            timeout,
        })
    }

    fn categorize_error(&self, error: reqwest::Error) -> ProbeError {
        if error.is_timeout() {
            ProbeError::Timeout(self.timeout)
        } else if error.is_redirect() {
            ProbeError::Navigation("too many redirects".to_string())
        } else if error.is_connect() {
            ProbeError::Navigation(format!("connection failed: {}", error))
        } else {
            ProbeError::Navigation(error.to_string())
        }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn measure(&self, url: &str) -> Result<usize, ProbeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.categorize_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        let html = response.text().await.map_err(|e| self.categorize_error(e))?;

        measure_root(&html, &self.selector).ok_or_else(|| ProbeError::RootMissing {
            selector: self.selector_text.clone(),
        })
    }
}

pub fn parse_selector(root_selector: &str) -> Result<Selector, ProbeError> {
    Selector::parse(root_selector).map_err(|e| ProbeError::InvalidSelector {
        selector: root_selector.to_string(),
        reason: e.to_string(),
    })
}

// Finds the first element matching `selector` and returns the trimmed
// character length of its inner HTML, or None if there is no such element
fn measure_root(html: &str, selector: &Selector) -> Option<usize> {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .next()
        .map(|root| root.inner_html().trim().chars().count())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is measure_root a separate, non-async function?
//    - scraper's Html type is not Send, so it must not live across an .await
//    - Keeping the parsing in a plain function guarantees it is dropped before
//      the future yields again
//
// 2. Why Option<usize> instead of 0 for a missing element?
//    - "the page has an empty #root" and "the page has no #root at all" are
//      different answers; the caller turns None into ProbeError::RootMissing
//
// 3. What does chars().count() do?
//    - Counts Unicode scalar values, not bytes
//    - "héllo".len() is 6 (bytes) but "héllo".chars().count() is 5
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn root_selector() -> Selector {
        parse_selector("#root").unwrap()
    }

    #[test]
    fn test_measure_root_with_content() {
        let html = r#"<html><body><div id="root">  <p>hi</p>  </div></body></html>"#;
        assert_eq!(measure_root(html, &root_selector()), Some("<p>hi</p>".len()));
    }

    #[test]
    fn test_measure_root_whitespace_only() {
        let html = "<html><body><div id=\"root\">\n   \n</div></body></html>";
        assert_eq!(measure_root(html, &root_selector()), Some(0));
    }

    #[test]
    fn test_measure_root_missing() {
        let html = r#"<html><body><div id="app">content</div></body></html>"#;
        assert_eq!(measure_root(html, &root_selector()), None);
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let err = HttpRenderer::new("div[", Duration::from_secs(5)).err().unwrap();
        assert!(matches!(err, ProbeError::InvalidSelector { .. }));
    }

    #[tokio::test]
    async fn test_measure_against_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/full"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<div id="root"><h1>Welcome</h1></div>"#),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"<div id="root"></div>"#))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bare"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>no root here</p>"))
            .mount(&server)
            .await;

        let renderer = HttpRenderer::new("#root", Duration::from_secs(5)).unwrap();
        let base = server.uri();

        let full = renderer.measure(&format!("{}/full", base)).await;
        assert_eq!(full, Ok("<h1>Welcome</h1>".len()));

        let empty = renderer.measure(&format!("{}/empty", base)).await;
        assert_eq!(empty, Ok(0));

        let bare = renderer.measure(&format!("{}/bare", base)).await;
        assert_eq!(
            bare,
            Err(ProbeError::RootMissing {
                selector: "#root".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_not_found_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"<div id="root">Not Found</div>"#),
            )
            .mount(&server)
            .await;

        let renderer = HttpRenderer::new("#root", Duration::from_secs(5)).unwrap();
        let result = renderer.measure(&format!("{}/gone", server.uri())).await;
        assert_eq!(result, Err(ProbeError::Status(404)));
    }

    #[tokio::test]
    async fn test_slow_page_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<div id="root">late</div>"#)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let renderer = HttpRenderer::new("#root", Duration::from_millis(200)).unwrap();
        let result = renderer.measure(&format!("{}/slow", server.uri())).await;
        assert_eq!(result, Err(ProbeError::Timeout(Duration::from_millis(200))));
    }
}
