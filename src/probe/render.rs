// src/probe/render.rs
// =============================================================================
// The rendering surface: "navigate to a URL, then measure the root element".
//
// The runner only talks to this trait, so the HTTP engine, the headless
// browser engine and the scripted engine used in tests are interchangeable.
//
// Rust concepts:
// - Traits: a shared interface several types implement
// - async-trait: async methods on a trait used as Arc<dyn Renderer>
// - Send + Sync: the renderer can be shared between tokio tasks
// =============================================================================

use async_trait::async_trait;

use super::outcome::ProbeError;

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Loads `url` and returns the trimmed character length of the root
    /// element's inner HTML.
    ///
    /// A page without a root element is `ProbeError::RootMissing`, never `Ok(0)`.
    async fn measure(&self, url: &str) -> Result<usize, ProbeError>;

    /// Releases everything the engine holds. Called once, after the last probe.
    async fn close(&self) -> Result<(), ProbeError> {
        Ok(())
    }
}
