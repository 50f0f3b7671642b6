// src/probe/outcome.rs
// =============================================================================
// What a single probe can end up as.
//
// A probe either finds content under the root element, finds the root element
// empty, or fails. Failures never stop the run; they are folded into a
// "did not work" outcome for that one word.
// =============================================================================

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// Network-level failure (DNS, connection refused, TLS, body read...)
    #[error("navigation failed: {0}")]
    Navigation(String),
    /// The page loaded but the server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),
    /// The probe did not finish within the per-probe timeout
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    /// The page has no element matching the root selector
    #[error("root element '{selector}' not found")]
    RootMissing { selector: String },
    #[error("invalid root selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
    /// Failure inside the rendering engine itself (launch, page setup, close)
    #[error("renderer error: {0}")]
    Renderer(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Root element exists and renders `length` characters after trimming
    Worked { length: usize },
    /// Root element exists but is empty
    Empty,
    Failed(ProbeError),
}

impl Outcome {
    pub fn from_measurement(length: usize) -> Self {
        if length > 0 {
            Outcome::Worked { length }
        } else {
            Outcome::Empty
        }
    }

    pub fn is_worked(&self) -> bool {
        matches!(self, Outcome::Worked { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

// Everything we know about one finished probe
#[derive(Debug, Clone)]
pub struct ProbeRecord {
    /// Position of the word in the active slice of the wordlist
    pub index: usize,
    pub word: String,
    pub url: String,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_length_is_empty_not_worked() {
        assert_eq!(Outcome::from_measurement(0), Outcome::Empty);
        assert!(!Outcome::from_measurement(0).is_worked());
    }

    #[test]
    fn test_positive_length_is_worked() {
        assert!(Outcome::from_measurement(12).is_worked());
    }

    #[test]
    fn test_root_missing_is_a_failure() {
        let outcome = Outcome::Failed(ProbeError::RootMissing {
            selector: "#root".to_string(),
        });
        assert!(outcome.is_failed());
        assert!(!outcome.is_worked());
    }
}
