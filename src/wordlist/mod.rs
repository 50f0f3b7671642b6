// src/wordlist/mod.rs
// =============================================================================
// This module is the "word source" of the tool.
//
// It loads a newline-delimited wordlist from disk and cuts out the slice of
// words the operator asked for (start offset + count).
// =============================================================================

mod source;

pub use source::{load, slice};
