// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every run setting can be given here. Anything left out falls back to the
// config file, then PATHPROBE_* environment variables, then an interactive
// prompt (see src/config/).
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct definition
// - Doc comments (///): become the --help text for each flag
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Engine, SettingsLayer};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "pathprobe",
    version,
    about = "Brute-force sub-paths of a website and report the ones that render content",
    long_about = "pathprobe appends each word of a wordlist to a base URL, loads the page and \
                  checks whether its root element renders any content. Words that do are \
                  printed and saved to a JSON file."
)]
pub struct Cli {
    /// Base URL to probe under (e.g. https://example.com/blog/)
    #[arg(short = 'u', long = "url")]
    pub base_url: Option<String>,

    /// Path to a newline-delimited wordlist
    #[arg(short, long)]
    pub wordlist: Option<PathBuf>,

    /// Index of the first word to use
    #[arg(short = 's', long = "start")]
    pub first_index: Option<usize>,

    /// How many words to probe
    #[arg(short = 'n', long = "count")]
    pub number_of_words: Option<usize>,

    /// Only print words that worked (no per-word timing)
    #[arg(short, long)]
    pub quiet: bool,

    /// Number of pages visited at the same time
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Per-page timeout in seconds
    #[arg(long = "timeout")]
    pub timeout_secs: Option<u64>,

    /// CSS selector of the element whose content is measured
    #[arg(long)]
    pub root_selector: Option<String>,

    /// Rendering engine. "browser" runs JavaScript and is the default when
    /// built with the "browser" feature; "http" is faster but only sees the
    /// raw HTML, so client-rendered pages look empty
    #[arg(long, value_enum)]
    pub engine: Option<Engine>,

    /// Where to write the JSON list of words that worked
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (TOML, JSON or YAML) with any of the settings above
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Never prompt; fail if a required setting is missing
    #[arg(long)]
    pub no_input: bool,

    /// Show debug logs
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    // The settings given on the command line, as the top configuration layer
    pub fn to_layer(&self) -> SettingsLayer {
        SettingsLayer {
            base_url: self.base_url.clone(),
            wordlist: self.wordlist.clone(),
            first_index: self.first_index,
            number_of_words: self.number_of_words,
            // An absent flag means "not decided yet", so the prompt still asks
            quiet: self.quiet.then_some(true),
            concurrency: self.concurrency,
            timeout_secs: self.timeout_secs,
            root_selector: self.root_selector.clone(),
            engine: self.engine,
            output: self.output.clone(),
        }
    }
}

// BEGINNER NOTES:
//
// 1. Why Option<usize> instead of a default value on the flag?
//    - clap would fill in the default and we could no longer tell whether the
//      user typed it, so a config file value would always be overridden
//    - None lets the lower layers (file, env, prompt) decide
//
// 2. What does bool::then_some do?
//    - `true.then_some(x)` is Some(x), `false.then_some(x)` is None
//
// 3. What is value_enum?
//    - It maps "--engine http" straight onto the Engine enum and lists the
//      possible values in --help
