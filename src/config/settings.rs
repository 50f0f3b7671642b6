// src/config/settings.rs
// =============================================================================
// Run settings and how they are put together.
//
// Sources, lowest to highest priority:
//   built-in defaults < config file (--config) < PATHPROBE_* env vars < CLI flags
//
// Whatever is still missing after that (base URL, wordlist, start index,
// word count, quiet mode) is asked for interactively, see prompt.rs.
// Everything is validated before the first page is visited.
//
// Rust concepts:
// - Option<T>: every layer value may be absent
// - Option::or: the first Some wins when stacking layers
// - thiserror: one error enum with a readable message per failure
// =============================================================================

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::prompt::Prompter;

pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ROOT_SELECTOR: &str = "#root";
pub const DEFAULT_OUTPUT: &str = "./result.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("'{field}' must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("missing required setting '{0}' (pass it as a flag or drop --no-input)")]
    Missing(&'static str),
    #[error("{0}")]
    Selector(String),
    #[error("the 'browser' engine is not available in this build (rebuild with --features browser)")]
    EngineUnavailable,
    #[error("could not load config file: {0}")]
    File(#[from] ::config::ConfigError),
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

// Which rendering engine visits the pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Fetch raw HTML with an HTTP client; fast, but JavaScript never runs
    Http,
    /// Render the page in headless Chromium (default when built with "browser")
    Browser,
}

// Browser whenever Chromium support is compiled in
impl Default for Engine {
    fn default() -> Self {
        if cfg!(feature = "browser") {
            Engine::Browser
        } else {
            Engine::Http
        }
    }
}

// Fully resolved and validated settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Always ends with '/'
    pub base_url: String,
    pub wordlist: PathBuf,
    pub first_index: usize,
    pub number_of_words: usize,
    pub quiet: bool,
    pub concurrency: usize,
    pub timeout: Duration,
    pub root_selector: String,
    pub engine: Engine,
    pub output: PathBuf,
}

// One source of settings where every value is optional
//
// The same shape is filled from the config file, the environment and the CLI,
// then the layers are stacked with `merge`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsLayer {
    pub base_url: Option<String>,
    pub wordlist: Option<PathBuf>,
    pub first_index: Option<usize>,
    pub number_of_words: Option<usize>,
    pub quiet: Option<bool>,
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub root_selector: Option<String>,
    pub engine: Option<Engine>,
    pub output: Option<PathBuf>,
}

impl SettingsLayer {
    // Loads the config file (if any) and PATHPROBE_* environment variables
    pub fn from_file_and_env(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        builder = builder.add_source(::config::Environment::with_prefix("PATHPROBE").try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }

    // Returns a layer where every value set in `over` replaces ours
    pub fn merge(self, over: SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            base_url: over.base_url.or(self.base_url),
            wordlist: over.wordlist.or(self.wordlist),
            first_index: over.first_index.or(self.first_index),
            number_of_words: over.number_of_words.or(self.number_of_words),
            quiet: over.quiet.or(self.quiet),
            concurrency: over.concurrency.or(self.concurrency),
            timeout_secs: over.timeout_secs.or(self.timeout_secs),
            root_selector: over.root_selector.or(self.root_selector),
            engine: over.engine.or(self.engine),
            output: over.output.or(self.output),
        }
    }
}

impl Settings {
    // Turns a merged layer into final settings
    //
    // Missing interactive values are requested from `prompter`; everything is
    // then validated. Nothing here touches the network.
    pub fn resolve(layer: SettingsLayer, prompter: &dyn Prompter) -> Result<Self, ConfigError> {
        let base_url = match layer.base_url {
            Some(url) => normalize_base_url(&url)?,
            None => normalize_base_url(&prompter.base_url()?)?,
        };
        let wordlist = match layer.wordlist {
            Some(path) => path,
            None => prompter.wordlist()?,
        };
        let first_index = match layer.first_index {
            Some(index) => index,
            None => prompter.first_index()?,
        };
        let number_of_words = match layer.number_of_words {
            Some(count) => count,
            None => prompter.number_of_words()?,
        };
        let quiet = match layer.quiet {
            Some(quiet) => quiet,
            None => prompter.quiet()?,
        };

        let concurrency = layer.concurrency.unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(ConfigError::OutOfRange {
                field: "concurrency",
                expected: "at least 1",
                value: concurrency.to_string(),
            });
        }

        let timeout_secs = layer.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                field: "timeout",
                expected: "at least 1 second",
                value: timeout_secs.to_string(),
            });
        }

        let root_selector = layer
            .root_selector
            .unwrap_or_else(|| DEFAULT_ROOT_SELECTOR.to_string());
        crate::probe::validate_selector(&root_selector)
            .map_err(|e| ConfigError::Selector(e.to_string()))?;

        let engine = layer.engine.unwrap_or_default();
        if engine == Engine::Browser && !cfg!(feature = "browser") {
            return Err(ConfigError::EngineUnavailable);
        }

        Ok(Settings {
            base_url,
            wordlist,
            first_index,
            number_of_words,
            quiet,
            concurrency,
            timeout: Duration::from_secs(timeout_secs),
            root_selector,
            engine,
            output: layer.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Settings {
            base_url: "https://example.com/".to_string(),
            wordlist: PathBuf::from("words.txt"),
            first_index: 0,
            number_of_words: 10,
            quiet: true,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            root_selector: DEFAULT_ROOT_SELECTOR.to_string(),
            engine: Engine::Http,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

// Validates a base URL and makes sure it ends with '/'
//
// A missing scheme defaults to https, so "example.com/blog" is accepted.
// Query strings and fragments are rejected because words are appended to the
// end of the URL.
//
// Examples:
//   "https://example.com/blog" -> "https://example.com/blog/"
//   "example.com"              -> "https://example.com/"
pub fn normalize_base_url(input: &str) -> Result<String, ConfigError> {
    let trimmed = input.trim();
    let invalid = |reason: &str| ConfigError::InvalidUrl {
        url: input.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("URL is empty"));
    }

    let mut candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&candidate).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("URL has no host"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("URL must not contain a query or fragment"));
    }

    if !candidate.ends_with('/') {
        candidate.push('/');
    }
    Ok(candidate)
}

// BEGINNER NOTES:
//
// 1. Why is every SettingsLayer field an Option?
//    - A config file may set only concurrency, the environment only the URL
//    - None means "this source said nothing", so a lower layer can still fill it
//    - `over.x.or(self.x)` keeps the higher layer's value when it has one
//
// 2. What does #[serde(default)] do?
//    - Keys missing from the config file become None instead of an error
//
// 3. What is cfg!(feature = "browser")?
//    - A compile-time true/false for whether the "browser" feature is enabled
//    - Unlike #[cfg(...)], both branches must still compile
//
// 4. Why ::config:: with leading colons?
//    - Our own module is also called `config`; the leading `::` means the
//      external crate

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::prompt::NoInput;
    use std::io::Write;

    fn complete_layer() -> SettingsLayer {
        SettingsLayer {
            base_url: Some("https://example.com/blog".to_string()),
            wordlist: Some(PathBuf::from("words.txt")),
            first_index: Some(0),
            number_of_words: Some(100),
            ..SettingsLayer::default()
        }
    }

    #[test]
    fn test_trailing_slash_added() {
        assert_eq!(
            normalize_base_url("https://example.com/blog").unwrap(),
            "https://example.com/blog/"
        );
        assert_eq!(
            normalize_base_url("https://example.com/blog/").unwrap(),
            "https://example.com/blog/"
        );
    }

    #[test]
    fn test_missing_scheme_defaults_to_https() {
        assert_eq!(normalize_base_url("example.com").unwrap(), "https://example.com/");
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(normalize_base_url("").is_err());
        assert!(normalize_base_url("ftp://example.com/").is_err());
        assert!(normalize_base_url("https://").is_err());
        assert!(normalize_base_url("https://example.com/?page=1").is_err());
    }

    #[test]
    fn test_later_layer_wins() {
        let file = SettingsLayer {
            base_url: Some("https://from-file.com/".to_string()),
            concurrency: Some(4),
            ..SettingsLayer::default()
        };
        let cli = SettingsLayer {
            base_url: Some("https://from-cli.com/".to_string()),
            ..SettingsLayer::default()
        };

        let merged = file.merge(cli);
        assert_eq!(merged.base_url.as_deref(), Some("https://from-cli.com/"));
        assert_eq!(merged.concurrency, Some(4));
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let settings = Settings::resolve(complete_layer(), &NoInput).unwrap();

        assert_eq!(settings.base_url, "https://example.com/blog/");
        assert_eq!(settings.concurrency, 1);
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.root_selector, "#root");
        assert_eq!(settings.engine, Engine::default());
        assert_eq!(settings.output, PathBuf::from("./result.json"));
        assert!(!settings.quiet);
    }

    #[test]
    fn test_resolve_without_input_reports_missing_field() {
        let layer = SettingsLayer {
            wordlist: None,
            ..complete_layer()
        };
        let err = Settings::resolve(layer, &NoInput).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("wordlist")));
    }

    #[test]
    fn test_resolve_rejects_zero_concurrency() {
        let layer = SettingsLayer {
            concurrency: Some(0),
            ..complete_layer()
        };
        assert!(matches!(
            Settings::resolve(layer, &NoInput),
            Err(ConfigError::OutOfRange { field: "concurrency", .. })
        ));
    }

    #[test]
    fn test_resolve_rejects_invalid_selector() {
        let layer = SettingsLayer {
            root_selector: Some("div[".to_string()),
            ..complete_layer()
        };
        assert!(matches!(
            Settings::resolve(layer, &NoInput),
            Err(ConfigError::Selector(_))
        ));
    }

    #[test]
    fn test_default_engine_follows_build_features() {
        let expected = if cfg!(feature = "browser") {
            Engine::Browser
        } else {
            Engine::Http
        };
        assert_eq!(Engine::default(), expected);
    }

    #[test]
    fn test_explicit_http_engine_overrides_default() {
        let layer = SettingsLayer {
            engine: Some(Engine::Http),
            ..complete_layer()
        };
        assert_eq!(Settings::resolve(layer, &NoInput).unwrap().engine, Engine::Http);
    }

    #[cfg(not(feature = "browser"))]
    #[test]
    fn test_browser_engine_needs_feature() {
        let layer = SettingsLayer {
            engine: Some(Engine::Browser),
            ..complete_layer()
        };
        assert!(matches!(
            Settings::resolve(layer, &NoInput),
            Err(ConfigError::EngineUnavailable)
        ));
    }

    #[test]
    fn test_loads_toml_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "base_url = \"https://example.com/app\"\nnumber_of_words = 250\nconcurrency = 3\nengine = \"http\""
        )
        .unwrap();

        let layer = SettingsLayer::from_file_and_env(Some(file.path())).unwrap();
        assert_eq!(layer.base_url.as_deref(), Some("https://example.com/app"));
        assert_eq!(layer.number_of_words, Some(250));
        assert_eq!(layer.concurrency, Some(3));
        assert_eq!(layer.engine, Some(Engine::Http));
    }
}
