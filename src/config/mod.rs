// src/config/mod.rs
// =============================================================================
// This module turns flags, config files, environment variables and prompts
// into one validated `Settings` value.
// =============================================================================

mod prompt;
mod settings;

pub use settings::{ConfigError, Engine, Settings, SettingsLayer};

use prompt::{Interactive, NoInput};

use crate::cli::Cli;

// Resolves the settings for this run from every source
pub fn resolve(cli: &Cli) -> Result<Settings, ConfigError> {
    let layer = SettingsLayer::from_file_and_env(cli.config.as_deref())?.merge(cli.to_layer());

    if cli.no_input {
        Settings::resolve(layer, &NoInput)
    } else {
        Settings::resolve(layer, &Interactive::default())
    }
}
