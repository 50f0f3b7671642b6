// src/config/prompt.rs
// =============================================================================
// Interactive prompts for settings that were not given up front.
//
// `Interactive` asks on the terminal with dialoguer and re-asks until the
// answer is valid. `NoInput` is used with --no-input: a missing required
// value becomes an error instead of a question.
// =============================================================================

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use std::path::PathBuf;

use super::settings::{normalize_base_url, ConfigError};

pub trait Prompter {
    fn base_url(&self) -> Result<String, ConfigError>;
    fn wordlist(&self) -> Result<PathBuf, ConfigError>;
    fn first_index(&self) -> Result<usize, ConfigError>;
    fn number_of_words(&self) -> Result<usize, ConfigError>;
    fn quiet(&self) -> Result<bool, ConfigError>;
}

#[derive(Default)]
pub struct Interactive {
    theme: ColorfulTheme,
}

impl Prompter for Interactive {
    fn base_url(&self) -> Result<String, ConfigError> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt("What is the base URL of the website? (e.g. https://example.com/blog/)")
            .validate_with(|input: &String| -> Result<(), String> {
                normalize_base_url(input)
                    .map(|_| ())
                    .map_err(|_| "Please enter a valid URL!".to_string())
            })
            .interact_text()?)
    }

    fn wordlist(&self) -> Result<PathBuf, ConfigError> {
        let path: String = Input::with_theme(&self.theme)
            .with_prompt("What is the path to the wordlist?")
            .default("./words.txt".to_string())
            .interact_text()?;
        Ok(PathBuf::from(path))
    }

    // Typed inputs re-ask on their own when the answer does not parse
    fn first_index(&self) -> Result<usize, ConfigError> {
        Ok(Input::<usize>::with_theme(&self.theme)
            .with_prompt("What index in the wordlist do you want to start from?")
            .default(0)
            .interact_text()?)
    }

    fn number_of_words(&self) -> Result<usize, ConfigError> {
        Ok(Input::<usize>::with_theme(&self.theme)
            .with_prompt("How many words do you want to probe?")
            .default(1000)
            .interact_text()?)
    }

    fn quiet(&self) -> Result<bool, ConfigError> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Do you want to run in quiet mode? (no logging for each word)")
            .default(false)
            .interact()?)
    }
}

pub struct NoInput;

impl Prompter for NoInput {
    fn base_url(&self) -> Result<String, ConfigError> {
        Err(ConfigError::Missing("base_url"))
    }

    fn wordlist(&self) -> Result<PathBuf, ConfigError> {
        Err(ConfigError::Missing("wordlist"))
    }

    fn first_index(&self) -> Result<usize, ConfigError> {
        Err(ConfigError::Missing("first_index"))
    }

    fn number_of_words(&self) -> Result<usize, ConfigError> {
        Err(ConfigError::Missing("number_of_words"))
    }

    fn quiet(&self) -> Result<bool, ConfigError> {
        Ok(false)
    }
}
