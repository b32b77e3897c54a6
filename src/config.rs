use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::format::FileFormat;

/// Settings for a recipe book
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BookConfig {
    /// Location of the recipe file, resolved against the current directory
    #[serde(default = "default_path")]
    pub path: String,
    /// Markers and delimiter of the recipe file
    #[serde(default)]
    pub format: FileFormat,
}

impl Default for BookConfig {
    fn default() -> Self {
        BookConfig {
            path: default_path(),
            format: FileFormat::default(),
        }
    }
}

fn default_path() -> String {
    "recipes.txt".to_string()
}

impl BookConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_BOOK__ prefix
    /// 2. recipe-book.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_BOOK__FORMAT__DELIMITER
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`BookConfig::load`] for the source priority.
pub fn load_config() -> Result<BookConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-book").required(false))
        // Use double underscore for nested: RECIPE_BOOK__FORMAT__RECIPE_MARKER
        .add_source(Environment::with_prefix("RECIPE_BOOK").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Parse configuration from TOML text, filling in defaults for missing keys
pub fn config_from_toml(toml: &str) -> Result<BookConfig, ConfigError> {
    Config::builder()
        .add_source(File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_values() {
        let config = BookConfig::default();
        assert_eq!(config.path, "recipes.txt");
        assert_eq!(config.format, FileFormat::default());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = config_from_toml("").unwrap();
        assert_eq!(config, BookConfig::default());
    }

    #[test]
    fn test_toml_overrides_path_and_format() {
        let config = config_from_toml(
            r#"
            path = "data/kokbok.txt"

            [format]
            recipe_marker = "[recept]"
            delimiter = "|"
            "#,
        )
        .unwrap();

        assert_eq!(config.path, "data/kokbok.txt");
        assert_eq!(config.format.recipe_marker, "[recept]");
        assert_eq!(config.format.ingredient_marker, "#ingredients");
        assert_eq!(config.format.delimiter, '|');
    }

    #[test]
    fn test_load_config_without_file_or_environment_uses_defaults() {
        // Clear any environment variables that might interfere
        let keys_to_clear: Vec<String> = env::vars()
            .filter(|(k, _)| k.starts_with("RECIPE_BOOK__"))
            .map(|(k, _)| k)
            .collect();

        for key in keys_to_clear {
            env::remove_var(&key);
        }

        assert!(!std::path::Path::new("recipe-book.toml").exists());
        assert_eq!(load_config().unwrap(), BookConfig::default());
    }
}
