//! The line-oriented recipe file format.
//!
//! A file is a sequence of recipe blocks. Each block is introduced by the
//! recipe marker line followed by the recipe name, then the ingredient marker
//! and one `amount;measure;name` line per ingredient, then the instruction
//! marker and the free-text instruction lines:
//!
//! ```text
//! #recipe
//! Pannkakor
//! #ingredients
//! 3;;ägg
//! 6;dl;mjölk
//! #instructions
//! Vispa ihop allt och stek i smör.
//! ```
//!
//! Markers are matched by exact line equality.

mod parser;
mod serializer;

pub use parser::{Effect, ParseState, Parser};

use serde::Deserialize;

use crate::error::{RecipeBookError, Result};

pub const DEFAULT_RECIPE_MARKER: &str = "#recipe";
pub const DEFAULT_INGREDIENT_MARKER: &str = "#ingredients";
pub const DEFAULT_INSTRUCTION_MARKER: &str = "#instructions";
pub const DEFAULT_DELIMITER: char = ';';

/// Marker lines and ingredient field delimiter of a recipe file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileFormat {
    /// Line that starts a new recipe block
    #[serde(default = "default_recipe_marker")]
    pub recipe_marker: String,
    /// Line that starts the ingredient section of the current recipe
    #[serde(default = "default_ingredient_marker")]
    pub ingredient_marker: String,
    /// Line that starts the instruction section of the current recipe
    #[serde(default = "default_instruction_marker")]
    pub instruction_marker: String,
    /// Separator between amount, measure and name on an ingredient line
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for FileFormat {
    fn default() -> Self {
        FileFormat {
            recipe_marker: default_recipe_marker(),
            ingredient_marker: default_ingredient_marker(),
            instruction_marker: default_instruction_marker(),
            delimiter: default_delimiter(),
        }
    }
}

// Default value functions
fn default_recipe_marker() -> String {
    DEFAULT_RECIPE_MARKER.to_string()
}

fn default_ingredient_marker() -> String {
    DEFAULT_INGREDIENT_MARKER.to_string()
}

fn default_instruction_marker() -> String {
    DEFAULT_INSTRUCTION_MARKER.to_string()
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

impl FileFormat {
    /// Create a validated file format
    ///
    /// # Errors
    /// Returns `RecipeBookError::InvalidFormat` if a marker is empty, contains
    /// the delimiter or a line break, or two markers are identical.
    pub fn new(
        recipe_marker: impl Into<String>,
        ingredient_marker: impl Into<String>,
        instruction_marker: impl Into<String>,
        delimiter: char,
    ) -> Result<Self> {
        let format = FileFormat {
            recipe_marker: recipe_marker.into(),
            ingredient_marker: ingredient_marker.into(),
            instruction_marker: instruction_marker.into(),
            delimiter,
        };
        format.validate()?;
        Ok(format)
    }

    /// Check that the three markers can be told apart from each other and
    /// from ingredient lines
    pub fn validate(&self) -> Result<()> {
        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(RecipeBookError::InvalidFormat(
                "delimiter cannot be a line break".to_string(),
            ));
        }

        let markers = [
            ("recipe", &self.recipe_marker),
            ("ingredient", &self.ingredient_marker),
            ("instruction", &self.instruction_marker),
        ];

        for (kind, marker) in markers {
            if marker.is_empty() {
                return Err(RecipeBookError::InvalidFormat(format!(
                    "{} marker cannot be empty",
                    kind
                )));
            }
            if marker.contains(['\n', '\r']) {
                return Err(RecipeBookError::InvalidFormat(format!(
                    "{} marker cannot contain a line break",
                    kind
                )));
            }
            if marker.contains(self.delimiter) {
                return Err(RecipeBookError::InvalidFormat(format!(
                    "{} marker '{}' contains the delimiter '{}'",
                    kind, marker, self.delimiter
                )));
            }
        }

        if self.recipe_marker == self.ingredient_marker
            || self.recipe_marker == self.instruction_marker
            || self.ingredient_marker == self.instruction_marker
        {
            return Err(RecipeBookError::InvalidFormat(
                "section markers must be distinct".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether `line` is one of the three section markers
    pub fn is_marker(&self, line: &str) -> bool {
        line == self.recipe_marker
            || line == self.ingredient_marker
            || line == self.instruction_marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let format = FileFormat::default();
        assert_eq!(format.recipe_marker, "#recipe");
        assert_eq!(format.ingredient_marker, "#ingredients");
        assert_eq!(format.instruction_marker, "#instructions");
        assert_eq!(format.delimiter, ';');
        assert!(format.validate().is_ok());
    }

    #[test]
    fn test_new_accepts_custom_markers() {
        let format = FileFormat::new("[R]", "[I]", "[S]", '|').unwrap();
        assert!(format.is_marker("[R]"));
        assert!(format.is_marker("[S]"));
        assert!(!format.is_marker("[R] "));
    }

    #[test]
    fn test_new_rejects_duplicate_markers() {
        let result = FileFormat::new("#a", "#a", "#b", ';');
        assert!(matches!(result, Err(RecipeBookError::InvalidFormat(_))));
    }

    #[test]
    fn test_new_rejects_empty_marker() {
        let result = FileFormat::new("", "#i", "#s", ';');
        assert!(matches!(result, Err(RecipeBookError::InvalidFormat(_))));
    }

    #[test]
    fn test_new_rejects_marker_containing_delimiter() {
        let result = FileFormat::new("#r;", "#i", "#s", ';');
        assert!(matches!(result, Err(RecipeBookError::InvalidFormat(_))));
    }

    #[test]
    fn test_new_rejects_line_break_delimiter() {
        let result = FileFormat::new("#r", "#i", "#s", '\n');
        assert!(matches!(result, Err(RecipeBookError::InvalidFormat(_))));
    }
}
