use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, writing or querying a recipe book
#[derive(Error, Debug)]
pub enum RecipeBookError {
    /// The backing file location could not be resolved
    #[error("Invalid location '{}': {reason}", path.display())]
    InvalidLocation { path: PathBuf, reason: String },

    /// The configured markers or delimiter cannot form an unambiguous file format
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// A data line does not match the grammar of the current section
    #[error("Format violation on line {line}: {source}")]
    FormatViolation {
        line: usize,
        #[source]
        source: ParseError,
    },

    /// The backing file could not be opened, read or written
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A position outside the stored recipes was requested
    #[error("Index {index} is out of range for {len} recipes")]
    IndexOutOfRange { index: usize, len: usize },

    /// A recipe cannot be stored as given
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),

    /// A recipe with the same name is already stored
    #[error("A recipe named '{0}' already exists")]
    DuplicateRecipe(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Why a single line of a recipe file was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An ingredient line did not split into amount, measure and name
    #[error("expected 3 ingredient fields, found {found}")]
    WrongFieldCount { found: usize },

    /// A data line appeared before any section marker
    #[error("data line before any section marker")]
    DataBeforeSection,

    /// An ingredient or instruction line appeared before any recipe name
    #[error("section content before any recipe name")]
    ContentBeforeRecipe,
}

impl RecipeBookError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecipeBookError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = RecipeBookError> = std::result::Result<T, E>;
