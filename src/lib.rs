pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod repository;
pub mod signal;

pub use config::{load_config, BookConfig};
pub use error::{ParseError, RecipeBookError, Result};
pub use format::FileFormat;
pub use model::{Ingredient, Recipe};
pub use repository::RecipeRepository;
pub use signal::{ChangedSignal, Signal, SubscriptionId, WeakSignal};

