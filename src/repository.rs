//! The authoritative in-memory recipe collection and its backing file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::config::BookConfig;
use crate::error::{RecipeBookError, Result};
use crate::format::FileFormat;
use crate::model::Recipe;
use crate::signal::{ChangedSignal, SubscriptionId};

/// Owns the recipes of one recipe file.
///
/// Callers only ever receive copies of the stored recipes, so the repository
/// stays the single source of truth. Loading, deleting and adding emit the
/// [`ChangedSignal`]; subscribers receive the repository and read the new
/// state through [`get_all`] or [`get_at`].
///
/// [`get_all`]: RecipeRepository::get_all
/// [`get_at`]: RecipeRepository::get_at
#[derive(Debug)]
pub struct RecipeRepository {
    recipes: Vec<Recipe>,
    path: PathBuf,
    format: FileFormat,
    modified: bool,
    changed: ChangedSignal,
}

impl RecipeRepository {
    /// Create an empty repository bound to `path` using the default file format
    ///
    /// # Errors
    /// Returns `RecipeBookError::InvalidLocation` if the path cannot be resolved.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_format(path, FileFormat::default())
    }

    /// Create an empty repository bound to `path` using a custom file format
    pub fn with_format(path: impl AsRef<Path>, format: FileFormat) -> Result<Self> {
        format.validate()?;
        let path = resolve_path(path.as_ref())?;
        debug!("Recipe repository bound to {}", path.display());

        Ok(RecipeRepository {
            recipes: Vec::new(),
            path,
            format,
            modified: false,
            changed: ChangedSignal::new(),
        })
    }

    pub fn from_config(config: &BookConfig) -> Result<Self> {
        Self::with_format(&config.path, config.format.clone())
    }

    /// Resolved location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> &FileFormat {
        &self.format
    }

    /// Whether the stored recipes differ from what was last loaded or saved
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Signal emitted after every successful load and every delete or add
    pub fn changed(&self) -> &ChangedSignal {
        &self.changed
    }

    /// Register `callback` to run after every change, with read access to
    /// the repository
    pub fn subscribe(
        &self,
        callback: impl Fn(&RecipeRepository) + 'static,
    ) -> SubscriptionId {
        self.changed.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.changed.unsubscribe(id)
    }

    /// Replace the stored recipes with the contents of the backing file.
    ///
    /// The recipes are sorted by name. On any error the previously stored
    /// recipes are kept unchanged, the failure is logged and no change is
    /// signalled.
    ///
    /// Returns the number of recipes loaded.
    pub fn load(&mut self) -> Result<usize> {
        let recipes = match self.read_file() {
            Ok(recipes) => recipes,
            Err(e) => {
                error!("Failed to load recipes: {}", e);
                return Err(e);
            }
        };

        let count = recipes.len();
        self.recipes = recipes;
        self.modified = false;
        info!("Loaded {} recipes from {}", count, self.path.display());

        self.notify();
        Ok(count)
    }

    /// Write the stored recipes, in their current order, to the backing file.
    ///
    /// The content is written to a sibling temporary file which then replaces
    /// the target, so a failed save leaves the previous file intact.
    pub fn save(&mut self) -> Result<()> {
        if let Err(e) = self.write_file() {
            error!("Failed to save recipes: {}", e);
            return Err(e);
        }

        self.modified = false;
        info!(
            "Saved {} recipes to {}",
            self.recipes.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Copies of all stored recipes in their current order
    pub fn get_all(&self) -> Vec<Recipe> {
        self.recipes.clone()
    }

    /// Copy of the recipe at `index`
    ///
    /// # Errors
    /// Returns `RecipeBookError::IndexOutOfRange` if there is no recipe at `index`.
    pub fn get_at(&self, index: usize) -> Result<Recipe> {
        self.recipes
            .get(index)
            .cloned()
            .ok_or(RecipeBookError::IndexOutOfRange {
                index,
                len: self.recipes.len(),
            })
    }

    /// Copy of the stored recipe with the given name
    pub fn find(&self, name: &str) -> Option<Recipe> {
        self.recipes.iter().find(|r| r.name == name).cloned()
    }

    /// Remove the stored recipe that has the same name as `recipe`.
    ///
    /// `recipe` is usually a copy obtained from [`get_all`] or [`get_at`],
    /// possibly modified since. The repository is marked modified and the
    /// change is signalled even when nothing matched.
    ///
    /// Returns whether a recipe was removed.
    ///
    /// [`get_all`]: RecipeRepository::get_all
    /// [`get_at`]: RecipeRepository::get_at
    pub fn delete(&mut self, recipe: &Recipe) -> bool {
        let removed = match self.recipes.iter().position(|stored| stored == recipe) {
            Some(index) => {
                self.recipes.remove(index);
                debug!("Deleted recipe '{}'", recipe.name);
                true
            }
            None => {
                warn!("No stored recipe named '{}' to delete", recipe.name);
                false
            }
        };

        self.modified = true;
        self.notify();
        removed
    }

    /// Remove and return the recipe at `index`
    ///
    /// # Errors
    /// Returns `RecipeBookError::IndexOutOfRange` if there is no recipe at `index`;
    /// nothing is modified or signalled in that case.
    pub fn delete_at(&mut self, index: usize) -> Result<Recipe> {
        if index >= self.recipes.len() {
            return Err(RecipeBookError::IndexOutOfRange {
                index,
                len: self.recipes.len(),
            });
        }

        let removed = self.recipes.remove(index);
        debug!("Deleted recipe '{}' at {}", removed.name, index);

        self.modified = true;
        self.notify();
        Ok(removed)
    }

    /// Store a copy of `recipe` at its position by name
    ///
    /// # Errors
    /// Returns `RecipeBookError::InvalidRecipe` for an empty name or text that
    /// would not read back from the file, and `RecipeBookError::DuplicateRecipe`
    /// if the name is already stored.
    pub fn add(&mut self, recipe: &Recipe) -> Result<()> {
        if recipe.name.is_empty() {
            return Err(RecipeBookError::InvalidRecipe(
                "recipe name cannot be empty".to_string(),
            ));
        }
        if let Some(problem) = self.format.round_trip_problem(recipe) {
            return Err(RecipeBookError::InvalidRecipe(problem));
        }
        if self.recipes.iter().any(|stored| stored == recipe) {
            return Err(RecipeBookError::DuplicateRecipe(recipe.name.clone()));
        }

        let index = self
            .recipes
            .partition_point(|stored| stored.name < recipe.name);
        self.recipes.insert(index, recipe.clone());
        debug!("Added recipe '{}' at {}", recipe.name, index);

        self.modified = true;
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        self.changed.emit(self);
    }

    fn read_file(&self) -> Result<Vec<Recipe>> {
        let file = File::open(&self.path).map_err(|e| RecipeBookError::io(&self.path, e))?;
        self.format.read_recipes(BufReader::new(file), &self.path)
    }

    fn write_file(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| RecipeBookError::io(parent, e))?;
        }

        let temp_path = temp_path_for(&self.path);
        if let Err(e) = self.write_temp(&temp_path) {
            // Leave no partial temp file behind
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            RecipeBookError::io(&self.path, e)
        })
    }

    fn write_temp(&self, temp_path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .map_err(|e| RecipeBookError::io(temp_path, e))?;

        let mut writer = BufWriter::new(file);
        self.format
            .write_recipes(&mut writer, &self.recipes)
            .map_err(|e| RecipeBookError::io(temp_path, e))?;

        let file = writer
            .into_inner()
            .map_err(|e| RecipeBookError::io(temp_path, e.into_error()))?;
        file.sync_all()
            .map_err(|e| RecipeBookError::io(temp_path, e))
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    let invalid = |reason: String| RecipeBookError::InvalidLocation {
        path: path.to_path_buf(),
        reason,
    };

    if path.as_os_str().is_empty() {
        return Err(invalid("path is empty".to_string()));
    }

    let resolved = std::path::absolute(path).map_err(|e| invalid(e.to_string()))?;
    if resolved.is_dir() {
        return Err(invalid("path is a directory".to_string()));
    }
    if resolved.file_name().is_none() {
        return Err(invalid("path has no file name".to_string()));
    }

    Ok(resolved)
}

/// `recipes.txt` -> `recipes.txt.tmp` in the same directory
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
