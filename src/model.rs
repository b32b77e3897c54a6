use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One line of a recipe's ingredient list
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Ingredient {
    pub amount: String,
    pub measure: String,
    pub name: String,
}

impl Ingredient {
    pub fn new(
        amount: impl Into<String>,
        measure: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Ingredient {
            amount: amount.into(),
            measure: measure.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Ingredient {
    /// Renders the non-empty fields separated by spaces, e.g. `2 dl mjölk`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.amount, &self.measure, &self.name]
            .into_iter()
            .map(String::as_str)
            .filter(|part| !part.is_empty())
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// A named recipe with ordered ingredients and instructions.
///
/// The name is the recipe's identity: equality, ordering and hashing only
/// look at it. `Clone` produces a fully independent copy, which is what the
/// repository hands out to callers.
#[derive(Debug, Clone, Default)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Recipe {
            name: name.into(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }

    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instructions.push(instruction.into());
        self
    }

    /// Compares every field, not just the name
    pub fn same_content(&self, other: &Recipe) -> bool {
        self.name == other.name
            && self.ingredients == other.ingredients
            && self.instructions == other.instructions
    }
}

impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Recipe {}

impl PartialOrd for Recipe {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Recipe {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for Recipe {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_display_skips_empty_fields() {
        assert_eq!(Ingredient::new("2", "dl", "mjölk").to_string(), "2 dl mjölk");
        assert_eq!(Ingredient::new("3", "", "ägg").to_string(), "3 ägg");
        assert_eq!(Ingredient::new("", "", "salt").to_string(), "salt");
        assert_eq!(Ingredient::default().to_string(), "");
    }

    #[test]
    fn test_recipe_equality_is_by_name_only() {
        let a = Recipe::new("Pannkakor").with_instruction("Vispa");
        let b = Recipe::new("Pannkakor").with_ingredient(Ingredient::new("3", "", "ägg"));
        assert_eq!(a, b);
        assert!(!a.same_content(&b));
        assert_ne!(a, Recipe::new("Äppelpaj"));
    }

    #[test]
    fn test_recipe_ordering_is_by_name() {
        let mut recipes = vec![
            Recipe::new("Våfflor"),
            Recipe::new("Kladdkaka"),
            Recipe::new("Bullar"),
        ];
        recipes.sort();
        let names: Vec<&str> = recipes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bullar", "Kladdkaka", "Våfflor"]);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Recipe::new("Pannkakor")
            .with_ingredient(Ingredient::new("3", "", "ägg"))
            .with_instruction("Vispa");

        let mut copy = original.clone();
        copy.ingredients[0].amount = "4".to_string();
        copy.ingredients.push(Ingredient::new("1", "nypa", "salt"));
        copy.instructions.clear();

        assert_eq!(original.ingredients.len(), 1);
        assert_eq!(original.ingredients[0].amount, "3");
        assert_eq!(original.instructions, vec!["Vispa"]);
    }
}
