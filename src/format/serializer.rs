use std::io::{self, Write};

use log::warn;

use super::FileFormat;
use crate::model::Recipe;

impl FileFormat {
    /// Write `recipes` in the given order, one block per recipe.
    ///
    /// Text that cannot read back the same way (see [`round_trip_problem`])
    /// is written as-is with a warning.
    ///
    /// [`round_trip_problem`]: FileFormat::round_trip_problem
    pub fn write_recipes<W: Write>(&self, mut writer: W, recipes: &[Recipe]) -> io::Result<()> {
        for recipe in recipes {
            self.check_round_trip(recipe);

            writeln!(writer, "{}", self.recipe_marker)?;
            writeln!(writer, "{}", recipe.name)?;

            writeln!(writer, "{}", self.ingredient_marker)?;
            for ingredient in &recipe.ingredients {
                writeln!(
                    writer,
                    "{}{delim}{}{delim}{}",
                    ingredient.amount,
                    ingredient.measure,
                    ingredient.name,
                    delim = self.delimiter
                )?;
            }

            writeln!(writer, "{}", self.instruction_marker)?;
            for instruction in &recipe.instructions {
                writeln!(writer, "{}", instruction)?;
            }
        }
        writer.flush()
    }

    /// Render `recipes` to a string in file format
    pub fn render(&self, recipes: &[Recipe]) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_recipes(&mut buffer, recipes);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Describe the first piece of `recipe` that would not read back unchanged:
    /// line breaks anywhere, the delimiter inside an ingredient field, or a
    /// name or instruction equal to a section marker
    pub fn round_trip_problem(&self, recipe: &Recipe) -> Option<String> {
        let has_line_break = |text: &str| text.contains(['\n', '\r']);

        if has_line_break(recipe.name.as_str()) {
            return Some(format!(
                "recipe name {:?} contains a line break",
                recipe.name
            ));
        }
        if self.is_marker(&recipe.name) {
            return Some(format!(
                "recipe name '{}' is a section marker",
                recipe.name
            ));
        }

        for ingredient in &recipe.ingredients {
            for field in [&ingredient.amount, &ingredient.measure, &ingredient.name] {
                if has_line_break(field.as_str()) {
                    return Some(format!(
                        "ingredient field {:?} in '{}' contains a line break",
                        field, recipe.name
                    ));
                }
                if field.contains(self.delimiter) {
                    return Some(format!(
                        "ingredient '{}' in '{}' contains the delimiter '{}'",
                        ingredient, recipe.name, self.delimiter
                    ));
                }
            }
        }

        for instruction in &recipe.instructions {
            if has_line_break(instruction.as_str()) {
                return Some(format!(
                    "instruction {:?} in '{}' contains a line break",
                    instruction, recipe.name
                ));
            }
            if self.is_marker(instruction) {
                return Some(format!(
                    "instruction '{}' in '{}' is a section marker",
                    instruction, recipe.name
                ));
            }
        }

        None
    }

    fn check_round_trip(&self, recipe: &Recipe) {
        if let Some(problem) = self.round_trip_problem(recipe) {
            warn!("Written as-is, will not load back the same: {}", problem);
        }
    }
}
