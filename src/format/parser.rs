use std::io::BufRead;
use std::path::Path;

use log::debug;

use super::FileFormat;
use crate::error::{ParseError, RecipeBookError, Result};
use crate::model::{Ingredient, Recipe};

/// Which kind of data line the parser expects next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseState {
    /// No section marker seen yet
    #[default]
    Indefinite,
    ExpectingName,
    ExpectingIngredient,
    ExpectingInstruction,
}

/// What a single line contributes to the recipes being built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Marker lines only change the state
    None,
    StartRecipe(String),
    AddIngredient(Ingredient),
    AddInstruction(String),
}

impl FileFormat {
    /// Pure transition function of the parser state machine.
    ///
    /// Returns the next state and the effect the line has, or why the line is
    /// not valid in `state`.
    pub fn transition(
        &self,
        state: ParseState,
        line: &str,
    ) -> std::result::Result<(ParseState, Effect), ParseError> {
        if line == self.recipe_marker {
            return Ok((ParseState::ExpectingName, Effect::None));
        }
        if line == self.ingredient_marker {
            return Ok((ParseState::ExpectingIngredient, Effect::None));
        }
        if line == self.instruction_marker {
            return Ok((ParseState::ExpectingInstruction, Effect::None));
        }

        match state {
            ParseState::ExpectingName => Ok((state, Effect::StartRecipe(line.to_string()))),
            ParseState::ExpectingIngredient => {
                let parts: Vec<&str> = line.split(self.delimiter).collect();
                match parts.as_slice() {
                    [amount, measure, name] => Ok((
                        state,
                        Effect::AddIngredient(Ingredient::new(*amount, *measure, *name)),
                    )),
                    _ => Err(ParseError::WrongFieldCount { found: parts.len() }),
                }
            }
            ParseState::ExpectingInstruction => {
                Ok((state, Effect::AddInstruction(line.to_string())))
            }
            ParseState::Indefinite => Err(ParseError::DataBeforeSection),
        }
    }

    /// Parse recipes from an in-memory string
    pub fn parse_str(&self, text: &str) -> Result<Vec<Recipe>> {
        let mut parser = Parser::new(self);
        for line in text.lines() {
            parser.feed(line)?;
        }
        Ok(parser.finish())
    }

    /// Parse recipes line by line from `reader`.
    ///
    /// `source` only names the input in I/O error reports.
    pub fn read_recipes<R: BufRead>(&self, reader: R, source: &Path) -> Result<Vec<Recipe>> {
        let mut parser = Parser::new(self);
        for line in reader.lines() {
            let line = line.map_err(|e| RecipeBookError::io(source, e))?;
            parser.feed(&line)?;
        }
        Ok(parser.finish())
    }
}

/// Accumulates recipes by applying the effects of successive lines
#[derive(Debug)]
pub struct Parser<'a> {
    format: &'a FileFormat,
    state: ParseState,
    recipes: Vec<Recipe>,
    line_number: usize,
}

impl<'a> Parser<'a> {
    pub fn new(format: &'a FileFormat) -> Self {
        Parser {
            format,
            state: ParseState::default(),
            recipes: Vec::new(),
            line_number: 0,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Process the next line of input
    ///
    /// # Errors
    /// Returns `RecipeBookError::FormatViolation` with the 1-based line number
    /// when the line does not fit the current section.
    pub fn feed(&mut self, line: &str) -> Result<()> {
        self.line_number += 1;

        let (state, effect) = self
            .format
            .transition(self.state, line)
            .map_err(|source| self.violation(source))?;

        match effect {
            Effect::None => {}
            Effect::StartRecipe(name) => {
                debug!("Line {}: starting recipe '{}'", self.line_number, name);
                self.recipes.push(Recipe::new(name));
            }
            Effect::AddIngredient(ingredient) => {
                let line_number = self.line_number;
                self.current_recipe(line_number)?.ingredients.push(ingredient);
            }
            Effect::AddInstruction(instruction) => {
                let line_number = self.line_number;
                self.current_recipe(line_number)?.instructions.push(instruction);
            }
        }

        self.state = state;
        Ok(())
    }

    /// Finish parsing and return the recipes sorted by name.
    ///
    /// Every recipe is ordered by its own name. The sort is stable, so recipes
    /// sharing a name keep their file order.
    pub fn finish(self) -> Vec<Recipe> {
        let mut recipes = self.recipes;
        recipes.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            "Parsed {} recipes from {} lines",
            recipes.len(),
            self.line_number
        );
        recipes
    }

    fn current_recipe(&mut self, line_number: usize) -> Result<&mut Recipe> {
        self.recipes
            .last_mut()
            .ok_or(RecipeBookError::FormatViolation {
                line: line_number,
                source: ParseError::ContentBeforeRecipe,
            })
    }

    fn violation(&self, source: ParseError) -> RecipeBookError {
        RecipeBookError::FormatViolation {
            line: self.line_number,
            source,
        }
    }
}
