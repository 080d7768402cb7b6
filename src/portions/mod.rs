//! Portion & aggregation calculator
//!
//! Pure computations over recipes already loaded from storage: scaling a
//! recipe to a head count, and folding several meal plans into one list of
//! shopping quantities.

pub mod aggregator;
pub mod scaler;

pub use aggregator::{aggregate, title_case, AggregatedItem};
pub use scaler::{round2, scale, scaling_factor, ScaledIngredient, ScaledRecipe};

use thiserror::Error;

use crate::models::Ingredient;

/// Errors raised instead of returning NaN or infinite quantities
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortionError {
    #[error("Recipe servings must be greater than 0 (got {servings})")]
    InvalidServings { servings: i64 },

    #[error("People count must be positive (got {people_count})")]
    InvalidPeopleCount { people_count: i64 },
}

/// A recipe as the calculator sees it
#[derive(Debug, Clone, Copy)]
pub struct RecipePortions<'a> {
    pub name: &'a str,
    pub servings: i64,
    pub ingredients: &'a [Ingredient],
}

/// One recipe to be cooked for `people_count` people
#[derive(Debug, Clone, Copy)]
pub struct MealPlanEntry<'a> {
    pub recipe: RecipePortions<'a>,
    pub people_count: i64,
}

#[cfg(test)]
pub(crate) fn test_ingredient(id: i64, name: &str, quantity: f64, unit: &str) -> Ingredient {
    Ingredient {
        id,
        recipe_id: 1,
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
        notes: None,
    }
}
