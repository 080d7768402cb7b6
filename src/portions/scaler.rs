//! Recipe portion scaling
//!
//! Scales every ingredient of a recipe by `target / servings`.

use serde::Serialize;

use super::{PortionError, RecipePortions};

/// An ingredient line after scaling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledIngredient {
    pub id: i64,
    pub name: String,
    pub original_quantity: f64,
    pub adjusted_quantity: f64,
    pub unit: String,
    pub notes: Option<String>,
}

/// Result of scaling a recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledRecipe {
    /// Rounded for display; ingredient math uses the exact ratio
    pub scaling_factor: f64,
    pub ingredients: Vec<ScaledIngredient>,
}

/// Round to two decimal places, ties to even.
///
/// Ties are decided on the exact binary value: `value * 100.0` may itself
/// round onto `.5`, so the product's error (exact under `mul_add`) breaks
/// that false tie. 0.125 -> 0.12, 0.375 -> 0.38, 2.675 -> 2.67.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let residual = value.mul_add(100.0, -scaled);

    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 && residual != 0.0 {
        if residual > 0.0 {
            scaled.ceil()
        } else {
            scaled.floor()
        }
    } else {
        scaled.round_ties_even()
    };
    rounded / 100.0
}

/// Ratio of wanted people to the recipe's base servings
pub fn scaling_factor(people_count: i64, servings: i64) -> Result<f64, PortionError> {
    if people_count <= 0 {
        return Err(PortionError::InvalidPeopleCount { people_count });
    }
    if servings <= 0 {
        return Err(PortionError::InvalidServings { servings });
    }
    Ok(people_count as f64 / servings as f64)
}

/// Scale a recipe to `target_people_count`, preserving ingredient order
pub fn scale(recipe: RecipePortions<'_>, target_people_count: i64) -> Result<ScaledRecipe, PortionError> {
    let factor = scaling_factor(target_people_count, recipe.servings)?;

    let ingredients = recipe
        .ingredients
        .iter()
        .map(|ingredient| ScaledIngredient {
            id: ingredient.id,
            name: ingredient.name.clone(),
            original_quantity: ingredient.quantity,
            adjusted_quantity: round2(ingredient.quantity * factor),
            unit: ingredient.unit.clone(),
            notes: ingredient.notes.clone(),
        })
        .collect();

    Ok(ScaledRecipe {
        scaling_factor: round2(factor),
        ingredients,
    })
}
