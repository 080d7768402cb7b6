//! Shopping list aggregation
//!
//! Folds the scaled ingredients of several meal plans into one flat list.
//! Lines merge when their normalized name and unit both match. The first
//! unit seen for a name owns the plain entry; every other unit for that name
//! gets its own entry, and later lines join whichever entry has their unit.

use std::collections::HashMap;

use serde::Serialize;

use super::scaler::{round2, scaling_factor};
use super::{MealPlanEntry, PortionError};

/// One consolidated shopping line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedItem {
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
    pub contributing_recipes: Vec<String>,
}

/// Normalized name, plus the unit when it conflicted with the first-seen one
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AggregationKey {
    name: String,
    unit_suffix: Option<String>,
}

#[derive(Debug)]
struct Accumulator {
    name: String,
    quantity: f64,
    unit: String,
    contributing_recipes: Vec<String>,
}

/// Accumulators in first-insertion order
#[derive(Debug, Default)]
struct Totals {
    index: HashMap<AggregationKey, usize>,
    entries: Vec<Accumulator>,
}

impl Totals {
    /// Index of the accumulator for `key`, creating an empty one if needed
    fn slot(&mut self, key: AggregationKey) -> usize {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }

        let idx = self.entries.len();
        self.entries.push(Accumulator {
            name: key.name.clone(),
            quantity: 0.0,
            unit: String::new(),
            contributing_recipes: Vec::new(),
        });
        self.index.insert(key, idx);
        idx
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Capitalize the first letter of every word, lowercase the rest.
///
/// A word starts at any letter not preceded by another letter, so
/// "sun-dried" becomes "Sun-Dried".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }

    out
}

/// Aggregate the ingredients of every meal plan into shopping lines
pub fn aggregate(meal_plans: &[MealPlanEntry<'_>]) -> Result<Vec<AggregatedItem>, PortionError> {
    let mut totals = Totals::default();

    for entry in meal_plans {
        let factor = scaling_factor(entry.people_count, entry.recipe.servings)?;

        for ingredient in entry.recipe.ingredients {
            let name = normalize_name(&ingredient.name);
            let adjusted = ingredient.quantity * factor;

            let bare = totals.slot(AggregationKey {
                name: name.clone(),
                unit_suffix: None,
            });
            if totals.entries[bare].unit.is_empty() {
                totals.entries[bare].unit = ingredient.unit.clone();
            }

            let target = if totals.entries[bare].unit == ingredient.unit {
                bare
            } else {
                let diverted = totals.slot(AggregationKey {
                    name,
                    unit_suffix: Some(ingredient.unit.clone()),
                });
                totals.entries[diverted].unit = ingredient.unit.clone();
                diverted
            };

            let acc = &mut totals.entries[target];
            acc.quantity += adjusted;
            acc.contributing_recipes.push(entry.recipe.name.to_string());
        }
    }

    let items: Vec<AggregatedItem> = totals
        .entries
        .into_iter()
        .map(|acc| AggregatedItem {
            ingredient_name: title_case(&acc.name),
            quantity: round2(acc.quantity),
            unit: acc.unit,
            contributing_recipes: acc.contributing_recipes,
        })
        .collect();

    tracing::debug!(
        meal_plans = meal_plans.len(),
        items = items.len(),
        "aggregated shopping list"
    );

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ingredient;
    use crate::portions::{test_ingredient, RecipePortions};

    fn entry<'a>(name: &'a str, servings: i64, ingredients: &'a [Ingredient], people: i64) -> MealPlanEntry<'a> {
        MealPlanEntry {
            recipe: RecipePortions {
                name,
                servings,
                ingredients,
            },
            people_count: people,
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(aggregate(&[]).unwrap(), vec![]);
    }

    #[test]
    fn test_same_unit_merges() {
        let a = vec![test_ingredient(1, "Garlic", 2.0, "cloves")];
        let b = vec![test_ingredient(2, "Garlic", 3.0, "cloves")];
        let items = aggregate(&[entry("Pasta", 4, &a, 4), entry("Stir Fry", 2, &b, 2)]).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].ingredient_name, "Garlic");
        assert_eq!(items[0].quantity, 5.0);
        assert_eq!(items[0].unit, "cloves");
        assert_eq!(items[0].contributing_recipes, vec!["Pasta", "Stir Fry"]);
    }

    #[test]
    fn test_unit_conflict_keeps_separate_lines() {
        let a = vec![test_ingredient(1, "Salt", 1.0, "teaspoon")];
        let b = vec![test_ingredient(2, "Salt", 1.0, "gram")];
        let items = aggregate(&[entry("Soup", 4, &a, 4), entry("Bread", 4, &b, 4)]).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].ingredient_name, "Salt");
        assert_eq!(items[0].unit, "teaspoon");
        assert_eq!(items[0].contributing_recipes, vec!["Soup"]);
        assert_eq!(items[1].ingredient_name, "Salt");
        assert_eq!(items[1].unit, "gram");
        assert_eq!(items[1].contributing_recipes, vec!["Bread"]);
    }

    #[test]
    fn test_later_lines_join_matching_unit_entry() {
        let a = vec![test_ingredient(1, "Milk", 200.0, "ml")];
        let b = vec![test_ingredient(2, "Milk", 1.0, "cup")];
        let c = vec![test_ingredient(3, "milk ", 100.0, "ml")];
        let d = vec![test_ingredient(4, "MILK", 0.5, "cup")];
        let items = aggregate(&[
            entry("Pancakes", 4, &a, 4),
            entry("Porridge", 4, &b, 4),
            entry("Custard", 4, &c, 4),
            entry("Smoothie", 4, &d, 4),
        ])
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!((items[0].quantity, items[0].unit.as_str()), (300.0, "ml"));
        assert_eq!(items[0].contributing_recipes, vec!["Pancakes", "Custard"]);
        assert_eq!((items[1].quantity, items[1].unit.as_str()), (1.5, "cup"));
        assert_eq!(items[1].contributing_recipes, vec!["Porridge", "Smoothie"]);
    }

    #[test]
    fn test_scaling_per_meal_plan() {
        // 400g for 4 servings cooked for 6, plus 100g for 2 servings cooked for 1
        let a = vec![test_ingredient(1, "Pasta", 400.0, "grams")];
        let b = vec![test_ingredient(2, "pasta", 100.0, "grams")];
        let items = aggregate(&[entry("Carbonara", 4, &a, 6), entry("Pasta Salad", 2, &b, 1)]).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 650.0);
    }

    #[test]
    fn test_output_follows_first_appearance() {
        let a = vec![
            test_ingredient(1, "Onion", 1.0, "piece"),
            test_ingredient(2, "Black pepper", 0.5, "teaspoon"),
        ];
        let b = vec![
            test_ingredient(3, "Butter", 15.0, "grams"),
            test_ingredient(4, "onion", 2.0, "piece"),
        ];
        let items = aggregate(&[entry("Soup", 4, &a, 4), entry("Omelette", 2, &b, 2)]).unwrap();

        let names: Vec<_> = items.iter().map(|i| i.ingredient_name.as_str()).collect();
        assert_eq!(names, vec!["Onion", "Black Pepper", "Butter"]);
        assert_eq!(items[0].quantity, 3.0);
    }

    #[test]
    fn test_recipe_without_ingredients_contributes_nothing() {
        let a = vec![test_ingredient(1, "Rice", 1.0, "cup")];
        let items = aggregate(&[entry("Water", 1, &[], 3), entry("Rice", 2, &a, 2)]).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_quantities_round_to_cents() {
        let a = vec![test_ingredient(1, "Garlic", 1.0, "cloves")];
        let items = aggregate(&[entry("Dip", 3, &a, 1)]).unwrap();
        assert_eq!(items[0].quantity, 0.33);
    }

    #[test]
    fn test_summed_tie_rounds_to_even() {
        // 0.0625 + 0.0625 is exactly 0.125
        let a = vec![test_ingredient(1, "Cinnamon", 0.25, "teaspoon")];
        let b = vec![test_ingredient(2, "cinnamon", 0.25, "teaspoon")];
        let items = aggregate(&[entry("Porridge", 4, &a, 1), entry("Toast", 4, &b, 1)]).unwrap();
        assert_eq!(items[0].quantity, 0.12);
    }

    #[test]
    fn test_invalid_entries_fail() {
        let a = vec![test_ingredient(1, "Garlic", 1.0, "cloves")];
        assert_eq!(
            aggregate(&[entry("Dip", 0, &a, 2)]),
            Err(PortionError::InvalidServings { servings: 0 })
        );
        assert_eq!(
            aggregate(&[entry("Dip", 2, &a, -1)]),
            Err(PortionError::InvalidPeopleCount { people_count: -1 })
        );
    }

    #[test]
    fn test_names_with_underscores_survive() {
        let a = vec![test_ingredient(1, "stock_cube", 1.0, "piece")];
        let b = vec![test_ingredient(2, "stock_cube", 10.0, "grams")];
        let items = aggregate(&[entry("Soup", 1, &a, 1), entry("Stew", 1, &b, 1)]).unwrap();
        assert_eq!(items[0].ingredient_name, "Stock_Cube");
        assert_eq!(items[1].ingredient_name, "Stock_Cube");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("black pepper"), "Black Pepper");
        assert_eq!(title_case("sun-dried tomatoes"), "Sun-Dried Tomatoes");
        assert_eq!(title_case("PARMESAN cheese"), "Parmesan Cheese");
        assert_eq!(title_case(""), "");
    }
}
