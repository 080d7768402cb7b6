//! Shopping List MCP Tools
//!
//! Tools for hand-made shopping lists and for generating one from a set of
//! meal plans.

use std::collections::HashSet;

use serde::Serialize;

use crate::db::Database;
use crate::models::{
    Ingredient, MealPlan, Recipe, ShoppingList, ShoppingListCreate, ShoppingListItem, ShoppingListItemCreate,
};
use crate::portions::{self, AggregatedItem, MealPlanEntry, RecipePortions};

use super::error::{ToolError, ToolResult};

/// A shopping list line as a client sends it; incomplete lines are dropped
#[derive(Debug, Clone, Default)]
pub struct ShoppingListItemDraft {
    pub ingredient_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub checked: Option<bool>,
}

impl ShoppingListItemDraft {
    fn complete(self) -> Option<ShoppingListItemCreate> {
        let ingredient_name = self.ingredient_name?.trim().to_string();
        let unit = self.unit?;
        let quantity = self.quantity.filter(|q| q.is_finite() && *q >= 0.0)?;
        if ingredient_name.is_empty() {
            return None;
        }
        Some(ShoppingListItemCreate {
            ingredient_name,
            quantity,
            unit,
            checked: self.checked.unwrap_or(false),
        })
    }
}

fn complete_items(drafts: Vec<ShoppingListItemDraft>) -> Vec<ShoppingListItemCreate> {
    let total = drafts.len();
    let items: Vec<_> = drafts.into_iter().filter_map(ShoppingListItemDraft::complete).collect();
    if items.len() < total {
        tracing::debug!(skipped = total - items.len(), "dropped incomplete shopping list items");
    }
    items
}

/// Response for list_shopping_lists
#[derive(Debug, Serialize)]
pub struct ListShoppingListsResponse {
    pub shopping_lists: Vec<ShoppingList>,
    pub count: usize,
}

/// Response for delete_shopping_list
#[derive(Debug, Serialize)]
pub struct DeleteShoppingListResponse {
    pub success: bool,
    pub deleted_id: i64,
    pub message: String,
}

/// Response for generate_shopping_list
#[derive(Debug, Serialize)]
pub struct GenerateShoppingListResponse {
    pub shopping_list: ShoppingList,
    pub meal_plan_count: usize,
    /// Aggregated lines with the recipes each one came from
    pub aggregated_items: Vec<AggregatedItem>,
}

fn require_name(name: &str) -> ToolResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ToolError::invalid("Shopping list name is required"));
    }
    Ok(name.to_string())
}

// ============================================================================
// Shopping List Tools
// ============================================================================

/// All shopping lists with their items, newest first
pub fn list_shopping_lists(db: &Database) -> ToolResult<ListShoppingListsResponse> {
    let conn = db.get_conn()?;
    let shopping_lists = ShoppingList::list(&conn)?;

    Ok(ListShoppingListsResponse {
        count: shopping_lists.len(),
        shopping_lists,
    })
}

/// Get a shopping list with its items
pub fn get_shopping_list(db: &Database, id: i64) -> ToolResult<ShoppingList> {
    let conn = db.get_conn()?;
    ShoppingList::get_by_id(&conn, id)?.ok_or(ToolError::NotFound { entity: "Shopping list", id })
}

/// Create a shopping list by hand
pub fn create_shopping_list(db: &Database, name: &str, items: Vec<ShoppingListItemDraft>) -> ToolResult<ShoppingList> {
    let data = ShoppingListCreate {
        name: require_name(name)?,
        items: complete_items(items),
    };

    let mut conn = db.get_conn()?;
    let tx = conn.transaction()?;
    let list = ShoppingList::create(&tx, &data)?;
    tx.commit()?;

    tracing::info!(id = list.id, items = list.items.len(), "created shopping list");
    Ok(list)
}

/// Rename a list and/or replace its items
pub fn update_shopping_list(
    db: &Database,
    id: i64,
    name: Option<&str>,
    items: Option<Vec<ShoppingListItemDraft>>,
) -> ToolResult<ShoppingList> {
    let name = name.map(require_name).transpose()?;
    let items = items.map(complete_items);

    let mut conn = db.get_conn()?;
    if ShoppingList::get_by_id(&conn, id)?.is_none() {
        return Err(ToolError::NotFound { entity: "Shopping list", id });
    }

    let tx = conn.transaction()?;
    if let Some(ref name) = name {
        ShoppingList::rename(&tx, id, name)?;
    }
    if let Some(ref items) = items {
        ShoppingList::replace_items(&tx, id, items)?;
    }
    tx.commit()?;

    tracing::info!(id, "updated shopping list");
    ShoppingList::get_by_id(&conn, id)?.ok_or(ToolError::NotFound { entity: "Shopping list", id })
}

/// Delete a shopping list and its items
pub fn delete_shopping_list(db: &Database, id: i64) -> ToolResult<DeleteShoppingListResponse> {
    let conn = db.get_conn()?;

    if !ShoppingList::delete(&conn, id)? {
        return Err(ToolError::NotFound { entity: "Shopping list", id });
    }

    tracing::info!(id, "deleted shopping list");
    Ok(DeleteShoppingListResponse {
        success: true,
        deleted_id: id,
        message: "Shopping list deleted successfully".to_string(),
    })
}

/// Flip the checked state of one item
pub fn toggle_shopping_list_item(db: &Database, list_id: i64, item_id: i64) -> ToolResult<ShoppingListItem> {
    let conn = db.get_conn()?;
    ShoppingListItem::toggle(&conn, list_id, item_id)?.ok_or(ToolError::NotFound {
        entity: "Shopping list item",
        id: item_id,
    })
}

const INVALID_PLAN_IDS: &str = "One or more meal plan IDs are invalid";

/// Build a shopping list from the combined ingredients of some meal plans
pub fn generate_shopping_list(db: &Database, name: &str, meal_plan_ids: &[i64]) -> ToolResult<GenerateShoppingListResponse> {
    let name = require_name(name)?;
    if meal_plan_ids.is_empty() {
        return Err(ToolError::invalid("Name and meal plan IDs are required"));
    }

    let mut seen = HashSet::with_capacity(meal_plan_ids.len());
    if !meal_plan_ids.iter().all(|id| seen.insert(*id)) {
        return Err(ToolError::invalid(INVALID_PLAN_IDS));
    }

    let mut conn = db.get_conn()?;
    let tx = conn.transaction()?;

    let plans = MealPlan::get_by_ids(&tx, meal_plan_ids)?;
    if plans.len() != meal_plan_ids.len() {
        return Err(ToolError::invalid(INVALID_PLAN_IDS));
    }

    let mut loaded: Vec<(Recipe, Vec<Ingredient>, i64)> = Vec::with_capacity(plans.len());
    for plan in &plans {
        let recipe = Recipe::get_by_id(&tx, plan.recipe_id)?.ok_or(ToolError::NotFound {
            entity: "Recipe",
            id: plan.recipe_id,
        })?;
        let ingredients = Ingredient::get_for_recipe(&tx, recipe.id)?;
        loaded.push((recipe, ingredients, plan.people_count));
    }

    let entries: Vec<MealPlanEntry<'_>> = loaded
        .iter()
        .map(|(recipe, ingredients, people_count)| MealPlanEntry {
            recipe: RecipePortions {
                name: &recipe.name,
                servings: recipe.servings,
                ingredients,
            },
            people_count: *people_count,
        })
        .collect();

    let aggregated_items = portions::aggregate(&entries)?;

    let items: Vec<ShoppingListItemCreate> = aggregated_items
        .iter()
        .map(|item| ShoppingListItemCreate {
            ingredient_name: item.ingredient_name.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            checked: false,
        })
        .collect();

    let shopping_list = ShoppingList::create(&tx, &ShoppingListCreate { name, items })?;
    tx.commit()?;

    tracing::info!(
        id = shopping_list.id,
        meal_plans = plans.len(),
        items = shopping_list.items.len(),
        "generated shopping list"
    );

    Ok(GenerateShoppingListResponse {
        shopping_list,
        meal_plan_count: plans.len(),
        aggregated_items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientCreate, RecipeCreate};
    use crate::tools::categories::create_category;
    use crate::tools::meal_plans::create_meal_plan;
    use crate::tools::recipes::create_recipe;

    fn draft(name: Option<&str>, quantity: Option<f64>, unit: Option<&str>) -> ShoppingListItemDraft {
        ShoppingListItemDraft {
            ingredient_name: name.map(str::to_string),
            quantity,
            unit: unit.map(str::to_string),
            checked: None,
        }
    }

    fn recipe(db: &Database, name: &str, servings: i64, lines: &[(&str, f64, &str)]) -> i64 {
        let ingredients = lines
            .iter()
            .map(|(n, q, u)| IngredientCreate {
                name: n.to_string(),
                quantity: *q,
                unit: u.to_string(),
                notes: None,
            })
            .collect();
        create_recipe(
            db,
            RecipeCreate {
                name: name.to_string(),
                description: None,
                instructions: None,
                prep_time: None,
                cook_time: None,
                servings,
                category_id: None,
            },
            ingredients,
        )
        .unwrap()
        .id
    }

    #[test]
    fn test_create_skips_incomplete_items() {
        let db = Database::in_memory().unwrap();
        let list = create_shopping_list(&db, "Groceries", vec![
            draft(Some("Eggs"), Some(12.0), Some("pieces")),
            draft(Some("Milk"), None, Some("l")),
            draft(None, Some(1.0), Some("kg")),
            draft(Some("Bread"), Some(1.0), None),
        ])
        .unwrap();

        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].ingredient_name, "Eggs");
        assert!(matches!(create_shopping_list(&db, "  ", vec![]), Err(ToolError::Invalid(_))));
    }

    #[test]
    fn test_update_replaces_items_and_renames() {
        let db = Database::in_memory().unwrap();
        let list = create_shopping_list(&db, "Groceries", vec![draft(Some("Eggs"), Some(12.0), Some("pieces"))]).unwrap();

        let updated = update_shopping_list(&db, list.id, Some("Weekend"), Some(vec![
            draft(Some("Rice"), Some(1.0), Some("kg")),
            draft(Some("Beans"), Some(2.0), Some("cans")),
        ]))
        .unwrap();
        assert_eq!(updated.name, "Weekend");
        assert_eq!(updated.items.len(), 2);

        let renamed = update_shopping_list(&db, list.id, Some("Sunday"), None).unwrap();
        assert_eq!(renamed.items.len(), 2);

        assert!(matches!(update_shopping_list(&db, list.id + 1, Some("x"), None), Err(ToolError::NotFound { .. })));
    }

    #[test]
    fn test_toggle_item() {
        let db = Database::in_memory().unwrap();
        let list = create_shopping_list(&db, "Groceries", vec![draft(Some("Eggs"), Some(12.0), Some("pieces"))]).unwrap();
        let item_id = list.items[0].id;

        assert!(toggle_shopping_list_item(&db, list.id, item_id).unwrap().checked);
        assert!(!toggle_shopping_list_item(&db, list.id, item_id).unwrap().checked);
        assert!(matches!(toggle_shopping_list_item(&db, list.id, item_id + 7), Err(ToolError::NotFound { .. })));
    }

    #[test]
    fn test_generate_from_meal_plans() {
        let db = Database::in_memory().unwrap();
        let dinner = create_category(&db, "Dinner", "meal").unwrap().id;
        let lunch = create_category(&db, "Lunch", "meal").unwrap().id;

        let pasta = recipe(&db, "Garlic Pasta", 4, &[("Pasta", 400.0, "grams"), ("Garlic", 4.0, "cloves")]);
        let soup = recipe(&db, "Garlic Soup", 2, &[("garlic", 6.0, "cloves"), ("Stock", 1.0, "l")]);

        let a = create_meal_plan(&db, "2025-03-03", dinner, pasta, Some(6), None).unwrap();
        let b = create_meal_plan(&db, "2025-03-04", lunch, soup, Some(1), None).unwrap();

        let generated = generate_shopping_list(&db, "Week 10", &[a.id, b.id]).unwrap();
        assert_eq!(generated.meal_plan_count, 2);

        let items = &generated.shopping_list.items;
        let lines: Vec<_> = items.iter().map(|i| (i.ingredient_name.as_str(), i.quantity, i.unit.as_str())).collect();
        assert_eq!(lines, vec![
            ("Pasta", 600.0, "grams"),
            ("Garlic", 9.0, "cloves"),
            ("Stock", 0.5, "l"),
        ]);
        assert_eq!(generated.aggregated_items[1].contributing_recipes, vec!["Garlic Pasta", "Garlic Soup"]);
        assert!(items.iter().all(|i| !i.checked));
    }

    #[test]
    fn test_generate_requires_existing_plans() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(generate_shopping_list(&db, "Empty", &[]), Err(ToolError::Invalid(_))));
        assert!(matches!(generate_shopping_list(&db, "", &[1]), Err(ToolError::Invalid(_))));
        assert!(matches!(generate_shopping_list(&db, "Ghost", &[404]), Err(ToolError::Invalid(_))));
        assert_eq!(list_shopping_lists(&db).unwrap().count, 0);
    }

    #[test]
    fn test_generate_rejects_repeated_plan_ids() {
        let db = Database::in_memory().unwrap();
        let dinner = create_category(&db, "Dinner", "meal").unwrap().id;
        let pasta = recipe(&db, "Garlic Pasta", 4, &[("Pasta", 400.0, "grams")]);
        let plan = create_meal_plan(&db, "2025-03-03", dinner, pasta, None, None).unwrap();

        let err = generate_shopping_list(&db, "Twice", &[plan.id, plan.id]).unwrap_err();
        assert_eq!(err.to_string(), "One or more meal plan IDs are invalid");
        assert_eq!(list_shopping_lists(&db).unwrap().count, 0);
    }

    #[test]
    fn test_delete_shopping_list() {
        let db = Database::in_memory().unwrap();
        let list = create_shopping_list(&db, "Groceries", vec![]).unwrap();
        assert!(delete_shopping_list(&db, list.id).unwrap().success);
        assert!(matches!(get_shopping_list(&db, list.id), Err(ToolError::NotFound { .. })));
    }
}
