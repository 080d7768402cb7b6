//! Recipe Manager Status Tool
//!
//! Provides runtime status information and usage instructions.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::Database;

/// Usage guide for AI assistants driving the recipe tools
pub const RECIPE_INSTRUCTIONS: &str = r#"
# Recipe Manager Instructions

This guide explains how to go from recipes to a shopping list.

## 1. Categories

Categories have a type: `recipe` or `meal`.

- **Recipe categories** group recipes (Breakfast, Desserts, Vegetarian, ...)
- **Meal categories** are the slots of a day (Breakfast, Lunch, Dinner, Snack, Brunch)

Names are unique within a type, so "Breakfast" can exist once as a recipe
category and once as a meal category. Use `list_categories` with
`category_type` to see which is which.

## 2. Recipes

`create_recipe` takes the recipe fields and a list of ingredients.

| Field | Notes |
|-------|-------|
| name | required |
| servings | how many people the quantities feed; must be > 0 (default 4) |
| category_id | optional, must be a **recipe** category |
| ingredients | `name`, `quantity` (>= 0), `unit`, optional `notes` |

`update_recipe` with `ingredients` replaces the whole ingredient list. Leave
`ingredients` out to keep the current ones.

Use `adjust_recipe_portions` to preview quantities for a different number of
people. Nothing is saved.

## 3. Meal Plans

A meal plan puts one recipe into a (date, meal category) slot.

- Dates are `YYYY-MM-DD`
- `meal_category_id` must be a **meal** category
- Each slot holds at most one plan; a second one is rejected
- `people_count` defaults to 4; the name defaults to "<recipe> - <category>"

`get_week_meal_plans` returns Monday to Sunday of the week containing a date.
`adjust_meal_plan_portions` saves a new people count on the plan and returns
the scaled ingredients.

## 4. Shopping Lists

`generate_shopping_list` takes a name and meal plan IDs:

1. Each plan's recipe is scaled by `people_count / servings`
2. Lines with the same ingredient name (case and surrounding spaces ignored)
   and the same unit are added together
3. The same ingredient in a different unit stays on its own line
4. Quantities are rounded to 2 decimal places

Every ID must exist or nothing is created. Lists can also be made by hand
with `create_shopping_list`. Use `toggle_shopping_list_item` while shopping.

Export with `export_shopping_list_pdf` or `export_shopping_list_csv`, giving
the full output file path.

## 5. Assistant

- `recipe_suggestions`: ideas for the ingredients you have
- `ingredient_substitutions`: swaps for a missing ingredient
- `cooking_tips`: 1 to 5 random tips
- `generate_recipe_template`: a starter recipe to fill in
- `recipe_chat`: general questions

## Notes

- Deleting a category deletes its recipes and meal plans
- Deleting a recipe deletes its meal plans and its image
- `set_recipe_image` copies a png/jpg/jpeg/gif/webp file into the images folder
"#;

/// Row counts per table
#[derive(Debug, Clone, Serialize)]
pub struct RecordCounts {
    pub categories: i64,
    pub recipes: i64,
    pub meal_plans: i64,
    pub shopping_lists: i64,
}

impl RecordCounts {
    fn load(db: &Database) -> Option<Self> {
        db.with_conn(|conn| {
            let count = |table: &str| -> rusqlite::Result<i64> {
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            };
            Ok(Self {
                categories: count("categories")?,
                recipes: count("recipes")?,
                meal_plans: count("meal_plans")?,
                shopping_lists: count("shopping_lists")?,
            })
        })
        .map_err(|e| tracing::warn!(error = %e, "could not count records"))
        .ok()
    }
}

/// Runtime status of the recipe manager
#[derive(Debug, Clone, Serialize)]
pub struct RecipeManagerStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub records: Option<RecordCounts>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, db: &Database) -> RecipeManagerStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        RecipeManagerStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            records: RecordCounts::load(db),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::categories::create_category;

    #[test]
    fn test_status_reports_record_counts() {
        let db = Database::in_memory().unwrap();
        create_category(&db, "Dinner", "meal").unwrap();

        let tracker = StatusTracker::new(PathBuf::from(":memory:"));
        let status = tracker.get_status(&db);

        let records = status.records.unwrap();
        assert_eq!(records.categories, 1);
        assert_eq!(records.recipes, 0);
        assert!(status.database_size_bytes.is_none());
        assert_eq!(status.process_id, std::process::id());
    }
}
