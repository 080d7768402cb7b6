//! Ingredient model
//!
//! A free-text ingredient line belonging to exactly one recipe.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A recipe ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub notes: Option<String>,
}

/// Data for adding an ingredient to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub notes: Option<String>,
}

impl Ingredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            recipe_id: row.get("recipe_id")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            notes: row.get("notes")?,
        })
    }

    /// Add an ingredient to a recipe
    pub fn create(conn: &Connection, recipe_id: i64, data: &IngredientCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO ingredients (recipe_id, name, quantity, unit, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![recipe_id, data.name, data.quantity, data.unit, data.notes],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::MissingRow { table: "ingredients", id })
    }

    /// Get an ingredient by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All ingredients for a recipe, in insertion order
    pub fn get_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM ingredients WHERE recipe_id = ?1 ORDER BY id")?;

        let ingredients = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ingredients)
    }

    /// Replace a recipe's ingredient set. Callers wrap this in a transaction.
    pub fn replace_for_recipe(
        conn: &Connection,
        recipe_id: i64,
        ingredients: &[IngredientCreate],
    ) -> DbResult<Vec<Self>> {
        conn.execute("DELETE FROM ingredients WHERE recipe_id = ?1", [recipe_id])?;

        ingredients
            .iter()
            .map(|data| Self::create(conn, recipe_id, data))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Recipe, RecipeCreate};

    fn setup() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        let recipe = Recipe::create(&conn, &RecipeCreate {
            name: "Classic Scrambled Eggs".into(),
            description: None,
            instructions: None,
            prep_time: None,
            cook_time: None,
            servings: 2,
            category_id: None,
        })
        .unwrap();
        (conn, recipe.id)
    }

    fn line(name: &str, quantity: f64, unit: &str) -> IngredientCreate {
        IngredientCreate {
            name: name.to_string(),
            quantity,
            unit: unit.to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_get_for_recipe_keeps_insertion_order() {
        let (conn, recipe_id) = setup();
        for data in [line("Eggs", 4.0, "pieces"), line("Butter", 15.0, "grams"), line("Salt", 1.0, "pinch")] {
            Ingredient::create(&conn, recipe_id, &data).unwrap();
        }

        let names: Vec<_> = Ingredient::get_for_recipe(&conn, recipe_id)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Eggs", "Butter", "Salt"]);
    }

    #[test]
    fn test_replace_for_recipe() {
        let (conn, recipe_id) = setup();
        Ingredient::create(&conn, recipe_id, &line("Eggs", 4.0, "pieces")).unwrap();

        let replaced = Ingredient::replace_for_recipe(&conn, recipe_id, &[line("Tofu", 200.0, "grams")]).unwrap();
        assert_eq!(replaced.len(), 1);

        let stored = Ingredient::get_for_recipe(&conn, recipe_id).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Tofu");
    }

    #[test]
    fn test_unknown_recipe_is_rejected() {
        let (conn, recipe_id) = setup();
        assert!(Ingredient::create(&conn, recipe_id + 100, &line("Eggs", 1.0, "pieces")).is_err());
    }
}
