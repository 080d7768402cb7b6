//! Recipe model
//!
//! A recipe with its base serving count; ingredients live in their own table.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A stored recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub servings: i64,
    pub category_id: Option<i64>,
    pub image_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    #[serde(default = "default_servings")]
    pub servings: i64,
    pub category_id: Option<i64>,
}

pub fn default_servings() -> i64 {
    4
}

/// Data for updating a recipe.
///
/// `category_id: Some(None)` detaches the recipe from its category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub servings: Option<i64>,
    pub category_id: Option<Option<i64>>,
}

impl Recipe {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            instructions: row.get("instructions")?,
            prep_time: row.get("prep_time")?,
            cook_time: row.get("cook_time")?,
            servings: row.get("servings")?,
            category_id: row.get("category_id")?,
            image_path: row.get("image_path")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new recipe into the database
    pub fn create(conn: &Connection, data: &RecipeCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO recipes (name, description, instructions, prep_time, cook_time, servings, category_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.name,
                data.description,
                data.instructions,
                data.prep_time,
                data.cook_time,
                data.servings,
                data.category_id,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::MissingRow { table: "recipes", id })
    }

    /// Get a recipe by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Find a recipe by exact name
    pub fn find_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE name = ?1 LIMIT 1")?;

        match stmt.query_row([name], Self::from_row) {
            Ok(recipe) => Ok(Some(recipe)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List recipes, newest first, with optional category filter and name search
    pub fn list(conn: &Connection, category_id: Option<i64>, search: Option<&str>) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM recipes WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(category_id) = category_id {
            params_vec.push(Box::new(category_id));
            sql.push_str(&format!(" AND category_id = ?{}", params_vec.len()));
        }

        if let Some(search) = search.filter(|s| !s.is_empty()) {
            params_vec.push(Box::new(format!("%{}%", search)));
            sql.push_str(&format!(" AND name LIKE ?{}", params_vec.len()));
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let recipes = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(recipes)
    }

    /// Recipes with at least one ingredient whose name contains `fragment`
    pub fn find_by_ingredient(conn: &Connection, fragment: &str, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT r.* FROM recipes r
            INNER JOIN ingredients i ON i.recipe_id = r.id
            WHERE i.name LIKE ?1
            ORDER BY r.id
            LIMIT ?2
            "#,
        )?;

        let recipes = stmt
            .query_map(params![format!("%{}%", fragment), limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(recipes)
    }

    /// Update a recipe's fields
    pub fn update(conn: &Connection, id: i64, data: &RecipeUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(ref description) = data.description {
            updates.push(format!("description = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(description.clone()));
        }
        if let Some(ref instructions) = data.instructions {
            updates.push(format!("instructions = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(instructions.clone()));
        }
        if let Some(prep_time) = data.prep_time {
            updates.push(format!("prep_time = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(prep_time));
        }
        if let Some(cook_time) = data.cook_time {
            updates.push(format!("cook_time = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(cook_time));
        }
        if let Some(servings) = data.servings {
            updates.push(format!("servings = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(servings));
        }
        if let Some(category_id) = data.category_id {
            updates.push(format!("category_id = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(category_id));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipes SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Set or clear the stored image path
    pub fn set_image_path(conn: &Connection, id: i64, image_path: Option<&str>) -> DbResult<()> {
        conn.execute(
            "UPDATE recipes SET image_path = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![image_path, id],
        )?;
        Ok(())
    }

    /// Touch updated_at after a change that only affected child rows
    pub fn touch(conn: &Connection, id: i64) -> DbResult<()> {
        conn.execute("UPDATE recipes SET updated_at = datetime('now') WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Delete a recipe. Ingredients and meal plans cascade.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
