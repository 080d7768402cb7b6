//! Category model
//!
//! Categories group recipes ("recipe" type) or label meal slots ("meal" type).

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// What a category is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Recipe,
    Meal,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Recipe => "recipe",
            CategoryType::Meal => "meal",
        }
    }

    /// Strict parse; unknown values are rejected rather than defaulted
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "recipe" => Some(CategoryType::Recipe),
            "meal" => Some(CategoryType::Meal),
            _ => None,
        }
    }
}

/// A recipe or meal category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub category_type: CategoryType,
    pub created_at: String,
}

/// Data for creating a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub category_type: CategoryType,
}

/// Data for updating a category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub category_type: Option<CategoryType>,
}

impl Category {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let type_str: String = row.get("category_type")?;
        let category_type = CategoryType::parse(&type_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                format!("unknown category type '{}'", type_str).into(),
            )
        })?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category_type,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new category
    pub fn create(conn: &Connection, data: &CategoryCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO categories (name, category_type) VALUES (?1, ?2)",
            params![data.name, data.category_type.as_str()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::MissingRow {
            table: "categories",
            id,
        })
    }

    /// Get a category by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM categories WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a category by ID, only if it has the given type
    pub fn get_by_id_and_type(
        conn: &Connection,
        id: i64,
        category_type: CategoryType,
    ) -> DbResult<Option<Self>> {
        Ok(Self::get_by_id(conn, id)?.filter(|c| c.category_type == category_type))
    }

    /// Find a category by exact name within a type
    pub fn find_by_name(
        conn: &Connection,
        name: &str,
        category_type: CategoryType,
    ) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM categories WHERE name = ?1 AND category_type = ?2",
        )?;

        match stmt.query_row(params![name, category_type.as_str()], Self::from_row) {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List categories ordered by name, optionally filtered by type
    pub fn list(conn: &Connection, category_type: Option<CategoryType>) -> DbResult<Vec<Self>> {
        let categories = match category_type {
            Some(t) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM categories WHERE category_type = ?1 ORDER BY name",
                )?;
                let rows = stmt.query_map([t.as_str()], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare("SELECT * FROM categories ORDER BY name")?;
                let rows = stmt.query_map([], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(categories)
    }

    /// Update a category
    pub fn update(conn: &Connection, id: i64, data: &CategoryUpdate) -> DbResult<Option<Self>> {
        if let Some(ref name) = data.name {
            conn.execute(
                "UPDATE categories SET name = ?1 WHERE id = ?2",
                params![name, id],
            )?;
        }
        if let Some(category_type) = data.category_type {
            conn.execute(
                "UPDATE categories SET category_type = ?1 WHERE id = ?2",
                params![category_type.as_str(), id],
            )?;
        }

        Self::get_by_id(conn, id)
    }

    /// Delete a category. Recipes and meal plans in it go with it.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM categories WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
