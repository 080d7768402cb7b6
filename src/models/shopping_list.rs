//! Shopping list model
//!
//! A named list of (ingredient, quantity, unit) lines that can be checked off.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A shopping list with its items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub exported_at: Option<String>,
    pub items: Vec<ShoppingListItem>,
}

/// One line of a shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: i64,
    pub shopping_list_id: i64,
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
    pub checked: bool,
}

/// Data for a new shopping list item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListItemCreate {
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub checked: bool,
}

/// Data for creating a shopping list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListCreate {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ShoppingListItemCreate>,
}

impl ShoppingList {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
            exported_at: row.get("exported_at")?,
            items: Vec::new(),
        })
    }

    fn with_items(mut self, conn: &Connection) -> DbResult<Self> {
        self.items = ShoppingListItem::get_for_list(conn, self.id)?;
        Ok(self)
    }

    /// Insert a list and its items. Callers wrap this in a transaction.
    pub fn create(conn: &Connection, data: &ShoppingListCreate) -> DbResult<Self> {
        conn.execute("INSERT INTO shopping_lists (name) VALUES (?1)", [&data.name])?;
        let id = conn.last_insert_rowid();

        for item in &data.items {
            ShoppingListItem::create(conn, id, item)?;
        }

        Self::get_by_id(conn, id)?.ok_or(DbError::MissingRow { table: "shopping_lists", id })
    }

    /// Get a list with its items
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM shopping_lists WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(list) => Ok(Some(list.with_items(conn)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All lists with items, newest first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM shopping_lists ORDER BY created_at DESC, id DESC")?;
        let lists = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        lists.into_iter().map(|list| list.with_items(conn)).collect()
    }

    /// Rename a list
    pub fn rename(conn: &Connection, id: i64, name: &str) -> DbResult<()> {
        conn.execute("UPDATE shopping_lists SET name = ?1 WHERE id = ?2", params![name, id])?;
        Ok(())
    }

    /// Replace all items of a list. Callers wrap this in a transaction.
    pub fn replace_items(conn: &Connection, id: i64, items: &[ShoppingListItemCreate]) -> DbResult<()> {
        conn.execute("DELETE FROM shopping_list_items WHERE shopping_list_id = ?1", [id])?;
        for item in items {
            ShoppingListItem::create(conn, id, item)?;
        }
        Ok(())
    }

    /// Stamp the export time
    pub fn mark_exported(conn: &Connection, id: i64) -> DbResult<()> {
        conn.execute(
            "UPDATE shopping_lists SET exported_at = datetime('now') WHERE id = ?1",
            [id],
        )?;
        Ok(())
    }

    /// Delete a list and its items
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM shopping_lists WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

impl ShoppingListItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            shopping_list_id: row.get("shopping_list_id")?,
            ingredient_name: row.get("ingredient_name")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            checked: row.get::<_, i32>("checked")? != 0,
        })
    }

    pub fn create(conn: &Connection, shopping_list_id: i64, data: &ShoppingListItemCreate) -> DbResult<i64> {
        conn.execute(
            r#"
            INSERT INTO shopping_list_items (shopping_list_id, ingredient_name, quantity, unit, checked)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                shopping_list_id,
                data.ingredient_name,
                data.quantity,
                data.unit,
                data.checked as i32,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_for_list(conn: &Connection, shopping_list_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM shopping_list_items WHERE shopping_list_id = ?1 ORDER BY id",
        )?;

        let items = stmt
            .query_map([shopping_list_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Flip the checked flag of an item on a given list
    pub fn toggle(conn: &Connection, shopping_list_id: i64, item_id: i64) -> DbResult<Option<Self>> {
        let rows = conn.execute(
            r#"
            UPDATE shopping_list_items SET checked = 1 - checked
            WHERE id = ?1 AND shopping_list_id = ?2
            "#,
            params![item_id, shopping_list_id],
        )?;

        if rows == 0 {
            return Ok(None);
        }

        let mut stmt = conn.prepare("SELECT * FROM shopping_list_items WHERE id = ?1")?;
        match stmt.query_row([item_id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
