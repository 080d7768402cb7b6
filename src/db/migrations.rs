//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- CATEGORIES
        -- Shared by recipes ('recipe') and meal plans ('meal')
        -- ============================================
        CREATE TABLE categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category_type TEXT NOT NULL CHECK (category_type IN ('recipe', 'meal')),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (name, category_type)
        );

        CREATE INDEX idx_categories_type ON categories(category_type);

        -- ============================================
        -- RECIPES
        -- ============================================
        CREATE TABLE recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            instructions TEXT,
            prep_time INTEGER,                   -- minutes
            cook_time INTEGER,                   -- minutes
            servings INTEGER NOT NULL DEFAULT 4 CHECK (servings > 0),
            category_id INTEGER REFERENCES categories(id) ON DELETE CASCADE,
            image_path TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipes_name ON recipes(name);
        CREATE INDEX idx_recipes_category ON recipes(category_id);

        -- ============================================
        -- INGREDIENTS
        -- Free-text ingredient lines owned by a recipe
        -- ============================================
        CREATE TABLE ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            quantity REAL NOT NULL CHECK (quantity >= 0),
            unit TEXT NOT NULL,                  -- grams, ml, pieces, etc.
            notes TEXT
        );

        CREATE INDEX idx_ingredients_recipe ON ingredients(recipe_id);
        CREATE INDEX idx_ingredients_name ON ingredients(name);

        -- ============================================
        -- MEAL PLANS
        -- One recipe cooked for N people on a date, one per meal category
        -- ============================================
        CREATE TABLE meal_plans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            date TEXT NOT NULL,                  -- ISO date: YYYY-MM-DD
            meal_category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            people_count INTEGER NOT NULL DEFAULT 4 CHECK (people_count > 0),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (date, meal_category_id)
        );

        CREATE INDEX idx_meal_plans_date ON meal_plans(date);
        CREATE INDEX idx_meal_plans_recipe ON meal_plans(recipe_id);

        -- ============================================
        -- SHOPPING LISTS
        -- ============================================
        CREATE TABLE shopping_lists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            exported_at TEXT
        );

        CREATE TABLE shopping_list_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            shopping_list_id INTEGER NOT NULL REFERENCES shopping_lists(id) ON DELETE CASCADE,
            ingredient_name TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit TEXT NOT NULL,
            checked INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX idx_shopping_list_items_list ON shopping_list_items(shopping_list_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_fresh_database_needs_migration() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE schema_migrations (version INTEGER PRIMARY KEY, applied_at TEXT)",
            [],
        )
        .unwrap();
        assert!(needs_migration(&conn).unwrap());
    }
}
