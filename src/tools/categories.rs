//! Category MCP Tools
//!
//! Tools for managing recipe and meal categories.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Category, CategoryCreate, CategoryType, CategoryUpdate};

use super::error::{ToolError, ToolResult};

/// Response for list_categories
#[derive(Debug, Serialize)]
pub struct ListCategoriesResponse {
    pub categories: Vec<Category>,
    pub count: usize,
}

/// Response for delete_category
#[derive(Debug, Serialize)]
pub struct DeleteCategoryResponse {
    pub success: bool,
    pub deleted_id: i64,
    pub message: String,
}

fn parse_type(s: &str) -> ToolResult<CategoryType> {
    CategoryType::parse(s).ok_or_else(|| ToolError::invalid("Type must be either \"recipe\" or \"meal\""))
}

/// List categories ordered by name, optionally filtered by type
pub fn list_categories(db: &Database, category_type: Option<&str>) -> ToolResult<ListCategoriesResponse> {
    let category_type = category_type.map(parse_type).transpose()?;
    let conn = db.get_conn()?;
    let categories = Category::list(&conn, category_type)?;

    Ok(ListCategoriesResponse {
        count: categories.len(),
        categories,
    })
}

/// Create a category; names are unique within a type
pub fn create_category(db: &Database, name: &str, category_type: &str) -> ToolResult<Category> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ToolError::invalid("Category name cannot be empty"));
    }
    let category_type = parse_type(category_type)?;

    let conn = db.get_conn()?;

    if Category::find_by_name(&conn, name, category_type)?.is_some() {
        return Err(ToolError::Conflict("Category with this name already exists".into()));
    }

    let category = Category::create(&conn, &CategoryCreate {
        name: name.to_string(),
        category_type,
    })?;

    tracing::info!(id = category.id, name = %category.name, kind = category_type.as_str(), "created category");
    Ok(category)
}

/// Rename and/or retype a category
pub fn update_category(
    db: &Database,
    id: i64,
    name: Option<&str>,
    category_type: Option<&str>,
) -> ToolResult<Category> {
    let category_type = category_type.map(parse_type).transpose()?;
    let name = name.map(str::trim);
    if name == Some("") {
        return Err(ToolError::invalid("Category name cannot be empty"));
    }

    let conn = db.get_conn()?;

    let existing = Category::get_by_id(&conn, id)?.ok_or(ToolError::NotFound { entity: "Category", id })?;

    if let Some(name) = name {
        let target_type = category_type.unwrap_or(existing.category_type);
        if let Some(other) = Category::find_by_name(&conn, name, target_type)? {
            if other.id != id {
                return Err(ToolError::Conflict("Category with this name already exists".into()));
            }
        }
    }

    let updated = Category::update(&conn, id, &CategoryUpdate {
        name: name.map(str::to_string),
        category_type,
    })?
    .ok_or(ToolError::NotFound { entity: "Category", id })?;

    Ok(updated)
}

/// Delete a category together with its recipes and meal plans
pub fn delete_category(db: &Database, id: i64) -> ToolResult<DeleteCategoryResponse> {
    let conn = db.get_conn()?;

    if !Category::delete(&conn, id)? {
        return Err(ToolError::NotFound { entity: "Category", id });
    }

    tracing::info!(id, "deleted category");
    Ok(DeleteCategoryResponse {
        success: true,
        deleted_id: id,
        message: "Category deleted successfully".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rejects_bad_type_and_duplicates() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(create_category(&db, "Dessert", "course"), Err(ToolError::Invalid(_))));

        create_category(&db, "Dinner", "meal").unwrap();
        assert!(matches!(create_category(&db, "Dinner", "meal"), Err(ToolError::Conflict(_))));
        assert!(create_category(&db, "Dinner", "recipe").is_ok());
    }

    #[test]
    fn test_list_by_type() {
        let db = Database::in_memory().unwrap();
        create_category(&db, "Soups", "recipe").unwrap();
        create_category(&db, "Brunch", "meal").unwrap();

        let meals = list_categories(&db, Some("meal")).unwrap();
        assert_eq!(meals.count, 1);
        assert_eq!(meals.categories[0].name, "Brunch");
        assert_eq!(list_categories(&db, None).unwrap().count, 2);
    }

    #[test]
    fn test_update_checks_name_clash_within_type() {
        let db = Database::in_memory().unwrap();
        create_category(&db, "Lunch", "meal").unwrap();
        let snack = create_category(&db, "Snack", "meal").unwrap();

        assert!(matches!(
            update_category(&db, snack.id, Some("Lunch"), None),
            Err(ToolError::Conflict(_))
        ));

        let renamed = update_category(&db, snack.id, Some("Supper"), None).unwrap();
        assert_eq!(renamed.name, "Supper");

        // Keeping the same name is not a clash with itself
        assert!(update_category(&db, snack.id, Some("Supper"), Some("recipe")).is_ok());
    }

    #[test]
    fn test_delete_missing_category() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(delete_category(&db, 42), Err(ToolError::NotFound { .. })));
    }
}
