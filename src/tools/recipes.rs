//! Recipe MCP Tools
//!
//! Tools for managing recipes and their ingredients, recipe images, and
//! portion scaling.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde::Serialize;

use crate::db::Database;
use crate::models::{
    Category, CategoryType, Ingredient, IngredientCreate, Recipe, RecipeCreate, RecipeUpdate,
};
use crate::portions::{self, PortionError, RecipePortions, ScaledIngredient};

use super::error::{ToolError, ToolResult};

const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Full recipe detail with ingredients
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub servings: i64,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub image_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub ingredients: Vec<Ingredient>,
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeDetail>,
    pub count: usize,
}

/// Response for delete_recipe
#[derive(Debug, Serialize)]
pub struct DeleteRecipeResponse {
    pub success: bool,
    pub deleted_id: i64,
    pub image_removed: bool,
}

/// Response for set_recipe_image
#[derive(Debug, Serialize)]
pub struct SetRecipeImageResponse {
    pub recipe_id: i64,
    pub image_path: String,
    pub message: String,
}

/// Response for adjust_recipe_portions
#[derive(Debug, Serialize)]
pub struct AdjustPortionsResponse {
    pub recipe_id: i64,
    pub recipe_name: String,
    pub original_servings: i64,
    pub adjusted_servings: i64,
    pub scaling_factor: f64,
    pub adjusted_ingredients: Vec<ScaledIngredient>,
}

pub(crate) fn load_detail(conn: &Connection, recipe: Recipe) -> ToolResult<RecipeDetail> {
    let ingredients = Ingredient::get_for_recipe(conn, recipe.id)?;
    let category_name = match recipe.category_id {
        Some(category_id) => Category::get_by_id(conn, category_id)?.map(|c| c.name),
        None => None,
    };

    Ok(RecipeDetail {
        id: recipe.id,
        name: recipe.name,
        description: recipe.description,
        instructions: recipe.instructions,
        prep_time: recipe.prep_time,
        cook_time: recipe.cook_time,
        servings: recipe.servings,
        category_id: recipe.category_id,
        category_name,
        image_path: recipe.image_path,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
        ingredients,
    })
}

fn validate_servings(servings: i64) -> ToolResult<()> {
    if servings <= 0 {
        return Err(PortionError::InvalidServings { servings }.into());
    }
    Ok(())
}

fn validate_recipe_category(conn: &Connection, category_id: Option<i64>) -> ToolResult<()> {
    if let Some(category_id) = category_id {
        if Category::get_by_id_and_type(conn, category_id, CategoryType::Recipe)?.is_none() {
            return Err(ToolError::invalid("Invalid recipe category"));
        }
    }
    Ok(())
}

fn validate_ingredients(ingredients: &[IngredientCreate]) -> ToolResult<()> {
    for ingredient in ingredients {
        if ingredient.name.trim().is_empty() {
            return Err(ToolError::invalid("Ingredient name cannot be empty"));
        }
        if ingredient.unit.trim().is_empty() {
            return Err(ToolError::invalid(format!("Ingredient '{}' needs a unit", ingredient.name)));
        }
        if !ingredient.quantity.is_finite() || ingredient.quantity < 0.0 {
            return Err(ToolError::invalid(format!(
                "Ingredient '{}' quantity must be a non-negative number",
                ingredient.name
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Recipe Tools
// ============================================================================

/// List recipes, newest first
pub fn list_recipes(db: &Database, category_id: Option<i64>, search: Option<&str>) -> ToolResult<ListRecipesResponse> {
    let conn = db.get_conn()?;

    let recipes = Recipe::list(&conn, category_id, search)?
        .into_iter()
        .map(|recipe| load_detail(&conn, recipe))
        .collect::<ToolResult<Vec<_>>>()?;

    Ok(ListRecipesResponse {
        count: recipes.len(),
        recipes,
    })
}

/// Get a recipe with its ingredients
pub fn get_recipe(db: &Database, id: i64) -> ToolResult<RecipeDetail> {
    let conn = db.get_conn()?;
    let recipe = Recipe::get_by_id(&conn, id)?.ok_or(ToolError::NotFound { entity: "Recipe", id })?;
    load_detail(&conn, recipe)
}

/// Create a recipe and its ingredients in one transaction
pub fn create_recipe(db: &Database, mut data: RecipeCreate, ingredients: Vec<IngredientCreate>) -> ToolResult<RecipeDetail> {
    data.name = data.name.trim().to_string();
    if data.name.is_empty() {
        return Err(ToolError::invalid("Recipe name is required"));
    }
    validate_servings(data.servings)?;
    validate_ingredients(&ingredients)?;

    let mut conn = db.get_conn()?;
    validate_recipe_category(&conn, data.category_id)?;

    let tx = conn.transaction()?;
    let recipe = Recipe::create(&tx, &data)?;
    for ingredient in &ingredients {
        Ingredient::create(&tx, recipe.id, ingredient)?;
    }
    tx.commit()?;

    tracing::info!(id = recipe.id, name = %recipe.name, ingredients = ingredients.len(), "created recipe");
    load_detail(&conn, recipe)
}

/// Update recipe fields; a provided ingredient list replaces the stored one
pub fn update_recipe(
    db: &Database,
    id: i64,
    mut data: RecipeUpdate,
    ingredients: Option<Vec<IngredientCreate>>,
) -> ToolResult<RecipeDetail> {
    if let Some(ref name) = data.name {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ToolError::invalid("Recipe name cannot be empty"));
        }
        data.name = Some(trimmed.to_string());
    }
    if let Some(servings) = data.servings {
        validate_servings(servings)?;
    }
    if let Some(ref ingredients) = ingredients {
        validate_ingredients(ingredients)?;
    }

    let mut conn = db.get_conn()?;

    if Recipe::get_by_id(&conn, id)?.is_none() {
        return Err(ToolError::NotFound { entity: "Recipe", id });
    }
    if let Some(category_id) = data.category_id {
        validate_recipe_category(&conn, category_id)?;
    }

    let tx = conn.transaction()?;
    Recipe::update(&tx, id, &data)?;
    if let Some(ref ingredients) = ingredients {
        Ingredient::replace_for_recipe(&tx, id, ingredients)?;
        Recipe::touch(&tx, id)?;
    }
    tx.commit()?;

    let recipe = Recipe::get_by_id(&conn, id)?.ok_or(ToolError::NotFound { entity: "Recipe", id })?;
    tracing::info!(id, "updated recipe");
    load_detail(&conn, recipe)
}

/// Delete a recipe, its ingredients, its meal plans, and its image file
pub fn delete_recipe(db: &Database, id: i64) -> ToolResult<DeleteRecipeResponse> {
    let conn = db.get_conn()?;

    let recipe = Recipe::get_by_id(&conn, id)?.ok_or(ToolError::NotFound { entity: "Recipe", id })?;
    Recipe::delete(&conn, id)?;

    let image_removed = match recipe.image_path.as_deref().map(Path::new) {
        Some(path) if path.exists() => match std::fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(id, path = %path.display(), error = %e, "could not remove recipe image");
                false
            }
        },
        _ => false,
    };

    tracing::info!(id, image_removed, "deleted recipe");
    Ok(DeleteRecipeResponse {
        success: true,
        deleted_id: id,
        image_removed,
    })
}

/// Keep only characters that are safe in a file name
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

fn has_allowed_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Copy an image file into the images directory and attach it to a recipe
pub fn set_recipe_image(db: &Database, images_dir: &Path, id: i64, source_path: &str) -> ToolResult<SetRecipeImageResponse> {
    let source = Path::new(source_path);
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ToolError::invalid("No file selected"))?;

    if !has_allowed_extension(file_name) {
        return Err(ToolError::invalid("Invalid file type"));
    }
    if !source.is_file() {
        return Err(ToolError::invalid(format!("Image file not found: {}", source_path)));
    }

    let conn = db.get_conn()?;
    let recipe = Recipe::get_by_id(&conn, id)?.ok_or(ToolError::NotFound { entity: "Recipe", id })?;

    std::fs::create_dir_all(images_dir)?;
    let target: PathBuf = images_dir.join(sanitize_file_name(&format!("recipe_{}_{}", id, file_name)));

    if let Some(old) = recipe.image_path.as_deref().map(Path::new) {
        if old != target && old.exists() {
            std::fs::remove_file(old)?;
        }
    }

    std::fs::copy(source, &target)?;
    let image_path = target.display().to_string();
    Recipe::set_image_path(&conn, id, Some(&image_path))?;

    tracing::info!(id, image_path = %image_path, "stored recipe image");
    Ok(SetRecipeImageResponse {
        recipe_id: id,
        image_path,
        message: "Image uploaded successfully".to_string(),
    })
}

/// Scale a recipe's ingredients to a head count without saving anything
pub fn adjust_recipe_portions(db: &Database, recipe_id: i64, people_count: i64) -> ToolResult<AdjustPortionsResponse> {
    if people_count <= 0 {
        return Err(PortionError::InvalidPeopleCount { people_count }.into());
    }

    let conn = db.get_conn()?;
    let recipe = Recipe::get_by_id(&conn, recipe_id)?.ok_or(ToolError::NotFound { entity: "Recipe", id: recipe_id })?;
    let ingredients = Ingredient::get_for_recipe(&conn, recipe_id)?;

    let scaled = portions::scale(
        RecipePortions {
            name: &recipe.name,
            servings: recipe.servings,
            ingredients: &ingredients,
        },
        people_count,
    )?;

    Ok(AdjustPortionsResponse {
        recipe_id: recipe.id,
        recipe_name: recipe.name,
        original_servings: recipe.servings,
        adjusted_servings: people_count,
        scaling_factor: scaled.scaling_factor,
        adjusted_ingredients: scaled.ingredients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::categories::create_category;

    fn new_recipe(name: &str, servings: i64) -> RecipeCreate {
        RecipeCreate {
            name: name.to_string(),
            description: Some("Test recipe".to_string()),
            instructions: None,
            prep_time: Some(10),
            cook_time: Some(15),
            servings,
            category_id: None,
        }
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
    fn test_create_with_ingredients_and_category() {
        let db = Database::in_memory().unwrap();
        let dinner = create_category(&db, "Dinner", "recipe").unwrap();

        let mut data = new_recipe("  Simple Garlic Pasta ", 4);
        data.category_id = Some(dinner.id);
        let detail = create_recipe(&db, data, vec![line("Pasta", 400.0, "grams"), line("Garlic", 4.0, "cloves")]).unwrap();

        assert_eq!(detail.name, "Simple Garlic Pasta");
        assert_eq!(detail.category_name.as_deref(), Some("Dinner"));
        assert_eq!(detail.ingredients.len(), 2);

        assert_eq!(list_recipes(&db, Some(dinner.id), Some("garlic")).unwrap().count, 1);
        assert_eq!(list_recipes(&db, Some(dinner.id), Some("risotto")).unwrap().count, 0);
    }

    #[test]
    fn test_create_rejects_meal_category_and_bad_servings() {
        let db = Database::in_memory().unwrap();
        let brunch = create_category(&db, "Brunch", "meal").unwrap();

        let mut data = new_recipe("Waffles", 4);
        data.category_id = Some(brunch.id);
        assert!(matches!(create_recipe(&db, data, vec![]), Err(ToolError::Invalid(_))));

        assert!(matches!(
            create_recipe(&db, new_recipe("Waffles", 0), vec![]),
            Err(ToolError::Portion(PortionError::InvalidServings { servings: 0 }))
        ));
        assert!(matches!(create_recipe(&db, new_recipe("   ", 2), vec![]), Err(ToolError::Invalid(_))));
    }

    #[test]
    fn test_create_rejects_negative_quantity_without_writing() {
        let db = Database::in_memory().unwrap();
        let result = create_recipe(&db, new_recipe("Broken", 2), vec![line("Salt", -1.0, "pinch")]);
        assert!(matches!(result, Err(ToolError::Invalid(_))));
        assert_eq!(list_recipes(&db, None, None).unwrap().count, 0);
    }

    #[test]
    fn test_update_replaces_ingredients() {
        let db = Database::in_memory().unwrap();
        let created = create_recipe(&db, new_recipe("Omelette", 1), vec![line("Eggs", 2.0, "pieces")]).unwrap();

        let updated = update_recipe(
            &db,
            created.id,
            RecipeUpdate { servings: Some(2), ..Default::default() },
            Some(vec![line("Eggs", 3.0, "pieces"), line("Chives", 1.0, "tablespoon")]),
        )
        .unwrap();

        assert_eq!(updated.servings, 2);
        assert_eq!(updated.ingredients.len(), 2);
        assert_eq!(updated.ingredients[0].quantity, 3.0);

        // Leaving ingredients out keeps them
        let renamed = update_recipe(&db, created.id, RecipeUpdate { name: Some("Herb Omelette".into()), ..Default::default() }, None).unwrap();
        assert_eq!(renamed.ingredients.len(), 2);
    }

    #[test]
    fn test_update_missing_recipe() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            update_recipe(&db, 99, RecipeUpdate::default(), None),
            Err(ToolError::NotFound { .. })
        ));
    }

    #[test]
    fn test_adjust_portions() {
        let db = Database::in_memory().unwrap();
        let created = create_recipe(&db, new_recipe("Simple Garlic Pasta", 4), vec![
            line("Pasta", 400.0, "grams"),
            line("Olive oil", 60.0, "ml"),
        ])
        .unwrap();

        let adjusted = adjust_recipe_portions(&db, created.id, 6).unwrap();
        assert_eq!(adjusted.scaling_factor, 1.5);
        assert_eq!(adjusted.original_servings, 4);
        assert_eq!(adjusted.adjusted_servings, 6);
        assert_eq!(adjusted.adjusted_ingredients[0].adjusted_quantity, 600.0);
        assert_eq!(adjusted.adjusted_ingredients[1].adjusted_quantity, 90.0);

        assert!(matches!(
            adjust_recipe_portions(&db, created.id, 0),
            Err(ToolError::Portion(PortionError::InvalidPeopleCount { people_count: 0 }))
        ));
        assert!(matches!(adjust_recipe_portions(&db, created.id + 1, 2), Err(ToolError::NotFound { .. })));
    }

    #[test]
    fn test_delete_recipe() {
        let db = Database::in_memory().unwrap();
        let created = create_recipe(&db, new_recipe("Toast", 1), vec![line("Bread", 2.0, "slices")]).unwrap();

        let deleted = delete_recipe(&db, created.id).unwrap();
        assert!(deleted.success);
        assert!(!deleted.image_removed);
        assert!(matches!(get_recipe(&db, created.id), Err(ToolError::NotFound { .. })));
    }

    #[test]
    fn test_image_file_name_rules() {
        assert!(has_allowed_extension("photo.JPG"));
        assert!(has_allowed_extension("photo.webp"));
        assert!(!has_allowed_extension("notes.txt"));
        assert!(!has_allowed_extension("noextension"));
        assert_eq!(sanitize_file_name("recipe_1_my photo!.png"), "recipe_1_my_photo_.png");
    }

    #[test]
    fn test_set_recipe_image_rejects_bad_type() {
        let db = Database::in_memory().unwrap();
        let created = create_recipe(&db, new_recipe("Toast", 1), vec![]).unwrap();
        let result = set_recipe_image(&db, Path::new("images"), created.id, "/tmp/recipe.txt");
        assert!(matches!(result, Err(ToolError::Invalid(_))));
    }

    #[test]
    fn test_set_recipe_image_copies_file() {
        let db = Database::in_memory().unwrap();
        let created = create_recipe(&db, new_recipe("Toast", 1), vec![]).unwrap();

        let work_dir = std::env::temp_dir().join(format!("recipe_manager_image_test_{}", std::process::id()));
        std::fs::create_dir_all(&work_dir).unwrap();
        let source = work_dir.join("toast.png");
        std::fs::write(&source, b"not really a png").unwrap();
        let images_dir = work_dir.join("images");

        let response = set_recipe_image(&db, &images_dir, created.id, source.to_str().unwrap()).unwrap();
        assert!(Path::new(&response.image_path).exists());
        assert_eq!(get_recipe(&db, created.id).unwrap().image_path.as_deref(), Some(response.image_path.as_str()));

        let deleted = delete_recipe(&db, created.id).unwrap();
        assert!(deleted.image_removed);
        assert!(!Path::new(&response.image_path).exists());

        std::fs::remove_dir_all(&work_dir).ok();
    }
}
