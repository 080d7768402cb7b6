//! Recipe Manager MCP Server Implementation
//!
//! Implements the MCP server with all recipe manager tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::Database;
use crate::models::{default_servings, IngredientCreate, MealPlanUpdate, RecipeCreate, RecipeUpdate};
use crate::tools::assistant::{self, RecipeTemplateOptions};
use crate::tools::categories;
use crate::tools::export;
use crate::tools::meal_plans;
use crate::tools::recipes;
use crate::tools::shopping_lists::{self, ShoppingListItemDraft};
use crate::tools::status::StatusTracker;
use crate::tools::ToolError;

/// Recipe Manager MCP Service
#[derive(Clone)]
pub struct RecipeManagerService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    images_dir: PathBuf,
    tool_router: ToolRouter<RecipeManagerService>,
}

impl RecipeManagerService {
    pub fn new(config: Config, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config.database_path))),
            database,
            images_dir: config.images_dir,
            tool_router: Self::tool_router(),
        }
    }
}

impl From<ToolError> for McpError {
    fn from(e: ToolError) -> Self {
        if e.is_client_error() {
            tracing::warn!(error = %e, "rejected tool call");
            McpError::invalid_params(e.to_string(), None)
        } else {
            tracing::error!(error = %e, "tool failed");
            McpError::internal_error(e.to_string(), None)
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Category Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListCategoriesParams {
    /// Filter by type: "recipe" or "meal" (optional)
    pub category_type: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateCategoryParams {
    /// Category name, unique within its type
    pub name: String,
    /// "recipe" (groups recipes) or "meal" (a slot of the day)
    pub category_type: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateCategoryParams {
    /// Category ID
    pub id: i64,
    /// New name
    pub name: Option<String>,
    /// New type: "recipe" or "meal"
    pub category_type: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteCategoryParams {
    /// Category ID (its recipes and meal plans are deleted too)
    pub id: i64,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientParams {
    /// Ingredient name, e.g. "Olive oil"
    pub name: String,
    /// Quantity for the recipe's base servings (>= 0)
    pub quantity: f64,
    /// Unit, e.g. "grams", "ml", "cloves"
    pub unit: String,
    /// Preparation notes, e.g. "finely chopped"
    pub notes: Option<String>,
}

impl From<IngredientParams> for IngredientCreate {
    fn from(p: IngredientParams) -> Self {
        IngredientCreate {
            name: p.name,
            quantity: p.quantity,
            unit: p.unit,
            notes: p.notes,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    /// Only recipes in this category (optional)
    pub category_id: Option<i64>,
    /// Search in recipe names (optional)
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    /// Recipe ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    /// Name of the recipe
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    /// Preparation time in minutes
    pub prep_time: Option<i64>,
    /// Cooking time in minutes
    pub cook_time: Option<i64>,
    /// Number of people the quantities feed (default 4)
    #[serde(default = "default_servings")]
    pub servings: i64,
    /// Recipe category ID (must be a "recipe" category)
    pub category_id: Option<i64>,
    /// Ingredient lines
    #[serde(default)]
    pub ingredients: Vec<IngredientParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    /// Recipe ID
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub servings: Option<i64>,
    /// New recipe category ID
    pub category_id: Option<i64>,
    /// Detach the recipe from its category (default false)
    #[serde(default)]
    pub clear_category: bool,
    /// Replaces ALL existing ingredients when provided
    pub ingredients: Option<Vec<IngredientParams>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRecipeParams {
    /// Recipe ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetRecipeImageParams {
    /// Recipe ID
    pub id: i64,
    /// Full path to a png, jpg, jpeg, gif or webp file
    pub file_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AdjustRecipePortionsParams {
    /// Recipe ID
    pub recipe_id: i64,
    /// Number of people to cook for (> 0)
    pub people_count: i64,
}

// ============================================================================
// Meal Plan Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealPlansParams {
    /// First date to include (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Last date to include (YYYY-MM-DD)
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetWeekMealPlansParams {
    /// Any date in the week (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateMealPlanParams {
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Meal category ID (must be a "meal" category)
    pub meal_category_id: i64,
    /// Recipe ID
    pub recipe_id: i64,
    /// Number of people eating (default 4)
    pub people_count: Option<i64>,
    /// Plan name (defaults to "<recipe> - <meal category>")
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateMealPlanParams {
    /// Meal plan ID
    pub id: i64,
    pub name: Option<String>,
    /// New date (YYYY-MM-DD)
    pub date: Option<String>,
    pub meal_category_id: Option<i64>,
    pub recipe_id: Option<i64>,
    pub people_count: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteMealPlanParams {
    /// Meal plan ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AdjustMealPlanPortionsParams {
    /// Meal plan ID
    pub id: i64,
    /// New number of people (> 0); saved on the plan
    pub people_count: i64,
}

// ============================================================================
// Shopping List Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ShoppingListItemParams {
    pub ingredient_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub checked: Option<bool>,
}

impl From<ShoppingListItemParams> for ShoppingListItemDraft {
    fn from(p: ShoppingListItemParams) -> Self {
        ShoppingListItemDraft {
            ingredient_name: p.ingredient_name,
            quantity: p.quantity,
            unit: p.unit,
            checked: p.checked,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetShoppingListParams {
    /// Shopping list ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateShoppingListParams {
    /// List name
    pub name: String,
    /// Items; lines missing a name, quantity or unit are skipped
    #[serde(default)]
    pub items: Vec<ShoppingListItemParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateShoppingListParams {
    /// Shopping list ID
    pub id: i64,
    /// New name
    pub name: Option<String>,
    /// Replaces ALL existing items when provided
    pub items: Option<Vec<ShoppingListItemParams>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteShoppingListParams {
    /// Shopping list ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ToggleShoppingListItemParams {
    /// Shopping list ID
    pub list_id: i64,
    /// Item ID
    pub item_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateShoppingListParams {
    /// List name
    pub name: String,
    /// Meal plans to shop for; every ID must exist
    pub meal_plan_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportShoppingListParams {
    /// Shopping list ID
    pub id: i64,
    /// Full output file path (e.g., "/home/me/Documents/shopping.pdf")
    pub output_path: String,
}

// ============================================================================
// Assistant Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeSuggestionsParams {
    /// Ingredients on hand, e.g. ["chicken", "rice"]
    pub ingredients: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientSubstitutionsParams {
    /// Ingredient to replace
    pub ingredient: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CookingTipsParams {
    /// Number of tips, 1 to 5 (default 3)
    pub count: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateRecipeTemplateParams {
    /// Recipe name
    pub name: String,
    /// Cuisine (default "international")
    pub cuisine: Option<String>,
    /// Difficulty (default "medium")
    pub difficulty: Option<String>,
    /// Minutes (default 30)
    pub prep_time: Option<i64>,
    /// Minutes (default 30)
    pub cook_time: Option<i64>,
    /// Default 4
    pub servings: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecipeChatParams {
    /// Free-text question
    pub message: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl RecipeManagerService {
    // --- Status ---

    #[tool(description = "Get the current status of the recipe manager including build info, database status, record counts, and process information")]
    async fn recipe_manager_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for managing recipes, planning meals and generating shopping lists. Call this when starting a session or when unsure how the tools fit together.")]
    fn recipe_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::RECIPE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(RECIPE_INSTRUCTIONS)]))
    }

    // --- Categories ---

    #[tool(description = "List categories ordered by name, optionally only recipe or only meal categories")]
    fn list_categories(&self, Parameters(p): Parameters<ListCategoriesParams>) -> Result<CallToolResult, McpError> {
        let result = categories::list_categories(&self.database, p.category_type.as_deref())?;
        json_result(&result)
    }

    #[tool(description = "Create a recipe or meal category. Names must be unique within a type.")]
    fn create_category(&self, Parameters(p): Parameters<CreateCategoryParams>) -> Result<CallToolResult, McpError> {
        let result = categories::create_category(&self.database, &p.name, &p.category_type)?;
        json_result(&result)
    }

    #[tool(description = "Rename a category or change its type")]
    fn update_category(&self, Parameters(p): Parameters<UpdateCategoryParams>) -> Result<CallToolResult, McpError> {
        let result = categories::update_category(&self.database, p.id, p.name.as_deref(), p.category_type.as_deref())?;
        json_result(&result)
    }

    #[tool(description = "Delete a category. WARNING: also deletes its recipes and meal plans.")]
    fn delete_category(&self, Parameters(p): Parameters<DeleteCategoryParams>) -> Result<CallToolResult, McpError> {
        let result = categories::delete_category(&self.database, p.id)?;
        json_result(&result)
    }

    // --- Recipes ---

    #[tool(description = "List recipes with their ingredients, newest first. Filter by category and/or search text.")]
    fn list_recipes(&self, Parameters(p): Parameters<ListRecipesParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::list_recipes(&self.database, p.category_id, p.search.as_deref())?;
        json_result(&result)
    }

    #[tool(description = "Get a recipe with its ingredients and category name")]
    fn get_recipe(&self, Parameters(p): Parameters<GetRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::get_recipe(&self.database, p.id)?;
        json_result(&result)
    }

    #[tool(description = "Create a recipe with its ingredients. Quantities are for the given servings.")]
    fn create_recipe(&self, Parameters(p): Parameters<CreateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeCreate {
            name: p.name,
            description: p.description,
            instructions: p.instructions,
            prep_time: p.prep_time,
            cook_time: p.cook_time,
            servings: p.servings,
            category_id: p.category_id,
        };
        let ingredients = p.ingredients.into_iter().map(IngredientCreate::from).collect();
        let result = recipes::create_recipe(&self.database, data, ingredients)?;
        json_result(&result)
    }

    #[tool(description = "Update a recipe. Passing ingredients replaces the whole ingredient list.")]
    fn update_recipe(&self, Parameters(p): Parameters<UpdateRecipeParams>) -> Result<CallToolResult, McpError> {
        let category_id = if p.clear_category { Some(None) } else { p.category_id.map(Some) };
        let data = RecipeUpdate {
            name: p.name,
            description: p.description,
            instructions: p.instructions,
            prep_time: p.prep_time,
            cook_time: p.cook_time,
            servings: p.servings,
            category_id,
        };
        let ingredients = p
            .ingredients
            .map(|list| list.into_iter().map(IngredientCreate::from).collect());
        let result = recipes::update_recipe(&self.database, p.id, data, ingredients)?;
        json_result(&result)
    }

    #[tool(description = "Delete a recipe with its ingredients, meal plans and image file")]
    fn delete_recipe(&self, Parameters(p): Parameters<DeleteRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::delete_recipe(&self.database, p.id)?;
        json_result(&result)
    }

    #[tool(description = "Attach an image to a recipe by copying a local png/jpg/jpeg/gif/webp file into the images folder")]
    fn set_recipe_image(&self, Parameters(p): Parameters<SetRecipeImageParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::set_recipe_image(&self.database, &self.images_dir, p.id, &p.file_path)?;
        json_result(&result)
    }

    #[tool(description = "Scale a recipe's ingredients to a number of people without saving anything")]
    fn adjust_recipe_portions(&self, Parameters(p): Parameters<AdjustRecipePortionsParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::adjust_recipe_portions(&self.database, p.recipe_id, p.people_count)?;
        json_result(&result)
    }

    // --- Meal Plans ---

    #[tool(description = "List meal plans ordered by date, optionally within a date range (YYYY-MM-DD)")]
    fn list_meal_plans(&self, Parameters(p): Parameters<ListMealPlansParams>) -> Result<CallToolResult, McpError> {
        let result = meal_plans::list_meal_plans(&self.database, p.start_date.as_deref(), p.end_date.as_deref())?;
        json_result(&result)
    }

    #[tool(description = "Get the Monday-to-Sunday week of meal plans containing a date, grouped by date then meal category")]
    fn get_week_meal_plans(&self, Parameters(p): Parameters<GetWeekMealPlansParams>) -> Result<CallToolResult, McpError> {
        let result = meal_plans::get_week_meal_plans(&self.database, &p.date)?;
        json_result(&result)
    }

    #[tool(description = "Plan a recipe for a date and meal category. Each date + meal category slot holds one plan.")]
    fn create_meal_plan(&self, Parameters(p): Parameters<CreateMealPlanParams>) -> Result<CallToolResult, McpError> {
        let result = meal_plans::create_meal_plan(
            &self.database,
            &p.date,
            p.meal_category_id,
            p.recipe_id,
            p.people_count,
            p.name.as_deref(),
        )?;
        json_result(&result)
    }

    #[tool(description = "Update a meal plan's name, date, meal category, recipe or people count")]
    fn update_meal_plan(&self, Parameters(p): Parameters<UpdateMealPlanParams>) -> Result<CallToolResult, McpError> {
        let data = MealPlanUpdate {
            name: p.name,
            date: p.date,
            meal_category_id: p.meal_category_id,
            recipe_id: p.recipe_id,
            people_count: p.people_count,
        };
        let result = meal_plans::update_meal_plan(&self.database, p.id, data)?;
        json_result(&result)
    }

    #[tool(description = "Delete a meal plan")]
    fn delete_meal_plan(&self, Parameters(p): Parameters<DeleteMealPlanParams>) -> Result<CallToolResult, McpError> {
        let result = meal_plans::delete_meal_plan(&self.database, p.id)?;
        json_result(&result)
    }

    #[tool(description = "Change how many people a meal plan feeds and get the scaled ingredients")]
    fn adjust_meal_plan_portions(&self, Parameters(p): Parameters<AdjustMealPlanPortionsParams>) -> Result<CallToolResult, McpError> {
        let result = meal_plans::adjust_meal_plan_portions(&self.database, p.id, p.people_count)?;
        json_result(&result)
    }

    // --- Shopping Lists ---

    #[tool(description = "List shopping lists with their items, newest first")]
    fn list_shopping_lists(&self) -> Result<CallToolResult, McpError> {
        let result = shopping_lists::list_shopping_lists(&self.database)?;
        json_result(&result)
    }

    #[tool(description = "Get a shopping list with its items")]
    fn get_shopping_list(&self, Parameters(p): Parameters<GetShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_lists::get_shopping_list(&self.database, p.id)?;
        json_result(&result)
    }

    #[tool(description = "Create a shopping list by hand")]
    fn create_shopping_list(&self, Parameters(p): Parameters<CreateShoppingListParams>) -> Result<CallToolResult, McpError> {
        let items = p.items.into_iter().map(ShoppingListItemDraft::from).collect();
        let result = shopping_lists::create_shopping_list(&self.database, &p.name, items)?;
        json_result(&result)
    }

    #[tool(description = "Rename a shopping list. Passing items replaces all existing items.")]
    fn update_shopping_list(&self, Parameters(p): Parameters<UpdateShoppingListParams>) -> Result<CallToolResult, McpError> {
        let items = p
            .items
            .map(|list| list.into_iter().map(ShoppingListItemDraft::from).collect());
        let result = shopping_lists::update_shopping_list(&self.database, p.id, p.name.as_deref(), items)?;
        json_result(&result)
    }

    #[tool(description = "Delete a shopping list and its items")]
    fn delete_shopping_list(&self, Parameters(p): Parameters<DeleteShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_lists::delete_shopping_list(&self.database, p.id)?;
        json_result(&result)
    }

    #[tool(description = "Check or uncheck a shopping list item")]
    fn toggle_shopping_list_item(&self, Parameters(p): Parameters<ToggleShoppingListItemParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_lists::toggle_shopping_list_item(&self.database, p.list_id, p.item_id)?;
        json_result(&result)
    }

    #[tool(description = "Generate a shopping list from meal plans. Each recipe is scaled to its plan's people count; same ingredient + unit lines are summed.")]
    fn generate_shopping_list(&self, Parameters(p): Parameters<GenerateShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_lists::generate_shopping_list(&self.database, &p.name, &p.meal_plan_ids)?;
        json_result(&result)
    }

    #[tool(description = "Export a shopping list as a printable PDF checklist to the given file path")]
    fn export_shopping_list_pdf(&self, Parameters(p): Parameters<ExportShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = export::export_shopping_list_pdf(&self.database, p.id, &p.output_path)?;
        json_result(&result)
    }

    #[tool(description = "Export a shopping list as CSV (Checked, Item, Quantity, Unit) to the given file path")]
    fn export_shopping_list_csv(&self, Parameters(p): Parameters<ExportShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = export::export_shopping_list_csv(&self.database, p.id, &p.output_path)?;
        json_result(&result)
    }

    // --- Assistant ---

    #[tool(description = "Suggest recipes for ingredients on hand: matching stored recipes first, then ideas")]
    fn recipe_suggestions(&self, Parameters(p): Parameters<RecipeSuggestionsParams>) -> Result<CallToolResult, McpError> {
        let result = assistant::recipe_suggestions(&self.database, &p.ingredients)?;
        json_result(&result)
    }

    #[tool(description = "Suggest substitutes for an ingredient")]
    fn ingredient_substitutions(&self, Parameters(p): Parameters<IngredientSubstitutionsParams>) -> Result<CallToolResult, McpError> {
        let result = assistant::ingredient_substitutions(&p.ingredient)?;
        json_result(&result)
    }

    #[tool(description = "Get 1 to 5 random cooking tips")]
    fn cooking_tips(&self, Parameters(p): Parameters<CookingTipsParams>) -> Result<CallToolResult, McpError> {
        json_result(&assistant::cooking_tips(p.count))
    }

    #[tool(description = "Generate a starter recipe template to customize")]
    fn generate_recipe_template(&self, Parameters(p): Parameters<GenerateRecipeTemplateParams>) -> Result<CallToolResult, McpError> {
        let options = RecipeTemplateOptions {
            cuisine: p.cuisine,
            difficulty: p.difficulty,
            prep_time: p.prep_time,
            cook_time: p.cook_time,
            servings: p.servings,
        };
        let result = assistant::generate_recipe(&p.name, options)?;
        json_result(&result)
    }

    #[tool(description = "Ask the recipe assistant a general cooking question")]
    fn recipe_chat(&self, Parameters(p): Parameters<RecipeChatParams>) -> Result<CallToolResult, McpError> {
        let result = assistant::chat(&p.message)?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for RecipeManagerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "recipe-manager".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Recipe Manager".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Recipe Manager - recipes, meal planning, portion scaling and shopping lists. \
                 IMPORTANT: Call recipe_instructions first when unsure how the tools fit together. \
                 Categories: list/create/update/delete_category (type recipe or meal). \
                 Recipes: list/get/create/update/delete_recipe, set_recipe_image, adjust_recipe_portions. \
                 Meal plans: list_meal_plans, get_week_meal_plans, create/update/delete_meal_plan, adjust_meal_plan_portions. \
                 Shopping lists: list/get/create/update/delete_shopping_list, toggle_shopping_list_item, \
                 generate_shopping_list (from meal plan IDs), export_shopping_list_pdf, export_shopping_list_csv. \
                 Assistant: recipe_suggestions, ingredient_substitutions, cooking_tips, generate_recipe_template, recipe_chat."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portions::PortionError;
    use rmcp::model::ErrorCode;

    #[test]
    fn test_client_errors_become_invalid_params() {
        let err: McpError = ToolError::from(PortionError::InvalidPeopleCount { people_count: 0 }).into();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

        let err: McpError = ToolError::NotFound { entity: "Recipe", id: 1 }.into();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "Recipe not found (id 1)");
    }

    #[test]
    fn test_server_errors_become_internal() {
        let err: McpError = ToolError::Export("disk full".into()).into();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn test_service_builds_against_in_memory_database() {
        let config = Config {
            database_path: PathBuf::from(":memory:"),
            images_dir: std::env::temp_dir().join("recipe_manager_service_images"),
        };
        let service = RecipeManagerService::new(config, Database::in_memory().unwrap());
        let info = service.get_info();
        assert_eq!(info.server_info.name, "recipe-manager");
    }
}
