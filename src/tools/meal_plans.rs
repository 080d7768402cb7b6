//! Meal Plan MCP Tools
//!
//! Tools for scheduling recipes into date + meal category slots and scaling
//! them to the number of people eating.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::Database;
use crate::models::{Category, CategoryType, Ingredient, MealPlan, MealPlanCreate, MealPlanUpdate, Recipe};
use crate::portions::{self, PortionError, RecipePortions, ScaledIngredient};

use super::error::{ToolError, ToolResult};

pub const DEFAULT_PEOPLE_COUNT: i64 = 4;

/// Response for list_meal_plans
#[derive(Debug, Serialize)]
pub struct ListMealPlansResponse {
    pub meal_plans: Vec<MealPlan>,
    pub count: usize,
}

/// Response for get_week_meal_plans
#[derive(Debug, Serialize)]
pub struct WeekMealPlansResponse {
    pub start_date: String,
    pub end_date: String,
    /// date -> meal category name -> plan
    pub meal_plans: BTreeMap<String, BTreeMap<String, MealPlan>>,
}

/// Response for delete_meal_plan
#[derive(Debug, Serialize)]
pub struct DeleteMealPlanResponse {
    pub success: bool,
    pub deleted_id: i64,
    pub message: String,
}

/// Response for adjust_meal_plan_portions
#[derive(Debug, Serialize)]
pub struct AdjustMealPlanResponse {
    pub meal_plan_id: i64,
    pub recipe_id: i64,
    pub recipe_name: String,
    pub original_servings: i64,
    pub people_count: i64,
    pub scaling_factor: f64,
    pub adjusted_ingredients: Vec<ScaledIngredient>,
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> ToolResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ToolError::invalid(format!("Invalid date '{}'; use YYYY-MM-DD", s)))
}

/// Monday and Sunday of the week containing `date`
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

fn require_meal_category(conn: &Connection, id: i64) -> ToolResult<Category> {
    Category::get_by_id_and_type(conn, id, CategoryType::Meal)?
        .ok_or_else(|| ToolError::invalid("Invalid meal category"))
}

fn require_recipe(conn: &Connection, id: i64) -> ToolResult<Recipe> {
    Recipe::get_by_id(conn, id)?.ok_or_else(|| ToolError::invalid("Invalid recipe"))
}

fn check_people_count(people_count: i64) -> ToolResult<()> {
    if people_count <= 0 {
        return Err(PortionError::InvalidPeopleCount { people_count }.into());
    }
    Ok(())
}

fn check_slot_free(conn: &Connection, date: &str, meal_category_id: i64, except: Option<i64>) -> ToolResult<()> {
    match MealPlan::find_by_slot(conn, date, meal_category_id)? {
        Some(existing) if Some(existing.id) != except => Err(ToolError::Conflict(
            "Meal plan already exists for this date and meal category".into(),
        )),
        _ => Ok(()),
    }
}

// ============================================================================
// Meal Plan Tools
// ============================================================================

/// List meal plans in an optional inclusive date range
pub fn list_meal_plans(db: &Database, start_date: Option<&str>, end_date: Option<&str>) -> ToolResult<ListMealPlansResponse> {
    let start = start_date.map(parse_date).transpose()?.map(|d| d.to_string());
    let end = end_date.map(parse_date).transpose()?.map(|d| d.to_string());

    let conn = db.get_conn()?;
    let meal_plans = MealPlan::list(&conn, start.as_deref(), end.as_deref())?;

    Ok(ListMealPlansResponse {
        count: meal_plans.len(),
        meal_plans,
    })
}

/// Meal plans for the Monday-to-Sunday week containing `date`
pub fn get_week_meal_plans(db: &Database, date: &str) -> ToolResult<WeekMealPlansResponse> {
    let (start, end) = week_bounds(parse_date(date)?);
    let start_date = start.to_string();
    let end_date = end.to_string();

    let conn = db.get_conn()?;
    let mut meal_plans: BTreeMap<String, BTreeMap<String, MealPlan>> = BTreeMap::new();

    for plan in MealPlan::list(&conn, Some(&start_date), Some(&end_date))? {
        let category = plan
            .meal_category_name
            .clone()
            .unwrap_or_else(|| plan.meal_category_id.to_string());
        meal_plans.entry(plan.date.clone()).or_default().insert(category, plan);
    }

    Ok(WeekMealPlansResponse {
        start_date,
        end_date,
        meal_plans,
    })
}

/// Schedule a recipe into a free slot
pub fn create_meal_plan(
    db: &Database,
    date: &str,
    meal_category_id: i64,
    recipe_id: i64,
    people_count: Option<i64>,
    name: Option<&str>,
) -> ToolResult<MealPlan> {
    let date = parse_date(date)?.to_string();
    let people_count = people_count.unwrap_or(DEFAULT_PEOPLE_COUNT);
    check_people_count(people_count)?;

    let conn = db.get_conn()?;
    let category = require_meal_category(&conn, meal_category_id)?;
    let recipe = require_recipe(&conn, recipe_id)?;
    check_slot_free(&conn, &date, meal_category_id, None)?;

    let name = match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => format!("{} - {}", recipe.name, category.name),
    };

    let plan = MealPlan::create(&conn, &MealPlanCreate {
        name,
        date,
        meal_category_id,
        recipe_id,
        people_count,
    })?;

    tracing::info!(id = plan.id, date = %plan.date, recipe_id, "created meal plan");
    Ok(plan)
}

/// Update a meal plan; moving it must land on a free slot
pub fn update_meal_plan(db: &Database, id: i64, mut data: MealPlanUpdate) -> ToolResult<MealPlan> {
    if let Some(ref date) = data.date {
        data.date = Some(parse_date(date)?.to_string());
    }
    if let Some(people_count) = data.people_count {
        check_people_count(people_count)?;
    }
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err(ToolError::invalid("Meal plan name cannot be empty"));
        }
    }

    let conn = db.get_conn()?;
    let existing = MealPlan::get_by_id(&conn, id)?.ok_or(ToolError::NotFound { entity: "Meal plan", id })?;

    if let Some(meal_category_id) = data.meal_category_id {
        require_meal_category(&conn, meal_category_id)?;
    }
    if let Some(recipe_id) = data.recipe_id {
        require_recipe(&conn, recipe_id)?;
    }

    let date = data.date.as_deref().unwrap_or(&existing.date);
    let meal_category_id = data.meal_category_id.unwrap_or(existing.meal_category_id);
    check_slot_free(&conn, date, meal_category_id, Some(id))?;

    let updated = MealPlan::update(&conn, id, &data)?.ok_or(ToolError::NotFound { entity: "Meal plan", id })?;
    tracing::info!(id, "updated meal plan");
    Ok(updated)
}

/// Delete a meal plan
pub fn delete_meal_plan(db: &Database, id: i64) -> ToolResult<DeleteMealPlanResponse> {
    let conn = db.get_conn()?;

    if !MealPlan::delete(&conn, id)? {
        return Err(ToolError::NotFound { entity: "Meal plan", id });
    }

    tracing::info!(id, "deleted meal plan");
    Ok(DeleteMealPlanResponse {
        success: true,
        deleted_id: id,
        message: "Meal plan deleted successfully".to_string(),
    })
}

/// Save a new head count on a meal plan and return its scaled ingredients
pub fn adjust_meal_plan_portions(db: &Database, id: i64, people_count: i64) -> ToolResult<AdjustMealPlanResponse> {
    check_people_count(people_count)?;

    let conn = db.get_conn()?;
    let plan = MealPlan::get_by_id(&conn, id)?.ok_or(ToolError::NotFound { entity: "Meal plan", id })?;
    let recipe = Recipe::get_by_id(&conn, plan.recipe_id)?.ok_or(ToolError::NotFound {
        entity: "Recipe",
        id: plan.recipe_id,
    })?;
    let ingredients = Ingredient::get_for_recipe(&conn, recipe.id)?;

    let scaled = portions::scale(
        RecipePortions {
            name: &recipe.name,
            servings: recipe.servings,
            ingredients: &ingredients,
        },
        people_count,
    )?;

    MealPlan::update(&conn, id, &MealPlanUpdate {
        people_count: Some(people_count),
        ..Default::default()
    })?;

    tracing::info!(id, people_count, factor = scaled.scaling_factor, "adjusted meal plan portions");
    Ok(AdjustMealPlanResponse {
        meal_plan_id: id,
        recipe_id: recipe.id,
        recipe_name: recipe.name,
        original_servings: recipe.servings,
        people_count,
        scaling_factor: scaled.scaling_factor,
        adjusted_ingredients: scaled.ingredients,
    })
}
