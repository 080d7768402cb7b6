//! Data models
//!
//! Rust structs representing database entities.

mod category;
mod ingredient;
mod meal_plan;
mod recipe;
mod shopping_list;

pub use category::{Category, CategoryCreate, CategoryType, CategoryUpdate};
pub use ingredient::{Ingredient, IngredientCreate};
pub use meal_plan::{MealPlan, MealPlanCreate, MealPlanUpdate};
pub use recipe::{default_servings, Recipe, RecipeCreate, RecipeUpdate};
pub use shopping_list::{
    ShoppingList, ShoppingListCreate, ShoppingListItem, ShoppingListItemCreate,
};
