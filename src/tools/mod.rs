//! Recipe Manager Tools module
//!
//! MCP tool implementations for recipes, meal planning and shopping lists.

pub mod assistant;
pub mod categories;
pub mod error;
pub mod export;
pub mod meal_plans;
pub mod recipes;
pub mod shopping_lists;
pub mod status;

pub use error::{ToolError, ToolResult};
