//! Recipe Manager Library
//!
//! Recipes, meal planning, portion scaling and shopping list aggregation.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod portions;
pub mod tools;
