//! Seed default categories and sample recipes
//! Usage: cargo run --bin seed-defaults
//!
//! Safe to run repeatedly; anything that already exists is left alone.

use recipe_manager::config::Config;
use recipe_manager::db::{migrations, Database, DbResult};
use recipe_manager::models::{
    Category, CategoryCreate, CategoryType, Ingredient, IngredientCreate, Recipe, RecipeCreate,
};
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

const RECIPE_CATEGORIES: &[&str] = &[
    "Breakfast",
    "Lunch",
    "Dinner",
    "Appetizers",
    "Desserts",
    "Snacks",
    "Beverages",
    "Soups",
    "Salads",
    "Main Courses",
    "Side Dishes",
    "Vegetarian",
    "Vegan",
    "Quick & Easy",
];

const MEAL_CATEGORIES: &[&str] = &["Breakfast", "Lunch", "Dinner", "Snack", "Brunch"];

struct SampleRecipe {
    name: &'static str,
    description: &'static str,
    instructions: &'static str,
    prep_time: i64,
    cook_time: i64,
    servings: i64,
    category: &'static str,
    ingredients: &'static [(&'static str, f64, &'static str)],
}

const SAMPLE_RECIPES: &[SampleRecipe] = &[
    SampleRecipe {
        name: "Classic Scrambled Eggs",
        description: "Fluffy and creamy scrambled eggs perfect for breakfast",
        instructions: "1. Crack eggs into a bowl and whisk with salt and pepper\n\
                       2. Heat butter in a non-stick pan over medium-low heat\n\
                       3. Pour in eggs and let sit for 20 seconds\n\
                       4. Gently stir with a spatula, pushing eggs from edges to center\n\
                       5. Continue stirring gently until eggs are just set but still creamy\n\
                       6. Remove from heat and serve immediately",
        prep_time: 5,
        cook_time: 5,
        servings: 2,
        category: "Breakfast",
        ingredients: &[
            ("Eggs", 4.0, "pieces"),
            ("Butter", 15.0, "grams"),
            ("Salt", 1.0, "pinch"),
            ("Black pepper", 1.0, "pinch"),
        ],
    },
    SampleRecipe {
        name: "Simple Garlic Pasta",
        description: "Quick and delicious pasta with garlic and olive oil",
        instructions: "1. Bring a large pot of salted water to boil\n\
                       2. Cook pasta according to package directions until al dente\n\
                       3. While pasta cooks, heat olive oil in a large pan\n\
                       4. Add minced garlic and cook for 1 minute until fragrant\n\
                       5. Drain pasta, reserving 1 cup pasta water\n\
                       6. Add pasta to the pan with garlic oil\n\
                       7. Toss with parmesan cheese and pasta water as needed\n\
                       8. Season with salt, pepper, and red pepper flakes\n\
                       9. Serve immediately with extra parmesan",
        prep_time: 10,
        cook_time: 15,
        servings: 4,
        category: "Dinner",
        ingredients: &[
            ("Pasta", 400.0, "grams"),
            ("Olive oil", 60.0, "ml"),
            ("Garlic", 4.0, "cloves"),
            ("Parmesan cheese", 100.0, "grams"),
            ("Salt", 1.0, "teaspoon"),
            ("Black pepper", 0.5, "teaspoon"),
            ("Red pepper flakes", 0.25, "teaspoon"),
        ],
    },
];

/// Returns how many categories were created
fn seed_categories(conn: &Connection, names: &[&str], category_type: CategoryType) -> DbResult<usize> {
    let mut created = 0;
    for name in names {
        if Category::find_by_name(conn, name, category_type)?.is_some() {
            continue;
        }
        Category::create(conn, &CategoryCreate {
            name: name.to_string(),
            category_type,
        })?;
        created += 1;
    }
    Ok(created)
}

/// Returns how many recipes were created
fn seed_recipes(conn: &Connection) -> DbResult<usize> {
    let mut created = 0;
    for sample in SAMPLE_RECIPES {
        if Recipe::find_by_name(conn, sample.name)?.is_some() {
            continue;
        }

        let category_id = Category::find_by_name(conn, sample.category, CategoryType::Recipe)?.map(|c| c.id);
        let recipe = Recipe::create(conn, &RecipeCreate {
            name: sample.name.to_string(),
            description: Some(sample.description.to_string()),
            instructions: Some(sample.instructions.to_string()),
            prep_time: Some(sample.prep_time),
            cook_time: Some(sample.cook_time),
            servings: sample.servings,
            category_id,
        })?;

        for (name, quantity, unit) in sample.ingredients {
            Ingredient::create(conn, recipe.id, &IngredientCreate {
                name: name.to_string(),
                quantity: *quantity,
                unit: unit.to_string(),
                notes: None,
            })?;
        }
        created += 1;
    }
    Ok(created)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("recipe_manager=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&config.database_path)?;

    database.with_conn_mut(|conn| {
        migrations::run_migrations(conn)?;

        let tx = conn.transaction()?;
        let recipe_categories = seed_categories(&tx, RECIPE_CATEGORIES, CategoryType::Recipe)?;
        let meal_categories = seed_categories(&tx, MEAL_CATEGORIES, CategoryType::Meal)?;
        let recipes = seed_recipes(&tx)?;
        tx.commit()?;

        println!("Seeded defaults:");
        println!("  Recipe categories: {}", recipe_categories);
        println!("  Meal categories: {}", meal_categories);
        println!("  Sample recipes: {}", recipes);
        Ok(())
    })?;

    Ok(())
}
