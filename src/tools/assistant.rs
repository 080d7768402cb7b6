//! Cooking assistant tools
//!
//! Canned, rule-based help: recipe ideas for ingredients on hand, ingredient
//! substitutions, cooking tips, a blank recipe template, and keyword chat.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::db::Database;
use crate::models::Recipe;

use super::error::{ToolError, ToolResult};

const MATCHES_PER_INGREDIENT: i64 = 3;
const CANNED_PER_INGREDIENT: usize = 2;
const GENERAL_FALLBACKS: usize = 3;
const MAX_SUGGESTIONS: usize = 8;
const DEFAULT_TIP_COUNT: usize = 3;
const MAX_TIP_COUNT: usize = 5;

static RECIPE_SUGGESTIONS: &[(&str, &[&str])] = &[
    ("chicken", &[
        "Grilled Chicken with Herbs",
        "Chicken Stir Fry",
        "Creamy Chicken Pasta",
        "Chicken Curry",
        "Lemon Garlic Chicken",
    ]),
    ("beef", &["Beef Stir Fry", "Beef Tacos", "Beef Stew", "Grilled Steak", "Beef and Broccoli"]),
    ("rice", &["Fried Rice", "Rice Pilaf", "Risotto", "Rice Bowl", "Spanish Rice"]),
    ("pasta", &["Spaghetti Carbonara", "Penne Arrabbiata", "Fettuccine Alfredo", "Lasagna", "Pasta Salad"]),
    ("vegetables", &[
        "Roasted Vegetables",
        "Vegetable Stir Fry",
        "Vegetable Soup",
        "Grilled Vegetables",
        "Vegetable Curry",
    ]),
];

static GENERAL_SUGGESTIONS: &[&str] = &[
    "Mixed Vegetable Stir Fry",
    "One-Pot Pasta",
    "Simple Soup",
    "Quick Salad",
    "Scrambled Eggs",
];

static COOKING_TIPS: &[&str] = &[
    "Always preheat your oven before baking for even cooking.",
    "Let meat rest for 5-10 minutes after cooking to retain juices.",
    "Taste your food as you cook and adjust seasoning accordingly.",
    "Use a meat thermometer to ensure proper cooking temperatures.",
    "Mise en place - prepare all ingredients before you start cooking.",
    "Don't overcrowd the pan when searing meat or vegetables.",
    "Season pasta water generously with salt for better flavor.",
    "Let your pan get hot before adding oil to prevent sticking.",
    "Fresh herbs should be added at the end of cooking to preserve flavor.",
    "When in doubt, cook low and slow for tender, flavorful results.",
];

// Checked in order; the first partial match wins
static SUBSTITUTIONS: &[(&str, &[&str])] = &[
    ("butter", &["margarine", "coconut oil", "vegetable oil"]),
    ("milk", &["almond milk", "soy milk", "coconut milk"]),
    ("eggs", &["flax eggs", "applesauce", "banana"]),
    ("flour", &["almond flour", "coconut flour", "oat flour"]),
    ("sugar", &["honey", "maple syrup", "stevia"]),
    ("onion", &["shallots", "leeks", "onion powder"]),
    ("garlic", &["garlic powder", "shallots", "ginger"]),
    ("lemon juice", &["lime juice", "vinegar", "white wine"]),
    ("heavy cream", &["coconut cream", "cashew cream", "milk + butter"]),
    ("breadcrumbs", &["crushed crackers", "oats", "panko"]),
];

const NO_SUBSTITUTIONS: &str = "No specific substitutions found. Try searching online for alternatives.";

static CHAT_SUGGESTIONS: &[&str] = &[
    "Get recipe suggestions",
    "Find ingredient substitutions",
    "Get cooking tips",
    "Generate shopping list",
    "Plan meals for the week",
];

/// One recipe idea
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Suggestion {
    ExistingRecipe {
        id: i64,
        name: String,
        description: Option<String>,
        prep_time: Option<i64>,
        cook_time: Option<i64>,
        servings: i64,
    },
    Suggestion {
        name: String,
        description: String,
        main_ingredient: String,
    },
    General {
        name: String,
        description: String,
    },
}

#[derive(Debug, Serialize)]
pub struct RecipeSuggestionsResponse {
    pub ingredients: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SubstitutionsResponse {
    pub ingredient: String,
    pub substitutions: Vec<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CookingTipsResponse {
    pub tips: Vec<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateIngredient {
    pub name: &'static str,
    pub quantity: f64,
    pub unit: &'static str,
    pub notes: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RecipeTemplate {
    pub name: String,
    pub description: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub servings: i64,
    pub difficulty: String,
    pub instructions: Vec<&'static str>,
    pub ingredients: Vec<TemplateIngredient>,
    pub tips: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct GenerateRecipeResponse {
    pub recipe: RecipeTemplate,
    pub message: String,
    pub note: String,
}

/// Options for generate_recipe; unset fields take the defaults
#[derive(Debug, Clone, Default)]
pub struct RecipeTemplateOptions {
    pub cuisine: Option<String>,
    pub difficulty: Option<String>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub servings: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: &'static str,
    pub suggestions: Vec<&'static str>,
}

// ============================================================================
// Assistant Tools
// ============================================================================

/// Recipe ideas for a set of ingredients: stored recipes first, then canned ideas
pub fn recipe_suggestions(db: &Database, ingredients: &[String]) -> ToolResult<RecipeSuggestionsResponse> {
    let ingredients: Vec<String> = ingredients
        .iter()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .collect();
    if ingredients.is_empty() {
        return Err(ToolError::invalid("Ingredients list is required"));
    }

    let conn = db.get_conn()?;
    let mut suggestions = Vec::new();
    let mut seen = Vec::new();

    for ingredient in &ingredients {
        for recipe in Recipe::find_by_ingredient(&conn, ingredient, MATCHES_PER_INGREDIENT)? {
            if seen.contains(&recipe.id) {
                continue;
            }
            seen.push(recipe.id);
            suggestions.push(Suggestion::ExistingRecipe {
                id: recipe.id,
                name: recipe.name,
                description: recipe.description,
                prep_time: recipe.prep_time,
                cook_time: recipe.cook_time,
                servings: recipe.servings,
            });
        }
    }

    for ingredient in &ingredients {
        let canned = RECIPE_SUGGESTIONS
            .iter()
            .find(|(key, _)| *key == ingredient.as_str())
            .map(|(_, names)| *names)
            .unwrap_or_default();

        for name in canned.iter().take(CANNED_PER_INGREDIENT) {
            suggestions.push(Suggestion::Suggestion {
                name: name.to_string(),
                description: format!("A delicious recipe featuring {}", ingredient),
                main_ingredient: ingredient.clone(),
            });
        }
    }

    if suggestions.is_empty() {
        suggestions.extend(GENERAL_SUGGESTIONS.iter().take(GENERAL_FALLBACKS).map(|name| Suggestion::General {
            name: name.to_string(),
            description: "A versatile recipe that can work with many ingredients".to_string(),
        }));
    }

    let message = format!("Found {} recipe suggestions based on your ingredients!", suggestions.len());
    suggestions.truncate(MAX_SUGGESTIONS);

    Ok(RecipeSuggestionsResponse {
        ingredients,
        suggestions,
        message,
    })
}

fn lookup_substitutions(ingredient: &str) -> Option<&'static [&'static str]> {
    SUBSTITUTIONS
        .iter()
        .find(|(key, _)| *key == ingredient)
        .or_else(|| {
            SUBSTITUTIONS
                .iter()
                .find(|(key, _)| ingredient.contains(key) || key.contains(ingredient))
        })
        .map(|(_, subs)| *subs)
}

/// Alternatives for an ingredient
pub fn ingredient_substitutions(ingredient: &str) -> ToolResult<SubstitutionsResponse> {
    let normalized = ingredient.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(ToolError::invalid("Ingredient is required"));
    }

    let substitutions = lookup_substitutions(&normalized)
        .map(|subs| subs.iter().map(|s| s.to_string()).collect())
        .unwrap_or_else(|| vec![NO_SUBSTITUTIONS.to_string()]);

    Ok(SubstitutionsResponse {
        ingredient: ingredient.to_string(),
        substitutions,
        message: format!("Here are some substitutions for {}:", ingredient),
    })
}

fn sample_tips<R: Rng + ?Sized>(rng: &mut R, count: Option<i64>) -> Vec<String> {
    let count = count
        .map(|c| c.clamp(1, MAX_TIP_COUNT as i64) as usize)
        .unwrap_or(DEFAULT_TIP_COUNT);

    COOKING_TIPS
        .choose_multiple(rng, count)
        .map(|tip| tip.to_string())
        .collect()
}

/// A random handful of distinct cooking tips
pub fn cooking_tips(count: Option<i64>) -> CookingTipsResponse {
    let tips = sample_tips(&mut rand::thread_rng(), count);
    CookingTipsResponse {
        message: format!("Here are {} cooking tips for you!", tips.len()),
        tips,
    }
}

/// A starter recipe to fill in
pub fn generate_recipe(name: &str, options: RecipeTemplateOptions) -> ToolResult<GenerateRecipeResponse> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ToolError::invalid("Recipe name is required"));
    }

    let cuisine = options.cuisine.unwrap_or_else(|| "international".to_string());

    let recipe = RecipeTemplate {
        name: name.to_string(),
        description: format!("A delicious {} recipe that's perfect for any occasion.", cuisine),
        prep_time: options.prep_time.unwrap_or(30),
        cook_time: options.cook_time.unwrap_or(30),
        servings: options.servings.unwrap_or(4),
        difficulty: options.difficulty.unwrap_or_else(|| "medium".to_string()),
        instructions: vec![
            "Prepare all ingredients according to the ingredient list.",
            "Heat oil in a large pan over medium heat.",
            "Add main ingredients and cook according to recipe requirements.",
            "Season with salt, pepper, and desired spices.",
            "Cook until ingredients are tender and flavors are well combined.",
            "Taste and adjust seasoning as needed.",
            "Serve hot and enjoy!",
        ],
        ingredients: vec![
            TemplateIngredient { name: "Main ingredient", quantity: 500.0, unit: "grams", notes: "Choose your preferred protein or main component" },
            TemplateIngredient { name: "Onion", quantity: 1.0, unit: "piece", notes: "Medium sized, diced" },
            TemplateIngredient { name: "Garlic", quantity: 2.0, unit: "cloves", notes: "Minced" },
            TemplateIngredient { name: "Olive oil", quantity: 2.0, unit: "tablespoons", notes: "For cooking" },
            TemplateIngredient { name: "Salt", quantity: 1.0, unit: "teaspoon", notes: "To taste" },
            TemplateIngredient { name: "Black pepper", quantity: 0.5, unit: "teaspoon", notes: "To taste" },
        ],
        tips: vec![
            "This is a template recipe. Customize the ingredients and instructions based on your preferences.",
            "Feel free to add vegetables, herbs, or spices to enhance the flavor.",
            "Cooking times may vary depending on your specific ingredients and cooking method.",
        ],
    };

    Ok(GenerateRecipeResponse {
        message: format!("Generated a basic recipe template for '{}'. Customize it to your liking!", name),
        note: "This is a generated template. Please review and modify the ingredients and instructions as needed.".to_string(),
        recipe,
    })
}

fn mentions(message: &str, words: &[&str]) -> bool {
    words.iter().any(|w| message.contains(w))
}

fn chat_reply(message: &str) -> &'static str {
    if mentions(message, &["recipe", "cook", "make"]) {
        if mentions(message, &["chicken", "beef", "pork", "fish"]) {
            "I'd be happy to help you with meat recipes! Try using the recipe suggestions feature with your available ingredients."
        } else if mentions(message, &["vegetarian", "vegan", "vegetables"]) {
            "Vegetarian cooking is wonderful! I can suggest some great plant-based recipes. What vegetables do you have available?"
        } else {
            "I love helping with recipes! What ingredients do you have, or what type of cuisine are you interested in?"
        }
    } else if mentions(message, &["substitute", "replace", "alternative"]) {
        "I can help you find ingredient substitutions! Use the substitution feature or tell me which ingredient you need to replace."
    } else if mentions(message, &["tip", "advice", "help"]) {
        "I have lots of cooking tips to share! Would you like general cooking advice or help with a specific technique?"
    } else if mentions(message, &["shopping", "grocery", "buy"]) {
        "I can help you create shopping lists from your meal plans! Plan your meals first, then generate a shopping list with all the ingredients you need."
    } else if mentions(message, &["meal", "plan", "week"]) {
        "Meal planning is a great way to stay organized! You can plan your meals for the week and I'll help you calculate portions and create shopping lists."
    } else {
        "Hello! I'm your recipe assistant. I can help you with recipe suggestions, ingredient substitutions, cooking tips, meal planning, and shopping lists. What would you like to know?"
    }
}

/// Keyword-routed reply plus follow-up suggestions
pub fn chat(message: &str) -> ToolResult<ChatResponse> {
    let message = message.trim().to_lowercase();
    if message.is_empty() {
        return Err(ToolError::invalid("Message is required"));
    }

    Ok(ChatResponse {
        response: chat_reply(&message),
        suggestions: CHAT_SUGGESTIONS.to_vec(),
    })
}
