//! Shared test-only helpers for recipebox_core.

use crate::models::recipe::{Difficulty, NewRecipe};
use serde_json::{json, Value};

/// A complete, valid recipe with the given title and cuisine.
pub(crate) fn new_recipe(title: &str, cuisine: &str, difficulty: Difficulty) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        cuisine: cuisine.to_string(),
        difficulty,
        cook_time: 45,
        servings: 4,
        image: "https://images.example.com/dish.jpg".to_string(),
        rating: 4.5,
        ingredients: vec!["flour".to_string(), "water".to_string()],
        description: format!("A reliable {} dish.", cuisine),
    }
}

/// The three-recipe collection most store tests start from.
pub(crate) fn sample_recipes() -> Vec<NewRecipe> {
    vec![
        new_recipe("Margherita Pizza", "Italian", Difficulty::Medium),
        new_recipe("Chicken Tikka Masala", "Indian", Difficulty::Hard),
        new_recipe("Spaghetti Carbonara", "Italian", Difficulty::Easy),
    ]
}

/// A JSON create payload that passes every validation rule.
pub(crate) fn valid_payload() -> Value {
    json!({
        "title": "Classic Margherita Pizza",
        "cuisine": "Italian",
        "difficulty": "Medium",
        "cookTime": 60,
        "servings": 4,
        "image": "https://images.example.com/pizza.jpg",
        "rating": 4.6,
        "ingredients": ["Pizza dough", "Tomato sauce", "Fresh mozzarella"],
        "description": "Classic Italian pizza with fresh mozzarella and basil."
    })
}
