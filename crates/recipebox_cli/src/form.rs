//! Client-side recipe form with mirror validation.
//!
//! These checks run before anything is sent and are stricter than the
//! server's rules (shorter cook time cap, rating of at least 1, minimum
//! title and description lengths).

use recipebox_core::validation::is_valid_url;
use recipebox_core::{Difficulty, FieldError, NewRecipe};
use serde::Deserialize;

const MIN_TITLE_CHARS: usize = 3;
const MAX_COOK_TIME: i64 = 600;
const MAX_SERVINGS: i64 = 50;
const MIN_DESCRIPTION_CHARS: usize = 10;

/// Form state for a new recipe. Missing fields in a `--file` document take
/// the same defaults as an untouched form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecipeForm {
    pub title: String,
    pub cuisine: String,
    pub difficulty: String,
    pub cook_time: i64,
    pub servings: i64,
    pub image: String,
    pub rating: f64,
    pub ingredients: Vec<String>,
    pub description: String,
}

impl Default for RecipeForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            cuisine: String::new(),
            difficulty: Difficulty::Easy.as_str().to_string(),
            cook_time: 0,
            servings: 1,
            image: String::new(),
            rating: 5.0,
            ingredients: vec![String::new()],
            description: String::new(),
        }
    }
}

impl RecipeForm {
    /// Non-blank ingredient lines, in order.
    pub fn filled_ingredients(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .filter(|line| !line.trim().is_empty())
            .cloned()
            .collect()
    }

    /// Check every field and return at most one error per field.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        } else if self.title.chars().count() < MIN_TITLE_CHARS {
            errors.push(FieldError::new(
                "title",
                "Title must be at least 3 characters",
            ));
        }

        if self.cuisine.trim().is_empty() {
            errors.push(FieldError::new("cuisine", "Cuisine is required"));
        }

        if Difficulty::parse(&self.difficulty).is_none() {
            errors.push(FieldError::new(
                "difficulty",
                "Difficulty must be one of: Easy, Medium, Hard",
            ));
        }

        if self.cook_time <= 0 {
            errors.push(FieldError::new(
                "cookTime",
                "Cook time must be greater than 0",
            ));
        } else if self.cook_time > MAX_COOK_TIME {
            errors.push(FieldError::new(
                "cookTime",
                "Cook time must be less than 600 minutes",
            ));
        }

        if self.servings <= 0 {
            errors.push(FieldError::new("servings", "Servings must be greater than 0"));
        } else if self.servings > MAX_SERVINGS {
            errors.push(FieldError::new("servings", "Servings must be less than 50"));
        }

        if self.image.trim().is_empty() {
            errors.push(FieldError::new("image", "Image URL is required"));
        } else if !is_valid_url(&self.image) {
            errors.push(FieldError::new("image", "Please enter a valid URL"));
        }

        if !(1.0..=5.0).contains(&self.rating) {
            errors.push(FieldError::new("rating", "Rating must be between 1 and 5"));
        }

        if self.filled_ingredients().is_empty() {
            errors.push(FieldError::new(
                "ingredients",
                "At least one ingredient is required",
            ));
        }

        if self.description.trim().is_empty() {
            errors.push(FieldError::new("description", "Description is required"));
        } else if self.description.chars().count() < MIN_DESCRIPTION_CHARS {
            errors.push(FieldError::new(
                "description",
                "Description must be at least 10 characters",
            ));
        }

        errors
    }

    /// Validate and build the create payload, dropping blank ingredients.
    ///
    /// # Errors
    /// Returns every failing field; nothing should be sent in that case.
    pub fn submit(self) -> Result<NewRecipe, Vec<FieldError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        let ingredients = self.filled_ingredients();
        let difficulty = Difficulty::parse(&self.difficulty)
            .ok_or_else(|| vec![FieldError::new("difficulty", "Difficulty is required")])?;
        let cook_time = u32::try_from(self.cook_time)
            .map_err(|_| vec![FieldError::new("cookTime", "Cook time is out of range")])?;
        let servings = u32::try_from(self.servings)
            .map_err(|_| vec![FieldError::new("servings", "Servings is out of range")])?;
        Ok(NewRecipe {
            title: self.title,
            cuisine: self.cuisine,
            difficulty,
            cook_time,
            servings,
            image: self.image,
            rating: self.rating,
            ingredients,
            description: self.description,
        })
    }
}
