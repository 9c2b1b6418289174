//! Recipe-related data models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How demanding a recipe is to cook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Every difficulty, in ascending order.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Label used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Parse an exact, case-sensitive label.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored recipe, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub cuisine: String,
    pub difficulty: Difficulty,
    pub cook_time: u32,
    pub servings: u32,
    pub image: String,
    pub rating: f64,
    pub ingredients: Vec<String>,
    pub description: String,
}

/// A recipe that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub title: String,
    pub cuisine: String,
    pub difficulty: Difficulty,
    pub cook_time: u32,
    pub servings: u32,
    pub image: String,
    pub rating: f64,
    pub ingredients: Vec<String>,
    pub description: String,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewRecipe {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: i64) -> Recipe {
        Recipe {
            id,
            title: self.title,
            cuisine: self.cuisine,
            difficulty: self.difficulty,
            cook_time: self.cook_time,
            servings: self.servings,
            image: self.image,
            rating: self.rating,
            ingredients: self.ingredients,
            description: self.description,
        }
    }
}

impl From<Recipe> for NewRecipe {
    fn from(value: Recipe) -> Self {
        Self {
            title: value.title,
            cuisine: value.cuisine,
            difficulty: value.difficulty,
            cook_time: value.cook_time,
            servings: value.servings,
            image: value.image,
            rating: value.rating,
            ingredients: value.ingredients,
            description: value.description,
        }
    }
}

impl RecipePatch {
    /// `true` when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the supplied fields over `recipe`. The id is never touched.
    pub fn apply_to(self, recipe: &mut Recipe) {
        if let Some(title) = self.title {
            recipe.title = title;
        }
        if let Some(cuisine) = self.cuisine {
            recipe.cuisine = cuisine;
        }
        if let Some(difficulty) = self.difficulty {
            recipe.difficulty = difficulty;
        }
        if let Some(cook_time) = self.cook_time {
            recipe.cook_time = cook_time;
        }
        if let Some(servings) = self.servings {
            recipe.servings = servings;
        }
        if let Some(image) = self.image {
            recipe.image = image;
        }
        if let Some(rating) = self.rating {
            recipe.rating = rating;
        }
        if let Some(ingredients) = self.ingredients {
            recipe.ingredients = ingredients;
        }
        if let Some(description) = self.description {
            recipe.description = description;
        }
    }
}

/// Case-insensitive substring filter over cuisine and difficulty.
///
/// Both conditions must hold when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    cuisine: Option<String>,
    difficulty: Option<String>,
}

fn normalize_needle(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

impl RecipeFilter {
    /// Build a filter; empty or whitespace-only values are treated as absent.
    pub fn new(cuisine: Option<String>, difficulty: Option<String>) -> Self {
        Self {
            cuisine: normalize_needle(cuisine),
            difficulty: normalize_needle(difficulty),
        }
    }

    /// Filter on cuisine only.
    pub fn cuisine(value: impl Into<String>) -> Self {
        Self::new(Some(value.into()), None)
    }

    /// Filter on difficulty only.
    pub fn difficulty(value: impl Into<String>) -> Self {
        Self::new(None, Some(value.into()))
    }

    pub fn cuisine_needle(&self) -> Option<&str> {
        self.cuisine.as_deref()
    }

    pub fn difficulty_needle(&self) -> Option<&str> {
        self.difficulty.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.cuisine.is_none() && self.difficulty.is_none()
    }

    /// Whether `recipe` satisfies every set condition.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        contains_ignore_case(&recipe.cuisine, self.cuisine.as_deref())
            && contains_ignore_case(recipe.difficulty.as_str(), self.difficulty.as_deref())
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// 1-based page window over a result sequence.
///
/// `page` defaults to 1; a missing `limit` means no limit, so every page
/// after the first is empty. Both stores share this rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl Pagination {
    pub fn new(page: Option<usize>, limit: Option<usize>) -> Self {
        Self { page, limit }
    }

    /// Resolve the window into `(offset, limit)`; `None` limit is unbounded.
    pub fn bounds(&self) -> (usize, Option<usize>) {
        let page = self.page.unwrap_or(1).max(1);
        match self.limit {
            Some(limit) => ((page - 1).saturating_mul(limit), Some(limit)),
            None if page == 1 => (0, None),
            None => (0, Some(0)),
        }
    }

    /// Slice an in-memory sequence to this window.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let (offset, limit) = self.bounds();
        items
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }
}
