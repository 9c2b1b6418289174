//! Field-level validation of inbound recipe payloads.
//!
//! Rules run over the raw JSON object so that type mismatches (a string
//! `cookTime`, a `null` title) are reported per field instead of failing
//! deserialization wholesale. A payload is accepted only when every checked
//! field passes.

use crate::constants::{
    COOK_TIME_MAX_MINUTES, CUISINE_MAX_CHARS, DESCRIPTION_MAX_CHARS, RATING_MAX, SERVINGS_MAX,
    TITLE_MAX_CHARS,
};
use crate::error::AppError;
use crate::models::recipe::{Difficulty, NewRecipe, RecipePatch};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One rejected field and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Whether absent fields are errors (create) or skipped (update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

type Rule = fn(&Value) -> Result<(), &'static str>;

const RULES: [(&str, Rule); 9] = [
    ("title", check_title),
    ("cuisine", check_cuisine),
    ("difficulty", check_difficulty),
    ("cookTime", check_cook_time),
    ("servings", check_servings),
    ("image", check_image),
    ("rating", check_rating),
    ("ingredients", check_ingredients),
    ("description", check_description),
];

const TITLE_MESSAGE: &str = "Title must be a non-empty string with max 100 characters";
const CUISINE_MESSAGE: &str = "Cuisine must be a non-empty string with max 50 characters";
const DIFFICULTY_MESSAGE: &str = "Difficulty must be one of: Easy, Medium, Hard";
const COOK_TIME_MESSAGE: &str = "Cook time must be a positive integer (max 1440 minutes)";
const SERVINGS_MESSAGE: &str = "Servings must be a positive integer (max 50)";
const IMAGE_MESSAGE: &str = "Image must be a valid URL";
const RATING_MESSAGE: &str = "Rating must be a number between 0 and 5";
const INGREDIENTS_MESSAGE: &str = "Ingredients must be a non-empty array";
const INGREDIENT_ITEMS_MESSAGE: &str = "All ingredients must be non-empty strings";
const DESCRIPTION_MESSAGE: &str =
    "Description must be a non-empty string with max 1000 characters";
const BODY_MESSAGE: &str = "Request body must be a JSON object";

fn trimmed_len_within(value: &Value, max_chars: usize) -> bool {
    value
        .as_str()
        .map(|raw| raw.trim().chars().count())
        .is_some_and(|len| (1..=max_chars).contains(&len))
}

/// Whole number value; `60.0` counts the same as `60`.
fn whole_number(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(n))
            .map(|n| n as u64)
    })
}

fn integer_within(value: &Value, max: u64) -> bool {
    whole_number(value).is_some_and(|n| (1..=max).contains(&n))
}

fn check_title(value: &Value) -> Result<(), &'static str> {
    trimmed_len_within(value, TITLE_MAX_CHARS)
        .then_some(())
        .ok_or(TITLE_MESSAGE)
}

fn check_cuisine(value: &Value) -> Result<(), &'static str> {
    trimmed_len_within(value, CUISINE_MAX_CHARS)
        .then_some(())
        .ok_or(CUISINE_MESSAGE)
}

fn check_description(value: &Value) -> Result<(), &'static str> {
    trimmed_len_within(value, DESCRIPTION_MAX_CHARS)
        .then_some(())
        .ok_or(DESCRIPTION_MESSAGE)
}

fn check_difficulty(value: &Value) -> Result<(), &'static str> {
    value
        .as_str()
        .and_then(Difficulty::parse)
        .map(|_| ())
        .ok_or(DIFFICULTY_MESSAGE)
}

fn check_cook_time(value: &Value) -> Result<(), &'static str> {
    integer_within(value, COOK_TIME_MAX_MINUTES)
        .then_some(())
        .ok_or(COOK_TIME_MESSAGE)
}

fn check_servings(value: &Value) -> Result<(), &'static str> {
    integer_within(value, SERVINGS_MAX)
        .then_some(())
        .ok_or(SERVINGS_MESSAGE)
}

fn check_image(value: &Value) -> Result<(), &'static str> {
    value
        .as_str()
        .is_some_and(is_valid_url)
        .then_some(())
        .ok_or(IMAGE_MESSAGE)
}

fn check_rating(value: &Value) -> Result<(), &'static str> {
    value
        .as_f64()
        .is_some_and(|rating| (0.0..=RATING_MAX).contains(&rating))
        .then_some(())
        .ok_or(RATING_MESSAGE)
}

fn check_ingredients(value: &Value) -> Result<(), &'static str> {
    let items = value
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or(INGREDIENTS_MESSAGE)?;
    items
        .iter()
        .all(|item| item.as_str().is_some_and(|s| !s.trim().is_empty()))
        .then_some(())
        .ok_or(INGREDIENT_ITEMS_MESSAGE)
}

const URL_SCHEMES: [&str; 3] = ["http", "https", "ftp"];

/// Whether `raw` is an http, https or ftp URL whose host is an IP address
/// or a dotted domain name. A missing scheme is read as `http://`.
pub fn is_valid_url(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    let parsed = match url::Url::parse(trimmed) {
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            url::Url::parse(&format!("http://{}", trimmed))
        }
        other => other,
    };
    let Ok(parsed) = parsed else {
        return false;
    };
    if !URL_SCHEMES.contains(&parsed.scheme()) {
        return false;
    }
    match parsed.host() {
        Some(url::Host::Domain(domain)) => domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            >= 2,
        Some(url::Host::Ipv4(_) | url::Host::Ipv6(_)) => true,
        None => false,
    }
}

/// Run every rule over `payload` and collect the failures.
///
/// # Returns
/// The payload as a JSON object when every checked field passes, otherwise
/// one [`FieldError`] per failing field in rule order.
pub fn validate_payload(
    payload: &Value,
    mode: ValidationMode,
) -> Result<&Map<String, Value>, Vec<FieldError>> {
    let Some(object) = payload.as_object() else {
        return Err(vec![FieldError::new("body", BODY_MESSAGE)]);
    };

    let errors: Vec<FieldError> = RULES
        .iter()
        .filter_map(|(field, rule)| match (object.get(*field), mode) {
            (Some(value), _) => rule(value).err().map(|message| FieldError::new(*field, message)),
            (None, ValidationMode::Create) => {
                // An absent value fails the same way a `null` does.
                rule(&Value::Null)
                    .err()
                    .map(|message| FieldError::new(*field, message))
            }
            (None, ValidationMode::Update) => None,
        })
        .collect();

    if errors.is_empty() {
        Ok(object)
    } else {
        Err(errors)
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(|raw| raw.trim().to_string())
}

fn u32_field(object: &Map<String, Value>, key: &str) -> Option<u32> {
    object
        .get(key)
        .and_then(whole_number)
        .and_then(|n| u32::try_from(n).ok())
}

fn ingredients_field(object: &Map<String, Value>) -> Option<Vec<String>> {
    object.get("ingredients").and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(|item| item.trim().to_string())
            .collect()
    })
}

fn patch_from_object(object: &Map<String, Value>) -> RecipePatch {
    RecipePatch {
        title: string_field(object, "title"),
        cuisine: string_field(object, "cuisine"),
        difficulty: object
            .get("difficulty")
            .and_then(Value::as_str)
            .and_then(Difficulty::parse),
        cook_time: u32_field(object, "cookTime"),
        servings: u32_field(object, "servings"),
        image: string_field(object, "image"),
        rating: object.get("rating").and_then(Value::as_f64),
        ingredients: ingredients_field(object),
        description: string_field(object, "description"),
    }
}

/// Validate a create payload and convert it into a [`NewRecipe`].
///
/// String fields are trimmed; any `id` key is ignored.
///
/// # Errors
/// Returns [`AppError::Validation`] with every failing field.
pub fn validate_create(payload: &Value) -> Result<NewRecipe, AppError> {
    let object = validate_payload(payload, ValidationMode::Create).map_err(AppError::Validation)?;
    let patch = patch_from_object(object);
    match (
        patch.title,
        patch.cuisine,
        patch.difficulty,
        patch.cook_time,
        patch.servings,
        patch.image,
        patch.rating,
        patch.ingredients,
        patch.description,
    ) {
        (
            Some(title),
            Some(cuisine),
            Some(difficulty),
            Some(cook_time),
            Some(servings),
            Some(image),
            Some(rating),
            Some(ingredients),
            Some(description),
        ) => Ok(NewRecipe {
            title,
            cuisine,
            difficulty,
            cook_time,
            servings,
            image,
            rating,
            ingredients,
            description,
        }),
        _ => Err(AppError::StorageMessage(
            "validated payload is missing a required field".to_string(),
        )),
    }
}

/// Validate an update payload and convert it into a [`RecipePatch`].
///
/// Only fields present in the payload are checked; any `id` key is ignored.
///
/// # Errors
/// Returns [`AppError::Validation`] with every failing field.
pub fn validate_update(payload: &Value) -> Result<RecipePatch, AppError> {
    let object = validate_payload(payload, ValidationMode::Update).map_err(AppError::Validation)?;
    Ok(patch_from_object(object))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::valid_payload;
    use serde_json::json;

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|error| error.field.as_str()).collect()
    }

    fn create_errors(payload: Value) -> Vec<FieldError> {
        match validate_create(&payload) {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn valid_payload_converts_to_new_recipe() {
        let recipe = validate_create(&valid_payload()).expect("valid payload");
        assert_eq!(recipe.title, "Classic Margherita Pizza");
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.cook_time, 60);
        assert_eq!(recipe.ingredients.len(), 3);
    }

    #[test]
    fn zero_cook_time_is_rejected_with_cook_time_error() {
        let mut payload = valid_payload();
        payload["cookTime"] = json!(0);
        let errors = create_errors(payload);
        assert_eq!(fields(&errors), vec!["cookTime"]);
        assert_eq!(errors[0].message, COOK_TIME_MESSAGE);
    }

    #[test]
    fn empty_body_reports_every_field() {
        let errors = create_errors(json!({}));
        assert_eq!(
            fields(&errors),
            vec![
                "title",
                "cuisine",
                "difficulty",
                "cookTime",
                "servings",
                "image",
                "rating",
                "ingredients",
                "description"
            ]
        );
    }

    #[test]
    fn boundary_values_are_enforced() {
        let cases = [
            ("title", json!("x".repeat(100)), true),
            ("title", json!("x".repeat(101)), false),
            ("title", json!("   "), false),
            ("cuisine", json!("c".repeat(51)), false),
            ("cookTime", json!(1440), true),
            ("cookTime", json!(1441), false),
            ("cookTime", json!(12.5), false),
            ("cookTime", json!(60.0), true),
            ("servings", json!(-2.0), false),
            ("cookTime", json!("60"), false),
            ("servings", json!(50), true),
            ("servings", json!(51), false),
            ("rating", json!(0), true),
            ("rating", json!(5.0), true),
            ("rating", json!(5.01), false),
            ("rating", json!(-0.5), false),
            ("difficulty", json!("easy"), false),
            ("description", json!("d".repeat(1000)), true),
            ("description", json!("d".repeat(1001)), false),
            ("image", json!("not a url"), false),
            ("image", json!("ftp://files.example.com/a.jpg"), true),
            ("image", json!("example.com/a.jpg"), true),
            ("image", json!("http://example.com/a.jpg"), true),
            ("image", json!("http://203.0.113.9/a.jpg"), true),
            ("image", json!("mailto:chef@example.com"), false),
            ("image", json!("file:///tmp/a.jpg"), false),
            ("image", json!("http://localhost/a.jpg"), false),
        ];
        for (field, value, accepted) in cases {
            let mut payload = valid_payload();
            payload[field] = value.clone();
            let result = validate_payload(&payload, ValidationMode::Create);
            assert_eq!(result.is_ok(), accepted, "{} = {}", field, value);
        }
    }

    #[test]
    fn ingredients_report_shape_and_item_errors_separately() {
        let mut payload = valid_payload();
        payload["ingredients"] = json!([]);
        assert_eq!(create_errors(payload)[0].message, INGREDIENTS_MESSAGE);

        let mut payload = valid_payload();
        payload["ingredients"] = json!(["salt", "  "]);
        assert_eq!(create_errors(payload)[0].message, INGREDIENT_ITEMS_MESSAGE);

        let mut payload = valid_payload();
        payload["ingredients"] = json!(["salt", 3]);
        assert_eq!(create_errors(payload)[0].message, INGREDIENT_ITEMS_MESSAGE);
    }

    #[test]
    fn whole_floats_are_stored_as_integers() {
        let mut payload = valid_payload();
        payload["cookTime"] = json!(60.0);
        payload["servings"] = json!(4.0);
        let recipe = validate_create(&payload).expect("whole floats are integers");
        assert_eq!((recipe.cook_time, recipe.servings), (60, 4));

        let patch = validate_update(&json!({ "servings": 6.0 })).expect("partial update");
        assert_eq!(patch.servings, Some(6));
    }

    #[test]
    fn update_checks_only_present_fields() {
        let patch = validate_update(&json!({ "servings": 6 })).expect("partial update");
        assert_eq!(patch.servings, Some(6));
        assert!(patch.title.is_none());

        let err = validate_update(&json!({ "servings": 0, "title": null }))
            .expect_err("invalid update");
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields(&errors), vec!["title", "servings"]);
    }

    #[test]
    fn update_ignores_id_and_unknown_keys() {
        let patch = validate_update(&json!({ "id": 99, "chef": "Remy" })).expect("no fields");
        assert!(patch.is_empty());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errors = validate_payload(&json!([1, 2]), ValidationMode::Update)
            .expect_err("array body");
        assert_eq!(fields(&errors), vec!["body"]);
    }

    #[test]
    fn strings_are_trimmed_on_conversion() {
        let mut payload = valid_payload();
        payload["title"] = json!("  Soup  ");
        payload["ingredients"] = json!([" leek "]);
        let recipe = validate_create(&payload).expect("valid");
        assert_eq!(recipe.title, "Soup");
        assert_eq!(recipe.ingredients, vec!["leek".to_string()]);
    }
}
