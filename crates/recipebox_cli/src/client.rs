//! HTTP client for the recipe API.

use recipebox_core::{FieldError, NewRecipe, Recipe};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to the recipe API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidServer { url: String, reason: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message} ({status})")]
    Api {
        status: StatusCode,
        message: String,
        details: Vec<FieldError>,
    },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            Self::InvalidServer { .. } => None,
        }
    }
}

/// Optional list filters; unset values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    pub cuisine: Option<String>,
    pub difficulty: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl RecipeQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let text = [("cuisine", &self.cuisine), ("difficulty", &self.difficulty)];
        for (key, value) in text {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_string()));
            }
        }
        if let Some(page) = self.page {
            pairs.push(("_page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("_limit", limit.to_string()));
        }
        pairs
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    #[serde(default)]
    details: Vec<FieldError>,
}

/// Extract a readable message (and validation details) from an error body.
pub(crate) fn error_from_response(status: StatusCode, body: &str) -> ClientError {
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    };
    if body.trim().is_empty() {
        return ClientError::Api {
            status,
            message: fallback(),
            details: Vec::new(),
        };
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ClientError::Api {
            status,
            message: parsed.error.unwrap_or_else(fallback),
            details: parsed.details,
        },
        Err(_) => ClientError::Api {
            status,
            message: body.trim().to_string(),
            details: Vec::new(),
        },
    }
}

/// Thin wrapper mirroring the server's recipe endpoints.
#[derive(Debug, Clone)]
pub struct RecipeClient {
    http: reqwest::Client,
    base: Url,
}

impl RecipeClient {
    /// Build a client for `server` (e.g. `http://127.0.0.1:3001`).
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidServer`] when `server` is not a usable
    /// base URL, or a transport error if the HTTP client cannot be built.
    pub fn new(server: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(server).map_err(|err| ClientError::InvalidServer {
            url: server.to_string(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidServer {
                url: server.to_string(),
                reason: "URL cannot be used as an API base".to_string(),
            });
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidServer {
                    url: self.base.to_string(),
                    reason: "URL cannot be used as an API base".to_string(),
                })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_response(status, &body))
    }

    pub async fn get_recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, ClientError> {
        let url = self.endpoint(&["recipes"])?;
        let response = self.http.get(url).query(&query.pairs()).send().await?;
        Ok(Self::ensure_success(response).await?.json().await?)
    }

    pub async fn get_recipe(&self, id: i64) -> Result<Recipe, ClientError> {
        let url = self.endpoint(&["recipes", &id.to_string()])?;
        let response = self.http.get(url).send().await?;
        Ok(Self::ensure_success(response).await?.json().await?)
    }

    pub async fn create_recipe(&self, recipe: &NewRecipe) -> Result<Recipe, ClientError> {
        let url = self.endpoint(&["recipes"])?;
        let response = self.http.post(url).json(recipe).send().await?;
        Ok(Self::ensure_success(response).await?.json().await?)
    }

    /// Send a partial update; the server validates whatever fields are present.
    pub async fn update_recipe(&self, id: i64, changes: &Value) -> Result<Recipe, ClientError> {
        let url = self.endpoint(&["recipes", &id.to_string()])?;
        let response = self.http.put(url).json(changes).send().await?;
        Ok(Self::ensure_success(response).await?.json().await?)
    }

    pub async fn delete_recipe(&self, id: i64) -> Result<(), ClientError> {
        let url = self.endpoint(&["recipes", &id.to_string()])?;
        let response = self.http.delete(url).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipebox_core::Difficulty;
    use recipebox_server::{serve_router, AppState, Config};
    use serde_json::json;
    use tempfile::TempDir;

    async fn spawn_server() -> (RecipeClient, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let config = Config {
            port: 0,
            json_db_path: temp.path().join("db.json").to_string_lossy().to_string(),
            ..Config::default()
        };
        let state = AppState::open(config).expect("state");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(serve_router(
            listener,
            state,
            false,
            std::future::pending::<()>(),
        ));
        let client = RecipeClient::new(&format!("http://{}", addr), Duration::from_secs(5))
            .expect("client");
        (client, temp)
    }

    fn new_recipe(title: &str, cuisine: &str) -> NewRecipe {
        NewRecipe {
            title: title.to_string(),
            cuisine: cuisine.to_string(),
            difficulty: Difficulty::Medium,
            cook_time: 30,
            servings: 2,
            image: "https://images.example.com/dish.jpg".to_string(),
            rating: 4.0,
            ingredients: vec!["Rice".to_string()],
            description: "Weeknight staple that never disappoints.".to_string(),
        }
    }

    #[test]
    fn endpoint_encodes_segments_and_keeps_base_path() {
        let client = RecipeClient::new("http://127.0.0.1:3001/api/", Duration::from_secs(1))
            .expect("client");
        let url = client.endpoint(&["recipes", "a/b"]).expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:3001/api/recipes/a%2Fb");
    }

    #[test]
    fn invalid_server_urls_are_rejected() {
        let err = RecipeClient::new("not a url", Duration::from_secs(1)).expect_err("invalid");
        assert!(matches!(err, ClientError::InvalidServer { .. }));
        let err = RecipeClient::new("mailto:chef@example.com", Duration::from_secs(1))
            .expect_err("cannot be a base");
        assert!(matches!(err, ClientError::InvalidServer { .. }));
    }

    #[test]
    fn query_pairs_skip_unset_values() {
        let query = RecipeQuery {
            cuisine: Some("ital".to_string()),
            difficulty: Some(String::new()),
            page: None,
            limit: Some(5),
        };
        assert_eq!(
            query.pairs(),
            vec![("cuisine", "ital".to_string()), ("_limit", "5".to_string())]
        );
    }

    #[tokio::test]
    async fn client_round_trips_through_a_live_server() {
        let (client, _temp) = spawn_server().await;

        let created = client
            .create_recipe(&new_recipe("Chicken Fried Rice", "Chinese"))
            .await
            .expect("create");
        assert_eq!(client.get_recipe(created.id).await.expect("get"), created);

        client
            .create_recipe(&new_recipe("Beef Tacos", "Mexican"))
            .await
            .expect("create second");
        let chinese = client
            .get_recipes(&RecipeQuery {
                cuisine: Some("chin".to_string()),
                ..RecipeQuery::default()
            })
            .await
            .expect("list");
        assert_eq!(chinese, vec![created.clone()]);

        let updated = client
            .update_recipe(created.id, &json!({ "servings": 6 }))
            .await
            .expect("update");
        assert_eq!(updated.servings, 6);
        assert_eq!(updated.title, created.title);

        client.delete_recipe(created.id).await.expect("delete");
        let err = client.get_recipe(created.id).await.expect_err("deleted");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "Recipe not found (404 Not Found)");
    }

    #[tokio::test]
    async fn server_validation_details_are_surfaced() {
        let (client, _temp) = spawn_server().await;
        let created = client
            .create_recipe(&new_recipe("Pad See Ew", "Thai"))
            .await
            .expect("create");

        let err = client
            .update_recipe(created.id, &json!({ "cookTime": 0 }))
            .await
            .expect_err("invalid update");
        match err {
            ClientError::Api {
                status, details, ..
            } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "cookTime");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn error_from_response_prefers_json_error_field() {
        let err = error_from_response(StatusCode::NOT_FOUND, r#"{"error":"Recipe not found"}"#);
        assert_eq!(err.to_string(), "Recipe not found (404 Not Found)");

        let empty = error_from_response(StatusCode::BAD_REQUEST, "   ");
        assert_eq!(empty.to_string(), "Bad Request (400 Bad Request)");

        let plain = error_from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(plain.to_string(), "upstream down (502 Bad Gateway)");
    }
}
