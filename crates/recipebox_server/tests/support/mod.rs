//! Shared integration-test server bootstrap helpers.

use axum::http::StatusCode;
use axum_test::TestServer;
use recipebox_server::{config::DataSource, create_app, AppState, Config};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Both storage backends, so each scenario can run against each.
pub(crate) const BACKENDS: [DataSource; 2] = [DataSource::Json, DataSource::Sqlite];

pub(crate) fn test_config(backend: DataSource, temp_dir: &TempDir) -> Config {
    let mut config = Config {
        port: 0,
        data_source: backend,
        json_db_path: temp_dir
            .path()
            .join("db.json")
            .to_str()
            .expect("json path")
            .to_string(),
        ..Config::default()
    };
    config.database.database = temp_dir
        .path()
        .join("database.sqlite")
        .to_str()
        .expect("sqlite path")
        .to_string();
    config
}

pub(crate) fn test_server_for_config(config: Config) -> TestServer {
    let state = AppState::open(config).expect("open store");
    let app = create_app(state, false);
    TestServer::new(app).expect("server")
}

pub(crate) fn setup_test_server(backend: DataSource) -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let server = test_server_for_config(test_config(backend, &temp_dir));
    (server, temp_dir)
}

/// A create payload that passes validation.
pub(crate) fn recipe_payload(title: &str, cuisine: &str, difficulty: &str) -> Value {
    json!({
        "title": title,
        "cuisine": cuisine,
        "difficulty": difficulty,
        "cookTime": 60,
        "servings": 4,
        "image": "https://images.example.com/recipe.jpg",
        "rating": 4.5,
        "ingredients": ["Olive oil", "Garlic", "Salt"],
        "description": format!("{} the way it is cooked at home.", title)
    })
}

/// Create the standard three-recipe collection and return the stored records.
pub(crate) async fn seed_samples(server: &TestServer) -> Vec<Value> {
    let mut created = Vec::new();
    for (title, cuisine, difficulty) in [
        ("Margherita Pizza", "Italian", "Medium"),
        ("Chicken Tikka Masala", "Indian", "Hard"),
        ("Spaghetti Carbonara", "Italian", "Easy"),
    ] {
        let response = server
            .post("/recipes")
            .json(&recipe_payload(title, cuisine, difficulty))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
        created.push(response.json::<Value>());
    }
    created
}
