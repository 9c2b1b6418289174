//! Command-line client for the RecipeBox API.

mod client;
mod form;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use client::{ClientError, RecipeClient, RecipeQuery};
use form::RecipeForm;
use recipebox_core::{FieldError, Recipe, DEFAULT_CLI_SERVER_URL};
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "recipes", about = "RecipeBox CLI", version)]
struct Cli {
    /// Server URL (can also be set via RECIPES_SERVER env var)
    #[arg(short, long, env = "RECIPES_SERVER")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

/// Recipe fields shared by `add` and `update`.
#[derive(Args, Debug, Default, Clone, PartialEq)]
struct RecipeFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    cuisine: Option<String>,
    /// Easy, Medium or Hard
    #[arg(long)]
    difficulty: Option<String>,
    /// Minutes
    #[arg(long)]
    cook_time: Option<i64>,
    #[arg(long)]
    servings: Option<i64>,
    /// Image URL
    #[arg(long)]
    image: Option<String>,
    #[arg(long)]
    rating: Option<f64>,
    /// Repeat for each ingredient
    #[arg(long = "ingredient")]
    ingredients: Vec<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// List recipes
    List {
        #[arg(long)]
        cuisine: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
        #[arg(long)]
        page: Option<usize>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one recipe
    Get { id: i64 },
    /// Add a recipe after checking it locally
    Add {
        #[command(flatten)]
        fields: RecipeFields,
        /// Read the recipe from a JSON file; flags override its fields
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Change some fields of a recipe
    Update {
        id: i64,
        #[command(flatten)]
        fields: RecipeFields,
        /// Read the changes from a JSON file; flags override its fields
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Delete a recipe
    Delete { id: i64 },
}

impl RecipeFields {
    fn apply_to_form(self, form: &mut RecipeForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(cuisine) = self.cuisine {
            form.cuisine = cuisine;
        }
        if let Some(difficulty) = self.difficulty {
            form.difficulty = difficulty;
        }
        if let Some(cook_time) = self.cook_time {
            form.cook_time = cook_time;
        }
        if let Some(servings) = self.servings {
            form.servings = servings;
        }
        if let Some(image) = self.image {
            form.image = image;
        }
        if let Some(rating) = self.rating {
            form.rating = rating;
        }
        if !self.ingredients.is_empty() {
            form.ingredients = self.ingredients;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
    }

    /// Only the flags that were given, as a partial update body.
    fn into_changes(self, mut changes: Map<String, Value>) -> Map<String, Value> {
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                changes.insert(key.to_string(), value);
            }
        };
        put("title", self.title.map(Value::from));
        put("cuisine", self.cuisine.map(Value::from));
        put("difficulty", self.difficulty.map(Value::from));
        put("cookTime", self.cook_time.map(Value::from));
        put("servings", self.servings.map(Value::from));
        put("image", self.image.map(Value::from));
        put("rating", self.rating.map(Value::from));
        if !self.ingredients.is_empty() {
            put("ingredients", Some(Value::from(self.ingredients)));
        }
        put("description", self.description.map(Value::from));
        changes
    }
}

fn explicit_server_override(server: Option<String>) -> Option<String> {
    server.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn resolve_server(server: Option<String>) -> String {
    explicit_server_override(server).unwrap_or_else(|| DEFAULT_CLI_SERVER_URL.to_string())
}

fn normalize_server(server: String) -> String {
    if let Ok(mut url) = reqwest::Url::parse(&server) {
        let should_normalize_localhost =
            url.scheme().eq_ignore_ascii_case("http") && url.host_str() == Some("localhost");
        if should_normalize_localhost && url.set_host(Some("127.0.0.1")).is_err() {
            return server;
        }
        let mut normalized = url.to_string();
        while normalized.ends_with('/') {
            normalized.pop();
        }
        return normalized;
    }
    server
}

fn read_json_file(path: &Path) -> Result<Value, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {}", path.display(), err))?;
    serde_json::from_str(&raw).map_err(|err| format!("{} is not valid JSON: {}", path.display(), err))
}

fn build_form(fields: RecipeFields, file: Option<&Path>) -> Result<RecipeForm, String> {
    let mut form = match file {
        Some(path) => serde_json::from_value(read_json_file(path)?)
            .map_err(|err| format!("{} does not describe a recipe: {}", path.display(), err))?,
        None => RecipeForm::default(),
    };
    fields.apply_to_form(&mut form);
    Ok(form)
}

fn build_changes(fields: RecipeFields, file: Option<&Path>) -> Result<Value, String> {
    let base = match file {
        Some(path) => match read_json_file(path)? {
            Value::Object(map) => map,
            _ => return Err(format!("{} must contain a JSON object", path.display())),
        },
        None => Map::new(),
    };
    let changes = fields.into_changes(base);
    if changes.is_empty() {
        return Err("nothing to update; pass at least one field flag or --file".to_string());
    }
    Ok(Value::Object(changes))
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("  {}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_list_output(recipes: &[Recipe], json: bool) -> Result<String, String> {
    if json {
        return serde_json::to_string_pretty(recipes)
            .map_err(|err| format!("response encoding error: {}", err));
    }
    let rows: Vec<String> = recipes
        .iter()
        .map(|recipe| {
            format!(
                "{:>5}  {:<32} {:<14} {:<6} {:>4} min  {:.1}",
                recipe.id,
                recipe.title,
                recipe.cuisine,
                recipe.difficulty.as_str(),
                recipe.cook_time,
                recipe.rating
            )
        })
        .collect();
    Ok(rows.join("\n"))
}

fn format_recipe_output(recipe: &Recipe, json: bool) -> Result<String, String> {
    if json {
        return serde_json::to_string_pretty(recipe)
            .map_err(|err| format!("response encoding error: {}", err));
    }
    let mut lines = vec![
        format!("#{} {}", recipe.id, recipe.title),
        format!(
            "{} | {} | {} min | serves {} | rated {:.1}",
            recipe.cuisine, recipe.difficulty, recipe.cook_time, recipe.servings, recipe.rating
        ),
        format!("Image: {}", recipe.image),
        String::new(),
        recipe.description.clone(),
        String::new(),
        "Ingredients:".to_string(),
    ];
    lines.extend(recipe.ingredients.iter().map(|item| format!("  - {}", item)));
    Ok(lines.join("\n"))
}

fn fail(action: &str, message: &str) -> ! {
    eprintln!("{} failed: {}", action, message);
    std::process::exit(1);
}

fn fail_with_client_error(action: &str, err: ClientError) -> ! {
    match &err {
        ClientError::Api { details, .. } if !details.is_empty() => {
            eprintln!("{} failed: {}", action, err);
            eprintln!("{}", format_field_errors(details));
            std::process::exit(1);
        }
        _ => fail(action, &err.to_string()),
    }
}

fn print_output(action: &str, rendered: Result<String, String>) {
    match rendered {
        Ok(output) if output.is_empty() => {}
        Ok(output) => println!("{}", output),
        Err(message) => fail(action, &message),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        server,
        json,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let server = normalize_server(resolve_server(server));
    let client = RecipeClient::new(&server, Duration::from_secs(timeout))?;

    match command {
        Commands::Completions { .. } => unreachable!("completions handled before client setup"),
        Commands::List {
            cuisine,
            difficulty,
            page,
            limit,
        } => {
            let query = RecipeQuery {
                cuisine,
                difficulty,
                page,
                limit,
            };
            let recipes = client
                .get_recipes(&query)
                .await
                .unwrap_or_else(|err| fail_with_client_error("List", err));
            print_output("List", format_list_output(&recipes, json));
        }
        Commands::Get { id } => {
            let recipe = client
                .get_recipe(id)
                .await
                .unwrap_or_else(|err| fail_with_client_error("Get", err));
            print_output("Get", format_recipe_output(&recipe, json));
        }
        Commands::Add { fields, file } => {
            let form = build_form(fields, file.as_deref()).unwrap_or_else(|msg| fail("Add", &msg));
            let recipe = match form.submit() {
                Ok(recipe) => recipe,
                Err(errors) => {
                    eprintln!("Add failed: the recipe has invalid fields");
                    eprintln!("{}", format_field_errors(&errors));
                    std::process::exit(1);
                }
            };
            let created = client
                .create_recipe(&recipe)
                .await
                .unwrap_or_else(|err| fail_with_client_error("Add", err));
            if json {
                print_output("Add", format_recipe_output(&created, true));
            } else {
                println!("Created: {} (#{})", created.title, created.id);
            }
        }
        Commands::Update { id, fields, file } => {
            let changes =
                build_changes(fields, file.as_deref()).unwrap_or_else(|msg| fail("Update", &msg));
            let updated = client
                .update_recipe(id, &changes)
                .await
                .unwrap_or_else(|err| fail_with_client_error("Update", err));
            if json {
                print_output("Update", format_recipe_output(&updated, true));
            } else {
                println!("Updated: {} (#{})", updated.title, updated.id);
            }
        }
        Commands::Delete { id } => {
            client
                .delete_recipe(id)
                .await
                .unwrap_or_else(|err| fail_with_client_error("Delete", err));
            if json {
                println!("{}", serde_json::json!({ "deleted": id }));
            } else {
                println!("Deleted recipe: {}", id);
            }
        }
    }

    Ok(())
}
