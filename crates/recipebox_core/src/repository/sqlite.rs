//! Recipe storage in a SQLite table.

use super::RecipeRepository;
use crate::error::AppError;
use crate::models::recipe::{
    Difficulty, NewRecipe, Pagination, Recipe, RecipeFilter, RecipePatch,
};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS recipe (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        cuisine TEXT NOT NULL,
        difficulty TEXT NOT NULL,
        cook_time INTEGER NOT NULL,
        servings INTEGER NOT NULL,
        image TEXT NOT NULL,
        rating REAL NOT NULL,
        ingredients TEXT NOT NULL,
        description TEXT NOT NULL
    );
"#;

const SELECT_COLUMNS: &str = "SELECT id, title, cuisine, difficulty, cook_time, servings, \
                              image, rating, ingredients, description FROM recipe";

/// Open-time behavior of the SQLite store.
#[derive(Debug, Clone, Copy)]
pub struct SqliteOptions {
    /// Create the `recipe` table when it is missing.
    pub synchronize: bool,
    /// Emit every SQL statement at debug level.
    pub log_queries: bool,
}

impl Default for SqliteOptions {
    fn default() -> Self {
        Self {
            synchronize: true,
            log_queries: false,
        }
    }
}

/// Store backed by a single SQLite connection.
pub struct SqliteRecipeStore {
    conn: Mutex<Connection>,
    log_queries: bool,
}

/// Raw column values before domain conversion.
struct RecipeRow {
    id: i64,
    title: String,
    cuisine: String,
    difficulty: String,
    cook_time: u32,
    servings: u32,
    image: String,
    rating: f64,
    ingredients: String,
    description: String,
}

impl RecipeRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            cuisine: row.get(2)?,
            difficulty: row.get(3)?,
            cook_time: row.get(4)?,
            servings: row.get(5)?,
            image: row.get(6)?,
            rating: row.get(7)?,
            ingredients: row.get(8)?,
            description: row.get(9)?,
        })
    }

    fn into_recipe(self) -> Result<Recipe, AppError> {
        let difficulty = Difficulty::parse(&self.difficulty).ok_or_else(|| {
            AppError::StorageMessage(format!(
                "Recipe {} has unknown difficulty '{}'",
                self.id, self.difficulty
            ))
        })?;
        let ingredients: Vec<String> = serde_json::from_str(&self.ingredients)?;
        Ok(Recipe {
            id: self.id,
            title: self.title,
            cuisine: self.cuisine,
            difficulty,
            cook_time: self.cook_time,
            servings: self.servings,
            image: self.image,
            rating: self.rating,
            ingredients,
            description: self.description,
        })
    }
}

/// Wrap a filter needle as a `LIKE` pattern, escaping wildcards so the
/// needle matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl SqliteRecipeStore {
    /// Open (or create) the database at `path`.
    ///
    /// `:memory:` opens a private in-memory database.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened, or
    /// [`AppError::Config`] if the table is missing and `synchronize` is off.
    pub fn open(path: impl AsRef<Path>, options: SqliteOptions) -> Result<Self, AppError> {
        let path = path.as_ref();
        let conn = if path.as_os_str() == ":memory:" {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let conn = Connection::open(path)?;
            Self::configure_pragmas(&conn)?;
            conn
        };
        Self::from_connection(conn, options)
    }

    /// Private in-memory database with the schema created.
    pub fn in_memory() -> Result<Self, AppError> {
        Self::from_connection(Connection::open_in_memory()?, SqliteOptions::default())
    }

    fn from_connection(conn: Connection, options: SqliteOptions) -> Result<Self, AppError> {
        Self::register_functions(&conn)?;
        if options.synchronize {
            conn.execute_batch(SCHEMA)?;
        } else {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'recipe')",
                [],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(AppError::Config(
                    "Table 'recipe' does not exist; enable DB_SYNCHRONIZE to create it".to_string(),
                ));
            }
        }
        Ok(Self {
            conn: Mutex::new(conn),
            log_queries: options.log_queries,
        })
    }

    /// WAL keeps readers unblocked while a write is in flight.
    fn configure_pragmas(conn: &Connection) -> Result<(), AppError> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            "#,
        )?;
        Ok(())
    }

    /// `LIKE` only folds ASCII, so filters compare `lower_unicode(column)`
    /// against a needle lowercased the same way.
    fn register_functions(conn: &Connection) -> Result<(), AppError> {
        conn.create_scalar_function(
            "lower_unicode",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.conn
            .lock()
            .map_err(|_| AppError::StorageMessage("SQLite connection lock poisoned".to_string()))
    }

    fn log_sql(&self, sql: &str) {
        if self.log_queries {
            tracing::debug!(target: "recipebox_core::sql", "{}", sql);
        }
    }

    fn fetch(&self, conn: &Connection, id: i64) -> Result<Option<Recipe>, AppError> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        self.log_sql(&sql);
        conn.query_row(&sql, params![id], RecipeRow::from_row)
            .optional()?
            .map(RecipeRow::into_recipe)
            .transpose()
    }
}

impl RecipeRepository for SqliteRecipeStore {
    fn find_all(
        &self,
        filter: &RecipeFilter,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Recipe>, AppError> {
        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(cuisine) = filter.cuisine_needle() {
            clauses.push("lower_unicode(cuisine) LIKE ? ESCAPE '\\'");
            values.push(Value::Text(like_pattern(&cuisine.to_lowercase())));
        }
        if let Some(difficulty) = filter.difficulty_needle() {
            clauses.push("lower_unicode(difficulty) LIKE ? ESCAPE '\\'");
            values.push(Value::Text(like_pattern(&difficulty.to_lowercase())));
        }

        let mut sql = String::from(SELECT_COLUMNS);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");
        if let Some(window) = pagination {
            let (offset, limit) = window.bounds();
            sql.push_str(" LIMIT ? OFFSET ?");
            // SQLite treats a negative LIMIT as unbounded.
            values.push(Value::Integer(limit.map_or(-1, sql_int)));
            values.push(Value::Integer(sql_int(offset)));
        }

        self.log_sql(&sql);
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), RecipeRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(RecipeRow::into_recipe).collect()
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Recipe>, AppError> {
        let conn = self.conn()?;
        self.fetch(&conn, id)
    }

    fn create(&self, recipe: NewRecipe) -> Result<Recipe, AppError> {
        let ingredients = serde_json::to_string(&recipe.ingredients)?;
        let sql = "INSERT INTO recipe (title, cuisine, difficulty, cook_time, servings, image, \
                   rating, ingredients, description) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
        self.log_sql(sql);
        let conn = self.conn()?;
        conn.execute(
            sql,
            params![
                recipe.title,
                recipe.cuisine,
                recipe.difficulty.as_str(),
                recipe.cook_time,
                recipe.servings,
                recipe.image,
                recipe.rating,
                ingredients,
                recipe.description,
            ],
        )?;
        Ok(recipe.with_id(conn.last_insert_rowid()))
    }

    fn update(&self, id: i64, patch: RecipePatch) -> Result<Option<Recipe>, AppError> {
        let conn = self.conn()?;
        if patch.is_empty() {
            return self.fetch(&conn, id);
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(title) = patch.title {
            assignments.push("title = ?");
            values.push(Value::Text(title));
        }
        if let Some(cuisine) = patch.cuisine {
            assignments.push("cuisine = ?");
            values.push(Value::Text(cuisine));
        }
        if let Some(difficulty) = patch.difficulty {
            assignments.push("difficulty = ?");
            values.push(Value::Text(difficulty.as_str().to_string()));
        }
        if let Some(cook_time) = patch.cook_time {
            assignments.push("cook_time = ?");
            values.push(Value::Integer(i64::from(cook_time)));
        }
        if let Some(servings) = patch.servings {
            assignments.push("servings = ?");
            values.push(Value::Integer(i64::from(servings)));
        }
        if let Some(image) = patch.image {
            assignments.push("image = ?");
            values.push(Value::Text(image));
        }
        if let Some(rating) = patch.rating {
            assignments.push("rating = ?");
            values.push(Value::Real(rating));
        }
        if let Some(ingredients) = patch.ingredients {
            assignments.push("ingredients = ?");
            values.push(Value::Text(serde_json::to_string(&ingredients)?));
        }
        if let Some(description) = patch.description {
            assignments.push("description = ?");
            values.push(Value::Text(description));
        }
        values.push(Value::Integer(id));

        let sql = format!("UPDATE recipe SET {} WHERE id = ?", assignments.join(", "));
        self.log_sql(&sql);
        let affected = conn.execute(&sql, params_from_iter(values.iter()))?;
        if affected == 0 {
            return Ok(None);
        }
        self.fetch(&conn, id)
    }

    fn delete(&self, id: i64) -> Result<bool, AppError> {
        let sql = "DELETE FROM recipe WHERE id = ?1";
        self.log_sql(sql);
        let affected = self.conn()?.execute(sql, params![id])?;
        Ok(affected != 0)
    }

    fn count(&self) -> Result<usize, AppError> {
        let sql = "SELECT COUNT(*) FROM recipe";
        self.log_sql(sql);
        let count: i64 = self.conn()?.query_row(sql, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
