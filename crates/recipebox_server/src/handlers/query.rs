//! Query-string normalization for the list endpoint.

use recipebox_core::{Pagination, RecipeFilter};
use serde::Deserialize;

/// Raw list parameters. Everything is kept as text so that junk values
/// degrade to "absent" instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub cuisine: Option<String>,
    pub difficulty: Option<String>,
    #[serde(rename = "_page")]
    pub page: Option<String>,
    #[serde(rename = "_limit")]
    pub limit: Option<String>,
}

fn positive_integer(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}

impl ListQuery {
    pub fn filter(&self) -> RecipeFilter {
        RecipeFilter::new(self.cuisine.clone(), self.difficulty.clone())
    }

    /// Pagination is applied only when `_page` or `_limit` is usable.
    pub fn pagination(&self) -> Option<Pagination> {
        let page = positive_integer(self.page.as_deref());
        let limit = positive_integer(self.limit.as_deref());
        if page.is_none() && limit.is_none() {
            return None;
        }
        Some(Pagination::new(page, limit))
    }
}
