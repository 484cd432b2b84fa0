//! Gateway to the public recipe API.
//!
//! Knows the four read-only endpoints, the JSON shapes they answer with and
//! how to reshape those into the core's own records. Nothing in here talks
//! to the network: the app issues requests through the `Http` capability and
//! feeds the bodies back through the `decode_*` functions.
//!
//! Every decoder returns a [`FetchOutcome`] so callers can tell a successful
//! "no matches" apart from a failure, while still being able to collapse both
//! with [`FetchOutcome::into_found`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;

use crate::model::{Category, IngredientSlot, MealDetail, MealSummary};
use crate::MAX_INGREDIENT_SLOTS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Categories,
    SearchByName(String),
    FilterByCategory(String),
    LookupById(String),
}

impl Endpoint {
    /// Path relative to the API base, query component form-urlencoded.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        match self {
            Self::Categories => "/categories.php".to_string(),
            Self::SearchByName(query) => format!("/search.php?s={}", encode(query)),
            Self::FilterByCategory(category) => format!("/filter.php?c={}", encode(category)),
            Self::LookupById(id) => format!("/lookup.php?i={}", encode(id)),
        }
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    HttpStatus,
    Deserialization,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::HttpStatus => "HTTP_STATUS_ERROR",
            Self::Deserialization => "DESERIALIZATION_ERROR",
        }
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("response carried no body")]
    MissingBody,

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Network,
            Self::Status(_) => ErrorKind::HttpStatus,
            Self::MissingBody | Self::Decode(_) => ErrorKind::Deserialization,
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind().code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind() {
            ErrorKind::Network => {
                "Unable to reach the recipe service. Please check your connection.".into()
            }
            ErrorKind::HttpStatus => "The recipe service is unavailable right now.".into(),
            ErrorKind::Deserialization => "The recipe service sent an unexpected answer.".into(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Result of one gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Found(T),
    /// The API answered successfully but had nothing for the request.
    Empty,
    Failed(ApiError),
}

impl<T> FetchOutcome<T> {
    /// Collapses `Empty` and `Failed` into `None`.
    pub fn into_found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Empty | Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ApiError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl<T> FetchOutcome<Vec<T>> {
    fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Found(items)
        }
    }

    /// The list, empty on `Empty` and `Failed`.
    pub fn into_items(self) -> Vec<T> {
        self.into_found().unwrap_or_default()
    }
}

/// Logs a failed outcome; successful and empty outcomes only at debug.
pub fn report<T>(endpoint: &'static str, outcome: &FetchOutcome<T>) {
    match outcome {
        FetchOutcome::Found(_) => tracing::debug!(endpoint, "recipe API answered"),
        FetchOutcome::Empty => tracing::debug!(endpoint, "recipe API had no matches"),
        FetchOutcome::Failed(e) => {
            tracing::warn!(endpoint, code = e.code(), error = %e, "recipe API request failed");
        }
    }
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    categories: Option<Vec<RawCategory>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCategory {
    str_category: String,
    str_category_thumb: Option<String>,
    str_category_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MealsResponse<T> {
    meals: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMealSummary {
    id_meal: String,
    str_meal: String,
    str_category: Option<String>,
    str_meal_thumb: Option<String>,
    str_area: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMeal {
    id_meal: String,
    str_meal: String,
    str_category: Option<String>,
    str_area: Option<String>,
    str_meal_thumb: Option<String>,
    str_instructions: Option<String>,
    str_tags: Option<String>,
    str_source: Option<String>,
    str_youtube: Option<String>,
    #[serde(flatten)]
    rest: HashMap<String, serde_json::Value>,
}

impl RawMeal {
    fn slot_text(&self, prefix: &str, slot: usize) -> Option<String> {
        self.rest
            .get(&format!("{prefix}{slot}"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    }

    fn into_detail(self) -> MealDetail {
        let ingredients = (1..=MAX_INGREDIENT_SLOTS)
            .map(|slot| IngredientSlot {
                slot,
                ingredient: self.slot_text("strIngredient", slot),
                measure: self.slot_text("strMeasure", slot),
            })
            .collect();

        MealDetail {
            id: self.id_meal,
            title: self.str_meal,
            category: self.str_category.unwrap_or_default(),
            area: non_blank(self.str_area),
            image: self.str_meal_thumb.unwrap_or_default(),
            instructions: non_blank(self.str_instructions),
            tags: non_blank(self.str_tags),
            source: non_blank(self.str_source),
            youtube: non_blank(self.str_youtube),
            ingredients,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn decode<T, F>(body: &[u8], convert: F) -> FetchOutcome<T>
where
    F: FnOnce(&[u8]) -> Result<FetchOutcome<T>, ApiError>,
{
    convert(body).unwrap_or_else(FetchOutcome::Failed)
}

/// `/categories.php`. Ids are the lowercased names; API order is kept.
pub fn decode_categories(body: &[u8]) -> FetchOutcome<Vec<Category>> {
    decode(body, |body| {
        let response: CategoriesResponse = serde_json::from_slice(body)?;
        let categories = response
            .categories
            .unwrap_or_default()
            .into_iter()
            .map(|raw| {
                Category::new(
                    raw.str_category,
                    raw.str_category_thumb.unwrap_or_default(),
                    raw.str_category_description.unwrap_or_default(),
                )
            })
            .collect();
        Ok(FetchOutcome::from_items(categories))
    })
}

/// `/search.php?s=`. `{"meals": null}` is a successful empty answer.
pub fn decode_search_results(body: &[u8]) -> FetchOutcome<Vec<MealSummary>> {
    decode(body, |body| {
        let response: MealsResponse<RawMealSummary> = serde_json::from_slice(body)?;
        let meals = response
            .meals
            .unwrap_or_default()
            .into_iter()
            .map(|raw| MealSummary {
                id: raw.id_meal,
                title: raw.str_meal,
                category: raw.str_category.unwrap_or_default().to_lowercase(),
                image: raw.str_meal_thumb.unwrap_or_default(),
                area: non_blank(raw.str_area),
            })
            .collect();
        Ok(FetchOutcome::from_items(meals))
    })
}

/// `/filter.php?c=`. The filter endpoint omits category and area, so the
/// summaries take the requested category and carry no area.
pub fn decode_category_meals(body: &[u8], category_id: &str) -> FetchOutcome<Vec<MealSummary>> {
    let category = category_id.to_lowercase();
    decode(body, |body| {
        let response: MealsResponse<RawMealSummary> = serde_json::from_slice(body)?;
        let meals = response
            .meals
            .unwrap_or_default()
            .into_iter()
            .map(|raw| MealSummary {
                id: raw.id_meal,
                title: raw.str_meal,
                category: category.clone(),
                image: raw.str_meal_thumb.unwrap_or_default(),
                area: None,
            })
            .collect();
        Ok(FetchOutcome::from_items(meals))
    })
}

/// `/lookup.php?i=`. Only the first record is used.
pub fn decode_meal_detail(body: &[u8]) -> FetchOutcome<MealDetail> {
    decode(body, |body| {
        let response: MealsResponse<RawMeal> = serde_json::from_slice(body)?;
        Ok(response
            .meals
            .and_then(|meals| meals.into_iter().next())
            .map_or(FetchOutcome::Empty, |raw| FetchOutcome::Found(raw.into_detail())))
    })
}
