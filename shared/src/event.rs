use serde::{Deserialize, Serialize};

use crate::capabilities::{ApiConfig, HttpResult};

/// Everything that can happen to the core: user actions sent by the shell
/// and HTTP completions routed back by the `Http` capability.
///
/// Completion variants are internal and never cross the FFI boundary.
#[derive(Debug, Default, Serialize, Deserialize)]
pub enum Event {
    #[default]
    Noop,

    AppStarted,
    Configure(ApiConfig),

    /// Fired on every input event of the search field with its full text.
    SearchChanged(String),
    /// Search button: re-runs the search with the current field text.
    SearchSubmitted,
    CategorySelected(String),
    MealSelected(String),
    HomeRequested,

    MenuToggled,
    MenuClosed,

    #[serde(skip)]
    CategoriesResponse(Box<HttpResult>),
    #[serde(skip)]
    SearchResponse {
        seq: u64,
        result: Box<HttpResult>,
    },
    #[serde(skip)]
    CategoryMealsResponse {
        seq: u64,
        category_id: String,
        result: Box<HttpResult>,
    },
    #[serde(skip)]
    MealDetailResponse {
        seq: u64,
        result: Box<HttpResult>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noop => "noop",
            Self::AppStarted => "app_started",
            Self::Configure(_) => "configure",
            Self::SearchChanged(_) => "search_changed",
            Self::SearchSubmitted => "search_submitted",
            Self::CategorySelected(_) => "category_selected",
            Self::MealSelected(_) => "meal_selected",
            Self::HomeRequested => "home_requested",
            Self::MenuToggled => "menu_toggled",
            Self::MenuClosed => "menu_closed",
            Self::CategoriesResponse(_) => "categories_response",
            Self::SearchResponse { .. } => "search_response",
            Self::CategoryMealsResponse { .. } => "category_meals_response",
            Self::MealDetailResponse { .. } => "meal_detail_response",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::SearchChanged(_)
                | Self::SearchSubmitted
                | Self::CategorySelected(_)
                | Self::MealSelected(_)
                | Self::HomeRequested
                | Self::MenuToggled
                | Self::MenuClosed
        )
    }
}
