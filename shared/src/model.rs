use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::capabilities::ApiConfig;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    /// Lowercased `name`; what the filter endpoint and selection events use.
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
}

impl Category {
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: name.to_lowercase(),
            name,
            image: image.into(),
            description: description.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSummary {
    pub id: String,
    pub title: String,
    /// Lowercased category name.
    pub category: String,
    pub image: String,
    pub area: Option<String>,
}

/// One of the twenty `strIngredientN` / `strMeasureN` pairs, as received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSlot {
    pub slot: usize,
    pub ingredient: Option<String>,
    pub measure: Option<String>,
}

impl IngredientSlot {
    pub fn ingredient_text(&self) -> Option<&str> {
        self.ingredient.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn measure_text(&self) -> Option<&str> {
        self.measure.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealDetail {
    pub id: String,
    pub title: String,
    pub category: String,
    pub area: Option<String>,
    pub image: String,
    pub instructions: Option<String>,
    pub tags: Option<String>,
    pub source: Option<String>,
    pub youtube: Option<String>,
    pub ingredients: Vec<IngredientSlot>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Home,
    Search,
    Category,
    Details,
}

impl ViewMode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Search => "search",
            Self::Category => "category",
            Self::Details => "details",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    Search,
    CategoryMeals,
    MealDetail,
}

impl RequestKind {
    /// Search and category fetches both fill the results grid, so a new one
    /// of either kind replaces the other. Detail lookups only replace older
    /// detail lookups.
    #[must_use]
    pub const fn supersedes(self, other: Self) -> bool {
        matches!(
            (self, other),
            (
                Self::Search | Self::CategoryMeals,
                Self::Search | Self::CategoryMeals
            ) | (Self::MealDetail, Self::MealDetail)
        )
    }
}

/// Sequence numbers of the navigation queries in flight.
///
/// Every issued query gets the next number. A completion is applied only
/// while its `(kind, seq)` is still pending; issuing a query drops whatever
/// it [supersedes](RequestKind::supersedes), so a slower older answer can
/// never overwrite a newer one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLedger {
    next_seq: u64,
    pending: Vec<(RequestKind, u64)>,
}

impl RequestLedger {
    pub fn issue(&mut self, kind: RequestKind) -> u64 {
        self.next_seq += 1;
        self.pending.retain(|(other, _)| !kind.supersedes(*other));
        self.pending.push((kind, self.next_seq));
        self.next_seq
    }

    pub fn is_current(&self, kind: RequestKind, seq: u64) -> bool {
        self.pending.contains(&(kind, seq))
    }

    /// Marks `seq` as answered if it is current. Returns whether it was.
    pub fn settle(&mut self, kind: RequestKind, seq: u64) -> bool {
        match self.pending.iter().position(|entry| *entry == (kind, seq)) {
            Some(index) => {
                self.pending.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn latest_seq(&self, kind: RequestKind) -> Option<u64> {
        self.pending
            .iter()
            .rev()
            .find(|(pending, _)| *pending == kind)
            .map(|(_, seq)| *seq)
    }
}

/// The single view state, owned by the Crux runtime and mutated only by
/// `App::update`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Model {
    pub mode: ViewMode,

    /// Mirror of the search field's content.
    pub search_text: String,

    pub categories: Vec<Category>,
    pub categories_loading: bool,

    /// Non-empty whenever `mode` is `Category`.
    pub selected_category_id: String,
    pub active_category: Option<Category>,
    pub active_results: Vec<MealSummary>,
    pub results_title: String,
    pub active_meal: Option<MealDetail>,

    pub menu_open: bool,

    pub requests: RequestLedger,
    pub last_failure: Option<ApiError>,

    pub config: ApiConfig,
}

impl Model {
    pub fn find_category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn clear_selection(&mut self) {
        self.selected_category_id.clear();
        self.active_category = None;
    }

    pub fn reset_to_home(&mut self) {
        self.search_text.clear();
        self.mode = ViewMode::Home;
        self.active_results.clear();
        self.results_title.clear();
        self.active_meal = None;
        self.clear_selection();
        self.requests.cancel_all();
        self.last_failure = None;
    }

    pub fn record_failure(&mut self, failure: Option<&ApiError>) {
        self.last_failure = failure.cloned();
    }
}
