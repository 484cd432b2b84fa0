//! Projection of the [`Model`] onto the regions the shell draws.
//!
//! Every region of the page has its own struct in the [`ViewModel`], so the
//! shell binds each one to the element it owns and never has to know which
//! mode shows what. Building the view model is pure: same model, same output.

use serde::{Deserialize, Serialize};

use crate::model::{Category, IngredientSlot, MealDetail, MealSummary, Model, ViewMode};
use crate::{MIN_STEP_CHARS, NOT_AVAILABLE, SEARCH_RESULTS_LABEL};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBox {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    /// Dispatch `Event::CategorySelected` with this id when clicked.
    pub category_id: String,
    pub label: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideMenu {
    pub open: bool,
    pub entries: Vec<MenuEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroRegion {
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCard {
    pub category_id: String,
    pub label: String,
    pub alt: String,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealCard {
    /// Dispatch `Event::MealSelected` with this id when clicked.
    pub meal_id: String,
    pub title: String,
    pub badge: String,
    pub area: Option<String>,
    pub image: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsRegion {
    pub visible: bool,
    pub title: String,
    pub count: usize,
    pub cards: Vec<MealCard>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriesRegion {
    pub visible: bool,
    pub cards: Vec<CategoryCard>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBanner {
    pub visible: bool,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRow {
    pub number: usize,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionStep {
    pub number: usize,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealDetailView {
    pub meal_id: String,
    pub title: String,
    pub image: String,
    pub category: String,
    pub area: Option<String>,
    /// Link target; `None` renders `source_label` as plain text.
    pub source_url: Option<String>,
    pub source_label: String,
    pub tags: String,
    pub youtube: Option<String>,
    pub ingredients: Vec<IngredientRow>,
    pub measures: Vec<String>,
    pub steps: Vec<InstructionStep>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealDetailsPanel {
    pub visible: bool,
    pub meal: Option<MealDetailView>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub visible: bool,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    pub mode: ViewMode,
    pub search: SearchBox,
    pub menu: SideMenu,
    pub hero: HeroRegion,
    pub results: ResultsRegion,
    pub categories: CategoriesRegion,
    pub banner: CategoryBanner,
    pub details: MealDetailsPanel,
    pub breadcrumb: Breadcrumb,
    /// Image the shell swaps in when a card image fails to load.
    pub placeholder_image: String,
    pub is_loading: bool,
    pub notice: Option<String>,
}

/// Which regions a mode shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionVisibility {
    pub hero: bool,
    pub results: bool,
    pub categories: bool,
    pub banner: bool,
    pub details: bool,
    pub breadcrumb: bool,
}

impl RegionVisibility {
    #[must_use]
    pub const fn for_mode(mode: ViewMode) -> Self {
        match mode {
            ViewMode::Home => Self {
                hero: true,
                results: false,
                categories: true,
                banner: false,
                details: false,
                breadcrumb: false,
            },
            ViewMode::Search => Self {
                hero: true,
                results: true,
                categories: true,
                banner: false,
                details: false,
                breadcrumb: true,
            },
            ViewMode::Category => Self {
                hero: false,
                results: true,
                categories: true,
                banner: true,
                details: false,
                breadcrumb: true,
            },
            ViewMode::Details => Self {
                hero: false,
                results: false,
                categories: true,
                banner: false,
                details: true,
                breadcrumb: true,
            },
        }
    }
}

fn image_or(url: &str, placeholder: &str) -> String {
    if url.trim().is_empty() {
        placeholder.to_string()
    } else {
        url.to_string()
    }
}

pub fn category_card(category: &Category, placeholder: &str) -> CategoryCard {
    CategoryCard {
        category_id: category.id.clone(),
        label: category.name.to_uppercase(),
        alt: category.name.clone(),
        image: image_or(&category.image, placeholder),
    }
}

pub fn menu_entry(category: &Category) -> MenuEntry {
    MenuEntry {
        category_id: category.id.clone(),
        label: category.name.to_uppercase(),
    }
}

pub fn meal_card(meal: &MealSummary, placeholder: &str) -> MealCard {
    MealCard {
        meal_id: meal.id.clone(),
        title: meal.title.clone(),
        badge: meal.category.to_uppercase(),
        area: meal.area.clone(),
        image: image_or(&meal.image, placeholder),
    }
}

/// Non-blank ingredients, renumbered from 1 in slot order.
pub fn ingredient_rows(slots: &[IngredientSlot]) -> Vec<IngredientRow> {
    slots
        .iter()
        .filter_map(IngredientSlot::ingredient_text)
        .enumerate()
        .map(|(i, name)| IngredientRow {
            number: i + 1,
            name: name.to_string(),
        })
        .collect()
}

/// `"<measure> <ingredient>"` for slots where both are non-blank.
pub fn measure_lines(slots: &[IngredientSlot]) -> Vec<String> {
    slots
        .iter()
        .filter_map(|slot| Some(format!("{} {}", slot.measure_text()?, slot.ingredient_text()?)))
        .collect()
}

/// Splits on `.` and newlines and drops fragments shorter than
/// [`MIN_STEP_CHARS`] once trimmed; those are mostly stray abbreviations
/// and numbering left over from the split.
pub fn instruction_steps(instructions: &str) -> Vec<InstructionStep> {
    instructions
        .split(|c: char| c == '.' || c == '\n')
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() >= MIN_STEP_CHARS)
        .enumerate()
        .map(|(i, text)| InstructionStep {
            number: i + 1,
            text: text.to_string(),
        })
        .collect()
}

pub fn meal_detail_view(meal: &MealDetail, placeholder: &str) -> MealDetailView {
    MealDetailView {
        meal_id: meal.id.clone(),
        title: meal.title.clone(),
        image: image_or(&meal.image, placeholder),
        category: meal.category.to_uppercase(),
        area: meal.area.clone(),
        source_url: meal.source.clone(),
        source_label: meal.source.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        tags: meal.tags.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        youtube: meal.youtube.clone(),
        ingredients: ingredient_rows(&meal.ingredients),
        measures: measure_lines(&meal.ingredients),
        steps: meal
            .instructions
            .as_deref()
            .map(instruction_steps)
            .unwrap_or_default(),
    }
}

fn breadcrumb_text(model: &Model) -> String {
    match model.mode {
        ViewMode::Home => String::new(),
        ViewMode::Search => SEARCH_RESULTS_LABEL.to_string(),
        ViewMode::Category => model
            .active_category
            .as_ref()
            .map_or(model.selected_category_id.as_str(), |c| c.name.as_str())
            .to_uppercase(),
        ViewMode::Details => model
            .active_meal
            .as_ref()
            .map(|m| m.title.to_uppercase())
            .unwrap_or_default(),
    }
}

pub fn render(model: &Model) -> ViewModel {
    let visible = RegionVisibility::for_mode(model.mode);
    let placeholder = model.config.placeholder_image.as_str();

    let cards: Vec<MealCard> = model
        .active_results
        .iter()
        .map(|meal| meal_card(meal, placeholder))
        .collect();

    let (banner_title, banner_description) = model
        .active_category
        .as_ref()
        .map(|c| (c.name.clone(), c.description.clone()))
        .unwrap_or_default();

    ViewModel {
        mode: model.mode,
        search: SearchBox {
            text: model.search_text.clone(),
        },
        menu: SideMenu {
            open: model.menu_open,
            entries: model.categories.iter().map(menu_entry).collect(),
        },
        hero: HeroRegion {
            visible: visible.hero,
        },
        results: ResultsRegion {
            visible: visible.results,
            title: model.results_title.clone(),
            count: cards.len(),
            cards,
        },
        categories: CategoriesRegion {
            visible: visible.categories,
            cards: model
                .categories
                .iter()
                .map(|c| category_card(c, placeholder))
                .collect(),
        },
        banner: CategoryBanner {
            visible: visible.banner,
            title: banner_title,
            description: banner_description,
        },
        details: MealDetailsPanel {
            visible: visible.details,
            meal: model
                .active_meal
                .as_ref()
                .filter(|_| model.mode == ViewMode::Details)
                .map(|meal| meal_detail_view(meal, placeholder)),
        },
        breadcrumb: Breadcrumb {
            visible: visible.breadcrumb,
            text: breadcrumb_text(model),
        },
        placeholder_image: model.config.placeholder_image.clone(),
        is_loading: model.categories_loading || model.requests.has_pending(),
        notice: model.last_failure.as_ref().map(|e| e.user_facing_message()),
    }
}
