//! Shared core of the recipe browser.
//!
//! The core owns the navigation state machine (home, search, category,
//! details), talks to the recipe API through the `Http` capability and hands
//! the shell a [`ViewModel`] describing every page region. The shell draws
//! that view model and sends user actions back as [`Event`]s.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]

pub mod api;
pub mod capabilities;
pub mod event;
pub mod model;
pub mod view;

pub use api::{ApiError, Endpoint, ErrorKind, FetchOutcome};
pub use app::App;
pub use capabilities::{ApiBaseUrl, ApiConfig, Capabilities, ConfigError, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::{
    Category, IngredientSlot, MealDetail, MealSummary, Model, RequestKind, RequestLedger,
    ViewMode,
};
pub use view::ViewModel;

/// The API returns `strIngredient1..=20` and `strMeasure1..=20`.
pub const MAX_INGREDIENT_SLOTS: usize = 20;
/// Instruction fragments shorter than this, once trimmed, are not steps.
pub const MIN_STEP_CHARS: usize = 11;

pub const SEARCHING_LABEL: &str = "SEARCHING...";
pub const LOADING_LABEL: &str = "LOADING...";
pub const SEARCH_RESULTS_LABEL: &str = "SEARCH RESULTS";
pub const NOT_AVAILABLE: &str = "N/A";

/// Grey tile with a plate glyph, shown for missing or broken images.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMjAwIiBoZWlnaHQ9IjIwMCIgdmlld0JveD0iMCAwIDIwMCAyMDAiIGZpbGw9Im5vbmUiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyI+CjxyZWN0IHdpZHRoPSIyMDAiIGhlaWdodD0iMjAwIiBmaWxsPSIjRjNGNEY2Ii8+CjxwYXRoIGQ9Ik0xMDAgNzBDMTA4LjI4NCA3MCA3NSA3MCA3NSA3MEM3NSA3MCA3NSA3NSA3NSA3NUw3NSAxMjVDNzUgMTI1IDc1IDEzMCA3NSAxMzBDNzUgMTMwIDEwOC4yODQgMTMwIDEwMCAxMzBDOTEuNzE1NyAxMzAgMTI1IDEzMCAxMjUgMTMwQzEyNSAxMzAgMTI1IDEyNSAxMjUgMTI1TDEyNSA3NUMxMjUgNzUgMTI1IDcwIDEyNSA3MEMxMjUgNzAgOTEuNzE1NyA3MCAxMDAgNzBaIiBmaWxsPSIjOUIxMDBGIi8+Cjwvc3ZnPgo=";

pub mod app {
    use super::*;
    use crate::api::{self, Endpoint, FetchOutcome};
    use crate::capabilities::{into_body, Capabilities, HttpResult};

    #[derive(Default)]
    pub struct App;

    impl App {
        fn url(model: &Model, endpoint: &Endpoint) -> String {
            model.config.base_url.join(&endpoint.path_and_query())
        }

        fn outcome<T>(
            endpoint: &'static str,
            result: HttpResult,
            decode: impl FnOnce(&[u8]) -> FetchOutcome<T>,
        ) -> FetchOutcome<T> {
            let outcome = match into_body(result) {
                Ok(body) => decode(&body),
                Err(e) => FetchOutcome::Failed(e),
            };
            api::report(endpoint, &outcome);
            outcome
        }

        fn fetch_categories(model: &mut Model, caps: &Capabilities) {
            model.categories_loading = true;
            let url = Self::url(model, &Endpoint::Categories);
            caps.http
                .get(url)
                .send(|result| Event::CategoriesResponse(Box::new(result)));
        }

        /// Live search: every call with a non-blank field issues a request.
        fn run_search(model: &mut Model, caps: &Capabilities) {
            let query = model.search_text.trim().to_string();

            if query.is_empty() {
                if model.mode == ViewMode::Search {
                    model.reset_to_home();
                }
                caps.render.render();
                return;
            }

            model.mode = ViewMode::Search;
            model.results_title = SEARCHING_LABEL.to_string();
            model.last_failure = None;
            caps.render.render();

            let seq = model.requests.issue(RequestKind::Search);
            tracing::debug!(seq, query = %query, "issuing search");

            let url = Self::url(model, &Endpoint::SearchByName(query));
            caps.http
                .get(url)
                .send(move |result| Event::SearchResponse {
                    seq,
                    result: Box::new(result),
                });
        }

        fn select_category(category_id: String, model: &mut Model, caps: &Capabilities) {
            if category_id.trim().is_empty() {
                tracing::warn!("ignoring selection of a category with an empty id");
                return;
            }

            model.active_category = model.find_category(&category_id).cloned();
            if model.active_category.is_none() {
                tracing::warn!(category_id = %category_id, "selected category is not in the loaded set");
            }
            model.selected_category_id.clone_from(&category_id);
            model.search_text.clear();
            model.results_title = LOADING_LABEL.to_string();
            model.mode = ViewMode::Category;
            model.last_failure = None;
            caps.render.render();

            let seq = model.requests.issue(RequestKind::CategoryMeals);
            tracing::debug!(seq, category_id = %category_id, "issuing category fetch");

            let url = Self::url(model, &Endpoint::FilterByCategory(category_id.clone()));
            caps.http
                .get(url)
                .send(move |result| Event::CategoryMealsResponse {
                    seq,
                    category_id,
                    result: Box::new(result),
                });
        }

        fn select_meal(meal_id: String, model: &mut Model, caps: &Capabilities) {
            if meal_id.trim().is_empty() {
                tracing::warn!("ignoring selection of a meal with an empty id");
                return;
            }

            model.last_failure = None;
            let seq = model.requests.issue(RequestKind::MealDetail);
            tracing::debug!(seq, meal_id = %meal_id, "issuing meal lookup");

            let url = Self::url(model, &Endpoint::LookupById(meal_id));
            caps.http
                .get(url)
                .send(move |result| Event::MealDetailResponse {
                    seq,
                    result: Box::new(result),
                });

            caps.render.render();
        }

        fn is_stale(model: &mut Model, kind: RequestKind, seq: u64) -> bool {
            if model.requests.settle(kind, seq) {
                return false;
            }
            tracing::debug!(?kind, seq, "dropping response to a superseded request");
            true
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            let event_name = event.name();
            tracing::debug!(event = event_name, mode = model.mode.name(), "update");

            if event.is_user_initiated() {
                tracing::info!(event = event_name, "user action");
            }

            match event {
                Event::Noop => {}

                Event::AppStarted => {
                    Self::fetch_categories(model, caps);
                    caps.render.render();
                }

                Event::Configure(config) => {
                    tracing::info!(base_url = config.base_url.as_str(), "API configured");
                    let placeholder = if config.placeholder_image.trim().is_empty() {
                        PLACEHOLDER_IMAGE.to_string()
                    } else {
                        config.placeholder_image
                    };
                    model.config = ApiConfig {
                        base_url: config.base_url,
                        placeholder_image: placeholder,
                    };
                    caps.render.render();
                }

                Event::SearchChanged(text) => {
                    model.search_text = text;
                    Self::run_search(model, caps);
                }

                Event::SearchSubmitted => {
                    Self::run_search(model, caps);
                }

                Event::CategorySelected(category_id) => {
                    Self::select_category(category_id, model, caps);
                }

                Event::MealSelected(meal_id) => {
                    Self::select_meal(meal_id, model, caps);
                }

                Event::HomeRequested => {
                    model.reset_to_home();
                    caps.render.render();
                }

                Event::MenuToggled => {
                    model.menu_open = !model.menu_open;
                    caps.render.render();
                }

                Event::MenuClosed => {
                    if model.menu_open {
                        model.menu_open = false;
                        caps.render.render();
                    }
                }

                Event::CategoriesResponse(result) => {
                    model.categories_loading = false;
                    match Self::outcome("categories", *result, api::decode_categories) {
                        FetchOutcome::Found(categories) => {
                            tracing::info!(count = categories.len(), "categories loaded");
                            model.categories = categories;
                        }
                        FetchOutcome::Empty => model.categories.clear(),
                        FetchOutcome::Failed(e) => model.last_failure = Some(e),
                    }
                    if model.mode == ViewMode::Category && model.active_category.is_none() {
                        model.active_category =
                            model.find_category(&model.selected_category_id).cloned();
                    }
                    caps.render.render();
                }

                Event::SearchResponse { seq, result } => {
                    if Self::is_stale(model, RequestKind::Search, seq) {
                        return;
                    }
                    let outcome = Self::outcome("search", *result, api::decode_search_results);
                    model.record_failure(outcome.failure());
                    model.active_results = outcome.into_items();
                    model.clear_selection();
                    model.results_title = SEARCH_RESULTS_LABEL.to_string();
                    caps.render.render();
                }

                Event::CategoryMealsResponse {
                    seq,
                    category_id,
                    result,
                } => {
                    if Self::is_stale(model, RequestKind::CategoryMeals, seq) {
                        return;
                    }
                    let outcome = Self::outcome("filter", *result, |body| {
                        api::decode_category_meals(body, &category_id)
                    });
                    model.record_failure(outcome.failure());
                    model.active_results = outcome.into_items();
                    model.results_title = format!("{} MEALS", category_id.to_uppercase());
                    model.menu_open = false;
                    caps.render.render();
                }

                Event::MealDetailResponse { seq, result } => {
                    if Self::is_stale(model, RequestKind::MealDetail, seq) {
                        return;
                    }
                    let outcome = Self::outcome("lookup", *result, api::decode_meal_detail);
                    model.record_failure(outcome.failure());
                    if let Some(meal) = outcome.into_found() {
                        model.active_meal = Some(meal);
                        model.mode = ViewMode::Details;
                    }
                    caps.render.render();
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            crate::view::render(model)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crux_core::testing::AppTester;
    use crux_http::testing::ResponseBuilder;

    fn http_urls(effects: &[Effect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Http(request) => Some(request.operation.url.clone()),
                _ => None,
            })
            .collect()
    }

    fn ok(body: &str) -> Box<capabilities::HttpResult> {
        Box::new(Ok(ResponseBuilder::ok().body(body.as_bytes().to_vec()).build()))
    }

    #[test]
    fn test_app_started_fetches_categories() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        let update = app.update(Event::AppStarted, &mut model);

        assert_eq!(
            http_urls(&update.effects),
            vec![format!("{}/categories.php", capabilities::DEFAULT_API_BASE)]
        );
        assert!(model.categories_loading);
        assert!(app.view(&model).is_loading);
    }

    #[test]
    fn test_blank_search_never_hits_the_network() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        for text in ["", "   ", "\t\n"] {
            let update = app.update(Event::SearchChanged(text.into()), &mut model);
            assert!(http_urls(&update.effects).is_empty());
            assert_eq!(model.mode, ViewMode::Home);
        }

        let update = app.update(Event::SearchSubmitted, &mut model);
        assert!(http_urls(&update.effects).is_empty());
    }

    #[test]
    fn test_search_is_trimmed_and_encoded() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        let update = app.update(Event::SearchChanged("  fish pie ".into()), &mut model);

        let urls = http_urls(&update.effects);
        assert_eq!(urls.len(), 1);
        assert!(urls[0].ends_with("/search.php?s=fish+pie"));
        assert_eq!(model.search_text, "  fish pie ");
        assert_eq!(model.results_title, SEARCHING_LABEL);
        assert!(update.effects.iter().any(|e| matches!(e, Effect::Render(_))));
    }

    #[test]
    fn test_clearing_search_returns_home() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        app.update(Event::SearchChanged("pie".into()), &mut model);
        assert_eq!(model.mode, ViewMode::Search);

        app.update(Event::SearchChanged(String::new()), &mut model);
        assert_eq!(model.mode, ViewMode::Home);
        assert!(!model.requests.has_pending());
    }

    #[test]
    fn test_clearing_search_outside_search_mode_keeps_view() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        app.update(Event::CategorySelected("beef".into()), &mut model);
        app.update(Event::SearchChanged(" ".into()), &mut model);

        assert_eq!(model.mode, ViewMode::Category);
        assert_eq!(model.selected_category_id, "beef");
    }

    #[test]
    fn test_empty_category_id_is_ignored() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        let update = app.update(Event::CategorySelected("  ".into()), &mut model);

        assert!(update.effects.is_empty());
        assert_eq!(model.mode, ViewMode::Home);
    }

    #[test]
    fn test_menu_toggle_and_close() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        app.update(Event::MenuToggled, &mut model);
        assert!(app.view(&model).menu.open);

        app.update(Event::MenuClosed, &mut model);
        assert!(!model.menu_open);

        let update = app.update(Event::MenuClosed, &mut model);
        assert!(update.effects.is_empty());
    }

    #[test]
    fn test_configure_changes_base_url() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        let config = ApiConfig {
            base_url: ApiBaseUrl::parse("http://localhost:9000/mealdb/").unwrap(),
            placeholder_image: String::new(),
        };
        app.update(Event::Configure(config), &mut model);
        assert_eq!(model.config.placeholder_image, PLACEHOLDER_IMAGE);

        let update = app.update(Event::MealSelected("52772".into()), &mut model);
        assert_eq!(
            http_urls(&update.effects),
            vec!["http://localhost:9000/mealdb/lookup.php?i=52772".to_string()]
        );
    }

    #[test]
    fn test_failed_category_list_keeps_previous_set() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model {
            categories: vec![Category::new("Beef", "", "")],
            ..Model::default()
        };

        app.update(Event::AppStarted, &mut model);
        app.update(Event::CategoriesResponse(ok("not json")), &mut model);

        assert_eq!(model.categories.len(), 1);
        assert!(!model.categories_loading);
        assert!(app.view(&model).notice.is_some());
    }

    #[test]
    fn test_missing_meal_keeps_prior_view() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        app.update(Event::SearchChanged("pie".into()), &mut model);
        let search_seq = model.requests.latest_seq(RequestKind::Search).unwrap();
        app.update(
            Event::SearchResponse {
                seq: search_seq,
                result: ok(r#"{"meals": null}"#),
            },
            &mut model,
        );

        app.update(Event::MealSelected("0".into()), &mut model);
        let seq = model.requests.latest_seq(RequestKind::MealDetail).unwrap();
        app.update(
            Event::MealDetailResponse {
                seq,
                result: ok(r#"{"meals": null}"#),
            },
            &mut model,
        );

        assert_eq!(model.mode, ViewMode::Search);
        assert!(model.active_meal.is_none());
        assert!(model.last_failure.is_none());
    }
}
