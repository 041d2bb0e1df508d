use std::sync::{Arc, PoisonError, RwLock};

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::fetcher::FeedSource;
use crate::loader::{FeedDisplay, FeedLoader, FeedView};
use crate::menu::MenuController;
use crate::registry::{Feed, FeedRegistry, RegistryError};
use crate::validation::{check_name, check_url};

pub struct AppState {
    pub registry: Arc<RwLock<FeedRegistry>>,
    pub display: Arc<FeedDisplay>,
    pub loader: FeedLoader,
    pub menu: MenuController,
}

impl AppState {
    pub fn new(registry: FeedRegistry, source: Arc<dyn FeedSource>) -> Self {
        let registry = Arc::new(RwLock::new(registry));
        let display = Arc::new(FeedDisplay::new());
        let loader = FeedLoader::new(registry.clone(), source, display.clone());

        Self {
            registry,
            display,
            loader,
            menu: MenuController::new(),
        }
    }

    fn page(&self, current: Option<FeedView>, form: AddFeedForm, errors: Vec<String>) -> IndexTemplate {
        let feeds = self
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .feeds()
            .iter()
            .enumerate()
            .map(|(index, feed)| FeedLink {
                index,
                name: feed.name.clone(),
            })
            .collect();

        IndexTemplate {
            body_class: self.menu.state().body_class(),
            feeds,
            current,
            form,
            errors,
        }
    }
}

// Template structs
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub body_class: &'static str,
    pub feeds: Vec<FeedLink>,
    pub current: Option<FeedView>,
    pub form: AddFeedForm,
    pub errors: Vec<String>,
}

pub struct FeedLink {
    pub index: usize,
    pub name: String,
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

// Custom error type
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<RegistryError>() {
            Some(RegistryError::IndexOutOfRange { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, format!("Error: {}", self.0)).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct AddFeedForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/feeds", post(add_feed))
        .route("/feeds/:index", get(show_feed))
        .route("/menu/toggle", post(toggle_menu))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Route handlers
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    HtmlTemplate(state.page(state.display.current(), AddFeedForm::default(), Vec::new()))
}

pub async fn show_feed(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.loader.load(index)?.await;

    Ok(HtmlTemplate(state.page(
        Some(outcome.view),
        AddFeedForm::default(),
        Vec::new(),
    )))
}

pub async fn add_feed(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddFeedForm>,
) -> Response {
    let name = form.name.trim();
    let url = form.url.trim();

    let added = {
        let mut registry = state.registry.write().unwrap_or_else(PoisonError::into_inner);
        let errors: Vec<String> = [check_name(name, &registry), check_url(url)]
            .into_iter()
            .filter_map(Result::err)
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            registry.append(Feed::new(name, url));
            Ok(registry.count() - 1)
        } else {
            Err(errors)
        }
    };

    match added {
        Ok(index) => {
            info!("Added feed '{}' ({}) at index {}", name, url, index);
            Redirect::to(&format!("/feeds/{}", index)).into_response()
        }
        Err(errors) => {
            info!("Rejected feed '{}' ({}): {}", name, url, errors.join("; "));
            let page = state.page(state.display.current(), form, errors);
            (StatusCode::UNPROCESSABLE_ENTITY, HtmlTemplate(page)).into_response()
        }
    }
}

pub async fn toggle_menu(State(state): State<Arc<AppState>>) -> Redirect {
    state.menu.toggle();
    Redirect::to("/")
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
