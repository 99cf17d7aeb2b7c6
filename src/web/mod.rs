//! Web module for Reading Atlas.
//!
//! Serves the single-page chart and the JSON API its script talks to. The
//! server holds no per-session state: the page keeps its own [`Selection`]
//! and posts it with every event.
//!
//! # Endpoints
//!
//! - `GET /` - The interactive page (also the container health-check target)
//! - `GET /health` - Health check with dataset counts
//! - `GET /api/options` - Dropdown choices and the default selection
//! - `POST /api/dispatch` - Apply a UI event and render the next screen
//! - `GET /api/figure` - Figure for a selection given as query parameters

pub mod static_files;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::controller::{self, Screen, Transition, UiEvent};
use crate::models::{AxisTriple, Filter, Filters, Selection, ViewPreset};
use crate::services::{build_figure, Dataset, Figure, FigureRequest};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    config: Arc<Config>,
    /// Readings and axes (immutable after load)
    dataset: Arc<Dataset>,
}

impl AppState {
    /// Creates a new application state from an already loaded dataset.
    pub fn new(config: Config, dataset: Dataset) -> Self {
        Self {
            config: Arc::new(config),
            dataset: Arc::new(dataset),
        }
    }

    /// Loads the data files named in `config`.
    pub fn load(config: Config) -> anyhow::Result<Self> {
        let dataset = Dataset::load(&config.data.readings_path(), &config.data.axes_path())?;
        Ok(Self::new(config, dataset))
    }

    /// Returns the loaded dataset.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
    /// Number of loaded readings.
    pub readings: usize,
    /// Number of defined axes.
    pub axes: usize,
}

/// A dropdown entry.
#[derive(Debug, Serialize)]
pub struct SelectOption {
    /// Value sent back by the page.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

/// Everything the page needs to build its controls.
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    /// Page heading.
    pub title: String,
    /// Axis choices in definition order.
    pub axes: Vec<SelectOption>,
    /// Course sections.
    pub sections: Vec<String>,
    /// Categories.
    pub categories: Vec<String>,
    /// Authors.
    pub authors: Vec<String>,
    /// View preset buttons.
    pub views: Vec<SelectOption>,
    /// Selection a new session starts with.
    pub default_selection: Selection,
}

/// Body of `POST /api/dispatch`.
#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    /// The page's current selection.
    pub selection: Selection,
    /// Event to apply; omitted to just render the selection.
    #[serde(default)]
    pub event: Option<UiEvent>,
}

/// Response of `POST /api/dispatch`.
#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    /// Selection after the event.
    pub selection: Selection,
    /// Whether an event was applied.
    pub applied: bool,
    /// Why the event was ignored, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored_reason: Option<String>,
    /// Figure and panels for `selection`.
    #[serde(flatten)]
    pub screen: Screen,
}

/// Query parameters for `GET /api/figure`.
#[derive(Debug, Default, Deserialize)]
pub struct FigureQuery {
    /// X axis key (default axis if omitted).
    pub x: Option<String>,
    /// Y axis key (default axis if omitted).
    pub y: Option<String>,
    /// Z axis key (default axis if omitted).
    pub z: Option<String>,
    /// Section filter.
    pub section: Option<String>,
    /// Category filter.
    pub category: Option<String>,
    /// Author filter.
    pub author: Option<String>,
    /// Camera preset.
    pub view: Option<ViewPreset>,
}

impl FigureQuery {
    /// Fills omitted parameters from the dataset defaults.
    fn into_selection(self, dataset: &Dataset) -> Selection {
        let defaults = dataset.default_axes();
        Selection {
            axes: AxisTriple {
                x: self.x.unwrap_or_else(|| defaults.x.clone()),
                y: self.y.unwrap_or_else(|| defaults.y.clone()),
                z: self.z.unwrap_or_else(|| defaults.z.clone()),
            },
            filters: Filters {
                section: self.section.map(Filter::from).unwrap_or_default(),
                category: self.category.map(Filter::from).unwrap_or_default(),
                author: self.author.map(Filter::from).unwrap_or_default(),
            },
            view: self.view.unwrap_or_default(),
            selected: None,
            camera_revision: 0,
        }
    }
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Malformed bodies and query strings (unknown slot, preset, ...) answer with
/// the same JSON error shape as invalid selections.
fn rejection_error(body_text: String) -> (StatusCode, Json<ApiError>) {
    warn!("Rejecting malformed request: {}", body_text);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiError::with_details("Invalid request", body_text)),
    )
}

fn api_error(
    status: StatusCode,
    error: &str,
    cause: &anyhow::Error,
) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError::with_details(error, format!("{cause:#}"))),
    )
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /health - Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        readings: state.dataset.readings().len(),
        axes: state.dataset.axes().len(),
    })
}

/// GET /api/options - Dropdown choices and defaults.
async fn get_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    let dataset = &state.dataset;

    let axes = dataset
        .axes()
        .iter()
        .map(|axis| SelectOption {
            value: axis.key.clone(),
            label: axis.name.clone(),
        })
        .collect();

    let views = ViewPreset::ALL
        .into_iter()
        .map(|preset| SelectOption {
            value: preset.as_str().to_string(),
            label: preset.label().to_string(),
        })
        .collect();

    Json(OptionsResponse {
        title: state.config.ui.title.clone(),
        axes,
        sections: dataset.sections().to_vec(),
        categories: dataset.categories().to_vec(),
        authors: dataset.authors().to_vec(),
        views,
        default_selection: controller::initial_selection(dataset),
    })
}

/// POST /api/dispatch - Apply an event to the posted selection.
async fn dispatch_event(
    State(state): State<AppState>,
    request: Result<Json<DispatchRequest>, JsonRejection>,
) -> ApiResult<DispatchResponse> {
    let Json(request) = request.map_err(|e| rejection_error(e.body_text()))?;
    let dataset = &state.dataset;

    controller::validate_selection(dataset, &request.selection).map_err(|e| {
        warn!("Rejecting invalid selection: {:#}", e);
        api_error(StatusCode::UNPROCESSABLE_ENTITY, "Invalid selection", &e)
    })?;

    let (selection, applied, ignored_reason) = match request.event {
        None => (request.selection, false, None),
        Some(event) => match controller::dispatch(dataset, &request.selection, event) {
            Transition::Applied(selection) => (selection, true, None),
            Transition::Ignored { selection, reason } => (selection, false, Some(reason)),
        },
    };

    let screen = controller::render(dataset, &selection).map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to render selection",
            &e,
        )
    })?;

    Ok(Json(DispatchResponse {
        selection,
        applied,
        ignored_reason,
        screen,
    }))
}

/// GET /api/figure - Figure for a selection given as query parameters.
async fn get_figure(
    State(state): State<AppState>,
    query: Result<Query<FigureQuery>, QueryRejection>,
) -> ApiResult<Figure> {
    let Query(query) = query.map_err(|e| rejection_error(e.body_text()))?;
    let dataset = &state.dataset;
    let selection = query.into_selection(dataset);

    controller::validate_selection(dataset, &selection)
        .map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, "Invalid selection", &e))?;

    let figure = build_figure(dataset, &FigureRequest::from(&selection)).map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to build figure",
            &e,
        )
    })?;

    Ok(Json(figure))
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the router with all endpoints and the embedded page.
pub fn create_router(state: AppState) -> Router {
    // The page is served from the same origin; CORS only matters when the
    // API is embedded elsewhere (e.g. a course LMS page).
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Page API
        .route("/api/options", get(get_options))
        .route("/api/dispatch", post(dispatch_event))
        .route("/api/figure", get(get_figure))
        // Page and assets
        .fallback(static_files::serve_static)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Arguments
///
/// * `state` - Loaded application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an error if the server fails to bind or serve.
pub async fn run_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    if !static_files::page_is_embedded() {
        warn!("No embedded page found; only the JSON API will be available");
    }

    let app = create_router(state);

    info!("Starting Reading Atlas on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
