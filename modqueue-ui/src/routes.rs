//! HTTP route handlers for the UI API.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use modqueue::core::types::{ReportKind, TypeFilter, UnreadOrAll};
use modqueue::session::{available_type_filters, document_title};
use modqueue::view::{Resolved, ViewSnapshot, resolve_form};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::AppState;

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/reports", get(get_reports))
        .route("/title", get(get_title))
        .route("/type-filters", get(get_type_filters))
        .route("/refetch", post(post_refetch))
        .route("/filter", post(post_filter))
        .route("/page", post(post_page))
        .route("/resolve", post(post_resolve))
}

async fn health() -> &'static str {
    "ok"
}

fn require_login(state: &AppState) -> Result<(), StatusCode> {
    if state.session.is_authenticated() {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

/// GET /api/reports - merged feed plus per-collection status flags.
async fn get_reports(State(state): State<AppState>) -> Result<Json<ViewSnapshot>, StatusCode> {
    require_login(&state)?;
    Ok(Json(state.view.snapshot()))
}

#[derive(Serialize)]
struct TitleResponse {
    title: String,
}

/// GET /api/title - document title for the reports page.
async fn get_title(State(state): State<AppState>) -> Json<TitleResponse> {
    Json(TitleResponse {
        title: document_title(&state.session, &state.site_name),
    })
}

/// GET /api/type-filters - filters the caller may select.
async fn get_type_filters(State(state): State<AppState>) -> Json<Vec<TypeFilter>> {
    Json(available_type_filters(&state.session))
}

/// POST /api/refetch - refetch all collections in the background.
async fn post_refetch(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    require_login(&state)?;
    state.spawn_refetch();
    Ok(StatusCode::ACCEPTED)
}

#[derive(Debug, Deserialize)]
struct FilterChange {
    unread_or_all: UnreadOrAll,
    type_filter: TypeFilter,
}

/// POST /api/filter - change filters (resets to page 1) and refetch.
async fn post_filter(
    State(state): State<AppState>,
    Json(change): Json<FilterChange>,
) -> Result<StatusCode, StatusCode> {
    require_login(&state)?;
    let view = Arc::clone(&state.view);
    let session = Arc::clone(&state.session);
    tokio::spawn(async move {
        view.change_filter(&session, change.unread_or_all, change.type_filter)
            .await;
    });
    Ok(StatusCode::ACCEPTED)
}

#[derive(Debug, Deserialize)]
struct PageChange {
    page: u32,
}

/// POST /api/page - change page (keeps filters) and refetch.
async fn post_page(
    State(state): State<AppState>,
    Json(change): Json<PageChange>,
) -> Result<StatusCode, StatusCode> {
    require_login(&state)?;
    if change.page == 0 {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let view = Arc::clone(&state.view);
    let session = Arc::clone(&state.session);
    tokio::spawn(async move {
        view.change_page(&session, change.page).await;
    });
    Ok(StatusCode::ACCEPTED)
}

#[derive(Debug, Deserialize)]
struct ResolveBody {
    kind: ReportKind,
    report_id: i64,
    resolved: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// POST /api/resolve - resolve one report and patch it into the feed.
async fn post_resolve(
    State(state): State<AppState>,
    Json(body): Json<ResolveBody>,
) -> Result<Json<Resolved>, (StatusCode, Json<ErrorResponse>)> {
    let form = resolve_form(&state.session, body.report_id, body.resolved).map_err(|err| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: format!("{err:#}"),
            }),
        )
    })?;
    match state.view.resolve(body.kind, &form).await {
        Ok(resolved) => Ok(Json(resolved)),
        Err(err) => {
            warn!(kind = %body.kind, report_id = body.report_id, "resolve request failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("{err:#}"),
                }),
            ))
        }
    }
}
