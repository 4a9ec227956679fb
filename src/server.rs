//! HTTP surface for the dashboard.
//!
//! The table is loaded once at startup; every request re-runs the layout for
//! the requested year against it.

use crate::config::DashboardSettings;
use crate::core::layout::{build_view, DashboardView, LayoutOptions};
use crate::core::metrics::year_options;
use crate::domain::model::YieldTable;
use crate::render::{render_to_string, PageContext, YearLinks};
use crate::utils::error::{DashboardError, ErrorSeverity, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    table: Arc<YieldTable>,
    options: Arc<LayoutOptions>,
}

impl AppState {
    pub fn new(table: YieldTable, options: LayoutOptions) -> Self {
        Self {
            table: Arc::new(table),
            options: Arc::new(options),
        }
    }

    fn view(&self, year: Option<i32>) -> Result<DashboardView> {
        build_view(&self.table, year, &self.options)
    }
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    year: Option<i32>,
}

fn status_for(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::NoDataForYear { .. } | DashboardError::EmptyTable => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_request_error(err: &DashboardError) {
    if err.severity() >= ErrorSeverity::High {
        tracing::error!("❌ Request failed: {} (Category: {:?})", err, err.category());
    } else {
        tracing::debug!("Request for missing data: {}", err);
    }
}

async fn page_handler(State(state): State<AppState>, Query(query): Query<YearQuery>) -> Response {
    let ctx = PageContext::new(YearLinks::Query);
    match state.view(query.year).and_then(|view| render_to_string(&view, &ctx)) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            log_request_error(&err);
            let body = format!(
                "<!DOCTYPE html><html><body style=\"font-family: sans-serif\"><h2>{}</h2><p>{}</p><p><a href=\"/\">Back to the dashboard</a></p></body></html>",
                err.user_friendly_message(),
                err.recovery_suggestion()
            );
            (status_for(&err), Html(body)).into_response()
        }
    }
}

async fn view_handler(State(state): State<AppState>, Query(query): Query<YearQuery>) -> Response {
    match state.view(query.year) {
        Ok(view) => Json(view).into_response(),
        Err(err) => {
            log_request_error(&err);
            let body = serde_json::json!({
                "error": err.to_string(),
                "suggestion": err.recovery_suggestion(),
            });
            (status_for(&err), Json(body)).into_response()
        }
    }
}

async fn years_handler(State(state): State<AppState>) -> Json<Vec<i32>> {
    Json(year_options(&state.table))
}

async fn health_handler() -> &'static str {
    "ok"
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/api/view", get(view_handler))
        .route("/api/years", get(years_handler))
        .route("/healthz", get(health_handler))
        .with_state(state)
}

/// Serves on an already bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Could not install Ctrl-C handler: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("🛑 Shutting down dashboard server");
        })
        .await
        .map_err(|e| DashboardError::ServerError {
            message: e.to_string(),
        })
}

pub async fn run_http_server(settings: &DashboardSettings, table: YieldTable) -> Result<()> {
    let addr = settings.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| DashboardError::ServerError {
            message: format!("Failed to bind {}: {}", addr, e),
        })?;

    tracing::info!("🌐 Dashboard listening on http://{}", addr);
    serve(listener, AppState::new(table, LayoutOptions::from_config(settings))).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_errors() {
        assert_eq!(
            status_for(&DashboardError::NoDataForYear { year: 1900 }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&DashboardError::RenderError {
                message: "boom".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
