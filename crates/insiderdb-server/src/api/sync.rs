use axum::{extract::State, Extension, Json};
use serde::Serialize;

use insiderdb_core::RunSummary;
use insiderdb_sync::{run_reddit_sync, run_sec_sync};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct SyncData {
    pub sec: RunSummary,
    pub reddit: Option<RunSummary>,
    /// Source-level failures that did not abort the whole request.
    pub errors: Vec<String>,
}

/// Run both source syncs concurrently.
///
/// The SEC feed is the primary source: its total failure fails the request.
/// A Reddit failure is reported in the error list alongside the SEC summary.
pub(super) async fn run_sync(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<SyncData>>, ApiError> {
    let (sec_result, reddit_result) = tokio::join!(
        run_sec_sync(&state.pool, &state.edgar, &state.config),
        run_reddit_sync(&state.pool, &state.reddit, &state.config),
    );

    let sec = match sec_result {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "SEC sync failed");
            return Err(ApiError::new(
                req_id.0,
                "upstream_error",
                format!("SEC sync failed: {e}"),
            ));
        }
    };

    let mut errors = Vec::new();
    let reddit = match reddit_result {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::error!(error = %e, "Reddit sync failed");
            errors.push(format!("reddit: {e}"));
            None
        }
    };

    Ok(Json(ApiResponse {
        data: SyncData {
            sec,
            reddit,
            errors,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
