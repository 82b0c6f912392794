use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};

use insiderdb_sync::VerifyRequest;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Cross-check a claimed insider transaction against EDGAR.
///
/// An unknown ticker answers 404 with the `Unverified` outcome as the body:
/// the company simply is not in the SEC's list, which is a property of the
/// request, not a server failure.
pub(super) async fn verify_claim(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<VerifyRequest>,
) -> Result<Response, ApiError> {
    if request.ticker.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "ticker must not be empty",
        ));
    }

    let outcome =
        insiderdb_sync::verify_and_record(&state.pool, &state.edgar, &state.cik_map, &request)
            .await
            .map_err(|e| match e {
                insiderdb_sync::SyncError::Db(insiderdb_db::DbError::NotFound) => ApiError::new(
                    req_id.0.clone(),
                    "not_found",
                    "no stored record carries that filing_id",
                ),
                other => {
                    tracing::error!(error = %other, ticker = %request.ticker, "verification failed");
                    ApiError::new(
                        req_id.0.clone(),
                        "upstream_error",
                        format!("verification failed: {other}"),
                    )
                }
            })?;

    // Every resolved ticker carries its CIK; only the unknown-ticker
    // outcome leaves it empty.
    let status_code = if outcome.cik.is_none() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    Ok((
        status_code,
        Json(ApiResponse {
            data: outcome,
            meta: ResponseMeta::new(req_id.0),
        }),
    )
        .into_response())
}
