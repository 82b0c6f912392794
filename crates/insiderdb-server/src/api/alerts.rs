use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use insiderdb_core::{TransactionType, VerificationStatus};
use insiderdb_db::AlertFilter;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AlertsQuery {
    pub ticker: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct AlertItem {
    pub id: i64,
    pub filing_id: String,
    pub ticker: String,
    pub company_name: String,
    pub cik: Option<String>,
    pub insider_name: String,
    pub insider_title: String,
    pub transaction_type: String,
    pub shares: Decimal,
    pub price_per_share: Decimal,
    pub total_value: Decimal,
    pub report_date: NaiveDate,
    pub filing_date: NaiveDate,
    pub source_url: String,
    pub verification_status: String,
    pub verification_message: Option<String>,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

pub(super) async fn list_alerts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<ApiResponse<Vec<AlertItem>>>, ApiError> {
    // Reject unknown filter values up front instead of returning an empty
    // list the caller cannot tell apart from "no matches".
    if let Some(t) = query.transaction_type.as_deref() {
        if TransactionType::parse(t).is_none() {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                format!("unknown transaction type '{t}'"),
            ));
        }
    }
    if let Some(s) = query.status.as_deref() {
        if VerificationStatus::parse(s).is_none() {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                format!("unknown verification status '{s}'"),
            ));
        }
    }

    let filter = AlertFilter {
        transaction_type: query.transaction_type,
        verification_status: query.status,
        ticker: query.ticker,
        limit: normalize_limit(query.limit),
        offset: query.offset.unwrap_or(0).max(0),
    };

    let rows = insiderdb_db::list_alerts(&state.pool, &filter)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| AlertItem {
            id: row.id,
            filing_id: row.filing_id,
            ticker: row.ticker,
            company_name: row.company_name,
            cik: row.cik,
            insider_name: row.insider_name,
            insider_title: row.insider_title,
            transaction_type: row.transaction_type,
            shares: row.shares,
            price_per_share: row.price_per_share,
            total_value: row.total_value,
            report_date: row.report_date,
            filing_date: row.filing_date,
            source_url: row.source_url,
            verification_status: row.verification_status,
            verification_message: row.verification_message,
            source: row.source,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
