use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use learnhub_auth_types::identity::IdentityHeaders;
use learnhub_domain::pagination::PageRequest;
use learnhub_domain::role::Capability;

use crate::domain::types::{PayoutRequest, PayoutStatus};
use crate::error::CoursesServiceError;
use crate::state::AppState;
use crate::usecase::payout::{
    CompletePayoutUseCase, CreatePayoutRequestUseCase, ListPayoutsUseCase, ReviewDecision,
    ReviewPayoutInput, ReviewPayoutUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PayoutResponse {
    pub id: Uuid,
    pub requested_amount: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_fee: Option<i64>,
    #[serde(serialize_with = "learnhub_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

fn status_label(status: PayoutStatus) -> &'static str {
    match status {
        PayoutStatus::Pending => "pending",
        PayoutStatus::Approved => "approved",
        PayoutStatus::Rejected => "rejected",
        PayoutStatus::Completed => "completed",
    }
}

fn status_from_label(label: &str) -> Option<PayoutStatus> {
    match label {
        "pending" => Some(PayoutStatus::Pending),
        "approved" => Some(PayoutStatus::Approved),
        "rejected" => Some(PayoutStatus::Rejected),
        "completed" => Some(PayoutStatus::Completed),
        _ => None,
    }
}

impl From<PayoutRequest> for PayoutResponse {
    fn from(p: PayoutRequest) -> Self {
        PayoutResponse {
            id: p.id,
            requested_amount: p.requested_amount,
            status: status_label(p.status).to_owned(),
            review_notes: p.review_notes,
            net_amount: p.net_amount,
            processing_fee: p.processing_fee,
            created_at: p.created_at,
        }
    }
}

// ── POST /payouts ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreatePayoutRequestBody {
    pub requested_amount: i64,
}

pub async fn create_payout(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreatePayoutRequestBody>,
) -> Result<(StatusCode, Json<PayoutResponse>), CoursesServiceError> {
    if !identity.role.allows(Capability::RequestPayout) {
        return Err(CoursesServiceError::Forbidden);
    }
    let uc = CreatePayoutRequestUseCase {
        teacher_profiles: state.teacher_profile_repo(),
        payouts: state.payout_repo(),
    };
    let payout = uc.execute(identity.user_id, body.requested_amount).await?;
    Ok((StatusCode::CREATED, Json(payout.into())))
}

// ── GET /payouts ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct PayoutListQuery {
    pub status: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn get_payouts(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<PayoutListQuery>,
) -> Result<Json<Vec<PayoutResponse>>, CoursesServiceError> {
    if !identity.role.allows(Capability::ReviewPayouts) {
        return Err(CoursesServiceError::Forbidden);
    }
    let status = match query.status.as_deref() {
        Some(label) => {
            Some(status_from_label(label).ok_or(CoursesServiceError::MissingData)?)
        }
        None => None,
    };
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(20),
        page: query.page.unwrap_or(1),
    };
    let uc = ListPayoutsUseCase {
        payouts: state.payout_repo(),
    };
    let payouts = uc.execute(status, page).await?;
    Ok(Json(payouts.into_iter().map(PayoutResponse::from).collect()))
}

// ── PATCH /payouts/{payout_id} ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ReviewPayoutRequest {
    /// Target status: `approved`, `rejected`, or `completed`.
    pub status: String,
    pub review_notes: Option<String>,
}

pub async fn review_payout(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(payout_id): Path<Uuid>,
    Json(body): Json<ReviewPayoutRequest>,
) -> Result<Json<PayoutResponse>, CoursesServiceError> {
    if !identity.role.allows(Capability::ReviewPayouts) {
        return Err(CoursesServiceError::Forbidden);
    }
    let payout = match body.status.as_str() {
        "approved" | "rejected" => {
            let decision = if body.status == "approved" {
                ReviewDecision::Approve
            } else {
                ReviewDecision::Reject
            };
            let uc = ReviewPayoutUseCase {
                payouts: state.payout_repo(),
            };
            uc.execute(ReviewPayoutInput {
                payout_id,
                decision,
                notes: body.review_notes,
            })
            .await?
        }
        "completed" => {
            let uc = CompletePayoutUseCase {
                payouts: state.payout_repo(),
            };
            uc.execute(payout_id).await?
        }
        _ => return Err(CoursesServiceError::MissingData),
    };
    Ok(Json(payout.into()))
}
